use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use diesel::deserialize::{FromSql, FromSqlRow};
use diesel::expression::AsExpression;
use diesel::prelude::*;
use diesel::serialize::{self, IsNull, Output, ToSql};
use diesel::sql_types::Text;
use diesel::sqlite::{Sqlite, SqliteValue};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Lifecycle state of a contract, stored as a three letter code
///
/// Any state may follow any other; the signed employer sets it directly.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, AsExpression, FromSqlRow)]
#[diesel(sql_type = Text)]
pub enum ContractStatus {
    #[default]
    #[serde(rename = "PEN")]
    Pending,
    #[serde(rename = "ATV")]
    Active,
    #[serde(rename = "END")]
    Ended,
    #[serde(rename = "RJT")]
    Rejected,
}

impl ContractStatus {
    pub const ALL: [ContractStatus; 4] = [
        ContractStatus::Pending,
        ContractStatus::Active,
        ContractStatus::Ended,
        ContractStatus::Rejected,
    ];

    pub fn code(&self) -> &'static str {
        match self {
            ContractStatus::Pending => "PEN",
            ContractStatus::Active => "ATV",
            ContractStatus::Ended => "END",
            ContractStatus::Rejected => "RJT",
        }
    }

    /// Human readable name
    pub fn label(&self) -> &'static str {
        match self {
            ContractStatus::Pending => "Pending",
            ContractStatus::Active => "Active",
            ContractStatus::Ended => "Ended",
            ContractStatus::Rejected => "Rejected",
        }
    }
}

impl fmt::Display for ContractStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for ContractStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|status| status.code() == s)
            .ok_or_else(|| format!("\"{}\" is not a valid choice.", s))
    }
}

impl FromSql<Text, Sqlite> for ContractStatus {
    fn from_sql(value: SqliteValue<'_, '_, '_>) -> diesel::deserialize::Result<Self> {
        let text = <String as FromSql<Text, Sqlite>>::from_sql(value)?;
        Ok(text.parse()?)
    }
}

impl ToSql<Text, Sqlite> for ContractStatus {
    fn to_sql<'b>(&'b self, out: &mut Output<'b, '_, Sqlite>) -> serialize::Result {
        out.set_value(self.code());
        Ok(IsNull::No)
    }
}

/// An agreement linking a job, an employer and one or more workers
#[derive(Queryable, Selectable, Insertable, Debug, Clone, PartialEq, Eq)]
#[diesel(table_name = crate::schema::contracts)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct Contract {
    id: String,
    start_date: NaiveDate,
    end_date: Option<NaiveDate>,
    status: ContractStatus,
    signed_employer_id: Option<String>,
    job_id: Option<String>,
    created_at: NaiveDateTime,
}

impl Contract {
    /// Creates a pending contract signed by `employer_id`, optionally for a job
    pub fn new(employer_id: String, job_id: Option<String>, start_date: NaiveDate, end_date: Option<NaiveDate>) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            start_date,
            end_date,
            status: ContractStatus::Pending,
            signed_employer_id: Some(employer_id),
            job_id,
            created_at: Utc::now().naive_utc(),
        }
    }

    pub fn get_id(&self) -> String {
        self.id.clone()
    }

    pub fn get_start_date(&self) -> NaiveDate {
        self.start_date
    }

    pub fn get_end_date(&self) -> Option<NaiveDate> {
        self.end_date
    }

    pub fn get_status(&self) -> ContractStatus {
        self.status
    }

    pub fn get_signed_employer_id(&self) -> Option<String> {
        self.signed_employer_id.clone()
    }

    pub fn get_job_id(&self) -> Option<String> {
        self.job_id.clone()
    }

    pub fn get_created_at(&self) -> DateTime<Utc> {
        DateTime::from_naive_utc_and_offset(self.created_at, Utc)
    }
}
