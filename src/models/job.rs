use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use diesel::prelude::*;
use uuid::Uuid;

use super::JsonList;
use crate::schema::jobs;

/// A job posting owned by an employer
///
/// List-valued columns (`types`, `shifts`, `tags`, ...) are stored as JSON
/// arrays. The employer link is cleared rather than cascaded when the
/// employer account goes away, so past postings survive.
#[derive(Queryable, Selectable, Insertable, Debug, Clone, PartialEq)]
#[diesel(table_name = jobs)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct Job {
    id: String,
    title: String,
    employer_id: Option<String>,
    start_date: NaiveDate,
    end_date: Option<NaiveDate>,
    description: String,
    location: String,
    types: JsonList,
    shifts: JsonList,
    responsibilities: JsonList,
    qualifications: JsonList,
    benefits: JsonList,
    min_salary: f64,
    max_salary: f64,
    period_salary: String,
    application_instructions: String,
    tags: JsonList,
    done: bool,
    posted_date: NaiveDateTime,
}

/// Field changes for a job posting
#[derive(AsChangeset, Debug, Clone, Default, PartialEq)]
#[diesel(table_name = jobs)]
pub struct JobChanges {
    pub title: Option<String>,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<Option<NaiveDate>>,
    pub description: Option<String>,
    pub location: Option<String>,
    pub types: Option<JsonList>,
    pub shifts: Option<JsonList>,
    pub responsibilities: Option<JsonList>,
    pub qualifications: Option<JsonList>,
    pub benefits: Option<JsonList>,
    pub min_salary: Option<f64>,
    pub max_salary: Option<f64>,
    pub period_salary: Option<String>,
    pub application_instructions: Option<String>,
    pub tags: Option<JsonList>,
    pub done: Option<bool>,
}

impl JobChanges {
    /// Returns true when no column would be written
    pub fn is_empty(&self) -> bool {
        *self == JobChanges::default()
    }
}

impl Job {
    /// Builds a new posting for `employer_id`
    ///
    /// ### Arguments
    ///
    /// * `employer_id` - User id of the posting employer
    /// * `changes` - Column values; the responsibility, qualification and
    ///   benefit lists default to empty
    ///
    /// ### Returns
    ///
    /// `None` if a required column is missing
    pub fn from_changes(employer_id: String, changes: JobChanges) -> Option<Self> {
        Some(Self {
            id: Uuid::new_v4().to_string(),
            title: changes.title?,
            employer_id: Some(employer_id),
            start_date: changes.start_date?,
            end_date: changes.end_date.flatten(),
            description: changes.description?,
            location: changes.location?,
            types: changes.types?,
            shifts: changes.shifts?,
            responsibilities: changes.responsibilities.unwrap_or_default(),
            qualifications: changes.qualifications.unwrap_or_default(),
            benefits: changes.benefits.unwrap_or_default(),
            min_salary: changes.min_salary?,
            max_salary: changes.max_salary?,
            period_salary: changes.period_salary?,
            application_instructions: changes.application_instructions?,
            tags: changes.tags?,
            done: changes.done.unwrap_or(false),
            posted_date: Utc::now().naive_utc(),
        })
    }

    pub fn get_id(&self) -> String {
        self.id.clone()
    }

    pub fn get_title(&self) -> String {
        self.title.clone()
    }

    pub fn get_employer_id(&self) -> Option<String> {
        self.employer_id.clone()
    }

    pub fn get_start_date(&self) -> NaiveDate {
        self.start_date
    }

    pub fn get_end_date(&self) -> Option<NaiveDate> {
        self.end_date
    }

    pub fn get_description(&self) -> String {
        self.description.clone()
    }

    pub fn get_location(&self) -> String {
        self.location.clone()
    }

    pub fn get_types(&self) -> JsonList {
        self.types.clone()
    }

    pub fn get_shifts(&self) -> JsonList {
        self.shifts.clone()
    }

    pub fn get_responsibilities(&self) -> JsonList {
        self.responsibilities.clone()
    }

    pub fn get_qualifications(&self) -> JsonList {
        self.qualifications.clone()
    }

    pub fn get_benefits(&self) -> JsonList {
        self.benefits.clone()
    }

    pub fn get_min_salary(&self) -> f64 {
        self.min_salary
    }

    pub fn get_max_salary(&self) -> f64 {
        self.max_salary
    }

    pub fn get_period_salary(&self) -> String {
        self.period_salary.clone()
    }

    pub fn get_application_instructions(&self) -> String {
        self.application_instructions.clone()
    }

    pub fn get_tags(&self) -> JsonList {
        self.tags.clone()
    }

    pub fn get_done(&self) -> bool {
        self.done
    }

    pub fn get_posted_date(&self) -> DateTime<Utc> {
        DateTime::from_naive_utc_and_offset(self.posted_date, Utc)
    }

    /// Returns true if `user_id` is the employer who posted the job
    pub fn is_owned_by(&self, user_id: &str) -> bool {
        self.employer_id.as_deref() == Some(user_id)
    }
}
