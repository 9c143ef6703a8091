use chrono::{DateTime, NaiveDateTime, Utc};
use diesel::prelude::*;

use crate::schema::employer_accounts;

/// An employer profile: company data plus the representative's personal data
#[derive(Queryable, Selectable, Insertable, Debug, Clone, PartialEq, Eq)]
#[diesel(table_name = employer_accounts)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct EmployerAccount {
    user_id: String,

    // Company data
    logo: Option<String>,
    company_name: String,
    address: String,
    legal_name: String,
    industry: String,
    /// One of the `CompanySize` values
    company_size: String,
    location: String,
    company_url: String,
    description: String,

    // Representative
    personal_photo: Option<String>,
    role: String,
    first_name: String,
    last_name: String,
    phone: String,

    verified_id: bool,
    last_update: NaiveDateTime,
}

/// Field changes for an employer account, `None` meaning "leave as is"
#[derive(AsChangeset, Debug, Clone, PartialEq)]
#[diesel(table_name = employer_accounts)]
pub struct EmployerAccountChanges {
    pub logo: Option<Option<String>>,
    pub company_name: Option<String>,
    pub address: Option<String>,
    pub legal_name: Option<String>,
    pub industry: Option<String>,
    pub company_size: Option<String>,
    pub location: Option<String>,
    pub company_url: Option<String>,
    pub description: Option<String>,
    pub personal_photo: Option<Option<String>>,
    pub role: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub phone: Option<String>,
    pub last_update: NaiveDateTime,
}

impl Default for EmployerAccountChanges {
    fn default() -> Self {
        Self {
            logo: None,
            company_name: None,
            address: None,
            legal_name: None,
            industry: None,
            company_size: None,
            location: None,
            company_url: None,
            description: None,
            personal_photo: None,
            role: None,
            first_name: None,
            last_name: None,
            phone: None,
            last_update: Utc::now().naive_utc(),
        }
    }
}

impl EmployerAccount {
    /// Builds a new account for `user_id`
    ///
    /// Returns `None` when a required column has no value; logo, personal
    /// photo, company URL and description may be left out.
    pub fn from_changes(user_id: String, changes: EmployerAccountChanges) -> Option<Self> {
        Some(Self {
            user_id,
            logo: changes.logo.flatten(),
            company_name: changes.company_name?,
            address: changes.address?,
            legal_name: changes.legal_name?,
            industry: changes.industry?,
            company_size: changes.company_size?,
            location: changes.location?,
            company_url: changes.company_url.unwrap_or_default(),
            description: changes.description.unwrap_or_default(),
            personal_photo: changes.personal_photo.flatten(),
            role: changes.role?,
            first_name: changes.first_name?,
            last_name: changes.last_name?,
            phone: changes.phone?,
            verified_id: false,
            last_update: changes.last_update,
        })
    }

    pub fn get_user_id(&self) -> String {
        self.user_id.clone()
    }

    pub fn get_logo(&self) -> Option<String> {
        self.logo.clone()
    }

    pub fn get_company_name(&self) -> String {
        self.company_name.clone()
    }

    pub fn get_address(&self) -> String {
        self.address.clone()
    }

    pub fn get_legal_name(&self) -> String {
        self.legal_name.clone()
    }

    pub fn get_industry(&self) -> String {
        self.industry.clone()
    }

    pub fn get_company_size(&self) -> String {
        self.company_size.clone()
    }

    pub fn get_location(&self) -> String {
        self.location.clone()
    }

    pub fn get_company_url(&self) -> String {
        self.company_url.clone()
    }

    pub fn get_description(&self) -> String {
        self.description.clone()
    }

    pub fn get_personal_photo(&self) -> Option<String> {
        self.personal_photo.clone()
    }

    pub fn get_role(&self) -> String {
        self.role.clone()
    }

    pub fn get_first_name(&self) -> String {
        self.first_name.clone()
    }

    pub fn get_last_name(&self) -> String {
        self.last_name.clone()
    }

    pub fn get_phone(&self) -> String {
        self.phone.clone()
    }

    pub fn get_verified_id(&self) -> bool {
        self.verified_id
    }

    pub fn get_last_update(&self) -> DateTime<Utc> {
        DateTime::from_naive_utc_and_offset(self.last_update, Utc)
    }
}
