use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use validator::Validate;

use crate::errors::ValidationErrors;
use crate::media::MediaStorage;
use crate::models::{
    Contract, EmployerAccount, EmployerAccountChanges, EmployerFeedback, Job, JobChanges, JsonList,
    WorkSchedule, WorkerAccountChanges, WorkerFeedback,
};
use crate::repo::{ContractDetails, WorkerProfile};
use crate::validators::{
    validate_birthdate, validate_company_size, validate_contract_date, validate_job_types,
    validate_not_in_past, validate_blank_or_url, validate_password_strength, validate_phone,
    validate_schedule, validate_shifts, validate_tags, validate_username_or_email,
};

// ============================================================================
// Lenient field parsing
//
// Multipart forms deliver every value as text, so numbers and booleans are
// accepted both natively and as strings.
// ============================================================================

fn string_or_number<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Text(String),
        Number(u64),
    }

    Ok(Option::<Raw>::deserialize(deserializer)?.map(|raw| match raw {
        Raw::Text(text) => text,
        Raw::Number(number) => number.to_string(),
    }))
}

fn lenient_bool<'de, D>(deserializer: D) -> Result<Option<bool>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Bool(bool),
        Text(String),
    }

    match Option::<Raw>::deserialize(deserializer)? {
        None => Ok(None),
        Some(Raw::Bool(value)) => Ok(Some(value)),
        Some(Raw::Text(text)) => match text.to_ascii_lowercase().as_str() {
            "true" | "1" | "on" | "yes" => Ok(Some(true)),
            "false" | "0" | "off" | "no" | "" => Ok(Some(false)),
            _ => Err(serde::de::Error::custom(format!("\"{}\" is not a valid boolean.", text))),
        },
    }
}

/// Adds a "This field is required." error for every `(name, present)` pair that is missing
fn require(errors: &mut ValidationErrors, fields: &[(&str, bool)]) {
    for (name, present) in fields {
        if !present {
            errors.add_required(name);
        }
    }
}

// ============================================================================
// Worker accounts
// ============================================================================

/// Data transfer object for creating or updating a worker account
///
/// Every field is optional so the same type serves `PATCH`; `POST` and `PUT`
/// additionally call `missing_required`. `rating` and `verifiedId` are not
/// accepted from clients. The photo arrives as a multipart file part.
#[derive(Deserialize, Validate, Debug, Default, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct WorkerAccountInput {
    /// Profession name, e.g. "Painter"
    pub profession: Option<String>,

    #[validate(length(min = 2, max = 20))]
    pub first_name: Option<String>,

    #[validate(length(min = 2, max = 20))]
    pub last_name: Option<String>,

    #[validate(custom(function = "validate_birthdate"))]
    pub birthdate: Option<NaiveDate>,

    #[serde(default, deserialize_with = "string_or_number")]
    #[validate(length(max = 20), custom(function = "validate_phone"))]
    pub phone: Option<String>,

    #[validate(length(min = 1, max = 50))]
    pub location: Option<String>,

    #[validate(length(max = 255))]
    pub about: Option<String>,

    #[serde(default, deserialize_with = "lenient_bool")]
    pub driving_license: Option<bool>,
}

impl WorkerAccountInput {
    /// Errors for required fields that are absent
    pub fn missing_required(&self) -> ValidationErrors {
        let mut errors = ValidationErrors::new();
        require(
            &mut errors,
            &[
                ("profession", self.profession.is_some()),
                ("first_name", self.first_name.is_some()),
                ("last_name", self.last_name.is_some()),
                ("birthdate", self.birthdate.is_some()),
                ("phone", self.phone.is_some()),
                ("location", self.location.is_some()),
            ],
        );
        errors
    }

    /// Converts into column changes
    ///
    /// ### Arguments
    ///
    /// * `profession_id` - The id the profession name resolved to
    /// * `photo` - `Some(path)` when a new photo was stored
    pub fn into_changes(self, profession_id: Option<i32>, photo: Option<String>) -> WorkerAccountChanges {
        WorkerAccountChanges {
            photo: photo.map(Some),
            profession_id,
            first_name: self.first_name,
            last_name: self.last_name,
            birthdate: self.birthdate,
            phone: self.phone,
            location: self.location,
            about: self.about,
            driving_license: self.driving_license,
            ..WorkerAccountChanges::default()
        }
    }
}

/// A worker account as returned by the API
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct WorkerAccountResponse {
    pub username: String,
    pub photo: Option<String>,
    pub profession: String,
    pub first_name: String,
    pub last_name: String,
    pub birthdate: NaiveDate,
    pub phone: String,
    pub rating: i32,
    pub location: String,
    pub about: String,
    pub verified_id: bool,
    pub driving_license: bool,
    pub last_update: DateTime<Utc>,
    pub review_count: i64,
    pub jobs_done: i64,
}

impl WorkerAccountResponse {
    pub fn from_profile(profile: WorkerProfile, media: &MediaStorage) -> Self {
        let account = &profile.account;
        Self {
            username: profile.username.clone(),
            photo: account.get_photo().map(|p| media.url(&p)),
            profession: profile.profession.clone(),
            first_name: account.get_first_name(),
            last_name: account.get_last_name(),
            birthdate: account.get_birthdate(),
            phone: account.get_phone(),
            rating: account.get_rating(),
            location: account.get_location(),
            about: account.get_about(),
            verified_id: account.get_verified_id(),
            driving_license: account.get_driving_license(),
            last_update: account.get_last_update(),
            review_count: profile.review_count,
            jobs_done: profile.jobs_done,
        }
    }
}

/// Query parameters for listing accounts
#[derive(Deserialize, Debug, Default, Clone, PartialEq)]
#[serde(default)]
pub struct AccountQuery {
    /// Profession names to keep; repeatable
    pub profession: Vec<String>,

    /// Case-insensitive substring of the location
    pub location: Option<String>,
}

// ============================================================================
// Employer accounts
// ============================================================================

/// Data transfer object for creating or updating an employer account
///
/// `logo` and `personalPhoto` arrive as multipart file parts.
#[derive(Deserialize, Validate, Debug, Default, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct EmployerAccountInput {
    #[validate(length(min = 1, max = 50))]
    pub company_name: Option<String>,

    #[validate(length(min = 1, max = 255))]
    pub address: Option<String>,

    #[validate(length(min = 1, max = 100))]
    pub legal_name: Option<String>,

    #[validate(length(min = 1, max = 50))]
    pub industry: Option<String>,

    #[validate(custom(function = "validate_company_size"))]
    pub company_size: Option<String>,

    #[validate(length(min = 1, max = 50))]
    pub location: Option<String>,

    #[validate(length(max = 200), custom(function = "validate_blank_or_url"))]
    pub company_url: Option<String>,

    pub description: Option<String>,

    #[validate(length(min = 1, max = 50))]
    pub role: Option<String>,

    #[validate(length(min = 1, max = 50))]
    pub first_name: Option<String>,

    #[validate(length(min = 1, max = 50))]
    pub last_name: Option<String>,

    #[serde(default, deserialize_with = "string_or_number")]
    #[validate(length(max = 20), custom(function = "validate_phone"))]
    pub phone: Option<String>,
}

impl EmployerAccountInput {
    pub fn missing_required(&self) -> ValidationErrors {
        let mut errors = ValidationErrors::new();
        require(
            &mut errors,
            &[
                ("company_name", self.company_name.is_some()),
                ("address", self.address.is_some()),
                ("legal_name", self.legal_name.is_some()),
                ("industry", self.industry.is_some()),
                ("company_size", self.company_size.is_some()),
                ("location", self.location.is_some()),
                ("role", self.role.is_some()),
                ("first_name", self.first_name.is_some()),
                ("last_name", self.last_name.is_some()),
                ("phone", self.phone.is_some()),
            ],
        );
        errors
    }

    pub fn into_changes(self, logo: Option<String>, personal_photo: Option<String>) -> EmployerAccountChanges {
        EmployerAccountChanges {
            logo: logo.map(Some),
            company_name: self.company_name,
            address: self.address,
            legal_name: self.legal_name,
            industry: self.industry,
            company_size: self.company_size,
            location: self.location,
            company_url: self.company_url,
            description: self.description,
            personal_photo: personal_photo.map(Some),
            role: self.role,
            first_name: self.first_name,
            last_name: self.last_name,
            phone: self.phone,
            ..EmployerAccountChanges::default()
        }
    }
}

/// An employer account as returned by the API
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct EmployerAccountResponse {
    pub username: String,
    pub logo: Option<String>,
    pub company_name: String,
    pub address: String,
    pub legal_name: String,
    pub industry: String,
    pub company_size: String,
    pub location: String,
    pub company_url: String,
    pub description: String,
    pub personal_photo: Option<String>,
    pub role: String,
    pub first_name: String,
    pub last_name: String,
    pub phone: String,
    pub verified_id: bool,
    pub last_update: DateTime<Utc>,
}

impl EmployerAccountResponse {
    pub fn from_account(username: String, account: &EmployerAccount, media: &MediaStorage) -> Self {
        Self {
            username,
            logo: account.get_logo().map(|p| media.url(&p)),
            company_name: account.get_company_name(),
            address: account.get_address(),
            legal_name: account.get_legal_name(),
            industry: account.get_industry(),
            company_size: account.get_company_size(),
            location: account.get_location(),
            company_url: account.get_company_url(),
            description: account.get_description(),
            personal_photo: account.get_personal_photo().map(|p| media.url(&p)),
            role: account.get_role(),
            first_name: account.get_first_name(),
            last_name: account.get_last_name(),
            phone: account.get_phone(),
            verified_id: account.get_verified_id(),
            last_update: account.get_last_update(),
        }
    }
}

// ============================================================================
// Users and authentication
// ============================================================================

/// Data transfer object for registering a new user
#[derive(Deserialize, Validate, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
    #[validate(email)]
    pub email: String,

    #[validate(length(min = 1, max = 150))]
    pub username: String,

    #[validate(length(min = 3))]
    pub password: String,

    pub confirmation: String,
}

/// Data transfer object for logging in with a username or an email
#[derive(Deserialize, Validate, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct LoginRequest {
    #[validate(custom(function = "validate_username_or_email"))]
    pub email_username: String,

    pub password: String,
}

/// Data transfer object for changing the current user's password
#[derive(Deserialize, Validate, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct ChangePasswordRequest {
    pub old_password: String,

    #[validate(custom(function = "validate_password_strength"))]
    pub new_password: String,

    #[validate(custom(function = "validate_password_strength"))]
    pub new_password_confirmation: String,
}

/// The user returned by register and login
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct UserResponse {
    pub username: String,
    pub email: String,
    pub has_worker_account: bool,
    pub has_employer_account: bool,
}

impl From<&crate::models::User> for UserResponse {
    fn from(user: &crate::models::User) -> Self {
        Self {
            username: user.get_username(),
            email: user.get_email(),
            has_worker_account: user.get_has_worker_account(),
            has_employer_account: user.get_has_employer_account(),
        }
    }
}

/// Who is calling, as reported by `GET /me`
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct MeResponse {
    pub username: Option<String>,
    pub authenticated: bool,
    pub has_worker_account: bool,
    pub has_employer_account: bool,
}

impl MeResponse {
    pub fn anonymous() -> Self {
        Self {
            username: None,
            authenticated: false,
            has_worker_account: false,
            has_employer_account: false,
        }
    }
}

impl From<&crate::models::User> for MeResponse {
    fn from(user: &crate::models::User) -> Self {
        Self {
            username: Some(user.get_username()),
            authenticated: true,
            has_worker_account: user.get_has_worker_account(),
            has_employer_account: user.get_has_employer_account(),
        }
    }
}

// ============================================================================
// Metadata
// ============================================================================

/// Field choices for job postings; keys stay snake_case
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct JobDataResponse {
    pub job_types: Vec<String>,
    pub shifts: Vec<String>,
    pub days_schedule: Vec<String>,
    pub tags: Vec<String>,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct CompanySizeResponse {
    pub value: String,
    pub label: String,
}

// ============================================================================
// Jobs
// ============================================================================

/// Data transfer object for creating or updating a job posting
#[derive(Deserialize, Validate, Debug, Default, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct JobInput {
    #[validate(length(min = 1, max = 255))]
    pub title: Option<String>,

    #[validate(custom(function = "validate_not_in_past"))]
    pub start_date: Option<NaiveDate>,

    #[validate(custom(function = "validate_not_in_past"))]
    pub end_date: Option<NaiveDate>,

    pub description: Option<String>,

    #[validate(length(min = 1, max = 255))]
    pub location: Option<String>,

    #[validate(custom(function = "validate_job_types"))]
    pub types: Option<Vec<String>>,

    #[validate(custom(function = "validate_shifts"))]
    pub shifts: Option<Vec<String>>,

    pub responsibilities: Option<Vec<String>>,
    pub qualifications: Option<Vec<String>>,
    pub benefits: Option<Vec<String>>,

    #[validate(range(min = 0.0))]
    pub min_salary: Option<f64>,

    #[validate(range(min = 0.0, max = 100000.0))]
    pub max_salary: Option<f64>,

    #[validate(length(min = 1, max = 255))]
    pub period_salary: Option<String>,

    pub application_instructions: Option<String>,

    #[validate(custom(function = "validate_tags"))]
    pub tags: Option<Vec<String>>,

    #[serde(default, deserialize_with = "lenient_bool")]
    pub done: Option<bool>,
}

impl JobInput {
    pub fn missing_required(&self) -> ValidationErrors {
        let mut errors = ValidationErrors::new();
        require(
            &mut errors,
            &[
                ("title", self.title.is_some()),
                ("start_date", self.start_date.is_some()),
                ("description", self.description.is_some()),
                ("location", self.location.is_some()),
                ("types", self.types.is_some()),
                ("shifts", self.shifts.is_some()),
                ("min_salary", self.min_salary.is_some()),
                ("max_salary", self.max_salary.is_some()),
                ("period_salary", self.period_salary.is_some()),
                ("application_instructions", self.application_instructions.is_some()),
                ("tags", self.tags.is_some()),
            ],
        );
        errors
    }

    pub fn into_changes(self) -> JobChanges {
        JobChanges {
            title: self.title,
            start_date: self.start_date,
            end_date: self.end_date.map(Some),
            description: self.description,
            location: self.location,
            types: self.types.map(JsonList),
            shifts: self.shifts.map(JsonList),
            responsibilities: self.responsibilities.map(JsonList),
            qualifications: self.qualifications.map(JsonList),
            benefits: self.benefits.map(JsonList),
            min_salary: self.min_salary,
            max_salary: self.max_salary,
            period_salary: self.period_salary,
            application_instructions: self.application_instructions,
            tags: self.tags.map(JsonList),
            done: self.done,
        }
    }
}

/// A job posting as returned by the API
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct JobResponse {
    pub id: String,
    pub title: String,
    /// User id of the posting employer
    pub employer: Option<String>,
    pub start_date: NaiveDate,
    pub end_date: Option<NaiveDate>,
    pub description: String,
    pub location: String,
    pub types: Vec<String>,
    pub shifts: Vec<String>,
    pub responsibilities: Vec<String>,
    pub qualifications: Vec<String>,
    pub benefits: Vec<String>,
    pub min_salary: f64,
    pub max_salary: f64,
    pub period_salary: String,
    pub application_instructions: String,
    pub tags: Vec<String>,
    pub done: bool,
    pub posted_date: DateTime<Utc>,
}

impl From<&Job> for JobResponse {
    fn from(job: &Job) -> Self {
        Self {
            id: job.get_id(),
            title: job.get_title(),
            employer: job.get_employer_id(),
            start_date: job.get_start_date(),
            end_date: job.get_end_date(),
            description: job.get_description(),
            location: job.get_location(),
            types: job.get_types().0,
            shifts: job.get_shifts().0,
            responsibilities: job.get_responsibilities().0,
            qualifications: job.get_qualifications().0,
            benefits: job.get_benefits().0,
            min_salary: job.get_min_salary(),
            max_salary: job.get_max_salary(),
            period_salary: job.get_period_salary(),
            application_instructions: job.get_application_instructions(),
            tags: job.get_tags().0,
            done: job.get_done(),
            posted_date: job.get_posted_date(),
        }
    }
}

/// A job posting with the usernames of its applicants and hired workers
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct JobDetailResponse {
    #[serde(flatten)]
    pub job: JobResponse,
    pub applicants: Vec<String>,
    pub workers: Vec<String>,
}

/// Query parameters for listing jobs; list filters are repeatable
#[derive(Deserialize, Debug, Default, Clone, PartialEq)]
#[serde(default)]
pub struct JobQuery {
    #[serde(rename = "type")]
    pub job_type: Vec<String>,
    pub shift: Vec<String>,
    pub tag: Vec<String>,
    pub location: Option<String>,
    pub done: Option<bool>,
}

/// Data transfer object for hiring a worker onto a job
#[derive(Deserialize, Validate, Debug, Clone)]
pub struct HireWorkerRequest {
    #[validate(length(min = 1))]
    pub username: String,
}

/// Data transfer object for adding a work schedule to a job
#[derive(Deserialize, Validate, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct WorkScheduleRequest {
    #[validate(custom(function = "validate_schedule"))]
    pub schedules: Vec<String>,
    pub time_from: NaiveTime,
    pub time_to: NaiveTime,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct WorkScheduleResponse {
    pub id: String,
    pub job: String,
    pub schedules: Vec<String>,
    pub time_from: NaiveTime,
    pub time_to: NaiveTime,
}

impl From<&WorkSchedule> for WorkScheduleResponse {
    fn from(schedule: &WorkSchedule) -> Self {
        Self {
            id: schedule.get_id(),
            job: schedule.get_job_id(),
            schedules: schedule.get_schedules().0,
            time_from: schedule.get_time_from(),
            time_to: schedule.get_time_to(),
        }
    }
}

// ============================================================================
// Feedback
// ============================================================================

/// Employer's feedback on a hired worker
#[derive(Deserialize, Validate, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct WorkerFeedbackRequest {
    /// Username of the rated worker
    pub worker: String,

    #[validate(range(min = 0, max = 5))]
    pub rating: i32,

    pub text: String,
}

/// Worker's feedback on the employer of a job
#[derive(Deserialize, Validate, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct EmployerFeedbackRequest {
    #[validate(range(min = 0, max = 5))]
    pub rating: i32,

    pub text: String,
}

/// Either kind of feedback as returned by the API
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct FeedbackResponse {
    pub id: String,
    pub rating: i32,
    pub text: String,
    pub job: Option<String>,
    pub worker: Option<String>,
    pub employer: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl From<&EmployerFeedback> for FeedbackResponse {
    fn from(feedback: &EmployerFeedback) -> Self {
        Self {
            id: feedback.get_id(),
            rating: feedback.get_rating(),
            text: feedback.get_text(),
            job: feedback.get_job_id(),
            worker: feedback.get_worker_id(),
            employer: feedback.get_employer_id(),
            created_at: feedback.get_created_at(),
        }
    }
}

impl From<&WorkerFeedback> for FeedbackResponse {
    fn from(feedback: &WorkerFeedback) -> Self {
        Self {
            id: feedback.get_id(),
            rating: feedback.get_rating(),
            text: feedback.get_text(),
            job: feedback.get_job_id(),
            worker: feedback.get_worker_id(),
            employer: feedback.get_employer_id(),
            created_at: feedback.get_created_at(),
        }
    }
}

// ============================================================================
// Contracts
// ============================================================================

/// Data transfer object for drawing up a contract
#[derive(Deserialize, Validate, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct CreateContractRequest {
    #[validate(custom(function = "validate_contract_date"))]
    pub start_date: NaiveDate,

    #[validate(custom(function = "validate_not_in_past"))]
    pub end_date: Option<NaiveDate>,

    /// Usernames of the workers signing the contract
    #[serde(default)]
    pub workers: Vec<String>,

    /// Id of one of the caller's jobs the contract is for
    #[serde(default)]
    pub job: Option<String>,
}

/// Data transfer object for changing a contract's status
#[derive(Deserialize, Validate, Debug, Clone)]
pub struct UpdateContractStatusRequest {
    /// One of PEN, ATV, END or RJT
    pub status: String,
}

/// A contract as returned by the API
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ContractResponse {
    pub id: String,
    pub start_date: NaiveDate,
    pub end_date: Option<NaiveDate>,
    pub status: String,
    pub status_label: String,
    pub signed_employer: Option<String>,
    pub signed_workers: Vec<String>,
    pub job: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl From<&ContractDetails> for ContractResponse {
    fn from(details: &ContractDetails) -> Self {
        let contract: &Contract = &details.contract;
        Self {
            id: contract.get_id(),
            start_date: contract.get_start_date(),
            end_date: contract.get_end_date(),
            status: contract.get_status().code().to_string(),
            status_label: contract.get_status().label().to_string(),
            signed_employer: details.employer_username.clone(),
            signed_workers: details.worker_usernames.clone(),
            job: contract.get_job_id(),
            created_at: contract.get_created_at(),
        }
    }
}
