//! Field validators shared by the request DTOs
//!
//! Each validator returns a `validator::ValidationError` so it can be used
//! from `#[validate(custom(function = ...))]` attributes as well as called
//! directly from handlers.

use std::borrow::Cow;
use std::sync::LazyLock;

use chrono::{Datelike, NaiveDate, Utc};
use regex::Regex;
use serde::Serialize;
use validator::{ValidateEmail, ValidateUrl, ValidationError};

pub const JOB_TYPES: [&str; 5] = ["Part-Time", "Full-Time", "Overtime", "Contract", "Internship"];

pub const SHIFTS: [&str; 7] = [
    "Day Shift",
    "Night Shift",
    "Overnight Shift",
    "4 Hour Shift",
    "8 Hour Shift",
    "12 Hour Shift",
    "24 Hour Shift",
];

pub const SCHEDULE: [&str; 10] = [
    "Monday",
    "Tuesday",
    "Wednesday",
    "Thursday",
    "Friday",
    "Saturday",
    "Sunday",
    "Monday to Friday",
    "Weekend",
    "Whole Week",
];

pub const TAGS: [&str; 3] = ["Hiring multiple candidates", "Urgently hiring", "Temporary"];

/// Youngest and oldest ages accepted for account holders
pub const MIN_AGE: i32 = 18;
pub const MAX_AGE: i32 = 80;

/// Upper bound for `max_salary`
pub const MAX_SALARY: f64 = 100_000.0;

static PHONE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(\d{1,3})(\d{2})(\d{9})$").expect("valid phone regex"));

static USERNAME_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[^\W][\w.]{0,29}$").expect("valid username regex"));

fn error(code: &'static str, message: impl Into<Cow<'static, str>>) -> ValidationError {
    ValidationError::new(code).with_message(message.into())
}

fn validate_whitelist(
    values: &[String],
    allowed: &[&str],
    code: &'static str,
    kind: &str,
) -> Result<(), ValidationError> {
    match values.iter().find(|v| !allowed.contains(&v.as_str())) {
        Some(bad) => Err(error(code, format!("{} is not a valid {}", bad, kind))),
        None => Ok(()),
    }
}

pub fn validate_job_types(values: &[String]) -> Result<(), ValidationError> {
    validate_whitelist(values, &JOB_TYPES, "invalid_job_type", "job type")
}

pub fn validate_shifts(values: &[String]) -> Result<(), ValidationError> {
    validate_whitelist(values, &SHIFTS, "invalid_shift", "shift")
}

pub fn validate_schedule(values: &[String]) -> Result<(), ValidationError> {
    validate_whitelist(values, &SCHEDULE, "invalid_schedule", "schedule")
}

pub fn validate_tags(values: &[String]) -> Result<(), ValidationError> {
    validate_whitelist(values, &TAGS, "invalid_tag", "tag")
}

/// Age in whole years at `today`, one less if the birthday has not come yet this year
pub fn age_on(birthdate: NaiveDate, today: NaiveDate) -> i32 {
    let mut age = today.year() - birthdate.year();
    if (today.month(), today.day()) < (birthdate.month(), birthdate.day()) {
        age -= 1;
    }
    age
}

pub fn validate_birthdate_on(birthdate: &NaiveDate, today: NaiveDate) -> Result<(), ValidationError> {
    let age = age_on(*birthdate, today);
    if age > MAX_AGE {
        return Err(error("too_old", format!("Your age is {}. Too old.", age)));
    }
    if age < MIN_AGE {
        return Err(error("too_young", format!("Your age is {}. Too young.", age)));
    }
    Ok(())
}

pub fn validate_birthdate(birthdate: &NaiveDate) -> Result<(), ValidationError> {
    validate_birthdate_on(birthdate, Utc::now().date_naive())
}

pub fn validate_phone(phone: &str) -> Result<(), ValidationError> {
    if phone.len() > 20 || !PHONE_RE.is_match(phone) {
        return Err(error("invalid", "Enter a valid value."));
    }
    Ok(())
}

/// Accepts either an email address or a username of up to 30 word characters/dots
pub fn validate_username_or_email(value: &str) -> Result<(), ValidationError> {
    if value.contains('@') {
        if !value.validate_email() {
            return Err(error("invalid", "Enter a valid email address."));
        }
        return Ok(());
    }

    if value.contains("..") || value.ends_with('.') || !USERNAME_RE.is_match(value) {
        return Err(error("invalid_username", "Enter a valid username."));
    }
    Ok(())
}

/// Requires at least 8 characters mixing lower case, upper case, digits and symbols
pub fn validate_password_strength(password: &str) -> Result<(), ValidationError> {
    let long_enough = password.chars().count() >= 8;
    let has_lower = password.chars().any(|c| c.is_lowercase());
    let has_upper = password.chars().any(|c| c.is_uppercase());
    let has_digit = password.chars().any(|c| c.is_ascii_digit());
    let has_symbol = password.chars().any(|c| !c.is_alphanumeric() && !c.is_whitespace());

    if long_enough && has_lower && has_upper && has_digit && has_symbol {
        Ok(())
    } else {
        Err(error("invalid_password", "Password is not valid."))
    }
}

pub fn validate_not_before(
    date: &NaiveDate,
    floor: NaiveDate,
    code: &'static str,
    message: impl Into<Cow<'static, str>>,
) -> Result<(), ValidationError> {
    if *date < floor {
        return Err(error(code, message));
    }
    Ok(())
}

/// Dates that must not be in the past, e.g. job start dates
pub fn validate_not_in_past(date: &NaiveDate) -> Result<(), ValidationError> {
    let today = Utc::now().date_naive();
    validate_not_before(
        date,
        today,
        "min_value",
        format!("Ensure this value is greater than or equal to {}.", today),
    )
}

pub fn validate_contract_date(date: &NaiveDate) -> Result<(), ValidationError> {
    validate_not_before(
        date,
        Utc::now().date_naive(),
        "min_value",
        "Contract start date must be in the future",
    )
}

/// Company size buckets offered to employers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum CompanySize {
    Micro,
    Small,
    Medium,
    Large,
    Enterprise,
}

impl CompanySize {
    pub const ALL: [CompanySize; 5] = [
        CompanySize::Micro,
        CompanySize::Small,
        CompanySize::Medium,
        CompanySize::Large,
        CompanySize::Enterprise,
    ];

    pub fn value(&self) -> &'static str {
        match self {
            CompanySize::Micro => "micro",
            CompanySize::Small => "small",
            CompanySize::Medium => "medium",
            CompanySize::Large => "large",
            CompanySize::Enterprise => "enterprise",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            CompanySize::Micro => "Fewer than 10 employees",
            CompanySize::Small => "10 to 50 employees",
            CompanySize::Medium => "50 to 250 employees",
            CompanySize::Large => "250 to 500 employees",
            CompanySize::Enterprise => "More than 500 employees",
        }
    }

    pub fn from_value(value: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|size| size.value() == value)
    }
}

pub fn validate_company_size(value: &str) -> Result<(), ValidationError> {
    if CompanySize::from_value(value).is_none() {
        return Err(error(
            "invalid_choice",
            format!("\"{}\" is not a valid choice.", value),
        ));
    }
    Ok(())
}

/// Accepts an empty string or an absolute URL
pub fn validate_blank_or_url(value: &str) -> Result<(), ValidationError> {
    if value.is_empty() || value.validate_url() {
        return Ok(());
    }
    Err(error("invalid", "Enter a valid URL."))
}

/// Renders a byte count the way people read file sizes: `512 bytes`, `2.5 KB`, `3.0 MB`
pub fn filesizeformat(bytes: u64) -> String {
    const KB: f64 = 1024.0;
    const MB: f64 = KB * 1024.0;
    const GB: f64 = MB * 1024.0;

    let size = bytes as f64;
    if bytes == 1 {
        "1 byte".to_string()
    } else if size < KB {
        format!("{} bytes", bytes)
    } else if size < MB {
        format!("{:.1} KB", size / KB)
    } else if size < GB {
        format!("{:.1} MB", size / MB)
    } else {
        format!("{:.1} GB", size / GB)
    }
}

/// Guesses a MIME type from the leading bytes of a file
pub fn sniff_content_type(bytes: &[u8]) -> &'static str {
    if bytes.starts_with(&[0xFF, 0xD8, 0xFF]) {
        "image/jpeg"
    } else if bytes.starts_with(&[0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A]) {
        "image/png"
    } else if bytes.starts_with(b"GIF87a") || bytes.starts_with(b"GIF89a") {
        "image/gif"
    } else if bytes.starts_with(b"%PDF-") {
        "application/pdf"
    } else if bytes.is_empty() {
        "application/x-empty"
    } else if std::str::from_utf8(bytes).is_ok() {
        "text/plain"
    } else {
        "application/octet-stream"
    }
}

/// File extension used when storing an upload of the given MIME type
pub fn extension_for(content_type: &str) -> &'static str {
    match content_type {
        "image/jpeg" => ".jpg",
        "image/png" => ".png",
        "image/gif" => ".gif",
        "application/pdf" => ".pdf",
        _ => "",
    }
}

/// Size and content-type limits for uploaded files
#[derive(Debug, Clone, PartialEq)]
pub struct FileValidator {
    max_size: Option<u64>,
    min_size: Option<u64>,
    content_types: Option<Vec<&'static str>>,
}

impl FileValidator {
    /// Sizes are given in megabytes
    pub fn new(max_size_mb: Option<u64>, min_size_mb: Option<u64>, content_types: Option<&[&'static str]>) -> Self {
        Self {
            max_size: max_size_mb.map(|mb| mb * 1024 * 1024),
            min_size: min_size_mb.map(|mb| mb * 1024 * 1024),
            content_types: content_types.map(|types| types.to_vec()),
        }
    }

    /// The validator applied to account photos and logos: at most 3 MB of JPEG or PNG
    pub fn images() -> Self {
        Self::new(Some(3), None, Some(&["image/jpeg", "image/png"]))
    }

    /// Checks `bytes` and returns the sniffed content type on success
    pub fn validate(&self, bytes: &[u8]) -> Result<&'static str, ValidationError> {
        let size = bytes.len() as u64;

        if let Some(max) = self.max_size {
            if size > max {
                return Err(error(
                    "max_size",
                    format!(
                        "File size must not be greater than {}. Your file size is {}.",
                        filesizeformat(max),
                        filesizeformat(size)
                    ),
                ));
            }
        }

        if let Some(min) = self.min_size {
            if size < min {
                return Err(error(
                    "min_size",
                    format!(
                        "File size must not be less than {}. Your file size is {}.",
                        filesizeformat(min),
                        filesizeformat(size)
                    ),
                ));
            }
        }

        let content_type = sniff_content_type(bytes);
        if let Some(allowed) = &self.content_types {
            if !allowed.contains(&content_type) {
                return Err(error(
                    "content_type",
                    format!("File of type {} are not supported.", content_type),
                ));
            }
        }

        Ok(content_type)
    }
}


#[cfg(test)]
mod prop_tests;
