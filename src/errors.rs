use axum::{
    response::{IntoResponse, Response},
    http::StatusCode,
    Json
};
use serde_json::{json, Map, Value};
use thiserror::Error;

use crate::case::snake_to_camel;

/// Key used for errors that do not belong to a single field
pub const NON_FIELD_ERRORS_KEY: &str = "errors";

/// A single validation failure
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldError {
    /// The snake_case field name, or `None` for non-field errors
    pub field: Option<String>,
    /// Machine-readable error code, e.g. `required` or `invalid_job_type`
    pub code: String,
    /// Human readable message
    pub detail: String,
}

/// An ordered collection of validation failures
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationErrors {
    errors: Vec<FieldError>,
}

impl ValidationErrors {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a collection holding one field error
    pub fn field(field: &str, code: &str, detail: impl Into<String>) -> Self {
        let mut errors = Self::new();
        errors.add(field, code, detail);
        errors
    }

    /// Builds a collection holding one non-field error
    pub fn non_field(code: &str, detail: impl Into<String>) -> Self {
        let mut errors = Self::new();
        errors.add_non_field(code, detail);
        errors
    }

    pub fn add(&mut self, field: &str, code: &str, detail: impl Into<String>) {
        self.errors.push(FieldError {
            field: Some(field.to_string()),
            code: code.to_string(),
            detail: detail.into(),
        });
    }

    pub fn add_non_field(&mut self, code: &str, detail: impl Into<String>) {
        self.errors.push(FieldError {
            field: None,
            code: code.to_string(),
            detail: detail.into(),
        });
    }

    /// Records a "This field is required." error for `field`
    pub fn add_required(&mut self, field: &str) {
        self.add(field, "required", "This field is required.");
    }

    pub fn extend(&mut self, other: ValidationErrors) {
        self.errors.extend(other.errors);
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn len(&self) -> usize {
        self.errors.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &FieldError> {
        self.errors.iter()
    }

    /// Converts into `Ok(())` when empty, otherwise into an `ApiError::Validation`
    pub fn into_result(self) -> Result<(), ApiError> {
        if self.is_empty() {
            Ok(())
        } else {
            Err(ApiError::Validation(self))
        }
    }

    /// Renders the errors as a JSON object keyed by camelCase field name
    ///
    /// Each value is `{type, code, detail}`; when a field has several errors
    /// the last one wins.
    pub fn to_json(&self) -> Value {
        let mut body = Map::new();
        for error in &self.errors {
            let key = error
                .field
                .as_deref()
                .map(snake_to_camel)
                .unwrap_or_else(|| NON_FIELD_ERRORS_KEY.to_string());
            body.insert(key, error_entry("validation_error", &error.code, &error.detail));
        }
        Value::Object(body)
    }
}

impl std::fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let parts: Vec<String> = self
            .errors
            .iter()
            .map(|e| match &e.field {
                Some(field) => format!("{}: {}", field, e.detail),
                None => e.detail.clone(),
            })
            .collect();
        write!(f, "{}", parts.join("; "))
    }
}

impl From<validator::ValidationErrors> for ValidationErrors {
    fn from(source: validator::ValidationErrors) -> Self {
        let mut fields: Vec<(String, Vec<validator::ValidationError>)> = source
            .field_errors()
            .into_iter()
            .map(|(field, errs)| (field.to_string(), errs.clone()))
            .collect();
        fields.sort_by(|a, b| a.0.cmp(&b.0));

        let mut errors = ValidationErrors::new();
        for (field, errs) in fields {
            for err in errs {
                let detail = err
                    .message
                    .as_ref()
                    .map(|m| m.to_string())
                    .unwrap_or_else(|| default_detail(&err));
                errors.add(&field, &err.code, detail);
            }
        }
        errors
    }
}

/// Message for validator errors raised without an explicit message
fn default_detail(err: &validator::ValidationError) -> String {
    let param = |name: &str| err.params.get(name).map(|v| v.to_string());
    match err.code.as_ref() {
        "length" => match (param("min"), param("max")) {
            (Some(min), Some(max)) => format!("Ensure this field has between {} and {} characters.", min, max),
            (None, Some(max)) => format!("Ensure this field has no more than {} characters.", max),
            (Some(min), None) => format!("Ensure this field has at least {} characters.", min),
            (None, None) => "Invalid length.".to_string(),
        },
        "range" => match (param("min"), param("max")) {
            (Some(min), Some(max)) => format!("Ensure this value is between {} and {}.", min, max),
            (None, Some(max)) => format!("Ensure this value is less than or equal to {}.", max),
            (Some(min), None) => format!("Ensure this value is greater than or equal to {}.", min),
            (None, None) => "Value out of range.".to_string(),
        },
        "url" => "Enter a valid URL.".to_string(),
        "email" => "Enter a valid email address.".to_string(),
        _ => "Invalid value.".to_string(),
    }
}

fn error_entry(error_type: &str, code: &str, detail: &str) -> Value {
    json!({
        "type": error_type,
        "code": code,
        "detail": detail,
    })
}

#[derive(Error, Debug)]
pub enum ApiError {
    #[error("Database error: {0}")]
    Database(#[from] anyhow::Error),
    #[error("Not found")]
    NotFound,
    #[error("Validation failed: {0}")]
    Validation(ValidationErrors),
    #[error("Authentication credentials were not provided")]
    Unauthorized,
    #[error("Permission denied: {0}")]
    Forbidden(String),
}

impl From<ValidationErrors> for ApiError {
    fn from(errors: ValidationErrors) -> Self {
        ApiError::Validation(errors)
    }
}

impl From<validator::ValidationErrors> for ApiError {
    fn from(errors: validator::ValidationErrors) -> Self {
        ApiError::Validation(errors.into())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, body) = match self {
            ApiError::Database(err) => {
                tracing::error!(error = %err, "Internal server error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    json!({ "error": error_entry("server_error", "error", "Internal server error") }),
                )
            }
            ApiError::NotFound => (
                StatusCode::NOT_FOUND,
                json!({ "error": error_entry("client_error", "not_found", "Not found.") }),
            ),
            ApiError::Validation(errors) => (StatusCode::BAD_REQUEST, errors.to_json()),
            ApiError::Unauthorized => (
                StatusCode::UNAUTHORIZED,
                json!({ "error": error_entry(
                    "client_error",
                    "not_authenticated",
                    "Authentication credentials were not provided.",
                ) }),
            ),
            ApiError::Forbidden(msg) => (
                StatusCode::FORBIDDEN,
                json!({ "error": error_entry("client_error", "permission_denied", &msg) }),
            ),
        };

        (status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests;
