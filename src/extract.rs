//! Request body extraction for endpoints that accept JSON or multipart forms

use std::collections::HashMap;

use axum::body::Bytes;
use axum::extract::{FromRequest, Multipart, Request};
use axum::http::header::CONTENT_TYPE;
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};
use tracing::debug;
use validator::Validate;

use crate::errors::{ApiError, ValidationErrors};

/// A file part of a multipart request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadedFile {
    pub file_name: Option<String>,
    pub bytes: Bytes,
}

/// A request body read either as a JSON object or as `multipart/form-data`
///
/// Text parts of a form become string values in `fields`; file parts are
/// collected in `files` under their field name.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FormPayload {
    pub fields: Map<String, Value>,
    pub files: HashMap<String, UploadedFile>,
}

fn parse_error(detail: impl Into<String>) -> ApiError {
    ApiError::Validation(ValidationErrors::non_field("parse_error", detail))
}

/// Maps a deserialization failure to an error body
///
/// A missing field is reported against that field, anything else as a
/// non-field parse error.
fn deserialize_error(err: serde_json::Error) -> ApiError {
    let message = err.to_string();
    let missing = message
        .strip_prefix("missing field `")
        .and_then(|rest| rest.split_once('`'))
        .map(|(field, _)| field.to_string());

    match missing {
        Some(field) => {
            let mut errors = ValidationErrors::new();
            errors.add_required(&field);
            ApiError::Validation(errors)
        }
        None => parse_error(message),
    }
}

impl FormPayload {
    /// Parses a JSON body, which must be an object
    pub fn from_json(body: &[u8]) -> Result<Self, ApiError> {
        let value: Value = serde_json::from_slice(body)
            .map_err(|e| parse_error(format!("JSON parse error - {}", e)))?;
        match value {
            Value::Object(fields) => Ok(Self {
                fields,
                files: HashMap::new(),
            }),
            _ => Err(parse_error("Invalid data. Expected a dictionary.")),
        }
    }

    /// Deserializes the text fields into `T`
    pub fn parse<T: DeserializeOwned>(&self) -> Result<T, ApiError> {
        serde_json::from_value(Value::Object(self.fields.clone())).map_err(deserialize_error)
    }

    /// Takes the uploaded file for `field`, if any
    pub fn take_file(&mut self, field: &str) -> Option<UploadedFile> {
        self.files.remove(field)
    }

    async fn from_multipart(mut multipart: Multipart) -> Result<Self, ApiError> {
        let mut payload = FormPayload::default();

        while let Some(field) = multipart
            .next_field()
            .await
            .map_err(|e| parse_error(format!("Multipart form parse error - {}", e)))?
        {
            let Some(name) = field.name().map(str::to_string) else {
                continue;
            };

            if field.file_name().is_some() {
                let file_name = field.file_name().map(str::to_string);
                let bytes = field
                    .bytes()
                    .await
                    .map_err(|e| parse_error(format!("Multipart form parse error - {}", e)))?;
                // Browsers send an empty part for untouched file inputs
                if bytes.is_empty() && file_name.as_deref().unwrap_or("").is_empty() {
                    continue;
                }
                payload.files.insert(name, UploadedFile { file_name, bytes });
            } else {
                let text = field
                    .text()
                    .await
                    .map_err(|e| parse_error(format!("Multipart form parse error - {}", e)))?;
                payload.fields.insert(name, Value::String(text));
            }
        }

        debug!(
            "Parsed multipart form with {} fields and {} files",
            payload.fields.len(),
            payload.files.len()
        );
        Ok(payload)
    }
}

impl<S> FromRequest<S> for FormPayload
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let is_multipart = req
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .is_some_and(|v| v.starts_with("multipart/form-data"));

        if is_multipart {
            let multipart = Multipart::from_request(req, state)
                .await
                .map_err(|e| parse_error(e.body_text()))?;
            return Self::from_multipart(multipart).await;
        }

        let body = Bytes::from_request(req, state)
            .await
            .map_err(|e| parse_error(e.body_text()))?;
        Self::from_json(&body)
    }
}

/// A JSON object body deserialized into `T` and validated
///
/// Parse failures and validation failures both come back as 400 responses
/// in the usual error body shape.
#[derive(Debug, Clone)]
pub struct ValidatedJson<T>(pub T);

impl<T, S> FromRequest<S> for ValidatedJson<T>
where
    T: DeserializeOwned + Validate,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let body = Bytes::from_request(req, state)
            .await
            .map_err(|e| parse_error(e.body_text()))?;
        let value: T = FormPayload::from_json(&body)?.parse()?;
        value.validate()?;
        Ok(ValidatedJson(value))
    }
}
