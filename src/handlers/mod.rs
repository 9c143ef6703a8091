/// Web API Handlers
///
/// This module contains the handlers for the RESTful API endpoints.
/// Each handler is responsible for processing a specific type of HTTP request,
/// extracting the necessary data, calling the appropriate repository functions,
/// and returning a properly formatted response.

mod meta_handlers;
mod auth_handlers;
mod worker_account_handlers;
mod employer_account_handlers;
mod job_handlers;
mod contract_handlers;

// Re-export all handlers
pub use meta_handlers::*;
pub use auth_handlers::*;
pub use worker_account_handlers::*;
pub use employer_account_handlers::*;
pub use job_handlers::*;
pub use contract_handlers::*;

use tracing::debug;
use validator::Validate;

use crate::db::DbPool;
use crate::errors::{ApiError, ValidationErrors};
use crate::extract::UploadedFile;
use crate::media::{MediaKind, MediaStorage};
use crate::repo;
use crate::validators::FileValidator;

/// Runs field validation on `input`, adding its failures to `errors`
fn validate_into<T: Validate>(input: &T, mut errors: ValidationErrors) -> ValidationErrors {
    if let Err(e) = input.validate() {
        errors.extend(e.into());
    }
    errors
}

/// Resolves a username to the user id of a worker account
fn worker_id_for(pool: &DbPool, field: &str, username: &str) -> Result<String, ApiError> {
    let user = repo::get_user_by_username(pool, username).map_err(ApiError::Database)?;
    match user {
        Some(user) if user.get_has_worker_account() => Ok(user.get_id()),
        _ => Err(ValidationErrors::field(
            field,
            "does_not_exist",
            format!("Worker \"{}\" does not exist.", username),
        )
        .into()),
    }
}

/// Validates an uploaded image and writes it to media storage
///
/// ### Arguments
///
/// * `media` - Where the file is written
/// * `user_id` - The uploading user, used in the storage path
/// * `kind` - Which profile image this is
/// * `field` - The form field the file came from, used in error bodies
/// * `file` - The uploaded file, if the request carried one
///
/// ### Returns
///
/// The stored relative path, or None when no file was sent
async fn store_image(
    media: &MediaStorage,
    user_id: &str,
    kind: MediaKind,
    field: &str,
    file: Option<UploadedFile>,
) -> Result<Option<String>, ApiError> {
    let Some(file) = file else {
        return Ok(None);
    };

    let content_type = FileValidator::images().validate(&file.bytes).map_err(|e| {
        let detail = e.message.map(|m| m.to_string()).unwrap_or_default();
        ValidationErrors::field(field, &e.code, detail)
    })?;

    let path = media.save(user_id, kind, content_type, &file.bytes).await?;
    debug!("Stored {} upload for user {}", field, user_id);
    Ok(Some(path))
}

/// Removes a previously stored image, logging rather than failing on errors
async fn discard_image(media: &MediaStorage, path: Option<String>) {
    if let Some(path) = path {
        if let Err(e) = media.delete(&path).await {
            tracing::warn!(error = %e, "Failed to remove media file {}", path);
        }
    }
}
