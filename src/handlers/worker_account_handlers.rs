use anyhow::anyhow;
use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use axum_extra::extract::Query;
use std::sync::Arc;
use tracing::{debug, info, instrument};

use super::{discard_image, store_image, validate_into};
use crate::auth::AuthUser;
use crate::db::DbPool;
use crate::dto::{AccountQuery, FeedbackResponse, WorkerAccountInput, WorkerAccountResponse};
use crate::errors::{ApiError, ValidationErrors};
use crate::extract::FormPayload;
use crate::media::{MediaKind, MediaStorage};
use crate::models::{User, WorkerAccount};
use crate::repo;

/// Resolves the profession named in the input, recording an error if unknown
fn resolve_profession(pool: &DbPool, input: &WorkerAccountInput, errors: &mut ValidationErrors) -> Result<Option<i32>, ApiError> {
    let Some(name) = &input.profession else {
        return Ok(None);
    };

    match repo::get_profession_by_name(pool, name).map_err(ApiError::Database)? {
        Some(profession) => Ok(Some(profession.get_id())),
        None => {
            errors.add("profession", "does_not_exist", format!("Object with name={} does not exist.", name));
            Ok(None)
        }
    }
}

fn profile_response(pool: &DbPool, media: &MediaStorage, user_id: &str) -> Result<WorkerAccountResponse, ApiError> {
    let profile = repo::get_worker_profile_by_user_id(pool, user_id)
        .map_err(ApiError::Database)?
        .ok_or(ApiError::NotFound)?;
    Ok(WorkerAccountResponse::from_profile(profile, media))
}

/// Handler for listing worker accounts
///
/// This function handles GET requests to `/worker-account`.
///
/// ### Arguments
///
/// * `pool` - The database connection pool
/// * `media` - Media storage, used to build photo URLs
/// * `query` - Optional `profession` (repeatable) and `location` filters
///
/// ### Returns
///
/// The matching accounts as JSON
#[instrument(skip(pool, media))]
pub async fn list_worker_accounts_handler(
    State(pool): State<Arc<DbPool>>,
    State(media): State<Arc<MediaStorage>>,
    Query(query): Query<AccountQuery>,
) -> Result<Json<Vec<WorkerAccountResponse>>, ApiError> {
    let profiles = repo::list_worker_profiles(&pool, &query.profession, query.location.as_deref())
        .map_err(ApiError::Database)?;
    debug!("Returning {} worker accounts", profiles.len());

    Ok(Json(
        profiles
            .into_iter()
            .map(|profile| WorkerAccountResponse::from_profile(profile, &media))
            .collect(),
    ))
}

/// Handler for retrieving the worker account of a user
///
/// This function handles GET requests to `/worker-account/{username}`.
#[instrument(skip(pool, media))]
pub async fn get_worker_account_handler(
    State(pool): State<Arc<DbPool>>,
    State(media): State<Arc<MediaStorage>>,
    Path(username): Path<String>,
) -> Result<Json<WorkerAccountResponse>, ApiError> {
    let profile = repo::get_worker_profile(&pool, &username)
        .map_err(ApiError::Database)?
        .ok_or(ApiError::NotFound)?;

    Ok(Json(WorkerAccountResponse::from_profile(profile, &media)))
}

/// Handler for listing the feedback employers left for a worker
///
/// This function handles GET requests to `/worker-account/{username}/feedback`.
///
/// ### Returns
///
/// The feedback newest first, or 404 if the user has no worker account
#[instrument(skip(pool))]
pub async fn list_worker_feedback_handler(
    State(pool): State<Arc<DbPool>>,
    Path(username): Path<String>,
) -> Result<Json<Vec<FeedbackResponse>>, ApiError> {
    let profile = repo::get_worker_profile(&pool, &username)
        .map_err(ApiError::Database)?
        .ok_or(ApiError::NotFound)?;

    let feedback = repo::list_feedback_for_worker(&pool, &profile.account.get_user_id()).map_err(ApiError::Database)?;
    debug!("Found {} feedbacks for worker {}", feedback.len(), username);

    Ok(Json(feedback.iter().map(FeedbackResponse::from).collect()))
}

/// Handler for creating the caller's worker account
///
/// This function handles POST requests to `/worker-account`, with a JSON
/// body or a multipart form carrying an optional `photo` file.
///
/// ### Returns
///
/// 201 with the new account
///
/// ### Errors
///
/// 400 when the caller already has a worker account, a required field is
/// missing, or a field or the photo is invalid
#[instrument(skip(pool, media, user, payload), fields(username = %user.get_username()))]
pub async fn create_worker_account_handler(
    State(pool): State<Arc<DbPool>>,
    State(media): State<Arc<MediaStorage>>,
    AuthUser(user): AuthUser,
    mut payload: FormPayload,
) -> Result<(StatusCode, Json<WorkerAccountResponse>), ApiError> {
    let user_id = user.get_id();

    if repo::get_worker_account(&pool, &user_id).map_err(ApiError::Database)?.is_some() {
        return Err(ValidationErrors::non_field("account_exists", "Worker account already exists.").into());
    }

    let input: WorkerAccountInput = payload.parse()?;
    let mut errors = validate_into(&input, input.missing_required());
    let profession_id = resolve_profession(&pool, &input, &mut errors)?;
    errors.into_result()?;

    let photo = store_image(&media, &user_id, MediaKind::WorkerPhoto, "photo", payload.take_file("photo")).await?;

    let account = WorkerAccount::from_changes(user_id.clone(), input.into_changes(profession_id, photo.clone()))
        .ok_or_else(|| ApiError::Database(anyhow!("Incomplete worker account for user {}", user_id)))?;

    if let Err(e) = repo::create_worker_account(&pool, account) {
        discard_image(&media, photo).await;
        return Err(ApiError::Database(e));
    }

    info!("Created worker account");
    Ok((StatusCode::CREATED, Json(profile_response(&pool, &media, &user_id)?)))
}

/// Applies a PUT or PATCH body to the caller's worker account
async fn apply_worker_update(
    pool: &DbPool,
    media: &MediaStorage,
    user: &User,
    mut payload: FormPayload,
    partial: bool,
) -> Result<Json<WorkerAccountResponse>, ApiError> {
    let user_id = user.get_id();

    let existing = repo::get_worker_account(pool, &user_id)
        .map_err(ApiError::Database)?
        .ok_or(ApiError::NotFound)?;

    let input: WorkerAccountInput = payload.parse()?;
    let required = if partial {
        ValidationErrors::new()
    } else {
        input.missing_required()
    };
    let mut errors = validate_into(&input, required);
    let profession_id = resolve_profession(pool, &input, &mut errors)?;
    errors.into_result()?;

    let photo = store_image(media, &user_id, MediaKind::WorkerPhoto, "photo", payload.take_file("photo")).await?;
    let replaced_photo = photo.is_some();

    let changes = input.into_changes(profession_id, photo.clone());
    if let Err(e) = repo::update_worker_account(pool, &user_id, &changes) {
        discard_image(media, photo).await;
        return Err(ApiError::Database(e));
    }

    if replaced_photo {
        discard_image(media, existing.get_photo()).await;
    }

    Ok(Json(profile_response(pool, media, &user_id)?))
}

/// Handler for replacing the caller's worker account
///
/// This function handles PUT requests to `/worker-account`; every required
/// field must be present.
#[instrument(skip(pool, media, user, payload), fields(username = %user.get_username()))]
pub async fn update_worker_account_handler(
    State(pool): State<Arc<DbPool>>,
    State(media): State<Arc<MediaStorage>>,
    AuthUser(user): AuthUser,
    payload: FormPayload,
) -> Result<Json<WorkerAccountResponse>, ApiError> {
    let response = apply_worker_update(&pool, &media, &user, payload, false).await?;
    info!("Updated worker account");
    Ok(response)
}

/// Handler for partially updating the caller's worker account
///
/// This function handles PATCH requests to `/worker-account`.
#[instrument(skip(pool, media, user, payload), fields(username = %user.get_username()))]
pub async fn patch_worker_account_handler(
    State(pool): State<Arc<DbPool>>,
    State(media): State<Arc<MediaStorage>>,
    AuthUser(user): AuthUser,
    payload: FormPayload,
) -> Result<Json<WorkerAccountResponse>, ApiError> {
    let response = apply_worker_update(&pool, &media, &user, payload, true).await?;
    info!("Patched worker account");
    Ok(response)
}

/// Handler for deleting the caller's worker account
///
/// This function handles DELETE requests to `/worker-account`. The stored
/// photo is removed along with the account.
///
/// ### Returns
///
/// 204 on success, 404 if the caller has no worker account
#[instrument(skip(pool, media, user), fields(username = %user.get_username()))]
pub async fn delete_worker_account_handler(
    State(pool): State<Arc<DbPool>>,
    State(media): State<Arc<MediaStorage>>,
    AuthUser(user): AuthUser,
) -> Result<StatusCode, ApiError> {
    let deleted = repo::delete_worker_account(&pool, &user.get_id())
        .map_err(ApiError::Database)?
        .ok_or(ApiError::NotFound)?;

    discard_image(&media, deleted.get_photo()).await;

    info!("Deleted worker account");
    Ok(StatusCode::NO_CONTENT)
}
