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
use crate::dto::{AccountQuery, EmployerAccountInput, EmployerAccountResponse, FeedbackResponse};
use crate::errors::{ApiError, ValidationErrors};
use crate::extract::FormPayload;
use crate::media::{MediaKind, MediaStorage};
use crate::models::{EmployerAccount, User};
use crate::repo;

/// Images that may accompany an employer account body
struct EmployerImages {
    logo: Option<String>,
    personal_photo: Option<String>,
}

impl EmployerImages {
    async fn store(media: &MediaStorage, user_id: &str, payload: &mut FormPayload) -> Result<Self, ApiError> {
        let logo = store_image(media, user_id, MediaKind::EmployerLogo, "logo", payload.take_file("logo")).await?;
        let personal_photo = match store_image(
            media,
            user_id,
            MediaKind::EmployerPhoto,
            "personal_photo",
            payload.take_file("personalPhoto"),
        )
        .await
        {
            Ok(path) => path,
            Err(e) => {
                discard_image(media, logo).await;
                return Err(e);
            }
        };
        Ok(Self { logo, personal_photo })
    }

    async fn discard(self, media: &MediaStorage) {
        discard_image(media, self.logo).await;
        discard_image(media, self.personal_photo).await;
    }
}

/// Handler for listing employer accounts
///
/// This function handles GET requests to `/employer-account`. Only the
/// `location` filter applies to employers.
#[instrument(skip(pool, media))]
pub async fn list_employer_accounts_handler(
    State(pool): State<Arc<DbPool>>,
    State(media): State<Arc<MediaStorage>>,
    Query(query): Query<AccountQuery>,
) -> Result<Json<Vec<EmployerAccountResponse>>, ApiError> {
    let accounts = repo::list_employer_accounts(&pool, query.location.as_deref()).map_err(ApiError::Database)?;
    debug!("Returning {} employer accounts", accounts.len());

    Ok(Json(
        accounts
            .into_iter()
            .map(|(username, account)| EmployerAccountResponse::from_account(username, &account, &media))
            .collect(),
    ))
}

/// Handler for retrieving the employer account of a user
///
/// This function handles GET requests to `/employer-account/{username}`.
///
/// ### Returns
///
/// The account as JSON, or 404 if the user has none
#[instrument(skip(pool, media))]
pub async fn get_employer_account_handler(
    State(pool): State<Arc<DbPool>>,
    State(media): State<Arc<MediaStorage>>,
    Path(username): Path<String>,
) -> Result<Json<EmployerAccountResponse>, ApiError> {
    let (username, account) = repo::get_employer_account_by_username(&pool, &username)
        .map_err(ApiError::Database)?
        .ok_or(ApiError::NotFound)?;

    Ok(Json(EmployerAccountResponse::from_account(username, &account, &media)))
}

/// Handler for listing the feedback workers left for an employer
///
/// This function handles GET requests to `/employer-account/{username}/feedback`.
#[instrument(skip(pool))]
pub async fn list_employer_feedback_handler(
    State(pool): State<Arc<DbPool>>,
    Path(username): Path<String>,
) -> Result<Json<Vec<FeedbackResponse>>, ApiError> {
    let (_, account) = repo::get_employer_account_by_username(&pool, &username)
        .map_err(ApiError::Database)?
        .ok_or(ApiError::NotFound)?;

    let feedback = repo::list_feedback_for_employer(&pool, &account.get_user_id()).map_err(ApiError::Database)?;
    debug!("Found {} feedbacks for employer {}", feedback.len(), username);

    Ok(Json(feedback.iter().map(FeedbackResponse::from).collect()))
}

/// Handler for creating the caller's employer account
///
/// This function handles POST requests to `/employer-account`, with a JSON
/// body or a multipart form carrying optional `logo` and `personalPhoto`
/// files.
///
/// ### Returns
///
/// 201 with the new account
#[instrument(skip(pool, media, user, payload), fields(username = %user.get_username()))]
pub async fn create_employer_account_handler(
    State(pool): State<Arc<DbPool>>,
    State(media): State<Arc<MediaStorage>>,
    AuthUser(user): AuthUser,
    mut payload: FormPayload,
) -> Result<(StatusCode, Json<EmployerAccountResponse>), ApiError> {
    let user_id = user.get_id();

    if repo::get_employer_account(&pool, &user_id).map_err(ApiError::Database)?.is_some() {
        return Err(ValidationErrors::non_field("account_exists", "Employer account already exists.").into());
    }

    let input: EmployerAccountInput = payload.parse()?;
    validate_into(&input, input.missing_required()).into_result()?;

    let images = EmployerImages::store(&media, &user_id, &mut payload).await?;
    let changes = input.into_changes(images.logo.clone(), images.personal_photo.clone());

    let Some(account) = EmployerAccount::from_changes(user_id.clone(), changes) else {
        images.discard(&media).await;
        return Err(ApiError::Database(anyhow!("Incomplete employer account for user {}", user_id)));
    };

    let account = match repo::create_employer_account(&pool, account) {
        Ok(account) => account,
        Err(e) => {
            images.discard(&media).await;
            return Err(ApiError::Database(e));
        }
    };

    info!("Created employer account");
    Ok((
        StatusCode::CREATED,
        Json(EmployerAccountResponse::from_account(user.get_username(), &account, &media)),
    ))
}

/// Applies a PUT or PATCH body to the caller's employer account
///
/// Replaced images are removed from storage once the update is stored.
async fn apply_employer_update(
    pool: &DbPool,
    media: &MediaStorage,
    user: &User,
    mut payload: FormPayload,
    partial: bool,
) -> Result<Json<EmployerAccountResponse>, ApiError> {
    let user_id = user.get_id();

    let existing = repo::get_employer_account(pool, &user_id)
        .map_err(ApiError::Database)?
        .ok_or(ApiError::NotFound)?;

    let input: EmployerAccountInput = payload.parse()?;
    let required = if partial {
        ValidationErrors::new()
    } else {
        input.missing_required()
    };
    validate_into(&input, required).into_result()?;

    let images = EmployerImages::store(media, &user_id, &mut payload).await?;
    let replaced_logo = images.logo.is_some();
    let replaced_photo = images.personal_photo.is_some();

    let changes = input.into_changes(images.logo.clone(), images.personal_photo.clone());
    let account = match repo::update_employer_account(pool, &user_id, &changes) {
        Ok(account) => account,
        Err(e) => {
            images.discard(media).await;
            return Err(ApiError::Database(e));
        }
    };

    if replaced_logo {
        discard_image(media, existing.get_logo()).await;
    }
    if replaced_photo {
        discard_image(media, existing.get_personal_photo()).await;
    }

    Ok(Json(EmployerAccountResponse::from_account(user.get_username(), &account, media)))
}

/// Handler for replacing the caller's employer account
///
/// This function handles PUT requests to `/employer-account`.
#[instrument(skip(pool, media, user, payload), fields(username = %user.get_username()))]
pub async fn update_employer_account_handler(
    State(pool): State<Arc<DbPool>>,
    State(media): State<Arc<MediaStorage>>,
    AuthUser(user): AuthUser,
    payload: FormPayload,
) -> Result<Json<EmployerAccountResponse>, ApiError> {
    let response = apply_employer_update(&pool, &media, &user, payload, false).await?;
    info!("Updated employer account");
    Ok(response)
}

/// Handler for partially updating the caller's employer account
///
/// This function handles PATCH requests to `/employer-account`.
#[instrument(skip(pool, media, user, payload), fields(username = %user.get_username()))]
pub async fn patch_employer_account_handler(
    State(pool): State<Arc<DbPool>>,
    State(media): State<Arc<MediaStorage>>,
    AuthUser(user): AuthUser,
    payload: FormPayload,
) -> Result<Json<EmployerAccountResponse>, ApiError> {
    let response = apply_employer_update(&pool, &media, &user, payload, true).await?;
    info!("Patched employer account");
    Ok(response)
}

/// Handler for deleting the caller's employer account
///
/// This function handles DELETE requests to `/employer-account`. The logo
/// and personal photo are removed from storage.
#[instrument(skip(pool, media, user), fields(username = %user.get_username()))]
pub async fn delete_employer_account_handler(
    State(pool): State<Arc<DbPool>>,
    State(media): State<Arc<MediaStorage>>,
    AuthUser(user): AuthUser,
) -> Result<StatusCode, ApiError> {
    let deleted = repo::delete_employer_account(&pool, &user.get_id())
        .map_err(ApiError::Database)?
        .ok_or(ApiError::NotFound)?;

    discard_image(&media, deleted.get_logo()).await;
    discard_image(&media, deleted.get_personal_photo()).await;

    info!("Deleted employer account");
    Ok(StatusCode::NO_CONTENT)
}
