use axum::{
    Json,
    extract::State,
    http::{HeaderMap, StatusCode},
};
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use std::sync::Arc;
use tracing::{debug, info, instrument};
use uuid::Uuid;

use crate::auth::{AuthUser, Credentials, MaybeUser, SESSION_COOKIE, extract_credentials, verify_password};
use crate::db::DbPool;
use crate::dto::{ChangePasswordRequest, LoginRequest, MeResponse, RegisterRequest, UserResponse};
use crate::errors::{ApiError, ValidationErrors};
use crate::extract::ValidatedJson;
use crate::models::User;
use crate::repo;

fn session_cookie(token: String) -> Cookie<'static> {
    Cookie::build((SESSION_COOKIE, token))
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax)
        .build()
}

/// Starts a session for `user` and attaches its cookie to `jar`
fn start_session(pool: &DbPool, jar: CookieJar, user: &User) -> Result<CookieJar, ApiError> {
    let session = repo::create_session(pool, &user.get_id()).map_err(ApiError::Database)?;
    Ok(jar.add(session_cookie(session.get_token())))
}

/// Handler for registering a new user
///
/// This function handles POST requests to `/register`. A username that is
/// already taken gets a random suffix instead of being rejected.
///
/// ### Arguments
///
/// * `pool` - The database connection pool
/// * `jar` - The request cookies, extended with the new session cookie
/// * `payload` - Email, username, password and its confirmation
///
/// ### Returns
///
/// 201 with the new user; the caller is logged in
#[instrument(skip(pool, jar, payload), fields(username = %payload.username))]
pub async fn register_handler(
    State(pool): State<Arc<DbPool>>,
    jar: CookieJar,
    ValidatedJson(payload): ValidatedJson<RegisterRequest>,
) -> Result<(StatusCode, CookieJar, Json<UserResponse>), ApiError> {
    let mut errors = ValidationErrors::new();
    if repo::email_exists(&pool, &payload.email).map_err(ApiError::Database)? {
        errors.add("email", "email_exists", "A user with this email already exists");
    }
    if payload.password != payload.confirmation {
        errors.add("password", "password_mismatch", "Passwords must match.");
        errors.add("confirmation", "password_mismatch", "Passwords must match.");
    }
    errors.into_result()?;

    let mut username = payload.username.clone();
    if repo::username_exists(&pool, &username).map_err(ApiError::Database)? {
        username = format!("{}_{}", username, Uuid::new_v4());
        debug!("Username taken, registering as {}", username);
    }

    let user = repo::create_user(&pool, &username, &payload.email, &payload.password).map_err(ApiError::Database)?;
    let jar = start_session(&pool, jar, &user)?;

    info!("Registered user {}", user.get_username());
    Ok((StatusCode::CREATED, jar, Json(UserResponse::from(&user))))
}

/// Handler for logging in
///
/// This function handles POST requests to `/login`. `emailUsername` holding
/// an `@` is looked up as an email first, falling back to the part before
/// the `@` as a username.
///
/// ### Returns
///
/// The logged in user, with the session cookie set
///
/// ### Errors
///
/// 400 with "Invalid Credentials" when the user is unknown or the password
/// is wrong
#[instrument(skip(pool, jar, payload), fields(login = %payload.email_username))]
pub async fn login_handler(
    State(pool): State<Arc<DbPool>>,
    jar: CookieJar,
    ValidatedJson(payload): ValidatedJson<LoginRequest>,
) -> Result<(CookieJar, Json<UserResponse>), ApiError> {
    let login = payload.email_username.as_str();

    let user = match login.split_once('@') {
        Some((local_part, _)) => match repo::get_user_by_email(&pool, login).map_err(ApiError::Database)? {
            Some(user) => Some(user),
            None => repo::get_user_by_username(&pool, local_part).map_err(ApiError::Database)?,
        },
        None => repo::get_user_by_username(&pool, login).map_err(ApiError::Database)?,
    };

    let user = match user {
        Some(user) if verify_password(&payload.password, user.get_password_hash()) => user,
        _ => {
            debug!("Invalid credentials");
            return Err(ValidationErrors::non_field("invalid_credentials", "Invalid Credentials").into());
        }
    };

    let jar = start_session(&pool, jar, &user)?;

    info!("User {} logged in", user.get_username());
    Ok((jar, Json(UserResponse::from(&user))))
}

/// Handler for logging out
///
/// This function handles POST requests to `/logout`. The session named by
/// the cookie or the `Session` authorization header is deleted; requests
/// without a session succeed as well.
#[instrument(skip(pool, jar, headers))]
pub async fn logout_handler(
    State(pool): State<Arc<DbPool>>,
    jar: CookieJar,
    headers: HeaderMap,
) -> Result<(StatusCode, CookieJar), ApiError> {
    if let Ok(Some(Credentials::Session(token))) = extract_credentials(&headers) {
        repo::delete_session(&pool, &token).map_err(ApiError::Database)?;
        debug!("Session ended");
    }

    let jar = jar.remove(Cookie::build(SESSION_COOKIE).path("/"));
    Ok((StatusCode::NO_CONTENT, jar))
}

/// Handler describing the caller
///
/// This function handles GET requests to `/me`; anonymous callers get
/// `authenticated: false`.
#[instrument(skip(user))]
pub async fn me_handler(MaybeUser(user): MaybeUser) -> Json<MeResponse> {
    Json(match user {
        Some(user) => MeResponse::from(&user),
        None => MeResponse::anonymous(),
    })
}

/// Handler for changing the caller's password
///
/// This function handles PATCH requests to `/change-password`. Checks run in
/// order: strength of both new fields, the current password, then whether
/// the new fields match.
///
/// ### Returns
///
/// 204 on success
#[instrument(skip(pool, user, payload), fields(username = %user.get_username()))]
pub async fn change_password_handler(
    State(pool): State<Arc<DbPool>>,
    AuthUser(user): AuthUser,
    ValidatedJson(payload): ValidatedJson<ChangePasswordRequest>,
) -> Result<StatusCode, ApiError> {
    if !verify_password(&payload.old_password, user.get_password_hash()) {
        return Err(ValidationErrors::non_field("wrong_password", "Wrong current password.").into());
    }
    if payload.new_password != payload.new_password_confirmation {
        return Err(ValidationErrors::non_field("password_mismatch", "Passwords don't match.").into());
    }

    repo::set_password(&pool, &user.get_id(), &payload.new_password).map_err(ApiError::Database)?;

    info!("Password changed");
    Ok(StatusCode::NO_CONTENT)
}
