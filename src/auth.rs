//! Password hashing and request authentication
//!
//! Requests authenticate with HTTP Basic credentials, a `sessionid` cookie,
//! or an `Authorization: Session <token>` header. Stored password hashes have
//! the form `hex(salt):hex(sha256(password || salt))`.

use std::sync::Arc;

use axum::extract::{FromRef, FromRequestParts};
use axum::http::HeaderMap;
use axum::http::header::AUTHORIZATION;
use axum::http::request::Parts;
use axum_extra::extract::cookie::CookieJar;
use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use rand::Rng;
use sha2::{Digest, Sha256};
use tracing::debug;

use crate::db::DbPool;
use crate::errors::ApiError;
use crate::models::User;
use crate::repo;

/// Name of the cookie carrying the session token
pub const SESSION_COOKIE: &str = "sessionid";

const SALT_LEN: usize = 16;

/// Hashes `password` with a fresh random salt
pub fn hash_password(password: &str) -> String {
    let mut salt = [0u8; SALT_LEN];
    rand::rng().fill(&mut salt);
    hash_with_salt(password, &salt)
}

fn hash_with_salt(password: &str, salt: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(password.as_bytes());
    hasher.update(salt);
    format!("{}:{}", hex::encode(salt), hex::encode(hasher.finalize()))
}

/// Checks `candidate` against a stored hash using constant-time comparison
pub fn verify_password(candidate: &str, stored_hash: &str) -> bool {
    let Some((salt_hex, hash_hex)) = stored_hash.split_once(':') else {
        return false;
    };
    let (Ok(salt), Ok(hash)) = (hex::decode(salt_hex), hex::decode(hash_hex)) else {
        return false;
    };

    let mut hasher = Sha256::new();
    hasher.update(candidate.as_bytes());
    hasher.update(&salt);
    let candidate_hash = hasher.finalize();

    if hash.len() != candidate_hash.len() {
        return false;
    }

    let mut result = 0u8;
    for (a, b) in hash.iter().zip(candidate_hash.iter()) {
        result |= a ^ b;
    }
    result == 0
}

/// Credentials found on a request
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Credentials {
    Basic { username: String, password: String },
    Session(String),
}

/// Decodes the payload of a `Basic` authorization header
pub fn decode_basic(encoded: &str) -> Option<(String, String)> {
    let bytes = STANDARD.decode(encoded.trim()).ok()?;
    let text = String::from_utf8(bytes).ok()?;
    let (username, password) = text.split_once(':')?;
    Some((username.to_string(), password.to_string()))
}

/// An `Authorization` header that could not be decoded
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MalformedCredentials;

/// Pulls credentials out of the request headers
///
/// The `Authorization` header wins over the session cookie.
pub fn extract_credentials(headers: &HeaderMap) -> Result<Option<Credentials>, MalformedCredentials> {
    if let Some(value) = headers.get(AUTHORIZATION) {
        let value = value.to_str().map_err(|_| MalformedCredentials)?;
        if let Some(encoded) = value.strip_prefix("Basic ") {
            let (username, password) = decode_basic(encoded).ok_or(MalformedCredentials)?;
            return Ok(Some(Credentials::Basic { username, password }));
        }
        if let Some(token) = value.strip_prefix("Session ") {
            return Ok(Some(Credentials::Session(token.trim().to_string())));
        }
    }

    let jar = CookieJar::from_headers(headers);
    Ok(jar
        .get(SESSION_COOKIE)
        .map(|cookie| Credentials::Session(cookie.value().to_string())))
}

/// Resolves request credentials to a user
///
/// Wrong Basic credentials are an error; an unknown or expired session
/// token simply means "anonymous".
fn resolve_user(pool: &DbPool, parts: &Parts) -> Result<Option<User>, ApiError> {
    let credentials = extract_credentials(&parts.headers).map_err(|_| ApiError::Unauthorized)?;

    match credentials {
        None => Ok(None),
        Some(Credentials::Basic { username, password }) => {
            let user = repo::get_user_by_username(pool, &username)?;
            match user {
                Some(user) if verify_password(&password, user.get_password_hash()) => Ok(Some(user)),
                _ => {
                    debug!("Rejected basic credentials for {}", username);
                    Err(ApiError::Unauthorized)
                }
            }
        }
        Some(Credentials::Session(token)) => Ok(repo::get_session_user(pool, &token)?),
    }
}

/// The authenticated caller; rejects anonymous requests with 401
#[derive(Debug, Clone)]
pub struct AuthUser(pub User);

impl<S> FromRequestParts<S> for AuthUser
where
    Arc<DbPool>: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let pool = Arc::<DbPool>::from_ref(state);
        resolve_user(&pool, parts)?
            .map(AuthUser)
            .ok_or(ApiError::Unauthorized)
    }
}

/// The caller if authenticated, `None` for anonymous requests
#[derive(Debug, Clone)]
pub struct MaybeUser(pub Option<User>);

impl<S> FromRequestParts<S> for MaybeUser
where
    Arc<DbPool>: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let pool = Arc::<DbPool>::from_ref(state);
        Ok(MaybeUser(resolve_user(&pool, parts)?))
    }
}
