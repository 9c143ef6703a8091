use crate::auth::hash_password;
use crate::db::DbPool;
use crate::models::{Session, User};
use crate::schema::{sessions, users};
use anyhow::{Result, anyhow};
use chrono::Utc;
use diesel::prelude::*;
use tracing::{debug, info, instrument};

/// Creates a new user with a hashed password
///
/// ### Arguments
///
/// * `pool` - A reference to the database connection pool
/// * `username` - The login name, must be unused
/// * `email` - The email address, must be unused
/// * `password` - The plain text password
///
/// ### Returns
///
/// A Result containing the newly created User if successful
///
/// ### Errors
///
/// Returns an error if:
/// - Unable to get a connection from the pool
/// - The username or email is already taken (unique constraint)
#[instrument(skip(pool, password))]
pub fn create_user(pool: &DbPool, username: &str, email: &str, password: &str) -> Result<User> {
    let conn = &mut pool.get()?;

    let user = User::new(username.to_string(), email.to_string(), hash_password(password));

    diesel::insert_into(users::table)
        .values(&user)
        .execute(conn)?;

    info!("Created user {}", user.get_username());
    Ok(user)
}

/// Creates a staff user, used for administration tasks and tests
#[instrument(skip(pool, password))]
pub fn create_staff_user(pool: &DbPool, username: &str, email: &str, password: &str) -> Result<User> {
    let conn = &mut pool.get()?;

    let user = User::new(username.to_string(), email.to_string(), hash_password(password)).with_staff(true);

    diesel::insert_into(users::table)
        .values(&user)
        .execute(conn)?;

    Ok(user)
}

/// Retrieves a user by id
pub fn get_user(pool: &DbPool, user_id: &str) -> Result<Option<User>> {
    let conn = &mut pool.get()?;

    let user = users::table
        .filter(users::id.eq(user_id))
        .select(User::as_select())
        .first(conn)
        .optional()?;

    Ok(user)
}

/// Retrieves a user by username
///
/// ### Returns
///
/// A Result containing an Option with the User if found, or None if not found
pub fn get_user_by_username(pool: &DbPool, username: &str) -> Result<Option<User>> {
    let conn = &mut pool.get()?;

    let user = users::table
        .filter(users::username.eq(username))
        .select(User::as_select())
        .first(conn)
        .optional()?;

    Ok(user)
}

/// Retrieves a user by email address
pub fn get_user_by_email(pool: &DbPool, email: &str) -> Result<Option<User>> {
    let conn = &mut pool.get()?;

    let user = users::table
        .filter(users::email.eq(email))
        .select(User::as_select())
        .first(conn)
        .optional()?;

    Ok(user)
}

/// Returns true if some user already registered `email`
pub fn email_exists(pool: &DbPool, email: &str) -> Result<bool> {
    Ok(get_user_by_email(pool, email)?.is_some())
}

/// Returns true if `username` is taken
pub fn username_exists(pool: &DbPool, username: &str) -> Result<bool> {
    Ok(get_user_by_username(pool, username)?.is_some())
}

/// Replaces a user's password
///
/// ### Errors
///
/// Returns an error if the user does not exist or the update fails
#[instrument(skip(pool, password))]
pub fn set_password(pool: &DbPool, user_id: &str, password: &str) -> Result<()> {
    let conn = &mut pool.get()?;

    let updated = diesel::update(users::table.filter(users::id.eq(user_id)))
        .set(users::password_hash.eq(hash_password(password)))
        .execute(conn)?;

    if updated == 0 {
        return Err(anyhow!("User with id {} not found", user_id));
    }

    debug!("Password updated");
    Ok(())
}

/// Starts a new session for a user
///
/// ### Returns
///
/// The stored session, whose token is handed to the client
#[instrument(skip(pool))]
pub fn create_session(pool: &DbPool, user_id: &str) -> Result<Session> {
    let conn = &mut pool.get()?;

    let session = Session::new(user_id.to_string());

    diesel::insert_into(sessions::table)
        .values(&session)
        .execute(conn)?;

    debug!("Created session for user {}", user_id);
    Ok(session)
}

/// Looks up the user behind a session token
///
/// Expired sessions are removed and treated as unknown.
///
/// ### Returns
///
/// A Result containing the User if the token belongs to a live session
pub fn get_session_user(pool: &DbPool, token: &str) -> Result<Option<User>> {
    let conn = &mut pool.get()?;

    let found = sessions::table
        .inner_join(users::table)
        .filter(sessions::token.eq(token))
        .select((Session::as_select(), User::as_select()))
        .first::<(Session, User)>(conn)
        .optional()?;

    match found {
        Some((session, _)) if session.is_expired_at(Utc::now()) => {
            debug!("Session expired, removing it");
            diesel::delete(sessions::table.filter(sessions::token.eq(token))).execute(conn)?;
            Ok(None)
        }
        Some((_, user)) => Ok(Some(user)),
        None => Ok(None),
    }
}

/// Ends a session; unknown tokens are ignored
pub fn delete_session(pool: &DbPool, token: &str) -> Result<()> {
    let conn = &mut pool.get()?;

    diesel::delete(sessions::table.filter(sessions::token.eq(token))).execute(conn)?;

    Ok(())
}

/// Ends every session of a user, e.g. after a password change
pub fn delete_user_sessions(pool: &DbPool, user_id: &str) -> Result<usize> {
    let conn = &mut pool.get()?;

    let deleted = diesel::delete(sessions::table.filter(sessions::user_id.eq(user_id))).execute(conn)?;

    Ok(deleted)
}
