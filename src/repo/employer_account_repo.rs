use super::contains_pattern;
use crate::db::DbPool;
use crate::models::{EmployerAccount, EmployerAccountChanges};
use crate::schema::{employer_accounts, users};
use anyhow::{Result, anyhow};
use diesel::prelude::*;
use tracing::{debug, info, instrument};

/// Creates the employer account of a user and sets `has_employer_account`
///
/// ### Arguments
///
/// * `pool` - A reference to the database connection pool
/// * `account` - The account to store, keyed by its user id
///
/// ### Returns
///
/// A Result containing the stored account
///
/// ### Errors
///
/// Returns an error if the user already has an employer account or the
/// insert fails
#[instrument(skip(pool, account), fields(user_id = %account.get_user_id()))]
pub fn create_employer_account(pool: &DbPool, account: EmployerAccount) -> Result<EmployerAccount> {
    let conn = &mut pool.get()?;

    conn.transaction(|conn| {
        diesel::insert_into(employer_accounts::table)
            .values(&account)
            .execute(conn)?;

        diesel::update(users::table.filter(users::id.eq(account.get_user_id())))
            .set(users::has_employer_account.eq(true))
            .execute(conn)?;

        Ok::<_, diesel::result::Error>(())
    })?;

    info!("Created employer account");
    Ok(account)
}

/// Retrieves the employer account of a user, if any
pub fn get_employer_account(pool: &DbPool, user_id: &str) -> Result<Option<EmployerAccount>> {
    let conn = &mut pool.get()?;

    let account = employer_accounts::table
        .filter(employer_accounts::user_id.eq(user_id))
        .select(EmployerAccount::as_select())
        .first(conn)
        .optional()?;

    Ok(account)
}

/// Retrieves an employer account by the owner's username
///
/// ### Returns
///
/// A Result containing the owner's username and the account, or None
pub fn get_employer_account_by_username(pool: &DbPool, username: &str) -> Result<Option<(String, EmployerAccount)>> {
    let conn = &mut pool.get()?;

    let row = employer_accounts::table
        .inner_join(users::table)
        .filter(users::username.eq(username))
        .select((users::username, EmployerAccount::as_select()))
        .first(conn)
        .optional()?;

    Ok(row)
}

/// Lists employer accounts with their owners' usernames
///
/// ### Arguments
///
/// * `pool` - A reference to the database connection pool
/// * `location` - Only accounts whose location contains this text
#[instrument(skip(pool))]
pub fn list_employer_accounts(pool: &DbPool, location: Option<&str>) -> Result<Vec<(String, EmployerAccount)>> {
    let conn = &mut pool.get()?;

    let mut query = employer_accounts::table
        .inner_join(users::table)
        .select((users::username, EmployerAccount::as_select()))
        .into_boxed();

    if let Some(location) = location {
        query = query.filter(employer_accounts::location.like(contains_pattern(location)).escape('\\'));
    }

    let rows = query.order_by(users::username.asc()).load(conn)?;
    debug!("Found {} employer accounts", rows.len());

    Ok(rows)
}

/// Applies changes to a user's employer account
///
/// ### Errors
///
/// Returns an error if the user has no employer account or the update fails
#[instrument(skip(pool, changes))]
pub fn update_employer_account(pool: &DbPool, user_id: &str, changes: &EmployerAccountChanges) -> Result<EmployerAccount> {
    let conn = &mut pool.get()?;

    let account = diesel::update(employer_accounts::table.filter(employer_accounts::user_id.eq(user_id)))
        .set(changes)
        .returning(EmployerAccount::as_returning())
        .get_result(conn)
        .optional()?
        .ok_or_else(|| anyhow!("Employer account for user {} not found", user_id))?;

    debug!("Updated employer account");
    Ok(account)
}

/// Deletes a user's employer account and clears `has_employer_account`
///
/// Jobs and contracts signed by the account stay, with their employer set
/// to null.
///
/// ### Returns
///
/// A Result containing the deleted account, or None if there was none
#[instrument(skip(pool))]
pub fn delete_employer_account(pool: &DbPool, user_id: &str) -> Result<Option<EmployerAccount>> {
    let conn = &mut pool.get()?;

    let deleted = conn.transaction(|conn| {
        let deleted = diesel::delete(employer_accounts::table.filter(employer_accounts::user_id.eq(user_id)))
            .returning(EmployerAccount::as_returning())
            .get_result(conn)
            .optional()?;

        diesel::update(users::table.filter(users::id.eq(user_id)))
            .set(users::has_employer_account.eq(false))
            .execute(conn)?;

        Ok::<_, diesel::result::Error>(deleted)
    })?;

    if deleted.is_some() {
        info!("Deleted employer account");
    }
    Ok(deleted)
}
