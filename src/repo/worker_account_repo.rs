use std::collections::HashMap;

use super::contains_pattern;
use crate::db::DbPool;
use crate::models::{WorkerAccount, WorkerAccountChanges};
use crate::schema::{employer_feedbacks, job_workers, jobs, professions, users, worker_accounts};
use anyhow::{Result, anyhow};
use diesel::dsl::count_star;
use diesel::prelude::*;
use diesel::sqlite::SqliteConnection;
use tracing::{debug, info, instrument};

/// A worker account together with the data shown alongside it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorkerProfile {
    pub account: WorkerAccount,
    pub username: String,
    pub profession: String,
    /// Number of feedbacks employers left for this worker
    pub review_count: i64,
    /// Number of finished jobs the worker was hired for
    pub jobs_done: i64,
}

/// Feedback and finished-job counts for each of `user_ids`, one grouped query each
fn load_counts(conn: &mut SqliteConnection, user_ids: &[String]) -> Result<(HashMap<String, i64>, HashMap<String, i64>)> {
    let review_counts: HashMap<String, i64> = employer_feedbacks::table
        .filter(employer_feedbacks::worker_id.eq_any(user_ids))
        .group_by(employer_feedbacks::worker_id)
        .select((employer_feedbacks::worker_id, count_star()))
        .load::<(Option<String>, i64)>(conn)?
        .into_iter()
        .filter_map(|(worker_id, count)| worker_id.map(|id| (id, count)))
        .collect();

    let jobs_done: HashMap<String, i64> = job_workers::table
        .inner_join(jobs::table)
        .filter(job_workers::worker_id.eq_any(user_ids))
        .filter(jobs::done.eq(true))
        .group_by(job_workers::worker_id)
        .select((job_workers::worker_id, count_star()))
        .load::<(String, i64)>(conn)?
        .into_iter()
        .collect();

    Ok((review_counts, jobs_done))
}

fn load_profiles(conn: &mut SqliteConnection, rows: Vec<(WorkerAccount, String, String)>) -> Result<Vec<WorkerProfile>> {
    let user_ids: Vec<String> = rows.iter().map(|(account, _, _)| account.get_user_id()).collect();
    let (review_counts, jobs_done) = load_counts(conn, &user_ids)?;

    Ok(rows
        .into_iter()
        .map(|(account, username, profession)| {
            let user_id = account.get_user_id();
            WorkerProfile {
                review_count: review_counts.get(&user_id).copied().unwrap_or(0),
                jobs_done: jobs_done.get(&user_id).copied().unwrap_or(0),
                account,
                username,
                profession,
            }
        })
        .collect())
}

/// Creates the worker account of a user
///
/// The account row and the user's `has_worker_account` flag are written in
/// one transaction.
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
/// Returns an error if:
/// - Unable to get a connection from the pool
/// - The user already has a worker account
/// - The profession does not exist
#[instrument(skip(pool, account), fields(user_id = %account.get_user_id()))]
pub fn create_worker_account(pool: &DbPool, account: WorkerAccount) -> Result<WorkerAccount> {
    let conn = &mut pool.get()?;

    conn.transaction(|conn| {
        diesel::insert_into(worker_accounts::table)
            .values(&account)
            .execute(conn)?;

        diesel::update(users::table.filter(users::id.eq(account.get_user_id())))
            .set(users::has_worker_account.eq(true))
            .execute(conn)?;

        Ok::<_, diesel::result::Error>(())
    })?;

    info!("Created worker account");
    Ok(account)
}

/// Retrieves the worker account of a user, if any
pub fn get_worker_account(pool: &DbPool, user_id: &str) -> Result<Option<WorkerAccount>> {
    let conn = &mut pool.get()?;

    let account = worker_accounts::table
        .filter(worker_accounts::user_id.eq(user_id))
        .select(WorkerAccount::as_select())
        .first(conn)
        .optional()?;

    Ok(account)
}

/// Retrieves a worker profile by the owner's username
///
/// ### Returns
///
/// A Result containing the profile, or None if the user has no worker account
#[instrument(skip(pool))]
pub fn get_worker_profile(pool: &DbPool, username: &str) -> Result<Option<WorkerProfile>> {
    let conn = &mut pool.get()?;

    let row = worker_accounts::table
        .inner_join(users::table)
        .inner_join(professions::table)
        .filter(users::username.eq(username))
        .select((WorkerAccount::as_select(), users::username, professions::name))
        .first::<(WorkerAccount, String, String)>(conn)
        .optional()?;

    match row {
        Some(row) => Ok(load_profiles(conn, vec![row])?.pop()),
        None => Ok(None),
    }
}

/// Retrieves the profile of the worker account owned by `user_id`
pub fn get_worker_profile_by_user_id(pool: &DbPool, user_id: &str) -> Result<Option<WorkerProfile>> {
    let conn = &mut pool.get()?;

    let row = worker_accounts::table
        .inner_join(users::table)
        .inner_join(professions::table)
        .filter(worker_accounts::user_id.eq(user_id))
        .select((WorkerAccount::as_select(), users::username, professions::name))
        .first::<(WorkerAccount, String, String)>(conn)
        .optional()?;

    match row {
        Some(row) => Ok(load_profiles(conn, vec![row])?.pop()),
        None => Ok(None),
    }
}

/// Lists worker profiles ordered by username
///
/// ### Arguments
///
/// * `pool` - A reference to the database connection pool
/// * `profession_names` - Only accounts with one of these professions; empty means any
/// * `location` - Only accounts whose location contains this text
///
/// ### Returns
///
/// A Result containing the matching profiles
#[instrument(skip(pool))]
pub fn list_worker_profiles(pool: &DbPool, profession_names: &[String], location: Option<&str>) -> Result<Vec<WorkerProfile>> {
    let conn = &mut pool.get()?;

    let mut query = worker_accounts::table
        .inner_join(users::table)
        .inner_join(professions::table)
        .select((WorkerAccount::as_select(), users::username, professions::name))
        .into_boxed();

    if !profession_names.is_empty() {
        query = query.filter(professions::name.eq_any(profession_names));
    }
    if let Some(location) = location {
        query = query.filter(worker_accounts::location.like(contains_pattern(location)).escape('\\'));
    }

    let rows = query
        .order_by(users::username.asc())
        .load::<(WorkerAccount, String, String)>(conn)?;
    debug!("Found {} worker accounts", rows.len());

    load_profiles(conn, rows)
}

/// Applies changes to a user's worker account
///
/// ### Returns
///
/// A Result containing the account as stored after the update
///
/// ### Errors
///
/// Returns an error if the user has no worker account or the update fails
#[instrument(skip(pool, changes))]
pub fn update_worker_account(pool: &DbPool, user_id: &str, changes: &WorkerAccountChanges) -> Result<WorkerAccount> {
    let conn = &mut pool.get()?;

    let account = diesel::update(worker_accounts::table.filter(worker_accounts::user_id.eq(user_id)))
        .set(changes)
        .returning(WorkerAccount::as_returning())
        .get_result(conn)
        .optional()?
        .ok_or_else(|| anyhow!("Worker account for user {} not found", user_id))?;

    debug!("Updated worker account");
    Ok(account)
}

/// Deletes a user's worker account and clears `has_worker_account`
///
/// ### Returns
///
/// A Result containing the deleted account, so that its stored photo can be
/// removed, or None if there was nothing to delete
#[instrument(skip(pool))]
pub fn delete_worker_account(pool: &DbPool, user_id: &str) -> Result<Option<WorkerAccount>> {
    let conn = &mut pool.get()?;

    let deleted = conn.transaction(|conn| {
        let deleted = diesel::delete(worker_accounts::table.filter(worker_accounts::user_id.eq(user_id)))
            .returning(WorkerAccount::as_returning())
            .get_result(conn)
            .optional()?;

        diesel::update(users::table.filter(users::id.eq(user_id)))
            .set(users::has_worker_account.eq(false))
            .execute(conn)?;

        Ok::<_, diesel::result::Error>(deleted)
    })?;

    if deleted.is_some() {
        info!("Deleted worker account");
    }
    Ok(deleted)
}
