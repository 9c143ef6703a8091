use super::contains_pattern;
use crate::db::DbPool;
use crate::models::{Job, JobChanges, JsonList, WorkSchedule};
use crate::schema::{job_applicants, job_workers, jobs, users, work_schedules, worker_accounts};
use anyhow::{Result, anyhow};
use diesel::prelude::*;
use tracing::{debug, info, instrument};

/// Criteria for listing jobs
///
/// List criteria match when the job carries at least one of the given
/// values; an empty list matches every job.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct JobFilter {
    pub job_types: Vec<String>,
    pub shifts: Vec<String>,
    pub tags: Vec<String>,
    pub location: Option<String>,
    pub done: Option<bool>,
}

impl JobFilter {
    fn matches_any(wanted: &[String], present: &JsonList) -> bool {
        wanted.is_empty() || wanted.iter().any(|w| present.contains(w))
    }

    /// Checks the list criteria, which are stored as JSON and not queryable
    pub fn matches_lists(&self, job: &Job) -> bool {
        Self::matches_any(&self.job_types, &job.get_types())
            && Self::matches_any(&self.shifts, &job.get_shifts())
            && Self::matches_any(&self.tags, &job.get_tags())
    }
}

/// Stores a new job posting
///
/// ### Arguments
///
/// * `pool` - A reference to the database connection pool
/// * `job` - The posting to store
///
/// ### Returns
///
/// A Result containing the stored job
#[instrument(skip(pool, job), fields(job_id = %job.get_id()))]
pub fn create_job(pool: &DbPool, job: Job) -> Result<Job> {
    let conn = &mut pool.get()?;

    diesel::insert_into(jobs::table)
        .values(&job)
        .execute(conn)?;

    info!("Created job {}", job.get_title());
    Ok(job)
}

/// Retrieves a job by id
pub fn get_job(pool: &DbPool, job_id: &str) -> Result<Option<Job>> {
    let conn = &mut pool.get()?;

    let job = jobs::table
        .filter(jobs::id.eq(job_id))
        .select(Job::as_select())
        .first(conn)
        .optional()?;

    Ok(job)
}

/// Lists jobs, newest first
///
/// Location and completion are filtered in SQL; type, shift and tag
/// criteria are applied to the loaded rows.
///
/// ### Arguments
///
/// * `pool` - A reference to the database connection pool
/// * `filter` - The criteria jobs must meet
///
/// ### Returns
///
/// A Result containing the matching jobs
#[instrument(skip(pool))]
pub fn list_jobs(pool: &DbPool, filter: &JobFilter) -> Result<Vec<Job>> {
    let conn = &mut pool.get()?;

    let mut query = jobs::table.select(Job::as_select()).into_boxed();

    if let Some(location) = &filter.location {
        query = query.filter(jobs::location.like(contains_pattern(location)).escape('\\'));
    }
    if let Some(done) = filter.done {
        query = query.filter(jobs::done.eq(done));
    }

    let loaded = query.order_by(jobs::posted_date.desc()).load(conn)?;

    let result: Vec<Job> = loaded.into_iter().filter(|job| filter.matches_lists(job)).collect();
    debug!("Found {} jobs", result.len());

    Ok(result)
}

/// Applies changes to a job
///
/// An empty change set leaves the row untouched.
///
/// ### Errors
///
/// Returns an error if the job does not exist or the update fails
#[instrument(skip(pool, changes))]
pub fn update_job(pool: &DbPool, job_id: &str, changes: &JobChanges) -> Result<Job> {
    if changes.is_empty() {
        return get_job(pool, job_id)?.ok_or_else(|| anyhow!("Job with id {} not found", job_id));
    }

    let conn = &mut pool.get()?;

    let job = diesel::update(jobs::table.filter(jobs::id.eq(job_id)))
        .set(changes)
        .returning(Job::as_returning())
        .get_result(conn)
        .optional()?
        .ok_or_else(|| anyhow!("Job with id {} not found", job_id))?;

    debug!("Updated job");
    Ok(job)
}

/// Deletes a job along with its applicants, hires and schedules
///
/// ### Returns
///
/// A Result containing true if a job was deleted
#[instrument(skip(pool))]
pub fn delete_job(pool: &DbPool, job_id: &str) -> Result<bool> {
    let conn = &mut pool.get()?;

    let deleted = diesel::delete(jobs::table.filter(jobs::id.eq(job_id))).execute(conn)?;

    if deleted > 0 {
        info!("Deleted job");
    }
    Ok(deleted > 0)
}

/// Adds a worker to the applicants of a job
///
/// ### Returns
///
/// A Result containing false if the worker had already applied
#[instrument(skip(pool))]
pub fn apply_to_job(pool: &DbPool, job_id: &str, worker_id: &str) -> Result<bool> {
    let conn = &mut pool.get()?;

    let inserted = diesel::insert_or_ignore_into(job_applicants::table)
        .values((job_applicants::job_id.eq(job_id), job_applicants::worker_id.eq(worker_id)))
        .execute(conn)?;

    Ok(inserted > 0)
}

/// Adds a worker to the hired workers of a job
///
/// ### Returns
///
/// A Result containing false if the worker was already hired
#[instrument(skip(pool))]
pub fn hire_worker(pool: &DbPool, job_id: &str, worker_id: &str) -> Result<bool> {
    let conn = &mut pool.get()?;

    let inserted = diesel::insert_or_ignore_into(job_workers::table)
        .values((job_workers::job_id.eq(job_id), job_workers::worker_id.eq(worker_id)))
        .execute(conn)?;

    if inserted > 0 {
        info!("Hired worker");
    }
    Ok(inserted > 0)
}

/// Returns true if the worker was hired for the job
pub fn is_worker_hired(pool: &DbPool, job_id: &str, worker_id: &str) -> Result<bool> {
    let conn = &mut pool.get()?;

    let count: i64 = job_workers::table
        .filter(job_workers::job_id.eq(job_id))
        .filter(job_workers::worker_id.eq(worker_id))
        .count()
        .get_result(conn)?;

    Ok(count > 0)
}

/// Usernames of the workers who applied to a job
pub fn list_applicants(pool: &DbPool, job_id: &str) -> Result<Vec<String>> {
    let conn = &mut pool.get()?;

    let usernames = job_applicants::table
        .inner_join(worker_accounts::table.inner_join(users::table))
        .filter(job_applicants::job_id.eq(job_id))
        .select(users::username)
        .order_by(users::username.asc())
        .load(conn)?;

    Ok(usernames)
}

/// Usernames of the workers hired for a job
pub fn list_workers(pool: &DbPool, job_id: &str) -> Result<Vec<String>> {
    let conn = &mut pool.get()?;

    let usernames = job_workers::table
        .inner_join(worker_accounts::table.inner_join(users::table))
        .filter(job_workers::job_id.eq(job_id))
        .select(users::username)
        .order_by(users::username.asc())
        .load(conn)?;

    Ok(usernames)
}

/// Stores a work schedule for a job
#[instrument(skip(pool, schedule), fields(job_id = %schedule.get_job_id()))]
pub fn add_work_schedule(pool: &DbPool, schedule: WorkSchedule) -> Result<WorkSchedule> {
    let conn = &mut pool.get()?;

    diesel::insert_into(work_schedules::table)
        .values(&schedule)
        .execute(conn)?;

    debug!("Added work schedule");
    Ok(schedule)
}

/// Lists the work schedules of a job, earliest start time first
pub fn list_work_schedules(pool: &DbPool, job_id: &str) -> Result<Vec<WorkSchedule>> {
    let conn = &mut pool.get()?;

    let schedules = work_schedules::table
        .filter(work_schedules::job_id.eq(job_id))
        .order_by(work_schedules::time_from.asc())
        .select(WorkSchedule::as_select())
        .load(conn)?;

    Ok(schedules)
}
