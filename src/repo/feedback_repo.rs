use crate::db::DbPool;
use crate::models::{EmployerFeedback, WorkerFeedback};
use crate::schema::{employer_feedbacks, worker_feedbacks};
use anyhow::Result;
use diesel::prelude::*;
use tracing::{debug, info, instrument};

/// Stores an employer's feedback on a worker
///
/// An employer rates each worker at most once per job.
///
/// ### Arguments
///
/// * `pool` - A reference to the database connection pool
/// * `feedback` - The feedback to store
///
/// ### Returns
///
/// A Result containing the stored feedback, or None if the worker already
/// has feedback for this job
#[instrument(skip(pool, feedback))]
pub fn create_employer_feedback(pool: &DbPool, feedback: EmployerFeedback) -> Result<Option<EmployerFeedback>> {
    let conn = &mut pool.get()?;

    let existing: i64 = employer_feedbacks::table
        .filter(employer_feedbacks::job_id.eq(feedback.get_job_id()))
        .filter(employer_feedbacks::worker_id.eq(feedback.get_worker_id()))
        .count()
        .get_result(conn)?;
    if existing > 0 {
        debug!("Worker already has feedback for this job");
        return Ok(None);
    }

    diesel::insert_into(employer_feedbacks::table)
        .values(&feedback)
        .execute(conn)?;

    info!("Stored employer feedback");
    Ok(Some(feedback))
}

/// Stores a worker's feedback on an employer
///
/// ### Returns
///
/// A Result containing the stored feedback, or None if the employer already
/// has feedback for this job
#[instrument(skip(pool, feedback))]
pub fn create_worker_feedback(pool: &DbPool, feedback: WorkerFeedback) -> Result<Option<WorkerFeedback>> {
    let conn = &mut pool.get()?;

    let existing: i64 = worker_feedbacks::table
        .filter(worker_feedbacks::job_id.eq(feedback.get_job_id()))
        .filter(worker_feedbacks::employer_id.eq(feedback.get_employer_id()))
        .count()
        .get_result(conn)?;
    if existing > 0 {
        debug!("Employer already has feedback for this job");
        return Ok(None);
    }

    diesel::insert_into(worker_feedbacks::table)
        .values(&feedback)
        .execute(conn)?;

    info!("Stored worker feedback");
    Ok(Some(feedback))
}

/// Lists the feedback employers left for a worker, newest first
pub fn list_feedback_for_worker(pool: &DbPool, worker_id: &str) -> Result<Vec<EmployerFeedback>> {
    let conn = &mut pool.get()?;

    let result = employer_feedbacks::table
        .filter(employer_feedbacks::worker_id.eq(worker_id))
        .order_by(employer_feedbacks::created_at.desc())
        .select(EmployerFeedback::as_select())
        .load(conn)?;

    Ok(result)
}

/// Lists the feedback workers left for an employer, newest first
pub fn list_feedback_for_employer(pool: &DbPool, employer_id: &str) -> Result<Vec<WorkerFeedback>> {
    let conn = &mut pool.get()?;

    let result = worker_feedbacks::table
        .filter(worker_feedbacks::employer_id.eq(employer_id))
        .order_by(worker_feedbacks::created_at.desc())
        .select(WorkerFeedback::as_select())
        .load(conn)?;

    Ok(result)
}
