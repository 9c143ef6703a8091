use anyhow::anyhow;
use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use axum_extra::extract::Query;
use std::sync::Arc;
use tracing::{debug, info, instrument};

use super::{validate_into, worker_id_for};
use crate::auth::AuthUser;
use crate::db::DbPool;
use crate::dto::{
    EmployerFeedbackRequest, FeedbackResponse, HireWorkerRequest, JobDetailResponse, JobInput, JobQuery,
    JobResponse, WorkScheduleRequest, WorkScheduleResponse, WorkerFeedbackRequest,
};
use crate::errors::{ApiError, ValidationErrors};
use crate::extract::{FormPayload, ValidatedJson};
use crate::models::{EmployerFeedback, Job, JsonList, User, WorkSchedule, WorkerFeedback};
use crate::repo::{self, JobFilter};

fn load_job(pool: &DbPool, job_id: &str) -> Result<Job, ApiError> {
    repo::get_job(pool, job_id)
        .map_err(ApiError::Database)?
        .ok_or(ApiError::NotFound)
}

/// Feedback may only be left once a job is done
fn require_done(job: &Job) -> Result<(), ApiError> {
    if job.get_done() {
        Ok(())
    } else {
        Err(ValidationErrors::non_field("job_not_done", "Feedback can only be left on completed jobs.").into())
    }
}

/// Fails with 403 unless `user` posted `job`
fn require_owner(job: &Job, user: &User) -> Result<(), ApiError> {
    if job.is_owned_by(&user.get_id()) {
        Ok(())
    } else {
        Err(ApiError::Forbidden("Only the employer who posted this job may do this.".to_string()))
    }
}

fn job_detail(pool: &DbPool, job: &Job) -> Result<JobDetailResponse, ApiError> {
    let applicants = repo::list_applicants(pool, &job.get_id()).map_err(ApiError::Database)?;
    let workers = repo::list_workers(pool, &job.get_id()).map_err(ApiError::Database)?;

    Ok(JobDetailResponse {
        job: JobResponse::from(job),
        applicants,
        workers,
    })
}

/// Handler for listing jobs
///
/// This function handles GET requests to `/jobs`.
///
/// ### Arguments
///
/// * `pool` - The database connection pool
/// * `query` - Optional `type`, `shift` and `tag` filters (repeatable) plus
///   `location` and `done`
///
/// ### Returns
///
/// The matching jobs as JSON, newest first
#[instrument(skip(pool))]
pub async fn list_jobs_handler(
    State(pool): State<Arc<DbPool>>,
    Query(query): Query<JobQuery>,
) -> Result<Json<Vec<JobResponse>>, ApiError> {
    let filter = JobFilter {
        job_types: query.job_type,
        shifts: query.shift,
        tags: query.tag,
        location: query.location,
        done: query.done,
    };

    let jobs = repo::list_jobs(&pool, &filter).map_err(ApiError::Database)?;
    debug!("Returning {} jobs", jobs.len());

    Ok(Json(jobs.iter().map(JobResponse::from).collect()))
}

/// Handler for retrieving a job with its applicants and hired workers
///
/// This function handles GET requests to `/jobs/{id}`.
#[instrument(skip(pool))]
pub async fn get_job_handler(
    State(pool): State<Arc<DbPool>>,
    Path(job_id): Path<String>,
) -> Result<Json<JobDetailResponse>, ApiError> {
    let job = load_job(&pool, &job_id)?;
    Ok(Json(job_detail(&pool, &job)?))
}

/// Handler for posting a job
///
/// This function handles POST requests to `/jobs`. The caller needs an
/// employer account.
///
/// ### Returns
///
/// 201 with the new job
#[instrument(skip(pool, user, payload), fields(username = %user.get_username()))]
pub async fn create_job_handler(
    State(pool): State<Arc<DbPool>>,
    AuthUser(user): AuthUser,
    payload: FormPayload,
) -> Result<(StatusCode, Json<JobDetailResponse>), ApiError> {
    if !user.get_has_employer_account() {
        return Err(ApiError::Forbidden("An employer account is required to post jobs.".to_string()));
    }

    let input: JobInput = payload.parse()?;
    validate_into(&input, input.missing_required()).into_result()?;

    let job = Job::from_changes(user.get_id(), input.into_changes())
        .ok_or_else(|| ApiError::Database(anyhow!("Incomplete job posted by {}", user.get_id())))?;
    let job = repo::create_job(&pool, job).map_err(ApiError::Database)?;

    info!("Posted job {}", job.get_id());
    Ok((StatusCode::CREATED, Json(job_detail(&pool, &job)?)))
}

/// Handler for partially updating a job
///
/// This function handles PATCH requests to `/jobs/{id}`; only the posting
/// employer may update a job, including marking it `done`.
#[instrument(skip(pool, user, payload), fields(username = %user.get_username()))]
pub async fn patch_job_handler(
    State(pool): State<Arc<DbPool>>,
    AuthUser(user): AuthUser,
    Path(job_id): Path<String>,
    payload: FormPayload,
) -> Result<Json<JobDetailResponse>, ApiError> {
    let job = load_job(&pool, &job_id)?;
    require_owner(&job, &user)?;

    let input: JobInput = payload.parse()?;
    validate_into(&input, ValidationErrors::new()).into_result()?;

    let job = repo::update_job(&pool, &job_id, &input.into_changes()).map_err(ApiError::Database)?;

    info!("Updated job");
    Ok(Json(job_detail(&pool, &job)?))
}

/// Handler for deleting a job
///
/// This function handles DELETE requests to `/jobs/{id}`. The posting
/// employer and staff may delete a job.
#[instrument(skip(pool, user), fields(username = %user.get_username()))]
pub async fn delete_job_handler(
    State(pool): State<Arc<DbPool>>,
    AuthUser(user): AuthUser,
    Path(job_id): Path<String>,
) -> Result<StatusCode, ApiError> {
    let job = load_job(&pool, &job_id)?;
    if !user.get_is_staff() {
        require_owner(&job, &user)?;
    }

    repo::delete_job(&pool, &job_id).map_err(ApiError::Database)?;

    info!("Deleted job {}", job_id);
    Ok(StatusCode::NO_CONTENT)
}

/// Handler for applying to a job
///
/// This function handles POST requests to `/jobs/{id}/apply`. The caller
/// needs a worker account.
///
/// ### Errors
///
/// 400 if the job is done or the caller already applied
#[instrument(skip(pool, user), fields(username = %user.get_username()))]
pub async fn apply_to_job_handler(
    State(pool): State<Arc<DbPool>>,
    AuthUser(user): AuthUser,
    Path(job_id): Path<String>,
) -> Result<Json<JobDetailResponse>, ApiError> {
    if !user.get_has_worker_account() {
        return Err(ApiError::Forbidden("A worker account is required to apply for jobs.".to_string()));
    }

    let job = load_job(&pool, &job_id)?;
    if job.get_done() {
        return Err(ValidationErrors::non_field("job_done", "This job is no longer open.").into());
    }

    let added = repo::apply_to_job(&pool, &job_id, &user.get_id()).map_err(ApiError::Database)?;
    if !added {
        return Err(ValidationErrors::non_field("already_applied", "You have already applied to this job.").into());
    }

    info!("Applied to job {}", job_id);
    Ok(Json(job_detail(&pool, &job)?))
}

/// Handler for hiring a worker onto a job
///
/// This function handles POST requests to `/jobs/{id}/workers` with the
/// worker's `username`.
#[instrument(skip(pool, user, payload), fields(username = %user.get_username(), worker = %payload.username))]
pub async fn hire_worker_handler(
    State(pool): State<Arc<DbPool>>,
    AuthUser(user): AuthUser,
    Path(job_id): Path<String>,
    ValidatedJson(payload): ValidatedJson<HireWorkerRequest>,
) -> Result<Json<JobDetailResponse>, ApiError> {
    let job = load_job(&pool, &job_id)?;
    require_owner(&job, &user)?;

    let worker_id = worker_id_for(&pool, "username", &payload.username)?;
    if repo::hire_worker(&pool, &job_id, &worker_id).map_err(ApiError::Database)? {
        info!("Hired {}", payload.username);
    } else {
        debug!("Worker was already hired");
    }

    Ok(Json(job_detail(&pool, &job)?))
}

/// Handler for adding a work schedule to a job
///
/// This function handles POST requests to `/jobs/{id}/schedules`.
///
/// ### Returns
///
/// 201 with the stored schedule
#[instrument(skip(pool, user, payload), fields(username = %user.get_username()))]
pub async fn add_work_schedule_handler(
    State(pool): State<Arc<DbPool>>,
    AuthUser(user): AuthUser,
    Path(job_id): Path<String>,
    ValidatedJson(payload): ValidatedJson<WorkScheduleRequest>,
) -> Result<(StatusCode, Json<WorkScheduleResponse>), ApiError> {
    let job = load_job(&pool, &job_id)?;
    require_owner(&job, &user)?;

    let schedule = WorkSchedule::new(job_id, JsonList(payload.schedules), payload.time_from, payload.time_to);
    let schedule = repo::add_work_schedule(&pool, schedule).map_err(ApiError::Database)?;

    Ok((StatusCode::CREATED, Json(WorkScheduleResponse::from(&schedule))))
}

/// Handler for listing the work schedules of a job
///
/// This function handles GET requests to `/jobs/{id}/schedules`.
#[instrument(skip(pool))]
pub async fn list_work_schedules_handler(
    State(pool): State<Arc<DbPool>>,
    Path(job_id): Path<String>,
) -> Result<Json<Vec<WorkScheduleResponse>>, ApiError> {
    load_job(&pool, &job_id)?;

    let schedules = repo::list_work_schedules(&pool, &job_id).map_err(ApiError::Database)?;
    Ok(Json(schedules.iter().map(WorkScheduleResponse::from).collect()))
}

/// Handler for an employer rating a worker hired for a job
///
/// This function handles POST requests to `/jobs/{id}/worker-feedback`.
///
/// ### Errors
///
/// 400 if the job is not done, the worker was not hired for it, or the
/// worker already has feedback for it
#[instrument(skip(pool, user, payload), fields(username = %user.get_username(), worker = %payload.worker))]
pub async fn create_worker_feedback_handler(
    State(pool): State<Arc<DbPool>>,
    AuthUser(user): AuthUser,
    Path(job_id): Path<String>,
    ValidatedJson(payload): ValidatedJson<WorkerFeedbackRequest>,
) -> Result<(StatusCode, Json<FeedbackResponse>), ApiError> {
    let job = load_job(&pool, &job_id)?;
    require_owner(&job, &user)?;
    require_done(&job)?;

    let worker_id = worker_id_for(&pool, "worker", &payload.worker)?;
    if !repo::is_worker_hired(&pool, &job_id, &worker_id).map_err(ApiError::Database)? {
        return Err(ValidationErrors::field("worker", "not_hired", "This worker was not hired for this job.").into());
    }

    let feedback = EmployerFeedback::new(job_id, user.get_id(), worker_id, payload.rating, payload.text);
    let feedback = repo::create_employer_feedback(&pool, feedback)
        .map_err(ApiError::Database)?
        .ok_or_else(|| ValidationErrors::non_field("feedback_exists", "Feedback for this worker and job already exists."))?;

    info!("Stored feedback for {}", payload.worker);
    Ok((StatusCode::CREATED, Json(FeedbackResponse::from(&feedback))))
}

/// Handler for a hired worker rating the employer of a job
///
/// This function handles POST requests to `/jobs/{id}/employer-feedback`.
#[instrument(skip(pool, user, payload), fields(username = %user.get_username()))]
pub async fn create_employer_feedback_handler(
    State(pool): State<Arc<DbPool>>,
    AuthUser(user): AuthUser,
    Path(job_id): Path<String>,
    ValidatedJson(payload): ValidatedJson<EmployerFeedbackRequest>,
) -> Result<(StatusCode, Json<FeedbackResponse>), ApiError> {
    let job = load_job(&pool, &job_id)?;

    if !repo::is_worker_hired(&pool, &job_id, &user.get_id()).map_err(ApiError::Database)? {
        return Err(ApiError::Forbidden("Only workers hired for this job may rate its employer.".to_string()));
    }
    require_done(&job)?;
    let Some(employer_id) = job.get_employer_id() else {
        return Err(ValidationErrors::non_field("no_employer", "This job no longer has an employer.").into());
    };

    let feedback = WorkerFeedback::new(job_id, user.get_id(), employer_id, payload.rating, payload.text);
    let feedback = repo::create_worker_feedback(&pool, feedback)
        .map_err(ApiError::Database)?
        .ok_or_else(|| ValidationErrors::non_field("feedback_exists", "Feedback for this employer and job already exists."))?;

    info!("Stored feedback on the employer");
    Ok((StatusCode::CREATED, Json(FeedbackResponse::from(&feedback))))
}
