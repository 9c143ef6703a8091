use axum::{Json, extract::State};
use serde_json::{Value, json};
use std::sync::Arc;
use tracing::{debug, instrument};

use crate::db::DbPool;
use crate::dto::{CompanySizeResponse, JobDataResponse};
use crate::errors::ApiError;
use crate::repo;
use crate::validators::CompanySize;

/// Handler for the API root
///
/// This function handles GET requests to `/`, listing the entry points of
/// the API.
#[instrument]
pub async fn api_root_handler() -> Json<Value> {
    Json(json!({
        "roles": "/roles",
        "job-data": "/job-data",
        "company-sizes": "/company-sizes",
        "worker-account": "/worker-account",
        "employer-account": "/employer-account",
        "jobs": "/jobs",
    }))
}

/// Handler for listing profession names
///
/// This function handles GET requests to `/roles`.
///
/// ### Returns
///
/// The profession names as a JSON array, alphabetically
#[instrument(skip(pool))]
pub async fn list_roles_handler(State(pool): State<Arc<DbPool>>) -> Result<Json<Vec<String>>, ApiError> {
    let professions = repo::list_professions(&pool).map_err(ApiError::Database)?;
    debug!("Listing {} professions", professions.len());

    Ok(Json(professions.iter().map(|p| p.get_name()).collect()))
}

/// Handler for the choices of job posting fields
///
/// This function handles GET requests to `/job-data`.
#[instrument(skip(pool))]
pub async fn job_data_handler(State(pool): State<Arc<DbPool>>) -> Result<Json<JobDataResponse>, ApiError> {
    let job_types = repo::list_job_types(&pool).map_err(ApiError::Database)?;
    let shifts = repo::list_shifts(&pool).map_err(ApiError::Database)?;
    let days_schedule = repo::list_days_schedules(&pool).map_err(ApiError::Database)?;
    let tags = repo::list_job_tags(&pool).map_err(ApiError::Database)?;

    Ok(Json(JobDataResponse {
        job_types: job_types.iter().map(|t| t.get_name()).collect(),
        shifts: shifts.iter().map(|s| s.get_name()).collect(),
        days_schedule: days_schedule.iter().map(|d| d.get_name()).collect(),
        tags: tags.iter().map(|t| t.get_name()).collect(),
    }))
}

/// Handler for the company size choices
///
/// This function handles GET requests to `/company-sizes`.
#[instrument]
pub async fn company_sizes_handler() -> Json<Vec<CompanySizeResponse>> {
    Json(
        CompanySize::ALL
            .iter()
            .map(|size| CompanySizeResponse {
                value: size.value().to_string(),
                label: size.label().to_string(),
            })
            .collect(),
    )
}
