use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use std::sync::Arc;
use tracing::{debug, info, instrument};

use super::worker_id_for;
use crate::auth::AuthUser;
use crate::db::DbPool;
use crate::dto::{ContractResponse, CreateContractRequest, UpdateContractStatusRequest};
use crate::errors::{ApiError, ValidationErrors};
use crate::extract::ValidatedJson;
use crate::models::{Contract, ContractStatus};
use crate::repo::{self, ContractDetails};

fn load_contract(pool: &DbPool, contract_id: &str) -> Result<ContractDetails, ApiError> {
    repo::get_contract_details(pool, contract_id)
        .map_err(ApiError::Database)?
        .ok_or(ApiError::NotFound)
}

/// Checks that the job a contract names exists and was posted by the caller
fn contract_job_id(pool: &DbPool, job_id: Option<&str>, user_id: &str) -> Result<Option<String>, ApiError> {
    let Some(job_id) = job_id else {
        return Ok(None);
    };

    let job = repo::get_job(pool, job_id).map_err(ApiError::Database)?.ok_or_else(|| {
        ValidationErrors::field("job", "does_not_exist", format!("Invalid pk \"{}\" - object does not exist.", job_id))
    })?;
    if job.get_employer_id().as_deref() != Some(user_id) {
        debug!("Job {} belongs to another employer", job_id);
        return Err(ApiError::Forbidden("Contracts can only be drawn up for your own jobs.".to_string()));
    }

    Ok(Some(job.get_id()))
}

fn is_signed_employer(details: &ContractDetails, user_id: &str) -> bool {
    details.contract.get_signed_employer_id().as_deref() == Some(user_id)
}

/// Handler for drawing up a contract
///
/// This function handles POST requests to `/contracts`. The caller signs as
/// employer and needs an employer account; `workers` lists the usernames of
/// the signing workers and `job` optionally names one of the caller's jobs.
///
/// ### Returns
///
/// 201 with the pending contract
///
/// ### Errors
///
/// 400 if a worker or the job does not exist, 403 if the job was posted by
/// another employer
#[instrument(skip(pool, user, payload), fields(username = %user.get_username()))]
pub async fn create_contract_handler(
    State(pool): State<Arc<DbPool>>,
    AuthUser(user): AuthUser,
    ValidatedJson(payload): ValidatedJson<CreateContractRequest>,
) -> Result<(StatusCode, Json<ContractResponse>), ApiError> {
    if !user.get_has_employer_account() {
        return Err(ApiError::Forbidden("An employer account is required to draw up contracts.".to_string()));
    }

    let worker_ids = payload
        .workers
        .iter()
        .map(|username| worker_id_for(&pool, "workers", username))
        .collect::<Result<Vec<_>, _>>()?;

    let job_id = contract_job_id(&pool, payload.job.as_deref(), &user.get_id())?;

    let contract = Contract::new(user.get_id(), job_id, payload.start_date, payload.end_date);
    let details = repo::create_contract(&pool, contract, &worker_ids).map_err(ApiError::Database)?;

    info!("Created contract {}", details.contract.get_id());
    Ok((StatusCode::CREATED, Json(ContractResponse::from(&details))))
}

/// Handler for retrieving a contract
///
/// This function handles GET requests to `/contracts/{id}`. Only the
/// signing employer, a signing worker or staff may read a contract.
#[instrument(skip(pool, user), fields(username = %user.get_username()))]
pub async fn get_contract_handler(
    State(pool): State<Arc<DbPool>>,
    AuthUser(user): AuthUser,
    Path(contract_id): Path<String>,
) -> Result<Json<ContractResponse>, ApiError> {
    let details = load_contract(&pool, &contract_id)?;
    let user_id = user.get_id();

    let allowed = user.get_is_staff()
        || is_signed_employer(&details, &user_id)
        || repo::is_contract_worker(&pool, &contract_id, &user_id).map_err(ApiError::Database)?;
    if !allowed {
        debug!("Caller is not a party to the contract");
        return Err(ApiError::Forbidden("You are not a party to this contract.".to_string()));
    }

    Ok(Json(ContractResponse::from(&details)))
}

/// Handler for setting the status of a contract
///
/// This function handles PATCH requests to `/contracts/{id}/status`. Any
/// status may be set by the signing employer, in any order.
///
/// ### Errors
///
/// 400 if `status` is not one of PEN, ATV, END or RJT
#[instrument(skip(pool, user, payload), fields(username = %user.get_username(), status = %payload.status))]
pub async fn update_contract_status_handler(
    State(pool): State<Arc<DbPool>>,
    AuthUser(user): AuthUser,
    Path(contract_id): Path<String>,
    ValidatedJson(payload): ValidatedJson<UpdateContractStatusRequest>,
) -> Result<Json<ContractResponse>, ApiError> {
    let details = load_contract(&pool, &contract_id)?;
    if !is_signed_employer(&details, &user.get_id()) {
        return Err(ApiError::Forbidden("Only the signing employer may change the status.".to_string()));
    }

    let status: ContractStatus = payload
        .status
        .parse()
        .map_err(|detail: String| ValidationErrors::field("status", "invalid_choice", detail))?;

    let details = repo::update_contract_status(&pool, &contract_id, status).map_err(ApiError::Database)?;

    info!("Contract status set to {}", status);
    Ok(Json(ContractResponse::from(&details)))
}
