use crate::db::DbPool;
use crate::models::{Contract, ContractStatus};
use crate::schema::{contract_workers, contracts, users, worker_accounts};
use anyhow::{Result, anyhow};
use diesel::prelude::*;
use diesel::sqlite::SqliteConnection;
use tracing::{debug, info, instrument};

/// A contract with the usernames of the parties that signed it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContractDetails {
    pub contract: Contract,
    /// None once the signing employer deleted their account
    pub employer_username: Option<String>,
    pub worker_usernames: Vec<String>,
}

fn load_details(conn: &mut SqliteConnection, contract: Contract) -> Result<ContractDetails> {
    let employer_username = match contract.get_signed_employer_id() {
        Some(employer_id) => users::table
            .filter(users::id.eq(employer_id))
            .select(users::username)
            .first::<String>(conn)
            .optional()?,
        None => None,
    };

    let worker_usernames = contract_workers::table
        .inner_join(worker_accounts::table.inner_join(users::table))
        .filter(contract_workers::contract_id.eq(contract.get_id()))
        .select(users::username)
        .order_by(users::username.asc())
        .load(conn)?;

    Ok(ContractDetails {
        contract,
        employer_username,
        worker_usernames,
    })
}

/// Stores a contract and its signing workers
///
/// The contract row and its worker links are written in one transaction.
///
/// ### Arguments
///
/// * `pool` - A reference to the database connection pool
/// * `contract` - The contract, already carrying its signing employer
/// * `worker_ids` - User ids of the workers signing it
///
/// ### Returns
///
/// A Result containing the stored contract with its parties
///
/// ### Errors
///
/// Returns an error if a worker id has no worker account or the insert fails
#[instrument(skip(pool, contract), fields(contract_id = %contract.get_id()))]
pub fn create_contract(pool: &DbPool, contract: Contract, worker_ids: &[String]) -> Result<ContractDetails> {
    let conn = &mut pool.get()?;

    conn.transaction(|conn| {
        diesel::insert_into(contracts::table)
            .values(&contract)
            .execute(conn)?;

        for worker_id in worker_ids {
            diesel::insert_or_ignore_into(contract_workers::table)
                .values((
                    contract_workers::contract_id.eq(contract.get_id()),
                    contract_workers::worker_id.eq(worker_id),
                ))
                .execute(conn)?;
        }

        Ok::<_, diesel::result::Error>(())
    })?;

    info!("Created contract with {} workers", worker_ids.len());
    load_details(conn, contract)
}

/// Retrieves a contract and its parties
pub fn get_contract_details(pool: &DbPool, contract_id: &str) -> Result<Option<ContractDetails>> {
    let conn = &mut pool.get()?;

    let contract = contracts::table
        .filter(contracts::id.eq(contract_id))
        .select(Contract::as_select())
        .first(conn)
        .optional()?;

    match contract {
        Some(contract) => Ok(Some(load_details(conn, contract)?)),
        None => Ok(None),
    }
}

/// Sets the status of a contract
///
/// ### Errors
///
/// Returns an error if the contract does not exist
#[instrument(skip(pool))]
pub fn update_contract_status(pool: &DbPool, contract_id: &str, status: ContractStatus) -> Result<ContractDetails> {
    let conn = &mut pool.get()?;

    let contract = diesel::update(contracts::table.filter(contracts::id.eq(contract_id)))
        .set(contracts::status.eq(status))
        .returning(Contract::as_returning())
        .get_result(conn)
        .optional()?
        .ok_or_else(|| anyhow!("Contract with id {} not found", contract_id))?;

    debug!("Contract status set to {}", status);
    load_details(conn, contract)
}

/// Returns true if the worker signed the contract
pub fn is_contract_worker(pool: &DbPool, contract_id: &str, worker_id: &str) -> Result<bool> {
    let conn = &mut pool.get()?;

    let count: i64 = contract_workers::table
        .filter(contract_workers::contract_id.eq(contract_id))
        .filter(contract_workers::worker_id.eq(worker_id))
        .count()
        .get_result(conn)?;

    Ok(count > 0)
}
