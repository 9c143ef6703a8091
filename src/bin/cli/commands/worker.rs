use clap::Subcommand;

use crate::client::JobmarketClient;
use crate::output::{self, OutputConfig};

/// Worker account commands
#[derive(Subcommand, Debug)]
pub enum WorkerCommands {
    /// List worker accounts
    List {
        /// Only workers with this profession (repeatable)
        #[clap(long)]
        profession: Vec<String>,
        /// Only workers in this location
        #[clap(long)]
        location: Option<String>,
    },
    /// Show the worker account of a user
    Get {
        /// The username
        username: String,
    },
}

/// Executes a worker account command
pub async fn execute(
    client: &JobmarketClient,
    cmd: WorkerCommands,
    config: &OutputConfig,
) -> Result<(), Box<dyn std::error::Error>> {
    match cmd {
        WorkerCommands::List { profession, location } => {
            let accounts = client.list_worker_accounts(&profession, location.as_deref()).await?;
            output::print_worker_accounts(&accounts, config);
        }
        WorkerCommands::Get { username } => match client.get_worker_account(&username).await? {
            Some(account) => output::print_worker_account(&account, config),
            None => return Err(format!("No worker account for {}", username).into()),
        },
    }
    Ok(())
}
