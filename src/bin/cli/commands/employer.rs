use clap::Subcommand;

use crate::client::JobmarketClient;
use crate::output::{self, OutputConfig};

/// Employer account commands
#[derive(Subcommand, Debug)]
pub enum EmployerCommands {
    /// List employer accounts
    List {
        /// Only employers in this location
        #[clap(long)]
        location: Option<String>,
    },
    /// Show the employer account of a user
    Get {
        /// The username
        username: String,
    },
}

/// Executes an employer account command
pub async fn execute(
    client: &JobmarketClient,
    cmd: EmployerCommands,
    config: &OutputConfig,
) -> Result<(), Box<dyn std::error::Error>> {
    match cmd {
        EmployerCommands::List { location } => {
            let accounts = client.list_employer_accounts(location.as_deref()).await?;
            output::print_employer_accounts(&accounts, config);
        }
        EmployerCommands::Get { username } => match client.get_employer_account(&username).await? {
            Some(account) => output::print_employer_account(&account, config),
            None => return Err(format!("No employer account for {}", username).into()),
        },
    }
    Ok(())
}
