use clap::Subcommand;

use crate::client::{JobListFilter, JobmarketClient};
use crate::output::{self, OutputConfig};

/// Job posting commands
#[derive(Subcommand, Debug)]
pub enum JobCommands {
    /// List job postings, newest first
    List {
        /// Only jobs of this type (repeatable)
        #[clap(long = "type")]
        job_type: Vec<String>,
        /// Only jobs with this shift (repeatable)
        #[clap(long)]
        shift: Vec<String>,
        /// Only jobs with this tag (repeatable)
        #[clap(long)]
        tag: Vec<String>,
        /// Only jobs in this location
        #[clap(long)]
        location: Option<String>,
        /// Only finished (true) or open (false) jobs
        #[clap(long)]
        done: Option<bool>,
    },
    /// Show a job posting with its applicants and workers
    Get {
        /// The job ID
        id: String,
    },
}

/// Executes a job command
pub async fn execute(
    client: &JobmarketClient,
    cmd: JobCommands,
    config: &OutputConfig,
) -> Result<(), Box<dyn std::error::Error>> {
    match cmd {
        JobCommands::List { job_type, shift, tag, location, done } => {
            let filter = JobListFilter {
                job_types: job_type,
                shifts: shift,
                tags: tag,
                location,
                done,
            };
            let jobs = client.list_jobs(&filter).await?;
            output::print_jobs(&jobs, config);
        }
        JobCommands::Get { id } => match client.get_job(&id).await? {
            Some(job) => output::print_job(&job, config),
            None => return Err(format!("Job not found: {}", id).into()),
        },
    }
    Ok(())
}
