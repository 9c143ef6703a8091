mod client;
mod commands;
mod output;

use clap::{Parser, Subcommand};
use client::JobmarketClient;
use jobmarket::config;
use output::{OutputConfig, OutputFormat};
use std::process;

/// CLI for browsing a jobmarket server
#[derive(Parser, Debug)]
#[clap(name = "jobmarket-cli", about = "CLI for the jobmarket API")]
struct Cli {
    /// Server URL to connect to
    #[clap(long, env = "JOBMARKET_URL", global = true)]
    server_url: Option<String>,

    /// Output format
    #[clap(long, value_enum, default_value_t = OutputFormat::Human, global = true)]
    format: OutputFormat,

    /// Quiet mode: minimal output (just names or IDs)
    #[clap(short, long, global = true)]
    quiet: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// List the professions workers can pick from
    Roles,
    /// Show the choices for job types, shifts, days and tags
    JobData,
    /// List the company size choices
    CompanySizes,
    /// Browse worker accounts
    #[command(subcommand)]
    Worker(commands::worker::WorkerCommands),
    /// Browse employer accounts
    #[command(subcommand)]
    Employer(commands::employer::EmployerCommands),
    /// Browse job postings
    #[command(subcommand)]
    Job(commands::job::JobCommands),
}

/// Resolves the server URL from CLI args, config file, or defaults
///
/// Precedence: CLI flag / env var > config file > default
fn resolve_server_url(cli_url: Option<String>) -> String {
    if let Some(url) = cli_url {
        return url;
    }

    let config_dir = config::get_config_dir_path();
    if let Some(ref dir) = config_dir {
        let config_path = dir.join("config.toml");
        if let Ok(update) = config::config_from_file(Some(config_path)) {
            if let Some(url) = update.server_url {
                return url;
            }
        }
    }

    "http://localhost:8000".to_string()
}

/// Formats an error for human-readable stderr output
fn format_error(err: &dyn std::error::Error) -> String {
    let err_string = err.to_string();

    if err_string.contains("error sending request")
        || err_string.contains("connection refused")
        || err_string.contains("Connection refused")
        || err_string.contains("tcp connect error")
    {
        return format!("Could not connect to server. Is jobmarket running?\n  {}", err_string);
    }

    err_string
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    let server_url = resolve_server_url(cli.server_url);
    let client = JobmarketClient::new(server_url);
    let output_config = OutputConfig {
        format: cli.format,
        quiet: cli.quiet,
    };

    let result = match cli.command {
        Commands::Roles => commands::meta::roles(&client, &output_config).await,
        Commands::JobData => commands::meta::job_data(&client, &output_config).await,
        Commands::CompanySizes => commands::meta::company_sizes(&client, &output_config).await,
        Commands::Worker(cmd) => commands::worker::execute(&client, cmd, &output_config).await,
        Commands::Employer(cmd) => commands::employer::execute(&client, cmd, &output_config).await,
        Commands::Job(cmd) => commands::job::execute(&client, cmd, &output_config).await,
    };

    if let Err(e) = result {
        eprintln!("Error: {}", format_error(e.as_ref()));
        process::exit(1);
    }
}
