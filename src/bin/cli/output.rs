use clap::ValueEnum;
use jobmarket::dto::{
    CompanySizeResponse, EmployerAccountResponse, JobDataResponse, JobDetailResponse, JobResponse,
    WorkerAccountResponse,
};
use serde::Serialize;

/// Output format for CLI commands
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable output
    Human,
    /// JSON output
    Json,
}

/// Bundled output configuration passed to all print functions
#[derive(Debug, Clone, Copy)]
pub struct OutputConfig {
    /// The output format
    pub format: OutputFormat,
    /// When true, print minimal output (just names or IDs)
    pub quiet: bool,
}

fn print_json<T: Serialize + ?Sized>(value: &T) {
    match serde_json::to_string_pretty(value) {
        Ok(json) => println!("{}", json),
        Err(e) => eprintln!("Failed to serialize output: {}", e),
    }
}

/// Prints a list of names, one per line
pub fn print_names(names: &[String], empty_message: &str, config: &OutputConfig) {
    match config.format {
        OutputFormat::Human => {
            if names.is_empty() && !config.quiet {
                println!("{}", empty_message);
            }
            for name in names {
                println!("{}", name);
            }
        }
        OutputFormat::Json => print_json(names),
    }
}

/// Prints the field choices for job postings
pub fn print_job_data(data: &JobDataResponse, config: &OutputConfig) {
    match config.format {
        OutputFormat::Human => {
            let sections = [
                ("Job types", &data.job_types),
                ("Shifts", &data.shifts),
                ("Days", &data.days_schedule),
                ("Tags", &data.tags),
            ];
            for (title, values) in sections {
                if config.quiet {
                    values.iter().for_each(|v| println!("{}", v));
                } else {
                    println!("{}: {}", title, values.join(", "));
                }
            }
        }
        OutputFormat::Json => print_json(data),
    }
}

/// Prints the company size choices
pub fn print_company_sizes(sizes: &[CompanySizeResponse], config: &OutputConfig) {
    match config.format {
        OutputFormat::Human => {
            for size in sizes {
                if config.quiet {
                    println!("{}", size.value);
                } else {
                    println!("{:<8}  {}", size.value, size.label);
                }
            }
        }
        OutputFormat::Json => print_json(sizes),
    }
}

/// Prints a list of worker accounts in the specified format
pub fn print_worker_accounts(accounts: &[WorkerAccountResponse], config: &OutputConfig) {
    match config.format {
        OutputFormat::Human => {
            if accounts.is_empty() {
                if !config.quiet {
                    println!("No worker accounts found.");
                }
                return;
            }
            if config.quiet {
                for account in accounts {
                    println!("{}", account.username);
                }
                return;
            }
            let max_user = accounts.iter().map(|a| a.username.len()).max().unwrap_or(8).max(8);
            let max_prof = accounts.iter().map(|a| a.profession.len()).max().unwrap_or(10).max(10);
            println!(
                "{:<user_w$}  {:<prof_w$}  RATING  LOCATION",
                "USERNAME",
                "PROFESSION",
                user_w = max_user,
                prof_w = max_prof,
            );
            for account in accounts {
                println!(
                    "{:<user_w$}  {:<prof_w$}  {:<6}  {}",
                    account.username,
                    account.profession,
                    account.rating,
                    account.location,
                    user_w = max_user,
                    prof_w = max_prof,
                );
            }
        }
        OutputFormat::Json => print_json(accounts),
    }
}

/// Prints a single worker account in the specified format
pub fn print_worker_account(account: &WorkerAccountResponse, config: &OutputConfig) {
    match config.format {
        OutputFormat::Human => {
            if config.quiet {
                println!("{}", account.username);
                return;
            }
            println!("Username:   {}", account.username);
            println!("Name:       {} {}", account.first_name, account.last_name);
            println!("Profession: {}", account.profession);
            println!("Location:   {}", account.location);
            println!("Phone:      {}", account.phone);
            println!("Rating:     {} ({} reviews)", account.rating, account.review_count);
            println!("Jobs done:  {}", account.jobs_done);
            println!("Verified:   {}", account.verified_id);
            if !account.about.is_empty() {
                println!("About:      {}", account.about);
            }
        }
        OutputFormat::Json => print_json(account),
    }
}

/// Prints a list of employer accounts in the specified format
pub fn print_employer_accounts(accounts: &[EmployerAccountResponse], config: &OutputConfig) {
    match config.format {
        OutputFormat::Human => {
            if accounts.is_empty() {
                if !config.quiet {
                    println!("No employer accounts found.");
                }
                return;
            }
            if config.quiet {
                for account in accounts {
                    println!("{}", account.username);
                }
                return;
            }
            let max_user = accounts.iter().map(|a| a.username.len()).max().unwrap_or(8).max(8);
            let max_company = accounts.iter().map(|a| a.company_name.len()).max().unwrap_or(7).max(7);
            println!(
                "{:<user_w$}  {:<company_w$}  LOCATION",
                "USERNAME",
                "COMPANY",
                user_w = max_user,
                company_w = max_company,
            );
            for account in accounts {
                println!(
                    "{:<user_w$}  {:<company_w$}  {}",
                    account.username,
                    account.company_name,
                    account.location,
                    user_w = max_user,
                    company_w = max_company,
                );
            }
        }
        OutputFormat::Json => print_json(accounts),
    }
}

/// Prints a single employer account in the specified format
pub fn print_employer_account(account: &EmployerAccountResponse, config: &OutputConfig) {
    match config.format {
        OutputFormat::Human => {
            if config.quiet {
                println!("{}", account.username);
                return;
            }
            println!("Username:  {}", account.username);
            println!("Company:   {} ({})", account.company_name, account.legal_name);
            println!("Industry:  {}", account.industry);
            println!("Size:      {}", account.company_size);
            println!("Location:  {}", account.location);
            println!("Address:   {}", account.address);
            println!("Contact:   {} {}, {}", account.first_name, account.last_name, account.role);
            if !account.company_url.is_empty() {
                println!("Website:   {}", account.company_url);
            }
        }
        OutputFormat::Json => print_json(account),
    }
}

fn salary_range(job: &JobResponse) -> String {
    format!("{}-{} {}", job.min_salary, job.max_salary, job.period_salary)
}

/// Prints a list of job postings in the specified format
pub fn print_jobs(jobs: &[JobResponse], config: &OutputConfig) {
    match config.format {
        OutputFormat::Human => {
            if jobs.is_empty() {
                if !config.quiet {
                    println!("No jobs found.");
                }
                return;
            }
            if config.quiet {
                for job in jobs {
                    println!("{}", job.id);
                }
                return;
            }
            let max_id = jobs.iter().map(|j| j.id.len()).max().unwrap_or(2);
            let max_title = jobs.iter().map(|j| j.title.len()).max().unwrap_or(5).max(5);
            println!(
                "{:<id_w$}  {:<title_w$}  START       LOCATION  DONE",
                "ID",
                "TITLE",
                id_w = max_id,
                title_w = max_title,
            );
            for job in jobs {
                let done = if job.done { "yes" } else { "no" };
                println!(
                    "{:<id_w$}  {:<title_w$}  {}  {:<8}  {}",
                    job.id,
                    job.title,
                    job.start_date,
                    job.location,
                    done,
                    id_w = max_id,
                    title_w = max_title,
                );
            }
        }
        OutputFormat::Json => print_json(jobs),
    }
}

/// Prints a job posting with its applicants and workers
pub fn print_job(detail: &JobDetailResponse, config: &OutputConfig) {
    match config.format {
        OutputFormat::Human => {
            let job = &detail.job;
            if config.quiet {
                println!("{}", job.id);
                return;
            }
            println!("ID:         {}", job.id);
            println!("Title:      {}", job.title);
            println!("Employer:   {}", job.employer.as_deref().unwrap_or("-"));
            match job.end_date {
                Some(end) => println!("Dates:      {} to {}", job.start_date, end),
                None => println!("Dates:      from {}", job.start_date),
            }
            println!("Location:   {}", job.location);
            println!("Salary:     {}", salary_range(job));
            println!("Types:      {}", job.types.join(", "));
            println!("Shifts:     {}", job.shifts.join(", "));
            println!("Tags:       {}", job.tags.join(", "));
            println!("Done:       {}", job.done);
            println!("Applicants: {}", detail.applicants.join(", "));
            println!("Workers:    {}", detail.workers.join(", "));
        }
        OutputFormat::Json => print_json(detail),
    }
}
