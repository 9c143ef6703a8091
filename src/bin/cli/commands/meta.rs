use crate::client::JobmarketClient;
use crate::output::{self, OutputConfig};

/// Prints the profession names workers can pick from
pub async fn roles(client: &JobmarketClient, config: &OutputConfig) -> Result<(), Box<dyn std::error::Error>> {
    let roles = client.list_roles().await?;
    output::print_names(&roles, "No professions found.", config);
    Ok(())
}

/// Prints the choices for job types, shifts, days and tags
pub async fn job_data(client: &JobmarketClient, config: &OutputConfig) -> Result<(), Box<dyn std::error::Error>> {
    let data = client.job_data().await?;
    output::print_job_data(&data, config);
    Ok(())
}

/// Prints the company size choices
pub async fn company_sizes(client: &JobmarketClient, config: &OutputConfig) -> Result<(), Box<dyn std::error::Error>> {
    let sizes = client.company_sizes().await?;
    output::print_company_sizes(&sizes, config);
    Ok(())
}
