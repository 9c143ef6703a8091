use jobmarket::dto::{
    CompanySizeResponse, EmployerAccountResponse, JobDataResponse, JobDetailResponse, JobResponse,
    WorkerAccountResponse,
};
use reqwest::{Client, StatusCode};
use serde::de::DeserializeOwned;

/// Error type for CLI client operations
#[derive(Debug)]
pub enum ClientError {
    /// Server returned an error status with a message body
    Server { status: StatusCode, message: String },
    /// Network/connection/request error
    Request(reqwest::Error),
}

impl std::fmt::Display for ClientError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ClientError::Server { status, message } => {
                write!(f, "Server error ({}): {}", status.as_u16(), message)
            }
            ClientError::Request(err) => write!(f, "{}", err),
        }
    }
}

impl std::error::Error for ClientError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ClientError::Request(err) => Some(err),
            ClientError::Server { .. } => None,
        }
    }
}

/// Pulls the `detail` messages out of an error body
///
/// Error bodies map a field name (or `errors`/`error`) to
/// `{type, code, detail}`.
fn error_message(body: &serde_json::Value) -> Option<String> {
    let entries = body.as_object()?;
    let messages: Vec<String> = entries
        .iter()
        .filter_map(|(field, entry)| {
            let detail = entry.get("detail")?.as_str()?;
            Some(match field.as_str() {
                "error" | "errors" => detail.to_string(),
                _ => format!("{}: {}", field, detail),
            })
        })
        .collect();
    (!messages.is_empty()).then(|| messages.join("; "))
}

/// Extension trait for checking HTTP responses and extracting server error messages
trait ResponseExt {
    /// Checks for error status and extracts the server's error message body
    async fn check(self) -> Result<reqwest::Response, ClientError>;
}

impl ResponseExt for reqwest::Response {
    async fn check(self) -> Result<reqwest::Response, ClientError> {
        if self.status().is_success() {
            return Ok(self);
        }
        let status = self.status();
        let message = match self.json::<serde_json::Value>().await {
            Ok(body) => error_message(&body).unwrap_or_else(|| "Unknown error".to_string()),
            Err(_) => format!("HTTP {}", status),
        };
        Err(ClientError::Server { status, message })
    }
}

/// Filters for listing jobs
#[derive(Debug, Default, Clone)]
pub struct JobListFilter {
    pub job_types: Vec<String>,
    pub shifts: Vec<String>,
    pub tags: Vec<String>,
    pub location: Option<String>,
    pub done: Option<bool>,
}

impl JobListFilter {
    fn query_params(&self) -> Vec<(&'static str, String)> {
        let mut params: Vec<(&'static str, String)> = Vec::new();
        params.extend(self.job_types.iter().map(|t| ("type", t.clone())));
        params.extend(self.shifts.iter().map(|s| ("shift", s.clone())));
        params.extend(self.tags.iter().map(|t| ("tag", t.clone())));
        if let Some(ref location) = self.location {
            params.push(("location", location.clone()));
        }
        if let Some(done) = self.done {
            params.push(("done", done.to_string()));
        }
        params
    }
}

/// HTTP client wrapper for communicating with the jobmarket server
pub struct JobmarketClient {
    /// The base URL of the server (e.g. "http://localhost:8000")
    base_url: String,
    /// The underlying HTTP client
    client: Client,
}

impl JobmarketClient {
    /// Creates a new JobmarketClient
    ///
    /// ### Arguments
    ///
    /// * `base_url` - The base URL of the jobmarket server
    pub fn new(base_url: String) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            client: Client::new(),
        }
    }

    async fn get_json<T: DeserializeOwned>(&self, path: &str, params: &[(&str, String)]) -> Result<T, ClientError> {
        let url = format!("{}{}", self.base_url, path);
        let response = self.client.get(&url).query(params).send().await.map_err(ClientError::Request)?.check().await?;
        response.json().await.map_err(ClientError::Request)
    }

    /// Like `get_json`, but a 404 becomes `None`
    async fn get_optional<T: DeserializeOwned>(&self, path: &str) -> Result<Option<T>, ClientError> {
        match self.get_json(path, &[]).await {
            Ok(value) => Ok(Some(value)),
            Err(ClientError::Server { status: StatusCode::NOT_FOUND, .. }) => Ok(None),
            Err(e) => Err(e),
        }
    }

    // ── Metadata endpoints ───────────────────────────────────────────

    /// Lists profession names
    pub async fn list_roles(&self) -> Result<Vec<String>, ClientError> {
        self.get_json("/roles", &[]).await
    }

    /// Gets the choices for job posting fields
    pub async fn job_data(&self) -> Result<JobDataResponse, ClientError> {
        self.get_json("/job-data", &[]).await
    }

    /// Lists company size choices
    pub async fn company_sizes(&self) -> Result<Vec<CompanySizeResponse>, ClientError> {
        self.get_json("/company-sizes", &[]).await
    }

    // ── Account endpoints ────────────────────────────────────────────

    /// Lists worker accounts, optionally filtered by profession and location
    pub async fn list_worker_accounts(
        &self,
        professions: &[String],
        location: Option<&str>,
    ) -> Result<Vec<WorkerAccountResponse>, ClientError> {
        let mut params: Vec<(&str, String)> = professions.iter().map(|p| ("profession", p.clone())).collect();
        if let Some(location) = location {
            params.push(("location", location.to_string()));
        }
        self.get_json("/worker-account", &params).await
    }

    /// Gets the worker account of a user
    pub async fn get_worker_account(&self, username: &str) -> Result<Option<WorkerAccountResponse>, ClientError> {
        self.get_optional(&format!("/worker-account/{}", username)).await
    }

    /// Lists employer accounts, optionally filtered by location
    pub async fn list_employer_accounts(&self, location: Option<&str>) -> Result<Vec<EmployerAccountResponse>, ClientError> {
        let params: Vec<(&str, String)> = location.map(|l| ("location", l.to_string())).into_iter().collect();
        self.get_json("/employer-account", &params).await
    }

    /// Gets the employer account of a user
    pub async fn get_employer_account(&self, username: &str) -> Result<Option<EmployerAccountResponse>, ClientError> {
        self.get_optional(&format!("/employer-account/{}", username)).await
    }

    // ── Job endpoints ────────────────────────────────────────────────

    /// Lists job postings matching the filter
    pub async fn list_jobs(&self, filter: &JobListFilter) -> Result<Vec<JobResponse>, ClientError> {
        self.get_json("/jobs", &filter.query_params()).await
    }

    /// Gets a job posting with its applicants and workers
    pub async fn get_job(&self, id: &str) -> Result<Option<JobDetailResponse>, ClientError> {
        self.get_optional(&format!("/jobs/{}", id)).await
    }
}
