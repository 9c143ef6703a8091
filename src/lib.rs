/// Jobmarket: A Job Marketplace Backend
///
/// This library provides the core functionality for a job marketplace where
/// workers and employers keep profiles, employers post jobs and draw up
/// contracts, and both sides leave feedback on each other.
///
/// ### Modules
///
/// - `auth`: Password hashing, sessions and request authentication
/// - `case`: snake_case to camelCase translation for error bodies
/// - `config`: Layered server configuration
/// - `db`: Database connection management
/// - `dto`: Request and response bodies
/// - `errors`: API errors and their JSON representation
/// - `extract`: JSON and multipart request extractors
/// - `handlers`: HTTP handlers
/// - `media`: Storage for uploaded photos and logos
/// - `models`: Data structures stored in the database
/// - `repo`: Repository layer for database operations
/// - `schema`: Database schema definitions
/// - `validators`: Field and file validation rules
///
/// ### Web API
///
/// The library exposes a RESTful API using Axum with the following endpoints:
///
/// - `GET /`: Links to the main entry points
/// - `GET /roles`, `GET /job-data`, `GET /company-sizes`: Field choices
/// - `POST /register`, `POST /login`, `POST /logout`, `GET /me`,
///   `PATCH /change-password`: Users and sessions
/// - `/worker-account` and `/employer-account`: List, create, replace,
///   patch and delete profiles; `/{username}` reads one and
///   `/{username}/feedback` lists the feedback it received
/// - `/jobs`: Job postings, applications, hiring, schedules and feedback
/// - `/contracts`: Contracts between an employer and workers

/// Authentication module
pub mod auth;

/// camelCase translation module
pub mod case;

/// Configuration module
pub mod config;

/// Database connection module
pub mod db;

/// Data transfer objects module
pub mod dto;

/// API error module
pub mod errors;

/// Request extractors module
pub mod extract;

/// HTTP handlers module
pub mod handlers;

/// Uploaded media module
pub mod media;

/// Data models module
pub mod models;

/// Repository module for database operations
pub mod repo;

/// Database schema module
pub mod schema;

/// Validation rules module
pub mod validators;

use anyhow::anyhow;
use axum::{
    Router,
    extract::{DefaultBodyLimit, FromRef},
    routing::{get, patch, post},
};
use diesel_migrations::{EmbeddedMigrations, MigrationHarness, embed_migrations};
use std::sync::Arc;
use tower_http::{cors::CorsLayer, services::ServeDir, trace::TraceLayer};
use tracing::info;

use handlers::*;

/// Largest request body accepted, leaving room for a few images per form
const MAX_BODY_BYTES: usize = 10 * 1024 * 1024;

/// Embedded database migrations
pub const MIGRATIONS: EmbeddedMigrations = embed_migrations!("migrations");

/// Shared state handed to every handler
#[derive(Clone)]
pub struct AppState {
    pub pool: Arc<db::DbPool>,
    pub media: Arc<media::MediaStorage>,
}

impl FromRef<AppState> for Arc<db::DbPool> {
    fn from_ref(state: &AppState) -> Self {
        state.pool.clone()
    }
}

impl FromRef<AppState> for Arc<media::MediaStorage> {
    fn from_ref(state: &AppState) -> Self {
        state.media.clone()
    }
}

/// This function sets up the Axum router with all the API endpoints.
///
/// ### Arguments
///
/// * `state` - The database pool and media storage shared with all handlers
///
/// ### Returns
///
/// An Axum Router configured with all routes, the media file service and
/// the shared state
pub fn create_app(state: AppState) -> Router {
    let media_mount = format!("/{}", state.media.url_prefix().trim_matches('/'));
    let media_files = ServeDir::new(state.media.root());

    let router = Router::new()
        // Metadata
        .route("/", get(api_root_handler))
        .route("/roles", get(list_roles_handler))
        .route("/job-data", get(job_data_handler))
        .route("/company-sizes", get(company_sizes_handler))
        // Users and sessions
        .route("/register", post(register_handler))
        .route("/login", post(login_handler))
        .route("/logout", post(logout_handler))
        .route("/me", get(me_handler))
        .route("/change-password", patch(change_password_handler))
        // Worker accounts
        .route(
            "/worker-account",
            get(list_worker_accounts_handler)
                .post(create_worker_account_handler)
                .put(update_worker_account_handler)
                .patch(patch_worker_account_handler)
                .delete(delete_worker_account_handler),
        )
        .route("/worker-account/{username}", get(get_worker_account_handler))
        .route("/worker-account/{username}/feedback", get(list_worker_feedback_handler))
        // Employer accounts
        .route(
            "/employer-account",
            get(list_employer_accounts_handler)
                .post(create_employer_account_handler)
                .put(update_employer_account_handler)
                .patch(patch_employer_account_handler)
                .delete(delete_employer_account_handler),
        )
        .route("/employer-account/{username}", get(get_employer_account_handler))
        .route("/employer-account/{username}/feedback", get(list_employer_feedback_handler))
        // Jobs
        .route("/jobs", get(list_jobs_handler).post(create_job_handler))
        .route(
            "/jobs/{id}",
            get(get_job_handler).patch(patch_job_handler).delete(delete_job_handler),
        )
        .route("/jobs/{id}/apply", post(apply_to_job_handler))
        .route("/jobs/{id}/workers", post(hire_worker_handler))
        .route(
            "/jobs/{id}/schedules",
            get(list_work_schedules_handler).post(add_work_schedule_handler),
        )
        .route("/jobs/{id}/worker-feedback", post(create_worker_feedback_handler))
        .route("/jobs/{id}/employer-feedback", post(create_employer_feedback_handler))
        // Contracts
        .route("/contracts", post(create_contract_handler))
        .route("/contracts/{id}", get(get_contract_handler))
        .route("/contracts/{id}/status", patch(update_contract_status_handler));

    // Media can't be nested at the root without shadowing the API
    let router = if media_mount == "/" {
        router
    } else {
        router.nest_service(&media_mount, media_files)
    };

    router
        .layer(DefaultBodyLimit::max(MAX_BODY_BYTES))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::very_permissive())
        .with_state(state)
}

/// Runs the embedded migrations
///
/// This function applies all pending database migrations, creating the
/// schema and seeding the lookup tables.
///
/// ### Arguments
///
/// * `conn` - A mutable reference to a SQLite connection
///
/// ### Errors
///
/// Returns an error if any migration fails to apply
pub fn run_migrations(conn: &mut diesel::SqliteConnection) -> anyhow::Result<()> {
    let applied = conn
        .run_pending_migrations(MIGRATIONS)
        .map_err(|e| anyhow!("Failed to run migrations: {}", e))?;
    info!("Applied {} pending migrations", applied.len());
    Ok(())
}
