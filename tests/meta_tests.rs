/// Integration tests for the metadata endpoints
///
/// This file contains tests for the API root and the read-only field
/// choices: professions, job data and company sizes.

use axum::http::StatusCode;
use jobmarket::validators::{JOB_TYPES, SCHEDULE, SHIFTS, TAGS};

mod common;
use common::*;

/// Tests that the API root links to the main endpoints
#[tokio::test]
async fn test_api_root_links() {
    let app = create_test_app();

    let (status, body) = app.get("/").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["roles"], "/roles");
    assert_eq!(body["job-data"], "/job-data");
    assert_eq!(body["worker-account"], "/worker-account");
    assert_eq!(body["employer-account"], "/employer-account");
}

/// Tests that /roles lists the seeded professions alphabetically
#[tokio::test]
async fn test_roles_sorted() {
    let app = create_test_app();

    let (status, body) = app.get("/roles").await;

    assert_eq!(status, StatusCode::OK);
    let roles: Vec<String> = serde_json::from_value(body).unwrap();
    assert!(roles.contains(&"Painter".to_string()));
    assert!(roles.contains(&"Electrician".to_string()));

    let mut sorted = roles.clone();
    sorted.sort();
    assert_eq!(roles, sorted);
}

/// Tests that /job-data returns the choices with snake_case keys
///
/// This test verifies:
/// 1. The keys are job_types, shifts, days_schedule and tags
/// 2. Each list holds exactly the accepted values
#[tokio::test]
async fn test_job_data() {
    let app = create_test_app();

    let (status, body) = app.get("/job-data").await;

    assert_eq!(status, StatusCode::OK);
    let as_vec = |key: &str| -> Vec<String> { serde_json::from_value(body[key].clone()).unwrap() };
    assert_eq!(as_vec("job_types"), JOB_TYPES.iter().map(|s| s.to_string()).collect::<Vec<_>>());
    assert_eq!(as_vec("shifts"), SHIFTS.iter().map(|s| s.to_string()).collect::<Vec<_>>());
    assert_eq!(as_vec("days_schedule"), SCHEDULE.iter().map(|s| s.to_string()).collect::<Vec<_>>());
    assert_eq!(as_vec("tags"), TAGS.iter().map(|s| s.to_string()).collect::<Vec<_>>());
    assert!(body.get("jobTypes").is_none());
}

/// Tests that /company-sizes lists value and label pairs
#[tokio::test]
async fn test_company_sizes() {
    let app = create_test_app();

    let (status, body) = app.get("/company-sizes").await;

    assert_eq!(status, StatusCode::OK);
    let sizes = body.as_array().unwrap();
    assert_eq!(sizes.len(), 5);
    assert!(sizes.iter().any(|s| s["value"] == "small" && s["label"] == "10 to 50 employees"));
}
