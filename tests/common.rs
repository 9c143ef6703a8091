//! Common test utilities for jobmarket integration tests
//!
//! This file contains shared functions and utilities for all integration tests,
//! including test application setup, helpers for registering users and creating
//! accounts and jobs through the API, and request builders.

#![allow(dead_code)]

use axum::{
    Router,
    body::{Body, to_bytes},
    http::{Request, StatusCode, header},
};
use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use chrono::{Duration, Utc};
use jobmarket::{AppState, create_app, db::init_pool, media::MediaStorage};
use serde_json::{Value, json};
use std::sync::Arc;
use tempfile::TempDir;
use tower::ServiceExt;

/// Password used for every user registered by the helpers
pub const PASSWORD: &str = "secret123";

/// A running test application and the directory its uploads go to
///
/// The media directory is removed when the TestApp is dropped.
pub struct TestApp {
    pub router: Router,
    pub media_dir: TempDir,
}

/// Creates a test application with an in-memory SQLite database
///
/// This helper function:
/// 1. Creates a shared-cache in-memory SQLite database unique to the test
/// 2. Runs migrations to set up the schema and lookup data
/// 3. Points media storage at a fresh temporary directory
///
/// ### Returns
///
/// A TestApp whose router is configured with all routes
pub fn create_test_app() -> TestApp {
    // Every pooled connection must see the same in-memory database
    let database_url = format!("file:test_{}?mode=memory&cache=shared", uuid::Uuid::new_v4());
    let pool = init_pool(&database_url).unwrap();

    let conn = &mut pool.get().unwrap();
    jobmarket::run_migrations(conn).unwrap();

    let media_dir = tempfile::tempdir().unwrap();
    let state = AppState {
        pool: Arc::new(pool),
        media: Arc::new(MediaStorage::new(media_dir.path(), "/media/")),
    };

    TestApp {
        router: create_app(state),
        media_dir,
    }
}

impl TestApp {
    /// Sends a request and returns the status and the parsed JSON body
    ///
    /// Empty bodies (e.g. 204 responses) come back as `Value::Null`.
    pub async fn send(&self, request: Request<Body>) -> (StatusCode, Value) {
        let response = self.router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let value = if body.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&body).unwrap()
        };
        (status, value)
    }

    /// Sends a GET request without credentials
    pub async fn get(&self, uri: &str) -> (StatusCode, Value) {
        self.send(Request::builder().uri(uri).body(Body::empty()).unwrap()).await
    }

    /// Sends a JSON request, authenticated when `auth` is given
    pub async fn json(&self, method: &str, uri: &str, auth: Option<&str>, body: Value) -> (StatusCode, Value) {
        self.send(json_request(method, uri, auth, &body)).await
    }
}

/// Builds the value of an `Authorization: Basic` header
pub fn basic_auth(username: &str, password: &str) -> String {
    format!("Basic {}", STANDARD.encode(format!("{}:{}", username, password)))
}

/// Builds a JSON request
pub fn json_request(method: &str, uri: &str, auth: Option<&str>, body: &Value) -> Request<Body> {
    let mut builder = Request::builder()
        .uri(uri)
        .method(method)
        .header(header::CONTENT_TYPE, "application/json");
    if let Some(auth) = auth {
        builder = builder.header(header::AUTHORIZATION, auth);
    }
    builder.body(Body::from(serde_json::to_vec(body).unwrap())).unwrap()
}

/// A part of a multipart form
pub enum Part<'a> {
    Text(&'a str, &'a str),
    File(&'a str, &'a str, &'a [u8]),
}

const BOUNDARY: &str = "jobmarket-test-boundary";

/// Builds a multipart/form-data request
pub fn multipart_request(method: &str, uri: &str, auth: Option<&str>, parts: &[Part<'_>]) -> Request<Body> {
    let mut body: Vec<u8> = Vec::new();
    for part in parts {
        body.extend_from_slice(format!("--{}\r\n", BOUNDARY).as_bytes());
        match part {
            Part::Text(name, value) => {
                body.extend_from_slice(format!("Content-Disposition: form-data; name=\"{}\"\r\n\r\n", name).as_bytes());
                body.extend_from_slice(value.as_bytes());
            }
            Part::File(name, file_name, bytes) => {
                body.extend_from_slice(
                    format!(
                        "Content-Disposition: form-data; name=\"{}\"; filename=\"{}\"\r\nContent-Type: application/octet-stream\r\n\r\n",
                        name, file_name
                    )
                    .as_bytes(),
                );
                body.extend_from_slice(bytes);
            }
        }
        body.extend_from_slice(b"\r\n");
    }
    body.extend_from_slice(format!("--{}--\r\n", BOUNDARY).as_bytes());

    let mut builder = Request::builder()
        .uri(uri)
        .method(method)
        .header(header::CONTENT_TYPE, format!("multipart/form-data; boundary={}", BOUNDARY));
    if let Some(auth) = auth {
        builder = builder.header(header::AUTHORIZATION, auth);
    }
    builder.body(Body::from(body)).unwrap()
}

/// The smallest bytes that sniff as a PNG image
pub fn png_bytes() -> Vec<u8> {
    let mut bytes = vec![0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A];
    bytes.extend_from_slice(&[0u8; 32]);
    bytes
}

/// Registers a user via the API and returns its Basic auth header
///
/// The email is `<username>@example.com`.
pub async fn register_user(app: &TestApp, username: &str) -> String {
    let (status, body) = app
        .json(
            "POST",
            "/register",
            None,
            json!({
                "email": format!("{}@example.com", username),
                "username": username,
                "password": PASSWORD,
                "confirmation": PASSWORD,
            }),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED, "register failed: {}", body);
    assert_eq!(body["username"], username);

    basic_auth(username, PASSWORD)
}

/// A complete worker account body
pub fn worker_payload() -> Value {
    json!({
        "profession": "Painter",
        "firstName": "John",
        "lastName": "Doe",
        "birthdate": "1990-05-17",
        "phone": "38640123456789",
        "location": "Ljubljana",
        "about": "Interior and exterior painting",
        "drivingLicense": true,
    })
}

/// A complete employer account body
pub fn employer_payload() -> Value {
    json!({
        "companyName": "Acme",
        "address": "Main Street 1",
        "legalName": "Acme d.o.o.",
        "industry": "Construction",
        "companySize": "small",
        "location": "Maribor",
        "companyUrl": "https://acme.example.com",
        "description": "We build things",
        "role": "Owner",
        "firstName": "Jane",
        "lastName": "Smith",
        "phone": "38640987654321",
    })
}

/// A complete job body starting tomorrow
pub fn job_payload(title: &str) -> Value {
    let tomorrow = (Utc::now() + Duration::days(1)).date_naive();
    json!({
        "title": title,
        "startDate": tomorrow.to_string(),
        "description": "Repaint the office",
        "location": "Koper",
        "types": ["Part-Time"],
        "shifts": ["Day Shift"],
        "responsibilities": ["Painting"],
        "minSalary": 10.0,
        "maxSalary": 20.0,
        "periodSalary": "hour",
        "applicationInstructions": "Apply through the site",
        "tags": ["Temporary"],
    })
}

/// Registers a user with a worker account and returns its auth header
pub async fn create_worker(app: &TestApp, username: &str) -> String {
    let auth = register_user(app, username).await;
    let (status, body) = app.json("POST", "/worker-account", Some(&auth), worker_payload()).await;
    assert_eq!(status, StatusCode::CREATED, "worker account failed: {}", body);
    auth
}

/// Registers a user with an employer account and returns its auth header
pub async fn create_employer(app: &TestApp, username: &str) -> String {
    let auth = register_user(app, username).await;
    let (status, body) = app.json("POST", "/employer-account", Some(&auth), employer_payload()).await;
    assert_eq!(status, StatusCode::CREATED, "employer account failed: {}", body);
    auth
}

/// Posts a job as the given employer and returns its id
pub async fn create_job(app: &TestApp, employer_auth: &str, title: &str) -> String {
    let (status, body) = app.json("POST", "/jobs", Some(employer_auth), job_payload(title)).await;
    assert_eq!(status, StatusCode::CREATED, "job failed: {}", body);
    body["id"].as_str().unwrap().to_string()
}
