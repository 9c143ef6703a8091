/// Integration tests for worker accounts
///
/// This file contains tests for:
/// - Creating worker accounts from JSON and multipart bodies
/// - Validation of required fields, professions, ages and photos
/// - Replacing, patching and deleting the caller's account
/// - Listing and filtering accounts

use axum::http::StatusCode;
use serde_json::json;
use tower::ServiceExt;

mod common;
use common::*;

/// Tests creating a worker account from a JSON body
///
/// This test verifies:
/// 1. POST /worker-account returns 201 with camelCase keys
/// 2. Server-managed fields start at their defaults
/// 3. The user's `hasWorkerAccount` flag is set
#[tokio::test]
async fn test_create_worker_account() {
    let app = create_test_app();
    let auth = register_user(&app, "janez").await;

    let (status, body) = app.json("POST", "/worker-account", Some(&auth), worker_payload()).await;

    assert_eq!(status, StatusCode::CREATED, "{}", body);
    assert_eq!(body["username"], "janez");
    assert_eq!(body["profession"], "Painter");
    assert_eq!(body["firstName"], "John");
    assert_eq!(body["lastName"], "Doe");
    assert_eq!(body["birthdate"], "1990-05-17");
    assert_eq!(body["drivingLicense"], true);
    assert_eq!(body["rating"], 0);
    assert_eq!(body["verifiedId"], false);
    assert_eq!(body["reviewCount"], 0);
    assert_eq!(body["jobsDone"], 0);
    assert!(body["photo"].is_null());
    assert!(body.get("first_name").is_none());

    let me = app.send(json_request("GET", "/me", Some(&auth), &json!(null))).await.1;
    assert_eq!(me["hasWorkerAccount"], true);

    let (status, fetched) = app.get("/worker-account/janez").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(fetched, body);
}

/// Tests that clients can't set rating or verification
#[tokio::test]
async fn test_create_ignores_server_fields() {
    let app = create_test_app();
    let auth = register_user(&app, "janez").await;

    let mut payload = worker_payload();
    payload["rating"] = json!(5);
    payload["verifiedId"] = json!(true);
    let (status, body) = app.json("POST", "/worker-account", Some(&auth), payload).await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["rating"], 0);
    assert_eq!(body["verifiedId"], false);
}

/// Tests that a second worker account for the same user is rejected
#[tokio::test]
async fn test_create_worker_account_twice() {
    let app = create_test_app();
    let auth = create_worker(&app, "janez").await;

    let (status, body) = app.json("POST", "/worker-account", Some(&auth), worker_payload()).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["errors"]["code"], "account_exists");
}

/// Tests that anonymous callers can't create accounts
#[tokio::test]
async fn test_create_worker_account_requires_auth() {
    let app = create_test_app();

    let (status, _) = app.json("POST", "/worker-account", None, worker_payload()).await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

/// Tests the errors for missing and invalid fields
///
/// This test verifies:
/// 1. Missing required fields are reported under their camelCase names
/// 2. An unknown profession is reported as does_not_exist
/// 3. No account is created
#[tokio::test]
async fn test_create_worker_account_validation() {
    let app = create_test_app();
    let auth = register_user(&app, "janez").await;

    let (status, body) = app
        .json("POST", "/worker-account", Some(&auth), json!({"profession": "Astronaut", "phone": "123"}))
        .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["firstName"]["code"], "required");
    assert_eq!(body["firstName"]["detail"], "This field is required.");
    assert_eq!(body["lastName"]["code"], "required");
    assert_eq!(body["birthdate"]["code"], "required");
    assert_eq!(body["location"]["code"], "required");
    assert_eq!(body["profession"]["code"], "does_not_exist");
    assert_eq!(body["profession"]["detail"], "Object with name=Astronaut does not exist.");
    assert!(body.get("phone").is_some());

    let (status, _) = app.get("/worker-account/janez").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

/// Tests that workers must be between 18 and 80 years old
#[tokio::test]
async fn test_create_worker_account_age_limits() {
    let app = create_test_app();
    let auth = register_user(&app, "janez").await;
    let today = chrono::Utc::now().date_naive();

    for years in [10, 90] {
        let mut payload = worker_payload();
        let birthdate = today.with_year_offset(-years);
        payload["birthdate"] = json!(birthdate.to_string());

        let (status, body) = app.json("POST", "/worker-account", Some(&auth), payload).await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "age {} accepted", years);
        assert!(body.get("birthdate").is_some());
    }
}

trait YearOffset {
    fn with_year_offset(self, years: i32) -> Self;
}

impl YearOffset for chrono::NaiveDate {
    fn with_year_offset(self, years: i32) -> Self {
        use chrono::Datelike;
        chrono::NaiveDate::from_ymd_opt(self.year() + years, self.month(), 1).unwrap()
    }
}

/// Tests creating a worker account from a multipart form with a photo
///
/// This test verifies:
/// 1. Text parts are parsed like JSON fields
/// 2. The photo is stored under the user's media directory
/// 3. The photo is served back at the returned URL
#[tokio::test]
async fn test_create_worker_account_with_photo() {
    let app = create_test_app();
    let auth = register_user(&app, "janez").await;
    let png = png_bytes();

    let request = multipart_request(
        "POST",
        "/worker-account",
        Some(&auth),
        &[
            Part::Text("profession", "Painter"),
            Part::Text("firstName", "John"),
            Part::Text("lastName", "Doe"),
            Part::Text("birthdate", "1990-05-17"),
            Part::Text("phone", "38640123456789"),
            Part::Text("location", "Ljubljana"),
            Part::Text("drivingLicense", "true"),
            Part::File("photo", "me.png", &png),
        ],
    );
    let (status, body) = app.send(request).await;

    assert_eq!(status, StatusCode::CREATED, "{}", body);
    assert_eq!(body["drivingLicense"], true);
    let photo = body["photo"].as_str().unwrap().to_string();
    assert!(photo.starts_with("/media/jobmarket/user_"), "got {}", photo);
    assert!(photo.ends_with(".png"));

    let relative = photo.trim_start_matches("/media/");
    assert!(app.media_dir.path().join(relative).exists());

    let request = axum::http::Request::builder().uri(&photo).body(axum::body::Body::empty()).unwrap();
    let response = app.router.clone().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let served = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
    assert_eq!(&served[..], &png[..]);
}

/// Tests that files other than JPEG and PNG images are rejected
#[tokio::test]
async fn test_photo_content_type_rejected() {
    let app = create_test_app();
    let auth = register_user(&app, "janez").await;

    let request = multipart_request(
        "POST",
        "/worker-account",
        Some(&auth),
        &[
            Part::Text("profession", "Painter"),
            Part::Text("firstName", "John"),
            Part::Text("lastName", "Doe"),
            Part::Text("birthdate", "1990-05-17"),
            Part::Text("phone", "38640123456789"),
            Part::Text("location", "Ljubljana"),
            Part::File("photo", "notes.txt", b"just some text"),
        ],
    );
    let (status, body) = app.send(request).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["photo"]["code"], "content_type");
    assert_eq!(body["photo"]["detail"], "File of type text/plain are not supported.");
}

/// Tests that photos over 3 MB are rejected
#[tokio::test]
async fn test_photo_size_rejected() {
    let app = create_test_app();
    let auth = create_worker(&app, "janez").await;

    let mut big = png_bytes();
    big.resize(3 * 1024 * 1024 + 1, 0);
    let request = multipart_request("PATCH", "/worker-account", Some(&auth), &[Part::File("photo", "big.png", &big)]);
    let (status, body) = app.send(request).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["photo"]["code"], "max_size");
}

/// Tests that PUT requires every required field
#[tokio::test]
async fn test_put_requires_all_fields() {
    let app = create_test_app();
    let auth = create_worker(&app, "janez").await;

    let (status, body) = app
        .json("PUT", "/worker-account", Some(&auth), json!({"location": "Celje"}))
        .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["firstName"]["code"], "required");

    let (_, fetched) = app.get("/worker-account/janez").await;
    assert_eq!(fetched["location"], "Ljubljana");
}

/// Tests replacing the account with PUT
#[tokio::test]
async fn test_put_worker_account() {
    let app = create_test_app();
    let auth = create_worker(&app, "janez").await;

    let mut payload = worker_payload();
    payload["profession"] = json!("Electrician");
    payload["firstName"] = json!("Johnny");
    payload["location"] = json!("Celje");
    let (status, body) = app.json("PUT", "/worker-account", Some(&auth), payload).await;

    assert_eq!(status, StatusCode::OK, "{}", body);
    assert_eq!(body["profession"], "Electrician");
    assert_eq!(body["firstName"], "Johnny");
    assert_eq!(body["location"], "Celje");
}

/// Tests that PATCH changes only the given fields
#[tokio::test]
async fn test_patch_worker_account() {
    let app = create_test_app();
    let auth = create_worker(&app, "janez").await;
    let (_, before) = app.get("/worker-account/janez").await;

    let (status, body) = app
        .json("PATCH", "/worker-account", Some(&auth), json!({"location": "Koper", "about": "Also wallpaper"}))
        .await;

    assert_eq!(status, StatusCode::OK, "{}", body);
    assert_eq!(body["location"], "Koper");
    assert_eq!(body["about"], "Also wallpaper");
    assert_eq!(body["firstName"], before["firstName"]);
    assert_eq!(body["phone"], before["phone"]);
}

/// Tests that updating without an account is a 404
#[tokio::test]
async fn test_patch_without_account() {
    let app = create_test_app();
    let auth = register_user(&app, "janez").await;

    let (status, _) = app.json("PATCH", "/worker-account", Some(&auth), json!({"location": "Koper"})).await;

    assert_eq!(status, StatusCode::NOT_FOUND);
}

/// Tests deleting the caller's worker account
///
/// This test verifies:
/// 1. DELETE /worker-account returns 204
/// 2. The account and its photo are gone
/// 3. `hasWorkerAccount` is cleared
/// 4. Deleting again is a 404
#[tokio::test]
async fn test_delete_worker_account() {
    let app = create_test_app();
    let auth = register_user(&app, "janez").await;
    let png = png_bytes();

    let request = multipart_request(
        "POST",
        "/worker-account",
        Some(&auth),
        &[
            Part::Text("profession", "Painter"),
            Part::Text("firstName", "John"),
            Part::Text("lastName", "Doe"),
            Part::Text("birthdate", "1990-05-17"),
            Part::Text("phone", "38640123456789"),
            Part::Text("location", "Ljubljana"),
            Part::File("photo", "me.png", &png),
        ],
    );
    let (status, body) = app.send(request).await;
    assert_eq!(status, StatusCode::CREATED);
    let photo_path = app
        .media_dir
        .path()
        .join(body["photo"].as_str().unwrap().trim_start_matches("/media/"));
    assert!(photo_path.exists());

    let (status, _) = app.json("DELETE", "/worker-account", Some(&auth), json!(null)).await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    assert!(!photo_path.exists());
    let (status, _) = app.get("/worker-account/janez").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    let me = app.send(json_request("GET", "/me", Some(&auth), &json!(null))).await.1;
    assert_eq!(me["hasWorkerAccount"], false);

    let (status, _) = app.json("DELETE", "/worker-account", Some(&auth), json!(null)).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

/// Tests listing worker accounts with profession and location filters
#[tokio::test]
async fn test_list_worker_accounts_filters() {
    let app = create_test_app();
    create_worker(&app, "ana").await;
    let auth = create_worker(&app, "bor").await;
    app.json(
        "PATCH",
        "/worker-account",
        Some(&auth),
        json!({"profession": "Electrician", "location": "Koper"}),
    )
    .await;

    let (status, all) = app.get("/worker-account").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(all.as_array().unwrap().len(), 2);

    let (_, painters) = app.get("/worker-account?profession=Painter").await;
    let painters = painters.as_array().unwrap();
    assert_eq!(painters.len(), 1);
    assert_eq!(painters[0]["username"], "ana");

    let (_, both) = app.get("/worker-account?profession=Painter&profession=Electrician").await;
    assert_eq!(both.as_array().unwrap().len(), 2);

    let (_, in_koper) = app.get("/worker-account?location=Koper").await;
    let in_koper = in_koper.as_array().unwrap();
    assert_eq!(in_koper.len(), 1);
    assert_eq!(in_koper[0]["username"], "bor");
}

/// Tests that `%` and `_` in the location filter match only themselves
#[tokio::test]
async fn test_location_filter_is_literal() {
    let app = create_test_app();
    create_worker(&app, "ana").await;

    let (status, any) = app.get("/worker-account?location=%25").await;
    assert_eq!(status, StatusCode::OK);
    assert!(any.as_array().unwrap().is_empty());

    let (_, underscore) = app.get("/worker-account?location=Ljub_jana").await;
    assert!(underscore.as_array().unwrap().is_empty());

    let (_, literal) = app.get("/worker-account?location=jublj").await;
    assert_eq!(literal.as_array().unwrap().len(), 1);
}
