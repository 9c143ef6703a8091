/// Integration tests for registration, login and sessions
///
/// This file contains tests for:
/// - Registering users and the rules on emails, usernames and passwords
/// - Logging in by username or email
/// - Session cookies, logout and `/me`
/// - Changing passwords

use axum::{
    body::Body,
    http::{Request, StatusCode, header},
};
use serde_json::json;
use tower::ServiceExt;

mod common;
use common::*;

/// Pulls the `sessionid=<token>` pair out of a response's Set-Cookie headers
fn session_cookie(response: &axum::response::Response) -> Option<String> {
    response
        .headers()
        .get_all(header::SET_COOKIE)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .find(|v| v.starts_with("sessionid="))
        .and_then(|v| v.split(';').next())
        .map(str::to_string)
}

fn me_request(cookie: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder().uri("/me");
    if let Some(cookie) = cookie {
        builder = builder.header(header::COOKIE, cookie);
    }
    builder.body(Body::empty()).unwrap()
}

/// Tests that registering logs the user in through a session cookie
///
/// This test verifies:
/// 1. POST /register returns 201 with the user in camelCase
/// 2. A `sessionid` cookie is set
/// 3. GET /me with that cookie reports the user as authenticated
#[tokio::test]
async fn test_register_starts_session() {
    let app = create_test_app();

    let request = json_request(
        "POST",
        "/register",
        None,
        &json!({
            "email": "ana@example.com",
            "username": "ana",
            "password": PASSWORD,
            "confirmation": PASSWORD,
        }),
    );
    let response = app.router.clone().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);
    let cookie = session_cookie(&response).expect("session cookie");

    let (status, me) = app.send(me_request(Some(&cookie))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(me["authenticated"], true);
    assert_eq!(me["username"], "ana");
    assert_eq!(me["hasWorkerAccount"], false);
    assert_eq!(me["hasEmployerAccount"], false);
}

/// Tests that anonymous callers get `authenticated: false` from /me
#[tokio::test]
async fn test_me_anonymous() {
    let app = create_test_app();

    let (status, me) = app.send(me_request(None)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(me["authenticated"], false);
    assert!(me["username"].is_null());
}

/// Tests that an unknown session token counts as anonymous
#[tokio::test]
async fn test_unknown_session_is_anonymous() {
    let app = create_test_app();

    let (status, me) = app.send(me_request(Some("sessionid=not-a-token"))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(me["authenticated"], false);
}

/// Tests the rules on duplicate emails and mismatched passwords
#[tokio::test]
async fn test_register_validation() {
    let app = create_test_app();
    register_user(&app, "ana").await;

    let (status, body) = app
        .json(
            "POST",
            "/register",
            None,
            json!({
                "email": "ana@example.com",
                "username": "other",
                "password": PASSWORD,
                "confirmation": "different",
            }),
        )
        .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["email"]["code"], "email_exists");
    assert_eq!(body["email"]["detail"], "A user with this email already exists");
    assert_eq!(body["password"]["detail"], "Passwords must match.");
    assert_eq!(body["confirmation"]["detail"], "Passwords must match.");
    assert_eq!(body["password"]["type"], "validation_error");
}

/// Tests that short passwords and bad emails are rejected
#[tokio::test]
async fn test_register_field_validation() {
    let app = create_test_app();

    let (status, body) = app
        .json(
            "POST",
            "/register",
            None,
            json!({
                "email": "not-an-email",
                "username": "ana",
                "password": "ab",
                "confirmation": "ab",
            }),
        )
        .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body.get("email").is_some());
    assert!(body.get("password").is_some());
}

/// Tests that a taken username is suffixed rather than rejected
#[tokio::test]
async fn test_register_taken_username_gets_suffix() {
    let app = create_test_app();
    register_user(&app, "ana").await;

    let (status, body) = app
        .json(
            "POST",
            "/register",
            None,
            json!({
                "email": "ana2@example.com",
                "username": "ana",
                "password": PASSWORD,
                "confirmation": PASSWORD,
            }),
        )
        .await;

    assert_eq!(status, StatusCode::CREATED);
    let username = body["username"].as_str().unwrap();
    assert!(username.starts_with("ana_"), "got {}", username);
    assert!(username.len() > "ana_".len());
}

/// Tests logging in by username and by email
#[tokio::test]
async fn test_login_by_username_and_email() {
    let app = create_test_app();
    register_user(&app, "bojan").await;

    for login in ["bojan", "bojan@example.com"] {
        let (status, body) = app
            .json("POST", "/login", None, json!({"emailUsername": login, "password": PASSWORD}))
            .await;
        assert_eq!(status, StatusCode::OK, "login as {} failed: {}", login, body);
        assert_eq!(body["username"], "bojan");
        assert_eq!(body["email"], "bojan@example.com");
    }
}

/// Tests that a wrong password gives a non-field error
#[tokio::test]
async fn test_login_invalid_credentials() {
    let app = create_test_app();
    register_user(&app, "bojan").await;

    let (status, body) = app
        .json("POST", "/login", None, json!({"emailUsername": "bojan", "password": "wrong"}))
        .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["errors"]["code"], "invalid_credentials");
    assert_eq!(body["errors"]["detail"], "Invalid Credentials");
}

/// Tests that logging out ends the session
///
/// This test verifies:
/// 1. The session cookie from login authenticates /me
/// 2. POST /logout returns 204
/// 3. The same cookie is anonymous afterwards
#[tokio::test]
async fn test_logout_ends_session() {
    let app = create_test_app();
    register_user(&app, "cene").await;

    let login = json_request("POST", "/login", None, &json!({"emailUsername": "cene", "password": PASSWORD}));
    let response = app.router.clone().oneshot(login).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let cookie = session_cookie(&response).expect("session cookie");

    let (_, me) = app.send(me_request(Some(&cookie))).await;
    assert_eq!(me["authenticated"], true);

    let logout = Request::builder()
        .uri("/logout")
        .method("POST")
        .header(header::COOKIE, &cookie)
        .body(Body::empty())
        .unwrap();
    let (status, _) = app.send(logout).await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (_, me) = app.send(me_request(Some(&cookie))).await;
    assert_eq!(me["authenticated"], false);
}

/// Tests that wrong Basic credentials are rejected with 401
#[tokio::test]
async fn test_wrong_basic_credentials() {
    let app = create_test_app();
    register_user(&app, "dana").await;

    let (status, body) = app
        .json("POST", "/worker-account", Some(&basic_auth("dana", "nope")), worker_payload())
        .await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"]["code"], "not_authenticated");
}

/// Tests the order in which change-password checks fail
///
/// This test verifies:
/// 1. Weak new passwords fail on the new password fields first
/// 2. A wrong current password fails next
/// 3. Mismatched new passwords fail last
/// 4. A valid change returns 204 and the new password works
#[tokio::test]
async fn test_change_password_error_precedence() {
    let app = create_test_app();
    let auth = register_user(&app, "eva").await;
    let strong = "N3w-Passw0rd!";

    // Weak new password, even with a wrong old password
    let (status, body) = app
        .json(
            "PATCH",
            "/change-password",
            Some(&auth),
            json!({"oldPassword": "wrong", "newPassword": "weak", "newPasswordConfirmation": "weak"}),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["newPassword"]["code"], "invalid_password");
    assert_eq!(body["newPasswordConfirmation"]["code"], "invalid_password");

    // Wrong old password
    let (status, body) = app
        .json(
            "PATCH",
            "/change-password",
            Some(&auth),
            json!({"oldPassword": "wrong", "newPassword": strong, "newPasswordConfirmation": "0ther-Passw0rd!"}),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["errors"]["detail"], "Wrong current password.");

    // Mismatch
    let (status, body) = app
        .json(
            "PATCH",
            "/change-password",
            Some(&auth),
            json!({"oldPassword": PASSWORD, "newPassword": strong, "newPasswordConfirmation": "0ther-Passw0rd!"}),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["errors"]["detail"], "Passwords don't match.");

    // Success
    let (status, body) = app
        .json(
            "PATCH",
            "/change-password",
            Some(&auth),
            json!({"oldPassword": PASSWORD, "newPassword": strong, "newPasswordConfirmation": strong}),
        )
        .await;
    assert_eq!(status, StatusCode::NO_CONTENT);
    assert!(body.is_null());

    let (status, _) = app
        .json("POST", "/login", None, json!({"emailUsername": "eva", "password": strong}))
        .await;
    assert_eq!(status, StatusCode::OK);

    let (status, _) = app
        .json("POST", "/login", None, json!({"emailUsername": "eva", "password": PASSWORD}))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

/// Tests that changing the password requires authentication
#[tokio::test]
async fn test_change_password_requires_auth() {
    let app = create_test_app();

    let (status, _) = app
        .json(
            "PATCH",
            "/change-password",
            None,
            json!({"oldPassword": "a", "newPassword": "b", "newPasswordConfirmation": "b"}),
        )
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}
