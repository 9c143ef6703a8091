use super::*;
use axum::body::to_bytes;
use axum::response::IntoResponse;

/// Helper to extract status code and body JSON from an ApiError response
async fn error_response(error: ApiError) -> (StatusCode, serde_json::Value) {
    let response = error.into_response();
    let status = response.status();
    let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
    (status, json)
}

#[tokio::test]
async fn test_database_error_response() {
    let error = ApiError::Database(anyhow::anyhow!("connection refused"));
    let (status, body) = error_response(error).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["error"]["type"], "server_error");
    assert_eq!(body["error"]["detail"], "Internal server error");
}

#[tokio::test]
async fn test_not_found_response() {
    let (status, body) = error_response(ApiError::NotFound).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"]["code"], "not_found");
    assert_eq!(body["error"]["type"], "client_error");
}

#[tokio::test]
async fn test_unauthorized_response() {
    let (status, body) = error_response(ApiError::Unauthorized).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"]["code"], "not_authenticated");
}

#[tokio::test]
async fn test_forbidden_response() {
    let error = ApiError::Forbidden("Only the owner of the object can delete it.".to_string());
    let (status, body) = error_response(error).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["error"]["detail"], "Only the owner of the object can delete it.");
}

#[tokio::test]
async fn test_validation_response_uses_camel_case_keys() {
    let mut errors = ValidationErrors::new();
    errors.add("new_password", "invalid_password", "Password is not valid.");
    errors.add("new_password_confirmation", "invalid_password", "Password is not valid.");

    let (status, body) = error_response(ApiError::Validation(errors)).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["newPassword"]["detail"], "Password is not valid.");
    assert_eq!(body["newPassword"]["type"], "validation_error");
    assert_eq!(body["newPasswordConfirmation"]["code"], "invalid_password");
}

#[tokio::test]
async fn test_non_field_validation_response() {
    let errors = ValidationErrors::non_field("wrong_password", "Wrong current password.");
    let (status, body) = error_response(errors.into()).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["errors"]["detail"], "Wrong current password.");
    assert_eq!(body["errors"]["code"], "wrong_password");
}

#[test]
fn test_into_result() {
    assert!(ValidationErrors::new().into_result().is_ok());
    let err = ValidationErrors::field("phone", "invalid", "Enter a valid value.").into_result();
    assert!(matches!(err, Err(ApiError::Validation(_))));
}

#[test]
fn test_last_error_for_a_field_wins() {
    let mut errors = ValidationErrors::new();
    errors.add("first_name", "min_length", "first");
    errors.add("first_name", "max_length", "second");

    let body = errors.to_json();

    assert_eq!(body["firstName"]["detail"], "second");
    assert_eq!(errors.len(), 2);
    assert!(errors.iter().all(|e| e.field.as_deref() == Some("first_name")));
    assert!(body.get("lastName").is_none());
}

#[test]
fn test_from_validator_errors_uses_messages_and_defaults() {
    let mut source = validator::ValidationErrors::new();
    let mut with_message = validator::ValidationError::new("invalid_shift");
    with_message.message = Some("test is not a valid shift".into());
    source.add("shifts", with_message);

    let mut length = validator::ValidationError::new("length");
    length.add_param("max".into(), &20);
    source.add("first_name", length);

    let errors: ValidationErrors = source.into();
    let body = errors.to_json();

    assert_eq!(body["shifts"]["detail"], "test is not a valid shift");
    assert_eq!(body["firstName"]["detail"], "Ensure this field has no more than 20 characters.");
    assert_eq!(body["firstName"]["code"], "length");
}
