//! Registration, login, profile and bearer token checks.

use super::helpers::{JWT_SECRET, TestApp, app, json_request, str_field};
use axum::http::{Method, StatusCode};
use chrono::Duration;
use mockable::DefaultClock;
use rstest::rstest;
use serde_json::{Value, json};
use taskdeck::auth::TokenKeys;
use taskdeck::user::domain::UserId;

#[rstest]
#[tokio::test]
async fn health_check_reports_running(app: TestApp) {
    let (status, body) = app
        .send(json_request(Method::GET, "/", None, None).expect("request"))
        .await
        .expect("response");

    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body,
        json!({ "success": true, "message": "Task Manager API is running" })
    );
}

#[rstest]
#[tokio::test]
async fn unknown_route_returns_envelope(app: TestApp) {
    let (status, body) = app
        .send(json_request(Method::GET, "/api/nope", None, None).expect("request"))
        .await
        .expect("response");

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body, json!({ "success": false, "message": "Route not found" }));
}

#[rstest]
#[tokio::test]
async fn register_then_login_returns_profile_and_token(app: TestApp) {
    let register = json!({ "name": " Ada ", "email": "Ada@Example.com", "password": "hunter22" });
    let (status, body) = app
        .send(json_request(Method::POST, "/api/auth/register", None, Some(&register)).expect("request"))
        .await
        .expect("response");

    assert_eq!(status, StatusCode::CREATED);
    let user = body.get("user").expect("user in body");
    assert_eq!(str_field(user, "name"), Some("Ada"));
    assert_eq!(str_field(user, "email"), Some("ada@example.com"));
    assert!(user.get("password").is_none());
    assert!(user.get("passwordHash").is_none());

    let login = json!({ "email": "ada@example.com", "password": "hunter22" });
    let (login_status, login_body) = app
        .send(json_request(Method::POST, "/api/auth/login", None, Some(&login)).expect("request"))
        .await
        .expect("response");

    assert_eq!(login_status, StatusCode::OK);
    assert!(str_field(&login_body, "token").is_some_and(|token| !token.is_empty()));
}

#[rstest]
#[tokio::test]
async fn duplicate_registration_is_rejected(app: TestApp) {
    app.register("Ada", "ada@example.com").await.expect("first registration");
    let again = json!({ "name": "Ada", "email": "ADA@example.com", "password": "hunter22" });

    let (status, body) = app
        .send(json_request(Method::POST, "/api/auth/register", None, Some(&again)).expect("request"))
        .await
        .expect("response");

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(str_field(&body, "message"), Some("User already exists"));
}

#[rstest]
#[case(json!({ "name": "Ada", "email": "not-an-email", "password": "hunter22" }))]
#[case(json!({ "name": "   ", "email": "ada@example.com", "password": "hunter22" }))]
#[case(json!({ "name": "Ada", "email": "ada@example.com", "password": "short" }))]
#[tokio::test]
async fn invalid_registration_fields_are_bad_requests(app: TestApp, #[case] body: Value) {
    let (status, response) = app
        .send(json_request(Method::POST, "/api/auth/register", None, Some(&body)).expect("request"))
        .await
        .expect("response");

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(response.get("success"), Some(&json!(false)));
}

#[rstest]
#[case("ada@example.com", "wrong-password")]
#[case("nobody@example.com", "hunter22")]
#[tokio::test]
async fn bad_credentials_are_unauthorized(
    app: TestApp,
    #[case] email: &str,
    #[case] password: &str,
) {
    app.register("Ada", "ada@example.com").await.expect("registration");
    let login = json!({ "email": email, "password": password });

    let (status, body) = app
        .send(json_request(Method::POST, "/api/auth/login", None, Some(&login)).expect("request"))
        .await
        .expect("response");

    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(str_field(&body, "message"), Some("Invalid email or password"));
}

#[rstest]
#[case(None, "Authorization token missing or malformed")]
#[case(Some("garbage"), "Invalid token")]
#[tokio::test]
async fn protected_routes_require_a_valid_token(
    app: TestApp,
    #[case] token: Option<&str>,
    #[case] message: &str,
) {
    let (status, body) = app
        .send(json_request(Method::GET, "/api/tasks", token, None).expect("request"))
        .await
        .expect("response");

    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(str_field(&body, "message"), Some(message));
}

#[rstest]
#[tokio::test]
async fn expired_token_asks_for_new_login(app: TestApp) {
    let keys = TokenKeys::new(JWT_SECRET, Duration::hours(-2));
    let token = keys.issue(UserId::new(), &DefaultClock).expect("issue");

    let (status, body) = app
        .send(json_request(Method::GET, "/api/tasks", Some(&token), None).expect("request"))
        .await
        .expect("response");

    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(
        str_field(&body, "message"),
        Some("Token has expired. Please log in again.")
    );
}

#[rstest]
#[tokio::test]
async fn token_for_unknown_user_is_rejected(app: TestApp) {
    let keys = TokenKeys::new(JWT_SECRET, Duration::hours(1));
    let token = keys.issue(UserId::new(), &DefaultClock).expect("issue");

    let (status, body) = app
        .send(json_request(Method::GET, "/api/tasks", Some(&token), None).expect("request"))
        .await
        .expect("response");

    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(str_field(&body, "message"), Some("User not found"));
}

#[rstest]
#[case("/api/auth/profile")]
#[case("/api/users")]
#[tokio::test]
async fn profile_includes_task_counts(app: TestApp, #[case] uri: &str) {
    let token = app.register("Ada", "ada@example.com").await.expect("registration");
    app.create_task(&token, &json!({ "title": "Open", "dueDate": "2030-01-01" }))
        .await
        .expect("create open task");
    app.create_task(
        &token,
        &json!({
            "title": "Half",
            "dueDate": "2030-01-01",
            "checklist": [{ "title": "a", "completed": true }, { "title": "b" }],
        }),
    )
    .await
    .expect("create in-progress task");

    let (status, body) = app
        .send(json_request(Method::GET, uri, Some(&token), None).expect("request"))
        .await
        .expect("response");

    assert_eq!(status, StatusCode::OK);
    let user = body.get("user").expect("user in body");
    assert_eq!(str_field(user, "email"), Some("ada@example.com"));
    assert_eq!(user.get("pendingTask"), Some(&json!(1)));
    assert_eq!(user.get("inprogressTask"), Some(&json!(1)));
    assert_eq!(user.get("completedTask"), Some(&json!(0)));
}

#[rstest]
#[case("/api/auth/profile")]
#[case("/api/users/profile")]
#[tokio::test]
async fn profile_update_changes_only_supplied_fields(app: TestApp, #[case] uri: &str) {
    let token = app.register("Ada", "ada@example.com").await.expect("registration");
    let update = json!({ "name": "Ada Lovelace", "password": "", "profileImageUrl": "https://img.example/ada.png" });

    let (status, body) = app
        .send(json_request(Method::PUT, uri, Some(&token), Some(&update)).expect("request"))
        .await
        .expect("response");

    assert_eq!(status, StatusCode::OK);
    assert_eq!(str_field(&body, "message"), Some("Profile updated successfully"));
    let user = body.get("user").expect("user in body");
    assert_eq!(str_field(user, "name"), Some("Ada Lovelace"));
    assert_eq!(
        str_field(user, "profileImageUrl"),
        Some("https://img.example/ada.png")
    );

    let login = json!({ "email": "ada@example.com", "password": "hunter22" });
    let (login_status, _) = app
        .send(json_request(Method::POST, "/api/auth/login", None, Some(&login)).expect("request"))
        .await
        .expect("response");
    assert_eq!(login_status, StatusCode::OK);
}
