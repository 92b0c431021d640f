//! HTTP tests for registration, login, logout, and route gating.

use axum::http::StatusCode;
use integration_tests::test_app;
use serde_json::json;
use uuid::Uuid;

#[tokio::test]
async fn register_login_logout_cycle() {
    let app = test_app().await;

    let (status, body) = app
        .request(
            "POST",
            "/auth/register",
            None,
            Some(json!({
                "name": "Sam",
                "email": "sam@example.com",
                "password": "password1",
                "role": "user",
            })),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["role"], "user");
    let token: Uuid = body["token"].as_str().unwrap().parse().unwrap();

    // The fresh token opens the user surface.
    let (status, _) = app.request("GET", "/user/profile", Some(token), None).await;
    assert_eq!(status, StatusCode::OK);

    let (status, _) = app.request("POST", "/auth/logout", Some(token), None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);
    let (status, _) = app.request("GET", "/user/profile", Some(token), None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    // Login issues a new session.
    let (status, body) = app
        .request(
            "POST",
            "/auth/login",
            None,
            Some(json!({ "email": "sam@example.com", "password": "password1" })),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert!(body["token"].is_string());
}

#[tokio::test]
async fn duplicate_email_conflicts() {
    let app = test_app().await;
    app.register("Sam", "sam@example.com", "user").await;

    let (status, body) = app
        .request(
            "POST",
            "/auth/register",
            None,
            Some(json!({
                "name": "Imposter",
                "email": "sam@example.com",
                "password": "password1",
            })),
        )
        .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["success"], false);
}

#[tokio::test]
async fn bad_credentials_are_unauthorized() {
    let app = test_app().await;
    app.register("Sam", "sam@example.com", "user").await;

    let (status, _) = app
        .request(
            "POST",
            "/auth/login",
            None,
            Some(json!({ "email": "sam@example.com", "password": "wrong" })),
        )
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, _) = app
        .request(
            "POST",
            "/auth/login",
            None,
            Some(json!({ "email": "ghost@example.com", "password": "password1" })),
        )
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn expert_surface_requires_expert_role() {
    let app = test_app().await;
    let (_, user_session) = app.register("Sam", "sam@example.com", "user").await;
    let (_, expert_session) = app.register("Elena", "elena@example.com", "expert").await;

    let (status, _) = app.request("GET", "/expert", None, None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, _) = app
        .request("GET", "/expert", Some(user_session.token), None)
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, _) = app
        .request("GET", "/expert", Some(expert_session.token), None)
        .await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn short_password_is_rejected() {
    let app = test_app().await;
    let (status, _) = app
        .request(
            "POST",
            "/auth/register",
            None,
            Some(json!({
                "name": "Sam",
                "email": "sam@example.com",
                "password": "12345",
            })),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}
