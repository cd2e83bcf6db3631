mod common;

use axum::{
    body::Body,
    http::{header, Request, StatusCode},
};
use common::{cookie_value, parse_body, TestApp};
use serde_json::json;
use tower::ServiceExt;

#[tokio::test]
async fn test_signup_login_and_profile() {
    let app = TestApp::new().await;

    let auth = app.signup("alex@example.com", None).await;
    assert!(!auth.access_token.is_empty());
    assert!(!auth.csrf_token.is_empty());

    // Display name falls back to the local part of the email
    let me = app.send_auth(&auth, "GET", "/api/v1/me", None).await;
    assert_eq!(me.status(), StatusCode::OK);
    let body = parse_body(me).await;
    assert_eq!(body["email"], "alex@example.com");
    assert_eq!(body["display_name"], "alex");

    let updated = app.send_auth(&auth, "PUT", "/api/v1/me", Some(json!({ "display_name": "  Alex  " }))).await;
    assert_eq!(updated.status(), StatusCode::OK);
    assert_eq!(parse_body(updated).await["display_name"], "Alex");

    let relogin = app.login("ALEX@example.com", "correct-horse").await;
    let me = app.send_auth(&relogin, "GET", "/api/v1/me", None).await;
    assert_eq!(parse_body(me).await["display_name"], "Alex");
}

#[tokio::test]
async fn test_signup_validation_and_duplicates() {
    let app = TestApp::new().await;
    app.signup("sam@example.com", Some("Sam")).await;

    let cases = [
        (json!({ "email": "sam@example.com", "password": "correct-horse" }), StatusCode::CONFLICT),
        (json!({ "email": "not-an-email", "password": "correct-horse" }), StatusCode::BAD_REQUEST),
        (json!({ "email": "kim@example.com", "password": "short" }), StatusCode::BAD_REQUEST),
    ];

    for (payload, expected) in cases {
        let response = app.router.clone().oneshot(
            Request::builder()
                .method("POST")
                .uri("/api/v1/auth/signup")
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(payload.to_string()))
                .unwrap()
        ).await.unwrap();
        assert_eq!(response.status(), expected, "payload {}", payload);
    }
}

#[tokio::test]
async fn test_wrong_password_is_unauthorized() {
    let app = TestApp::new().await;
    app.signup("sam@example.com", None).await;

    let response = app.router.clone().oneshot(
        Request::builder()
            .method("POST")
            .uri("/api/v1/auth/login")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(json!({ "email": "sam@example.com", "password": "wrong-password" }).to_string()))
            .unwrap()
    ).await.unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_owner_routes_require_session_and_csrf() {
    let app = TestApp::new().await;

    let anonymous = app.router.clone().oneshot(
        Request::builder().uri("/api/v1/invites").body(Body::empty()).unwrap()
    ).await.unwrap();
    assert_eq!(anonymous.status(), StatusCode::UNAUTHORIZED);

    let auth = app.signup("sam@example.com", None).await;
    let missing_csrf = app.router.clone().oneshot(
        Request::builder()
            .method("POST")
            .uri("/api/v1/invites")
            .header(header::COOKIE, format!("access_token={}", auth.access_token))
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(json!({ "recipient_name": "Kim" }).to_string()))
            .unwrap()
    ).await.unwrap();
    assert_eq!(missing_csrf.status(), StatusCode::FORBIDDEN);

    let forged = app.router.clone().oneshot(
        Request::builder()
            .uri("/api/v1/invites")
            .header(header::COOKIE, "access_token=not-a-jwt")
            .body(Body::empty())
            .unwrap()
    ).await.unwrap();
    assert_eq!(forged.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_refresh_rotates_and_logout_revokes() {
    let app = TestApp::new().await;

    let signup = app.router.clone().oneshot(
        Request::builder()
            .method("POST")
            .uri("/api/v1/auth/signup")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(json!({ "email": "sam@example.com", "password": "correct-horse" }).to_string()))
            .unwrap()
    ).await.unwrap();
    assert_eq!(signup.status(), StatusCode::CREATED);
    let refresh_token = cookie_value(&signup, "refresh_token").unwrap();

    let refresh = |token: String| {
        let router = app.router.clone();
        async move {
            router.oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/api/v1/auth/refresh")
                    .header(header::COOKIE, format!("refresh_token={}", token))
                    .body(Body::empty())
                    .unwrap()
            ).await.unwrap()
        }
    };

    let rotated = refresh(refresh_token.clone()).await;
    assert_eq!(rotated.status(), StatusCode::OK);
    let new_token = cookie_value(&rotated, "refresh_token").unwrap();
    assert_ne!(new_token, refresh_token);

    // The old token was consumed by the rotation
    assert_eq!(refresh(refresh_token).await.status(), StatusCode::UNAUTHORIZED);

    let logout = app.router.clone().oneshot(
        Request::builder()
            .method("POST")
            .uri("/api/v1/auth/logout")
            .header(header::COOKIE, format!("refresh_token={}", new_token))
            .body(Body::empty())
            .unwrap()
    ).await.unwrap();
    assert_eq!(logout.status(), StatusCode::OK);

    assert_eq!(refresh(new_token).await.status(), StatusCode::UNAUTHORIZED);
}
