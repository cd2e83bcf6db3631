mod common;

use axum::{
    body::Body,
    http::{Request, StatusCode},
};
use common::{parse_body, TestApp};
use serde_json::json;
use tower::ServiceExt;

#[tokio::test]
async fn test_create_invite_defaults_and_share_url() {
    let app = TestApp::new().await;
    let auth = app.signup("alex@example.com", Some("Alex")).await;

    let response = app.send_auth(&auth, "POST", "/api/v1/invites", Some(json!({
        "recipient_name": "  Sam  ",
        "occasion": "first_date",
    }))).await;
    assert_eq!(response.status(), StatusCode::CREATED);

    let body = parse_body(response).await;
    let short_code = body["short_code"].as_str().unwrap();
    assert_eq!(short_code.len(), 10);
    assert!(short_code.chars().all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-'));
    assert_eq!(body["recipient_name"], "Sam");
    assert_eq!(body["message"], "Will you be my Valentine?");
    assert_eq!(body["is_public"], false);
    assert_eq!(body["occasion"], "first_date");
    assert_eq!(body["creator_id"], auth.user_id.as_str());
    assert_eq!(body["share_url"], format!("https://invite.test/v/{}", short_code));
    assert!(body.get("device_token").is_none());
}

#[tokio::test]
async fn test_create_invite_rejects_bad_input() {
    let app = TestApp::new().await;
    let auth = app.signup("alex@example.com", None).await;

    let blank = app.send_auth(&auth, "POST", "/api/v1/invites", Some(json!({ "recipient_name": "   " }))).await;
    assert_eq!(blank.status(), StatusCode::BAD_REQUEST);

    let empty_message = app.send_auth(&auth, "POST", "/api/v1/invites", Some(json!({
        "recipient_name": "Sam",
        "message": " ",
    }))).await;
    assert_eq!(empty_message.status(), StatusCode::BAD_REQUEST);

    let unknown_theme = app.send_auth(&auth, "POST", "/api/v1/invites", Some(json!({
        "recipient_name": "Sam",
        "theme": "disco",
    }))).await;
    assert!(unknown_theme.status().is_client_error());

    assert_eq!(app.dashboard(&auth).await["invites"].as_array().unwrap().len(), 0);
}

#[tokio::test]
async fn test_dashboard_lists_own_invites_newest_first_with_metrics() {
    let app = TestApp::new().await;
    let alex = app.signup("alex@example.com", None).await;
    let kim = app.signup("kim@example.com", None).await;

    let first = app.create_invite(&alex, "Sam", false, None).await;
    let second = app.create_invite(&alex, "Jo", true, Some("midnight")).await;
    app.create_invite(&kim, "Lee", true, None).await;

    let first_id = first["id"].as_str().unwrap();
    for answer in ["no", "no"] {
        assert_eq!(app.submit(first_id, "device-a", answer, None).await.status(), StatusCode::OK);
    }
    app.submit(first_id, "device-a", "yes", None).await;

    let body = app.dashboard(&alex).await;
    let invites = body["invites"].as_array().unwrap();
    assert_eq!(invites.len(), 2);
    assert_eq!(invites[0]["id"], second["id"]);
    assert_eq!(invites[1]["id"], first["id"]);

    let metrics = &invites[1]["metrics"];
    assert_eq!(metrics["yes"], 1);
    assert_eq!(metrics["no"], 2);
    assert_eq!(metrics["maybe"], 0);
    assert_eq!(metrics["resistance_index"], 67);
    assert_eq!(metrics["resistance_label"], "Hesitant");

    let responses = invites[1]["responses"].as_array().unwrap();
    let answers: Vec<&str> = responses.iter().map(|r| r["answer"].as_str().unwrap()).collect();
    assert_eq!(answers, vec!["no", "no", "yes"]);

    assert_eq!(invites[0]["metrics"]["resistance_label"], "Instant Yes!");
    assert_eq!(body["summary"]["total_invites"], 2);
    assert_eq!(body["summary"]["total_responses"], 3);
    assert_eq!(body["summary"]["success_rate"], 50);
}

#[tokio::test]
async fn test_soft_delete_hides_invite_but_keeps_results() {
    let app = TestApp::new().await;
    let alex = app.signup("alex@example.com", None).await;
    let kim = app.signup("kim@example.com", None).await;

    let invite = app.create_invite(&alex, "Sam", true, None).await;
    let id = invite["id"].as_str().unwrap();
    let code = invite["short_code"].as_str().unwrap();
    app.submit(id, "device-a", "maybe", None).await;

    let not_owner = app.send_auth(&kim, "DELETE", &format!("/api/v1/invites/{}", id), None).await;
    assert_eq!(not_owner.status(), StatusCode::NOT_FOUND);

    let deleted = app.send_auth(&alex, "DELETE", &format!("/api/v1/invites/{}", id), None).await;
    assert_eq!(deleted.status(), StatusCode::NO_CONTENT);

    let again = app.send_auth(&alex, "DELETE", &format!("/api/v1/invites/{}", id), None).await;
    assert_eq!(again.status(), StatusCode::NOT_FOUND);

    assert!(app.dashboard(&alex).await["invites"].as_array().unwrap().is_empty());

    let public = app.send_public("GET", &format!("/api/v1/public/invites/by-code/{}", code), None, None).await;
    assert_eq!(public.status(), StatusCode::NOT_FOUND);

    let submit = app.submit(id, "device-a", "yes", None).await;
    assert_eq!(submit.status(), StatusCode::NOT_FOUND);

    // Responses are kept and the owner can still read them
    let results = app.send_auth(&alex, "GET", &format!("/api/v1/invites/by-code/{}/results", code), None).await;
    assert_eq!(results.status(), StatusCode::OK);
    let body = parse_body(results).await;
    assert!(body["deleted_at"].is_string());
    assert_eq!(body["responses"].as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn test_results_page_access() {
    let app = TestApp::new().await;
    let alex = app.signup("alex@example.com", None).await;
    let kim = app.signup("kim@example.com", Some("Kim")).await;

    let invite = app.create_invite(&alex, "Kim", true, None).await;
    let id = invite["id"].as_str().unwrap();
    let code = invite["short_code"].as_str().unwrap();

    // Kim answers while logged in; the response carries Kim's display name
    let response = app.router.clone().oneshot(
        Request::builder()
            .method("POST")
            .uri(format!("/api/v1/public/invites/{}/responses", id))
            .header("X-Device-Token", "kims-phone")
            .header("Cookie", format!("access_token={}", kim.access_token))
            .header("Content-Type", "application/json")
            .body(Body::from(json!({ "answer": "no", "reason": "  busy  " }).to_string()))
            .unwrap()
    ).await.unwrap();
    assert_eq!(parse_body(response).await["success"], true);
    app.submit(id, "kims-phone", "yes", None).await;

    let results = app.send_auth(&alex, "GET", &format!("/api/v1/invites/by-code/{}/results", code), None).await;
    assert_eq!(results.status(), StatusCode::OK);
    let body = parse_body(results).await;
    let responses = body["responses"].as_array().unwrap();
    assert_eq!(responses.len(), 2);
    assert_eq!(responses[0]["answer"], "no");
    assert_eq!(responses[0]["reason"], "busy");
    assert_eq!(responses[0]["responder_id"], kim.user_id.as_str());
    assert_eq!(responses[0]["responder_name"], "Kim");
    assert!(responses[0]["created_at"].is_string());
    assert!(responses[1]["responder_id"].is_null());
    assert_eq!(body["metrics"]["yes"], 1);

    let forbidden = app.send_auth(&kim, "GET", &format!("/api/v1/invites/by-code/{}/results", code), None).await;
    assert_eq!(forbidden.status(), StatusCode::FORBIDDEN);

    let missing = app.send_auth(&alex, "GET", "/api/v1/invites/by-code/doesnotexist/results", None).await;
    assert_eq!(missing.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_public_view_and_share_page() {
    let app = TestApp::new().await;
    let alex = app.signup("alex@example.com", Some("Alex")).await;
    let invite = app.create_invite(&alex, "Sam <3", false, Some("scratch")).await;
    let code = invite["short_code"].as_str().unwrap();

    let view = app.send_public("GET", &format!("/api/v1/public/invites/by-code/{}", code), None, None).await;
    assert_eq!(view.status(), StatusCode::OK);
    let body = parse_body(view).await;
    assert_eq!(body["id"], invite["id"]);
    assert_eq!(body["sender_name"], "Alex");
    assert_eq!(body["theme"], "scratch");
    assert!(body.get("creator_id").is_none());
    assert!(body.get("device_token").is_none());

    let unknown = app.send_public("GET", "/api/v1/public/invites/by-code/nope", None, None).await;
    assert_eq!(unknown.status(), StatusCode::NOT_FOUND);

    let page = app.router.clone().oneshot(
        Request::builder().uri(format!("/v/{}", code)).body(Body::empty()).unwrap()
    ).await.unwrap();
    assert_eq!(page.status(), StatusCode::OK);
    let bytes = axum::body::to_bytes(page.into_body(), usize::MAX).await.unwrap();
    let html = String::from_utf8(bytes.to_vec()).unwrap();
    assert!(html.contains("<title>A special invitation for Sam &lt;3 | Valentine</title>"));
    assert!(html.contains("content=\"Dinner on Friday?\""));
    assert!(html.contains(&format!("data-short-code=\"{}\"", code)));
}

#[tokio::test]
async fn test_health() {
    let app = TestApp::new().await;
    let response = app.send_public("GET", "/health", None, None).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(parse_body(response).await["status"], "ok");
}
