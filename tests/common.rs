use invite_backend::{
    api::router::create_router,
    state::AppState,
    config::Config,
    infra::factory::{run_sqlite_migrations, sqlite_state},
};
use sqlx::{sqlite::{SqliteConnectOptions, SqlitePoolOptions}, Pool, Sqlite};
use std::sync::Arc;
use std::time::Duration;
use uuid::Uuid;
use axum::{
    body::Body,
    http::{Request, header},
    response::Response,
    Router,
};
use std::str::FromStr;
use tower::ServiceExt;
use serde_json::Value;

pub struct AuthHeaders {
    pub access_token: String,
    pub csrf_token: String,
    pub user_id: String,
}

#[allow(dead_code)]
pub struct TestApp {
    pub router: Router,
    pub pool: Pool<Sqlite>,
    pub db_filename: String,
    pub state: Arc<AppState>,
}

#[allow(dead_code)]
impl TestApp {
    pub async fn new() -> Self {
        let db_filename = format!("test_{}.db", Uuid::new_v4());
        let db_url = format!("sqlite://{}?mode=rwc", db_filename);

        let connection_options = SqliteConnectOptions::from_str(&db_url)
            .unwrap()
            .create_if_missing(true)
            .busy_timeout(Duration::from_secs(5));

        let pool = SqlitePoolOptions::new()
            .connect_with(connection_options)
            .await
            .expect("Failed to connect to test db");

        run_sqlite_migrations(&pool).await;

        let priv_key_pem = include_str!("../tests/keys/test_private.pem");
        let pub_key_pem = include_str!("../tests/keys/test_public.pem");

        let config = Config {
            database_url: db_url.clone(),
            port: 0,
            jwt_secret_key: priv_key_pem.to_string(),
            jwt_public_key: pub_key_pem.to_string(),
            auth_issuer: "test-issuer".to_string(),
            app_url: "https://invite.test".to_string(),
            change_feed_capacity: 64,
        };

        let state = Arc::new(sqlite_state(pool.clone(), &config));
        let router = create_router(state.clone());

        Self {
            router,
            pool,
            db_filename,
            state,
        }
    }

    pub async fn signup(&self, email: &str, display_name: Option<&str>) -> AuthHeaders {
        let payload = serde_json::json!({
            "email": email,
            "password": "correct-horse",
            "display_name": display_name,
        });

        let response = self.router.clone().oneshot(
            Request::builder()
                .method("POST")
                .uri("/api/v1/auth/signup")
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(payload.to_string()))
                .unwrap()
        ).await.unwrap();

        if !response.status().is_success() {
            panic!("Signup failed in test helper: status {}", response.status());
        }

        auth_headers_from(response).await
    }

    pub async fn login(&self, email: &str, password: &str) -> AuthHeaders {
        let payload = serde_json::json!({
            "email": email,
            "password": password
        });

        let response = self.router.clone().oneshot(
            Request::builder()
                .method("POST")
                .uri("/api/v1/auth/login")
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(payload.to_string()))
                .unwrap()
        ).await.unwrap();

        if !response.status().is_success() {
            panic!("Login failed in test helper: status {}", response.status());
        }

        auth_headers_from(response).await
    }

    /// Authenticated JSON request with the session cookie and CSRF header.
    pub async fn send_auth(&self, auth: &AuthHeaders, method: &str, uri: &str, body: Option<Value>) -> Response {
        let mut builder = Request::builder()
            .method(method)
            .uri(uri)
            .header(header::COOKIE, format!("access_token={}", auth.access_token))
            .header("X-CSRF-Token", &auth.csrf_token);

        let body = match body {
            Some(json) => {
                builder = builder.header(header::CONTENT_TYPE, "application/json");
                Body::from(json.to_string())
            }
            None => Body::empty(),
        };

        self.router.clone().oneshot(builder.body(body).unwrap()).await.unwrap()
    }

    /// Anonymous public request, optionally identifying the device.
    pub async fn send_public(&self, method: &str, uri: &str, device: Option<&str>, body: Option<Value>) -> Response {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(device) = device {
            builder = builder.header("X-Device-Token", device);
        }

        let body = match body {
            Some(json) => {
                builder = builder.header(header::CONTENT_TYPE, "application/json");
                Body::from(json.to_string())
            }
            None => Body::empty(),
        };

        self.router.clone().oneshot(builder.body(body).unwrap()).await.unwrap()
    }

    pub async fn create_invite(&self, auth: &AuthHeaders, recipient: &str, is_public: bool, theme: Option<&str>) -> Value {
        let response = self.send_auth(auth, "POST", "/api/v1/invites", Some(serde_json::json!({
            "recipient_name": recipient,
            "message": "Dinner on Friday?",
            "is_public": is_public,
            "theme": theme,
        }))).await;

        if response.status() != axum::http::StatusCode::CREATED {
            panic!("Invite creation failed in test helper: status {}", response.status());
        }
        parse_body(response).await
    }

    pub async fn submit(&self, invite_id: &str, device: &str, answer: &str, reason: Option<&str>) -> Response {
        self.send_public(
            "POST",
            &format!("/api/v1/public/invites/{}/responses", invite_id),
            Some(device),
            Some(serde_json::json!({ "answer": answer, "reason": reason })),
        ).await
    }

    pub async fn dashboard(&self, auth: &AuthHeaders) -> Value {
        let response = self.send_auth(auth, "GET", "/api/v1/invites", None).await;
        assert_eq!(response.status(), axum::http::StatusCode::OK);
        parse_body(response).await
    }
}

#[allow(dead_code)]
pub async fn parse_body(response: Response) -> Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

#[allow(dead_code)]
pub fn cookie_value(response: &Response, name: &str) -> Option<String> {
    let prefix = format!("{}=", name);
    response.headers()
        .get_all(header::SET_COOKIE)
        .iter()
        .filter_map(|h| h.to_str().ok())
        .find(|c| c.starts_with(&prefix))
        .map(|c| {
            let start = prefix.len();
            let end = c[start..].find(';').map(|i| start + i).unwrap_or(c.len());
            c[start..end].to_string()
        })
}

async fn auth_headers_from(response: Response) -> AuthHeaders {
    let access_token = cookie_value(&response, "access_token").expect("No access_token cookie returned");

    let body_json = parse_body(response).await;
    let csrf_token = body_json["csrf_token"].as_str().expect("No csrf_token in body").to_string();
    let user_id = body_json["user"]["id"].as_str().expect("No user id in body").to_string();

    AuthHeaders {
        access_token,
        csrf_token,
        user_id,
    }
}

impl Drop for TestApp {
    fn drop(&mut self) {
        let _ = std::fs::remove_file(&self.db_filename);
        let _ = std::fs::remove_file(format!("{}-wal", self.db_filename));
        let _ = std::fs::remove_file(format!("{}-shm", self.db_filename));
    }
}
