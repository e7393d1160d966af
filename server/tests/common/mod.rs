//! Shared test harness
//!
//! Boots a server state on a temp-dir SQLite database and drives the full
//! router (middleware included) through oneshot calls.

use axum::Router;
use axum::body::Body;
use http::{Request, StatusCode, header};
use http_body_util::BodyExt;
use serde_json::Value;
use tower::ServiceExt;

use laundry_server::api::build_app;
use laundry_server::auth::jwt::JwtConfig;
use laundry_server::core::{Config, ServerState};

pub const ADMIN_EMAIL: &str = "admin@test.local";
pub const ADMIN_PASSWORD: &str = "admin-test-password";

pub struct TestApp {
    pub state: ServerState,
    pub app: Router,
    // Dropped with the struct, removing the database
    _work_dir: tempfile::TempDir,
}

pub fn test_config(work_dir: &str) -> Config {
    Config {
        work_dir: work_dir.to_string(),
        http_port: 0,
        jwt: JwtConfig {
            secret: "integration-test-secret-key-0123456789abcdef".to_string(),
            expiration_minutes: 60,
            issuer: "laundry-server".to_string(),
            audience: "laundry-clients".to_string(),
        },
        environment: "development".to_string(),
        report_timezone: chrono_tz::UTC,
        email_api_url: None,
        email_api_key: None,
        email_from: "no-reply@test.local".to_string(),
        app_base_url: "http://localhost:3000".to_string(),
        admin_email: ADMIN_EMAIL.to_string(),
        admin_password: Some(ADMIN_PASSWORD.to_string()),
    }
}

pub async fn spawn_app() -> TestApp {
    let work_dir = tempfile::tempdir().expect("temp dir");
    let config = test_config(work_dir.path().to_str().unwrap());
    let state = ServerState::initialize(&config).await;
    let app = build_app(&state).with_state(state.clone());
    TestApp {
        state,
        app,
        _work_dir: work_dir,
    }
}

impl TestApp {
    /// Issue one request and decode the JSON body (Value::Null when empty)
    pub async fn request(
        &self,
        method: &str,
        uri: &str,
        token: Option<&str>,
        body: Option<Value>,
    ) -> (StatusCode, Value) {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(token) = token {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
        }
        let request = match body {
            Some(json) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(json.to_string()))
                .expect("request"),
            None => builder.body(Body::empty()).expect("request"),
        };

        let response = self
            .app
            .clone()
            .oneshot(request)
            .await
            .expect("router call");
        let status = response.status();
        let bytes = response
            .into_body()
            .collect()
            .await
            .expect("body")
            .to_bytes();
        let json = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap_or(Value::Null)
        };
        (status, json)
    }

    /// Login and return the bearer token
    pub async fn login(&self, email: &str, password: &str) -> String {
        let (status, body) = self
            .request(
                "POST",
                "/api/auth/login",
                None,
                Some(serde_json::json!({ "email": email, "password": password })),
            )
            .await;
        assert_eq!(status, StatusCode::OK, "login failed: {body}");
        body["token"].as_str().expect("token in response").to_string()
    }

    pub async fn admin_token(&self) -> String {
        self.login(ADMIN_EMAIL, ADMIN_PASSWORD).await
    }

    /// The branch seeded on first start
    pub async fn default_branch_id(&self, token: &str) -> i64 {
        let (status, body) = self.request("GET", "/api/branches", Some(token), None).await;
        assert_eq!(status, StatusCode::OK);
        body[0]["id"].as_i64().expect("seeded branch")
    }
}
