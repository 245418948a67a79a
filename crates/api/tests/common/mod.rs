//! Shared harness for HTTP-level integration tests.
//!
//! Mirrors the router construction in `main.rs` so tests exercise the
//! same middleware stack (CORS, request ID, timeout, panic recovery)
//! that production uses. Photos go to a per-app temp directory through
//! the local store backend.

// Each test binary compiles this module separately and uses a subset of it.
#![allow(dead_code)]

use std::sync::Arc;
use std::time::Duration;

use axum::body::Body;
use axum::extract::DefaultBodyLimit;
use axum::http::header::{AUTHORIZATION, CONTENT_TYPE};
use axum::http::{HeaderName, Method, Request, Response, StatusCode};
use axum::Router;
use http_body_util::BodyExt;
use sqlx::PgPool;
use tower::ServiceExt;
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::cors::CorsLayer;
use tower_http::request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer};
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer};
use tracing::Level;

use pmdash_api::auth::jwt::JwtConfig;
use pmdash_api::config::{AdminConfig, PhotoStorageConfig, ServerConfig};
use pmdash_api::routes;
use pmdash_api::state::AppState;
use pmdash_api::storage;

/// Credentials accepted by the admin login route in tests.
pub const ADMIN_EMAIL: &str = "admin@district.test";
pub const ADMIN_PASSWORD: &str = "admin-pass-123";

/// Smallest byte prefix recognized as a JPEG by the upload validator.
pub const JPEG_MAGIC: &[u8] = &[0xFF, 0xD8, 0xFF, 0xE0, 0x00, 0x10, 0x4A, 0x46, 0x49, 0x46];

/// Build a test `ServerConfig` with safe defaults and a unique local
/// photo-store root under the system temp directory.
pub fn test_config() -> ServerConfig {
    let store_root =
        std::env::temp_dir().join(format!("pmdash-test-{}", uuid::Uuid::new_v4()));

    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_origins: vec!["http://localhost:5173".to_string()],
        request_timeout_secs: 30,
        jwt: JwtConfig {
            secret: "integration-test-secret-key".to_string(),
            access_token_expiry_mins: 720,
        },
        admin: Some(AdminConfig {
            email: ADMIN_EMAIL.to_string(),
            password: ADMIN_PASSWORD.to_string(),
        }),
        photo_storage: PhotoStorageConfig::Local {
            root: store_root,
            public_base_url: "http://localhost:8000/photos".to_string(),
        },
        smtp: None,
        app_base_url: "http://localhost:5173".to_string(),
    }
}

/// Build the full application router with all middleware layers, using
/// the given database pool.
pub async fn build_test_app(pool: PgPool) -> Router {
    let config = test_config();
    let photo_store = storage::from_config(&config.photo_storage).await;

    let state = AppState {
        pool,
        config: Arc::new(config),
        photo_store,
    };

    let cors = CorsLayer::new()
        .allow_origin(["http://localhost:5173".parse().unwrap()])
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
        .allow_headers([CONTENT_TYPE, AUTHORIZATION])
        .allow_credentials(true)
        .max_age(Duration::from_secs(3600));

    let request_id_header = HeaderName::from_static("x-request-id");

    Router::new()
        .merge(routes::health::router())
        .nest("/api/v1", routes::api_routes())
        .layer(DefaultBodyLimit::max(
            pmdash_core::attachment::MAX_PHOTOS_PER_PROJECT
                * pmdash_core::attachment::MAX_PHOTO_BYTES
                + 2 * 1024 * 1024,
        ))
        .layer(CatchPanicLayer::new())
        .layer(TimeoutLayer::with_status_code(
            StatusCode::REQUEST_TIMEOUT,
            Duration::from_secs(30),
        ))
        .layer(PropagateRequestIdLayer::new(request_id_header.clone()))
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        )
        .layer(SetRequestIdLayer::new(request_id_header, MakeRequestUuid))
        .layer(cors)
        .with_state(state)
}

// ---------------------------------------------------------------------------
// Request helpers
// ---------------------------------------------------------------------------

async fn send(app: &Router, request: Request<Body>) -> Response<Body> {
    app.clone()
        .oneshot(request)
        .await
        .expect("request should not fail at the transport level")
}

/// GET without authentication.
pub async fn get(app: &Router, uri: &str) -> Response<Body> {
    let request = Request::builder()
        .method(Method::GET)
        .uri(uri)
        .body(Body::empty())
        .unwrap();
    send(app, request).await
}

/// GET with a Bearer token.
pub async fn get_auth(app: &Router, uri: &str, token: &str) -> Response<Body> {
    let request = Request::builder()
        .method(Method::GET)
        .uri(uri)
        .header(AUTHORIZATION, format!("Bearer {token}"))
        .body(Body::empty())
        .unwrap();
    send(app, request).await
}

/// POST a JSON body without authentication.
pub async fn post_json(app: &Router, uri: &str, body: serde_json::Value) -> Response<Body> {
    let request = Request::builder()
        .method(Method::POST)
        .uri(uri)
        .header(CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap();
    send(app, request).await
}

/// POST a JSON body with a Bearer token.
pub async fn post_json_auth(
    app: &Router,
    uri: &str,
    token: &str,
    body: serde_json::Value,
) -> Response<Body> {
    let request = Request::builder()
        .method(Method::POST)
        .uri(uri)
        .header(CONTENT_TYPE, "application/json")
        .header(AUTHORIZATION, format!("Bearer {token}"))
        .body(Body::from(body.to_string()))
        .unwrap();
    send(app, request).await
}

/// DELETE with a Bearer token.
pub async fn delete_auth(app: &Router, uri: &str, token: &str) -> Response<Body> {
    let request = Request::builder()
        .method(Method::DELETE)
        .uri(uri)
        .header(AUTHORIZATION, format!("Bearer {token}"))
        .body(Body::empty())
        .unwrap();
    send(app, request).await
}

/// Send a multipart form with a Bearer token.
pub async fn send_multipart_auth(
    app: &Router,
    method: Method,
    uri: &str,
    token: &str,
    form: MultipartForm,
) -> Response<Body> {
    let (content_type, body) = form.finish();
    let request = Request::builder()
        .method(method)
        .uri(uri)
        .header(CONTENT_TYPE, content_type)
        .header(AUTHORIZATION, format!("Bearer {token}"))
        .body(Body::from(body))
        .unwrap();
    send(app, request).await
}

/// Decode a response body as JSON.
pub async fn body_json(response: Response<Body>) -> serde_json::Value {
    let bytes = response
        .into_body()
        .collect()
        .await
        .expect("body should collect")
        .to_bytes();
    serde_json::from_slice(&bytes).expect("body should be valid JSON")
}

// ---------------------------------------------------------------------------
// Multipart body builder
// ---------------------------------------------------------------------------

const BOUNDARY: &str = "pmdash-test-boundary";

/// Minimal multipart/form-data body builder for tests.
pub struct MultipartForm {
    body: Vec<u8>,
}

impl MultipartForm {
    pub fn new() -> Self {
        Self { body: Vec::new() }
    }

    /// Append a plain text field.
    pub fn text(mut self, name: &str, value: &str) -> Self {
        self.body.extend_from_slice(
            format!(
                "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"{name}\"\r\n\r\n{value}\r\n"
            )
            .as_bytes(),
        );
        self
    }

    /// Append a file field.
    pub fn file(mut self, name: &str, filename: &str, content_type: &str, bytes: &[u8]) -> Self {
        self.body.extend_from_slice(
            format!(
                "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"{name}\"; \
                 filename=\"{filename}\"\r\nContent-Type: {content_type}\r\n\r\n"
            )
            .as_bytes(),
        );
        self.body.extend_from_slice(bytes);
        self.body.extend_from_slice(b"\r\n");
        self
    }

    fn finish(mut self) -> (String, Vec<u8>) {
        self.body
            .extend_from_slice(format!("--{BOUNDARY}--\r\n").as_bytes());
        (
            format!("multipart/form-data; boundary={BOUNDARY}"),
            self.body,
        )
    }
}

// ---------------------------------------------------------------------------
// Auth flow helpers
// ---------------------------------------------------------------------------

/// Sign up a department via the API and log it in, returning
/// `(access_token, department_id)`.
pub async fn signup_and_login(app: &Router, dept_name: &str, email: &str) -> (String, i64) {
    let password = "field-report-pw-1";

    let response = post_json(
        app,
        "/api/v1/auth/signup",
        serde_json::json!({ "dept_name": dept_name, "email": email, "password": password }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let created = body_json(response).await;
    let department_id = created["id"].as_i64().expect("signup returns the id");

    let response = post_json(
        app,
        "/api/v1/auth/login",
        serde_json::json!({ "email": email, "password": password }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    let token = json["access_token"]
        .as_str()
        .expect("login returns a token")
        .to_string();

    (token, department_id)
}

/// Log in as the configured admin and return the access token.
pub async fn admin_login(app: &Router) -> String {
    let response = post_json(
        app,
        "/api/v1/auth/admin/login",
        serde_json::json!({ "email": ADMIN_EMAIL, "password": ADMIN_PASSWORD }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    json["access_token"].as_str().unwrap().to_string()
}

/// Create a project through the API and return its id.
pub async fn create_project(app: &Router, token: &str, name: &str) -> i64 {
    let body = serde_json::json!({
        "name": name,
        "progress": 0,
        "start_date": "2026-04-01",
        "end_date": "2026-12-31",
        "budget_allocated": 250000.0,
        "contact_person": "R. Sharma",
        "designation": "Junior Engineer",
        "contact_number": "9876543210",
        "remarks": ""
    });
    let response = post_json_auth(app, "/api/v1/projects", token, body).await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let json = body_json(response).await;
    json["id"].as_i64().expect("create returns the id")
}
