//! Shared helpers for HTTP-level integration tests.
//!
//! Requests go straight into the router through `tower::ServiceExt::oneshot`,
//! with no TCP listener involved.

#![allow(dead_code)]

use axum::body::Body;
use axum::http::{Method, Request, Response};
use axum::Router;
use http_body_util::BodyExt;
use planner_api::config::ServerConfig;
use planner_api::middleware::principal::PRINCIPAL_HEADER;
use planner_api::router::build_app_router;
use planner_api::state::AppState;
use planner_db::models::post::CreatePost;
use planner_db::models::user::CreateUser;
use planner_db::models::user::User;
use planner_db::repositories::{PostRepo, UserRepo};
use sqlx::PgPool;
use tower::ServiceExt;

/// Build a test `ServerConfig` with safe defaults.
pub fn test_config() -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_origins: vec!["http://localhost:5173".to_string()],
        request_timeout_secs: 30,
        shutdown_timeout_secs: 30,
        strict_missing_targets: false,
    }
}

/// The full application router over `pool`, same middleware as production.
pub fn build_test_app(pool: PgPool) -> Router {
    build_test_app_with(pool, test_config())
}

pub fn build_test_app_with(pool: PgPool, config: ServerConfig) -> Router {
    let state = AppState::new(pool, config.clone());
    build_app_router(state, &config)
}

/// Same as [`build_test_app`] with `STRICT_MISSING_TARGETS` switched on.
pub fn build_strict_test_app(pool: PgPool) -> Router {
    build_test_app_with(
        pool,
        ServerConfig {
            strict_missing_targets: true,
            ..test_config()
        },
    )
}

// ---------------------------------------------------------------------------
// Fixtures
// ---------------------------------------------------------------------------

pub async fn seed_user(pool: &PgPool, email: &str) -> User {
    UserRepo::create(
        pool,
        &CreateUser {
            email: email.to_string(),
            name: email.to_string(),
        },
    )
    .await
    .unwrap()
}

/// Create a post authored by `author_id`; returns its id.
pub async fn seed_post(pool: &PgPool, author_id: i64, title: &str) -> i64 {
    PostRepo::create(
        pool,
        author_id,
        &CreatePost {
            title: title.to_string(),
            content: String::new(),
        },
    )
    .await
    .unwrap()
    .id
}

// ---------------------------------------------------------------------------
// Requests (all sent as `as_user`)
// ---------------------------------------------------------------------------

async fn send(
    app: Router,
    method: Method,
    uri: &str,
    as_user: Option<&str>,
    body: Option<serde_json::Value>,
) -> Response<Body> {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(email) = as_user {
        builder = builder.header(PRINCIPAL_HEADER, email);
    }
    let request = match body {
        Some(json) => builder
            .header("content-type", "application/json")
            .body(Body::from(serde_json::to_vec(&json).unwrap()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };
    app.oneshot(request).await.unwrap()
}

pub async fn get(app: Router, uri: &str, as_user: &str) -> Response<Body> {
    send(app, Method::GET, uri, Some(as_user), None).await
}

/// GET without the principal header.
pub async fn get_anonymous(app: Router, uri: &str) -> Response<Body> {
    send(app, Method::GET, uri, None, None).await
}

pub async fn post_json(
    app: Router,
    uri: &str,
    as_user: &str,
    body: serde_json::Value,
) -> Response<Body> {
    send(app, Method::POST, uri, Some(as_user), Some(body)).await
}

pub async fn post_empty(app: Router, uri: &str, as_user: &str) -> Response<Body> {
    send(app, Method::POST, uri, Some(as_user), None).await
}

pub async fn put_json(
    app: Router,
    uri: &str,
    as_user: &str,
    body: serde_json::Value,
) -> Response<Body> {
    send(app, Method::PUT, uri, Some(as_user), Some(body)).await
}

pub async fn delete(app: Router, uri: &str, as_user: &str) -> Response<Body> {
    send(app, Method::DELETE, uri, Some(as_user), None).await
}

/// Collect a response body and parse it as JSON.
pub async fn body_json(response: Response<Body>) -> serde_json::Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}
