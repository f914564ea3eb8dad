#![allow(dead_code)]

/// Common test utilities for HTTP integration tests
///
/// Requests are driven through the router with `tower::ServiceExt::oneshot`,
/// so no socket is bound. The database comes from `#[sqlx::test]`.

use axum::{
    body::Body,
    http::{Request, StatusCode},
    Router,
};
use itemhub_api::{
    app::{build_router, AppState},
    config::{ApiConfig, Config, DatabaseConfig, LogFormat},
};
use serde_json::Value;
use sqlx::PgPool;
use tower::ServiceExt;

pub const TOKEN_HEADER: &str = "X-API-TOKEN";

/// Router plus the pool it was built on
pub struct TestApp {
    pub db: PgPool,
    pub router: Router,
}

/// A registered user and its plaintext token
pub struct TestUser {
    pub id: i64,
    pub email: String,
    pub token: String,
}

fn test_config() -> Config {
    Config {
        api: ApiConfig {
            host: "127.0.0.1".to_string(),
            port: 0,
            cors_origins: vec!["*".to_string()],
        },
        database: DatabaseConfig {
            url: String::new(),
            max_connections: 5,
            run_migrations: false,
        },
        log_format: LogFormat::Pretty,
    }
}

impl TestApp {
    pub fn new(db: PgPool) -> Self {
        let router = build_router(AppState::new(db.clone(), test_config()));
        Self { db, router }
    }

    /// Sends a request and returns the status and parsed JSON body
    pub async fn request(
        &self,
        method: &str,
        uri: &str,
        token: Option<&str>,
        body: Option<Value>,
    ) -> (StatusCode, Value) {
        let mut builder = Request::builder().method(method).uri(uri);

        if let Some(token) = token {
            builder = builder.header(TOKEN_HEADER, token);
        }

        let body = match body {
            Some(json) => {
                builder = builder.header("content-type", "application/json");
                Body::from(json.to_string())
            }
            None => Body::empty(),
        };

        let response = self
            .router
            .clone()
            .oneshot(builder.body(body).unwrap())
            .await
            .unwrap();

        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();

        let json = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap_or_else(|_| {
                Value::String(String::from_utf8_lossy(&bytes).into_owned())
            })
        };

        (status, json)
    }

    /// Registers a user through the API
    pub async fn register(&self, email: &str) -> TestUser {
        let (status, body) = self
            .request(
                "POST",
                "/users/",
                None,
                Some(serde_json::json!({ "email": email, "password": "password123" })),
            )
            .await;

        assert_eq!(status, StatusCode::OK, "registration failed: {}", body);

        TestUser {
            id: body["id"].as_i64().unwrap(),
            email: email.to_string(),
            token: body["api_token"].as_str().unwrap().to_string(),
        }
    }

    /// Creates an item for `owner_id` through the API
    pub async fn create_item(&self, token: &str, owner_id: i64, title: &str) -> Value {
        let (status, body) = self
            .request(
                "POST",
                &format!("/users/{}/items/", owner_id),
                Some(token),
                Some(serde_json::json!({ "title": title, "description": "test item" })),
            )
            .await;

        assert_eq!(status, StatusCode::OK, "item creation failed: {}", body);
        body
    }
}
