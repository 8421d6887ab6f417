//! Shared fixtures for unit and router tests

use std::path::PathBuf;
use std::sync::Arc;

use axum::body::Body;
use axum::response::Response;
use jsonwebtoken::{encode, EncodingKey, Header};
use sqlx::sqlite::SqlitePoolOptions;
use sqlx::SqlitePool;
use tokio::sync::RwLock;

use crate::auth::models::Claims;
use crate::common::migrations::run_migrations;
use crate::common::{AppConfig, AppState};
use crate::services::FileStorageService;

pub const TEST_SECRET: &str = "test-secret";

/// Single-connection in-memory database with the schema applied
pub async fn memory_pool() -> SqlitePool {
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .connect("sqlite::memory:")
        .await
        .unwrap();
    run_migrations(&pool, false).await.unwrap();
    pool
}

/// Fresh upload directory under the system temp dir
pub fn temp_upload_dir() -> PathBuf {
    std::env::temp_dir().join(format!("career-portal-test-{}", uuid::Uuid::new_v4()))
}

pub fn test_config(upload_dir: PathBuf) -> AppConfig {
    AppConfig {
        database_url: "sqlite::memory:".to_string(),
        upload_dir,
        jwt_secret: TEST_SECRET.to_string(),
        enable_debug_endpoints: true,
        ..AppConfig::default()
    }
}

pub async fn test_state() -> AppState {
    let config = test_config(temp_upload_dir());
    let storage = FileStorageService::new(&config.upload_dir).await.unwrap();

    AppState {
        db: memory_pool().await,
        config,
        storage: Arc::new(storage),
    }
}

pub fn shared(state: AppState) -> Arc<RwLock<AppState>> {
    Arc::new(RwLock::new(state))
}

pub fn bearer_token(username: &str) -> String {
    let exp = (chrono::Utc::now() + chrono::Duration::hours(1)).timestamp() as usize;
    let claims = Claims {
        sub: username.to_string(),
        exp,
    };
    let token = encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(TEST_SECRET.as_bytes()),
    )
    .unwrap();
    format!("Bearer {}", token)
}

pub async fn body_bytes(response: Response) -> Vec<u8> {
    axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap()
        .to_vec()
}

pub async fn body_json(response: Response) -> serde_json::Value {
    serde_json::from_slice(&body_bytes(response).await).unwrap()
}

/// Hand-built multipart body with a single `file` part
pub fn multipart_body(filename: &str, content: &[u8]) -> (String, Body) {
    let boundary = "career-portal-test-boundary";
    let mut body = Vec::new();
    body.extend_from_slice(format!("--{}\r\n", boundary).as_bytes());
    body.extend_from_slice(
        format!(
            "Content-Disposition: form-data; name=\"file\"; filename=\"{}\"\r\n",
            filename
        )
        .as_bytes(),
    );
    body.extend_from_slice(b"Content-Type: application/octet-stream\r\n\r\n");
    body.extend_from_slice(content);
    body.extend_from_slice(format!("\r\n--{}--\r\n", boundary).as_bytes());

    (
        format!("multipart/form-data; boundary={}", boundary),
        Body::from(body),
    )
}
