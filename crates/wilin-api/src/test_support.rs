//! Helpers for driving the router in tests

use std::sync::Arc;
use std::time::Duration;

use axum::{
    Router,
    body::Body,
    http::{Method, Request, StatusCode, header},
    response::Response,
};
use async_trait::async_trait;
use serde_json::Value;
use tower::ServiceExt;
use wilin_auth::{JwtManager, UserStore, hash_password};
use wilin_db::{Database, DbError, NewUser, User};

use crate::routes::create_router;
use crate::state::AppState;

pub(crate) const TEST_SECRET: &str = "test-secret-key";

pub(crate) async fn test_state() -> AppState {
    test_state_with_secret(TEST_SECRET).await
}

pub(crate) async fn test_state_with_secret(secret: &str) -> AppState {
    let db = Database::in_memory().await.unwrap();
    AppState::new(db, Arc::new(JwtManager::new(secret)), Duration::from_secs(5))
}

/// User store whose every lookup fails like an exhausted pool
pub(crate) struct FailingStore;

#[async_trait]
impl UserStore for FailingStore {
    async fn read_user_by_id(&self, _id: i64) -> Result<Option<User>, DbError> {
        Err(DbError::Query(sqlx::Error::PoolTimedOut))
    }

    async fn read_user_by_username(&self, _username: &str) -> Result<Option<User>, DbError> {
        Err(DbError::Query(sqlx::Error::PoolTimedOut))
    }

    async fn read_user_by_email(&self, _email: &str) -> Result<Option<User>, DbError> {
        Err(DbError::Query(sqlx::Error::PoolTimedOut))
    }
}

/// State backed by a working database but a failing user store
pub(crate) async fn failing_store_state() -> AppState {
    let db = Database::in_memory().await.unwrap();
    AppState::with_store(
        db,
        Arc::new(FailingStore),
        Arc::new(JwtManager::new(TEST_SECRET)),
        Duration::from_secs(5),
    )
}

pub(crate) async fn seed_user(
    state: &AppState,
    username: &str,
    password: &str,
    role: &str,
) -> User {
    state
        .db
        .insert_user(NewUser {
            email: format!("{username}@example.com"),
            username: username.to_string(),
            password_hash: hash_password(password).unwrap(),
            role: role.to_string(),
        })
        .await
        .unwrap()
}

pub(crate) fn app(state: &AppState) -> Router {
    create_router(state.clone(), None)
}

pub(crate) async fn send(
    app: Router,
    method: Method,
    uri: &str,
    body: Option<Value>,
    token: Option<&str>,
) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
    }
    let body = match body {
        Some(json) => {
            builder = builder.header(header::CONTENT_TYPE, "application/json");
            Body::from(json.to_string())
        }
        None => Body::empty(),
    };

    let response = app.oneshot(builder.body(body).unwrap()).await.unwrap();
    read_json(response).await
}

pub(crate) async fn read_json(response: Response) -> (StatusCode, Value) {
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap_or(Value::Null)
    };
    (status, value)
}
