//! Authentication error types

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;
use thiserror::Error;
use tracing::error;
use wilin_db::DbError;

/// Message returned for every failure whose detail must stay server-side
pub const SERVER_ERROR_MESSAGE: &str = "something went wrong";

#[derive(Error, Debug)]
pub enum AuthError {
    #[error("Invalid username or password")]
    InvalidCredentials,

    #[error("Invalid token")]
    InvalidToken,

    #[error("Signing secret is not configured")]
    MissingSigningSecret,

    #[error("Token lifetime of {0} minutes is out of range")]
    TokenLifetime(i64),

    #[error("Authentication required")]
    Unauthorized,

    #[error("Insufficient permissions")]
    Forbidden,

    #[error("Password hashing error: {0}")]
    PasswordHash(String),

    #[error("User store error: {0}")]
    Store(#[from] DbError),

    #[error("User store lookup timed out")]
    LookupTimeout,
}

impl AuthError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            AuthError::InvalidCredentials | AuthError::InvalidToken | AuthError::Unauthorized => {
                StatusCode::UNAUTHORIZED
            }
            AuthError::Forbidden => StatusCode::FORBIDDEN,
            AuthError::MissingSigningSecret
            | AuthError::TokenLifetime(_)
            | AuthError::PasswordHash(_)
            | AuthError::Store(_)
            | AuthError::LookupTimeout => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Message safe to show to the caller
    pub fn public_message(&self) -> &'static str {
        match self {
            AuthError::InvalidCredentials => "invalid username or password",
            AuthError::InvalidToken => "invalid token",
            AuthError::Unauthorized => "unauthorized",
            AuthError::Forbidden => "forbidden",
            _ => SERVER_ERROR_MESSAGE,
        }
    }
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status.is_server_error() {
            error!("Authentication failure: {}", self);
        }

        let body = axum::Json(json!({
            "error": self.public_message()
        }));

        (status, body).into_response()
    }
}
