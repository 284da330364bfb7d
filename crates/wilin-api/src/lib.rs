//! Wilin REST API
//!
//! This crate provides the Axum-based HTTP API for Wilin: account
//! sign-up, login and token refresh, plus the permission-gated account
//! endpoints.

pub mod error;
pub mod routes;
pub mod state;

#[cfg(test)]
mod test_support;

pub use error::ApiError;
pub use routes::create_router;
pub use state::{AppState, MetricsHandle};
