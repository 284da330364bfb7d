//! API routes

mod account;
mod auth;
mod health;
pub mod metrics;
pub mod types;

use axum::{Router, middleware::from_fn_with_state};
use std::sync::Arc;
use wilin_auth::identity_middleware;

use crate::state::{AppState, MetricsHandle};

/// Create the main router
///
/// Every API route sits behind identity extraction; gated routes add their
/// own permission stage on top.
pub fn create_router(state: AppState, metrics_handle: Option<Arc<MetricsHandle>>) -> Router {
    let jwt = state.jwt.clone();

    let mut router = Router::new()
        .merge(health::routes())
        .merge(auth::routes())
        .merge(account::routes(&state.gate))
        .with_state(state)
        .layer(from_fn_with_state(jwt, identity_middleware));

    if let Some(handle) = metrics_handle {
        router = router.merge(metrics::routes(handle));
    }

    router
}
