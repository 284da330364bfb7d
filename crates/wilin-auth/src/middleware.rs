//! Authentication middleware for Axum
//!
//! Two pipeline stages: [`identity_middleware`] runs on every request and
//! records an [`Identity`]; [`permission_middleware`] runs per route and
//! either forwards the request with the resolved [`Role`] or answers it.

use std::sync::Arc;

use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};
use tracing::debug;

use crate::error::AuthError;
use crate::gate::{PermissionGate, Requirement};
use crate::identity::{Identity, identity_from_headers};
use crate::jwt::JwtManager;

/// A permission check bound to one route
#[derive(Clone)]
pub struct GateStage {
    gate: Arc<PermissionGate>,
    requirement: Requirement,
}

impl GateStage {
    pub fn new(gate: Arc<PermissionGate>, requirement: Requirement) -> Self {
        Self { gate, requirement }
    }
}

/// Identity extraction middleware
///
/// Adds an [`Identity`] to request extensions. Never rejects.
pub async fn identity_middleware(
    State(jwt): State<Arc<JwtManager>>,
    mut request: Request,
    next: Next,
) -> Response {
    let identity = identity_from_headers(request.headers(), &jwt);
    debug!("Request identity: {:?}", identity);

    request.extensions_mut().insert(identity);
    next.run(request).await
}

/// Permission check middleware
///
/// Reads the [`Identity`] left by [`identity_middleware`] (anonymous if
/// absent) and adds the resolved [`crate::Role`] to request extensions.
pub async fn permission_middleware(
    State(stage): State<GateStage>,
    mut request: Request,
    next: Next,
) -> Result<Response, AuthError> {
    let identity = request
        .extensions()
        .get::<Identity>()
        .copied()
        .unwrap_or_default();

    let role = stage.gate.check(identity, &stage.requirement).await?;

    request.extensions_mut().insert(role);
    Ok(next.run(request).await)
}
