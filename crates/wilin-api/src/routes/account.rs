//! Permission-gated account endpoints

use std::sync::Arc;

use axum::{
    Extension, Json, Router,
    extract::State,
    middleware::from_fn_with_state,
    routing::get,
};
use wilin_auth::{
    AuthError, GateStage, Identity, Permission, PermissionGate, Requirement, Role,
    UserStore, permission_middleware,
};

use crate::error::ApiError;
use crate::state::AppState;

use super::types::{PermissionsResponse, UserResponse};

/// GET /api/v1/auth/me
async fn me(
    State(state): State<AppState>,
    Extension(identity): Extension<Identity>,
) -> Result<Json<UserResponse>, ApiError> {
    let user_id = identity.user_id().ok_or(AuthError::Unauthorized)?;

    let user = state
        .users
        .read_user_by_id(user_id)
        .await?
        .ok_or(AuthError::Forbidden)?;

    Ok(Json(user.into()))
}

/// GET /api/v1/auth/permissions
async fn permissions(Extension(role): Extension<Role>) -> Json<PermissionsResponse> {
    Json(PermissionsResponse {
        role: role.as_str().to_string(),
        permissions: role
            .permissions()
            .iter()
            .map(|p| p.as_str().to_string())
            .collect(),
    })
}

/// Create account routes, each behind its own permission stage
pub fn routes(gate: &Arc<PermissionGate>) -> Router<AppState> {
    let signed_in = GateStage::new(
        gate.clone(),
        Requirement::any([Permission::ViewSelfProposal, Permission::ViewAllProposal]),
    );
    let reader = GateStage::new(gate.clone(), Requirement::all([Permission::ViewWord]));

    Router::new()
        .route(
            "/api/v1/auth/me",
            get(me).route_layer(from_fn_with_state(signed_in, permission_middleware)),
        )
        .route(
            "/api/v1/auth/permissions",
            get(permissions).route_layer(from_fn_with_state(reader, permission_middleware)),
        )
}
