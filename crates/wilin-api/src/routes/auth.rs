//! Sign-up, login and token refresh

use axum::{
    Json, Router,
    extract::{State, rejection::JsonRejection},
    http::StatusCode,
    routing::post,
};
use tracing::{debug, info};
use validator::ValidateEmail;
use wilin_auth::{
    AuthError, Role, UserStore, hash_password, reject_login_decoy, verify_password,
};
use wilin_db::NewUser;

use crate::error::ApiError;
use crate::state::AppState;

use super::types::{
    LoginRequest, LoginResponse, RefreshRequest, RefreshResponse, SignUpRequest, UserResponse,
};

// ==================== Input Validation ====================

const MAX_EMAIL_LENGTH: usize = 120;
const MAX_USERNAME_LENGTH: usize = 30;
const MIN_PASSWORD_LENGTH: usize = 8;
const MAX_PASSWORD_LENGTH: usize = 60;
/// Upper bound on login password input
const MAX_LOGIN_PASSWORD_LENGTH: usize = 256;

const INVALID_FORMAT: &str = "invalid format";

fn bad_request(message: &str) -> ApiError {
    ApiError::BadRequest(message.to_string())
}

/// Check sign-up fields, reporting the first failure
fn validate_sign_up(request: &SignUpRequest) -> Result<(), ApiError> {
    if !request.email.validate_email() {
        return Err(bad_request("invalid email"));
    }
    if request.email.len() > MAX_EMAIL_LENGTH {
        return Err(bad_request("email too long"));
    }
    if request.username.is_empty() {
        return Err(bad_request("no username"));
    }
    if request.username.len() > MAX_USERNAME_LENGTH {
        return Err(bad_request("username too long"));
    }
    if request.username.contains(' ') {
        return Err(bad_request("username has space"));
    }
    if request.password.len() < MIN_PASSWORD_LENGTH {
        return Err(bad_request("password too short"));
    }
    if request.password.len() > MAX_PASSWORD_LENGTH {
        return Err(bad_request("password too long"));
    }
    Ok(())
}

/// Run a CPU-heavy password operation off the async workers
async fn blocking<T, F>(f: F) -> Result<T, ApiError>
where
    F: FnOnce() -> T + Send + 'static,
    T: Send + 'static,
{
    tokio::task::spawn_blocking(f)
        .await
        .map_err(|e| ApiError::Internal(format!("password task failed: {}", e)))
}

// ==================== Auth Routes ====================

/// POST /api/v1/auth/signup
async fn sign_up(
    State(state): State<AppState>,
    request: Result<Json<SignUpRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<UserResponse>), ApiError> {
    let Json(request) = request.map_err(|_| bad_request(INVALID_FORMAT))?;
    validate_sign_up(&request)?;

    if state.users.read_user_by_email(&request.email).await?.is_some() {
        return Err(ApiError::Conflict("email taken".to_string()));
    }
    if state.users.read_user_by_username(&request.username).await?.is_some() {
        return Err(ApiError::Conflict("username taken".to_string()));
    }

    let password = request.password;
    let password_hash = blocking(move || hash_password(&password)).await??;

    let user = state
        .db
        .insert_user(NewUser {
            email: request.email,
            username: request.username,
            password_hash,
            role: Role::User.as_str().to_string(),
        })
        .await?;

    info!("Created user {}", user.id);

    Ok((StatusCode::CREATED, Json(user.into())))
}

/// POST /api/v1/auth/login
async fn login(
    State(state): State<AppState>,
    request: Result<Json<LoginRequest>, JsonRejection>,
) -> Result<Json<LoginResponse>, ApiError> {
    let Json(request) = request.map_err(|_| bad_request(INVALID_FORMAT))?;
    if request.password.len() > MAX_LOGIN_PASSWORD_LENGTH {
        return Err(bad_request(INVALID_FORMAT));
    }

    let Some(user) = state.users.read_user_by_username(&request.username).await? else {
        blocking(reject_login_decoy).await?;
        metrics::counter!("wilin_login_attempts_total", "outcome" => "rejected").increment(1);
        return Err(AuthError::InvalidCredentials.into());
    };

    let password = request.password;
    let hash = user.password_hash.clone();
    if !blocking(move || verify_password(&password, &hash)).await? {
        metrics::counter!("wilin_login_attempts_total", "outcome" => "rejected").increment(1);
        return Err(AuthError::InvalidCredentials.into());
    }

    let auth_token = state.jwt.issue_access_token(user.id)?;
    let refresh_token = state.jwt.issue_refresh_token(user.id)?;

    metrics::counter!("wilin_login_attempts_total", "outcome" => "accepted").increment(1);
    info!("User {} logged in", user.id);

    Ok(Json(LoginResponse {
        user: user.into(),
        auth_token,
        refresh_token,
    }))
}

/// POST /api/v1/auth/refresh
///
/// Trades a refresh token for a new access token. The refresh token itself
/// is not rotated.
async fn refresh(
    State(state): State<AppState>,
    request: Result<Json<RefreshRequest>, JsonRejection>,
) -> Result<Json<RefreshResponse>, ApiError> {
    let Json(request) = request.map_err(|_| bad_request(INVALID_FORMAT))?;

    let claims = state.jwt.verify_refresh(&request.refresh_token)?;
    let user_id: i64 = claims.sub.parse().map_err(|_| AuthError::InvalidToken)?;

    let Some(user) = state.users.read_user_by_id(user_id).await? else {
        debug!("Refresh token subject {} has no user record", user_id);
        return Err(AuthError::InvalidToken.into());
    };

    let auth_token = state.jwt.issue_access_token(user.id)?;
    debug!("Refreshed access token for user {}", user.id);

    Ok(Json(RefreshResponse { auth_token }))
}

/// Create auth routes
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/api/v1/auth/signup", post(sign_up))
        .route("/api/v1/auth/login", post(login))
        .route("/api/v1/auth/refresh", post(refresh))
}
