//! Bearer identity extraction
//!
//! Turns an `Authorization` header into an optional user id. Extraction
//! never fails a request: anything short of a valid access token leaves the
//! caller anonymous, and the permission stage decides what that means.

use axum::http::{HeaderMap, header::AUTHORIZATION};
use tracing::debug;

use crate::jwt::JwtManager;

/// Who the caller claims to be, as established by their bearer token
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Identity {
    #[default]
    Anonymous,
    Identified(i64),
}

impl Identity {
    pub fn user_id(&self) -> Option<i64> {
        match self {
            Identity::Anonymous => None,
            Identity::Identified(id) => Some(*id),
        }
    }

    pub fn is_anonymous(&self) -> bool {
        matches!(self, Identity::Anonymous)
    }
}

/// Extract the token from a `Bearer <token>` header value
///
/// The scheme is matched case-insensitively.
pub fn bearer_token(header: &str) -> Option<&str> {
    let mut parts = header.split(' ');
    match (parts.next(), parts.next(), parts.next()) {
        (Some(scheme), Some(token), None)
            if scheme.eq_ignore_ascii_case("bearer") && !token.is_empty() =>
        {
            Some(token)
        }
        _ => None,
    }
}

/// Resolve an `Authorization` header value to an identity
pub fn extract_identity(authorization: Option<&str>, jwt: &JwtManager) -> Identity {
    let Some(header) = authorization else {
        return Identity::Anonymous;
    };

    let Some(token) = bearer_token(header) else {
        debug!("Ignoring malformed authorization header");
        return Identity::Anonymous;
    };

    let claims = match jwt.verify_access(token) {
        Ok(claims) => claims,
        Err(e) => {
            debug!("Ignoring bearer token: {}", e);
            return Identity::Anonymous;
        }
    };

    match claims.sub.parse::<i64>() {
        Ok(id) => Identity::Identified(id),
        Err(_) => {
            debug!("Ignoring bearer token with non-numeric subject");
            Identity::Anonymous
        }
    }
}

/// Resolve the identity carried by a request's headers
pub fn identity_from_headers(headers: &HeaderMap, jwt: &JwtManager) -> Identity {
    let authorization = headers.get(AUTHORIZATION).and_then(|h| h.to_str().ok());
    extract_identity(authorization, jwt)
}
