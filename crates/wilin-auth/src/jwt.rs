//! JWT token management
//!
//! Tokens are HS256-signed and carry a `type` claim separating short-lived
//! access tokens from long-lived refresh tokens. Verification is stateless.

use chrono::{Duration, Utc};
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::error::AuthError;

/// Value of the `iss` claim
pub const ISSUER: &str = "www.wilin.info";
/// Environment variable holding the signing secret
pub const SECRET_ENV_VAR: &str = "SECRET_KEY";
/// Access token lifetime
pub const ACCESS_TOKEN_TTL_MINUTES: i64 = 15;
/// Refresh token lifetime (31 days)
pub const REFRESH_TOKEN_TTL_MINUTES: i64 = 60 * 24 * 31;

const SIGNING_ALGORITHM: Algorithm = Algorithm::HS256;

/// Token usage discriminator
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TokenType {
    #[serde(rename = "authToken")]
    Access,
    #[serde(rename = "refreshToken")]
    Refresh,
}

/// JWT claims
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Claims {
    #[serde(rename = "type")]
    pub token_type: TokenType,
    /// Issuer
    pub iss: String,
    /// Subject (user ID)
    pub sub: String,
    /// Issued at (Unix timestamp)
    pub iat: i64,
    /// Expiration time (Unix timestamp)
    pub exp: i64,
}

#[derive(Clone)]
struct SigningKeys {
    encoding: EncodingKey,
    decoding: DecodingKey,
}

/// JWT manager for token generation and validation
///
/// Without a secret every operation fails with
/// [`AuthError::MissingSigningSecret`].
#[derive(Clone)]
pub struct JwtManager {
    keys: Option<SigningKeys>,
}

impl JwtManager {
    /// Create a new JWT manager; an empty secret leaves it unconfigured
    pub fn new(secret: &str) -> Self {
        let keys = (!secret.is_empty()).then(|| SigningKeys {
            encoding: EncodingKey::from_secret(secret.as_bytes()),
            decoding: DecodingKey::from_secret(secret.as_bytes()),
        });
        Self { keys }
    }

    /// Create a JWT manager from the `SECRET_KEY` environment variable
    pub fn from_env() -> Self {
        let secret = std::env::var(SECRET_ENV_VAR).unwrap_or_default();
        if secret.is_empty() {
            warn!(
                "{} is not set; token issuance and verification are disabled",
                SECRET_ENV_VAR
            );
        }
        Self::new(&secret)
    }

    pub fn has_secret(&self) -> bool {
        self.keys.is_some()
    }

    fn keys(&self) -> Result<&SigningKeys, AuthError> {
        self.keys.as_ref().ok_or(AuthError::MissingSigningSecret)
    }

    /// Issue a token of the given type for a subject
    pub fn issue(
        &self,
        token_type: TokenType,
        subject: &str,
        ttl_minutes: i64,
    ) -> Result<String, AuthError> {
        let now = Utc::now();
        let exp = Duration::try_minutes(ttl_minutes)
            .and_then(|ttl| now.checked_add_signed(ttl))
            .ok_or(AuthError::TokenLifetime(ttl_minutes))?;

        let claims = Claims {
            token_type,
            iss: ISSUER.to_string(),
            sub: subject.to_string(),
            iat: now.timestamp(),
            exp: exp.timestamp(),
        };

        debug!("Issuing {:?} token for subject {}", token_type, subject);
        self.sign(&claims)
    }

    /// Issue a 15-minute access token for a user
    pub fn issue_access_token(&self, user_id: i64) -> Result<String, AuthError> {
        self.issue(TokenType::Access, &user_id.to_string(), ACCESS_TOKEN_TTL_MINUTES)
    }

    /// Issue a 31-day refresh token for a user
    pub fn issue_refresh_token(&self, user_id: i64) -> Result<String, AuthError> {
        self.issue(TokenType::Refresh, &user_id.to_string(), REFRESH_TOKEN_TTL_MINUTES)
    }

    pub(crate) fn sign(&self, claims: &Claims) -> Result<String, AuthError> {
        let keys = self.keys()?;
        encode(&Header::new(SIGNING_ALGORITHM), claims, &keys.encoding).map_err(|e| {
            warn!("Failed to sign token: {}", e);
            AuthError::InvalidToken
        })
    }

    /// Validate a token of either type and return its claims
    ///
    /// Every failure other than a missing secret is reported as
    /// [`AuthError::InvalidToken`]; the reason is only logged.
    pub fn verify(&self, token: &str) -> Result<Claims, AuthError> {
        let keys = self.keys()?;

        let mut validation = Validation::new(SIGNING_ALGORITHM);
        validation.leeway = 0;
        validation.set_issuer(&[ISSUER]);
        validation.set_required_spec_claims(&["exp", "iat", "iss", "sub"]);

        let token_data = decode::<Claims>(token, &keys.decoding, &validation).map_err(|e| {
            debug!("Token rejected: {:?}", e.kind());
            AuthError::InvalidToken
        })?;

        // jsonwebtoken still accepts a token in its final second
        let now = Utc::now().timestamp();
        if token_data.claims.exp <= now {
            debug!("Token rejected: expired at {}", token_data.claims.exp);
            return Err(AuthError::InvalidToken);
        }

        Ok(token_data.claims)
    }

    /// Validate a token and require the given type
    pub fn verify_as(&self, token: &str, expected: TokenType) -> Result<Claims, AuthError> {
        let claims = self.verify(token)?;
        if claims.token_type != expected {
            debug!(
                "Token rejected: expected {:?}, got {:?}",
                expected, claims.token_type
            );
            return Err(AuthError::InvalidToken);
        }
        Ok(claims)
    }

    /// Validate a token for resource access
    pub fn verify_access(&self, token: &str) -> Result<Claims, AuthError> {
        self.verify_as(token, TokenType::Access)
    }

    /// Validate a token for minting a new access token
    pub fn verify_refresh(&self, token: &str) -> Result<Claims, AuthError> {
        self.verify_as(token, TokenType::Refresh)
    }
}
