//! Wilin Authentication and Authorization
//!
//! This crate provides password hashing, signed session tokens,
//! bearer identity extraction and role-based permission checks
//! for the Wilin API.

pub mod error;
pub mod gate;
pub mod identity;
pub mod jwt;
pub mod middleware;
pub mod password;
pub mod roles;
pub mod store;

#[cfg(test)]
mod test_support;

pub use error::AuthError;
pub use gate::{PermissionGate, Requirement};
pub use identity::{Identity, bearer_token, extract_identity};
pub use jwt::{Claims, JwtManager, TokenType};
pub use middleware::{GateStage, identity_middleware, permission_middleware};
pub use password::{hash_password, reject_login_decoy, verify_password};
pub use roles::{Permission, Role};
pub use store::UserStore;
