//! Password hashing
//!
//! Argon2id with a fixed work factor. The PHC string produced by
//! [`hash_password`] embeds the salt and parameters, so verification needs
//! only the candidate password and the stored hash.

use std::sync::LazyLock;

use argon2::{
    Algorithm, Argon2, Params, Version,
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString, rand_core::OsRng},
};
use tracing::{debug, warn};

use crate::error::AuthError;

/// Argon2 memory cost in KiB
pub const MEMORY_COST_KIB: u32 = 19_456;
/// Argon2 iteration count
pub const TIME_COST: u32 = 2;
/// Argon2 lanes
pub const PARALLELISM: u32 = 1;

const DECOY_PASSWORD: &str = "contrasena";
const DECOY_CANDIDATE: &str = "motdepasse";

/// Used when the decoy cannot be hashed at startup. Same parameters as
/// [`hash_password`], so comparing against it costs the same.
const FALLBACK_DECOY_HASH: &str = "$argon2id$v=19$m=19456,t=2,p=1$UHXz78Ko3TYxZ99kH08aNg$Yt2eSblnxeFGmjETs2i0JB85I1ywUpDW0VkMgWyqiPw";

static DECOY_HASH: LazyLock<String> = LazyLock::new(|| match hash_password(DECOY_PASSWORD) {
    Ok(hash) => {
        debug!("Generated decoy password hash");
        hash
    }
    Err(e) => {
        warn!("Failed to generate decoy password hash, using fallback: {}", e);
        FALLBACK_DECOY_HASH.to_string()
    }
});

fn argon2() -> Result<Argon2<'static>, AuthError> {
    let params = Params::new(MEMORY_COST_KIB, TIME_COST, PARALLELISM, None)
        .map_err(|e| AuthError::PasswordHash(e.to_string()))?;
    Ok(Argon2::new(Algorithm::Argon2id, Version::V0x13, params))
}

/// Hash a password with a fresh random salt
pub fn hash_password(password: &str) -> Result<String, AuthError> {
    let salt = SaltString::generate(&mut OsRng);

    let hash = argon2()?
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| AuthError::PasswordHash(e.to_string()))?;

    Ok(hash.to_string())
}

/// Check a password against a stored hash
///
/// A malformed hash is treated like a mismatch.
pub fn verify_password(password: &str, hash: &str) -> bool {
    let Ok(parsed) = PasswordHash::new(hash) else {
        debug!("Stored password hash is malformed");
        return false;
    };

    Argon2::default()
        .verify_password(password.as_bytes(), &parsed)
        .is_ok()
}

/// Compute the decoy hash now instead of on the first rejected login
pub fn init_decoy() {
    LazyLock::force(&DECOY_HASH);
}

/// Burn one password comparison against the decoy hash
///
/// Call this on the "no such user" login branch so it costs as much as the
/// "wrong password" branch.
pub fn reject_login_decoy() {
    std::hint::black_box(verify_password(
        std::hint::black_box(DECOY_CANDIDATE),
        &DECOY_HASH,
    ));
}
