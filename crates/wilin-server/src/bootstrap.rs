//! First-run admin account

use anyhow::Result;
use tracing::{debug, info};
use wilin_auth::{Role, hash_password};
use wilin_db::{Database, NewUser};

use crate::config::BootstrapAdminConfig;

/// Create the configured admin account if no users exist yet
///
/// Returns whether an account was created.
pub async fn ensure_admin(db: &Database, admin: Option<&BootstrapAdminConfig>) -> Result<bool> {
    if db.has_users().await? {
        debug!("Users already present, skipping admin bootstrap");
        return Ok(false);
    }

    let Some(admin) = admin else {
        info!("No users and no bootstrap admin configured");
        return Ok(false);
    };

    let password = admin.password.clone();
    let password_hash = tokio::task::spawn_blocking(move || hash_password(&password)).await??;

    let user = db
        .insert_user(NewUser {
            email: admin.email.clone(),
            username: admin.username.clone(),
            password_hash,
            role: Role::Admin.as_str().to_string(),
        })
        .await?;

    info!("Created admin user {}", user.id);
    Ok(true)
}
