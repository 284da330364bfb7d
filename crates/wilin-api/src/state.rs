//! Application state

use std::sync::Arc;
use std::time::Duration;

use wilin_auth::{JwtManager, PermissionGate, UserStore};
use wilin_db::Database;

/// Prometheus render handle exposed at `/metrics`
pub type MetricsHandle = metrics_exporter_prometheus::PrometheusHandle;

/// Application state shared across handlers
///
/// Reads go through `users`; `db` is kept for account creation.
#[derive(Clone)]
pub struct AppState {
    pub db: Database,
    pub users: Arc<dyn UserStore>,
    pub jwt: Arc<JwtManager>,
    pub gate: Arc<PermissionGate>,
}

impl AppState {
    pub fn new(db: Database, jwt: Arc<JwtManager>, lookup_timeout: Duration) -> Self {
        let users: Arc<dyn UserStore> = Arc::new(db.clone());
        Self::with_store(db, users, jwt, lookup_timeout)
    }

    /// Build state whose lookups go to `users` instead of `db`
    pub fn with_store(
        db: Database,
        users: Arc<dyn UserStore>,
        jwt: Arc<JwtManager>,
        lookup_timeout: Duration,
    ) -> Self {
        let gate = PermissionGate::new(users.clone()).with_lookup_timeout(lookup_timeout);
        Self {
            db,
            users,
            jwt,
            gate: Arc::new(gate),
        }
    }
}
