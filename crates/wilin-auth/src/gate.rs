//! Permission gate
//!
//! Resolves an [`Identity`] to a [`Role`] through the [`UserStore`] and checks
//! it against a [`Requirement`]. A failed check is `Unauthorized` when the
//! caller presented no identity and `Forbidden` when they did.

use std::sync::Arc;
use std::time::Duration;

use tracing::{debug, warn};

use crate::error::AuthError;
use crate::identity::Identity;
use crate::roles::{Permission, Role};
use crate::store::UserStore;

/// Default bound on a single user lookup
pub const DEFAULT_LOOKUP_TIMEOUT: Duration = Duration::from_secs(5);

/// Permissions a route needs
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Requirement {
    /// Every listed permission
    All(Vec<Permission>),
    /// At least one listed permission
    Any(Vec<Permission>),
}

impl Requirement {
    pub fn all(permissions: impl IntoIterator<Item = Permission>) -> Self {
        Requirement::All(permissions.into_iter().collect())
    }

    pub fn any(permissions: impl IntoIterator<Item = Permission>) -> Self {
        Requirement::Any(permissions.into_iter().collect())
    }

    pub fn is_satisfied_by(&self, role: Role) -> bool {
        match self {
            Requirement::All(permissions) => role.can_all(permissions),
            Requirement::Any(permissions) => role.can_any(permissions),
        }
    }
}

pub struct PermissionGate {
    store: Arc<dyn UserStore>,
    lookup_timeout: Duration,
}

impl PermissionGate {
    pub fn new(store: Arc<dyn UserStore>) -> Self {
        Self {
            store,
            lookup_timeout: DEFAULT_LOOKUP_TIMEOUT,
        }
    }

    pub fn with_lookup_timeout(mut self, lookup_timeout: Duration) -> Self {
        self.lookup_timeout = lookup_timeout;
        self
    }

    /// Resolve the caller's role
    ///
    /// Anonymous callers and identities without a user record are
    /// `NonUser`. Store faults propagate.
    pub async fn resolve_role(&self, identity: Identity) -> Result<Role, AuthError> {
        let Identity::Identified(user_id) = identity else {
            return Ok(Role::NonUser);
        };

        let user = tokio::time::timeout(self.lookup_timeout, self.store.read_user_by_id(user_id))
            .await
            .map_err(|_| {
                warn!("User lookup for {} timed out", user_id);
                AuthError::LookupTimeout
            })??;

        match user {
            Some(user) => Ok(Role::from(user.role.as_str())),
            None => {
                debug!("Token subject {} has no user record", user_id);
                Ok(Role::NonUser)
            }
        }
    }

    /// Resolve the caller's role and check it against a requirement
    pub async fn check(
        &self,
        identity: Identity,
        requirement: &Requirement,
    ) -> Result<Role, AuthError> {
        let role = self.resolve_role(identity).await?;

        if requirement.is_satisfied_by(role) {
            return Ok(role);
        }

        let denial = if identity.is_anonymous() {
            AuthError::Unauthorized
        } else {
            AuthError::Forbidden
        };
        debug!("Denied {:?} (role {:?}) for {:?}", identity, role, requirement);
        metrics::counter!(
            "wilin_permission_denials_total",
            "kind" => if identity.is_anonymous() { "unauthorized" } else { "forbidden" }
        )
        .increment(1);

        Err(denial)
    }

    pub async fn require_all(
        &self,
        identity: Identity,
        permissions: &[Permission],
    ) -> Result<Role, AuthError> {
        self.check(identity, &Requirement::all(permissions.iter().copied()))
            .await
    }

    pub async fn require_any(
        &self,
        identity: Identity,
        permissions: &[Permission],
    ) -> Result<Role, AuthError> {
        self.check(identity, &Requirement::any(permissions.iter().copied()))
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::MemoryStore;

    fn gate(store: MemoryStore) -> PermissionGate {
        PermissionGate::new(Arc::new(store))
    }

    fn users() -> MemoryStore {
        MemoryStore::default()
            .with_user(1, "admin")
            .with_user(2, "user")
            .with_user(3, "moderator")
    }

    #[tokio::test]
    async fn test_resolve_role() {
        let gate = gate(users());

        assert_eq!(gate.resolve_role(Identity::Anonymous).await.unwrap(), Role::NonUser);
        assert_eq!(gate.resolve_role(Identity::Identified(1)).await.unwrap(), Role::Admin);
        assert_eq!(gate.resolve_role(Identity::Identified(2)).await.unwrap(), Role::User);
        assert_eq!(gate.resolve_role(Identity::Identified(3)).await.unwrap(), Role::NonUser);
        assert_eq!(gate.resolve_role(Identity::Identified(99)).await.unwrap(), Role::NonUser);
    }

    #[tokio::test]
    async fn test_anonymous_view_word_allowed() {
        let gate = gate(users());

        let role = gate
            .require_all(Identity::Anonymous, &[Permission::ViewWord])
            .await
            .unwrap();
        assert_eq!(role, Role::NonUser);
    }

    #[tokio::test]
    async fn test_anonymous_denial_is_unauthorized() {
        let gate = gate(users());

        let err = gate
            .require_all(Identity::Anonymous, &[Permission::AddWord])
            .await
            .unwrap_err();
        assert!(matches!(err, AuthError::Unauthorized));

        let err = gate
            .require_any(Identity::Anonymous, &[Permission::AddWord, Permission::AddProposal])
            .await
            .unwrap_err();
        assert!(matches!(err, AuthError::Unauthorized));
    }

    #[tokio::test]
    async fn test_identified_denial_is_forbidden() {
        let gate = gate(users());

        let err = gate
            .require_all(Identity::Identified(2), &[Permission::ViewWord, Permission::AddWord])
            .await
            .unwrap_err();
        assert!(matches!(err, AuthError::Forbidden));

        // identity present but no user record: still forbidden, not unauthorized
        let err = gate
            .require_all(Identity::Identified(99), &[Permission::AddProposal])
            .await
            .unwrap_err();
        assert!(matches!(err, AuthError::Forbidden));
    }

    #[tokio::test]
    async fn test_require_any() {
        let gate = gate(users());

        let role = gate
            .require_any(
                Identity::Identified(2),
                &[Permission::ViewAllProposal, Permission::ViewSelfProposal],
            )
            .await
            .unwrap();
        assert_eq!(role, Role::User);

        assert!(gate.require_any(Identity::Identified(1), &[]).await.is_err());
        assert!(gate.require_all(Identity::Anonymous, &[]).await.is_ok());
    }

    #[tokio::test]
    async fn test_admin_passes_everything() {
        let gate = gate(users());

        let role = gate
            .require_all(Identity::Identified(1), &Permission::ALL)
            .await
            .unwrap();
        assert_eq!(role, Role::Admin);
    }

    #[tokio::test]
    async fn test_store_error_propagates() {
        let gate = gate(MemoryStore::failing());

        let err = gate
            .require_all(Identity::Identified(1), &[Permission::ViewWord])
            .await
            .unwrap_err();
        assert!(matches!(err, AuthError::Store(_)));

        // anonymous callers never touch the store
        assert!(gate
            .require_all(Identity::Anonymous, &[Permission::ViewWord])
            .await
            .is_ok());
    }

    #[tokio::test]
    async fn test_lookup_timeout() {
        let gate = gate(MemoryStore::slow(Duration::from_secs(10)))
            .with_lookup_timeout(Duration::from_millis(20));

        let err = gate
            .require_all(Identity::Identified(1), &[Permission::ViewWord])
            .await
            .unwrap_err();
        assert!(matches!(err, AuthError::LookupTimeout));
    }

    #[test]
    fn test_requirement_constructors() {
        let all = Requirement::all([Permission::ViewWord, Permission::AddWord]);
        assert_eq!(
            all,
            Requirement::All(vec![Permission::ViewWord, Permission::AddWord])
        );
        assert!(!all.is_satisfied_by(Role::User));
        assert!(all.is_satisfied_by(Role::Admin));

        let any = Requirement::any([Permission::ViewWord, Permission::AddWord]);
        assert!(any.is_satisfied_by(Role::NonUser));
    }
}
