//! In-memory user store for tests

use std::collections::HashMap;
use std::time::Duration;

use async_trait::async_trait;
use chrono::Utc;
use wilin_db::{DbError, User};

use crate::store::UserStore;

#[derive(Default)]
pub(crate) struct MemoryStore {
    users: HashMap<i64, User>,
    failing: bool,
    delay: Option<Duration>,
}

impl MemoryStore {
    pub(crate) fn with_user(mut self, id: i64, role: &str) -> Self {
        self.users.insert(
            id,
            User {
                id,
                email: format!("user{id}@example.com"),
                username: format!("user{id}"),
                password_hash: String::new(),
                role: role.to_string(),
                created_at: Utc::now(),
            },
        );
        self
    }

    pub(crate) fn failing() -> Self {
        Self {
            failing: true,
            ..Self::default()
        }
    }

    pub(crate) fn slow(delay: Duration) -> Self {
        Self {
            delay: Some(delay),
            ..Self::default()
        }
    }

    async fn lookup(&self, found: Option<&User>) -> Result<Option<User>, DbError> {
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        if self.failing {
            return Err(DbError::Query(sqlx::Error::PoolTimedOut));
        }
        Ok(found.cloned())
    }
}

#[async_trait]
impl UserStore for MemoryStore {
    async fn read_user_by_id(&self, id: i64) -> Result<Option<User>, DbError> {
        self.lookup(self.users.get(&id)).await
    }

    async fn read_user_by_username(&self, username: &str) -> Result<Option<User>, DbError> {
        self.lookup(self.users.values().find(|u| u.username == username))
            .await
    }

    async fn read_user_by_email(&self, email: &str) -> Result<Option<User>, DbError> {
        self.lookup(self.users.values().find(|u| u.email == email)).await
    }
}
