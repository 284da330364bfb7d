//! User lookup used by the authorization layer

use async_trait::async_trait;
use wilin_db::{Database, DbError, User};

/// Read access to user accounts
///
/// `Ok(None)` means the user does not exist. Any `Err` is a data-layer
/// fault and must not be read as "no such user".
#[async_trait]
pub trait UserStore: Send + Sync {
    async fn read_user_by_id(&self, id: i64) -> Result<Option<User>, DbError>;

    async fn read_user_by_username(&self, username: &str) -> Result<Option<User>, DbError>;

    async fn read_user_by_email(&self, email: &str) -> Result<Option<User>, DbError>;
}

#[async_trait]
impl UserStore for Database {
    async fn read_user_by_id(&self, id: i64) -> Result<Option<User>, DbError> {
        self.get_user_by_id(id).await
    }

    async fn read_user_by_username(&self, username: &str) -> Result<Option<User>, DbError> {
        self.get_user_by_username(username).await
    }

    async fn read_user_by_email(&self, email: &str) -> Result<Option<User>, DbError> {
        self.get_user_by_email(email).await
    }
}
