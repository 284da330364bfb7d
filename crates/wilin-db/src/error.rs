//! Database error types
//!
//! A missing row is not an error: lookups return `Ok(None)`.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum DbError {
    #[error("Query failed: {0}")]
    Query(#[from] sqlx::Error),

    /// Unique e-mail or username already taken
    #[error("Duplicate entry: {0}")]
    Duplicate(String),

    #[error("Migration error: {0}")]
    Migration(String),
}
