//! Repository Module
//!
//! Module-level async CRUD functions over `&SqlitePool`. All queries are
//! runtime-checked; multi-step invariants run inside transactions owned by
//! the calling service.

pub mod cart;
pub mod catalog;
pub mod coupon;
pub mod order;
pub mod points;
pub mod product;
pub mod user;
pub mod warehouse;

use thiserror::Error;

/// Repository error types
#[derive(Debug, Error)]
pub enum RepoError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Duplicate: {0}")]
    Duplicate(String),

    #[error("Database error: {0}")]
    Database(String),

    #[error("Validation error: {0}")]
    Validation(String),
}

impl From<sqlx::Error> for RepoError {
    fn from(err: sqlx::Error) -> Self {
        if let sqlx::Error::Database(db_err) = &err
            && db_err.is_unique_violation()
        {
            return RepoError::Duplicate(db_err.to_string());
        }
        RepoError::Database(err.to_string())
    }
}

/// Result type for repository operations
pub type RepoResult<T> = Result<T, RepoError>;
