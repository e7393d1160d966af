//! Repository Module
//!
//! Per-entity CRUD functions over the SQLite pool. Handlers never touch
//! SQL directly; every persistence call goes through one of these modules.

// Auth
pub mod password_reset;
pub mod role;
pub mod user;

// Parties
pub mod branch;
pub mod customer;

// Catalog & pricing
pub mod laundry_category;
pub mod pricing_rule;
pub mod service_type;

// Orders & money
pub mod expense;
pub mod expense_category;
pub mod order;
pub mod payment;

// Reporting
pub mod report;

use thiserror::Error;

/// Repository error types
#[derive(Debug, Error)]
pub enum RepoError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Duplicate: {0}")]
    Duplicate(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Business rule violation: {0}")]
    BusinessRule(String),

    #[error("Database error: {0}")]
    Database(String),
}

impl From<sqlx::Error> for RepoError {
    fn from(err: sqlx::Error) -> Self {
        // SQLite reports unique-index violations as a database error with a
        // "UNIQUE constraint failed" message; surface them as Duplicate so
        // handlers can answer 409 instead of 500.
        if let sqlx::Error::Database(db_err) = &err
            && db_err.message().contains("UNIQUE constraint failed")
        {
            return RepoError::Duplicate(db_err.message().to_string());
        }
        RepoError::Database(err.to_string())
    }
}

/// Result type for repository operations
pub type RepoResult<T> = Result<T, RepoError>;
