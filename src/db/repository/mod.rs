//! Repository Module
//!
//! All persistence goes through these free functions over a `SqlitePool`.
//! The schema carries no foreign-key constraints: every cross-entity rule
//! (category/dish/setmeal references, dish-owned flavor rows) is checked
//! here, and multi-statement mutations run inside one transaction.

pub mod category;
pub mod dish;
pub mod employee;
pub mod setmeal;

use thiserror::Error;

/// Why a delete / batch-delete was refused.
///
/// The first violated precondition determines the reason reported.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlockedReason {
    /// Category still referenced by at least one dish
    HasDishes,
    /// Category still referenced by at least one setmeal
    HasSetmeals,
    /// Batch contains an on-sale dish
    OnSale,
    /// Batch contains a dish linked to a setmeal
    LinkedToSetmeal,
}

impl std::fmt::Display for BlockedReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let msg = match self {
            BlockedReason::HasDishes => "Category still has dishes and cannot be deleted",
            BlockedReason::HasSetmeals => "Category still has setmeals and cannot be deleted",
            BlockedReason::OnSale => "On-sale dishes cannot be deleted",
            BlockedReason::LinkedToSetmeal => "Dishes linked to a setmeal cannot be deleted",
        };
        write!(f, "{msg}")
    }
}

/// Repository error types
#[derive(Debug, Error)]
pub enum RepoError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Duplicate: {0}")]
    Duplicate(String),

    #[error("Deletion blocked: {0}")]
    DeletionBlocked(BlockedReason),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Database error: {0}")]
    Database(String),
}

impl From<sqlx::Error> for RepoError {
    fn from(err: sqlx::Error) -> Self {
        RepoError::Database(err.to_string())
    }
}

/// Result type for repository operations
pub type RepoResult<T> = Result<T, RepoError>;

/// Build a `?,?,...` placeholder list for an `IN` clause
pub(crate) fn in_placeholders(len: usize) -> String {
    vec!["?"; len].join(",")
}
