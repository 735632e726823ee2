//! Error types for the mapper.

use thiserror::Error;

/// Errors produced while compiling or executing statements.
///
/// `ParameterCollision` and `InvalidComposition` indicate a usage bug in the
/// calling code: the statement being built is wrong, not the data. Everything
/// else comes back from the executor or from row decoding and is returned to
/// the caller untouched.
#[derive(Debug, Error)]
pub enum Error {
    /// Two clauses in one statement bind the same parameter name.
    #[error("bind parameter `{0}` would be overwritten")]
    ParameterCollision(String),

    /// A clause was appended to a tree that is not an AND clause.
    #[error("cannot AND a clause onto {0}")]
    InvalidComposition(&'static str),

    /// Database error from sqlx.
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Failure reported by a non-sqlx executor.
    #[error("executor error: {0}")]
    Executor(#[source] Box<dyn std::error::Error + Send + Sync>),

    /// A row could not be decoded into the target entity.
    #[error("decode error: {0}")]
    Decode(String),

    /// A query expected to return one row returned none.
    #[error("no rows in result set")]
    NoRows,

    /// The statement references a named parameter that was never bound.
    #[error("missing bind parameter `{0}`")]
    MissingParameter(String),

    /// A relation was evaluated before its owner attached it to a table.
    #[error("relation has not been attached to a table yet")]
    DetachedRelation,
}

/// Result type alias for mapper operations.
pub type Result<T> = std::result::Result<T, Error>;
