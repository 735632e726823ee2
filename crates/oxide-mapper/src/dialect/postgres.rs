//! PostgreSQL dialect.

use super::Dialect;
use crate::value::ScalarKind;

/// PostgreSQL column types.
#[derive(Debug, Default, Clone, Copy)]
pub struct PostgresDialect;

impl PostgresDialect {
    /// Creates a new PostgreSQL dialect.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

impl Dialect for PostgresDialect {
    fn name(&self) -> &'static str {
        "postgres"
    }

    fn primary_key_type(&self) -> &'static str {
        "serial"
    }

    fn column_type(&self, kind: ScalarKind) -> &'static str {
        match kind {
            ScalarKind::Bytes => "bytea",
            ScalarKind::Integer => "integer",
            ScalarKind::Text => "text",
            ScalarKind::Float => "real",
            ScalarKind::Boolean => "numeric",
            ScalarKind::Unknown => "unknown",
        }
    }
}
