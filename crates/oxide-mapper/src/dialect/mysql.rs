//! MySQL dialect.

use super::Dialect;
use crate::value::ScalarKind;

/// MySQL and MariaDB column types.
#[derive(Debug, Default, Clone, Copy)]
pub struct MysqlDialect;

impl MysqlDialect {
    /// Creates a new MySQL dialect.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

impl Dialect for MysqlDialect {
    fn name(&self) -> &'static str {
        "mysql"
    }

    fn primary_key_type(&self) -> &'static str {
        "integer auto_increment"
    }

    fn column_type(&self, kind: ScalarKind) -> &'static str {
        match kind {
            ScalarKind::Bytes => "longblob",
            ScalarKind::Integer => "integer",
            ScalarKind::Text => "text",
            ScalarKind::Float => "real",
            ScalarKind::Boolean => "numeric",
            ScalarKind::Unknown => "unknown",
        }
    }
}
