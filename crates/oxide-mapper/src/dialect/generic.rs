//! Generic SQL dialect.

use super::Dialect;

/// The default column types, as understood by SQLite.
#[derive(Debug, Default, Clone, Copy)]
pub struct GenericDialect;

impl GenericDialect {
    /// Creates a new generic dialect.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

impl Dialect for GenericDialect {
    fn name(&self) -> &'static str {
        "generic"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value::ScalarKind;

    #[test]
    fn test_generic_dialect() {
        let dialect = GenericDialect::new();
        assert_eq!(dialect.name(), "generic");
        assert_eq!(dialect.primary_key_type(), "integer");
        assert_eq!(dialect.column_type(ScalarKind::Float), "real");
        assert_eq!(dialect.column_type(ScalarKind::Boolean), "numeric");
    }
}
