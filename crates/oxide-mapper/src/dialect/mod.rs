//! SQL dialect support.
//!
//! Databases disagree on column types, most visibly for auto-incrementing
//! primary keys and binary data. A [`Dialect`] maps the scalar kinds of an
//! entity to the type names used in `CREATE TABLE`.

mod generic;
mod mysql;
mod postgres;

pub use generic::GenericDialect;
pub use mysql::MysqlDialect;
pub use postgres::PostgresDialect;

use crate::value::ScalarKind;

/// Trait for dialect-specific column types.
pub trait Dialect {
    /// Returns the name of the dialect.
    fn name(&self) -> &'static str;

    /// Returns the column type of primary keys.
    fn primary_key_type(&self) -> &'static str {
        "integer"
    }

    /// Returns the column type of a scalar kind.
    fn column_type(&self, kind: ScalarKind) -> &'static str {
        match kind {
            ScalarKind::Integer => "integer",
            ScalarKind::Text => "text",
            ScalarKind::Bytes => "blob",
            ScalarKind::Float => "real",
            ScalarKind::Boolean => "numeric",
            ScalarKind::Unknown => "unknown",
        }
    }
}

/// Picks the dialect for an executor's driver name.
///
/// Unrecognised drivers get the generic dialect.
#[must_use]
pub fn dialect_for_driver(driver: &str) -> Box<dyn Dialect> {
    match driver.to_ascii_lowercase().as_str() {
        "postgres" | "postgresql" | "pgx" => Box::new(PostgresDialect::new()),
        "mysql" | "mariadb" => Box::new(MysqlDialect::new()),
        _ => Box::new(GenericDialect::new()),
    }
}
