//! Statement execution.
//!
//! The mapper never talks to a database directly. Statements compile to SQL
//! text with `:name` placeholders plus a parameter map, and an [`Executor`]
//! runs them. [`sqlx::SqlitePool`] implements the trait out of the box; tests
//! and other backends provide their own.

mod sqlite;

pub use sqlite::bind_positional;

use crate::entity::{AccessMut, Entity};
use crate::error::{Error, Result};
use crate::relation::{HasOne, UNSET};
use crate::value::{Params, SqlValue};

/// Outcome of a statement that does not return rows.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ExecResult {
    /// Number of rows changed by the statement.
    pub rows_affected: u64,
    /// Id generated by the last insert, if the backend reports one.
    pub last_insert_id: Option<i64>,
}

/// Runs compiled statements against a database.
#[allow(async_fn_in_trait)]
pub trait Executor {
    /// Name of the underlying driver, used to pick a SQL dialect.
    fn driver_name(&self) -> &str {
        "generic"
    }

    /// Executes a statement that returns no rows.
    ///
    /// # Errors
    ///
    /// Returns the driver's failure, as [`Error::Database`] or
    /// [`Error::Executor`].
    async fn exec(&self, sql: &str, params: &Params) -> Result<ExecResult>;

    /// Executes a query and returns every row.
    ///
    /// # Errors
    ///
    /// Returns the driver's failure, or [`Error::Decode`] if a column value
    /// cannot be represented.
    async fn query(&self, sql: &str, params: &Params) -> Result<Vec<Row>>;
}

/// A result row: column names paired with their values, in select order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Row {
    columns: Vec<(String, SqlValue)>,
}

impl Row {
    /// Creates an empty row.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            columns: Vec::new(),
        }
    }

    /// Appends a column, builder style.
    #[must_use]
    pub fn with(mut self, column: impl Into<String>, value: SqlValue) -> Self {
        self.push(column, value);
        self
    }

    /// Appends a column.
    pub fn push(&mut self, column: impl Into<String>, value: SqlValue) {
        self.columns.push((column.into(), value));
    }

    /// Returns the value of `column`.
    #[must_use]
    pub fn get(&self, column: &str) -> Option<&SqlValue> {
        self.columns
            .iter()
            .find(|(name, _)| name == column)
            .map(|(_, value)| value)
    }

    /// Returns the columns in select order.
    #[must_use]
    pub fn columns(&self) -> &[(String, SqlValue)] {
        &self.columns
    }

    /// Returns the number of columns.
    #[must_use]
    pub fn len(&self) -> usize {
        self.columns.len()
    }

    /// Returns `true` if the row has no columns.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }
}

impl<S: Into<String>> FromIterator<(S, SqlValue)> for Row {
    fn from_iter<I: IntoIterator<Item = (S, SqlValue)>>(iter: I) -> Self {
        Self {
            columns: iter
                .into_iter()
                .map(|(name, value)| (name.into(), value))
                .collect(),
        }
    }
}

fn integer(column: &str, value: &SqlValue) -> Result<i64> {
    match value {
        SqlValue::Int(n) => Ok(*n),
        other => Err(Error::Decode(format!(
            "column `{column}` holds {} value, expected integer",
            other.type_name()
        ))),
    }
}

/// Copies the columns of `row` into the matching fields of `target`.
///
/// Every column must have a destination field. Fields without a column keep
/// their current value.
///
/// # Errors
///
/// Returns [`Error::Decode`] if a column has no destination field or holds a
/// value of the wrong type.
pub fn decode_row<E: Entity + ?Sized>(row: &Row, target: &mut E) -> Result<()> {
    let mut fields = target.describe_fields_mut();

    for (column, value) in row.columns() {
        let Some(field) = fields.iter_mut().find(|field| field.column == column) else {
            return Err(Error::Decode(format!("missing destination name `{column}`")));
        };

        match &mut field.access {
            AccessMut::PrimaryKey(key) => key.0 = integer(column, value)?,
            AccessMut::Scalar(scalar) => scalar.assign(value.clone())?,
            AccessMut::HasOne(relation, _) => {
                let id = match value {
                    SqlValue::Null => UNSET,
                    other => integer(column, other)?,
                };
                **relation = HasOne::bound(id);
            }
            AccessMut::HasMany(..) => {
                return Err(Error::Decode(format!(
                    "column `{column}` maps to a has-many relation"
                )));
            }
        }
    }

    Ok(())
}
