//! DELETE statement builder.

use tracing::debug;

use crate::clause::{Clause, Compile};
use crate::error::Result;
use crate::executor::{ExecResult, Executor};
use crate::value::Params;

/// A `DELETE FROM <table> WHERE <condition>` statement.
///
/// There is no way to build a DELETE without a condition.
#[derive(Debug, Clone, PartialEq)]
pub struct Delete {
    table: String,
    where_clause: Clause,
}

impl Delete {
    /// Creates a delete of the rows of `table` matching `where_clause`.
    #[must_use]
    pub fn new(table: impl Into<String>, where_clause: Clause) -> Self {
        Self {
            table: table.into(),
            where_clause,
        }
    }

    /// Returns the table name.
    #[must_use]
    pub fn table(&self) -> &str {
        &self.table
    }

    /// Executes the delete.
    ///
    /// # Errors
    ///
    /// Returns the compile error or the executor's error.
    pub async fn exec<X: Executor + ?Sized>(&self, executor: &X) -> Result<ExecResult> {
        let (sql, params) = self.compile()?;
        debug!(sql = %sql, params = params.len(), "executing delete");
        executor.exec(&sql, &params).await
    }
}

impl Compile for Delete {
    fn compile(&self) -> Result<(String, Params)> {
        let (where_sql, params) = self.where_clause.compile()?;
        Ok((format!("DELETE FROM {} WHERE {where_sql}", self.table), params))
    }
}
