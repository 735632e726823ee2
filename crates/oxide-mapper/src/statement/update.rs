//! UPDATE statement builder.

use std::fmt;

use tracing::debug;

use crate::clause::{Clause, Compile};
use crate::error::Result;
use crate::executor::{ExecResult, Executor};
use crate::value::{param_union, Params};

/// Callback run after a successful update.
pub type UpdateHook<'a> = Box<dyn FnOnce() + 'a>;

/// An `UPDATE <table> SET <columns> WHERE <condition>` statement.
pub struct Update<'a> {
    table: String,
    columns: Clause,
    where_clause: Clause,
    post_exec: Option<UpdateHook<'a>>,
}

impl<'a> Update<'a> {
    /// Creates an update of `table`.
    ///
    /// `columns` is normally a SET clause of equalities.
    #[must_use]
    pub fn new(table: impl Into<String>, columns: Clause, where_clause: Clause) -> Self {
        Self {
            table: table.into(),
            columns,
            where_clause,
            post_exec: None,
        }
    }

    /// Sets the callback run after the update succeeds.
    #[must_use]
    pub fn on_updated(mut self, hook: impl FnOnce() + 'a) -> Self {
        self.post_exec = Some(Box::new(hook));
        self
    }

    /// Returns the table name.
    #[must_use]
    pub fn table(&self) -> &str {
        &self.table
    }

    /// Executes the update, then runs the callback.
    ///
    /// # Errors
    ///
    /// Returns the compile error or the executor's error.
    pub async fn exec<X: Executor + ?Sized>(self, executor: &X) -> Result<ExecResult> {
        let (sql, params) = self.compile()?;
        debug!(sql = %sql, params = params.len(), "executing update");
        let result = executor.exec(&sql, &params).await?;
        if let Some(hook) = self.post_exec {
            hook();
        }
        Ok(result)
    }
}

impl Compile for Update<'_> {
    fn compile(&self) -> Result<(String, Params)> {
        let (where_sql, where_params) = self.where_clause.compile()?;
        let (set_sql, set_params) = self.columns.compile()?;
        let sql = format!("UPDATE {} SET {set_sql} WHERE {where_sql}", self.table);
        Ok((sql, param_union(where_params, set_params)?))
    }
}

impl fmt::Debug for Update<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Update")
            .field("table", &self.table)
            .field("columns", &self.columns)
            .field("where_clause", &self.where_clause)
            .field("post_exec", &self.post_exec.is_some())
            .finish()
    }
}
