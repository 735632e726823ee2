//! INSERT statement builder.

use std::fmt;

use tracing::{debug, warn};

use crate::clause::Compile;
use crate::error::Result;
use crate::executor::{ExecResult, Executor};
use crate::value::{Params, SqlValue};

/// Callback run with the generated primary key after a successful insert.
pub type InsertHook<'a> = Box<dyn FnOnce(i64) + 'a>;

/// An `INSERT INTO <table> (<cols>) VALUES (<placeholders>)` statement.
///
/// Each column is bound under its own name, so `name` becomes the
/// placeholder `:name`. With no values the statement is
/// `INSERT INTO <table> DEFAULT VALUES`.
pub struct Insert<'a> {
    table: String,
    values: Params,
    post_exec: Option<InsertHook<'a>>,
}

impl<'a> Insert<'a> {
    /// Creates an insert of `values` (column name to value) into `table`.
    #[must_use]
    pub fn new(table: impl Into<String>, values: Params) -> Self {
        Self {
            table: table.into(),
            values,
            post_exec: None,
        }
    }

    /// Sets the callback that receives the generated key.
    #[must_use]
    pub fn on_inserted(mut self, hook: impl FnOnce(i64) + 'a) -> Self {
        self.post_exec = Some(Box::new(hook));
        self
    }

    /// Returns the table name.
    #[must_use]
    pub fn table(&self) -> &str {
        &self.table
    }

    /// Returns the value bound for `column`.
    #[must_use]
    pub fn value(&self, column: &str) -> Option<&SqlValue> {
        self.values.get(column)
    }

    /// Executes the insert.
    ///
    /// The callback only runs if the statement succeeded and the executor
    /// reported a generated key.
    ///
    /// # Errors
    ///
    /// Returns the executor's error if the statement fails.
    pub async fn exec<X: Executor + ?Sized>(self, executor: &X) -> Result<ExecResult> {
        let (sql, params) = self.compile()?;
        debug!(sql = %sql, params = params.len(), "executing insert");
        let result = executor.exec(&sql, &params).await?;

        if let Some(hook) = self.post_exec {
            match result.last_insert_id {
                Some(id) => hook(id),
                None => warn!(table = %self.table, "insert reported no generated key"),
            }
        }

        Ok(result)
    }
}

impl Compile for Insert<'_> {
    fn compile(&self) -> Result<(String, Params)> {
        if self.values.is_empty() {
            return Ok((
                format!("INSERT INTO {} DEFAULT VALUES", self.table),
                Params::new(),
            ));
        }

        let columns: Vec<&str> = self.values.keys().map(String::as_str).collect();
        let placeholders: Vec<String> = columns.iter().map(|c| format!(":{c}")).collect();

        let sql = format!(
            "INSERT INTO {} ({}) VALUES ({})",
            self.table,
            columns.join(", "),
            placeholders.join(", ")
        );
        Ok((sql, self.values.clone()))
    }
}

impl fmt::Debug for Insert<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Insert")
            .field("table", &self.table)
            .field("values", &self.values)
            .field("post_exec", &self.post_exec.is_some())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_single_column() {
        let mut values = Params::new();
        values.insert("name".into(), SqlValue::Text("Hunter Leath".into()));

        let (sql, params) = Insert::new("author", values).compile().unwrap();
        assert_eq!(sql, "INSERT INTO author (name) VALUES (:name)");
        assert_eq!(params["name"], SqlValue::Text("Hunter Leath".into()));
    }

    #[test]
    fn test_columns_match_placeholders() {
        let mut values = Params::new();
        values.insert("name".into(), SqlValue::Text("a".into()));
        values.insert("body".into(), SqlValue::Text("b".into()));
        values.insert("author".into(), SqlValue::Int(-5));

        let (sql, params) = Insert::new("story", values).compile().unwrap();
        assert_eq!(
            sql,
            "INSERT INTO story (name, body, author) VALUES (:name, :body, :author)"
        );
        assert_eq!(params.len(), 3);
    }

    #[test]
    fn test_no_values_uses_defaults() {
        let (sql, params) = Insert::new("marker", Params::new()).compile().unwrap();
        assert_eq!(sql, "INSERT INTO marker DEFAULT VALUES");
        assert!(params.is_empty());
    }
}
