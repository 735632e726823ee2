//! CREATE TABLE statement builder.

use tracing::debug;

use crate::clause::Compile;
use crate::error::Result;
use crate::executor::{ExecResult, Executor};
use crate::schema::Field;
use crate::value::Params;

/// A `CREATE TABLE` statement with a named primary key constraint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateTable {
    name: String,
    fields: Vec<Field>,
    force: bool,
    key: String,
}

impl CreateTable {
    /// Creates the statement.
    ///
    /// Unless `force` is set the table is only created if it does not exist
    /// yet. An empty `key` omits the primary key constraint.
    #[must_use]
    pub fn new(
        name: impl Into<String>,
        fields: Vec<Field>,
        force: bool,
        key: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            fields,
            force,
            key: key.into(),
        }
    }

    /// Executes the statement.
    ///
    /// # Errors
    ///
    /// Returns the compile error or the executor's error.
    pub async fn exec<X: Executor + ?Sized>(&self, executor: &X) -> Result<ExecResult> {
        let (sql, params) = self.compile()?;
        debug!(sql = %sql, "executing create table");
        executor.exec(&sql, &params).await
    }
}

impl Compile for CreateTable {
    fn compile(&self) -> Result<(String, Params)> {
        let exists = if self.force { "" } else { "IF NOT EXISTS" };

        let mut columns: Vec<String> = self
            .fields
            .iter()
            .map(|field| format!("{} {}", field.name, field.sql_type))
            .collect();
        if !self.key.is_empty() {
            columns.push(format!(
                "CONSTRAINT {}_pk PRIMARY KEY ({})",
                self.name, self.key
            ));
        }

        let sql = format!(
            "CREATE TABLE {exists} {} ({})",
            self.name,
            columns.join(", ")
        );
        Ok((sql, Params::new()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn author_fields() -> Vec<Field> {
        vec![Field::new("id", "integer"), Field::new("name", "text")]
    }

    #[test]
    fn test_forced() {
        let (sql, params) = CreateTable::new("author", author_fields(), true, "id")
            .compile()
            .unwrap();
        // Forcing leaves the existence guard empty, hence the double space.
        assert_eq!(
            sql,
            "CREATE TABLE  author (id integer, name text, CONSTRAINT author_pk PRIMARY KEY (id))"
        );
        assert!(params.is_empty());
    }

    #[test]
    fn test_if_not_exists() {
        let (sql, _) = CreateTable::new("author", author_fields(), false, "id")
            .compile()
            .unwrap();
        assert_eq!(
            sql,
            "CREATE TABLE IF NOT EXISTS author (id integer, name text, \
             CONSTRAINT author_pk PRIMARY KEY (id))"
        );
    }

    #[test]
    fn test_without_key() {
        let (sql, _) = CreateTable::new("log", vec![Field::new("line", "text")], false, "")
            .compile()
            .unwrap();
        assert_eq!(sql, "CREATE TABLE IF NOT EXISTS log (line text)");
    }
}
