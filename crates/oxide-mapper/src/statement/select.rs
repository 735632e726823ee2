//! SELECT statement builder.

use tracing::debug;

use crate::clause::{Clause, Compile};
use crate::entity::Entity;
use crate::error::{Error, Result};
use crate::executor::{decode_row, ExecResult, Executor};
use crate::relation::load_relationships;
use crate::value::{param_union, Params, ToSqlValue};

/// A `SELECT * FROM <table>` statement.
///
/// The builder is mutated in place. Clauses are emitted as
/// `WHERE`, `ORDER BY`, `LIMIT` no matter in which order they were set, and
/// every `filter` is ANDed onto the previous ones:
///
/// ```rust
/// use oxide_mapper::{Compile, Select};
///
/// let mut query = Select::new("story");
/// query
///     .limit(5)
///     .order("slug", true)
///     .filter("slug", "going-to-the-beach")
///     .unwrap();
///
/// let (sql, _) = query.compile().unwrap();
/// assert_eq!(
///     sql,
///     "SELECT * FROM story WHERE (slug = :variable_slug) ORDER BY slug ASC LIMIT 5"
/// );
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct Select {
    table: String,
    where_clause: Option<Clause>,
    order: Option<Clause>,
    limit: Option<Clause>,
}

impl Select {
    /// Creates a SELECT over every row of `table`.
    #[must_use]
    pub fn new(table: impl Into<String>) -> Self {
        Self {
            table: table.into(),
            where_clause: None,
            order: None,
            limit: None,
        }
    }

    /// Creates a SELECT over `table` filtered on `key = value`.
    #[must_use]
    pub fn filtered(table: impl Into<String>, key: &str, value: impl ToSqlValue) -> Self {
        let mut select = Self::new(table);
        select.where_clause = Some(Clause::and(vec![Clause::eq(key, value)]));
        select
    }

    /// Returns the table name.
    #[must_use]
    pub fn table(&self) -> &str {
        &self.table
    }

    /// Returns the current WHERE clause.
    #[must_use]
    pub const fn where_expr(&self) -> Option<&Clause> {
        self.where_clause.as_ref()
    }

    /// ANDs `key = value` onto the WHERE clause.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidComposition`] if the WHERE clause is not an
    /// AND clause.
    pub fn filter(&mut self, key: &str, value: impl ToSqlValue) -> Result<&mut Self> {
        self.where_clause(Clause::eq(key, value))
    }

    /// ANDs an arbitrary clause onto the WHERE clause.
    ///
    /// Fails if the WHERE clause was replaced with something other than an
    /// AND clause.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidComposition`] if the WHERE clause is not an
    /// AND clause.
    pub fn where_clause(&mut self, clause: Clause) -> Result<&mut Self> {
        match &mut self.where_clause {
            Some(existing) => existing.push_and(clause)?,
            None => self.where_clause = Some(Clause::and(vec![clause])),
        }
        Ok(self)
    }

    /// Replaces the WHERE clause wholesale.
    pub fn replace_where(&mut self, clause: Clause) -> &mut Self {
        self.where_clause = Some(clause);
        self
    }

    /// Sets the ORDER BY clause.
    pub fn order(&mut self, key: &str, ascending: bool) -> &mut Self {
        self.order = Some(Clause::order(key, ascending));
        self
    }

    /// Sets the LIMIT clause.
    pub fn limit(&mut self, count: u64) -> &mut Self {
        self.limit = Some(Clause::limit(count));
        self
    }

    /// Runs the query and decodes its first row into `target`.
    ///
    /// Relationships of `target` are attached after decoding.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NoRows`] if nothing matched. Compile, executor and
    /// decode errors are passed through.
    pub async fn one<X, E>(&self, executor: &X, target: &mut E) -> Result<()>
    where
        X: Executor + ?Sized,
        E: Entity + ?Sized,
    {
        let (sql, params) = self.compile()?;
        debug!(sql = %sql, params = params.len(), "querying one row");
        let rows = executor.query(&sql, &params).await?;
        let row = rows.first().ok_or(Error::NoRows)?;
        decode_row(row, target)?;
        load_relationships(target, None);
        Ok(())
    }

    /// Runs the query and appends every decoded row to `out`.
    ///
    /// # Errors
    ///
    /// Compile, executor and decode errors are passed through. Rows decoded
    /// before a failure stay in `out`.
    pub async fn all<X, E>(&self, executor: &X, out: &mut Vec<E>) -> Result<()>
    where
        X: Executor + ?Sized,
        E: Entity + Default,
    {
        let (sql, params) = self.compile()?;
        debug!(sql = %sql, params = params.len(), "querying all rows");
        let rows = executor.query(&sql, &params).await?;
        out.reserve(rows.len());
        for row in &rows {
            let mut entity = E::default();
            decode_row(row, &mut entity)?;
            load_relationships(&mut entity, None);
            out.push(entity);
        }
        Ok(())
    }

    /// Executes the query without reading rows back.
    ///
    /// # Errors
    ///
    /// Returns the compile error or the executor's error.
    pub async fn exec<X: Executor + ?Sized>(&self, executor: &X) -> Result<ExecResult> {
        let (sql, params) = self.compile()?;
        debug!(sql = %sql, params = params.len(), "executing select");
        executor.exec(&sql, &params).await
    }
}

impl Compile for Select {
    fn compile(&self) -> Result<(String, Params)> {
        let mut sql = format!("SELECT * FROM {}", self.table);
        let mut params = Params::new();

        if let Some(where_clause) = &self.where_clause {
            let (where_sql, where_params) = where_clause.compile()?;
            sql.push_str(&format!(" WHERE ({where_sql})"));
            params = param_union(params, where_params)?;
        }

        if let Some(order) = &self.order {
            let (order_sql, order_params) = order.compile()?;
            sql.push_str(&format!(" ORDER BY {order_sql}"));
            params = param_union(params, order_params)?;
        }

        if let Some(limit) = &self.limit {
            let (limit_sql, limit_params) = limit.compile()?;
            sql.push_str(&format!(" LIMIT {limit_sql}"));
            params = param_union(params, limit_params)?;
        }

        Ok((sql, params))
    }
}
