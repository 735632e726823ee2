//! Composable clause trees.
//!
//! A [`Clause`] compiles to SQL text plus the named parameters it binds.
//! Composite clauses compile their children in order and join the text:
//!
//! ```rust
//! use oxide_mapper::{Clause, Compile};
//!
//! let clause = Clause::and(vec![
//!     Clause::eq("slug", "going-to-the-beach"),
//!     Clause::eq("author", -5_i64),
//! ]);
//! let (sql, params) = clause.compile().unwrap();
//!
//! assert_eq!(sql, "slug = :variable_slug AND author = :variable_author");
//! assert_eq!(params.len(), 2);
//! ```

use crate::error::{Error, Result};
use crate::value::{param_union, Params, SqlValue, ToSqlValue};

const SQL_AND: &str = " AND ";
const SQL_OR: &str = " OR ";
const SQL_COMMA: &str = ", ";

/// Something that compiles to SQL text and a bag of named parameters.
pub trait Compile {
    /// Compiles to SQL text and the parameters it binds.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ParameterCollision`] if two parts of the tree bind
    /// the same parameter name.
    fn compile(&self) -> Result<(String, Params)>;
}

/// A node of a clause tree.
#[derive(Debug, Clone, PartialEq)]
pub enum Clause {
    /// `name = :variable_name`
    Equality {
        /// Column name.
        name: String,
        /// Bound value.
        value: SqlValue,
    },
    /// Children joined with `AND`.
    And(Vec<Clause>),
    /// Children joined with `OR`.
    Or(Vec<Clause>),
    /// Children joined with commas, as in an `UPDATE ... SET`.
    Set(Vec<Clause>),
    /// A literal row count.
    Limit(u64),
    /// `key ASC` or `key DESC`.
    Order {
        /// Column to order by.
        key: String,
        /// Ascending when true.
        ascending: bool,
    },
}

impl Clause {
    /// Creates an equality clause.
    #[must_use]
    pub fn eq(name: impl Into<String>, value: impl ToSqlValue) -> Self {
        Self::Equality {
            name: name.into(),
            value: value.to_sql_value(),
        }
    }

    /// Creates an AND clause.
    #[must_use]
    pub const fn and(clauses: Vec<Self>) -> Self {
        Self::And(clauses)
    }

    /// Creates an OR clause.
    #[must_use]
    pub const fn or(clauses: Vec<Self>) -> Self {
        Self::Or(clauses)
    }

    /// Creates a SET clause.
    #[must_use]
    pub const fn set(clauses: Vec<Self>) -> Self {
        Self::Set(clauses)
    }

    /// Creates a LIMIT clause.
    #[must_use]
    pub const fn limit(count: u64) -> Self {
        Self::Limit(count)
    }

    /// Creates an ORDER clause.
    #[must_use]
    pub fn order(key: impl Into<String>, ascending: bool) -> Self {
        Self::Order {
            key: key.into(),
            ascending,
        }
    }

    /// Appends `clause` to this AND clause.
    ///
    /// Any other variant is rejected rather than wrapped, so a tree is never
    /// reshaped behind the caller's back.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidComposition`] if `self` is not an AND clause.
    pub fn push_and(&mut self, clause: Self) -> Result<()> {
        match self {
            Self::And(children) => {
                children.push(clause);
                Ok(())
            }
            other => Err(Error::InvalidComposition(other.variant_name())),
        }
    }

    /// Returns the variant name, for error messages.
    #[must_use]
    pub const fn variant_name(&self) -> &'static str {
        match self {
            Self::Equality { .. } => "an equality clause",
            Self::And(_) => "an AND clause",
            Self::Or(_) => "an OR clause",
            Self::Set(_) => "a SET clause",
            Self::Limit(_) => "a LIMIT clause",
            Self::Order { .. } => "an ORDER clause",
        }
    }
}

/// Returns the bind parameter name used for `column`.
#[must_use]
pub fn bind_name(column: &str) -> String {
    format!("variable_{column}")
}

/// Compiles `clauses` in order, joining their text with `separator`.
///
/// # Errors
///
/// Returns the first compile error of a clause, or
/// [`Error::ParameterCollision`] if two clauses bind the same name.
pub fn join_clauses(clauses: &[Clause], separator: &str) -> Result<(String, Params)> {
    let mut sql = String::new();
    let mut params = Params::new();
    for (i, clause) in clauses.iter().enumerate() {
        if i != 0 {
            sql.push_str(separator);
        }
        let (clause_sql, clause_params) = clause.compile()?;
        sql.push_str(&clause_sql);
        params = param_union(params, clause_params)?;
    }
    Ok((sql, params))
}

impl Compile for Clause {
    fn compile(&self) -> Result<(String, Params)> {
        match self {
            Self::Equality { name, value } => {
                let bind = bind_name(name);
                let sql = format!("{name} = :{bind}");
                let mut params = Params::new();
                params.insert(bind, value.clone());
                Ok((sql, params))
            }
            Self::And(children) => join_clauses(children, SQL_AND),
            Self::Or(children) => join_clauses(children, SQL_OR),
            Self::Set(children) => join_clauses(children, SQL_COMMA),
            Self::Limit(count) => Ok((count.to_string(), Params::new())),
            Self::Order { key, ascending } => {
                let direction = if *ascending { "ASC" } else { "DESC" };
                Ok((format!("{key} {direction}"), Params::new()))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_equality() {
        let (sql, params) = Clause::eq("name", "Hunter Leath").compile().unwrap();
        assert_eq!(sql, "name = :variable_name");
        assert_eq!(params.len(), 1);
        assert_eq!(
            params["variable_name"],
            SqlValue::Text("Hunter Leath".into())
        );
    }

    #[test]
    fn test_or_and_set_separators() {
        let children = vec![Clause::eq("a", 1_i64), Clause::eq("b", 2_i64)];

        let (sql, _) = Clause::or(children.clone()).compile().unwrap();
        assert_eq!(sql, "a = :variable_a OR b = :variable_b");

        let (sql, params) = Clause::set(children).compile().unwrap();
        assert_eq!(sql, "a = :variable_a, b = :variable_b");
        assert_eq!(params.len(), 2);
    }

    #[test]
    fn test_nested_tree() {
        let clause = Clause::and(vec![
            Clause::eq("published", true),
            Clause::or(vec![Clause::eq("a", 1_i64), Clause::eq("b", 2_i64)]),
        ]);
        let (sql, params) = clause.compile().unwrap();
        assert_eq!(
            sql,
            "published = :variable_published AND a = :variable_a OR b = :variable_b"
        );
        assert_eq!(params.len(), 3);
    }

    #[test]
    fn test_limit_and_order_bind_nothing() {
        let (sql, params) = Clause::limit(5).compile().unwrap();
        assert_eq!(sql, "5");
        assert!(params.is_empty());

        let (sql, params) = Clause::order("slug", true).compile().unwrap();
        assert_eq!(sql, "slug ASC");
        assert!(params.is_empty());

        let (sql, _) = Clause::order("slug", false).compile().unwrap();
        assert_eq!(sql, "slug DESC");
    }

    #[test]
    fn test_empty_composite() {
        let (sql, params) = Clause::and(vec![]).compile().unwrap();
        assert_eq!(sql, "");
        assert!(params.is_empty());
    }

    #[test]
    fn test_same_column_twice_collides() {
        let clause = Clause::and(vec![
            Clause::eq("slug", "one"),
            Clause::eq("slug", "two"),
        ]);
        let err = clause.compile().unwrap_err();
        assert!(matches!(err, Error::ParameterCollision(name) if name == "variable_slug"));
    }

    #[test]
    fn test_push_and() {
        let mut clause = Clause::and(vec![Clause::eq("a", 1_i64)]);
        clause.push_and(Clause::eq("b", 2_i64)).unwrap();
        let (sql, _) = clause.compile().unwrap();
        assert_eq!(sql, "a = :variable_a AND b = :variable_b");
    }

    #[test]
    fn test_push_and_rejects_other_variants() {
        let mut clause = Clause::or(vec![Clause::eq("a", 1_i64)]);
        let err = clause.push_and(Clause::eq("b", 2_i64)).unwrap_err();
        assert!(matches!(err, Error::InvalidComposition("an OR clause")));

        let mut leaf = Clause::eq("a", 1_i64);
        assert!(leaf.push_and(Clause::eq("b", 2_i64)).is_err());
    }

    #[test]
    fn test_compile_is_deterministic() {
        let clause = Clause::and(vec![Clause::eq("x", 1_i64), Clause::eq("y", "z")]);
        assert_eq!(clause.compile().unwrap(), clause.compile().unwrap());
    }
}
