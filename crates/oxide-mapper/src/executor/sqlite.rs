//! SQLite executor on top of sqlx.

use sqlx::sqlite::{SqliteArguments, SqlitePool, SqliteRow};
use sqlx::{Column as _, Row as _, Sqlite, TypeInfo as _, ValueRef as _};

use super::{ExecResult, Executor, Row};
use crate::error::{Error, Result};
use crate::value::{Params, SqlValue};

type SqliteQuery<'q> = sqlx::query::Query<'q, Sqlite, SqliteArguments<'q>>;

impl Executor for SqlitePool {
    fn driver_name(&self) -> &str {
        "sqlite"
    }

    async fn exec(&self, sql: &str, params: &Params) -> Result<ExecResult> {
        let (text, values) = bind_positional(sql, params)?;
        let mut query = sqlx::query(&text);
        for value in values {
            query = bind_value(query, value);
        }

        let result = query.execute(self).await?;
        Ok(ExecResult {
            rows_affected: result.rows_affected(),
            last_insert_id: Some(result.last_insert_rowid()),
        })
    }

    async fn query(&self, sql: &str, params: &Params) -> Result<Vec<Row>> {
        let (text, values) = bind_positional(sql, params)?;
        let mut query = sqlx::query(&text);
        for value in values {
            query = bind_value(query, value);
        }

        let rows = query.fetch_all(self).await?;
        rows.iter().map(convert_row).collect()
    }
}

/// Rewrites `:name` placeholders to positional `?` markers.
///
/// Returns the rewritten statement and the values in placeholder order. A
/// name used twice is bound twice. Quoted text and `::` casts are left
/// alone.
///
/// # Errors
///
/// Returns [`Error::MissingParameter`] if a placeholder has no value in
/// `params`.
pub fn bind_positional(sql: &str, params: &Params) -> Result<(String, Vec<SqlValue>)> {
    let mut text = String::with_capacity(sql.len());
    let mut values = Vec::with_capacity(params.len());
    let mut chars = sql.chars().peekable();

    while let Some(c) = chars.next() {
        match c {
            '\'' | '"' => {
                text.push(c);
                for inner in chars.by_ref() {
                    text.push(inner);
                    if inner == c {
                        break;
                    }
                }
            }
            ':' if chars.peek() == Some(&':') => {
                text.push_str("::");
                chars.next();
            }
            ':' if chars
                .peek()
                .is_some_and(|next| next.is_ascii_alphabetic() || *next == '_') =>
            {
                let mut name = String::new();
                while let Some(&next) = chars.peek() {
                    if !(next.is_ascii_alphanumeric() || next == '_') {
                        break;
                    }
                    name.push(next);
                    chars.next();
                }
                let value = params
                    .get(&name)
                    .ok_or_else(|| Error::MissingParameter(name.clone()))?;
                values.push(value.clone());
                text.push('?');
            }
            _ => text.push(c),
        }
    }

    Ok((text, values))
}

fn bind_value(query: SqliteQuery<'_>, value: SqlValue) -> SqliteQuery<'_> {
    match value {
        SqlValue::Null => query.bind(Option::<i64>::None),
        SqlValue::Bool(b) => query.bind(b),
        SqlValue::Int(i) => query.bind(i),
        SqlValue::Float(f) => query.bind(f),
        SqlValue::Text(s) => query.bind(s),
        SqlValue::Blob(b) => query.bind(b),
    }
}

fn convert_row(row: &SqliteRow) -> Result<Row> {
    let mut out = Row::new();
    for column in row.columns() {
        let index = column.ordinal();
        let raw = row.try_get_raw(index)?;
        let value = if raw.is_null() {
            SqlValue::Null
        } else {
            // Storage class of the value itself, not the declared column type.
            match raw.type_info().name() {
                "INTEGER" | "BOOLEAN" | "NUMERIC" => SqlValue::Int(row.try_get_unchecked(index)?),
                "REAL" => SqlValue::Float(row.try_get_unchecked(index)?),
                "BLOB" => SqlValue::Blob(row.try_get_unchecked(index)?),
                _ => SqlValue::Text(row.try_get_unchecked(index)?),
            }
        };
        out.push(column.name(), value);
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn params(pairs: &[(&str, SqlValue)]) -> Params {
        pairs
            .iter()
            .map(|(name, value)| ((*name).to_string(), value.clone()))
            .collect()
    }

    #[test]
    fn test_rewrites_named_placeholders() {
        let (text, values) = bind_positional(
            "UPDATE story SET slug = :variable_slug WHERE id = :variable_id",
            &params(&[
                ("variable_id", SqlValue::Int(3)),
                ("variable_slug", SqlValue::Text("beach".into())),
            ]),
        )
        .unwrap();
        assert_eq!(text, "UPDATE story SET slug = ? WHERE id = ?");
        assert_eq!(values, [SqlValue::Text("beach".into()), SqlValue::Int(3)]);
    }

    #[test]
    fn test_skips_quotes_and_casts() {
        let (text, values) = bind_positional(
            "SELECT ':not_a_param', id::text FROM t WHERE a = :a",
            &params(&[("a", SqlValue::Int(1))]),
        )
        .unwrap();
        assert_eq!(text, "SELECT ':not_a_param', id::text FROM t WHERE a = ?");
        assert_eq!(values, [SqlValue::Int(1)]);
    }

    #[test]
    fn test_repeated_name_binds_twice() {
        let (text, values) =
            bind_positional("SELECT :x, :x", &params(&[("x", SqlValue::Null)])).unwrap();
        assert_eq!(text, "SELECT ?, ?");
        assert_eq!(values.len(), 2);
    }

    #[test]
    fn test_missing_parameter() {
        let err = bind_positional("SELECT * FROM t WHERE a = :a", &Params::new()).unwrap_err();
        assert!(matches!(err, Error::MissingParameter(name) if name == "a"));
    }

    #[tokio::test]
    async fn test_driver_name() {
        let pool = sqlx::sqlite::SqlitePoolOptions::new()
            .max_connections(1)
            .connect("sqlite::memory:")
            .await
            .unwrap();
        assert_eq!(pool.driver_name(), "sqlite");
    }
}
