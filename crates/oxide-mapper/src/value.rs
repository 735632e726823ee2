//! SQL values, bind parameter maps and scalar entity fields.

use indexmap::IndexMap;

use crate::error::{Error, Result};

/// A SQL value that can be bound as a parameter or read back from a row.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum SqlValue {
    /// NULL value.
    #[default]
    Null,
    /// Boolean value.
    Bool(bool),
    /// Integer value.
    Int(i64),
    /// Float value.
    Float(f64),
    /// Text value.
    Text(String),
    /// Binary blob value.
    Blob(Vec<u8>),
}

impl SqlValue {
    /// Returns a short name for the value's variant, used in decode errors.
    #[must_use]
    pub const fn type_name(&self) -> &'static str {
        match self {
            Self::Null => "null",
            Self::Bool(_) => "bool",
            Self::Int(_) => "integer",
            Self::Float(_) => "float",
            Self::Text(_) => "text",
            Self::Blob(_) => "blob",
        }
    }
}

/// Named bind parameters of a compiled statement.
///
/// Keys keep the order in which clauses contributed them; equality ignores
/// that order.
pub type Params = IndexMap<String, SqlValue>;

/// Merges `right` into `left`.
///
/// Fails if both maps bind the same name, since one of the values would be
/// silently dropped.
///
/// # Errors
///
/// Returns [`Error::ParameterCollision`] naming the first shared name.
pub fn param_union(mut left: Params, right: Params) -> Result<Params> {
    for (name, value) in right {
        if left.contains_key(&name) {
            return Err(Error::ParameterCollision(name));
        }
        left.insert(name, value);
    }
    Ok(left)
}

/// Trait for types that can be converted to SQL values.
pub trait ToSqlValue {
    /// Converts the value to a `SqlValue`.
    fn to_sql_value(self) -> SqlValue;
}

impl ToSqlValue for SqlValue {
    fn to_sql_value(self) -> SqlValue {
        self
    }
}

impl ToSqlValue for bool {
    fn to_sql_value(self) -> SqlValue {
        SqlValue::Bool(self)
    }
}

impl ToSqlValue for i64 {
    fn to_sql_value(self) -> SqlValue {
        SqlValue::Int(self)
    }
}

macro_rules! int_to_sql_value {
    ($($ty:ty),*) => {
        $(
            impl ToSqlValue for $ty {
                fn to_sql_value(self) -> SqlValue {
                    SqlValue::Int(i64::from(self))
                }
            }
        )*
    };
}

int_to_sql_value!(i8, i16, i32, u8, u16, u32);

impl ToSqlValue for f64 {
    fn to_sql_value(self) -> SqlValue {
        SqlValue::Float(self)
    }
}

impl ToSqlValue for f32 {
    fn to_sql_value(self) -> SqlValue {
        SqlValue::Float(f64::from(self))
    }
}

impl ToSqlValue for String {
    fn to_sql_value(self) -> SqlValue {
        SqlValue::Text(self)
    }
}

impl ToSqlValue for &str {
    fn to_sql_value(self) -> SqlValue {
        SqlValue::Text(String::from(self))
    }
}

impl<T: ToSqlValue> ToSqlValue for Option<T> {
    fn to_sql_value(self) -> SqlValue {
        match self {
            Some(v) => v.to_sql_value(),
            None => SqlValue::Null,
        }
    }
}

impl ToSqlValue for Vec<u8> {
    fn to_sql_value(self) -> SqlValue {
        SqlValue::Blob(self)
    }
}

impl ToSqlValue for &[u8] {
    fn to_sql_value(self) -> SqlValue {
        SqlValue::Blob(self.to_vec())
    }
}

/// The underlying kind of a scalar entity field.
///
/// Drives the column type chosen for the field when a table is created.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScalarKind {
    /// Whole numbers.
    Integer,
    /// Strings.
    Text,
    /// Byte sequences.
    Bytes,
    /// Floating point numbers.
    Float,
    /// Booleans.
    Boolean,
    /// Anything the mapper has no column type for.
    Unknown,
}

/// A plain (non-key, non-relation) field of an entity.
///
/// Implemented for the primitive types below. Other types may implement it
/// to become storable; unless they override [`ScalarField::kind`] their
/// column type is `unknown`.
pub trait ScalarField {
    /// The kind used to pick a column type.
    fn kind(&self) -> ScalarKind {
        ScalarKind::Unknown
    }

    /// Reads the field's current value.
    fn to_value(&self) -> SqlValue;

    /// Overwrites the field from a decoded column value.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Decode`] if `value` has the wrong type or does not
    /// fit the field.
    fn assign(&mut self, value: SqlValue) -> Result<()>;
}

fn mismatch(expected: &str, value: &SqlValue) -> Error {
    Error::Decode(format!(
        "cannot assign {} value to {expected} field",
        value.type_name()
    ))
}

impl ScalarField for i64 {
    fn kind(&self) -> ScalarKind {
        ScalarKind::Integer
    }

    fn to_value(&self) -> SqlValue {
        SqlValue::Int(*self)
    }

    fn assign(&mut self, value: SqlValue) -> Result<()> {
        match value {
            SqlValue::Int(n) => *self = n,
            SqlValue::Bool(b) => *self = i64::from(b),
            other => return Err(mismatch("integer", &other)),
        }
        Ok(())
    }
}

/// Narrow integers are stored as `i64` and range-checked when read back.
macro_rules! narrow_int_scalar {
    ($($ty:ty),*) => {
        $(
            impl ScalarField for $ty {
                fn kind(&self) -> ScalarKind {
                    ScalarKind::Integer
                }

                fn to_value(&self) -> SqlValue {
                    SqlValue::Int(i64::from(*self))
                }

                fn assign(&mut self, value: SqlValue) -> Result<()> {
                    match value {
                        SqlValue::Int(n) => {
                            *self = <$ty>::try_from(n).map_err(|_| {
                                Error::Decode(format!(
                                    "integer {n} out of range for {}",
                                    stringify!($ty)
                                ))
                            })?;
                        }
                        other => return Err(mismatch("integer", &other)),
                    }
                    Ok(())
                }
            }
        )*
    };
}

narrow_int_scalar!(i8, i16, i32, u8, u16, u32);

impl ScalarField for String {
    fn kind(&self) -> ScalarKind {
        ScalarKind::Text
    }

    fn to_value(&self) -> SqlValue {
        SqlValue::Text(self.clone())
    }

    fn assign(&mut self, value: SqlValue) -> Result<()> {
        match value {
            SqlValue::Text(s) => *self = s,
            other => return Err(mismatch("text", &other)),
        }
        Ok(())
    }
}

impl ScalarField for Vec<u8> {
    fn kind(&self) -> ScalarKind {
        ScalarKind::Bytes
    }

    fn to_value(&self) -> SqlValue {
        SqlValue::Blob(self.clone())
    }

    fn assign(&mut self, value: SqlValue) -> Result<()> {
        match value {
            SqlValue::Blob(b) => *self = b,
            SqlValue::Text(s) => *self = s.into_bytes(),
            other => return Err(mismatch("bytes", &other)),
        }
        Ok(())
    }
}

impl ScalarField for f64 {
    fn kind(&self) -> ScalarKind {
        ScalarKind::Float
    }

    fn to_value(&self) -> SqlValue {
        SqlValue::Float(*self)
    }

    #[allow(clippy::cast_precision_loss)]
    fn assign(&mut self, value: SqlValue) -> Result<()> {
        match value {
            SqlValue::Float(f) => *self = f,
            SqlValue::Int(n) => *self = n as f64,
            other => return Err(mismatch("float", &other)),
        }
        Ok(())
    }
}

impl ScalarField for f32 {
    fn kind(&self) -> ScalarKind {
        ScalarKind::Float
    }

    fn to_value(&self) -> SqlValue {
        SqlValue::Float(f64::from(*self))
    }

    #[allow(clippy::cast_possible_truncation, clippy::cast_precision_loss)]
    fn assign(&mut self, value: SqlValue) -> Result<()> {
        match value {
            SqlValue::Float(f) => *self = f as f32,
            SqlValue::Int(n) => *self = n as f32,
            other => return Err(mismatch("float", &other)),
        }
        Ok(())
    }
}

impl ScalarField for bool {
    fn kind(&self) -> ScalarKind {
        ScalarKind::Boolean
    }

    fn to_value(&self) -> SqlValue {
        SqlValue::Bool(*self)
    }

    fn assign(&mut self, value: SqlValue) -> Result<()> {
        match value {
            SqlValue::Bool(b) => *self = b,
            // Stored as 0/1 by engines without a native boolean.
            SqlValue::Int(n) => *self = n != 0,
            other => return Err(mismatch("boolean", &other)),
        }
        Ok(())
    }
}

impl ScalarField for SqlValue {
    fn to_value(&self) -> SqlValue {
        self.clone()
    }

    fn assign(&mut self, value: SqlValue) -> Result<()> {
        *self = value;
        Ok(())
    }
}

impl<T: ScalarField + Default> ScalarField for Option<T> {
    fn kind(&self) -> ScalarKind {
        match self {
            Some(inner) => inner.kind(),
            None => T::default().kind(),
        }
    }

    fn to_value(&self) -> SqlValue {
        self.as_ref().map_or(SqlValue::Null, ScalarField::to_value)
    }

    fn assign(&mut self, value: SqlValue) -> Result<()> {
        if value == SqlValue::Null {
            *self = None;
            return Ok(());
        }
        let mut inner = T::default();
        inner.assign(value)?;
        *self = Some(inner);
        Ok(())
    }
}
