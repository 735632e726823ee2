//! Table schemas derived from entity descriptions.

use crate::dialect::Dialect;
use crate::entity::{Entity, FieldKind};
use crate::statement::CreateTable;
use crate::value::ScalarKind;

/// A column of a table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Field {
    /// Column name.
    pub name: String,
    /// Column type as written in `CREATE TABLE`.
    pub sql_type: String,
}

impl Field {
    /// Creates a column.
    #[must_use]
    pub fn new(name: impl Into<String>, sql_type: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            sql_type: sql_type.into(),
        }
    }
}

/// The columns and primary key of a table.
///
/// Built once from a representative entity and not changed afterwards.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableSchema {
    name: String,
    fields: Vec<Field>,
    primary_key: String,
}

impl TableSchema {
    /// Creates a schema from its parts.
    #[must_use]
    pub fn new(
        name: impl Into<String>,
        fields: Vec<Field>,
        primary_key: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            fields,
            primary_key: primary_key.into(),
        }
    }

    /// Builds the schema of `entity` stored in table `name`.
    ///
    /// Columns follow the declaration order of the entity's fields. Has-one
    /// relations become integer foreign key columns; has-many relations
    /// have no column here.
    #[must_use]
    pub fn introspect<E: Entity + ?Sized>(name: &str, dialect: &dyn Dialect, entity: &E) -> Self {
        let mut fields = Vec::new();
        let mut primary_key = String::new();

        for field in entity.describe_fields() {
            match field.kind() {
                FieldKind::PrimaryKey => {
                    fields.push(Field::new(field.column, dialect.primary_key_type()));
                    primary_key = field.column.to_string();
                }
                FieldKind::RelationOne => {
                    fields.push(Field::new(
                        field.column,
                        dialect.column_type(ScalarKind::Integer),
                    ));
                }
                FieldKind::RelationMany => {}
                FieldKind::Scalar(kind) => {
                    fields.push(Field::new(field.column, dialect.column_type(kind)));
                }
            }
        }

        Self::new(name, fields, primary_key)
    }

    /// Returns the table name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the columns in declaration order.
    #[must_use]
    pub fn fields(&self) -> &[Field] {
        &self.fields
    }

    /// Returns the primary key column name, empty if there is none.
    #[must_use]
    pub fn primary_key(&self) -> &str {
        &self.primary_key
    }

    /// Builds the `CREATE TABLE` statement for this schema.
    #[must_use]
    pub fn create_table(&self, force: bool) -> CreateTable {
        CreateTable::new(
            self.name.clone(),
            self.fields.clone(),
            force,
            self.primary_key.clone(),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clause::Compile;
    use crate::dialect::{GenericDialect, PostgresDialect};
    use crate::entity::{Access, AccessMut, FieldMut, FieldRef, PrimaryKey, Relation};
    use crate::relation::{HasMany, HasOne};
    use crate::value::SqlValue;

    #[derive(Default)]
    struct Attachment {
        id: PrimaryKey,
        data: Vec<u8>,
        meta: SqlValue,
        owner: HasOne,
        versions: HasMany,
    }

    impl Entity for Attachment {
        fn describe_fields(&self) -> Vec<FieldRef<'_>> {
            vec![
                FieldRef::new("id", Access::PrimaryKey(&self.id)),
                FieldRef::new("data", Access::Scalar(&self.data)),
                FieldRef::new("meta", Access::Scalar(&self.meta)),
                FieldRef::new("owner", Access::HasOne(&self.owner, Relation::has_one("user"))),
                FieldRef::new(
                    "versions",
                    Access::HasMany(&self.versions, Relation::new("version", "attachment")),
                ),
            ]
        }

        fn describe_fields_mut(&mut self) -> Vec<FieldMut<'_>> {
            vec![
                FieldMut::new("id", AccessMut::PrimaryKey(&mut self.id)),
                FieldMut::new("data", AccessMut::Scalar(&mut self.data)),
                FieldMut::new("meta", AccessMut::Scalar(&mut self.meta)),
                FieldMut::new(
                    "owner",
                    AccessMut::HasOne(&mut self.owner, Relation::has_one("user")),
                ),
                FieldMut::new(
                    "versions",
                    AccessMut::HasMany(&mut self.versions, Relation::new("version", "attachment")),
                ),
            ]
        }
    }

    #[test]
    fn test_introspect_generic() {
        let schema =
            TableSchema::introspect("attachment", &GenericDialect::new(), &Attachment::default());
        assert_eq!(schema.name(), "attachment");
        assert_eq!(schema.primary_key(), "id");
        assert_eq!(
            schema.fields(),
            [
                Field::new("id", "integer"),
                Field::new("data", "blob"),
                Field::new("meta", "unknown"),
                Field::new("owner", "integer"),
            ]
        );
    }

    #[test]
    fn test_introspect_postgres() {
        let schema =
            TableSchema::introspect("attachment", &PostgresDialect::new(), &Attachment::default());
        let (sql, _) = schema.create_table(false).compile().unwrap();
        assert_eq!(
            sql,
            "CREATE TABLE IF NOT EXISTS attachment (id serial, data bytea, meta unknown, \
             owner integer, CONSTRAINT attachment_pk PRIMARY KEY (id))"
        );
    }
}
