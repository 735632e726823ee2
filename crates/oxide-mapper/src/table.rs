//! Table façade tying a schema to statements over one entity type.

use std::marker::PhantomData;

use tracing::info;

use crate::clause::Clause;
use crate::dialect::dialect_for_driver;
use crate::entity::{Access, Entity};
use crate::error::Result;
use crate::executor::Executor;
use crate::relation::load_relationships;
use crate::schema::TableSchema;
use crate::statement::{CreateTable, Delete, Insert, Select, Update};
use crate::value::{Params, SqlValue, ToSqlValue};

/// A table storing entities of type `E`.
///
/// ```rust
/// use oxide_mapper::{Compile, Entity, GenericDialect, HasOne, PrimaryKey, Table, TableSchema};
///
/// #[derive(Debug, Default, Entity)]
/// struct Story {
///     id: PrimaryKey,
///     name: String,
///     body: String,
///     #[relation(table = "author")]
///     author: HasOne,
/// }
///
/// let schema = TableSchema::introspect("story", &GenericDialect::new(), &Story::default());
/// let stories: Table<Story> = Table::new(schema);
///
/// let (sql, _) = stories.create_table(false).compile().unwrap();
/// assert_eq!(
///     sql,
///     "CREATE TABLE IF NOT EXISTS story (id integer, name text, body text, \
///      author integer, CONSTRAINT story_pk PRIMARY KEY (id))"
/// );
/// ```
#[derive(Debug, Clone)]
pub struct Table<E> {
    schema: TableSchema,
    entity: PhantomData<fn() -> E>,
}

impl<E: Entity> Table<E> {
    /// Wraps the schema of an existing table.
    #[must_use]
    pub const fn new(schema: TableSchema) -> Self {
        Self {
            schema,
            entity: PhantomData,
        }
    }

    /// Registers table `name`, creating it in the database.
    ///
    /// The schema is introspected from `entity` using the dialect of the
    /// executor's driver. With `force` unset the statement carries
    /// `IF NOT EXISTS`.
    ///
    /// # Errors
    ///
    /// Returns the executor's error if the table cannot be created.
    pub async fn create<X: Executor + ?Sized>(
        name: &str,
        executor: &X,
        force: bool,
        entity: &E,
    ) -> Result<Self> {
        let dialect = dialect_for_driver(executor.driver_name());
        let schema = TableSchema::introspect(name, dialect.as_ref(), entity);
        schema.create_table(force).exec(executor).await?;
        info!(
            table = %name,
            dialect = dialect.name(),
            force,
            "created table"
        );
        Ok(Self::new(schema))
    }

    /// Returns the schema.
    #[must_use]
    pub const fn schema(&self) -> &TableSchema {
        &self.schema
    }

    /// Returns the table name.
    #[must_use]
    pub fn name(&self) -> &str {
        self.schema.name()
    }

    /// Builds the `CREATE TABLE` statement for this table.
    #[must_use]
    pub fn create_table(&self, force: bool) -> CreateTable {
        self.schema.create_table(force)
    }

    /// Starts a query over every row.
    #[must_use]
    pub fn get(&self) -> Select {
        Select::new(self.schema.name())
    }

    /// Loads the row where `key = value` into `target`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NoRows`](crate::Error::NoRows) if no row matches,
    /// and otherwise the errors of [`Select::one`].
    pub async fn get_by<X: Executor + ?Sized>(
        &self,
        executor: &X,
        target: &mut E,
        key: &str,
        value: impl ToSqlValue,
    ) -> Result<()> {
        Select::filtered(self.schema.name(), key, value)
            .one(executor, target)
            .await
    }

    /// Builds the insert of `entity`.
    ///
    /// Once executed, the generated key is written to the entity's primary
    /// key and its relationships are attached.
    #[must_use]
    pub fn insert<'a>(&self, entity: &'a mut E) -> Insert<'a> {
        let values = column_values(&*entity);
        Insert::new(self.schema.name(), values).on_inserted(move |id| {
            entity.set_primary_key(id);
            load_relationships(entity, Some(id));
        })
    }

    /// Builds the update of `entity`, matched on its primary key.
    ///
    /// Once executed, the entity's relationships are attached again.
    #[must_use]
    pub fn update<'a>(&self, entity: &'a mut E) -> Update<'a> {
        let assignments = column_values(&*entity)
            .into_iter()
            .map(|(column, value)| Clause::eq(column, value))
            .collect();
        let key = self.key_equality(&*entity);

        Update::new(self.schema.name(), Clause::set(assignments), key)
            .on_updated(move || load_relationships(entity, None))
    }

    /// Builds the delete of `entity`, matched on its primary key.
    #[must_use]
    pub fn delete(&self, entity: &E) -> Delete {
        Delete::new(self.schema.name(), self.key_equality(entity))
    }

    fn key_equality(&self, entity: &E) -> Clause {
        let id = entity.primary_key().unwrap_or_default();
        Clause::eq(self.schema.primary_key(), id.get())
    }
}

/// Current values of every stored column except the primary key.
///
/// Has-one relations contribute their foreign key value.
fn column_values<E: Entity + ?Sized>(entity: &E) -> Params {
    let mut values = Params::new();
    for field in entity.describe_fields() {
        let value = match field.access {
            Access::Scalar(scalar) => scalar.to_value(),
            Access::HasOne(relation, _) => SqlValue::Int(relation.value()),
            Access::PrimaryKey(_) | Access::HasMany(..) => continue,
        };
        values.insert(field.column.to_string(), value);
    }
    values
}
