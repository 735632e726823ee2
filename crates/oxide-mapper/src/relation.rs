//! Lazily evaluated relationships between entities.
//!
//! ```text
//! story.author     (child -> parent)    SELECT * FROM author WHERE (id = :variable_id)
//! author.stories   (parent -> children) SELECT * FROM story WHERE (author = :variable_author)
//! ```
//!
//! Relations are plain values owned by the entity that declares them. They
//! become queryable once [`load_relationships`] has attached them, which the
//! table façade does after every insert, update and load.

use tracing::debug;

use crate::clause::Clause;
use crate::entity::{AccessMut, Entity, Relation};
use crate::error::{Error, Result};
use crate::executor::Executor;
use crate::statement::Select;

/// Foreign key value of a has-one relation that has not been bound yet.
pub const UNSET: i64 = -1;

/// A has-one (belongs-to) relation, stored as a foreign key column.
#[derive(Debug, Clone, PartialEq)]
pub struct HasOne {
    value: i64,
    column: String,
    select: Option<Select>,
}

impl Default for HasOne {
    fn default() -> Self {
        Self {
            value: UNSET,
            column: String::from("id"),
            select: None,
        }
    }
}

impl HasOne {
    /// Creates a relation pinned to the foreign key `value`.
    #[must_use]
    pub fn bound(value: i64) -> Self {
        Self {
            value,
            ..Self::default()
        }
    }

    /// Returns the foreign key value.
    #[must_use]
    pub const fn value(&self) -> i64 {
        self.value
    }

    /// Returns true once a foreign key value has been supplied.
    #[must_use]
    pub const fn is_bound(&self) -> bool {
        self.value != UNSET
    }

    /// Returns the column of the foreign table the relation matches on.
    #[must_use]
    pub fn column(&self) -> &str {
        &self.column
    }

    /// Points the relation at `owner`, using its primary key.
    ///
    /// An owner without a primary key unbinds the relation.
    pub fn set<E: Entity + ?Sized>(&mut self, owner: &E) {
        let id = owner.primary_key().map_or(UNSET, |key| key.get());
        self.set_value(id);
    }

    /// Points the relation at the foreign key `value`.
    pub fn set_value(&mut self, value: i64) {
        self.value = value;
        if let Some(select) = &mut self.select {
            select.replace_where(Clause::and(vec![Clause::eq(self.column.as_str(), value)]));
        }
    }

    /// Returns the lazy query for the related row.
    ///
    /// # Errors
    ///
    /// Returns [`Error::DetachedRelation`] until the relation is attached.
    pub fn query(&self) -> Result<Select> {
        self.select.clone().ok_or(Error::DetachedRelation)
    }

    /// Loads the related row into `target`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::DetachedRelation`] until the relation is attached,
    /// and otherwise the errors of [`Select::one`].
    pub async fn one<X, E>(&self, executor: &X, target: &mut E) -> Result<()>
    where
        X: Executor + ?Sized,
        E: Entity + ?Sized,
    {
        self.select
            .as_ref()
            .ok_or(Error::DetachedRelation)?
            .one(executor, target)
            .await
    }

    fn attach(&mut self, relation: Relation) {
        self.column = relation.on.to_string();
        self.select = Some(Select::filtered(relation.table, relation.on, self.value));
    }
}

/// Builds a has-one relation pointing at `owner`.
///
/// This is how a parent is attached to a child before the child is
/// inserted.
#[must_use]
pub fn foreign_key<E: Entity + ?Sized>(owner: &E) -> HasOne {
    let mut relation = HasOne::default();
    relation.set(owner);
    relation
}

/// A has-many relation: the rows of another table pointing at this entity.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct HasMany {
    select: Option<Select>,
}

impl HasMany {
    /// Returns the lazy query for the related rows.
    ///
    /// The returned query can be narrowed further before it runs.
    ///
    /// # Errors
    ///
    /// Returns [`Error::DetachedRelation`] until the relation is attached.
    pub fn query(&self) -> Result<Select> {
        self.select.clone().ok_or(Error::DetachedRelation)
    }

    /// Loads every related row into `out`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::DetachedRelation`] until the relation is attached,
    /// and otherwise the errors of [`Select::all`].
    pub async fn all<X, E>(&self, executor: &X, out: &mut Vec<E>) -> Result<()>
    where
        X: Executor + ?Sized,
        E: Entity + Default,
    {
        self.select
            .as_ref()
            .ok_or(Error::DetachedRelation)?
            .all(executor, out)
            .await
    }

    fn attach(&mut self, relation: Relation, owner_id: i64) {
        self.select = Some(Select::filtered(relation.table, relation.on, owner_id));
    }
}

/// Rebuilds every relation of `entity`.
///
/// Has-one relations are filtered on their own foreign key value; has-many
/// relations on the owner's id, which is `id` when given and otherwise read
/// from the entity's primary key.
pub fn load_relationships<E: Entity + ?Sized>(entity: &mut E, id: Option<i64>) {
    let owner_id = id
        .or_else(|| entity.primary_key().map(|key| key.get()))
        .unwrap_or(UNSET);

    let mut attached = 0_usize;
    for field in entity.describe_fields_mut() {
        match field.access {
            AccessMut::HasOne(relation, target) => relation.attach(target),
            AccessMut::HasMany(relation, target) => relation.attach(target, owner_id),
            AccessMut::PrimaryKey(_) | AccessMut::Scalar(_) => continue,
        }
        attached += 1;
    }

    if attached > 0 {
        debug!(owner_id, relations = attached, "attached relationships");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clause::Compile;
    use crate::entity::{Access, FieldMut, FieldRef, PrimaryKey};
    use crate::value::SqlValue;

    #[derive(Debug, Default)]
    struct Author {
        id: PrimaryKey,
        name: String,
        stories: HasMany,
    }

    impl Entity for Author {
        fn describe_fields(&self) -> Vec<FieldRef<'_>> {
            vec![
                FieldRef::new("id", Access::PrimaryKey(&self.id)),
                FieldRef::new("name", Access::Scalar(&self.name)),
                FieldRef::new(
                    "stories",
                    Access::HasMany(&self.stories, Relation::new("story", "author")),
                ),
            ]
        }

        fn describe_fields_mut(&mut self) -> Vec<FieldMut<'_>> {
            vec![
                FieldMut::new("id", AccessMut::PrimaryKey(&mut self.id)),
                FieldMut::new("name", AccessMut::Scalar(&mut self.name)),
                FieldMut::new(
                    "stories",
                    AccessMut::HasMany(&mut self.stories, Relation::new("story", "author")),
                ),
            ]
        }
    }

    #[derive(Debug, Default)]
    struct Story {
        id: PrimaryKey,
        author: HasOne,
    }

    impl Entity for Story {
        fn describe_fields(&self) -> Vec<FieldRef<'_>> {
            vec![
                FieldRef::new("id", Access::PrimaryKey(&self.id)),
                FieldRef::new(
                    "author",
                    Access::HasOne(&self.author, Relation::has_one("author")),
                ),
            ]
        }

        fn describe_fields_mut(&mut self) -> Vec<FieldMut<'_>> {
            vec![
                FieldMut::new("id", AccessMut::PrimaryKey(&mut self.id)),
                FieldMut::new(
                    "author",
                    AccessMut::HasOne(&mut self.author, Relation::has_one("author")),
                ),
            ]
        }
    }

    #[test]
    fn test_unbound_has_one() {
        let relation = HasOne::default();
        assert!(!relation.is_bound());
        assert_eq!(relation.value(), UNSET);
        assert!(matches!(relation.query(), Err(Error::DetachedRelation)));
    }

    #[test]
    fn test_foreign_key_takes_owner_id() {
        let author = Author {
            id: PrimaryKey(-5),
            ..Author::default()
        };
        let relation = foreign_key(&author);
        assert!(relation.is_bound());
        assert_eq!(relation.value(), -5);
    }

    #[test]
    fn test_attach_has_one() {
        let mut story = Story {
            author: HasOne::bound(-5),
            ..Story::default()
        };
        load_relationships(&mut story, None);

        let (sql, params) = story.author.query().unwrap().compile().unwrap();
        assert_eq!(sql, "SELECT * FROM author WHERE (id = :variable_id)");
        assert_eq!(params["variable_id"], SqlValue::Int(-5));
    }

    #[test]
    fn test_set_rewrites_attached_query() {
        let mut story = Story::default();
        load_relationships(&mut story, None);
        let (_, params) = story.author.query().unwrap().compile().unwrap();
        assert_eq!(params["variable_id"], SqlValue::Int(UNSET));

        let author = Author {
            id: PrimaryKey(12),
            ..Author::default()
        };
        story.author.set(&author);
        let (sql, params) = story.author.query().unwrap().compile().unwrap();
        assert_eq!(sql, "SELECT * FROM author WHERE (id = :variable_id)");
        assert_eq!(params["variable_id"], SqlValue::Int(12));
    }

    #[test]
    fn test_attach_has_many_with_given_id() {
        let mut author = Author::default();
        load_relationships(&mut author, Some(-5));

        let mut query = author.stories.query().unwrap();
        query.limit(2);
        let (sql, params) = query.compile().unwrap();
        assert_eq!(
            sql,
            "SELECT * FROM story WHERE (author = :variable_author) LIMIT 2"
        );
        assert_eq!(params["variable_author"], SqlValue::Int(-5));
    }

    #[test]
    fn test_attach_has_many_reads_primary_key() {
        let mut author = Author {
            id: PrimaryKey(9),
            ..Author::default()
        };
        load_relationships(&mut author, None);
        let (_, params) = author.stories.query().unwrap().compile().unwrap();
        assert_eq!(params["variable_author"], SqlValue::Int(9));
    }
}
