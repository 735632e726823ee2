//! Entity field descriptors.
//!
//! An [`Entity`] describes its own fields in declaration order: which one is
//! the primary key, which are relations and which are plain scalars. The
//! schema introspector, the statement builders and the relationship loader
//! all walk this description instead of inspecting the type at runtime.
//!
//! The description is normally generated with `#[derive(Entity)]`:
//!
//! ```rust
//! use oxide_mapper::{Entity, HasMany, PrimaryKey};
//!
//! #[derive(Debug, Default, Entity)]
//! struct Author {
//!     id: PrimaryKey,
//!     name: String,
//!     #[relation(table = "story", on = "author")]
//!     stories: HasMany,
//!     #[column(ignore)]
//!     cached_rank: u32,
//! }
//!
//! let author = Author::default();
//! let columns: Vec<_> = author.describe_fields().iter().map(|f| f.column).collect();
//! assert_eq!(columns, ["id", "name", "stories"]);
//! ```

use crate::relation::{HasMany, HasOne};
use crate::value::{ScalarField, ScalarKind};

/// The primary key of an entity.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct PrimaryKey(pub i64);

impl PrimaryKey {
    /// Returns the raw key value.
    #[must_use]
    pub const fn get(self) -> i64 {
        self.0
    }
}

impl From<i64> for PrimaryKey {
    fn from(value: i64) -> Self {
        Self(value)
    }
}

/// Where a relation field points.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Relation {
    /// The foreign table.
    pub table: &'static str,
    /// The column of the foreign table the relation filters on.
    pub on: &'static str,
}

impl Relation {
    /// Creates a relation to `table` filtered on the column `on`.
    #[must_use]
    pub const fn new(table: &'static str, on: &'static str) -> Self {
        Self { table, on }
    }

    /// Creates a has-one relation to `table`, matched on its `id` column.
    #[must_use]
    pub const fn has_one(table: &'static str) -> Self {
        Self { table, on: "id" }
    }
}

/// Classification of an entity field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    /// A plain value column.
    Scalar(ScalarKind),
    /// The primary key column.
    PrimaryKey,
    /// A has-one relation, stored as a foreign key column.
    RelationOne,
    /// A has-many relation; no column on this table.
    RelationMany,
}

/// Shared access to one entity field.
pub enum Access<'a> {
    /// The primary key field.
    PrimaryKey(&'a PrimaryKey),
    /// A plain value field.
    Scalar(&'a dyn ScalarField),
    /// A has-one field and the row it points at.
    HasOne(&'a HasOne, Relation),
    /// A has-many field and the rows pointing back.
    HasMany(&'a HasMany, Relation),
}

/// Mutable access to one entity field.
pub enum AccessMut<'a> {
    /// The primary key field.
    PrimaryKey(&'a mut PrimaryKey),
    /// A plain value field.
    Scalar(&'a mut dyn ScalarField),
    /// A has-one field and the row it points at.
    HasOne(&'a mut HasOne, Relation),
    /// A has-many field and the rows pointing back.
    HasMany(&'a mut HasMany, Relation),
}

/// A described field borrowed from an entity instance.
pub struct FieldRef<'a> {
    /// Column name.
    pub column: &'static str,
    /// The field itself.
    pub access: Access<'a>,
}

impl<'a> FieldRef<'a> {
    /// Creates a field reference.
    #[must_use]
    pub const fn new(column: &'static str, access: Access<'a>) -> Self {
        Self { column, access }
    }

    /// Classifies the field.
    #[must_use]
    pub fn kind(&self) -> FieldKind {
        match &self.access {
            Access::PrimaryKey(_) => FieldKind::PrimaryKey,
            Access::Scalar(value) => FieldKind::Scalar(value.kind()),
            Access::HasOne(..) => FieldKind::RelationOne,
            Access::HasMany(..) => FieldKind::RelationMany,
        }
    }
}

/// A described field mutably borrowed from an entity instance.
pub struct FieldMut<'a> {
    /// Column name.
    pub column: &'static str,
    /// The field itself.
    pub access: AccessMut<'a>,
}

impl<'a> FieldMut<'a> {
    /// Creates a mutable field reference.
    #[must_use]
    pub const fn new(column: &'static str, access: AccessMut<'a>) -> Self {
        Self { column, access }
    }
}

/// A domain object that can be mapped to a table.
///
/// Both methods list the same fields in the same (declaration) order.
/// Ignored fields are left out entirely.
pub trait Entity {
    /// Describes the fields for reading.
    fn describe_fields(&self) -> Vec<FieldRef<'_>>;

    /// Describes the fields for writing.
    fn describe_fields_mut(&mut self) -> Vec<FieldMut<'_>>;

    /// Returns the primary key, if the entity declares one.
    fn primary_key(&self) -> Option<PrimaryKey> {
        self.describe_fields()
            .into_iter()
            .find_map(|field| match field.access {
                Access::PrimaryKey(key) => Some(*key),
                _ => None,
            })
    }

    /// Overwrites the primary key. Returns false if there is none.
    fn set_primary_key(&mut self, id: i64) -> bool {
        for field in self.describe_fields_mut() {
            if let AccessMut::PrimaryKey(key) = field.access {
                *key = PrimaryKey(id);
                return true;
            }
        }
        false
    }
}
