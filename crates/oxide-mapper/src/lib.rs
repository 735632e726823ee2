//! # oxide-mapper
//!
//! A small object-relational mapper for Rust.
//!
//! This crate provides:
//! - `Clause` trees compiling to SQL text with `:variable_<column>` binds
//! - `Select`, `Insert`, `Update`, `Delete` and `CreateTable` statements
//! - Schema introspection from `#[derive(Entity)]` structs
//! - Lazy `HasOne` / `HasMany` relationships
//! - A `Table` façade and an `Executor` trait, implemented for
//!   `sqlx::SqlitePool`
//!
//! ## Quick Start
//!
//! ```ignore
//! use oxide_mapper::{foreign_key, Entity, HasMany, HasOne, PrimaryKey, Table};
//! use sqlx::SqlitePool;
//!
//! #[derive(Debug, Default, Entity)]
//! struct Author {
//!     id: PrimaryKey,
//!     name: String,
//!     #[relation(table = "story", on = "author")]
//!     stories: HasMany,
//! }
//!
//! #[derive(Debug, Default, Entity)]
//! struct Story {
//!     id: PrimaryKey,
//!     slug: String,
//!     #[relation(table = "author")]
//!     author: HasOne,
//! }
//!
//! async fn example(pool: &SqlitePool) -> oxide_mapper::Result<()> {
//!     let authors = Table::create("author", pool, false, &Author::default()).await?;
//!     let stories = Table::create("story", pool, false, &Story::default()).await?;
//!
//!     let mut author = Author { name: "Hunter Leath".into(), ..Author::default() };
//!     authors.insert(&mut author).exec(pool).await?;
//!
//!     let mut story = Story {
//!         slug: "going-to-the-beach".into(),
//!         author: foreign_key(&author),
//!         ..Story::default()
//!     };
//!     stories.insert(&mut story).exec(pool).await?;
//!
//!     // Relations are queries; narrow them before they run.
//!     let mut latest = Vec::new();
//!     author.stories.query()?.order("id", false).limit(2).all(pool, &mut latest).await?;
//!
//!     let mut owner = Author::default();
//!     story.author.one(pool, &mut owner).await?;
//!     Ok(())
//! }
//! ```

pub mod clause;
pub mod dialect;
mod entity;
mod error;
pub mod executor;
mod relation;
mod schema;
pub mod statement;
mod table;
mod value;

pub use clause::{Clause, Compile};
pub use dialect::{dialect_for_driver, Dialect, GenericDialect, MysqlDialect, PostgresDialect};
pub use entity::{Access, AccessMut, Entity, FieldKind, FieldMut, FieldRef, PrimaryKey, Relation};
pub use error::{Error, Result};
pub use executor::{decode_row, ExecResult, Executor, Row};
pub use relation::{foreign_key, load_relationships, HasMany, HasOne, UNSET};
pub use schema::{Field, TableSchema};
pub use statement::{CreateTable, Delete, Insert, Select, Update};
pub use table::Table;
pub use value::{param_union, Params, ScalarField, ScalarKind, SqlValue, ToSqlValue};

pub use oxide_mapper_derive::Entity;
