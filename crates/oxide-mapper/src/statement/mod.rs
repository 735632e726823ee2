//! Statement builders.
//!
//! Every statement implements [`Compile`](crate::Compile) and has an async
//! `exec` that hands the compiled text and parameters to an
//! [`Executor`](crate::Executor).

mod create_table;
mod delete;
mod insert;
mod select;
mod update;

pub use create_table::CreateTable;
pub use delete::Delete;
pub use insert::{Insert, InsertHook};
pub use select::Select;
pub use update::{Update, UpdateHook};
