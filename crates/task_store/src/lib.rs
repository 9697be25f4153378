//! Task and user storage for the todo list server.
//!
//! This crate provides the [`TaskStore`] abstraction and three
//! interchangeable implementations: an in-memory store (for tests), a JSON
//! file store, and a SQLite store.

mod error;
mod file;
mod memory;
mod sqlite;
mod traits;

pub use error::*;
pub use file::*;
pub use memory::*;
pub use sqlite::*;
pub use traits::*;
