//! Core entity definitions for the todo list server.
//!
//! This crate defines the persisted entities (tasks and users) and the
//! payload shapes used to create and update them.

mod task;
mod user;

pub use task::*;
pub use user::*;
