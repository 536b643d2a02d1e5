//! Domain model for to-do lists, their items, and the users they belong to.
//!
//! # Invariants
//! - Every record is identified by a stable UUID that is never reused.
//! - Item text is unique within its parent list.
//! - A user appears in a list's shared set at most once.

pub mod caller;
pub mod item;
pub mod list;
pub mod user;
