//! To-do list record.
//!
//! Items and sharees are not embedded; they are loaded on demand through
//! `ListRepository` so that a `List` stays a cheap handle.

use crate::model::user::UserId;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Stable identifier of one to-do list.
pub type ListId = Uuid;

/// Collection of to-do items, optionally owned by a user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct List {
    pub id: ListId,
    /// Set only when the list was created by an authenticated caller.
    pub owner: Option<UserId>,
    /// Unix epoch milliseconds.
    pub created_at: i64,
}

impl List {
    /// Canonical path for viewing this list.
    pub fn absolute_url(&self) -> String {
        format!("/lists/{}/", self.id)
    }

    /// Returns whether `user_id` owns this list.
    pub fn is_owned_by(&self, user_id: UserId) -> bool {
        self.owner == Some(user_id)
    }
}
