//! To-do item record.

use crate::model::list::ListId;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Stable identifier of one to-do item.
pub type ItemId = Uuid;

/// Single to-do entry belonging to exactly one list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Item {
    pub id: ItemId,
    pub list_id: ListId,
    /// Trimmed, non-empty entry text.
    pub text: String,
    /// Unix epoch milliseconds.
    pub created_at: i64,
}
