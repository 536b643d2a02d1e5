//! User account record.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Stable identifier of a user account.
pub type UserId = Uuid;

/// Registered account, addressed by its unique email.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct User {
    pub id: UserId,
    /// Stored exactly as registered; lookups match byte-for-byte.
    pub email: String,
}

impl User {
    /// Creates a user record with a generated stable ID.
    pub fn new(email: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            email: email.into(),
        }
    }
}
