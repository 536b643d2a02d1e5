//! Core domain logic for Superlists: to-do lists, their items, and sharing
//! lists between registered users.
//!
//! Forms in [`form`] are the entry points for submitted data; they validate
//! input and persist through the repositories in [`repo`].

pub mod db;
pub mod form;
pub mod logging;
pub mod model;
pub mod repo;

pub use form::item_form::{ExistingListItemForm, ItemForm, NewListForm};
pub use form::share_form::ShareWithForm;
pub use form::{
    FieldError, FormData, FormError, FormErrors, ValidationErrorKind, DUPLICATE_ITEM_ERROR,
    DUPLICATE_USER_ERROR, EMPTY_ITEM_ERROR, EMPTY_SHAREE_ERROR, NO_USER_ERROR,
};
pub use logging::{default_log_level, init_logging, logging_status, LogSettings, LoggingError};
pub use model::caller::Caller;
pub use model::item::{Item, ItemId};
pub use model::list::{List, ListId};
pub use model::user::{User, UserId};
pub use repo::list_repo::{ListRepository, SqliteListRepository};
pub use repo::user_repo::{SqliteUserRepository, UserRepository};
pub use repo::{RepoError, RepoResult, UniqueConstraint};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::core_version;

    #[test]
    fn version_is_not_empty() {
        assert!(!core_version().is_empty());
    }
}
