//! Repository doubles for form tests.

use crate::model::item::Item;
use crate::model::list::{List, ListId};
use crate::model::user::{User, UserId};
use crate::repo::list_repo::ListRepository;
use crate::repo::user_repo::UserRepository;
use crate::repo::{RepoError, RepoResult, UniqueConstraint};

/// List store whose read-side checks see nothing while every write hits a
/// unique constraint, as when a concurrent request committed first.
pub(crate) struct LosingRaceListRepo {
    pub list: List,
}

impl ListRepository for LosingRaceListRepo {
    fn create_list(&self, _owner: Option<UserId>) -> RepoResult<List> {
        unreachable!()
    }

    fn create_new(&self, _first_item_text: &str, _owner: Option<UserId>) -> RepoResult<List> {
        unreachable!()
    }

    fn get_list(&self, id: ListId) -> RepoResult<Option<List>> {
        Ok(Some(self.list.clone()).filter(|list| list.id == id))
    }

    fn create_item(&self, _list_id: ListId, _text: &str) -> RepoResult<Item> {
        Err(RepoError::UniqueViolation(UniqueConstraint::ItemText))
    }

    fn list_items(&self, _list_id: ListId) -> RepoResult<Vec<Item>> {
        Ok(Vec::new())
    }

    fn list_name(&self, _list_id: ListId) -> RepoResult<Option<String>> {
        Ok(None)
    }

    fn item_text_exists(&self, _list_id: ListId, _text: &str) -> RepoResult<bool> {
        Ok(false)
    }

    fn add_share(&self, _list_id: ListId, _user_id: UserId) -> RepoResult<()> {
        Err(RepoError::UniqueViolation(UniqueConstraint::ListShare))
    }

    fn shared_with(&self, _list_id: ListId) -> RepoResult<Vec<User>> {
        Ok(Vec::new())
    }

    fn lists_owned_by(&self, _user_id: UserId) -> RepoResult<Vec<List>> {
        Ok(Vec::new())
    }

    fn lists_shared_with(&self, _user_id: UserId) -> RepoResult<Vec<List>> {
        Ok(Vec::new())
    }
}

/// User store holding exactly one account.
pub(crate) struct SingleUserRepo {
    pub user: User,
}

impl UserRepository for SingleUserRepo {
    fn create_user(&self, _email: &str) -> RepoResult<User> {
        Err(RepoError::UniqueViolation(UniqueConstraint::UserEmail))
    }

    fn get_user(&self, id: UserId) -> RepoResult<Option<User>> {
        Ok(Some(self.user.clone()).filter(|user| user.id == id))
    }

    fn get_user_by_email(&self, email: &str) -> RepoResult<Option<User>> {
        Ok(Some(self.user.clone()).filter(|user| user.email == email))
    }
}
