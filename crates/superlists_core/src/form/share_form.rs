//! Share-with form: resolve a submitted email to a user and add that user
//! to a list's shared set.
//!
//! # Invariants
//! - Checks run in order: empty, unknown user, already shared.
//! - The shared set is only mutated after all checks pass.

use crate::form::widget::TextInput;
use crate::form::{
    clean_required, log_rejection, FieldError, FormData, FormError, FormErrors, ValidationErrorKind,
    DUPLICATE_USER_ERROR, EMPTY_SHAREE_ERROR, NO_USER_ERROR,
};
use crate::model::list::List;
use crate::model::user::User;
use crate::repo::list_repo::ListRepository;
use crate::repo::user_repo::UserRepository;
use crate::repo::{RepoError, UniqueConstraint};
use log::info;

/// Submitted field carrying the sharee email.
pub const SHAREE_FIELD: &str = "sharee";

pub const SHAREE_WIDGET: TextInput = TextInput {
    name: SHAREE_FIELD,
    label: "Sharee",
    placeholder: "your-friend@example.com",
    class: "form-control input-md",
};

const EMPTY_SHAREE: FieldError =
    FieldError::new(ValidationErrorKind::EmptyInput, EMPTY_SHAREE_ERROR);
const NO_USER: FieldError = FieldError::new(ValidationErrorKind::UserNotFound, NO_USER_ERROR);
const DUPLICATE_USER: FieldError =
    FieldError::new(ValidationErrorKind::DuplicateShare, DUPLICATE_USER_ERROR);

/// Form sharing one list with another registered user.
#[derive(Debug, Clone)]
pub struct ShareWithForm<'a> {
    list: &'a List,
    data: Option<FormData>,
}

impl<'a> ShareWithForm<'a> {
    /// Creates an unbound form for `list`.
    pub fn new(list: &'a List) -> Self {
        Self { list, data: None }
    }

    pub fn bound(list: &'a List, data: FormData) -> Self {
        Self {
            list,
            data: Some(data),
        }
    }

    pub fn list(&self) -> &List {
        self.list
    }

    /// Resolves the submitted email to a user not yet in the shared set.
    pub fn clean_sharee<U, L>(&self, users: &U, lists: &L) -> Result<User, FormError>
    where
        U: UserRepository + ?Sized,
        L: ListRepository + ?Sized,
    {
        let data = self.data.as_ref().ok_or(FormError::Unbound)?;
        let email = clean_required(data, SHAREE_FIELD)
            .ok_or_else(|| FormError::invalid(SHAREE_FIELD, EMPTY_SHAREE))?;

        let user = users
            .get_user_by_email(&email)?
            .ok_or_else(|| FormError::invalid(SHAREE_FIELD, NO_USER))?;

        let already_shared = lists
            .shared_with(self.list.id)?
            .iter()
            .any(|sharee| sharee.id == user.id);
        if already_shared {
            return Err(FormError::invalid(SHAREE_FIELD, DUPLICATE_USER));
        }

        Ok(user)
    }

    /// Field errors after a full validation pass.
    pub fn errors<U, L>(&self, users: &U, lists: &L) -> Result<FormErrors, RepoError>
    where
        U: UserRepository + ?Sized,
        L: ListRepository + ?Sized,
    {
        match self.clean_sharee(users, lists) {
            Ok(_) | Err(FormError::Unbound) => Ok(FormErrors::new()),
            Err(FormError::Invalid(errors)) => Ok(errors),
            Err(FormError::Repo(err)) => Err(err),
        }
    }

    pub fn as_p(&self) -> String {
        self.as_p_with_errors(&FormErrors::new())
    }

    pub fn as_p_with_errors(&self, errors: &FormErrors) -> String {
        let value = self.data.as_ref().and_then(|data| data.get(SHAREE_FIELD));
        SHAREE_WIDGET.render_paragraph(value, errors.get(SHAREE_FIELD))
    }

    /// Validates, adds the resolved user to the shared set, and returns the
    /// list as persisted.
    pub fn save<U, L>(&self, users: &U, lists: &L) -> Result<List, FormError>
    where
        U: UserRepository + ?Sized,
        L: ListRepository + ?Sized,
    {
        let sharee = self
            .clean_sharee(users, lists)
            .inspect_err(log_rejection("list_share"))?;

        lists
            .add_share(self.list.id, sharee.id)
            .map_err(|err| match err {
                RepoError::UniqueViolation(UniqueConstraint::ListShare) => {
                    FormError::invalid(SHAREE_FIELD, DUPLICATE_USER)
                }
                other => FormError::Repo(other),
            })
            .inspect_err(log_rejection("list_share"))?;

        let list = lists
            .get_list(self.list.id)?
            .ok_or(FormError::Repo(RepoError::NotFound {
                entity: "list",
                id: self.list.id,
            }))?;

        info!(
            "event=list_share module=form status=ok list_id={} sharee_id={}",
            list.id, sharee.id
        );
        Ok(list)
    }
}
