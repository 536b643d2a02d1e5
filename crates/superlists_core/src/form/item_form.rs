//! Item text forms: base validation, new-list creation, and appending to an
//! existing list.
//!
//! # Invariants
//! - Empty/whitespace-only text fails with `EMPTY_ITEM_ERROR` and never
//!   reaches the uniqueness check.
//! - Duplicate detection is scoped to the target list only.
//! - Saved text is the trimmed submission.

use crate::form::widget::TextInput;
use crate::form::{
    clean_required, log_rejection, FieldError, FormData, FormError, FormErrors, ValidationErrorKind,
    DUPLICATE_ITEM_ERROR, EMPTY_ITEM_ERROR,
};
use crate::model::caller::Caller;
use crate::model::item::Item;
use crate::model::list::List;
use crate::repo::list_repo::ListRepository;
use crate::repo::{RepoError, UniqueConstraint};
use log::info;

/// Submitted field carrying the item text.
pub const ITEM_TEXT_FIELD: &str = "text";

pub const ITEM_TEXT_WIDGET: TextInput = TextInput {
    name: ITEM_TEXT_FIELD,
    label: "Text",
    placeholder: "Enter a to-do item",
    class: "form-control input-lg",
};

const EMPTY_ITEM: FieldError = FieldError::new(ValidationErrorKind::EmptyInput, EMPTY_ITEM_ERROR);
const DUPLICATE_ITEM: FieldError =
    FieldError::new(ValidationErrorKind::DuplicateItem, DUPLICATE_ITEM_ERROR);

/// Base form for one to-do item's text.
#[derive(Debug, Clone, Default)]
pub struct ItemForm {
    data: Option<FormData>,
}

impl ItemForm {
    /// Creates an unbound form, used for rendering an empty input.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a form bound to submitted data.
    pub fn bound(data: FormData) -> Self {
        Self { data: Some(data) }
    }

    pub fn is_bound(&self) -> bool {
        self.data.is_some()
    }

    /// Returns the trimmed item text or the field error for it.
    pub fn clean(&self) -> Result<String, FormError> {
        let data = self.data.as_ref().ok_or(FormError::Unbound)?;
        clean_required(data, ITEM_TEXT_FIELD)
            .ok_or_else(|| FormError::invalid(ITEM_TEXT_FIELD, EMPTY_ITEM))
    }

    /// Field errors of a bound form; empty for unbound or valid forms.
    pub fn errors(&self) -> FormErrors {
        match self.clean() {
            Err(FormError::Invalid(errors)) => errors,
            _ => FormErrors::new(),
        }
    }

    pub fn is_valid(&self) -> bool {
        self.clean().is_ok()
    }

    /// Renders the item input as a paragraph without errors.
    pub fn as_p(&self) -> String {
        self.as_p_with_errors(&FormErrors::new())
    }

    /// Renders the item input with the given field errors above it.
    pub fn as_p_with_errors(&self, errors: &FormErrors) -> String {
        ITEM_TEXT_WIDGET.render_paragraph(self.raw_text(), errors.get(ITEM_TEXT_FIELD))
    }

    fn raw_text(&self) -> Option<&str> {
        self.data.as_ref().and_then(|data| data.get(ITEM_TEXT_FIELD))
    }
}

/// Item form that starts a brand new list.
#[derive(Debug, Clone, Default)]
pub struct NewListForm {
    item: ItemForm,
}

impl NewListForm {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn bound(data: FormData) -> Self {
        Self {
            item: ItemForm::bound(data),
        }
    }

    pub fn clean(&self) -> Result<String, FormError> {
        self.item.clean()
    }

    pub fn errors(&self) -> FormErrors {
        self.item.errors()
    }

    pub fn as_p(&self) -> String {
        self.item.as_p()
    }

    /// Validates and creates a list holding the submitted item.
    ///
    /// # Contract
    /// - Authenticated callers become the list owner.
    /// - Anonymous callers produce an ownerless list.
    /// - Nothing is written when validation fails.
    pub fn save<R: ListRepository + ?Sized>(
        &self,
        repo: &R,
        caller: &Caller,
    ) -> Result<List, FormError> {
        let text = self.item.clean().inspect_err(log_rejection("new_list"))?;
        let owner = caller.user().map(|user| user.id);
        let list = repo.create_new(&text, owner)?;

        info!(
            "event=new_list module=form status=ok list_id={} authenticated={}",
            list.id,
            caller.is_authenticated()
        );
        Ok(list)
    }
}

/// Item form appending to a list that already exists.
#[derive(Debug, Clone)]
pub struct ExistingListItemForm<'a> {
    list: &'a List,
    item: ItemForm,
}

impl<'a> ExistingListItemForm<'a> {
    /// Creates an unbound form for `list`.
    pub fn new(list: &'a List) -> Self {
        Self {
            list,
            item: ItemForm::new(),
        }
    }

    pub fn bound(list: &'a List, data: FormData) -> Self {
        Self {
            list,
            item: ItemForm::bound(data),
        }
    }

    pub fn list(&self) -> &List {
        self.list
    }

    /// Validates emptiness, then uniqueness within the target list.
    pub fn validate<R: ListRepository + ?Sized>(&self, repo: &R) -> Result<String, FormError> {
        let text = self.item.clean()?;
        if repo.item_text_exists(self.list.id, &text)? {
            return Err(FormError::invalid(ITEM_TEXT_FIELD, DUPLICATE_ITEM));
        }
        Ok(text)
    }

    /// Field errors after a full validation pass.
    pub fn errors<R: ListRepository + ?Sized>(&self, repo: &R) -> Result<FormErrors, RepoError> {
        match self.validate(repo) {
            Ok(_) | Err(FormError::Unbound) => Ok(FormErrors::new()),
            Err(FormError::Invalid(errors)) => Ok(errors),
            Err(FormError::Repo(err)) => Err(err),
        }
    }

    pub fn as_p(&self) -> String {
        self.item.as_p()
    }

    pub fn as_p_with_errors(&self, errors: &FormErrors) -> String {
        self.item.as_p_with_errors(errors)
    }

    /// Validates and appends the submitted item to the list.
    ///
    /// A storage-level uniqueness hit is reported as the same duplicate
    /// field error as the read-side check.
    pub fn save<R: ListRepository + ?Sized>(&self, repo: &R) -> Result<Item, FormError> {
        let text = self
            .validate(repo)
            .inspect_err(log_rejection("item_append"))?;
        let item = repo
            .create_item(self.list.id, &text)
            .map_err(|err| match err {
                RepoError::UniqueViolation(UniqueConstraint::ItemText) => {
                    FormError::invalid(ITEM_TEXT_FIELD, DUPLICATE_ITEM)
                }
                other => FormError::Repo(other),
            })
            .inspect_err(log_rejection("item_append"))?;

        info!(
            "event=item_append module=form status=ok list_id={} item_id={}",
            self.list.id, item.id
        );
        Ok(item)
    }
}

#[cfg(test)]
mod tests {
    use super::{ExistingListItemForm, ItemForm, NewListForm};
    use crate::form::fakes::LosingRaceListRepo;
    use crate::form::{
        FormData, FormError, ValidationErrorKind, DUPLICATE_ITEM_ERROR, EMPTY_ITEM_ERROR,
    };
    use crate::model::caller::Caller;
    use crate::model::item::Item;
    use crate::model::list::{List, ListId};
    use crate::model::user::{User, UserId};
    use crate::repo::list_repo::ListRepository;
    use crate::repo::RepoResult;
    use std::cell::RefCell;
    use uuid::Uuid;

    /// Records `create_new` calls instead of touching storage.
    #[derive(Default)]
    struct RecordingListRepo {
        create_new_calls: RefCell<Vec<(String, Option<UserId>)>>,
    }

    impl ListRepository for RecordingListRepo {
        fn create_list(&self, _owner: Option<UserId>) -> RepoResult<List> {
            unreachable!("new list form must not create empty lists")
        }

        fn create_new(&self, first_item_text: &str, owner: Option<UserId>) -> RepoResult<List> {
            self.create_new_calls
                .borrow_mut()
                .push((first_item_text.to_string(), owner));
            Ok(List {
                id: Uuid::nil(),
                owner,
                created_at: 42,
            })
        }

        fn get_list(&self, _id: ListId) -> RepoResult<Option<List>> {
            unreachable!()
        }

        fn create_item(&self, _list_id: ListId, _text: &str) -> RepoResult<Item> {
            unreachable!()
        }

        fn list_items(&self, _list_id: ListId) -> RepoResult<Vec<Item>> {
            unreachable!()
        }

        fn list_name(&self, _list_id: ListId) -> RepoResult<Option<String>> {
            unreachable!()
        }

        fn item_text_exists(&self, _list_id: ListId, _text: &str) -> RepoResult<bool> {
            unreachable!()
        }

        fn add_share(&self, _list_id: ListId, _user_id: UserId) -> RepoResult<()> {
            unreachable!()
        }

        fn shared_with(&self, _list_id: ListId) -> RepoResult<Vec<User>> {
            unreachable!()
        }

        fn lists_owned_by(&self, _user_id: UserId) -> RepoResult<Vec<List>> {
            unreachable!()
        }

        fn lists_shared_with(&self, _user_id: UserId) -> RepoResult<Vec<List>> {
            unreachable!()
        }
    }

    fn new_item_data() -> FormData {
        FormData::new().with("text", "new item text")
    }

    #[test]
    fn item_form_renders_placeholder_and_css_classes() {
        let html = ItemForm::new().as_p();
        assert!(html.contains(r#"placeholder="Enter a to-do item""#));
        assert!(html.contains(r#"class="form-control input-lg""#));
    }

    #[test]
    fn item_form_rejects_blank_and_whitespace_only_text() {
        for text in ["", "   ", "\n\t"] {
            let form = ItemForm::bound(FormData::new().with("text", text));
            assert!(!form.is_valid());
            assert_eq!(form.errors().messages("text"), vec![EMPTY_ITEM_ERROR]);
        }
    }

    #[test]
    fn item_form_treats_missing_field_as_empty() {
        let form = ItemForm::bound(FormData::new());
        assert_eq!(form.errors().messages("text"), vec![EMPTY_ITEM_ERROR]);
    }

    #[test]
    fn unbound_item_form_has_no_errors_and_cannot_clean() {
        let form = ItemForm::new();
        assert!(form.errors().is_empty());
        assert!(matches!(form.clean(), Err(FormError::Unbound)));
    }

    #[test]
    fn new_list_save_for_anonymous_caller_creates_ownerless_list() {
        let repo = RecordingListRepo::default();
        let form = NewListForm::bound(new_item_data());

        form.save(&repo, &Caller::Anonymous).unwrap();

        assert_eq!(
            *repo.create_new_calls.borrow(),
            vec![("new item text".to_string(), None)]
        );
    }

    #[test]
    fn new_list_save_for_authenticated_caller_passes_owner() {
        let repo = RecordingListRepo::default();
        let user = User::new("owner@example.com");
        let form = NewListForm::bound(new_item_data());

        form.save(&repo, &Caller::Authenticated(user.clone())).unwrap();

        assert_eq!(
            *repo.create_new_calls.borrow(),
            vec![("new item text".to_string(), Some(user.id))]
        );
    }

    #[test]
    fn new_list_save_returns_list_from_repository() {
        let repo = RecordingListRepo::default();
        let form = NewListForm::bound(new_item_data());

        let list = form.save(&repo, &Caller::Anonymous).unwrap();

        assert_eq!(list.id, Uuid::nil());
        assert_eq!(list.created_at, 42);
    }

    #[test]
    fn new_list_save_with_blank_text_does_not_touch_repository() {
        let repo = RecordingListRepo::default();
        let form = NewListForm::bound(FormData::new().with("text", ""));

        let err = form.save(&repo, &Caller::Anonymous).unwrap_err();

        assert_eq!(
            err.field_errors().unwrap().messages("text"),
            vec![EMPTY_ITEM_ERROR]
        );
        assert!(repo.create_new_calls.borrow().is_empty());
    }

    #[test]
    fn existing_list_save_maps_storage_duplicate_to_field_error() {
        let repo = LosingRaceListRepo {
            list: List {
                id: Uuid::new_v4(),
                owner: None,
                created_at: 0,
            },
        };
        let form =
            ExistingListItemForm::bound(&repo.list, FormData::new().with("text", "no twins!"));

        let err = form.save(&repo).unwrap_err();

        let errors = err.field_errors().expect("storage duplicate should be a field error");
        assert_eq!(errors.messages("text"), vec![DUPLICATE_ITEM_ERROR]);
        assert!(errors.has_kind("text", ValidationErrorKind::DuplicateItem));
    }
}
