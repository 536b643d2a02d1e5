use superlists_core::db::open_db_in_memory;
use superlists_core::{
    Caller, ExistingListItemForm, FormData, FormError, ListRepository, NewListForm,
    SqliteListRepository, SqliteUserRepository, UserRepository, ValidationErrorKind,
    DUPLICATE_ITEM_ERROR, EMPTY_ITEM_ERROR,
};

fn text(value: &str) -> FormData {
    FormData::new().with("text", value)
}

#[test]
fn existing_list_form_renders_item_text_input() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteListRepository::try_new(&conn).unwrap();
    let list = repo.create_list(None).unwrap();

    let form = ExistingListItemForm::new(&list);

    assert!(form
        .as_p()
        .contains(r#"placeholder="Enter a to-do item""#));
}

#[test]
fn existing_list_form_rejects_blank_items() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteListRepository::try_new(&conn).unwrap();
    let list = repo.create_list(None).unwrap();

    let form = ExistingListItemForm::bound(&list, text(""));

    let errors = form.errors(&repo).unwrap();
    assert_eq!(errors.messages("text"), vec![EMPTY_ITEM_ERROR]);
    assert!(errors.has_kind("text", ValidationErrorKind::EmptyInput));
}

#[test]
fn existing_list_form_rejects_duplicate_items() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteListRepository::try_new(&conn).unwrap();
    let list = repo.create_list(None).unwrap();
    repo.create_item(list.id, "no twins!").unwrap();

    let form = ExistingListItemForm::bound(&list, text("no twins!"));

    let errors = form.errors(&repo).unwrap();
    assert_eq!(errors.messages("text"), vec![DUPLICATE_ITEM_ERROR]);
    let err = form.save(&repo).unwrap_err();
    assert!(err
        .field_errors()
        .unwrap()
        .has_kind("text", ValidationErrorKind::DuplicateItem));
    assert_eq!(repo.list_items(list.id).unwrap().len(), 1);
}

#[test]
fn duplicate_check_ignores_surrounding_whitespace() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteListRepository::try_new(&conn).unwrap();
    let list = repo.create_list(None).unwrap();
    repo.create_item(list.id, "no twins!").unwrap();

    let form = ExistingListItemForm::bound(&list, text("  no twins!  "));

    assert_eq!(
        form.errors(&repo).unwrap().messages("text"),
        vec![DUPLICATE_ITEM_ERROR]
    );
}

#[test]
fn same_text_in_another_list_is_not_a_duplicate() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteListRepository::try_new(&conn).unwrap();
    let first = repo.create_list(None).unwrap();
    let second = repo.create_list(None).unwrap();
    repo.create_item(first.id, "bla").unwrap();

    let form = ExistingListItemForm::bound(&second, text("bla"));

    assert!(form.errors(&repo).unwrap().is_empty());
    let item = form.save(&repo).unwrap();
    assert_eq!(item.list_id, second.id);
}

#[test]
fn existing_list_form_save_appends_trimmed_item() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteListRepository::try_new(&conn).unwrap();
    let list = repo.create_list(None).unwrap();

    let form = ExistingListItemForm::bound(&list, text("  hi  "));
    let new_item = form.save(&repo).unwrap();

    let items = repo.list_items(list.id).unwrap();
    assert_eq!(items, vec![new_item.clone()]);
    assert_eq!(new_item.text, "hi");
}

#[test]
fn unbound_existing_list_form_cannot_save() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteListRepository::try_new(&conn).unwrap();
    let list = repo.create_list(None).unwrap();

    let err = ExistingListItemForm::new(&list).save(&repo).unwrap_err();

    assert!(matches!(err, FormError::Unbound));
}

#[test]
fn new_list_form_creates_ownerless_list_for_anonymous_caller() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteListRepository::try_new(&conn).unwrap();

    let list = NewListForm::bound(text("new item text"))
        .save(&repo, &Caller::Anonymous)
        .unwrap();

    assert_eq!(list.owner, None);
    let items = repo.list_items(list.id).unwrap();
    assert_eq!(items.len(), 1);
    assert_eq!(items[0].text, "new item text");
}

#[test]
fn new_list_form_sets_owner_for_authenticated_caller() {
    let conn = open_db_in_memory().unwrap();
    let lists = SqliteListRepository::try_new(&conn).unwrap();
    let users = SqliteUserRepository::try_new(&conn).unwrap();
    let user = users.create_user("a@b.com").unwrap();

    let list = NewListForm::bound(text("new item text"))
        .save(&lists, &Caller::Authenticated(user.clone()))
        .unwrap();

    assert_eq!(list.owner, Some(user.id));
    assert_eq!(lists.lists_owned_by(user.id).unwrap(), vec![list]);
}

#[test]
fn new_list_form_with_blank_text_creates_nothing() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteListRepository::try_new(&conn).unwrap();

    let err = NewListForm::bound(text(" "))
        .save(&repo, &Caller::Anonymous)
        .unwrap_err();

    assert_eq!(
        err.field_errors().unwrap().messages("text"),
        vec![EMPTY_ITEM_ERROR]
    );
    let lists: i64 = conn
        .query_row("SELECT COUNT(*) FROM lists;", [], |row| row.get(0))
        .unwrap();
    assert_eq!(lists, 0);
}
