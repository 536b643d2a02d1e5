//! Form layer: validate submitted text, map failures to user-facing
//! messages, and delegate persistence to repositories.
//!
//! # Responsibility
//! - Own the user-facing error strings for every validation failure.
//! - Keep validate-then-persist ordering: nothing is written unless the
//!   whole form is valid.
//!
//! # Invariants
//! - Validation failures are returned per field as `FormErrors`, never as
//!   repository errors.
//! - Each failing field carries exactly one message; validation stops at
//!   the first failure of a field.

use crate::repo::RepoError;
use log::{debug, error};
use serde::ser::{Serialize, SerializeMap, Serializer};
use std::collections::BTreeMap;
use std::error::Error;
use std::fmt::{Display, Formatter};

#[cfg(test)]
mod fakes;
pub mod item_form;
pub mod share_form;
pub mod widget;

pub const EMPTY_ITEM_ERROR: &str = "You can't have an empty list item";
pub const DUPLICATE_ITEM_ERROR: &str = "You've already got this in your list";
pub const EMPTY_SHAREE_ERROR: &str = "Please enter an email address";
pub const NO_USER_ERROR: &str = "Please enter email of an existing Superlists user";
pub const DUPLICATE_USER_ERROR: &str = "Already shared this list with this user!";

/// Category of a validation failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValidationErrorKind {
    EmptyInput,
    DuplicateItem,
    UserNotFound,
    DuplicateShare,
}

impl ValidationErrorKind {
    /// Stable snake_case code used in log events.
    pub fn code(self) -> &'static str {
        match self {
            Self::EmptyInput => "empty_input",
            Self::DuplicateItem => "duplicate_item",
            Self::UserNotFound => "user_not_found",
            Self::DuplicateShare => "duplicate_share",
        }
    }
}

/// One failure attached to a form field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldError {
    pub kind: ValidationErrorKind,
    pub message: &'static str,
}

impl FieldError {
    pub const fn new(kind: ValidationErrorKind, message: &'static str) -> Self {
        Self { kind, message }
    }
}

impl Serialize for FieldError {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.message)
    }
}

/// Submitted field values keyed by field name.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormData {
    fields: BTreeMap<String, String>,
}

impl FormData {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert, convenient for one-field submissions.
    pub fn with(mut self, field: impl Into<String>, value: impl Into<String>) -> Self {
        self.insert(field, value);
        self
    }

    pub fn insert(&mut self, field: impl Into<String>, value: impl Into<String>) {
        self.fields.insert(field.into(), value.into());
    }

    /// Raw submitted value, untrimmed.
    pub fn get(&self, field: &str) -> Option<&str> {
        self.fields.get(field).map(String::as_str)
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for FormData {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut data = Self::new();
        for (field, value) in iter {
            data.insert(field, value);
        }
        data
    }
}

/// Validation failures keyed by field name.
///
/// Serializes as `{"field": ["message", ...]}`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormErrors {
    fields: BTreeMap<&'static str, Vec<FieldError>>,
}

impl FormErrors {
    pub fn new() -> Self {
        Self::default()
    }

    /// Shorthand for a single failing field.
    pub fn single(field: &'static str, error: FieldError) -> Self {
        let mut errors = Self::new();
        errors.add(field, error);
        errors
    }

    pub fn add(&mut self, field: &'static str, error: FieldError) {
        self.fields.entry(field).or_default().push(error);
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn get(&self, field: &str) -> &[FieldError] {
        self.fields.get(field).map_or(&[], Vec::as_slice)
    }

    /// User-visible messages for `field`, in the order they were added.
    pub fn messages(&self, field: &str) -> Vec<&'static str> {
        self.get(field).iter().map(|error| error.message).collect()
    }

    /// Returns whether `field` failed with `kind`.
    pub fn has_kind(&self, field: &str, kind: ValidationErrorKind) -> bool {
        self.get(field).iter().any(|error| error.kind == kind)
    }

    pub fn fields(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.fields.keys().copied()
    }
}

impl Serialize for FormErrors {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.fields.len()))?;
        for (field, errors) in &self.fields {
            map.serialize_entry(field, errors)?;
        }
        map.end()
    }
}

impl Display for FormErrors {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let mut first = true;
        for (field, errors) in &self.fields {
            for error in errors {
                if !first {
                    write!(f, "; ")?;
                }
                write!(f, "{field}: {}", error.message)?;
                first = false;
            }
        }
        Ok(())
    }
}

/// Outcome of validating or saving a form.
#[derive(Debug)]
pub enum FormError {
    /// Submitted data failed validation; resubmission can fix it.
    Invalid(FormErrors),
    /// The form was never bound to submitted data.
    Unbound,
    /// Persistence-layer failure.
    Repo(RepoError),
}

impl FormError {
    /// Returns field errors when the failure is a validation failure.
    pub fn field_errors(&self) -> Option<&FormErrors> {
        match self {
            Self::Invalid(errors) => Some(errors),
            _ => None,
        }
    }

    pub(crate) fn invalid(field: &'static str, error: FieldError) -> Self {
        Self::Invalid(FormErrors::single(field, error))
    }
}

impl Display for FormError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Invalid(errors) => write!(f, "invalid form: {errors}"),
            Self::Unbound => write!(f, "form is not bound to submitted data"),
            Self::Repo(err) => write!(f, "{err}"),
        }
    }
}

impl Error for FormError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Repo(err) => Some(err),
            _ => None,
        }
    }
}

impl From<RepoError> for FormError {
    fn from(value: RepoError) -> Self {
        Self::Repo(value)
    }
}

/// Trims a submitted value the way every text field here expects.
///
/// Missing fields and whitespace-only values both come back as `None`.
pub(crate) fn clean_required(data: &FormData, field: &str) -> Option<String> {
    data.get(field)
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .map(str::to_string)
}

/// Builds an `inspect_err` callback logging validation rejections.
///
/// Only the failure kind is logged; submitted text never is.
pub(crate) fn log_rejection(event: &'static str) -> impl Fn(&FormError) {
    move |err| match err {
        FormError::Invalid(errors) => {
            for field in errors.fields() {
                for field_error in errors.get(field) {
                    debug!(
                        "event={event} module=form status=rejected field={field} reason={}",
                        field_error.kind.code()
                    );
                }
            }
        }
        FormError::Unbound => {
            debug!("event={event} module=form status=rejected reason=unbound");
        }
        FormError::Repo(repo_err) => {
            error!("event={event} module=form status=error error={repo_err}");
        }
    }
}
