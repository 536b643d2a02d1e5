//! Repository layer abstractions and SQLite implementations.
//!
//! # Responsibility
//! - Define use-case oriented data access contracts for lists and users.
//! - Isolate SQLite query details from form validation and orchestration.
//!
//! # Invariants
//! - Repositories only accept connections migrated to the latest schema.
//! - Storage uniqueness constraints surface as `RepoError::UniqueViolation`,
//!   never as a raw SQLite error.

use crate::db::migrations::latest_version;
use crate::db::DbError;
use rusqlite::{Connection, ErrorCode};
use std::error::Error;
use std::fmt::{Display, Formatter};
use uuid::Uuid;

pub mod list_repo;
pub mod user_repo;

pub type RepoResult<T> = Result<T, RepoError>;

/// Storage uniqueness rule that rejected a write.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UniqueConstraint {
    /// `items(list_uuid, text)`.
    ItemText,
    /// `list_shares(list_uuid, user_uuid)`.
    ListShare,
    /// `users(email)`.
    UserEmail,
}

impl UniqueConstraint {
    fn as_str(self) -> &'static str {
        match self {
            Self::ItemText => "items.list_uuid+text",
            Self::ListShare => "list_shares.list_uuid+user_uuid",
            Self::UserEmail => "users.email",
        }
    }
}

/// Repository error for list/item/user persistence and queries.
#[derive(Debug)]
pub enum RepoError {
    Db(DbError),
    NotFound { entity: &'static str, id: Uuid },
    InvalidData(String),
    UniqueViolation(UniqueConstraint),
    UninitializedConnection {
        expected_version: u32,
        actual_version: u32,
    },
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Db(err) => write!(f, "{err}"),
            Self::NotFound { entity, id } => write!(f, "{entity} not found: {id}"),
            Self::InvalidData(message) => write!(f, "invalid data: {message}"),
            Self::UniqueViolation(constraint) => {
                write!(f, "unique constraint violated: {}", constraint.as_str())
            }
            Self::UninitializedConnection {
                expected_version,
                actual_version,
            } => write!(
                f,
                "connection schema version {actual_version} does not match expected {expected_version}"
            ),
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Db(err) => Some(err),
            _ => None,
        }
    }
}

impl From<DbError> for RepoError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for RepoError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

/// Rejects connections that did not go through `db::open_db*`.
pub(crate) fn ensure_connection_ready(conn: &Connection) -> RepoResult<()> {
    let expected_version = latest_version();
    let actual_version: u32 = conn.query_row("PRAGMA user_version;", [], |row| row.get(0))?;
    if actual_version != expected_version {
        return Err(RepoError::UninitializedConnection {
            expected_version,
            actual_version,
        });
    }
    Ok(())
}

/// Maps a UNIQUE/PRIMARY KEY failure to `constraint`, passing other errors on.
pub(crate) fn map_unique_violation(
    err: rusqlite::Error,
    constraint: UniqueConstraint,
) -> RepoError {
    if is_unique_violation(&err) {
        return RepoError::UniqueViolation(constraint);
    }
    err.into()
}

fn is_unique_violation(err: &rusqlite::Error) -> bool {
    match err {
        rusqlite::Error::SqliteFailure(failure, _) => {
            failure.code == ErrorCode::ConstraintViolation
                && matches!(
                    failure.extended_code,
                    rusqlite::ffi::SQLITE_CONSTRAINT_UNIQUE
                        | rusqlite::ffi::SQLITE_CONSTRAINT_PRIMARYKEY
                )
        }
        _ => false,
    }
}

pub(crate) fn parse_uuid(value: &str, column: &str) -> RepoResult<Uuid> {
    Uuid::parse_str(value)
        .map_err(|_| RepoError::InvalidData(format!("invalid uuid value `{value}` in {column}")))
}
