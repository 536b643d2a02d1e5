//! User repository contract and SQLite implementation.
//!
//! # Invariants
//! - Emails are unique; lookups are exact, case-sensitive matches.
//! - Blank emails are rejected before any SQL runs.

use crate::model::user::{User, UserId};
use crate::repo::{
    ensure_connection_ready, map_unique_violation, parse_uuid, RepoError, RepoResult,
    UniqueConstraint,
};
use rusqlite::{params, Connection, OptionalExtension, Row};

/// Repository interface for user accounts.
pub trait UserRepository {
    /// Registers a new user with the given email.
    fn create_user(&self, email: &str) -> RepoResult<User>;
    fn get_user(&self, id: UserId) -> RepoResult<Option<User>>;
    /// Looks up a user by exact email match.
    fn get_user_by_email(&self, email: &str) -> RepoResult<Option<User>>;
}

/// SQLite-backed user repository.
pub struct SqliteUserRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteUserRepository<'conn> {
    /// Constructs a repository from a migrated connection.
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        ensure_connection_ready(conn)?;
        Ok(Self { conn })
    }
}

impl UserRepository for SqliteUserRepository<'_> {
    fn create_user(&self, email: &str) -> RepoResult<User> {
        if email.trim().is_empty() {
            return Err(RepoError::InvalidData(
                "user email must not be blank".to_string(),
            ));
        }

        let user = User::new(email);
        self.conn
            .execute(
                "INSERT INTO users (user_uuid, email) VALUES (?1, ?2);",
                params![user.id.to_string(), user.email.as_str()],
            )
            .map_err(|err| map_unique_violation(err, UniqueConstraint::UserEmail))?;

        Ok(user)
    }

    fn get_user(&self, id: UserId) -> RepoResult<Option<User>> {
        self.conn
            .query_row(
                "SELECT user_uuid, email FROM users WHERE user_uuid = ?1;",
                [id.to_string()],
                read_user_columns,
            )
            .optional()?
            .map(parse_user)
            .transpose()
    }

    fn get_user_by_email(&self, email: &str) -> RepoResult<Option<User>> {
        self.conn
            .query_row(
                "SELECT user_uuid, email FROM users WHERE email = ?1;",
                [email],
                read_user_columns,
            )
            .optional()?
            .map(parse_user)
            .transpose()
    }
}

pub(crate) fn read_user_columns(row: &Row<'_>) -> rusqlite::Result<(String, String)> {
    Ok((row.get("user_uuid")?, row.get("email")?))
}

pub(crate) fn parse_user((uuid_text, email): (String, String)) -> RepoResult<User> {
    Ok(User {
        id: parse_uuid(&uuid_text, "users.user_uuid")?,
        email,
    })
}
