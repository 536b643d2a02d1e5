//! List/item/share repository contract and SQLite implementation.
//!
//! # Responsibility
//! - Persist lists with optional owner, their items, and their shared sets.
//! - Provide the read checks the forms need (`item_text_exists`,
//!   `shared_with`).
//!
//! # Invariants
//! - `create_new` writes the list and its first item atomically.
//! - Item order is insertion order; sharee order is share order.
//! - Item text is persisted only when non-blank.

use crate::model::item::{Item, ItemId};
use crate::model::list::{List, ListId};
use crate::model::user::{User, UserId};
use crate::repo::user_repo::{parse_user, read_user_columns};
use crate::repo::{
    ensure_connection_ready, map_unique_violation, parse_uuid, RepoError, RepoResult,
    UniqueConstraint,
};
use rusqlite::{params, Connection, OptionalExtension, Row};
use uuid::Uuid;

/// Repository interface for lists and everything hanging off them.
pub trait ListRepository {
    /// Creates an empty list.
    fn create_list(&self, owner: Option<UserId>) -> RepoResult<List>;
    /// Creates a list holding one item with `first_item_text`.
    fn create_new(&self, first_item_text: &str, owner: Option<UserId>) -> RepoResult<List>;
    fn get_list(&self, id: ListId) -> RepoResult<Option<List>>;
    /// Appends one item to an existing list.
    fn create_item(&self, list_id: ListId, text: &str) -> RepoResult<Item>;
    fn list_items(&self, list_id: ListId) -> RepoResult<Vec<Item>>;
    /// Display name of a list: the text of its first item, `None` when empty.
    fn list_name(&self, list_id: ListId) -> RepoResult<Option<String>>;
    /// Returns whether `text` already exists among the items of `list_id`.
    fn item_text_exists(&self, list_id: ListId, text: &str) -> RepoResult<bool>;
    /// Adds `user_id` to the shared set of `list_id`.
    fn add_share(&self, list_id: ListId, user_id: UserId) -> RepoResult<()>;
    fn shared_with(&self, list_id: ListId) -> RepoResult<Vec<User>>;
    fn lists_owned_by(&self, user_id: UserId) -> RepoResult<Vec<List>>;
    fn lists_shared_with(&self, user_id: UserId) -> RepoResult<Vec<List>>;
}

/// SQLite-backed list repository.
pub struct SqliteListRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteListRepository<'conn> {
    /// Constructs a repository from a migrated connection.
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        ensure_connection_ready(conn)?;
        Ok(Self { conn })
    }
}

impl ListRepository for SqliteListRepository<'_> {
    fn create_list(&self, owner: Option<UserId>) -> RepoResult<List> {
        insert_list(self.conn, owner)
    }

    fn create_new(&self, first_item_text: &str, owner: Option<UserId>) -> RepoResult<List> {
        ensure_item_text(first_item_text)?;

        let tx = self.conn.unchecked_transaction()?;
        let list = insert_list(&tx, owner)?;
        insert_item(&tx, list.id, first_item_text)?;
        tx.commit()?;

        Ok(list)
    }

    fn get_list(&self, id: ListId) -> RepoResult<Option<List>> {
        self.conn
            .query_row(
                "SELECT list_uuid, owner_uuid, created_at FROM lists WHERE list_uuid = ?1;",
                [id.to_string()],
                read_list_columns,
            )
            .optional()?
            .map(parse_list)
            .transpose()
    }

    fn create_item(&self, list_id: ListId, text: &str) -> RepoResult<Item> {
        ensure_item_text(text)?;
        ensure_list_exists(self.conn, list_id)?;
        insert_item(self.conn, list_id, text)
    }

    fn list_items(&self, list_id: ListId) -> RepoResult<Vec<Item>> {
        let mut stmt = self.conn.prepare(
            "SELECT item_uuid, list_uuid, text, created_at
             FROM items
             WHERE list_uuid = ?1
             ORDER BY seq ASC;",
        )?;
        let mut rows = stmt.query([list_id.to_string()])?;
        let mut items = Vec::new();
        while let Some(row) = rows.next()? {
            items.push(parse_item_row(row)?);
        }
        Ok(items)
    }

    fn list_name(&self, list_id: ListId) -> RepoResult<Option<String>> {
        ensure_list_exists(self.conn, list_id)?;
        let name = self
            .conn
            .query_row(
                "SELECT text FROM items WHERE list_uuid = ?1 ORDER BY seq ASC LIMIT 1;",
                [list_id.to_string()],
                |row| row.get(0),
            )
            .optional()?;
        Ok(name)
    }

    fn item_text_exists(&self, list_id: ListId, text: &str) -> RepoResult<bool> {
        let exists: i64 = self.conn.query_row(
            "SELECT EXISTS(
                SELECT 1 FROM items WHERE list_uuid = ?1 AND text = ?2
            );",
            params![list_id.to_string(), text],
            |row| row.get(0),
        )?;
        Ok(exists == 1)
    }

    fn add_share(&self, list_id: ListId, user_id: UserId) -> RepoResult<()> {
        ensure_list_exists(self.conn, list_id)?;
        ensure_user_exists(self.conn, user_id)?;
        self.conn
            .execute(
                "INSERT INTO list_shares (list_uuid, user_uuid) VALUES (?1, ?2);",
                params![list_id.to_string(), user_id.to_string()],
            )
            .map_err(|err| map_unique_violation(err, UniqueConstraint::ListShare))?;
        Ok(())
    }

    fn shared_with(&self, list_id: ListId) -> RepoResult<Vec<User>> {
        let mut stmt = self.conn.prepare(
            "SELECT users.user_uuid, users.email
             FROM list_shares
             JOIN users ON users.user_uuid = list_shares.user_uuid
             WHERE list_shares.list_uuid = ?1
             ORDER BY list_shares.rowid ASC;",
        )?;
        let rows = stmt.query_map([list_id.to_string()], read_user_columns)?;
        let mut users = Vec::new();
        for row in rows {
            users.push(parse_user(row?)?);
        }
        Ok(users)
    }

    fn lists_owned_by(&self, user_id: UserId) -> RepoResult<Vec<List>> {
        let mut stmt = self.conn.prepare(
            "SELECT list_uuid, owner_uuid, created_at
             FROM lists
             WHERE owner_uuid = ?1
             ORDER BY created_at ASC, rowid ASC;",
        )?;
        let rows = stmt.query_map([user_id.to_string()], read_list_columns)?;
        let mut lists = Vec::new();
        for row in rows {
            lists.push(parse_list(row?)?);
        }
        Ok(lists)
    }

    fn lists_shared_with(&self, user_id: UserId) -> RepoResult<Vec<List>> {
        let mut stmt = self.conn.prepare(
            "SELECT lists.list_uuid, lists.owner_uuid, lists.created_at
             FROM list_shares
             JOIN lists ON lists.list_uuid = list_shares.list_uuid
             WHERE list_shares.user_uuid = ?1
             ORDER BY list_shares.rowid ASC;",
        )?;
        let rows = stmt.query_map([user_id.to_string()], read_list_columns)?;
        let mut lists = Vec::new();
        for row in rows {
            lists.push(parse_list(row?)?);
        }
        Ok(lists)
    }
}

type ListColumns = (String, Option<String>, i64);

fn insert_list(conn: &Connection, owner: Option<UserId>) -> RepoResult<List> {
    if let Some(owner) = owner {
        ensure_user_exists(conn, owner)?;
    }

    let id = Uuid::new_v4();
    let created_at: i64 = conn.query_row(
        "INSERT INTO lists (list_uuid, owner_uuid) VALUES (?1, ?2) RETURNING created_at;",
        params![id.to_string(), owner.map(|value| value.to_string())],
        |row| row.get(0),
    )?;

    Ok(List {
        id,
        owner,
        created_at,
    })
}

fn insert_item(conn: &Connection, list_id: ListId, text: &str) -> RepoResult<Item> {
    let id: ItemId = Uuid::new_v4();
    let created_at: i64 = conn
        .query_row(
            "INSERT INTO items (item_uuid, list_uuid, text)
             VALUES (?1, ?2, ?3)
             RETURNING created_at;",
            params![id.to_string(), list_id.to_string(), text],
            |row| row.get(0),
        )
        .map_err(|err| map_unique_violation(err, UniqueConstraint::ItemText))?;

    Ok(Item {
        id,
        list_id,
        text: text.to_string(),
        created_at,
    })
}

fn ensure_item_text(text: &str) -> RepoResult<()> {
    if text.trim().is_empty() {
        return Err(RepoError::InvalidData(
            "item text must not be blank".to_string(),
        ));
    }
    Ok(())
}

fn ensure_list_exists(conn: &Connection, list_id: ListId) -> RepoResult<()> {
    if row_exists(
        conn,
        "SELECT EXISTS(SELECT 1 FROM lists WHERE list_uuid = ?1);",
        list_id,
    )? {
        return Ok(());
    }
    Err(RepoError::NotFound {
        entity: "list",
        id: list_id,
    })
}

fn ensure_user_exists(conn: &Connection, user_id: UserId) -> RepoResult<()> {
    if row_exists(
        conn,
        "SELECT EXISTS(SELECT 1 FROM users WHERE user_uuid = ?1);",
        user_id,
    )? {
        return Ok(());
    }
    Err(RepoError::NotFound {
        entity: "user",
        id: user_id,
    })
}

fn row_exists(conn: &Connection, sql: &str, id: Uuid) -> RepoResult<bool> {
    let exists: i64 = conn.query_row(sql, [id.to_string()], |row| row.get(0))?;
    Ok(exists == 1)
}

fn read_list_columns(row: &Row<'_>) -> rusqlite::Result<ListColumns> {
    Ok((
        row.get("list_uuid")?,
        row.get("owner_uuid")?,
        row.get("created_at")?,
    ))
}

fn parse_list((uuid_text, owner_text, created_at): ListColumns) -> RepoResult<List> {
    let owner = match owner_text {
        Some(value) => Some(parse_uuid(&value, "lists.owner_uuid")?),
        None => None,
    };
    Ok(List {
        id: parse_uuid(&uuid_text, "lists.list_uuid")?,
        owner,
        created_at,
    })
}

fn parse_item_row(row: &Row<'_>) -> RepoResult<Item> {
    let uuid_text: String = row.get("item_uuid")?;
    let list_text: String = row.get("list_uuid")?;
    Ok(Item {
        id: parse_uuid(&uuid_text, "items.item_uuid")?,
        list_id: parse_uuid(&list_text, "items.list_uuid")?,
        text: row.get("text")?,
        created_at: row.get("created_at")?,
    })
}
