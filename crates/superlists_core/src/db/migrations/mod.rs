//! Lists schema migrations.
//!
//! # Invariants
//! - Scripts are registered in strictly increasing `version` order.
//! - All pending scripts run in one transaction together with their
//!   `user_version` bumps.
//! - A migrated database always holds every table in `REQUIRED_TABLES`.

use crate::db::{DbError, DbResult};
use log::info;
use rusqlite::Connection;

#[derive(Debug, Clone, Copy)]
struct Migration {
    version: u32,
    name: &'static str,
    sql: &'static str,
}

const MIGRATIONS: &[Migration] = &[
    Migration {
        version: 1,
        name: "0001_init",
        sql: include_str!("0001_init.sql"),
    },
    Migration {
        version: 2,
        name: "0002_list_shares",
        sql: include_str!("0002_list_shares.sql"),
    },
];

/// Tables the repositories read and write.
pub const REQUIRED_TABLES: &[&str] = &["users", "lists", "items", "list_shares"];

/// Returns the latest schema version known by this build.
pub fn latest_version() -> u32 {
    MIGRATIONS.last().map_or(0, |migration| migration.version)
}

/// Brings `conn` up to `latest_version()` and checks the resulting schema.
pub fn apply_migrations(conn: &mut Connection) -> DbResult<()> {
    let from_version = schema_version(conn)?;
    let latest = latest_version();
    if from_version > latest {
        return Err(DbError::UnsupportedSchemaVersion {
            db_version: from_version,
            latest_supported: latest,
        });
    }

    let pending: Vec<&Migration> = MIGRATIONS
        .iter()
        .filter(|migration| migration.version > from_version)
        .collect();
    if !pending.is_empty() {
        let tx = conn.transaction()?;
        for migration in &pending {
            run_migration(&tx, migration)?;
        }
        tx.commit()?;
        info!(
            "event=db_migrate module=db status=ok from_version={from_version} to_version={latest} applied={}",
            pending.len()
        );
    }

    ensure_required_tables(conn)
}

fn run_migration(conn: &Connection, migration: &Migration) -> DbResult<()> {
    conn.execute_batch(migration.sql)
        .and_then(|()| {
            conn.execute_batch(&format!("PRAGMA user_version = {};", migration.version))
        })
        .map_err(|source| DbError::MigrationFailed {
            version: migration.version,
            name: migration.name,
            source,
        })
}

fn ensure_required_tables(conn: &Connection) -> DbResult<()> {
    for table in REQUIRED_TABLES {
        let exists: i64 = conn.query_row(
            "SELECT EXISTS(SELECT 1 FROM sqlite_master WHERE type = 'table' AND name = ?1);",
            [table],
            |row| row.get(0),
        )?;
        if exists != 1 {
            return Err(DbError::MissingTable(*table));
        }
    }
    Ok(())
}

fn schema_version(conn: &Connection) -> DbResult<u32> {
    Ok(conn.query_row("PRAGMA user_version;", [], |row| row.get(0))?)
}
