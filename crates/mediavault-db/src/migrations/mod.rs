//! Embedded schema migrations.
//!
//! Each migration is a SQL file compiled into the binary. Applied versions
//! are recorded in `schema_migrations`; pending ones run in version order,
//! one transaction each.

use rusqlite::{Connection, OptionalExtension};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum MigrationError {
    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("Migration {version} ({name}) failed: {message}")]
    Failed {
        version: u32,
        name: &'static str,
        message: String,
    },
}

struct Migration {
    version: u32,
    name: &'static str,
    sql: &'static str,
}

const MIGRATIONS: &[Migration] = &[Migration {
    version: 1,
    name: "objects_and_tags",
    sql: include_str!("001_initial.sql"),
}];

const CREATE_LEDGER: &str = "CREATE TABLE IF NOT EXISTS schema_migrations (
    version INTEGER PRIMARY KEY NOT NULL,
    name TEXT NOT NULL,
    applied_at TEXT NOT NULL DEFAULT (datetime('now'))
)";

/// Highest applied version, creating the ledger on first use.
pub fn current_version(conn: &Connection) -> Result<u32, MigrationError> {
    conn.execute_batch(CREATE_LEDGER)?;
    let version: Option<u32> = conn
        .query_row("SELECT MAX(version) FROM schema_migrations", [], |row| {
            row.get(0)
        })
        .optional()?
        .flatten();
    Ok(version.unwrap_or(0))
}

/// Newest version known to this build.
pub fn latest_version() -> u32 {
    MIGRATIONS.iter().map(|m| m.version).max().unwrap_or(0)
}

/// Apply every pending migration, returning how many ran.
pub fn run_migrations(conn: &Connection) -> Result<usize, MigrationError> {
    let current = current_version(conn)?;
    let mut applied = 0;

    for migration in MIGRATIONS.iter().filter(|m| m.version > current) {
        let failed = |e: rusqlite::Error| MigrationError::Failed {
            version: migration.version,
            name: migration.name,
            message: e.to_string(),
        };

        let tx = conn.unchecked_transaction()?;
        tx.execute_batch(migration.sql).map_err(failed)?;
        tx.execute(
            "INSERT INTO schema_migrations (version, name) VALUES (?1, ?2)",
            rusqlite::params![migration.version, migration.name],
        )
        .map_err(failed)?;
        tx.commit().map_err(failed)?;

        tracing::info!(
            "Applied catalog migration {} ({})",
            migration.version,
            migration.name
        );
        applied += 1;
    }

    Ok(applied)
}
