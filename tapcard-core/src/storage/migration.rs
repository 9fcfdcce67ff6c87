// SPDX-FileCopyrightText: 2026 Mattia Egloff <mattia.egloff@pm.me>
//
// SPDX-License-Identifier: GPL-3.0-or-later

//! Database Schema Migration Framework
//!
//! Versioned schema migrations for the SQLite key-value backend. The runner
//! records applied versions in a `schema_version` table.

use rusqlite::{params, Connection};
use tracing::debug;

use super::StorageError;

/// A single schema migration step.
pub struct Migration {
    /// Monotonically increasing version number (starting at 1).
    pub version: u32,
    /// Human-readable name for this migration.
    pub name: &'static str,
    /// SQL batch to execute.
    pub sql: &'static str,
}

/// Runs schema migrations against a database connection.
pub struct MigrationRunner;

impl MigrationRunner {
    /// Applies every migration newer than the stored version, all in one
    /// transaction. Nothing is applied if any step fails.
    pub fn run(conn: &Connection, migrations: &[Migration]) -> Result<(), StorageError> {
        let tx = conn.unchecked_transaction()?;
        tx.execute_batch(
            "CREATE TABLE IF NOT EXISTS schema_version (
                version INTEGER PRIMARY KEY,
                applied_at INTEGER NOT NULL
            );",
        )?;

        let stored = Self::current_version(&tx)?;
        let mut applied = stored;

        for migration in migrations.iter().filter(|m| m.version > stored) {
            if migration.version <= applied {
                return Err(StorageError::Migration(format!(
                    "v{} listed after v{}",
                    migration.version, applied
                )));
            }

            tx.execute_batch(migration.sql).map_err(|e| {
                StorageError::Migration(format!("v{} '{}': {}", migration.version, migration.name, e))
            })?;
            tx.execute(
                "INSERT INTO schema_version (version, applied_at) VALUES (?1, strftime('%s', 'now'))",
                params![migration.version],
            )?;

            debug!(version = migration.version, name = migration.name, "applied migration");
            applied = migration.version;
        }

        tx.commit()?;
        Ok(())
    }

    /// Returns the current schema version, 0 for a fresh database.
    pub fn current_version(conn: &Connection) -> Result<u32, StorageError> {
        let tracked: bool = conn.query_row(
            "SELECT EXISTS (SELECT 1 FROM sqlite_master WHERE type = 'table' AND name = 'schema_version')",
            [],
            |row| row.get(0),
        )?;
        if !tracked {
            return Ok(0);
        }

        let version = conn.query_row(
            "SELECT COALESCE(MAX(version), 0) FROM schema_version",
            [],
            |row| row.get(0),
        )?;
        Ok(version)
    }
}

/// Returns all registered migrations in version order.
pub fn all_migrations() -> Vec<Migration> {
    vec![Migration {
        version: 1,
        name: "key_value_slots",
        sql: MIGRATION_V1_KV,
    }]
}

const MIGRATION_V1_KV: &str = "
CREATE TABLE IF NOT EXISTS kv (
    key TEXT PRIMARY KEY NOT NULL,
    value TEXT NOT NULL,
    updated_at INTEGER NOT NULL
);
";
