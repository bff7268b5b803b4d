//! Profile database access.
//!
//! Templates, recipient overrides and data-source records live in a single
//! sqlite file next to the executable. Services open short-lived connections
//! per request; nothing is cached in memory, so the database is the single
//! source of truth for profile state.

use crate::config::{DB_FILE, UPLOAD_DIR};
use rusqlite::Connection;

pub fn open() -> Result<Connection, String> {
    Connection::open(DB_FILE).map_err(|e| e.to_string())
}

/// Create the schema and the uploads directory. Called once at startup.
///
/// `position` records template insertion order; rotation walks templates in
/// this order, so it must survive renames and edits. Overrides deliberately
/// carry no foreign key: deleting a template leaves its overrides behind as
/// stale entries, removable via the prune endpoint.
pub fn init() -> Result<(), String> {
    let conn = open()?;
    conn.execute_batch(
        "CREATE TABLE IF NOT EXISTS templates (
            id          TEXT PRIMARY KEY,
            name        TEXT NOT NULL,
            text        TEXT NOT NULL,
            manual_only INTEGER NOT NULL DEFAULT 0,
            position    INTEGER NOT NULL
        );
        CREATE TABLE IF NOT EXISTS recipient_overrides (
            email       TEXT PRIMARY KEY,
            template_id TEXT NOT NULL
        );
        CREATE TABLE IF NOT EXISTS data_sources (
            id     TEXT PRIMARY KEY,
            kind   TEXT NOT NULL,
            origin TEXT
        );",
    )
    .map_err(|e| e.to_string())?;

    std::fs::create_dir_all(UPLOAD_DIR).map_err(|e| e.to_string())?;
    Ok(())
}
