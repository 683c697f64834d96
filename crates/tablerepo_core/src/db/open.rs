//! Connection bootstrap for the SQLite adapter.
//!
//! # Invariants
//! - Returned adapters have the configured `foreign_keys` pragma applied.
//! - Returned adapters have the configured busy timeout applied.

use super::{DbResult, SqliteAdapter};
use crate::config::DbConfig;
use log::{error, info};
use std::path::Path;
use std::time::{Duration, Instant};

/// Opens a SQLite database file with default settings.
pub fn open_db(path: impl AsRef<Path>) -> DbResult<SqliteAdapter> {
    let config = DbConfig {
        path: Some(path.as_ref().to_path_buf()),
        ..DbConfig::default()
    };
    open_db_with(&config)
}

/// Opens a private in-memory SQLite database with default settings.
pub fn open_db_in_memory() -> DbResult<SqliteAdapter> {
    open_db_with(&DbConfig::default())
}

/// Opens a SQLite database as described by `config`.
///
/// `config.path = None` selects an in-memory database.
///
/// # Side effects
/// - Emits `db_open` logging events with duration and status.
pub fn open_db_with(config: &DbConfig) -> DbResult<SqliteAdapter> {
    let started_at = Instant::now();
    let mode = if config.path.is_some() { "file" } else { "memory" };
    info!("event=db_open module=db status=start mode={mode}");

    let opened = match &config.path {
        Some(path) => rusqlite::Connection::open(path),
        None => rusqlite::Connection::open_in_memory(),
    };
    let conn = match opened {
        Ok(conn) => conn,
        Err(err) => {
            error!(
                "event=db_open module=db status=error mode={mode} duration_ms={} error_code=db_open_failed error={}",
                started_at.elapsed().as_millis(),
                err
            );
            return Err(err.into());
        }
    };

    if let Err(err) = configure_connection(&conn, config) {
        error!(
            "event=db_open module=db status=error mode={mode} duration_ms={} error_code=db_configure_failed error={}",
            started_at.elapsed().as_millis(),
            err
        );
        return Err(err.into());
    }

    info!(
        "event=db_open module=db status=ok mode={mode} duration_ms={}",
        started_at.elapsed().as_millis()
    );
    Ok(SqliteAdapter::new(conn))
}

fn configure_connection(conn: &rusqlite::Connection, config: &DbConfig) -> rusqlite::Result<()> {
    let foreign_keys = if config.foreign_keys { "ON" } else { "OFF" };
    conn.execute_batch(&format!("PRAGMA foreign_keys = {foreign_keys};"))?;
    conn.busy_timeout(Duration::from_millis(config.busy_timeout_ms))?;
    Ok(())
}
