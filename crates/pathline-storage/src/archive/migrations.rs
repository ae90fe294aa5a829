//! Archive schema migrations using PRAGMA user_version.

use pathline_core::errors::StorageError;
use rusqlite::Connection;

/// V001: iteration bookkeeping, per-segment weights, state labels.
pub const V001_INITIAL_SQL: &str = r#"
-- One row per weighted-ensemble iteration.
CREATE TABLE IF NOT EXISTS iterations (
    iter INTEGER PRIMARY KEY,
    n_segments INTEGER NOT NULL DEFAULT 0
) STRICT;

-- Per-segment statistical weights, keyed by (iteration, segment).
-- parent is the segment's ancestor in the previous iteration.
CREATE TABLE IF NOT EXISTS segments (
    iter INTEGER NOT NULL,
    seg INTEGER NOT NULL,
    weight REAL NOT NULL,
    parent INTEGER,
    PRIMARY KEY (iter, seg)
) STRICT;

CREATE INDEX IF NOT EXISTS idx_segments_iter ON segments(iter);

-- Display labels for discrete states, contiguous from 0.
CREATE TABLE IF NOT EXISTS state_labels (
    state INTEGER PRIMARY KEY,
    label TEXT NOT NULL
) STRICT;
"#;

/// Run all pending migrations.
pub fn run_migrations(conn: &Connection) -> Result<(), StorageError> {
    let current_version: u32 = conn
        .pragma_query_value(None, "user_version", |row| row.get(0))
        .map_err(|e| StorageError::MigrationFailed {
            version: 0,
            reason: e.to_string(),
        })?;

    let migrations: &[(&str, u32)] = &[(V001_INITIAL_SQL, 1)];

    for (sql, version) in migrations {
        if current_version < *version {
            conn.execute_batch(sql)
                .map_err(|e| StorageError::MigrationFailed {
                    version: *version,
                    reason: e.to_string(),
                })?;
            conn.pragma_update(None, "user_version", version).map_err(|e| {
                StorageError::MigrationFailed {
                    version: *version,
                    reason: e.to_string(),
                }
            })?;
            tracing::info!(version = version, "applied archive migration");
        }
    }

    Ok(())
}

/// Get the current schema version.
pub fn current_version(conn: &Connection) -> Result<u32, StorageError> {
    conn.pragma_query_value(None, "user_version", |row| row.get(0))
        .map_err(|e| StorageError::Sqlite {
            message: e.to_string(),
        })
}
