//! The SQLite ensemble archive.
//!
//! Holds per-iteration segment weights and optional state labels for a
//! weighted-ensemble run. Cluster export copies the whole archive and
//! zeroes the weights of every segment outside the cluster.

pub mod migrations;

use std::path::{Path, PathBuf};

use rusqlite::{params, Connection};
use rustc_hash::FxHashSet;

use pathline_core::errors::StorageError;

fn sqlite_err(e: rusqlite::Error) -> StorageError {
    StorageError::Sqlite {
        message: e.to_string(),
    }
}

/// One open ensemble archive.
#[derive(Debug)]
pub struct EnsembleArchive {
    conn: Connection,
    path: PathBuf,
}

impl EnsembleArchive {
    /// Open an archive, creating the file and schema as needed.
    pub fn open(path: &Path) -> Result<Self, StorageError> {
        let conn = Connection::open(path).map_err(sqlite_err)?;
        apply_pragmas(&conn)?;
        migrations::run_migrations(&conn)?;
        Ok(Self {
            conn,
            path: path.to_path_buf(),
        })
    }

    /// Open an archive that must already exist on disk.
    pub fn open_existing(path: &Path) -> Result<Self, StorageError> {
        if !path.exists() {
            return Err(StorageError::Io {
                path: path.to_path_buf(),
                source: std::io::Error::from(std::io::ErrorKind::NotFound),
            });
        }
        Self::open(path)
    }

    /// In-memory archive (for testing).
    pub fn open_in_memory() -> Result<Self, StorageError> {
        let conn = Connection::open_in_memory().map_err(sqlite_err)?;
        apply_pragmas(&conn)?;
        migrations::run_migrations(&conn)?;
        Ok(Self {
            conn,
            path: PathBuf::from(":memory:"),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Record an iteration and its segment count.
    pub fn insert_iteration(&self, iter: u32, n_segments: u32) -> Result<(), StorageError> {
        self.conn
            .execute(
                "INSERT OR REPLACE INTO iterations (iter, n_segments) VALUES (?1, ?2)",
                params![iter, n_segments],
            )
            .map_err(sqlite_err)?;
        Ok(())
    }

    /// Record one segment's weight and parentage.
    pub fn insert_segment(
        &self,
        iter: u32,
        seg: i64,
        weight: f64,
        parent: Option<i64>,
    ) -> Result<(), StorageError> {
        self.conn
            .execute(
                "INSERT OR REPLACE INTO segments (iter, seg, weight, parent)
                 VALUES (?1, ?2, ?3, ?4)",
                params![iter, seg, weight, parent],
            )
            .map_err(sqlite_err)?;
        Ok(())
    }

    /// Replace the state-label table with `labels`, state ids 0..n.
    pub fn write_state_labels(&self, labels: &[String]) -> Result<(), StorageError> {
        let tx = self.conn.unchecked_transaction().map_err(sqlite_err)?;
        tx.execute("DELETE FROM state_labels", [])
            .map_err(sqlite_err)?;
        for (state, label) in labels.iter().enumerate() {
            tx.execute(
                "INSERT INTO state_labels (state, label) VALUES (?1, ?2)",
                params![state as i64, label],
            )
            .map_err(sqlite_err)?;
        }
        tx.commit().map_err(sqlite_err)?;
        Ok(())
    }

    /// Read state labels ordered by state id. Empty or gapped tables are
    /// unusable as a label source.
    pub fn read_state_labels(&self) -> Result<Vec<String>, StorageError> {
        let mut stmt = self
            .conn
            .prepare("SELECT state, label FROM state_labels ORDER BY state")
            .map_err(sqlite_err)?;
        let rows = stmt
            .query_map([], |row| Ok((row.get::<_, i64>(0)?, row.get::<_, String>(1)?)))
            .map_err(sqlite_err)?;

        let mut labels = Vec::new();
        for row in rows {
            let (state, label) = row.map_err(sqlite_err)?;
            if state != labels.len() as i64 {
                return Err(StorageError::Sqlite {
                    message: format!(
                        "state_labels in {} is not contiguous: expected state {}, found {state}",
                        self.path.display(),
                        labels.len()
                    ),
                });
            }
            labels.push(label);
        }
        if labels.is_empty() {
            return Err(StorageError::MissingStateLabels {
                path: self.path.clone(),
            });
        }
        Ok(labels)
    }

    /// Highest recorded iteration, 0 when the archive is empty.
    pub fn last_iteration(&self) -> Result<u32, StorageError> {
        self.conn
            .query_row("SELECT COALESCE(MAX(iter), 0) FROM segments", [], |row| {
                row.get::<_, i64>(0)
            })
            .map(|v| v as u32)
            .map_err(sqlite_err)
    }

    pub fn segment_weight(&self, iter: u32, seg: i64) -> Result<Option<f64>, StorageError> {
        use rusqlite::OptionalExtension;
        self.conn
            .query_row(
                "SELECT weight FROM segments WHERE iter = ?1 AND seg = ?2",
                params![iter, seg],
                |row| row.get(0),
            )
            .optional()
            .map_err(sqlite_err)
    }

    /// Sum of segment weights recorded for an iteration.
    pub fn iteration_total_weight(&self, iter: u32) -> Result<f64, StorageError> {
        self.conn
            .query_row(
                "SELECT COALESCE(SUM(weight), 0.0) FROM segments WHERE iter = ?1",
                params![iter],
                |row| row.get(0),
            )
            .map_err(sqlite_err)
    }

    /// Copy the archive file to `dest`, checkpointing WAL first so the
    /// main database file is complete.
    pub fn copy_to(&self, dest: &Path) -> Result<(), StorageError> {
        self.conn
            .execute_batch("PRAGMA wal_checkpoint(TRUNCATE);")
            .map_err(sqlite_err)?;
        std::fs::copy(&self.path, dest).map_err(|e| StorageError::Io {
            path: dest.to_path_buf(),
            source: e,
        })?;
        Ok(())
    }

    /// Zero the weight of every segment whose (iteration, segment) pair is
    /// not in `members`, walking iterations latest to earliest. Returns the
    /// number of zeroed segments.
    pub fn zero_weights_except(
        &self,
        members: &FxHashSet<(u32, i64)>,
    ) -> Result<usize, StorageError> {
        let iterations: Vec<u32> = {
            let mut stmt = self
                .conn
                .prepare("SELECT DISTINCT iter FROM segments ORDER BY iter DESC")
                .map_err(sqlite_err)?;
            let rows = stmt
                .query_map([], |row| row.get::<_, i64>(0))
                .map_err(sqlite_err)?;
            let mut out = Vec::new();
            for row in rows {
                out.push(row.map_err(sqlite_err)? as u32);
            }
            out
        };

        let mut zeroed = 0usize;
        for iter in iterations {
            let segs: Vec<i64> = {
                let mut stmt = self
                    .conn
                    .prepare("SELECT seg FROM segments WHERE iter = ?1")
                    .map_err(sqlite_err)?;
                let rows = stmt
                    .query_map(params![iter], |row| row.get::<_, i64>(0))
                    .map_err(sqlite_err)?;
                let mut out = Vec::new();
                for row in rows {
                    out.push(row.map_err(sqlite_err)?);
                }
                out
            };

            let tx = self.conn.unchecked_transaction().map_err(sqlite_err)?;
            for seg in segs {
                if !members.contains(&(iter, seg)) {
                    tx.execute(
                        "UPDATE segments SET weight = 0.0 WHERE iter = ?1 AND seg = ?2",
                        params![iter, seg],
                    )
                    .map_err(sqlite_err)?;
                    zeroed += 1;
                }
            }
            tx.commit().map_err(sqlite_err)?;
        }

        tracing::debug!(zeroed = zeroed, "zeroed non-member segment weights");
        Ok(zeroed)
    }
}

/// WAL mode, NORMAL sync, foreign keys, 5s busy timeout.
fn apply_pragmas(conn: &Connection) -> Result<(), StorageError> {
    conn.execute_batch(
        "
        PRAGMA journal_mode = WAL;
        PRAGMA synchronous = NORMAL;
        PRAGMA foreign_keys = ON;
        PRAGMA busy_timeout = 5000;
        ",
    )
    .map_err(|e| StorageError::Sqlite {
        message: format!("failed to apply pragmas: {e}"),
    })
}
