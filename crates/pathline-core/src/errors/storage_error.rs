//! Storage errors: pathway files, NPY arrays, and the ensemble archive.

use std::path::PathBuf;

/// Errors that can occur while reading or writing analysis artifacts.
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("IO error on {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Malformed pathway file {path}: {message}")]
    MalformedPathways { path: PathBuf, message: String },

    #[error("Malformed record in {path} (pathway {pathway}, frame {frame}): expected at least {expected} columns, found {found}")]
    MalformedRecord {
        path: PathBuf,
        pathway: usize,
        frame: usize,
        expected: usize,
        found: usize,
    },

    #[error("No pathways found in {path}: re-run extraction before matching")]
    EmptyPathways { path: PathBuf },

    #[error("Invalid NPY data in {path}: {message}")]
    NpyFormat { path: PathBuf, message: String },

    #[error("Shape mismatch in {path}: expected {expected}, found {found} (run without --reuse-matrix or delete the file)")]
    ShapeMismatch {
        path: PathBuf,
        expected: String,
        found: String,
    },

    #[error("SQLite error: {message}")]
    Sqlite { message: String },

    #[error("Migration failed at version {version}: {reason}")]
    MigrationFailed { version: u32, reason: String },

    #[error("Archive {path} has no usable state_labels table: populate it or choose a different reassignment strategy")]
    MissingStateLabels { path: PathBuf },
}
