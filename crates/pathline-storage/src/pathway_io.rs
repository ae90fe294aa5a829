//! Pathway file I/O.
//!
//! Two accepted layouts. Raw extracted records: each pathway a list of
//! numeric rows stored target-first, weight in the last column. Normalized
//! form: frames as JSON objects in chronological order, the layout
//! [`save_pathways`] writes. Raw is tried first because a raw row also has
//! the positional shape of a frame.

use std::fs;
use std::path::Path;

use pathline_core::errors::StorageError;
use pathline_core::types::{Frame, Pathway, PathwayEnsemble, WEIGHT_COLUMN_MIN};

fn io_err(path: &Path, source: std::io::Error) -> StorageError {
    StorageError::Io {
        path: path.to_path_buf(),
        source,
    }
}

/// Load an ensemble from disk. An empty ensemble is fatal here: nothing
/// downstream can work without pathways.
pub fn load_pathways(path: &Path) -> Result<PathwayEnsemble, StorageError> {
    let content = fs::read_to_string(path).map_err(|e| io_err(path, e))?;
    let ensemble = parse_pathways(&content, path)?;
    if ensemble.is_empty() {
        return Err(StorageError::EmptyPathways {
            path: path.to_path_buf(),
        });
    }
    tracing::debug!(
        pathways = ensemble.len(),
        max_len = ensemble.max_len(),
        path = %path.display(),
        "loaded pathway ensemble"
    );
    Ok(ensemble)
}

fn parse_pathways(content: &str, path: &Path) -> Result<PathwayEnsemble, StorageError> {
    if let Ok(raw) = serde_json::from_str::<Vec<Vec<Vec<f64>>>>(content) {
        return from_raw_records(raw, path);
    }
    serde_json::from_str::<PathwayEnsemble>(content).map_err(|e| {
        StorageError::MalformedPathways {
            path: path.to_path_buf(),
            message: e.to_string(),
        }
    })
}

fn from_raw_records(
    raw: Vec<Vec<Vec<f64>>>,
    path: &Path,
) -> Result<PathwayEnsemble, StorageError> {
    let mut pathways = Vec::with_capacity(raw.len());
    for (pi, rows) in raw.into_iter().enumerate() {
        let mut frames = Vec::with_capacity(rows.len());
        for (fi, row) in rows.iter().enumerate() {
            let frame =
                Frame::from_record(row).ok_or_else(|| StorageError::MalformedRecord {
                    path: path.to_path_buf(),
                    pathway: pi,
                    frame: fi,
                    expected: WEIGHT_COLUMN_MIN,
                    found: row.len(),
                })?;
            frames.push(frame);
        }
        pathways.push(Pathway::from_reversed_records(frames));
    }
    Ok(PathwayEnsemble::new(pathways))
}

/// Write an ensemble in the normalized frame-object layout.
pub fn save_pathways(path: &Path, ensemble: &PathwayEnsemble) -> Result<(), StorageError> {
    let json = serde_json::to_string(ensemble).map_err(|e| {
        StorageError::MalformedPathways {
            path: path.to_path_buf(),
            message: e.to_string(),
        }
    })?;
    fs::write(path, json).map_err(|e| io_err(path, e))
}
