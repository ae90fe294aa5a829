//! Plain-text representative weight report.

use std::path::Path;

use pathline_core::errors::StorageError;

use crate::representative::ClusterRepresentative;

/// Write one representative weight per line, in the order given.
pub fn write_weight_report(
    path: &Path,
    representatives: &[ClusterRepresentative],
) -> Result<(), StorageError> {
    let mut out = String::new();
    for rep in representatives {
        out.push_str(&rep.weight.to_string());
        out.push('\n');
    }
    std::fs::write(path, out).map_err(|source| StorageError::Io {
        path: path.to_path_buf(),
        source,
    })
}
