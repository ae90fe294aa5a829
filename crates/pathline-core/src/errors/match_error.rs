//! Match engine errors.
//! Aggregates subsystem errors via `From` conversions.

use super::{ConfigError, StorageError};

/// Errors that can occur during a pattern-matching run.
#[derive(Debug, thiserror::Error)]
pub enum MatchError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    #[error("No pathways to match: the ensemble is empty")]
    EmptyEnsemble,

    #[error("Dendrogram nesting depth {depth} exceeds the limit of {limit}")]
    DendrogramTooDeep { depth: usize, limit: usize },

    #[error("Requested cluster {cluster} is out of range: valid clusters are 1..={max}")]
    InvalidClusterRequest { cluster: u32, max: u32 },

    #[error("Render error: {message}")]
    Render { message: String },
}

pub type MatchResult<T> = Result<T, MatchError>;
