//! # pathline-core
//!
//! Foundation crate for the pathline trajectory analysis workspace.
//! Defines the pathway data model, per-subsystem errors, layered
//! configuration, and compiled defaults. Every other crate in the
//! workspace depends on this.

pub mod config;
pub mod errors;
pub mod types;

// Re-export the most commonly used types at the crate root.
pub use config::{ExportMode, MatchConfig, MetricKind, WeightConvention};
pub use errors::{ConfigError, MatchError, MatchResult, StorageError};
pub use types::{DistanceMatrix, Frame, Pathway, PathwayEnsemble, StateId, SymbolTable};
