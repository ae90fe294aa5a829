//! Configuration system for pathline.
//! TOML-based, layered resolution: CLI > env > project file > defaults.

pub mod defaults;
pub mod match_config;

pub use match_config::{CliOverrides, ExportMode, MatchConfig, MetricKind, WeightConvention};
