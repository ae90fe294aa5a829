//! Error handling for pathline.
//! One error enum per subsystem, `thiserror` only, zero `anyhow`.

pub mod config_error;
pub mod match_error;
pub mod storage_error;

pub use config_error::ConfigError;
pub use match_error::{MatchError, MatchResult};
pub use storage_error::StorageError;
