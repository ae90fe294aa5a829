//! State reassignment strategies.
//!
//! A strategy rewrites `Frame::state` across the ensemble and returns the
//! [`SymbolTable`] the rest of the pipeline compares and renders with.
//! Builtins are looked up by name through [`StrategyRegistry`]; embedding
//! callers can register their own implementations alongside them.

mod identity;
mod segment_id;
mod state_label;

use std::fmt;
use std::path::PathBuf;

use rustc_hash::FxHashMap;

use pathline_core::errors::{ConfigError, MatchResult};
use pathline_core::types::{PathwayEnsemble, SymbolTable};

pub use identity::IdentityStrategy;
pub use segment_id::SegmentIdStrategy;
pub use state_label::StateLabelStrategy;

/// Ambient inputs a strategy may consult.
#[derive(Debug, Clone, Default)]
pub struct ReassignContext {
    /// Ensemble archive holding the `state_labels` table.
    pub label_source: Option<PathBuf>,
}

/// Rewrites states across an ensemble and names the resulting alphabet.
pub trait ReassignStrategy: Send + Sync {
    fn reassign(
        &self,
        ensemble: &mut PathwayEnsemble,
        ctx: &ReassignContext,
    ) -> MatchResult<SymbolTable>;
}

impl fmt::Debug for dyn ReassignStrategy + '_ {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("dyn ReassignStrategy")
    }
}

/// Named strategy lookup. `Default` carries the builtins.
pub struct StrategyRegistry {
    strategies: FxHashMap<String, Box<dyn ReassignStrategy>>,
}

impl Default for StrategyRegistry {
    fn default() -> Self {
        let mut registry = Self {
            strategies: FxHashMap::default(),
        };
        registry.register("identity", Box::new(IdentityStrategy));
        registry.register("state-label", Box::new(StateLabelStrategy));
        registry.register("segment-id", Box::new(SegmentIdStrategy));
        registry
    }
}

impl StrategyRegistry {
    /// Registry with no builtins.
    pub fn empty() -> Self {
        Self {
            strategies: FxHashMap::default(),
        }
    }

    pub fn register(&mut self, name: impl Into<String>, strategy: Box<dyn ReassignStrategy>) {
        self.strategies.insert(name.into(), strategy);
    }

    /// Look a strategy up by name; unknown names report the known set.
    pub fn resolve(&self, name: &str) -> Result<&dyn ReassignStrategy, ConfigError> {
        self.strategies
            .get(name)
            .map(Box::as_ref)
            .ok_or_else(|| ConfigError::UnknownStrategy {
                name: name.to_string(),
                known: self.known_names().join(", "),
            })
    }

    /// Registered names, sorted for stable error messages.
    pub fn known_names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.strategies.keys().cloned().collect();
        names.sort();
        names
    }
}
