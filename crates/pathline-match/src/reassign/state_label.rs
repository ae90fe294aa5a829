//! State-label reassignment: archive labels name the existing states.

use pathline_core::errors::{ConfigError, MatchResult};
use pathline_core::types::{PathwayEnsemble, SymbolTable};
use pathline_storage::EnsembleArchive;

use super::{ReassignContext, ReassignStrategy};

/// Keeps state ids as they are and replaces the numeric alphabet with
/// the labels recorded in the ensemble archive's `state_labels` table.
#[derive(Debug, Clone, Copy, Default)]
pub struct StateLabelStrategy;

impl ReassignStrategy for StateLabelStrategy {
    fn reassign(
        &self,
        ensemble: &mut PathwayEnsemble,
        ctx: &ReassignContext,
    ) -> MatchResult<SymbolTable> {
        let source =
            ctx.label_source
                .as_deref()
                .ok_or_else(|| ConfigError::ValidationFailed {
                    field: "archive".to_string(),
                    message: "the state-label strategy needs an ensemble archive to read labels from"
                        .to_string(),
                })?;
        let archive = EnsembleArchive::open_existing(source)?;
        let labels = archive.read_state_labels()?;

        if let Some(max) = ensemble.max_live_state() {
            let required = max as usize + 1;
            if labels.len() < required {
                return Err(ConfigError::InvalidValue {
                    field: "archive".to_string(),
                    message: format!(
                        "archive names {} states but the pathways reference state {max}",
                        labels.len()
                    ),
                }
                .into());
            }
        }
        Ok(SymbolTable::new(labels))
    }
}
