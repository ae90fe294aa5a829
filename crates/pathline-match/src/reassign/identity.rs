//! Identity reassignment: extractor state ids kept as they are.

use pathline_core::errors::MatchResult;
use pathline_core::types::{PathwayEnsemble, SymbolTable};

use super::{ReassignContext, ReassignStrategy};

/// Leaves every state id untouched and labels the alphabet "0".."n-1",
/// sized by the highest state any live frame references.
#[derive(Debug, Clone, Copy, Default)]
pub struct IdentityStrategy;

impl ReassignStrategy for IdentityStrategy {
    fn reassign(
        &self,
        ensemble: &mut PathwayEnsemble,
        _ctx: &ReassignContext,
    ) -> MatchResult<SymbolTable> {
        let n_states = ensemble.max_live_state().map_or(0, |max| max as usize + 1);
        Ok(SymbolTable::numeric(n_states))
    }
}
