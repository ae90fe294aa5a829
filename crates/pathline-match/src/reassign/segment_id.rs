//! Segment-id reassignment: walker lineage becomes the compared signal.

use rustc_hash::FxHashMap;

use pathline_core::errors::MatchResult;
use pathline_core::types::{Pathway, PathwayEnsemble, StateId, SymbolTable};

use super::{ReassignContext, ReassignStrategy};

/// Overwrites every live frame's state with its segment id, densely
/// remapped to `0..M-1` over the distinct segments seen, one letter each.
/// Pairs with the substring metric, which needs exact positional identity.
#[derive(Debug, Clone, Copy, Default)]
pub struct SegmentIdStrategy;

impl ReassignStrategy for SegmentIdStrategy {
    fn reassign(
        &self,
        ensemble: &mut PathwayEnsemble,
        _ctx: &ReassignContext,
    ) -> MatchResult<SymbolTable> {
        let mut segments: Vec<i64> = ensemble
            .iter()
            .flat_map(Pathway::live_frames)
            .map(|f| f.segment)
            .collect();
        segments.sort_unstable();
        segments.dedup();

        let index: FxHashMap<i64, StateId> = segments
            .iter()
            .enumerate()
            .map(|(i, &seg)| (seg, i as StateId))
            .collect();
        for pathway in ensemble.iter_mut() {
            for frame in pathway.frames.iter_mut().filter(|f| !f.is_filler()) {
                if let Some(&id) = index.get(&frame.segment) {
                    frame.state = id;
                }
            }
        }
        Ok(SymbolTable::lettered(segments.len()))
    }
}
