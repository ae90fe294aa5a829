//! Right-padding to a rectangular ensemble.

use pathline_core::types::{Frame, PathwayEnsemble, SymbolTable};

/// Append filler frames until every pathway reaches the ensemble's
/// maximum length, and force the unknown state onto every filler frame
/// already present. In place and idempotent.
pub fn pad_to_uniform(ensemble: &mut PathwayEnsemble, table: &SymbolTable) {
    let unknown = table.unknown_id();
    let target = ensemble.max_len();
    for pathway in ensemble.iter_mut() {
        for frame in pathway.frames.iter_mut().filter(|f| f.is_filler()) {
            frame.state = unknown;
        }
        while pathway.len() < target {
            pathway.frames.push(Frame {
                iteration: 0,
                segment: 0,
                state: unknown,
                aux: 0.0,
                weight: 0.0,
            });
        }
    }
}
