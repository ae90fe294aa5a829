//! Per-cluster ensemble archive export.

use std::path::{Path, PathBuf};

use rustc_hash::FxHashSet;

use pathline_core::errors::MatchResult;
use pathline_core::types::PathwayEnsemble;
use pathline_storage::EnsembleArchive;

/// Export one weight-filtered archive copy per requested cluster.
///
/// Each copy starts as a full clone of `source`; the weight of every
/// segment outside the cluster's (iteration, segment) member set is then
/// zeroed, leaving only that cluster's trajectories alive in the copy.
pub fn export_cluster_archives(
    source: &Path,
    ensemble: &PathwayEnsemble,
    labels: &[u32],
    clusters: &[u32],
    mut path_for: impl FnMut(u32) -> PathBuf,
) -> MatchResult<Vec<PathBuf>> {
    let source_archive = EnsembleArchive::open_existing(source)?;
    let mut written = Vec::with_capacity(clusters.len());
    for &cluster in clusters {
        let dest = path_for(cluster);
        source_archive.copy_to(&dest)?;
        let copy = EnsembleArchive::open(&dest)?;
        let members = member_segments(ensemble, labels, cluster);
        let zeroed = copy.zero_weights_except(&members)?;
        tracing::info!(
            cluster = cluster,
            path = %dest.display(),
            members = members.len(),
            zeroed = zeroed,
            "exported cluster archive"
        );
        written.push(dest);
    }
    Ok(written)
}

/// (iteration, segment) pairs of every live frame in the cluster.
fn member_segments(
    ensemble: &PathwayEnsemble,
    labels: &[u32],
    cluster: u32,
) -> FxHashSet<(u32, i64)> {
    ensemble
        .iter()
        .zip(labels)
        .filter(|&(_, &label)| label == cluster)
        .flat_map(|(pathway, _)| pathway.live_frames().map(|f| (f.iteration, f.segment)))
        .collect()
}
