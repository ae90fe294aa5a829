//! Pairwise distance engine.
//!
//! Compares every pathway pair under the configured metric and assembles
//! the symmetric [`DistanceMatrix`] the clustering stage consumes. The
//! subsequence metric compares sequences with filler states removed; the
//! substring metric compares the full padded sequences so positional runs
//! stay aligned. Pair computations fan out over rayon when requested.

pub mod lcs;

use std::path::{Path, PathBuf};
use std::time::Instant;

use rayon::prelude::*;

use pathline_core::config::{MetricKind, WeightConvention};
use pathline_core::errors::{MatchError, MatchResult, StorageError};
use pathline_core::types::{DistanceMatrix, PathwayEnsemble, StateId, SymbolTable};
use pathline_storage::npy;

pub use lcs::{lcs_subsequence_len, lcs_substring_len, pairwise_distance};

/// Options for one distance-matrix computation.
#[derive(Debug, Clone)]
pub struct DistanceOptions {
    /// Comparison metric applied to every pathway pair.
    pub metric: MetricKind,
    /// How a pathway's scalar weight is read off its frames.
    pub weight_convention: WeightConvention,
    /// Matrix cache location; `None` disables caching entirely.
    pub cache: Option<PathBuf>,
    /// Recompute even when a cache file already exists.
    pub force_recompute: bool,
    /// Worker threads: `None` runs serially, `Some(0)` uses the global
    /// rayon pool, `Some(n)` builds a dedicated n-thread pool.
    pub jobs: Option<usize>,
}

impl Default for DistanceOptions {
    fn default() -> Self {
        Self {
            metric: MetricKind::default(),
            weight_convention: WeightConvention::default(),
            cache: None,
            force_recompute: true,
            jobs: None,
        }
    }
}

/// A computed (or cache-loaded) distance matrix plus per-pathway weights.
#[derive(Debug, Clone)]
pub struct DistanceOutput {
    /// Symmetric pairwise distances, zero diagonal.
    pub matrix: DistanceMatrix,
    /// Terminal weight of each pathway, indexed like the ensemble.
    pub weights: Vec<f64>,
}

/// Compute (or load) the pairwise distance matrix for a padded ensemble.
///
/// Weights are always read fresh from the ensemble; only the matrix goes
/// through the cache file.
pub fn compute_distance_matrix(
    ensemble: &PathwayEnsemble,
    table: &SymbolTable,
    options: &DistanceOptions,
) -> MatchResult<DistanceOutput> {
    if ensemble.is_empty() {
        return Err(MatchError::EmptyEnsemble);
    }
    let n = ensemble.len();
    let weights = terminal_weights(ensemble, table, options.weight_convention);

    if let Some(cache) = reusable_cache(options) {
        let matrix = load_cached_matrix(cache, n)?;
        tracing::info!(
            path = %cache.display(),
            pathways = n,
            "loaded cached distance matrix"
        );
        return Ok(DistanceOutput { matrix, weights });
    }

    let sequences = comparison_sequences(ensemble, table, options.metric);
    let pairs: Vec<(usize, usize)> = (0..n)
        .flat_map(|i| ((i + 1)..n).map(move |j| (i, j)))
        .collect();

    let started = Instant::now();
    let distances = run_pairs(&pairs, &sequences, options);
    let mut matrix = DistanceMatrix::zeros(n);
    for (&(i, j), &d) in pairs.iter().zip(distances.iter()) {
        matrix.set_symmetric(i, j, d);
    }
    tracing::info!(
        pathways = n,
        pairs = pairs.len(),
        metric = options.metric.as_str(),
        elapsed_ms = started.elapsed().as_millis() as u64,
        "computed distance matrix"
    );

    if let Some(cache) = &options.cache {
        npy::write_f64_matrix(cache, n, n, matrix.values())?;
        tracing::debug!(path = %cache.display(), "wrote distance matrix cache");
    }
    Ok(DistanceOutput { matrix, weights })
}

/// The cache path, but only when reuse is both requested and possible.
fn reusable_cache(options: &DistanceOptions) -> Option<&Path> {
    match &options.cache {
        Some(path) if !options.force_recompute && path.exists() => Some(path),
        _ => None,
    }
}

fn load_cached_matrix(path: &Path, n: usize) -> MatchResult<DistanceMatrix> {
    let (rows, cols, values) = npy::read_f64_matrix(path)?;
    if rows != n || cols != n {
        return Err(StorageError::ShapeMismatch {
            path: path.to_path_buf(),
            expected: format!("({n}, {n})"),
            found: format!("({rows}, {cols})"),
        }
        .into());
    }
    let found_len = values.len();
    DistanceMatrix::from_values(n, values).ok_or_else(|| {
        StorageError::ShapeMismatch {
            path: path.to_path_buf(),
            expected: format!("({n}, {n})"),
            found: format!("{found_len} elements"),
        }
        .into()
    })
}

/// Per-pathway comparison slices. The subsequence metric drops filler so
/// shared padding cannot register as similarity; the substring metric
/// keeps the padded layout, matching its use for positional comparisons.
fn comparison_sequences(
    ensemble: &PathwayEnsemble,
    table: &SymbolTable,
    metric: MetricKind,
) -> Vec<Vec<StateId>> {
    let unknown = table.unknown_id();
    ensemble
        .iter()
        .map(|p| match metric {
            MetricKind::Subsequence => p.stripped_sequence(unknown),
            MetricKind::Substring => p.state_sequence(),
        })
        .collect()
}

/// Terminal weight of every pathway under `convention`.
fn terminal_weights(
    ensemble: &PathwayEnsemble,
    table: &SymbolTable,
    convention: WeightConvention,
) -> Vec<f64> {
    let unknown = table.unknown_id();
    ensemble
        .iter()
        .enumerate()
        .map(|(i, p)| match convention {
            WeightConvention::TerminalRaw => p.terminal_raw_weight(),
            WeightConvention::TerminalLive => {
                p.terminal_live_weight(unknown).unwrap_or_else(|| {
                    tracing::warn!(
                        pathway = i,
                        "no live frames, falling back to the raw terminal weight"
                    );
                    p.terminal_raw_weight()
                })
            }
        })
        .collect()
}

fn run_pairs(
    pairs: &[(usize, usize)],
    sequences: &[Vec<StateId>],
    options: &DistanceOptions,
) -> Vec<f64> {
    let one = |&(i, j): &(usize, usize)| {
        lcs::pairwise_distance(&sequences[i], &sequences[j], options.metric)
    };
    match options.jobs {
        None => pairs.iter().map(one).collect(),
        Some(0) => pairs.par_iter().map(one).collect(),
        Some(n) => match rayon::ThreadPoolBuilder::new().num_threads(n).build() {
            Ok(pool) => pool.install(|| pairs.par_iter().map(one).collect()),
            Err(e) => {
                tracing::warn!(error = %e, "thread pool unavailable, computing serially");
                pairs.iter().map(one).collect()
            }
        },
    }
}
