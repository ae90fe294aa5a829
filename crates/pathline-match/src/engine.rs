//! The match engine: full pipeline orchestration behind a prompt boundary.
//!
//! `MatchEngine::run` drives load → reassign → pad → distance → dendrogram
//! → cut → export. All interaction goes through [`MatchPrompt`], a
//! synchronous request/response seam: the CLI answers from stdin, tests
//! and headless runs answer with [`FixedPrompt`], and clustering itself
//! stays a pure function either way.

use std::path::PathBuf;

use pathline_core::config::{defaults, ExportMode, MatchConfig};
use pathline_core::errors::{MatchError, MatchResult, StorageError};
use pathline_storage::{load_pathways, npy, save_pathways};

use crate::cluster::{self, Dendrogram, Linkage};
use crate::distance::{compute_distance_matrix, DistanceOptions};
use crate::export::{export_cluster_archives, write_weight_report};
use crate::padding::pad_to_uniform;
use crate::reassign::{ReassignContext, StrategyRegistry};
use crate::representative::{select_representative, ClusterRepresentative};
use crate::statistics::MatchStatistics;

/// Decision after a dendrogram has been shown.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ThresholdDecision {
    /// Draw again with a different threshold line.
    Redraw(f64),
    /// Accept the picture and move on to choosing a cluster count.
    Continue,
    /// Stop the run without writing exports.
    Abort,
}

/// Decision on how many clusters to cut.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ClusterDecision {
    Clusters(usize),
    Abort,
}

/// Synchronous interaction boundary of a match run.
pub trait MatchPrompt {
    /// Asked after every dendrogram render.
    fn next_threshold(&mut self) -> ThresholdDecision;
    /// Asked once the threshold is settled; `n_pathways` bounds the answer.
    fn cluster_count(&mut self, n_pathways: usize) -> ClusterDecision;
}

/// Prompt that never interacts: accepts the first render and answers a
/// fixed cluster count.
#[derive(Debug, Clone, Copy)]
pub struct FixedPrompt {
    pub n_clusters: usize,
}

impl MatchPrompt for FixedPrompt {
    fn next_threshold(&mut self) -> ThresholdDecision {
        ThresholdDecision::Continue
    }

    fn cluster_count(&mut self, _n_pathways: usize) -> ClusterDecision {
        ClusterDecision::Clusters(self.n_clusters)
    }
}

/// How a run ended. Aborting is a normal outcome, not an error.
#[derive(Debug)]
pub enum MatchOutcome {
    Completed(MatchSummary),
    Aborted,
}

/// Everything a completed run produced.
#[derive(Debug)]
pub struct MatchSummary {
    pub n_pathways: usize,
    pub n_clusters: usize,
    /// Per-pathway cluster labels, 1-based.
    pub labels: Vec<u32>,
    pub statistics: MatchStatistics,
    /// One entry per requested cluster, in request order.
    pub representatives: Vec<ClusterRepresentative>,
    /// Files written during the run.
    pub artifacts: Vec<PathBuf>,
}

/// Drives one configured match run.
pub struct MatchEngine {
    config: MatchConfig,
    registry: StrategyRegistry,
}

impl MatchEngine {
    pub fn new(config: MatchConfig) -> Self {
        Self {
            config,
            registry: StrategyRegistry::default(),
        }
    }

    /// Engine with caller-supplied strategies alongside the builtins.
    pub fn with_registry(config: MatchConfig, registry: StrategyRegistry) -> Self {
        Self { config, registry }
    }

    pub fn config(&self) -> &MatchConfig {
        &self.config
    }

    /// Run the pipeline to completion or until the prompt aborts it.
    pub fn run(&self, prompt: &mut dyn MatchPrompt) -> MatchResult<MatchOutcome> {
        self.config.validate()?;
        std::fs::create_dir_all(&self.config.out_dir).map_err(|source| StorageError::Io {
            path: self.config.out_dir.clone(),
            source,
        })?;

        let mut ensemble = load_pathways(&self.config.input_pathways_path())?;
        let n_pathways = ensemble.len();
        tracing::info!(pathways = n_pathways, "loaded pathway ensemble");

        let strategy = self.registry.resolve(&self.config.reassign)?;
        let ctx = ReassignContext {
            label_source: self
                .config
                .state_labels
                .clone()
                .or_else(|| self.config.archive.clone()),
        };
        let table = strategy.reassign(&mut ensemble, &ctx)?;
        tracing::info!(
            strategy = self.config.reassign.as_str(),
            states = table.len(),
            "reassigned states"
        );
        if table.len() < defaults::MIN_DISCRIMINATING_SYMBOLS {
            tracing::warn!(
                states = table.len(),
                "alphabet is nearly degenerate; clusters may not separate"
            );
        }
        pad_to_uniform(&mut ensemble, &table);

        let options = DistanceOptions {
            metric: self.config.metric,
            weight_convention: self.config.weight_convention,
            cache: Some(self.config.matrix_cache_path()),
            force_recompute: !self.config.reuse_matrix,
            jobs: self.config.jobs,
        };
        let distance = compute_distance_matrix(&ensemble, &table, &options)?;
        let linkage = cluster::ward_linkage(&distance.matrix);

        // No picture, nothing to adjust: the redraw dialog only runs when
        // a dendrogram is actually rendered.
        let mut threshold = self.config.dendrogram_threshold;
        if self.config.render_dendrogram {
            loop {
                self.visualize(&linkage, threshold)?;
                match prompt.next_threshold() {
                    ThresholdDecision::Redraw(t) => threshold = t,
                    ThresholdDecision::Continue => break,
                    ThresholdDecision::Abort => {
                        tracing::info!("match run aborted at the threshold prompt");
                        return Ok(MatchOutcome::Aborted);
                    }
                }
            }
        }

        let k = match self.config.n_clusters {
            Some(k) => k,
            None => match prompt.cluster_count(n_pathways) {
                ClusterDecision::Clusters(k) => k,
                ClusterDecision::Abort => {
                    tracing::info!("match run aborted at the cluster prompt");
                    return Ok(MatchOutcome::Aborted);
                }
            },
        };
        let labels = cluster::cut_to_clusters(&linkage, k);
        let n_clusters = labels.iter().copied().max().unwrap_or(0) as usize;
        tracing::info!(requested = k, clusters = n_clusters, "cut into clusters");

        let statistics = MatchStatistics::from_labels(&labels, &distance.weights, n_clusters);
        if self.config.stats {
            tracing::info!("{statistics}");
        }

        let mut artifacts = Vec::new();
        let output_path = self.config.output_pathways_path();
        save_pathways(&output_path, &ensemble)?;
        artifacts.push(output_path);

        let labels_path = self.config.cluster_labels_path();
        let labels_i64: Vec<i64> = labels.iter().map(|&l| i64::from(l)).collect();
        npy::write_i64_vector(&labels_path, &labels_i64)?;
        artifacts.push(labels_path);

        let requested: Vec<u32> = match &self.config.clusters {
            Some(clusters) => clusters.clone(),
            None => (1..=n_clusters as u32).collect(),
        };
        for &cluster in &requested {
            if cluster == 0 || cluster as usize > n_clusters {
                return Err(MatchError::InvalidClusterRequest {
                    cluster,
                    max: n_clusters as u32,
                });
            }
        }

        let representatives: Vec<ClusterRepresentative> = requested
            .iter()
            .filter_map(|&c| select_representative(&labels, &distance.weights, c))
            .collect();
        let report_path = self.config.weight_report_path();
        write_weight_report(&report_path, &representatives)?;
        artifacts.push(report_path);

        if self.config.export == ExportMode::Archives {
            // validate() guarantees an archive path in this mode
            if let Some(archive) = &self.config.archive {
                let written =
                    export_cluster_archives(archive, &ensemble, &labels, &requested, |c| {
                        self.config.cluster_archive_path(c)
                    })?;
                artifacts.extend(written);
            }
        }

        Ok(MatchOutcome::Completed(MatchSummary {
            n_pathways,
            n_clusters,
            labels,
            statistics,
            representatives,
            artifacts,
        }))
    }

    /// Lay the dendrogram out and render it, tolerating deep trees and
    /// render failures. Only an over-budget retry failure is fatal.
    fn visualize(&self, linkage: &Linkage, threshold: f64) -> MatchResult<()> {
        let dendro = match cluster::layout(linkage, defaults::DENDROGRAM_DEPTH_LIMIT) {
            Ok(d) => d,
            Err(MatchError::DendrogramTooDeep { depth, limit }) => {
                tracing::warn!(
                    depth,
                    limit,
                    retry_limit = defaults::DENDROGRAM_DEPTH_RETRY_LIMIT,
                    "dendrogram exceeded the depth budget, retrying with a larger one"
                );
                cluster::layout(linkage, defaults::DENDROGRAM_DEPTH_RETRY_LIMIT)?
            }
            Err(e) => return Err(e),
        };
        self.render(&dendro, threshold);
        Ok(())
    }

    #[cfg(feature = "plotting")]
    fn render(&self, dendro: &Dendrogram, threshold: f64) {
        let path = self.config.dendrogram_path();
        match cluster::render_svg(dendro, threshold, &path) {
            Ok(()) => {
                tracing::info!(path = %path.display(), threshold, "rendered dendrogram");
            }
            Err(e) => {
                tracing::warn!(error = %e, "dendrogram render failed, continuing without it");
            }
        }
    }

    #[cfg(not(feature = "plotting"))]
    fn render(&self, _dendro: &Dendrogram, _threshold: f64) {
        tracing::warn!("built without plotting support, skipping the dendrogram");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pathline_core::types::{Frame, Pathway, PathwayEnsemble, SymbolTable};

    fn pathway(states: &[u32], weight: f64) -> Pathway {
        Pathway::new(
            states
                .iter()
                .enumerate()
                .map(|(i, &state)| Frame {
                    iteration: i as u32 + 1,
                    segment: 0,
                    state,
                    aux: 0.0,
                    weight,
                })
                .collect(),
        )
    }

    fn write_input(dir: &std::path::Path) -> MatchConfig {
        let ensemble = PathwayEnsemble::new(vec![
            pathway(&[0, 1, 0, 1], 0.4),
            pathway(&[0, 1, 0, 1], 0.35),
            pathway(&[2, 3, 2, 3], 0.25),
        ]);
        let input = dir.join("extracted.json");
        save_pathways(&input, &ensemble).unwrap();

        let mut config = MatchConfig::default();
        config.out_dir = dir.to_path_buf();
        config.input_pathways = input;
        config.render_dendrogram = false;
        config
    }

    #[test]
    fn fixed_prompt_drives_a_full_run() {
        let dir = tempfile::tempdir().unwrap();
        let config = write_input(dir.path());
        let engine = MatchEngine::new(config);

        let mut prompt = FixedPrompt { n_clusters: 2 };
        let outcome = engine.run(&mut prompt).unwrap();
        let summary = match outcome {
            MatchOutcome::Completed(summary) => summary,
            MatchOutcome::Aborted => panic!("run should complete"),
        };

        assert_eq!(summary.n_pathways, 3);
        assert_eq!(summary.n_clusters, 2);
        assert_eq!(summary.labels, vec![1, 1, 2]);
        assert_eq!(summary.representatives.len(), 2);
        assert!((summary.representatives[0].weight - 0.4).abs() < 1e-12);
        assert!((summary.representatives[1].weight - 0.25).abs() < 1e-12);
        for artifact in &summary.artifacts {
            assert!(artifact.exists(), "missing artifact {}", artifact.display());
        }

        let report = std::fs::read_to_string(
            engine.config().weight_report_path(),
        )
        .unwrap();
        assert_eq!(report, "0.4\n0.25\n");
    }

    #[test]
    fn aborting_at_the_threshold_prompt_writes_nothing() {
        struct AbortNow;
        impl MatchPrompt for AbortNow {
            fn next_threshold(&mut self) -> ThresholdDecision {
                ThresholdDecision::Abort
            }
            fn cluster_count(&mut self, _n: usize) -> ClusterDecision {
                ClusterDecision::Abort
            }
        }

        let dir = tempfile::tempdir().unwrap();
        let mut config = write_input(dir.path());
        config.render_dendrogram = true;
        let engine = MatchEngine::new(config);
        let outcome = engine.run(&mut AbortNow).unwrap();
        assert!(matches!(outcome, MatchOutcome::Aborted));
        assert!(!engine.config().weight_report_path().exists());
        assert!(!engine.config().cluster_labels_path().exists());
    }

    #[test]
    fn configured_count_skips_the_cluster_prompt() {
        struct NoCount;
        impl MatchPrompt for NoCount {
            fn next_threshold(&mut self) -> ThresholdDecision {
                ThresholdDecision::Continue
            }
            fn cluster_count(&mut self, _n: usize) -> ClusterDecision {
                panic!("cluster prompt must not be consulted")
            }
        }

        let dir = tempfile::tempdir().unwrap();
        let mut config = write_input(dir.path());
        config.n_clusters = Some(2);
        let engine = MatchEngine::new(config);
        let outcome = engine.run(&mut NoCount).unwrap();
        assert!(matches!(outcome, MatchOutcome::Completed(_)));
    }

    #[test]
    fn disabled_dendrogram_skips_the_threshold_prompt() {
        struct NoThreshold;
        impl MatchPrompt for NoThreshold {
            fn next_threshold(&mut self) -> ThresholdDecision {
                panic!("threshold prompt must not be consulted")
            }
            fn cluster_count(&mut self, _n: usize) -> ClusterDecision {
                ClusterDecision::Clusters(2)
            }
        }

        let dir = tempfile::tempdir().unwrap();
        let config = write_input(dir.path());
        let engine = MatchEngine::new(config);
        let outcome = engine.run(&mut NoThreshold).unwrap();
        assert!(matches!(outcome, MatchOutcome::Completed(_)));
    }

    #[test]
    fn out_of_range_cluster_requests_are_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = write_input(dir.path());
        config.n_clusters = Some(2);
        config.clusters = Some(vec![5]);
        let engine = MatchEngine::new(config);

        let mut prompt = FixedPrompt { n_clusters: 2 };
        let err = engine.run(&mut prompt).unwrap_err();
        assert!(matches!(
            err,
            MatchError::InvalidClusterRequest { cluster: 5, max: 2 }
        ));
    }

    #[test]
    fn redraw_loops_until_continue() {
        struct TwoRedraws {
            remaining: usize,
        }
        impl MatchPrompt for TwoRedraws {
            fn next_threshold(&mut self) -> ThresholdDecision {
                if self.remaining == 0 {
                    ThresholdDecision::Continue
                } else {
                    self.remaining -= 1;
                    ThresholdDecision::Redraw(0.1 * self.remaining as f64)
                }
            }
            fn cluster_count(&mut self, _n: usize) -> ClusterDecision {
                ClusterDecision::Clusters(1)
            }
        }

        let dir = tempfile::tempdir().unwrap();
        let mut config = write_input(dir.path());
        config.render_dendrogram = true;
        let engine = MatchEngine::new(config);
        let mut prompt = TwoRedraws { remaining: 2 };
        let outcome = engine.run(&mut prompt).unwrap();
        assert_eq!(prompt.remaining, 0, "both redraws should be consumed");
        let summary = match outcome {
            MatchOutcome::Completed(summary) => summary,
            MatchOutcome::Aborted => panic!("run should complete"),
        };
        assert_eq!(summary.labels, vec![1, 1, 1]);
    }

    #[test]
    fn unknown_strategy_fails_before_touching_outputs() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = write_input(dir.path());
        config.reassign = "imaginary".to_string();
        let engine = MatchEngine::new(config);
        let mut prompt = FixedPrompt { n_clusters: 1 };
        let err = engine.run(&mut prompt).unwrap_err();
        assert!(matches!(err, MatchError::Config(_)));
    }

    #[test]
    fn registered_custom_strategy_drives_the_run() {
        // Marks everything before the first frame whose auxiliary value
        // reaches the cutoff as unknown; states pass through afterwards.
        struct FirstContact {
            cutoff: f64,
        }
        impl crate::reassign::ReassignStrategy for FirstContact {
            fn reassign(
                &self,
                ensemble: &mut PathwayEnsemble,
                _ctx: &crate::reassign::ReassignContext,
            ) -> MatchResult<SymbolTable> {
                let n_states = ensemble.max_live_state().map_or(0, |max| max as usize + 1);
                let table = SymbolTable::numeric(n_states);
                let unknown = table.unknown_id();
                for pathway in ensemble.iter_mut() {
                    let contact = pathway
                        .frames
                        .iter()
                        .position(|f| f.aux >= self.cutoff)
                        .unwrap_or(pathway.frames.len());
                    for frame in &mut pathway.frames[..contact] {
                        frame.state = unknown;
                    }
                }
                Ok(table)
            }
        }

        let aux_pathway = |aux: &[f64], weight: f64| {
            Pathway::new(
                aux.iter()
                    .enumerate()
                    .map(|(i, &aux)| Frame {
                        iteration: i as u32 + 1,
                        segment: 0,
                        state: i as u32 % 3,
                        aux,
                        weight,
                    })
                    .collect(),
            )
        };
        let ensemble = PathwayEnsemble::new(vec![
            aux_pathway(&[0.1, 0.6, 0.9], 0.5),
            aux_pathway(&[0.2, 0.7, 0.8], 0.3),
            aux_pathway(&[0.9, 0.9, 0.9], 0.2),
        ]);

        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("extracted.json");
        save_pathways(&input, &ensemble).unwrap();
        let mut config = MatchConfig::default();
        config.out_dir = dir.path().to_path_buf();
        config.input_pathways = input;
        config.render_dendrogram = false;
        config.reassign = "first-contact".to_string();

        let mut registry = StrategyRegistry::default();
        registry.register("first-contact", Box::new(FirstContact { cutoff: 0.5 }));
        let engine = MatchEngine::with_registry(config, registry);
        let outcome = engine.run(&mut FixedPrompt { n_clusters: 1 }).unwrap();
        assert!(matches!(outcome, MatchOutcome::Completed(_)));

        // states 0..=2 live, so unknown is 3
        let reassigned = load_pathways(&engine.config().output_pathways_path()).unwrap();
        assert_eq!(reassigned.pathways[0].frames[0].state, 3);
        assert_eq!(reassigned.pathways[0].frames[1].state, 1);
        assert_eq!(reassigned.pathways[2].frames[0].state, 0);
    }
}
