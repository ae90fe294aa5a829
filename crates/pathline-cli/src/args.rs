//! Command-line surface.
//!
//! Flags map one-to-one onto [`CliOverrides`]; anything not passed stays
//! `None` so the file and environment layers keep their say.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

use pathline_core::config::{CliOverrides, ExportMode, MetricKind, WeightConvention};

#[derive(Parser, Debug)]
#[command(name = "pathline", version, about = "Cluster sampled pathways by sequence similarity")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Debug-level logging (RUST_LOG overrides this).
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Reassign, compare, and cluster an extracted pathway ensemble.
    Match(MatchArgs),
}

/// Sequence metric, as typed on the command line.
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum MetricArg {
    /// Longest common subsequence, unknown states stripped.
    Subsequence,
    /// Longest common substring over full padded sequences.
    Substring,
}

impl From<MetricArg> for MetricKind {
    fn from(value: MetricArg) -> Self {
        match value {
            MetricArg::Subsequence => MetricKind::Subsequence,
            MetricArg::Substring => MetricKind::Substring,
        }
    }
}

/// Terminal weight convention, as typed on the command line.
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum WeightArg {
    /// Weight of the last frame whose state is not unknown.
    TerminalLive,
    /// Weight of the literal last frame, padding included.
    TerminalRaw,
}

impl From<WeightArg> for WeightConvention {
    fn from(value: WeightArg) -> Self {
        match value {
            WeightArg::TerminalLive => WeightConvention::TerminalLive,
            WeightArg::TerminalRaw => WeightConvention::TerminalRaw,
        }
    }
}

#[derive(Args, Debug)]
pub struct MatchArgs {
    /// Explicit config file (TOML). Missing file is an error; without
    /// this flag, ./pathline.toml is merged when present.
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Directory all relative artifact names resolve under.
    #[arg(long)]
    pub out_dir: Option<PathBuf>,

    /// Extracted pathway file to load.
    #[arg(short, long)]
    pub input: Option<PathBuf>,

    /// Where the reassigned ensemble is written.
    #[arg(long)]
    pub output_pathways: Option<PathBuf>,

    /// Where cluster labels are written (NPY).
    #[arg(long)]
    pub cluster_labels: Option<PathBuf>,

    /// Distance matrix cache file (NPY).
    #[arg(long)]
    pub matrix_file: Option<PathBuf>,

    /// Reassignment strategy: identity, segment-id, or state-label.
    #[arg(short, long)]
    pub reassign: Option<String>,

    /// Sequence metric.
    #[arg(long, value_enum)]
    pub metric: Option<MetricArg>,

    /// Terminal weight convention.
    #[arg(long, value_enum)]
    pub weight_convention: Option<WeightArg>,

    /// Load the cached matrix instead of recomputing when shapes agree.
    #[arg(long)]
    pub reuse_matrix: bool,

    /// Distance workers: 0 uses every core, omit the flag for serial.
    #[arg(short, long)]
    pub jobs: Option<usize>,

    /// Horizontal threshold line drawn on the dendrogram.
    #[arg(short, long)]
    pub threshold: Option<f64>,

    /// Skip dendrogram rendering and the redraw dialog.
    #[arg(long)]
    pub no_dendrogram: bool,

    /// Log per-cluster weights and counts.
    #[arg(long)]
    pub stats: bool,

    /// Clusters to export, 1-based (e.g. --clusters 1,3).
    #[arg(long, value_delimiter = ',')]
    pub clusters: Option<Vec<u32>>,

    /// Fixed cluster count; makes the whole run non-interactive.
    #[arg(short, long)]
    pub n_clusters: Option<usize>,

    /// Write per-cluster archive copies as well (requires --archive).
    #[arg(long, requires = "archive")]
    pub export_archives: bool,

    /// Ensemble archive backing archive export and state-label lookup.
    #[arg(long)]
    pub archive: Option<PathBuf>,

    /// Archive consulted for state labels when it differs from --archive.
    #[arg(long)]
    pub state_labels: Option<PathBuf>,

    /// Per-cluster archive name pattern; {} is the cluster label.
    #[arg(long)]
    pub file_pattern: Option<String>,
}

impl MatchArgs {
    /// Collapse the parsed flags into the config override layer.
    pub fn overrides(&self) -> CliOverrides {
        CliOverrides {
            out_dir: self.out_dir.clone(),
            input_pathways: self.input.clone(),
            output_pathways: self.output_pathways.clone(),
            cluster_labels: self.cluster_labels.clone(),
            matrix_cache: self.matrix_file.clone(),
            reassign: self.reassign.clone(),
            metric: self.metric.map(Into::into),
            weight_convention: self.weight_convention.map(Into::into),
            reuse_matrix: self.reuse_matrix.then_some(true),
            jobs: self.jobs,
            dendrogram_threshold: self.threshold,
            render_dendrogram: self.no_dendrogram.then_some(false),
            stats: self.stats.then_some(true),
            clusters: self.clusters.clone(),
            n_clusters: self.n_clusters,
            export: self.export_archives.then_some(ExportMode::Archives),
            archive: self.archive.clone(),
            state_labels: self.state_labels.clone(),
            file_pattern: self.file_pattern.clone(),
        }
    }
}
