//! Match run configuration with layered resolution.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use super::defaults;
use crate::errors::ConfigError;

/// Which sequence metric drives the pairwise distance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum MetricKind {
    /// Longest common subsequence over unknown-stripped sequences.
    #[default]
    Subsequence,
    /// Longest common substring over full padded sequences.
    Substring,
}

impl MetricKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Subsequence => "subsequence",
            Self::Substring => "substring",
        }
    }
}

/// How the per-pathway terminal weight is chosen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum WeightConvention {
    /// Weight of the last frame whose state is not unknown.
    #[default]
    TerminalLive,
    /// Weight of the literal last frame, padding included.
    TerminalRaw,
}

impl WeightConvention {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::TerminalLive => "terminal-live",
            Self::TerminalRaw => "terminal-raw",
        }
    }
}

/// What gets written after clustering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ExportMode {
    /// Representative-weights text report only.
    #[default]
    Report,
    /// Report plus one weight-filtered copy of the ensemble archive
    /// per requested cluster.
    Archives,
}

impl ExportMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Report => "report",
            Self::Archives => "archives",
        }
    }
}

/// Configuration for one match run.
///
/// Resolution order (highest priority first):
/// 1. CLI flags (applied via [`CliOverrides`])
/// 2. Environment variables (`PATHLINE_*`)
/// 3. Project config (`pathline.toml`)
/// 4. Compiled defaults
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MatchConfig {
    /// Directory all relative artifact names resolve under.
    pub out_dir: PathBuf,
    /// Extracted pathway file to load.
    pub input_pathways: PathBuf,
    /// Where the reassigned ensemble is written.
    pub output_pathways: PathBuf,
    /// Where cluster labels are written (NPY).
    pub cluster_labels: PathBuf,
    /// Distance matrix cache file (NPY).
    pub matrix_cache: PathBuf,
    /// Reassignment strategy name.
    pub reassign: String,
    /// Sequence metric.
    pub metric: MetricKind,
    /// Terminal weight convention.
    pub weight_convention: WeightConvention,
    /// Load the cached matrix instead of recomputing when shapes agree.
    pub reuse_matrix: bool,
    /// Distance workers: `None` = serial, `Some(0)` = all cores,
    /// `Some(n)` = a pool of n threads.
    pub jobs: Option<usize>,
    /// Horizontal threshold line drawn on the dendrogram.
    pub dendrogram_threshold: f64,
    /// Render the dendrogram SVG at all.
    pub render_dendrogram: bool,
    /// Dendrogram output file (SVG).
    pub dendrogram_file: PathBuf,
    /// Log per-cluster statistics.
    pub stats: bool,
    /// Clusters to export, 1-based. `None` exports all of them.
    pub clusters: Option<Vec<u32>>,
    /// Fixed cluster count for non-interactive runs.
    pub n_clusters: Option<usize>,
    /// Export mode.
    pub export: ExportMode,
    /// Ensemble archive backing archive export and state-label lookup.
    pub archive: Option<PathBuf>,
    /// Archive consulted for state labels when it differs from `archive`.
    pub state_labels: Option<PathBuf>,
    /// Per-cluster archive name pattern; `{}` is the cluster label.
    pub file_pattern: String,
    /// Representative-weights report file.
    pub weight_report: PathBuf,
}

impl Default for MatchConfig {
    fn default() -> Self {
        Self {
            out_dir: PathBuf::from(defaults::DEFAULT_OUT_DIR),
            input_pathways: PathBuf::from(defaults::DEFAULT_INPUT_PATHWAYS),
            output_pathways: PathBuf::from(defaults::DEFAULT_OUTPUT_PATHWAYS),
            cluster_labels: PathBuf::from(defaults::DEFAULT_CLUSTER_LABELS),
            matrix_cache: PathBuf::from(defaults::DEFAULT_MATRIX_CACHE),
            reassign: defaults::DEFAULT_REASSIGN_STRATEGY.to_string(),
            metric: MetricKind::default(),
            weight_convention: WeightConvention::default(),
            reuse_matrix: false,
            jobs: None,
            dendrogram_threshold: defaults::DEFAULT_DENDROGRAM_THRESHOLD,
            render_dendrogram: true,
            dendrogram_file: PathBuf::from(defaults::DEFAULT_DENDROGRAM_FILE),
            stats: false,
            clusters: None,
            n_clusters: None,
            export: ExportMode::default(),
            archive: None,
            state_labels: None,
            file_pattern: defaults::DEFAULT_ARCHIVE_PATTERN.to_string(),
            weight_report: PathBuf::from(defaults::DEFAULT_WEIGHT_REPORT),
        }
    }
}

/// CLI override arguments that can be applied to a config.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CliOverrides {
    pub out_dir: Option<PathBuf>,
    pub input_pathways: Option<PathBuf>,
    pub output_pathways: Option<PathBuf>,
    pub cluster_labels: Option<PathBuf>,
    pub matrix_cache: Option<PathBuf>,
    pub reassign: Option<String>,
    pub metric: Option<MetricKind>,
    pub weight_convention: Option<WeightConvention>,
    pub reuse_matrix: Option<bool>,
    pub jobs: Option<usize>,
    pub dendrogram_threshold: Option<f64>,
    pub render_dendrogram: Option<bool>,
    pub stats: Option<bool>,
    pub clusters: Option<Vec<u32>>,
    pub n_clusters: Option<usize>,
    pub export: Option<ExportMode>,
    pub archive: Option<PathBuf>,
    pub state_labels: Option<PathBuf>,
    pub file_pattern: Option<String>,
}

/// TOML shadow of [`MatchConfig`]: every field optional, so a file only
/// overrides what it names. Unknown keys are silently ignored.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
struct MatchConfigFile {
    out_dir: Option<PathBuf>,
    input_pathways: Option<PathBuf>,
    output_pathways: Option<PathBuf>,
    cluster_labels: Option<PathBuf>,
    matrix_cache: Option<PathBuf>,
    reassign: Option<String>,
    metric: Option<MetricKind>,
    weight_convention: Option<WeightConvention>,
    reuse_matrix: Option<bool>,
    jobs: Option<usize>,
    dendrogram_threshold: Option<f64>,
    render_dendrogram: Option<bool>,
    dendrogram_file: Option<PathBuf>,
    stats: Option<bool>,
    clusters: Option<Vec<u32>>,
    n_clusters: Option<usize>,
    export: Option<ExportMode>,
    archive: Option<PathBuf>,
    state_labels: Option<PathBuf>,
    file_pattern: Option<String>,
    weight_report: Option<PathBuf>,
}

macro_rules! apply_some {
    ($src:expr, $dst:expr, $($field:ident),+ $(,)?) => {
        $(if let Some(v) = $src.$field.clone() {
            $dst.$field = v;
        })+
    };
}

impl MatchConfig {
    /// Load configuration with layered resolution.
    ///
    /// `config_path` pins an explicit TOML file (missing is fatal);
    /// otherwise `pathline.toml` in the working directory is merged
    /// when present.
    pub fn load(
        config_path: Option<&Path>,
        cli_overrides: Option<&CliOverrides>,
    ) -> Result<Self, ConfigError> {
        let mut config = Self::default();

        match config_path {
            Some(path) => {
                if !path.exists() {
                    return Err(ConfigError::FileNotFound {
                        path: path.display().to_string(),
                    });
                }
                Self::merge_toml_file(&mut config, path)?;
            }
            None => {
                let implicit = Path::new(defaults::CONFIG_FILE_NAME);
                if implicit.exists() {
                    Self::merge_toml_file(&mut config, implicit)?;
                }
            }
        }

        Self::apply_env_overrides(&mut config);

        if let Some(cli) = cli_overrides {
            Self::apply_cli_overrides(&mut config, cli);
        }

        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a TOML string (for testing).
    pub fn from_toml(toml_str: &str) -> Result<Self, ConfigError> {
        let file: MatchConfigFile =
            toml::from_str(toml_str).map_err(|e| ConfigError::ParseError {
                path: "<string>".to_string(),
                message: e.to_string(),
            })?;
        let mut config = Self::default();
        Self::apply_file(&mut config, &file);
        Ok(config)
    }

    fn merge_toml_file(config: &mut MatchConfig, path: &Path) -> Result<(), ConfigError> {
        let content =
            std::fs::read_to_string(path).map_err(|_| ConfigError::FileNotFound {
                path: path.display().to_string(),
            })?;
        let file: MatchConfigFile =
            toml::from_str(&content).map_err(|e| ConfigError::ParseError {
                path: path.display().to_string(),
                message: e.to_string(),
            })?;
        Self::apply_file(config, &file);
        Ok(())
    }

    fn apply_file(config: &mut MatchConfig, file: &MatchConfigFile) {
        apply_some!(
            file, config,
            out_dir, input_pathways, output_pathways, cluster_labels, matrix_cache,
            reassign, metric, weight_convention, reuse_matrix, dendrogram_threshold,
            render_dendrogram, dendrogram_file, stats, export, file_pattern,
            weight_report,
        );
        if file.jobs.is_some() {
            config.jobs = file.jobs;
        }
        if file.clusters.is_some() {
            config.clusters = file.clusters.clone();
        }
        if file.n_clusters.is_some() {
            config.n_clusters = file.n_clusters;
        }
        if file.archive.is_some() {
            config.archive = file.archive.clone();
        }
        if file.state_labels.is_some() {
            config.state_labels = file.state_labels.clone();
        }
    }

    fn apply_env_overrides(config: &mut MatchConfig) {
        if let Ok(val) = std::env::var("PATHLINE_OUT_DIR") {
            if !val.is_empty() {
                config.out_dir = PathBuf::from(val);
            }
        }
        if let Ok(val) = std::env::var("PATHLINE_JOBS") {
            if let Ok(v) = val.parse::<usize>() {
                config.jobs = Some(v);
            }
        }
        if let Ok(val) = std::env::var("PATHLINE_DENDROGRAM_THRESHOLD") {
            if let Ok(v) = val.parse::<f64>() {
                config.dendrogram_threshold = v;
            }
        }
    }

    fn apply_cli_overrides(config: &mut MatchConfig, cli: &CliOverrides) {
        apply_some!(
            cli, config,
            out_dir, input_pathways, output_pathways, cluster_labels, matrix_cache,
            reassign, metric, weight_convention, reuse_matrix, dendrogram_threshold,
            render_dendrogram, stats, export, file_pattern,
        );
        if cli.jobs.is_some() {
            config.jobs = cli.jobs;
        }
        if cli.clusters.is_some() {
            config.clusters = cli.clusters.clone();
        }
        if cli.n_clusters.is_some() {
            config.n_clusters = cli.n_clusters;
        }
        if cli.archive.is_some() {
            config.archive = cli.archive.clone();
        }
        if cli.state_labels.is_some() {
            config.state_labels = cli.state_labels.clone();
        }
    }

    /// Validate the resolved configuration values.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.dendrogram_threshold.is_finite() || self.dendrogram_threshold < 0.0 {
            return Err(ConfigError::ValidationFailed {
                field: "dendrogram_threshold".to_string(),
                message: "must be a non-negative number".to_string(),
            });
        }
        if !self.file_pattern.contains("{}") {
            return Err(ConfigError::ValidationFailed {
                field: "file_pattern".to_string(),
                message: format!(
                    "'{}' has no '{{}}' placeholder for the cluster label",
                    self.file_pattern
                ),
            });
        }
        if self.export == ExportMode::Archives && self.archive.is_none() {
            return Err(ConfigError::ValidationFailed {
                field: "archive".to_string(),
                message: "archive export requires an ensemble archive path".to_string(),
            });
        }
        if let Some(n) = self.n_clusters {
            if n == 0 {
                return Err(ConfigError::ValidationFailed {
                    field: "n_clusters".to_string(),
                    message: "must be at least 1".to_string(),
                });
            }
        }
        if let Some(ref clusters) = self.clusters {
            if clusters.is_empty() {
                return Err(ConfigError::ValidationFailed {
                    field: "clusters".to_string(),
                    message: "must name at least one cluster".to_string(),
                });
            }
            if clusters.contains(&0) {
                return Err(ConfigError::ValidationFailed {
                    field: "clusters".to_string(),
                    message: "cluster labels are 1-based; 0 is not a cluster".to_string(),
                });
            }
        }
        Ok(())
    }

    /// Resolve an artifact name under `out_dir` unless it is absolute.
    pub fn resolve(&self, name: &Path) -> PathBuf {
        if name.is_absolute() {
            name.to_path_buf()
        } else {
            self.out_dir.join(name)
        }
    }

    pub fn input_pathways_path(&self) -> PathBuf {
        self.resolve(&self.input_pathways)
    }

    pub fn output_pathways_path(&self) -> PathBuf {
        self.resolve(&self.output_pathways)
    }

    pub fn cluster_labels_path(&self) -> PathBuf {
        self.resolve(&self.cluster_labels)
    }

    pub fn matrix_cache_path(&self) -> PathBuf {
        self.resolve(&self.matrix_cache)
    }

    pub fn dendrogram_path(&self) -> PathBuf {
        self.resolve(&self.dendrogram_file)
    }

    pub fn weight_report_path(&self) -> PathBuf {
        self.resolve(&self.weight_report)
    }

    /// Per-cluster archive path from the `{}` pattern.
    pub fn cluster_archive_path(&self, cluster: u32) -> PathBuf {
        self.resolve(Path::new(&self.file_pattern.replacen("{}", &cluster.to_string(), 1)))
    }
}
