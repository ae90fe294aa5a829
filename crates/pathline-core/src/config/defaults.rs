// Single source of truth for all default values.

// --- Artifact locations (relative names resolve under out_dir) ---
pub const DEFAULT_OUT_DIR: &str = "pathways";
pub const DEFAULT_INPUT_PATHWAYS: &str = "extracted.json";
pub const DEFAULT_OUTPUT_PATHWAYS: &str = "reassigned.json";
pub const DEFAULT_CLUSTER_LABELS: &str = "cluster_labels.npy";
pub const DEFAULT_MATRIX_CACHE: &str = "distance_matrix.npy";
pub const DEFAULT_DENDROGRAM_FILE: &str = "dendrogram.svg";
pub const DEFAULT_WEIGHT_REPORT: &str = "representative_weights.txt";
pub const DEFAULT_ARCHIVE_PATTERN: &str = "ensemble_c{}.db";

// --- Matching ---
pub const DEFAULT_REASSIGN_STRATEGY: &str = "identity";
pub const DEFAULT_DENDROGRAM_THRESHOLD: f64 = 0.5;
/// Below this many symbols (unknown included) matching degenerates.
pub const MIN_DISCRIMINATING_SYMBOLS: usize = 3;

// --- Dendrogram traversal ---
pub const DENDROGRAM_DEPTH_LIMIT: usize = 1_000;
pub const DENDROGRAM_DEPTH_RETRY_LIMIT: usize = 100_000;

// --- Config resolution ---
pub const CONFIG_FILE_NAME: &str = "pathline.toml";
