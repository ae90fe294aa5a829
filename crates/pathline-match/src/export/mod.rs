//! Export surfaces: the weight report and per-cluster archive copies.

mod archives;
mod report;

pub use archives::export_cluster_archives;
pub use report::write_weight_report;
