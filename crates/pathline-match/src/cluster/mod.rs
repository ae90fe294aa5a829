//! Hierarchical clustering: Ward linkage, flat cuts, dendrogram geometry.

pub mod dendrogram;
mod flatten;
mod linkage;

use pathline_core::types::DistanceMatrix;

pub use dendrogram::{layout, Dendrogram, LinkSegment};
pub use flatten::cut_to_clusters;
pub use linkage::{ward_linkage, Linkage, Merge};

#[cfg(feature = "plotting")]
pub use dendrogram::render_svg;

/// One-call clustering: Ward linkage then a k-cluster cut.
pub fn cluster(matrix: &DistanceMatrix, k: usize) -> Vec<u32> {
    cut_to_clusters(&ward_linkage(matrix), k)
}
