//! Per-cluster summary statistics.

use std::fmt;

/// Aggregate numbers for one cluster.
#[derive(Debug, Clone, PartialEq)]
pub struct ClusterStat {
    /// 1-based cluster label.
    pub cluster: u32,
    /// Pathways assigned to this cluster.
    pub member_count: usize,
    /// Sum of member weights.
    pub total_weight: f64,
}

/// Statistics over one full clustering.
#[derive(Debug, Clone, PartialEq)]
pub struct MatchStatistics {
    /// One entry per cluster, ordered by label.
    pub clusters: Vec<ClusterStat>,
    /// Sum of all pathway weights, unclustered included.
    pub total_weight: f64,
}

impl MatchStatistics {
    /// Aggregate counts and weights from parallel label/weight slices.
    pub fn from_labels(labels: &[u32], weights: &[f64], n_clusters: usize) -> Self {
        let mut clusters: Vec<ClusterStat> = (1..=n_clusters as u32)
            .map(|cluster| ClusterStat {
                cluster,
                member_count: 0,
                total_weight: 0.0,
            })
            .collect();
        let mut total_weight = 0.0;
        for (&label, &weight) in labels.iter().zip(weights) {
            total_weight += weight;
            if label >= 1 && (label as usize) <= n_clusters {
                let stat = &mut clusters[label as usize - 1];
                stat.member_count += 1;
                stat.total_weight += weight;
            }
        }
        Self {
            clusters,
            total_weight,
        }
    }

    /// Fraction of the ensemble weight held by `cluster` (1-based).
    pub fn weight_fraction(&self, cluster: u32) -> f64 {
        if self.total_weight <= 0.0 {
            return 0.0;
        }
        self.clusters
            .iter()
            .find(|s| s.cluster == cluster)
            .map_or(0.0, |s| s.total_weight / self.total_weight)
    }
}

impl fmt::Display for MatchStatistics {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "=== pattern matching statistics ===")?;
        writeln!(f, "total clusters: {}", self.clusters.len())?;
        for stat in &self.clusters {
            writeln!(
                f,
                "weight/count of cluster {}: {} / {}",
                stat.cluster, stat.total_weight, stat.member_count
            )?;
        }
        Ok(())
    }
}
