//! Representative pathway selection per cluster.

/// A cluster's membership and its highest-weight member.
#[derive(Debug, Clone, PartialEq)]
pub struct ClusterRepresentative {
    /// 1-based cluster label.
    pub cluster: u32,
    /// Ensemble indexes of every member, ascending.
    pub members: Vec<usize>,
    /// Ensemble index of the highest-weight member (first index on ties).
    pub representative: usize,
    /// That member's weight.
    pub weight: f64,
}

/// Pick the representative of `cluster` from parallel label and weight
/// slices. `None` when the cluster has no members.
pub fn select_representative(
    labels: &[u32],
    weights: &[f64],
    cluster: u32,
) -> Option<ClusterRepresentative> {
    let members: Vec<usize> = labels
        .iter()
        .enumerate()
        .filter(|&(_, &label)| label == cluster)
        .map(|(i, _)| i)
        .collect();

    let mut best: Option<(usize, f64)> = None;
    for &i in &members {
        let w = weights[i];
        let replace = match best {
            None => true,
            // strict comparison keeps the first index on ties
            Some((_, best_w)) => w > best_w,
        };
        if replace {
            best = Some((i, w));
        }
    }
    best.map(|(representative, weight)| ClusterRepresentative {
        cluster,
        members,
        representative,
        weight,
    })
}
