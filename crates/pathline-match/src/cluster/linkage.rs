//! Agglomerative Ward linkage over a precomputed distance matrix.
//!
//! Works on squared distances internally: the Lance-Williams recurrence
//! for Ward's objective,
//! d(k, i∪j)² = ((nᵢ+nₖ)·d(k,i)² + (nⱼ+nₖ)·d(k,j)² − nₖ·d(i,j)²) / (nᵢ+nⱼ+nₖ),
//! updates the merged cluster's row in place. Merge heights are the
//! square roots of the objective and are monotonic for Ward.

use pathline_core::types::DistanceMatrix;

/// One agglomeration step. Node ids follow the convention that leaves
/// are `0..n` and the merge produced at step `s` is node `n + s`.
#[derive(Debug, Clone, PartialEq)]
pub struct Merge {
    /// Smaller node id of the merged pair.
    pub left: usize,
    /// Larger node id of the merged pair.
    pub right: usize,
    /// Cophenetic distance at which the pair merged.
    pub height: f64,
    /// Leaves under the new node.
    pub size: usize,
}

/// Full merge history of one clustering run: `n_leaves - 1` merges for a
/// non-empty input.
#[derive(Debug, Clone, PartialEq)]
pub struct Linkage {
    pub n_leaves: usize,
    pub merges: Vec<Merge>,
}

impl Linkage {
    /// Node id of the final merge, `None` until at least one happened.
    pub fn root(&self) -> Option<usize> {
        if self.merges.is_empty() {
            None
        } else {
            Some(self.n_leaves + self.merges.len() - 1)
        }
    }

    /// Merge height of `node`, zero for leaves.
    pub fn node_height(&self, node: usize) -> f64 {
        if node < self.n_leaves {
            0.0
        } else {
            self.merges[node - self.n_leaves].height
        }
    }
}

/// Run Ward agglomeration to completion. Ties break toward the lowest
/// index pair, so equal inputs always produce equal trees.
pub fn ward_linkage(matrix: &DistanceMatrix) -> Linkage {
    let n = matrix.size();
    let mut d2: Vec<f64> = matrix.values().iter().map(|v| v * v).collect();
    let mut active = vec![true; n];
    let mut sizes = vec![1usize; n];
    let mut node_ids: Vec<usize> = (0..n).collect();
    let mut merges = Vec::with_capacity(n.saturating_sub(1));

    for step in 0..n.saturating_sub(1) {
        let mut best = (0, 0);
        let mut best_d2 = f64::INFINITY;
        for i in 0..n {
            if !active[i] {
                continue;
            }
            for j in (i + 1)..n {
                if !active[j] {
                    continue;
                }
                let v = d2[i * n + j];
                if v < best_d2 {
                    best_d2 = v;
                    best = (i, j);
                }
            }
        }
        let (i, j) = best;
        let (ni, nj) = (sizes[i] as f64, sizes[j] as f64);
        let height = best_d2.max(0.0).sqrt();
        let (left, right) = {
            let (a, b) = (node_ids[i], node_ids[j]);
            (a.min(b), a.max(b))
        };
        let merged_size = sizes[i] + sizes[j];
        merges.push(Merge {
            left,
            right,
            height,
            size: merged_size,
        });

        for k in 0..n {
            if !active[k] || k == i || k == j {
                continue;
            }
            let nk = sizes[k] as f64;
            let dik = d2[i * n + k];
            let djk = d2[j * n + k];
            let updated =
                ((ni + nk) * dik + (nj + nk) * djk - nk * best_d2) / (ni + nj + nk);
            d2[i * n + k] = updated;
            d2[k * n + i] = updated;
        }
        active[j] = false;
        sizes[i] = merged_size;
        node_ids[i] = n + step;
    }

    Linkage {
        n_leaves: n,
        merges,
    }
}
