//! Flat cluster extraction from a linkage.

use rustc_hash::FxHashMap;

use super::linkage::Linkage;

/// Cut the tree into exactly `k` clusters, `k` clamped to `1..=n`.
/// Replaying the first `n - k` merges realizes the maxclust criterion:
/// the smallest cophenetic threshold yielding at most `k` clusters.
/// Labels run 1..=K in order of first appearance over leaf indexes.
pub fn cut_to_clusters(linkage: &Linkage, k: usize) -> Vec<u32> {
    let n = linkage.n_leaves;
    if n == 0 {
        return Vec::new();
    }
    let k = k.clamp(1, n);

    let mut parent: Vec<usize> = (0..n + linkage.merges.len()).collect();
    for (step, merge) in linkage.merges.iter().take(n - k).enumerate() {
        let node = n + step;
        let left_root = find(&mut parent, merge.left);
        let right_root = find(&mut parent, merge.right);
        parent[left_root] = node;
        parent[right_root] = node;
    }

    let mut labels = vec![0u32; n];
    let mut by_root: FxHashMap<usize, u32> = FxHashMap::default();
    let mut next = 0u32;
    for (leaf, label) in labels.iter_mut().enumerate() {
        let root = find(&mut parent, leaf);
        *label = *by_root.entry(root).or_insert_with(|| {
            next += 1;
            next
        });
    }
    labels
}

fn find(parent: &mut [usize], mut x: usize) -> usize {
    while parent[x] != x {
        parent[x] = parent[parent[x]];
        x = parent[x];
    }
    x
}
