//! Longest-common-subsequence and -substring lengths over state sequences.
//!
//! Both run the classic O(len1 * len2) dynamic program with two rolling
//! rows. Sequences are compared by state id; ids map one-to-one onto the
//! symbol alphabet, so this matches a character-level comparison exactly.

use pathline_core::config::MetricKind;
use pathline_core::types::StateId;

/// Length of the longest common subsequence (order preserved, gaps allowed).
pub fn lcs_subsequence_len(a: &[StateId], b: &[StateId]) -> usize {
    if a.is_empty() || b.is_empty() {
        return 0;
    }
    let mut prev = vec![0usize; b.len() + 1];
    let mut curr = vec![0usize; b.len() + 1];
    for &x in a {
        for (j, &y) in b.iter().enumerate() {
            curr[j + 1] = if x == y {
                prev[j] + 1
            } else {
                curr[j].max(prev[j + 1])
            };
        }
        std::mem::swap(&mut prev, &mut curr);
    }
    prev[b.len()]
}

/// Length of the longest common substring (contiguous in both).
pub fn lcs_substring_len(a: &[StateId], b: &[StateId]) -> usize {
    if a.is_empty() || b.is_empty() {
        return 0;
    }
    let mut prev = vec![0usize; b.len() + 1];
    let mut curr = vec![0usize; b.len() + 1];
    let mut best = 0;
    for &x in a {
        for (j, &y) in b.iter().enumerate() {
            curr[j + 1] = if x == y { prev[j] + 1 } else { 0 };
            best = best.max(curr[j + 1]);
        }
        std::mem::swap(&mut prev, &mut curr);
    }
    best
}

/// Distance between two sequences: `1 - 2k / (len1 + len2)` where `k` is
/// the metric's common length. Two empty sequences share nothing
/// measurable and sit at distance 1.0; the result is never NaN.
pub fn pairwise_distance(a: &[StateId], b: &[StateId], metric: MetricKind) -> f64 {
    let total = a.len() + b.len();
    if total == 0 {
        return 1.0;
    }
    let k = match metric {
        MetricKind::Subsequence => lcs_subsequence_len(a, b),
        MetricKind::Substring => lcs_substring_len(a, b),
    };
    1.0 - 2.0 * k as f64 / total as f64
}
