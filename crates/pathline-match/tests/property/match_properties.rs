//! Property tests for distance metrics, clustering, and padding.

use proptest::prelude::*;

use pathline_core::config::MetricKind;
use pathline_core::types::{DistanceMatrix, Frame, Pathway, PathwayEnsemble, StateId, SymbolTable};
use pathline_match::cluster::{cut_to_clusters, ward_linkage};
use pathline_match::distance::{compute_distance_matrix, pairwise_distance, DistanceOptions};
use pathline_match::padding::pad_to_uniform;

fn sequences() -> impl Strategy<Value = Vec<StateId>> {
    prop::collection::vec(0u32..4, 0..24)
}

fn ensembles() -> impl Strategy<Value = PathwayEnsemble> {
    prop::collection::vec(prop::collection::vec(0u32..4, 1..12), 1..8).prop_map(|paths| {
        PathwayEnsemble::new(
            paths
                .into_iter()
                .map(|states| {
                    Pathway::new(
                        states
                            .into_iter()
                            .enumerate()
                            .map(|(i, state)| Frame {
                                iteration: i as u32 + 1,
                                segment: 0,
                                state,
                                aux: 0.0,
                                weight: 0.125,
                            })
                            .collect(),
                    )
                })
                .collect(),
        )
    })
}

fn distance_matrices() -> impl Strategy<Value = DistanceMatrix> {
    (2usize..8).prop_flat_map(|n| {
        prop::collection::vec(0.0f64..=1.0, n * (n - 1) / 2).prop_map(move |tri| {
            let mut m = DistanceMatrix::zeros(n);
            let mut values = tri.into_iter();
            for i in 0..n {
                for j in (i + 1)..n {
                    if let Some(v) = values.next() {
                        m.set_symmetric(i, j, v);
                    }
                }
            }
            m
        })
    })
}

// Property test — pairwise distances are symmetric and stay in [0, 1].
proptest! {
    #[test]
    fn prop_distance_bounded_and_symmetric(a in sequences(), b in sequences()) {
        for metric in [MetricKind::Subsequence, MetricKind::Substring] {
            let d = pairwise_distance(&a, &b, metric);
            let r = pairwise_distance(&b, &a, metric);
            prop_assert!((0.0..=1.0).contains(&d));
            prop_assert!((d - r).abs() < 1e-12);
        }
    }
}

// Property test — a sequence is at distance zero from itself.
proptest! {
    #[test]
    fn prop_identity_distance_is_zero(a in prop::collection::vec(0u32..4, 1..24)) {
        prop_assert!(pairwise_distance(&a, &a, MetricKind::Subsequence).abs() < 1e-12);
        prop_assert!(pairwise_distance(&a, &a, MetricKind::Substring).abs() < 1e-12);
    }
}

// Property test — a common substring is also a common subsequence, so the
// substring distance can never undercut the subsequence distance.
proptest! {
    #[test]
    fn prop_substring_never_closer_than_subsequence(a in sequences(), b in sequences()) {
        let d_subseq = pairwise_distance(&a, &b, MetricKind::Subsequence);
        let d_substr = pairwise_distance(&a, &b, MetricKind::Substring);
        prop_assert!(d_substr >= d_subseq - 1e-12);
    }
}

// Property test — the matrix engine produces a symmetric zero-diagonal
// matrix and is deterministic across runs.
proptest! {
    #[test]
    fn prop_matrix_is_symmetric_and_deterministic(ensemble in ensembles()) {
        let table = SymbolTable::numeric(4);
        let mut padded = ensemble.clone();
        pad_to_uniform(&mut padded, &table);

        let first =
            compute_distance_matrix(&padded, &table, &DistanceOptions::default()).unwrap();
        let second =
            compute_distance_matrix(&padded, &table, &DistanceOptions::default()).unwrap();
        prop_assert_eq!(&first.matrix, &second.matrix);

        let n = padded.len();
        for i in 0..n {
            prop_assert!(first.matrix.get(i, i).abs() < 1e-12);
            for j in 0..n {
                let v = first.matrix.get(i, j);
                prop_assert!((0.0..=1.0).contains(&v));
                prop_assert!((v - first.matrix.get(j, i)).abs() < 1e-12);
            }
        }

        // condensed form walks the upper triangle in row order
        let condensed = first.matrix.condensed();
        prop_assert_eq!(condensed.len(), n * n.saturating_sub(1) / 2);
        let mut k = 0;
        for i in 0..n {
            for j in (i + 1)..n {
                prop_assert!((condensed[k] - first.matrix.get(i, j)).abs() < 1e-12);
                k += 1;
            }
        }
    }
}

// Property test — serial and parallel pair scheduling agree exactly.
proptest! {
    #[test]
    fn prop_parallel_matches_serial(ensemble in ensembles()) {
        let table = SymbolTable::numeric(4);
        let mut padded = ensemble;
        pad_to_uniform(&mut padded, &table);

        let serial =
            compute_distance_matrix(&padded, &table, &DistanceOptions::default()).unwrap();
        let parallel = compute_distance_matrix(
            &padded,
            &table,
            &DistanceOptions { jobs: Some(2), ..DistanceOptions::default() },
        )
        .unwrap();
        prop_assert_eq!(serial.matrix, parallel.matrix);
    }
}

// Property test — padding is idempotent and leaves a rectangular ensemble.
proptest! {
    #[test]
    fn prop_padding_rectangular_and_idempotent(ensemble in ensembles()) {
        let table = SymbolTable::numeric(4);
        let mut padded = ensemble;
        let target = padded.max_len();
        pad_to_uniform(&mut padded, &table);

        for pathway in padded.iter() {
            prop_assert_eq!(pathway.len(), target);
        }
        let once = padded.clone();
        pad_to_uniform(&mut padded, &table);
        prop_assert_eq!(padded, once);
    }
}

// Property test — every cut yields labels 1..=K numbered by first
// appearance, with exactly min(k, n) distinct values for Ward trees.
proptest! {
    #[test]
    fn prop_cut_labels_are_contiguous(matrix in distance_matrices(), k in 1usize..10) {
        let n = matrix.size();
        let linkage = ward_linkage(&matrix);
        let labels = cut_to_clusters(&linkage, k);
        prop_assert_eq!(labels.len(), n);

        let max = labels.iter().copied().max().unwrap_or(0);
        prop_assert_eq!(max as usize, k.min(n));
        prop_assert_eq!(labels[0], 1);

        // first appearances count upward one at a time
        let mut highest_seen = 0u32;
        for &label in &labels {
            prop_assert!(label >= 1 && label <= max);
            if label > highest_seen {
                prop_assert_eq!(label, highest_seen + 1);
                highest_seen = label;
            }
        }
    }
}

// Property test — Ward merge heights never decrease.
proptest! {
    #[test]
    fn prop_ward_heights_monotonic(matrix in distance_matrices()) {
        let linkage = ward_linkage(&matrix);
        for pair in linkage.merges.windows(2) {
            prop_assert!(pair[1].height >= pair[0].height - 1e-9);
        }
    }
}
