//! Ensemble archive integration tests: schema, labels, copy + weight zeroing.

use std::path::Path;

use rustc_hash::FxHashSet;

use pathline_core::errors::StorageError;
use pathline_storage::EnsembleArchive;

/// Three iterations with two segments each, weights 0.25 and 0.5.
fn seeded_archive(path: &Path) -> EnsembleArchive {
    let archive = EnsembleArchive::open(path).unwrap();
    for iter in 1..=3u32 {
        archive.insert_iteration(iter, 2).unwrap();
        for seg in 0..2i64 {
            let parent = if iter == 1 { None } else { Some(seg) };
            archive
                .insert_segment(iter, seg, 0.25 * (seg as f64 + 1.0), parent)
                .unwrap();
        }
    }
    archive
}

#[test]
fn opening_twice_is_idempotent() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("ensemble.db");
    seeded_archive(&path);
    let archive = EnsembleArchive::open(&path).unwrap();
    assert_eq!(archive.last_iteration().unwrap(), 3);
}

#[test]
fn open_existing_requires_the_file() {
    let dir = tempfile::tempdir().unwrap();
    let err = EnsembleArchive::open_existing(&dir.path().join("missing.db")).unwrap_err();
    assert!(matches!(err, StorageError::Io { .. }));
}

#[test]
fn state_labels_round_trip() {
    let archive = EnsembleArchive::open_in_memory().unwrap();
    let labels = vec!["bound".to_string(), "unbound".to_string(), "misfolded".to_string()];
    archive.write_state_labels(&labels).unwrap();
    assert_eq!(archive.read_state_labels().unwrap(), labels);
}

#[test]
fn empty_state_labels_are_unusable() {
    let archive = EnsembleArchive::open_in_memory().unwrap();
    let err = archive.read_state_labels().unwrap_err();
    assert!(matches!(err, StorageError::MissingStateLabels { .. }));
}

#[test]
fn gapped_state_labels_are_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("ensemble.db");
    {
        let archive = EnsembleArchive::open(&path).unwrap();
        archive
            .write_state_labels(&["a".to_string(), "b".to_string(), "c".to_string()])
            .unwrap();
    }
    let conn = rusqlite::Connection::open(&path).unwrap();
    conn.execute("DELETE FROM state_labels WHERE state = 1", [])
        .unwrap();
    drop(conn);

    let archive = EnsembleArchive::open(&path).unwrap();
    let err = archive.read_state_labels().unwrap_err();
    match err {
        StorageError::Sqlite { message } => assert!(message.contains("not contiguous")),
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn copy_then_zero_keeps_only_member_weights() {
    let dir = tempfile::tempdir().unwrap();
    let source_path = dir.path().join("ensemble.db");
    let copy_path = dir.path().join("ensemble_c1.db");
    let source = seeded_archive(&source_path);

    source.copy_to(&copy_path).unwrap();
    let copy = EnsembleArchive::open(&copy_path).unwrap();

    let mut members = FxHashSet::default();
    members.insert((3u32, 0i64));
    members.insert((2u32, 1i64));
    let zeroed = copy.zero_weights_except(&members).unwrap();
    assert_eq!(zeroed, 4);

    assert_eq!(copy.segment_weight(3, 0).unwrap(), Some(0.25));
    assert_eq!(copy.segment_weight(2, 1).unwrap(), Some(0.5));
    assert_eq!(copy.segment_weight(3, 1).unwrap(), Some(0.0));
    assert_eq!(copy.segment_weight(2, 0).unwrap(), Some(0.0));
    assert_eq!(copy.segment_weight(1, 0).unwrap(), Some(0.0));
    assert_eq!(copy.segment_weight(1, 1).unwrap(), Some(0.0));

    // the source archive is untouched
    assert_eq!(source.segment_weight(1, 0).unwrap(), Some(0.25));
    assert!((source.iteration_total_weight(1).unwrap() - 0.75).abs() < 1e-12);
}

#[test]
fn unknown_segment_weight_is_none() {
    let archive = EnsembleArchive::open_in_memory().unwrap();
    assert_eq!(archive.segment_weight(9, 9).unwrap(), None);
    assert_eq!(archive.last_iteration().unwrap(), 0);
}
