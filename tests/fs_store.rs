use std::fs;
use std::io::Write;

use subsetter::{
    Dataset, DatasetStore, FieldValue, FsDatasetStore, InMemoryDataset, Record, SubsetError,
};

fn token_record(idx: usize) -> Record {
    let idx = idx as i64;
    Record::from([
        (
            "src_ids".to_string(),
            FieldValue::List(vec![FieldValue::Int(idx), FieldValue::Int(7)]),
        ),
        ("src_lang".to_string(), FieldValue::Str("de".to_string())),
        ("score".to_string(), FieldValue::Float(0.25)),
        (
            "alignments".to_string(),
            FieldValue::List(vec![
                FieldValue::List(vec![FieldValue::Int(0), FieldValue::Int(1)]),
                FieldValue::List(vec![FieldValue::Int(1), FieldValue::Int(0)]),
            ]),
        ),
    ])
}

fn build_dataset(total: usize) -> InMemoryDataset {
    InMemoryDataset::new((0..total).map(token_record).collect())
}

#[test]
fn save_then_load_preserves_records_and_schema() {
    let temp = tempfile::tempdir().unwrap();
    let path = temp.path().join("dataset");
    let store = FsDatasetStore::new();
    let dataset = build_dataset(7);

    store.save(&dataset, &path).unwrap();
    assert!(path.join("manifest.json").exists());
    assert!(path.join("data-00000.jsonl").exists());

    let loaded = store.load(&path).unwrap();
    assert_eq!(loaded.len(), 7);
    assert_eq!(loaded.features(), dataset.features());
    for idx in 0..7 {
        assert_eq!(loaded.record(idx).unwrap(), token_record(idx));
    }
}

#[test]
fn small_shard_capacity_splits_files() {
    let temp = tempfile::tempdir().unwrap();
    let path = temp.path().join("dataset");
    let store = FsDatasetStore::new().with_shard_capacity(2);

    store.save(&build_dataset(5), &path).unwrap();
    for shard in ["data-00000.jsonl", "data-00001.jsonl", "data-00002.jsonl"] {
        assert!(path.join(shard).exists(), "{shard} missing");
    }
    assert!(!path.join("data-00003.jsonl").exists());

    // A store with a different shard capacity reads the same layout back.
    let loaded = FsDatasetStore::new().load(&path).unwrap();
    assert_eq!(loaded.len(), 5);
    for idx in 0..5 {
        assert_eq!(loaded.record(idx).unwrap(), token_record(idx));
    }
}

#[test]
fn empty_dataset_round_trips() {
    let temp = tempfile::tempdir().unwrap();
    let path = temp.path().join("dataset");
    let store = FsDatasetStore::new();

    store.save(&build_dataset(0), &path).unwrap();
    let loaded = store.load(&path).unwrap();
    assert_eq!(loaded.len(), 0);
    assert!(loaded.is_empty());
}

#[test]
fn missing_manifest_is_unavailable() {
    let temp = tempfile::tempdir().unwrap();
    let path = temp.path().join("dataset");
    fs::create_dir_all(&path).unwrap();

    let err = FsDatasetStore::new().load(&path).unwrap_err();
    assert!(matches!(err, SubsetError::DatasetUnavailable { .. }));
}

#[test]
fn corrupt_manifest_is_inconsistent() {
    let temp = tempfile::tempdir().unwrap();
    let path = temp.path().join("dataset");
    fs::create_dir_all(&path).unwrap();
    fs::write(path.join("manifest.json"), b"not a manifest").unwrap();

    let err = FsDatasetStore::new().load(&path).unwrap_err();
    assert!(matches!(err, SubsetError::DatasetInconsistent { .. }));
}

#[test]
fn missing_shard_is_inconsistent() {
    let temp = tempfile::tempdir().unwrap();
    let path = temp.path().join("dataset");
    let store = FsDatasetStore::new();
    store.save(&build_dataset(3), &path).unwrap();
    fs::remove_file(path.join("data-00000.jsonl")).unwrap();

    let err = store.load(&path).unwrap_err();
    assert!(matches!(err, SubsetError::DatasetInconsistent { .. }));
}

#[test]
fn tampered_shard_count_is_inconsistent() {
    let temp = tempfile::tempdir().unwrap();
    let path = temp.path().join("dataset");
    let store = FsDatasetStore::new();
    store.save(&build_dataset(3), &path).unwrap();

    let mut shard = fs::OpenOptions::new()
        .append(true)
        .open(path.join("data-00000.jsonl"))
        .unwrap();
    writeln!(shard, r#"{{"src_ids": [99], "src_lang": "xx"}}"#).unwrap();

    let err = store.load(&path).unwrap_err();
    match err {
        SubsetError::DatasetInconsistent { details, .. } => {
            assert!(details.contains("manifest expects"), "details: {details}");
        }
        other => panic!("expected inconsistency, got {other:?}"),
    }
}

#[test]
fn unparseable_shard_line_is_inconsistent() {
    let temp = tempfile::tempdir().unwrap();
    let path = temp.path().join("dataset");
    let store = FsDatasetStore::new();
    store.save(&build_dataset(2), &path).unwrap();
    fs::write(path.join("data-00000.jsonl"), b"{broken\n{broken\n").unwrap();

    let err = store.load(&path).unwrap_err();
    assert!(matches!(err, SubsetError::DatasetInconsistent { .. }));
}

#[test]
fn exists_mirrors_the_filesystem() {
    let temp = tempfile::tempdir().unwrap();
    let store = FsDatasetStore::new();
    assert!(store.exists(temp.path()));
    assert!(!store.exists(&temp.path().join("nope")));
}
