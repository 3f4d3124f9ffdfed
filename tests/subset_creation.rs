use std::path::Path;

use subsetter::{
    Dataset, DatasetStore, FieldValue, InMemoryDataset, InMemoryStore, Record, SubsetError,
    SubsetSpec, create_subset,
};

fn token_record(idx: usize) -> Record {
    let idx = idx as i64;
    Record::from([
        (
            "src_ids".to_string(),
            FieldValue::List(vec![
                FieldValue::Int(idx),
                FieldValue::Int(7),
                FieldValue::Int(2045),
            ]),
        ),
        (
            "tgt_ids".to_string(),
            FieldValue::List(vec![FieldValue::Int(idx + 1_000), FieldValue::Int(9)]),
        ),
        ("src_lang".to_string(), FieldValue::Str("de".to_string())),
        ("tgt_lang".to_string(), FieldValue::Str("en".to_string())),
    ])
}

fn seeded_store(total: usize) -> InMemoryStore {
    let store = InMemoryStore::new();
    store
        .insert(
            "/data/original",
            InMemoryDataset::new((0..total).map(token_record).collect()),
        )
        .unwrap();
    store
}

fn record_index(record: &Record) -> i64 {
    match &record["src_ids"] {
        FieldValue::List(items) => match items[0] {
            FieldValue::Int(value) => value,
            ref other => panic!("unexpected first src id: {other:?}"),
        },
        other => panic!("unexpected src_ids value: {other:?}"),
    }
}

fn loaded_records(store: &InMemoryStore, path: &str) -> Vec<Record> {
    let dataset = store.load(Path::new(path)).unwrap();
    (0..dataset.len())
        .map(|idx| dataset.record(idx).unwrap())
        .collect()
}

#[test]
fn subset_has_exact_size_and_preserves_source_order() {
    let store = seeded_store(100);
    let summary = create_subset(
        &store,
        Path::new("/data/original"),
        Path::new("/data/subset"),
        SubsetSpec::Count(20),
        1,
    )
    .unwrap();
    assert_eq!(summary.total, 100);
    assert_eq!(summary.subset_size, 20);

    let records = loaded_records(&store, "/data/subset");
    assert_eq!(records.len(), 20);

    let indices: Vec<i64> = records.iter().map(record_index).collect();
    assert!(
        indices.windows(2).all(|pair| pair[0] < pair[1]),
        "selected records must stay in ascending source order, got {indices:?}"
    );
    for record in &records {
        let idx = record_index(record) as usize;
        assert!(idx < 100);
        assert_eq!(*record, token_record(idx), "record {idx} was altered");
    }
}

#[test]
fn reruns_with_the_same_seed_are_identical() {
    let store = seeded_store(100);
    for output in ["/data/subset_a", "/data/subset_b"] {
        create_subset(
            &store,
            Path::new("/data/original"),
            Path::new(output),
            SubsetSpec::Count(25),
            42,
        )
        .unwrap();
    }
    assert_eq!(
        loaded_records(&store, "/data/subset_a"),
        loaded_records(&store, "/data/subset_b")
    );
}

#[test]
fn changing_the_seed_changes_the_selection() {
    let store = seeded_store(100);
    for (output, seed) in [("/data/subset_a", 1), ("/data/subset_b", 2)] {
        create_subset(
            &store,
            Path::new("/data/original"),
            Path::new(output),
            SubsetSpec::Count(20),
            seed,
        )
        .unwrap();
    }
    assert_ne!(
        loaded_records(&store, "/data/subset_a"),
        loaded_records(&store, "/data/subset_b")
    );
}

#[test]
fn oversized_count_yields_the_full_dataset() {
    let store = seeded_store(100);
    let summary = create_subset(
        &store,
        Path::new("/data/original"),
        Path::new("/data/subset"),
        SubsetSpec::Count(500),
        42,
    )
    .unwrap();
    assert_eq!(summary.subset_size, 100);

    let records = loaded_records(&store, "/data/subset");
    let expected: Vec<Record> = (0..100).map(token_record).collect();
    assert_eq!(records, expected);
}

#[test]
fn fraction_target_is_floored() {
    let store = seeded_store(10);
    let summary = create_subset(
        &store,
        Path::new("/data/original"),
        Path::new("/data/subset"),
        SubsetSpec::Fraction(0.5),
        42,
    )
    .unwrap();
    assert_eq!(summary.subset_size, 5);
    assert_eq!(loaded_records(&store, "/data/subset").len(), 5);
}

#[test]
fn invalid_fraction_leaves_no_output() {
    let store = seeded_store(10);
    let err = create_subset(
        &store,
        Path::new("/data/original"),
        Path::new("/data/subset"),
        SubsetSpec::Fraction(1.5),
        42,
    )
    .unwrap_err();
    assert!(matches!(err, SubsetError::Configuration(_)));
    assert!(!store.exists(Path::new("/data/subset")));
}

#[test]
fn subset_inherits_the_source_schema() {
    let store = seeded_store(20);
    create_subset(
        &store,
        Path::new("/data/original"),
        Path::new("/data/subset"),
        SubsetSpec::Count(5),
        42,
    )
    .unwrap();
    let original = store.load(Path::new("/data/original")).unwrap();
    let subset = store.load(Path::new("/data/subset")).unwrap();
    assert_eq!(original.features(), subset.features());
}
