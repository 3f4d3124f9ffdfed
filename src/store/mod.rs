//! Dataset and store interfaces plus built-in implementations.
//!
//! Ownership model:
//! - `Dataset` is read-only, index-addressable access to an ordered record
//!   sequence with a shared schema.
//! - `DatasetStore` maps filesystem paths to datasets (exists/load/save) so
//!   the subset and verification logic can run against in-memory fakes.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::RwLock;

use crate::data::{Features, Record, infer_features};
use crate::errors::SubsetError;

mod fs;
pub use fs::{DatasetManifest, FsDatasetStore, ShardEntry};

/// Read-only, index-addressable dataset interface.
///
/// `len` and `features` must be stable for the lifetime of the value, and
/// `record` must return the same record for the same index across calls.
pub trait Dataset: Send + Sync + std::fmt::Debug {
    /// Number of records.
    fn len(&self) -> usize;

    /// True when the dataset holds no records.
    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Schema of the dataset, in field order.
    fn features(&self) -> &Features;

    /// Return the record at `idx`.
    fn record(&self, idx: usize) -> Result<Record, SubsetError>;

    /// Materialize the records at `indices`, preserving the given order.
    fn select(&self, indices: &[usize]) -> Result<InMemoryDataset, SubsetError> {
        let mut records = Vec::with_capacity(indices.len());
        for &idx in indices {
            records.push(self.record(idx)?);
        }
        Ok(InMemoryDataset::with_features(
            self.features().clone(),
            records,
        ))
    }
}

/// Path-addressed persistence interface for datasets.
pub trait DatasetStore: Send + Sync {
    /// True when something (at minimum the path itself) exists at `path`.
    fn exists(&self, path: &Path) -> bool;

    /// Load the dataset stored at `path`.
    fn load(&self, path: &Path) -> Result<Box<dyn Dataset>, SubsetError>;

    /// Persist `dataset` at `path`, creating missing parent directories.
    fn save(&self, dataset: &dyn Dataset, path: &Path) -> Result<(), SubsetError>;
}

/// In-memory dataset for tests and small corpora.
#[derive(Clone, Debug)]
pub struct InMemoryDataset {
    features: Features,
    records: Vec<Record>,
}

impl InMemoryDataset {
    /// Build a dataset from records, inferring the schema from the first one.
    pub fn new(records: Vec<Record>) -> Self {
        let features = infer_features(&records);
        Self { features, records }
    }

    /// Build a dataset with an explicit schema.
    pub fn with_features(features: Features, records: Vec<Record>) -> Self {
        Self { features, records }
    }

    /// Records in order.
    pub fn records(&self) -> &[Record] {
        &self.records
    }
}

impl Dataset for InMemoryDataset {
    fn len(&self) -> usize {
        self.records.len()
    }

    fn features(&self) -> &Features {
        &self.features
    }

    fn record(&self, idx: usize) -> Result<Record, SubsetError> {
        self.records
            .get(idx)
            .cloned()
            .ok_or(SubsetError::IndexOutOfBounds {
                index: idx,
                len: self.records.len(),
            })
    }
}

/// In-memory store keyed by path, for exercising orchestration without disk.
#[derive(Default)]
pub struct InMemoryStore {
    datasets: RwLock<HashMap<PathBuf, InMemoryDataset>>,
}

impl InMemoryStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a dataset under `path`.
    pub fn insert(
        &self,
        path: impl Into<PathBuf>,
        dataset: InMemoryDataset,
    ) -> Result<(), SubsetError> {
        let path = path.into();
        let mut guard = self
            .datasets
            .write()
            .map_err(|_| lock_poisoned(&path))?;
        guard.insert(path, dataset);
        Ok(())
    }
}

impl DatasetStore for InMemoryStore {
    fn exists(&self, path: &Path) -> bool {
        self.datasets
            .read()
            .map(|guard| guard.contains_key(path))
            .unwrap_or(false)
    }

    fn load(&self, path: &Path) -> Result<Box<dyn Dataset>, SubsetError> {
        let guard = self.datasets.read().map_err(|_| lock_poisoned(path))?;
        guard
            .get(path)
            .map(|dataset| Box::new(dataset.clone()) as Box<dyn Dataset>)
            .ok_or_else(|| SubsetError::DatasetUnavailable {
                path: path.to_path_buf(),
                reason: "no dataset registered at this path".to_string(),
            })
    }

    fn save(&self, dataset: &dyn Dataset, path: &Path) -> Result<(), SubsetError> {
        let mut records = Vec::with_capacity(dataset.len());
        for idx in 0..dataset.len() {
            records.push(dataset.record(idx)?);
        }
        let snapshot = InMemoryDataset::with_features(dataset.features().clone(), records);
        let mut guard = self.datasets.write().map_err(|_| lock_poisoned(path))?;
        guard.insert(path.to_path_buf(), snapshot);
        Ok(())
    }
}

fn lock_poisoned(path: &Path) -> SubsetError {
    SubsetError::DatasetUnavailable {
        path: path.to_path_buf(),
        reason: "store lock poisoned".to_string(),
    }
}
