use std::collections::HashSet;
use std::fs::{self, File};
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::Path;

use chrono::{DateTime, Utc};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};
use walkdir::WalkDir;

use crate::constants::store::{
    DEFAULT_SHARD_CAPACITY, MANIFEST_FILE_NAME, MANIFEST_VERSION, SHARD_FILE_EXTENSION,
    SHARD_FILE_PREFIX,
};
use crate::data::{Features, Record};
use crate::errors::SubsetError;
use crate::store::{Dataset, DatasetStore, InMemoryDataset};
use crate::types::ShardFileName;

/// Manifest entry for one record shard.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ShardEntry {
    /// Shard file name relative to the dataset directory.
    pub file: ShardFileName,
    /// Records stored in this shard.
    pub num_records: usize,
}

/// On-disk dataset manifest (`manifest.json`).
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct DatasetManifest {
    /// Manifest format version.
    pub version: u32,
    /// Total records across all shards.
    pub num_records: usize,
    /// Schema, in field order.
    pub features: Features,
    /// Shards, in record order.
    pub shards: Vec<ShardEntry>,
    /// When the dataset was written.
    pub created_at: DateTime<Utc>,
}

/// Filesystem-backed dataset store.
///
/// A dataset is a directory holding `manifest.json` plus `data-NNNNN.jsonl`
/// shards with one JSON record per line. Loading decodes listed shards in
/// parallel and validates record counts against the manifest; saving writes
/// shards first and the manifest last.
#[derive(Clone, Debug)]
pub struct FsDatasetStore {
    shard_capacity: usize,
}

impl Default for FsDatasetStore {
    fn default() -> Self {
        Self::new()
    }
}

impl FsDatasetStore {
    /// Create a store with the default shard capacity.
    pub fn new() -> Self {
        Self {
            shard_capacity: DEFAULT_SHARD_CAPACITY,
        }
    }

    /// Configure the maximum records per shard file.
    pub fn with_shard_capacity(mut self, shard_capacity: usize) -> Self {
        self.shard_capacity = shard_capacity.max(1);
        self
    }

    fn read_manifest(&self, path: &Path) -> Result<DatasetManifest, SubsetError> {
        let manifest_path = path.join(MANIFEST_FILE_NAME);
        let file = File::open(&manifest_path).map_err(|err| SubsetError::DatasetUnavailable {
            path: path.to_path_buf(),
            reason: format!("failed opening {MANIFEST_FILE_NAME}: {err}"),
        })?;
        serde_json::from_reader(BufReader::new(file)).map_err(|err| {
            SubsetError::DatasetInconsistent {
                path: path.to_path_buf(),
                details: format!("failed parsing {MANIFEST_FILE_NAME}: {err}"),
            }
        })
    }

    fn read_shard(&self, dir: &Path, entry: &ShardEntry) -> Result<Vec<Record>, SubsetError> {
        let shard_path = dir.join(&entry.file);
        let file = File::open(&shard_path).map_err(|err| SubsetError::DatasetInconsistent {
            path: dir.to_path_buf(),
            details: format!("failed opening shard '{}': {err}", entry.file),
        })?;
        let mut records = Vec::with_capacity(entry.num_records);
        for (line_idx, line) in BufReader::new(file).lines().enumerate() {
            let line = line.map_err(|err| SubsetError::DatasetInconsistent {
                path: dir.to_path_buf(),
                details: format!(
                    "failed reading shard '{}' line {}: {err}",
                    entry.file,
                    line_idx + 1
                ),
            })?;
            if line.trim().is_empty() {
                continue;
            }
            let record: Record =
                serde_json::from_str(&line).map_err(|err| SubsetError::DatasetInconsistent {
                    path: dir.to_path_buf(),
                    details: format!(
                        "failed parsing shard '{}' line {}: {err}",
                        entry.file,
                        line_idx + 1
                    ),
                })?;
            records.push(record);
        }
        if records.len() != entry.num_records {
            return Err(SubsetError::DatasetInconsistent {
                path: dir.to_path_buf(),
                details: format!(
                    "shard '{}' holds {} records, manifest expects {}",
                    entry.file,
                    records.len(),
                    entry.num_records
                ),
            });
        }
        Ok(records)
    }

    /// Flag `.jsonl` files in the dataset directory that the manifest does
    /// not list; they are ignored by loading but usually indicate a partial
    /// rewrite or a foreign file dropped into the directory.
    fn warn_on_unlisted_shards(&self, dir: &Path, manifest: &DatasetManifest) {
        let listed: HashSet<&str> = manifest
            .shards
            .iter()
            .map(|entry| entry.file.as_str())
            .collect();
        for entry in WalkDir::new(dir)
            .max_depth(1)
            .into_iter()
            .filter_map(Result::ok)
            .filter(|entry| entry.file_type().is_file())
        {
            let is_shard_file = entry
                .path()
                .extension()
                .and_then(|ext| ext.to_str())
                .map(|ext| ext.eq_ignore_ascii_case(SHARD_FILE_EXTENSION))
                .unwrap_or(false);
            if !is_shard_file {
                continue;
            }
            let name = entry.file_name().to_string_lossy();
            if !listed.contains(name.as_ref()) {
                warn!(
                    dataset = %dir.display(),
                    shard = %name,
                    "shard file present on disk but not listed in the manifest"
                );
            }
        }
    }
}

impl DatasetStore for FsDatasetStore {
    fn exists(&self, path: &Path) -> bool {
        path.exists()
    }

    fn load(&self, path: &Path) -> Result<Box<dyn Dataset>, SubsetError> {
        let manifest = self.read_manifest(path)?;
        if manifest.version != MANIFEST_VERSION {
            return Err(SubsetError::DatasetInconsistent {
                path: path.to_path_buf(),
                details: format!(
                    "unsupported manifest version {} (expected {MANIFEST_VERSION})",
                    manifest.version
                ),
            });
        }
        self.warn_on_unlisted_shards(path, &manifest);

        let shard_batches: Vec<Vec<Record>> = manifest
            .shards
            .par_iter()
            .map(|entry| self.read_shard(path, entry))
            .collect::<Result<_, _>>()?;
        let mut records = Vec::with_capacity(manifest.num_records);
        for batch in shard_batches {
            records.extend(batch);
        }
        if records.len() != manifest.num_records {
            return Err(SubsetError::DatasetInconsistent {
                path: path.to_path_buf(),
                details: format!(
                    "dataset holds {} records, manifest expects {}",
                    records.len(),
                    manifest.num_records
                ),
            });
        }
        debug!(
            dataset = %path.display(),
            records = records.len(),
            shards = manifest.shards.len(),
            "dataset loaded"
        );
        Ok(Box::new(InMemoryDataset::with_features(
            manifest.features,
            records,
        )))
    }

    fn save(&self, dataset: &dyn Dataset, path: &Path) -> Result<(), SubsetError> {
        fs::create_dir_all(path)?;
        let total = dataset.len();
        let mut shards = Vec::new();
        let mut written = 0usize;
        while written < total {
            let end = (written + self.shard_capacity).min(total);
            let file_name = format!(
                "{SHARD_FILE_PREFIX}{:05}.{SHARD_FILE_EXTENSION}",
                shards.len()
            );
            let file = File::create(path.join(&file_name))?;
            let mut writer = BufWriter::new(file);
            for idx in written..end {
                let record = dataset.record(idx)?;
                serde_json::to_writer(&mut writer, &record).map_err(|err| {
                    SubsetError::DatasetInconsistent {
                        path: path.to_path_buf(),
                        details: format!("failed encoding record {idx}: {err}"),
                    }
                })?;
                writer.write_all(b"\n")?;
            }
            writer.flush()?;
            shards.push(ShardEntry {
                file: file_name,
                num_records: end - written,
            });
            written = end;
        }

        let manifest = DatasetManifest {
            version: MANIFEST_VERSION,
            num_records: total,
            features: dataset.features().clone(),
            shards,
            created_at: Utc::now(),
        };
        let mut manifest_writer = BufWriter::new(File::create(path.join(MANIFEST_FILE_NAME))?);
        serde_json::to_writer_pretty(&mut manifest_writer, &manifest).map_err(|err| {
            SubsetError::DatasetInconsistent {
                path: path.to_path_buf(),
                details: format!("failed encoding {MANIFEST_FILE_NAME}: {err}"),
            }
        })?;
        manifest_writer.flush()?;
        debug!(
            dataset = %path.display(),
            records = total,
            shards = manifest.shards.len(),
            "dataset saved"
        );
        Ok(())
    }
}
