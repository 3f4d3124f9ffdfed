//! Subset creation: resolve a target size, draw indices, persist.

use std::path::{Path, PathBuf};

use tracing::info;

use crate::errors::SubsetError;
use crate::sampler::sample_indices;
use crate::store::DatasetStore;

/// Selection criterion for a subset.
///
/// The two criteria are mutually exclusive by construction; the CLI maps its
/// `--size`/`--percentage` flags onto the variants after clap has rejected
/// conflicting or missing flags.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum SubsetSpec {
    /// Keep exactly this many records, clamped to the dataset size.
    Count(usize),
    /// Keep `floor(total * fraction)` records; the fraction must lie in
    /// `(0, 1]`.
    Fraction(f64),
}

impl SubsetSpec {
    /// Resolve the concrete subset size for a dataset of `total` records.
    pub fn resolve(&self, total: usize) -> Result<usize, SubsetError> {
        match *self {
            SubsetSpec::Count(count) => Ok(count.min(total)),
            SubsetSpec::Fraction(fraction) => {
                if !(fraction > 0.0 && fraction <= 1.0) {
                    return Err(SubsetError::Configuration(format!(
                        "subset fraction must be in (0, 1], got {fraction}"
                    )));
                }
                Ok((total as f64 * fraction).floor() as usize)
            }
        }
    }
}

/// Outcome of a subset creation run.
#[derive(Clone, Debug)]
pub struct SubsetSummary {
    /// Record count of the source dataset.
    pub total: usize,
    /// Record count of the written subset.
    pub subset_size: usize,
    /// Where the subset was written.
    pub output: PathBuf,
}

impl SubsetSummary {
    /// Subset size as a percentage of the source size.
    pub fn percentage(&self) -> f64 {
        if self.total == 0 {
            0.0
        } else {
            self.subset_size as f64 / self.total as f64 * 100.0
        }
    }
}

/// Create a reproducible random subset of the dataset at `input` and persist
/// it at `output`.
///
/// Indices are drawn without replacement from a generator seeded with `seed`
/// and applied in ascending order, so surviving records keep their original
/// relative order. The source dataset is never mutated; load and save
/// failures propagate unchanged.
pub fn create_subset(
    store: &dyn DatasetStore,
    input: &Path,
    output: &Path,
    spec: SubsetSpec,
    seed: u64,
) -> Result<SubsetSummary, SubsetError> {
    info!(input = %input.display(), "loading dataset");
    let dataset = store.load(input)?;
    let total = dataset.len();
    let subset_size = spec.resolve(total)?;
    info!(total, subset_size, seed, "drawing subset indices");
    let indices = sample_indices(total, subset_size, seed);
    let subset = dataset.select(&indices)?;
    info!(output = %output.display(), "saving subset");
    store.save(&subset, output)?;
    Ok(SubsetSummary {
        total,
        subset_size,
        output: output.to_path_buf(),
    })
}
