#![doc = include_str!("../README.md")]
#![warn(missing_docs)]

/// CLI definitions and runnable entry points for the shipped binaries.
pub mod apps;
/// Centralized constants used across the store, sampler, and verifier.
pub mod constants;
/// Record, field value, and schema types.
pub mod data;
/// Seeded without-replacement index sampling.
pub mod sampler;
/// Dataset and store interfaces plus built-in implementations.
pub mod store;
/// Subset creation orchestration.
pub mod subset;
/// Console formatting helpers.
pub mod utils;
/// Shared type aliases.
pub mod types;
/// Subset verification checks and reporting.
pub mod verify;

mod errors;

pub use data::{FeatureKind, Features, FieldValue, Record, infer_features};
pub use errors::SubsetError;
pub use sampler::sample_indices;
pub use store::{Dataset, DatasetStore, FsDatasetStore, InMemoryDataset, InMemoryStore};
pub use subset::{SubsetSpec, SubsetSummary, create_subset};
pub use types::{FieldName, ShardFileName};
pub use verify::{
    CheckEvent, CheckStage, CheckStatus, RecordPreview, SizeComparison, VerifyOptions,
    VerifyReport, verify_subset,
};
