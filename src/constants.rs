//! Centralized constants used across the store, sampler, and verifier.

/// On-disk dataset format constants.
pub mod store {
    /// Manifest file name inside a dataset directory.
    pub const MANIFEST_FILE_NAME: &str = "manifest.json";
    /// File name prefix for record shards.
    pub const SHARD_FILE_PREFIX: &str = "data-";
    /// File extension for record shards.
    pub const SHARD_FILE_EXTENSION: &str = "jsonl";
    /// Maximum records written into a single shard file.
    pub const DEFAULT_SHARD_CAPACITY: usize = 100_000;
    /// Current manifest format version.
    pub const MANIFEST_VERSION: u32 = 1;
}

/// Sampling constants.
pub mod sampler {
    /// Default sampling seed shared by the CLI default and library callers.
    pub const DEFAULT_SEED: u64 = 42;
}

/// Verifier report constants.
pub mod verify {
    /// Default number of records previewed at the end of a report.
    pub const DEFAULT_PREVIEW_RECORDS: usize = 3;
    /// Elements shown when previewing list-valued fields.
    pub const PREVIEW_LIST_ELEMENTS: usize = 5;
    /// Width of the banner rules in the printed report.
    pub const REPORT_RULE_WIDTH: usize = 70;
}
