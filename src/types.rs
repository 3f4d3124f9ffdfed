/// Name of a dataset field (column).
/// Examples: `src_ids`, `tgt_ids`, `src_lang`
pub type FieldName = String;
/// Shard file name inside a dataset directory.
/// Example: `data-00000.jsonl`
pub type ShardFileName = String;
