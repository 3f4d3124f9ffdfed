//! Subset verification: a fixed sequence of structural checks producing a
//! printable report and a pass/fail verdict.
//!
//! Checks never panic and never propagate errors; anything that goes wrong
//! past the load stage is downgraded to a warning so the report stays
//! complete. Only missing paths, load failures, an oversized subset, or an
//! empty subset fail the run.

use std::collections::BTreeSet;
use std::mem;
use std::path::Path;

use crate::constants::verify::{DEFAULT_PREVIEW_RECORDS, PREVIEW_LIST_ELEMENTS};
use crate::data::{FieldValue, Record};
use crate::store::{Dataset, DatasetStore};
use crate::types::FieldName;
use crate::utils::format_count;

/// Severity of a single check event.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CheckStatus {
    /// Neutral report line (sizes, percentages).
    Info,
    /// Check passed.
    Pass,
    /// Non-fatal anomaly; the run can still pass overall.
    Warn,
    /// Fatal condition; the run fails.
    Fail,
}

/// Stage of the verification sequence an event belongs to.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CheckStage {
    /// Both dataset paths exist.
    Paths,
    /// Both datasets load through the store.
    Load,
    /// Subset size is positive and no larger than the original.
    Sizes,
    /// Field-name sets match between original and subset.
    Features,
    /// First-record structure is sane.
    FirstRecord,
    /// Record preview rendering.
    Preview,
}

impl CheckStage {
    /// Human-readable heading used by the report printer.
    pub fn heading(&self) -> &'static str {
        match self {
            CheckStage::Paths => "Checking dataset paths",
            CheckStage::Load => "Loading datasets",
            CheckStage::Sizes => "Comparing sizes",
            CheckStage::Features => "Checking dataset features",
            CheckStage::FirstRecord => "Checking first-record integrity",
            CheckStage::Preview => "Previewing subset records",
        }
    }
}

/// One reported check outcome.
#[derive(Clone, Debug)]
pub struct CheckEvent {
    /// Stage that produced the event.
    pub stage: CheckStage,
    /// Severity.
    pub status: CheckStatus,
    /// Printable message.
    pub message: String,
}

/// Original/subset record counts.
#[derive(Clone, Copy, Debug)]
pub struct SizeComparison {
    /// Record count of the original dataset.
    pub original: usize,
    /// Record count of the subset dataset.
    pub subset: usize,
}

impl SizeComparison {
    /// Subset size as a percentage of the original size.
    pub fn percentage(&self) -> f64 {
        if self.original == 0 {
            0.0
        } else {
            self.subset as f64 / self.original as f64 * 100.0
        }
    }
}

/// Rendered preview of one subset record.
#[derive(Clone, Debug)]
pub struct RecordPreview {
    /// Zero-based record index inside the subset.
    pub index: usize,
    /// One or two lines per field.
    pub lines: Vec<String>,
}

/// Verifier knobs.
#[derive(Clone, Copy, Debug)]
pub struct VerifyOptions {
    /// Records to preview at the end of the report (0 disables previews).
    pub preview_records: usize,
}

impl Default for VerifyOptions {
    fn default() -> Self {
        Self {
            preview_records: DEFAULT_PREVIEW_RECORDS,
        }
    }
}

/// Full verification outcome.
#[derive(Clone, Debug, Default)]
pub struct VerifyReport {
    /// Check events in the order they were produced.
    pub events: Vec<CheckEvent>,
    /// Size comparison, present once both datasets loaded.
    pub sizes: Option<SizeComparison>,
    /// Rendered record previews.
    pub previews: Vec<RecordPreview>,
}

impl VerifyReport {
    /// True when no fail-level event occurred.
    pub fn passed(&self) -> bool {
        self.events
            .iter()
            .all(|event| event.status != CheckStatus::Fail)
    }

    /// Number of warning events.
    pub fn warning_count(&self) -> usize {
        self.events
            .iter()
            .filter(|event| event.status == CheckStatus::Warn)
            .count()
    }

    fn push(&mut self, stage: CheckStage, status: CheckStatus, message: impl Into<String>) {
        self.events.push(CheckEvent {
            stage,
            status,
            message: message.into(),
        });
    }
}

/// Run the full verification sequence for `subset` against `original`.
///
/// The returned report carries every outcome; it never short-circuits past
/// a recoverable anomaly, only past conditions that make the remaining
/// checks meaningless (missing path, load failure, size violation).
pub fn verify_subset(
    store: &dyn DatasetStore,
    original: &Path,
    subset: &Path,
    options: &VerifyOptions,
) -> VerifyReport {
    let mut report = VerifyReport::default();

    let mut missing = false;
    for (label, path) in [("original", original), ("subset", subset)] {
        if store.exists(path) {
            report.push(
                CheckStage::Paths,
                CheckStatus::Pass,
                format!("{label} dataset found: {}", path.display()),
            );
        } else {
            report.push(
                CheckStage::Paths,
                CheckStatus::Fail,
                format!("{label} dataset not found: {}", path.display()),
            );
            missing = true;
        }
    }
    if missing {
        return report;
    }

    let original_ds = match store.load(original) {
        Ok(dataset) => {
            report.push(
                CheckStage::Load,
                CheckStatus::Pass,
                format!(
                    "original dataset loaded: {} records",
                    format_count(dataset.len())
                ),
            );
            dataset
        }
        Err(err) => {
            report.push(
                CheckStage::Load,
                CheckStatus::Fail,
                format!("failed loading original dataset: {err}"),
            );
            return report;
        }
    };
    let subset_ds = match store.load(subset) {
        Ok(dataset) => {
            report.push(
                CheckStage::Load,
                CheckStatus::Pass,
                format!(
                    "subset dataset loaded: {} records",
                    format_count(dataset.len())
                ),
            );
            dataset
        }
        Err(err) => {
            report.push(
                CheckStage::Load,
                CheckStatus::Fail,
                format!("failed loading subset dataset: {err}"),
            );
            return report;
        }
    };

    let sizes = SizeComparison {
        original: original_ds.len(),
        subset: subset_ds.len(),
    };
    report.sizes = Some(sizes);
    report.push(
        CheckStage::Sizes,
        CheckStatus::Info,
        format!("original dataset: {} records", format_count(sizes.original)),
    );
    report.push(
        CheckStage::Sizes,
        CheckStatus::Info,
        format!("subset dataset: {} records", format_count(sizes.subset)),
    );
    report.push(
        CheckStage::Sizes,
        CheckStatus::Info,
        format!("Percentage: {:.4}%", sizes.percentage()),
    );
    if sizes.subset > sizes.original {
        report.push(
            CheckStage::Sizes,
            CheckStatus::Fail,
            "subset is larger than the original; selection invariant violated",
        );
        return report;
    }
    if sizes.subset == 0 {
        report.push(CheckStage::Sizes, CheckStatus::Fail, "subset is empty");
        return report;
    }

    check_features(&mut report, original_ds.as_ref(), subset_ds.as_ref());
    check_first_record(&mut report, original_ds.as_ref(), subset_ds.as_ref());
    if options.preview_records > 0 {
        build_previews(&mut report, subset_ds.as_ref(), options.preview_records);
    }
    report
}

fn check_features(report: &mut VerifyReport, original: &dyn Dataset, subset: &dyn Dataset) {
    let original_fields: BTreeSet<&FieldName> = original.features().keys().collect();
    let subset_fields: BTreeSet<&FieldName> = subset.features().keys().collect();
    if original_fields == subset_fields {
        let names: Vec<&str> = original.features().keys().map(String::as_str).collect();
        report.push(
            CheckStage::Features,
            CheckStatus::Pass,
            format!("features match: [{}]", names.join(", ")),
        );
        return;
    }
    report.push(
        CheckStage::Features,
        CheckStatus::Warn,
        "feature sets differ between original and subset",
    );
    let missing: Vec<&str> = original_fields
        .difference(&subset_fields)
        .map(|name| name.as_str())
        .collect();
    let extra: Vec<&str> = subset_fields
        .difference(&original_fields)
        .map(|name| name.as_str())
        .collect();
    if !missing.is_empty() {
        report.push(
            CheckStage::Features,
            CheckStatus::Warn,
            format!("missing in subset: {}", missing.join(", ")),
        );
    }
    if !extra.is_empty() {
        report.push(
            CheckStage::Features,
            CheckStatus::Warn,
            format!("extra in subset: {}", extra.join(", ")),
        );
    }
}

/// Compare record 0 of both datasets: key sets, top-level value shapes, and
/// the empty-list-in-subset anomaly. Read failures downgrade to warnings.
fn check_first_record(report: &mut VerifyReport, original: &dyn Dataset, subset: &dyn Dataset) {
    let (original_first, subset_first) = match (original.record(0), subset.record(0)) {
        (Ok(original_first), Ok(subset_first)) => (original_first, subset_first),
        (Err(err), _) | (_, Err(err)) => {
            report.push(
                CheckStage::FirstRecord,
                CheckStatus::Warn,
                format!("could not read first records: {err}"),
            );
            return;
        }
    };

    let original_keys: BTreeSet<&FieldName> = original_first.keys().collect();
    let subset_keys: BTreeSet<&FieldName> = subset_first.keys().collect();
    let keys_match = original_keys == subset_keys;
    if keys_match {
        report.push(
            CheckStage::FirstRecord,
            CheckStatus::Pass,
            "first-record structure matches",
        );
    } else {
        report.push(
            CheckStage::FirstRecord,
            CheckStatus::Warn,
            "first-record structure differs",
        );
    }

    let mut clean = true;
    for (name, original_value) in &original_first {
        let Some(subset_value) = subset_first.get(name) else {
            continue;
        };
        // Top-level shape only: a list field stays a list even when its
        // element types drifted, matching the feature-level comparison.
        if mem::discriminant(original_value) != mem::discriminant(subset_value) {
            report.push(
                CheckStage::FirstRecord,
                CheckStatus::Warn,
                format!(
                    "type mismatch for '{name}': {} vs {}",
                    original_value.kind(),
                    subset_value.kind()
                ),
            );
            clean = false;
        }
        if let (FieldValue::List(original_items), FieldValue::List(subset_items)) =
            (original_value, subset_value)
        {
            if subset_items.is_empty() && !original_items.is_empty() {
                report.push(
                    CheckStage::FirstRecord,
                    CheckStatus::Warn,
                    format!("empty list for '{name}' in subset"),
                );
                clean = false;
            }
        }
    }
    if clean && keys_match {
        report.push(
            CheckStage::FirstRecord,
            CheckStatus::Pass,
            "first-record field values look structurally sound",
        );
    }
}

fn build_previews(report: &mut VerifyReport, subset: &dyn Dataset, limit: usize) {
    let shown = limit.min(subset.len());
    for idx in 0..shown {
        match subset.record(idx) {
            Ok(record) => report.previews.push(RecordPreview {
                index: idx,
                lines: preview_record(&record),
            }),
            Err(err) => {
                report.push(
                    CheckStage::Preview,
                    CheckStatus::Warn,
                    format!("failed reading record {idx}: {err}"),
                );
                return;
            }
        }
    }
}

/// Render one record as `field: value` preview lines.
///
/// String lists of up to five elements print fully, longer ones print the
/// first five with an ellipsis; numeric lists print their length plus the
/// first few elements; other lists print length only; scalars print
/// directly.
pub fn preview_record(record: &Record) -> Vec<String> {
    let mut lines = Vec::with_capacity(record.len());
    for (name, value) in record {
        preview_field(name, value, &mut lines);
    }
    lines
}

fn preview_field(name: &str, value: &FieldValue, lines: &mut Vec<String>) {
    let FieldValue::List(items) = value else {
        lines.push(format!("{name}: {}", render_scalar(value)));
        return;
    };
    let all_strings = !items.is_empty()
        && items
            .iter()
            .all(|item| matches!(item, FieldValue::Str(_)));
    let all_numbers = !items.is_empty()
        && items
            .iter()
            .all(|item| matches!(item, FieldValue::Int(_) | FieldValue::Float(_)));
    if all_strings {
        if items.len() > PREVIEW_LIST_ELEMENTS {
            lines.push(format!(
                "{name}: {}...",
                render_list(&items[..PREVIEW_LIST_ELEMENTS])
            ));
        } else {
            lines.push(format!("{name}: {}", render_list(items)));
        }
    } else if all_numbers {
        lines.push(format!("{name}: list of length {}", items.len()));
        let head = &items[..items.len().min(PREVIEW_LIST_ELEMENTS)];
        lines.push(format!("        first few: {}...", render_list(head)));
    } else {
        lines.push(format!("{name}: list of length {}", items.len()));
    }
}

fn render_list(items: &[FieldValue]) -> String {
    let rendered: Vec<String> = items.iter().map(render_scalar).collect();
    format!("[{}]", rendered.join(", "))
}

fn render_scalar(value: &FieldValue) -> String {
    match value {
        FieldValue::Null => "null".to_string(),
        FieldValue::Bool(value) => value.to_string(),
        FieldValue::Int(value) => value.to_string(),
        FieldValue::Float(value) => value.to_string(),
        FieldValue::Str(value) => format!("\"{value}\""),
        FieldValue::List(items) => render_list(items),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn int_list(values: &[i64]) -> FieldValue {
        FieldValue::List(values.iter().map(|&v| FieldValue::Int(v)).collect())
    }

    fn str_list(values: &[&str]) -> FieldValue {
        FieldValue::List(
            values
                .iter()
                .map(|v| FieldValue::Str((*v).to_string()))
                .collect(),
        )
    }

    #[test]
    fn numeric_lists_preview_length_and_head() {
        let record = Record::from([(
            "src_ids".to_string(),
            int_list(&[10, 11, 12, 13, 14, 15, 16]),
        )]);
        let lines = preview_record(&record);
        assert_eq!(lines[0], "src_ids: list of length 7");
        assert_eq!(lines[1], "        first few: [10, 11, 12, 13, 14]...");
    }

    #[test]
    fn short_string_lists_print_fully_long_ones_truncate() {
        let record = Record::from([
            ("short".to_string(), str_list(&["a", "b"])),
            ("long".to_string(), str_list(&["a", "b", "c", "d", "e", "f"])),
        ]);
        let lines = preview_record(&record);
        assert_eq!(lines[0], r#"short: ["a", "b"]"#);
        assert_eq!(lines[1], r#"long: ["a", "b", "c", "d", "e"]..."#);
    }

    #[test]
    fn mixed_and_empty_lists_print_length_only() {
        let record = Record::from([
            (
                "mixed".to_string(),
                FieldValue::List(vec![
                    FieldValue::Int(1),
                    FieldValue::Str("x".to_string()),
                ]),
            ),
            ("empty".to_string(), FieldValue::List(Vec::new())),
        ]);
        let lines = preview_record(&record);
        assert_eq!(lines[0], "mixed: list of length 2");
        assert_eq!(lines[1], "empty: list of length 0");
    }

    #[test]
    fn scalars_print_directly() {
        let record = Record::from([
            ("lang".to_string(), FieldValue::Str("de".to_string())),
            ("count".to_string(), FieldValue::Int(12)),
        ]);
        let lines = preview_record(&record);
        assert_eq!(lines[0], "lang: \"de\"");
        assert_eq!(lines[1], "count: 12");
    }

    #[test]
    fn percentage_formats_to_four_decimals() {
        let sizes = SizeComparison {
            original: 100,
            subset: 20,
        };
        assert_eq!(format!("{:.4}%", sizes.percentage()), "20.0000%");
    }
}
