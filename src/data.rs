use std::fmt;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::types::FieldName;

/// Ordered field-name to value mapping for one dataset record.
pub type Record = IndexMap<FieldName, FieldValue>;

/// Ordered field-name to schema descriptor mapping for a dataset.
pub type Features = IndexMap<FieldName, FeatureKind>;

/// A single field value.
///
/// Values serialize as plain untagged JSON, so shard lines read the way the
/// datasets were produced (`{"src_ids": [101, 7, 2045], "src_lang": "de"}`).
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FieldValue {
    /// Absent value.
    Null,
    /// Boolean scalar.
    Bool(bool),
    /// Integer scalar (token ids, lengths, label ids).
    Int(i64),
    /// Floating-point scalar (scores, weights).
    Float(f64),
    /// String scalar (raw text, language tags).
    Str(String),
    /// List value; elements may nest.
    List(Vec<FieldValue>),
}

impl FieldValue {
    /// Schema descriptor for this value.
    ///
    /// List kinds are derived from the first element; an empty list reports
    /// `list<null>` since nothing better is known.
    pub fn kind(&self) -> FeatureKind {
        match self {
            FieldValue::Null => FeatureKind::Null,
            FieldValue::Bool(_) => FeatureKind::Bool,
            FieldValue::Int(_) => FeatureKind::Int,
            FieldValue::Float(_) => FeatureKind::Float,
            FieldValue::Str(_) => FeatureKind::Str,
            FieldValue::List(items) => FeatureKind::List(Box::new(
                items
                    .first()
                    .map(FieldValue::kind)
                    .unwrap_or(FeatureKind::Null),
            )),
        }
    }

    /// True when the value is a list.
    pub fn is_list(&self) -> bool {
        matches!(self, FieldValue::List(_))
    }
}

/// Schema descriptor for one feature (field).
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FeatureKind {
    /// Absent value.
    Null,
    /// Boolean scalar.
    Bool,
    /// Integer scalar.
    Int,
    /// Floating-point scalar.
    Float,
    /// String scalar.
    Str,
    /// List of the inner kind.
    List(Box<FeatureKind>),
}

impl fmt::Display for FeatureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FeatureKind::Null => write!(f, "null"),
            FeatureKind::Bool => write!(f, "bool"),
            FeatureKind::Int => write!(f, "int"),
            FeatureKind::Float => write!(f, "float"),
            FeatureKind::Str => write!(f, "str"),
            FeatureKind::List(inner) => write!(f, "list<{inner}>"),
        }
    }
}

/// Derive a dataset schema from the first record.
///
/// Empty input yields an empty schema; later records are assumed to share
/// the first record's layout, which the verifier double-checks separately.
pub fn infer_features(records: &[Record]) -> Features {
    records
        .first()
        .map(|record| {
            record
                .iter()
                .map(|(name, value)| (name.clone(), value.kind()))
                .collect()
        })
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn field_values_parse_from_plain_json() {
        let record: Record =
            serde_json::from_str(r#"{"src_ids": [101, 7], "src_lang": "de", "score": 0.5}"#)
                .unwrap();
        assert_eq!(
            record["src_ids"],
            FieldValue::List(vec![FieldValue::Int(101), FieldValue::Int(7)])
        );
        assert_eq!(record["src_lang"], FieldValue::Str("de".to_string()));
        assert_eq!(record["score"], FieldValue::Float(0.5));
    }

    #[test]
    fn kinds_follow_values() {
        assert_eq!(FieldValue::Int(3).kind(), FeatureKind::Int);
        assert_eq!(
            FieldValue::List(vec![FieldValue::Int(3)]).kind(),
            FeatureKind::List(Box::new(FeatureKind::Int))
        );
        assert_eq!(
            FieldValue::List(Vec::new()).kind(),
            FeatureKind::List(Box::new(FeatureKind::Null))
        );
    }

    #[test]
    fn inferred_features_preserve_field_order() {
        let record: Record =
            serde_json::from_str(r#"{"tgt_ids": [5], "src_ids": [3], "src_lang": "en"}"#).unwrap();
        let features = infer_features(&[record]);
        let names: Vec<&str> = features.keys().map(String::as_str).collect();
        assert_eq!(names, ["tgt_ids", "src_ids", "src_lang"]);
    }
}
