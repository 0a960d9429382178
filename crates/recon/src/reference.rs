//! Reference dataset loader.
//!
//! Input is a JSON object keyed by VIN; each value is an object holding the
//! five comparable fields. Malformed entries are skipped, never fatal.

use std::collections::BTreeMap;
use std::path::Path;

use serde::Serialize;
use serde_json::Value;

use crate::error::ReconError;
use crate::model::{ComparableField, ReferenceRecord};

/// Older datasets use a plain `Manufacturer` key.
const MANUFACTURER_ALIAS: &str = "Manufacturer";

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SkippedRecord {
    pub vin: String,
    pub reason: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ReferenceDataset {
    pub records: BTreeMap<String, ReferenceRecord>,
    pub skipped: Vec<SkippedRecord>,
}

impl ReferenceDataset {
    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

pub fn load_reference_file(path: &Path) -> Result<ReferenceDataset, ReconError> {
    let text = std::fs::read_to_string(path)
        .map_err(|e| ReconError::Io(format!("{}: {e}", path.display())))?;
    load_reference_dataset(&text)
}

pub fn load_reference_dataset(json: &str) -> Result<ReferenceDataset, ReconError> {
    let root: Value = serde_json::from_str(json.trim_start_matches('\u{feff}'))
        .map_err(|e| ReconError::DatasetParse(e.to_string()))?;

    let entries = match root {
        Value::Object(entries) => entries,
        other => {
            return Err(ReconError::DatasetShape {
                found: json_kind(&other),
            })
        }
    };

    let mut dataset = ReferenceDataset::default();
    for (vin, entry) in entries {
        match parse_entry(&entry) {
            Ok(record) => {
                dataset.records.insert(vin, record);
            }
            Err(reason) => {
                tracing::warn!(vin = %vin, reason = %reason, "skipping reference record");
                dataset.skipped.push(SkippedRecord { vin, reason });
            }
        }
    }

    tracing::debug!(
        loaded = dataset.records.len(),
        skipped = dataset.skipped.len(),
        "reference dataset loaded"
    );
    Ok(dataset)
}

fn parse_entry(entry: &Value) -> Result<ReferenceRecord, String> {
    let Value::Object(map) = entry else {
        return Err(format!("expected an object, found {}", json_kind(entry)));
    };

    let mut missing = Vec::new();
    let mut take = |field: ComparableField| -> String {
        let value = map.get(field.label()).or_else(|| match field {
            ComparableField::Manufacturer => map.get(MANUFACTURER_ALIAS),
            _ => None,
        });
        match value {
            Some(v) => scalar_text(v),
            None => {
                missing.push(field.label());
                String::new()
            }
        }
    };

    let record = ReferenceRecord {
        manufacturer: take(ComparableField::Manufacturer),
        year: take(ComparableField::Year),
        model: take(ComparableField::Model),
        engine: take(ComparableField::Engine),
        transmission: take(ComparableField::Transmission),
    };

    if missing.is_empty() {
        Ok(record)
    } else {
        Err(format!("missing field(s): {}", missing.join(", ")))
    }
}

fn scalar_text(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
