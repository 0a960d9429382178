use std::fmt;

use serde::Serialize;

// ---------------------------------------------------------------------------
// Input
// ---------------------------------------------------------------------------

/// One reference vehicle as held in the local dataset. Every field is plain
/// text; a `null` in the source becomes `""`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ReferenceRecord {
    #[serde(rename = "Manufacturer/Make")]
    pub manufacturer: String,
    #[serde(rename = "Year")]
    pub year: String,
    #[serde(rename = "Model")]
    pub model: String,
    #[serde(rename = "Engine")]
    pub engine: String,
    #[serde(rename = "Transmission")]
    pub transmission: String,
}

impl ReferenceRecord {
    pub fn value(&self, field: ComparableField) -> &str {
        match field {
            ComparableField::Manufacturer => &self.manufacturer,
            ComparableField::Year => &self.year,
            ComparableField::Model => &self.model,
            ComparableField::Engine => &self.engine,
            ComparableField::Transmission => &self.transmission,
        }
    }
}

// ---------------------------------------------------------------------------
// Fields
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub enum ComparableField {
    #[serde(rename = "Manufacturer/Make")]
    Manufacturer,
    Year,
    Model,
    Engine,
    Transmission,
}

impl ComparableField {
    pub const ALL: [ComparableField; 5] = [
        Self::Manufacturer,
        Self::Year,
        Self::Model,
        Self::Engine,
        Self::Transmission,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            Self::Manufacturer => "Manufacturer/Make",
            Self::Year => "Year",
            Self::Model => "Model",
            Self::Engine => "Engine",
            Self::Transmission => "Transmission",
        }
    }
}

impl fmt::Display for ComparableField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

// ---------------------------------------------------------------------------
// Engine match
// ---------------------------------------------------------------------------

/// Breakdown of an engine comparison.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EngineMatchDetail {
    pub fuel_type_match: bool,
    pub displacement_match: bool,
    pub local_fuel: Option<String>,
    pub remote_fuel: Option<String>,
    pub local_displacement: Option<f64>,
    pub remote_displacement: Option<f64>,
    /// `|local - remote|` in liters, when both sides have a displacement.
    pub displacement_error: Option<f64>,
    pub hybrid_override: bool,
    pub reason: String,
}

impl EngineMatchDetail {
    pub fn displacement_error_label(&self) -> String {
        liters_label(self.displacement_error)
    }

    pub fn local_displacement_label(&self) -> String {
        liters_label(self.local_displacement)
    }

    pub fn remote_displacement_label(&self) -> String {
        liters_label(self.remote_displacement)
    }
}

pub(crate) fn liters_label(value: Option<f64>) -> String {
    match value {
        Some(l) => format!("{l:.1}L"),
        None => "none".to_string(),
    }
}

// ---------------------------------------------------------------------------
// Verdict
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchSource {
    Remote,
    StructuralFallback,
    Error,
}

impl fmt::Display for MatchSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Remote => write!(f, "remote"),
            Self::StructuralFallback => write!(f, "structural_fallback"),
            Self::Error => write!(f, "error"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FieldComparison {
    pub field: ComparableField,
    pub reference_value: String,
    pub resolved_value: String,
    pub normalized_reference: String,
    pub normalized_resolved: String,
    pub matched: bool,
    /// The comparison source never populates this field; counted as matched.
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub no_data: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mismatch_reason: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub engine: Option<EngineMatchDetail>,
}

/// Outcome of comparing one reference record against its resolution.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ComparisonVerdict {
    pub vin: String,
    /// Reference manufacturer, kept for per-manufacturer statistics.
    pub reference_manufacturer: String,
    /// One entry per comparable field, in `ComparableField::ALL` order.
    /// Empty for an `Error` verdict.
    pub fields: Vec<FieldComparison>,
    pub match_rate: f64,
    pub overall_match: bool,
    pub match_source: MatchSource,
    pub explanation: String,
}

impl ComparisonVerdict {
    /// Terminal verdict for a VIN that could not be compared at all.
    pub fn error(vin: &str, reference_manufacturer: &str, explanation: impl Into<String>) -> Self {
        Self {
            vin: vin.to_string(),
            reference_manufacturer: reference_manufacturer.to_string(),
            fields: Vec::new(),
            match_rate: 0.0,
            overall_match: false,
            match_source: MatchSource::Error,
            explanation: explanation.into(),
        }
    }

    pub fn is_error(&self) -> bool {
        self.match_source == MatchSource::Error
    }

    pub fn field(&self, field: ComparableField) -> Option<&FieldComparison> {
        self.fields.iter().find(|f| f.field == field)
    }

    pub fn matched_count(&self) -> usize {
        self.fields.iter().filter(|f| f.matched).count()
    }

    pub fn engine_detail(&self) -> Option<&EngineMatchDetail> {
        self.field(ComparableField::Engine).and_then(|f| f.engine.as_ref())
    }
}
