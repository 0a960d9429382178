use std::fmt;

use serde::Serialize;

use crate::field::{FieldValue, NOT_AVAILABLE};
use crate::fuel::FuelType;
use crate::vin::Vin;

// ---------------------------------------------------------------------------
// Engine
// ---------------------------------------------------------------------------

/// Standardized displacement.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum Displacement {
    /// Liters, rounded to one decimal.
    Liters(f64),
    /// Source value that could not be read as a number, kept as text.
    Raw(String),
    NotAvailable,
}

impl fmt::Display for Displacement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Liters(l) => write!(f, "{l:.1}L"),
            Self::Raw(text) => f.write_str(text),
            Self::NotAvailable => f.write_str(NOT_AVAILABLE),
        }
    }
}

/// Numeric engine fields as the remote service reported them.
///
/// The engine matcher treats these as authoritative over any text rendering.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct RawEngineData {
    pub displacement_l: Option<f64>,
    pub displacement_cc: Option<f64>,
    pub fuel: Option<FuelType>,
}

/// Engine description: displacement plus fuel category.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EngineSpec {
    pub displacement: Displacement,
    pub fuel: Option<FuelType>,
}

impl EngineSpec {
    pub fn unavailable() -> Self {
        Self {
            displacement: Displacement::NotAvailable,
            fuel: None,
        }
    }

    pub fn is_unavailable(&self) -> bool {
        self.displacement == Displacement::NotAvailable && self.fuel.is_none()
    }
}

impl fmt::Display for EngineSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let fuel = self.fuel.as_ref().map(FuelType::label).unwrap_or(NOT_AVAILABLE);
        write!(f, "Displacement: {}; Fuel Type: {}", self.displacement, fuel)
    }
}

// ---------------------------------------------------------------------------
// Transmission
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Transmission {
    #[serde(rename = "CVT")]
    Cvt,
    Automatic,
    Manual,
    Unresolved,
}

impl Transmission {
    /// Collapse a raw transmission description. CVT is checked before
    /// Automatic, Automatic before Manual/Standard.
    pub fn collapse(raw: &str) -> Self {
        if raw.contains("CVT") {
            Self::Cvt
        } else if raw.contains("Automatic") {
            Self::Automatic
        } else if raw.contains("Manual") || raw.contains("Standard") {
            Self::Manual
        } else {
            Self::Unresolved
        }
    }

    pub fn is_resolved(&self) -> bool {
        !matches!(self, Self::Unresolved)
    }
}

impl fmt::Display for Transmission {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Cvt => write!(f, "CVT"),
            Self::Automatic => write!(f, "Automatic"),
            Self::Manual => write!(f, "Manual"),
            Self::Unresolved => f.write_str(NOT_AVAILABLE),
        }
    }
}

// ---------------------------------------------------------------------------
// Provenance
// ---------------------------------------------------------------------------

/// Where a record's fields came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DataSource {
    Remote,
    RemoteManufacturerFallback,
    RemoteYearFallback,
    RemoteManufacturerYearFallback,
    StructuralOnly,
}

impl DataSource {
    /// Provenance for a remote record given which fields were refilled.
    pub fn remote_with_fallback(manufacturer: bool, year: bool) -> Self {
        match (manufacturer, year) {
            (false, false) => Self::Remote,
            (true, false) => Self::RemoteManufacturerFallback,
            (false, true) => Self::RemoteYearFallback,
            (true, true) => Self::RemoteManufacturerYearFallback,
        }
    }

    pub fn is_structural_only(&self) -> bool {
        matches!(self, Self::StructuralOnly)
    }
}

impl fmt::Display for DataSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Remote => write!(f, "Remote"),
            Self::RemoteManufacturerFallback => {
                write!(f, "Remote + Structural Decode (Manufacturer Fallback)")
            }
            Self::RemoteYearFallback => write!(f, "Remote + Structural Decode (Year Fallback)"),
            Self::RemoteManufacturerYearFallback => {
                write!(f, "Remote + Structural Decode (Manufacturer, Year Fallback)")
            }
            Self::StructuralOnly => write!(f, "Structural Decode (Remote Unavailable)"),
        }
    }
}

// ---------------------------------------------------------------------------
// Record
// ---------------------------------------------------------------------------

/// Canonical vehicle record produced by resolution.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct VehicleRecord {
    pub vin: Vin,
    pub manufacturer: FieldValue,
    pub year: FieldValue,
    pub model: FieldValue,
    pub engine: EngineSpec,
    pub transmission: Transmission,
    pub data_source: DataSource,
    /// Numeric engine source, present only when the remote service answered.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub raw_engine: Option<RawEngineData>,
    pub engine_configuration: FieldValue,
    pub other_engine_info: FieldValue,
}

impl VehicleRecord {
    /// A record with nothing resolved yet.
    pub fn empty(vin: Vin, data_source: DataSource) -> Self {
        Self {
            vin,
            manufacturer: FieldValue::NotAvailable,
            year: FieldValue::NotAvailable,
            model: FieldValue::NotAvailable,
            engine: EngineSpec::unavailable(),
            transmission: Transmission::Unresolved,
            data_source,
            raw_engine: None,
            engine_configuration: FieldValue::NotAvailable,
            other_engine_info: FieldValue::NotAvailable,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn engine_string_format() {
        let engine = EngineSpec {
            displacement: Displacement::Liters(2.0),
            fuel: Some(FuelType::Gasoline),
        };
        assert_eq!(engine.to_string(), "Displacement: 2.0L; Fuel Type: Gasoline");
        assert_eq!(
            EngineSpec::unavailable().to_string(),
            "Displacement: N/A; Fuel Type: N/A",
        );
    }

    #[test]
    fn transmission_priority() {
        assert_eq!(Transmission::collapse("Continuously Variable Transmission (CVT)"), Transmission::Cvt);
        assert_eq!(Transmission::collapse("Automatic CVT"), Transmission::Cvt);
        assert_eq!(Transmission::collapse("Automatic"), Transmission::Automatic);
        assert_eq!(Transmission::collapse("Manual/Standard"), Transmission::Manual);
        assert_eq!(Transmission::collapse("Standard"), Transmission::Manual);
        assert_eq!(Transmission::collapse("Dual-Clutch (DCT)"), Transmission::Unresolved);
    }

    #[test]
    fn provenance_enumerates_both_fallbacks() {
        assert_eq!(DataSource::remote_with_fallback(false, false), DataSource::Remote);
        assert_eq!(
            DataSource::remote_with_fallback(true, true),
            DataSource::RemoteManufacturerYearFallback,
        );
        assert!(DataSource::remote_with_fallback(true, true).to_string().contains("Manufacturer, Year"));
    }
}
