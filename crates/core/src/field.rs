use std::fmt;

use serde::{Deserialize, Serialize};

/// Marker rendered for a field the remote service left empty.
pub const NOT_AVAILABLE: &str = "N/A";

/// Marker rendered for a field the structural tables could not map.
pub const UNRECOGNIZED: &str = "unrecognized";

/// A vehicle attribute that may not have been resolved.
///
/// Unresolved states are explicit variants so formatting and comparison code
/// can never mistake them for a legitimately empty string.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", content = "value", rename_all = "snake_case")]
pub enum FieldValue {
    Resolved(String),
    /// The remote service returned nothing for this field.
    NotAvailable,
    /// The structural decoder has no table entry for this code.
    Unrecognized,
}

impl FieldValue {
    /// Build from a possibly-missing raw value. Blank strings count as missing.
    pub fn from_raw(raw: Option<&str>) -> Self {
        match raw.map(str::trim) {
            Some(v) if !v.is_empty() => Self::Resolved(v.to_string()),
            _ => Self::NotAvailable,
        }
    }

    pub fn is_resolved(&self) -> bool {
        matches!(self, Self::Resolved(_))
    }

    pub fn as_resolved(&self) -> Option<&str> {
        match self {
            Self::Resolved(v) => Some(v),
            _ => None,
        }
    }

    pub fn map_resolved(self, f: impl FnOnce(String) -> String) -> Self {
        match self {
            Self::Resolved(v) => Self::Resolved(f(v)),
            other => other,
        }
    }
}

impl fmt::Display for FieldValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Resolved(v) => f.write_str(v),
            Self::NotAvailable => f.write_str(NOT_AVAILABLE),
            Self::Unrecognized => f.write_str(UNRECOGNIZED),
        }
    }
}
