use std::fmt;

use serde::{Deserialize, Serialize};

/// Canonical fuel category.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FuelType {
    Gasoline,
    Diesel,
    Electric,
    Hybrid,
    /// Anything the keyword tables don't cover, kept verbatim.
    Other(String),
}

// Checked in this order; first hit wins.
const GASOLINE_KEYWORDS: [&str; 4] = ["gas", "petrol", "regular unleaded", "premium unleaded"];
const DIESEL_KEYWORDS: [&str; 1] = ["diesel"];
const ELECTRIC_KEYWORDS: [&str; 1] = ["electric"];
const HYBRID_KEYWORDS: [&str; 1] = ["hybrid"];

impl FuelType {
    /// Case-insensitive keyword classification into one of the four known
    /// categories. `None` when no keyword matches.
    pub fn classify(text: &str) -> Option<Self> {
        let lower = text.trim().to_lowercase();
        if lower.is_empty() {
            return None;
        }
        let hit = |keywords: &[&str]| keywords.iter().any(|kw| lower.contains(kw));

        if hit(&GASOLINE_KEYWORDS) {
            Some(Self::Gasoline)
        } else if hit(&DIESEL_KEYWORDS) {
            Some(Self::Diesel)
        } else if hit(&ELECTRIC_KEYWORDS) {
            Some(Self::Electric)
        } else if hit(&HYBRID_KEYWORDS) {
            Some(Self::Hybrid)
        } else {
            None
        }
    }

    /// Classify a raw remote value, passing unknown values through as `Other`.
    /// Blank input yields `None`.
    pub fn from_raw(raw: &str) -> Option<Self> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return None;
        }
        Some(Self::classify(trimmed).unwrap_or_else(|| Self::Other(trimmed.to_string())))
    }

    pub fn is_hybrid(&self) -> bool {
        matches!(self, Self::Hybrid)
    }

    pub fn label(&self) -> &str {
        match self {
            Self::Gasoline => "Gasoline",
            Self::Diesel => "Diesel",
            Self::Electric => "Electric",
            Self::Hybrid => "Hybrid",
            Self::Other(raw) => raw,
        }
    }
}

impl fmt::Display for FuelType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}
