//! Engine feature extraction and tolerant engine matching.
//!
//! An engine is reduced to two features, displacement in liters and a fuel
//! category. Numeric remote fields win over anything parsed from text.

use once_cell::sync::Lazy;
use regex::Regex;
use vincheck_core::{FuelType, RawEngineData};

use crate::config::MatchConfig;
use crate::model::{liters_label, EngineMatchDetail};
use crate::normalize::normalize;

// Tried in order; first hit wins.
static DISPLACEMENT_PATTERNS: Lazy<[(Regex, f64); 3]> = Lazy::new(|| {
    [
        (Regex::new(r"(\d+\.?\d*)\s*(l|t)").expect("valid liter/turbo regex"), 1.0),
        (Regex::new(r"(\d+)\s*(cc|cubic centimeter)").expect("valid cc regex"), 1000.0),
        (Regex::new(r"(\d+\.?\d*)\s*liter").expect("valid liter regex"), 1.0),
    ]
});

const HYBRID: &str = "hybrid";

#[derive(Debug, Clone, PartialEq)]
pub struct EngineFeatures {
    /// Liters, rounded to one decimal.
    pub displacement: Option<f64>,
    pub fuel: Option<FuelType>,
    pub normalized_text: String,
}

pub fn extract_features(text: &str, raw: Option<&RawEngineData>) -> EngineFeatures {
    let normalized_text = normalize(text);

    if let Some(raw) = raw {
        let displacement = raw
            .displacement_l
            .or(raw.displacement_cc.map(|cc| cc / 1000.0))
            .map(round1);
        return EngineFeatures {
            displacement,
            fuel: raw.fuel.clone(),
            normalized_text,
        };
    }

    EngineFeatures {
        displacement: displacement_from_text(&normalized_text),
        fuel: FuelType::classify(&normalized_text),
        normalized_text,
    }
}

fn displacement_from_text(text: &str) -> Option<f64> {
    DISPLACEMENT_PATTERNS.iter().find_map(|(re, divisor)| {
        let caps = re.captures(text)?;
        let value: f64 = caps.get(1)?.as_str().parse().ok()?;
        Some(round1(value / divisor))
    })
}

/// Compare a reference engine description against a resolved one.
///
/// Fuel is checked before displacement and the first failure is the reported
/// reason. Absence on both sides of either feature counts as a match.
pub fn match_engine(
    local_text: &str,
    remote_text: &str,
    remote_raw: Option<&RawEngineData>,
    config: &MatchConfig,
) -> (bool, EngineMatchDetail) {
    if local_text.trim().is_empty() && remote_text.trim().is_empty() {
        return (
            true,
            EngineMatchDetail {
                fuel_type_match: true,
                displacement_match: true,
                local_fuel: None,
                remote_fuel: None,
                local_displacement: None,
                remote_displacement: None,
                displacement_error: None,
                hybrid_override: false,
                reason: "both engine descriptions are empty".to_string(),
            },
        );
    }

    let local = extract_features(local_text, None);
    let remote = extract_features(remote_text, remote_raw);

    let hybrid_override = local.fuel.as_ref().is_some_and(FuelType::is_hybrid)
        || remote.fuel.as_ref().is_some_and(FuelType::is_hybrid)
        || local.normalized_text.contains(HYBRID)
        || remote.normalized_text.contains(HYBRID);

    let mut detail = EngineMatchDetail {
        fuel_type_match: false,
        displacement_match: false,
        local_fuel: local.fuel.as_ref().map(|f| f.label().to_string()),
        remote_fuel: remote.fuel.as_ref().map(|f| f.label().to_string()),
        local_displacement: local.displacement,
        remote_displacement: remote.displacement,
        displacement_error: None,
        hybrid_override,
        reason: String::new(),
    };

    // ── Fuel ──
    if hybrid_override {
        detail.fuel_type_match = true;
    } else {
        match (&local.fuel, &remote.fuel) {
            (Some(l), Some(r)) if l == r => detail.fuel_type_match = true,
            (Some(_), Some(_)) => {
                detail.reason = format!(
                    "fuel type mismatch (reference: {}, resolved: {})",
                    fuel_label(&detail.local_fuel),
                    fuel_label(&detail.remote_fuel),
                );
                return (false, detail);
            }
            (None, None) => detail.fuel_type_match = true,
            _ => {
                detail.reason = format!(
                    "fuel type incomplete (reference: {}, resolved: {})",
                    fuel_label(&detail.local_fuel),
                    fuel_label(&detail.remote_fuel),
                );
                return (false, detail);
            }
        }
    }

    // ── Displacement ──
    match (local.displacement, remote.displacement) {
        (Some(l), Some(r)) => {
            let error = round1((l - r).abs());
            detail.displacement_error = Some(error);
            detail.displacement_match = config.within_tolerance((l - r).abs());
            if !detail.displacement_match {
                detail.reason = format!(
                    "displacement mismatch (reference: {}, resolved: {}, error {}, tolerance ±{:.1}L)",
                    liters_label(Some(l)),
                    liters_label(Some(r)),
                    liters_label(Some(error)),
                    config.displacement_tolerance_l,
                );
                return (false, detail);
            }
        }
        (None, None) => detail.displacement_match = true,
        (l, r) => {
            detail.reason = format!(
                "displacement incomplete (reference: {}, resolved: {})",
                liters_label(l),
                liters_label(r),
            );
            return (false, detail);
        }
    }

    detail.reason = if hybrid_override {
        format!(
            "matched (hybrid, fuel type not enforced: reference {}, resolved {}; displacement {} ≈ {})",
            fuel_label(&detail.local_fuel),
            fuel_label(&detail.remote_fuel),
            detail.local_displacement_label(),
            detail.remote_displacement_label(),
        )
    } else {
        format!(
            "matched (fuel type {}, displacement {} ≈ {})",
            fuel_label(&detail.local_fuel),
            detail.local_displacement_label(),
            detail.remote_displacement_label(),
        )
    };
    (true, detail)
}

fn fuel_label(fuel: &Option<String>) -> &str {
    fuel.as_deref().unwrap_or("none")
}

fn round1(x: f64) -> f64 {
    (x * 10.0).round() / 10.0
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cfg() -> MatchConfig {
        MatchConfig::default()
    }

    fn raw(liters: Option<f64>, cc: Option<f64>, fuel: Option<FuelType>) -> RawEngineData {
        RawEngineData {
            displacement_l: liters,
            displacement_cc: cc,
            fuel,
        }
    }

    #[test]
    fn text_patterns_in_order() {
        assert_eq!(extract_features("2.0L I4 Gasoline", None).displacement, Some(2.0));
        assert_eq!(extract_features("1.5T Turbo", None).displacement, Some(1.5));
        assert_eq!(extract_features("1998 cc diesel", None).displacement, Some(2.0));
        assert_eq!(extract_features("3.5 Liter V6", None).displacement, Some(3.5));
        assert_eq!(extract_features("V6", None).displacement, None);
    }

    #[test]
    fn fuel_from_text() {
        assert_eq!(extract_features("2.0L Petrol", None).fuel, Some(FuelType::Gasoline));
        assert_eq!(extract_features("2.2 Diesel", None).fuel, Some(FuelType::Diesel));
        assert_eq!(extract_features("Electric motor", None).fuel, Some(FuelType::Electric));
        assert_eq!(extract_features("2.5L I4", None).fuel, None);
    }

    #[test]
    fn raw_source_is_authoritative() {
        let source = raw(Some(2.488), Some(1998.0), Some(FuelType::Diesel));
        let features = extract_features("Displacement: 9.9L; Fuel Type: Gasoline", Some(&source));
        assert_eq!(features.displacement, Some(2.5));
        assert_eq!(features.fuel, Some(FuelType::Diesel));

        let cc_only = raw(None, Some(1598.0), None);
        assert_eq!(extract_features("", Some(&cc_only)).displacement, Some(1.6));
    }

    #[test]
    fn equal_displacement_reports_zero_error() {
        let source = raw(Some(2.5), None, Some(FuelType::Gasoline));
        let (ok, detail) = match_engine(
            "2.5L Gasoline",
            "Displacement: 2.5L; Fuel Type: Gasoline",
            Some(&source),
            &cfg(),
        );
        assert!(ok);
        assert!(detail.displacement_match);
        assert_eq!(detail.displacement_error_label(), "0.0L");
    }

    #[test]
    fn hybrid_text_overrides_fuel_category() {
        let source = raw(Some(2.0), None, Some(FuelType::Electric));
        let (ok, detail) = match_engine(
            "2.0L Hybrid",
            "Displacement: 2.0L; Fuel Type: Electric",
            Some(&source),
            &cfg(),
        );
        assert!(ok);
        assert!(detail.fuel_type_match);
        assert!(detail.hybrid_override);
    }

    #[test]
    fn fuel_mismatch_short_circuits() {
        let source = raw(Some(2.0), None, Some(FuelType::Diesel));
        let (ok, detail) = match_engine("3.0L Gasoline", "", Some(&source), &cfg());
        assert!(!ok);
        assert!(!detail.fuel_type_match);
        assert!(!detail.displacement_match);
        assert!(detail.reason.starts_with("fuel type mismatch"));
    }

    #[test]
    fn one_sided_absence_is_incomplete() {
        let source = raw(Some(2.0), None, None);
        let (ok, detail) = match_engine("2.0L Gasoline", "Displacement: 2.0L; Fuel Type: N/A", Some(&source), &cfg());
        assert!(!ok);
        assert!(detail.reason.starts_with("fuel type incomplete"));

        let source = raw(None, None, Some(FuelType::Gasoline));
        let (ok, detail) = match_engine("2.0L Gasoline", "x", Some(&source), &cfg());
        assert!(!ok);
        assert!(detail.fuel_type_match);
        assert!(detail.reason.starts_with("displacement incomplete"));
    }

    #[test]
    fn tolerance_window() {
        let near = raw(Some(2.7), None, Some(FuelType::Gasoline));
        let (ok, detail) = match_engine("2.5L Gasoline", "x", Some(&near), &cfg());
        assert!(ok);
        assert_eq!(detail.displacement_error_label(), "0.2L");

        let far = raw(Some(2.8), None, Some(FuelType::Gasoline));
        let (ok, detail) = match_engine("2.5L Gasoline", "x", Some(&far), &cfg());
        assert!(!ok);
        assert!(detail.reason.contains("error 0.3L"));

        let loose = MatchConfig::new(0.5).unwrap();
        assert!(match_engine("2.5L Gasoline", "x", Some(&far), &loose).0);
    }

    #[test]
    fn both_empty_is_vacuous_match() {
        let (ok, detail) = match_engine("  ", "", None, &cfg());
        assert!(ok);
        assert!(detail.fuel_type_match && detail.displacement_match);
    }

    #[test]
    fn text_only_both_sides() {
        let (ok, _) = match_engine("2.0L Gasoline", "Displacement: 2.0L; Fuel Type: Gasoline", None, &cfg());
        assert!(ok);
    }
}
