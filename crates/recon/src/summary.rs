use std::collections::BTreeMap;

use serde::Serialize;

use crate::model::{ComparableField, ComparisonVerdict, MatchSource};

const UNKNOWN_MANUFACTURER: &str = "Unknown";

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FieldStats {
    pub field: ComparableField,
    pub matched: usize,
    pub total: usize,
    pub rate: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct EngineCoreStats {
    pub fuel_matched: usize,
    pub displacement_matched: usize,
    pub both_matched: usize,
    pub fuel_rate: f64,
    pub displacement_rate: f64,
    pub both_rate: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ManufacturerStats {
    pub total: usize,
    pub matched: usize,
    pub engine_matched: usize,
    pub fuel_matched: usize,
    pub displacement_matched: usize,
    pub accuracy: f64,
    pub engine_rate: f64,
    pub fuel_rate: f64,
    pub displacement_rate: f64,
}

/// Aggregate statistics over one batch run.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BatchSummary {
    pub total: usize,
    /// Verdicts that are not `Error`.
    pub valid: usize,
    pub fully_matched: usize,
    pub structural_matched: usize,
    pub accuracy: f64,
    pub average_match_rate: f64,
    pub fields: Vec<FieldStats>,
    pub engine: EngineCoreStats,
    /// Keyed by the reference manufacturer.
    pub manufacturers: BTreeMap<String, ManufacturerStats>,
    /// Valid verdicts without an overall match, in input order.
    pub mismatched: Vec<String>,
}

/// Compute summary statistics from per-VIN verdicts.
pub fn compute_summary(verdicts: &[ComparisonVerdict]) -> BatchSummary {
    let valid: Vec<&ComparisonVerdict> = verdicts.iter().filter(|v| !v.is_error()).collect();
    let n = valid.len();

    let mut fully_matched = 0;
    let mut structural_matched = 0;
    let mut rate_sum = 0.0;
    let mut field_counts: BTreeMap<ComparableField, usize> = BTreeMap::new();
    let mut engine = EngineCoreStats::default();
    let mut manufacturers: BTreeMap<String, ManufacturerStats> = BTreeMap::new();
    let mut mismatched = Vec::new();

    for v in &valid {
        rate_sum += v.match_rate;
        if v.overall_match {
            fully_matched += 1;
            if v.match_source == MatchSource::StructuralFallback {
                structural_matched += 1;
            }
        } else {
            mismatched.push(v.vin.clone());
        }

        for f in v.fields.iter().filter(|f| f.matched) {
            *field_counts.entry(f.field).or_insert(0) += 1;
        }

        let (fuel, displacement) = v
            .engine_detail()
            .map(|d| (d.fuel_type_match, d.displacement_match))
            .unwrap_or((false, false));
        engine.fuel_matched += fuel as usize;
        engine.displacement_matched += displacement as usize;
        engine.both_matched += (fuel && displacement) as usize;

        let key = if v.reference_manufacturer.trim().is_empty() {
            UNKNOWN_MANUFACTURER.to_string()
        } else {
            v.reference_manufacturer.clone()
        };
        let stats = manufacturers.entry(key).or_default();
        stats.total += 1;
        stats.matched += v.overall_match as usize;
        stats.engine_matched += v
            .field(ComparableField::Engine)
            .is_some_and(|f| f.matched) as usize;
        stats.fuel_matched += fuel as usize;
        stats.displacement_matched += displacement as usize;
    }

    engine.fuel_rate = percent(engine.fuel_matched, n);
    engine.displacement_rate = percent(engine.displacement_matched, n);
    engine.both_rate = percent(engine.both_matched, n);

    for stats in manufacturers.values_mut() {
        stats.accuracy = percent(stats.matched, stats.total);
        stats.engine_rate = percent(stats.engine_matched, stats.total);
        stats.fuel_rate = percent(stats.fuel_matched, stats.total);
        stats.displacement_rate = percent(stats.displacement_matched, stats.total);
    }

    let fields = ComparableField::ALL
        .iter()
        .map(|&field| {
            let matched = field_counts.get(&field).copied().unwrap_or(0);
            FieldStats {
                field,
                matched,
                total: n,
                rate: percent(matched, n),
            }
        })
        .collect();

    BatchSummary {
        total: verdicts.len(),
        valid: n,
        fully_matched,
        structural_matched,
        accuracy: percent(fully_matched, n),
        average_match_rate: if n == 0 { 0.0 } else { round2(rate_sum / n as f64) },
        fields,
        engine,
        manufacturers,
        mismatched,
    }
}

fn percent(part: usize, whole: usize) -> f64 {
    if whole == 0 {
        0.0
    } else {
        round2(part as f64 / whole as f64 * 100.0)
    }
}

fn round2(x: f64) -> f64 {
    (x * 100.0).round() / 100.0
}
