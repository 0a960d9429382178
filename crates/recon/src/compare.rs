//! Field-by-field comparison of a reference record against a resolved one.

use vincheck_core::{decode_structural, FieldValue, VehicleRecord, Vin};

use crate::config::MatchConfig;
use crate::engine::match_engine;
use crate::model::{
    ComparableField, ComparisonVerdict, FieldComparison, MatchSource, ReferenceRecord,
};
use crate::normalize::normalize;

/// Fields an overall match needs, Engine among them.
const MIN_MATCHED_FIELDS: usize = 4;
const NO_DATA: &str = "no data to compare";

/// What the reference is compared against.
struct Source<'a> {
    manufacturer: Option<FieldValue>,
    year: Option<FieldValue>,
    record: Option<&'a VehicleRecord>,
    kind: MatchSource,
}

pub fn compare(
    reference: &ReferenceRecord,
    resolved: Option<&VehicleRecord>,
    vin: &str,
    config: &MatchConfig,
) -> ComparisonVerdict {
    let source = match resolved {
        Some(record) if !record.data_source.is_structural_only() => Source {
            manufacturer: Some(record.manufacturer.clone()),
            year: Some(record.year.clone()),
            record: Some(record),
            kind: MatchSource::Remote,
        },
        // Structural-only records carry nothing beyond manufacturer and year.
        Some(record) => Source {
            manufacturer: Some(record.manufacturer.clone()),
            year: Some(record.year.clone()),
            record: None,
            kind: MatchSource::StructuralFallback,
        },
        None => match Vin::parse(vin.trim()) {
            Ok(parsed) => {
                let structural = decode_structural(&parsed);
                Source {
                    manufacturer: Some(structural.manufacturer),
                    year: Some(structural.year),
                    record: None,
                    kind: MatchSource::StructuralFallback,
                }
            }
            Err(e) => {
                tracing::warn!(vin, error = %e, "no resolved data and no structural decode");
                return ComparisonVerdict::error(
                    vin,
                    &reference.manufacturer,
                    format!("no resolved data and structural decode impossible: {e}"),
                );
            }
        },
    };

    let fields: Vec<FieldComparison> = ComparableField::ALL
        .iter()
        .map(|&field| compare_field(field, reference, &source, config))
        .collect();

    let matched = fields.iter().filter(|f| f.matched).count();
    let engine_matched = fields
        .iter()
        .any(|f| f.field == ComparableField::Engine && f.matched);
    let total = ComparableField::ALL.len();
    let match_rate = round2(matched as f64 / total as f64 * 100.0);
    let overall_match = matched >= MIN_MATCHED_FIELDS && engine_matched;

    let source_name = match source.kind {
        MatchSource::StructuralFallback => "structural decode",
        _ => "remote data",
    };
    let explanation =
        format!("compared {total} fields using {source_name}: {matched} matched, match rate {match_rate}%");

    tracing::debug!(vin, matched, overall_match, source = %source.kind, "compared record");

    ComparisonVerdict {
        vin: vin.to_string(),
        reference_manufacturer: reference.manufacturer.clone(),
        fields,
        match_rate,
        overall_match,
        match_source: source.kind,
        explanation,
    }
}

fn compare_field(
    field: ComparableField,
    reference: &ReferenceRecord,
    source: &Source<'_>,
    config: &MatchConfig,
) -> FieldComparison {
    let reference_value = reference.value(field).to_string();
    let normalized_reference = normalize(&reference_value);

    let resolved: Option<FieldValue> = match field {
        ComparableField::Manufacturer => source.manufacturer.clone(),
        ComparableField::Year => source.year.clone(),
        ComparableField::Model => source.record.map(|r| r.model.clone()),
        ComparableField::Transmission => source.record.map(|r| {
            if r.transmission.is_resolved() {
                FieldValue::Resolved(r.transmission.to_string())
            } else {
                FieldValue::NotAvailable
            }
        }),
        ComparableField::Engine => source.record.map(|r| {
            if r.engine.is_unavailable() {
                FieldValue::NotAvailable
            } else {
                FieldValue::Resolved(r.engine.to_string())
            }
        }),
    };

    let Some(resolved) = resolved else {
        return FieldComparison {
            field,
            reference_value,
            resolved_value: NO_DATA.to_string(),
            normalized_reference,
            normalized_resolved: String::new(),
            matched: true,
            no_data: true,
            mismatch_reason: None,
            engine: None,
        };
    };

    let resolved_value = resolved.to_string();
    let resolved_text = resolved.as_resolved().unwrap_or("");
    let normalized_resolved = normalize(resolved_text);

    let mut engine = None;
    let matched = match (field, resolved.as_resolved()) {
        (ComparableField::Engine, _) => {
            let raw = source.record.and_then(|r| r.raw_engine.as_ref());
            let (ok, detail) = match_engine(&reference_value, resolved_text, raw, config);
            engine = Some(detail);
            ok
        }
        // An unresolved value only agrees with an empty reference.
        (_, None) => normalized_reference.is_empty(),
        (ComparableField::Manufacturer | ComparableField::Model, Some(_)) => {
            contains_either(&normalized_reference, &normalized_resolved)
        }
        (ComparableField::Year, Some(year)) => reference_value.trim() == year.trim(),
        (ComparableField::Transmission, Some(_)) => {
            transmission_match(&normalized_reference, &normalized_resolved)
        }
    };

    let mismatch_reason = if matched {
        None
    } else if let Some(detail) = &engine {
        Some(detail.reason.clone())
    } else if field == ComparableField::Year {
        Some(format!(
            "year mismatch (reference: {}, resolved: {})",
            reference_value.trim(),
            resolved_value
        ))
    } else {
        Some(format!(
            "{} mismatch (reference: {}, resolved: {})",
            field.label().to_lowercase(),
            normalized_reference,
            normalized_resolved
        ))
    };

    FieldComparison {
        field,
        reference_value,
        resolved_value,
        normalized_reference,
        normalized_resolved,
        matched,
        no_data: false,
        mismatch_reason,
        engine,
    }
}

fn contains_either(a: &str, b: &str) -> bool {
    a.contains(b) || b.contains(a)
}

fn transmission_match(reference: &str, resolved: &str) -> bool {
    let cvt_as_automatic = (reference.contains("cvt") && resolved.contains("automatic"))
        || (resolved.contains("cvt") && reference.contains("automatic"));
    let both_manual = reference.contains("manual") && resolved.contains("manual");
    cvt_as_automatic || both_manual || contains_either(reference, resolved)
}

fn round2(x: f64) -> f64 {
    (x * 100.0).round() / 100.0
}
