use std::path::PathBuf;

use vincheck_core::{
    DataSource, Displacement, EngineSpec, FieldValue, FuelType, RawEngineData, Transmission,
    VehicleRecord, Vin,
};
use vincheck_recon::{
    compare, compute_summary, load_reference_file, ComparableField, ComparisonVerdict,
    MatchConfig, MatchSource, ReferenceDataset,
};

fn fixtures_dir() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures")
}

fn dataset() -> ReferenceDataset {
    load_reference_file(&fixtures_dir().join("reference.json")).unwrap()
}

fn remote_record(
    vin: &str,
    make: &str,
    year: &str,
    model: &str,
    liters: f64,
    fuel: FuelType,
    transmission: Transmission,
) -> VehicleRecord {
    let mut record = VehicleRecord::empty(Vin::parse(vin).unwrap(), DataSource::Remote);
    record.manufacturer = FieldValue::Resolved(make.into());
    record.year = FieldValue::Resolved(year.into());
    record.model = FieldValue::Resolved(model.into());
    record.engine = EngineSpec {
        displacement: Displacement::Liters(liters),
        fuel: Some(fuel.clone()),
    };
    record.raw_engine = Some(RawEngineData {
        displacement_l: Some(liters),
        displacement_cc: None,
        fuel: Some(fuel),
    });
    record.transmission = transmission;
    record
}

fn run_batch(dataset: &ReferenceDataset) -> Vec<ComparisonVerdict> {
    let config = MatchConfig::default();
    let resolved = [
        remote_record(
            "1HGCV1F34KA123456",
            "Honda",
            "2019",
            "Accord",
            1.5,
            FuelType::Gasoline,
            Transmission::Cvt,
        ),
        // Remote misreports the hybrid as electric.
        remote_record(
            "4T1B31HK5KU000001",
            "Toyota",
            "2019",
            "Camry",
            2.5,
            FuelType::Electric,
            Transmission::Automatic,
        ),
        // Engine displacement far off: four fields agree but engine does not.
        remote_record(
            "WBA8E9G5XJN000003",
            "Bmw",
            "2018",
            "330i",
            2.0,
            FuelType::Gasoline,
            Transmission::Automatic,
        ),
    ];

    dataset
        .records
        .iter()
        .map(|(vin, reference)| {
            let record = resolved.iter().find(|r| r.vin.as_str() == vin);
            compare(reference, record, vin, &config)
        })
        .collect()
}

#[test]
fn loader_skips_malformed_entries() {
    let dataset = dataset();
    assert_eq!(dataset.len(), 4);
    assert_eq!(dataset.skipped.len(), 2);
    assert_eq!(dataset.records["5YJ3E1EA7KF000002"].year, "2019");
}

#[test]
fn batch_verdicts() {
    let dataset = dataset();
    let verdicts = run_batch(&dataset);
    let by_vin = |vin: &str| verdicts.iter().find(|v| v.vin == vin).unwrap();

    let honda = by_vin("1HGCV1F34KA123456");
    assert!(honda.overall_match);
    assert_eq!(honda.match_source, MatchSource::Remote);

    let toyota = by_vin("4T1B31HK5KU000001");
    assert!(toyota.engine_detail().unwrap().hybrid_override);
    assert!(toyota.overall_match);

    let bmw = by_vin("WBA8E9G5XJN000003");
    assert_eq!(bmw.matched_count(), 4);
    assert!(!bmw.overall_match);
    let engine = bmw.field(ComparableField::Engine).unwrap();
    assert!(engine.mismatch_reason.as_deref().unwrap().contains("displacement mismatch"));

    // No resolution at all: compared against the structural decode.
    let tesla = by_vin("5YJ3E1EA7KF000002");
    assert_eq!(tesla.match_source, MatchSource::StructuralFallback);
    assert!(tesla.overall_match);
}

#[test]
fn batch_summary() {
    let verdicts = run_batch(&dataset());
    let summary = compute_summary(&verdicts);

    assert_eq!(summary.total, 4);
    assert_eq!(summary.valid, 4);
    assert_eq!(summary.fully_matched, 3);
    assert_eq!(summary.structural_matched, 1);
    assert_eq!(summary.accuracy, 75.0);
    assert_eq!(summary.mismatched, vec!["WBA8E9G5XJN000003".to_string()]);
    assert_eq!(summary.manufacturers["BMW"].accuracy, 0.0);
    assert_eq!(summary.manufacturers["Tesla"].matched, 1);
}

#[test]
fn verdicts_serialize_with_field_labels() {
    let verdicts = run_batch(&dataset());
    let json = serde_json::to_value(&verdicts[0]).unwrap();
    assert_eq!(json["fields"][0]["field"], "Manufacturer/Make");
    assert!(json["match_source"].is_string());
}
