use vincheck_core::{
    DataSource, Displacement, EngineSpec, FieldValue, FuelType, RawEngineData, Transmission,
    VehicleRecord, Vin,
};

use crate::remote::RemoteFields;

/// Convert extracted remote fields into a canonical record (`data_source = Remote`).
///
/// Manufacturer and year are left as the service reported them; refilling
/// them from the structural decode is the orchestrator's job.
pub fn standardize(vin: &Vin, fields: &RemoteFields) -> VehicleRecord {
    let engine = EngineSpec {
        displacement: standardize_displacement(&fields.displacement_l, &fields.displacement_cc),
        fuel: standardize_fuel(&fields.fuel_type_primary),
    };

    let transmission = match &fields.transmission {
        FieldValue::Resolved(raw) => Transmission::collapse(raw),
        _ => Transmission::Unresolved,
    };

    VehicleRecord {
        vin: vin.clone(),
        manufacturer: fields.make.clone().map_resolved(|m| title_case(&m)),
        year: fields.model_year.clone(),
        model: fields.model.clone(),
        engine,
        transmission,
        data_source: DataSource::Remote,
        raw_engine: Some(raw_engine_data(fields)),
        engine_configuration: fields.engine_configuration.clone(),
        other_engine_info: fields.other_engine_info.clone(),
    }
}

/// Liters win over cubic centimeters. Unparseable input passes through as text.
pub fn standardize_displacement(liters: &FieldValue, cc: &FieldValue) -> Displacement {
    if let Some(raw) = liters.as_resolved() {
        return match parse_number(raw) {
            Some(l) => Displacement::Liters(round1(l)),
            None => Displacement::Raw(raw.to_string()),
        };
    }
    if let Some(raw) = cc.as_resolved() {
        return match parse_number(raw) {
            Some(cc) => Displacement::Liters(round1(cc / 1000.0)),
            None => Displacement::Raw(format!("{raw}CC")),
        };
    }
    Displacement::NotAvailable
}

pub fn standardize_fuel(raw: &FieldValue) -> Option<FuelType> {
    raw.as_resolved().and_then(FuelType::from_raw)
}

/// Numeric engine source for the matcher.
pub fn raw_engine_data(fields: &RemoteFields) -> RawEngineData {
    RawEngineData {
        displacement_l: fields.displacement_l.as_resolved().and_then(parse_number),
        displacement_cc: fields.displacement_cc.as_resolved().and_then(parse_number),
        fuel: standardize_fuel(&fields.fuel_type_primary),
    }
}

/// Upper-case the first letter of every word, lower-case the rest.
/// A word starts after any non-alphabetic character ("MERCEDES-BENZ" -> "Mercedes-Benz").
pub fn title_case(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut prev_alpha = false;
    for ch in s.chars() {
        if ch.is_alphabetic() {
            if prev_alpha {
                out.extend(ch.to_lowercase());
            } else {
                out.extend(ch.to_uppercase());
            }
            prev_alpha = true;
        } else {
            out.push(ch);
            prev_alpha = false;
        }
    }
    out
}

fn parse_number(raw: &str) -> Option<f64> {
    raw.trim().parse::<f64>().ok().filter(|n| n.is_finite())
}

fn round1(x: f64) -> f64 {
    (x * 10.0).round() / 10.0
}
