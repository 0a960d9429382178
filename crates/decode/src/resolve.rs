//! Resolution orchestrator: validate, ask the remote service, standardize,
//! then refill manufacturer/year from the structural decode where needed.

use serde::Serialize;
use vincheck_core::{decode_structural, DataSource, DecodeStatus, VehicleRecord, Vin};

use crate::remote::{RawRemoteRecord, RemoteFields, VinLookup};
use crate::standardize::standardize;

/// Outcome of resolving one VIN.
///
/// `record` is `None` only when the input failed validation. Every remote
/// failure still yields a record built from the structural decode.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct VehicleResolution {
    pub success: bool,
    pub record: Option<VehicleRecord>,
    pub error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub raw: Option<RawRemoteRecord>,
}

impl VehicleResolution {
    fn invalid(message: String) -> Self {
        Self {
            success: false,
            record: None,
            error: Some(message),
            raw: None,
        }
    }
}

pub fn resolve(input: &str, lookup: &dyn VinLookup) -> VehicleResolution {
    let vin = match Vin::parse(input.trim()) {
        Ok(vin) => vin,
        Err(e) => {
            tracing::info!(input, error = %e, "rejected malformed VIN");
            return VehicleResolution::invalid(e.to_string());
        }
    };

    match lookup.fetch_raw(&vin) {
        Ok(raw) => {
            let fields = RemoteFields::extract(&raw);
            let record = merge_structural(standardize(&vin, &fields));
            tracing::info!(vin = %vin, data_source = %record.data_source, "resolved via remote service");
            VehicleResolution {
                success: true,
                record: Some(record),
                error: None,
                raw: Some(raw),
            }
        }
        Err(e) => {
            tracing::warn!(vin = %vin, error = %e, "remote lookup failed, using structural decode");
            let (record, status) = structural_record(&vin);
            VehicleResolution {
                success: status == DecodeStatus::Success,
                record: Some(record),
                error: Some(format!("{e}; falling back to structural decode")),
                raw: None,
            }
        }
    }
}

/// Refill manufacturer and year that the remote service left empty.
fn merge_structural(mut record: VehicleRecord) -> VehicleRecord {
    let need_manufacturer = !record.manufacturer.is_resolved();
    let need_year = !record.year.is_resolved();
    if !need_manufacturer && !need_year {
        return record;
    }

    let structural = decode_structural(&record.vin);
    if need_manufacturer {
        tracing::debug!(vin = %record.vin, "manufacturer filled from structural decode");
        record.manufacturer = structural.manufacturer;
    }
    if need_year {
        tracing::debug!(vin = %record.vin, "year filled from structural decode");
        record.year = structural.year;
    }
    record.data_source = DataSource::remote_with_fallback(need_manufacturer, need_year);
    record
}

fn structural_record(vin: &Vin) -> (VehicleRecord, DecodeStatus) {
    let structural = decode_structural(vin);
    let mut record = VehicleRecord::empty(vin.clone(), DataSource::StructuralOnly);
    record.manufacturer = structural.manufacturer;
    record.year = structural.year;
    (record, structural.status)
}
