//! `vincheck-core`: VIN format contract, offline structural decode and the
//! canonical vehicle record shared by the resolver and the comparator.
//!
//! Pure crate: no IO, no network, no logging.

pub mod field;
pub mod fuel;
pub mod record;
pub mod structural;
pub mod vin;

pub use field::FieldValue;
pub use fuel::FuelType;
pub use record::{DataSource, Displacement, EngineSpec, RawEngineData, Transmission, VehicleRecord};
pub use structural::{decode_structural, DecodeStatus, StructuralDecodeResult};
pub use vin::{validate, InvalidFormat, Vin};
