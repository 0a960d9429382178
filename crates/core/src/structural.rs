//! Offline VIN decode from fixed character positions.
//!
//! Positions 0-2 carry the World Manufacturer Identifier and position 9 the
//! model year code. Both are looked up in static tables; anything missing is
//! reported as [`FieldValue::Unrecognized`], never as an error, so this decode
//! is always available when the remote service is not.

use serde::Serialize;

use crate::field::FieldValue;
use crate::vin::Vin;

/// WMI prefixes, three- and two-character. Three-character entries are tried
/// first, so `JM3` (Mazda) wins over a shorter `JM` entry.
static WMI_TABLE: &[(&str, &str)] = &[
    ("1HG", "Honda"),
    ("2HG", "Honda"),
    ("3HG", "Honda"),
    ("JHM", "Honda"),
    ("5F", "Honda"),
    ("1F", "Ford"),
    ("1FA", "Ford"),
    ("1FM", "Ford"),
    ("1FT", "Ford"),
    ("1G", "Chevrolet"),
    ("1GY", "Cadillac"),
    ("KL4", "Buick"),
    ("5YJ", "Tesla"),
    ("7SA", "Tesla"),
    ("JT", "Toyota"),
    ("4T", "Toyota"),
    ("5T", "Toyota"),
    ("3TY", "Toyota"),
    ("JM", "Mazda"),
    ("JM3", "Mazda"),
    ("WAU", "Audi"),
    ("WA1", "Audi"),
    ("WBA", "BMW"),
    ("WBY", "BMW"),
    ("5UX", "BMW"),
    ("WVW", "Volkswagen"),
    ("1V2", "Volkswagen"),
    ("3VW", "Volkswagen"),
    ("SAL", "Land Rover"),
    ("5N", "Hyundai"),
    ("KM", "Kia"),
    ("JF", "Subaru"),
];

/// Model year codes for the 2001-2030 cycle. I, O, Q, U, Z and 0 are never used.
static YEAR_TABLE: &[(char, u16)] = &[
    ('1', 2001), ('2', 2002), ('3', 2003), ('4', 2004), ('5', 2005),
    ('6', 2006), ('7', 2007), ('8', 2008), ('9', 2009),
    ('A', 2010), ('B', 2011), ('C', 2012), ('D', 2013), ('E', 2014),
    ('F', 2015), ('G', 2016), ('H', 2017), ('J', 2018), ('K', 2019),
    ('L', 2020), ('M', 2021), ('N', 2022), ('P', 2023), ('R', 2024),
    ('S', 2025), ('T', 2026), ('V', 2027), ('W', 2028), ('X', 2029),
    ('Y', 2030),
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DecodeStatus {
    /// Both manufacturer and year resolved.
    Success,
    PartialSuccess,
}

impl std::fmt::Display for DecodeStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Success => write!(f, "success"),
            Self::PartialSuccess => write!(f, "partial_success"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StructuralDecodeResult {
    pub manufacturer: FieldValue,
    pub year: FieldValue,
    pub status: DecodeStatus,
}

/// Look up a WMI, longest prefix first.
pub fn lookup_manufacturer(wmi: &str) -> Option<&'static str> {
    let wmi = wmi.to_ascii_uppercase();
    (1..=wmi.len().min(3)).rev().find_map(|len| {
        let prefix = wmi.get(..len)?;
        WMI_TABLE
            .iter()
            .find(|(code, _)| *code == prefix)
            .map(|(_, name)| *name)
    })
}

pub fn lookup_year(code: char) -> Option<u16> {
    let code = code.to_ascii_uppercase();
    YEAR_TABLE
        .iter()
        .find(|(c, _)| *c == code)
        .map(|(_, year)| *year)
}

pub fn decode_structural(vin: &Vin) -> StructuralDecodeResult {
    let manufacturer = match lookup_manufacturer(vin.wmi()) {
        Some(name) => FieldValue::Resolved(name.to_string()),
        None => FieldValue::Unrecognized,
    };
    let year = match lookup_year(vin.year_code()) {
        Some(year) => FieldValue::Resolved(year.to_string()),
        None => FieldValue::Unrecognized,
    };
    let status = if manufacturer.is_resolved() && year.is_resolved() {
        DecodeStatus::Success
    } else {
        DecodeStatus::PartialSuccess
    };

    StructuralDecodeResult {
        manufacturer,
        year,
        status,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn vin(s: &str) -> Vin {
        Vin::parse(s).unwrap()
    }

    #[test]
    fn honda_2019() {
        let result = decode_structural(&vin("1HGCV1F34KA123456"));
        assert_eq!(result.manufacturer, FieldValue::Resolved("Honda".into()));
        assert_eq!(result.year, FieldValue::Resolved("2019".into()));
        assert_eq!(result.status, DecodeStatus::Success);
    }

    #[test]
    fn shorter_prefix_fallback() {
        // 1FD is not listed, 1F is
        assert_eq!(lookup_manufacturer("1FD"), Some("Ford"));
        // JM3 beats JM
        assert_eq!(lookup_manufacturer("JM3"), Some("Mazda"));
        assert_eq!(lookup_manufacturer("1GY"), Some("Cadillac"));
        assert_eq!(lookup_manufacturer("1GC"), Some("Chevrolet"));
    }

    #[test]
    fn unknown_wmi_is_partial() {
        let result = decode_structural(&vin("ZZZCV1F34KA123456"));
        assert_eq!(result.manufacturer, FieldValue::Unrecognized);
        assert_eq!(result.year, FieldValue::Resolved("2019".into()));
        assert_eq!(result.status, DecodeStatus::PartialSuccess);
    }

    #[test]
    fn unused_year_codes_unrecognized() {
        assert_eq!(lookup_year('0'), None);
        assert_eq!(lookup_year('U'), None);
        assert_eq!(lookup_year('Z'), None);
        let result = decode_structural(&vin("1HGCV1F340A123456"));
        assert_eq!(result.year, FieldValue::Unrecognized);
        assert_eq!(result.status, DecodeStatus::PartialSuccess);
    }

    #[test]
    fn year_table_covers_thirty_years() {
        assert_eq!(YEAR_TABLE.len(), 30);
        assert_eq!(lookup_year('1'), Some(2001));
        assert_eq!(lookup_year('9'), Some(2009));
        assert_eq!(lookup_year('a'), Some(2010));
        assert_eq!(lookup_year('Y'), Some(2030));
    }

    proptest! {
        #[test]
        fn decode_is_pure(s in "[A-HJ-NPR-Z0-9]{17}") {
            let v = vin(&s);
            prop_assert_eq!(decode_structural(&v), decode_structural(&v));
        }
    }
}
