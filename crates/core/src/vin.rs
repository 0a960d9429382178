use std::fmt;

use serde::{Serialize, Serializer};
use thiserror::Error;

/// Required VIN length.
pub const VIN_LENGTH: usize = 17;

/// Letters never used in a VIN (confusable with 1, 0 and 9).
const FORBIDDEN: [char; 3] = ['I', 'O', 'Q'];

/// A VIN failed the format contract.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InvalidFormat {
    #[error("VIN must be 17 characters long (got {len})")]
    Length { len: usize },

    #[error("VIN contains invalid character '{ch}' at position {position} (I/O/Q are not allowed)")]
    ForbiddenCharacter { ch: char, position: usize },

    #[error("VIN contains invalid character '{ch}' at position {position} (only A-Z and 0-9 are allowed)")]
    NonAlphanumeric { ch: char, position: usize },
}

/// Check a raw string against the VIN format contract.
///
/// Length is checked first (in characters, not bytes). I/O/Q are reported in
/// preference to any other bad character so the caller always learns about the
/// confusable letters.
pub fn validate(input: &str) -> Result<(), InvalidFormat> {
    let len = input.chars().count();
    if len != VIN_LENGTH {
        return Err(InvalidFormat::Length { len });
    }

    for (position, ch) in input.chars().enumerate() {
        if FORBIDDEN.contains(&ch.to_ascii_uppercase()) {
            return Err(InvalidFormat::ForbiddenCharacter { ch, position });
        }
    }

    for (position, ch) in input.chars().enumerate() {
        if !ch.is_ascii_alphanumeric() {
            return Err(InvalidFormat::NonAlphanumeric { ch, position });
        }
    }

    Ok(())
}

/// A validated, upper-cased VIN.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Vin(String);

impl Vin {
    pub fn parse(input: &str) -> Result<Self, InvalidFormat> {
        validate(input)?;
        Ok(Self(input.to_ascii_uppercase()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// World Manufacturer Identifier (positions 0-2).
    pub fn wmi(&self) -> &str {
        &self.0[..3]
    }

    /// Model year code (position 9).
    pub fn year_code(&self) -> char {
        // ASCII-only after validation, so byte indexing is safe
        self.0.as_bytes()[9] as char
    }
}

impl fmt::Display for Vin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl std::str::FromStr for Vin {
    type Err = InvalidFormat;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl Serialize for Vin {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn accepts_valid_vin() {
        assert!(validate("1HGCV1F34KA123456").is_ok());
        let vin = Vin::parse("1hgcv1f34ka123456").unwrap();
        assert_eq!(vin.as_str(), "1HGCV1F34KA123456");
        assert_eq!(vin.wmi(), "1HG");
        assert_eq!(vin.year_code(), 'K');
    }

    #[test]
    fn rejects_short_and_long() {
        assert_eq!(validate("1HGCV1F34KA12345"), Err(InvalidFormat::Length { len: 16 }));
        assert_eq!(validate("1HGCV1F34KA1234567"), Err(InvalidFormat::Length { len: 18 }));
        assert_eq!(validate(""), Err(InvalidFormat::Length { len: 0 }));
    }

    #[test]
    fn length_counts_characters_not_bytes() {
        // 17 chars, 18 bytes
        let err = validate("1HGCV1F34KA12345é").unwrap_err();
        assert!(matches!(err, InvalidFormat::NonAlphanumeric { ch: 'é', position: 16 }));
    }

    #[test]
    fn reports_forbidden_letter_and_position() {
        let err = validate("1HGCV1F34KA12345o").unwrap_err();
        assert_eq!(err, InvalidFormat::ForbiddenCharacter { ch: 'o', position: 16 });
        assert!(err.to_string().contains("'o'"));
    }

    #[test]
    fn forbidden_letter_wins_over_other_bad_characters() {
        let err = validate("1HG-V1F34KA1234Q6").unwrap_err();
        assert_eq!(err, InvalidFormat::ForbiddenCharacter { ch: 'Q', position: 15 });
    }

    #[test]
    fn length_message_names_the_constraint() {
        let err = validate("ABC").unwrap_err();
        assert_eq!(err.to_string(), "VIN must be 17 characters long (got 3)");
    }

    proptest! {
        #[test]
        fn wrong_length_always_fails_on_length(s in "[A-HJ-NPR-Z0-9]{0,40}") {
            prop_assume!(s.chars().count() != VIN_LENGTH);
            let is_length_error = matches!(validate(&s), Err(InvalidFormat::Length { .. }));
            prop_assert!(is_length_error);
        }

        #[test]
        fn forbidden_letter_always_reported(
            prefix in "[A-HJ-NPR-Z0-9]{0,16}",
            bad in prop::sample::select(vec!['I', 'O', 'Q', 'i', 'o', 'q']),
        ) {
            let mut s = prefix.clone();
            s.push(bad);
            while s.len() < VIN_LENGTH {
                s.push('A');
            }
            let err = validate(&s).unwrap_err();
            prop_assert_eq!(
                err,
                InvalidFormat::ForbiddenCharacter { ch: bad, position: prefix.len() }
            );
        }
    }
}
