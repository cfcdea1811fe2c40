//! Strongly-typed identifiers for portfolio entities
//!
//! Folio numbers and ISINs arrive as free-form strings from statements and
//! market-data providers. Wrapping them in newtypes keeps ledger lookups
//! type-safe and stops a folio from being passed where an ISIN is expected.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Errors raised while constructing identifiers
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum IdentifierError {
    #[error("{kind} must not be empty")]
    Empty { kind: &'static str },

    #[error("{kind} contains whitespace: {value:?}")]
    Whitespace { kind: &'static str, value: String },
}

macro_rules! define_code {
    ($name:ident, $kind:literal) => {
        #[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(try_from = "String", into = "String")]
        pub struct $name(String);

        impl $name {
            /// Creates the identifier, trimming surrounding whitespace
            pub fn new(value: impl AsRef<str>) -> Result<Self, IdentifierError> {
                let trimmed = value.as_ref().trim();
                if trimmed.is_empty() {
                    return Err(IdentifierError::Empty { kind: $kind });
                }
                if trimmed.chars().any(char::is_whitespace) {
                    return Err(IdentifierError::Whitespace {
                        kind: $kind,
                        value: trimmed.to_string(),
                    });
                }
                Ok(Self(Self::normalize(trimmed)))
            }

            /// Returns the identifier as a string slice
            pub fn as_str(&self) -> &str {
                &self.0
            }

            /// Returns the identifier kind for display
            pub fn kind() -> &'static str {
                $kind
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl FromStr for $name {
            type Err = IdentifierError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                Self::new(s)
            }
        }

        impl TryFrom<String> for $name {
            type Error = IdentifierError;

            fn try_from(value: String) -> Result<Self, Self::Error> {
                Self::new(value)
            }
        }

        impl From<$name> for String {
            fn from(id: $name) -> String {
                id.0
            }
        }

        impl AsRef<str> for $name {
            fn as_ref(&self) -> &str {
                &self.0
            }
        }
    };
}

define_code!(Folio, "Folio");
define_code!(Isin, "ISIN");

impl Folio {
    fn normalize(value: &str) -> String {
        value.to_string()
    }
}

impl Isin {
    fn normalize(value: &str) -> String {
        value.to_ascii_uppercase()
    }

    /// Returns true if the ISIN has the standard shape and a valid check digit
    ///
    /// The shape is a two-letter country prefix, nine alphanumeric characters
    /// and a numeric check digit. The check digit is verified with the Luhn
    /// algorithm over the letter-expanded payload.
    ///
    /// Providers occasionally hand out scheme codes in the ISIN column, so
    /// construction does not require this to hold.
    pub fn is_well_formed(&self) -> bool {
        let bytes = self.0.as_bytes();
        if bytes.len() != 12 {
            return false;
        }
        if !bytes[..2].iter().all(u8::is_ascii_uppercase)
            || !bytes[2..11].iter().all(u8::is_ascii_alphanumeric)
            || !bytes[11].is_ascii_digit()
        {
            return false;
        }

        let mut digits = Vec::with_capacity(22);
        for c in self.0[..11].chars() {
            match c.to_digit(36) {
                Some(v) if v >= 10 => {
                    digits.push(v / 10);
                    digits.push(v % 10);
                }
                Some(v) => digits.push(v),
                None => return false,
            }
        }

        let sum: u32 = digits
            .iter()
            .rev()
            .enumerate()
            .map(|(i, &d)| {
                if i % 2 == 0 {
                    let doubled = d * 2;
                    if doubled > 9 { doubled - 9 } else { doubled }
                } else {
                    d
                }
            })
            .sum();

        let check = (10 - sum % 10) % 10;
        Some(check) == self.0[11..].chars().next().and_then(|c| c.to_digit(10))
    }
}

/// Composite key identifying one holding: a security held within a folio
///
/// Ordering is by folio, then ISIN, so maps keyed by `HoldingKey` iterate
/// deterministically.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct HoldingKey {
    pub folio: Folio,
    pub isin: Isin,
}

impl HoldingKey {
    pub fn new(folio: Folio, isin: Isin) -> Self {
        Self { folio, isin }
    }
}

impl fmt::Display for HoldingKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.folio, self.isin)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_isin_is_uppercased() {
        let isin = Isin::new(" inf209k01yn0 ").unwrap();
        assert_eq!(isin.as_str(), "INF209K01YN0");
    }

    #[test]
    fn test_folio_keeps_case() {
        let folio = Folio::new("12345/ab").unwrap();
        assert_eq!(folio.as_str(), "12345/ab");
    }

    #[test]
    fn test_empty_rejected() {
        assert_eq!(Folio::new("   "), Err(IdentifierError::Empty { kind: "Folio" }));
    }

    #[test]
    fn test_check_digit() {
        assert!(Isin::new("US0378331005").unwrap().is_well_formed());
        assert!(!Isin::new("US0378331006").unwrap().is_well_formed());
    }
}
