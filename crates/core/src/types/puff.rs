//! Puff count of a disposable device.
//!
//! The content API has stored puff counts both as numbers (`5000`) and as text
//! (`"5000"`). [`PuffCount`] is the canonical numeric form; both encodings
//! deserialize into it, and filter selections coming from the UI as text are
//! parsed with [`PuffCount::from_str`](std::str::FromStr) before comparison.

use core::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize};

/// Errors that can occur when parsing a [`PuffCount`].
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum PuffCountError {
    /// The value is not a whole, non-negative number.
    #[error("puff count must be a whole number (got {0:?})")]
    NotANumber(String),
}

/// Number of puffs a device is rated for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(transparent)]
pub struct PuffCount(u32);

impl PuffCount {
    /// Create a puff count.
    #[must_use]
    pub const fn new(puffs: u32) -> Self {
        Self(puffs)
    }

    /// Get the number of puffs.
    #[must_use]
    pub const fn get(self) -> u32 {
        self.0
    }
}

impl fmt::Display for PuffCount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for PuffCount {
    type Err = PuffCountError;

    /// Parse a puff count from text, ignoring surrounding whitespace.
    ///
    /// Any numeric spelling of a whole number is accepted (`5000`, `5000.0`,
    /// `5e3`).
    ///
    /// ```
    /// use jvapes_core::PuffCount;
    ///
    /// assert_eq!(" 5000 ".parse::<PuffCount>().unwrap(), PuffCount::new(5000));
    /// assert_eq!("5e3".parse::<PuffCount>().unwrap(), PuffCount::new(5000));
    /// assert!("5000+".parse::<PuffCount>().is_err());
    /// ```
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let text = s.trim();
        text.parse::<u32>()
            .ok()
            .or_else(|| text.parse::<f64>().ok().and_then(whole_float))
            .map(Self)
            .ok_or_else(|| PuffCountError::NotANumber(s.to_owned()))
    }
}

impl From<u32> for PuffCount {
    fn from(puffs: u32) -> Self {
        Self(puffs)
    }
}

/// Wire forms accepted for a puff count.
#[derive(Deserialize)]
#[serde(untagged)]
enum RawPuffCount {
    Integer(u64),
    Float(f64),
    Text(String),
}

impl<'de> Deserialize<'de> for PuffCount {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        match RawPuffCount::deserialize(deserializer)? {
            RawPuffCount::Integer(n) => u32::try_from(n)
                .map(Self)
                .map_err(|_| serde::de::Error::custom(PuffCountError::NotANumber(n.to_string()))),
            RawPuffCount::Float(f) => whole_float(f)
                .map(Self)
                .ok_or_else(|| serde::de::Error::custom(PuffCountError::NotANumber(f.to_string()))),
            RawPuffCount::Text(s) => s.parse().map_err(serde::de::Error::custom),
        }
    }
}

#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss, clippy::float_cmp)] // range and fraction are checked before the cast
fn whole_float(f: f64) -> Option<u32> {
    if f.is_finite() && f >= 0.0 && f.fract() == 0.0 && f <= f64::from(u32::MAX) {
        Some(f as u32)
    } else {
        None
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_deserialize_number_and_text() {
        let from_number: PuffCount = serde_json::from_str("5000").unwrap();
        let from_text: PuffCount = serde_json::from_str("\"5000\"").unwrap();
        let from_float: PuffCount = serde_json::from_str("5000.0").unwrap();
        assert_eq!(from_number, PuffCount::new(5000));
        assert_eq!(from_text, from_number);
        assert_eq!(from_float, from_number);
    }

    #[test]
    fn test_deserialize_rejects_garbage() {
        assert!(serde_json::from_str::<PuffCount>("\"lots\"").is_err());
        assert!(serde_json::from_str::<PuffCount>("-1").is_err());
        assert!(serde_json::from_str::<PuffCount>("12.5").is_err());
        assert!(serde_json::from_str::<PuffCount>("null").is_err());
    }

    #[test]
    fn test_parse_trims_whitespace() {
        assert_eq!("  800".parse::<PuffCount>().unwrap(), PuffCount::new(800));
        assert_eq!(
            "".parse::<PuffCount>().unwrap_err(),
            PuffCountError::NotANumber(String::new())
        );
    }

    #[test]
    fn test_parse_numeric_spellings() {
        for text in ["5000", "05000", "5000.0", "5e3", "5E3"] {
            assert_eq!(text.parse::<PuffCount>().unwrap(), PuffCount::new(5000), "{text}");
        }
        assert!("5000.5".parse::<PuffCount>().is_err());
        assert!("NaN".parse::<PuffCount>().is_err());
        assert!("inf".parse::<PuffCount>().is_err());
    }

    #[test]
    fn test_serializes_as_number() {
        assert_eq!(serde_json::to_string(&PuffCount::new(600)).unwrap(), "600");
    }
}
