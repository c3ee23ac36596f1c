//! Station code types.

use std::fmt;

/// Maximum length of a station code.
const MAX_LEN: usize = 5;

/// Error returned when parsing an invalid station code.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid station code: {reason}")]
pub struct InvalidStationCode {
    reason: &'static str,
}

/// A valid station code, 1 to 5 uppercase ASCII letters.
///
/// Codes like `NDLS`, `BCT` or `R` all fit. The type is `Copy` and
/// guarantees validity by construction, so it can be used as a map key
/// without re-checking.
///
/// # Examples
///
/// ```
/// use running_status::domain::StationCode;
///
/// let ndls = StationCode::parse("NDLS").unwrap();
/// assert_eq!(ndls.as_str(), "NDLS");
///
/// // Lowercase is rejected by `parse` but accepted by `parse_normalized`
/// assert!(StationCode::parse("ndls").is_err());
/// assert_eq!(StationCode::parse_normalized(" ndls ").unwrap(), ndls);
///
/// // Wrong length is rejected
/// assert!(StationCode::parse("").is_err());
/// assert!(StationCode::parse("ABCDEF").is_err());
/// ```
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct StationCode {
    bytes: [u8; MAX_LEN],
    len: u8,
}

impl StationCode {
    /// Parse a station code from a string.
    ///
    /// The input must be 1 to 5 uppercase ASCII letters (A-Z).
    pub fn parse(s: &str) -> Result<Self, InvalidStationCode> {
        let raw = s.as_bytes();

        if raw.is_empty() || raw.len() > MAX_LEN {
            return Err(InvalidStationCode {
                reason: "must be 1 to 5 characters",
            });
        }

        if !raw.iter().all(u8::is_ascii_uppercase) {
            return Err(InvalidStationCode {
                reason: "must be uppercase ASCII letters A-Z",
            });
        }

        let mut bytes = [0u8; MAX_LEN];
        bytes[..raw.len()].copy_from_slice(raw);

        Ok(Self {
            bytes,
            len: raw.len() as u8,
        })
    }

    /// Parse after trimming whitespace and upper-casing.
    ///
    /// Upstream feeds and form input are not consistent about case.
    pub fn parse_normalized(s: &str) -> Result<Self, InvalidStationCode> {
        Self::parse(&s.trim().to_ascii_uppercase())
    }

    /// Returns the station code as a string slice.
    pub fn as_str(&self) -> &str {
        // Only ASCII uppercase letters are ever stored
        std::str::from_utf8(&self.bytes[..self.len as usize]).unwrap_or_default()
    }
}

impl fmt::Debug for StationCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "StationCode({})", self.as_str())
    }
}

impl fmt::Display for StationCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}


#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        /// Parse then as_str returns the original
        #[test]
        fn roundtrip(s in "[A-Z]{1,5}") {
            let code = StationCode::parse(&s).unwrap();
            prop_assert_eq!(code.as_str(), s.as_str());
        }

        /// Lowercase input is normalized to the same code
        #[test]
        fn normalized_matches_uppercase(s in "[a-z]{1,5}") {
            let lower = StationCode::parse_normalized(&s).unwrap();
            let upper = StationCode::parse(&s.to_ascii_uppercase()).unwrap();
            prop_assert_eq!(lower, upper);
        }

        /// Overlong strings are always rejected
        #[test]
        fn overlong_rejected(s in "[A-Z]{6,12}") {
            prop_assert!(StationCode::parse(&s).is_err());
        }
    }
}
