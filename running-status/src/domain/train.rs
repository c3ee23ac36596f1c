//! Train identity and descriptive metadata.

use std::fmt;

use super::StationCode;

/// Error returned when parsing an invalid train number.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid train number: {reason}")]
pub struct InvalidTrainNumber {
    reason: &'static str,
}

/// A train number: exactly 4 or 5 ASCII digits.
///
/// # Examples
///
/// ```
/// use running_status::domain::TrainNumber;
///
/// assert_eq!(TrainNumber::parse("12301").unwrap().as_str(), "12301");
/// assert!(TrainNumber::parse("1230").is_ok());
///
/// assert!(TrainNumber::parse("123").is_err());
/// assert!(TrainNumber::parse("123456").is_err());
/// assert!(TrainNumber::parse("12a01").is_err());
/// ```
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct TrainNumber {
    digits: [u8; 5],
    len: u8,
}

impl TrainNumber {
    /// Parse a train number, trimming surrounding whitespace.
    pub fn parse(s: &str) -> Result<Self, InvalidTrainNumber> {
        let raw = s.trim().as_bytes();

        if !(4..=5).contains(&raw.len()) {
            return Err(InvalidTrainNumber {
                reason: "must be 4 or 5 digits",
            });
        }

        if !raw.iter().all(u8::is_ascii_digit) {
            return Err(InvalidTrainNumber {
                reason: "must contain only digits 0-9",
            });
        }

        let mut digits = [0u8; 5];
        digits[..raw.len()].copy_from_slice(raw);

        Ok(Self {
            digits,
            len: raw.len() as u8,
        })
    }

    /// Returns the train number as a string slice.
    pub fn as_str(&self) -> &str {
        std::str::from_utf8(&self.digits[..self.len as usize]).unwrap_or_default()
    }
}

impl fmt::Debug for TrainNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "TrainNumber({})", self.as_str())
    }
}

impl fmt::Display for TrainNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

bitflags::bitflags! {
    /// Days of the week a train runs on.
    ///
    /// Bit 0 is Sunday, bit 6 is Saturday, matching the upstream bitmap.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct RunningDays: u8 {
        const SUNDAY    = 1 << 0;
        const MONDAY    = 1 << 1;
        const TUESDAY   = 1 << 2;
        const WEDNESDAY = 1 << 3;
        const THURSDAY  = 1 << 4;
        const FRIDAY    = 1 << 5;
        const SATURDAY  = 1 << 6;
    }
}

impl RunningDays {
    /// Build from an upstream bitmap, ignoring unknown bits.
    pub fn from_bitmap(bitmap: u8) -> Self {
        Self::from_bits_truncate(bitmap)
    }

    /// Two-letter day names of the set days, Sunday first.
    ///
    /// ```
    /// use running_status::domain::RunningDays;
    ///
    /// let days = RunningDays::MONDAY | RunningDays::FRIDAY;
    /// assert_eq!(days.as_names(), "Mo Fr");
    /// assert_eq!(RunningDays::all().as_names(), "Su Mo Tu We Th Fr Sa");
    /// ```
    pub fn as_names(&self) -> String {
        const NAMES: [(RunningDays, &str); 7] = [
            (RunningDays::SUNDAY, "Su"),
            (RunningDays::MONDAY, "Mo"),
            (RunningDays::TUESDAY, "Tu"),
            (RunningDays::WEDNESDAY, "We"),
            (RunningDays::THURSDAY, "Th"),
            (RunningDays::FRIDAY, "Fr"),
            (RunningDays::SATURDAY, "Sa"),
        ];

        NAMES
            .iter()
            .filter(|(day, _)| self.contains(*day))
            .map(|(_, name)| *name)
            .collect::<Vec<_>>()
            .join(" ")
    }
}

/// Descriptive metadata about a train.
///
/// None of this feeds into reconciliation; it is passed through for
/// presentation alongside the stop views.
#[derive(Debug, Clone, PartialEq)]
pub struct TrainInfo {
    pub number: TrainNumber,
    pub name: String,
    pub train_type: String,
    pub zone: String,
    pub source: Option<StationCode>,
    pub source_name: String,
    pub destination: Option<StationCode>,
    pub destination_name: String,
    pub running_days: RunningDays,
    pub return_train: Option<TrainNumber>,
    pub travel_time_mins: u32,
    pub total_halts: u32,
    pub distance_km: u32,
    pub avg_speed_kmph: u32,
}

impl TrainInfo {
    /// Create train info with only a number and name; everything else empty.
    pub fn new(number: TrainNumber, name: impl Into<String>) -> Self {
        Self {
            number,
            name: name.into(),
            train_type: String::new(),
            zone: String::new(),
            source: None,
            source_name: String::new(),
            destination: None,
            destination_name: String::new(),
            running_days: RunningDays::empty(),
            return_train: None,
            travel_time_mins: 0,
            total_halts: 0,
            distance_km: 0,
            avg_speed_kmph: 0,
        }
    }

    /// Travel time as "Xh Ym", or "--" when unknown.
    pub fn travel_time_display(&self) -> String {
        if self.travel_time_mins == 0 {
            return "--".to_string();
        }
        format!(
            "{}h {}m",
            self.travel_time_mins / 60,
            self.travel_time_mins % 60
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn train_number_trims_whitespace() {
        let n = TrainNumber::parse(" 12951 ").unwrap();
        assert_eq!(n.as_str(), "12951");
    }

    #[test]
    fn train_number_rejects_bad_input() {
        assert!(TrainNumber::parse("").is_err());
        assert!(TrainNumber::parse("12 51").is_err());
        assert!(TrainNumber::parse("-1234").is_err());
        assert!(TrainNumber::parse("１２３４").is_err());
    }

    #[test]
    fn train_number_display_and_debug() {
        let n = TrainNumber::parse("1234").unwrap();
        assert_eq!(n.to_string(), "1234");
        assert_eq!(format!("{:?}", n), "TrainNumber(1234)");
    }

    #[test]
    fn running_days_ignores_unknown_bits() {
        let days = RunningDays::from_bitmap(0b1000_0001);
        assert_eq!(days, RunningDays::SUNDAY);
        assert_eq!(days.as_names(), "Su");
    }

    #[test]
    fn running_days_empty_has_no_names() {
        assert_eq!(RunningDays::from_bitmap(0).as_names(), "");
    }

    #[test]
    fn running_days_full_week() {
        assert_eq!(RunningDays::from_bitmap(0x7f), RunningDays::all());
    }

    #[test]
    fn travel_time_display() {
        let mut info = TrainInfo::new(TrainNumber::parse("12301").unwrap(), "Rajdhani");
        assert_eq!(info.travel_time_display(), "--");

        info.travel_time_mins = 1030;
        assert_eq!(info.travel_time_display(), "17h 10m");

        info.travel_time_mins = 45;
        assert_eq!(info.travel_time_display(), "0h 45m");
    }
}
