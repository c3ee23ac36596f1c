//! Instants and their civil-time rendering.
//!
//! All instants inside the crate are `DateTime<Utc>`. Upstream supplies
//! epoch seconds for live times, RFC 3339 strings for update stamps, and
//! minutes-past-midnight plus a journey day for the timetable. Anything
//! that fails to convert becomes `None` rather than an error, since a
//! single bad timestamp must never sink a whole status lookup.
//!
//! Rendering goes through [`TimeLocalizer`]; nothing else in the crate
//! formats an instant directly.

use chrono::{DateTime, Duration, FixedOffset, NaiveDate, TimeZone, Utc};

/// Offset of Indian Standard Time from UTC, in seconds (+05:30).
pub const IST_OFFSET_SECS: i32 = 5 * 3600 + 30 * 60;

/// Placeholder shown wherever a time is unknown.
pub const TIME_PLACEHOLDER: &str = "--";

/// Error returned when constructing a localizer with a bad offset.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid time: {reason}")]
pub struct TimeError {
    reason: &'static str,
}

impl TimeError {
    fn new(reason: &'static str) -> Self {
        Self { reason }
    }
}

/// Convert epoch seconds to an instant.
///
/// Zero and out-of-range values are treated as absent; upstream uses 0
/// as a "no time" marker in places.
///
/// ```
/// use running_status::domain::instant_from_epoch;
///
/// assert!(instant_from_epoch(1_759_651_200).is_some());
/// assert!(instant_from_epoch(0).is_none());
/// assert!(instant_from_epoch(u64::MAX).is_none());
/// ```
pub fn instant_from_epoch(secs: u64) -> Option<DateTime<Utc>> {
    if secs == 0 {
        return None;
    }
    let secs = i64::try_from(secs).ok()?;
    DateTime::from_timestamp(secs, 0)
}

/// Parse an RFC 3339 timestamp into an instant.
pub fn parse_rfc3339(s: &str) -> Option<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(s.trim())
        .ok()
        .map(|dt| dt.with_timezone(&Utc))
}

/// Resolve a timetable entry to an instant.
///
/// `day` is the 1-based day of the journey (day 1 is the journey date);
/// 0 is treated as day 1. `minutes` is minutes past civil midnight in the
/// given offset and may exceed one day.
///
/// ```
/// use chrono::NaiveDate;
/// use running_status::domain::{FixedOffsetLocalizer, TimeLocalizer, civil_instant};
///
/// let ist = FixedOffsetLocalizer::ist();
/// let date = NaiveDate::from_ymd_opt(2025, 10, 5).unwrap();
///
/// let t = civil_instant(date, 2, 95, ist.offset()).unwrap();
/// assert_eq!(ist.format_date_time(t), "06/10/2025, 01:35");
/// ```
pub fn civil_instant(
    journey_date: NaiveDate,
    day: u8,
    minutes: u32,
    offset: FixedOffset,
) -> Option<DateTime<Utc>> {
    let day_offset = i64::from(day.max(1) - 1);
    let local = journey_date
        .and_hms_opt(0, 0, 0)?
        .checked_add_signed(Duration::days(day_offset))?
        .checked_add_signed(Duration::minutes(i64::from(minutes)))?;
    offset
        .from_local_datetime(&local)
        .single()
        .map(|dt| dt.with_timezone(&Utc))
}

/// Renders instants as civil time for display.
pub trait TimeLocalizer: Send + Sync {
    /// "HH:MM", 24-hour clock.
    fn format_time(&self, instant: DateTime<Utc>) -> String;

    /// "DD/MM/YYYY, HH:MM", 24-hour clock.
    fn format_date_time(&self, instant: DateTime<Utc>) -> String;

    /// Short zone label for captions, e.g. "IST".
    fn zone_label(&self) -> &str;

    /// Format an optional instant, falling back to the placeholder.
    fn format_time_or_placeholder(&self, instant: Option<DateTime<Utc>>) -> String {
        instant.map_or_else(|| TIME_PLACEHOLDER.to_string(), |t| self.format_time(t))
    }
}

/// Localizer for a single fixed UTC offset.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FixedOffsetLocalizer {
    offset: FixedOffset,
    label: String,
}

impl FixedOffsetLocalizer {
    /// Create a localizer for an offset east of UTC, in seconds.
    pub fn new(offset_secs: i32, label: impl Into<String>) -> Result<Self, TimeError> {
        let offset = FixedOffset::east_opt(offset_secs)
            .ok_or_else(|| TimeError::new("offset must be within +/- 24 hours"))?;
        Ok(Self {
            offset,
            label: label.into(),
        })
    }

    /// Indian Standard Time, +05:30.
    pub fn ist() -> Self {
        Self {
            offset: FixedOffset::east_opt(IST_OFFSET_SECS).expect("IST offset is in range"),
            label: "IST".to_string(),
        }
    }

    /// The offset this localizer renders in.
    pub fn offset(&self) -> FixedOffset {
        self.offset
    }
}

impl Default for FixedOffsetLocalizer {
    fn default() -> Self {
        Self::ist()
    }
}

impl TimeLocalizer for FixedOffsetLocalizer {
    fn format_time(&self, instant: DateTime<Utc>) -> String {
        instant.with_timezone(&self.offset).format("%H:%M").to_string()
    }

    fn format_date_time(&self, instant: DateTime<Utc>) -> String {
        instant
            .with_timezone(&self.offset)
            .format("%d/%m/%Y, %H:%M")
            .to_string()
    }

    fn zone_label(&self) -> &str {
        &self.label
    }
}
