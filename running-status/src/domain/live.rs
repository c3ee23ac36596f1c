//! Live tracking types.
//!
//! A `LiveFeed` is whatever the upstream tracker knew about a run at the
//! time of the lookup. Every part of it is optional: a feed may carry
//! per-stop records, a single current-location pointer, both, or neither.

use std::fmt;

use chrono::{DateTime, Utc};

use super::StationCode;

/// Explicit per-stop status tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LiveTag {
    Departed,
    Arrived,
    Upcoming,
}

impl LiveTag {
    /// Parse a tag name, ignoring case and surrounding whitespace.
    ///
    /// Unknown names return `None`; they are treated as "no tag".
    ///
    /// ```
    /// use running_status::domain::LiveTag;
    ///
    /// assert_eq!(LiveTag::parse("Departed"), Some(LiveTag::Departed));
    /// assert_eq!(LiveTag::parse(" arrived "), Some(LiveTag::Arrived));
    /// assert_eq!(LiveTag::parse("None"), None);
    /// ```
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "departed" => Some(LiveTag::Departed),
            "arrived" => Some(LiveTag::Arrived),
            "upcoming" => Some(LiveTag::Upcoming),
            _ => None,
        }
    }

    /// Derive a tag by comparing actual times against `now`.
    ///
    /// A departure strictly in the past means departed; an arrival at or
    /// before `now` means arrived. Times that all lie in the future are
    /// predictions, so the stop is upcoming. With neither time there is
    /// nothing to say.
    pub fn derive(
        actual_arrival: Option<DateTime<Utc>>,
        actual_departure: Option<DateTime<Utc>>,
        now: DateTime<Utc>,
    ) -> Option<Self> {
        if actual_departure.is_some_and(|t| t < now) {
            Some(LiveTag::Departed)
        } else if actual_arrival.is_some_and(|t| t <= now) {
            Some(LiveTag::Arrived)
        } else if actual_arrival.is_some() || actual_departure.is_some() {
            Some(LiveTag::Upcoming)
        } else {
            None
        }
    }
}

impl fmt::Display for LiveTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            LiveTag::Departed => "Departed",
            LiveTag::Arrived => "Arrived",
            LiveTag::Upcoming => "Upcoming",
        };
        f.write_str(name)
    }
}

/// Live data for a single stop.
///
/// Delay minutes are `None` when unknown. That is distinct from
/// `Some(0)`, which means the train was on time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LiveStopRecord {
    pub station: StationCode,
    pub actual_arrival: Option<DateTime<Utc>>,
    pub actual_departure: Option<DateTime<Utc>>,
    pub delay_arrival_minutes: Option<i32>,
    pub delay_departure_minutes: Option<i32>,
    pub status: Option<LiveTag>,
    /// Platform reported by the tracker, which may differ from the booked one
    pub platform: Option<String>,
}

impl LiveStopRecord {
    /// Create an empty record for a station.
    pub fn new(station: StationCode) -> Self {
        Self {
            station,
            actual_arrival: None,
            actual_departure: None,
            delay_arrival_minutes: None,
            delay_departure_minutes: None,
            status: None,
            platform: None,
        }
    }

    /// True if either actual time is present.
    pub fn has_actual_time(&self) -> bool {
        self.actual_arrival.is_some() || self.actual_departure.is_some()
    }

    /// True if the record carries a tag or an actual time.
    ///
    /// A record with neither says nothing about where the train is.
    pub fn is_informative(&self) -> bool {
        self.status.is_some() || self.has_actual_time()
    }
}

/// The tracker's single "train is near here" signal.
#[derive(Debug, Clone, PartialEq)]
pub struct CurrentLocationPointer {
    pub station: StationCode,
    /// Free text, e.g. "Departed from" or "Arriving at"
    pub status: String,
    pub distance_from_origin_km: Option<f64>,
    pub last_updated_at: Option<DateTime<Utc>>,
}

impl CurrentLocationPointer {
    /// Create a pointer with only a station and status text.
    pub fn new(station: StationCode, status: impl Into<String>) -> Self {
        Self {
            station,
            status: status.into(),
            distance_from_origin_km: None,
            last_updated_at: None,
        }
    }
}

/// Everything the live tracker supplied for one lookup.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LiveFeed {
    pub stop_records: Vec<LiveStopRecord>,
    pub current_location: Option<CurrentLocationPointer>,
    pub summary: Option<String>,
    pub last_updated_at: Option<DateTime<Utc>>,
}

impl LiveFeed {
    /// True if the feed carries any positional signal at all.
    pub fn has_signal(&self) -> bool {
        self.current_location.is_some() || self.stop_records.iter().any(|r| r.is_informative())
    }

    /// The most specific last-updated stamp available.
    pub fn last_updated(&self) -> Option<DateTime<Utc>> {
        self.last_updated_at
            .or_else(|| self.current_location.as_ref()?.last_updated_at)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn at(h: u32, m: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 10, 5, h, m, 0).unwrap()
    }

    fn code(s: &str) -> StationCode {
        StationCode::parse(s).unwrap()
    }

    #[test]
    fn tag_display_roundtrips_through_parse() {
        for tag in [LiveTag::Departed, LiveTag::Arrived, LiveTag::Upcoming] {
            assert_eq!(LiveTag::parse(&tag.to_string()), Some(tag));
        }
    }

    #[test]
    fn derive_departed_when_departure_in_past() {
        let tag = LiveTag::derive(Some(at(10, 0)), Some(at(10, 5)), at(10, 6));
        assert_eq!(tag, Some(LiveTag::Departed));
    }

    #[test]
    fn derive_arrived_when_departure_not_yet_past() {
        // Departure exactly at now is not strictly in the past
        let tag = LiveTag::derive(Some(at(10, 0)), Some(at(10, 5)), at(10, 5));
        assert_eq!(tag, Some(LiveTag::Arrived));

        let tag = LiveTag::derive(Some(at(10, 0)), None, at(10, 0));
        assert_eq!(tag, Some(LiveTag::Arrived));
    }

    #[test]
    fn derive_upcoming_when_arrival_in_future() {
        let tag = LiveTag::derive(Some(at(11, 0)), None, at(10, 0));
        assert_eq!(tag, Some(LiveTag::Upcoming));
    }

    #[test]
    fn derive_upcoming_when_departure_in_future() {
        // Origin before leaving: only a predicted departure
        let tag = LiveTag::derive(None, Some(at(11, 0)), at(10, 0));
        assert_eq!(tag, Some(LiveTag::Upcoming));

        let tag = LiveTag::derive(None, Some(at(10, 0)), at(10, 0));
        assert_eq!(tag, Some(LiveTag::Upcoming));

        let tag = LiveTag::derive(Some(at(10, 30)), Some(at(11, 0)), at(10, 0));
        assert_eq!(tag, Some(LiveTag::Upcoming));
    }

    #[test]
    fn derive_nothing_without_times() {
        assert_eq!(LiveTag::derive(None, None, at(10, 0)), None);
    }

    #[test]
    fn record_informativeness() {
        let mut record = LiveStopRecord::new(code("BCT"));
        assert!(!record.is_informative());

        record.delay_arrival_minutes = Some(5);
        assert!(!record.is_informative());

        record.actual_departure = Some(at(9, 0));
        assert!(record.has_actual_time());
        assert!(record.is_informative());

        let mut tagged = LiveStopRecord::new(code("BCT"));
        tagged.status = Some(LiveTag::Upcoming);
        assert!(tagged.is_informative());
    }

    #[test]
    fn feed_signal() {
        assert!(!LiveFeed::default().has_signal());

        let feed = LiveFeed {
            stop_records: vec![LiveStopRecord::new(code("BCT"))],
            ..Default::default()
        };
        assert!(!feed.has_signal());

        let feed = LiveFeed {
            current_location: Some(CurrentLocationPointer::new(code("BCT"), "At")),
            ..Default::default()
        };
        assert!(feed.has_signal());
    }

    #[test]
    fn last_updated_prefers_feed_stamp() {
        let mut pointer = CurrentLocationPointer::new(code("BCT"), "At");
        pointer.last_updated_at = Some(at(9, 0));

        let mut feed = LiveFeed {
            current_location: Some(pointer),
            ..Default::default()
        };
        assert_eq!(feed.last_updated(), Some(at(9, 0)));

        feed.last_updated_at = Some(at(9, 30));
        assert_eq!(feed.last_updated(), Some(at(9, 30)));
    }
}
