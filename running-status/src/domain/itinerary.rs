//! Scheduled itinerary types.
//!
//! An `Itinerary` is the static timetable for one run of a train: the
//! ordered stops with their booked times. It is built fresh for each
//! lookup and never mutated afterwards.

use std::collections::HashSet;

use chrono::{DateTime, Utc};

use super::StationCode;

/// Where a stop sits in its itinerary.
///
/// A single-stop itinerary is both origin and terminus; callers that care
/// use [`StopRole::is_origin`] and [`StopRole::is_terminus`] rather than
/// matching on the variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopRole {
    Origin,
    Intermediate,
    Terminus,
    /// The only stop of a one-stop itinerary.
    Sole,
}

impl StopRole {
    /// Compute the role of `sequence_index` in an itinerary of `total_stops`.
    pub fn of(sequence_index: usize, total_stops: usize) -> Self {
        let last = total_stops.saturating_sub(1);
        match (sequence_index == 0, sequence_index == last) {
            (true, true) => StopRole::Sole,
            (true, false) => StopRole::Origin,
            (false, true) => StopRole::Terminus,
            (false, false) => StopRole::Intermediate,
        }
    }

    /// True for the first stop. The origin has no arrival leg.
    pub fn is_origin(self) -> bool {
        matches!(self, StopRole::Origin | StopRole::Sole)
    }

    /// True for the last stop. The terminus has no departure leg.
    pub fn is_terminus(self) -> bool {
        matches!(self, StopRole::Terminus | StopRole::Sole)
    }
}

/// One scheduled station visit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScheduledStop {
    /// Station code, unique within the itinerary
    pub station: StationCode,
    /// Station display name
    pub station_name: String,
    /// 0-based position in the itinerary
    pub sequence_index: usize,
    /// Booked arrival (absent at the origin)
    pub scheduled_arrival: Option<DateTime<Utc>>,
    /// Booked departure (absent at the terminus)
    pub scheduled_departure: Option<DateTime<Utc>>,
    /// Booked platform, if known
    pub platform: Option<String>,
}

impl ScheduledStop {
    /// Create a stop with no times or platform.
    pub fn new(station: StationCode, station_name: impl Into<String>, sequence_index: usize) -> Self {
        Self {
            station,
            station_name: station_name.into(),
            sequence_index,
            scheduled_arrival: None,
            scheduled_departure: None,
            platform: None,
        }
    }
}

/// An ordered list of scheduled stops.
///
/// Construction guarantees stops are ordered by
/// their sequence index, indices are renumbered to `0..len`, and station
/// codes are unique (later duplicates are dropped).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Itinerary {
    stops: Vec<ScheduledStop>,
}

impl Itinerary {
    /// Build an itinerary from stops in any order.
    ///
    /// ```
    /// use running_status::domain::{Itinerary, ScheduledStop, StationCode};
    ///
    /// let code = |s| StationCode::parse(s).unwrap();
    /// let itinerary = Itinerary::new(vec![
    ///     ScheduledStop::new(code("BCT"), "Mumbai Central", 7),
    ///     ScheduledStop::new(code("NDLS"), "New Delhi", 2),
    /// ]);
    ///
    /// assert_eq!(itinerary.stops()[0].station.as_str(), "NDLS");
    /// assert_eq!(itinerary.stops()[0].sequence_index, 0);
    /// assert_eq!(itinerary.stops()[1].sequence_index, 1);
    /// ```
    pub fn new(mut stops: Vec<ScheduledStop>) -> Self {
        stops.sort_by_key(|s| s.sequence_index);

        let mut seen = HashSet::new();
        stops.retain(|s| seen.insert(s.station));

        for (i, stop) in stops.iter_mut().enumerate() {
            stop.sequence_index = i;
        }

        Self { stops }
    }

    /// The stops in order.
    pub fn stops(&self) -> &[ScheduledStop] {
        &self.stops
    }

    /// Number of stops.
    pub fn len(&self) -> usize {
        self.stops.len()
    }

    /// True if there are no stops.
    pub fn is_empty(&self) -> bool {
        self.stops.is_empty()
    }

    /// Position of a station in the itinerary, if it is called at.
    pub fn position_of(&self, station: &StationCode) -> Option<usize> {
        self.stops.iter().position(|s| &s.station == station)
    }

    /// Look up a stop by station code.
    pub fn stop(&self, station: &StationCode) -> Option<&ScheduledStop> {
        self.stops.iter().find(|s| &s.station == station)
    }

    /// Role of a stop within this itinerary.
    pub fn role_of(&self, stop: &ScheduledStop) -> StopRole {
        StopRole::of(stop.sequence_index, self.len())
    }

    /// The first stop.
    pub fn origin(&self) -> Option<&ScheduledStop> {
        self.stops.first()
    }

    /// The last stop.
    pub fn terminus(&self) -> Option<&ScheduledStop> {
        self.stops.last()
    }
}
