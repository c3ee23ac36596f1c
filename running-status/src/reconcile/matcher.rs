//! Indexing live records against the scheduled itinerary.

use std::collections::HashMap;

use tracing::debug;

use crate::domain::{Itinerary, LiveFeed, LiveStopRecord, StationCode};

use super::classify::{StopStatus, classify_record};

/// Lookup structure built once per reconciliation.
///
/// Maps station codes to their live record (first record wins if the feed
/// repeats a station) and resolves the current-location pointer to a
/// position in the itinerary. Records and pointers naming stations that
/// are not in the itinerary are dropped here, so later stages only ever
/// see data that lines up with a scheduled stop.
#[derive(Debug, Clone, Default)]
pub struct MatchIndex<'a> {
    records: HashMap<StationCode, &'a LiveStopRecord>,
    current_index: Option<usize>,
    record_frontier: Option<usize>,
}

impl<'a> MatchIndex<'a> {
    /// Build the index. Never fails; a missing feed gives an empty index.
    pub fn build(itinerary: &Itinerary, feed: Option<&'a LiveFeed>) -> Self {
        let Some(feed) = feed else {
            return Self::default();
        };

        let total = itinerary.len();
        let mut records = HashMap::with_capacity(feed.stop_records.len());
        let mut record_frontier: Option<usize> = None;

        for record in &feed.stop_records {
            let Some(position) = itinerary.position_of(&record.station) else {
                debug!(station = %record.station, "live record for unscheduled station ignored");
                continue;
            };

            if records.contains_key(&record.station) {
                debug!(station = %record.station, "duplicate live record ignored");
                continue;
            }

            records.insert(record.station, record);

            let reached = classify_record(record, position, total)
                .is_some_and(|s| matches!(s, StopStatus::Current | StopStatus::Completed));
            if reached {
                record_frontier = Some(record_frontier.map_or(position, |f| f.max(position)));
            }
        }

        let current_index = feed.current_location.as_ref().and_then(|pointer| {
            let found = itinerary.position_of(&pointer.station);
            if found.is_none() {
                debug!(station = %pointer.station, "current location is not on the itinerary");
            }
            found
        });

        Self {
            records,
            current_index,
            record_frontier,
        }
    }

    /// The live record for a station, if one was supplied.
    pub fn record_for(&self, station: &StationCode) -> Option<&'a LiveStopRecord> {
        self.records.get(station).copied()
    }

    /// Itinerary position of the current-location pointer, if it resolved.
    pub fn current_index(&self) -> Option<usize> {
        self.current_index
    }

    /// Furthest position that per-stop records show the train has reached.
    ///
    /// This is the highest index whose record alone classifies as current
    /// or completed.
    pub fn record_frontier(&self) -> Option<usize> {
        self.record_frontier
    }

    /// Number of matched records.
    pub fn record_count(&self) -> usize {
        self.records.len()
    }

    /// True if nothing in the feed lined up with the itinerary.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty() && self.current_index.is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{CurrentLocationPointer, LiveTag, ScheduledStop};
    use chrono::{TimeZone, Utc};

    fn code(s: &str) -> StationCode {
        StationCode::parse(s).unwrap()
    }

    fn itinerary(codes: &[&str]) -> Itinerary {
        Itinerary::new(
            codes
                .iter()
                .enumerate()
                .map(|(i, c)| ScheduledStop::new(code(c), *c, i))
                .collect(),
        )
    }

    fn arrived_record(s: &str) -> LiveStopRecord {
        let mut r = LiveStopRecord::new(code(s));
        r.actual_arrival = Some(Utc.with_ymd_and_hms(2025, 10, 5, 8, 0, 0).unwrap());
        r
    }

    #[test]
    fn no_feed_gives_empty_index() {
        let index = MatchIndex::build(&itinerary(&["A", "B"]), None);
        assert!(index.is_empty());
        assert!(index.current_index().is_none());
        assert!(index.record_frontier().is_none());
    }

    #[test]
    fn records_are_keyed_by_station() {
        let feed = LiveFeed {
            stop_records: vec![arrived_record("B")],
            ..Default::default()
        };
        let index = MatchIndex::build(&itinerary(&["A", "B", "C"]), Some(&feed));

        assert!(index.record_for(&code("B")).is_some());
        assert!(index.record_for(&code("A")).is_none());
        assert_eq!(index.record_count(), 1);
    }

    #[test]
    fn first_duplicate_record_wins() {
        let mut second = LiveStopRecord::new(code("B"));
        second.status = Some(LiveTag::Upcoming);

        let feed = LiveFeed {
            stop_records: vec![arrived_record("B"), second],
            ..Default::default()
        };
        let index = MatchIndex::build(&itinerary(&["A", "B", "C"]), Some(&feed));

        let record = index.record_for(&code("B")).unwrap();
        assert!(record.status.is_none());
        assert!(record.actual_arrival.is_some());
    }

    #[test]
    fn unscheduled_records_are_dropped() {
        let feed = LiveFeed {
            stop_records: vec![arrived_record("X")],
            ..Default::default()
        };
        let index = MatchIndex::build(&itinerary(&["A", "B"]), Some(&feed));
        assert!(index.is_empty());
    }

    #[test]
    fn pointer_resolves_to_position() {
        let feed = LiveFeed {
            current_location: Some(CurrentLocationPointer::new(code("C"), "Arriving at")),
            ..Default::default()
        };
        let index = MatchIndex::build(&itinerary(&["A", "B", "C", "D"]), Some(&feed));
        assert_eq!(index.current_index(), Some(2));
    }

    #[test]
    fn unknown_pointer_is_treated_as_absent() {
        let feed = LiveFeed {
            current_location: Some(CurrentLocationPointer::new(code("ZZ"), "Near")),
            ..Default::default()
        };
        let index = MatchIndex::build(&itinerary(&["A", "B"]), Some(&feed));
        assert!(index.current_index().is_none());
        assert!(index.is_empty());
    }

    #[test]
    fn frontier_is_furthest_reached_record() {
        let mut upcoming = LiveStopRecord::new(code("D"));
        upcoming.status = Some(LiveTag::Upcoming);

        let feed = LiveFeed {
            stop_records: vec![arrived_record("A"), arrived_record("C"), upcoming],
            ..Default::default()
        };
        let index = MatchIndex::build(&itinerary(&["A", "B", "C", "D", "E"]), Some(&feed));
        assert_eq!(index.record_frontier(), Some(2));
    }
}
