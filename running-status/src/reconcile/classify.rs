//! Stop status classification.
//!
//! Each stop is classified independently through four tiers; the first
//! tier with usable input decides:
//!
//! 1. **Explicit tag** on the stop's live record.
//! 2. **Actual times** on the stop's live record.
//! 3. **Position**: the current-location pointer if it resolved, otherwise
//!    the record frontier (stops beyond the furthest stop that records show
//!    as reached are upcoming).
//! 4. **Default**: scheduled, meaning "no information", never "on time".
//!
//! A live record with neither a tag nor an actual time carries no
//! positional information and is treated as absent for classification.

use std::fmt;

use crate::domain::{LiveStopRecord, LiveTag, ScheduledStop, StopRole};

use super::matcher::MatchIndex;

/// Lifecycle state of a stop.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StopStatus {
    /// No live information applies to this stop
    Scheduled,
    /// The train has not reached this stop yet
    Upcoming,
    /// The train is at this stop
    Current,
    /// The train has finished with this stop
    Completed,
}

impl fmt::Display for StopStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            StopStatus::Scheduled => "Scheduled",
            StopStatus::Upcoming => "Upcoming",
            StopStatus::Current => "Current",
            StopStatus::Completed => "Completed",
        };
        f.write_str(name)
    }
}

/// Which tier produced a classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Tier {
    ExplicitTag,
    ActualTimes,
    Position,
    Default,
}

/// The outcome of classifying one stop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Classification {
    pub status: StopStatus,
    pub is_current: bool,
    pub tier: Tier,
}

impl Classification {
    fn new(status: StopStatus, tier: Tier) -> Self {
        Self {
            status,
            is_current: status == StopStatus::Current,
            tier,
        }
    }
}

/// Classify a stop.
///
/// # Examples
///
/// ```
/// use running_status::domain::{Itinerary, LiveFeed, LiveStopRecord, LiveTag, ScheduledStop, StationCode};
/// use running_status::reconcile::{MatchIndex, StopStatus, classify};
///
/// let code = |s| StationCode::parse(s).unwrap();
/// let itinerary = Itinerary::new(vec![
///     ScheduledStop::new(code("A"), "A", 0),
///     ScheduledStop::new(code("B"), "B", 1),
///     ScheduledStop::new(code("C"), "C", 2),
/// ]);
///
/// // The terminus reporting "arrived" means the journey is complete
/// let mut record = LiveStopRecord::new(code("C"));
/// record.status = Some(LiveTag::Arrived);
/// let feed = LiveFeed { stop_records: vec![record], ..Default::default() };
///
/// let index = MatchIndex::build(&itinerary, Some(&feed));
/// let c = classify(&itinerary.stops()[2], &index, itinerary.len());
/// assert_eq!(c.status, StopStatus::Completed);
/// assert!(!c.is_current);
/// ```
pub fn classify(stop: &ScheduledStop, index: &MatchIndex<'_>, total_stops: usize) -> Classification {
    // A matched record rules out positional inference, even one that says nothing
    if let Some(record) = index.record_for(&stop.station) {
        if let Some(tag) = record.status {
            return Classification::new(
                classify_tag(tag, stop.sequence_index, total_stops),
                Tier::ExplicitTag,
            );
        }
        if record.has_actual_time() {
            return Classification::new(
                classify_actual_times(record, stop.sequence_index, total_stops),
                Tier::ActualTimes,
            );
        }
        return Classification::new(StopStatus::Scheduled, Tier::Default);
    }

    if let Some(status) = classify_position(stop.sequence_index, index) {
        return Classification::new(status, Tier::Position);
    }

    Classification::new(StopStatus::Scheduled, Tier::Default)
}

/// Classify from a live record alone (tiers 1 and 2).
///
/// Returns `None` if the record has neither a tag nor an actual time.
pub(crate) fn classify_record(
    record: &LiveStopRecord,
    sequence_index: usize,
    total_stops: usize,
) -> Option<StopStatus> {
    if let Some(tag) = record.status {
        return Some(classify_tag(tag, sequence_index, total_stops));
    }
    if record.has_actual_time() {
        return Some(classify_actual_times(record, sequence_index, total_stops));
    }
    None
}

fn classify_tag(tag: LiveTag, sequence_index: usize, total_stops: usize) -> StopStatus {
    let is_terminus = StopRole::of(sequence_index, total_stops).is_terminus();
    match tag {
        LiveTag::Departed => StopStatus::Completed,
        LiveTag::Arrived if is_terminus => StopStatus::Completed,
        LiveTag::Arrived => StopStatus::Current,
        LiveTag::Upcoming => StopStatus::Upcoming,
    }
}

fn classify_actual_times(
    record: &LiveStopRecord,
    sequence_index: usize,
    total_stops: usize,
) -> StopStatus {
    let is_terminus = StopRole::of(sequence_index, total_stops).is_terminus();
    let has_arr = record.actual_arrival.is_some();
    let has_dep = record.actual_departure.is_some();

    if has_arr && !has_dep && !is_terminus {
        StopStatus::Current
    } else if has_dep || (has_arr && is_terminus) {
        StopStatus::Completed
    } else {
        StopStatus::Upcoming
    }
}

fn classify_position(sequence_index: usize, index: &MatchIndex<'_>) -> Option<StopStatus> {
    if let Some(p) = index.current_index() {
        return Some(match sequence_index.cmp(&p) {
            std::cmp::Ordering::Less => StopStatus::Completed,
            std::cmp::Ordering::Equal => StopStatus::Current,
            std::cmp::Ordering::Greater => StopStatus::Upcoming,
        });
    }

    index
        .record_frontier()
        .filter(|&frontier| sequence_index > frontier)
        .map(|_| StopStatus::Upcoming)
}
