//! View assembly.
//!
//! Turns an itinerary plus an optional live feed into plain display data.
//! Every instant is rendered through the supplied [`TimeLocalizer`].

use crate::domain::{
    Itinerary, LiveFeed, LiveStopRecord, ScheduledStop, StationCode, StopRole, TIME_PLACEHOLDER,
    TimeLocalizer,
};

use super::classify::{Classification, StopStatus, classify};
use super::delay::{DelayAnnotation, annotate};
use super::matcher::MatchIndex;

/// Status as presented to the user.
///
/// `Departed` is not a separate lifecycle state: it is a completed stop
/// that has a recorded departure time and is not the terminus.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DisplayStatus {
    Scheduled,
    Upcoming,
    Current,
    Completed,
    Departed,
}

impl DisplayStatus {
    /// Badge text for a stop with this status in the given role.
    pub fn label(self, role: StopRole) -> &'static str {
        match self {
            DisplayStatus::Scheduled => "SCHEDULED",
            DisplayStatus::Upcoming => "UPCOMING",
            DisplayStatus::Current => "ARRIVED",
            DisplayStatus::Completed if role.is_terminus() => "ARRIVED",
            DisplayStatus::Completed | DisplayStatus::Departed => "DEPARTED",
        }
    }

    /// Lower-case name, used as a CSS class.
    pub fn css_class(self) -> &'static str {
        match self {
            DisplayStatus::Scheduled => "scheduled",
            DisplayStatus::Upcoming => "upcoming",
            DisplayStatus::Current => "current",
            DisplayStatus::Completed => "completed",
            DisplayStatus::Departed => "departed",
        }
    }
}

/// Display data for one stop.
#[derive(Debug, Clone, PartialEq)]
pub struct StopView {
    pub station_code: StationCode,
    pub station_name: String,
    pub role: StopRole,
    /// Live platform if reported, otherwise the booked one
    pub platform: Option<String>,
    pub scheduled_display: Vec<String>,
    pub actual_display: Vec<String>,
    pub status: StopStatus,
    pub display_status: DisplayStatus,
    pub label: &'static str,
    pub caption: Option<String>,
    pub delay_annotations: Vec<DelayAnnotation>,
    pub is_current: bool,
}

/// Where the tracker last placed the train.
#[derive(Debug, Clone, PartialEq)]
pub struct CurrentLocationView {
    pub station_code: StationCode,
    pub station_name: String,
    pub status: String,
    pub distance_from_origin_km: Option<f64>,
}

/// The assembled result of one lookup.
#[derive(Debug, Clone, PartialEq)]
pub struct StatusView {
    pub stops: Vec<StopView>,
    pub has_live_data: bool,
    pub summary: Option<String>,
    pub last_updated: Option<String>,
    pub current_location: Option<CurrentLocationView>,
}

impl StatusView {
    /// The stop the train is at, if any.
    pub fn current_stop(&self) -> Option<&StopView> {
        self.stops.iter().find(|s| s.is_current)
    }
}

/// Run the full pipeline for one lookup.
///
/// This never fails: any shape of input yields one [`StopView`] per
/// scheduled stop, in itinerary order, with at most one marked current.
///
/// # Examples
///
/// ```
/// use running_status::domain::{
///     CurrentLocationPointer, FixedOffsetLocalizer, Itinerary, LiveFeed, ScheduledStop, StationCode,
/// };
/// use running_status::reconcile::reconcile;
///
/// let code = |s| StationCode::parse(s).unwrap();
/// let itinerary = Itinerary::new(vec![
///     ScheduledStop::new(code("A"), "Alpha", 0),
///     ScheduledStop::new(code("B"), "Bravo", 1),
///     ScheduledStop::new(code("C"), "Charlie", 2),
/// ]);
/// let feed = LiveFeed {
///     current_location: Some(CurrentLocationPointer::new(code("B"), "Arriving at")),
///     ..Default::default()
/// };
///
/// let view = reconcile(&itinerary, Some(&feed), &FixedOffsetLocalizer::ist());
/// let labels: Vec<_> = view.stops.iter().map(|s| s.label).collect();
/// assert_eq!(labels, vec!["DEPARTED", "ARRIVED", "UPCOMING"]);
/// assert!(view.has_live_data);
/// ```
pub fn reconcile(
    itinerary: &Itinerary,
    feed: Option<&LiveFeed>,
    localizer: &dyn TimeLocalizer,
) -> StatusView {
    let total = itinerary.len();
    let index = MatchIndex::build(itinerary, feed);

    let mut classifications: Vec<Classification> = itinerary
        .stops()
        .iter()
        .map(|stop| classify(stop, &index, total))
        .collect();
    demote_stale_currents(&mut classifications);

    let stops = itinerary
        .stops()
        .iter()
        .zip(classifications)
        .map(|(stop, classification)| {
            let record = index.record_for(&stop.station);
            assemble_stop(stop, record, classification, total, localizer)
        })
        .collect();

    let current_location = feed
        .and_then(|f| f.current_location.as_ref())
        .and_then(|pointer| {
            let stop = itinerary.stop(&pointer.station)?;
            Some(CurrentLocationView {
                station_code: pointer.station,
                station_name: stop.station_name.clone(),
                status: pointer.status.clone(),
                distance_from_origin_km: pointer.distance_from_origin_km,
            })
        });

    StatusView {
        stops,
        has_live_data: feed.is_some() && !index.is_empty(),
        summary: feed.and_then(|f| f.summary.clone()),
        last_updated: feed
            .and_then(|f| f.last_updated())
            .map(|t| localizer.format_date_time(t)),
        current_location,
    }
}

/// Keep only the furthest current stop; earlier ones have been left behind.
fn demote_stale_currents(classifications: &mut [Classification]) {
    let Some(furthest) = classifications.iter().rposition(|c| c.is_current) else {
        return;
    };
    for c in &mut classifications[..furthest] {
        if c.is_current {
            c.status = StopStatus::Completed;
            c.is_current = false;
        }
    }
}

fn assemble_stop(
    stop: &ScheduledStop,
    record: Option<&LiveStopRecord>,
    classification: Classification,
    total: usize,
    localizer: &dyn TimeLocalizer,
) -> StopView {
    let role = StopRole::of(stop.sequence_index, total);

    let departed_at = record
        .and_then(|r| r.actual_departure)
        .filter(|_| classification.status == StopStatus::Completed && !role.is_terminus());

    let display_status = match classification.status {
        StopStatus::Scheduled => DisplayStatus::Scheduled,
        StopStatus::Upcoming => DisplayStatus::Upcoming,
        StopStatus::Current => DisplayStatus::Current,
        StopStatus::Completed if departed_at.is_some() => DisplayStatus::Departed,
        StopStatus::Completed => DisplayStatus::Completed,
    };

    StopView {
        station_code: stop.station,
        station_name: stop.station_name.clone(),
        role,
        platform: record
            .and_then(|r| r.platform.clone())
            .or_else(|| stop.platform.clone()),
        scheduled_display: scheduled_display(stop, role, localizer),
        actual_display: actual_display(record, role, classification.status, localizer),
        status: classification.status,
        display_status,
        label: display_status.label(role),
        caption: departed_at.map(|t| format!("Left at {}", localizer.format_time(t))),
        delay_annotations: annotate(stop, record, total),
        is_current: classification.is_current,
    }
}

fn scheduled_display(stop: &ScheduledStop, role: StopRole, localizer: &dyn TimeLocalizer) -> Vec<String> {
    let arrival = || localizer.format_time_or_placeholder(stop.scheduled_arrival);
    let departure = || localizer.format_time_or_placeholder(stop.scheduled_departure);

    match role {
        StopRole::Sole => vec!["Start".to_string(), "End".to_string()],
        StopRole::Origin => vec!["Start".to_string(), departure()],
        StopRole::Terminus => vec![arrival(), "End".to_string()],
        StopRole::Intermediate => vec![format!("Arr: {}", arrival()), format!("Dep: {}", departure())],
    }
}

fn actual_display(
    record: Option<&LiveStopRecord>,
    role: StopRole,
    status: StopStatus,
    localizer: &dyn TimeLocalizer,
) -> Vec<String> {
    let mut lines = Vec::with_capacity(2);
    if let Some(record) = record {
        if let Some(t) = record.actual_arrival.filter(|_| !role.is_origin()) {
            lines.push(format!("Arr: {}", localizer.format_time(t)));
        }
        if let Some(t) = record.actual_departure.filter(|_| !role.is_terminus()) {
            lines.push(format!("Dep: {}", localizer.format_time(t)));
        }
    }

    if lines.is_empty() {
        let placeholder = match status {
            StopStatus::Completed => "Completed",
            StopStatus::Current => "At station",
            StopStatus::Scheduled | StopStatus::Upcoming => TIME_PLACEHOLDER,
        };
        lines.push(placeholder.to_string());
    }
    lines
}


#[cfg(test)]
mod proptests {
    use super::*;
    use crate::domain::{CurrentLocationPointer, FixedOffsetLocalizer, LiveTag, instant_from_epoch};
    use proptest::prelude::*;

    fn code_for(i: usize) -> StationCode {
        let c1 = b'A' + ((i / 26) % 26) as u8;
        let c2 = b'A' + (i % 26) as u8;
        StationCode::parse(&format!("{}{}", c1 as char, c2 as char)).unwrap()
    }

    fn itinerary(n: usize) -> Itinerary {
        Itinerary::new(
            (0..n)
                .map(|i| ScheduledStop::new(code_for(i), format!("Station {i}"), i))
                .collect(),
        )
    }

    fn record_strategy() -> impl Strategy<Value = (usize, Option<u8>, bool, bool, Option<i32>, Option<i32>)> {
        (
            0usize..30,
            prop::option::of(0u8..3),
            any::<bool>(),
            any::<bool>(),
            prop::option::of(-60i32..240),
            prop::option::of(-60i32..240),
        )
    }

    fn feed_strategy() -> impl Strategy<Value = Option<LiveFeed>> {
        prop::option::of((
            prop::collection::vec(record_strategy(), 0..12),
            prop::option::of(0usize..35),
        ))
        .prop_map(|maybe| {
            maybe.map(|(records, pointer)| {
                let t = instant_from_epoch(1_759_651_200);
                LiveFeed {
                    stop_records: records
                        .into_iter()
                        .map(|(i, tag, arr, dep, da, dd)| {
                            let mut r = LiveStopRecord::new(code_for(i));
                            r.status = tag.map(|n| match n {
                                0 => LiveTag::Departed,
                                1 => LiveTag::Arrived,
                                _ => LiveTag::Upcoming,
                            });
                            r.actual_arrival = t.filter(|_| arr);
                            r.actual_departure = t.filter(|_| dep);
                            r.delay_arrival_minutes = da;
                            r.delay_departure_minutes = dd;
                            r
                        })
                        .collect(),
                    current_location: pointer.map(|p| CurrentLocationPointer::new(code_for(p), "At")),
                    ..Default::default()
                }
            })
        })
    }

    proptest! {
        /// One view per stop, in order, with at most one current
        #[test]
        fn assembly_is_total(n in 0usize..30, feed in feed_strategy()) {
            let itinerary = itinerary(n);
            let view = reconcile(&itinerary, feed.as_ref(), &FixedOffsetLocalizer::ist());

            prop_assert_eq!(view.stops.len(), n);
            for (stop, v) in itinerary.stops().iter().zip(&view.stops) {
                prop_assert_eq!(stop.station, v.station_code);
                prop_assert_eq!(v.is_current, v.status == StopStatus::Current);
                prop_assert!(!v.actual_display.is_empty());
            }
            prop_assert!(view.stops.iter().filter(|s| s.is_current).count() <= 1);
        }

        /// Origin never shows arrival data; terminus never shows departure data
        #[test]
        fn legs_respect_roles(n in 1usize..30, feed in feed_strategy()) {
            let itinerary = itinerary(n);
            let view = reconcile(&itinerary, feed.as_ref(), &FixedOffsetLocalizer::ist());

            for v in &view.stops {
                if v.role.is_origin() {
                    prop_assert!(v.actual_display.iter().all(|l| !l.starts_with("Arr:")));
                    prop_assert!(v.delay_annotations.iter().all(|d| d.leg != crate::reconcile::Leg::Arrival));
                }
                if v.role.is_terminus() {
                    prop_assert!(v.actual_display.iter().all(|l| !l.starts_with("Dep:")));
                    prop_assert!(v.delay_annotations.iter().all(|d| d.leg != crate::reconcile::Leg::Departure));
                }
            }
        }

        /// Departed only refines completed non-terminus stops
        #[test]
        fn departed_refinement_is_narrow(n in 1usize..30, feed in feed_strategy()) {
            let itinerary = itinerary(n);
            let view = reconcile(&itinerary, feed.as_ref(), &FixedOffsetLocalizer::ist());

            for v in &view.stops {
                if v.display_status == DisplayStatus::Departed {
                    prop_assert_eq!(v.status, StopStatus::Completed);
                    prop_assert!(!v.role.is_terminus());
                    prop_assert!(v.caption.is_some());
                }
            }
        }

        /// Without a feed every stop is scheduled
        #[test]
        fn no_feed_all_scheduled(n in 0usize..30) {
            let view = reconcile(&itinerary(n), None, &FixedOffsetLocalizer::ist());
            prop_assert!(view.stops.iter().all(|s| s.status == StopStatus::Scheduled && !s.is_current));
        }
    }
}
