//! Delay annotation.

use std::fmt;

use crate::domain::{LiveStopRecord, ScheduledStop, StopRole};

/// Which leg of a stop a delay refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Leg {
    Arrival,
    Departure,
}

impl Leg {
    /// Short prefix used in display text.
    pub fn prefix(self) -> &'static str {
        match self {
            Leg::Arrival => "Arr",
            Leg::Departure => "Dep",
        }
    }
}

impl fmt::Display for Leg {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Leg::Arrival => f.write_str("Arrival"),
            Leg::Departure => f.write_str("Departure"),
        }
    }
}

/// Classification of a signed delay.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Verdict {
    Late,
    Early,
    OnTime,
}

impl Verdict {
    /// Positive is late, negative is early, zero is on time.
    pub fn from_minutes(minutes: i32) -> Self {
        match minutes.signum() {
            1 => Verdict::Late,
            -1 => Verdict::Early,
            _ => Verdict::OnTime,
        }
    }
}

impl fmt::Display for Verdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Verdict::Late => f.write_str("Late"),
            Verdict::Early => f.write_str("Early"),
            Verdict::OnTime => f.write_str("OnTime"),
        }
    }
}

/// A reported delay on one leg of a stop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DelayAnnotation {
    pub leg: Leg,
    pub minutes: i32,
    pub verdict: Verdict,
}

impl DelayAnnotation {
    pub fn new(leg: Leg, minutes: i32) -> Self {
        Self {
            leg,
            minutes,
            verdict: Verdict::from_minutes(minutes),
        }
    }

    /// Display text, e.g. "Arr: +12m late" or "Dep: On time".
    pub fn text(&self) -> String {
        let prefix = self.leg.prefix();
        match self.verdict {
            Verdict::Late => format!("{prefix}: +{}m late", self.minutes),
            Verdict::Early => format!("{prefix}: {}m early", self.minutes.unsigned_abs()),
            Verdict::OnTime => format!("{prefix}: On time"),
        }
    }
}

/// Build the delay annotations for a stop.
///
/// Only legs with a reported delay get an annotation; an unknown delay is
/// never shown as on time. The origin has no arrival leg and the terminus
/// has no departure leg. Arrival comes before departure.
pub fn annotate(
    stop: &ScheduledStop,
    record: Option<&LiveStopRecord>,
    total_stops: usize,
) -> Vec<DelayAnnotation> {
    let Some(record) = record else {
        return Vec::new();
    };
    let role = StopRole::of(stop.sequence_index, total_stops);

    let arrival = record
        .delay_arrival_minutes
        .filter(|_| !role.is_origin())
        .map(|m| DelayAnnotation::new(Leg::Arrival, m));
    let departure = record
        .delay_departure_minutes
        .filter(|_| !role.is_terminus())
        .map(|m| DelayAnnotation::new(Leg::Departure, m));

    arrival.into_iter().chain(departure).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::StationCode;

    fn code(s: &str) -> StationCode {
        StationCode::parse(s).unwrap()
    }

    fn record(arr: Option<i32>, dep: Option<i32>) -> LiveStopRecord {
        let mut r = LiveStopRecord::new(code("B"));
        r.delay_arrival_minutes = arr;
        r.delay_departure_minutes = dep;
        r
    }

    #[test]
    fn verdicts() {
        assert_eq!(Verdict::from_minutes(0), Verdict::OnTime);
        assert_eq!(Verdict::from_minutes(5), Verdict::Late);
        assert_eq!(Verdict::from_minutes(-3), Verdict::Early);
    }

    #[test]
    fn text() {
        assert_eq!(DelayAnnotation::new(Leg::Arrival, 12).text(), "Arr: +12m late");
        assert_eq!(DelayAnnotation::new(Leg::Departure, -3).text(), "Dep: 3m early");
        assert_eq!(DelayAnnotation::new(Leg::Arrival, 0).text(), "Arr: On time");
    }

    #[test]
    fn no_record_no_annotations() {
        let stop = ScheduledStop::new(code("B"), "B", 1);
        assert!(annotate(&stop, None, 3).is_empty());
    }

    #[test]
    fn intermediate_has_both_legs_in_order() {
        let stop = ScheduledStop::new(code("B"), "B", 1);
        let annotations = annotate(&stop, Some(&record(Some(12), Some(0))), 3);
        assert_eq!(
            annotations,
            vec![
                DelayAnnotation::new(Leg::Arrival, 12),
                DelayAnnotation::new(Leg::Departure, 0),
            ]
        );
    }

    #[test]
    fn origin_has_no_arrival_leg() {
        let stop = ScheduledStop::new(code("B"), "B", 0);
        let annotations = annotate(&stop, Some(&record(Some(4), Some(2))), 3);
        assert_eq!(annotations, vec![DelayAnnotation::new(Leg::Departure, 2)]);
    }

    #[test]
    fn terminus_has_no_departure_leg() {
        let stop = ScheduledStop::new(code("B"), "B", 2);
        let annotations = annotate(&stop, Some(&record(Some(4), Some(2))), 3);
        assert_eq!(annotations, vec![DelayAnnotation::new(Leg::Arrival, 4)]);
    }

    #[test]
    fn absent_delay_is_not_on_time() {
        let stop = ScheduledStop::new(code("B"), "B", 1);
        let mut r = record(None, None);
        r.actual_arrival = Some(chrono::Utc::now());
        assert!(annotate(&stop, Some(&r), 3).is_empty());
    }

    #[test]
    fn sole_stop_has_no_legs() {
        let stop = ScheduledStop::new(code("B"), "B", 0);
        assert!(annotate(&stop, Some(&record(Some(1), Some(1))), 1).is_empty());
    }
}
