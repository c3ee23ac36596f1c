//! Askama templates for the web frontend.

use askama::Template;

use super::dto::{DelayResult, RunningStatusResponse, StopViewResult};

/// Home page with the lookup form.
#[derive(Template)]
#[template(path = "index.html")]
pub struct IndexTemplate {
    /// Zone the journey date and times are in
    pub zone_label: String,
}

/// Running-status fragment, swapped into the page by the static frontend.
#[derive(Template)]
#[template(path = "status.html")]
pub struct StatusTemplate {
    pub status: RunningStatusResponse,
    /// Zone of every displayed time, e.g. "IST"
    pub zone_label: String,
}

impl StatusTemplate {
    /// CSS classes for a stop row.
    pub fn row_class(&self, stop: &StopViewResult) -> String {
        if stop.is_current {
            format!("stop {} current", stop.display_status)
        } else {
            format!("stop {}", stop.display_status)
        }
    }

    /// CSS class for a delay badge.
    pub fn delay_class(&self, delay: &DelayResult) -> &'static str {
        match delay.verdict.as_str() {
            "Late" => "delay late",
            "Early" => "delay early",
            _ => "delay on-time",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{
        FixedOffsetLocalizer, Itinerary, LiveFeed, LiveStopRecord, LiveTag, ScheduledStop,
        StationCode, TimeLocalizer, TrainInfo, TrainNumber, parse_rfc3339,
    };
    use crate::reconcile::reconcile;

    fn code(s: &str) -> StationCode {
        StationCode::parse(s).unwrap()
    }

    fn render(feed: Option<&LiveFeed>) -> String {
        let ist = FixedOffsetLocalizer::ist();
        let itinerary = Itinerary::new(vec![
            ScheduledStop::new(code("A"), "Alpha <Jn>", 0),
            ScheduledStop::new(code("B"), "Bravo", 1),
            ScheduledStop::new(code("C"), "Charlie", 2),
        ]);
        let view = reconcile(&itinerary, feed, &ist);
        let train = TrainInfo::new(TrainNumber::parse("12301").unwrap(), "Howrah Rajdhani");

        StatusTemplate {
            status: RunningStatusResponse::new(&train, &view, None),
            zone_label: ist.zone_label().to_string(),
        }
        .render()
        .unwrap()
    }

    #[test]
    fn renders_scheduled_itinerary() {
        let html = render(None);
        assert!(html.contains("12301"));
        assert!(html.contains("Howrah Rajdhani"));
        assert!(html.contains("SCHEDULED"));
        assert!(html.contains("No live data"));
        assert!(!html.contains("stop scheduled current"));
    }

    #[test]
    fn escapes_station_names() {
        let html = render(None);
        assert!(html.contains("Alpha &lt;Jn&gt;"));
        assert!(!html.contains("Alpha <Jn>"));
    }

    #[test]
    fn renders_live_status() {
        let mut a = LiveStopRecord::new(code("A"));
        a.status = Some(LiveTag::Departed);
        a.actual_departure = parse_rfc3339("2025-10-05T06:03:00+05:30");
        a.delay_departure_minutes = Some(3);
        let mut b = LiveStopRecord::new(code("B"));
        b.status = Some(LiveTag::Arrived);
        let feed = LiveFeed {
            stop_records: vec![a, b],
            summary: Some("Running 3 min late".to_string()),
            ..Default::default()
        };

        let html = render(Some(&feed));
        assert!(html.contains("Left at 06:03"));
        assert!(html.contains("Dep: +3m late"));
        assert!(html.contains("delay late"));
        assert!(html.contains("stop current current"));
        assert!(html.contains("Running 3 min late"));
        assert!(!html.contains("No live data"));
    }

    #[test]
    fn index_page() {
        let html = IndexTemplate {
            zone_label: "IST".to_string(),
        }
        .render()
        .unwrap();
        assert!(html.contains("/static/app.js"));
        assert!(html.contains("IST"));
    }

    #[test]
    fn row_classes() {
        let html = render(None);
        assert!(html.contains(r#"class="stop scheduled""#));
    }
}
