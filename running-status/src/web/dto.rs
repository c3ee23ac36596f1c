//! Data transfer objects for web requests and responses.

use serde::{Deserialize, Serialize};

use crate::domain::TrainInfo;
use crate::reconcile::{CurrentLocationView, DelayAnnotation, StatusView, StopView};
use crate::sequence::RequestSeq;

/// Query for a running-status lookup.
#[derive(Debug, Deserialize)]
pub struct RunningStatusRequest {
    /// Train number, 4 or 5 digits
    pub train_number: String,

    /// Journey date as YYYY-MM-DD
    pub journey_date: String,

    /// Client request number, echoed back so stale responses can be dropped
    pub seq: Option<RequestSeq>,
}

/// Train summary.
#[derive(Debug, Serialize)]
pub struct TrainSummary {
    pub number: String,
    pub name: String,
    pub train_type: String,
    pub zone: String,
    pub source_code: Option<String>,
    pub source_name: String,
    pub destination_code: Option<String>,
    pub destination_name: String,

    /// Running days, e.g. "Mo We Fr"
    pub running_days: String,

    pub return_train: Option<String>,

    /// Travel time as "Xh Ym"
    pub travel_time: String,

    pub total_halts: u32,
    pub distance_km: u32,
    pub avg_speed_kmph: u32,
}

impl TrainSummary {
    pub fn from_train(train: &TrainInfo) -> Self {
        Self {
            number: train.number.to_string(),
            name: train.name.clone(),
            train_type: train.train_type.clone(),
            zone: train.zone.clone(),
            source_code: train.source.map(|c| c.to_string()),
            source_name: train.source_name.clone(),
            destination_code: train.destination.map(|c| c.to_string()),
            destination_name: train.destination_name.clone(),
            running_days: train.running_days.as_names(),
            return_train: train.return_train.map(|t| t.to_string()),
            travel_time: train.travel_time_display(),
            total_halts: train.total_halts,
            distance_km: train.distance_km,
            avg_speed_kmph: train.avg_speed_kmph,
        }
    }
}

/// A delay on one leg of a stop.
#[derive(Debug, Serialize)]
pub struct DelayResult {
    /// "Arrival" or "Departure"
    pub leg: String,

    /// Signed minutes; negative is early
    pub minutes: i32,

    /// "Late", "Early" or "OnTime"
    pub verdict: String,

    /// Display text, e.g. "Arr: +12m late"
    pub text: String,
}

impl DelayResult {
    pub fn from_annotation(annotation: &DelayAnnotation) -> Self {
        Self {
            leg: annotation.leg.to_string(),
            minutes: annotation.minutes,
            verdict: annotation.verdict.to_string(),
            text: annotation.text(),
        }
    }
}

/// One stop of the itinerary.
#[derive(Debug, Serialize)]
pub struct StopViewResult {
    pub station_code: String,
    pub station_name: String,
    pub platform: Option<String>,

    /// Booked times, one display line each
    pub scheduled_display: Vec<String>,

    /// Recorded times or a status placeholder, one display line each
    pub actual_display: Vec<String>,

    /// Lifecycle state: "Scheduled", "Upcoming", "Current" or "Completed"
    pub status: String,

    /// Presentation state, also used as a CSS class
    pub display_status: String,

    /// Badge text, e.g. "DEPARTED"
    pub status_label: String,

    /// Extra line under the badge, e.g. "Left at 06:03"
    pub caption: Option<String>,

    pub delays: Vec<DelayResult>,
    pub is_current: bool,
}

impl StopViewResult {
    pub fn from_view(view: &StopView) -> Self {
        Self {
            station_code: view.station_code.to_string(),
            station_name: view.station_name.clone(),
            platform: view.platform.clone(),
            scheduled_display: view.scheduled_display.clone(),
            actual_display: view.actual_display.clone(),
            status: view.status.to_string(),
            display_status: view.display_status.css_class().to_string(),
            status_label: view.label.to_string(),
            caption: view.caption.clone(),
            delays: view
                .delay_annotations
                .iter()
                .map(DelayResult::from_annotation)
                .collect(),
            is_current: view.is_current,
        }
    }
}

/// Where the tracker last placed the train.
#[derive(Debug, Serialize)]
pub struct CurrentLocationResult {
    pub station_code: String,
    pub station_name: String,
    pub status: String,

    /// Rounded to one decimal place
    pub distance_from_origin_km: Option<f64>,
}

impl CurrentLocationResult {
    pub fn from_view(view: &CurrentLocationView) -> Self {
        Self {
            station_code: view.station_code.to_string(),
            station_name: view.station_name.clone(),
            status: view.status.clone(),
            distance_from_origin_km: view
                .distance_from_origin_km
                .map(|d| (d * 10.0).round() / 10.0),
        }
    }
}

/// Response for a running-status lookup.
#[derive(Debug, Serialize)]
pub struct RunningStatusResponse {
    pub train: TrainSummary,
    pub stops: Vec<StopViewResult>,

    /// True if the live feed lined up with the itinerary at all
    pub has_live_data: bool,

    pub summary: Option<String>,

    /// Localized "DD/MM/YYYY, HH:MM"
    pub last_updated: Option<String>,

    pub current_location: Option<CurrentLocationResult>,

    /// Echo of the request's `seq`
    pub seq: Option<RequestSeq>,
}

impl RunningStatusResponse {
    pub fn new(train: &TrainInfo, view: &StatusView, seq: Option<RequestSeq>) -> Self {
        Self {
            train: TrainSummary::from_train(train),
            stops: view.stops.iter().map(StopViewResult::from_view).collect(),
            has_live_data: view.has_live_data,
            summary: view.summary.clone(),
            last_updated: view.last_updated.clone(),
            current_location: view
                .current_location
                .as_ref()
                .map(CurrentLocationResult::from_view),
            seq,
        }
    }
}

/// Error response.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}
