//! Conversion from RailRadar DTOs to domain types.
//!
//! Conversion never fails. Entries with unusable station codes are logged
//! and skipped, and timestamps that do not convert become absent, so a
//! single bad leaf cannot sink a whole status lookup.

use std::collections::HashMap;

use chrono::{DateTime, FixedOffset, NaiveDate, Utc};
use tracing::warn;

use crate::domain::{
    CurrentLocationPointer, Itinerary, LiveFeed, LiveStopRecord, LiveTag, RunningDays,
    ScheduledStop, StationCode, TrainInfo, TrainNumber, civil_instant, instant_from_epoch,
    parse_rfc3339,
};

use super::types::{CurrentLocationDto, LiveData, LiveRouteEntry, RouteEntry, TrainDto, TrainStatusData};

/// Everything conversion needs besides the payload.
#[derive(Debug, Clone, Copy)]
pub struct ConversionContext {
    /// The train that was asked for; used if the payload's number is unusable
    pub requested: TrainNumber,
    /// Day 1 of the journey, in the timetable's civil zone
    pub journey_date: NaiveDate,
    /// Civil offset of the timetable's minutes-past-midnight times
    pub offset: FixedOffset,
    /// Reference instant for deriving stop tags from actual times
    pub now: DateTime<Utc>,
}

/// A converted status response.
#[derive(Debug, Clone)]
pub struct TrainStatus {
    pub train: TrainInfo,
    pub itinerary: Itinerary,
    pub live: Option<LiveFeed>,
}

/// Convert a status payload to domain types.
pub fn convert_status(data: &TrainStatusData, ctx: &ConversionContext) -> TrainStatus {
    let live_schedule = data
        .live_data
        .as_ref()
        .map(live_scheduled_times)
        .unwrap_or_default();

    TrainStatus {
        train: convert_train(&data.train, ctx.requested),
        itinerary: convert_route(&data.route, &live_schedule, ctx),
        live: data.live_data.as_ref().map(|live| convert_live(live, ctx.now)),
    }
}

fn convert_train(dto: &TrainDto, requested: TrainNumber) -> TrainInfo {
    let number = dto
        .train_number
        .as_deref()
        .and_then(|n| TrainNumber::parse(n).ok())
        .unwrap_or(requested);

    let mut train = TrainInfo::new(number, dto.train_name.clone());
    train.train_type = dto.train_type.clone();
    train.zone = dto.zone.clone();
    train.source = StationCode::parse_normalized(&dto.source_station_code).ok();
    train.source_name = dto.source_station_name.clone();
    train.destination = StationCode::parse_normalized(&dto.destination_station_code).ok();
    train.destination_name = dto.destination_station_name.clone();
    train.running_days = RunningDays::from_bitmap(dto.running_days_bitmap);
    train.return_train = dto
        .return_train_number
        .as_deref()
        .and_then(|n| TrainNumber::parse(n).ok());
    train.travel_time_mins = dto.travel_time_minutes;
    train.total_halts = dto.total_halts;
    train.distance_km = dto.distance_km;
    train.avg_speed_kmph = dto.avg_speed_kmph;
    train
}

type ScheduledPair = (Option<DateTime<Utc>>, Option<DateTime<Utc>>);

/// Scheduled instants carried on the live route, used to fill timetable gaps.
fn live_scheduled_times(live: &LiveData) -> HashMap<StationCode, ScheduledPair> {
    live.route
        .iter()
        .filter_map(|entry| {
            let code = StationCode::parse_normalized(&entry.station.code).ok()?;
            let arrival = entry.scheduled_arrival.and_then(instant_from_epoch);
            let departure = entry.scheduled_departure.and_then(instant_from_epoch);
            Some((code, (arrival, departure)))
        })
        .collect()
}

fn convert_route(
    route: &[RouteEntry],
    live_schedule: &HashMap<StationCode, ScheduledPair>,
    ctx: &ConversionContext,
) -> Itinerary {
    let mut entries: Vec<&RouteEntry> = route.iter().collect();
    if entries.iter().all(|e| e.sequence.is_some()) {
        entries.sort_by_key(|e| e.sequence);
    } else {
        warn!("route has entries without a sequence number, keeping upstream order");
    }

    let last = entries.len().saturating_sub(1);
    let mut stops = Vec::with_capacity(entries.len());

    for (i, entry) in entries.into_iter().enumerate() {
        // Pass-through points are not stops, but the route always keeps its ends
        if !entry.is_halt() && i != 0 && i != last {
            continue;
        }

        let Ok(station) = StationCode::parse_normalized(&entry.station_code) else {
            warn!(code = %entry.station_code, "skipping route entry with invalid station code");
            continue;
        };

        let (arrival, departure) = timetable_instants(entry, ctx);
        let (live_arrival, live_departure) =
            live_schedule.get(&station).copied().unwrap_or_default();

        let mut stop = ScheduledStop::new(station, entry.station_name.clone(), stops.len());
        stop.scheduled_arrival = arrival.or(live_arrival);
        stop.scheduled_departure = departure.or(live_departure);
        stop.platform = entry.platform.clone();
        stops.push(stop);
    }

    Itinerary::new(stops)
}

/// Resolve a route entry's minutes-past-midnight times to instants.
///
/// A departure earlier in the day than the arrival has crossed midnight.
fn timetable_instants(entry: &RouteEntry, ctx: &ConversionContext) -> ScheduledPair {
    let day = entry.day.unwrap_or(1).max(1);
    let arrival = entry
        .scheduled_arrival
        .and_then(|m| civil_instant(ctx.journey_date, day, m, ctx.offset));

    let departure_day = match (entry.scheduled_arrival, entry.scheduled_departure) {
        (Some(arr), Some(dep)) if dep < arr => day.saturating_add(1),
        _ => day,
    };
    let departure = entry
        .scheduled_departure
        .and_then(|m| civil_instant(ctx.journey_date, departure_day, m, ctx.offset));

    (arrival, departure)
}

fn convert_live(live: &LiveData, now: DateTime<Utc>) -> LiveFeed {
    let stop_records = live
        .route
        .iter()
        .filter_map(|entry| convert_live_entry(entry, now))
        .collect();

    let last_updated_at = live.last_updated_at.as_deref().and_then(parse_rfc3339);

    LiveFeed {
        stop_records,
        current_location: live
            .current_location
            .as_ref()
            .and_then(|loc| convert_location(loc, last_updated_at)),
        summary: live
            .status_summary
            .as_ref()
            .map(|s| s.trim())
            .filter(|s| !s.is_empty())
            .map(str::to_string),
        last_updated_at,
    }
}

fn convert_live_entry(entry: &LiveRouteEntry, now: DateTime<Utc>) -> Option<LiveStopRecord> {
    let Ok(station) = StationCode::parse_normalized(&entry.station.code) else {
        warn!(code = %entry.station.code, "skipping live record with invalid station code");
        return None;
    };

    let mut record = LiveStopRecord::new(station);
    record.actual_arrival = entry.actual_arrival.and_then(instant_from_epoch);
    record.actual_departure = entry.actual_departure.and_then(instant_from_epoch);
    record.delay_arrival_minutes = entry.delay_arrival_minutes;
    record.delay_departure_minutes = entry.delay_departure_minutes;
    record.platform = entry.platform.clone();
    record.status = entry
        .status
        .as_deref()
        .and_then(LiveTag::parse)
        .or_else(|| LiveTag::derive(record.actual_arrival, record.actual_departure, now));
    Some(record)
}

fn convert_location(
    loc: &CurrentLocationDto,
    last_updated_at: Option<DateTime<Utc>>,
) -> Option<CurrentLocationPointer> {
    let Ok(station) = StationCode::parse_normalized(&loc.station_code) else {
        warn!(code = %loc.station_code, "ignoring current location with invalid station code");
        return None;
    };

    let mut pointer = CurrentLocationPointer::new(station, loc.status.trim());
    pointer.distance_from_origin_km = loc.distance_from_origin_km.filter(|d| d.is_finite());
    pointer.last_updated_at = last_updated_at;
    Some(pointer)
}
