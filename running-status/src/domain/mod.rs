//! Domain types for train running status.
//!
//! This module contains the validated value types that the reconciliation
//! core consumes. Identifiers enforce their format at construction time;
//! timetable and live-feed types are plain data assembled per lookup.

mod itinerary;
mod live;
mod station;
mod time;
mod train;

pub use itinerary::{Itinerary, ScheduledStop, StopRole};
pub use live::{CurrentLocationPointer, LiveFeed, LiveStopRecord, LiveTag};
pub use station::{InvalidStationCode, StationCode};
pub use time::{
    FixedOffsetLocalizer, IST_OFFSET_SECS, TIME_PLACEHOLDER, TimeError, TimeLocalizer,
    civil_instant, instant_from_epoch, parse_rfc3339,
};
pub use train::{InvalidTrainNumber, RunningDays, TrainInfo, TrainNumber};
