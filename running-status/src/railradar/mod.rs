//! RailRadar running-status client.
//!
//! RailRadar serves, for one train and journey date, the static timetable
//! together with whatever live tracking exists for that run. Key
//! characteristics:
//! - Timetable times are minutes past midnight (IST) plus a journey day
//! - Live times are epoch seconds, and any of them may be missing
//! - Failures come back as a `{success: false, error: {...}}` envelope

mod client;
mod convert;
mod error;
mod mock;
mod types;

use std::future::Future;

use chrono::NaiveDate;

use crate::domain::TrainNumber;

pub use client::{DEFAULT_BASE_URL, RailRadarClient, RailRadarConfig};
pub use convert::{ConversionContext, TrainStatus, convert_status};
pub use error::RailRadarError;
pub use mock::MockRailRadarClient;
pub use types::{
    ApiErrorBody, CurrentLocationDto, LiveData, LiveRouteEntry, RouteEntry, StationRef, TrainDto,
    TrainStatusData, TrainStatusResponse,
};

/// Something that can fetch the status payload for one run of a train.
pub trait FeedSource: Send + Sync {
    fn fetch(
        &self,
        train: &TrainNumber,
        journey_date: NaiveDate,
    ) -> impl Future<Output = Result<TrainStatusData, RailRadarError>> + Send;
}

impl FeedSource for RailRadarClient {
    async fn fetch(
        &self,
        train: &TrainNumber,
        journey_date: NaiveDate,
    ) -> Result<TrainStatusData, RailRadarError> {
        self.get_train_status(train, journey_date).await
    }
}

impl FeedSource for MockRailRadarClient {
    async fn fetch(
        &self,
        train: &TrainNumber,
        journey_date: NaiveDate,
    ) -> Result<TrainStatusData, RailRadarError> {
        self.get_train_status(train, journey_date).await
    }
}

/// The feed the server was started with.
#[derive(Clone)]
pub enum FeedClient {
    Live(RailRadarClient),
    Mock(MockRailRadarClient),
}

impl FeedSource for FeedClient {
    async fn fetch(
        &self,
        train: &TrainNumber,
        journey_date: NaiveDate,
    ) -> Result<TrainStatusData, RailRadarError> {
        match self {
            FeedClient::Live(client) => client.get_train_status(train, journey_date).await,
            FeedClient::Mock(client) => client.get_train_status(train, journey_date).await,
        }
    }
}
