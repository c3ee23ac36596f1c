//! RailRadar API response DTOs.
//!
//! These types map directly to the RailRadar train status JSON. Upstream
//! data is patchy: fields go missing, numbers arrive as strings, and
//! timestamps are sometimes junk. Every leaf is therefore optional or
//! defaulted, and the `lenient` helpers turn malformed values into `None`
//! instead of failing the whole response.

use serde::Deserialize;

use super::error::RailRadarError;

/// Top-level response envelope.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrainStatusResponse {
    pub success: bool,
    pub data: Option<TrainStatusData>,
    pub error: Option<ApiErrorBody>,
}

impl TrainStatusResponse {
    /// Unwrap the envelope into its payload or an error.
    pub fn into_result(self) -> Result<TrainStatusData, RailRadarError> {
        match (self.success, self.data, self.error) {
            (true, Some(data), _) => Ok(data),
            (_, _, Some(error)) => Err(RailRadarError::Upstream {
                code: error.code,
                message: error.message,
                status: error.status_code,
            }),
            (true, None, None) => Err(RailRadarError::Json {
                message: "successful response has no data".to_string(),
                body: None,
            }),
            (false, _, None) => Err(RailRadarError::Upstream {
                code: "UNKNOWN".to_string(),
                message: "request failed without an error body".to_string(),
                status: None,
            }),
        }
    }
}

/// Error body of a failed response.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiErrorBody {
    #[serde(default, deserialize_with = "lenient::text")]
    pub code: String,
    #[serde(default, deserialize_with = "lenient::text")]
    pub message: String,
    #[serde(default, deserialize_with = "lenient::unsigned")]
    pub status_code: Option<u16>,
    #[serde(default, deserialize_with = "lenient::string")]
    pub timestamp: Option<String>,
    #[serde(default, deserialize_with = "lenient::flag")]
    pub retryable: Option<bool>,
}

/// Payload of a successful response.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrainStatusData {
    #[serde(default)]
    pub train: TrainDto,

    /// Static timetable, one entry per station on the route.
    #[serde(default)]
    pub route: Vec<RouteEntry>,

    /// Live tracking, absent when the run is not being tracked.
    pub live_data: Option<LiveData>,
}

/// Train metadata.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TrainDto {
    #[serde(deserialize_with = "lenient::string")]
    pub train_number: Option<String>,
    #[serde(deserialize_with = "lenient::text")]
    pub train_name: String,
    #[serde(rename = "type", deserialize_with = "lenient::text")]
    pub train_type: String,
    #[serde(deserialize_with = "lenient::text")]
    pub zone: String,
    #[serde(deserialize_with = "lenient::text")]
    pub source_station_code: String,
    #[serde(deserialize_with = "lenient::text")]
    pub source_station_name: String,
    #[serde(deserialize_with = "lenient::text")]
    pub destination_station_code: String,
    #[serde(deserialize_with = "lenient::text")]
    pub destination_station_name: String,
    #[serde(deserialize_with = "lenient::unsigned_or_zero")]
    pub running_days_bitmap: u8,
    #[serde(deserialize_with = "lenient::string")]
    pub return_train_number: Option<String>,
    #[serde(deserialize_with = "lenient::unsigned_or_zero")]
    pub travel_time_minutes: u32,
    #[serde(deserialize_with = "lenient::unsigned_or_zero")]
    pub total_halts: u32,
    #[serde(deserialize_with = "lenient::unsigned_or_zero")]
    pub distance_km: u32,
    #[serde(deserialize_with = "lenient::unsigned_or_zero")]
    pub avg_speed_kmph: u32,
}

/// One station on the static timetable.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RouteEntry {
    #[serde(default, deserialize_with = "lenient::unsigned")]
    pub sequence: Option<u32>,
    #[serde(default, deserialize_with = "lenient::text")]
    pub station_code: String,
    #[serde(default, deserialize_with = "lenient::text")]
    pub station_name: String,

    /// False for stations the train passes without stopping.
    #[serde(default, deserialize_with = "lenient::flag")]
    pub is_halt: Option<bool>,

    /// Minutes past midnight on journey day `day`.
    #[serde(default, deserialize_with = "lenient::unsigned")]
    pub scheduled_arrival: Option<u32>,
    #[serde(default, deserialize_with = "lenient::unsigned")]
    pub scheduled_departure: Option<u32>,

    #[serde(default, deserialize_with = "lenient::unsigned")]
    pub halt_duration_minutes: Option<u32>,
    #[serde(default, deserialize_with = "lenient::string")]
    pub platform: Option<String>,

    /// 1-based day of the journey.
    #[serde(default, deserialize_with = "lenient::unsigned")]
    pub day: Option<u8>,
}

impl RouteEntry {
    /// True unless the entry is explicitly marked as a non-stopping pass.
    pub fn is_halt(&self) -> bool {
        self.is_halt != Some(false)
    }
}

/// Live tracking block.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct LiveData {
    #[serde(deserialize_with = "lenient::string")]
    pub train_number: Option<String>,
    #[serde(deserialize_with = "lenient::string")]
    pub journey_date: Option<String>,

    /// RFC 3339 timestamp.
    #[serde(deserialize_with = "lenient::string")]
    pub last_updated_at: Option<String>,

    pub current_location: Option<CurrentLocationDto>,
    #[serde(deserialize_with = "lenient::string")]
    pub data_source: Option<String>,
    #[serde(deserialize_with = "lenient::string")]
    pub status_summary: Option<String>,
    pub route: Vec<LiveRouteEntry>,
}

/// Station reference inside a live route entry.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StationRef {
    #[serde(default, deserialize_with = "lenient::text")]
    pub code: String,
    #[serde(default, deserialize_with = "lenient::string")]
    pub name: Option<String>,
}

/// Live data for one station.
///
/// Times are epoch seconds.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LiveRouteEntry {
    pub station: StationRef,

    #[serde(default, deserialize_with = "lenient::epoch")]
    pub scheduled_arrival: Option<u64>,
    #[serde(default, deserialize_with = "lenient::epoch")]
    pub scheduled_departure: Option<u64>,
    #[serde(default, deserialize_with = "lenient::epoch")]
    pub actual_arrival: Option<u64>,
    #[serde(default, deserialize_with = "lenient::epoch")]
    pub actual_departure: Option<u64>,

    #[serde(default, deserialize_with = "lenient::minutes")]
    pub delay_arrival_minutes: Option<i32>,
    #[serde(default, deserialize_with = "lenient::minutes")]
    pub delay_departure_minutes: Option<i32>,

    #[serde(default, deserialize_with = "lenient::string")]
    pub platform: Option<String>,

    /// Explicit status tag ("Departed", "Arrived", "Upcoming"), rarely sent.
    #[serde(default, deserialize_with = "lenient::string")]
    pub status: Option<String>,
}

/// Where the tracker last placed the train.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CurrentLocationDto {
    #[serde(default, deserialize_with = "lenient::float")]
    pub latitude: Option<f64>,
    #[serde(default, deserialize_with = "lenient::float")]
    pub longitude: Option<f64>,
    #[serde(default, deserialize_with = "lenient::text")]
    pub station_code: String,
    #[serde(default, deserialize_with = "lenient::text")]
    pub status: String,
    #[serde(default, deserialize_with = "lenient::float")]
    pub distance_from_origin_km: Option<f64>,
    #[serde(default, deserialize_with = "lenient::float")]
    pub distance_from_last_station_km: Option<f64>,
}

/// Deserializers that map malformed leaf values to `None`.
mod lenient {
    use serde::{Deserialize, Deserializer};
    use serde_json::Value;

    fn value<'de, D: Deserializer<'de>>(d: D) -> Result<Option<Value>, D::Error> {
        Option::<Value>::deserialize(d)
    }

    /// Epoch seconds as a non-negative integer, float or numeric string.
    pub fn epoch<'de, D: Deserializer<'de>>(d: D) -> Result<Option<u64>, D::Error> {
        Ok(value(d)?.and_then(|v| match v {
            Value::Number(n) => n
                .as_u64()
                .or_else(|| n.as_f64().filter(|f| f.is_finite() && *f >= 0.0).map(|f| f as u64)),
            Value::String(s) => s.trim().parse().ok(),
            _ => None,
        }))
    }

    /// Signed minutes as an integer or numeric string.
    pub fn minutes<'de, D: Deserializer<'de>>(d: D) -> Result<Option<i32>, D::Error> {
        Ok(value(d)?.and_then(|v| match v {
            Value::Number(n) => n.as_i64().and_then(|i| i32::try_from(i).ok()),
            Value::String(s) => s.trim().parse().ok(),
            _ => None,
        }))
    }

    /// Non-empty text; numbers are rendered as text.
    pub fn string<'de, D: Deserializer<'de>>(d: D) -> Result<Option<String>, D::Error> {
        Ok(value(d)?.and_then(|v| match v {
            Value::String(s) if !s.trim().is_empty() => Some(s.trim().to_string()),
            Value::Number(n) => Some(n.to_string()),
            _ => None,
        }))
    }

    /// Like [`string`], but empty when unusable.
    pub fn text<'de, D: Deserializer<'de>>(d: D) -> Result<String, D::Error> {
        Ok(string(d)?.unwrap_or_default())
    }

    /// A non-negative whole number that fits `T`, as a number or numeric string.
    pub fn unsigned<'de, D, T>(d: D) -> Result<Option<T>, D::Error>
    where
        D: Deserializer<'de>,
        T: TryFrom<u64>,
    {
        let n = value(d)?.and_then(|v| match v {
            Value::Number(n) => n.as_u64(),
            Value::String(s) => s.trim().parse().ok(),
            _ => None,
        });
        Ok(n.and_then(|n| T::try_from(n).ok()))
    }

    /// Like [`unsigned`], but zero when unusable.
    pub fn unsigned_or_zero<'de, D, T>(d: D) -> Result<T, D::Error>
    where
        D: Deserializer<'de>,
        T: TryFrom<u64> + Default,
    {
        Ok(unsigned(d)?.unwrap_or_default())
    }

    /// A finite number, as a number or numeric string.
    pub fn float<'de, D: Deserializer<'de>>(d: D) -> Result<Option<f64>, D::Error> {
        Ok(value(d)?
            .and_then(|v| match v {
                Value::Number(n) => n.as_f64(),
                Value::String(s) => s.trim().parse().ok(),
                _ => None,
            })
            .filter(|f: &f64| f.is_finite()))
    }

    /// A boolean, also accepted as 0/1 or "true"/"false".
    pub fn flag<'de, D: Deserializer<'de>>(d: D) -> Result<Option<bool>, D::Error> {
        Ok(value(d)?.and_then(|v| match v {
            Value::Bool(b) => Some(b),
            Value::Number(n) => n.as_u64().map(|n| n != 0),
            Value::String(s) => match s.trim().to_ascii_lowercase().as_str() {
                "1" | "true" | "yes" => Some(true),
                "0" | "false" | "no" => Some(false),
                _ => None,
            },
            _ => None,
        }))
    }
}
