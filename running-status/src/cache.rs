//! Caching layer for upstream status responses.
//!
//! Live positions move slowly compared to how often users refresh, so a
//! short TTL absorbs repeated lookups of the same run without serving data
//! that is noticeably stale. Only successful responses are cached; errors
//! always go back to the source on the next request.

use std::sync::Arc;
use std::time::Duration;

use chrono::NaiveDate;
use moka::future::Cache as MokaCache;
use tracing::debug;

use crate::domain::TrainNumber;
use crate::railradar::{FeedSource, RailRadarError, TrainStatusData};

/// Cache key: (train number, journey date).
type StatusKey = (TrainNumber, NaiveDate);

/// Cached status payload.
type StatusEntry = Arc<TrainStatusData>;

/// Configuration for the cache.
#[derive(Debug, Clone)]
pub struct CacheConfig {
    /// TTL for cached entries.
    pub ttl: Duration,

    /// Maximum number of cached entries.
    pub max_capacity: u64,
}

impl CacheConfig {
    /// Set the TTL.
    pub fn with_ttl(mut self, ttl: Duration) -> Self {
        self.ttl = ttl;
        self
    }

    /// Set the maximum number of entries.
    pub fn with_max_capacity(mut self, n: u64) -> Self {
        self.max_capacity = n;
        self
    }
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            ttl: Duration::from_secs(60),
            max_capacity: 500,
        }
    }
}

/// A feed source with a TTL cache in front of it.
pub struct CachedFeed<S> {
    source: S,
    statuses: MokaCache<StatusKey, StatusEntry>,
}

impl<S: FeedSource> CachedFeed<S> {
    /// Wrap a source.
    pub fn new(source: S, config: &CacheConfig) -> Self {
        let statuses = MokaCache::builder()
            .time_to_live(config.ttl)
            .max_capacity(config.max_capacity)
            .build();

        Self { source, statuses }
    }

    /// Get the status payload for a run, using the cache if possible.
    pub async fn get_status(
        &self,
        train: &TrainNumber,
        journey_date: NaiveDate,
    ) -> Result<StatusEntry, RailRadarError> {
        let key = (*train, journey_date);

        if let Some(cached) = self.statuses.get(&key).await {
            debug!(%train, %journey_date, "status cache hit");
            return Ok(cached);
        }

        let data = self.source.fetch(train, journey_date).await?;
        let entry = Arc::new(data);
        self.statuses.insert(key, entry.clone()).await;

        Ok(entry)
    }

    /// Access the underlying source, bypassing the cache.
    pub fn source(&self) -> &S {
        &self.source
    }

    /// Number of cached entries.
    pub fn entry_count(&self) -> u64 {
        self.statuses.entry_count()
    }

    /// Invalidate all cached entries.
    pub fn invalidate_all(&self) {
        self.statuses.invalidate_all();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// Source that counts calls and fails for train 9999.
    #[derive(Default)]
    struct CountingSource {
        calls: AtomicUsize,
    }

    impl FeedSource for CountingSource {
        async fn fetch(
            &self,
            train: &TrainNumber,
            _journey_date: NaiveDate,
        ) -> Result<TrainStatusData, RailRadarError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if train.as_str() == "9999" {
                return Err(RailRadarError::RateLimited);
            }
            let json = format!(r#"{{"train": {{"trainNumber": "{train}"}}}}"#);
            Ok(serde_json::from_str(&json).unwrap())
        }
    }

    fn train(s: &str) -> TrainNumber {
        TrainNumber::parse(s).unwrap()
    }

    fn date(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 10, d).unwrap()
    }

    #[test]
    fn default_config() {
        let config = CacheConfig::default();
        assert_eq!(config.ttl, Duration::from_secs(60));
        assert_eq!(config.max_capacity, 500);

        let config = config.with_ttl(Duration::from_secs(5)).with_max_capacity(10);
        assert_eq!(config.ttl, Duration::from_secs(5));
        assert_eq!(config.max_capacity, 10);
    }

    #[tokio::test]
    async fn second_lookup_is_served_from_cache() {
        let cached = CachedFeed::new(CountingSource::default(), &CacheConfig::default());

        let first = cached.get_status(&train("12301"), date(5)).await.unwrap();
        let second = cached.get_status(&train("12301"), date(5)).await.unwrap();

        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(cached.source().calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn key_includes_journey_date() {
        let cached = CachedFeed::new(CountingSource::default(), &CacheConfig::default());

        cached.get_status(&train("12301"), date(5)).await.unwrap();
        cached.get_status(&train("12301"), date(6)).await.unwrap();

        assert_eq!(cached.source().calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn errors_are_not_cached() {
        let cached = CachedFeed::new(CountingSource::default(), &CacheConfig::default());

        assert!(cached.get_status(&train("9999"), date(5)).await.is_err());
        assert!(cached.get_status(&train("9999"), date(5)).await.is_err());

        assert_eq!(cached.source().calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn invalidate_forces_refetch() {
        let cached = CachedFeed::new(CountingSource::default(), &CacheConfig::default());

        cached.get_status(&train("12301"), date(5)).await.unwrap();
        cached.invalidate_all();
        cached.get_status(&train("12301"), date(5)).await.unwrap();

        assert_eq!(cached.source().calls.load(Ordering::SeqCst), 2);
    }
}
