//! Application state for the web layer.

use std::sync::Arc;

use crate::cache::CachedFeed;
use crate::domain::FixedOffsetLocalizer;
use crate::railradar::FeedClient;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    /// Cached upstream feed
    pub feed: Arc<CachedFeed<FeedClient>>,

    /// Civil zone for timetable resolution and display
    pub localizer: Arc<FixedOffsetLocalizer>,
}

impl AppState {
    /// Create a new app state.
    pub fn new(feed: CachedFeed<FeedClient>, localizer: FixedOffsetLocalizer) -> Self {
        Self {
            feed: Arc::new(feed),
            localizer: Arc::new(localizer),
        }
    }
}
