use running_status::cache::CachedFeed;
use running_status::config::ServerConfig;
use running_status::domain::FixedOffsetLocalizer;
use running_status::railradar::{FeedClient, MockRailRadarClient, RailRadarClient, RailRadarConfig};
use running_status::web::{AppState, create_router};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("info,running_status=debug")),
        )
        .init();

    let config = ServerConfig::from_env().expect("Invalid configuration");

    // Recorded responses replace the live API when a mock directory is given
    let feed_client = match &config.mock_dir {
        Some(dir) => {
            let mock = MockRailRadarClient::new(dir).expect("Failed to load mock train data");
            info!(
                dir = %dir.display(),
                trains = mock.available_trains().await.len(),
                "serving recorded RailRadar responses"
            );
            FeedClient::Mock(mock)
        }
        None => {
            if config.api_key.is_empty() {
                warn!("RAIL_RADAR_API_KEY not set. API calls will fail.");
            }
            let mut radar_config = RailRadarConfig::new(&config.api_key);
            if let Some(url) = &config.base_url {
                radar_config = radar_config.with_base_url(url);
            }
            let client =
                RailRadarClient::new(radar_config).expect("Failed to create RailRadar client");
            FeedClient::Live(client)
        }
    };

    let feed = CachedFeed::new(feed_client, &config.cache_config());
    let state = AppState::new(feed, FixedOffsetLocalizer::ist());
    let app = create_router(state, &config.static_dir);

    let addr = config.bind_addr;
    info!("Train Running Status listening on http://{addr}");
    info!("API Endpoints:");
    info!("  GET  /                - Lookup page");
    info!("  GET  /health          - Health check");
    info!("  GET  /running/status  - Running status (train_number, journey_date, seq)");

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .expect("Failed to bind listen address");
    axum::serve(listener, app).await.expect("Server error");
}
