//! HTTP route handlers.

use std::path::Path;

use askama::Template;
use axum::{
    Json, Router,
    extract::{Query, State, rejection::QueryRejection},
    http::{HeaderMap, Method, StatusCode, header},
    response::{Html, IntoResponse, Response},
    routing::get,
};
use chrono::{NaiveDate, Utc};
use tower_http::cors::{Any, CorsLayer};
use tower_http::services::ServeDir;
use tracing::{error, info, warn};

use crate::domain::{TimeLocalizer, TrainNumber};
use crate::railradar::{ConversionContext, RailRadarError, convert_status};
use crate::reconcile::reconcile;

use super::dto::*;
use super::state::AppState;
use super::templates::{IndexTemplate, StatusTemplate};

/// Create the application router.
///
/// `static_dir` is the path to the static assets directory. Cross-origin
/// GETs are allowed from any origin.
pub fn create_router(state: AppState, static_dir: impl AsRef<Path>) -> Router {
    let cors = CorsLayer::new()
        .allow_methods([Method::GET])
        .allow_origin(Any);

    Router::new()
        .route("/", get(index_page))
        .route("/health", get(health))
        .route("/running/status", get(running_status))
        .nest_service("/static", ServeDir::new(static_dir))
        .layer(cors)
        .with_state(state)
}

/// Health check endpoint.
async fn health() -> &'static str {
    "ok"
}

/// Index page with the lookup form.
async fn index_page(State(state): State<AppState>) -> Result<Html<String>, AppError> {
    let template = IndexTemplate {
        zone_label: state.localizer.zone_label().to_string(),
    };
    let html = template.render().map_err(|e| AppError::Internal {
        message: format!("Template error: {e}"),
    })?;
    Ok(Html(html))
}

/// Check if request accepts HTML.
fn accepts_html(headers: &HeaderMap) -> bool {
    headers
        .get(header::ACCEPT)
        .and_then(|v| v.to_str().ok())
        .is_some_and(|accept| accept.contains("text/html"))
}

/// Running status of one train on one journey date.
async fn running_status(
    State(state): State<AppState>,
    headers: HeaderMap,
    query: Result<Query<RunningStatusRequest>, QueryRejection>,
) -> Result<Response, AppError> {
    let Query(req) = query.map_err(|e| AppError::BadRequest {
        message: e.body_text(),
    })?;

    let train = TrainNumber::parse(&req.train_number).map_err(|e| AppError::BadRequest {
        message: format!("Invalid train number {:?}: {e}", req.train_number),
    })?;

    let journey_date = NaiveDate::parse_from_str(req.journey_date.trim(), "%Y-%m-%d").map_err(
        |_| AppError::BadRequest {
            message: format!("Invalid journey date {:?}: expected YYYY-MM-DD", req.journey_date),
        },
    )?;

    info!(%train, %journey_date, seq = ?req.seq.map(|s| s.0), "running status lookup");

    let data = state.feed.get_status(&train, journey_date).await?;

    let ctx = ConversionContext {
        requested: train,
        journey_date,
        offset: state.localizer.offset(),
        now: Utc::now(),
    };
    let status = convert_status(&data, &ctx);
    let view = reconcile(&status.itinerary, status.live.as_ref(), &*state.localizer);
    let response = RunningStatusResponse::new(&status.train, &view, req.seq);

    // Return HTML or JSON based on Accept header
    if accepts_html(&headers) {
        let template = StatusTemplate {
            status: response,
            zone_label: state.localizer.zone_label().to_string(),
        };
        let html = template.render().map_err(|e| AppError::Internal {
            message: format!("Template error: {e}"),
        })?;

        Ok(Html(html).into_response())
    } else {
        Ok(Json(response).into_response())
    }
}

/// Application error type.
#[derive(Debug)]
pub enum AppError {
    BadRequest { message: String },
    NotFound { message: String },
    Upstream { status: StatusCode, message: String },
    Internal { message: String },
}

impl From<RailRadarError> for AppError {
    fn from(e: RailRadarError) -> Self {
        let message = e.to_string();
        match e {
            RailRadarError::NotFound { .. } => AppError::NotFound { message },
            RailRadarError::Upstream {
                status: Some(404), ..
            } => AppError::NotFound { message },
            RailRadarError::MockData { .. } => AppError::Internal { message },
            other => {
                let status = other
                    .upstream_status()
                    .and_then(|s| StatusCode::from_u16(s).ok())
                    .filter(|s| s.is_client_error() || s.is_server_error())
                    .filter(|s| *s != StatusCode::UNAUTHORIZED)
                    .unwrap_or(StatusCode::BAD_GATEWAY);
                AppError::Upstream { status, message }
            }
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            AppError::BadRequest { message } => (StatusCode::BAD_REQUEST, message),
            AppError::NotFound { message } => (StatusCode::NOT_FOUND, message),
            AppError::Upstream { status, message } => (status, message),
            AppError::Internal { message } => (StatusCode::INTERNAL_SERVER_ERROR, message),
        };

        if status.is_server_error() {
            error!(%status, %message, "request failed");
        } else {
            warn!(%status, %message, "request rejected");
        }

        let body = Json(ErrorResponse { error: message });
        (status, body).into_response()
    }
}
