//! Leaderboard web application
//!
//! Routes:
//!
//! * `GET /leaders/timerange/:ts1/:ts2`: events starting between two timestamps
//! * `GET /leaders/temprange/:t1/:t2`: events whose nearest weather temperature is in a range
//! * `GET /weather/:ts`: weather observation nearest to a timestamp
//! * `GET /metrics`: Prometheus metrics
//! * `GET /healthz`: liveness check

use crate::app_state::{AppState, SharedAppState};
use crate::cli::CommandLineArgs;
use crate::error::LeaderboardError;
use crate::metrics::{metrics_handler, record_response_metrics, request_counter};
use crate::models::{EventRecord, Observation};
use crate::query;
use crate::time_codec::{self, Timestamp};
use crate::weather;

use axum::{
    body::BoxBody,
    extract::{Path, State},
    routing::get,
    Json, Router,
};
use std::sync::Arc;
use tower::Layer;
use tower::ServiceBuilder;
use tower_http::normalize_path::{NormalizePath, NormalizePathLayer};
use tower_http::trace::TraceLayer;

/// `axum` service type for the leaderboard application.
pub type Service = NormalizePath<Router>;

/// Returns a [axum::Router] for the leaderboard application
///
/// # Arguments
///
/// * `state`: Shared application state
pub fn router(state: SharedAppState) -> Router {
    Router::new()
        .route("/leaders/timerange/:ts1/:ts2", get(leaders_time_range))
        .route("/leaders/temprange/:t1/:t2", get(leaders_temperature_range))
        .route("/weather/:ts", get(weather_at_time))
        .with_state(state)
        .route("/metrics", get(metrics_handler))
        .route("/healthz", get(|| async { "OK" }))
        .layer(
            ServiceBuilder::new().layer(
                TraceLayer::new_for_http()
                    .on_request(request_counter)
                    .on_response(record_response_metrics::<BoxBody>),
            ),
        )
}

/// Returns a [crate::app::Service] for the leaderboard application
///
/// The service is wrapped in a [NormalizePathLayer] so that trailing slashes are ignored.
///
/// # Arguments
///
/// * `args`: Command line arguments
pub fn service(args: &CommandLineArgs) -> Service {
    let state = Arc::new(AppState::new(args));
    NormalizePathLayer::trim_trailing_slash().layer(router(state))
}

/// Parse a timestamp path parameter.
fn parse_timestamp(value: &str) -> Result<Timestamp, LeaderboardError> {
    time_codec::parse(value).ok_or_else(|| LeaderboardError::InvalidTimestamp {
        value: value.to_string(),
    })
}

/// Parse a temperature path parameter.
fn parse_temperature(value: &str) -> Result<f64, LeaderboardError> {
    match value.trim().parse::<f64>() {
        Ok(temperature) if !temperature.is_nan() => Ok(temperature),
        _ => Err(LeaderboardError::InvalidTemperature {
            value: value.to_string(),
        }),
    }
}

/// Handler for time range queries.
///
/// Both timestamps are inclusive. Events are returned sorted by composite key.
async fn leaders_time_range(
    State(state): State<SharedAppState>,
    Path((ts1, ts2)): Path<(String, String)>,
) -> Result<Json<Vec<EventRecord>>, LeaderboardError> {
    let lo = parse_timestamp(&ts1)?;
    let hi = parse_timestamp(&ts2)?;
    if hi < lo {
        return Err(LeaderboardError::InvalidRange);
    }
    let leaderboard = state.datasets.leaderboard().await?;
    let events = query::filter_by_time_range(lo, hi, &leaderboard)?;
    Ok(Json(events))
}

/// Handler for temperature range queries.
///
/// Both temperatures are inclusive. Events are returned sorted by composite key.
async fn leaders_temperature_range(
    State(state): State<SharedAppState>,
    Path((t1, t2)): Path<(String, String)>,
) -> Result<Json<Vec<EventRecord>>, LeaderboardError> {
    let lo = parse_temperature(&t1)?;
    let hi = parse_temperature(&t2)?;
    if hi < lo {
        return Err(LeaderboardError::InvalidRange);
    }
    let leaderboard = state.datasets.leaderboard().await?;
    let observations = state.datasets.weather().await?;
    let events = query::filter_by_temperature_range(lo, hi, &leaderboard, &observations)?;
    Ok(Json(events))
}

/// Handler for weather lookups.
///
/// Returns the nearest observation, or `null` if there is none.
async fn weather_at_time(
    State(state): State<SharedAppState>,
    Path(ts): Path<String>,
) -> Result<Json<Option<Observation>>, LeaderboardError> {
    let target = parse_timestamp(&ts)?;
    let observations = state.datasets.weather().await?;
    let nearest = weather::find_nearest(target, &observations).cloned();
    Ok(Json(nearest))
}
