//! HTTP handlers for the mission API (spec §6).

use std::collections::HashMap;
use std::sync::Arc;

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Json};
use serde::Serialize;

use crate::state::SimulationState;

const MIN_ORBIT_POINTS: usize = 4;
const MAX_ORBIT_POINTS: usize = 5000;
const DEFAULT_ORBIT_POINTS: usize = crate::orbit_cache::ORBIT_SAMPLE_COUNT;

#[derive(Debug, Serialize)]
struct ErrorBody {
    error: String,
}

fn bad_request(message: impl ToString) -> (StatusCode, Json<ErrorBody>) {
    (
        StatusCode::BAD_REQUEST,
        Json(ErrorBody {
            error: message.to_string(),
        }),
    )
}

fn internal_error(message: impl ToString) -> (StatusCode, Json<ErrorBody>) {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(ErrorBody {
            error: message.to_string(),
        }),
    )
}

/// `GET /api/mission/info`: static engine configuration, fetched once by
/// the frontend at load time.
pub async fn mission_info(State(state): State<Arc<SimulationState>>) -> impl IntoResponse {
    Json(state.mission_info.clone())
}

#[derive(Debug, Serialize)]
struct PlanetElementsBody {
    a: f64,
    e: f64,
    i: f64,
    period: f64,
}

/// `GET /api/planets`: `{earth:{a,e,i,period}, mars:{...}}` (spec §6).
pub async fn planets(State(state): State<Arc<SimulationState>>) -> impl IntoResponse {
    let mut body: HashMap<&'static str, PlanetElementsBody> = HashMap::new();
    for name in ["earth", "mars"] {
        let Ok(el) = state.planet_elements(name) else {
            continue;
        };
        body.insert(
            name,
            PlanetElementsBody {
                a: el.a,
                e: el.e,
                i: el.i_deg,
                period: el.period_days,
            },
        );
    }
    Json(body)
}

#[derive(Debug, serde::Deserialize)]
pub struct OrbitQuery {
    num_points: Option<usize>,
}

#[derive(Debug, Serialize)]
struct OrbitBody {
    planet: String,
    points: Vec<mission_core::Vector3>,
}

/// `GET /api/orbit/{planet}?num_points=N`: `N` bounded to `[4, 5000]`
/// (spec §6); anything outside that range or an unknown planet yields
/// `{error}` instead of a point cloud.
pub async fn orbit(
    State(state): State<Arc<SimulationState>>,
    Path(planet): Path<String>,
    Query(query): Query<OrbitQuery>,
) -> impl IntoResponse {
    let num_points = query.num_points.unwrap_or(DEFAULT_ORBIT_POINTS);
    if !(MIN_ORBIT_POINTS..=MAX_ORBIT_POINTS).contains(&num_points) {
        return bad_request(format!(
            "num_points must be between {MIN_ORBIT_POINTS} and {MAX_ORBIT_POINTS}, got {num_points}"
        ))
        .into_response();
    }

    match state.orbit_points(&planet, num_points) {
        Ok(points) => Json(OrbitBody {
            planet: planet.to_ascii_lowercase(),
            points,
        })
        .into_response(),
        Err(error) => bad_request(error).into_response(),
    }
}

/// `GET /api/state`: `{is_running, current_time, time_speed, paused}`.
#[derive(Debug, Serialize)]
struct StateBody {
    is_running: bool,
    current_time: f64,
    time_speed: f64,
    paused: bool,
}

pub async fn state_time(State(state): State<Arc<SimulationState>>) -> impl IntoResponse {
    let status = state.status().await;
    let current_time = state.current_time_days().await;
    Json(StateBody {
        is_running: status.is_running,
        current_time,
        time_speed: status.time_speed,
        paused: status.paused,
    })
}

/// `GET /api/snapshot`: a full [`mission_planner::MissionSummary`] computed
/// on demand at the current virtual-clock time.
pub async fn snapshot(State(state): State<Arc<SimulationState>>) -> impl IntoResponse {
    match state.snapshot().await {
        Ok(summary) => Json(summary).into_response(),
        Err(error) => internal_error(error).into_response(),
    }
}
