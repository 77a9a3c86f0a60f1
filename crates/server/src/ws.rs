//! WebSocket streaming and command handling for `/ws` (spec §6).
//!
//! Each connection gets its own [`broadcast::Receiver`] and is driven by a
//! single task that interleaves two event sources with `tokio::select!`:
//! inbound client commands and outbound broadcast snapshots. A send that
//! would block past [`SEND_TIMEOUT`] drops the subscriber rather than
//! stalling the shared tick loop (spec §5's "Cancellation").

use std::sync::Arc;
use std::time::Duration;

use axum::extract::ws::{Message, WebSocket};
use axum::extract::{State, WebSocketUpgrade};
use axum::response::IntoResponse;
use serde::Serialize;
use serde_json::Value;
use tokio::sync::broadcast;

use crate::state::{SimulationSnapshot, SimulationState};

/// Per-send timeout classifying a subscriber as dead (spec §5).
const SEND_TIMEOUT: Duration = Duration::from_millis(500);

pub async fn ws_handler(
    ws: WebSocketUpgrade,
    State(state): State<Arc<SimulationState>>,
) -> impl IntoResponse {
    ws.on_upgrade(move |socket| handle_socket(socket, state))
}

#[derive(Debug, Serialize)]
struct InitMessage {
    #[serde(rename = "type")]
    kind: &'static str,
    mission_info: mission_planner::MissionInfo,
    planets: Vec<&'static str>,
    simulation_state: crate::state::SimulationStatus,
    earth_orbit: Vec<mission_core::Vector3>,
    mars_orbit: Vec<mission_core::Vector3>,
    current_snapshot: mission_planner::MissionSummary,
}

#[derive(Debug, Serialize)]
struct UpdateMessage<'a> {
    #[serde(rename = "type")]
    kind: &'static str,
    #[serde(flatten)]
    mission: &'a mission_planner::MissionSummary,
    simulation: crate::state::SimulationStatus,
}

#[derive(Debug, Serialize)]
struct SnapshotMessage {
    #[serde(rename = "type")]
    kind: &'static str,
    data: mission_planner::MissionSummary,
}

#[derive(Debug, Serialize)]
struct AckMessage<'a> {
    #[serde(rename = "type")]
    kind: &'static str,
    command: &'a str,
}

#[derive(Debug, Serialize)]
struct ErrorMessage<'a> {
    #[serde(rename = "type")]
    kind: &'static str,
    command: Option<&'a str>,
    message: String,
}

async fn handle_socket(mut socket: WebSocket, state: Arc<SimulationState>) {
    if send_init(&mut socket, &state).await.is_err() {
        return;
    }

    let mut rx = state.subscribe();
    loop {
        tokio::select! {
            incoming = socket.recv() => {
                match incoming {
                    Some(Ok(Message::Text(text))) => {
                        if handle_command(&mut socket, &state, &text).await.is_err() {
                            return;
                        }
                    }
                    Some(Ok(Message::Close(_))) | None => return,
                    Some(Ok(_)) => {}
                    Some(Err(_)) => return,
                }
            }
            update = rx.recv() => {
                match update {
                    Ok(snapshot) => {
                        if send_update(&mut socket, &snapshot).await.is_err() {
                            return;
                        }
                    }
                    Err(broadcast::error::RecvError::Lagged(skipped)) => {
                        tracing::debug!(skipped, "websocket subscriber lagged, catching up");
                        continue;
                    }
                    Err(broadcast::error::RecvError::Closed) => return,
                }
            }
        }
    }
}

async fn send_init(socket: &mut WebSocket, state: &Arc<SimulationState>) -> Result<(), ()> {
    let Ok(current_snapshot) = state.snapshot().await else {
        return Err(());
    };
    let earth_orbit = state.cached_orbit("earth").unwrap_or_default();
    let mars_orbit = state.cached_orbit("mars").unwrap_or_default();

    let message = InitMessage {
        kind: "init",
        mission_info: state.mission_info.clone(),
        planets: vec!["earth", "mars"],
        simulation_state: state.status().await,
        earth_orbit,
        mars_orbit,
        current_snapshot,
    };
    send_json(socket, &message).await
}

async fn send_update(socket: &mut WebSocket, snapshot: &SimulationSnapshot) -> Result<(), ()> {
    let message = UpdateMessage {
        kind: "update",
        mission: &snapshot.mission,
        simulation: snapshot.simulation,
    };
    send_json(socket, &message).await
}

/// Parse and execute one incoming command, replying with `ack`, `snapshot`,
/// or `error` as spec §6 dictates. Returns `Err(())` only when the socket
/// itself should be closed (a send timed out or the transport broke).
async fn handle_command(
    socket: &mut WebSocket,
    state: &Arc<SimulationState>,
    text: &str,
) -> Result<(), ()> {
    let parsed: Result<Value, _> = serde_json::from_str(text);
    let Ok(value) = parsed else {
        return send_error(socket, None, "malformed JSON".to_string()).await;
    };

    let Some(command) = value.get("command").and_then(Value::as_str) else {
        return send_error(socket, None, "missing 'command' field".to_string()).await;
    };
    let command = command.to_string();

    let result: Result<Outcome, String> = match command.as_str() {
        "start" => run(state.start().await),
        "pause" => run(state.toggle_pause().await),
        "stop" => run(state.stop().await),
        "set_speed" => match value.get("speed").and_then(Value::as_f64) {
            Some(speed) if speed >= 0.0 => run(state.set_speed(speed).await),
            Some(speed) => Err(format!("speed must be non-negative, got {speed}")),
            None => Err("'speed' must be a number".to_string()),
        },
        "set_time" => match value.get("time").and_then(Value::as_f64) {
            Some(time) => run(state.set_time(time).await),
            None => Err("'time' must be a number".to_string()),
        },
        "get_snapshot" => match state.snapshot().await {
            Ok(data) => Ok(Outcome::Snapshot(data)),
            Err(error) => Err(error.to_string()),
        },
        other => Err(format!("unknown command: {other}")),
    };

    match result {
        Ok(Outcome::Ack) => send_ack(socket, &command).await,
        Ok(Outcome::Snapshot(data)) => send_json(socket, &SnapshotMessage { kind: "snapshot", data }).await,
        Err(message) => send_error(socket, Some(&command), message).await,
    }
}

enum Outcome {
    Ack,
    Snapshot(mission_planner::MissionSummary),
}

fn run(result: Result<(), mission_planner::SearchError>) -> Result<Outcome, String> {
    result.map(|()| Outcome::Ack).map_err(|e| e.to_string())
}

async fn send_ack(socket: &mut WebSocket, command: &str) -> Result<(), ()> {
    send_json(socket, &AckMessage { kind: "ack", command }).await
}

async fn send_error(socket: &mut WebSocket, command: Option<&str>, message: String) -> Result<(), ()> {
    send_json(socket, &ErrorMessage { kind: "error", command, message }).await
}

async fn send_json(socket: &mut WebSocket, message: &impl Serialize) -> Result<(), ()> {
    let Ok(text) = serde_json::to_string(message) else {
        return Err(());
    };
    match tokio::time::timeout(SEND_TIMEOUT, socket.send(Message::Text(text))).await {
        Ok(Ok(())) => Ok(()),
        _ => Err(()),
    }
}
