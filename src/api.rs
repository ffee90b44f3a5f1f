//! HTTP API endpoints for inspecting live state.

use axum::{
    extract::{Path, State},
    Json,
};
use serde::Serialize;

use crate::state::AppState;
use crate::types::Participant;

#[derive(Debug, Clone, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    /// Open chat connections
    pub connections: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct CountResponse {
    pub count: i64,
}

/// GET /health
pub async fn health(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        connections: state.chat.connection_count().await,
    })
}

/// List participants of a room.
///
/// GET /api/rooms/{room}/users
pub async fn room_users(
    State(state): State<AppState>,
    Path(room): Path<String>,
) -> Json<Vec<Participant>> {
    Json(state.chat.users_in_room(&room).await)
}

/// GET /api/counter
pub async fn counter_value(State(state): State<AppState>) -> Json<CountResponse> {
    Json(CountResponse {
        count: state.counter.count().await,
    })
}
