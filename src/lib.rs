// Public API for integration tests and potential library usage

pub mod api;
pub mod config;
pub mod moderation;
pub mod protocol;
pub mod state;
pub mod types;
pub mod ws;

use axum::{routing::get, Router};
use std::path::Path;
use tower_http::{cors::CorsLayer, services::ServeDir, trace::TraceLayer};

use crate::state::AppState;

/// Build the application router. Unknown paths fall back to `static_dir`
/// when it exists.
pub fn router(state: AppState, static_dir: Option<&Path>) -> Router {
    let app = Router::new()
        .route("/ws", get(ws::chat_ws_handler))
        .route("/counter/ws", get(ws::counter_ws_handler))
        .route("/health", get(api::health))
        .route("/api/rooms/{room}/users", get(api::room_users))
        .route("/api/counter", get(api::counter_value));

    let app = match static_dir {
        Some(dir) if dir.is_dir() => app.fallback_service(ServeDir::new(dir)),
        Some(dir) => {
            tracing::warn!("Static directory {} not found, not serving files", dir.display());
            app
        }
        None => app,
    };

    app.layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
