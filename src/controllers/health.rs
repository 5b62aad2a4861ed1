use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use serde_json::json;
use std::sync::Arc;

use crate::domain::tts::{TtsService, TtsServiceApi};

/// GET / - service banner
pub async fn root() -> impl IntoResponse {
    (
        StatusCode::OK,
        Json(json!({
            "message": "KittenTTS API server is running",
            "version": env!("CARGO_PKG_VERSION"),
        })),
    )
}

/// GET /health - reports whether the synthesis model is usable.
/// Triggers a lazy model load on first call; always answers 200 so probes
/// can read the status body.
pub async fn health(State(service): State<Arc<TtsService>>) -> impl IntoResponse {
    if service.ready().await {
        (
            StatusCode::OK,
            Json(json!({
                "status": "healthy",
                "model": "loaded"
            })),
        )
    } else {
        (
            StatusCode::OK,
            Json(json!({
                "status": "unhealthy",
                "model": "unavailable"
            })),
        )
    }
}
