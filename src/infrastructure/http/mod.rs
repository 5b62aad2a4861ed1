use axum::{
    extract::Request,
    http::HeaderValue,
    middleware::{self, Next},
    response::Response,
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use uuid::Uuid;

use crate::controllers::{health, presets::PresetsController, tts::TtsController};
use crate::domain::tts::TtsService;
use crate::infrastructure::config::Config;

pub const X_REQUEST_ID: &str = "x-request-id";

/// Tag every request with a unique id, exposed on the response for client
/// correlation.
pub async fn request_id_middleware(mut request: Request, next: Next) -> Response {
    let request_id = Uuid::new_v4().to_string();

    request
        .extensions_mut()
        .insert(RequestId(request_id.clone()));

    let mut response = next.run(request).await;

    if let Ok(header_value) = HeaderValue::from_str(&request_id) {
        response.headers_mut().insert(X_REQUEST_ID, header_value);
    }

    response
}

/// Request ID wrapper type for extension
#[derive(Debug, Clone)]
pub struct RequestId(pub String);

/// Assemble the application router.
pub fn build_router(
    tts_service: Arc<TtsService>,
    tts_controller: Arc<TtsController>,
    presets_controller: Arc<PresetsController>,
) -> Router {
    let tts_routes = Router::new()
        .route("/voices", get(TtsController::list_voices))
        .route("/tts/file", post(TtsController::synthesize_file))
        .route("/tts/data", post(TtsController::synthesize_data))
        .route("/tts/save", post(TtsController::synthesize_save))
        .with_state(tts_controller);

    let preset_routes = Router::new()
        .route("/presets", get(PresetsController::list))
        .route(
            "/presets/:name",
            get(PresetsController::get)
                .put(PresetsController::put)
                .delete(PresetsController::delete),
        )
        .with_state(presets_controller);

    Router::new()
        .route("/", get(health::root))
        .route("/health", get(health::health))
        .with_state(tts_service)
        .merge(tts_routes)
        .merge(preset_routes)
        .layer(middleware::from_fn(request_id_middleware))
        // The original service is called from browser clients on other
        // origins, so CORS stays wide open.
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
}

/// Start the HTTP server with all routes configured
pub async fn start_http_server(
    config: Arc<Config>,
    tts_service: Arc<TtsService>,
    tts_controller: Arc<TtsController>,
    presets_controller: Arc<PresetsController>,
) -> Result<(), Box<dyn std::error::Error>> {
    let app = build_router(tts_service, tts_controller, presets_controller);

    let listener =
        tokio::net::TcpListener::bind(format!("{}:{}", config.host, config.port)).await?;

    tracing::info!("Server listening on {}", listener.local_addr()?);

    axum::serve(listener, app).await?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::engine::testutil::MockEngine;
    use crate::infrastructure::presets::PresetStore;
    use axum::body::Body;
    use axum::http::{header, Request as HttpRequest, StatusCode};
    use http_body_util::BodyExt;
    use pretty_assertions::assert_eq;
    use tower::ServiceExt;

    async fn app() -> Router {
        app_with_engine(MockEngine::new()).await
    }

    async fn app_with_engine(engine: MockEngine) -> Router {
        let tts_service = Arc::new(TtsService::new(Arc::new(engine), false));
        let tts_controller = Arc::new(TtsController::new(tts_service.clone()));
        let store = Arc::new(
            PresetStore::open(
                std::env::temp_dir().join(format!("presets-{}.json", Uuid::new_v4())),
            )
            .await,
        );
        let presets_controller = Arc::new(PresetsController::new(store));
        build_router(tts_service, tts_controller, presets_controller)
    }

    fn json_post(uri: &str, body: &str) -> HttpRequest<Body> {
        HttpRequest::post(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    async fn body_bytes(response: Response) -> Vec<u8> {
        response.into_body().collect().await.unwrap().to_bytes().to_vec()
    }

    #[tokio::test]
    async fn root_reports_version() {
        let response = app()
            .await
            .oneshot(HttpRequest::get("/").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let body: serde_json::Value =
            serde_json::from_slice(&body_bytes(response).await).unwrap();
        assert_eq!(body["version"], env!("CARGO_PKG_VERSION"));
    }

    #[tokio::test]
    async fn health_reflects_engine_state() {
        let response = app()
            .await
            .oneshot(HttpRequest::get("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();
        let body: serde_json::Value =
            serde_json::from_slice(&body_bytes(response).await).unwrap();
        assert_eq!(body["status"], "healthy");
        assert_eq!(body["model"], "loaded");

        let response = app_with_engine(MockEngine::failing())
            .await
            .oneshot(HttpRequest::get("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let body: serde_json::Value =
            serde_json::from_slice(&body_bytes(response).await).unwrap();
        assert_eq!(body["status"], "unhealthy");
    }

    #[tokio::test]
    async fn voices_lists_catalog_with_metadata() {
        let response = app()
            .await
            .oneshot(HttpRequest::get("/voices").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let body: serde_json::Value =
            serde_json::from_slice(&body_bytes(response).await).unwrap();
        let voices = body.as_array().unwrap();
        assert_eq!(voices.len(), 3);
        assert_eq!(voices[0]["name"], "af_bella");
        assert_eq!(voices[0]["language"], "American English");
        assert_eq!(voices[0]["gender"], "Female");
    }

    #[tokio::test]
    async fn tts_data_returns_inline_wav() {
        let response = app()
            .await
            .oneshot(json_post(
                "/tts/data",
                r#"{"text": "hello", "voice": "af_bella"}"#,
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            response.headers()[header::CONTENT_TYPE],
            "audio/wav"
        );
        let disposition = response.headers()[header::CONTENT_DISPOSITION]
            .to_str()
            .unwrap()
            .to_string();
        assert!(disposition.starts_with("inline; filename=tts_"));
        assert!(response.headers().contains_key(X_REQUEST_ID));

        let bytes = body_bytes(response).await;
        assert_eq!(&bytes[..4], b"RIFF");
    }

    #[tokio::test]
    async fn tts_file_returns_attachment_in_requested_format() {
        let response = app()
            .await
            .oneshot(json_post(
                "/tts/file",
                r#"{"text": "hello", "voice": "af_bella", "format": "flac"}"#,
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(response.headers()[header::CONTENT_TYPE], "audio/flac");
        let disposition = response.headers()[header::CONTENT_DISPOSITION]
            .to_str()
            .unwrap()
            .to_string();
        assert!(disposition.starts_with("attachment;"));
        assert!(disposition.ends_with(".flac"));

        let bytes = body_bytes(response).await;
        assert_eq!(&bytes[..4], b"fLaC");
    }

    #[tokio::test]
    async fn tts_save_writes_file_and_reports_duration() {
        let path = std::env::temp_dir().join(format!("tts-save-{}.wav", Uuid::new_v4()));
        let uri = format!("/tts/save?output_path={}", path.display());
        let response = app()
            .await
            .oneshot(json_post(&uri, r#"{"text": "hello", "voice": "af_bella"}"#))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let body: serde_json::Value =
            serde_json::from_slice(&body_bytes(response).await).unwrap();
        assert_eq!(body["format"], "wav");
        assert!((body["duration"].as_f64().unwrap() - 1.0).abs() < 1e-3);

        let written = tokio::fs::read(&path).await.unwrap();
        assert_eq!(&written[..4], b"RIFF");
        let _ = tokio::fs::remove_file(path).await;
    }

    #[tokio::test]
    async fn out_of_range_gain_is_rejected_with_detail() {
        let response = app()
            .await
            .oneshot(json_post(
                "/tts/data",
                r#"{"text": "hello", "voice": "af_bella", "volume_gain": 21.0}"#,
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let body: serde_json::Value =
            serde_json::from_slice(&body_bytes(response).await).unwrap();
        assert!(body["detail"].as_str().unwrap().contains("volume_gain"));
    }

    #[tokio::test]
    async fn unknown_voice_names_available_ones() {
        let response = app()
            .await
            .oneshot(json_post(
                "/tts/data",
                r#"{"text": "hello", "voice": "ghost"}"#,
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let body: serde_json::Value =
            serde_json::from_slice(&body_bytes(response).await).unwrap();
        assert!(body["detail"].as_str().unwrap().contains("af_bella"));
    }

    #[tokio::test]
    async fn engine_failure_maps_to_500() {
        let response = app_with_engine(MockEngine::failing())
            .await
            .oneshot(json_post(
                "/tts/data",
                r#"{"text": "hello", "voice": "af_bella"}"#,
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[tokio::test]
    async fn preset_crud_round_trip() {
        let app = app().await;

        let put = HttpRequest::put("/presets/morning")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(
                r#"{"voice": "af_bella", "text": "Good morning", "speed": 1.1}"#.to_string(),
            ))
            .unwrap();
        let response = app.clone().oneshot(put).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let response = app
            .clone()
            .oneshot(
                HttpRequest::get("/presets/morning")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let body: serde_json::Value =
            serde_json::from_slice(&body_bytes(response).await).unwrap();
        assert_eq!(body["voice"], "af_bella");
        assert_eq!(body["format"], "wav"); // default applied

        let response = app
            .clone()
            .oneshot(
                HttpRequest::delete("/presets/morning")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let response = app
            .oneshot(
                HttpRequest::get("/presets/morning")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }
}
