use axum::{
    body::Body,
    extract::{Query, State},
    http::{header, HeaderMap, StatusCode},
    Json,
};
use std::path::Path;
use std::sync::Arc;

use crate::{
    domain::tts::{
        dto::{SaveQuery, SaveResponse},
        SynthesisOutput, SynthesisRequest, TtsService, TtsServiceApi, VoiceInfo,
    },
    error::{AppError, AppResult},
};

pub struct TtsController {
    tts_service: Arc<TtsService>,
}

impl TtsController {
    pub fn new(tts_service: Arc<TtsService>) -> Self {
        Self { tts_service }
    }

    /// GET /voices - list the voice catalog
    pub async fn list_voices(
        State(controller): State<Arc<TtsController>>,
    ) -> AppResult<Json<Vec<VoiceInfo>>> {
        let catalog = controller
            .tts_service
            .voices()
            .await
            .map_err(AppError::from)?;
        Ok(Json(catalog))
    }

    /// POST /tts/file - synthesize and return the audio as a download
    pub async fn synthesize_file(
        State(controller): State<Arc<TtsController>>,
        Json(request): Json<SynthesisRequest>,
    ) -> AppResult<(StatusCode, HeaderMap, Body)> {
        let output = controller
            .tts_service
            .synthesize(&request)
            .await
            .map_err(AppError::from)?;

        let headers = audio_headers(&output, "attachment");
        Ok((StatusCode::OK, headers, Body::from(output.audio)))
    }

    /// POST /tts/data - synthesize and return the audio inline
    pub async fn synthesize_data(
        State(controller): State<Arc<TtsController>>,
        Json(request): Json<SynthesisRequest>,
    ) -> AppResult<(StatusCode, HeaderMap, Body)> {
        let output = controller
            .tts_service
            .synthesize(&request)
            .await
            .map_err(AppError::from)?;

        let headers = audio_headers(&output, "inline");
        Ok((StatusCode::OK, headers, Body::from(output.audio)))
    }

    /// POST /tts/save?output_path=... - synthesize and write server-side
    pub async fn synthesize_save(
        State(controller): State<Arc<TtsController>>,
        Query(query): Query<SaveQuery>,
        Json(request): Json<SynthesisRequest>,
    ) -> AppResult<Json<SaveResponse>> {
        let output = controller
            .tts_service
            .synthesize(&request)
            .await
            .map_err(AppError::from)?;

        let path = Path::new(&query.output_path);
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                tokio::fs::create_dir_all(parent).await.map_err(|e| {
                    AppError::Internal(format!("Failed to create output directory: {}", e))
                })?;
            }
        }
        tokio::fs::write(path, &output.audio)
            .await
            .map_err(|e| AppError::Internal(format!("Failed to save audio file: {}", e)))?;

        tracing::info!(
            path = %query.output_path,
            bytes = output.audio.len(),
            "Audio written to disk"
        );

        Ok(Json(SaveResponse {
            message: "Audio file saved".to_string(),
            path: query.output_path,
            format: output.format.to_string(),
            duration: output.duration_secs,
        }))
    }
}

fn audio_headers(output: &SynthesisOutput, disposition: &str) -> HeaderMap {
    let filename = format!(
        "tts_{}.{}",
        chrono::Utc::now().format("%Y%m%d_%H%M%S"),
        output.format.extension()
    );

    let mut headers = HeaderMap::new();
    headers.insert(
        header::CONTENT_TYPE,
        output.format.content_type().parse().unwrap(),
    );
    headers.insert(
        header::CONTENT_DISPOSITION,
        format!("{}; filename={}", disposition, filename)
            .parse()
            .unwrap(),
    );
    headers.insert("X-Selected-Voice", output.voice.parse().unwrap());
    headers.insert(
        "X-Duration-Seconds",
        format!("{:.3}", output.duration_secs).parse().unwrap(),
    );
    headers
}
