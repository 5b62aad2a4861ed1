use super::SpeechEngine;
use async_trait::async_trait;
use kittentts::{download, KittenTTS, SAMPLE_RATE};
use std::sync::Arc;
use tokio::sync::OnceCell;

/// KittenTTS implementation of the speech engine.
///
/// The ONNX model and voice embeddings are fetched from the HuggingFace hub
/// on first use and cached for the lifetime of the process. Loading and
/// inference are blocking (ONNX Runtime), so both run on the blocking pool.
pub struct KittenEngine {
    repo_id: String,
    model: OnceCell<Arc<KittenTTS>>,
}

impl KittenEngine {
    pub fn new(repo_id: String) -> Self {
        Self {
            repo_id,
            model: OnceCell::new(),
        }
    }

    async fn model(&self) -> Result<Arc<KittenTTS>, String> {
        self.model
            .get_or_try_init(|| async {
                let repo_id = self.repo_id.clone();
                tracing::info!(repo_id = %repo_id, "Loading KittenTTS model");
                let start = std::time::Instant::now();

                let model = tokio::task::spawn_blocking(move || download::load_from_hub(&repo_id))
                    .await
                    .map_err(|e| format!("Model load task panicked: {}", e))?
                    .map_err(|e| format!("Failed to load KittenTTS model: {:#}", e))?;

                tracing::info!(
                    load_ms = start.elapsed().as_millis(),
                    voices = model.available_voices.len(),
                    "KittenTTS model loaded"
                );
                Ok(Arc::new(model))
            })
            .await
            .cloned()
    }
}

#[async_trait]
impl SpeechEngine for KittenEngine {
    async fn voices(&self) -> Result<Vec<String>, String> {
        let model = self.model().await?;
        Ok(model.available_voices.clone())
    }

    async fn synthesize(&self, text: &str, voice: &str, speed: f32) -> Result<Vec<f32>, String> {
        let model = self.model().await?;
        let text = text.to_string();
        let voice = voice.to_string();

        let start = std::time::Instant::now();
        let samples = tokio::task::spawn_blocking(move || {
            model.generate(&text, &voice, speed, true)
        })
        .await
        .map_err(|e| format!("Synthesis task panicked: {}", e))?
        .map_err(|e| format!("Synthesis failed: {:#}", e))?;

        tracing::info!(
            latency_ms = start.elapsed().as_millis(),
            samples = samples.len(),
            "KittenTTS synthesis completed"
        );
        Ok(samples)
    }

    fn output_sample_rate(&self) -> u32 {
        SAMPLE_RATE
    }

    async fn warm_up(&self) -> Result<(), String> {
        self.model().await.map(|_| ())
    }
}
