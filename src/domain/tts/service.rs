use super::error::TtsServiceError;
use super::validate::{validate, SynthesisSpec};
use super::voice::VoiceInfo;
use super::SynthesisRequest;
use crate::domain::audio::{self, AudioFormat};
use crate::infrastructure::engine::SpeechEngine;
use async_trait::async_trait;
use moka::future::Cache;
use rand::seq::SliceRandom;
use std::sync::Arc;
use std::time::Duration;

/// Outcome of one synthesis request, ready for response shaping.
#[derive(Debug, Clone)]
pub struct SynthesisOutput {
    pub audio: Vec<u8>,
    pub format: AudioFormat,
    pub voice: String,
    pub sample_rate: u32,
    pub duration_secs: f32,
}

pub struct TtsService {
    engine: Arc<dyn SpeechEngine>,
    cache: Option<Cache<String, SynthesisOutput>>,
}

impl TtsService {
    pub fn new(engine: Arc<dyn SpeechEngine>, cache_enabled: bool) -> Self {
        let cache = if cache_enabled {
            Some(
                Cache::builder()
                    .max_capacity(100)
                    .time_to_idle(Duration::from_secs(30 * 60)) // refreshes on access
                    .build(),
            )
        } else {
            None
        };

        Self { engine, cache }
    }
}

#[async_trait]
pub trait TtsServiceApi: Send + Sync {
    /// Run the synthesis pipeline for one request.
    ///
    /// This operation:
    /// - Validates all request fields against the engine's voice list
    /// - Picks one voice from the candidates at random
    /// - Synthesizes PCM, applies volume gain, encodes to the requested
    ///   container
    async fn synthesize(
        &self,
        request: &SynthesisRequest,
    ) -> Result<SynthesisOutput, TtsServiceError>;

    /// The voice catalog with language/gender metadata.
    async fn voices(&self) -> Result<Vec<VoiceInfo>, TtsServiceError>;

    /// Whether the engine is loaded and usable.
    async fn ready(&self) -> bool;
}

#[async_trait]
impl TtsServiceApi for TtsService {
    async fn synthesize(
        &self,
        request: &SynthesisRequest,
    ) -> Result<SynthesisOutput, TtsServiceError> {
        let known_voices = self
            .engine
            .voices()
            .await
            .map_err(TtsServiceError::Dependency)?;

        let spec = validate(request, &known_voices)?;
        let voice = pick_voice(&spec)?;

        tracing::info!(
            voice = %voice,
            text_length = spec.text.len(),
            speed = spec.speed,
            format = %spec.format,
            sample_rate = spec.sample_rate,
            volume_gain = spec.volume_gain,
            "TTS synthesis request"
        );

        let cache_key = cache_key(&spec, &voice);
        if let Some(cache) = &self.cache {
            if let Some(cached) = cache.get(&cache_key).await {
                tracing::info!(
                    voice = %voice,
                    cached_audio_size = cached.audio.len(),
                    "TTS cache hit - returning cached audio"
                );
                return Ok(cached);
            }
        }

        let start = std::time::Instant::now();
        let mut samples = self
            .engine
            .synthesize(&spec.text, &voice, spec.speed)
            .await
            .map_err(TtsServiceError::Dependency)?;

        if samples.is_empty() {
            return Err(TtsServiceError::Dependency(
                "engine produced no audio".to_string(),
            ));
        }

        // 0.0 dB is the identity: the samples are left untouched so the
        // output is byte-equivalent to the unadjusted path.
        if spec.volume_gain != 0.0 {
            audio::apply_gain(&mut samples, spec.volume_gain);
        }

        let audio_bytes = audio::encode(&samples, spec.sample_rate, spec.format)?;
        let duration_secs = samples.len() as f32 / spec.sample_rate as f32;

        tracing::info!(
            voice = %voice,
            latency_ms = start.elapsed().as_millis(),
            sample_count = samples.len(),
            audio_size_bytes = audio_bytes.len(),
            duration_secs,
            "TTS synthesis completed"
        );

        let output = SynthesisOutput {
            audio: audio_bytes,
            format: spec.format,
            voice,
            sample_rate: spec.sample_rate,
            duration_secs,
        };

        if let Some(cache) = &self.cache {
            cache.insert(cache_key, output.clone()).await;
        }

        Ok(output)
    }

    async fn voices(&self) -> Result<Vec<VoiceInfo>, TtsServiceError> {
        let names = self
            .engine
            .voices()
            .await
            .map_err(TtsServiceError::Dependency)?;

        let mut catalog: Vec<VoiceInfo> =
            names.iter().map(|name| VoiceInfo::from_name(name)).collect();
        catalog.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(catalog)
    }

    async fn ready(&self) -> bool {
        match self.engine.warm_up().await {
            Ok(()) => true,
            Err(e) => {
                tracing::warn!(error = %e, "Engine warm-up failed");
                false
            }
        }
    }
}

fn pick_voice(spec: &SynthesisSpec) -> Result<String, TtsServiceError> {
    spec.candidates
        .choose(&mut rand::thread_rng())
        .cloned()
        .ok_or_else(|| TtsServiceError::Invalid("no voice candidates".to_string()))
}

fn cache_key(spec: &SynthesisSpec, voice: &str) -> String {
    format!(
        "{}|{}|{}|{}|{}|{}",
        voice, spec.speed, spec.format, spec.sample_rate, spec.volume_gain, spec.text
    )
}
