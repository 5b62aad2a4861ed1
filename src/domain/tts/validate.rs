//! Request validation: turns a raw [`SynthesisRequest`] into a typed
//! [`SynthesisSpec`] or a 400 with the offending parameter named.

use super::dto::SynthesisRequest;
use crate::domain::audio::AudioFormat;
use crate::error::AppError;

pub const MAX_TEXT_LENGTH: usize = 10_000;
pub const DEFAULT_SPEED: f32 = 1.0;
pub const MIN_SPEED: f32 = 0.1;
pub const MAX_SPEED: f32 = 3.0;
pub const DEFAULT_VOLUME_GAIN_DB: f32 = 0.0;
pub const MIN_VOLUME_GAIN_DB: f32 = -20.0;
pub const MAX_VOLUME_GAIN_DB: f32 = 20.0;
pub const DEFAULT_SAMPLE_RATE: u32 = 24_000;
pub const VALID_SAMPLE_RATES: &[u32] = &[16_000, 22_050, 24_000, 44_100, 48_000];

/// A fully validated synthesis request.
#[derive(Debug, Clone, PartialEq)]
pub struct SynthesisSpec {
    pub text: String,
    /// Valid voice candidates; the service picks one at random per request.
    pub candidates: Vec<String>,
    pub speed: f32,
    pub format: AudioFormat,
    pub sample_rate: u32,
    pub volume_gain: f32,
}

pub fn validate(
    request: &SynthesisRequest,
    known_voices: &[String],
) -> Result<SynthesisSpec, AppError> {
    let text = normalize_whitespace(&request.text);
    if text.is_empty() {
        return Err(AppError::BadRequest("text must not be empty".to_string()));
    }
    if text.chars().count() > MAX_TEXT_LENGTH {
        return Err(AppError::BadRequest(format!(
            "text exceeds the {} character limit",
            MAX_TEXT_LENGTH
        )));
    }

    let candidates = validate_voices(request, known_voices)?;

    // Speed is clamped, not rejected: the documented bounds are soft.
    let speed = request.speed.unwrap_or(DEFAULT_SPEED);
    if !speed.is_finite() {
        return Err(AppError::BadRequest("speed must be a finite number".to_string()));
    }
    let speed = if (MIN_SPEED..=MAX_SPEED).contains(&speed) {
        speed
    } else {
        let clamped = speed.clamp(MIN_SPEED, MAX_SPEED);
        tracing::warn!(requested = speed, clamped, "speed out of range, clamping");
        clamped
    };

    // Volume gain outside its bounds is a hard rejection, never a clamp.
    let volume_gain = request.volume_gain.unwrap_or(DEFAULT_VOLUME_GAIN_DB);
    if !volume_gain.is_finite()
        || !(MIN_VOLUME_GAIN_DB..=MAX_VOLUME_GAIN_DB).contains(&volume_gain)
    {
        return Err(AppError::BadRequest(format!(
            "volume_gain must be between {} and {} dB",
            MIN_VOLUME_GAIN_DB, MAX_VOLUME_GAIN_DB
        )));
    }

    let format = match &request.format {
        None => AudioFormat::Wav,
        Some(name) => AudioFormat::parse(name).ok_or_else(|| {
            AppError::BadRequest(format!(
                "unsupported format '{}'; supported formats: wav, mp3, flac",
                name
            ))
        })?,
    };

    let sample_rate = request.sample_rate.unwrap_or(DEFAULT_SAMPLE_RATE);
    if !VALID_SAMPLE_RATES.contains(&sample_rate) {
        return Err(AppError::BadRequest(format!(
            "unsupported sample_rate {}; supported rates: {:?}",
            sample_rate, VALID_SAMPLE_RATES
        )));
    }

    Ok(SynthesisSpec {
        text,
        candidates,
        speed,
        format,
        sample_rate,
        volume_gain,
    })
}

/// Collect voice candidates from `voice` and `voices`, keeping only names
/// the engine actually knows.
fn validate_voices(
    request: &SynthesisRequest,
    known_voices: &[String],
) -> Result<Vec<String>, AppError> {
    let mut requested: Vec<String> = Vec::new();
    if let Some(voice) = &request.voice {
        requested.push(voice.clone());
    }
    if let Some(voices) = &request.voices {
        requested.extend(voices.iter().cloned());
    }

    if requested.is_empty() {
        return Err(AppError::BadRequest(
            "at least one voice must be provided".to_string(),
        ));
    }

    let candidates: Vec<String> = requested
        .into_iter()
        .filter(|v| known_voices.iter().any(|known| known == v))
        .collect();

    if candidates.is_empty() {
        return Err(AppError::BadRequest(format!(
            "none of the requested voices exist; available voices: {}",
            known_voices.join(", ")
        )));
    }

    Ok(candidates)
}

fn normalize_whitespace(text: &str) -> String {
    let whitespace_pattern = regex::Regex::new(r"\s+").unwrap();
    whitespace_pattern.replace_all(text, " ").trim().to_string()
}
