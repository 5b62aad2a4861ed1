use serde::{Deserialize, Serialize};

/// Request body for the `POST /tts/*` endpoints.
///
/// `voice` selects a single voice; `voices` supplies candidates and one is
/// chosen at random per request. Numeric fields and `format` are validated
/// in [`crate::domain::tts::validate`], so raw wire types are kept loose
/// here and bad values surface as 400s with a `detail` message instead of
/// deserialization failures.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SynthesisRequest {
    pub text: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub voice: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub voices: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub speed: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub format: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sample_rate: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub volume_gain: Option<f32>,
}

/// Query parameters for `POST /tts/save`.
#[derive(Debug, Deserialize)]
pub struct SaveQuery {
    pub output_path: String,
}

/// Response body for `POST /tts/save`.
#[derive(Debug, Serialize, Deserialize)]
pub struct SaveResponse {
    pub message: String,
    pub path: String,
    pub format: String,
    pub duration: f32,
}
