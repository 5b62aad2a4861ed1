pub mod dto;
pub mod error;
pub mod service;
pub mod validate;
pub mod voice;

pub use dto::SynthesisRequest;
pub use error::TtsServiceError;
pub use service::{SynthesisOutput, TtsService, TtsServiceApi};
pub use validate::SynthesisSpec;
pub use voice::VoiceInfo;
