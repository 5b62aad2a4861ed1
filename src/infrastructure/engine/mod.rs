pub mod kitten;

pub use kitten::KittenEngine;

use async_trait::async_trait;

/// Seam to the pretrained synthesis model.
/// Abstracts the underlying engine so the service layer and tests are not
/// tied to a specific model crate.
///
/// Implementations are responsible for:
/// - Loading model weights (lazily if loading is expensive)
/// - Voice lookup within the model's voice pack
/// - Producing mono f32 PCM in [-1.0, 1.0] at `output_sample_rate()`
#[async_trait]
pub trait SpeechEngine: Send + Sync {
    /// Voice names the loaded model can speak with.
    async fn voices(&self) -> Result<Vec<String>, String>;

    /// Synthesize `text` with a validated voice name and speed multiplier.
    async fn synthesize(&self, text: &str, voice: &str, speed: f32) -> Result<Vec<f32>, String>;

    /// Native sample rate of the produced PCM.
    fn output_sample_rate(&self) -> u32;

    /// Ensure the model is loaded; used by startup preload and `/health`.
    async fn warm_up(&self) -> Result<(), String>;
}

#[cfg(test)]
pub mod testutil {
    use super::*;

    /// Deterministic engine for tests: a 440 Hz sine, one second per
    /// request, duration independent of text.
    pub struct MockEngine {
        pub voice_names: Vec<String>,
        pub fail: bool,
    }

    impl MockEngine {
        pub fn new() -> Self {
            Self {
                voice_names: vec![
                    "af_bella".to_string(),
                    "am_adam".to_string(),
                    "bf_emma".to_string(),
                ],
                fail: false,
            }
        }

        pub fn failing() -> Self {
            Self {
                voice_names: Vec::new(),
                fail: true,
            }
        }
    }

    #[async_trait]
    impl SpeechEngine for MockEngine {
        async fn voices(&self) -> Result<Vec<String>, String> {
            if self.fail {
                return Err("engine unavailable".to_string());
            }
            Ok(self.voice_names.clone())
        }

        async fn synthesize(
            &self,
            _text: &str,
            _voice: &str,
            _speed: f32,
        ) -> Result<Vec<f32>, String> {
            if self.fail {
                return Err("engine unavailable".to_string());
            }
            let rate = self.output_sample_rate() as f32;
            Ok((0..self.output_sample_rate())
                .map(|i| (i as f32 * 440.0 * 2.0 * std::f32::consts::PI / rate).sin() * 0.5)
                .collect())
        }

        fn output_sample_rate(&self) -> u32 {
            24_000
        }

        async fn warm_up(&self) -> Result<(), String> {
            if self.fail {
                return Err("engine unavailable".to_string());
            }
            Ok(())
        }
    }
}
