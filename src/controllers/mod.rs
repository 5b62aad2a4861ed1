pub mod health;
pub mod presets;
pub mod tts;
