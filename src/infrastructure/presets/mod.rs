//! Speed-dial presets: named voice/text combinations persisted to a JSON
//! file so frequent requests can be replayed without retyping them.

use crate::domain::audio::AudioFormat;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::PathBuf;
use tokio::sync::RwLock;

fn default_format() -> String {
    "wav".to_string()
}

fn default_speed() -> f32 {
    1.0
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Preset {
    pub voice: String,
    pub text: String,
    #[serde(default = "default_format")]
    pub format: String,
    #[serde(default = "default_speed")]
    pub speed: f32,
}

#[derive(Debug, thiserror::Error)]
pub enum PresetError {
    #[error("invalid preset: {0}")]
    Invalid(String),
    #[error("preset file error: {0}")]
    Io(#[from] std::io::Error),
}

pub struct PresetStore {
    path: PathBuf,
    presets: RwLock<BTreeMap<String, Preset>>,
}

impl PresetStore {
    /// Open the store, loading any existing preset file. A missing file is
    /// an empty store; unreadable files and invalid entries are skipped
    /// with a warning rather than failing startup.
    pub async fn open(path: PathBuf) -> Self {
        let presets = match tokio::fs::read(&path).await {
            Ok(bytes) => match serde_json::from_slice::<BTreeMap<String, serde_json::Value>>(&bytes)
            {
                Ok(raw) => {
                    let mut valid = BTreeMap::new();
                    for (name, value) in raw {
                        match serde_json::from_value::<Preset>(value) {
                            Ok(preset) => {
                                valid.insert(name, preset);
                            }
                            Err(e) => {
                                tracing::warn!(preset = %name, error = %e, "Skipping invalid preset");
                            }
                        }
                    }
                    valid
                }
                Err(e) => {
                    tracing::warn!(path = %path.display(), error = %e, "Preset file unreadable, starting empty");
                    BTreeMap::new()
                }
            },
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => BTreeMap::new(),
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "Preset file unreadable, starting empty");
                BTreeMap::new()
            }
        };

        tracing::info!(path = %path.display(), count = presets.len(), "Preset store opened");
        Self {
            path,
            presets: RwLock::new(presets),
        }
    }

    pub async fn list(&self) -> BTreeMap<String, Preset> {
        self.presets.read().await.clone()
    }

    pub async fn get(&self, name: &str) -> Option<Preset> {
        self.presets.read().await.get(name).cloned()
    }

    /// Insert or replace a preset and persist the whole map.
    pub async fn put(&self, name: String, preset: Preset) -> Result<(), PresetError> {
        if preset.voice.is_empty() {
            return Err(PresetError::Invalid("voice must not be empty".to_string()));
        }
        if preset.text.is_empty() {
            return Err(PresetError::Invalid("text must not be empty".to_string()));
        }
        if AudioFormat::parse(&preset.format).is_none() {
            return Err(PresetError::Invalid(format!(
                "unsupported format '{}'",
                preset.format
            )));
        }

        let mut presets = self.presets.write().await;
        presets.insert(name, preset);
        self.persist(&presets).await?;
        Ok(())
    }

    /// Remove a preset; returns false when the name does not exist.
    pub async fn delete(&self, name: &str) -> Result<bool, PresetError> {
        let mut presets = self.presets.write().await;
        if presets.remove(name).is_none() {
            return Ok(false);
        }
        self.persist(&presets).await?;
        Ok(true)
    }

    async fn persist(&self, presets: &BTreeMap<String, Preset>) -> Result<(), PresetError> {
        let json = serde_json::to_string_pretty(presets)
            .map_err(|e| PresetError::Invalid(e.to_string()))?;
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                tokio::fs::create_dir_all(parent).await?;
            }
        }
        tokio::fs::write(&self.path, json).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn temp_path() -> PathBuf {
        std::env::temp_dir().join(format!("presets-{}.json", uuid::Uuid::new_v4()))
    }

    fn preset() -> Preset {
        Preset {
            voice: "af_bella".to_string(),
            text: "Good morning".to_string(),
            format: "wav".to_string(),
            speed: 1.0,
        }
    }

    #[tokio::test]
    async fn missing_file_means_empty_store() {
        let store = PresetStore::open(temp_path()).await;
        assert!(store.list().await.is_empty());
    }

    #[tokio::test]
    async fn put_then_get_round_trips() {
        let path = temp_path();
        let store = PresetStore::open(path.clone()).await;
        store.put("morning".to_string(), preset()).await.unwrap();

        assert_eq!(store.get("morning").await, Some(preset()));

        // A fresh store sees the persisted entry.
        let reopened = PresetStore::open(path.clone()).await;
        assert_eq!(reopened.get("morning").await, Some(preset()));

        let _ = tokio::fs::remove_file(path).await;
    }

    #[tokio::test]
    async fn delete_removes_and_reports_missing() {
        let path = temp_path();
        let store = PresetStore::open(path.clone()).await;
        store.put("morning".to_string(), preset()).await.unwrap();

        assert!(store.delete("morning").await.unwrap());
        assert!(!store.delete("morning").await.unwrap());
        assert!(store.get("morning").await.is_none());

        let _ = tokio::fs::remove_file(path).await;
    }

    #[tokio::test]
    async fn invalid_presets_are_rejected() {
        let store = PresetStore::open(temp_path()).await;

        let mut no_voice = preset();
        no_voice.voice.clear();
        assert!(store.put("x".to_string(), no_voice).await.is_err());

        let mut bad_format = preset();
        bad_format.format = "ogg".to_string();
        assert!(store.put("x".to_string(), bad_format).await.is_err());
    }

    #[tokio::test]
    async fn invalid_entries_in_file_are_skipped_on_load() {
        let path = temp_path();
        let json = r#"{
            "good": {"voice": "af_bella", "text": "hi"},
            "bad": {"text": "missing voice"}
        }"#;
        tokio::fs::write(&path, json).await.unwrap();

        let store = PresetStore::open(path.clone()).await;
        let presets = store.list().await;
        assert_eq!(presets.len(), 1);
        assert_eq!(presets["good"].format, "wav"); // default applied
        assert_eq!(presets["good"].speed, 1.0);

        let _ = tokio::fs::remove_file(path).await;
    }
}
