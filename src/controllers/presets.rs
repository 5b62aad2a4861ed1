use axum::{
    extract::{Path, State},
    Json,
};
use serde_json::{json, Value};
use std::collections::BTreeMap;
use std::sync::Arc;

use crate::{
    error::{AppError, AppResult},
    infrastructure::presets::{Preset, PresetError, PresetStore},
};

pub struct PresetsController {
    store: Arc<PresetStore>,
}

impl PresetsController {
    pub fn new(store: Arc<PresetStore>) -> Self {
        Self { store }
    }

    /// GET /presets - all presets keyed by name
    pub async fn list(
        State(controller): State<Arc<PresetsController>>,
    ) -> Json<BTreeMap<String, Preset>> {
        Json(controller.store.list().await)
    }

    /// GET /presets/:name
    pub async fn get(
        State(controller): State<Arc<PresetsController>>,
        Path(name): Path<String>,
    ) -> AppResult<Json<Preset>> {
        controller
            .store
            .get(&name)
            .await
            .map(Json)
            .ok_or_else(|| AppError::NotFound(format!("preset '{}'", name)))
    }

    /// PUT /presets/:name - create or replace a preset
    pub async fn put(
        State(controller): State<Arc<PresetsController>>,
        Path(name): Path<String>,
        Json(preset): Json<Preset>,
    ) -> AppResult<Json<Value>> {
        controller
            .store
            .put(name.clone(), preset)
            .await
            .map_err(map_preset_error)?;
        Ok(Json(json!({ "message": "Preset saved", "name": name })))
    }

    /// DELETE /presets/:name
    pub async fn delete(
        State(controller): State<Arc<PresetsController>>,
        Path(name): Path<String>,
    ) -> AppResult<Json<Value>> {
        let removed = controller
            .store
            .delete(&name)
            .await
            .map_err(map_preset_error)?;
        if !removed {
            return Err(AppError::NotFound(format!("preset '{}'", name)));
        }
        Ok(Json(json!({ "message": "Preset deleted", "name": name })))
    }
}

fn map_preset_error(err: PresetError) -> AppError {
    match err {
        PresetError::Invalid(msg) => AppError::BadRequest(msg),
        PresetError::Io(e) => AppError::Internal(e.to_string()),
    }
}
