use std::sync::Arc;

use axum::{extract::State, response::Json};
use serde::Serialize;
use serde_json::{Value, json};

use crate::core::tts::{ElevenLabsModel, VoiceSettings};
use crate::errors::AppResult;
use crate::state::AppState;

/// GET /api/voices
///
/// Voices available to the configured ElevenLabs account. The list is cached
/// by the client.
pub async fn list_voices(State(state): State<Arc<AppState>>) -> AppResult<Json<Value>> {
    let voices = state.synthesizer.list_voices().await?;
    tracing::debug!(count = voices.len(), "Listing voices");
    Ok(Json(json!({ "voices": voices })))
}

#[derive(Debug, Serialize)]
struct ModelInfo {
    model_id: &'static str,
    label: &'static str,
    default: bool,
}

/// GET /api/models
pub async fn list_models() -> Json<Value> {
    let models: Vec<ModelInfo> = ElevenLabsModel::all()
        .iter()
        .map(|m| ModelInfo {
            model_id: m.as_str(),
            label: m.label(),
            default: *m == ElevenLabsModel::default(),
        })
        .collect();

    Json(json!({
        "models": models,
        "default_voice_settings": VoiceSettings::default(),
    }))
}
