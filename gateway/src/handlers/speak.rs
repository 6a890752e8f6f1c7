//! Generation JSON API.

use std::sync::Arc;

use axum::{
    Extension,
    body::Body,
    extract::{Query, State},
    http::{HeaderName, HeaderValue, header},
    response::{IntoResponse, Json, Response},
};
use base64::Engine;
use base64::engine::general_purpose::STANDARD as BASE64;
use bytes::Bytes;
use serde::Deserialize;
use serde_json::{Value, json};

use super::VoiceParams;
use crate::auth::CurrentUser;
use crate::core::generation::{self, GenerationKind, GenerationRecord};
use crate::errors::{AppError, AppResult};
use crate::state::AppState;

const GENERATION_ID_HEADER: HeaderName = HeaderName::from_static("x-generation-id");

/// Request body for POST /api/speak
#[derive(Debug, Deserialize)]
pub struct SpeakRequest {
    #[serde(default)]
    pub text: String,
    #[serde(default)]
    pub voice_id: String,
    #[serde(flatten)]
    pub params: VoiceParams,
}

/// Request body for POST /api/convert
#[derive(Debug, Deserialize)]
pub struct ConvertRequest {
    /// Base64-encoded mp3, wav or m4a recording
    #[serde(default)]
    pub audio: String,
    #[serde(default)]
    pub file_name: String,
    #[serde(default)]
    pub voice_id: String,
    #[serde(flatten)]
    pub params: VoiceParams,
}

fn audio_response(record: GenerationRecord) -> AppResult<Response> {
    let id = HeaderValue::from_str(&record.id).map_err(|e| AppError::Validation(e.to_string()))?;
    let disposition = HeaderValue::from_str(&format!("inline; filename=\"{}\"", record.file_name()))
        .map_err(|e| AppError::Validation(e.to_string()))?;

    Ok((
        [
            (header::CONTENT_TYPE, HeaderValue::from_static("audio/mpeg")),
            (header::CONTENT_DISPOSITION, disposition),
            (GENERATION_ID_HEADER, id),
        ],
        Body::from(record.audio),
    )
        .into_response())
}

/// POST /api/speak
///
/// Returns the generated MP3 bytes. The record id is in `x-generation-id`.
pub async fn speak_handler(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<CurrentUser>,
    Json(request): Json<SpeakRequest>,
) -> AppResult<Response> {
    let model = request.params.model()?;
    let record = generation::generate(
        state.synthesizer.as_ref(),
        &request.text,
        &request.voice_id,
        model,
        request.params.settings(),
    )
    .await?;

    state.sessions.record(&user.token, record.clone()).await;
    audio_response(record)
}

/// POST /api/convert
pub async fn convert_handler(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<CurrentUser>,
    Json(request): Json<ConvertRequest>,
) -> AppResult<Response> {
    let audio = BASE64
        .decode(request.audio.trim())
        .map_err(|e| AppError::Validation(format!("audio must be base64: {e}")))?;

    let model = request.params.model()?;
    let record = generation::convert(
        state.synthesizer.as_ref(),
        Bytes::from(audio),
        &request.file_name,
        &request.voice_id,
        model,
        request.params.settings(),
    )
    .await?;

    state.sessions.record(&user.token, record.clone()).await;
    audio_response(record)
}

#[derive(Debug, Deserialize)]
pub struct HistoryQuery {
    pub kind: Option<String>,
    pub limit: Option<usize>,
}

/// GET /api/history
///
/// Newest first. `limit` defaults to the display limit and is capped at the
/// per-session retention.
pub async fn history_handler(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<CurrentUser>,
    Query(query): Query<HistoryQuery>,
) -> AppResult<Json<Value>> {
    let kind = match query.kind.as_deref() {
        None | Some("") => None,
        Some(raw) => Some(
            GenerationKind::parse(raw)
                .ok_or_else(|| AppError::Validation(format!("Unknown history kind '{raw}'")))?,
        ),
    };
    let limit = query
        .limit
        .unwrap_or(state.config.history_display_limit)
        .min(state.config.max_history_per_session);

    let entries: Vec<Value> = state
        .sessions
        .history(&user.token, kind, limit)
        .await
        .into_iter()
        .map(|record| {
            let audio_url = format!("/history/{}/audio", record.id);
            let mut entry = json!(record);
            entry["audio_url"] = Value::String(audio_url);
            entry
        })
        .collect();

    Ok(Json(json!({ "history": entries })))
}
