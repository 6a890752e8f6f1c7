//! Studio page handlers.

use std::collections::HashMap;
use std::sync::Arc;

use axum::{
    Extension, Form,
    body::Body,
    extract::{Multipart, Path, Query, State},
    http::{HeaderValue, StatusCode, header},
    response::{IntoResponse, Response},
};
use bytes::Bytes;
use serde::Deserialize;

use super::VoiceParams;
use crate::auth::CurrentUser;
use crate::core::generation::{self, GenerationError, GenerationKind, GenerationRecord};
use crate::errors::AppError;
use crate::state::AppState;
use crate::views::{self, Notice, StudioView};

/// Values echoed back into the studio forms.
#[derive(Debug, Default)]
struct FormState {
    text: String,
    voice_id: String,
    params: VoiceParams,
}

/// Outcome of the action that produced the page.
enum Outcome {
    None,
    Done(GenerationRecord, &'static str),
    Failed(AppError),
}

async fn render_studio(
    state: &AppState,
    user: &CurrentUser,
    form: &FormState,
    outcome: Outcome,
) -> Response {
    let limit = state.config.history_display_limit;
    let voices = state.synthesizer.list_voices().await;

    let (status, notices, result) = match &outcome {
        Outcome::None => (StatusCode::OK, Vec::new(), None),
        Outcome::Done(record, message) => (
            StatusCode::OK,
            vec![Notice::Success((*message).to_string())],
            Some(record),
        ),
        Outcome::Failed(e) => (e.status_code(), vec![Notice::Error(e.to_string())], None),
    };

    let recent_tts = state
        .sessions
        .history(&user.token, Some(GenerationKind::Tts), limit)
        .await;
    let recent_conversions = state
        .sessions
        .history(&user.token, Some(GenerationKind::VoiceConversion), limit)
        .await;

    let voice_list = voices.as_deref().map_err(|e| e.to_string());
    let voice_id = match (&voice_list, form.voice_id.is_empty()) {
        (Ok(list), true) => list.first().map(|v| v.voice_id.as_str()).unwrap_or(""),
        _ => form.voice_id.as_str(),
    };

    let page = views::studio_page(&StudioView {
        username: &user.username,
        is_admin: user.is_admin(),
        voices: voice_list.clone(),
        model: form.params.model().unwrap_or_default(),
        settings: form.params.settings(),
        voice_id,
        text: &form.text,
        notices,
        result,
        recent_tts: &recent_tts,
        recent_conversions: &recent_conversions,
    });

    (status, page).into_response()
}

/// GET /
pub async fn index(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<CurrentUser>,
) -> Response {
    render_studio(&state, &user, &FormState::default(), Outcome::None).await
}

/// Slider values arrive as strings so a blank or malformed field is reported
/// inline instead of failing form extraction.
#[derive(Debug, Deserialize)]
pub struct GenerateForm {
    #[serde(default)]
    pub text: String,
    #[serde(default)]
    pub voice_id: String,
    pub model_id: Option<String>,
    pub stability: Option<String>,
    pub similarity_boost: Option<String>,
    pub style: Option<String>,
    pub speed: Option<String>,
}

impl GenerateForm {
    fn voice_params(&self) -> Result<VoiceParams, AppError> {
        Ok(VoiceParams {
            model_id: self.model_id.clone(),
            stability: parse_number("stability", self.stability.as_deref())?,
            similarity_boost: parse_number("similarity_boost", self.similarity_boost.as_deref())?,
            style: parse_number("style", self.style.as_deref())?,
            speed: parse_number("speed", self.speed.as_deref())?,
        })
    }
}

/// POST /generate
pub async fn generate(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<CurrentUser>,
    Form(form): Form<GenerateForm>,
) -> Response {
    let (params, invalid) = match form.voice_params() {
        Ok(params) => (params, None),
        Err(e) => (
            VoiceParams {
                model_id: form.model_id.clone(),
                ..VoiceParams::default()
            },
            Some(e),
        ),
    };
    let form_state = FormState {
        text: form.text,
        voice_id: form.voice_id,
        params,
    };

    let outcome = match invalid {
        Some(e) => Outcome::Failed(e),
        None => match run_generate(&state, &user, &form_state).await {
            Ok(record) => Outcome::Done(record, "Audio generated successfully!"),
            Err(e) => Outcome::Failed(e),
        },
    };
    render_studio(&state, &user, &form_state, outcome).await
}

async fn run_generate(
    state: &AppState,
    user: &CurrentUser,
    form: &FormState,
) -> Result<GenerationRecord, AppError> {
    let model = form.params.model()?;
    let record = generation::generate(
        state.synthesizer.as_ref(),
        &form.text,
        &form.voice_id,
        model,
        form.params.settings(),
    )
    .await?;

    state.sessions.record(&user.token, record.clone()).await;
    Ok(record)
}

/// POST /convert (multipart)
pub async fn convert(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<CurrentUser>,
    multipart: Multipart,
) -> Response {
    let upload = match read_upload(multipart).await {
        Ok(upload) => upload,
        Err(e) => {
            return render_studio(&state, &user, &FormState::default(), Outcome::Failed(e)).await;
        }
    };

    let outcome = match run_convert(&state, &user, &upload).await {
        Ok(record) => Outcome::Done(record, "Voice converted successfully!"),
        Err(e) => Outcome::Failed(e),
    };
    render_studio(&state, &user, &upload.form, outcome).await
}

struct Upload {
    audio: Bytes,
    file_name: String,
    form: FormState,
}

async fn read_upload(mut multipart: Multipart) -> Result<Upload, AppError> {
    let mut audio = Bytes::new();
    let mut file_name = String::new();
    let mut fields: HashMap<String, String> = HashMap::new();

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::Validation(format!("Invalid upload: {e}")))?
    {
        let name = field.name().unwrap_or_default().to_string();
        if name == "audio" {
            file_name = field.file_name().unwrap_or_default().to_string();
            audio = field
                .bytes()
                .await
                .map_err(|e| AppError::Validation(format!("Invalid upload: {e}")))?;
        } else {
            let value = field
                .text()
                .await
                .map_err(|e| AppError::Validation(format!("Invalid upload: {e}")))?;
            fields.insert(name, value);
        }
    }

    let number = |name: &str| parse_number(name, fields.get(name).map(String::as_str));
    let params = VoiceParams {
        model_id: fields.get("model_id").cloned(),
        stability: number("stability")?,
        similarity_boost: number("similarity_boost")?,
        style: number("style")?,
        speed: number("speed")?,
    };

    Ok(Upload {
        audio,
        file_name,
        form: FormState {
            text: String::new(),
            voice_id: fields.remove("voice_id").unwrap_or_default(),
            params,
        },
    })
}

/// Blank means "use the default".
fn parse_number(name: &str, value: Option<&str>) -> Result<Option<f64>, AppError> {
    match value.map(str::trim) {
        None | Some("") => Ok(None),
        Some(raw) => raw
            .parse::<f64>()
            .map(Some)
            .map_err(|_| AppError::Validation(format!("{name} must be a number, got '{raw}'"))),
    }
}

async fn run_convert(
    state: &AppState,
    user: &CurrentUser,
    upload: &Upload,
) -> Result<GenerationRecord, AppError> {
    if upload.audio.is_empty() {
        return Err(GenerationError::EmptyUpload.into());
    }
    let model = upload.form.params.model()?;
    let settings = upload.form.params.settings();

    let record = generation::convert(
        state.synthesizer.as_ref(),
        upload.audio.clone(),
        &upload.file_name,
        &upload.form.voice_id,
        model,
        settings,
    )
    .await?;

    state.sessions.record(&user.token, record.clone()).await;
    Ok(record)
}

#[derive(Debug, Deserialize)]
pub struct AudioQuery {
    pub download: Option<String>,
}

/// GET /history/{id}/audio
///
/// Serves audio from the caller's own session only.
pub async fn history_audio(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<CurrentUser>,
    Path(id): Path<String>,
    Query(query): Query<AudioQuery>,
) -> Result<Response, AppError> {
    let record = state
        .sessions
        .audio(&user.token, &id)
        .await
        .ok_or_else(|| AppError::NotFound(format!("No audio with id '{id}'")))?;

    let disposition = if query.download.is_some() {
        "attachment"
    } else {
        "inline"
    };
    let disposition = HeaderValue::from_str(&format!(
        "{disposition}; filename=\"{}\"",
        record.file_name()
    ))
    .map_err(|e| AppError::Validation(e.to_string()))?;

    Ok((
        [
            (header::CONTENT_TYPE, HeaderValue::from_static("audio/mpeg")),
            (header::CONTENT_DISPOSITION, disposition),
            (header::CACHE_CONTROL, HeaderValue::from_static("private, no-store")),
        ],
        Body::from(record.audio),
    )
        .into_response())
}
