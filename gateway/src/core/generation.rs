//! Studio operations: text-to-speech and voice conversion.
//!
//! Both operations validate their input before the synthesizer is touched,
//! forward the parameters exactly as given, and produce a [`GenerationRecord`]
//! that the caller appends to the session history.

use bytes::Bytes;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use time::OffsetDateTime;
use time::format_description::well_known::Rfc3339;
use tracing::{info, warn};

use crate::core::tts::{
    ConversionRequest, ElevenLabsModel, SpeechRequest, SpeechSynthesizer, TTSError, VoiceSettings,
};
use crate::utils::detect_audio_format;

pub const EMPTY_TEXT_MESSAGE: &str = "Please enter some text to convert to speech.";
pub const EMPTY_UPLOAD_MESSAGE: &str = "Please upload an audio file to convert.";
pub const UNSUPPORTED_UPLOAD_MESSAGE: &str =
    "Unsupported audio format. Please upload an mp3, wav or m4a file.";

/// Characters of input text kept in a history entry.
pub const PREVIEW_CHARS: usize = 50;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GenerationKind {
    Tts,
    VoiceConversion,
}

impl GenerationKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Tts => "tts",
            Self::VoiceConversion => "voice_conversion",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "tts" => Some(Self::Tts),
            "voice_conversion" => Some(Self::VoiceConversion),
            _ => None,
        }
    }
}

/// One entry of a session's generation history.
#[derive(Debug, Clone, Serialize)]
pub struct GenerationRecord {
    pub id: String,
    pub kind: GenerationKind,
    /// Text preview for TTS, original file label for conversions
    pub text: String,
    pub voice_id: String,
    pub voice_name: String,
    pub model: ElevenLabsModel,
    pub created_at: String,
    #[serde(skip)]
    pub audio: Bytes,
}

impl GenerationRecord {
    fn new(
        kind: GenerationKind,
        text: String,
        voice: &VoiceChoice,
        model: ElevenLabsModel,
        audio: Bytes,
    ) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            kind,
            text,
            voice_id: voice.voice_id.clone(),
            voice_name: voice.voice_name.clone(),
            model,
            created_at: now_rfc3339(),
            audio,
        }
    }

    /// Download filename for the stored audio.
    pub fn file_name(&self) -> String {
        let prefix = match self.kind {
            GenerationKind::Tts => "speech",
            GenerationKind::VoiceConversion => "converted",
        };
        format!("{prefix}-{}.mp3", self.id)
    }
}

/// Voice selected for a generation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VoiceChoice {
    pub voice_id: String,
    pub voice_name: String,
}

impl VoiceChoice {
    /// Resolve the display name of `voice_id` from the (cached) voice list.
    ///
    /// Falls back to the id itself when the list cannot be fetched or does
    /// not contain the voice.
    pub async fn resolve(synthesizer: &dyn SpeechSynthesizer, voice_id: &str) -> Self {
        let voice_name = match synthesizer.list_voices().await {
            Ok(voices) => voices
                .into_iter()
                .find(|v| v.voice_id == voice_id)
                .map(|v| v.name),
            Err(e) => {
                warn!(voice_id = %voice_id, error = %e, "Could not resolve voice name");
                None
            }
        };

        Self {
            voice_id: voice_id.to_string(),
            voice_name: voice_name.unwrap_or_else(|| voice_id.to_string()),
        }
    }
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum GenerationError {
    #[error("{EMPTY_TEXT_MESSAGE}")]
    EmptyText,

    #[error("{EMPTY_UPLOAD_MESSAGE}")]
    EmptyUpload,

    #[error("{UNSUPPORTED_UPLOAD_MESSAGE}")]
    UnsupportedUpload,

    #[error("Please select a voice.")]
    MissingVoice,

    #[error("Invalid voice settings: {0}")]
    InvalidSettings(String),

    #[error(transparent)]
    Tts(#[from] TTSError),
}

/// Convert `text` to speech with the given voice, model and settings.
pub async fn generate(
    synthesizer: &dyn SpeechSynthesizer,
    text: &str,
    voice_id: &str,
    model: ElevenLabsModel,
    settings: VoiceSettings,
) -> Result<GenerationRecord, GenerationError> {
    if text.trim().is_empty() {
        return Err(GenerationError::EmptyText);
    }
    check_common(voice_id, &settings)?;

    let voice = VoiceChoice::resolve(synthesizer, voice_id).await;
    let request = SpeechRequest {
        text: text.to_string(),
        voice_id: voice.voice_id.clone(),
        model_id: model.as_str().to_string(),
        voice_settings: settings,
    };

    let audio = synthesizer.text_to_speech(&request).await?;
    info!(
        voice = %voice.voice_name,
        model = %model,
        bytes = audio.len(),
        "Generated speech"
    );

    Ok(GenerationRecord::new(
        GenerationKind::Tts,
        text_preview(text),
        &voice,
        model,
        audio,
    ))
}

/// Re-voice an uploaded recording.
///
/// The history entry reads "Conversion to {voice}". `label` names the upload
/// in logs.
pub async fn convert(
    synthesizer: &dyn SpeechSynthesizer,
    audio: Bytes,
    label: &str,
    voice_id: &str,
    model: ElevenLabsModel,
    settings: VoiceSettings,
) -> Result<GenerationRecord, GenerationError> {
    if audio.is_empty() {
        return Err(GenerationError::EmptyUpload);
    }
    if detect_audio_format(&audio).is_none() {
        return Err(GenerationError::UnsupportedUpload);
    }
    check_common(voice_id, &settings)?;

    let voice = VoiceChoice::resolve(synthesizer, voice_id).await;
    let request = ConversionRequest {
        audio,
        voice_id: voice.voice_id.clone(),
        model_id: model.as_str().to_string(),
        voice_settings: settings,
    };

    let converted = synthesizer.speech_to_speech(&request).await?;
    info!(
        source = %label.trim(),
        voice = %voice.voice_name,
        model = %model,
        bytes = converted.len(),
        "Converted voice"
    );

    Ok(GenerationRecord::new(
        GenerationKind::VoiceConversion,
        format!("Conversion to {}", voice.voice_name),
        &voice,
        model,
        converted,
    ))
}

fn check_common(voice_id: &str, settings: &VoiceSettings) -> Result<(), GenerationError> {
    if voice_id.trim().is_empty() {
        return Err(GenerationError::MissingVoice);
    }
    settings.validate().map_err(GenerationError::InvalidSettings)
}

/// First [`PREVIEW_CHARS`] characters of `text`, with `...` when truncated.
pub fn text_preview(text: &str) -> String {
    let mut chars = text.chars();
    let head: String = chars.by_ref().take(PREVIEW_CHARS).collect();
    if chars.next().is_some() {
        format!("{head}...")
    } else {
        head
    }
}

fn now_rfc3339() -> String {
    OffsetDateTime::now_utc()
        .format(&Rfc3339)
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_text_preview() {
        assert_eq!(text_preview("short"), "short");

        let exact = "a".repeat(PREVIEW_CHARS);
        assert_eq!(text_preview(&exact), exact);

        let long = "b".repeat(PREVIEW_CHARS + 1);
        assert_eq!(text_preview(&long), format!("{}...", "b".repeat(PREVIEW_CHARS)));

        // Multi-byte characters are counted as characters
        let accents = "é".repeat(60);
        assert_eq!(text_preview(&accents).chars().count(), PREVIEW_CHARS + 3);
    }

    #[test]
    fn test_kind_wire_names() {
        assert_eq!(
            serde_json::to_string(&GenerationKind::VoiceConversion).unwrap(),
            "\"voice_conversion\""
        );
        assert_eq!(GenerationKind::parse("TTS"), Some(GenerationKind::Tts));
        assert_eq!(GenerationKind::parse("other"), None);
    }

    #[test]
    fn test_error_messages() {
        assert_eq!(GenerationError::EmptyText.to_string(), EMPTY_TEXT_MESSAGE);
        assert_eq!(GenerationError::EmptyUpload.to_string(), EMPTY_UPLOAD_MESSAGE);
        assert_eq!(
            GenerationError::Tts(TTSError::MissingApiKey).to_string(),
            TTSError::MissingApiKey.to_string()
        );
    }
}
