//! ElevenLabs wire messages.

use serde::{Deserialize, Serialize};

use super::config::VoiceSettings;
use crate::core::tts::base::Voice;

/// Body of `POST /v1/text-to-speech/{voice_id}`.
#[derive(Debug, Clone, Serialize)]
pub struct TextToSpeechBody<'a> {
    pub text: &'a str,
    pub model_id: &'a str,
    pub voice_settings: VoiceSettings,
}

/// Response of `GET /v1/voices`.
#[derive(Debug, Clone, Deserialize)]
pub struct VoicesResponse {
    #[serde(default)]
    pub voices: Vec<Voice>,
}
