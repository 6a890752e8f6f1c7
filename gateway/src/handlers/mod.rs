//! HTTP request handlers
//!
//! This module organizes all handlers into logical groups:
//! - `api` - Health check endpoint
//! - `session` - Login and logout (pages and JSON API)
//! - `studio` - Studio page, form submissions and history audio
//! - `speak` - Text-to-speech, voice conversion and history JSON API
//! - `voices` - Voice and model listing
//! - `users` - User management (admin only)

pub mod api;
pub mod session;
pub mod speak;
pub mod studio;
pub mod users;
pub mod voices;

use serde::Deserialize;

use crate::core::tts::{ElevenLabsModel, VoiceSettings};
use crate::errors::AppError;

/// Model and voice settings supplied with a generation request.
///
/// Missing values take the studio defaults. Speaker boost is always on.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct VoiceParams {
    pub model_id: Option<String>,
    pub stability: Option<f64>,
    pub similarity_boost: Option<f64>,
    pub style: Option<f64>,
    pub speed: Option<f64>,
}

impl VoiceParams {
    pub fn model(&self) -> Result<ElevenLabsModel, AppError> {
        match self.model_id.as_deref().map(str::trim) {
            None | Some("") => Ok(ElevenLabsModel::default()),
            Some(id) => ElevenLabsModel::parse(id)
                .ok_or_else(|| AppError::Validation(format!("Unknown model '{id}'"))),
        }
    }

    /// Settings exactly as supplied; range checks happen at generation time.
    pub fn settings(&self) -> VoiceSettings {
        let defaults = VoiceSettings::default();
        VoiceSettings {
            stability: self.stability.unwrap_or(defaults.stability),
            similarity_boost: self.similarity_boost.unwrap_or(defaults.similarity_boost),
            style: self.style.unwrap_or(defaults.style),
            use_speaker_boost: true,
            speed: self.speed.unwrap_or(defaults.speed),
        }
    }
}
