//! Provider-agnostic text-to-speech types.
//!
//! The gateway talks to exactly one synthesis backend at a time through the
//! [`SpeechSynthesizer`] trait. The production implementation is
//! [`ElevenLabsClient`](super::elevenlabs::ElevenLabsClient); tests inject a
//! recording mock instead.

use std::sync::Arc;

use async_trait::async_trait;
use bytes::Bytes;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::elevenlabs::VoiceSettings;

/// Result type for TTS operations
pub type TTSResult<T> = Result<T, TTSError>;

/// Errors returned by a synthesis backend
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TTSError {
    /// No API key is configured for the backend
    #[error(
        "API key not found. Please set the ELEVENLABS_API_KEY in your environment variables or .env file."
    )]
    MissingApiKey,

    /// The request was rejected before being sent
    #[error("Invalid configuration: {0}")]
    InvalidConfiguration(String),

    /// The HTTP request could not be completed
    #[error("Request failed: {0}")]
    RequestFailed(String),

    /// The backend answered with a non-success status
    #[error("API error ({status}): {body}")]
    ApiError { status: u16, body: String },

    /// The backend answered with something we could not use
    #[error("Invalid response: {0}")]
    InvalidResponse(String),
}

/// A synthetic voice offered by the backend.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Voice {
    pub voice_id: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub preview_url: Option<String>,
}

/// A single text-to-speech call.
#[derive(Debug, Clone, PartialEq)]
pub struct SpeechRequest {
    pub text: String,
    pub voice_id: String,
    pub model_id: String,
    pub voice_settings: VoiceSettings,
}

/// A single speech-to-speech (voice conversion) call.
#[derive(Debug, Clone, PartialEq)]
pub struct ConversionRequest {
    pub audio: Bytes,
    pub voice_id: String,
    pub model_id: String,
    pub voice_settings: VoiceSettings,
}

/// Backend capable of listing voices and producing audio.
///
/// Implementations forward parameters unmodified; range checking happens
/// before a request is built.
#[async_trait]
pub trait SpeechSynthesizer: Send + Sync {
    /// Short provider name used in logs.
    fn provider_name(&self) -> &'static str;

    /// List the voices available to the configured account.
    async fn list_voices(&self) -> TTSResult<Vec<Voice>>;

    /// Synthesize `request.text` and return the encoded audio (MP3).
    async fn text_to_speech(&self, request: &SpeechRequest) -> TTSResult<Bytes>;

    /// Re-voice an uploaded recording and return the encoded audio (MP3).
    async fn speech_to_speech(&self, request: &ConversionRequest) -> TTSResult<Bytes>;
}

/// Shared handle to the active backend.
pub type BoxedSynthesizer = Arc<dyn SpeechSynthesizer>;
