//! ElevenLabs TTS provider implementation.
//!
//! Thin HTTP client for the ElevenLabs REST API covering the three calls the
//! studio makes: voice listing, text-to-speech and speech-to-speech.
//!
//! # API Reference
//!
//! - Voice List: `GET {base}/v1/voices`
//! - Text to Speech: `POST {base}/v1/text-to-speech/{voice_id}`
//! - Speech to Speech: `POST {base}/v1/speech-to-speech/{voice_id}`
//!
//! # Authentication
//!
//! ElevenLabs uses API key authentication via the `xi-api-key` header.

pub mod client;
pub mod config;
pub mod messages;

pub use client::ElevenLabsClient;
pub use config::{ElevenLabsConfig, ElevenLabsModel, VoiceSettings};

// =============================================================================
// API Constants
// =============================================================================

/// Voice listing path.
pub const VOICES_PATH: &str = "/v1/voices";

/// Text-to-speech path prefix; the voice id is appended.
pub const TEXT_TO_SPEECH_PATH: &str = "/v1/text-to-speech";

/// Speech-to-speech path prefix; the voice id is appended.
pub const SPEECH_TO_SPEECH_PATH: &str = "/v1/speech-to-speech";

/// Header carrying the API key.
pub const API_KEY_HEADER: &str = "xi-api-key";

// =============================================================================
// Limits and Defaults
// =============================================================================

pub const DEFAULT_STABILITY: f64 = 0.5;
pub const DEFAULT_SIMILARITY_BOOST: f64 = 0.75;
pub const DEFAULT_STYLE: f64 = 0.0;
pub const DEFAULT_SPEED: f64 = 1.0;

pub const MIN_UNIT: f64 = 0.0;
pub const MAX_UNIT: f64 = 1.0;
pub const MIN_SPEED: f64 = 0.7;
pub const MAX_SPEED: f64 = 1.2;
