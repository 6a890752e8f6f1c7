//! ElevenLabs configuration types.
//!
//! Model selection, voice settings and client settings.

use serde::{Deserialize, Serialize};

use super::{
    DEFAULT_SIMILARITY_BOOST, DEFAULT_SPEED, DEFAULT_STABILITY, DEFAULT_STYLE, MAX_SPEED, MAX_UNIT,
    MIN_SPEED, MIN_UNIT,
};
use crate::config::{DEFAULT_ELEVENLABS_BASE_URL, ServerConfig};

// =============================================================================
// Models
// =============================================================================

/// Synthesis models offered in the studio.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum ElevenLabsModel {
    /// Enhanced multilingual model
    #[default]
    #[serde(rename = "eleven_multilingual_v2")]
    MultilingualV2,
    /// English-only model
    #[serde(rename = "eleven_monolingual_v1")]
    MonolingualV1,
    /// First multilingual model
    #[serde(rename = "eleven_multilingual_v1")]
    MultilingualV1,
    /// Low-latency model
    #[serde(rename = "eleven_turbo_v2")]
    TurboV2,
}

impl ElevenLabsModel {
    /// Convert to the API `model_id` value.
    #[inline]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::MultilingualV2 => "eleven_multilingual_v2",
            Self::MonolingualV1 => "eleven_monolingual_v1",
            Self::MultilingualV1 => "eleven_multilingual_v1",
            Self::TurboV2 => "eleven_turbo_v2",
        }
    }

    /// Human-readable label shown in the model picker.
    pub fn label(&self) -> &'static str {
        match self {
            Self::MultilingualV2 => "Multilingual v2 (Enhanced)",
            Self::MonolingualV1 => "Monolingual v1 (English only)",
            Self::MultilingualV1 => "Multilingual v1 (Multiple languages)",
            Self::TurboV2 => "Turbo (Faster generation)",
        }
    }

    /// All models in picker order.
    pub fn all() -> &'static [ElevenLabsModel] {
        &[
            Self::MultilingualV2,
            Self::MonolingualV1,
            Self::MultilingualV1,
            Self::TurboV2,
        ]
    }

    /// Parse an API `model_id`. Unknown ids are rejected rather than defaulted
    /// so a typo never silently switches models.
    pub fn parse(s: &str) -> Option<Self> {
        Self::all()
            .iter()
            .copied()
            .find(|m| m.as_str().eq_ignore_ascii_case(s.trim()))
    }
}

impl std::fmt::Display for ElevenLabsModel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

// =============================================================================
// Voice Settings
// =============================================================================

/// Voice-shaping parameters sent with every synthesis request.
///
/// - **Stability** (0.0-1.0): higher is more consistent, lower more expressive
/// - **Similarity Boost** (0.0-1.0): closeness to the original voice
/// - **Style** (0.0-1.0): style exaggeration; 0.0 is fastest
/// - **Speed** (0.7-1.2): speaking pace, 1.0 is normal
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct VoiceSettings {
    pub stability: f64,
    pub similarity_boost: f64,
    pub style: f64,
    pub use_speaker_boost: bool,
    pub speed: f64,
}

impl Default for VoiceSettings {
    fn default() -> Self {
        Self {
            stability: DEFAULT_STABILITY,
            similarity_boost: DEFAULT_SIMILARITY_BOOST,
            style: DEFAULT_STYLE,
            use_speaker_boost: true,
            speed: DEFAULT_SPEED,
        }
    }
}

impl VoiceSettings {
    /// Check every value against its slider range.
    ///
    /// Values are never clamped: they are either forwarded exactly as given or
    /// the request is refused.
    pub fn validate(&self) -> Result<(), String> {
        check_range("stability", self.stability, MIN_UNIT, MAX_UNIT)?;
        check_range("similarity_boost", self.similarity_boost, MIN_UNIT, MAX_UNIT)?;
        check_range("style", self.style, MIN_UNIT, MAX_UNIT)?;
        check_range("speed", self.speed, MIN_SPEED, MAX_SPEED)?;
        Ok(())
    }
}

fn check_range(name: &str, value: f64, min: f64, max: f64) -> Result<(), String> {
    if !value.is_finite() || value < min || value > max {
        return Err(format!(
            "{name} must be between {min} and {max}, got {value}"
        ));
    }
    Ok(())
}

// =============================================================================
// Client Configuration
// =============================================================================

/// Settings for [`ElevenLabsClient`](super::ElevenLabsClient).
#[derive(Debug, Clone)]
pub struct ElevenLabsConfig {
    pub api_key: Option<String>,
    pub base_url: String,
    pub voice_cache_ttl_seconds: u64,
}

impl Default for ElevenLabsConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: DEFAULT_ELEVENLABS_BASE_URL.to_string(),
            voice_cache_ttl_seconds: 3600,
        }
    }
}

impl From<&ServerConfig> for ElevenLabsConfig {
    fn from(config: &ServerConfig) -> Self {
        Self {
            api_key: config.elevenlabs_api_key.clone(),
            base_url: config.elevenlabs_base_url.clone(),
            voice_cache_ttl_seconds: config.voice_cache_ttl_seconds,
        }
    }
}

impl Drop for ElevenLabsConfig {
    fn drop(&mut self) {
        use zeroize::Zeroize;

        if let Some(ref mut key) = self.api_key {
            key.zeroize();
        }
    }
}
