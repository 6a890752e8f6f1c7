mod base;
pub mod elevenlabs;

pub use base::{
    BoxedSynthesizer, ConversionRequest, SpeechRequest, SpeechSynthesizer, TTSError, TTSResult,
    Voice,
};
pub use elevenlabs::{ElevenLabsClient, ElevenLabsConfig, ElevenLabsModel, VoiceSettings};

use std::sync::Arc;

use crate::config::ServerConfig;

/// Build the synthesis backend described by the server configuration.
///
/// A missing API key is not an error here: the server still starts and every
/// synthesis call reports [`TTSError::MissingApiKey`] instead.
pub fn create_synthesizer(config: &ServerConfig) -> BoxedSynthesizer {
    let client = ElevenLabsClient::new(ElevenLabsConfig::from(config));
    if !client.has_api_key() {
        tracing::warn!(
            "ELEVENLABS_API_KEY is not set; voice generation will fail until it is configured"
        );
    }
    Arc::new(client)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_create_synthesizer_without_key() {
        let config = ServerConfig::default();
        let synth = create_synthesizer(&config);
        assert_eq!(synth.provider_name(), "elevenlabs");
        assert_eq!(synth.list_voices().await, Err(TTSError::MissingApiKey));
    }
}
