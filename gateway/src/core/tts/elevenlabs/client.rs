//! ElevenLabs HTTP client.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use bytes::Bytes;
use moka::future::Cache;
use reqwest::multipart::{Form, Part};
use tracing::{debug, info, warn};

use super::config::ElevenLabsConfig;
use super::messages::{TextToSpeechBody, VoicesResponse};
use super::{API_KEY_HEADER, SPEECH_TO_SPEECH_PATH, TEXT_TO_SPEECH_PATH, VOICES_PATH};
use crate::core::tts::base::{
    ConversionRequest, SpeechRequest, SpeechSynthesizer, TTSError, TTSResult, Voice,
};

const VOICE_CACHE_KEY: &str = "voices";

/// ElevenLabs implementation of [`SpeechSynthesizer`].
///
/// The voice list is cached for the configured TTL; synthesis calls are
/// never cached or retried.
pub struct ElevenLabsClient {
    client: reqwest::Client,
    config: ElevenLabsConfig,
    voice_cache: Cache<String, Arc<Vec<Voice>>>,
}

impl ElevenLabsClient {
    pub fn new(config: ElevenLabsConfig) -> Self {
        let voice_cache = Cache::builder()
            .max_capacity(1)
            .time_to_live(Duration::from_secs(config.voice_cache_ttl_seconds))
            .build();

        Self {
            client: reqwest::Client::new(),
            config,
            voice_cache,
        }
    }

    /// Whether an API key is configured.
    pub fn has_api_key(&self) -> bool {
        self.config.api_key.is_some()
    }

    fn api_key(&self) -> TTSResult<&str> {
        self.config
            .api_key
            .as_deref()
            .ok_or(TTSError::MissingApiKey)
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.config.base_url.trim_end_matches('/'), path)
    }

    fn voice_url(&self, prefix: &str, voice_id: &str) -> TTSResult<String> {
        let voice_id = voice_id.trim();
        if voice_id.is_empty() || voice_id.contains('/') {
            return Err(TTSError::InvalidConfiguration(format!(
                "Invalid voice id: '{voice_id}'"
            )));
        }
        Ok(format!("{}/{}", self.url(prefix), voice_id))
    }

    async fn fetch_voices(&self) -> TTSResult<Vec<Voice>> {
        let api_key = self.api_key()?;

        let response = self
            .client
            .get(self.url(VOICES_PATH))
            .header("Accept", "application/json")
            .header(API_KEY_HEADER, api_key)
            .send()
            .await
            .map_err(|e| TTSError::RequestFailed(format!("Error fetching voices: {e}")))?;

        let response = check_status(response).await?;

        let parsed: VoicesResponse = response
            .json()
            .await
            .map_err(|e| TTSError::InvalidResponse(format!("Failed to parse voices: {e}")))?;

        Ok(parsed.voices)
    }
}

/// Turn a non-success response into [`TTSError::ApiError`], keeping the body
/// so the caller can show what the API said.
async fn check_status(response: reqwest::Response) -> TTSResult<reqwest::Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let body = response.text().await.unwrap_or_default();
    warn!(status = status.as_u16(), body = %body, "ElevenLabs API returned an error");
    Err(TTSError::ApiError {
        status: status.as_u16(),
        body,
    })
}

async fn read_audio(response: reqwest::Response) -> TTSResult<Bytes> {
    let audio = response
        .bytes()
        .await
        .map_err(|e| TTSError::RequestFailed(format!("Failed to read audio: {e}")))?;

    if audio.is_empty() {
        return Err(TTSError::InvalidResponse(
            "ElevenLabs returned no audio".to_string(),
        ));
    }
    Ok(audio)
}

#[async_trait]
impl SpeechSynthesizer for ElevenLabsClient {
    fn provider_name(&self) -> &'static str {
        "elevenlabs"
    }

    async fn list_voices(&self) -> TTSResult<Vec<Voice>> {
        if let Some(cached) = self.voice_cache.get(VOICE_CACHE_KEY).await {
            debug!(count = cached.len(), "Serving voice list from cache");
            return Ok(cached.as_ref().clone());
        }

        let voices = self.fetch_voices().await?;
        info!(count = voices.len(), "Fetched voice list from ElevenLabs");

        // Empty lists are not cached so a fixed key takes effect immediately.
        if !voices.is_empty() {
            self.voice_cache
                .insert(VOICE_CACHE_KEY.to_string(), Arc::new(voices.clone()))
                .await;
        }
        Ok(voices)
    }

    async fn text_to_speech(&self, request: &SpeechRequest) -> TTSResult<Bytes> {
        let api_key = self.api_key()?;
        let url = self.voice_url(TEXT_TO_SPEECH_PATH, &request.voice_id)?;

        let body = TextToSpeechBody {
            text: &request.text,
            model_id: &request.model_id,
            voice_settings: request.voice_settings,
        };

        debug!(
            voice_id = %request.voice_id,
            model_id = %request.model_id,
            chars = request.text.chars().count(),
            "Sending text-to-speech request"
        );

        let response = self
            .client
            .post(url)
            .header("Accept", "audio/mpeg")
            .header("Content-Type", "application/json")
            .header(API_KEY_HEADER, api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| TTSError::RequestFailed(format!("Error generating voice: {e}")))?;

        let response = check_status(response).await?;
        read_audio(response).await
    }

    async fn speech_to_speech(&self, request: &ConversionRequest) -> TTSResult<Bytes> {
        let api_key = self.api_key()?;
        let url = self.voice_url(SPEECH_TO_SPEECH_PATH, &request.voice_id)?;

        let settings_json = serde_json::to_string(&request.voice_settings)
            .map_err(|e| TTSError::InvalidConfiguration(e.to_string()))?;

        let audio_part = Part::bytes(request.audio.to_vec())
            .file_name("input.mp3")
            .mime_str("audio/mpeg")
            .map_err(|e| TTSError::InvalidConfiguration(format!("Failed to set MIME type: {e}")))?;

        let form = Form::new()
            .part("audio", audio_part)
            .text("model_id", request.model_id.clone())
            .text("voice_settings", settings_json);

        debug!(
            voice_id = %request.voice_id,
            model_id = %request.model_id,
            bytes = request.audio.len(),
            "Sending speech-to-speech request"
        );

        let response = self
            .client
            .post(url)
            .header("Accept", "audio/mpeg")
            .header(API_KEY_HEADER, api_key)
            .multipart(form)
            .send()
            .await
            .map_err(|e| TTSError::RequestFailed(format!("Error converting voice: {e}")))?;

        let response = check_status(response).await?;
        read_audio(response).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::tts::elevenlabs::VoiceSettings;

    #[tokio::test]
    async fn test_missing_api_key_short_circuits() {
        let client = ElevenLabsClient::new(ElevenLabsConfig::default());
        assert!(!client.has_api_key());

        let request = SpeechRequest {
            text: "hello".to_string(),
            voice_id: "voice".to_string(),
            model_id: "eleven_multilingual_v2".to_string(),
            voice_settings: VoiceSettings::default(),
        };

        assert_eq!(
            client.text_to_speech(&request).await,
            Err(TTSError::MissingApiKey)
        );
        assert_eq!(client.list_voices().await, Err(TTSError::MissingApiKey));
    }

    #[test]
    fn test_url_building() {
        let client = ElevenLabsClient::new(ElevenLabsConfig {
            api_key: Some("k".to_string()),
            base_url: "http://localhost:1234/".to_string(),
            voice_cache_ttl_seconds: 60,
        });

        assert_eq!(client.url(VOICES_PATH), "http://localhost:1234/v1/voices");
        assert_eq!(
            client.voice_url(TEXT_TO_SPEECH_PATH, "abc").unwrap(),
            "http://localhost:1234/v1/text-to-speech/abc"
        );
        assert!(client.voice_url(TEXT_TO_SPEECH_PATH, "../x/y").is_err());
        assert!(client.voice_url(TEXT_TO_SPEECH_PATH, "  ").is_err());
    }
}
