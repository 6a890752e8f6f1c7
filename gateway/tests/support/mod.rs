//! Shared test infrastructure
//!
//! - `MockSynthesizer`: records every synthesis call and returns fixed audio
//! - helpers to build the app, log in and read response bodies

// Not every test binary uses every helper
#![allow(dead_code)]

use std::sync::Arc;

use async_trait::async_trait;
use axum::{
    Router,
    body::{Body, to_bytes},
    http::{Request, Response, StatusCode, header},
};
use bytes::Bytes;
use parking_lot::Mutex;
use serde_json::{Value, json};
use tower::util::ServiceExt;

use tasty_voice::{
    AppState, ServerConfig, create_app_router,
    core::tts::{
        ConversionRequest, SpeechRequest, SpeechSynthesizer, TTSError, TTSResult, Voice,
    },
};

pub const ADMIN_USERNAME: &str = "admin";
pub const ADMIN_PASSWORD: &str = "test-admin-pass";
pub const MOCK_AUDIO: &[u8] = b"ID3\x04\x00mock-mp3-audio";
/// Minimal bytes that pass the mp3 upload check
pub const UPLOAD_AUDIO: &[u8] = b"ID3\x03\x00uploaded-recording";

#[derive(Debug, Clone, PartialEq)]
pub enum RecordedCall {
    Speech(SpeechRequest),
    Conversion(ConversionRequest),
}

/// Synthesizer double: never touches the network.
pub struct MockSynthesizer {
    voices: Vec<Voice>,
    audio: Bytes,
    failure: Option<TTSError>,
    calls: Mutex<Vec<RecordedCall>>,
}

impl MockSynthesizer {
    pub fn new() -> Arc<Self> {
        Arc::new(Self {
            voices: default_voices(),
            audio: Bytes::from_static(MOCK_AUDIO),
            failure: None,
            calls: Mutex::new(Vec::new()),
        })
    }

    /// Mock whose synthesis calls all fail with `error`.
    pub fn failing(error: TTSError) -> Arc<Self> {
        Arc::new(Self {
            voices: default_voices(),
            audio: Bytes::new(),
            failure: Some(error),
            calls: Mutex::new(Vec::new()),
        })
    }

    pub fn calls(&self) -> Vec<RecordedCall> {
        self.calls.lock().clone()
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().len()
    }

    fn respond(&self, call: RecordedCall) -> TTSResult<Bytes> {
        self.calls.lock().push(call);
        match &self.failure {
            Some(e) => Err(e.clone()),
            None => Ok(self.audio.clone()),
        }
    }
}

#[async_trait]
impl SpeechSynthesizer for MockSynthesizer {
    fn provider_name(&self) -> &'static str {
        "mock"
    }

    async fn list_voices(&self) -> TTSResult<Vec<Voice>> {
        Ok(self.voices.clone())
    }

    async fn text_to_speech(&self, request: &SpeechRequest) -> TTSResult<Bytes> {
        self.respond(RecordedCall::Speech(request.clone()))
    }

    async fn speech_to_speech(&self, request: &ConversionRequest) -> TTSResult<Bytes> {
        self.respond(RecordedCall::Conversion(request.clone()))
    }
}

pub fn default_voices() -> Vec<Voice> {
    vec![
        Voice {
            voice_id: "21m00Tcm4TlvDq8ikWAM".to_string(),
            name: "Rachel".to_string(),
            category: Some("premade".to_string()),
            preview_url: None,
        },
        Voice {
            voice_id: "pNInz6obpgDQGcFmaJgB".to_string(),
            name: "Adam".to_string(),
            category: Some("premade".to_string()),
            preview_url: None,
        },
    ]
}

pub fn test_config() -> ServerConfig {
    let mut config = ServerConfig::default();
    config.host = "127.0.0.1".to_string();
    config.elevenlabs_api_key = Some("test-key".to_string());
    config.admin_username = ADMIN_USERNAME.to_string();
    config.admin_password = ADMIN_PASSWORD.to_string();
    config.history_display_limit = 3;
    config
}

/// Build the full router around `mock`.
pub fn app_with(mock: Arc<MockSynthesizer>) -> (Router, Arc<AppState>) {
    let state = AppState::with_synthesizer(test_config(), mock);
    (create_app_router(state.clone()), state)
}

pub async fn send(app: &Router, request: Request<Body>) -> Response<Body> {
    app.clone().oneshot(request).await.unwrap()
}

pub async fn body_bytes(response: Response<Body>) -> Bytes {
    to_bytes(response.into_body(), usize::MAX).await.unwrap()
}

pub async fn body_json(response: Response<Body>) -> Value {
    serde_json::from_slice(&body_bytes(response).await).unwrap()
}

pub async fn body_text(response: Response<Body>) -> String {
    String::from_utf8(body_bytes(response).await.to_vec()).unwrap()
}

pub fn json_request(method: &str, uri: &str, token: Option<&str>, body: Value) -> Request<Body> {
    let mut builder = Request::builder()
        .method(method)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json");
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
    }
    builder.body(Body::from(body.to_string())).unwrap()
}

pub fn get_request(uri: &str, token: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder().method("GET").uri(uri);
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
    }
    builder.body(Body::empty()).unwrap()
}

pub fn form_request(uri: &str, cookie: Option<&str>, form: &str) -> Request<Body> {
    let mut builder = Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded");
    if let Some(cookie) = cookie {
        builder = builder.header(header::COOKIE, cookie);
    }
    builder.body(Body::from(form.to_string())).unwrap()
}

pub fn page_request(uri: &str, cookie: &str) -> Request<Body> {
    Request::builder()
        .method("GET")
        .uri(uri)
        .header(header::COOKIE, cookie)
        .body(Body::empty())
        .unwrap()
}

/// Log in through the JSON API and return the bearer token.
pub async fn api_login(app: &Router, username: &str, password: &str) -> String {
    let response = send(
        app,
        json_request(
            "POST",
            "/api/login",
            None,
            json!({ "username": username, "password": password }),
        ),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK, "login as {username} failed");
    body_json(response).await["token"]
        .as_str()
        .unwrap()
        .to_string()
}

/// Log in through the login form and return the `Cookie` header value.
pub async fn page_login(app: &Router, username: &str, password: &str) -> String {
    let response = send(
        app,
        form_request(
            "/login",
            None,
            &format!("username={username}&password={password}"),
        ),
    )
    .await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);

    let set_cookie = response
        .headers()
        .get(header::SET_COOKIE)
        .unwrap()
        .to_str()
        .unwrap();
    set_cookie.split(';').next().unwrap().to_string()
}
