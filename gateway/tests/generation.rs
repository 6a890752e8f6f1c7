//! Text-to-speech and voice conversion through the studio and the JSON API.

mod support;

use axum::{
    body::Body,
    http::{Request, StatusCode, header},
};
use base64::Engine;
use base64::engine::general_purpose::STANDARD as BASE64;
use serde_json::json;

use support::*;
use tasty_voice::core::tts::{TTSError, VoiceSettings};
use tasty_voice::routes::pages::MAX_UPLOAD_BYTES;

const RACHEL: &str = "21m00Tcm4TlvDq8ikWAM";

#[tokio::test]
async fn test_empty_text_rejected_before_any_call() {
    let mock = MockSynthesizer::new();
    let (app, _) = app_with(mock.clone());
    let token = api_login(&app, ADMIN_USERNAME, ADMIN_PASSWORD).await;

    for text in ["", "   ", "\n\t"] {
        let response = send(
            &app,
            json_request(
                "POST",
                "/api/speak",
                Some(&token),
                json!({ "text": text, "voice_id": RACHEL }),
            ),
        )
        .await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(
            body_json(response).await["error"],
            "Please enter some text to convert to speech."
        );
    }

    // Same through the studio form
    let cookie = page_login(&app, ADMIN_USERNAME, ADMIN_PASSWORD).await;
    let response = send(
        &app,
        form_request("/generate", Some(&cookie), &format!("text=&voice_id={RACHEL}")),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert!(
        body_text(response)
            .await
            .contains("Please enter some text to convert to speech.")
    );

    assert_eq!(mock.call_count(), 0);
}

#[tokio::test]
async fn test_speak_returns_mock_audio_and_forwards_params_unmodified() {
    let mock = MockSynthesizer::new();
    let (app, _) = app_with(mock.clone());
    let token = api_login(&app, ADMIN_USERNAME, ADMIN_PASSWORD).await;

    let response = send(
        &app,
        json_request(
            "POST",
            "/api/speak",
            Some(&token),
            json!({
                "text": "Hello from the studio",
                "voice_id": RACHEL,
                "model_id": "eleven_turbo_v2",
                "stability": 0.31,
                "similarity_boost": 0.87,
                "style": 0.4,
                "speed": 1.13
            }),
        ),
    )
    .await;

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(response.headers()[header::CONTENT_TYPE], "audio/mpeg");
    assert!(response.headers().contains_key("x-generation-id"));
    assert_eq!(body_bytes(response).await.as_ref(), MOCK_AUDIO);

    let calls = mock.calls();
    assert_eq!(calls.len(), 1);
    let RecordedCall::Speech(request) = &calls[0] else {
        panic!("expected a text-to-speech call, got {:?}", calls[0]);
    };
    assert_eq!(request.text, "Hello from the studio");
    assert_eq!(request.voice_id, RACHEL);
    assert_eq!(request.model_id, "eleven_turbo_v2");
    assert_eq!(
        request.voice_settings,
        VoiceSettings {
            stability: 0.31,
            similarity_boost: 0.87,
            style: 0.4,
            use_speaker_boost: true,
            speed: 1.13,
        }
    );
}

#[tokio::test]
async fn test_out_of_range_settings_rejected_not_clamped() {
    let mock = MockSynthesizer::new();
    let (app, _) = app_with(mock.clone());
    let token = api_login(&app, ADMIN_USERNAME, ADMIN_PASSWORD).await;

    let response = send(
        &app,
        json_request(
            "POST",
            "/api/speak",
            Some(&token),
            json!({ "text": "hi", "voice_id": RACHEL, "speed": 2.0 }),
        ),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert!(
        body_json(response).await["error"]
            .as_str()
            .unwrap()
            .contains("speed")
    );
    assert_eq!(mock.call_count(), 0);
}

#[tokio::test]
async fn test_unknown_model_rejected() {
    let mock = MockSynthesizer::new();
    let (app, _) = app_with(mock.clone());
    let token = api_login(&app, ADMIN_USERNAME, ADMIN_PASSWORD).await;

    let response = send(
        &app,
        json_request(
            "POST",
            "/api/speak",
            Some(&token),
            json!({ "text": "hi", "voice_id": RACHEL, "model_id": "eleven_v9" }),
        ),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(mock.call_count(), 0);
}

#[tokio::test]
async fn test_upstream_errors_map_to_status() {
    let mock = MockSynthesizer::failing(TTSError::ApiError {
        status: 401,
        body: "invalid_api_key".to_string(),
    });
    let (app, _) = app_with(mock.clone());
    let token = api_login(&app, ADMIN_USERNAME, ADMIN_PASSWORD).await;

    let response = send(
        &app,
        json_request(
            "POST",
            "/api/speak",
            Some(&token),
            json!({ "text": "hi", "voice_id": RACHEL }),
        ),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
    assert!(
        body_json(response).await["error"]
            .as_str()
            .unwrap()
            .contains("invalid_api_key")
    );

    let missing_key = MockSynthesizer::failing(TTSError::MissingApiKey);
    let (app, _) = app_with(missing_key);
    let token = api_login(&app, ADMIN_USERNAME, ADMIN_PASSWORD).await;
    let response = send(
        &app,
        json_request(
            "POST",
            "/api/speak",
            Some(&token),
            json!({ "text": "hi", "voice_id": RACHEL }),
        ),
    )
    .await;
    assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
}

#[tokio::test]
async fn test_studio_generate_shows_player_and_history() {
    let mock = MockSynthesizer::new();
    let (app, _) = app_with(mock.clone());
    let cookie = page_login(&app, ADMIN_USERNAME, ADMIN_PASSWORD).await;

    let response = send(
        &app,
        form_request(
            "/generate",
            Some(&cookie),
            &format!(
                "text=Good+morning&voice_id={RACHEL}&model_id=eleven_multilingual_v2\
                 &stability=0.5&similarity_boost=0.75&speed=1&style=0"
            ),
        ),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let page = body_text(response).await;
    assert!(page.contains("Audio generated successfully!"));
    assert!(page.contains("Good morning"));
    assert!(page.contains("/history/"));

    let RecordedCall::Speech(request) = &mock.calls()[0] else {
        panic!("expected a text-to-speech call");
    };
    assert_eq!(request.voice_settings, VoiceSettings::default());
}

#[tokio::test]
async fn test_studio_generate_blank_slider_uses_default() {
    let mock = MockSynthesizer::new();
    let (app, _) = app_with(mock.clone());
    let cookie = page_login(&app, ADMIN_USERNAME, ADMIN_PASSWORD).await;

    let response = send(
        &app,
        form_request(
            "/generate",
            Some(&cookie),
            &format!("text=Hello&voice_id={RACHEL}&stability=&speed=0.8"),
        ),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);

    let RecordedCall::Speech(request) = &mock.calls()[0] else {
        panic!("expected a text-to-speech call");
    };
    assert_eq!(request.voice_settings.stability, 0.5);
    assert_eq!(request.voice_settings.speed, 0.8);
}

#[tokio::test]
async fn test_studio_generate_malformed_slider_shows_inline_error() {
    let mock = MockSynthesizer::new();
    let (app, _) = app_with(mock.clone());
    let cookie = page_login(&app, ADMIN_USERNAME, ADMIN_PASSWORD).await;

    let response = send(
        &app,
        form_request(
            "/generate",
            Some(&cookie),
            &format!("text=Hello&voice_id={RACHEL}&stability=loud"),
        ),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let page = body_text(response).await;
    assert!(page.contains("stability must be a number"));
    assert!(page.contains("Hello"));
    assert_eq!(mock.call_count(), 0);
}

#[tokio::test]
async fn test_history_newest_first_capped_at_display_limit() {
    let (app, _) = app_with(MockSynthesizer::new());
    let token = api_login(&app, ADMIN_USERNAME, ADMIN_PASSWORD).await;

    for i in 0..5 {
        let response = send(
            &app,
            json_request(
                "POST",
                "/api/speak",
                Some(&token),
                json!({ "text": format!("line {i}"), "voice_id": RACHEL }),
            ),
        )
        .await;
        assert_eq!(response.status(), StatusCode::OK);
    }

    // test_config() shows 3 entries per list
    let history = body_json(send(&app, get_request("/api/history?kind=tts", Some(&token))).await).await;
    let texts: Vec<&str> = history["history"]
        .as_array()
        .unwrap()
        .iter()
        .map(|e| e["text"].as_str().unwrap())
        .collect();
    assert_eq!(texts, vec!["line 4", "line 3", "line 2"]);
    assert_eq!(history["history"][0]["voice_name"], "Rachel");
    assert_eq!(history["history"][0]["kind"], "tts");

    // History is per session
    let other = api_login(&app, ADMIN_USERNAME, ADMIN_PASSWORD).await;
    let history = body_json(send(&app, get_request("/api/history", Some(&other))).await).await;
    assert!(history["history"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn test_long_text_preview_truncated() {
    let (app, _) = app_with(MockSynthesizer::new());
    let token = api_login(&app, ADMIN_USERNAME, ADMIN_PASSWORD).await;
    let text = "x".repeat(80);

    send(
        &app,
        json_request(
            "POST",
            "/api/speak",
            Some(&token),
            json!({ "text": text, "voice_id": RACHEL }),
        ),
    )
    .await;

    let history = body_json(send(&app, get_request("/api/history", Some(&token))).await).await;
    assert_eq!(
        history["history"][0]["text"],
        format!("{}...", "x".repeat(50))
    );
}

#[tokio::test]
async fn test_history_audio_served_to_owner_only() {
    let (app, _) = app_with(MockSynthesizer::new());
    let token = api_login(&app, ADMIN_USERNAME, ADMIN_PASSWORD).await;

    let response = send(
        &app,
        json_request(
            "POST",
            "/api/speak",
            Some(&token),
            json!({ "text": "keep me", "voice_id": RACHEL }),
        ),
    )
    .await;
    let id = response.headers()["x-generation-id"]
        .to_str()
        .unwrap()
        .to_string();

    let uri = format!("/history/{id}/audio?download=1");
    let response = send(&app, get_request(&uri, Some(&token))).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert!(
        response.headers()[header::CONTENT_DISPOSITION]
            .to_str()
            .unwrap()
            .starts_with("attachment;")
    );
    assert_eq!(body_bytes(response).await.as_ref(), MOCK_AUDIO);

    let other = api_login(&app, ADMIN_USERNAME, ADMIN_PASSWORD).await;
    let response = send(&app, get_request(&uri, Some(&other))).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_api_convert_base64_upload() {
    let mock = MockSynthesizer::new();
    let (app, _) = app_with(mock.clone());
    let token = api_login(&app, ADMIN_USERNAME, ADMIN_PASSWORD).await;

    let response = send(
        &app,
        json_request(
            "POST",
            "/api/convert",
            Some(&token),
            json!({
                "audio": BASE64.encode(UPLOAD_AUDIO),
                "file_name": "memo.mp3",
                "voice_id": RACHEL,
                "stability": 0.2
            }),
        ),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_bytes(response).await.as_ref(), MOCK_AUDIO);

    let RecordedCall::Conversion(request) = &mock.calls()[0] else {
        panic!("expected a speech-to-speech call");
    };
    assert_eq!(request.audio.as_ref(), UPLOAD_AUDIO);
    assert_eq!(request.voice_settings.stability, 0.2);

    let history = body_json(
        send(&app, get_request("/api/history?kind=voice_conversion", Some(&token))).await,
    )
    .await;
    assert_eq!(history["history"][0]["text"], "Conversion to Rachel");
}

#[tokio::test]
async fn test_api_convert_accepts_uploads_past_the_default_body_limit() {
    let mock = MockSynthesizer::new();
    let (app, _) = app_with(mock.clone());
    let token = api_login(&app, ADMIN_USERNAME, ADMIN_PASSWORD).await;

    let mut recording = UPLOAD_AUDIO.to_vec();
    recording.resize(4 * 1024 * 1024, 0);

    let response = send(
        &app,
        json_request(
            "POST",
            "/api/convert",
            Some(&token),
            json!({ "audio": BASE64.encode(&recording), "voice_id": RACHEL }),
        ),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);

    let RecordedCall::Conversion(request) = &mock.calls()[0] else {
        panic!("expected a speech-to-speech call");
    };
    assert_eq!(request.audio.len(), recording.len());
}

#[tokio::test]
async fn test_api_convert_rejects_bodies_over_the_upload_limit() {
    let mock = MockSynthesizer::new();
    let (app, _) = app_with(mock.clone());
    let token = api_login(&app, ADMIN_USERNAME, ADMIN_PASSWORD).await;

    let mut recording = UPLOAD_AUDIO.to_vec();
    recording.resize(MAX_UPLOAD_BYTES + 1024 * 1024, 0);

    let response = send(
        &app,
        json_request(
            "POST",
            "/api/convert",
            Some(&token),
            json!({ "audio": BASE64.encode(&recording), "voice_id": RACHEL }),
        ),
    )
    .await;
    assert_eq!(response.status(), StatusCode::PAYLOAD_TOO_LARGE);
    assert_eq!(mock.call_count(), 0);
}

#[tokio::test]
async fn test_api_convert_rejects_empty_and_unsupported_uploads() {
    let mock = MockSynthesizer::new();
    let (app, _) = app_with(mock.clone());
    let token = api_login(&app, ADMIN_USERNAME, ADMIN_PASSWORD).await;

    let response = send(
        &app,
        json_request(
            "POST",
            "/api/convert",
            Some(&token),
            json!({ "audio": "", "voice_id": RACHEL }),
        ),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(
        body_json(response).await["error"],
        "Please upload an audio file to convert."
    );

    let response = send(
        &app,
        json_request(
            "POST",
            "/api/convert",
            Some(&token),
            json!({ "audio": BASE64.encode(b"OggS not accepted"), "voice_id": RACHEL }),
        ),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    assert_eq!(mock.call_count(), 0);
}

fn multipart_body(boundary: &str, audio: &[u8]) -> Vec<u8> {
    let mut body = Vec::new();
    body.extend_from_slice(
        format!(
            "--{boundary}\r\nContent-Disposition: form-data; name=\"audio\"; filename=\"clip.mp3\"\r\n\
             Content-Type: audio/mpeg\r\n\r\n"
        )
        .as_bytes(),
    );
    body.extend_from_slice(audio);
    body.extend_from_slice(b"\r\n");
    for (name, value) in [("voice_id", RACHEL), ("model_id", "eleven_multilingual_v1"), ("speed", "0.9")] {
        body.extend_from_slice(
            format!(
                "--{boundary}\r\nContent-Disposition: form-data; name=\"{name}\"\r\n\r\n{value}\r\n"
            )
            .as_bytes(),
        );
    }
    body.extend_from_slice(format!("--{boundary}--\r\n").as_bytes());
    body
}

fn convert_request(cookie: &str, audio: &[u8]) -> Request<Body> {
    let boundary = "tasty-voice-boundary";
    Request::builder()
        .method("POST")
        .uri("/convert")
        .header(header::COOKIE, cookie)
        .header(
            header::CONTENT_TYPE,
            format!("multipart/form-data; boundary={boundary}"),
        )
        .body(Body::from(multipart_body(boundary, audio)))
        .unwrap()
}

#[tokio::test]
async fn test_studio_convert_multipart() {
    let mock = MockSynthesizer::new();
    let (app, _) = app_with(mock.clone());
    let cookie = page_login(&app, ADMIN_USERNAME, ADMIN_PASSWORD).await;

    let response = send(&app, convert_request(&cookie, UPLOAD_AUDIO)).await;
    assert_eq!(response.status(), StatusCode::OK);
    let page = body_text(response).await;
    assert!(page.contains("Voice converted successfully!"));
    assert!(page.contains("Conversion to Rachel"));

    let RecordedCall::Conversion(request) = &mock.calls()[0] else {
        panic!("expected a speech-to-speech call");
    };
    assert_eq!(request.model_id, "eleven_multilingual_v1");
    assert_eq!(request.voice_settings.speed, 0.9);
}

#[tokio::test]
async fn test_studio_convert_empty_upload() {
    let mock = MockSynthesizer::new();
    let (app, _) = app_with(mock.clone());
    let cookie = page_login(&app, ADMIN_USERNAME, ADMIN_PASSWORD).await;

    let response = send(&app, convert_request(&cookie, b"")).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert!(
        body_text(response)
            .await
            .contains("Please upload an audio file to convert.")
    );
    assert_eq!(mock.call_count(), 0);
}
