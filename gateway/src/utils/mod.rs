//! Small helpers shared by handlers and views.

use axum::http::{HeaderMap, header};

/// Cookie carrying the session token for browser requests.
pub const SESSION_COOKIE: &str = "tv_session";

// =============================================================================
// Audio
// =============================================================================

/// Audio containers accepted by the voice changer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AudioFormat {
    Mp3,
    Wav,
    M4a,
}

/// Detect an accepted audio container from its leading bytes.
pub fn detect_audio_format(data: &[u8]) -> Option<AudioFormat> {
    if data.starts_with(b"ID3") || (data.len() >= 2 && data[0] == 0xFF && (data[1] & 0xE0) == 0xE0)
    {
        return Some(AudioFormat::Mp3);
    }
    if data.len() >= 12 && data.starts_with(b"RIFF") && &data[8..12] == b"WAVE" {
        return Some(AudioFormat::Wav);
    }
    if data.len() >= 8 && &data[4..8] == b"ftyp" {
        return Some(AudioFormat::M4a);
    }
    None
}

// =============================================================================
// Cookies
// =============================================================================

/// Find a cookie value in the request headers.
pub fn cookie_value<'a>(headers: &'a HeaderMap, name: &str) -> Option<&'a str> {
    headers
        .get_all(header::COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(|value| value.split(';'))
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(key, _)| *key == name)
        .map(|(_, value)| value.trim())
        .filter(|value| !value.is_empty())
}

/// `Set-Cookie` value that stores the session token.
pub fn session_cookie(token: &str, secure: bool) -> String {
    let mut cookie = format!("{SESSION_COOKIE}={token}; Path=/; HttpOnly; SameSite=Lax");
    if secure {
        cookie.push_str("; Secure");
    }
    cookie
}

/// `Set-Cookie` value that clears the session token.
pub fn clear_session_cookie() -> String {
    format!("{SESSION_COOKIE}=; Path=/; HttpOnly; SameSite=Lax; Max-Age=0")
}
