//! Environment variable loading.

use std::path::PathBuf;
use std::str::FromStr;

use super::{
    ConfigError, DEFAULT_ADMIN_PASSWORD, DEFAULT_ADMIN_USERNAME, DEFAULT_ELEVENLABS_BASE_URL,
    ServerConfig, TlsConfig,
};

/// Read an environment variable, treating empty values as unset.
pub(super) fn env_var(name: &str) -> Option<String> {
    std::env::var(name)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// Parse an environment variable, falling back to `default` when unset.
pub(super) fn parse_env<T: FromStr>(name: &str, default: T) -> Result<T, ConfigError> {
    match env_var(name) {
        Some(raw) => raw.parse().map_err(|_| ConfigError::InvalidValue {
            name: name.to_string(),
            value: raw,
        }),
        None => Ok(default),
    }
}

/// Build a configuration from environment variables and defaults.
pub(super) fn load_from_env() -> Result<ServerConfig, ConfigError> {
    let defaults = ServerConfig::default();

    let tls = match (env_var("TLS_CERT_PATH"), env_var("TLS_KEY_PATH")) {
        (Some(cert), Some(key)) => Some(TlsConfig {
            cert_path: PathBuf::from(cert),
            key_path: PathBuf::from(key),
        }),
        (None, None) => None,
        _ => {
            return Err(ConfigError::Invalid(
                "TLS_CERT_PATH and TLS_KEY_PATH must be set together".to_string(),
            ));
        }
    };

    Ok(ServerConfig {
        host: env_var("HOST").unwrap_or_else(|| defaults.host.clone()),
        port: parse_env("PORT", defaults.port)?,
        tls,
        elevenlabs_api_key: env_var("ELEVENLABS_API_KEY"),
        elevenlabs_base_url: env_var("ELEVENLABS_BASE_URL")
            .unwrap_or_else(|| DEFAULT_ELEVENLABS_BASE_URL.to_string()),
        voice_cache_ttl_seconds: parse_env(
            "VOICE_CACHE_TTL_SECONDS",
            defaults.voice_cache_ttl_seconds,
        )?,
        admin_username: env_var("ADMIN_USERNAME")
            .unwrap_or_else(|| DEFAULT_ADMIN_USERNAME.to_string()),
        admin_password: env_var("ADMIN_PASSWORD")
            .unwrap_or_else(|| DEFAULT_ADMIN_PASSWORD.to_string()),
        session_idle_timeout_seconds: parse_env(
            "SESSION_IDLE_TIMEOUT_SECONDS",
            defaults.session_idle_timeout_seconds,
        )?,
        history_display_limit: parse_env("HISTORY_LIMIT", defaults.history_display_limit)?,
        max_history_per_session: parse_env(
            "MAX_HISTORY_PER_SESSION",
            defaults.max_history_per_session,
        )?,
        cors_allowed_origins: env_var("CORS_ALLOWED_ORIGINS"),
        rate_limit_requests_per_second: parse_env(
            "RATE_LIMIT_REQUESTS_PER_SECOND",
            defaults.rate_limit_requests_per_second,
        )?,
        rate_limit_burst_size: parse_env("RATE_LIMIT_BURST_SIZE", defaults.rate_limit_burst_size)?,
    })
}
