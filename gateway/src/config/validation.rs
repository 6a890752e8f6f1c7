//! Configuration validation logic.

use super::{ConfigError, ServerConfig};

/// Validate a fully merged configuration.
pub(super) fn validate(config: &ServerConfig) -> Result<(), ConfigError> {
    validate_admin(&config.admin_username)?;
    validate_base_url(&config.elevenlabs_base_url)?;
    validate_history(config.history_display_limit, config.max_history_per_session)?;
    validate_rate_limit(
        config.rate_limit_requests_per_second,
        config.rate_limit_burst_size,
    )?;
    Ok(())
}

fn validate_admin(username: &str) -> Result<(), ConfigError> {
    if username.trim().is_empty() {
        return Err(ConfigError::Invalid(
            "admin username cannot be empty".to_string(),
        ));
    }
    Ok(())
}

fn validate_base_url(base_url: &str) -> Result<(), ConfigError> {
    let parsed = url::Url::parse(base_url).map_err(|e| {
        ConfigError::Invalid(format!("ElevenLabs base URL '{base_url}' is invalid: {e}"))
    })?;
    if !matches!(parsed.scheme(), "http" | "https") {
        return Err(ConfigError::Invalid(format!(
            "ElevenLabs base URL must use http or https, got '{}'",
            parsed.scheme()
        )));
    }
    Ok(())
}

fn validate_history(display_limit: usize, max_per_session: usize) -> Result<(), ConfigError> {
    if display_limit == 0 {
        return Err(ConfigError::Invalid(
            "history display limit must be at least 1".to_string(),
        ));
    }
    if max_per_session < display_limit {
        return Err(ConfigError::Invalid(format!(
            "max history per session ({max_per_session}) must be >= display limit ({display_limit})"
        )));
    }
    Ok(())
}

fn validate_rate_limit(rps: u32, burst: u32) -> Result<(), ConfigError> {
    if rps == 0 || burst == 0 {
        return Err(ConfigError::Invalid(
            "rate limit values must be greater than zero".to_string(),
        ));
    }
    Ok(())
}
