//! Merge YAML overrides on top of the environment configuration.

use std::path::PathBuf;

use super::yaml::YamlConfig;
use super::{ConfigError, ServerConfig, TlsConfig, env};

/// Load the environment configuration and apply YAML overrides on top of it.
pub(super) fn merge_config(yaml: Option<YamlConfig>) -> Result<ServerConfig, ConfigError> {
    let mut config = env::load_from_env()?;

    let Some(yaml) = yaml else {
        return Ok(config);
    };

    if let Some(server) = yaml.server {
        if let Some(host) = server.host {
            config.host = host;
        }
        if let Some(port) = server.port {
            config.port = port;
        }
        if let Some(tls) = server.tls {
            config.tls = match (tls.cert_path, tls.key_path) {
                (Some(cert), Some(key)) => Some(TlsConfig {
                    cert_path: PathBuf::from(cert),
                    key_path: PathBuf::from(key),
                }),
                (None, None) => config.tls.take(),
                _ => {
                    return Err(ConfigError::Invalid(
                        "server.tls requires both cert_path and key_path".to_string(),
                    ));
                }
            };
        }
    }

    if let Some(el) = yaml.elevenlabs {
        if let Some(key) = el.api_key.filter(|k| !k.is_empty()) {
            config.elevenlabs_api_key = Some(key);
        }
        if let Some(url) = el.base_url {
            config.elevenlabs_base_url = url;
        }
        if let Some(ttl) = el.voice_cache_ttl_seconds {
            config.voice_cache_ttl_seconds = ttl;
        }
    }

    if let Some(auth) = yaml.auth {
        if let Some(username) = auth.admin_username {
            config.admin_username = username;
        }
        if let Some(password) = auth.admin_password.filter(|p| !p.is_empty()) {
            config.admin_password = password;
        }
        if let Some(timeout) = auth.session_idle_timeout_seconds {
            config.session_idle_timeout_seconds = timeout;
        }
    }

    if let Some(history) = yaml.history {
        if let Some(limit) = history.display_limit {
            config.history_display_limit = limit;
        }
        if let Some(max) = history.max_per_session {
            config.max_history_per_session = max;
        }
    }

    if let Some(security) = yaml.security {
        if let Some(origins) = security.cors_allowed_origins {
            config.cors_allowed_origins = Some(origins);
        }
        if let Some(rps) = security.rate_limit_requests_per_second {
            config.rate_limit_requests_per_second = rps;
        }
        if let Some(burst) = security.rate_limit_burst_size {
            config.rate_limit_burst_size = burst;
        }
    }

    Ok(config)
}
