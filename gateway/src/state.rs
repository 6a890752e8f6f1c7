use std::sync::Arc;

use crate::auth::{SessionStore, UserStore};
use crate::config::ServerConfig;
use crate::core::tts::{BoxedSynthesizer, create_synthesizer};

/// Application state shared by every handler
pub struct AppState {
    pub config: ServerConfig,
    pub users: UserStore,
    pub sessions: SessionStore,
    pub synthesizer: BoxedSynthesizer,
}

impl AppState {
    /// Build state with the ElevenLabs backend described by `config`.
    pub fn new(config: ServerConfig) -> Arc<Self> {
        let synthesizer = create_synthesizer(&config);
        Self::with_synthesizer(config, synthesizer)
    }

    /// Build state around an explicit synthesis backend.
    pub fn with_synthesizer(config: ServerConfig, synthesizer: BoxedSynthesizer) -> Arc<Self> {
        let users = UserStore::from_config(&config);
        let sessions = SessionStore::from_config(&config);

        Arc::new(Self {
            config,
            users,
            sessions,
            synthesizer,
        })
    }

    /// Whether cookies should carry the `Secure` attribute.
    pub fn secure_cookies(&self) -> bool {
        self.config.is_tls_enabled()
    }
}
