//! Login sessions and their generation history.

use std::collections::VecDeque;
use std::sync::Arc;
use std::time::Duration;

use moka::future::Cache;
use parking_lot::Mutex;
use time::OffsetDateTime;
use time::format_description::well_known::Rfc3339;
use tracing::debug;

use super::users::UserInfo;
use crate::config::ServerConfig;
use crate::core::generation::{GenerationKind, GenerationRecord};

const MAX_SESSIONS: u64 = 10_000;

/// Snapshot of a live session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    pub token: String,
    pub user: UserInfo,
    pub created_at: String,
}

struct SessionEntry {
    user: UserInfo,
    created_at: String,
    history: Mutex<VecDeque<GenerationRecord>>,
}

/// Token → session map with an idle timeout.
pub struct SessionStore {
    sessions: Cache<String, Arc<SessionEntry>>,
    max_history: usize,
}

impl SessionStore {
    pub fn new(idle_timeout: Duration, max_history: usize) -> Self {
        let sessions = Cache::builder()
            .max_capacity(MAX_SESSIONS)
            .time_to_idle(idle_timeout)
            .build();

        Self {
            sessions,
            max_history: max_history.max(1),
        }
    }

    pub fn from_config(config: &ServerConfig) -> Self {
        Self::new(
            Duration::from_secs(config.session_idle_timeout_seconds),
            config.max_history_per_session,
        )
    }

    /// Start a session for `user` and return its token.
    pub async fn create(&self, user: UserInfo) -> String {
        let token = uuid::Uuid::new_v4().to_string();
        let entry = SessionEntry {
            user,
            created_at: OffsetDateTime::now_utc()
                .format(&Rfc3339)
                .unwrap_or_default(),
            history: Mutex::new(VecDeque::new()),
        };

        debug!(username = %entry.user.username, "Session created");
        self.sessions.insert(token.clone(), Arc::new(entry)).await;
        token
    }

    pub async fn get(&self, token: &str) -> Option<Session> {
        self.sessions.get(token).await.map(|entry| Session {
            token: token.to_string(),
            user: entry.user.clone(),
            created_at: entry.created_at.clone(),
        })
    }

    pub async fn remove(&self, token: &str) {
        self.sessions.invalidate(token).await;
    }

    /// End every session belonging to `username`. Returns how many were ended.
    pub async fn remove_user(&self, username: &str) -> usize {
        let tokens: Vec<Arc<String>> = self
            .sessions
            .iter()
            .filter(|(_, entry)| entry.user.username == username)
            .map(|(token, _)| token)
            .collect();

        for token in &tokens {
            self.sessions.invalidate(token.as_str()).await;
        }
        tokens.len()
    }

    /// Append a record to the session history, evicting the oldest entries
    /// past the retention limit. Returns false when the session is gone.
    pub async fn record(&self, token: &str, record: GenerationRecord) -> bool {
        let Some(entry) = self.sessions.get(token).await else {
            return false;
        };

        let mut history = entry.history.lock();
        history.push_back(record);
        while history.len() > self.max_history {
            history.pop_front();
        }
        true
    }

    /// Most recent records first, optionally filtered by kind.
    pub async fn history(
        &self,
        token: &str,
        kind: Option<GenerationKind>,
        limit: usize,
    ) -> Vec<GenerationRecord> {
        let Some(entry) = self.sessions.get(token).await else {
            return Vec::new();
        };

        let history = entry.history.lock();
        history
            .iter()
            .rev()
            .filter(|r| kind.is_none_or(|k| r.kind == k))
            .take(limit)
            .cloned()
            .collect()
    }

    /// Look up one record of this session by id.
    pub async fn audio(&self, token: &str, id: &str) -> Option<GenerationRecord> {
        let entry = self.sessions.get(token).await?;
        let history = entry.history.lock();
        history.iter().find(|r| r.id == id).cloned()
    }
}
