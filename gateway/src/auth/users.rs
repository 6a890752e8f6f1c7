//! In-memory user store.
//!
//! Holds username → (password, role) records for the lifetime of the process.
//! A fresh store contains only the seeded admin account; nothing is written
//! to disk, so a restart always returns to that state.

use std::collections::HashMap;

use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use subtle::ConstantTimeEq;
use thiserror::Error;

use crate::config::ServerConfig;

const MAX_USERNAME_LEN: usize = 64;

/// Account role.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Admin,
    #[default]
    User,
}

impl Role {
    #[inline]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Admin => "admin",
            Self::User => "user",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "admin" => Some(Self::Admin),
            "user" => Some(Self::User),
            _ => None,
        }
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Public view of an account (never carries the password).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UserInfo {
    pub username: String,
    pub role: Role,
}

impl UserInfo {
    pub fn is_admin(&self) -> bool {
        self.role == Role::Admin
    }
}

#[derive(Clone)]
struct UserRecord {
    password: String,
    role: Role,
}

impl Drop for UserRecord {
    fn drop(&mut self) {
        use zeroize::Zeroize;
        self.password.zeroize();
    }
}

/// User store failures
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum UserStoreError {
    #[error("Username must be 1-{MAX_USERNAME_LEN} characters of letters, digits, '.', '_', '-' or '@'")]
    InvalidUsername,

    #[error("Password cannot be empty")]
    EmptyPassword,

    #[error("User '{0}' already exists")]
    AlreadyExists(String),

    #[error("User '{0}' not found")]
    NotFound(String),

    #[error("User '{0}' is the built-in admin account and cannot be deleted")]
    ProtectedAccount(String),
}

/// Thread-safe username → record map, injected through application state.
pub struct UserStore {
    users: RwLock<HashMap<String, UserRecord>>,
    seed_admin: String,
}

impl UserStore {
    /// Create a store containing only the admin account.
    pub fn seeded(admin_username: &str, admin_password: &str) -> Self {
        let admin_username = admin_username.trim().to_string();
        let mut users = HashMap::new();
        users.insert(
            admin_username.clone(),
            UserRecord {
                password: admin_password.to_string(),
                role: Role::Admin,
            },
        );

        Self {
            users: RwLock::new(users),
            seed_admin: admin_username,
        }
    }

    /// Create the store seeded from the configured admin credentials.
    pub fn from_config(config: &ServerConfig) -> Self {
        if config.uses_default_admin_password() {
            tracing::warn!(
                admin = %config.admin_username,
                "ADMIN_PASSWORD is not set; the admin account uses the built-in fallback password"
            );
        }
        Self::seeded(&config.admin_username, &config.admin_password)
    }

    /// Username of the seeded admin account.
    pub fn seed_admin(&self) -> &str {
        &self.seed_admin
    }

    /// Check a username/password pair.
    ///
    /// Succeeds iff a record exists for `username` and its password matches.
    pub fn authenticate(&self, username: &str, password: &str) -> Option<UserInfo> {
        let users = self.users.read();
        let record = users.get(username)?;

        let matches: bool = record
            .password
            .as_bytes()
            .ct_eq(password.as_bytes())
            .into();

        matches.then(|| UserInfo {
            username: username.to_string(),
            role: record.role,
        })
    }

    /// Add a new account. The user can log in immediately.
    pub fn create_user(
        &self,
        username: &str,
        password: &str,
        role: Role,
    ) -> Result<UserInfo, UserStoreError> {
        let username = normalize_username(username)?;
        if password.is_empty() {
            return Err(UserStoreError::EmptyPassword);
        }

        let mut users = self.users.write();
        if users.contains_key(&username) {
            return Err(UserStoreError::AlreadyExists(username));
        }
        users.insert(
            username.clone(),
            UserRecord {
                password: password.to_string(),
                role,
            },
        );

        Ok(UserInfo { username, role })
    }

    /// Remove an account.
    pub fn delete_user(&self, username: &str) -> Result<UserInfo, UserStoreError> {
        let username = username.trim();
        if username == self.seed_admin {
            return Err(UserStoreError::ProtectedAccount(username.to_string()));
        }

        let record = self
            .users
            .write()
            .remove(username)
            .ok_or_else(|| UserStoreError::NotFound(username.to_string()))?;

        Ok(UserInfo {
            username: username.to_string(),
            role: record.role,
        })
    }

    /// Look up a single account.
    pub fn get(&self, username: &str) -> Option<UserInfo> {
        self.users.read().get(username.trim()).map(|r| UserInfo {
            username: username.trim().to_string(),
            role: r.role,
        })
    }

    /// All accounts sorted by username.
    pub fn list_users(&self) -> Vec<UserInfo> {
        let mut users: Vec<UserInfo> = self
            .users
            .read()
            .iter()
            .map(|(name, record)| UserInfo {
                username: name.clone(),
                role: record.role,
            })
            .collect();
        users.sort_by(|a, b| a.username.cmp(&b.username));
        users
    }
}

fn normalize_username(username: &str) -> Result<String, UserStoreError> {
    let username = username.trim();
    let valid = !username.is_empty()
        && username.len() <= MAX_USERNAME_LEN
        && username
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '-' | '@'));

    if valid {
        Ok(username.to_string())
    } else {
        Err(UserStoreError::InvalidUsername)
    }
}
