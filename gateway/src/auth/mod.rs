//! Login gate: user store, sessions and the authenticated-user context.

pub mod session;
pub mod users;

pub use session::{Session, SessionStore};
pub use users::{Role, UserInfo, UserStore, UserStoreError};

/// Authenticated caller, inserted into request extensions by the session
/// middleware.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CurrentUser {
    pub token: String,
    pub username: String,
    pub role: Role,
}

impl CurrentUser {
    pub fn is_admin(&self) -> bool {
        self.role == Role::Admin
    }
}

impl From<Session> for CurrentUser {
    fn from(session: Session) -> Self {
        Self {
            token: session.token,
            username: session.user.username,
            role: session.user.role,
        }
    }
}
