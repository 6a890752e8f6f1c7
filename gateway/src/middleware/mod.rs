pub mod auth;
pub mod rate_limit;

// Re-export middleware functions
pub use auth::{
    admin_middleware, page_admin_middleware, page_session_middleware, session_middleware,
};
pub use rate_limit::{RateLimitConfig, rate_limit_config};
