//! HTTP middleware stack for storefront.
//!
//! # Middleware Order (outermost first)
//!
//! 1. Sentry layers (hub per request, HTTP context)
//! 2. `TraceLayer` (request tracing)
//! 3. Request ID (add unique ID to each request)
//! 4. Security headers (CSP, framing, caching)
//! 5. Session layer (tower-sessions, signed cookie)
//!
//! The auth and cart extractors read the session the session layer installs.

pub mod auth;
pub mod cart;
pub mod request_id;
pub mod security_headers;
pub mod session;

pub use auth::{
    LOGIN_REQUIRED_REDIRECT, OptionalAuth, RequireAuth, clear_session, set_current_user,
};
pub use cart::SessionCart;
pub use request_id::request_id_middleware;
pub use security_headers::security_headers_middleware;
pub use session::{SESSION_COOKIE_NAME, create_session_layer};
