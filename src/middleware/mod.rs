//! Middleware for the tickerdesk API
//!
//! Request tracing, security headers, and the authenticated-user extractor.

pub mod auth;
mod security;
mod tracing;

pub use auth::CurrentUser;
pub use security::security_headers;
pub use tracing::request_tracing;
