//! Authentication core for tickerdesk
//!
//! - Salted adaptive password hashing (bcrypt, per-hash work factor)
//! - Stateless signed session tokens (symmetric JWT, subject + expiry)
//! - Registration and login workflows
//! - Bearer-token principal resolution

mod password;
mod resolver;
mod service;
mod token;

pub use password::{hash_password, verify_password, PasswordError};
pub use resolver::PrincipalResolver;
pub use service::{AuthError, CredentialService};
pub use token::{Claims, TokenCodec, TokenError, TokenVerifyError};
