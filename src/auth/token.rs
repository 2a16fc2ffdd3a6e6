//! Session token issuance and verification
//!
//! Tokens are compact three-part JWTs signed with a symmetric secret. They
//! carry only a subject and an expiry; validity is a pure function of
//! signature and expiry, so no per-token state exists server-side.

use chrono::{Duration, Utc};
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Claims carried by a session token
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct Claims {
    /// Subject: the username the token authenticates
    #[serde(default)]
    pub sub: String,
    /// Expiration (unix timestamp, seconds)
    pub exp: i64,
}

/// Token issuance errors
#[derive(Error, Debug)]
pub enum TokenError {
    #[error("token encoding failed: {0}")]
    EncodingFailed(String),
}

/// Disjoint verification failure kinds.
///
/// Distinguished internally for diagnostics; callers facing the network must
/// collapse all of them into a single unauthorized outcome.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenVerifyError {
    #[error("token is structurally malformed")]
    Malformed,

    #[error("token signature verification failed")]
    SignatureInvalid,

    #[error("token has expired")]
    Expired,

    #[error("token carries no subject")]
    MissingSubject,
}

/// Signs and verifies session tokens with a process-wide secret.
///
/// Built once at startup from validated configuration and never mutated.
pub struct TokenCodec {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    algorithm: Algorithm,
}

impl TokenCodec {
    /// Create a codec for the given secret and HMAC algorithm.
    ///
    /// Only symmetric algorithms are supported; the configuration layer
    /// rejects anything else before it gets here.
    pub fn new(secret: &str, algorithm: Algorithm) -> Self {
        assert!(
            matches!(
                algorithm,
                Algorithm::HS256 | Algorithm::HS384 | Algorithm::HS512
            ),
            "token codec requires an HMAC algorithm"
        );

        Self {
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            algorithm,
        }
    }

    /// Issue a signed token for `subject` expiring after `ttl`.
    ///
    /// A non-positive ttl is a programmer error and fails fast.
    pub fn issue(&self, subject: &str, ttl: Duration) -> Result<String, TokenError> {
        assert!(ttl > Duration::zero(), "token ttl must be positive");

        let claims = Claims {
            sub: subject.to_string(),
            exp: (Utc::now() + ttl).timestamp(),
        };

        encode(&Header::new(self.algorithm), &claims, &self.encoding_key)
            .map_err(|e| TokenError::EncodingFailed(e.to_string()))
    }

    /// Decode and verify a token: structure, signature (against the configured
    /// algorithm only, blocking algorithm substitution), and expiry with zero
    /// leeway.
    pub fn verify(&self, token: &str) -> Result<Claims, TokenVerifyError> {
        let mut validation = Validation::new(self.algorithm);
        validation.leeway = 0;
        validation.set_required_spec_claims(&["exp"]);

        let data = decode::<Claims>(token, &self.decoding_key, &validation).map_err(|e| {
            match e.kind() {
                ErrorKind::ExpiredSignature => TokenVerifyError::Expired,
                ErrorKind::InvalidSignature | ErrorKind::InvalidAlgorithm => {
                    TokenVerifyError::SignatureInvalid
                }
                _ => TokenVerifyError::Malformed,
            }
        })?;

        if data.claims.sub.is_empty() {
            return Err(TokenVerifyError::MissingSubject);
        }

        Ok(data.claims)
    }
}
