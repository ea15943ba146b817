//! API-key authentication.
//!
//! Requests present a pre-shared key as `Authorization: Bearer <key>`.
//! Keys never reach the classification engine; the boundary rejects
//! unauthenticated requests before invoking it. Only a short SHA-256
//! fingerprint of the key ever appears in logs.

use sha2::{Digest, Sha256};
use thiserror::Error;

/// Authentication error
#[derive(Debug, Error)]
pub enum AuthError {
    /// No bearer token in the Authorization header
    #[error("Missing or malformed Authorization: Bearer <API_KEY> header")]
    MissingToken,

    /// Token is not a configured API key
    #[error("Invalid API key")]
    InvalidKey,
}

/// The set of accepted API keys
#[derive(Debug, Clone)]
pub struct ApiKeySet {
    keys: Vec<String>,
}

impl ApiKeySet {
    /// Create a key set from the configured keys
    pub fn new(keys: Vec<String>) -> Self {
        Self { keys }
    }

    /// Verify a bearer token, returning it on success
    pub fn verify<'a>(&self, token: &'a str) -> Result<&'a str, AuthError> {
        if self.keys.iter().any(|k| k == token) {
            Ok(token)
        } else {
            Err(AuthError::InvalidKey)
        }
    }
}

/// Extract the token from an `Authorization: Bearer <token>` header value
pub fn parse_bearer_token(auth_header: Option<&str>) -> Option<&str> {
    let header = auth_header?;
    let mut parts = header.split_whitespace();
    let scheme = parts.next()?;
    let token = parts.next()?;
    if parts.next().is_some() || !scheme.eq_ignore_ascii_case("bearer") || token.is_empty() {
        return None;
    }
    Some(token)
}

/// Short log-safe fingerprint of an API key (first 12 hex chars of SHA-256)
pub fn key_fingerprint(api_key: &str) -> String {
    let digest = Sha256::digest(api_key.as_bytes());
    let mut fingerprint = String::with_capacity(12);
    for byte in digest.iter().take(6) {
        fingerprint.push_str(&format!("{:02x}", byte));
    }
    fingerprint
}
