//! Error types for the Movie API

use thiserror::Error;

/// Bearer token verification failures
///
/// Callers must not expose the variant to clients; it is for server-side
/// logs only.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenError {
    #[error("Token expired")]
    Expired,

    #[error("Token signature mismatch")]
    BadSignature,

    #[error("Malformed token")]
    Malformed,
}

impl TokenError {
    /// Short label used as a structured log field
    pub fn reason(&self) -> &'static str {
        match self {
            TokenError::Expired => "expired",
            TokenError::BadSignature => "bad_signature",
            TokenError::Malformed => "malformed",
        }
    }
}

/// Credential verification failures
#[derive(Error, Debug)]
pub enum AuthError {
    /// Unknown identifier or wrong secret; the two are indistinguishable
    #[error("Invalid credentials")]
    InvalidCredentials,

    /// The stored hash could not be parsed
    #[error("Malformed password hash: {0}")]
    MalformedHash(String),

    /// The user store or the hashing pool could not be reached
    #[error("Credential check unavailable: {0}")]
    Unavailable(String),
}
