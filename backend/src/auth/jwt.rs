//! JWT token issuance and verification
//!
//! Tokens are HS256-signed and self-contained: verification needs only the
//! signing key, never the user store. There is no revocation list, so a
//! token stays valid until its `exp` even if the account changes.

use anyhow::Result;
use chrono::{Duration, Utc};
use jsonwebtoken::{
    decode, encode, errors::ErrorKind, Algorithm, DecodingKey, EncodingKey, Header, Validation,
};
use movie_api_shared::{Identity, TokenError};
use secrecy::{ExposeSecret, Secret};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;
use tracing::debug;

/// The only algorithm this service signs with or accepts
pub const TOKEN_ALGORITHM: Algorithm = Algorithm::HS256;

/// Token lifetime used when none is configured (7 days)
pub const DEFAULT_TOKEN_TTL_SECS: i64 = 7 * 24 * 60 * 60;

/// Longest configurable token lifetime (365 days)
pub const MAX_TOKEN_TTL_SECS: i64 = 365 * 24 * 60 * 60;

/// JWT claims: the identity plus the registered time and subject claims
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    #[serde(flatten)]
    pub identity: Identity,
    /// Subject (username)
    pub sub: String,
    /// Issued at (Unix timestamp)
    pub iat: i64,
    /// Expiration time (Unix timestamp)
    pub exp: i64,
}

/// Pre-computed HMAC keys derived from the signing secret
#[derive(Clone)]
pub struct SigningKey {
    encoding: Arc<EncodingKey>,
    decoding: Arc<DecodingKey>,
}

impl SigningKey {
    pub fn new(secret: &Secret<String>) -> Self {
        let bytes = secret.expose_secret().as_bytes();
        Self {
            encoding: Arc::new(EncodingKey::from_secret(bytes)),
            decoding: Arc::new(DecodingKey::from_secret(bytes)),
        }
    }

    pub fn encoding(&self) -> &EncodingKey {
        &self.encoding
    }

    pub fn decoding(&self) -> &DecodingKey {
        &self.decoding
    }
}

impl fmt::Debug for SigningKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("SigningKey([REDACTED])")
    }
}

/// Capability to turn a bearer token into an identity
///
/// The auth middleware depends on this rather than on `TokenService`.
pub trait TokenAuthenticator: Send + Sync {
    fn authenticate_token(&self, token: &str) -> Result<Identity, TokenError>;
}

/// JWT service for token operations
///
/// Keys and validation rules are built once and shared through `Arc`, so
/// cloning into request handlers is cheap.
#[derive(Clone)]
pub struct TokenService {
    key: SigningKey,
    validation: Arc<Validation>,
    ttl: Duration,
}

impl TokenService {
    /// Create a token service for one signing secret and default lifetime
    ///
    /// Call this once at application startup and store in AppState.
    /// `ttl_secs` must lie in `1..=MAX_TOKEN_TTL_SECS`.
    pub fn new(secret: &Secret<String>, ttl_secs: i64) -> Result<Self> {
        if !(1..=MAX_TOKEN_TTL_SECS).contains(&ttl_secs) {
            anyhow::bail!(
                "token TTL of {} seconds outside 1..={}",
                ttl_secs,
                MAX_TOKEN_TTL_SECS
            );
        }

        let mut validation = Validation::new(TOKEN_ALGORITHM);
        // expiry is enforced in `verify` so that exp == now already counts
        validation.validate_exp = false;
        validation.leeway = 0;
        validation.set_required_spec_claims(&["exp", "iat", "sub"]);

        Ok(Self {
            key: SigningKey::new(secret),
            validation: Arc::new(validation),
            ttl: Duration::seconds(ttl_secs),
        })
    }

    /// Default lifetime of issued tokens
    pub fn token_ttl(&self) -> Duration {
        self.ttl
    }

    /// Issue a token for an identity with the configured lifetime
    pub fn issue(&self, identity: &Identity) -> Result<String> {
        self.issue_with_ttl(identity, self.ttl)
    }

    /// Issue a token with an explicit lifetime
    ///
    /// A zero or negative `ttl` yields a token that is already expired.
    /// A `ttl` that pushes `exp` past the representable date range is an
    /// error.
    pub fn issue_with_ttl(&self, identity: &Identity, ttl: Duration) -> Result<String> {
        let now = Utc::now();
        let expires_at = now
            .checked_add_signed(ttl)
            .ok_or_else(|| anyhow::anyhow!("token lifetime of {} overflows", ttl))?;
        let claims = Claims {
            identity: identity.clone(),
            sub: identity.username.clone(),
            iat: now.timestamp(),
            exp: expires_at.timestamp(),
        };

        encode(&Header::new(TOKEN_ALGORITHM), &claims, self.key.encoding())
            .map_err(|e| anyhow::anyhow!("Failed to issue token for {}: {}", identity.username, e))
    }

    /// Verify a token and return the identity it was issued for
    ///
    /// The signature is checked before expiry, so a forged token is always
    /// reported as `BadSignature` or `Malformed`, never `Expired`.
    pub fn verify(&self, token: &str) -> Result<Identity, TokenError> {
        let claims = decode::<Claims>(token, self.key.decoding(), &self.validation)
            .map_err(|e| {
                let error = match e.kind() {
                    ErrorKind::InvalidSignature => TokenError::BadSignature,
                    ErrorKind::ExpiredSignature => TokenError::Expired,
                    _ => TokenError::Malformed,
                };
                debug!(cause = %e, reason = error.reason(), "Token rejected");
                error
            })?
            .claims;

        if claims.sub != claims.identity.username {
            debug!(sub = %claims.sub, "Token subject does not match embedded identity");
            return Err(TokenError::Malformed);
        }

        if Utc::now().timestamp() >= claims.exp {
            return Err(TokenError::Expired);
        }

        Ok(claims.identity)
    }
}

impl TokenAuthenticator for TokenService {
    fn authenticate_token(&self, token: &str) -> Result<Identity, TokenError> {
        self.verify(token)
    }
}

impl fmt::Debug for TokenService {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TokenService")
            .field("key", &self.key)
            .field("ttl_secs", &self.ttl.num_seconds())
            .finish()
    }
}
