//! Local credential verification
//!
//! Turns a username/password pair into an `Identity` with exactly one
//! store lookup and one hash comparison.

use super::password::{PasswordError, PasswordService};
use crate::repositories::UserLookup;
use async_trait::async_trait;
use movie_api_shared::{AuthError, Identity};
use std::sync::Arc;
use tracing::{debug, error, info};

/// Capability to authenticate a username/password pair
#[async_trait]
pub trait Verifier: Send + Sync {
    async fn authenticate(&self, identifier: &str, secret: &str) -> Result<Identity, AuthError>;
}

/// Verifies credentials against a `UserLookup`
///
/// When the username is unknown the secret is still compared against a
/// dummy hash of the same cost, so an unknown user and a wrong password
/// take the same time as well as producing the same error.
pub struct LocalVerifier<L: ?Sized> {
    lookup: Arc<L>,
    dummy_hash: Arc<str>,
}

impl<L: ?Sized> Clone for LocalVerifier<L> {
    fn clone(&self) -> Self {
        Self {
            lookup: Arc::clone(&self.lookup),
            dummy_hash: Arc::clone(&self.dummy_hash),
        }
    }
}

impl<L: UserLookup + ?Sized> LocalVerifier<L> {
    /// Create a verifier; hashes the dummy secret once with `passwords`
    pub fn new(lookup: Arc<L>, passwords: &PasswordService) -> Result<Self, PasswordError> {
        let dummy_hash = passwords.hash("dummy-password-for-unknown-users")?;
        Ok(Self {
            lookup,
            dummy_hash: Arc::from(dummy_hash),
        })
    }
}

#[async_trait]
impl<L: UserLookup + ?Sized + 'static> Verifier for LocalVerifier<L> {
    async fn authenticate(&self, identifier: &str, secret: &str) -> Result<Identity, AuthError> {
        let record = self
            .lookup
            .find_by_username(identifier)
            .await
            .map_err(|e| {
                error!(error = %e, "User lookup failed during authentication");
                AuthError::Unavailable(e.to_string())
            })?;

        let hash = match &record {
            Some(user) => user.password_hash.clone(),
            None => self.dummy_hash.to_string(),
        };

        let matches = PasswordService::verify_async(secret.to_string(), hash)
            .await
            .map_err(|e| match e {
                PasswordError::MalformedHash(detail) => {
                    error!(username = %identifier, "Stored password hash is malformed");
                    AuthError::MalformedHash(detail)
                }
                other => AuthError::Unavailable(other.to_string()),
            })?;

        match record {
            Some(user) if matches => {
                info!(username = %identifier, "Credentials verified");
                Ok(Identity::from(&user))
            }
            Some(_) => {
                debug!(username = %identifier, reason = "password_mismatch", "Login rejected");
                Err(AuthError::InvalidCredentials)
            }
            None => {
                debug!(username = %identifier, reason = "unknown_user", "Login rejected");
                Err(AuthError::InvalidCredentials)
            }
        }
    }
}
