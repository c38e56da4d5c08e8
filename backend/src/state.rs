//! Application state management
//!
//! This module provides the shared application state that is passed
//! to all request handlers via Axum's state extraction.
//!
//! Everything here is built once at startup and read-only afterwards;
//! the signing key in particular only changes with a restart.

use crate::auth::{LocalVerifier, PasswordService, TokenService, Verifier};
use crate::config::AppConfig;
use crate::repositories::{MovieStore, UserStore};
use anyhow::Result;
use secrecy::Secret;
use std::sync::Arc;

/// Shared application state
///
/// All fields are designed for cheap cloning across async tasks.
#[derive(Clone)]
pub struct AppState {
    /// Injected user store
    pub users: Arc<dyn UserStore>,
    /// Injected movie catalog
    pub movies: Arc<dyn MovieStore>,
    /// Pre-initialized token service with cached keys
    pub tokens: TokenService,
    /// Password hasher for new and changed passwords
    pub passwords: PasswordService,
    /// Credential verifier over `users`
    pub verifier: Arc<dyn Verifier>,
}

impl AppState {
    /// Create a new application state
    ///
    /// Pre-computes the signing keys and the verifier's dummy hash, so this
    /// should only be called once at application startup.
    pub fn new(
        users: Arc<dyn UserStore>,
        movies: Arc<dyn MovieStore>,
        config: &AppConfig,
    ) -> Result<Self> {
        let tokens = TokenService::new(
            &Secret::new(config.jwt.secret.clone()),
            config.jwt.token_ttl_secs,
        )?;
        let passwords = PasswordService::new(config.password.algorithm, config.password.bcrypt_cost)?;
        let verifier = LocalVerifier::new(Arc::clone(&users), &passwords)?;

        Ok(Self {
            users,
            movies,
            tokens,
            passwords,
            verifier: Arc::new(verifier),
        })
    }

    /// Get a reference to the user store
    #[inline]
    pub fn users(&self) -> &dyn UserStore {
        self.users.as_ref()
    }

    /// Get a reference to the movie catalog
    #[inline]
    pub fn movies(&self) -> &dyn MovieStore {
        self.movies.as_ref()
    }

    /// Get a reference to the token service
    #[inline]
    pub fn tokens(&self) -> &TokenService {
        &self.tokens
    }

    #[inline]
    pub fn verifier(&self) -> &dyn Verifier {
        self.verifier.as_ref()
    }
}
