//! Password hashing and verification
//!
//! New hashes are produced with the configured algorithm (bcrypt by
//! default, argon2id optionally). Verification reads the algorithm from the
//! hash itself, so records written under an earlier configuration keep
//! working after the setting changes.
//!
//! # Performance Considerations
//!
//! Both algorithms are intentionally CPU-intensive. From async code use
//! `hash_async` / `verify_async`, which run on the blocking thread pool.

use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Smallest bcrypt work factor the bcrypt crate accepts
pub const MIN_BCRYPT_COST: u32 = 4;
/// Largest bcrypt work factor the bcrypt crate accepts
pub const MAX_BCRYPT_COST: u32 = 31;
/// Work factor used when none is configured
pub const DEFAULT_BCRYPT_COST: u32 = 10;
/// bcrypt only reads this many bytes of a password
pub const MAX_BCRYPT_PASSWORD_BYTES: usize = 72;

/// Algorithm used for newly created hashes
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HashAlgorithm {
    #[default]
    Bcrypt,
    Argon2,
}

/// Password hashing failures
#[derive(Error, Debug)]
pub enum PasswordError {
    #[error("Malformed password hash: {0}")]
    MalformedHash(String),

    #[error("bcrypt cost {0} outside 4..=31")]
    InvalidCost(u32),

    #[error("Password is {0} bytes; bcrypt accepts at most 72")]
    TooLong(usize),

    #[error("Failed to hash password: {0}")]
    Hashing(String),

    #[error("Task join error: {0}")]
    Join(String),
}

/// Password hashing service
///
/// Cheap to copy; holds only the algorithm choice and bcrypt cost.
#[derive(Debug, Clone, Copy)]
pub struct PasswordService {
    algorithm: HashAlgorithm,
    bcrypt_cost: u32,
}

impl Default for PasswordService {
    fn default() -> Self {
        Self {
            algorithm: HashAlgorithm::Bcrypt,
            bcrypt_cost: DEFAULT_BCRYPT_COST,
        }
    }
}

impl PasswordService {
    /// Create a hasher, rejecting bcrypt costs the algorithm cannot use
    pub fn new(algorithm: HashAlgorithm, bcrypt_cost: u32) -> Result<Self, PasswordError> {
        if !(MIN_BCRYPT_COST..=MAX_BCRYPT_COST).contains(&bcrypt_cost) {
            return Err(PasswordError::InvalidCost(bcrypt_cost));
        }
        Ok(Self {
            algorithm,
            bcrypt_cost,
        })
    }

    pub fn algorithm(&self) -> HashAlgorithm {
        self.algorithm
    }

    pub fn bcrypt_cost(&self) -> u32 {
        self.bcrypt_cost
    }

    /// Hash a password (blocking operation)
    ///
    /// Every call draws a fresh salt, so hashing the same password twice
    /// yields different strings. bcrypt refuses passwords longer than
    /// 72 bytes instead of silently truncating them.
    pub fn hash(&self, password: &str) -> Result<String, PasswordError> {
        match self.algorithm {
            HashAlgorithm::Bcrypt => {
                if password.len() > MAX_BCRYPT_PASSWORD_BYTES {
                    return Err(PasswordError::TooLong(password.len()));
                }
                bcrypt::hash(password, self.bcrypt_cost)
                    .map_err(|e| PasswordError::Hashing(e.to_string()))
            }
            HashAlgorithm::Argon2 => {
                let salt = SaltString::generate(&mut OsRng);
                Argon2::default()
                    .hash_password(password.as_bytes(), &salt)
                    .map(|hash| hash.to_string())
                    .map_err(|e| PasswordError::Hashing(e.to_string()))
            }
        }
    }

    /// Hash a password asynchronously (non-blocking)
    pub async fn hash_async(&self, password: String) -> Result<String, PasswordError> {
        let service = *self;
        tokio::task::spawn_blocking(move || service.hash(&password))
            .await
            .map_err(|e| PasswordError::Join(e.to_string()))?
    }

    /// Verify a password against a stored hash (blocking operation)
    ///
    /// A wrong password is `Ok(false)`. A hash that neither algorithm can
    /// parse is an error. No bcrypt hash is ever made from more than 72
    /// bytes, so a longer candidate never matches one.
    pub fn verify(password: &str, hash: &str) -> Result<bool, PasswordError> {
        if is_bcrypt_hash(hash) {
            let matches = bcrypt::verify(password, hash)
                .map_err(|e| PasswordError::MalformedHash(e.to_string()))?;
            Ok(matches && password.len() <= MAX_BCRYPT_PASSWORD_BYTES)
        } else if hash.starts_with("$argon2") {
            let parsed_hash =
                PasswordHash::new(hash).map_err(|e| PasswordError::MalformedHash(e.to_string()))?;
            match Argon2::default().verify_password(password.as_bytes(), &parsed_hash) {
                Ok(()) => Ok(true),
                Err(argon2::password_hash::Error::Password) => Ok(false),
                Err(e) => Err(PasswordError::MalformedHash(e.to_string())),
            }
        } else {
            Err(PasswordError::MalformedHash(
                "unrecognised hash prefix".to_string(),
            ))
        }
    }

    /// Verify a password asynchronously (non-blocking)
    pub async fn verify_async(password: String, hash: String) -> Result<bool, PasswordError> {
        tokio::task::spawn_blocking(move || Self::verify(&password, &hash))
            .await
            .map_err(|e| PasswordError::Join(e.to_string()))?
    }
}

fn is_bcrypt_hash(hash: &str) -> bool {
    ["$2a$", "$2b$", "$2x$", "$2y$"]
        .iter()
        .any(|prefix| hash.starts_with(prefix))
}
