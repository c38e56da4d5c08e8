//! Authentication module
//!
//! Provides bcrypt/argon2 password hashing, HS256 bearer tokens, local
//! credential verification and the route-guarding middleware.

mod jwt;
mod middleware;
mod password;
mod verifier;

pub use jwt::{
    Claims, SigningKey, TokenAuthenticator, TokenService, DEFAULT_TOKEN_TTL_SECS,
    MAX_TOKEN_TTL_SECS,
};
pub use middleware::{authorize, bearer_token, require_auth, AuthUser, Rejection};
pub use password::{
    HashAlgorithm, PasswordError, PasswordService, DEFAULT_BCRYPT_COST, MAX_BCRYPT_COST,
    MAX_BCRYPT_PASSWORD_BYTES, MIN_BCRYPT_COST,
};
pub use verifier::{LocalVerifier, Verifier};
