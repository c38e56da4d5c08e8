//! Authentication middleware
//!
//! Admits a request only when it carries a valid bearer token. The reason
//! for a rejection is logged but never sent to the client: missing,
//! expired, forged and malformed tokens all produce the same 401.

use super::jwt::TokenAuthenticator;
use crate::error::ApiError;
use crate::state::AppState;
use axum::{
    extract::{FromRef, Request, State},
    http::{header::AUTHORIZATION, request::Parts, HeaderMap},
    middleware::Next,
    response::Response,
};
use movie_api_shared::{Identity, TokenError};
use tracing::{debug, warn};

/// Why a request was not admitted
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rejection {
    /// No usable `Authorization: Bearer` header
    MissingToken,
    /// A token was present but failed verification
    InvalidToken(TokenError),
}

impl Rejection {
    pub fn reason(&self) -> &'static str {
        match self {
            Rejection::MissingToken => "missing",
            Rejection::InvalidToken(e) => e.reason(),
        }
    }
}

impl From<Rejection> for ApiError {
    fn from(rejection: Rejection) -> Self {
        warn!(reason = rejection.reason(), "Rejected unauthenticated request");
        ApiError::Unauthorized("Authentication required".to_string())
    }
}

/// Extract the token from an `Authorization: Bearer <token>` header
///
/// The scheme name is matched case-insensitively.
pub fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    let value = headers.get(AUTHORIZATION)?.to_str().ok()?;
    let (scheme, token) = value.split_once(' ')?;
    if !scheme.eq_ignore_ascii_case("bearer") {
        return None;
    }

    Some(token.trim()).filter(|token| !token.is_empty())
}

/// Run the admission decision for one request's headers
pub fn authorize(
    headers: &HeaderMap,
    tokens: &dyn TokenAuthenticator,
) -> Result<Identity, Rejection> {
    let token = bearer_token(headers).ok_or(Rejection::MissingToken)?;
    let identity = tokens
        .authenticate_token(token)
        .map_err(Rejection::InvalidToken)?;

    debug!(username = %identity.username, "Request authenticated");
    Ok(identity)
}

/// Authenticated user extracted from the request
///
/// Reuses the identity attached by `require_auth` when the route sits
/// behind that layer, and verifies the bearer token itself otherwise.
#[derive(Debug, Clone)]
pub struct AuthUser {
    pub identity: Identity,
}

impl AuthUser {
    pub fn username(&self) -> &str {
        &self.identity.username
    }
}

#[axum::async_trait]
impl<S> axum::extract::FromRequestParts<S> for AuthUser
where
    AppState: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        if let Some(identity) = parts.extensions.get::<Identity>() {
            return Ok(AuthUser {
                identity: identity.clone(),
            });
        }

        let app_state = AppState::from_ref(state);
        let identity = authorize(&parts.headers, app_state.tokens())?;
        Ok(AuthUser { identity })
    }
}

/// Middleware guarding a group of routes
///
/// Apply with `axum::middleware::from_fn_with_state`. On success the
/// decoded identity is inserted into the request extensions.
pub async fn require_auth(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let identity = authorize(request.headers(), state.tokens())?;
    request.extensions_mut().insert(identity);

    Ok(next.run(request).await)
}
