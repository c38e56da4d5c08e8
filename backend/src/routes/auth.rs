//! Authentication routes
//!
//! Credential verification runs on the blocking thread pool; token
//! issuance uses the keys pre-computed in AppState.

use crate::error::ApiResult;
use crate::extract::ApiJson;
use crate::services::UserService;
use crate::state::AppState;
use axum::{extract::State, routing::post, Json, Router};
use movie_api_shared::types::{LoginRequest, LoginResponse};

/// Create auth routes
pub fn auth_routes() -> Router<AppState> {
    Router::new().route("/login", post(login))
}

/// Login with username and password
///
/// POST /login
///
/// 200 with the identity and a bearer token, 400 when the username or
/// password is wrong (without saying which) or the body is unusable.
async fn login(
    State(state): State<AppState>,
    ApiJson(req): ApiJson<LoginRequest>,
) -> ApiResult<Json<LoginResponse>> {
    let response =
        UserService::login(state.verifier(), state.tokens(), &req.username, &req.password).await?;
    Ok(Json(response))
}
