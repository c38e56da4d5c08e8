//! User account routes
//!
//! Registration is public; everything under `/users/me` sits behind
//! `require_auth` and acts on the username from the bearer token.

use crate::auth::{require_auth, AuthUser};
use crate::error::ApiResult;
use crate::extract::ApiJson;
use crate::services::UserService;
use crate::state::AppState;
use axum::{
    extract::{Path, State},
    http::StatusCode,
    middleware,
    routing::{post, put},
    Json, Router,
};
use movie_api_shared::types::{
    ChangePasswordRequest, RegisterRequest, UpdateProfileRequest, UserProfile,
};

/// Create user routes
pub fn user_routes(state: AppState) -> Router<AppState> {
    let protected = Router::new()
        .route(
            "/me",
            axum::routing::get(get_profile)
                .put(update_profile)
                .delete(deregister),
        )
        .route("/me/password", put(change_password))
        .route(
            "/me/movies/:movie_id",
            post(add_favourite).delete(remove_favourite),
        )
        .route_layer(middleware::from_fn_with_state(state, require_auth));

    Router::new().route("/", post(register)).merge(protected)
}

/// POST /users - Register a new account
async fn register(
    State(state): State<AppState>,
    ApiJson(req): ApiJson<RegisterRequest>,
) -> ApiResult<(StatusCode, Json<UserProfile>)> {
    let profile = UserService::register(state.users(), &state.passwords, req).await?;
    Ok((StatusCode::CREATED, Json(profile)))
}

/// GET /users/me - Get the stored profile
async fn get_profile(
    State(state): State<AppState>,
    auth: AuthUser,
) -> ApiResult<Json<UserProfile>> {
    let profile = UserService::get_profile(state.users(), auth.username()).await?;
    Ok(Json(profile))
}

/// PUT /users/me - Update email and/or birthday
async fn update_profile(
    State(state): State<AppState>,
    auth: AuthUser,
    ApiJson(req): ApiJson<UpdateProfileRequest>,
) -> ApiResult<Json<UserProfile>> {
    let profile = UserService::update_profile(state.users(), auth.username(), req).await?;
    Ok(Json(profile))
}

/// PUT /users/me/password - Change password
async fn change_password(
    State(state): State<AppState>,
    auth: AuthUser,
    ApiJson(req): ApiJson<ChangePasswordRequest>,
) -> ApiResult<StatusCode> {
    UserService::change_password(
        state.users(),
        state.verifier(),
        &state.passwords,
        auth.username(),
        req,
    )
    .await?;
    Ok(StatusCode::NO_CONTENT)
}

/// POST /users/me/movies/:movie_id - Add a catalog movie to the favourites
async fn add_favourite(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(movie_id): Path<String>,
) -> ApiResult<Json<UserProfile>> {
    let profile = UserService::add_favourite(
        state.users(),
        state.movies(),
        auth.username(),
        &movie_id,
    )
    .await?;
    Ok(Json(profile))
}

/// DELETE /users/me/movies/:movie_id - Remove a favourite movie
async fn remove_favourite(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(movie_id): Path<String>,
) -> ApiResult<Json<UserProfile>> {
    let profile = UserService::remove_favourite(state.users(), auth.username(), &movie_id).await?;
    Ok(Json(profile))
}

/// DELETE /users/me - Deregister
async fn deregister(State(state): State<AppState>, auth: AuthUser) -> ApiResult<StatusCode> {
    UserService::deregister(state.users(), auth.username()).await?;
    Ok(StatusCode::NO_CONTENT)
}
