//! Movie catalog routes
//!
//! Every catalog route requires a bearer token.

use crate::auth::require_auth;
use crate::error::ApiResult;
use crate::services::MovieService;
use crate::state::AppState;
use axum::{
    extract::{Path, State},
    middleware,
    routing::get,
    Json, Router,
};
use movie_api_shared::{Director, Genre, Movie};

/// Create movie routes
pub fn movie_routes(state: AppState) -> Router<AppState> {
    Router::new()
        .route("/", get(list_movies))
        .route("/:title", get(get_movie))
        .route("/genres/:name", get(get_genre))
        .route("/directors/:name", get(get_director))
        .route_layer(middleware::from_fn_with_state(state, require_auth))
}

/// GET /movies - List the catalog
async fn list_movies(State(state): State<AppState>) -> ApiResult<Json<Vec<Movie>>> {
    Ok(Json(MovieService::list(state.movies()).await?))
}

/// GET /movies/:title - One movie by exact title
async fn get_movie(
    State(state): State<AppState>,
    Path(title): Path<String>,
) -> ApiResult<Json<Movie>> {
    Ok(Json(MovieService::get_by_title(state.movies(), &title).await?))
}

/// GET /movies/genres/:name - Genre details
async fn get_genre(
    State(state): State<AppState>,
    Path(name): Path<String>,
) -> ApiResult<Json<Genre>> {
    Ok(Json(MovieService::get_genre(state.movies(), &name).await?))
}

/// GET /movies/directors/:name - Director details
async fn get_director(
    State(state): State<AppState>,
    Path(name): Path<String>,
) -> ApiResult<Json<Director>> {
    Ok(Json(MovieService::get_director(state.movies(), &name).await?))
}
