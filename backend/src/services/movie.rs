//! Movie catalog lookups

use crate::error::ApiError;
use crate::repositories::MovieStore;
use movie_api_shared::{Director, Genre, Movie};

/// Read-only catalog operations
pub struct MovieService;

impl MovieService {
    pub async fn list(store: &dyn MovieStore) -> Result<Vec<Movie>, ApiError> {
        Ok(store.list().await?)
    }

    /// Movie by exact title
    pub async fn get_by_title(store: &dyn MovieStore, title: &str) -> Result<Movie, ApiError> {
        store
            .find_by_title(title)
            .await?
            .ok_or_else(|| ApiError::NotFound(format!("Movie '{}' not found", title)))
    }

    pub async fn get_genre(store: &dyn MovieStore, name: &str) -> Result<Genre, ApiError> {
        store
            .find_genre(name)
            .await?
            .ok_or_else(|| ApiError::NotFound(format!("Genre '{}' not found", name)))
    }

    pub async fn get_director(store: &dyn MovieStore, name: &str) -> Result<Director, ApiError> {
        store
            .find_director(name)
            .await?
            .ok_or_else(|| ApiError::NotFound(format!("Director '{}' not found", name)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repositories::{sample_catalog, InMemoryMovieRepository};

    #[tokio::test]
    async fn test_lookups_hit_the_catalog() {
        let store = InMemoryMovieRepository::with_movies(sample_catalog());

        assert_eq!(MovieService::list(&store).await.unwrap().len(), 2);
        assert_eq!(
            MovieService::get_by_title(&store, "Bhool Bhulaiyaa")
                .await
                .unwrap()
                .genre
                .name,
            "Horror Comedy"
        );
        assert_eq!(
            MovieService::get_genre(&store, "Comedy").await.unwrap().name,
            "Comedy"
        );
        assert_eq!(
            MovieService::get_director(&store, "Priyadarshan")
                .await
                .unwrap()
                .name,
            "Priyadarshan"
        );
    }

    #[tokio::test]
    async fn test_unknown_entries_are_not_found() {
        let store = InMemoryMovieRepository::with_movies(sample_catalog());

        assert!(matches!(
            MovieService::get_by_title(&store, "Unknown Film").await,
            Err(ApiError::NotFound(_))
        ));
        assert!(matches!(
            MovieService::get_genre(&store, "Western").await,
            Err(ApiError::NotFound(_))
        ));
        assert!(matches!(
            MovieService::get_director(&store, "Nobody").await,
            Err(ApiError::NotFound(_))
        ));
    }
}
