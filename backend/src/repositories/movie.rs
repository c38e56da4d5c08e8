//! PostgreSQL movie catalog

use super::MovieStore;
use anyhow::Result;
use async_trait::async_trait;
use movie_api_shared::{Director, Genre, Movie};
use sqlx::PgPool;

/// Movie row; genre and director are stored flattened
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct MovieRecord {
    pub id: String,
    pub title: String,
    pub description: String,
    pub genre_name: String,
    pub genre_description: String,
    pub director_name: String,
    pub director_bio: String,
    pub actors: Vec<String>,
    pub image_path: Option<String>,
    pub featured: bool,
}

impl From<MovieRecord> for Movie {
    fn from(record: MovieRecord) -> Self {
        Self {
            id: record.id,
            title: record.title,
            description: record.description,
            genre: Genre {
                name: record.genre_name,
                description: record.genre_description,
            },
            director: Director {
                name: record.director_name,
                bio: record.director_bio,
            },
            actors: record.actors,
            image_path: record.image_path,
            featured: record.featured,
        }
    }
}

const MOVIE_COLUMNS: &str = "id, title, description, genre_name, genre_description, \
     director_name, director_bio, actors, image_path, featured";

/// Movie repository for database operations
#[derive(Debug, Clone)]
pub struct PgMovieRepository {
    pool: PgPool,
}

impl PgMovieRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    async fn find_one_by(&self, column: &str, value: &str) -> Result<Option<Movie>> {
        let movie = sqlx::query_as::<_, MovieRecord>(&format!(
            "SELECT {MOVIE_COLUMNS} FROM movies WHERE {column} = $1 LIMIT 1"
        ))
        .bind(value)
        .fetch_optional(&self.pool)
        .await?;

        Ok(movie.map(Movie::from))
    }
}

#[async_trait]
impl MovieStore for PgMovieRepository {
    async fn list(&self) -> Result<Vec<Movie>> {
        let movies = sqlx::query_as::<_, MovieRecord>(&format!(
            "SELECT {MOVIE_COLUMNS} FROM movies ORDER BY title"
        ))
        .fetch_all(&self.pool)
        .await?;

        Ok(movies.into_iter().map(Movie::from).collect())
    }

    async fn find_by_id(&self, id: &str) -> Result<Option<Movie>> {
        self.find_one_by("id", id).await
    }

    async fn find_by_title(&self, title: &str) -> Result<Option<Movie>> {
        self.find_one_by("title", title).await
    }

    async fn find_genre(&self, name: &str) -> Result<Option<Genre>> {
        Ok(self
            .find_one_by("genre_name", name)
            .await?
            .map(|movie| movie.genre))
    }

    async fn find_director(&self, name: &str) -> Result<Option<Director>> {
        Ok(self
            .find_one_by("director_name", name)
            .await?
            .map(|movie| movie.director))
    }

    async fn health_check(&self) -> Result<()> {
        crate::db::health_check(&self.pool).await
    }
}
