//! In-process user store and movie catalog
//!
//! Back the service when no database URL is configured, and the test
//! suites. Live inside `AppState` like any other store.

use super::{MovieStore, NewUser, UpdateProfile, UserLookup, UserStore};
use anyhow::Result;
use async_trait::async_trait;
use chrono::Utc;
use movie_api_shared::{Director, Genre, Movie, User};
use std::collections::HashMap;
use tokio::sync::RwLock;
use uuid::Uuid;

/// User store holding records in a map keyed by username
#[derive(Debug, Default)]
pub struct InMemoryUserRepository {
    users: RwLock<HashMap<String, User>>,
}

impl InMemoryUserRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored users
    pub async fn len(&self) -> usize {
        self.users.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.users.read().await.is_empty()
    }

    async fn modify<F>(&self, username: &str, f: F) -> Option<User>
    where
        F: FnOnce(&mut User) + Send,
    {
        let mut users = self.users.write().await;
        let user = users.get_mut(username)?;
        f(user);
        user.updated_at = Utc::now();
        Some(user.clone())
    }
}

#[async_trait]
impl UserLookup for InMemoryUserRepository {
    async fn find_by_username(&self, username: &str) -> Result<Option<User>> {
        Ok(self.users.read().await.get(username).cloned())
    }
}

#[async_trait]
impl UserStore for InMemoryUserRepository {
    async fn create(&self, new_user: NewUser) -> Result<Option<User>> {
        let mut users = self.users.write().await;
        if users.contains_key(&new_user.username) {
            return Ok(None);
        }

        let now = Utc::now();
        let user = User {
            id: Uuid::new_v4(),
            username: new_user.username,
            password_hash: new_user.password_hash,
            email: new_user.email,
            birthday: new_user.birthday,
            favourite_movies: Vec::new(),
            created_at: now,
            updated_at: now,
        };
        users.insert(user.username.clone(), user.clone());
        Ok(Some(user))
    }

    async fn update_profile(&self, username: &str, updates: UpdateProfile) -> Result<Option<User>> {
        Ok(self
            .modify(username, |user| {
                if let Some(email) = updates.email {
                    user.email = email;
                }
                if let Some(birthday) = updates.birthday {
                    user.birthday = Some(birthday);
                }
            })
            .await)
    }

    async fn update_password(&self, username: &str, password_hash: &str) -> Result<bool> {
        let hash = password_hash.to_string();
        Ok(self
            .modify(username, |user| user.password_hash = hash)
            .await
            .is_some())
    }

    async fn add_favourite(&self, username: &str, movie_id: &str) -> Result<Option<User>> {
        Ok(self
            .modify(username, |user| {
                if !user.favourite_movies.iter().any(|m| m == movie_id) {
                    user.favourite_movies.push(movie_id.to_string());
                }
            })
            .await)
    }

    async fn remove_favourite(&self, username: &str, movie_id: &str) -> Result<Option<User>> {
        Ok(self
            .modify(username, |user| user.favourite_movies.retain(|m| m != movie_id))
            .await)
    }

    async fn delete(&self, username: &str) -> Result<bool> {
        Ok(self.users.write().await.remove(username).is_some())
    }

    async fn health_check(&self) -> Result<()> {
        Ok(())
    }
}

/// Movie catalog held in memory, sorted by title
#[derive(Debug, Default)]
pub struct InMemoryMovieRepository {
    movies: Vec<Movie>,
}

impl InMemoryMovieRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_movies(mut movies: Vec<Movie>) -> Self {
        movies.sort_by(|a, b| a.title.cmp(&b.title));
        Self { movies }
    }
}

#[async_trait]
impl MovieStore for InMemoryMovieRepository {
    async fn list(&self) -> Result<Vec<Movie>> {
        Ok(self.movies.clone())
    }

    async fn find_by_id(&self, id: &str) -> Result<Option<Movie>> {
        Ok(self.movies.iter().find(|m| m.id == id).cloned())
    }

    async fn find_by_title(&self, title: &str) -> Result<Option<Movie>> {
        Ok(self.movies.iter().find(|m| m.title == title).cloned())
    }

    async fn find_genre(&self, name: &str) -> Result<Option<Genre>> {
        Ok(self
            .movies
            .iter()
            .find(|m| m.genre.name == name)
            .map(|m| m.genre.clone()))
    }

    async fn find_director(&self, name: &str) -> Result<Option<Director>> {
        Ok(self
            .movies
            .iter()
            .find(|m| m.director.name == name)
            .map(|m| m.director.clone()))
    }

    async fn health_check(&self) -> Result<()> {
        Ok(())
    }
}

/// Starter catalog served when running without a database
pub fn sample_catalog() -> Vec<Movie> {
    let priyadarshan = Director {
        name: "Priyadarshan".to_string(),
        bio: "Indian film director and screenwriter, known for comedies in Hindi and Malayalam."
            .to_string(),
    };

    vec![
        Movie {
            id: "60f5a4f8c45e4c1b8c6f0001".to_string(),
            title: "Hera Pheri".to_string(),
            description: "Three broke men intercept a ransom call and try to cash in on it."
                .to_string(),
            genre: Genre {
                name: "Comedy".to_string(),
                description: "Films built to make the audience laugh.".to_string(),
            },
            director: priyadarshan.clone(),
            actors: vec![
                "Akshay Kumar".to_string(),
                "Suniel Shetty".to_string(),
                "Paresh Rawal".to_string(),
            ],
            image_path: None,
            featured: true,
        },
        Movie {
            id: "60f5a4f8c45e4c1b8c6f0002".to_string(),
            title: "Bhool Bhulaiyaa".to_string(),
            description: "A psychiatrist investigates the haunting of an ancestral mansion."
                .to_string(),
            genre: Genre {
                name: "Horror Comedy".to_string(),
                description: "Scares and jokes in equal measure.".to_string(),
            },
            director: priyadarshan,
            actors: vec!["Akshay Kumar".to_string(), "Vidya Balan".to_string()],
            image_path: None,
            featured: false,
        },
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    fn new_user(username: &str) -> NewUser {
        NewUser {
            username: username.to_string(),
            password_hash: "$2b$04$placeholderplaceholderplaceholderplaceholderplace".to_string(),
            email: format!("{}@example.com", username),
            birthday: None,
        }
    }

    #[tokio::test]
    async fn test_create_and_find() {
        let repo = InMemoryUserRepository::new();
        let created = repo.create(new_user("john_doe")).await.unwrap().unwrap();

        let found = repo.find_by_username("john_doe").await.unwrap().unwrap();
        assert_eq!(found.id, created.id);
        assert!(found.favourite_movies.is_empty());
    }

    #[tokio::test]
    async fn test_duplicate_username_rejected() {
        let repo = InMemoryUserRepository::new();
        assert!(repo.create(new_user("john_doe")).await.unwrap().is_some());
        assert!(repo.create(new_user("john_doe")).await.unwrap().is_none());
        assert_eq!(repo.len().await, 1);
    }

    #[tokio::test]
    async fn test_lookup_is_case_sensitive() {
        let repo = InMemoryUserRepository::new();
        repo.create(new_user("john_doe")).await.unwrap();

        assert!(repo.find_by_username("John_Doe").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_favourites_are_deduplicated_and_removable() {
        let repo = InMemoryUserRepository::new();
        repo.create(new_user("john_doe")).await.unwrap();

        repo.add_favourite("john_doe", "m1").await.unwrap();
        let user = repo.add_favourite("john_doe", "m1").await.unwrap().unwrap();
        assert_eq!(user.favourite_movies, vec!["m1".to_string()]);

        let user = repo.remove_favourite("john_doe", "m1").await.unwrap().unwrap();
        assert!(user.favourite_movies.is_empty());
    }

    #[tokio::test]
    async fn test_update_profile_keeps_unset_fields() {
        let repo = InMemoryUserRepository::new();
        repo.create(new_user("john_doe")).await.unwrap();

        let user = repo
            .update_profile("john_doe", UpdateProfile::default())
            .await
            .unwrap()
            .unwrap();
        assert_eq!(user.email, "john_doe@example.com");
    }

    #[tokio::test]
    async fn test_mutations_on_missing_user() {
        let repo = InMemoryUserRepository::new();

        assert!(repo.add_favourite("ghost_user", "m1").await.unwrap().is_none());
        assert!(!repo.update_password("ghost_user", "hash").await.unwrap());
        assert!(!repo.delete("ghost_user").await.unwrap());
    }

    #[tokio::test]
    async fn test_catalog_is_listed_by_title() {
        let repo = InMemoryMovieRepository::with_movies(sample_catalog());

        let titles: Vec<String> = repo.list().await.unwrap().into_iter().map(|m| m.title).collect();
        assert_eq!(titles, vec!["Bhool Bhulaiyaa", "Hera Pheri"]);
    }

    #[tokio::test]
    async fn test_catalog_lookups() {
        let repo = InMemoryMovieRepository::with_movies(sample_catalog());

        let movie = repo.find_by_title("Hera Pheri").await.unwrap().unwrap();
        assert_eq!(repo.find_by_id(&movie.id).await.unwrap(), Some(movie));
        assert!(repo.find_by_title("hera pheri").await.unwrap().is_none());

        let genre = repo.find_genre("Comedy").await.unwrap().unwrap();
        assert_eq!(genre.name, "Comedy");
        assert!(repo.find_genre("Western").await.unwrap().is_none());

        let director = repo.find_director("Priyadarshan").await.unwrap().unwrap();
        assert!(!director.bio.is_empty());
        assert!(repo.find_director("Nobody").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_empty_catalog() {
        let repo = InMemoryMovieRepository::new();
        assert!(repo.list().await.unwrap().is_empty());
        assert!(repo.find_by_id("60f5a4f8c45e4c1b8c6f0001").await.unwrap().is_none());
    }
}
