//! Database repositories
//!
//! Provides the user store behind the `UserLookup` capability the
//! credential verifier consumes, the account mutations the user routes
//! need, and the read-only movie catalog. Stores are injected through
//! `AppState`; there is no process-global user list.

use anyhow::Result;
use async_trait::async_trait;
use chrono::NaiveDate;
use movie_api_shared::{Director, Genre, Movie, User};

pub mod memory;
pub mod movie;
pub mod user;

pub use memory::{sample_catalog, InMemoryMovieRepository, InMemoryUserRepository};
pub use movie::PgMovieRepository;
pub use user::PgUserRepository;

/// Read-only lookup of credential records by identifier
#[async_trait]
pub trait UserLookup: Send + Sync {
    /// Find a user by exact, case-sensitive username
    async fn find_by_username(&self, username: &str) -> Result<Option<User>>;
}

/// Input for creating a user
#[derive(Debug, Clone)]
pub struct NewUser {
    pub username: String,
    pub password_hash: String,
    pub email: String,
    pub birthday: Option<NaiveDate>,
}

/// Input for updating a profile; `None` leaves a field unchanged
#[derive(Debug, Clone, Default)]
pub struct UpdateProfile {
    pub email: Option<String>,
    pub birthday: Option<NaiveDate>,
}

/// Full user store
///
/// Every mutation is keyed by username and returns `None`/`false` when no
/// such user exists.
#[async_trait]
pub trait UserStore: UserLookup {
    /// Create a user; `None` when the username is already taken
    async fn create(&self, new_user: NewUser) -> Result<Option<User>>;

    async fn update_profile(&self, username: &str, updates: UpdateProfile) -> Result<Option<User>>;

    async fn update_password(&self, username: &str, password_hash: &str) -> Result<bool>;

    /// Add a movie to the favourites; adding one already present is a no-op
    async fn add_favourite(&self, username: &str, movie_id: &str) -> Result<Option<User>>;

    async fn remove_favourite(&self, username: &str, movie_id: &str) -> Result<Option<User>>;

    async fn delete(&self, username: &str) -> Result<bool>;

    /// Check the backing storage is reachable
    async fn health_check(&self) -> Result<()>;
}

/// Read-only movie catalog
///
/// Title, genre and director lookups are exact and case-sensitive.
#[async_trait]
pub trait MovieStore: Send + Sync {
    /// All movies, ordered by title
    async fn list(&self) -> Result<Vec<Movie>>;

    async fn find_by_id(&self, id: &str) -> Result<Option<Movie>>;

    async fn find_by_title(&self, title: &str) -> Result<Option<Movie>>;

    /// Genre details from any movie of that genre
    async fn find_genre(&self, name: &str) -> Result<Option<Genre>>;

    /// Director details from any movie by that director
    async fn find_director(&self, name: &str) -> Result<Option<Director>>;

    async fn health_check(&self) -> Result<()>;
}
