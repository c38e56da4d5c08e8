//! PostgreSQL user repository

use super::{NewUser, UpdateProfile, UserLookup, UserStore};
use anyhow::Result;
use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use movie_api_shared::User;
use sqlx::PgPool;
use uuid::Uuid;

/// User record from database
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct UserRecord {
    pub id: Uuid,
    pub username: String,
    pub password_hash: String,
    pub email: String,
    pub birthday: Option<NaiveDate>,
    pub favourite_movies: Vec<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<UserRecord> for User {
    fn from(record: UserRecord) -> Self {
        Self {
            id: record.id,
            username: record.username,
            password_hash: record.password_hash,
            email: record.email,
            birthday: record.birthday,
            favourite_movies: record.favourite_movies,
            created_at: record.created_at,
            updated_at: record.updated_at,
        }
    }
}

const USER_COLUMNS: &str =
    "id, username, password_hash, email, birthday, favourite_movies, created_at, updated_at";

/// User repository for database operations
#[derive(Debug, Clone)]
pub struct PgUserRepository {
    pool: PgPool,
}

impl PgUserRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl UserLookup for PgUserRepository {
    async fn find_by_username(&self, username: &str) -> Result<Option<User>> {
        let user = sqlx::query_as::<_, UserRecord>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE username = $1"
        ))
        .bind(username)
        .fetch_optional(&self.pool)
        .await?;

        Ok(user.map(User::from))
    }
}

#[async_trait]
impl UserStore for PgUserRepository {
    async fn create(&self, new_user: NewUser) -> Result<Option<User>> {
        let result = sqlx::query_as::<_, UserRecord>(&format!(
            r#"
            INSERT INTO users (id, username, password_hash, email, birthday)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING {USER_COLUMNS}
            "#
        ))
        .bind(Uuid::new_v4())
        .bind(&new_user.username)
        .bind(&new_user.password_hash)
        .bind(&new_user.email)
        .bind(new_user.birthday)
        .fetch_one(&self.pool)
        .await;

        match result {
            Ok(user) => Ok(Some(user.into())),
            Err(sqlx::Error::Database(e)) if e.is_unique_violation() => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    async fn update_profile(&self, username: &str, updates: UpdateProfile) -> Result<Option<User>> {
        let user = sqlx::query_as::<_, UserRecord>(&format!(
            r#"
            UPDATE users SET
                email = COALESCE($2, email),
                birthday = COALESCE($3, birthday),
                updated_at = NOW()
            WHERE username = $1
            RETURNING {USER_COLUMNS}
            "#
        ))
        .bind(username)
        .bind(updates.email)
        .bind(updates.birthday)
        .fetch_optional(&self.pool)
        .await?;

        Ok(user.map(User::from))
    }

    async fn update_password(&self, username: &str, password_hash: &str) -> Result<bool> {
        let result = sqlx::query(
            r#"
            UPDATE users SET password_hash = $2, updated_at = NOW()
            WHERE username = $1
            "#,
        )
        .bind(username)
        .bind(password_hash)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn add_favourite(&self, username: &str, movie_id: &str) -> Result<Option<User>> {
        let user = sqlx::query_as::<_, UserRecord>(&format!(
            r#"
            UPDATE users SET
                favourite_movies = CASE
                    WHEN $2 = ANY(favourite_movies) THEN favourite_movies
                    ELSE array_append(favourite_movies, $2)
                END,
                updated_at = NOW()
            WHERE username = $1
            RETURNING {USER_COLUMNS}
            "#
        ))
        .bind(username)
        .bind(movie_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(user.map(User::from))
    }

    async fn remove_favourite(&self, username: &str, movie_id: &str) -> Result<Option<User>> {
        let user = sqlx::query_as::<_, UserRecord>(&format!(
            r#"
            UPDATE users SET
                favourite_movies = array_remove(favourite_movies, $2),
                updated_at = NOW()
            WHERE username = $1
            RETURNING {USER_COLUMNS}
            "#
        ))
        .bind(username)
        .bind(movie_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(user.map(User::from))
    }

    async fn delete(&self, username: &str) -> Result<bool> {
        let result = sqlx::query("DELETE FROM users WHERE username = $1")
            .bind(username)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn health_check(&self) -> Result<()> {
        crate::db::health_check(&self.pool).await
    }
}
