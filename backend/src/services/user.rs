//! User service for authentication and account management
//!
//! Password hashing and verification run on the blocking thread pool; the
//! token service is passed by reference with its keys pre-computed.

use crate::auth::{PasswordService, TokenService, Verifier};
use crate::error::ApiError;
use crate::repositories::{MovieStore, NewUser, UpdateProfile, UserStore};
use movie_api_shared::types::{
    ChangePasswordRequest, LoginResponse, RegisterRequest, UpdateProfileRequest, UserProfile,
};
use movie_api_shared::validation::{
    validate_birthday, validate_email, validate_movie_id, validate_password, validate_username,
};
use tracing::info;

/// User service for authentication operations
pub struct UserService;

impl UserService {
    /// Login with username and password
    ///
    /// The only place that verifies credentials and then issues a token.
    pub async fn login(
        verifier: &dyn Verifier,
        tokens: &TokenService,
        username: &str,
        password: &str,
    ) -> Result<LoginResponse, ApiError> {
        let identity = verifier.authenticate(username, password).await?;
        let token = tokens.issue(&identity).map_err(ApiError::Internal)?;

        Ok(LoginResponse {
            user: identity,
            token,
        })
    }

    /// Register a new user
    pub async fn register(
        store: &dyn UserStore,
        passwords: &PasswordService,
        req: RegisterRequest,
    ) -> Result<UserProfile, ApiError> {
        validate_username(&req.username).map_err(ApiError::Validation)?;
        validate_password(&req.password).map_err(ApiError::Validation)?;
        validate_email(&req.email).map_err(ApiError::Validation)?;
        if let Some(birthday) = req.birthday {
            validate_birthday(birthday).map_err(ApiError::Validation)?;
        }

        let password_hash = passwords
            .hash_async(req.password)
            .await
            .map_err(|e| ApiError::Internal(e.into()))?;

        let user = store
            .create(NewUser {
                username: req.username,
                password_hash,
                email: req.email,
                birthday: req.birthday,
            })
            .await?
            .ok_or_else(|| ApiError::Conflict("Username already exists".to_string()))?;

        info!(username = %user.username, "User registered");
        Ok(user.into())
    }

    /// Get the stored profile of a user
    pub async fn get_profile(store: &dyn UserStore, username: &str) -> Result<UserProfile, ApiError> {
        let user = store
            .find_by_username(username)
            .await?
            .ok_or_else(user_not_found)?;

        Ok(user.into())
    }

    /// Update email and/or birthday
    pub async fn update_profile(
        store: &dyn UserStore,
        username: &str,
        req: UpdateProfileRequest,
    ) -> Result<UserProfile, ApiError> {
        if let Some(email) = &req.email {
            validate_email(email).map_err(ApiError::Validation)?;
        }
        if let Some(birthday) = req.birthday {
            validate_birthday(birthday).map_err(ApiError::Validation)?;
        }

        let user = store
            .update_profile(
                username,
                UpdateProfile {
                    email: req.email,
                    birthday: req.birthday,
                },
            )
            .await?
            .ok_or_else(user_not_found)?;

        Ok(user.into())
    }

    /// Change a password after re-checking the current one
    ///
    /// Tokens issued before the change stay valid until they expire.
    pub async fn change_password(
        store: &dyn UserStore,
        verifier: &dyn Verifier,
        passwords: &PasswordService,
        username: &str,
        req: ChangePasswordRequest,
    ) -> Result<(), ApiError> {
        verifier.authenticate(username, &req.current_password).await?;
        validate_password(&req.new_password).map_err(ApiError::Validation)?;

        let password_hash = passwords
            .hash_async(req.new_password)
            .await
            .map_err(|e| ApiError::Internal(e.into()))?;

        if !store.update_password(username, &password_hash).await? {
            return Err(user_not_found());
        }

        info!(username = %username, "Password changed");
        Ok(())
    }

    /// Add a catalog movie to the favourites list
    pub async fn add_favourite(
        store: &dyn UserStore,
        movies: &dyn MovieStore,
        username: &str,
        movie_id: &str,
    ) -> Result<UserProfile, ApiError> {
        validate_movie_id(movie_id).map_err(ApiError::Validation)?;
        if movies.find_by_id(movie_id).await?.is_none() {
            return Err(ApiError::NotFound(format!("Movie '{}' not found", movie_id)));
        }

        let user = store
            .add_favourite(username, movie_id)
            .await?
            .ok_or_else(user_not_found)?;

        Ok(user.into())
    }

    /// Remove a movie from the favourites list
    pub async fn remove_favourite(
        store: &dyn UserStore,
        username: &str,
        movie_id: &str,
    ) -> Result<UserProfile, ApiError> {
        validate_movie_id(movie_id).map_err(ApiError::Validation)?;

        let user = store
            .remove_favourite(username, movie_id)
            .await?
            .ok_or_else(user_not_found)?;

        Ok(user.into())
    }

    /// Delete an account
    ///
    /// Outstanding tokens are not revoked; they keep passing the auth
    /// middleware until expiry but no longer resolve to a stored user.
    pub async fn deregister(store: &dyn UserStore, username: &str) -> Result<(), ApiError> {
        if !store.delete(username).await? {
            return Err(user_not_found());
        }

        info!(username = %username, "User deregistered");
        Ok(())
    }
}

fn user_not_found() -> ApiError {
    ApiError::NotFound("User not found".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::{HashAlgorithm, LocalVerifier, MIN_BCRYPT_COST};
    use crate::repositories::{
        sample_catalog, InMemoryMovieRepository, InMemoryUserRepository, UserLookup,
    };
    use chrono::NaiveDate;
    use secrecy::Secret;
    use std::sync::Arc;

    const HERA_PHERI: &str = "60f5a4f8c45e4c1b8c6f0001";

    struct Fixture {
        store: Arc<InMemoryUserRepository>,
        movies: InMemoryMovieRepository,
        passwords: PasswordService,
        verifier: LocalVerifier<InMemoryUserRepository>,
        tokens: TokenService,
    }

    fn fixture() -> Fixture {
        let store = Arc::new(InMemoryUserRepository::new());
        let passwords = PasswordService::new(HashAlgorithm::Bcrypt, MIN_BCRYPT_COST).unwrap();
        let verifier = LocalVerifier::new(Arc::clone(&store), &passwords).unwrap();
        let tokens = TokenService::new(&Secret::new("service-test-secret".to_string()), 3600).unwrap();
        Fixture {
            store,
            movies: InMemoryMovieRepository::with_movies(sample_catalog()),
            passwords,
            verifier,
            tokens,
        }
    }

    fn register_request(username: &str) -> RegisterRequest {
        RegisterRequest {
            username: username.to_string(),
            password: "Test@1234".to_string(),
            email: "john.doe@example.com".to_string(),
            birthday: NaiveDate::from_ymd_opt(1990, 5, 15),
        }
    }

    #[tokio::test]
    async fn test_register_then_login_issues_verifiable_token() {
        let f = fixture();
        UserService::register(f.store.as_ref(), &f.passwords, register_request("john_doe"))
            .await
            .unwrap();

        let response = UserService::login(&f.verifier, &f.tokens, "john_doe", "Test@1234")
            .await
            .unwrap();

        assert_eq!(response.user.username, "john_doe");
        assert_eq!(f.tokens.verify(&response.token).unwrap(), response.user);
    }

    #[tokio::test]
    async fn test_register_stores_hash_not_password() {
        let f = fixture();
        UserService::register(f.store.as_ref(), &f.passwords, register_request("john_doe"))
            .await
            .unwrap();

        let user = f.store.find_by_username("john_doe").await.unwrap().unwrap();
        assert_ne!(user.password_hash, "Test@1234");
        assert!(user.password_hash.starts_with("$2b$"));
    }

    #[tokio::test]
    async fn test_duplicate_registration_conflicts() {
        let f = fixture();
        UserService::register(f.store.as_ref(), &f.passwords, register_request("john_doe"))
            .await
            .unwrap();

        let result =
            UserService::register(f.store.as_ref(), &f.passwords, register_request("john_doe")).await;
        assert!(matches!(result, Err(ApiError::Conflict(_))));
    }

    #[tokio::test]
    async fn test_register_rejects_invalid_input() {
        let f = fixture();
        let mut req = register_request("john_doe");
        req.email = "not-an-email".to_string();

        let result = UserService::register(f.store.as_ref(), &f.passwords, req).await;
        assert!(matches!(result, Err(ApiError::Validation(_))));
        assert!(f.store.is_empty().await);
    }

    #[tokio::test]
    async fn test_login_failure_is_invalid_credentials() {
        let f = fixture();
        UserService::register(f.store.as_ref(), &f.passwords, register_request("john_doe"))
            .await
            .unwrap();

        let wrong = UserService::login(&f.verifier, &f.tokens, "john_doe", "nope").await;
        let unknown = UserService::login(&f.verifier, &f.tokens, "nobody_here", "nope").await;

        assert!(matches!(wrong, Err(ApiError::InvalidCredentials)));
        assert!(matches!(unknown, Err(ApiError::InvalidCredentials)));
    }

    #[tokio::test]
    async fn test_change_password_requires_current_password() {
        let f = fixture();
        UserService::register(f.store.as_ref(), &f.passwords, register_request("john_doe"))
            .await
            .unwrap();

        let rejected = UserService::change_password(
            f.store.as_ref(),
            &f.verifier,
            &f.passwords,
            "john_doe",
            ChangePasswordRequest {
                current_password: "wrong".to_string(),
                new_password: "NewPass@5678".to_string(),
            },
        )
        .await;
        assert!(matches!(rejected, Err(ApiError::InvalidCredentials)));

        UserService::change_password(
            f.store.as_ref(),
            &f.verifier,
            &f.passwords,
            "john_doe",
            ChangePasswordRequest {
                current_password: "Test@1234".to_string(),
                new_password: "NewPass@5678".to_string(),
            },
        )
        .await
        .unwrap();

        assert!(UserService::login(&f.verifier, &f.tokens, "john_doe", "NewPass@5678")
            .await
            .is_ok());
        assert!(UserService::login(&f.verifier, &f.tokens, "john_doe", "Test@1234")
            .await
            .is_err());
    }

    #[tokio::test]
    async fn test_favourites_and_deregistration() {
        let f = fixture();
        UserService::register(f.store.as_ref(), &f.passwords, register_request("john_doe"))
            .await
            .unwrap();

        let profile = UserService::add_favourite(f.store.as_ref(), &f.movies, "john_doe", HERA_PHERI)
            .await
            .unwrap();
        assert_eq!(profile.favourite_movies, vec![HERA_PHERI.to_string()]);

        let profile = UserService::remove_favourite(f.store.as_ref(), "john_doe", HERA_PHERI)
            .await
            .unwrap();
        assert!(profile.favourite_movies.is_empty());

        UserService::deregister(f.store.as_ref(), "john_doe").await.unwrap();
        let result = UserService::get_profile(f.store.as_ref(), "john_doe").await;
        assert!(matches!(result, Err(ApiError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_favourite_must_exist_in_catalog() {
        let f = fixture();
        UserService::register(f.store.as_ref(), &f.passwords, register_request("john_doe"))
            .await
            .unwrap();

        let result =
            UserService::add_favourite(f.store.as_ref(), &f.movies, "john_doe", "60f5a4f8c45e4c1b8c6f9999")
                .await;
        assert!(matches!(result, Err(ApiError::NotFound(_))));

        let user = f.store.find_by_username("john_doe").await.unwrap().unwrap();
        assert!(user.favourite_movies.is_empty());
    }

    #[tokio::test]
    async fn test_register_rejects_password_beyond_bcrypt_limit() {
        let f = fixture();
        let mut req = register_request("john_doe");
        req.password = format!("{}correct-suffix", "a".repeat(72));

        let result = UserService::register(f.store.as_ref(), &f.passwords, req).await;
        assert!(matches!(result, Err(ApiError::Validation(_))));
        assert!(f.store.is_empty().await);
    }
}
