//! Input validation functions
//!
//! This module provides validation utilities for user input.
//! Uses both custom validators and the `validator` crate.

use chrono::NaiveDate;
use once_cell::sync::Lazy;
use regex_lite::Regex;
use validator::ValidateEmail;

static USERNAME_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[A-Za-z0-9_]+$").expect("username pattern is valid")
});

/// Validate username format
///
/// Usernames are case-sensitive identifiers: 5 to 32 characters of ASCII
/// letters, digits and underscores.
pub fn validate_username(username: &str) -> Result<(), String> {
    if username.is_empty() {
        return Err("Username cannot be empty".to_string());
    }
    if username.len() < 5 {
        return Err("Username must be at least 5 characters".to_string());
    }
    if username.len() > 32 {
        return Err("Username too long".to_string());
    }
    if !USERNAME_PATTERN.is_match(username) {
        return Err("Username contains non alphanumeric characters".to_string());
    }
    Ok(())
}

/// Validate email format
pub fn validate_email(email: &str) -> Result<(), String> {
    if email.is_empty() {
        return Err("Email cannot be empty".to_string());
    }
    if email.len() > 255 {
        return Err("Email too long".to_string());
    }
    if !email.validate_email() {
        return Err("Invalid email format".to_string());
    }
    Ok(())
}

/// Longest accepted password, in bytes; bcrypt ignores anything after it
pub const MAX_PASSWORD_BYTES: usize = 72;

/// Validate password strength
pub fn validate_password(password: &str) -> Result<(), String> {
    if password.len() < 8 {
        return Err("Password must be at least 8 characters".to_string());
    }
    if password.len() > MAX_PASSWORD_BYTES {
        return Err("Password must be at most 72 bytes".to_string());
    }
    Ok(())
}

/// Validate birthday
/// Must not be in the future
pub fn validate_birthday(birthday: NaiveDate) -> Result<(), String> {
    let today = chrono::Utc::now().date_naive();
    if birthday > today {
        return Err("Birthday cannot be in the future".to_string());
    }
    Ok(())
}

/// Validate a movie identifier used in favourite lists
pub fn validate_movie_id(movie_id: &str) -> Result<(), String> {
    if movie_id.is_empty() {
        return Err("Movie id cannot be empty".to_string());
    }
    if movie_id.len() > 64 {
        return Err("Movie id too long".to_string());
    }
    if movie_id.chars().any(char::is_whitespace) {
        return Err("Movie id cannot contain whitespace".to_string());
    }
    Ok(())
}
