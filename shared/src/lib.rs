//! Movie API Shared Library
//!
//! Wire types, the identity model, the authentication error taxonomy and
//! input validation shared by the backend and its clients.

pub mod errors;
pub mod models;
pub mod types;
pub mod validation;

// Re-export commonly used items
pub use errors::*;
pub use types::*;

pub use models::{Director, Genre, Identity, Movie, User};
