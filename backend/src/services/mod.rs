//! Business logic services
//!
//! Services encapsulate business logic and coordinate between
//! repositories and the authentication layer.

pub mod movie;
pub mod user;

pub use movie::MovieService;
pub use user::UserService;
