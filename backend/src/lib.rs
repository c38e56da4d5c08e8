//! Movie API Backend Library
//!
//! Credential hashing, token issuance and route guarding for the movie
//! club API, plus the account and catalog routes built on them. Exposed
//! as a library for the integration tests.

pub mod auth;
pub mod config;
pub mod db;
pub mod error;
pub mod extract;
pub mod repositories;
pub mod routes;
pub mod services;
pub mod state;
