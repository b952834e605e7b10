//! CLI command implementations

pub mod auth;
pub mod health;
pub mod recipes;
pub mod saved;
