//! Configuration module for the tokensmith build
//!
//! Provides types and parsing for `tokens.toml` project configuration.

pub mod loader;
pub mod schema;

pub use schema::*;
