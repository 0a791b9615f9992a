//! # trackdb common library
//!
//! Shared code for the track catalog binaries:
//! - Error type
//! - Bootstrap configuration and database path resolution
//! - Database connection, schema migrations and the `Track` row model

pub mod config;
pub mod db;
pub mod error;

pub use db::models::Track;
pub use error::{Error, Result};
