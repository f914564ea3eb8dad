//! # ItemHub Shared Library
//!
//! This crate contains the data layer and business logic used by the
//! ItemHub API server.
//!
//! ## Module Organization
//!
//! - `models`: Users and items with their queries
//! - `ownership`: User deactivation and item transfer
//! - `auth`: API token and password primitives, authentication middleware
//! - `db`: Connection pool and embedded migrations

pub mod auth;
pub mod db;
pub mod models;
pub mod ownership;

/// Current version of the ItemHub shared library
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
