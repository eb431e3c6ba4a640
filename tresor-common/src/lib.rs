//! # Trésors Common Library
//!
//! Shared code for the Trésors crates:
//! - Database schema, migrations and models
//! - Configuration loading and root folder resolution
//! - API request signing and shared response types
//! - CSV export
//! - Time utilities

pub mod api;
pub mod config;
pub mod csv;
pub mod db;
pub mod error;
pub mod time;

pub use error::{Error, Result};
