//! Database models and queries

pub mod models;

#[cfg(feature = "sqlx")]
pub mod catalog;
#[cfg(feature = "sqlx")]
pub mod init;
#[cfg(feature = "sqlx")]
pub mod migrations;
#[cfg(feature = "sqlx")]
pub mod settings;

#[cfg(feature = "sqlx")]
pub use init::*;
pub use models::*;
#[cfg(feature = "sqlx")]
pub use settings::{get_setting, set_setting};
