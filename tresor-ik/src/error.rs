//! Error types for tresor-ik
//!
//! These abort the run (exit code 2). Problems inside locale files are
//! findings, not errors.

use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CheckError {
    /// Specified path does not exist
    #[error("Path not found: {0}")]
    PathNotFound(PathBuf),

    /// Path exists but is not a directory
    #[error("Not a directory: {0}")]
    NotADirectory(PathBuf),

    /// No `<base>.json` in the locales directory
    #[error("Base locale '{lang}' not found in {dir}")]
    BaseLocaleMissing { lang: String, dir: PathBuf },

    /// The base locale file exists but cannot be used
    #[error("Base locale '{0}' is not valid JSON")]
    BaseLocaleInvalid(String),

    #[error("I/O error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to render report: {0}")]
    Render(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, CheckError>;

/// Fail unless `path` is an existing directory
pub fn require_dir(path: &std::path::Path) -> Result<()> {
    if !path.exists() {
        return Err(CheckError::PathNotFound(path.to_path_buf()));
    }
    if !path.is_dir() {
        return Err(CheckError::NotADirectory(path.to_path_buf()));
    }
    Ok(())
}
