//! tresor-ik library - translation key checker
//!
//! Compares the locale files of the web front end with each other and with
//! the keys its source code actually uses. Run in CI; a non-zero exit code
//! fails the build.

pub mod error;
pub mod locales;
pub mod report;
pub mod scanner;

use std::path::PathBuf;

pub use error::{CheckError, Result};
pub use report::{build_report, Finding, Format, Report, Status};

/// Inputs of one check run
#[derive(Debug, Clone)]
pub struct CheckOptions {
    pub locales_dir: PathBuf,
    pub source_dirs: Vec<PathBuf>,
    /// Reference language; other locales are compared against it
    pub base: String,
}

/// Load locales, scan sources and build the report
pub fn run_check(options: &CheckOptions) -> Result<Report> {
    let locales = locales::load_locales(&options.locales_dir)?;

    if locales.get(&options.base).is_none() {
        if locales.invalid.iter().any(|l| l.lang == options.base) {
            return Err(CheckError::BaseLocaleInvalid(options.base.clone()));
        }
        return Err(CheckError::BaseLocaleMissing {
            lang: options.base.clone(),
            dir: options.locales_dir.clone(),
        });
    }

    let usages = scanner::scan_sources(&options.source_dirs)?;
    Ok(build_report(&options.base, &locales, &usages))
}
