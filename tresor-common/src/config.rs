//! Configuration loading and root folder resolution
//!
//! Two tiers, as for every Trésors binary:
//! 1. **TOML bootstrap**: bind address, port, database file, logging level
//! 2. **Database runtime**: everything else, in the `settings` table
//!
//! Root folder resolution priority order:
//! 1. Command-line argument (highest priority)
//! 2. Environment variable `TRESOR_ROOT_FOLDER`
//! 3. TOML config file `root_folder`
//! 4. OS-dependent compiled default (fallback)

use crate::{Error, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Environment variable overriding the root folder
pub const ROOT_FOLDER_ENV: &str = "TRESOR_ROOT_FOLDER";

/// Default database file name inside the root folder
pub const DEFAULT_DATABASE_FILE: &str = "tresor.db";

/// Default HTTP port of the gamification service
pub const DEFAULT_PORT: u16 = 5740;

/// Bootstrap configuration loaded from TOML file
///
/// These settings cannot change during runtime. The service must restart
/// to pick up changes to the TOML file.
#[derive(Debug, Clone, Deserialize)]
pub struct TomlConfig {
    /// Root folder holding the database (optional)
    #[serde(default)]
    pub root_folder: Option<PathBuf>,

    /// Address the HTTP server binds to
    #[serde(default = "default_bind_address")]
    pub bind_address: String,

    /// HTTP server port
    #[serde(default = "default_port")]
    pub port: u16,

    /// Database file name, relative to the root folder
    #[serde(default = "default_database_file")]
    pub database_file: String,

    /// Logging configuration (optional)
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Logging configuration
#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

impl Default for TomlConfig {
    fn default() -> Self {
        Self {
            root_folder: None,
            bind_address: default_bind_address(),
            port: default_port(),
            database_file: default_database_file(),
            logging: LoggingConfig::default(),
        }
    }
}

fn default_bind_address() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    DEFAULT_PORT
}

fn default_database_file() -> String {
    DEFAULT_DATABASE_FILE.to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

impl TomlConfig {
    /// Parse configuration from TOML text
    pub fn from_toml_str(content: &str) -> Result<Self> {
        toml::from_str(content).map_err(|e| Error::Config(format!("Invalid TOML: {}", e)))
    }

    /// Load configuration
    ///
    /// An explicitly requested file must exist. When no file is requested,
    /// the platform config file is used if present, otherwise defaults.
    ///
    /// Returns the configuration and the file it was read from, if any.
    pub fn load(explicit: Option<&Path>) -> Result<(Self, Option<PathBuf>)> {
        let path = match explicit {
            Some(path) => {
                if !path.exists() {
                    return Err(Error::Config(format!(
                        "Config file not found: {}",
                        path.display()
                    )));
                }
                path.to_path_buf()
            }
            None => match default_config_path() {
                Some(path) if path.exists() => path,
                _ => return Ok((Self::default(), None)),
            },
        };

        let content = std::fs::read_to_string(&path)?;
        let config = Self::from_toml_str(&content)?;
        Ok((config, Some(path)))
    }

    /// Socket address string for the HTTP listener
    pub fn listen_address(&self) -> String {
        format!("{}:{}", self.bind_address, self.port)
    }
}

/// Platform configuration file path (`<config_dir>/tresor/config.toml`)
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("tresor").join("config.toml"))
}

/// Resolve the root folder following the priority order above
pub fn resolve_root_folder(cli_arg: Option<&Path>, config: &TomlConfig) -> PathBuf {
    // Priority 1: Command-line argument
    if let Some(path) = cli_arg {
        return path.to_path_buf();
    }

    // Priority 2: Environment variable
    if let Ok(path) = std::env::var(ROOT_FOLDER_ENV) {
        if !path.is_empty() {
            return PathBuf::from(path);
        }
    }

    // Priority 3: TOML config file
    if let Some(path) = &config.root_folder {
        return path.clone();
    }

    // Priority 4: OS-dependent compiled default
    get_default_root_folder()
}

/// Get OS-dependent default root folder path
pub fn get_default_root_folder() -> PathBuf {
    if cfg!(target_os = "windows") {
        // %LOCALAPPDATA%\tresor
        dirs::data_local_dir()
            .map(|d| d.join("tresor"))
            .unwrap_or_else(|| PathBuf::from("C:\\ProgramData\\tresor"))
    } else if cfg!(target_os = "macos") {
        // ~/Library/Application Support/tresor
        dirs::data_dir()
            .map(|d| d.join("tresor"))
            .unwrap_or_else(|| PathBuf::from("/Library/Application Support/tresor"))
    } else {
        // ~/.local/share/tresor (or /var/lib/tresor for system-wide)
        dirs::data_local_dir()
            .map(|d| d.join("tresor"))
            .unwrap_or_else(|| PathBuf::from("/var/lib/tresor"))
    }
}

/// Prepares the resolved root folder for use
#[derive(Debug, Clone)]
pub struct RootFolderInitializer {
    root_folder: PathBuf,
}

impl RootFolderInitializer {
    pub fn new(root_folder: PathBuf) -> Self {
        Self { root_folder }
    }

    pub fn root_folder(&self) -> &Path {
        &self.root_folder
    }

    /// Create the root folder if missing
    pub fn ensure_directory_exists(&self) -> Result<()> {
        if !self.root_folder.exists() {
            std::fs::create_dir_all(&self.root_folder)?;
            tracing::info!("Created root folder: {}", self.root_folder.display());
        }
        Ok(())
    }

    /// Database path inside the root folder
    pub fn database_path(&self, database_file: &str) -> PathBuf {
        self.root_folder.join(database_file)
    }
}
