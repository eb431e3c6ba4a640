//! Configuration loading and root folder resolution
//!
//! Tests that touch TRESOR_ROOT_FOLDER are marked #[serial] so they do not
//! race on the process environment.

use serial_test::serial;
use std::env;
use std::path::{Path, PathBuf};
use tresor_common::config::{
    get_default_root_folder, resolve_root_folder, RootFolderInitializer, TomlConfig,
    DEFAULT_DATABASE_FILE, DEFAULT_PORT, ROOT_FOLDER_ENV,
};

#[test]
fn test_defaults_when_toml_empty() {
    let config = TomlConfig::from_toml_str("").unwrap();

    assert_eq!(config.bind_address, "127.0.0.1");
    assert_eq!(config.port, DEFAULT_PORT);
    assert_eq!(config.database_file, DEFAULT_DATABASE_FILE);
    assert_eq!(config.logging.level, "info");
    assert!(config.root_folder.is_none());
    assert_eq!(config.listen_address(), "127.0.0.1:5740");
}

#[test]
fn test_full_toml_parsed() {
    let config = TomlConfig::from_toml_str(
        r#"
        root_folder = "/srv/tresor"
        bind_address = "0.0.0.0"
        port = 8080
        database_file = "jeu.db"

        [logging]
        level = "debug"
        "#,
    )
    .unwrap();

    assert_eq!(config.root_folder, Some(PathBuf::from("/srv/tresor")));
    assert_eq!(config.listen_address(), "0.0.0.0:8080");
    assert_eq!(config.database_file, "jeu.db");
    assert_eq!(config.logging.level, "debug");
}

#[test]
fn test_invalid_toml_is_config_error() {
    let err = TomlConfig::from_toml_str("port = \"not a number\"").unwrap_err();
    assert!(err.to_string().contains("Configuration error"));
}

#[test]
fn test_explicit_missing_file_is_error() {
    let result = TomlConfig::load(Some(Path::new("/nonexistent/tresor/config.toml")));
    assert!(result.is_err());
}

#[test]
fn test_explicit_file_loaded() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config.toml");
    std::fs::write(&path, "port = 6000\n").unwrap();

    let (config, source) = TomlConfig::load(Some(&path)).unwrap();
    assert_eq!(config.port, 6000);
    assert_eq!(source, Some(path));
}

#[test]
#[serial]
fn test_cli_argument_wins() {
    env::set_var(ROOT_FOLDER_ENV, "/tmp/tresor-env");
    let config = TomlConfig {
        root_folder: Some(PathBuf::from("/tmp/tresor-toml")),
        ..TomlConfig::default()
    };

    let root = resolve_root_folder(Some(Path::new("/tmp/tresor-cli")), &config);
    assert_eq!(root, PathBuf::from("/tmp/tresor-cli"));

    env::remove_var(ROOT_FOLDER_ENV);
}

#[test]
#[serial]
fn test_env_var_beats_toml() {
    env::set_var(ROOT_FOLDER_ENV, "/tmp/tresor-env");
    let config = TomlConfig {
        root_folder: Some(PathBuf::from("/tmp/tresor-toml")),
        ..TomlConfig::default()
    };

    assert_eq!(resolve_root_folder(None, &config), PathBuf::from("/tmp/tresor-env"));

    env::remove_var(ROOT_FOLDER_ENV);
}

#[test]
#[serial]
fn test_toml_beats_default() {
    env::remove_var(ROOT_FOLDER_ENV);
    let config = TomlConfig {
        root_folder: Some(PathBuf::from("/tmp/tresor-toml")),
        ..TomlConfig::default()
    };

    assert_eq!(resolve_root_folder(None, &config), PathBuf::from("/tmp/tresor-toml"));
}

#[test]
#[serial]
fn test_compiled_default_used_last() {
    env::remove_var(ROOT_FOLDER_ENV);
    let root = resolve_root_folder(None, &TomlConfig::default());

    assert_eq!(root, get_default_root_folder());
    assert!(root.ends_with("tresor"));
}

#[test]
fn test_initializer_creates_directory_idempotently() {
    let dir = tempfile::tempdir().unwrap();
    let root = dir.path().join("nested").join("tresor");
    let initializer = RootFolderInitializer::new(root.clone());

    initializer.ensure_directory_exists().unwrap();
    initializer.ensure_directory_exists().unwrap();

    assert!(root.is_dir());
    assert_eq!(initializer.database_path("tresor.db"), root.join("tresor.db"));
}
