//! Integration tests for configuration resolution
//!
//! Tests that manipulate NCLEX_CONFIG are marked with #[serial] so they do not
//! race each other on the process environment.

use nclex_common::config::{ConfigResolver, TomlConfig, CONFIG_ENV_VAR};
use nclex_common::Error;
use serial_test::serial;
use std::env;
use std::io::Write;
use tempfile::NamedTempFile;

fn write_config(content: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().expect("Should create temp file");
    file.write_all(content.as_bytes()).expect("Should write config");
    file
}

#[test]
#[serial]
fn test_cli_path_loaded() {
    env::remove_var(CONFIG_ENV_VAR);
    let file = write_config(
        r#"
        [server]
        default_per_page = 20
        cors_origins = ["http://localhost:5173"]

        [client]
        api_base = "http://reviews.local/api"
        "#,
    );

    let config = ConfigResolver::new(Some(file.path().to_path_buf()))
        .load()
        .expect("Should load config");

    assert_eq!(config.server.default_per_page, 20);
    assert_eq!(config.server.cors_origins, vec!["http://localhost:5173"]);
    assert_eq!(config.client.api_base, "http://reviews.local/api");
    assert_eq!(config.client.timeout_secs, 30);
}

#[test]
#[serial]
fn test_env_var_used_without_cli() {
    let file = write_config("[client]\ntimeout_secs = 5\n");
    env::set_var(CONFIG_ENV_VAR, file.path());

    let config = ConfigResolver::new(None).load().expect("Should load config");
    assert_eq!(config.client.timeout_secs, 5);

    env::remove_var(CONFIG_ENV_VAR);
}

#[test]
#[serial]
fn test_cli_takes_precedence_over_env() {
    let env_file = write_config("[client]\ntimeout_secs = 5\n");
    let cli_file = write_config("[client]\ntimeout_secs = 9\n");
    env::set_var(CONFIG_ENV_VAR, env_file.path());

    let config = ConfigResolver::new(Some(cli_file.path().to_path_buf()))
        .load()
        .expect("Should load config");
    assert_eq!(config.client.timeout_secs, 9);

    env::remove_var(CONFIG_ENV_VAR);
}

#[test]
#[serial]
fn test_explicit_missing_file_is_error() {
    env::remove_var(CONFIG_ENV_VAR);
    let dir = tempfile::tempdir().unwrap();
    let missing = dir.path().join("nope.toml");

    let result = ConfigResolver::new(Some(missing)).load();
    assert!(matches!(result, Err(Error::Config(_))));
}

#[test]
#[serial]
fn test_invalid_toml_is_error() {
    env::remove_var(CONFIG_ENV_VAR);
    let file = write_config("[server\nbind_addr = ");

    let result = ConfigResolver::new(Some(file.path().to_path_buf())).load();
    assert!(matches!(result, Err(Error::Toml(_))));
}

#[test]
fn test_defaults() {
    let config = TomlConfig::default();
    assert_eq!(config.server.bind_addr, "127.0.0.1:8000");
    assert_eq!(config.client.api_base, "http://localhost:8000/api");
    assert!(config.server.cors_origins.is_empty());
}
