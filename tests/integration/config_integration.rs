//! Integration tests for Configuration System

use crate::integration::test_utils::with_isolated_env;
use genrun::config::{ConfigLoader, DEFAULT_REPOSITORY_URL, DEFAULT_REQUEST_TIMEOUT_SECS};
use genrun::error::ApiError;
use std::fs;
use tempfile::TempDir;

fn write_workspace_file(workspace: &TempDir, file_name: &str, contents: &str) {
    let config_dir = workspace.path().join("config");
    fs::create_dir_all(&config_dir).unwrap();
    fs::write(config_dir.join(file_name), contents).unwrap();
}

#[test]
fn test_defaults_without_any_files() {
    let temp_dir = TempDir::new().unwrap();
    let config = with_isolated_env(&temp_dir, &[], || ConfigLoader::load(temp_dir.path()).unwrap());

    assert_eq!(config.repository.base_url, DEFAULT_REPOSITORY_URL);
    assert_eq!(
        config.repository.request_timeout_secs,
        DEFAULT_REQUEST_TIMEOUT_SECS
    );
    assert_eq!(config.logging.level, "info");
}

#[test]
fn test_workspace_files_layer_in_order() {
    let temp_dir = TempDir::new().unwrap();
    write_workspace_file(
        &temp_dir,
        "config.toml",
        r#"
[repository]
base_url = "https://base.example.com"
request_timeout_secs = 12
"#,
    );
    write_workspace_file(
        &temp_dir,
        "staging.toml",
        r#"
[repository]
base_url = "https://staging.example.com"
"#,
    );

    let config = with_isolated_env(&temp_dir, &[("GENRUN_ENV", "staging")], || {
        ConfigLoader::load(temp_dir.path()).unwrap()
    });

    assert_eq!(config.repository.base_url, "https://staging.example.com");
    assert_eq!(config.repository.request_timeout_secs, 12);
}

#[test]
fn test_environment_overrides_files() {
    let temp_dir = TempDir::new().unwrap();
    write_workspace_file(
        &temp_dir,
        "config.toml",
        r#"
[repository]
base_url = "https://base.example.com"
"#,
    );

    let config = with_isolated_env(
        &temp_dir,
        &[
            ("GENRUN_REPOSITORY__BASE_URL", "https://env.example.com"),
            ("GENRUN_REPOSITORY__REQUEST_TIMEOUT_SECS", "3"),
        ],
        || ConfigLoader::load(temp_dir.path()).unwrap(),
    );

    assert_eq!(config.repository.base_url, "https://env.example.com");
    assert_eq!(config.repository.request_timeout_secs, 3);
}

#[cfg(target_os = "linux")]
#[test]
fn test_global_file_sits_below_workspace_files() {
    let temp_dir = TempDir::new().unwrap();
    let global_dir = temp_dir.path().join("xdg-config").join("genrun");
    fs::create_dir_all(&global_dir).unwrap();
    fs::write(
        global_dir.join("config.toml"),
        r#"
[repository]
base_url = "https://global.example.com"
username = "runner"
"#,
    )
    .unwrap();
    write_workspace_file(
        &temp_dir,
        "config.toml",
        r#"
[repository]
base_url = "https://workspace.example.com"
"#,
    );

    let config = with_isolated_env(&temp_dir, &[], || ConfigLoader::load(temp_dir.path()).unwrap());

    assert_eq!(config.repository.base_url, "https://workspace.example.com");
    assert_eq!(config.repository.username.as_deref(), Some("runner"));
}

#[test]
fn test_explicit_file_must_exist() {
    let temp_dir = TempDir::new().unwrap();
    let missing = temp_dir.path().join("nope.toml");

    let result = with_isolated_env(&temp_dir, &[], || ConfigLoader::load_from_file(&missing));
    assert!(matches!(result, Err(ApiError::ConfigError(_))));
}

#[test]
fn test_invalid_repository_url_fails_validation() {
    let temp_dir = TempDir::new().unwrap();
    let config_file = temp_dir.path().join("bad.toml");
    fs::write(
        &config_file,
        r#"
[repository]
base_url = "models.example.com"
"#,
    )
    .unwrap();

    let config = with_isolated_env(&temp_dir, &[], || {
        ConfigLoader::load_from_file(&config_file).unwrap()
    });
    assert!(matches!(config.validate(), Err(ApiError::ConfigError(_))));
}
