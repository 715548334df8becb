//! Integration tests for the genrun binary.

use crate::integration::test_utils::zip_entry_names;
use std::fs;
use std::path::Path;
use std::process::{Command, Output};
use tempfile::TempDir;

fn write_config(dir: &Path) -> std::path::PathBuf {
    let path = dir.join("genrun.toml");
    fs::write(
        &path,
        r#"
[repository]
base_url = "http://127.0.0.1:9"
request_timeout_secs = 2
"#,
    )
    .unwrap();
    path
}

fn genrun(dir: &TempDir, args: &[&str]) -> Output {
    let config = write_config(dir.path());
    Command::new(env!("CARGO_BIN_EXE_genrun"))
        .current_dir(dir.path())
        .env_remove("GENRUN_REPOSITORY__BASE_URL")
        .env_remove("GENRUN_LOG")
        .arg("--config")
        .arg(&config)
        .args(["--log-level", "off"])
        .args(args)
        .output()
        .unwrap()
}

#[test]
fn test_generators_lists_builtin() {
    let dir = TempDir::new().unwrap();
    let output = genrun(&dir, &["generators", "--format", "json"]);

    assert!(output.status.success());
    let value: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(value["generators"][0]["key"], "model-dump");
}

#[test]
fn test_template_writes_artifact_zip() {
    let dir = TempDir::new().unwrap();
    let out_dir = dir.path().join("out");
    fs::create_dir_all(&out_dir).unwrap();

    let output = genrun(
        &dir,
        &[
            "template",
            "-g",
            "model-dump",
            "-p",
            "project=demo",
            "-o",
            out_dir.to_str().unwrap(),
        ],
    );

    assert!(output.status.success(), "{}", String::from_utf8_lossy(&output.stderr));
    let archive = fs::read(out_dir.join("model-dump_template.zip")).unwrap();
    assert_eq!(
        zip_entry_names(&archive),
        vec!["Template/model.json", "Template/invocation.json"]
    );
}

#[test]
fn test_unknown_generator_exits_with_not_found() {
    let dir = TempDir::new().unwrap();
    let output = genrun(&dir, &["generate", "com.acme.Sensor:1.0.0", "-g", "unknown"]);

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("Not found: Generator unknown not found"));
}

#[test]
fn test_unreachable_repository_reports_missing_model() {
    let dir = TempDir::new().unwrap();
    let output = genrun(&dir, &["generate", "com.acme.Sensor:1.0.0", "-g", "model-dump"]);

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("Model com.acme.Sensor:1.0.0 not found"));
}

#[test]
fn test_config_prints_effective_settings() {
    let dir = TempDir::new().unwrap();
    let output = genrun(&dir, &["config"]);

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("base_url = \"http://127.0.0.1:9\""));
    assert!(stdout.contains("request_timeout_secs = 2"));
}
