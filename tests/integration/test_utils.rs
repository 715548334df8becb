//! Shared test utilities for integration tests
//!
//! Environment isolation for config loading, plus fixtures for repository
//! bundles served by the mock server.

use std::io::{Cursor, Write};
use std::sync::{Arc, Mutex};
use tempfile::TempDir;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};
use zip::write::FileOptions;
use zip::ZipWriter;

/// Global mutex to serialize environment variable access across all tests
static ENV_MUTEX: Mutex<()> = Mutex::new(());

const ISOLATED_VARS: &[&str] = &[
    "HOME",
    "XDG_CONFIG_HOME",
    "GENRUN_ENV",
    "GENRUN_REPOSITORY__BASE_URL",
    "GENRUN_REPOSITORY__REQUEST_TIMEOUT_SECS",
];

/// Environment variable state to restore after test
struct EnvState {
    saved: Vec<(&'static str, Option<String>)>,
}

impl EnvState {
    fn capture() -> Self {
        Self {
            saved: ISOLATED_VARS
                .iter()
                .map(|name| (*name, std::env::var(name).ok()))
                .collect(),
        }
    }

    fn restore(self) {
        for (name, value) in self.saved {
            match value {
                Some(orig) => std::env::set_var(name, orig),
                None => std::env::remove_var(name),
            }
        }
    }
}

/// Run `f` with HOME and XDG_CONFIG_HOME pointed into `test_dir` and all
/// genrun overrides cleared. `vars` are set for the duration of the call.
///
/// Uses a global mutex so parallel tests never observe each other's
/// environment.
pub fn with_isolated_env<F, R>(test_dir: &TempDir, vars: &[(&str, &str)], f: F) -> R
where
    F: FnOnce() -> R,
{
    let _guard = ENV_MUTEX.lock().unwrap_or_else(|e| e.into_inner());
    let env_state = EnvState::capture();

    let test_home = test_dir.path().join("home");
    let test_config_home = test_dir.path().join("xdg-config");
    std::fs::create_dir_all(&test_home).unwrap();
    std::fs::create_dir_all(&test_config_home).unwrap();

    for name in ISOLATED_VARS {
        std::env::remove_var(name);
    }
    std::env::set_var("HOME", test_home.to_str().unwrap());
    std::env::set_var("XDG_CONFIG_HOME", test_config_home.to_str().unwrap());
    for (name, value) in vars {
        std::env::set_var(name, value);
    }

    let result = f();

    env_state.restore();

    result
}

/// Build an in-memory zip from (entry name, content) pairs.
pub fn zip_bundle(entries: &[(&str, &str)]) -> Vec<u8> {
    let mut writer = ZipWriter::new(Cursor::new(Vec::new()));
    for (name, content) in entries {
        writer.start_file(*name, FileOptions::default()).unwrap();
        writer.write_all(content.as_bytes()).unwrap();
    }
    writer.finish().unwrap().into_inner()
}

/// Model bundle for `com.acme.{name}:1.0.0`: an information model with one
/// temperature function block that uses a unit enumeration.
pub fn sensor_bundle(name: &str) -> Vec<u8> {
    let enumeration = r#"{
        "kind": "enumeration",
        "id": { "namespace": "com.acme", "name": "Unit", "version": "1.0.0" },
        "literals": ["celsius", "fahrenheit"]
    }"#;
    let function_block = r#"{
        "kind": "function_block",
        "id": { "namespace": "com.acme", "name": "Temperature", "version": "1.0.0" },
        "status": [
            { "name": "value", "type": "float" },
            { "name": "unit", "type": { "namespace": "com.acme", "name": "Unit", "version": "1.0.0" } }
        ],
        "operations": [ { "name": "reset" } ]
    }"#;
    let information_model = format!(
        r#"{{
            "kind": "information_model",
            "id": {{ "namespace": "com.acme", "name": "{}", "version": "1.0.0" }},
            "display_name": "{} Device",
            "function_blocks": [
                {{ "name": "temperature", "type": {{ "namespace": "com.acme", "name": "Temperature", "version": "1.0.0" }} }}
            ]
        }}"#,
        name, name
    );
    let entry = format!("{}.infomodel", name);
    zip_bundle(&[
        ("Unit.type", enumeration),
        ("Temperature.fbmodel", function_block),
        (entry.as_str(), information_model.as_str()),
    ])
}

/// Mapping bundle holding one mapping document for `platform`.
pub fn mapping_bundle(mapping_name: &str, platform: &str) -> Vec<u8> {
    let mapping = format!(
        r#"{{
            "kind": "mapping",
            "id": {{ "namespace": "com.acme", "name": "{}", "version": "1.0.0" }},
            "target_platform": "{}",
            "rules": [
                {{ "sources": ["temperature"], "stereotype": "Object", "attributes": {{ "id": "3303" }} }}
            ]
        }}"#,
        mapping_name, platform
    );
    let entry = format!("{}.mapping", mapping_name);
    zip_bundle(&[(entry.as_str(), mapping.as_str())])
}

/// Entry names of a zip archive, in archive order.
pub fn zip_entry_names(bytes: &[u8]) -> Vec<String> {
    let mut archive = zip::ZipArchive::new(Cursor::new(bytes)).unwrap();
    (0..archive.len())
        .map(|i| archive.by_index(i).unwrap().name().to_string())
        .collect()
}

/// How the repository stub answers requests under one path prefix.
pub enum StubReply {
    Body(Vec<u8>),
    /// Accept the request and never answer.
    Silent,
}

/// Bare HTTP repository on a loopback port. Unlike mockito it can hold a
/// connection open without replying, so client timeouts can be exercised.
/// Paths without a route get a 404.
pub struct RepositoryStub {
    url: String,
}

impl RepositoryStub {
    pub async fn start(routes: Vec<(&'static str, StubReply)>) -> Self {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let url = format!("http://{}", listener.local_addr().unwrap());
        let routes = Arc::new(routes);
        tokio::spawn(async move {
            while let Ok((socket, _)) = listener.accept().await {
                tokio::spawn(serve_stub_request(socket, Arc::clone(&routes)));
            }
        });
        Self { url }
    }

    pub fn url(&self) -> String {
        self.url.clone()
    }
}

async fn serve_stub_request(mut socket: TcpStream, routes: Arc<Vec<(&'static str, StubReply)>>) {
    let mut request = Vec::new();
    let mut buf = [0u8; 1024];
    while !request.windows(4).any(|window| window == b"\r\n\r\n") {
        match socket.read(&mut buf).await {
            Ok(0) | Err(_) => return,
            Ok(n) => request.extend_from_slice(&buf[..n]),
        }
    }

    let head = String::from_utf8_lossy(&request).to_string();
    let path = head
        .split_whitespace()
        .nth(1)
        .and_then(|target| target.split('?').next())
        .unwrap_or("/");
    let reply = routes
        .iter()
        .find(|(prefix, _)| path.starts_with(*prefix))
        .map(|(_, reply)| reply);

    let (status, body): (&str, &[u8]) = match reply {
        Some(StubReply::Silent) => {
            // Keep the socket open until the runtime shuts down.
            std::future::pending::<()>().await;
            return;
        }
        Some(StubReply::Body(body)) => ("200 OK", body.as_slice()),
        None => ("404 Not Found", b"".as_slice()),
    };
    let response_head = format!(
        "HTTP/1.1 {}\r\nContent-Length: {}\r\nConnection: close\r\n\r\n",
        status,
        body.len()
    );
    let _ = socket.write_all(response_head.as_bytes()).await;
    let _ = socket.write_all(body).await;
    let _ = socket.shutdown().await;
}
