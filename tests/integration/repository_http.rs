//! Integration tests for the HTTP repository collaborators against a mock server.

use crate::integration::test_utils::{RepositoryStub, StubReply};
use genrun::config::RepositoryConfig;
use genrun::repository::attachment::IMPORTED_TAG_ID;
use genrun::repository::{AttachmentClient, HttpAttachmentClient, HttpFetcher, RemoteFetcher};
use genrun::types::ModelCoordinate;
use mockito::{Matcher, Server};
use std::time::{Duration, Instant};

fn repository(base_url: String) -> RepositoryConfig {
    RepositoryConfig {
        base_url,
        ..RepositoryConfig::default()
    }
}

fn sensor() -> ModelCoordinate {
    ModelCoordinate::new("com.acme", "Sensor", "1.0.0").unwrap()
}

#[tokio::test]
async fn test_fetch_passes_authorization_header() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("GET", "/bundle")
        .match_header("authorization", "Bearer abc")
        .with_status(200)
        .with_body("payload")
        .create_async()
        .await;

    let fetcher = HttpFetcher::new(&repository(server.url())).unwrap();
    let body = fetcher
        .fetch(&format!("{}/bundle", server.url()), Some("Bearer abc"))
        .await;

    assert_eq!(body.as_deref(), Some(&b"payload"[..]));
    mock.assert_async().await;
}

#[tokio::test]
async fn test_fetch_without_header_sends_none() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("GET", "/bundle")
        .match_header("authorization", Matcher::Missing)
        .with_status(200)
        .with_body("payload")
        .create_async()
        .await;

    let fetcher = HttpFetcher::new(&repository(server.url())).unwrap();
    assert!(fetcher
        .fetch(&format!("{}/bundle", server.url()), None)
        .await
        .is_some());
    mock.assert_async().await;
}

#[tokio::test]
async fn test_fetch_failures_are_absent() {
    let mut server = Server::new_async().await;
    server
        .mock("GET", "/missing")
        .with_status(404)
        .create_async()
        .await;
    server
        .mock("GET", "/broken")
        .with_status(500)
        .with_body("oops")
        .create_async()
        .await;
    server
        .mock("GET", "/empty")
        .with_status(200)
        .create_async()
        .await;

    let fetcher = HttpFetcher::new(&repository(server.url())).unwrap();
    for path in ["/missing", "/broken", "/empty"] {
        let url = format!("{}{}", server.url(), path);
        assert!(fetcher.fetch(&url, None).await.is_none(), "{}", path);
    }

    // Nothing listens on port 9 locally
    assert!(fetcher.fetch("http://127.0.0.1:9/x", None).await.is_none());
}

#[tokio::test]
async fn test_fetch_gives_up_on_silent_server() {
    let stub = RepositoryStub::start(vec![("/", StubReply::Silent)]).await;
    let mut config = repository(stub.url());
    config.request_timeout_secs = 1;
    let fetcher = HttpFetcher::new(&config).unwrap();

    let started = Instant::now();
    let body = fetcher.fetch(&format!("{}/bundle", stub.url()), None).await;

    assert!(body.is_none());
    assert!(
        started.elapsed() < Duration::from_secs(5),
        "fetch took {:?}",
        started.elapsed()
    );
}

#[tokio::test]
async fn test_attachment_client_lists_and_downloads_with_basic_auth() {
    let mut server = Server::new_async().await;
    let listing = format!(
        r#"[
            {{ "filename": "notes.txt", "tags": [] }},
            {{ "filename": "sensor spec.xml", "tags": [ {{ "id": "{}", "label": "Imported" }} ] }}
        ]"#,
        IMPORTED_TAG_ID
    );
    // "runner:secret" in base64
    let auth = "Basic cnVubmVyOnNlY3JldA==";
    let list_mock = server
        .mock("GET", "/api/v1/attachments/com.acme.Sensor:1.0.0")
        .match_header("authorization", auth)
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(listing)
        .create_async()
        .await;
    let file_mock = server
        .mock(
            "GET",
            Matcher::Regex(r"^/api/v1/attachments/com\.acme\.Sensor:1\.0\.0/files/sensor%20spec\.xml$".to_string()),
        )
        .match_header("authorization", auth)
        .with_status(200)
        .with_body("<sensor/>")
        .create_async()
        .await;

    let mut config = repository(server.url());
    config.username = Some("runner".to_string());
    config.password = Some("secret".to_string());
    let client = HttpAttachmentClient::new(&config).unwrap();

    let attachments = client.list_attachments(&sensor()).await.unwrap();
    assert_eq!(attachments.len(), 2);
    assert!(!attachments[0].is_imported());
    assert!(attachments[1].is_imported());

    let content = client
        .download_attachment(&sensor(), &attachments[1].filename)
        .await
        .unwrap();
    assert_eq!(content, b"<sensor/>");

    list_mock.assert_async().await;
    file_mock.assert_async().await;
}

#[tokio::test]
async fn test_attachment_client_reports_errors() {
    let mut server = Server::new_async().await;
    server
        .mock("GET", "/api/v1/attachments/com.acme.Sensor:1.0.0")
        .with_status(403)
        .create_async()
        .await;

    let client = HttpAttachmentClient::new(&repository(server.url())).unwrap();
    assert!(client.list_attachments(&sensor()).await.is_err());
}
