//! Integration tests for ontology download and caching
//!
//! These tests run the fetcher against a mock HTTP server and cover:
//! - Cache population (document + metadata)
//! - Version probing with ranged requests
//! - Refresh on version change, expiry and checksum mismatch
//! - Update checks

mod helpers;

use biokg_ingest::ontology::{CacheMeta, FetchConfig, OntologyError, OntologyFetcher};
use chrono::{Duration, Utc};
use tempfile::TempDir;
use wiremock::{
    matchers::{header, header_exists, method, path},
    Mock, MockServer, ResponseTemplate,
};

const DOCUMENT_PATH: &str = "/obo/cl.owl";

fn fetcher(cache_dir: &std::path::Path) -> OntologyFetcher {
    OntologyFetcher::new(FetchConfig {
        cache_dir: Some(cache_dir.to_path_buf()),
        ..FetchConfig::default()
    })
    .unwrap()
}

/// Serve `body` for both the version check and the full download, expecting
/// the given number of each.
async fn mount_document(server: &MockServer, body: &str, head_requests: u64, downloads: u64) {
    Mock::given(method("GET"))
        .and(path(DOCUMENT_PATH))
        .and(header("range", "bytes=0-65535"))
        .respond_with(ResponseTemplate::new(206).set_body_string(body))
        .with_priority(1)
        .expect(head_requests)
        .named("version check")
        .mount(server)
        .await;

    Mock::given(method("GET"))
        .and(path(DOCUMENT_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_string(body))
        .expect(downloads)
        .named("full download")
        .mount(server)
        .await;
}

// ============================================================================
// Cache population
// ============================================================================

#[tokio::test]
async fn test_download_populates_cache() {
    let server = MockServer::start().await;
    mount_document(&server, &helpers::cl_document("2024-01-04"), 0, 1).await;

    let dir = TempDir::new().unwrap();
    let fetcher = fetcher(dir.path());
    let url = format!("{}{}", server.uri(), DOCUMENT_PATH);

    let loaded = fetcher.load("cl", &url).await.unwrap();
    assert!(!loaded.from_cache);
    assert_eq!(loaded.version, "2024-01-04");
    assert!(!loaded.graph.is_empty());

    assert!(dir.path().join("cl.owl").exists());
    let meta = CacheMeta::read(&dir.path().join("cl_meta.json")).unwrap();
    assert_eq!(meta.version, "2024-01-04");
    assert_eq!(meta.url, url);
    assert_eq!(meta.hash.len(), 64);
}

#[tokio::test]
async fn test_fresh_cache_only_reads_remote_head() {
    let server = MockServer::start().await;
    mount_document(&server, &helpers::cl_document("2024-01-04"), 1, 1).await;

    let dir = TempDir::new().unwrap();
    let fetcher = fetcher(dir.path());
    let url = format!("{}{}", server.uri(), DOCUMENT_PATH);

    let first = fetcher.load("cl", &url).await.unwrap();
    let second = fetcher.load("cl", &url).await.unwrap();

    assert!(!first.from_cache);
    assert!(second.from_cache);
    assert_eq!(second.version, "2024-01-04");
    assert_eq!(second.graph.len(), first.graph.len());
}

#[tokio::test]
async fn test_unreachable_remote_head_keeps_fresh_cache() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path(DOCUMENT_PATH))
        .and(header_exists("range"))
        .respond_with(ResponseTemplate::new(503))
        .with_priority(1)
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path(DOCUMENT_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_string(helpers::cl_document("2024-01-04")))
        .expect(1)
        .mount(&server)
        .await;

    let dir = TempDir::new().unwrap();
    let fetcher = fetcher(dir.path());
    let url = format!("{}{}", server.uri(), DOCUMENT_PATH);

    fetcher.load("cl", &url).await.unwrap();
    let cached = fetcher.load("cl", &url).await.unwrap();
    assert!(cached.from_cache);
}

// ============================================================================
// Refresh
// ============================================================================

#[tokio::test]
async fn test_version_change_triggers_refetch() {
    let server = MockServer::start().await;
    mount_document(&server, &helpers::cl_document("2024-01-04"), 0, 1).await;

    let dir = TempDir::new().unwrap();
    let fetcher = fetcher(dir.path());
    let url = format!("{}{}", server.uri(), DOCUMENT_PATH);

    fetcher.load("cl", &url).await.unwrap();
    server.verify().await;
    server.reset().await;

    mount_document(&server, &helpers::cl_document("2024-02-13"), 1, 1).await;

    let refreshed = fetcher.load("cl", &url).await.unwrap();
    assert!(!refreshed.from_cache);
    assert_eq!(refreshed.version, "2024-02-13");

    let meta = CacheMeta::read(&dir.path().join("cl_meta.json")).unwrap();
    assert_eq!(meta.version, "2024-02-13");
}

#[tokio::test]
async fn test_expired_cache_triggers_refetch() {
    let server = MockServer::start().await;
    mount_document(&server, &helpers::cl_document("2024-01-04"), 1, 2).await;

    let dir = TempDir::new().unwrap();
    let fetcher = fetcher(dir.path());
    let url = format!("{}{}", server.uri(), DOCUMENT_PATH);

    fetcher.load("cl", &url).await.unwrap();

    let meta_path = dir.path().join("cl_meta.json");
    let mut meta = CacheMeta::read(&meta_path).unwrap();
    meta.date = Utc::now() - Duration::days(45);
    meta.write(&meta_path).unwrap();

    let refreshed = fetcher.load("cl", &url).await.unwrap();
    assert!(!refreshed.from_cache);

    let meta = CacheMeta::read(&meta_path).unwrap();
    assert!(!meta.is_expired(Utc::now(), 30));
}

#[tokio::test]
async fn test_corrupted_cache_triggers_refetch() {
    let server = MockServer::start().await;
    mount_document(&server, &helpers::cl_document("2024-01-04"), 1, 2).await;

    let dir = TempDir::new().unwrap();
    let fetcher = fetcher(dir.path());
    let url = format!("{}{}", server.uri(), DOCUMENT_PATH);

    fetcher.load("cl", &url).await.unwrap();
    std::fs::write(dir.path().join("cl.owl"), "<rdf:RDF/>").unwrap();

    let refreshed = fetcher.load("cl", &url).await.unwrap();
    assert!(!refreshed.from_cache);
    assert!(!refreshed.graph.is_empty());
}

#[tokio::test]
async fn test_http_error_is_reported() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path(DOCUMENT_PATH))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let dir = TempDir::new().unwrap();
    let url = format!("{}{}", server.uri(), DOCUMENT_PATH);

    let result = fetcher(dir.path()).load("cl", &url).await;
    assert!(matches!(result, Err(OntologyError::Http { status: 404, .. })));
    assert!(!dir.path().join("cl_meta.json").exists());
}

#[tokio::test]
async fn test_local_document_bypasses_cache() {
    let dir = TempDir::new().unwrap();
    let source = TempDir::new().unwrap();
    let document = helpers::write_document(source.path(), "cl.owl", &helpers::cl_document("2024-01-04"));

    let fetcher = fetcher(dir.path());
    let from_path = fetcher.load("cl", document.to_str().unwrap()).await.unwrap();
    let from_url = fetcher
        .load("cl", &format!("file://{}", document.display()))
        .await
        .unwrap();

    assert_eq!(from_path.version, "2024-01-04");
    assert_eq!(from_path.graph.len(), from_url.graph.len());
    assert!(!dir.path().join("cl_meta.json").exists());
}

// ============================================================================
// Update checks
// ============================================================================

#[tokio::test]
async fn test_check_for_updates() {
    let server = MockServer::start().await;
    mount_document(&server, &helpers::cl_document("2024-01-04"), 2, 1).await;

    let dir = TempDir::new().unwrap();
    let fetcher = fetcher(dir.path());
    let url = format!("{}{}", server.uri(), DOCUMENT_PATH);

    let status = fetcher.check_for_updates("cl", &url).await.unwrap();
    assert!(status.update_available);
    assert_eq!(status.cached_version, None);
    assert_eq!(status.remote_version.as_deref(), Some("2024-01-04"));

    fetcher.load("cl", &url).await.unwrap();

    let status = fetcher.check_for_updates("cl", &url).await.unwrap();
    assert!(!status.update_available);
    assert!(!status.expired);
    assert_eq!(status.cached_version.as_deref(), Some("2024-01-04"));

    server.verify().await;
    server.reset().await;
    mount_document(&server, &helpers::cl_document("2024-02-13"), 1, 0).await;

    let status = fetcher.check_for_updates("cl", &url).await.unwrap();
    assert!(status.update_available);
    assert_eq!(status.remote_version.as_deref(), Some("2024-02-13"));
}
