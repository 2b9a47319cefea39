mod common;

use std::net::SocketAddr;
use std::path::Path;

use common::{send, unique_temp_path};
use mapserve::app::App;
use mapserve::config::ServerConfig;

async fn spawn(config: ServerConfig) -> SocketAddr {
    let bound = App::new(config).bind().await.unwrap();
    let addr = bound.local_addr();
    tokio::spawn(bound.run());
    addr
}

fn config_for(root: &Path) -> ServerConfig {
    ServerConfig::default()
        .with_host("127.0.0.1")
        .with_port(0)
        .with_document_root(root)
        .with_data_dir(root.join("data"))
}

#[tokio::test]
async fn listing_returns_exactly_the_geojson_files() {
    let root = unique_temp_path("listing");
    let data = root.join("data");
    std::fs::create_dir_all(&data).unwrap();
    for name in [
        "castles.geojson",
        "rivers.geojson",
        "README.md",
        "photo.png",
        "old.geojson.bak",
        "layers.json",
    ] {
        std::fs::write(data.join(name), b"{}").unwrap();
    }

    let addr = spawn(config_for(&root)).await;
    let reply = send(addr, "GET", "/api/files", None).await;

    assert_eq!(reply.status, 200);
    assert_eq!(reply.header("content-type").as_deref(), Some("application/json"));
    assert_eq!(
        reply.json(),
        serde_json::json!(["castles.geojson", "rivers.geojson"])
    );

    std::fs::remove_dir_all(&root).unwrap();
}

#[tokio::test]
async fn listing_ignores_query_string_and_trailing_slash() {
    let root = unique_temp_path("listing-query");
    std::fs::create_dir_all(root.join("data")).unwrap();
    std::fs::write(root.join("data/a.geojson"), b"{}").unwrap();

    let addr = spawn(config_for(&root)).await;
    for path in ["/api/files?ts=123", "/api/files/"] {
        let reply = send(addr, "GET", path, None).await;
        assert_eq!(reply.status, 200, "{path}");
        assert_eq!(reply.json(), serde_json::json!(["a.geojson"]));
    }

    std::fs::remove_dir_all(&root).unwrap();
}

#[tokio::test]
async fn missing_data_dir_is_created_before_accepting() {
    let root = unique_temp_path("create");
    let data = root.join("nested/data");
    assert!(!data.exists());

    let config = config_for(&root).with_data_dir(&data);
    let bound = App::new(config).bind().await.unwrap();
    // Bound but not yet serving.
    assert!(data.is_dir());

    let addr = bound.local_addr();
    tokio::spawn(bound.run());
    let reply = send(addr, "GET", "/api/files", None).await;
    assert_eq!(reply.json(), serde_json::json!([]));

    std::fs::remove_dir_all(&root).unwrap();
}

#[tokio::test]
async fn static_files_are_served_with_content_type() {
    let root = unique_temp_path("static");
    std::fs::create_dir_all(root.join("data")).unwrap();
    std::fs::create_dir_all(root.join("logic")).unwrap();
    std::fs::write(root.join("index.html"), b"<!doctype html><title>map</title>").unwrap();
    std::fs::write(root.join("logic/config.js"), b"const AppConfig = {};").unwrap();
    std::fs::write(
        root.join("data/rivers.geojson"),
        br#"{"type":"FeatureCollection","features":[]}"#,
    )
    .unwrap();

    let addr = spawn(config_for(&root)).await;

    let reply = send(addr, "GET", "/", None).await;
    assert_eq!(reply.status, 200);
    assert_eq!(reply.header("content-type").as_deref(), Some("text/html; charset=utf-8"));
    assert_eq!(reply.body, b"<!doctype html><title>map</title>");

    let reply = send(addr, "GET", "/logic/config.js?debug=true", None).await;
    assert_eq!(reply.status, 200);
    assert_eq!(
        reply.header("content-type").as_deref(),
        Some("text/javascript; charset=utf-8")
    );

    let reply = send(addr, "GET", "/data/rivers.geojson", None).await;
    assert_eq!(reply.status, 200);
    assert_eq!(reply.header("content-type").as_deref(), Some("application/geo+json"));
    assert_eq!(reply.json()["type"], "FeatureCollection");

    let reply = send(addr, "GET", "/logic", None).await;
    assert_eq!(reply.status, 301);
    assert_eq!(reply.header("location").as_deref(), Some("/logic/"));

    std::fs::remove_dir_all(&root).unwrap();
}

#[tokio::test]
async fn head_returns_static_headers_without_body() {
    let root = unique_temp_path("head");
    std::fs::create_dir_all(root.join("data")).unwrap();
    std::fs::write(root.join("data/rivers.geojson"), b"{\"type\":\"FeatureCollection\"}").unwrap();

    let addr = spawn(config_for(&root)).await;

    let reply = send(addr, "HEAD", "/data/rivers.geojson", None).await;
    assert_eq!(reply.status, 200);
    assert_eq!(reply.header("content-type").as_deref(), Some("application/geo+json"));
    assert_eq!(reply.header("content-length").as_deref(), Some("28"));
    assert!(reply.body.is_empty());

    let reply = send(addr, "HEAD", "/missing.js", None).await;
    assert_eq!(reply.status, 404);
    assert!(reply.body.is_empty());

    std::fs::remove_dir_all(&root).unwrap();
}

#[tokio::test]
async fn missing_and_escaping_paths_are_404() {
    let root = unique_temp_path("static-404");
    std::fs::create_dir_all(root.join("data")).unwrap();
    std::fs::write(root.join("data/secret.geojson"), b"{}").unwrap();

    let docroot = root.join("public");
    std::fs::create_dir_all(&docroot).unwrap();
    let addr = spawn(config_for(&docroot).with_data_dir(root.join("data"))).await;

    let reply = send(addr, "GET", "/nope.css", None).await;
    assert_eq!(reply.status, 404);
    assert_eq!(reply.body, b"File not found");

    let reply = send(addr, "GET", "/../data/secret.geojson", None).await;
    assert_eq!(reply.status, 404);

    let reply = send(addr, "GET", "/%2e%2e/data/secret.geojson", None).await;
    assert_eq!(reply.status, 404);

    std::fs::remove_dir_all(&root).unwrap();
}

#[tokio::test]
async fn other_methods_are_404() {
    let root = unique_temp_path("methods");
    let addr = spawn(config_for(&root)).await;

    for method in ["PUT", "DELETE", "PATCH"] {
        let reply = send(addr, method, "/api/files", None).await;
        assert_eq!(reply.status, 404, "{method}");
        assert_eq!(reply.json()["error"], "Endpoint not found");
    }

    std::fs::remove_dir_all(&root).unwrap();
}
