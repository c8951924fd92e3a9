//! End-to-end integration tests for dirindex.
//!
//! These tests run the real server on a loopback port and verify complete
//! flows over HTTP:
//! - Language redirect and listing pages
//! - Navigation links resolving to the right directories and files
//! - Confinement and ignore rules
//! - Error page handling

use std::fs;
use std::net::SocketAddr;
use std::os::unix::fs::symlink;
use std::path::PathBuf;
use std::sync::Arc;

use reqwest::{redirect::Policy, StatusCode};
use server::{build_router, AppState, Config};
use tempfile::TempDir;

/// Languages shipped with the repository.
fn shipped_languages() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("../../languages")
}

/// Create a served tree and a configuration pointing at it.
fn create_test_config() -> (Config, TempDir) {
    let temp_dir = TempDir::new().unwrap();
    let data = temp_dir.path().join("data");
    fs::create_dir_all(data.join("docs/guides")).unwrap();
    fs::create_dir_all(data.join("private")).unwrap();
    fs::write(data.join("readme.txt"), "hello dirindex").unwrap();
    fs::write(data.join("report final.qqqzz"), vec![0u8; 2048]).unwrap();
    fs::write(data.join("docs/intro.md"), "# Intro").unwrap();
    fs::write(data.join("docs/guides/setup.txt"), "setup").unwrap();
    fs::write(data.join("private/keys.txt"), "secret").unwrap();
    fs::write(data.join(".env"), "TOKEN=1").unwrap();
    fs::write(temp_dir.path().join("outside.txt"), "outside").unwrap();
    symlink(temp_dir.path().join("outside.txt"), data.join("escape.txt")).unwrap();

    let mut config = Config::default();
    config.files.root = data;
    config.files.languages_dir = shipped_languages();
    config.files.ignore_files = vec![".env".to_string(), "private".to_string()];
    (config, temp_dir)
}

/// Start the server on an ephemeral port.
async fn spawn_server(config: Config) -> SocketAddr {
    let state = AppState::from_config(config).unwrap();
    let app = build_router(Arc::new(state));
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    addr
}

fn client() -> reqwest::Client {
    reqwest::Client::builder()
        .redirect(Policy::none())
        .build()
        .unwrap()
}

// =============================================================================
// Listing Tests
// =============================================================================

#[tokio::test]
async fn test_root_redirect_then_listing() {
    let (config, _temp_dir) = create_test_config();
    let addr = spawn_server(config).await;
    let client = client();

    let response = client
        .get(format!("http://{}/?dir=docs", addr))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::FOUND);
    let location = response.headers()["location"].to_str().unwrap().to_string();
    assert_eq!(location, "/en?dir=docs");

    let response = client
        .get(format!("http://{}{}", addr, location))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let html = response.text().await.unwrap();
    assert!(html.contains(r#"<a href="/en">Parent Directory</a>"#));
    assert!(html.contains(r#"<a href="/en?dir=docs%2Fguides">guides</a>"#));
    assert!(html.contains(r#"<a href="/docs/intro.md">intro.md</a>"#));
}

#[tokio::test]
async fn test_listing_hides_ignored_hidden_and_escaping_entries() {
    let (config, _temp_dir) = create_test_config();
    let addr = spawn_server(config).await;

    let html = client()
        .get(format!("http://{}/en", addr))
        .send()
        .await
        .unwrap()
        .text()
        .await
        .unwrap();

    assert!(html.contains(">readme.txt</a>"));
    assert!(html.contains(">docs</a>"));
    assert!(html.contains(r#"<a href="/report%20final.qqqzz">report final.qqqzz</a>"#));
    assert!(html.contains("2.00KB"));
    assert!(!html.contains(">private</a>"));
    assert!(!html.contains(">.env</a>"));
    assert!(!html.contains(">escape.txt</a>"));
}

#[tokio::test]
async fn test_listing_page_metadata() {
    let (config, _temp_dir) = create_test_config();
    let addr = spawn_server(config).await;

    let html = client()
        .get(format!("http://{}/en", addr))
        .header("x-forwarded-proto", "https")
        .send()
        .await
        .unwrap()
        .text()
        .await
        .unwrap();

    assert!(html.contains(r#"<html dir="ltr" lang="en">"#));
    let og_url = format!(r#"property="og:url" content="https://{}/""#, addr);
    assert!(html.contains(&og_url));
}

#[tokio::test]
async fn test_persian_listing_is_rtl() {
    let (config, _temp_dir) = create_test_config();
    let addr = spawn_server(config).await;

    let html = client()
        .get(format!("http://{}/fa?dir=docs", addr))
        .send()
        .await
        .unwrap()
        .text()
        .await
        .unwrap();

    assert!(html.contains(r#"<html dir="rtl" lang="fa">"#));
    assert!(html.contains(r#"<a href="/fa">پوشه بالاتر</a>"#));
}

#[tokio::test]
async fn test_listing_escape_forbidden() {
    let (config, _temp_dir) = create_test_config();
    let addr = spawn_server(config).await;

    let response = client()
        .get(format!("http://{}/en?dir=..", addr))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

// =============================================================================
// Download Tests
// =============================================================================

#[tokio::test]
async fn test_download_inline_text() {
    let (config, _temp_dir) = create_test_config();
    let addr = spawn_server(config).await;

    let response = client()
        .get(format!("http://{}/readme.txt", addr))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(response.headers()["content-type"], "text/plain");
    assert!(response.headers().get("content-disposition").is_none());
    assert_eq!(response.text().await.unwrap(), "hello dirindex");
}

#[tokio::test]
async fn test_download_attachment_with_encoded_name() {
    let (config, _temp_dir) = create_test_config();
    let addr = spawn_server(config).await;

    let response = client()
        .get(format!("http://{}/report%20final.qqqzz", addr))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(response.headers()["content-type"], "application/octet-stream");
    assert_eq!(
        response.headers()["content-disposition"],
        "attachment; filename*=UTF-8''report%20final.qqqzz"
    );
    assert_eq!(response.bytes().await.unwrap().len(), 2048);
}

#[tokio::test]
async fn test_download_nested_file() {
    let (config, _temp_dir) = create_test_config();
    let addr = spawn_server(config).await;

    let response = client()
        .get(format!("http://{}/docs/guides/setup.txt", addr))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(response.text().await.unwrap(), "setup");
}

#[tokio::test]
async fn test_download_refusals() {
    let (config, _temp_dir) = create_test_config();
    let addr = spawn_server(config).await;
    let client = client();

    for (path, expected) in [
        ("/.env", StatusCode::FORBIDDEN),
        ("/private/keys.txt", StatusCode::FORBIDDEN),
        ("/escape.txt", StatusCode::FORBIDDEN),
        ("/docs", StatusCode::NOT_FOUND),
        ("/missing.txt", StatusCode::NOT_FOUND),
        ("/xx", StatusCode::NOT_FOUND),
    ] {
        let response = client
            .get(format!("http://{}{}", addr, path))
            .send()
            .await
            .unwrap();
        assert_eq!(response.status(), expected, "GET {}", path);
    }
}

// =============================================================================
// Error Page Tests
// =============================================================================

#[tokio::test]
async fn test_error_site_redirect() {
    let (mut config, _temp_dir) = create_test_config();
    config.page.error_page_base = Some("https://errors.example.com".to_string());
    let addr = spawn_server(config).await;

    let response = client()
        .get(format!("http://{}/private/keys.txt", addr))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::FOUND);
    assert_eq!(
        response.headers()["location"],
        "https://errors.example.com/403"
    );
}

#[tokio::test]
async fn test_error_page_does_not_leak_paths() {
    let (config, temp_dir) = create_test_config();
    let addr = spawn_server(config).await;

    let body = client()
        .get(format!("http://{}/missing.txt", addr))
        .send()
        .await
        .unwrap()
        .text()
        .await
        .unwrap();
    assert!(body.contains("404"));
    assert!(!body.contains(temp_dir.path().to_str().unwrap()));
}

// =============================================================================
// Configuration Tests
// =============================================================================

#[tokio::test]
async fn test_server_from_toml_config() {
    let (config, _temp_dir) = create_test_config();
    let toml = format!(
        r#"
[files]
root = "{}"
languages_dir = "{}"
ignore_files = ["docs"]
default_language = "fa"
"#,
        config.files.root.display(),
        shipped_languages().display()
    );
    let config = Config::from_toml(&toml).unwrap();
    config.validate().unwrap();
    let addr = spawn_server(config).await;
    let client = client();

    let response = client.get(format!("http://{}/", addr)).send().await.unwrap();
    assert_eq!(response.headers()["location"], "/fa");

    let html = client
        .get(format!("http://{}/fa", addr))
        .send()
        .await
        .unwrap()
        .text()
        .await
        .unwrap();
    assert!(!html.contains(">docs</a>"));
    assert!(html.contains(">private</a>"));
}
