//! CLI integration tests for the dify-kb command-line interface.
//!
//! Parsing and config commands run without a server; the remaining tests
//! point the binary at a mock server.

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;
use wiremock::matchers::{body_partial_json, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// A dify-kb command isolated from the caller's config and environment.
fn dify_kb(config_dir: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("dify-kb").unwrap();
    cmd.env("DIFY_KB_CONFIG_DIR", config_dir.path())
        .env_remove("DIFY_KB_API_KEY")
        .env_remove("DIFY_KB_BASE_URL")
        .env_remove("DIFY_KB_PROFILE")
        .env_remove("RUST_LOG")
        .current_dir(config_dir.path());
    cmd
}

// ─────────────────────────────────────────────────────────────────────────────
// Help and Version Tests
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn test_help_lists_subcommands() {
    let dir = TempDir::new().unwrap();
    dify_kb(&dir)
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("datasets"))
        .stdout(predicate::str::contains("documents"))
        .stdout(predicate::str::contains("segments"))
        .stdout(predicate::str::contains("chunks"))
        .stdout(predicate::str::contains("metadata"))
        .stdout(predicate::str::contains("retrieve"))
        .stdout(predicate::str::contains("config"));
}

#[test]
fn test_version_displays() {
    let dir = TempDir::new().unwrap();
    dify_kb(&dir)
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("dify-kb"));
}

#[test]
fn test_documents_add_text_help_shows_settings() {
    let dir = TempDir::new().unwrap();
    dify_kb(&dir)
        .args(["documents", "add-text", "--help"])
        .assert()
        .success()
        .stdout(predicate::str::contains("--language"))
        .stdout(predicate::str::contains("--search-method"))
        .stdout(predicate::str::contains("--wait"));
}

// ─────────────────────────────────────────────────────────────────────────────
// Argument Parsing Tests
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn test_unknown_subcommand_fails() {
    let dir = TempDir::new().unwrap();
    dify_kb(&dir).arg("frobnicate").assert().failure();
}

#[test]
fn test_retrieve_requires_query() {
    let dir = TempDir::new().unwrap();
    dify_kb(&dir)
        .args(["retrieve", "ds-1"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("<QUERY>"));
}

#[test]
fn test_invalid_search_method_rejected() {
    let dir = TempDir::new().unwrap();
    dify_kb(&dir)
        .args(["retrieve", "ds-1", "hello", "--search-method", "psychic"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("invalid value"));
}

#[test]
fn test_segments_add_requires_content() {
    let dir = TempDir::new().unwrap();
    dify_kb(&dir)
        .args(["segments", "add", "ds-1", "doc-1"])
        .assert()
        .failure();
}

// ─────────────────────────────────────────────────────────────────────────────
// Config Tests
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn test_config_path_uses_config_dir() {
    let dir = TempDir::new().unwrap();
    dify_kb(&dir)
        .args(["config", "path"])
        .assert()
        .success()
        .stdout(predicate::str::contains("config.toml"))
        .stdout(predicate::str::contains(dir.path().to_string_lossy().as_ref()));
}

#[test]
fn test_set_profile_then_list() {
    let dir = TempDir::new().unwrap();
    dify_kb(&dir)
        .args([
            "config",
            "set-profile",
            "cloud",
            "--url",
            "https://api.dify.ai/v1",
            "--api-key-env",
            "DIFY_CLOUD_KEY",
        ])
        .assert()
        .success();
    assert!(dir.path().join("config.toml").is_file());

    dify_kb(&dir)
        .args(["config", "profiles"])
        .assert()
        .success()
        .stdout(predicate::str::contains("cloud"))
        .stdout(predicate::str::contains("DIFY_CLOUD_KEY"));
}

#[test]
fn test_use_unknown_profile_fails() {
    let dir = TempDir::new().unwrap();
    dify_kb(&dir)
        .args(["config", "use", "missing"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("missing"));
}

#[test]
fn test_command_without_connection_fails() {
    let dir = TempDir::new().unwrap();
    dify_kb(&dir)
        .args(["datasets", "list"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("no profile"));
}

// ─────────────────────────────────────────────────────────────────────────────
// Server Tests
// ─────────────────────────────────────────────────────────────────────────────

#[tokio::test]
async fn test_datasets_list_json_with_flags() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v1/datasets"))
        .and(header("authorization", "Bearer test-key"))
        .and(query_param("page", "1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "data": [{"id": "ds-1", "name": "Handbook", "document_count": 2}],
            "has_more": false,
            "total": 1,
            "page": 1,
            "limit": 20
        })))
        .expect(1)
        .mount(&server)
        .await;

    let dir = TempDir::new().unwrap();
    let base_url = format!("{}/v1", server.uri());
    let mut cmd = dify_kb(&dir);
    cmd.args([
        "--json",
        "--base-url",
        base_url.as_str(),
        "--api-key",
        "test-key",
        "datasets",
        "list",
    ]);
    tokio::task::spawn_blocking(move || {
        cmd.assert()
            .success()
            .stdout(predicate::str::contains("\"Handbook\""));
    })
    .await
    .unwrap();
}

#[tokio::test]
async fn test_profile_key_from_named_env() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/datasets/ds-1/retrieve"))
        .and(header("authorization", "Bearer from-env"))
        .and(body_partial_json(serde_json::json!({
            "query": "hello",
            "retrieval_model": {"top_k": 2}
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "query": {"content": "hello"},
            "records": [{
                "segment": {"id": "seg-1", "content": "hello world", "document": {"id": "doc-1", "name": "greeting"}},
                "score": 0.9
            }]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let dir = TempDir::new().unwrap();
    std::fs::write(
        dir.path().join("config.toml"),
        format!(
            "current-profile = \"mock\"\n\n[[profiles]]\nname = \"mock\"\nbase-url = \"{}/v1\"\napi-key-env = \"MOCK_KEY\"\n",
            server.uri()
        ),
    )
    .unwrap();

    let mut cmd = dify_kb(&dir);
    cmd.env("MOCK_KEY", "from-env")
        .args(["retrieve", "ds-1", "hello", "--top-k", "2"]);
    tokio::task::spawn_blocking(move || {
        cmd.assert()
            .success()
            .stdout(predicate::str::contains("hello world"))
            .stdout(predicate::str::contains("greeting"));
    })
    .await
    .unwrap();
}

#[tokio::test]
async fn test_api_error_exits_nonzero() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v1/datasets/missing"))
        .respond_with(ResponseTemplate::new(404).set_body_json(serde_json::json!({
            "code": "dataset_not_found",
            "message": "Dataset not found.",
            "status": 404
        })))
        .mount(&server)
        .await;

    let dir = TempDir::new().unwrap();
    let base_url = format!("{}/v1", server.uri());
    let mut cmd = dify_kb(&dir);
    cmd.args([
        "--base-url",
        base_url.as_str(),
        "--api-key",
        "k",
        "datasets",
        "show",
        "missing",
    ]);
    tokio::task::spawn_blocking(move || {
        cmd.assert()
            .failure()
            .stderr(predicate::str::contains("Dataset not found."));
    })
    .await
    .unwrap();
}

#[tokio::test]
async fn test_flags_keep_config_default_timeouts() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v1/datasets"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(serde_json::json!({"data": [], "has_more": false}))
                .set_delay(std::time::Duration::from_secs(5)),
        )
        .mount(&server)
        .await;

    let dir = TempDir::new().unwrap();
    std::fs::write(
        dir.path().join("config.toml"),
        "[defaults]\nread-timeout-ms = 200\nwrite-timeout-ms = 100\n",
    )
    .unwrap();

    let base_url = format!("{}/v1", server.uri());
    let mut cmd = dify_kb(&dir);
    cmd.args([
        "--base-url",
        base_url.as_str(),
        "--api-key",
        "k",
        "datasets",
        "list",
    ]);
    let started = std::time::Instant::now();
    tokio::task::spawn_blocking(move || {
        cmd.assert().failure().stderr(predicate::str::contains("Error:"));
    })
    .await
    .unwrap();
    assert!(started.elapsed() < std::time::Duration::from_secs(4));
}
