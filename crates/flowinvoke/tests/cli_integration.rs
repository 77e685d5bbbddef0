//! CLI integration tests for the flowinvoke command-line interface.
//!
//! These tests verify:
//! - Help text is displayed correctly
//! - Argument parsing works as expected
//! - Invalid inputs are rejected with appropriate messages
//! - A full run against a mock server prints outputs and sets the exit code

use assert_cmd::Command;
use predicates::prelude::*;
use serde_json::json;
use tempfile::TempDir;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const FLOW_ID: &str = "4a9d2b7e-1c3f-4e21-9b8a-0d6f5e3c2a10";

/// Get a command for the flowinvoke binary, isolated from the user's config
/// and writing its log into `dir`.
fn flowinvoke(dir: &TempDir) -> Command {
    let mut cmd = flowinvoke_without_log(dir);
    cmd.arg("--log-file").arg(dir.path().join("flowinvoke.log"));
    cmd
}

/// Like `flowinvoke`, but the caller chooses `--log-file`.
fn flowinvoke_without_log(dir: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("flowinvoke").unwrap();
    cmd.env("FLOWINVOKE_CONFIG_DIR", dir.path())
        .env_remove("FLOWINVOKE_HOST")
        .env_remove("FLOWINVOKE_USER")
        .env_remove("FLOWINVOKE_PASSWORD")
        .env_remove("FLOWINVOKE_CREDENTIALS")
        .env_remove("FLOWINVOKE_CONTEXT")
        .env_remove("FLOWINVOKE_LOG");
    cmd
}

// ─────────────────────────────────────────────────────────────────────────────
// Help and Version Tests
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn test_help_displays() {
    let dir = tempfile::tempdir().unwrap();
    flowinvoke(&dir)
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("--uuid"))
        .stdout(predicate::str::contains("--input"))
        .stdout(predicate::str::contains("--heartbeat"))
        .stdout(predicate::str::contains("--async"))
        .stdout(predicate::str::contains("--credentials"));
}

#[test]
fn test_version_displays() {
    let dir = tempfile::tempdir().unwrap();
    flowinvoke(&dir)
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("flowinvoke"));
}

// ─────────────────────────────────────────────────────────────────────────────
// Argument Tests
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn test_encode_prints_credentials() {
    let dir = tempfile::tempdir().unwrap();
    flowinvoke(&dir)
        .args(["--encode", "admin:admin"])
        .assert()
        .success()
        .stdout("YWRtaW46YWRtaW4=\n");
}

#[test]
fn test_uuid_required() {
    let dir = tempfile::tempdir().unwrap();
    flowinvoke(&dir)
        .assert()
        .failure()
        .stderr(predicate::str::contains("--uuid"));
}

#[test]
fn test_malformed_input_rejected() {
    let dir = tempfile::tempdir().unwrap();
    flowinvoke(&dir)
        .args(["--uuid", FLOW_ID, "--input", "novalue"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("KEY=VALUE"));
}

#[test]
fn test_zero_heartbeat_rejected() {
    let dir = tempfile::tempdir().unwrap();
    flowinvoke(&dir)
        .args(["--uuid", FLOW_ID, "--heartbeat", "0"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("heartbeat"));
}

#[test]
fn test_unknown_context_rejected() {
    let dir = tempfile::tempdir().unwrap();
    flowinvoke(&dir)
        .args(["--uuid", FLOW_ID, "--context", "nowhere"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("context 'nowhere' not found"));
}

#[test]
fn test_unwritable_log_file_is_error() {
    let dir = tempfile::tempdir().unwrap();
    let not_a_dir = dir.path().join("plain-file");
    std::fs::write(&not_a_dir, "x").unwrap();

    flowinvoke_without_log(&dir)
        .args(["--uuid", FLOW_ID])
        .arg("--log-file")
        .arg(not_a_dir.join("flowinvoke.log"))
        .assert()
        .code(1)
        .stderr(predicate::str::contains("failed to open log file"));
}

// ─────────────────────────────────────────────────────────────────────────────
// Runs Against a Mock Server
// ─────────────────────────────────────────────────────────────────────────────

async fn mock_server(result: &str) -> MockServer {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(format!("/oo/rest/v1/flows/{}", FLOW_ID)))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": FLOW_ID,
            "name": "Restart Service"
        })))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path(format!("/oo/rest/v1/flows/{}/inputs", FLOW_ID)))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            { "name": "service", "mandatory": true }
        ])))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/oo/rest/v1/executions"))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({
            "executionId": "101",
            "errorCode": "NO_ERROR"
        })))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/oo/rest/v1/executions/101/summary"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([{
            "executionId": "101",
            "status": "COMPLETED",
            "resultStatusType": result
        }])))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/oo/rest/v1/executions/101/execution-log"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "flowOutput": { "serviceState": "started" },
            "executionSummary": { "executionId": "101", "resultStatusType": result }
        })))
        .mount(&server)
        .await;
    server
}

#[tokio::test(flavor = "multi_thread")]
async fn test_resolved_run_exits_zero() {
    let server = mock_server("RESOLVED").await;
    let uri = server.uri();

    tokio::task::spawn_blocking(move || {
        let dir = tempfile::tempdir().unwrap();
        flowinvoke(&dir)
            .args(["--host", uri.as_str(), "--uuid", FLOW_ID, "--input", "service=nginx"])
            .args(["--heartbeat", "1"])
            .assert()
            .success()
            .stdout("serviceState=started\nStatus=RESOLVED\n");
    })
    .await
    .unwrap();
}

#[tokio::test(flavor = "multi_thread")]
async fn test_failed_run_exits_nonzero_with_summary() {
    let server = mock_server("ERROR").await;
    let uri = server.uri();

    tokio::task::spawn_blocking(move || {
        let dir = tempfile::tempdir().unwrap();
        flowinvoke(&dir)
            .args(["--host", uri.as_str(), "--uuid", FLOW_ID, "--input", "service=nginx"])
            .assert()
            .failure()
            .stdout(predicate::str::contains("Status=ERROR"))
            .stderr(predicate::str::contains("Something went wrong!"))
            .stderr(predicate::str::contains("Flow Summary:"));
    })
    .await
    .unwrap();
}

#[tokio::test(flavor = "multi_thread")]
async fn test_async_prints_run_id() {
    let server = mock_server("RESOLVED").await;
    let uri = server.uri();

    tokio::task::spawn_blocking(move || {
        let dir = tempfile::tempdir().unwrap();
        flowinvoke(&dir)
            .args(["--host", uri.as_str(), "--uuid", FLOW_ID, "--input", "service=nginx"])
            .arg("--async")
            .assert()
            .success()
            .stdout("101\n");
    })
    .await
    .unwrap();

    let requests = server.received_requests().await.unwrap();
    assert!(requests.iter().all(|r| !r.url.path().ends_with("/summary")));
    assert!(requests.iter().all(|r| !r.url.path().ends_with("/execution-log")));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_missing_input_exits_nonzero() {
    let server = mock_server("RESOLVED").await;
    let uri = server.uri();

    tokio::task::spawn_blocking(move || {
        let dir = tempfile::tempdir().unwrap();
        flowinvoke(&dir)
            .args(["--host", uri.as_str(), "--uuid", FLOW_ID])
            .assert()
            .failure()
            .stderr(predicate::str::contains("Missing required flow input: service"));
    })
    .await
    .unwrap();

    let requests = server.received_requests().await.unwrap();
    assert!(requests.iter().all(|r| r.method.as_str() != "POST"));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_context_from_config_file() {
    let server = mock_server("RESOLVED").await;
    let uri = server.uri();

    tokio::task::spawn_blocking(move || {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dir.path().join("client.yaml"),
            format!(
                "current-context: mock\ncontexts:\n  - name: mock\n    host: {}\n    auth:\n      type: encoded\n      credentials: c3ZjOnB3\n",
                uri
            ),
        )
        .unwrap();

        flowinvoke(&dir)
            .args(["--uuid", FLOW_ID, "--input", "service=nginx"])
            .assert()
            .success()
            .stdout(predicate::str::contains("Status=RESOLVED"));
    })
    .await
    .unwrap();
}

#[tokio::test(flavor = "multi_thread")]
async fn test_verbose_logs_debug_to_stderr() {
    let server = mock_server("RESOLVED").await;
    let uri = server.uri();

    tokio::task::spawn_blocking(move || {
        let dir = tempfile::tempdir().unwrap();
        flowinvoke(&dir)
            .args(["--host", uri.as_str(), "--uuid", FLOW_ID, "--input", "service=nginx"])
            .arg("-v")
            .assert()
            .success()
            .stdout(predicate::str::contains("\"flowOutput\""))
            .stderr(predicate::str::contains("fetched flow definition"));
    })
    .await
    .unwrap();
}

#[tokio::test(flavor = "multi_thread")]
async fn test_quiet_run_keeps_debug_off_stderr() {
    let server = mock_server("RESOLVED").await;
    let uri = server.uri();

    tokio::task::spawn_blocking(move || {
        let dir = tempfile::tempdir().unwrap();
        flowinvoke(&dir)
            .args(["--host", uri.as_str(), "--uuid", FLOW_ID, "--input", "service=nginx"])
            .assert()
            .success()
            .stderr(predicate::str::contains("fetched flow definition").not());
    })
    .await
    .unwrap();
}
