use assert_cmd::prelude::OutputAssertExt;
use assert_cmd::Command;
use predicates::prelude::*;
use std::path::Path;
use tempfile::TempDir;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Command isolated from the user's config file and credentials
fn brainsearch(workdir: &Path) -> Command {
    let mut cmd = Command::cargo_bin("brainsearch").unwrap();
    cmd.current_dir(workdir)
        .env("HOME", workdir)
        .env("XDG_CONFIG_HOME", workdir.join(".config"))
        .env_remove("BRAIN_USER")
        .env_remove("BRAIN_TOKEN")
        .env_remove("RUST_LOG")
        .env_remove("CLICOLOR_FORCE");
    cmd
}

/// Run the binary off the async runtime so the mock server keeps serving
async fn run(mut cmd: Command) -> assert_cmd::assert::Assert {
    let output = tokio::task::spawn_blocking(move || cmd.output())
        .await
        .unwrap()
        .unwrap();
    output.assert()
}

#[test]
fn test_help_lists_flags() {
    let dir = TempDir::new().unwrap();
    brainsearch(dir.path())
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("--reload"))
        .stdout(predicate::str::contains("--brain-assets"))
        .stdout(predicate::str::contains("--quality"));
}

#[test]
fn test_no_inputs_exits_cleanly() {
    let dir = TempDir::new().unwrap();
    std::fs::write(dir.path().join("notes.txt"), "not audio").unwrap();

    brainsearch(dir.path())
        .args(["-u", "me", "-t", "tok", "hello"])
        .assert()
        .success()
        .stdout(predicate::str::contains("No valid input files found."));

    assert!(!dir.path().join("results.html").exists());
}

#[test]
fn test_missing_credentials_fail() {
    let dir = TempDir::new().unwrap();

    brainsearch(dir.path())
        .arg("hello")
        .assert()
        .failure()
        .stderr(predicate::str::contains("Missing API user id"));
}

#[tokio::test]
async fn test_reuses_uploaded_file_and_renders_hits() {
    let server = MockServer::start().await;
    let dir = TempDir::new().unwrap();
    std::fs::write(dir.path().join("talk.mp3"), b"ID3 audio").unwrap();

    Mock::given(method("GET"))
        .and(path("/assets"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "results": [{
                "asset_id": "a1",
                "status": "processed",
                "transcript_exists": true,
                "metadata": {"filename": "talk.mp3"},
                "url": "https://cdn.example.com/a1.mp3",
                "duration": 120.0
            }]
        })))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(path("/assets"))
        .respond_with(ResponseTemplate::new(500))
        .expect(0)
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(path("/search"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "results": [{
                "asset_id": "a1",
                "hits": [
                    {"quality": 0.92, "time": 33.0},
                    {"quality": 0.2, "time": 80.0}
                ]
            }]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let mut cmd = brainsearch(dir.path());
    cmd.args(["-u", "me", "-t", "tok", "-s", &server.uri(), "--no-browser", "-f", "*.mp3"])
        .args(["budget", "review"]);

    run(cmd)
        .await
        .success()
        .stdout(predicate::str::contains("Reusing: talk.mp3"))
        .stdout(predicate::str::contains("Found 1 hits"));

    let html = std::fs::read_to_string(dir.path().join("results.html")).unwrap();
    assert!(html.contains("budget review"));
    assert!(html.contains("https://cdn.example.com/a1.mp3"));
    assert!(html.contains("this.currentTime = 33;"));
    assert!(!html.contains("this.currentTime = 80;"));
}

#[tokio::test]
async fn test_reload_uploads_and_waits_for_transcript() {
    let server = MockServer::start().await;
    let dir = TempDir::new().unwrap();
    std::fs::write(dir.path().join("talk.mp3"), b"ID3 audio").unwrap();

    Mock::given(method("GET"))
        .and(path("/assets"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({"results": []})))
        .expect(0)
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(path("/assets"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({"asset_id": "fresh"})))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/assets/fresh"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "asset_id": "fresh",
            "transcript": "we reviewed the budget",
            "url": "https://cdn.example.com/fresh.mp3"
        })))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(path("/search"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({"results": []})))
        .expect(1)
        .mount(&server)
        .await;

    let mut cmd = brainsearch(dir.path());
    cmd.args(["-u", "me", "-t", "tok", "-s", &server.uri(), "-r", "--no-browser"])
        .args(["-f", "*.mp3", "-o", "out/page.html", "budget"]);

    run(cmd)
        .await
        .success()
        .stdout(predicate::str::contains("Loading: talk.mp3"));

    let html = std::fs::read_to_string(dir.path().join("out/page.html")).unwrap();
    assert!(html.contains("No results found"));
}

#[tokio::test]
async fn test_brain_assets_searches_catalog_without_inputs() {
    let server = MockServer::start().await;
    let dir = TempDir::new().unwrap();
    std::fs::write(dir.path().join("notes.txt"), "not audio").unwrap();

    Mock::given(method("GET"))
        .and(path("/assets"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "results": [{
                "asset_id": "cat-1",
                "status": "processed",
                "transcript_exists": true,
                "metadata": {"filename": "archive.mp3"},
                "url": "https://cdn.example.com/archive.mp3",
                "duration": 600.0
            }]
        })))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(path("/assets"))
        .respond_with(ResponseTemplate::new(500))
        .expect(0)
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(path("/search"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "results": [{
                "asset_id": "cat-1",
                "hits": [{"quality": 0.75, "time": 12.0}]
            }]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let mut cmd = brainsearch(dir.path());
    cmd.args(["-u", "me", "-t", "tok", "-s", &server.uri(), "-b", "--no-browser", "budget"]);

    run(cmd)
        .await
        .success()
        .stdout(predicate::str::contains("No valid input files found.").not())
        .stdout(predicate::str::contains("Found 1 hits"));

    let html = std::fs::read_to_string(dir.path().join("results.html")).unwrap();
    assert!(html.contains("archive.mp3"));
    assert!(html.contains("https://cdn.example.com/archive.mp3"));
    assert!(html.contains("this.currentTime = 12;"));
}
