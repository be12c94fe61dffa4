//! End-to-end CLI tests for the tracker-scraper binary.

use std::path::Path;

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

mod support;
use support::pages::{base_url, list_page, mount_list, mount_project, project_row};
use support::socket_guard::start_mock_server_or_skip;

/// Binary command isolated from the user's config file.
fn scraper_cmd(config_home: &Path) -> Command {
    let mut cmd = Command::cargo_bin("tracker-scraper").unwrap();
    cmd.env("XDG_CONFIG_HOME", config_home).env_remove("RUST_LOG");
    cmd
}

#[test]
fn test_binary_help_displays_usage() {
    let home = TempDir::new().unwrap();
    scraper_cmd(home.path())
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("Scrape a client's projects"))
        .stdout(predicate::str::contains("--delay-ms"));
}

#[test]
fn test_binary_version_displays_version() {
    let home = TempDir::new().unwrap();
    scraper_cmd(home.path())
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("tracker-scraper"));
}

#[test]
fn test_binary_invalid_flag_returns_error() {
    let home = TempDir::new().unwrap();
    scraper_cmd(home.path())
        .arg("--invalid-flag")
        .assert()
        .failure()
        .stderr(predicate::str::contains("error"));
}

#[test]
fn test_binary_rejects_out_of_range_delay() {
    let home = TempDir::new().unwrap();
    scraper_cmd(home.path())
        .args(["--delay-ms", "60001"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("60001"));
}

#[test]
fn test_binary_rejects_unknown_config_key() {
    let home = TempDir::new().unwrap();
    let dir = home.path().join("tracker-scraper");
    std::fs::create_dir_all(&dir).unwrap();
    std::fs::write(dir.join("config.toml"), "threads = 4\n").unwrap();

    scraper_cmd(home.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("Unknown configuration key"));
}

#[test]
fn test_binary_rejects_invalid_base_url() {
    let home = TempDir::new().unwrap();
    scraper_cmd(home.path())
        .args(["--base-url", "ftp://tracker.example/", "--no-progress"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Failed to initialize scraper"));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_binary_writes_export() {
    let Some(server) = start_mock_server_or_skip().await else {
        return;
    };
    mount_list(&server, "12-34", list_page(&[project_row("701", "Gym")])).await;
    mount_project(&server, "701", "61234-56", "Gym Retrofit", "1 YR VOID").await;

    let home = TempDir::new().unwrap();
    let out = TempDir::new().unwrap();
    let base = base_url(&server);
    let home_path = home.path().to_path_buf();
    let out_path = out.path().to_path_buf();

    tokio::task::spawn_blocking(move || {
        scraper_cmd(&home_path)
            .args(["12-34", "--no-progress", "--addresses", "--base-url", &base, "-o"])
            .arg(&out_path)
            .assert()
            .success();
    })
    .await
    .unwrap();

    let exports: Vec<_> = std::fs::read_dir(out.path())
        .unwrap()
        .map(|entry| entry.unwrap().path())
        .collect();
    assert_eq!(exports.len(), 1);
    let name = exports[0].file_name().unwrap().to_string_lossy().to_string();
    assert!(name.starts_with("projects_") && name.ends_with(".json"));

    let value: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(&exports[0]).unwrap()).unwrap();
    assert_eq!(value["client_id"], "12-34");
    assert_eq!(value["sheets"][0]["rows"][0][3], "Gym Retrofit");
    assert_eq!(value["sheets"][3]["name"], "Addresses");
}

#[tokio::test(flavor = "multi_thread")]
async fn test_binary_fails_when_no_projects_found() {
    let Some(server) = start_mock_server_or_skip().await else {
        return;
    };
    mount_list(&server, "12-34", list_page(&[])).await;

    let home = TempDir::new().unwrap();
    let out = TempDir::new().unwrap();
    let base = base_url(&server);
    let home_path = home.path().to_path_buf();
    let out_path = out.path().to_path_buf();

    tokio::task::spawn_blocking(move || {
        scraper_cmd(&home_path)
            .args(["12-34", "--no-progress", "--base-url", &base, "-o"])
            .arg(&out_path)
            .assert()
            .failure()
            .stderr(predicate::str::contains("no projects found"));
    })
    .await
    .unwrap();

    assert_eq!(std::fs::read_dir(out.path()).unwrap().count(), 0);
}
