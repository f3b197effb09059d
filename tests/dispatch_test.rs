// SPDX-License-Identifier: MIT
//! Integration tests for MCP dispatch, tool calls, and artifact resources.

use dusk_mcp::artifacts::{self, ResourceContent};
use dusk_mcp::config::ServerConfig;
use dusk_mcp::error::Error;
use dusk_mcp::mcp::transport::{handle_request, parse_request, MCP_INVALID_PARAMS};
use dusk_mcp::mcp::McpDispatcher;
use dusk_mcp::project::ActiveProject;
use dusk_mcp::AppContext;
use serde_json::{json, Value};
use std::fs;
use std::path::Path;
use std::sync::Arc;
use tempfile::TempDir;

fn scaffold_dusk_project(root: &Path) {
    fs::write(
        root.join("composer.json"),
        r#"{"require-dev":{"laravel/dusk":"^8.0"}}"#,
    )
    .unwrap();
    fs::write(root.join("artisan"), "#!/usr/bin/env php\n").unwrap();
}

fn dispatcher() -> McpDispatcher {
    McpDispatcher::new(Arc::new(AppContext::new(ServerConfig::default())))
}

fn content_text(result: &Value) -> &str {
    result["content"][0]["text"].as_str().unwrap()
}

// ─── tools/call ───────────────────────────────────────────────────────────────

#[tokio::test]
async fn unknown_tool_is_a_protocol_error() {
    let d = dispatcher();
    let err = d.dispatch("bogus_tool", json!({})).await.unwrap_err();
    assert!(matches!(err, Error::UnknownTool(_)));
    assert!(err.is_protocol_fault());
}

#[tokio::test]
async fn missing_argument_is_downgraded_to_error_content() {
    let d = dispatcher();
    // set_laravel_project requires "path" — the call still succeeds at the
    // protocol level.
    let result = d.dispatch("set_laravel_project", json!({})).await.unwrap();
    assert_eq!(result["isError"], true);
    assert!(content_text(&result).contains("missing required argument 'path'"));
}

#[tokio::test]
async fn set_project_activates_valid_directory() {
    let tmp = TempDir::new().unwrap();
    scaffold_dusk_project(tmp.path());

    let d = dispatcher();
    let result = d
        .dispatch(
            "set_laravel_project",
            json!({ "path": tmp.path().to_str().unwrap() }),
        )
        .await
        .unwrap();
    assert_eq!(result["isError"], false);

    let active = d.context().active_project().await.unwrap();
    assert_eq!(active.root, tmp.path());
}

#[tokio::test]
async fn set_project_rejects_invalid_directory() {
    let tmp = TempDir::new().unwrap();

    let d = dispatcher();
    let result = d
        .dispatch(
            "set_laravel_project",
            json!({ "path": tmp.path().to_str().unwrap() }),
        )
        .await
        .unwrap();
    assert_eq!(result["isError"], true);
    assert!(content_text(&result).contains("not a valid Laravel project"));
    assert!(d.context().active.read().await.is_none());
}

#[tokio::test]
async fn run_without_active_project_reports_in_band() {
    let d = dispatcher();
    let result = d.dispatch("run_dusk_test", json!({})).await.unwrap();
    assert_eq!(result["isError"], true);
    assert!(content_text(&result).contains("no active Laravel project"));
}

#[tokio::test]
async fn clear_screenshots_removes_only_pngs() {
    let tmp = TempDir::new().unwrap();
    scaffold_dusk_project(tmp.path());
    let shots = tmp.path().join("tests/Browser/screenshots");
    fs::create_dir_all(&shots).unwrap();
    fs::write(shots.join("failure-login.png"), [0x89, 0x50]).unwrap();
    fs::write(shots.join("keep.txt"), "notes").unwrap();

    let d = dispatcher();
    *d.context().active.write().await = Some(ActiveProject::new(tmp.path().to_path_buf()));

    let result = d
        .dispatch("clear_dusk_screenshots", json!({}))
        .await
        .unwrap();
    assert_eq!(result["isError"], false);
    assert!(!shots.join("failure-login.png").exists());
    assert!(shots.join("keep.txt").exists());
}

#[tokio::test]
async fn list_tests_finds_test_classes_and_skips_artifacts() {
    let tmp = TempDir::new().unwrap();
    scaffold_dusk_project(tmp.path());
    let browser = tmp.path().join("tests/Browser");
    fs::create_dir_all(browser.join("Auth")).unwrap();
    fs::create_dir_all(browser.join("screenshots")).unwrap();
    fs::write(browser.join("LoginTest.php"), "<?php\n").unwrap();
    fs::write(browser.join("Auth/RegisterTest.php"), "<?php\n").unwrap();
    fs::write(browser.join("Helper.php"), "<?php\n").unwrap();
    fs::write(browser.join("screenshots/FakeTest.php"), "<?php\n").unwrap();

    let d = dispatcher();
    *d.context().active.write().await = Some(ActiveProject::new(tmp.path().to_path_buf()));

    let result = d.dispatch("list_dusk_tests", json!({})).await.unwrap();
    assert_eq!(result["isError"], false);
    let text = content_text(&result);
    assert!(text.contains("LoginTest.php"), "{text}");
    assert!(text.contains("RegisterTest.php"), "{text}");
    assert!(!text.contains("Helper.php"), "{text}");
    assert!(!text.contains("FakeTest.php"), "{text}");
}

// ─── Transport routing ────────────────────────────────────────────────────────

#[tokio::test]
async fn unknown_tool_surfaces_as_invalid_params_frame() {
    let d = dispatcher();
    let frame = json!({
        "jsonrpc": "2.0",
        "id": 42,
        "method": "tools/call",
        "params": { "name": "bogus_tool", "arguments": {} }
    });
    let request = parse_request(&frame).unwrap();
    let err = handle_request(&d, request).await.unwrap_err();
    assert_eq!(err.code, MCP_INVALID_PARAMS);
    assert!(err.message.contains("unknown tool"));
}

#[tokio::test]
async fn tools_list_names_the_catalog() {
    let d = dispatcher();
    let frame = json!({ "jsonrpc": "2.0", "id": 1, "method": "tools/list" });
    let request = parse_request(&frame).unwrap();
    let response = handle_request(&d, request).await.unwrap().unwrap();
    let tools = response["result"]["tools"].as_array().unwrap();
    assert_eq!(tools.len(), 8);
    let names: Vec<&str> = tools.iter().map(|t| t["name"].as_str().unwrap()).collect();
    assert!(names.contains(&"run_dusk_test"));
    assert!(names.contains(&"set_laravel_project"));
}

#[tokio::test]
async fn resources_list_is_empty_without_active_project() {
    let d = dispatcher();
    let frame = json!({ "jsonrpc": "2.0", "id": 2, "method": "resources/list" });
    let request = parse_request(&frame).unwrap();
    let response = handle_request(&d, request).await.unwrap().unwrap();
    assert_eq!(response["result"]["resources"], json!([]));
}

// ─── Artifact resources ───────────────────────────────────────────────────────

#[tokio::test]
async fn artifacts_list_and_read_round_trip() {
    let tmp = TempDir::new().unwrap();
    scaffold_dusk_project(tmp.path());
    let shots = tmp.path().join("tests/Browser/screenshots");
    let logs = tmp.path().join("tests/Browser/console");
    fs::create_dir_all(&shots).unwrap();
    fs::create_dir_all(&logs).unwrap();
    fs::write(shots.join("failure-checkout.png"), [0x89, 0x50, 0x4e, 0x47]).unwrap();
    fs::write(logs.join("chrome.log"), "console: boom\n").unwrap();

    let project = ActiveProject::new(tmp.path().to_path_buf());

    let resources = artifacts::list(&project).await;
    let uris: Vec<&str> = resources.iter().map(|r| r.uri.as_str()).collect();
    assert!(uris.contains(&"screenshot://failure-checkout.png"));
    assert!(uris.contains(&"log://chrome.log"));

    match artifacts::read(&project, "screenshot://failure-checkout.png")
        .await
        .unwrap()
    {
        ResourceContent::Blob { mime_type, base64 } => {
            assert_eq!(mime_type, "image/png");
            assert!(!base64.is_empty());
        }
        other => panic!("expected blob, got {other:?}"),
    }

    match artifacts::read(&project, "log://chrome.log").await.unwrap() {
        ResourceContent::Text { mime_type, text } => {
            assert_eq!(mime_type, "text/plain");
            assert_eq!(text, "console: boom\n");
        }
        other => panic!("expected text, got {other:?}"),
    }
}

#[tokio::test]
async fn unknown_resource_scheme_is_rejected() {
    let tmp = TempDir::new().unwrap();
    let project = ActiveProject::new(tmp.path().to_path_buf());
    let err = artifacts::read(&project, "trace://nope").await.unwrap_err();
    assert!(matches!(err, Error::UnknownResource(_)));
}

#[tokio::test]
async fn missing_artifact_dirs_list_empty() {
    let tmp = TempDir::new().unwrap();
    let project = ActiveProject::new(tmp.path().to_path_buf());
    assert!(artifacts::list(&project).await.is_empty());
}
