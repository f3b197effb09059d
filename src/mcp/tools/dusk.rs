/// MCP tool handlers for the Dusk test workflow.
///
/// Covers: run_dusk_test, list_dusk_tests, check_dusk_environment,
/// clear_dusk_screenshots, install_chrome_driver, start_dev_server.
/// Project selection lives in `tools/project.rs`.
use crate::error::{Error, Result};
use crate::runner::command::{build_dusk_command, TestRunOptions};
use crate::runner::parse::{parse, TestResultSummary};
use crate::runner;
use crate::AppContext;
use tokio::fs;
use tracing::{info, warn};

/// Directories under tests/Browser that hold artifacts, not test files.
const ARTIFACT_DIRS: &[&str] = &["screenshots", "console", "source"];

// ─── run_dusk_test ────────────────────────────────────────────────────────────

/// MCP `run_dusk_test` handler.
///
/// Builds the runner invocation, executes it in the active project, parses
/// the captured stdout, and formats the summary. A non-zero runner exit
/// surfaces as an ExecutionError carrying the runner's own report — the
/// dispatcher renders it as a textual error response.
pub async fn run_tests(ctx: &AppContext, options: TestRunOptions) -> Result<String> {
    let active = ctx.active_project().await?;
    let command = build_dusk_command(&options);

    info!(command, project = %active.root.display(), "running dusk tests");
    let output = runner::run(&command, &active.root).await?;

    let summary = parse(&output.stdout);
    Ok(format_run_report(&summary, &output.stdout, &output.stderr))
}

fn format_run_report(summary: &TestResultSummary, stdout: &str, stderr: &str) -> String {
    let mut out = String::new();

    if summary.total == 0 {
        out.push_str("Dusk run finished, but no result summary was recognized in the output.\n");
    } else {
        out.push_str(&format!(
            "Dusk run finished: {} test(s), {} passed, {} failed",
            summary.total, summary.passed, summary.failed
        ));
        if !summary.duration.is_empty() {
            out.push_str(&format!(" in {}", summary.duration));
        }
        out.push('\n');
    }

    if !summary.failures.is_empty() {
        out.push_str("\nFailures:\n");
        for (i, failure) in summary.failures.iter().enumerate() {
            out.push_str(&format!("{}) {}\n", i + 1, failure.test));
            if !failure.message.is_empty() {
                for line in failure.message.lines() {
                    out.push_str(&format!("   {line}\n"));
                }
            }
        }
    }

    let trimmed = stdout.trim();
    if !trimmed.is_empty() {
        out.push_str("\nOutput:\n");
        out.push_str(tail(trimmed, 4000));
        out.push('\n');
    }

    // stderr with a zero exit status is runner noise, passed through for
    // display rather than treated as a failure.
    let err_trimmed = stderr.trim();
    if !err_trimmed.is_empty() {
        out.push_str("\nstderr:\n");
        out.push_str(tail(err_trimmed, 1000));
        out.push('\n');
    }

    out
}

/// Last `max` bytes of `s`, snapped to a character boundary.
fn tail(s: &str, max: usize) -> &str {
    if s.len() <= max {
        return s;
    }
    let mut start = s.len() - max;
    while !s.is_char_boundary(start) {
        start += 1;
    }
    &s[start..]
}

// ─── list_dusk_tests ──────────────────────────────────────────────────────────

/// MCP `list_dusk_tests` handler.
///
/// Recursively collects `*Test.php` files under tests/Browser, skipping the
/// artifact subdirectories. Unreadable entries are skipped silently.
pub async fn list_tests(ctx: &AppContext) -> Result<String> {
    let active = ctx.active_project().await?;
    let root = active.browser_tests_dir();
    if !root.is_dir() {
        return Ok(format!(
            "No browser test directory at {}.",
            root.display()
        ));
    }

    let mut found: Vec<String> = Vec::new();
    let mut stack = vec![root.clone()];
    while let Some(dir) = stack.pop() {
        let mut entries = match fs::read_dir(&dir).await {
            Ok(entries) => entries,
            Err(e) => {
                warn!(dir = %dir.display(), err = %e, "test directory unreadable — skipped");
                continue;
            }
        };
        while let Ok(Some(entry)) = entries.next_entry().await {
            let path = entry.path();
            if path.is_dir() {
                let name = entry.file_name();
                let skip = name
                    .to_str()
                    .is_some_and(|n| ARTIFACT_DIRS.contains(&n));
                if !skip {
                    stack.push(path);
                }
                continue;
            }
            if path
                .file_name()
                .and_then(|n| n.to_str())
                .is_some_and(|n| n.ends_with("Test.php"))
            {
                if let Ok(rel) = path.strip_prefix(&active.root) {
                    found.push(rel.display().to_string());
                }
            }
        }
    }

    if found.is_empty() {
        return Ok("No Dusk test files found under tests/Browser.".to_string());
    }

    found.sort();
    let mut out = format!("Found {} Dusk test file(s):\n", found.len());
    for test in &found {
        out.push_str(&format!("  {test}\n"));
    }
    Ok(out)
}

// ─── check_dusk_environment ───────────────────────────────────────────────────

/// MCP `check_dusk_environment` handler.
///
/// A pass/fail checklist over everything a Dusk run needs. Always returns
/// the report — individual failures are findings, not errors.
pub async fn check_environment(ctx: &AppContext) -> Result<String> {
    let active = ctx.active_project().await?;
    let context = crate::project::inspect(&active.root).await;

    let checks: Vec<(&str, bool)> = vec![
        ("composer.json present", active.root.join("composer.json").is_file()),
        ("artisan present", active.root.join("artisan").is_file()),
        ("laravel/dusk declared in composer.json", context.has_test_runner),
        ("laravel/dusk installed (vendor)", active.dusk_vendor_dir().is_dir()),
        ("tests/Browser directory present", active.browser_tests_dir().is_dir()),
        (".env present", active.root.join(".env").is_file()),
        ("php binary on PATH", binary_on_path("php")),
    ];

    let failed = checks.iter().filter(|(_, ok)| !ok).count();
    let mut out = format!(
        "Dusk environment for {}:\n",
        active.root.display()
    );
    for (label, ok) in &checks {
        out.push_str(&format!("  [{}] {label}\n", if *ok { "ok" } else { "missing" }));
    }
    if failed == 0 {
        out.push_str("Environment looks ready to run Dusk tests.\n");
    } else {
        out.push_str(&format!("{failed} check(s) failed.\n"));
    }
    Ok(out)
}

/// Check if a binary is available on PATH using `which` semantics.
fn binary_on_path(binary: &str) -> bool {
    if let Ok(path_var) = std::env::var("PATH") {
        for dir in std::env::split_paths(&path_var) {
            if dir.join(binary).is_file() {
                return true;
            }
        }
    }
    false
}

// ─── clear_dusk_screenshots ───────────────────────────────────────────────────

/// MCP `clear_dusk_screenshots` handler.
///
/// Removes every `.png` under the screenshots directory. An absent
/// directory means nothing to clear; a failed removal is an ExecutionError
/// because deletion is this handler's whole purpose.
pub async fn clear_screenshots(ctx: &AppContext) -> Result<String> {
    let active = ctx.active_project().await?;
    let dir = &active.screenshots_dir;

    let mut entries = match fs::read_dir(dir).await {
        Ok(entries) => entries,
        Err(_) => {
            return Ok(format!(
                "No screenshots directory at {} — nothing to clear.",
                dir.display()
            ))
        }
    };

    let mut removed = 0usize;
    while let Ok(Some(entry)) = entries.next_entry().await {
        let path = entry.path();
        if path.extension().and_then(|e| e.to_str()) != Some("png") {
            continue;
        }
        fs::remove_file(&path)
            .await
            .map_err(|e| Error::Execution(format!("failed to remove {}: {e}", path.display())))?;
        removed += 1;
    }

    info!(removed, dir = %dir.display(), "screenshots cleared");
    Ok(format!("Removed {removed} screenshot(s) from {}.", dir.display()))
}

// ─── install_chrome_driver ────────────────────────────────────────────────────

/// MCP `install_chrome_driver` handler.
///
/// Runs `php artisan dusk:chrome-driver [version]` and returns its output.
pub async fn install_chrome_driver(ctx: &AppContext, version: Option<String>) -> Result<String> {
    let active = ctx.active_project().await?;

    let mut command = String::from("php artisan dusk:chrome-driver");
    if let Some(version) = &version {
        command.push(' ');
        command.push_str(version);
    }

    let output = runner::run(&command, &active.root).await?;
    let mut out = String::from("ChromeDriver install finished.\n");
    if !output.stdout.trim().is_empty() {
        out.push_str(output.stdout.trim());
        out.push('\n');
    }
    Ok(out)
}

// ─── start_dev_server ─────────────────────────────────────────────────────────

/// MCP `start_dev_server` handler.
///
/// Spawns `php artisan serve` detached and returns immediately. The handle
/// is stashed on the context so a stop tool could be added later, but today
/// nothing awaits, polls, or kills the process.
pub async fn start_dev_server(ctx: &AppContext, port: u16) -> Result<String> {
    let active = ctx.active_project().await?;
    let command = format!("php artisan serve --port={port}");

    let handle = runner::spawn_detached(&command, &active.root).await?;
    let pid = handle.pid();
    *ctx.dev_server.write().await = Some(handle);

    Ok(match pid {
        Some(pid) => format!(
            "Development server starting on http://127.0.0.1:{port} (pid {pid}). \
             It is not tracked and will keep running until stopped externally."
        ),
        None => format!("Development server starting on http://127.0.0.1:{port}."),
    })
}

// ─── Tests ────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::runner::parse::FailureRecord;

    #[test]
    fn report_includes_counts_and_duration() {
        let summary = TestResultSummary {
            total: 10,
            passed: 8,
            failed: 2,
            skipped: 0,
            duration: "00:01.234".into(),
            failures: vec![],
        };
        let report = format_run_report(&summary, "raw", "");
        assert!(report.contains("10 test(s), 8 passed, 2 failed"));
        assert!(report.contains("00:01.234"));
        assert!(report.contains("Output:\nraw"));
        assert!(!report.contains("stderr:"));
    }

    #[test]
    fn report_itemizes_failures() {
        let summary = TestResultSummary {
            total: 1,
            passed: 0,
            failed: 1,
            skipped: 0,
            duration: String::new(),
            failures: vec![FailureRecord {
                test: "Tests\\Browser\\LoginTest::testLogin".into(),
                message: "boom\nat line 24".into(),
            }],
        };
        let report = format_run_report(&summary, "", "");
        assert!(report.contains("1) Tests\\Browser\\LoginTest::testLogin"));
        assert!(report.contains("   boom"));
        assert!(report.contains("   at line 24"));
    }

    #[test]
    fn report_passes_stderr_through() {
        let summary = TestResultSummary::default();
        let report = format_run_report(&summary, "", "deprecation warning");
        assert!(report.contains("stderr:\ndeprecation warning"));
        assert!(report.contains("no result summary was recognized"));
    }

    #[test]
    fn tail_snaps_to_char_boundary() {
        let s = "ééééé"; // 2 bytes per char
        let t = tail(s, 3);
        assert_eq!(t, "é");
    }

    #[test]
    fn artifact_dirs_are_skipped_names() {
        assert!(ARTIFACT_DIRS.contains(&"screenshots"));
        assert!(ARTIFACT_DIRS.contains(&"console"));
    }

    #[test]
    fn path_probe_misses_nonexistent_binary() {
        assert!(!binary_on_path("definitely-not-a-real-binary-name-x9"));
    }
}
