//! Laravel project resolution and discovery.
//!
//! A directory qualifies as a Dusk-capable project when it holds a
//! `composer.json` that parses and declares `laravel/dusk` (in `require` or
//! `require-dev`), plus the `artisan` entry point. Validation fails closed:
//! any missing file or parse failure yields `is_valid = false`, never an
//! error. Discovery scans a fixed ordered list of conventional roots and
//! skips anything it cannot read.

use crate::config::{CONSOLE_LOGS_DIR, SCREENSHOTS_DIR};
use serde_json::Value;
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::{debug, warn};

/// Composer dependency key that marks a project as Dusk-capable.
const DUSK_PACKAGE: &str = "laravel/dusk";

/// Home-relative directories conventionally holding Laravel projects,
/// probed in this order after the working directory.
const HOME_SEARCH_DIRS: &[&str] = &["Sites", "Herd", "Code", "Projects"];

/// System-wide web roots probed last.
const SYSTEM_SEARCH_ROOTS: &[&str] = &["/var/www", "/srv/www"];

// ─── ProjectContext ───────────────────────────────────────────────────────────

/// The result of validating one candidate directory. Recomputed on demand,
/// never persisted.
#[derive(Debug, Clone)]
pub struct ProjectContext {
    pub path: PathBuf,
    /// True only when both marker files exist, the manifest parses, and the
    /// Dusk dependency is declared.
    pub is_valid: bool,
    /// True when `laravel/dusk` appears in `require` or `require-dev`.
    pub has_test_runner: bool,
}

// ─── ActiveProject ────────────────────────────────────────────────────────────

/// The currently selected project plus its fixed artifact subpaths.
///
/// Constructed at startup (or by the set-project tool) and handed to every
/// handler through `AppContext` — there is deliberately no module-level
/// mutable default.
#[derive(Debug, Clone)]
pub struct ActiveProject {
    pub root: PathBuf,
    pub screenshots_dir: PathBuf,
    pub logs_dir: PathBuf,
}

impl ActiveProject {
    pub fn new(root: PathBuf) -> Self {
        let screenshots_dir = root.join(SCREENSHOTS_DIR);
        let logs_dir = root.join(CONSOLE_LOGS_DIR);
        Self {
            root,
            screenshots_dir,
            logs_dir,
        }
    }

    /// Directory holding the browser test files.
    pub fn browser_tests_dir(&self) -> PathBuf {
        self.root.join("tests").join("Browser")
    }

    /// Conventional installed-dependency marker. Existence is the only
    /// signal — the directory is never read.
    pub fn dusk_vendor_dir(&self) -> PathBuf {
        self.root.join("vendor").join("laravel").join("dusk")
    }
}

// ─── Validation ───────────────────────────────────────────────────────────────

/// Validate `path` as a Laravel project with Dusk installed.
///
/// Never errors: every failure mode (missing files, unreadable or malformed
/// composer.json, missing dependency key) collapses into the boolean fields
/// of the returned context.
pub async fn inspect(path: &Path) -> ProjectContext {
    let manifest = path.join("composer.json");
    let artisan = path.join("artisan");

    if !manifest.is_file() || !artisan.is_file() {
        return ProjectContext {
            path: path.to_path_buf(),
            is_valid: false,
            has_test_runner: false,
        };
    }

    let has_test_runner = match fs::read_to_string(&manifest).await {
        Ok(raw) => match serde_json::from_str::<Value>(&raw) {
            Ok(composer) => declares_dusk(&composer),
            Err(e) => {
                debug!(path = %manifest.display(), err = %e, "composer.json does not parse");
                return ProjectContext {
                    path: path.to_path_buf(),
                    is_valid: false,
                    has_test_runner: false,
                };
            }
        },
        Err(e) => {
            debug!(path = %manifest.display(), err = %e, "composer.json unreadable");
            return ProjectContext {
                path: path.to_path_buf(),
                is_valid: false,
                has_test_runner: false,
            };
        }
    };

    ProjectContext {
        path: path.to_path_buf(),
        is_valid: has_test_runner,
        has_test_runner,
    }
}

/// Shorthand for `inspect(path).await.is_valid`.
pub async fn validate(path: &Path) -> bool {
    inspect(path).await.is_valid
}

fn declares_dusk(composer: &Value) -> bool {
    ["require", "require-dev"].iter().any(|section| {
        composer
            .get(section)
            .and_then(Value::as_object)
            .is_some_and(|deps| deps.contains_key(DUSK_PACKAGE))
    })
}

// ─── Discovery ────────────────────────────────────────────────────────────────

/// The fixed ordered list of search roots: working directory first, then
/// conventional home subdirectories, then system web roots.
pub fn search_roots() -> Vec<PathBuf> {
    let mut roots = Vec::new();
    if let Ok(cwd) = std::env::current_dir() {
        roots.push(cwd);
    }
    if let Ok(home) = std::env::var("HOME") {
        for dir in HOME_SEARCH_DIRS {
            roots.push(PathBuf::from(&home).join(dir));
        }
    }
    for root in SYSTEM_SEARCH_ROOTS {
        roots.push(PathBuf::from(root));
    }
    roots
}

/// Scan every search root for qualifying projects.
///
/// For each root, immediate subdirectories are validated independently; a
/// root that does not exist or cannot be read is skipped without aborting
/// the rest. Result order follows root order then directory listing order,
/// deduplicated keeping the first occurrence.
pub async fn discover() -> Vec<PathBuf> {
    discover_in(&search_roots()).await
}

/// Discovery over an explicit root list — the testable core of `discover`.
pub async fn discover_in(roots: &[PathBuf]) -> Vec<PathBuf> {
    let mut found = Vec::new();
    for root in roots {
        let mut entries = match fs::read_dir(root).await {
            Ok(entries) => entries,
            Err(e) => {
                debug!(root = %root.display(), err = %e, "search root skipped");
                continue;
            }
        };
        loop {
            let entry = match entries.next_entry().await {
                Ok(Some(entry)) => entry,
                Ok(None) => break,
                Err(e) => {
                    warn!(root = %root.display(), err = %e, "directory entry unreadable — skipped");
                    break;
                }
            };
            let candidate = entry.path();
            if !candidate.is_dir() {
                continue;
            }
            if validate(&candidate).await {
                found.push(candidate);
            }
        }
    }

    // Dedup preserving first occurrence — the same project can appear under
    // two roots (e.g. cwd inside ~/Sites).
    let mut seen = std::collections::HashSet::new();
    found.retain(|p| seen.insert(p.clone()));
    found
}

// ─── Tests ────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn declares_dusk_in_require_dev() {
        let composer = json!({
            "require": { "php": "^8.2" },
            "require-dev": { "laravel/dusk": "^8.0" }
        });
        assert!(declares_dusk(&composer));
    }

    #[test]
    fn declares_dusk_in_require() {
        let composer = json!({ "require": { "laravel/dusk": "^8.0" } });
        assert!(declares_dusk(&composer));
    }

    #[test]
    fn missing_dusk_key() {
        let composer = json!({
            "require": { "laravel/framework": "^11.0" },
            "require-dev": { "phpunit/phpunit": "^11.0" }
        });
        assert!(!declares_dusk(&composer));
    }

    #[test]
    fn non_object_sections_are_ignored() {
        let composer = json!({ "require": ["laravel/dusk"] });
        assert!(!declares_dusk(&composer));
    }

    #[test]
    fn active_project_subpaths() {
        let p = ActiveProject::new(PathBuf::from("/srv/app"));
        assert_eq!(
            p.screenshots_dir,
            PathBuf::from("/srv/app/tests/Browser/screenshots")
        );
        assert_eq!(
            p.logs_dir,
            PathBuf::from("/srv/app/tests/Browser/console")
        );
        assert_eq!(
            p.dusk_vendor_dir(),
            PathBuf::from("/srv/app/vendor/laravel/dusk")
        );
    }
}
