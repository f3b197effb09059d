use serde::Deserialize;
use std::path::{Path, PathBuf};
use tracing::error;

/// Relative path (under the project root) where Dusk writes screenshots.
pub const SCREENSHOTS_DIR: &str = "tests/Browser/screenshots";
/// Relative path (under the project root) where Dusk writes console logs.
pub const CONSOLE_LOGS_DIR: &str = "tests/Browser/console";

// ─── TOML config file ─────────────────────────────────────────────────────────

/// Optional `config.toml` next to nothing in particular — the path is given
/// explicitly via `--config` or `DUSK_MCP_CONFIG`. All fields are overrides.
/// Priority: CLI / env var  >  TOML  >  built-in default.
#[derive(Deserialize, Default)]
struct TomlConfig {
    /// Initial Laravel project path.
    project_path: Option<PathBuf>,
    /// Log level filter string, e.g. "debug", "info,dusk_mcp=trace" (default: "info").
    log: Option<String>,
    /// Log output format: "pretty" (default, human-readable) | "json" (structured).
    log_format: Option<String>,
}

fn load_toml(path: &Path) -> Option<TomlConfig> {
    let contents = std::fs::read_to_string(path).ok()?;
    match toml::from_str::<TomlConfig>(&contents) {
        Ok(cfg) => Some(cfg),
        Err(e) => {
            error!(path = %path.display(), err = %e, "failed to parse config file — using defaults");
            None
        }
    }
}

// ─── ServerConfig ─────────────────────────────────────────────────────────────

#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Initial project path, if one was configured. `None` falls through to
    /// working-directory probing and then discovery at startup.
    pub project_path: Option<PathBuf>,
    /// Log level filter string.
    pub log: String,
    /// Log output format: "pretty" | "json".
    pub log_format: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            project_path: None,
            log: "info".to_string(),
            log_format: "pretty".to_string(),
        }
    }
}

impl ServerConfig {
    /// Build config from CLI/env args + optional TOML file.
    ///
    /// Priority (highest to lowest):
    ///   1. CLI / env — passed as `Some(value)` from clap
    ///   2. TOML file at `config_file`, when given
    ///   3. Built-in defaults
    pub fn new(
        project_path: Option<PathBuf>,
        log: Option<String>,
        log_format: Option<String>,
        config_file: Option<&Path>,
    ) -> Self {
        let toml = config_file.and_then(load_toml).unwrap_or_default();

        let project_path = project_path
            .or_else(|| {
                std::env::var("LARAVEL_PROJECT_PATH")
                    .ok()
                    .filter(|s| !s.is_empty())
                    .map(PathBuf::from)
            })
            .or(toml.project_path);

        let log = log.or(toml.log).unwrap_or_else(|| "info".to_string());

        let log_format = log_format
            .or(toml.log_format)
            .unwrap_or_else(|| "pretty".to_string());

        Self {
            project_path,
            log,
            log_format,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_when_nothing_given() {
        // LARAVEL_PROJECT_PATH may leak in from the environment; only assert
        // the fields we fully control here.
        let cfg = ServerConfig::new(None, None, None, None);
        assert_eq!(cfg.log, "info");
        assert_eq!(cfg.log_format, "pretty");
    }

    #[test]
    fn cli_wins_over_default() {
        let cfg = ServerConfig::new(
            Some(PathBuf::from("/srv/app")),
            Some("debug".into()),
            Some("json".into()),
            None,
        );
        assert_eq!(cfg.project_path.as_deref(), Some(Path::new("/srv/app")));
        assert_eq!(cfg.log, "debug");
        assert_eq!(cfg.log_format, "json");
    }
}
