//! Typed tool arguments.
//!
//! Raw `tools/call` arguments arrive as an untyped JSON object. Instead of
//! optional-chaining fields at each use site, extraction is a total function
//! from `(tool name, arguments)` to either a tagged `ToolCommand` variant
//! carrying a validated payload, or a specific missing/invalid-field error.

use crate::error::{Error, Result};
use crate::runner::command::TestRunOptions;
use serde_json::Value;
use std::path::PathBuf;

pub const DEFAULT_DEV_SERVER_PORT: u16 = 8000;

/// One validated tool invocation.
#[derive(Debug, Clone, PartialEq)]
pub enum ToolCommand {
    SetProject { path: PathBuf },
    ListProjects,
    RunTests(TestRunOptions),
    ListTests,
    CheckEnvironment,
    ClearScreenshots,
    InstallChromeDriver { version: Option<String> },
    StartDevServer { port: u16 },
}

/// Extract and validate the arguments for `name`.
///
/// # Errors
///
/// `Error::UnknownTool` for a name outside the catalog,
/// `Error::MissingArgument` / `Error::InvalidArgument` for bad payloads.
pub fn extract(name: &str, args: &Value) -> Result<ToolCommand> {
    match name {
        "set_laravel_project" => Ok(ToolCommand::SetProject {
            path: PathBuf::from(require_str(args, "path")?),
        }),
        "list_laravel_projects" => Ok(ToolCommand::ListProjects),
        "run_dusk_test" => Ok(ToolCommand::RunTests(TestRunOptions {
            test: optional_str(args, "test")?,
            filter: optional_str(args, "filter")?,
            group: optional_str(args, "group")?,
            headless: optional_bool(args, "headless")?.unwrap_or(true),
        })),
        "list_dusk_tests" => Ok(ToolCommand::ListTests),
        "check_dusk_environment" => Ok(ToolCommand::CheckEnvironment),
        "clear_dusk_screenshots" => Ok(ToolCommand::ClearScreenshots),
        "install_chrome_driver" => Ok(ToolCommand::InstallChromeDriver {
            version: optional_str(args, "version")?,
        }),
        "start_dev_server" => Ok(ToolCommand::StartDevServer {
            port: optional_port(args, "port")?.unwrap_or(DEFAULT_DEV_SERVER_PORT),
        }),
        other => Err(Error::UnknownTool(other.to_string())),
    }
}

// ─── Field helpers ────────────────────────────────────────────────────────────

fn require_str(args: &Value, key: &'static str) -> Result<String> {
    match args.get(key) {
        Some(Value::String(s)) if !s.is_empty() => Ok(s.clone()),
        Some(Value::String(_)) => Err(Error::InvalidArgument {
            name: key,
            reason: "must not be empty".into(),
        }),
        Some(_) => Err(Error::InvalidArgument {
            name: key,
            reason: "must be a string".into(),
        }),
        None => Err(Error::MissingArgument(key)),
    }
}

fn optional_str(args: &Value, key: &'static str) -> Result<Option<String>> {
    match args.get(key) {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(s)) => Ok(Some(s.clone())),
        Some(_) => Err(Error::InvalidArgument {
            name: key,
            reason: "must be a string".into(),
        }),
    }
}

fn optional_bool(args: &Value, key: &'static str) -> Result<Option<bool>> {
    match args.get(key) {
        None | Some(Value::Null) => Ok(None),
        Some(Value::Bool(b)) => Ok(Some(*b)),
        Some(_) => Err(Error::InvalidArgument {
            name: key,
            reason: "must be a boolean".into(),
        }),
    }
}

fn optional_port(args: &Value, key: &'static str) -> Result<Option<u16>> {
    match args.get(key) {
        None | Some(Value::Null) => Ok(None),
        Some(Value::Number(n)) => n
            .as_u64()
            .filter(|p| (1..=65535).contains(p))
            .map(|p| Some(p as u16))
            .ok_or(Error::InvalidArgument {
                name: key,
                reason: "must be a port number between 1 and 65535".into(),
            }),
        Some(_) => Err(Error::InvalidArgument {
            name: key,
            reason: "must be a number".into(),
        }),
    }
}

// ─── Tests ────────────────────────────────────────────────────────────────────
