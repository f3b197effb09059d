/// MCP `tools/call` dispatcher — routes tool invocations to internal handlers.
///
/// `McpDispatcher` holds a reference to `AppContext` and maps tool names to
/// the handler functions in `mcp::tools::*`. An unknown tool name is the
/// ONLY failure that escapes as a protocol-level error; missing arguments
/// and every handler-internal failure (validation, execution, parsing) are
/// rendered as a textual `isError` content item so one failed call never
/// terminates the session.
use crate::error::{Error, Result};
use crate::AppContext;
use serde_json::{json, Value};
use std::sync::Arc;
use tracing::{info, warn};

use super::args::{self, ToolCommand};
use super::tools as tool_list;

pub struct McpDispatcher {
    ctx: Arc<AppContext>,
}

impl McpDispatcher {
    pub fn new(ctx: Arc<AppContext>) -> Self {
        Self { ctx }
    }

    pub fn context(&self) -> &Arc<AppContext> {
        &self.ctx
    }

    /// Dispatch a `tools/call` invocation.
    ///
    /// `tool_name`  — the `name` field from the MCP `tools/call` params.
    /// `arguments`  — the `arguments` object from the MCP `tools/call` params.
    ///
    /// Returns `Ok(Value)` with the tool result content (success or
    /// downgraded failure), or `Err(Error::UnknownTool)` for a name outside
    /// the catalog.
    pub async fn dispatch(&self, tool_name: &str, arguments: Value) -> Result<Value> {
        // Verify the tool is in the catalogue first.
        if !tool_list::is_known_tool(tool_name) {
            warn!(tool = tool_name, "MCP unknown tool");
            return Err(Error::UnknownTool(tool_name.to_string()));
        }

        // Missing/invalid arguments are an environmental condition: report
        // them in-band, not as a protocol fault.
        let command = match args::extract(tool_name, &arguments) {
            Ok(command) => command,
            Err(e) => {
                warn!(tool = tool_name, err = %e, "MCP argument rejected");
                return Ok(error_content(&e.to_string()));
            }
        };

        let result = self.run_command(command).await;

        match result {
            Ok(text) => {
                info!(tool = tool_name, "MCP tool executed");
                Ok(text_content(&text))
            }
            Err(e) => {
                warn!(tool = tool_name, err = %e, "MCP tool failed");
                Ok(error_content(&e.to_string()))
            }
        }
    }

    /// Route one validated command to its handler.
    async fn run_command(&self, command: ToolCommand) -> Result<String> {
        let ctx = &self.ctx;
        match command {
            ToolCommand::SetProject { path } => super::tools::project::set_project(ctx, path).await,
            ToolCommand::ListProjects => super::tools::project::list_projects(ctx).await,
            ToolCommand::RunTests(options) => super::tools::dusk::run_tests(ctx, options).await,
            ToolCommand::ListTests => super::tools::dusk::list_tests(ctx).await,
            ToolCommand::CheckEnvironment => super::tools::dusk::check_environment(ctx).await,
            ToolCommand::ClearScreenshots => super::tools::dusk::clear_screenshots(ctx).await,
            ToolCommand::InstallChromeDriver { version } => {
                super::tools::dusk::install_chrome_driver(ctx, version).await
            }
            ToolCommand::StartDevServer { port } => {
                super::tools::dusk::start_dev_server(ctx, port).await
            }
        }
    }
}

// ─── Content framing ──────────────────────────────────────────────────────────

fn text_content(text: &str) -> Value {
    json!({
        "content": [{ "type": "text", "text": text }],
        "isError": false
    })
}

fn error_content(message: &str) -> Value {
    json!({
        "content": [{ "type": "text", "text": format!("Error: {message}") }],
        "isError": true
    })
}

// ─── Tests ────────────────────────────────────────────────────────────────────
