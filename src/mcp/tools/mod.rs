/// MCP `tools/list` handler — exposes the Dusk orchestration catalog as MCP
/// tool definitions.
///
/// Each tool definition follows the JSON Schema convention for `inputSchema`.
/// Agents call `tools/list` to discover available tools, then invoke them via
/// `tools/call` (dispatched by `mcp::dispatch`).
///
/// Tool implementation submodules:
/// - `project` — set_laravel_project, list_laravel_projects
/// - `dusk` — run_dusk_test, list_dusk_tests, check_dusk_environment,
///   clear_dusk_screenshots, install_chrome_driver, start_dev_server
pub mod dusk;
pub mod project;

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

// ─── Tool definition type ─────────────────────────────────────────────────────

/// A single MCP tool definition, as returned in `tools/list`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct McpToolDef {
    pub name: String,
    pub description: String,
    #[serde(rename = "inputSchema")]
    pub input_schema: Value,
}

impl McpToolDef {
    fn new(name: &str, description: &str, input_schema: Value) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            input_schema,
        }
    }
}

// ─── Tool catalogue ───────────────────────────────────────────────────────────

/// Returns the full hand-authored tool catalog.
///
/// Defined as a function (not a static) because `serde_json::json!` produces
/// a non-`const` `Value`. The list is small and cheap to allocate.
pub fn dusk_tools() -> Vec<McpToolDef> {
    vec![
        // ── set_laravel_project ───────────────────────────────────────────────
        McpToolDef::new(
            "set_laravel_project",
            "Select the Laravel project all other tools operate on. The path must contain composer.json and artisan, and declare laravel/dusk.",
            json!({
                "type": "object",
                "required": ["path"],
                "properties": {
                    "path": {
                        "type": "string",
                        "description": "Absolute path to the Laravel project root."
                    }
                },
                "additionalProperties": false
            }),
        ),

        // ── list_laravel_projects ─────────────────────────────────────────────
        McpToolDef::new(
            "list_laravel_projects",
            "Scan conventional locations (working directory, ~/Sites, ~/Herd, ~/Code, ~/Projects, /var/www, /srv/www) for Laravel projects with Dusk installed.",
            json!({
                "type": "object",
                "properties": {},
                "additionalProperties": false
            }),
        ),

        // ── run_dusk_test ─────────────────────────────────────────────────────
        McpToolDef::new(
            "run_dusk_test",
            "Run Dusk browser tests in the active project and return a parsed result summary.",
            json!({
                "type": "object",
                "properties": {
                    "test": {
                        "type": "string",
                        "description": "A single test file or class to run (e.g. tests/Browser/LoginTest.php). Runs the whole suite when omitted."
                    },
                    "filter": {
                        "type": "string",
                        "description": "PHPUnit --filter pattern to select test methods."
                    },
                    "group": {
                        "type": "string",
                        "description": "PHPUnit --group to run."
                    },
                    "headless": {
                        "type": "boolean",
                        "description": "Run without a visible browser window. Defaults to true; false adds --browse.",
                        "default": true
                    }
                },
                "additionalProperties": false
            }),
        ),

        // ── list_dusk_tests ───────────────────────────────────────────────────
        McpToolDef::new(
            "list_dusk_tests",
            "List the browser test files under tests/Browser in the active project.",
            json!({
                "type": "object",
                "properties": {},
                "additionalProperties": false
            }),
        ),

        // ── check_dusk_environment ────────────────────────────────────────────
        McpToolDef::new(
            "check_dusk_environment",
            "Report whether the active project is ready to run Dusk: marker files, declared and installed dependency, test directory, PHP on PATH.",
            json!({
                "type": "object",
                "properties": {},
                "additionalProperties": false
            }),
        ),

        // ── clear_dusk_screenshots ────────────────────────────────────────────
        McpToolDef::new(
            "clear_dusk_screenshots",
            "Delete all screenshots under tests/Browser/screenshots in the active project.",
            json!({
                "type": "object",
                "properties": {},
                "additionalProperties": false
            }),
        ),

        // ── install_chrome_driver ─────────────────────────────────────────────
        McpToolDef::new(
            "install_chrome_driver",
            "Install or update the ChromeDriver binary via `php artisan dusk:chrome-driver`.",
            json!({
                "type": "object",
                "properties": {
                    "version": {
                        "type": "string",
                        "description": "Specific ChromeDriver version to install. Latest when omitted."
                    }
                },
                "additionalProperties": false
            }),
        ),

        // ── start_dev_server ──────────────────────────────────────────────────
        McpToolDef::new(
            "start_dev_server",
            "Start `php artisan serve` for the active project in the background. Fire-and-forget: the server keeps running and is not tracked.",
            json!({
                "type": "object",
                "properties": {
                    "port": {
                        "type": "number",
                        "description": "Port to serve on.",
                        "default": 8000
                    }
                },
                "additionalProperties": false
            }),
        ),
    ]
}

/// True when `name` appears in the catalog.
pub fn is_known_tool(name: &str) -> bool {
    dusk_tools().iter().any(|t| t.name == name)
}

// ─── tools/list handler ───────────────────────────────────────────────────────

/// Handle a MCP `tools/list` request.
///
/// Returns `{"tools": [...]}` as a `serde_json::Value` ready to embed in a
/// response frame.
pub fn handle_tools_list() -> Value {
    let tools = dusk_tools();
    json!({ "tools": tools })
}

// ─── Tests ────────────────────────────────────────────────────────────────────
