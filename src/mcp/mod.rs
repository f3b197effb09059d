//! Model Context Protocol (MCP) server surface for `dusk-mcp`.
//!
//! The server speaks MCP 2024-11-05 over newline-delimited JSON-RPC on
//! stdio and exposes the Dusk tool catalog plus screenshot/log resources.
//!
//! ## Submodules
//!
//! | Module | Role |
//! |--------|------|
//! | `transport` | JSON-RPC wire types, lifecycle handlers, the stdio serve loop |
//! | `tools` | `tools/list` response — the 8 Dusk tool definitions |
//! | `args` | Typed extraction of `tools/call` arguments into `ToolCommand` |
//! | `dispatch` | `tools/call` dispatcher — routes to `tools::project` / `tools::dusk` |
//! | `capabilities` | Capability advertisement during the `initialize` handshake |

pub mod args;
pub mod capabilities;
pub mod dispatch;
pub mod tools;
pub mod transport;

// ─── Flat re-exports ──────────────────────────────────────────────────────────

pub use transport::{
    parse_request, serve, McpError, McpRequest, ServeReport, MCP_INTERNAL_ERROR,
    MCP_INVALID_PARAMS, MCP_INVALID_REQUEST, MCP_METHOD_NOT_FOUND, MCP_PARSE_ERROR,
    MCP_PROTOCOL_VERSION,
};

pub use tools::{dusk_tools, handle_tools_list, McpToolDef};

pub use args::ToolCommand;

pub use dispatch::McpDispatcher;

pub use capabilities::ServerCapabilities;
