//! JSON-RPC 2.0 wire types and the stdio serve loop.
//!
//! Frames are newline-delimited JSON objects: one request per line on stdin,
//! one response per line on stdout. Protocol version 2024-11-05. Requests
//! without an `id` are notifications and get no response frame. All logging
//! goes through `tracing` (stderr) — stdout belongs to the protocol.

use crate::artifacts::{self, ResourceContent};
use crate::error::Error;
use crate::mcp::capabilities::ServerCapabilities;
use crate::mcp::dispatch::McpDispatcher;
use crate::mcp::tools;
use serde_json::{json, Value};
use tokio::io::{AsyncBufReadExt, AsyncWrite, AsyncWriteExt, BufReader};
use tracing::{debug, info, warn};

pub const JSONRPC_VERSION: &str = "2.0";
pub const MCP_PROTOCOL_VERSION: &str = "2024-11-05";

pub const MCP_PARSE_ERROR: i64 = -32700;
pub const MCP_INVALID_REQUEST: i64 = -32600;
pub const MCP_METHOD_NOT_FOUND: i64 = -32601;
pub const MCP_INVALID_PARAMS: i64 = -32602;
pub const MCP_INTERNAL_ERROR: i64 = -32603;

// ─── Wire types ───────────────────────────────────────────────────────────────

/// One parsed request frame. `id` is `None` for notifications.
#[derive(Debug, Clone)]
pub struct McpRequest {
    pub id: Option<Value>,
    pub method: String,
    pub params: Value,
}

/// A JSON-RPC error to be framed into a response.
#[derive(Debug, Clone)]
pub struct McpError {
    pub code: i64,
    pub message: String,
}

impl McpError {
    pub fn new(code: i64, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }
}

/// Counters for one serve session, mirrored into the shutdown log line.
#[derive(Debug, Clone, Default)]
pub struct ServeReport {
    pub processed_frames: usize,
    pub error_count: usize,
}

fn result_frame(id: Value, result: Value) -> Value {
    json!({ "jsonrpc": JSONRPC_VERSION, "id": id, "result": result })
}

fn error_frame(id: Value, error: &McpError) -> Value {
    json!({
        "jsonrpc": JSONRPC_VERSION,
        "id": id,
        "error": { "code": error.code, "message": error.message }
    })
}

// ─── Request parsing ──────────────────────────────────────────────────────────

/// Parse one decoded frame into a request.
pub fn parse_request(value: &Value) -> Result<McpRequest, McpError> {
    let Some(object) = value.as_object() else {
        return Err(McpError::new(
            MCP_INVALID_REQUEST,
            "jsonrpc request must be an object",
        ));
    };
    let jsonrpc = object
        .get("jsonrpc")
        .and_then(Value::as_str)
        .unwrap_or_default();
    if jsonrpc != JSONRPC_VERSION {
        return Err(McpError::new(
            MCP_INVALID_REQUEST,
            format!("jsonrpc must be '{JSONRPC_VERSION}'"),
        ));
    }
    let method = object
        .get("method")
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|m| !m.is_empty())
        .ok_or_else(|| {
            McpError::new(
                MCP_INVALID_REQUEST,
                "jsonrpc request must include non-empty method",
            )
        })?;
    let params = object.get("params").cloned().unwrap_or(Value::Null);
    Ok(McpRequest {
        id: object.get("id").cloned(),
        method: method.to_string(),
        params,
    })
}

// ─── Method handlers ──────────────────────────────────────────────────────────

fn handle_initialize() -> Value {
    json!({
        "protocolVersion": MCP_PROTOCOL_VERSION,
        "serverInfo": {
            "name": "dusk-mcp",
            "version": env!("CARGO_PKG_VERSION")
        },
        "capabilities": ServerCapabilities::default().to_mcp_value()
    })
}

async fn handle_resources_list(dispatcher: &McpDispatcher) -> Value {
    let active = dispatcher.context().active.read().await.clone();
    let resources = match &active {
        Some(project) => artifacts::list(project).await,
        None => Vec::new(),
    };
    json!({ "resources": resources })
}

async fn handle_resources_read(
    dispatcher: &McpDispatcher,
    params: &Value,
) -> Result<Value, McpError> {
    let uri = params
        .get("uri")
        .and_then(Value::as_str)
        .filter(|u| !u.is_empty())
        .ok_or_else(|| {
            McpError::new(MCP_INVALID_PARAMS, "resources/read requires field 'uri'")
        })?;

    let active = dispatcher.context().active.read().await.clone();
    let Some(project) = active else {
        return Err(McpError::new(
            MCP_INTERNAL_ERROR,
            "no active Laravel project",
        ));
    };

    match artifacts::read(&project, uri).await {
        Ok(ResourceContent::Blob { mime_type, base64 }) => Ok(json!({
            "contents": [{ "uri": uri, "mimeType": mime_type, "blob": base64 }]
        })),
        Ok(ResourceContent::Text { mime_type, text }) => Ok(json!({
            "contents": [{ "uri": uri, "mimeType": mime_type, "text": text }]
        })),
        Err(e @ Error::UnknownResource(_)) => {
            Err(McpError::new(MCP_INVALID_PARAMS, e.to_string()))
        }
        Err(e) => Err(McpError::new(
            MCP_INTERNAL_ERROR,
            format!("failed to read {uri}: {e}"),
        )),
    }
}

/// Route one request to its handler. `Ok(None)` means the request was a
/// notification and nothing is written back.
pub async fn handle_request(
    dispatcher: &McpDispatcher,
    request: McpRequest,
) -> Result<Option<Value>, McpError> {
    // Notifications: acknowledge lifecycle, ignore the rest.
    let Some(id) = request.id else {
        debug!(method = %request.method, "notification received");
        return Ok(None);
    };

    let result = match request.method.as_str() {
        "initialize" => handle_initialize(),
        "ping" => json!({}),
        "tools/list" => tools::handle_tools_list(),
        "tools/call" => {
            let name = request
                .params
                .get("name")
                .and_then(Value::as_str)
                .map(str::trim)
                .filter(|n| !n.is_empty())
                .ok_or_else(|| {
                    McpError::new(MCP_INVALID_PARAMS, "tools/call requires field 'name'")
                })?;
            let arguments = request
                .params
                .get("arguments")
                .cloned()
                .unwrap_or_else(|| Value::Object(serde_json::Map::new()));
            match dispatcher.dispatch(name, arguments).await {
                Ok(result) => result,
                // Unknown tool — the one dispatch failure that surfaces as a
                // protocol error instead of a textual response.
                Err(e) => return Err(McpError::new(MCP_INVALID_PARAMS, e.to_string())),
            }
        }
        "resources/list" => handle_resources_list(dispatcher).await,
        "resources/read" => handle_resources_read(dispatcher, &request.params).await?,
        other => {
            return Err(McpError::new(
                MCP_METHOD_NOT_FOUND,
                format!("unsupported method '{other}'"),
            ))
        }
    };

    Ok(Some(result_frame(id, result)))
}

// ─── Serve loop ───────────────────────────────────────────────────────────────

/// Serve newline-delimited JSON-RPC until the reader reaches EOF.
///
/// Requests are handled strictly in arrival order on the current task; all
/// suspension happens at filesystem and subprocess boundaries inside the
/// handlers.
pub async fn serve<R, W>(
    reader: R,
    mut writer: W,
    dispatcher: &McpDispatcher,
) -> anyhow::Result<ServeReport>
where
    R: tokio::io::AsyncRead + Unpin,
    W: AsyncWrite + Unpin,
{
    let mut lines = BufReader::new(reader).lines();
    let mut report = ServeReport::default();

    while let Some(line) = lines.next_line().await? {
        let trimmed = line.trim();
        if trimmed.is_empty() {
            continue;
        }
        report.processed_frames += 1;

        let frame = match serde_json::from_str::<Value>(trimmed) {
            Ok(frame) => frame,
            Err(e) => {
                report.error_count += 1;
                warn!(err = %e, "undecodable frame");
                let err = McpError::new(MCP_PARSE_ERROR, format!("invalid JSON: {e}"));
                write_frame(&mut writer, &error_frame(Value::Null, &err)).await?;
                continue;
            }
        };

        // Keep the request id (when one parses out) for error framing.
        let request = match parse_request(&frame) {
            Ok(request) => request,
            Err(err) => {
                report.error_count += 1;
                let id = frame.get("id").cloned().unwrap_or(Value::Null);
                write_frame(&mut writer, &error_frame(id, &err)).await?;
                continue;
            }
        };

        let id = request.id.clone().unwrap_or(Value::Null);
        match handle_request(dispatcher, request).await {
            Ok(Some(response)) => write_frame(&mut writer, &response).await?,
            Ok(None) => {}
            Err(err) => {
                report.error_count += 1;
                write_frame(&mut writer, &error_frame(id, &err)).await?;
            }
        }
    }

    info!(
        frames = report.processed_frames,
        errors = report.error_count,
        "stdio session closed"
    );
    Ok(report)
}

async fn write_frame<W: AsyncWrite + Unpin>(writer: &mut W, frame: &Value) -> anyhow::Result<()> {
    let mut line = serde_json::to_string(frame)?;
    line.push('\n');
    writer.write_all(line.as_bytes()).await?;
    writer.flush().await?;
    Ok(())
}

// ─── Tests ────────────────────────────────────────────────────────────────────
