//! Artifact resources — screenshots and console logs exposed over MCP.
//!
//! Two URI families, both scoped to the active project:
//!
//! | URI pattern | Content |
//! |-------------|---------|
//! | `screenshot://<file>.png` | PNG bytes, base64-encoded on read |
//! | `log://<file>.log` | console log text, verbatim |
//!
//! Listing is recomputed on every request (no caching) and silently skips
//! anything unreadable; a missing directory simply contributes nothing.
//! Reads are stricter: an unknown scheme or a missing file is an error that
//! propagates to the protocol boundary.

use crate::error::{Error, Result};
use crate::project::ActiveProject;
use base64::{engine::general_purpose::STANDARD as BASE64, Engine as _};
use serde::Serialize;
use std::path::Path;
use tokio::fs;
use tracing::debug;

pub const SCREENSHOT_SCHEME: &str = "screenshot://";
pub const LOG_SCHEME: &str = "log://";

/// A single artifact resource. Filenames are unique within their directory,
/// so URIs are unique within a listing.
#[derive(Debug, Clone, Serialize)]
pub struct ResourceDescriptor {
    pub uri: String,
    pub name: String,
    #[serde(rename = "mimeType")]
    pub mime_type: String,
}

/// Content of one resource read.
#[derive(Debug, Clone)]
pub enum ResourceContent {
    /// Base64-encoded binary (screenshots).
    Blob { mime_type: &'static str, base64: String },
    /// Verbatim text (logs).
    Text { mime_type: &'static str, text: String },
}

// ─── Listing ──────────────────────────────────────────────────────────────────

/// Enumerate all artifact resources under `project`: screenshots first, then
/// console logs, each in directory listing order.
pub async fn list(project: &ActiveProject) -> Vec<ResourceDescriptor> {
    let mut resources = Vec::new();

    collect_dir(
        &project.screenshots_dir,
        "png",
        SCREENSHOT_SCHEME,
        "image/png",
        &mut resources,
    )
    .await;
    collect_dir(
        &project.logs_dir,
        "log",
        LOG_SCHEME,
        "text/plain",
        &mut resources,
    )
    .await;

    debug!(count = resources.len(), "artifact listing complete");
    resources
}

async fn collect_dir(
    dir: &Path,
    extension: &str,
    scheme: &str,
    mime_type: &str,
    out: &mut Vec<ResourceDescriptor>,
) {
    let mut entries = match fs::read_dir(dir).await {
        Ok(entries) => entries,
        Err(_) => return, // missing or unreadable directory — empty contribution
    };
    while let Ok(Some(entry)) = entries.next_entry().await {
        let path = entry.path();
        if !path.is_file() {
            continue;
        }
        if path.extension().and_then(|e| e.to_str()) != Some(extension) {
            continue;
        }
        let Some(name) = path.file_name().and_then(|n| n.to_str()) else {
            continue;
        };
        out.push(ResourceDescriptor {
            uri: format!("{scheme}{name}"),
            name: name.to_string(),
            mime_type: mime_type.to_string(),
        });
    }
}

// ─── Reading ──────────────────────────────────────────────────────────────────

/// Read one resource by URI.
///
/// # Errors
///
/// `Error::UnknownResource` for any scheme other than `screenshot://` or
/// `log://`; `Error::Io` when the target file cannot be read.
pub async fn read(project: &ActiveProject, uri: &str) -> Result<ResourceContent> {
    if let Some(name) = uri.strip_prefix(SCREENSHOT_SCHEME) {
        let bytes = fs::read(project.screenshots_dir.join(name)).await?;
        return Ok(ResourceContent::Blob {
            mime_type: "image/png",
            base64: BASE64.encode(&bytes),
        });
    }
    if let Some(name) = uri.strip_prefix(LOG_SCHEME) {
        let text = fs::read_to_string(project.logs_dir.join(name)).await?;
        return Ok(ResourceContent::Text {
            mime_type: "text/plain",
            text,
        });
    }
    Err(Error::UnknownResource(uri.to_string()))
}

// ─── Tests ────────────────────────────────────────────────────────────────────
