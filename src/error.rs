//! Error taxonomy for the dusk-mcp server.
//!
//! Two of these variants are allowed to surface as JSON-RPC protocol errors:
//! `UnknownTool` and `UnknownResource` — both mean the caller sent a
//! malformed request. Everything else describes an environmental condition
//! and is rendered by the dispatcher as a textual `isError` content item so
//! a failed tool call never terminates the session.

use std::path::PathBuf;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    /// The target directory is not a valid Laravel project with Dusk
    /// installed. The command was never spawned.
    #[error("not a valid Laravel project: {}", .0.display())]
    InvalidProject(PathBuf),

    /// No project is currently active and none was supplied.
    #[error("no active Laravel project — call set_laravel_project first")]
    NoActiveProject,

    /// A required tool argument was absent from the call.
    #[error("missing required argument '{0}'")]
    MissingArgument(&'static str),

    /// A tool argument was present but had the wrong shape.
    #[error("invalid argument '{name}': {reason}")]
    InvalidArgument { name: &'static str, reason: String },

    /// An external command exited non-zero, or a file operation a handler
    /// depends on failed.
    #[error("command failed: {0}")]
    Execution(String),

    /// `tools/call` named a tool that is not in the catalog.
    #[error("unknown tool: {0}")]
    UnknownTool(String),

    /// `resources/read` named a URI with an unrecognized scheme.
    #[error("unknown resource URI: {0}")]
    UnknownResource(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl Error {
    /// True for the variants that propagate as JSON-RPC errors instead of
    /// being downgraded to a textual response.
    pub fn is_protocol_fault(&self) -> bool {
        matches!(self, Error::UnknownTool(_) | Error::UnknownResource(_))
    }
}
