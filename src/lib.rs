pub mod artifacts;
pub mod config;
pub mod error;
pub mod mcp;
pub mod project;
pub mod runner;

use config::ServerConfig;
use error::{Error, Result};
use project::ActiveProject;
use runner::DevServerHandle;
use tokio::sync::RwLock;

/// Shared server state passed to every tool and resource handler.
///
/// The active project is explicit, mutable state: `set_laravel_project`
/// replaces it and every other operation reads a snapshot of it. Handlers
/// never touch process-global state.
pub struct AppContext {
    pub config: ServerConfig,
    /// Currently selected Laravel project, if any.
    pub active: RwLock<Option<ActiveProject>>,
    /// Last dev server started via `start_dev_server`. Held so the handle is
    /// not dropped, not supervised.
    pub dev_server: RwLock<Option<DevServerHandle>>,
}

impl AppContext {
    pub fn new(config: ServerConfig) -> Self {
        Self {
            config,
            active: RwLock::new(None),
            dev_server: RwLock::new(None),
        }
    }

    /// Snapshot the active project.
    ///
    /// # Errors
    ///
    /// `Error::NoActiveProject` when no project has been set or resolved.
    pub async fn active_project(&self) -> Result<ActiveProject> {
        self.active
            .read()
            .await
            .clone()
            .ok_or(Error::NoActiveProject)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[tokio::test]
    async fn active_project_errors_until_set() {
        let ctx = AppContext::new(ServerConfig::default());
        assert!(matches!(
            ctx.active_project().await,
            Err(Error::NoActiveProject)
        ));

        *ctx.active.write().await = Some(ActiveProject::new(PathBuf::from("/tmp/app")));
        let active = ctx.active_project().await.unwrap();
        assert_eq!(active.root, PathBuf::from("/tmp/app"));
    }
}
