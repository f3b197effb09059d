/// MCP tool handlers for project selection and discovery.
use crate::error::{Error, Result};
use crate::project::{self, ActiveProject};
use crate::AppContext;
use std::path::PathBuf;
use tracing::info;

/// MCP `set_laravel_project` handler.
///
/// Validates the path as a Dusk-capable project and swaps it in as the
/// active project for all subsequent calls. An invalid path leaves the
/// previous selection untouched.
pub async fn set_project(ctx: &AppContext, path: PathBuf) -> Result<String> {
    let context = project::inspect(&path).await;
    if !context.is_valid {
        return Err(Error::InvalidProject(path));
    }

    let active = ActiveProject::new(context.path.clone());
    *ctx.active.write().await = Some(active);

    info!(path = %context.path.display(), "active project changed");
    Ok(format!(
        "Active Laravel project set to {}",
        context.path.display()
    ))
}

/// MCP `list_laravel_projects` handler.
///
/// Scans the fixed search roots and reports every qualifying project, in
/// discovery order.
pub async fn list_projects(_ctx: &AppContext) -> Result<String> {
    let projects = project::discover().await;
    if projects.is_empty() {
        return Ok(
            "No Laravel projects with Dusk found. Searched the working directory, \
             ~/Sites, ~/Herd, ~/Code, ~/Projects, /var/www, and /srv/www."
                .to_string(),
        );
    }

    let mut out = format!("Found {} Laravel project(s) with Dusk:\n", projects.len());
    for path in &projects {
        out.push_str(&format!("  {}\n", path.display()));
    }
    Ok(out)
}
