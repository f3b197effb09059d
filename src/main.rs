use anyhow::Result;
use clap::Parser;
use dusk_mcp::{
    config::ServerConfig,
    mcp::{serve, McpDispatcher},
    project, AppContext,
};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{info, warn};

#[derive(Parser)]
#[command(
    name = "dusk-mcp",
    about = "MCP server for running Laravel Dusk browser tests",
    version
)]
struct Args {
    /// Laravel project to activate at startup
    #[arg(long, env = "LARAVEL_PROJECT_PATH")]
    project: Option<PathBuf>,

    /// Log level filter, e.g. "debug" or "info,dusk_mcp=trace"
    #[arg(long, env = "DUSK_MCP_LOG")]
    log: Option<String>,

    /// Also write logs to this file (daily-rolling)
    #[arg(long, env = "DUSK_MCP_LOG_FILE")]
    log_file: Option<PathBuf>,

    /// Log output format: "pretty" or "json"
    #[arg(long, env = "DUSK_MCP_LOG_FORMAT")]
    log_format: Option<String>,

    /// Optional TOML config file
    #[arg(long, env = "DUSK_MCP_CONFIG")]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let config = ServerConfig::new(
        args.project,
        args.log,
        args.log_format,
        args.config.as_deref(),
    );

    // Init once — must happen before any tracing calls.
    let _file_guard = setup_logging(&config.log, args.log_file.as_deref(), &config.log_format);

    info!(version = env!("CARGO_PKG_VERSION"), "dusk-mcp starting");

    let ctx = Arc::new(AppContext::new(config));
    if let Some(active) = resolve_startup_project(&ctx.config).await {
        info!(path = %active.root.display(), "active project resolved at startup");
        *ctx.active.write().await = Some(active);
    } else {
        info!("no project resolved at startup — waiting for set_laravel_project");
    }

    let dispatcher = McpDispatcher::new(Arc::clone(&ctx));
    let report = serve(tokio::io::stdin(), tokio::io::stdout(), &dispatcher).await?;
    info!(
        frames = report.processed_frames,
        errors = report.error_count,
        "dusk-mcp exiting"
    );
    Ok(())
}

/// Resolve the startup project: configured path first, then the working
/// directory, then filesystem discovery. A configured path that fails
/// validation is logged and skipped rather than aborting startup.
async fn resolve_startup_project(config: &ServerConfig) -> Option<project::ActiveProject> {
    if let Some(path) = &config.project_path {
        if project::validate(path).await {
            return Some(project::ActiveProject::new(path.clone()));
        }
        warn!(path = %path.display(), "configured project path is not a valid Dusk project — ignoring");
    }

    if let Ok(cwd) = std::env::current_dir() {
        if project::validate(&cwd).await {
            return Some(project::ActiveProject::new(cwd));
        }
    }

    project::discover()
        .await
        .into_iter()
        .next()
        .map(project::ActiveProject::new)
}

/// Initialize the tracing subscriber.
///
/// Logs always go to stderr — stdout carries the JSON-RPC frames and must
/// stay clean. If `log_file` is set, logs also go to a daily-rolling file.
/// Returns a `WorkerGuard` that must stay alive for the process lifetime.
///
/// `log_format` may be `"pretty"` (default, human-readable compact format) or
/// `"json"` (structured JSON for log aggregators).
///
/// If the log directory cannot be created, falls back to stderr-only logging
/// with a warning — never panics.
fn setup_logging(
    log_level: &str,
    log_file: Option<&std::path::Path>,
    log_format: &str,
) -> Option<tracing_appender::non_blocking::WorkerGuard> {
    use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

    let use_json = log_format == "json";

    let stderr_only = || {
        if use_json {
            tracing_subscriber::fmt()
                .json()
                .with_env_filter(log_level)
                .with_writer(std::io::stderr)
                .init();
        } else {
            tracing_subscriber::fmt()
                .with_env_filter(log_level)
                .with_writer(std::io::stderr)
                .compact()
                .init();
        }
    };

    let Some(path) = log_file else {
        stderr_only();
        return None;
    };

    let dir = path.parent().unwrap_or_else(|| std::path::Path::new("."));
    let filename = path
        .file_name()
        .unwrap_or_else(|| std::ffi::OsStr::new("dusk-mcp.log"));

    // Ensure the directory exists before tracing-appender tries to open it.
    if let Err(e) = std::fs::create_dir_all(dir) {
        eprintln!(
            "warn: could not create log directory '{}': {e} — falling back to stderr",
            dir.display()
        );
        stderr_only();
        return None;
    }

    let appender = tracing_appender::rolling::daily(dir, filename);
    let (non_blocking, guard) = tracing_appender::non_blocking(appender);

    if use_json {
        tracing_subscriber::registry()
            .with(EnvFilter::new(log_level))
            .with(fmt::layer().json().with_writer(std::io::stderr))
            .with(fmt::layer().json().with_writer(non_blocking))
            .init();
    } else {
        tracing_subscriber::registry()
            .with(EnvFilter::new(log_level))
            .with(fmt::layer().compact().with_writer(std::io::stderr))
            .with(
                fmt::layer()
                    .compact()
                    .with_writer(non_blocking)
                    .with_ansi(false),
            )
            .init();
    }

    Some(guard)
}
