//! sourdough - Sourdough server daemon
//!
//! Generic CRUD gateway over a pluggable storage backend, optionally serving
//! a built static site for every non-API path.
//!
//! Usage:
//!   sourdough [OPTIONS] [config.toml]
//!
//! Without a config file the defaults apply. `PORT`, `DATABASE_URL` and
//! `STATIC_DIR` in the environment override the file.

mod config;

use std::path::PathBuf;

use sourdough_api::{create_router, with_static_site, AppState};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::config::ServerConfig;

/// Parsed command-line arguments
struct Args {
    /// Server config file (TOML)
    config_path: Option<PathBuf>,
    /// Static site directory given on the command line
    static_dir: Option<PathBuf>,
}

fn parse_args() -> Args {
    let args: Vec<String> = std::env::args().skip(1).collect();
    let mut result = Args {
        config_path: None,
        static_dir: None,
    };

    let mut i = 0;
    while i < args.len() {
        match args[i].as_str() {
            "--static-dir" | "-s" => {
                if let Some(dir) = args.get(i + 1) {
                    result.static_dir = Some(PathBuf::from(dir));
                    i += 2;
                } else {
                    eprintln!("Missing argument for --static-dir");
                    i += 1;
                }
            }
            "--help" | "-h" => {
                print_help();
                std::process::exit(0);
            }
            arg if !arg.starts_with('-') => {
                result.config_path = Some(PathBuf::from(arg));
                i += 1;
            }
            other => {
                eprintln!("Unknown argument: {}", other);
                i += 1;
            }
        }
    }

    result
}

fn print_help() {
    eprintln!(
        r#"sourdough - Sourdough server daemon

Usage: sourdough [OPTIONS] [config.toml]

Options:
  -s, --static-dir <path>  Serve a built site from this directory
  -h, --help               Print this help message

Environment:
  PORT          Listen port (default 3001)
  DATABASE_URL  memory:// or file:///path/to/db.json
  STATIC_DIR    Same as --static-dir
  RUST_LOG      Log filter

Examples:
  # In-memory gateway on port 3001
  DATABASE_URL=memory:// sourdough

  # Persistent gateway serving a site
  sourdough --static-dir dist sourdough.toml
"#
    );
}

fn load_config(args: &Args) -> anyhow::Result<ServerConfig> {
    let config = match &args.config_path {
        Some(path) => ServerConfig::from_file(path)?,
        None => ServerConfig::default(),
    };
    let mut config = config.apply_overrides(|key| std::env::var(key).ok())?;
    if let Some(dir) = &args.static_dir {
        config.static_dir = Some(dir.clone());
    }
    Ok(config)
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = parse_args();
    let config = load_config(&args)?;

    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| config.log_filter.as_str().into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting sourdough server");
    if let Some(path) = &args.config_path {
        tracing::info!("Loaded config from: {}", path.display());
    }

    let backend = sourdough_core::open_backend(config.database_url.as_deref()).await?;
    tracing::info!(backend = backend.name(), "Storage backend ready");

    let mut app = create_router(AppState::new(backend.clone()));
    if let Some(dir) = &config.static_dir {
        if dir.is_dir() {
            app = with_static_site(app, dir);
        } else {
            tracing::warn!("Static directory not found: {}", dir.display());
        }
    }

    let listener = config.bind().await?;
    tracing::info!("Listening on http://{}", listener.local_addr()?);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Shutting down, flushing storage");
    backend.close().await?;

    Ok(())
}

/// Resolve on Ctrl+C or SIGTERM, whichever comes first
async fn shutdown_signal() {
    let sigterm = install_sigterm()
        .map_err(|e| tracing::error!("Failed to install SIGTERM handler: {}", e))
        .ok();

    tokio::select! {
        _ = wait_ctrl_c() => tracing::info!("Received Ctrl+C"),
        _ = wait_sigterm(sigterm) => tracing::info!("Received SIGTERM"),
    }
}

async fn wait_ctrl_c() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for Ctrl+C: {}", e);
        std::future::pending::<()>().await;
    }
}

#[cfg(unix)]
type TerminateSignal = tokio::signal::unix::Signal;

#[cfg(not(unix))]
type TerminateSignal = ();

#[cfg(unix)]
fn install_sigterm() -> std::io::Result<TerminateSignal> {
    tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
}

#[cfg(not(unix))]
fn install_sigterm() -> std::io::Result<TerminateSignal> {
    Ok(())
}

#[cfg(unix)]
async fn wait_sigterm(signal: Option<TerminateSignal>) {
    match signal {
        Some(mut signal) => {
            signal.recv().await;
        }
        None => std::future::pending::<()>().await,
    }
}

#[cfg(not(unix))]
async fn wait_sigterm(_signal: Option<TerminateSignal>) {
    std::future::pending::<()>().await
}
