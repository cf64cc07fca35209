//! Sourdough CLI - Command-line tool for Sourdough gateways
//!
//! Drives the generic record API from a shell and writes the SEO files a
//! built site ships with.

mod commands;
mod config;
mod output;

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use sourdough_client::GatewayClient;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use crate::config::Config;
use crate::output::{OutputContext, OutputFormat};

#[derive(Parser)]
#[command(name = "sourdough-cli")]
#[command(author, version, about = "Sourdough gateway CLI")]
#[command(propagate_version = true)]
struct Cli {
    /// Gateway base URL [default: http://localhost:3001/api]
    #[arg(short, long, env = "SOURDOUGH_SERVER")]
    server: Option<String>,

    /// Configuration file path
    #[arg(short, long, env = "SOURDOUGH_CONFIG")]
    config: Option<PathBuf>,

    /// Output format [default: table]
    #[arg(short, long, value_enum)]
    output: Option<OutputFormat>,

    /// Disable colored output
    #[arg(long)]
    no_color: bool,

    /// Minimal output (for scripting)
    #[arg(short, long)]
    quiet: bool,

    /// Verbose logging
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Check that the gateway is up
    Health,

    /// List records in a collection
    List {
        /// Collection name
        collection: String,

        /// Equality filter, repeatable
        #[arg(short, long = "filter", value_name = "KEY=VALUE", value_parser = commands::records::parse_filter)]
        filters: Vec<(String, String)>,
    },

    /// Show one record
    Get {
        /// Collection name
        collection: String,

        /// Record ID
        id: String,
    },

    /// Create a record from a JSON object
    Create {
        /// Collection name
        collection: String,

        /// Record fields as a JSON object
        json: String,
    },

    /// Merge fields into a record
    Update {
        /// Collection name
        collection: String,

        /// Record ID
        id: String,

        /// Fields to change as a JSON object
        json: String,
    },

    /// Delete a record
    Delete {
        /// Collection name
        collection: String,

        /// Record ID
        id: String,
    },

    /// Write sitemap.xml and robots.txt
    Sitemap {
        /// Public site origin, e.g. https://bakery.example
        #[arg(long)]
        base_url: Option<String>,

        /// Route to list, repeatable [default: /, /about, /contact, /services]
        #[arg(short, long = "route")]
        routes: Vec<String>,

        /// Directory to write into
        #[arg(long, default_value = "public")]
        out_dir: PathBuf,

        /// Tell crawlers to stay away
        #[arg(long)]
        disallow: bool,
    },
}

#[tokio::main]
async fn main() -> Result<ExitCode> {
    let cli = Cli::parse();

    // Set up logging
    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("warn")
    };

    tracing_subscriber::registry()
        .with(fmt::layer().with_target(false))
        .with(filter)
        .init();

    // Load config file
    let config = if let Some(config_path) = &cli.config {
        Config::load_from(config_path)?
    } else {
        Config::load().unwrap_or_default()
    };

    // Merge CLI args with config
    let merged = config.merge_with_args(cli.server.as_deref(), cli.output, cli.no_color);
    tracing::debug!(server = %merged.server, "Resolved configuration");

    let ctx = OutputContext::new(merged.output, merged.no_color, cli.quiet);

    // Execute command
    match &cli.command {
        Commands::Health => {
            let client = create_client(&merged.server)?;
            commands::health(&client, &ctx).await
        }

        Commands::List {
            collection,
            filters,
        } => {
            let client = create_client(&merged.server)?;
            commands::list(&client, collection, filters, &ctx).await
        }

        Commands::Get { collection, id } => {
            let client = create_client(&merged.server)?;
            commands::get(&client, collection, id, &ctx).await
        }

        Commands::Create { collection, json } => {
            let client = create_client(&merged.server)?;
            commands::create(&client, collection, json, &ctx).await
        }

        Commands::Update {
            collection,
            id,
            json,
        } => {
            let client = create_client(&merged.server)?;
            commands::update(&client, collection, id, json, &ctx).await
        }

        Commands::Delete { collection, id } => {
            let client = create_client(&merged.server)?;
            commands::delete(&client, collection, id, &ctx).await
        }

        Commands::Sitemap {
            base_url,
            routes,
            out_dir,
            disallow,
        } => {
            let base_url = base_url
                .clone()
                .or_else(|| config.base_url.clone())
                .context("--base-url is required (or set base_url in the config file)")?;
            commands::sitemap(&base_url, routes, out_dir, *disallow, &ctx)
        }
    }
}

/// Create a gateway client for the given base URL
fn create_client(server: &str) -> Result<GatewayClient> {
    GatewayClient::new(server).context("Failed to create gateway client")
}
