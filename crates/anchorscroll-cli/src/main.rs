use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use anchorscroll_core::AppConfig;

mod commands;

#[derive(Parser)]
#[command(name = "anchorscroll")]
#[command(author, version, about = "Mark same-page anchors for smooth scrolling")]
struct Cli {
    /// Path to config file (defaults to ~/.config/anchorscroll/config.toml)
    #[arg(short = 'c', long = "config", global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Mark same-page anchors in a page and write the enhanced HTML
    Enhance {
        /// URL the page is served at (fetched when no input file is given)
        #[arg(short = 'u', long)]
        url: String,
        /// Read HTML from this file instead of fetching the URL
        #[arg(short = 'i', long)]
        input: Option<PathBuf>,
        /// Write the result here instead of stdout
        #[arg(short = 'o', long)]
        output: Option<PathBuf>,
        /// Do not append the scroll engine bootstrap script
        #[arg(long)]
        no_bootstrap: bool,
    },
    /// List candidate anchors and whether they point at the page itself
    Inspect {
        /// URL the page is served at (fetched when no input file is given)
        #[arg(short = 'u', long)]
        url: String,
        /// Read HTML from this file instead of fetching the URL
        #[arg(short = 'i', long)]
        input: Option<PathBuf>,
        /// Print JSON instead of a table
        #[arg(long)]
        json: bool,
    },
    /// Show the effective configuration
    Config {
        /// Write the default configuration to the config path
        #[arg(long)]
        init: bool,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Load configuration
    let config_path = cli.config.clone().unwrap_or_else(AppConfig::config_path);
    let config = AppConfig::load_from(&config_path)?;

    // Initialize logging (stderr, so enhanced HTML on stdout stays clean)
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| config.general.log_level.clone()),
        ))
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_writer(std::io::stderr),
        )
        .init();

    match cli.command {
        Commands::Enhance {
            url,
            input,
            output,
            no_bootstrap,
        } => {
            let mut config = config;
            if no_bootstrap {
                config.engine.inject_bootstrap = false;
            }
            commands::enhance::run(&config, &url, input.as_deref(), output.as_deref()).await
        }
        Commands::Inspect { url, input, json } => {
            commands::inspect::run(&config, &url, input.as_deref(), json).await
        }
        Commands::Config { init } => commands::config::run(&config, &config_path, init),
    }
}
