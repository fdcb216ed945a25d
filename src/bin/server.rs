//! Benchboard dashboard server.
//!
//! Serves the merged benchmark payload, static dashboard assets and the CI
//! notification webhook.

use std::net::SocketAddr;
use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};

use benchboard::config::BenchboardConfig;

#[derive(Parser)]
#[command(name = "benchboard-server")]
#[command(about = "Benchmark trend dashboard server")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Configuration file
    #[arg(short, long, default_value = "benchboard.toml")]
    config: PathBuf,

    /// Server bind address override
    #[arg(short, long)]
    bind: Option<SocketAddr>,

    /// Enable development mode (more verbose logging)
    #[arg(long)]
    dev: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the dashboard server
    Serve,
    /// Write a default configuration file and exit
    InitConfig,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let log_level = if cli.dev {
        tracing::Level::DEBUG
    } else {
        tracing::Level::INFO
    };
    tracing_subscriber::fmt().with_max_level(log_level).init();

    match cli.command {
        Some(Commands::InitConfig) => {
            BenchboardConfig::default().to_file(&cli.config)?;
            println!("configuration written to {}", cli.config.display());
            Ok(())
        }
        Some(Commands::Serve) | None => {
            let mut config = BenchboardConfig::load_or_default(&cli.config)?;
            if let Some(bind) = cli.bind {
                config.server.bind = bind;
            }
            benchboard::server::serve(config).await
        }
    }
}
