//! One-shot chart renderer.
//!
//! Fetches the data endpoint exactly once and writes every benchmark as a
//! time-series chart into a static HTML dashboard. On any failure nothing is
//! written; the reason is logged and the exit code is non-zero.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use tracing::{error, info};

use benchboard::chart::{RangePolicy, ThemeKind};
use benchboard::client;
use benchboard::config::BenchboardConfig;
use benchboard::html::DashboardPage;

#[derive(Parser)]
#[command(name = "benchboard-render")]
#[command(about = "Render benchmark charts from a data endpoint")]
#[command(version)]
struct Cli {
    /// Configuration file for chart defaults and the endpoint address
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Data endpoint to fetch (defaults to /data on the configured server)
    #[arg(short, long)]
    endpoint: Option<String>,

    /// Output HTML file
    #[arg(short, long, default_value = "dashboard.html")]
    output: PathBuf,

    /// Page title override
    #[arg(long)]
    title: Option<String>,

    /// Chart theme override
    #[arg(long, value_enum)]
    theme: Option<ThemeKind>,

    /// Pad the y-axis around the observed value range instead of autoscaling
    #[arg(long)]
    padded_range: bool,
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::INFO)
        .init();

    let config = match &cli.config {
        Some(path) => match BenchboardConfig::from_file(path) {
            Ok(config) => config,
            Err(err) => {
                error!(%err, path = %path.display(), "unable to load configuration");
                return ExitCode::FAILURE;
            }
        },
        None => BenchboardConfig::default(),
    };

    let endpoint = cli
        .endpoint
        .unwrap_or_else(|| format!("http://{}/data", config.server.bind));
    let title = cli.title.unwrap_or_else(|| config.chart.title.clone());
    let theme = cli.theme.unwrap_or(config.chart.theme).theme();
    let policy = if cli.padded_range {
        RangePolicy::Padded
    } else {
        config.chart.range
    };

    let mut page = DashboardPage::new(title);
    match client::load_and_render(&endpoint, &theme, policy, &mut page).await {
        Ok(rendered) => {
            if let Err(err) = page.write_to(&cli.output) {
                error!(%err, output = %cli.output.display(), "unable to write dashboard");
                return ExitCode::FAILURE;
            }
            info!(
                charts = rendered,
                output = %cli.output.display(),
                "dashboard written"
            );
            ExitCode::SUCCESS
        }
        Err(err) => {
            error!(%err, %endpoint, "no charts rendered");
            ExitCode::FAILURE
        }
    }
}
