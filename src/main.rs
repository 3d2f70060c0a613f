use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Result;
use clap::{Parser, Subcommand};
use foliohealth::clock::{Clock, SystemClock};
use foliohealth::config::ResolvedConfig;
use foliohealth::service::{build_selector, DashboardService};
use foliohealth::sources::demo_records;
use foliohealth::store::{DocumentStore, JsonFileDocumentStore};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "foliohealth")]
#[command(about = "Portfolio health dashboard engine")]
struct Cli {
    /// Path to config file
    #[arg(short, long, default_value = "foliohealth.toml")]
    config: PathBuf,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Compute and print a user's full dashboard report
    Dashboard {
        /// User to report on
        #[arg(short, long)]
        user: String,

        /// Skip HTTP sources and read only the local document store
        #[arg(long)]
        offline: bool,
    },
    /// Print only the health metrics for a user
    Health {
        /// User to report on
        #[arg(short, long)]
        user: String,

        /// Skip HTTP sources and read only the local document store
        #[arg(long)]
        offline: bool,
    },
    /// Print the deterministic demo holdings
    Demo,
    /// Show current configuration
    Config,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let config = ResolvedConfig::load_or_default(&cli.config)?;

    match cli.command {
        Some(Command::Dashboard { user, offline }) => {
            let report = dashboard_report(&config, &user, offline).await;
            println!("{}", serde_json::to_string_pretty(&report)?);
        }
        Some(Command::Health { user, offline }) => {
            let report = dashboard_report(&config, &user, offline).await;
            let health = serde_json::json!({
                "source": report.source,
                "diversification_score": report.diversification_score,
                "risk_score": report.risk_score,
                "health_score": report.health_score,
                "badges": report.badges,
            });
            println!("{}", serde_json::to_string_pretty(&health)?);
        }
        Some(Command::Demo) => {
            let records = demo_records(SystemClock.now());
            println!("{}", serde_json::to_string_pretty(&records)?);
        }
        Some(Command::Config) => {
            println!("Config file: {}", cli.config.display());
            println!("Data directory: {}", config.data_dir.display());
            match &config.sources.primary_url {
                Some(url) => println!("Primary source: {url}"),
                None => println!("Primary source: (not configured)"),
            }
            match &config.sources.legacy_url {
                Some(url) => println!("Legacy source: {url}"),
                None => println!("Legacy source: (not configured)"),
            }
            println!(
                "Attempt timeout: {}ms",
                config.sources.attempt_timeout.as_millis()
            );
        }
        None => {
            println!("foliohealth - Portfolio health dashboard engine");
            println!("===============================================\n");
            println!("Config: {}", cli.config.display());
            println!("Data directory: {}\n", config.data_dir.display());
            println!("Commands:");
            println!("  dashboard   Compute a user's full dashboard report");
            println!("  health      Print only the health metrics");
            println!("  demo        Print the deterministic demo holdings");
            println!("  config      Show current configuration\n");
            println!("Run 'foliohealth --help' for more options.");
        }
    }

    Ok(())
}

async fn dashboard_report(
    config: &ResolvedConfig,
    user: &str,
    offline: bool,
) -> foliohealth::report::DashboardReport {
    let store: Arc<dyn DocumentStore> = Arc::new(JsonFileDocumentStore::new(&config.data_dir));
    let selector = build_selector(config, store, offline);
    DashboardService::new(selector).dashboard(user).await
}
