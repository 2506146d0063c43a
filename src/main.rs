use clap::Parser;
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::{fmt, EnvFilter};

use employee_tracker::{menu, Config, Store};

/// Manage departments, roles and employees
#[derive(Debug, Parser)]
#[command(name = "employee-tracker", version, about)]
struct Args {
    /// Path to configuration file
    #[arg(long, default_value = "./etc/employee-tracker.toml")]
    config: PathBuf,

    /// Database URL, overrides the configured database
    #[arg(long, env = "DATABASE_URL")]
    database_url: Option<String>,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    // Load configuration first (before logging init)
    let mut config = Config::load(&args.config).unwrap_or_else(|e| {
        eprintln!(
            "Could not load config file {}: {}, using defaults",
            args.config.display(),
            e
        );
        Config::default()
    });
    if let Some(url) = args.database_url {
        config.database.url = Some(url);
    }

    // Priority: RUST_LOG env var > config file > default "warn"
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.log.level));

    fmt::fmt()
        .with_env_filter(env_filter)
        .with_target(true)
        .with_writer(std::io::stderr)
        .init();

    info!("Starting employee tracker...");
    info!("Loading configuration from: {}", args.config.display());

    let store = Store::connect(&config.database).await.map_err(|e| {
        tracing::error!("Database initialization failed: {}", e);
        anyhow::anyhow!("Database initialization failed: {}", e)
    })?;

    let result = menu::run(&store).await;

    store.close().await?;
    info!("Database connection closed");

    result
}
