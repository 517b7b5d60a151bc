//! Main application entry point (CLI binary).
//!
//! This is a thin wrapper around the `policyscout` library that handles:
//! - Command-line argument parsing
//! - Environment variable loading (.env file)
//! - Logger initialization
//! - User-facing output formatting
//!
//! All core functionality is implemented in the library crate.

use std::process;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{bail, Context, Result};
use chrono::Utc;
use clap::{Parser, Subcommand};
use tokio_util::sync::CancellationToken;

use policyscout::initialization::{init_client, init_logger_with};
use policyscout::{
    normalize_domain, run_batch, run_periodic, Config, DomainStore, ProcessingContext,
};
use policyscout::{init_db_pool_with_path, run_migrations};

#[derive(Parser)]
#[command(name = "policyscout", version, about = "Discovers domain ownership from privacy and terms pages")]
struct Cli {
    #[command(subcommand)]
    command: Command,

    #[command(flatten)]
    config: Config,
}

#[derive(Subcommand)]
enum Command {
    /// Register domains for tracking
    Add {
        /// Domains (or URLs; the host is extracted)
        #[arg(required = true)]
        domains: Vec<String>,
    },
    /// Print every tracked record as JSON
    List,
    /// Stop tracking domains
    Remove {
        #[arg(required = true)]
        domains: Vec<String>,
    },
    /// Process every due domain once, then exit
    Run,
    /// Process due domains on a fixed period until interrupted
    Watch,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load environment variables from .env file (if it exists)
    let _ = dotenvy::dotenv();

    let cli = Cli::parse();
    let config = cli.config;

    init_logger_with(config.log_level.clone().into(), config.log_format.clone())
        .context("Failed to initialize logger")?;

    let pool = init_db_pool_with_path(&config.db_path)
        .await
        .context("Failed to initialize database pool")?;
    run_migrations(&pool)
        .await
        .context("Failed to run database migrations")?;
    let store = DomainStore::new(pool);

    match cli.command {
        Command::Add { domains } => {
            let now = Utc::now();
            for raw in domains {
                let Some(domain) = normalize_domain(&raw) else {
                    eprintln!("Skipping {raw:?}: not a valid domain");
                    continue;
                };
                if store.add(&domain, now).await? {
                    println!("Added {domain}");
                } else {
                    println!("{domain} is already tracked");
                }
            }
        }
        Command::List => {
            let records = store.list_all().await?;
            println!("{}", serde_json::to_string_pretty(&records)?);
        }
        Command::Remove { domains } => {
            for raw in domains {
                let domain = normalize_domain(&raw).unwrap_or(raw);
                if store.remove(&domain).await? {
                    println!("Removed {domain}");
                } else {
                    println!("{domain} was not tracked");
                }
            }
        }
        Command::Run => {
            let ctx = processing_context(&config, store)?;
            match run_batch(ctx, config.max_concurrency).await {
                Ok(report) => {
                    println!(
                        "Processed {} domain{} ({} succeeded, {} not found, {} failed)",
                        report.selected,
                        if report.selected == 1 { "" } else { "s" },
                        report.succeeded,
                        report.not_found,
                        report.failed
                    );
                }
                Err(e) => {
                    eprintln!("policyscout error: {e:#}");
                    process::exit(1);
                }
            }
        }
        Command::Watch => {
            if config.interval_secs == 0 {
                bail!("--interval-secs must be greater than zero");
            }
            let ctx = processing_context(&config, store)?;
            let cancel = CancellationToken::new();

            let cancel_on_signal = cancel.clone();
            tokio::spawn(async move {
                if tokio::signal::ctrl_c().await.is_ok() {
                    cancel_on_signal.cancel();
                }
            });

            run_periodic(
                ctx,
                config.max_concurrency,
                Duration::from_secs(config.interval_secs),
                cancel,
            )
            .await;
        }
    }

    Ok(())
}

fn processing_context(config: &Config, store: DomainStore) -> Result<Arc<ProcessingContext>> {
    let client = init_client(config).context("Failed to initialize HTTP client")?;
    Ok(Arc::new(ProcessingContext::new(
        client,
        store,
        config.retry_policy(),
    )))
}
