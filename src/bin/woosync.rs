use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing::info;

use woosync::config::{SyncParams, WooConfig, DEFAULT_RECENT_WINDOW_HOURS};
use woosync::store;
use woosync::sync::orchestrator::sync_batches;
use woosync::util::env as env_util;
use woosync::woo::client::WooClient;

#[derive(Parser, Debug)]
#[command(name = "woosync", version, about = "Local store → WooCommerce catalog sync")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
#[command(rename_all = "kebab-case")]
enum Command {
    /// Push local products to the WooCommerce catalog
    Sync {
        /// Sync every row (newest creation first) instead of the recent window
        #[arg(long, default_value_t = false)]
        all: bool,
        /// Recent-scope window in hours (ignored with --all)
        #[arg(long)]
        window_hours: Option<f64>,
        /// Products dispatched concurrently per batch
        #[arg(long)]
        batch_size: Option<usize>,
        /// Pause between batches, in milliseconds
        #[arg(long)]
        delay_ms: Option<u64>,
        /// Path to the product store (falls back to WOOSYNC_DB)
        #[arg(long)]
        db: Option<String>,
    },
    /// Print product row counts for the local store
    Counts {
        /// Window in hours for the recent count
        #[arg(long)]
        window_hours: Option<f64>,
        /// Path to the product store (falls back to WOOSYNC_DB)
        #[arg(long)]
        db: Option<String>,
    },
}

fn db_path(flag: Option<String>) -> Result<String> {
    match flag {
        Some(path) => Ok(path),
        None => env_util::env_req("WOOSYNC_DB"),
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    env_util::init_env();
    woosync::tracing::init_tracing("info,sqlx=warn")?;
    let cli = Cli::parse();

    match cli.command {
        Command::Sync {
            all,
            window_hours,
            batch_size,
            delay_ms,
            db,
        } => {
            let config = WooConfig::from_env()?;
            let client = WooClient::new(&config).context("building WooCommerce client")?;
            let pool = store::connect(&db_path(db)?).await?;

            let rows = if all {
                store::fetch_all(&pool).await?
            } else {
                let window = window_hours.unwrap_or(DEFAULT_RECENT_WINDOW_HOURS);
                store::fetch_recent(&pool, window).await?
            };
            info!(
                rows = rows.len(),
                scope = if all { "all" } else { "recent" },
                "starting sync"
            );

            let params = SyncParams::new(batch_size, delay_ms);
            let summary = sync_batches(&client, &rows, config.price_markup, &params).await;
            println!("{}", serde_json::to_string_pretty(&summary)?);
        }
        Command::Counts { window_hours, db } => {
            let pool = store::connect(&db_path(db)?).await?;
            let window = window_hours.unwrap_or(DEFAULT_RECENT_WINDOW_HOURS);
            let counts = store::counts(&pool, window).await?;
            println!(
                "products: {} total, {} updated in the last {window}h",
                counts.total, counts.recent
            );
        }
    }
    Ok(())
}
