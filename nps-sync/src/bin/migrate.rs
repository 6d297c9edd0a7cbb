//! One-shot bulk migration: copies every eligible survey and prints the
//! summary as JSON.

use anyhow::{Context, Result};
use nps_sync::{Dependencies, SyncConfig};
use tracing::info;

#[tokio::main]
async fn main() -> Result<()> {
    // Load environment variables
    dotenv::dotenv().ok();

    nps_sync::init_tracing();

    info!("Starting Firestore to Notion migration");

    let config = SyncConfig::from_env()?;
    let deps = Dependencies::new(&config)?;

    let summary = deps
        .migrator
        .run()
        .await
        .context("Migration aborted")?;

    println!("{}", serde_json::to_string_pretty(&summary)?);

    info!(
        total = summary.total,
        migrated = summary.migrated,
        failed = summary.failed,
        "Migration complete"
    );

    Ok(())
}
