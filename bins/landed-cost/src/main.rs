//! Landed-cost calculator.
//!
//! Reads a shipment cost record as JSON from the file given as the first
//! argument (or stdin), runs the allocation pass and writes the calculated
//! record to stdout.
//!
//! Usage: landed-cost [record.json]

use std::io::Read;

use anyhow::Context;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use jusfinn_core::landed_cost::{LandedCostService, ShipmentCostRecord};
use jusfinn_shared::{AppConfig, AppError};

fn main() -> anyhow::Result<()> {
    // Load environment variables from .env file
    dotenvy::dotenv().ok();

    // Logs go to stderr so stdout stays machine-readable
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "jusfinn_core=debug,landed_cost=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let config = AppConfig::load()?;

    let input = match std::env::args().nth(1) {
        Some(path) => {
            std::fs::read_to_string(&path).with_context(|| format!("Failed to read {path}"))?
        }
        None => {
            let mut buf = String::new();
            std::io::stdin()
                .read_to_string(&mut buf)
                .context("Failed to read stdin")?;
            buf
        }
    };

    let record: ShipmentCostRecord =
        serde_json::from_str(&input).context("Invalid shipment cost record")?;
    info!(shipment_id = %record.id, items = record.items.len(), "Record loaded");

    let calculated = LandedCostService::calculate(&record, &config.landed_cost).map_err(|err| {
        let err = AppError::from(err);
        anyhow::anyhow!("{} ({})", err, err.error_code())
    })?;

    println!("{}", serde_json::to_string_pretty(&calculated)?);

    Ok(())
}
