//! Command Line Binary
//!
//! Trains, inspects and queries models in the configured store directly.
//! Options: models, stored, train, retrain, predict, inspect, delete, import, datasets, hash

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    mlh_core::log();
    mlh_core::kys();
    mlh_cli::Cli::run().await
}
