//! Bulk loader entrypoint: rebuilds the database from the catalog CSV files.
//!
//! Run with: `cargo run --bin load_data`

use api_youtubers::config::Config;
use api_youtubers::db::init_db;
use api_youtubers::loader;

use std::error::Error;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

#[tokio::main]
async fn main() {
    dotenv::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "load_data=debug,api_youtubers=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    if let Err(e) = run().await {
        tracing::error!("Error during load process: {:#}", e);
        std::process::exit(1);
    }

    tracing::info!("Load process complete");
}

async fn run() -> Result<(), Box<dyn Error>> {
    let config = Config::from_env()?;
    tracing::debug!("Database: {}", config.database_url);

    let db = init_db(&config.database_url).await?;
    loader::run(&db, &config.data_dir).await?;

    Ok(())
}
