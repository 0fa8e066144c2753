use std::path::PathBuf;

use anyhow::Context;

/// Runtime configuration, read from the environment (a `.env` file is picked
/// up by `dotenv` in the binaries before this runs).
#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub data_dir: PathBuf,
    pub port: u16,
}

impl Config {
    pub fn from_env() -> Result<Config, anyhow::Error> {
        let database_url = std::env::var("DATABASE_URL")
            .unwrap_or_else(|_| "sqlite://data/youtubers.db".to_string());

        let data_dir = std::env::var("DATA_DIR_PATH")
            .unwrap_or_else(|_| "data".to_string())
            .into();

        let port = match std::env::var("PORT") {
            Ok(port) => port
                .parse::<u16>()
                .with_context(|| format!("Invalid PORT value: {}", port))?,
            Err(_) => 3000,
        };

        Ok(Config {
            database_url,
            data_dir,
            port,
        })
    }
}
