pub mod api;
pub mod config;
pub mod db;
pub mod errors;
pub mod loader;
pub mod system;

use sqlx::SqlitePool;

#[derive(Clone)]
pub struct InnerState {
    pub db: SqlitePool,
}
