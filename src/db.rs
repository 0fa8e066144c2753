use std::str::FromStr;

use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions};

/// Statements that build the catalog schema, in dependency order. The join
/// tables cascade on delete so removing a video or playlist also removes its
/// membership rows.
const CREATE_TABLES: &[&str] = &[
    r#"CREATE TABLE IF NOT EXISTS youtubers (
        id INTEGER PRIMARY KEY,
        channel_name TEXT NOT NULL,
        youtuber_name TEXT NOT NULL,
        description TEXT,
        channel_url TEXT
    )"#,
    r#"CREATE TABLE IF NOT EXISTS youtuber_profiles (
        id INTEGER PRIMARY KEY,
        youtuber_id INTEGER NOT NULL REFERENCES youtubers (id),
        twitter_url TEXT,
        instagram_url TEXT,
        website_url TEXT,
        contact_info TEXT
    )"#,
    r#"CREATE TABLE IF NOT EXISTS categories (
        id INTEGER PRIMARY KEY,
        name TEXT NOT NULL,
        description TEXT
    )"#,
    r#"CREATE TABLE IF NOT EXISTS videos (
        id INTEGER PRIMARY KEY,
        youtuber_id INTEGER NOT NULL REFERENCES youtubers (id),
        title TEXT NOT NULL,
        description TEXT,
        video_url TEXT,
        publication_date DATE,
        views INTEGER,
        likes INTEGER
    )"#,
    r#"CREATE TABLE IF NOT EXISTS playlists (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        title TEXT NOT NULL
    )"#,
    r#"CREATE TABLE IF NOT EXISTS video_categories (
        video_id INTEGER NOT NULL REFERENCES videos (id) ON DELETE CASCADE,
        category_id INTEGER NOT NULL REFERENCES categories (id) ON DELETE CASCADE,
        PRIMARY KEY (video_id, category_id)
    )"#,
    r#"CREATE TABLE IF NOT EXISTS video_playlists (
        video_id INTEGER NOT NULL REFERENCES videos (id) ON DELETE CASCADE,
        playlist_id INTEGER NOT NULL REFERENCES playlists (id) ON DELETE CASCADE,
        PRIMARY KEY (video_id, playlist_id)
    )"#,
];

/// Reverse dependency order so foreign keys never block a drop.
const DROP_TABLES: &[&str] = &[
    "DROP TABLE IF EXISTS video_playlists",
    "DROP TABLE IF EXISTS video_categories",
    "DROP TABLE IF EXISTS playlists",
    "DROP TABLE IF EXISTS videos",
    "DROP TABLE IF EXISTS categories",
    "DROP TABLE IF EXISTS youtuber_profiles",
    "DROP TABLE IF EXISTS youtubers",
];

pub async fn init_db(database_url: &str) -> Result<SqlitePool, sqlx::Error> {
    let options = SqliteConnectOptions::from_str(database_url)?
        .create_if_missing(true)
        .foreign_keys(true);

    SqlitePoolOptions::new()
        .max_connections(5)
        .connect_with(options)
        .await
}

pub async fn create_schema(pool: &SqlitePool) -> Result<(), sqlx::Error> {
    for statement in CREATE_TABLES {
        sqlx::query(statement).execute(pool).await?;
    }
    Ok(())
}

/// Destroys and recreates every table. The bulk loader runs this before each
/// load, so a load is a full rebuild rather than an incremental merge.
pub async fn reset_schema(pool: &SqlitePool) -> Result<(), sqlx::Error> {
    for statement in DROP_TABLES {
        sqlx::query(statement).execute(pool).await?;
    }
    create_schema(pool).await
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn memory_pool() -> SqlitePool {
        let options = SqliteConnectOptions::from_str("sqlite::memory:")
            .expect("Failed to parse connection string")
            .foreign_keys(true);

        SqlitePoolOptions::new()
            .max_connections(1)
            .connect_with(options)
            .await
            .expect("Failed to open in-memory database")
    }

    #[tokio::test]
    async fn create_schema_is_idempotent() {
        let pool = memory_pool().await;
        create_schema(&pool).await.expect("first create failed");
        create_schema(&pool).await.expect("second create failed");
    }

    #[tokio::test]
    async fn reset_schema_wipes_rows() {
        let pool = memory_pool().await;
        create_schema(&pool).await.unwrap();

        sqlx::query("INSERT INTO youtubers (id, channel_name, youtuber_name) VALUES (1, 'c', 'y')")
            .execute(&pool)
            .await
            .unwrap();

        reset_schema(&pool).await.expect("reset failed");

        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM youtubers")
            .fetch_one(&pool)
            .await
            .unwrap();
        assert_eq!(count, 0);
    }

    #[tokio::test]
    async fn videos_require_existing_youtuber() {
        let pool = memory_pool().await;
        create_schema(&pool).await.unwrap();

        let result = sqlx::query("INSERT INTO videos (id, youtuber_id, title) VALUES (1, 42, 't')")
            .execute(&pool)
            .await;
        assert!(result.is_err(), "insert without youtuber should fail");
    }
}
