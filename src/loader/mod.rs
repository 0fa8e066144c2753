//! Bulk CSV loader.
//!
//! Reads the seven catalog CSV files and rebuilds the store from them. The
//! stages run in a fixed order so every foreign key already has its target
//! row by the time it is inserted: youtubers before profiles and videos,
//! videos and the joined entities before the join tables.

pub mod csv_read;
pub mod records;

use std::path::Path;

use sqlx::SqlitePool;

use crate::db;
use crate::errors::AppError;
use crate::loader::csv_read::read_csv;
use crate::loader::records::{
    CategoryRecord, PlaylistRecord, ProfileRecord, VideoCategoryRecord, VideoPlaylistRecord,
    VideoRecord, YoutuberRecord,
};

/// Subdirectory of the data dir that holds the catalog CSVs.
const DATA_SUBDIR: &str = "youtubers_programacio";

const YOUTUBERS_CSV: &str = "youtubers.csv";
const PROFILES_CSV: &str = "youtuber_profiles.csv";
const CATEGORIES_CSV: &str = "categories.csv";
const VIDEOS_CSV: &str = "videos.csv";
const PLAYLISTS_CSV: &str = "llistes_reproduccio.csv";
const VIDEO_CATEGORIES_CSV: &str = "video_categories.csv";
const VIDEO_PLAYLISTS_CSV: &str = "videos_llistes_reproduccio.csv";

/// Runs a full load: destroys and recreates the schema, reads every CSV
/// file, then inserts in dependency order. Not incremental; re-running
/// against the same files produces the same row counts.
pub async fn run(pool: &SqlitePool, data_dir: &Path) -> Result<(), AppError> {
    tracing::info!("Starting data load");

    db::reset_schema(pool).await?;
    tracing::info!("Schema rebuilt");

    // Read all files up front so a bad file aborts before any stage inserts.
    let base = data_dir.join(DATA_SUBDIR);
    let youtubers: Vec<YoutuberRecord> = read_csv(&base.join(YOUTUBERS_CSV))?;
    let profiles: Vec<ProfileRecord> = read_csv(&base.join(PROFILES_CSV))?;
    let categories: Vec<CategoryRecord> = read_csv(&base.join(CATEGORIES_CSV))?;
    let videos: Vec<VideoRecord> = read_csv(&base.join(VIDEOS_CSV))?;
    let playlists: Vec<PlaylistRecord> = read_csv(&base.join(PLAYLISTS_CSV))?;
    let video_categories: Vec<VideoCategoryRecord> = read_csv(&base.join(VIDEO_CATEGORIES_CSV))?;
    let video_playlists: Vec<VideoPlaylistRecord> = read_csv(&base.join(VIDEO_PLAYLISTS_CSV))?;

    load_youtubers(pool, &youtubers).await?;
    load_profiles(pool, &profiles).await?;
    load_categories(pool, &categories).await?;
    load_videos(pool, &videos).await?;
    load_playlists(pool, &playlists).await?;
    load_video_categories(pool, &video_categories).await?;
    load_video_playlists(pool, &video_playlists).await?;

    tracing::info!("All data loaded");
    Ok(())
}

async fn load_youtubers(pool: &SqlitePool, youtubers: &[YoutuberRecord]) -> Result<(), AppError> {
    tracing::info!("Loading {} youtubers...", youtubers.len());

    for youtuber in youtubers {
        sqlx::query(
            r#"INSERT INTO youtubers (id, channel_name, youtuber_name, description, channel_url)
               VALUES (?, ?, ?, ?, ?)"#,
        )
        .bind(youtuber.id)
        .bind(&youtuber.channel_name)
        .bind(&youtuber.youtuber_name)
        .bind(&youtuber.description)
        .bind(&youtuber.channel_url)
        .execute(pool)
        .await?;
    }

    tracing::info!("Youtubers loaded");
    Ok(())
}

async fn load_profiles(pool: &SqlitePool, profiles: &[ProfileRecord]) -> Result<(), AppError> {
    tracing::info!("Loading {} profiles...", profiles.len());

    for profile in profiles {
        sqlx::query(
            r#"INSERT INTO youtuber_profiles
               (id, youtuber_id, twitter_url, instagram_url, website_url, contact_info)
               VALUES (?, ?, ?, ?, ?, ?)"#,
        )
        .bind(profile.id)
        .bind(profile.youtuber_id)
        .bind(&profile.twitter_url)
        .bind(&profile.instagram_url)
        .bind(&profile.website_url)
        .bind(&profile.contact_info)
        .execute(pool)
        .await?;
    }

    tracing::info!("Profiles loaded");
    Ok(())
}

async fn load_categories(pool: &SqlitePool, categories: &[CategoryRecord]) -> Result<(), AppError> {
    tracing::info!("Loading {} categories...", categories.len());

    for category in categories {
        sqlx::query("INSERT INTO categories (id, name, description) VALUES (?, ?, ?)")
            .bind(category.id)
            .bind(&category.name)
            .bind(&category.description)
            .execute(pool)
            .await?;
    }

    tracing::info!("Categories loaded");
    Ok(())
}

async fn load_videos(pool: &SqlitePool, videos: &[VideoRecord]) -> Result<(), AppError> {
    tracing::info!("Loading {} videos...", videos.len());

    for video in videos {
        sqlx::query(
            r#"INSERT INTO videos
               (id, youtuber_id, title, description, video_url, publication_date, views, likes)
               VALUES (?, ?, ?, ?, ?, ?, ?, ?)"#,
        )
        .bind(video.id)
        .bind(video.youtuber_id)
        .bind(&video.title)
        .bind(&video.description)
        .bind(&video.video_url)
        .bind(video.publication_date)
        .bind(video.views)
        .bind(video.likes)
        .execute(pool)
        .await?;
    }

    tracing::info!("Videos loaded");
    Ok(())
}

async fn load_playlists(pool: &SqlitePool, playlists: &[PlaylistRecord]) -> Result<(), AppError> {
    tracing::info!("Loading {} playlists...", playlists.len());

    for playlist in playlists {
        sqlx::query("INSERT INTO playlists (id, title) VALUES (?, ?)")
            .bind(playlist.id)
            .bind(&playlist.title)
            .execute(pool)
            .await?;
    }

    tracing::info!("Playlists loaded");
    Ok(())
}

async fn load_video_categories(
    pool: &SqlitePool,
    links: &[VideoCategoryRecord],
) -> Result<(), AppError> {
    tracing::info!("Loading {} video-category links...", links.len());

    for link in links {
        sqlx::query("INSERT INTO video_categories (video_id, category_id) VALUES (?, ?)")
            .bind(link.video_id)
            .bind(link.category_id)
            .execute(pool)
            .await?;
    }

    tracing::info!("Video-category links loaded");
    Ok(())
}

async fn load_video_playlists(
    pool: &SqlitePool,
    links: &[VideoPlaylistRecord],
) -> Result<(), AppError> {
    tracing::info!("Loading {} video-playlist links...", links.len());

    for link in links {
        sqlx::query("INSERT INTO video_playlists (video_id, playlist_id) VALUES (?, ?)")
            .bind(link.video_id)
            .bind(link.playlist_id)
            .execute(pool)
            .await?;
    }

    tracing::info!("Video-playlist links loaded");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
    use std::io::Write;
    use std::path::PathBuf;
    use std::str::FromStr;

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

    fn write_file(dir: &Path, name: &str, content: &str) {
        let mut file = std::fs::File::create(dir.join(name)).expect("Failed to create fixture");
        file.write_all(content.as_bytes()).expect("Failed to write fixture");
    }

    /// Two youtubers, two profiles, two categories, three videos, two
    /// playlists and a handful of links.
    fn write_fixtures(data_dir: &Path) -> PathBuf {
        let base = data_dir.join(DATA_SUBDIR);
        std::fs::create_dir_all(&base).expect("Failed to create fixture dir");

        write_file(
            &base,
            YOUTUBERS_CSV,
            "id,channel_name,youtuber_name,description,channel_url\n\
             1,midulive,Miguel Angel Duran,Directes de programacio,https://youtube.com/@midulive\n\
             2,MoureDev,Brais Moure,Tutorials,https://youtube.com/@mouredev\n",
        );
        write_file(
            &base,
            PROFILES_CSV,
            "id,youtuber_id,twitter_url,instagram_url,website_url,contact_info\n\
             1,1,https://twitter.com/midudev,,https://midu.dev,hola@midu.dev\n\
             2,2,https://twitter.com/mouredev,https://instagram.com/mouredev,,\n",
        );
        write_file(
            &base,
            CATEGORIES_CSV,
            "id,name,description\n\
             1,Rust,Llenguatge de sistemes\n\
             2,Web,Frontend i backend\n",
        );
        write_file(
            &base,
            VIDEOS_CSV,
            "id,youtuber_id,title,description,video_url,publication_date,views,likes\n\
             1,1,Curs de Rust,Introduccio,https://youtu.be/a,2023-05-01,15000,900\n\
             2,1,Curs de React,,https://youtu.be/b,2023-06-10,22000,1500\n\
             3,2,Python des de zero,,https://youtu.be/c,2023-02-20,80000,6000\n",
        );
        write_file(&base, PLAYLISTS_CSV, "id,titol\n1,Aprendre Rust\n2,Frontend\n");
        write_file(
            &base,
            VIDEO_CATEGORIES_CSV,
            "video_id,category_id\n1,1\n2,2\n3,1\n",
        );
        write_file(
            &base,
            VIDEO_PLAYLISTS_CSV,
            "video_id,llista_reproduccio_id\n1,1\n2,2\n",
        );

        base
    }

    async fn count(pool: &SqlitePool, table: &str) -> i64 {
        sqlx::query_scalar(&format!("SELECT COUNT(*) FROM {}", table))
            .fetch_one(pool)
            .await
            .expect("count failed")
    }

    #[tokio::test]
    async fn loads_every_table_with_matching_counts() {
        let dir = tempfile::tempdir().unwrap();
        write_fixtures(dir.path());
        let pool = memory_pool().await;

        run(&pool, dir.path()).await.expect("load failed");

        assert_eq!(count(&pool, "youtubers").await, 2);
        assert_eq!(count(&pool, "youtuber_profiles").await, 2);
        assert_eq!(count(&pool, "categories").await, 2);
        assert_eq!(count(&pool, "videos").await, 3);
        assert_eq!(count(&pool, "playlists").await, 2);
        assert_eq!(count(&pool, "video_categories").await, 3);
        assert_eq!(count(&pool, "video_playlists").await, 2);
    }

    #[tokio::test]
    async fn rerunning_does_not_duplicate_rows() {
        let dir = tempfile::tempdir().unwrap();
        write_fixtures(dir.path());
        let pool = memory_pool().await;

        run(&pool, dir.path()).await.expect("first load failed");
        run(&pool, dir.path()).await.expect("second load failed");

        assert_eq!(count(&pool, "youtubers").await, 2);
        assert_eq!(count(&pool, "videos").await, 3);
        assert_eq!(count(&pool, "video_playlists").await, 2);
    }

    #[tokio::test]
    async fn malformed_row_warns_but_loads_the_rest() {
        let dir = tempfile::tempdir().unwrap();
        let base = write_fixtures(dir.path());

        // Second row has a non-numeric id.
        write_file(
            &base,
            CATEGORIES_CSV,
            "id,name,description\n1,Rust,\nbroken,Web,\n3,Mobil,\n",
        );

        let pool = memory_pool().await;
        run(&pool, dir.path()).await.expect("load failed");

        assert_eq!(count(&pool, "categories").await, 2);
    }

    #[tokio::test]
    async fn missing_file_aborts_before_inserting() {
        let dir = tempfile::tempdir().unwrap();
        let base = write_fixtures(dir.path());
        std::fs::remove_file(base.join(VIDEOS_CSV)).unwrap();

        let pool = memory_pool().await;
        let result = run(&pool, dir.path()).await;

        assert!(result.is_err());
        assert_eq!(count(&pool, "youtubers").await, 0);
    }

    #[tokio::test]
    async fn video_referencing_unknown_youtuber_fails_its_stage() {
        let dir = tempfile::tempdir().unwrap();
        let base = write_fixtures(dir.path());

        write_file(
            &base,
            VIDEOS_CSV,
            "id,youtuber_id,title,description,video_url,publication_date,views,likes\n\
             1,99,Orfe,,,,,\n",
        );

        let pool = memory_pool().await;
        let result = run(&pool, dir.path()).await;

        assert!(result.is_err(), "dangling youtuber_id should abort the run");
    }
}
