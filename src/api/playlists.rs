use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, SqlitePool};

use crate::api::videos::Video;
use crate::api::{timeout_query, ApiResponse};
use crate::errors::AppError;
use crate::InnerState;

/// Playlist ids are assigned by the store, unlike the other entities.
#[derive(Debug, Serialize, Deserialize, FromRow, Clone)]
pub struct Playlist {
    pub id: i64,
    pub title: String,
}

#[derive(Debug, Deserialize)]
pub struct CreatePlaylistRequest {
    pub title: String,
}

#[derive(Debug, Deserialize)]
pub struct UpdatePlaylistRequest {
    pub title: String,
}

#[derive(Debug, Deserialize)]
pub struct AddVideoRequest {
    pub video_id: i64,
}

async fn fetch_playlist(
    db: &SqlitePool,
    playlist_id: i64,
    timeout: tokio::time::Duration,
) -> Result<Playlist, AppError> {
    timeout_query(
        timeout,
        sqlx::query_as::<_, Playlist>("SELECT id, title FROM playlists WHERE id = ?")
            .bind(playlist_id)
            .fetch_optional(db),
    )
    .await?
    .ok_or_else(|| AppError::NotFound(format!("Playlist '{}' not found", playlist_id)))
}

#[tracing::instrument(name = "Get all playlists", skip(inner))]
pub async fn all_playlists(
    State(inner): State<InnerState>,
) -> Result<Json<ApiResponse<Vec<Playlist>>>, AppError> {
    let InnerState { db } = inner;
    let fetch_timeout = tokio::time::Duration::from_millis(10000);

    let playlists = timeout_query(
        fetch_timeout,
        sqlx::query_as::<_, Playlist>("SELECT id, title FROM playlists ORDER BY id")
            .fetch_all(&db),
    )
    .await?;

    Ok(Json(ApiResponse::success(
        "Playlists fetched successfully",
        playlists,
    )))
}

#[tracing::instrument(name = "Get playlist by ID", skip(inner))]
pub async fn get_playlist(
    State(inner): State<InnerState>,
    Path(playlist_id): Path<i64>,
) -> Result<Json<ApiResponse<Playlist>>, AppError> {
    let InnerState { db } = inner;
    let fetch_timeout = tokio::time::Duration::from_millis(10000);

    let playlist = fetch_playlist(&db, playlist_id, fetch_timeout).await?;

    Ok(Json(ApiResponse::success(
        "Playlist fetched successfully",
        playlist,
    )))
}

#[tracing::instrument(name = "Create new playlist", skip(inner, payload))]
pub async fn create_playlist(
    State(inner): State<InnerState>,
    Json(payload): Json<CreatePlaylistRequest>,
) -> Result<(StatusCode, Json<ApiResponse<Playlist>>), AppError> {
    tracing::info!("Creating playlist with title: {}", payload.title);

    let InnerState { db } = inner;
    let create_timeout = tokio::time::Duration::from_millis(10000);

    let playlist = timeout_query(
        create_timeout,
        sqlx::query_as::<_, Playlist>(
            "INSERT INTO playlists (title) VALUES (?) RETURNING id, title",
        )
        .bind(&payload.title)
        .fetch_one(&db),
    )
    .await?;

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success("Playlist created successfully", playlist)),
    ))
}

#[tracing::instrument(name = "Update existing playlist", skip(inner, payload))]
pub async fn update_playlist(
    State(inner): State<InnerState>,
    Path(playlist_id): Path<i64>,
    Json(payload): Json<UpdatePlaylistRequest>,
) -> Result<Json<ApiResponse<Playlist>>, AppError> {
    let InnerState { db } = inner;
    let update_timeout = tokio::time::Duration::from_millis(10000);

    let playlist = timeout_query(
        update_timeout,
        sqlx::query_as::<_, Playlist>(
            "UPDATE playlists SET title = ? WHERE id = ? RETURNING id, title",
        )
        .bind(&payload.title)
        .bind(playlist_id)
        .fetch_optional(&db),
    )
    .await?
    .ok_or_else(|| AppError::NotFound(format!("Playlist '{}' not found", playlist_id)))?;

    Ok(Json(ApiResponse::success(
        "Playlist updated successfully",
        playlist,
    )))
}

#[tracing::instrument(name = "Delete playlist", skip(inner))]
pub async fn delete_playlist(
    State(inner): State<InnerState>,
    Path(playlist_id): Path<i64>,
) -> Result<Json<ApiResponse<()>>, AppError> {
    let InnerState { db } = inner;
    let delete_timeout = tokio::time::Duration::from_millis(10000);

    // Join rows go with the playlist (ON DELETE CASCADE).
    let result = timeout_query(
        delete_timeout,
        sqlx::query("DELETE FROM playlists WHERE id = ?")
            .bind(playlist_id)
            .execute(&db),
    )
    .await?;

    if result.rows_affected() == 0 {
        return Err(AppError::NotFound(format!(
            "Playlist '{}' not found",
            playlist_id
        )));
    }

    tracing::info!("Deleted playlist {}", playlist_id);
    Ok(Json(ApiResponse::message("Playlist deleted successfully")))
}

#[tracing::instrument(name = "Add video to playlist", skip(inner, payload))]
pub async fn add_video_to_playlist(
    State(inner): State<InnerState>,
    Path(playlist_id): Path<i64>,
    Json(payload): Json<AddVideoRequest>,
) -> Result<(StatusCode, Json<ApiResponse<()>>), AppError> {
    let InnerState { db } = inner;
    let link_timeout = tokio::time::Duration::from_millis(10000);

    fetch_playlist(&db, playlist_id, link_timeout).await?;

    let video_exists = timeout_query(
        link_timeout,
        sqlx::query_scalar::<_, i64>("SELECT id FROM videos WHERE id = ?")
            .bind(payload.video_id)
            .fetch_optional(&db),
    )
    .await?;

    if video_exists.is_none() {
        return Err(AppError::NotFound(format!(
            "Video '{}' not found",
            payload.video_id
        )));
    }

    let already_linked = timeout_query(
        link_timeout,
        sqlx::query_scalar::<_, i64>(
            "SELECT video_id FROM video_playlists WHERE playlist_id = ? AND video_id = ?",
        )
        .bind(playlist_id)
        .bind(payload.video_id)
        .fetch_optional(&db),
    )
    .await?;

    if already_linked.is_some() {
        return Err(AppError::Conflict(format!(
            "Video '{}' is already in playlist '{}'",
            payload.video_id, playlist_id
        )));
    }

    timeout_query(
        link_timeout,
        sqlx::query("INSERT INTO video_playlists (video_id, playlist_id) VALUES (?, ?)")
            .bind(payload.video_id)
            .bind(playlist_id)
            .execute(&db),
    )
    .await?;

    tracing::info!("Added video {} to playlist {}", payload.video_id, playlist_id);
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::message("Video added to playlist successfully")),
    ))
}

#[tracing::instrument(name = "Get videos of playlist", skip(inner))]
pub async fn videos_of_playlist(
    State(inner): State<InnerState>,
    Path(playlist_id): Path<i64>,
) -> Result<Json<ApiResponse<Vec<Video>>>, AppError> {
    let InnerState { db } = inner;
    let fetch_timeout = tokio::time::Duration::from_millis(10000);

    fetch_playlist(&db, playlist_id, fetch_timeout).await?;

    let videos = timeout_query(
        fetch_timeout,
        sqlx::query_as::<_, Video>(
            r#"SELECT v.id, v.youtuber_id, v.title, v.description, v.video_url,
                      v.publication_date, v.views, v.likes
               FROM videos v
               INNER JOIN video_playlists vp ON vp.video_id = v.id
               WHERE vp.playlist_id = ?
               ORDER BY v.id"#,
        )
        .bind(playlist_id)
        .fetch_all(&db),
    )
    .await?;

    Ok(Json(ApiResponse::success(
        "Playlist videos fetched successfully",
        videos,
    )))
}
