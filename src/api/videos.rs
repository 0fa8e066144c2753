use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, SqlitePool};

use crate::api::{timeout_query, ApiResponse};
use crate::errors::AppError;
use crate::InnerState;

#[derive(Debug, Serialize, Deserialize, FromRow, Clone)]
pub struct Video {
    pub id: i64,
    pub youtuber_id: i64,
    pub title: String,
    pub description: Option<String>,
    pub video_url: Option<String>,
    pub publication_date: Option<NaiveDate>,
    pub views: Option<i64>,
    pub likes: Option<i64>,
}

#[derive(Debug, Deserialize)]
pub struct CreateVideoRequest {
    pub id: Option<i64>,
    pub youtuber_id: i64,
    pub title: String,
    pub description: Option<String>,
    pub video_url: Option<String>,
    pub publication_date: Option<NaiveDate>,
    pub views: Option<i64>,
    pub likes: Option<i64>,
}

#[derive(Debug, Deserialize)]
pub struct UpdateVideoRequest {
    pub youtuber_id: i64,
    pub title: String,
    pub description: Option<String>,
    pub video_url: Option<String>,
    pub publication_date: Option<NaiveDate>,
    pub views: Option<i64>,
    pub likes: Option<i64>,
}

const VIDEO_COLUMNS: &str =
    "id, youtuber_id, title, description, video_url, publication_date, views, likes";

/// A video row may only point at an existing youtuber; surfaced as 404
/// rather than a raw foreign-key failure.
async fn ensure_youtuber_exists(
    db: &SqlitePool,
    youtuber_id: i64,
    timeout: tokio::time::Duration,
) -> Result<(), AppError> {
    let exists = timeout_query(
        timeout,
        sqlx::query_scalar::<_, i64>("SELECT id FROM youtubers WHERE id = ?")
            .bind(youtuber_id)
            .fetch_optional(db),
    )
    .await?;

    if exists.is_none() {
        return Err(AppError::NotFound(format!(
            "Youtuber '{}' not found",
            youtuber_id
        )));
    }
    Ok(())
}

#[tracing::instrument(name = "Get all videos", skip(inner))]
pub async fn all_videos(
    State(inner): State<InnerState>,
) -> Result<Json<ApiResponse<Vec<Video>>>, AppError> {
    let InnerState { db } = inner;
    let fetch_timeout = tokio::time::Duration::from_millis(10000);

    let videos = timeout_query(
        fetch_timeout,
        sqlx::query_as::<_, Video>(&format!(
            "SELECT {} FROM videos ORDER BY id",
            VIDEO_COLUMNS
        ))
        .fetch_all(&db),
    )
    .await?;

    Ok(Json(ApiResponse::success("Videos fetched successfully", videos)))
}

#[tracing::instrument(name = "Get video by ID", skip(inner))]
pub async fn get_video(
    State(inner): State<InnerState>,
    Path(video_id): Path<i64>,
) -> Result<Json<ApiResponse<Video>>, AppError> {
    let InnerState { db } = inner;
    let fetch_timeout = tokio::time::Duration::from_millis(10000);

    let video = timeout_query(
        fetch_timeout,
        sqlx::query_as::<_, Video>(&format!(
            "SELECT {} FROM videos WHERE id = ?",
            VIDEO_COLUMNS
        ))
        .bind(video_id)
        .fetch_optional(&db),
    )
    .await?
    .ok_or_else(|| AppError::NotFound(format!("Video '{}' not found", video_id)))?;

    Ok(Json(ApiResponse::success("Video fetched successfully", video)))
}

#[tracing::instrument(name = "Create new video", skip(inner, payload))]
pub async fn create_video(
    State(inner): State<InnerState>,
    Json(payload): Json<CreateVideoRequest>,
) -> Result<(StatusCode, Json<ApiResponse<Video>>), AppError> {
    tracing::info!("Creating video with title: {}", payload.title);

    let InnerState { db } = inner;
    let create_timeout = tokio::time::Duration::from_millis(10000);

    ensure_youtuber_exists(&db, payload.youtuber_id, create_timeout).await?;

    let video = timeout_query(
        create_timeout,
        sqlx::query_as::<_, Video>(&format!(
            r#"INSERT INTO videos
               (id, youtuber_id, title, description, video_url, publication_date, views, likes)
               VALUES (?, ?, ?, ?, ?, ?, ?, ?)
               RETURNING {}"#,
            VIDEO_COLUMNS
        ))
        .bind(payload.id)
        .bind(payload.youtuber_id)
        .bind(&payload.title)
        .bind(&payload.description)
        .bind(&payload.video_url)
        .bind(payload.publication_date)
        .bind(payload.views)
        .bind(payload.likes)
        .fetch_one(&db),
    )
    .await?;

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success("Video created successfully", video)),
    ))
}

#[tracing::instrument(name = "Update existing video", skip(inner, payload))]
pub async fn update_video(
    State(inner): State<InnerState>,
    Path(video_id): Path<i64>,
    Json(payload): Json<UpdateVideoRequest>,
) -> Result<Json<ApiResponse<Video>>, AppError> {
    let InnerState { db } = inner;
    let update_timeout = tokio::time::Duration::from_millis(10000);

    ensure_youtuber_exists(&db, payload.youtuber_id, update_timeout).await?;

    let video = timeout_query(
        update_timeout,
        sqlx::query_as::<_, Video>(&format!(
            r#"UPDATE videos
               SET youtuber_id = ?, title = ?, description = ?, video_url = ?,
                   publication_date = ?, views = ?, likes = ?
               WHERE id = ?
               RETURNING {}"#,
            VIDEO_COLUMNS
        ))
        .bind(payload.youtuber_id)
        .bind(&payload.title)
        .bind(&payload.description)
        .bind(&payload.video_url)
        .bind(payload.publication_date)
        .bind(payload.views)
        .bind(payload.likes)
        .bind(video_id)
        .fetch_optional(&db),
    )
    .await?
    .ok_or_else(|| AppError::NotFound(format!("Video '{}' not found", video_id)))?;

    Ok(Json(ApiResponse::success("Video updated successfully", video)))
}

#[tracing::instrument(name = "Delete video", skip(inner))]
pub async fn delete_video(
    State(inner): State<InnerState>,
    Path(video_id): Path<i64>,
) -> Result<Json<ApiResponse<()>>, AppError> {
    let InnerState { db } = inner;
    let delete_timeout = tokio::time::Duration::from_millis(10000);

    let result = timeout_query(
        delete_timeout,
        sqlx::query("DELETE FROM videos WHERE id = ?")
            .bind(video_id)
            .execute(&db),
    )
    .await?;

    if result.rows_affected() == 0 {
        return Err(AppError::NotFound(format!("Video '{}' not found", video_id)));
    }

    tracing::info!("Deleted video {}", video_id);
    Ok(Json(ApiResponse::message("Video deleted successfully")))
}
