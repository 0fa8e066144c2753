use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use crate::api::videos::Video;
use crate::api::{timeout_query, ApiResponse};
use crate::errors::AppError;
use crate::InnerState;

#[derive(Debug, Serialize, Deserialize, FromRow, Clone)]
pub struct Youtuber {
    pub id: i64,
    pub channel_name: String,
    pub youtuber_name: String,
    pub description: Option<String>,
    pub channel_url: Option<String>,
}

/// Social links, 1:1 with a youtuber.
#[derive(Debug, Serialize, Deserialize, FromRow, Clone)]
pub struct YoutuberProfile {
    pub id: i64,
    pub youtuber_id: i64,
    pub twitter_url: Option<String>,
    pub instagram_url: Option<String>,
    pub website_url: Option<String>,
    pub contact_info: Option<String>,
}

/// The bulk loader supplies external ids; the API accepts one too and lets
/// the store assign the rowid when it is omitted.
#[derive(Debug, Deserialize)]
pub struct CreateYoutuberRequest {
    pub id: Option<i64>,
    pub channel_name: String,
    pub youtuber_name: String,
    pub description: Option<String>,
    pub channel_url: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct UpdateYoutuberRequest {
    pub channel_name: String,
    pub youtuber_name: String,
    pub description: Option<String>,
    pub channel_url: Option<String>,
}

#[tracing::instrument(name = "Get all youtubers", skip(inner))]
pub async fn all_youtubers(
    State(inner): State<InnerState>,
) -> Result<Json<ApiResponse<Vec<Youtuber>>>, AppError> {
    let InnerState { db } = inner;
    let fetch_timeout = tokio::time::Duration::from_millis(10000);

    let youtubers = timeout_query(
        fetch_timeout,
        sqlx::query_as::<_, Youtuber>(
            r#"SELECT id, channel_name, youtuber_name, description, channel_url
               FROM youtubers ORDER BY id"#,
        )
        .fetch_all(&db),
    )
    .await?;

    Ok(Json(ApiResponse::success(
        "Youtubers fetched successfully",
        youtubers,
    )))
}

#[tracing::instrument(name = "Get youtuber by ID", skip(inner))]
pub async fn get_youtuber(
    State(inner): State<InnerState>,
    Path(youtuber_id): Path<i64>,
) -> Result<Json<ApiResponse<Youtuber>>, AppError> {
    let InnerState { db } = inner;
    let fetch_timeout = tokio::time::Duration::from_millis(10000);

    let youtuber = timeout_query(
        fetch_timeout,
        sqlx::query_as::<_, Youtuber>(
            r#"SELECT id, channel_name, youtuber_name, description, channel_url
               FROM youtubers WHERE id = ?"#,
        )
        .bind(youtuber_id)
        .fetch_optional(&db),
    )
    .await?
    .ok_or_else(|| AppError::NotFound(format!("Youtuber '{}' not found", youtuber_id)))?;

    Ok(Json(ApiResponse::success(
        "Youtuber fetched successfully",
        youtuber,
    )))
}

#[tracing::instrument(name = "Create new youtuber", skip(inner, payload))]
pub async fn create_youtuber(
    State(inner): State<InnerState>,
    Json(payload): Json<CreateYoutuberRequest>,
) -> Result<(StatusCode, Json<ApiResponse<Youtuber>>), AppError> {
    tracing::info!("Creating youtuber with channel name: {}", payload.channel_name);

    let InnerState { db } = inner;
    let create_timeout = tokio::time::Duration::from_millis(10000);

    let youtuber = timeout_query(
        create_timeout,
        sqlx::query_as::<_, Youtuber>(
            r#"INSERT INTO youtubers (id, channel_name, youtuber_name, description, channel_url)
               VALUES (?, ?, ?, ?, ?)
               RETURNING id, channel_name, youtuber_name, description, channel_url"#,
        )
        .bind(payload.id)
        .bind(&payload.channel_name)
        .bind(&payload.youtuber_name)
        .bind(&payload.description)
        .bind(&payload.channel_url)
        .fetch_one(&db),
    )
    .await?;

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success("Youtuber created successfully", youtuber)),
    ))
}

#[tracing::instrument(name = "Update existing youtuber", skip(inner, payload))]
pub async fn update_youtuber(
    State(inner): State<InnerState>,
    Path(youtuber_id): Path<i64>,
    Json(payload): Json<UpdateYoutuberRequest>,
) -> Result<Json<ApiResponse<Youtuber>>, AppError> {
    let InnerState { db } = inner;
    let update_timeout = tokio::time::Duration::from_millis(10000);

    let youtuber = timeout_query(
        update_timeout,
        sqlx::query_as::<_, Youtuber>(
            r#"UPDATE youtubers
               SET channel_name = ?, youtuber_name = ?, description = ?, channel_url = ?
               WHERE id = ?
               RETURNING id, channel_name, youtuber_name, description, channel_url"#,
        )
        .bind(&payload.channel_name)
        .bind(&payload.youtuber_name)
        .bind(&payload.description)
        .bind(&payload.channel_url)
        .bind(youtuber_id)
        .fetch_optional(&db),
    )
    .await?
    .ok_or_else(|| AppError::NotFound(format!("Youtuber '{}' not found", youtuber_id)))?;

    Ok(Json(ApiResponse::success(
        "Youtuber updated successfully",
        youtuber,
    )))
}

#[tracing::instrument(name = "Delete youtuber", skip(inner))]
pub async fn delete_youtuber(
    State(inner): State<InnerState>,
    Path(youtuber_id): Path<i64>,
) -> Result<Json<ApiResponse<()>>, AppError> {
    let InnerState { db } = inner;
    let delete_timeout = tokio::time::Duration::from_millis(10000);

    let result = timeout_query(
        delete_timeout,
        sqlx::query("DELETE FROM youtubers WHERE id = ?")
            .bind(youtuber_id)
            .execute(&db),
    )
    .await?;

    if result.rows_affected() == 0 {
        return Err(AppError::NotFound(format!(
            "Youtuber '{}' not found",
            youtuber_id
        )));
    }

    tracing::info!("Deleted youtuber {}", youtuber_id);
    Ok(Json(ApiResponse::message("Youtuber deleted successfully")))
}

#[tracing::instrument(name = "Get videos of youtuber", skip(inner))]
pub async fn videos_of_youtuber(
    State(inner): State<InnerState>,
    Path(youtuber_id): Path<i64>,
) -> Result<Json<ApiResponse<Vec<Video>>>, AppError> {
    let InnerState { db } = inner;
    let fetch_timeout = tokio::time::Duration::from_millis(10000);

    let exists = timeout_query(
        fetch_timeout,
        sqlx::query_scalar::<_, i64>("SELECT id FROM youtubers WHERE id = ?")
            .bind(youtuber_id)
            .fetch_optional(&db),
    )
    .await?;

    if exists.is_none() {
        return Err(AppError::NotFound(format!(
            "Youtuber '{}' not found",
            youtuber_id
        )));
    }

    let videos = timeout_query(
        fetch_timeout,
        sqlx::query_as::<_, Video>(
            r#"SELECT id, youtuber_id, title, description, video_url, publication_date, views, likes
               FROM videos WHERE youtuber_id = ? ORDER BY id"#,
        )
        .bind(youtuber_id)
        .fetch_all(&db),
    )
    .await?;

    Ok(Json(ApiResponse::success(
        "Videos fetched successfully",
        videos,
    )))
}

#[tracing::instrument(name = "Get profile of youtuber", skip(inner))]
pub async fn profile_of_youtuber(
    State(inner): State<InnerState>,
    Path(youtuber_id): Path<i64>,
) -> Result<Json<ApiResponse<YoutuberProfile>>, AppError> {
    let InnerState { db } = inner;
    let fetch_timeout = tokio::time::Duration::from_millis(10000);

    let exists = timeout_query(
        fetch_timeout,
        sqlx::query_scalar::<_, i64>("SELECT id FROM youtubers WHERE id = ?")
            .bind(youtuber_id)
            .fetch_optional(&db),
    )
    .await?;

    if exists.is_none() {
        return Err(AppError::NotFound(format!(
            "Youtuber '{}' not found",
            youtuber_id
        )));
    }

    let profile = timeout_query(
        fetch_timeout,
        sqlx::query_as::<_, YoutuberProfile>(
            r#"SELECT id, youtuber_id, twitter_url, instagram_url, website_url, contact_info
               FROM youtuber_profiles WHERE youtuber_id = ?"#,
        )
        .bind(youtuber_id)
        .fetch_optional(&db),
    )
    .await?
    .ok_or_else(|| {
        AppError::NotFound(format!("Profile for youtuber '{}' not found", youtuber_id))
    })?;

    Ok(Json(ApiResponse::success(
        "Profile fetched successfully",
        profile,
    )))
}
