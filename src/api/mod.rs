//! HTTP API modules, one per catalog resource.

pub mod categories;
pub mod playlists;
pub mod videos;
pub mod youtubers;

use axum::routing::{delete, get, post, put};
use axum::Router;
use serde::{Deserialize, Serialize};

use crate::errors::AppError;
use crate::system::health_check::health_check;
use crate::InnerState;

/// Standard API response wrapper: `ok` plus a human-readable `missatge`, with
/// the payload under `resultat` when there is one. Error responses use the
/// same envelope with `ok: false` (see `AppError::into_response`).
#[derive(Debug, Serialize, Deserialize)]
pub struct ApiResponse<T> {
    pub ok: bool,
    pub missatge: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub resultat: Option<T>,
}

impl<T> ApiResponse<T> {
    pub fn success(missatge: impl Into<String>, resultat: T) -> Self {
        Self {
            ok: true,
            missatge: missatge.into(),
            resultat: Some(resultat),
        }
    }
}

impl ApiResponse<()> {
    pub fn message(missatge: impl Into<String>) -> Self {
        Self {
            ok: true,
            missatge: missatge.into(),
            resultat: None,
        }
    }
}

pub async fn timeout_query<T, F>(duration: std::time::Duration, fut: F) -> Result<T, AppError>
where
    F: std::future::Future<Output = Result<T, sqlx::Error>>,
{
    match tokio::time::timeout(duration, fut).await {
        Ok(Ok(res)) => Ok(res),
        Ok(Err(e)) => Err(AppError::from(e)),
        Err(_) => Err(AppError::Database(anyhow::anyhow!(
            "Query timeout after {:?}",
            duration
        ))),
    }
}

/// Creates the API router with every resource route
#[tracing::instrument(name = "create_api_router", skip(state))]
pub fn create_api_router(state: InnerState) -> Router {
    tracing::info!("Creating API router");

    Router::new()
        .route("/health", get(health_check))

        .route("/youtubers", get(youtubers::all_youtubers))
        .route("/youtubers", post(youtubers::create_youtuber))
        .route("/youtubers/:id", get(youtubers::get_youtuber))
        .route("/youtubers/:id", put(youtubers::update_youtuber))
        .route("/youtubers/:id", delete(youtubers::delete_youtuber))
        .route("/youtubers/:id/videos", get(youtubers::videos_of_youtuber))
        .route("/youtubers/:id/perfil", get(youtubers::profile_of_youtuber))

        .route("/videos", get(videos::all_videos))
        .route("/videos", post(videos::create_video))
        .route("/videos/:id", get(videos::get_video))
        .route("/videos/:id", put(videos::update_video))
        .route("/videos/:id", delete(videos::delete_video))

        .route("/categories", get(categories::all_categories))
        .route("/categories", post(categories::create_category))
        .route("/categories/:id", get(categories::get_category))
        .route("/categories/:id", put(categories::update_category))
        .route("/categories/:id", delete(categories::delete_category))

        .route("/llistes", get(playlists::all_playlists))
        .route("/llistes", post(playlists::create_playlist))
        .route("/llistes/:id", get(playlists::get_playlist))
        .route("/llistes/:id", put(playlists::update_playlist))
        .route("/llistes/:id", delete(playlists::delete_playlist))
        .route("/llistes/:id/afegir-video", post(playlists::add_video_to_playlist))
        .route("/llistes/:id/videos", get(playlists::videos_of_playlist))

        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::create_schema;
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
    use std::str::FromStr;
    use tower::ServiceExt;

    async fn setup_router() -> Router {
        let options = SqliteConnectOptions::from_str("sqlite::memory:")
            .expect("Failed to parse connection string")
            .foreign_keys(true);

        let db = SqlitePoolOptions::new()
            .max_connections(1)
            .connect_with(options)
            .await
            .expect("Failed to open in-memory database");

        create_schema(&db).await.expect("Failed to create schema");

        sqlx::query("INSERT INTO playlists (title) VALUES ('Aprendre Rust')")
            .execute(&db)
            .await
            .unwrap();

        create_api_router(InnerState { db })
    }

    async fn body_json(response: axum::response::Response) -> serde_json::Value {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("Failed to read body");
        serde_json::from_slice(&bytes).expect("Body was not JSON")
    }

    #[tokio::test]
    async fn health_endpoint_responds_ok() {
        let app = setup_router().await;

        let response = app
            .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn unknown_playlist_returns_404_envelope() {
        let app = setup_router().await;

        let response = app
            .oneshot(
                Request::builder()
                    .uri("/llistes/999")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        let json = body_json(response).await;
        assert_eq!(json["ok"], serde_json::json!(false));
        assert!(json["missatge"].as_str().unwrap().contains("999"));
    }

    #[tokio::test]
    async fn adding_unknown_video_returns_404() {
        let app = setup_router().await;

        let response = app
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/llistes/1/afegir-video")
                    .header("content-type", "application/json")
                    .body(Body::from(r#"{"video_id": 999}"#))
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        let json = body_json(response).await;
        assert_eq!(json["ok"], serde_json::json!(false));
    }

    #[tokio::test]
    async fn listing_playlists_wraps_result_in_envelope() {
        let app = setup_router().await;

        let response = app
            .oneshot(Request::builder().uri("/llistes").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let json = body_json(response).await;
        assert_eq!(json["ok"], serde_json::json!(true));
        assert_eq!(json["resultat"].as_array().unwrap().len(), 1);
    }
}
