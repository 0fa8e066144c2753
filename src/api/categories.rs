use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use crate::api::{timeout_query, ApiResponse};
use crate::errors::AppError;
use crate::InnerState;

#[derive(Debug, Serialize, Deserialize, FromRow, Clone)]
pub struct Category {
    pub id: i64,
    pub name: String,
    pub description: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct CreateCategoryRequest {
    pub id: Option<i64>,
    pub name: String,
    pub description: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct UpdateCategoryRequest {
    pub name: String,
    pub description: Option<String>,
}

#[tracing::instrument(name = "Get all categories", skip(inner))]
pub async fn all_categories(
    State(inner): State<InnerState>,
) -> Result<Json<ApiResponse<Vec<Category>>>, AppError> {
    let InnerState { db } = inner;
    let fetch_timeout = tokio::time::Duration::from_millis(10000);

    let categories = timeout_query(
        fetch_timeout,
        sqlx::query_as::<_, Category>("SELECT id, name, description FROM categories ORDER BY id")
            .fetch_all(&db),
    )
    .await?;

    Ok(Json(ApiResponse::success(
        "Categories fetched successfully",
        categories,
    )))
}

#[tracing::instrument(name = "Get category by ID", skip(inner))]
pub async fn get_category(
    State(inner): State<InnerState>,
    Path(category_id): Path<i64>,
) -> Result<Json<ApiResponse<Category>>, AppError> {
    let InnerState { db } = inner;
    let fetch_timeout = tokio::time::Duration::from_millis(10000);

    let category = timeout_query(
        fetch_timeout,
        sqlx::query_as::<_, Category>("SELECT id, name, description FROM categories WHERE id = ?")
            .bind(category_id)
            .fetch_optional(&db),
    )
    .await?
    .ok_or_else(|| AppError::NotFound(format!("Category '{}' not found", category_id)))?;

    Ok(Json(ApiResponse::success(
        "Category fetched successfully",
        category,
    )))
}

#[tracing::instrument(name = "Create new category", skip(inner, payload))]
pub async fn create_category(
    State(inner): State<InnerState>,
    Json(payload): Json<CreateCategoryRequest>,
) -> Result<(StatusCode, Json<ApiResponse<Category>>), AppError> {
    tracing::info!("Creating category with name: {}", payload.name);

    let InnerState { db } = inner;
    let create_timeout = tokio::time::Duration::from_millis(10000);

    let category = timeout_query(
        create_timeout,
        sqlx::query_as::<_, Category>(
            r#"INSERT INTO categories (id, name, description) VALUES (?, ?, ?)
               RETURNING id, name, description"#,
        )
        .bind(payload.id)
        .bind(&payload.name)
        .bind(&payload.description)
        .fetch_one(&db),
    )
    .await?;

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success("Category created successfully", category)),
    ))
}

#[tracing::instrument(name = "Update existing category", skip(inner, payload))]
pub async fn update_category(
    State(inner): State<InnerState>,
    Path(category_id): Path<i64>,
    Json(payload): Json<UpdateCategoryRequest>,
) -> Result<Json<ApiResponse<Category>>, AppError> {
    let InnerState { db } = inner;
    let update_timeout = tokio::time::Duration::from_millis(10000);

    let category = timeout_query(
        update_timeout,
        sqlx::query_as::<_, Category>(
            r#"UPDATE categories SET name = ?, description = ? WHERE id = ?
               RETURNING id, name, description"#,
        )
        .bind(&payload.name)
        .bind(&payload.description)
        .bind(category_id)
        .fetch_optional(&db),
    )
    .await?
    .ok_or_else(|| AppError::NotFound(format!("Category '{}' not found", category_id)))?;

    Ok(Json(ApiResponse::success(
        "Category updated successfully",
        category,
    )))
}

#[tracing::instrument(name = "Delete category", skip(inner))]
pub async fn delete_category(
    State(inner): State<InnerState>,
    Path(category_id): Path<i64>,
) -> Result<Json<ApiResponse<()>>, AppError> {
    let InnerState { db } = inner;
    let delete_timeout = tokio::time::Duration::from_millis(10000);

    let result = timeout_query(
        delete_timeout,
        sqlx::query("DELETE FROM categories WHERE id = ?")
            .bind(category_id)
            .execute(&db),
    )
    .await?;

    if result.rows_affected() == 0 {
        return Err(AppError::NotFound(format!(
            "Category '{}' not found",
            category_id
        )));
    }

    tracing::info!("Deleted category {}", category_id);
    Ok(Json(ApiResponse::message("Category deleted successfully")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::create_schema;
    use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
    use std::str::FromStr;

    async fn setup_state() -> InnerState {
        let options = SqliteConnectOptions::from_str("sqlite::memory:")
            .expect("Failed to parse connection string")
            .foreign_keys(true);

        let db = SqlitePoolOptions::new()
            .max_connections(1)
            .connect_with(options)
            .await
            .expect("Failed to open in-memory database");

        create_schema(&db).await.expect("Failed to create schema");
        InnerState { db }
    }

    #[tokio::test]
    async fn crud_round_trip() {
        let state = setup_state().await;

        let (status, created) = create_category(
            State(state.clone()),
            Json(CreateCategoryRequest {
                id: Some(1),
                name: "Rust".to_string(),
                description: Some("Llenguatge de sistemes".to_string()),
            }),
        )
        .await
        .expect("create failed");
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(created.0.resultat.as_ref().unwrap().name, "Rust");

        let all = all_categories(State(state.clone())).await.expect("list failed");
        assert_eq!(all.0.resultat.as_ref().unwrap().len(), 1);

        update_category(
            State(state.clone()),
            Path(1),
            Json(UpdateCategoryRequest {
                name: "Sistemes".to_string(),
                description: None,
            }),
        )
        .await
        .expect("update failed");

        delete_category(State(state.clone()), Path(1))
            .await
            .expect("delete failed");

        assert!(matches!(
            get_category(State(state), Path(1)).await,
            Err(AppError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn update_unknown_category_is_not_found() {
        let state = setup_state().await;

        let result = update_category(
            State(state),
            Path(404),
            Json(UpdateCategoryRequest {
                name: "x".to_string(),
                description: None,
            }),
        )
        .await;

        assert!(matches!(result, Err(AppError::NotFound(_))));
    }
}
