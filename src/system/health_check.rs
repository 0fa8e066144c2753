use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;

use crate::InnerState;

/// Liveness probe: verifies the store answers a trivial query.
pub async fn health_check(State(inner): State<InnerState>) -> impl IntoResponse {
    match sqlx::query_scalar::<_, i64>("SELECT 1")
        .fetch_one(&inner.db)
        .await
    {
        Ok(_) => (StatusCode::OK, "OK"),
        Err(e) => {
            tracing::error!("Health check failed: {:?}", e);
            (StatusCode::SERVICE_UNAVAILABLE, "Database unavailable")
        }
    }
}
