use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    Json,
};
use serde_json::{json, Value};

use super::AppState;
use crate::error::{AppError, AppResult};

/// Handler for POST /api/v1/recommendations/update
///
/// Body: `{"userId": "<uuid>"}`. Runs the pipeline to completion before
/// answering.
pub async fn update(
    State(state): State<AppState>,
    payload: Result<Json<Value>, JsonRejection>,
) -> AppResult<(StatusCode, Json<Value>)> {
    let backend = state.backend()?;

    let Json(body) =
        payload.map_err(|_| AppError::InvalidInput("Request body must be JSON".to_string()))?;

    let raw_id = match body.get("userId") {
        None | Some(Value::Null) => None,
        Some(Value::String(id)) => Some(id.trim().to_string()).filter(|id| !id.is_empty()),
        // present but not a string: let the id parser reject it
        Some(other) => Some(other.to_string()),
    };
    let user_id = raw_id
        .ok_or_else(|| AppError::InvalidInput("Missing 'userId' in request body".to_string()))?;
    let user_id = user_id.as_str();

    tracing::info!(user_id, "Processing recommendation update");

    let outcome = backend.engine.run(user_id).await.map_err(|e| {
        tracing::error!(user_id, error = %e, "Recommendation run aborted");
        e
    })?;

    let mut response = json!({
        "success": outcome.is_success(),
        "message": outcome.message(),
    });
    if let Some(movie_ids) = outcome.recommended_movies() {
        response["recommendedMovies"] = json!(movie_ids);
    }

    Ok((outcome.status_code(), Json(response)))
}
