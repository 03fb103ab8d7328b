use axum::{
    extract::{rejection::JsonRejection, Path, State},
    Json,
};
use serde::Deserialize;
use serde_json::{json, Value};

use super::AppState;
use crate::{
    error::{AppError, AppResult},
    models::{MovieId, UserId},
};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LikeRequest {
    pub movie_id: i64,
}

fn parse_user_id(raw: &str) -> AppResult<UserId> {
    UserId::parse(raw).ok_or_else(|| AppError::InvalidInput("Invalid user ID format".to_string()))
}

fn user_not_found() -> AppError {
    AppError::NotFound("User not found".to_string())
}

/// Handler for GET /api/v1/users/:id/likes
pub async fn get_likes(
    State(state): State<AppState>,
    Path(raw_id): Path<String>,
) -> AppResult<Json<Value>> {
    let backend = state.backend()?;
    let user_id = parse_user_id(&raw_id)?;

    let user = backend
        .store
        .find_user(user_id)
        .await?
        .ok_or_else(user_not_found)?;

    Ok(Json(json!({
        "success": true,
        "likedMovies": user.liked_movies,
    })))
}

/// Handler for POST /api/v1/users/:id/likes
///
/// Stores the like, then kicks off a background recommendation run whose
/// outcome is only logged.
///
/// Runs are detached and unordered: after two quick likes the run that read
/// the older liked set may store its list last.
pub async fn add_like(
    State(state): State<AppState>,
    Path(raw_id): Path<String>,
    payload: Result<Json<LikeRequest>, JsonRejection>,
) -> AppResult<Json<Value>> {
    let backend = state.backend()?;
    let user_id = parse_user_id(&raw_id)?;

    let Json(request) = payload.map_err(|_| {
        AppError::InvalidInput("Request body must be JSON with a numeric 'movieId'".to_string())
    })?;
    let movie_id = MovieId::new(request.movie_id)
        .ok_or_else(|| AppError::InvalidInput("Invalid movie ID".to_string()))?;

    let user = backend
        .store
        .add_liked_movie(user_id, movie_id)
        .await?
        .ok_or_else(user_not_found)?;

    tracing::info!(user_id = %user_id, movie_id = %movie_id, "Movie liked");

    let engine = backend.engine.clone();
    tokio::spawn(async move {
        if let Err(e) = engine.run_for_user(user_id).await {
            tracing::error!(user_id = %user_id, error = %e, "Background recommendation run failed");
        }
    });

    Ok(Json(json!({
        "success": true,
        "message": "Movie liked successfully and recommendation update triggered",
        "likedMovies": user.liked_movies,
    })))
}

/// Handler for GET /api/v1/users/:id/recommendations
pub async fn get_recommendations(
    State(state): State<AppState>,
    Path(raw_id): Path<String>,
) -> AppResult<Json<Value>> {
    let backend = state.backend()?;
    let user_id = parse_user_id(&raw_id)?;

    let user = backend
        .store
        .find_user(user_id)
        .await?
        .ok_or_else(user_not_found)?;

    Ok(Json(json!({
        "success": true,
        "recommendations": user.recommended_movies,
    })))
}
