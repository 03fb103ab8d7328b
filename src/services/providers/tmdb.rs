/// TMDB (The Movie Database) provider
///
/// API Flow:
/// 1. Details: /movie/{id}?append_to_response=keywords → genres, keywords and overview in one round trip
/// 2. Candidates: /movie/popular?page={n} → ranked movie ids
///
/// No caching and no retries: each failure is logged and reported as absent.
use crate::{
    error::{AppError, AppResult},
    models::{MovieDocument, MovieId, TmdbMovieDetails, TmdbPopularPage},
    services::providers::MetadataProvider,
};
use reqwest::Client as HttpClient;

#[derive(Clone)]
pub struct TmdbProvider {
    http_client: HttpClient,
    api_key: String,
    api_url: String,
    language: String,
}

impl TmdbProvider {
    pub fn new(api_key: String, api_url: String, language: String) -> Self {
        Self {
            http_client: HttpClient::new(),
            api_key,
            api_url: api_url.trim_end_matches('/').to_string(),
            language,
        }
    }

    async fn get_json<T: serde::de::DeserializeOwned>(
        &self,
        url: &str,
        query: &[(&str, &str)],
    ) -> AppResult<T> {
        let response = self
            .http_client
            .get(url)
            .query(&[("api_key", self.api_key.as_str())])
            .query(query)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(AppError::ExternalApi(format!(
                "TMDB API returned status {}: {}",
                status, body
            )));
        }

        let body = response.text().await?;
        serde_json::from_str(&body)
            .map_err(|e| AppError::ExternalApi(format!("Failed to parse TMDB response: {}", e)))
    }

    async fn try_fetch_movie(&self, movie_id: MovieId) -> AppResult<MovieDocument> {
        let url = format!("{}/movie/{}", self.api_url, movie_id);
        let details: TmdbMovieDetails = self
            .get_json(&url, &[("append_to_response", "keywords")])
            .await?;

        Ok(details.into_document(movie_id))
    }

    async fn try_popular_movies(&self, page: u32) -> AppResult<Vec<MovieId>> {
        let url = format!("{}/movie/popular", self.api_url);
        let page = page.to_string();
        let listing: TmdbPopularPage = self
            .get_json(
                &url,
                &[("language", self.language.as_str()), ("page", page.as_str())],
            )
            .await?;

        Ok(listing
            .results
            .into_iter()
            .filter_map(|movie| MovieId::new(movie.id))
            .collect())
    }
}

#[async_trait::async_trait]
impl MetadataProvider for TmdbProvider {
    async fn fetch_movie(&self, movie_id: MovieId) -> Option<MovieDocument> {
        match self.try_fetch_movie(movie_id).await {
            Ok(document) => {
                tracing::debug!(movie_id = %movie_id, title = %document.title, "Movie details fetched");
                Some(document)
            }
            Err(e) => {
                tracing::warn!(movie_id = %movie_id, error = %e, "Failed to fetch movie details");
                None
            }
        }
    }

    async fn popular_movies(&self, page: u32) -> Vec<MovieId> {
        match self.try_popular_movies(page).await {
            Ok(ids) => {
                tracing::info!(page, results = ids.len(), provider = "tmdb", "Popular movies fetched");
                ids
            }
            Err(e) => {
                tracing::warn!(page, error = %e, "Failed to fetch popular movies");
                Vec::new()
            }
        }
    }

    fn name(&self) -> &'static str {
        "tmdb"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{
        extract::{Path, Query},
        http::StatusCode,
        routing::get,
        Json, Router,
    };
    use serde_json::{json, Value};
    use std::collections::HashMap;

    async fn movie_details(
        Path(id): Path<String>,
        Query(params): Query<HashMap<String, String>>,
    ) -> Result<Json<Value>, StatusCode> {
        if params.get("api_key").map(String::as_str) != Some("test_key") {
            return Err(StatusCode::UNAUTHORIZED);
        }
        match id.as_str() {
            "603" if params.get("append_to_response").map(String::as_str) == Some("keywords") => {
                Ok(Json(json!({
                    "id": 603,
                    "title": "The Matrix",
                    "overview": "A hacker discovers reality is simulated.",
                    "genres": [{"id": 28, "name": "Action"}],
                    "keywords": {"keywords": [{"id": 310, "name": "artificial intelligence"}]}
                })))
            }
            "popular" => {
                let page = params.get("page").cloned().unwrap_or_default();
                match page.as_str() {
                    "1" => Ok(Json(json!({"page": 1, "results": [{"id": 603}, {"id": 0}, {"id": 27205}]}))),
                    _ => Err(StatusCode::INTERNAL_SERVER_ERROR),
                }
            }
            "999" => Ok(Json(json!("not an object"))),
            _ => Err(StatusCode::NOT_FOUND),
        }
    }

    async fn spawn_fake_tmdb() -> String {
        let app = Router::new().route("/3/movie/:id", get(movie_details));
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        format!("http://{}/3/", addr)
    }

    async fn create_test_provider() -> TmdbProvider {
        let url = spawn_fake_tmdb().await;
        TmdbProvider::new("test_key".to_string(), url, "en-US".to_string())
    }

    #[test]
    fn test_new_trims_trailing_slash() {
        let provider = TmdbProvider::new(
            "k".to_string(),
            "https://api.themoviedb.org/3/".to_string(),
            "en-US".to_string(),
        );
        assert_eq!(provider.api_url, "https://api.themoviedb.org/3");
        assert_eq!(provider.name(), "tmdb");
    }

    #[tokio::test]
    async fn test_fetch_movie_builds_document() {
        let provider = create_test_provider().await;
        let document = provider.fetch_movie(MovieId(603)).await.unwrap();

        assert_eq!(document.title, "The Matrix");
        assert_eq!(
            document.text,
            "Action artificial intelligence A hacker discovers reality is simulated."
        );
    }

    #[tokio::test]
    async fn test_fetch_movie_not_found_is_absent() {
        let provider = create_test_provider().await;
        assert!(provider.fetch_movie(MovieId(42)).await.is_none());
    }

    #[tokio::test]
    async fn test_fetch_movie_malformed_response_is_absent() {
        let provider = create_test_provider().await;
        assert!(provider.fetch_movie(MovieId(999)).await.is_none());
    }

    #[tokio::test]
    async fn test_popular_movies_drops_invalid_ids() {
        let provider = create_test_provider().await;
        assert_eq!(
            provider.popular_movies(1).await,
            vec![MovieId(603), MovieId(27205)]
        );
    }

    #[tokio::test]
    async fn test_popular_movies_failure_is_empty() {
        let provider = create_test_provider().await;
        assert!(provider.popular_movies(2).await.is_empty());
    }

    #[tokio::test]
    async fn test_unreachable_upstream_is_absent() {
        let provider = TmdbProvider::new(
            "test_key".to_string(),
            "http://127.0.0.1:1".to_string(),
            "en-US".to_string(),
        );
        assert!(provider.fetch_movie(MovieId(603)).await.is_none());
        assert!(provider.popular_movies(1).await.is_empty());
    }
}
