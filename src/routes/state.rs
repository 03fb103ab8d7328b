use std::sync::Arc;

use crate::{
    db::UserStore,
    error::{AppError, AppResult},
    services::{EngineSettings, MetadataProvider, RecommendationEngine},
};

/// Handles opened once at startup and shared by every request
#[derive(Clone)]
pub struct Backend {
    pub store: Arc<dyn UserStore>,
    pub engine: Arc<RecommendationEngine>,
}

/// Shared application state
///
/// `backend` is `None` when configuration or the database failed at startup;
/// the server then answers every user-facing request with `AppError::Unavailable`.
#[derive(Clone)]
pub struct AppState {
    backend: Option<Backend>,
}

impl AppState {
    pub fn new(
        store: Arc<dyn UserStore>,
        provider: Arc<dyn MetadataProvider>,
        settings: EngineSettings,
    ) -> Self {
        let engine = Arc::new(RecommendationEngine::new(store.clone(), provider, settings));
        Self {
            backend: Some(Backend { store, engine }),
        }
    }

    /// State for a server whose store never came up
    pub fn degraded() -> Self {
        Self { backend: None }
    }

    pub fn backend(&self) -> AppResult<&Backend> {
        self.backend.as_ref().ok_or(AppError::Unavailable)
    }
}
