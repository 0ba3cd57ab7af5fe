//! Health check endpoints

use axum::{extract::State, http::StatusCode, Json};
use serde::Serialize;

use crate::AppState;

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    /// Current status of the service
    pub status: String,
    /// Version of the service
    pub version: String,
}

impl HealthResponse {
    fn new(status: &str) -> Self {
        Self {
            status: status.to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
        }
    }
}

/// Liveness; answers as long as the process serves requests
pub async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse::new("healthy"))
}

/// Readiness; 503 while the record store cannot be reached
pub async fn readiness_check(State(state): State<AppState>) -> (StatusCode, Json<HealthResponse>) {
    match state.services.store().ping().await {
        Ok(()) => (StatusCode::OK, Json(HealthResponse::new("ready"))),
        Err(e) => {
            tracing::warn!(error = %e, "Record store not reachable");
            (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(HealthResponse::new("unavailable")),
            )
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{config::AppConfig, error::AppError, repository::MockCatalogStore, services::Services};
    use std::sync::Arc;

    fn state(store: MockCatalogStore) -> AppState {
        AppState {
            config: Arc::new(AppConfig::default()),
            services: Arc::new(Services::new(Arc::new(store))),
        }
    }

    #[tokio::test]
    async fn test_readiness_follows_store() {
        let mut up = MockCatalogStore::new();
        up.expect_ping().returning(|| Ok(()));
        let (status, Json(body)) = readiness_check(State(state(up))).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body.status, "ready");

        let mut down = MockCatalogStore::new();
        down.expect_ping()
            .returning(|| Err(AppError::Internal("pool timed out".into())));
        let (status, Json(body)) = readiness_check(State(state(down))).await;
        assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(body.status, "unavailable");
    }
}
