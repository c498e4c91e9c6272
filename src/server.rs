//! Catalog HTTP service
//!
//! Serves a static catalog on `GET /api/apps` and `GET /api/apps/search?q=`.
//! Search goes through [`crate::search::filter`], the same matcher the
//! browser uses for client-side filtering.

use crate::catalog::AppRecord;
use crate::error::{AppxError, Result};
use crate::search;
use axum::{
    extract::{Query, State},
    response::Json,
    routing::get,
    Router,
};
use serde::Deserialize;
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::trace::TraceLayer;

#[derive(Clone)]
struct CatalogState {
    records: Arc<Vec<AppRecord>>,
}

#[derive(Debug, Deserialize)]
struct SearchParams {
    #[serde(default)]
    q: String,
}

async fn list_apps(State(state): State<CatalogState>) -> Json<Vec<AppRecord>> {
    tracing::debug!(count = state.records.len(), "list apps");
    Json(state.records.as_ref().clone())
}

async fn search_apps(
    State(state): State<CatalogState>,
    Query(params): Query<SearchParams>,
) -> Json<Vec<AppRecord>> {
    let found = search::filter(&state.records, &params.q);
    tracing::debug!(query = %params.q, count = found.len(), "search apps");
    Json(found)
}

/// Router for the catalog endpoints (separate from `serve` for testing)
pub fn router(records: Vec<AppRecord>) -> Router {
    let state = CatalogState {
        records: Arc::new(records),
    };
    Router::new()
        .route("/api/apps", get(list_apps))
        .route("/api/apps/search", get(search_apps))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Serve the catalog on `listener` until the process is stopped
pub async fn serve_on(listener: tokio::net::TcpListener, records: Vec<AppRecord>) -> Result<()> {
    let app = router(records);
    axum::serve(listener, app)
        .await
        .map_err(|e| AppxError::Server(e.to_string()))
}

/// Bind `addr` and serve the catalog, stopping on Ctrl+C
pub async fn serve(addr: SocketAddr, records: Vec<AppRecord>) -> Result<()> {
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!(addr = %listener.local_addr()?, count = records.len(), "catalog service listening");

    axum::serve(listener, router(records))
        .with_graceful_shutdown(async {
            let _ = tokio::signal::ctrl_c().await;
            tracing::info!("shutting down");
        })
        .await
        .map_err(|e| AppxError::Server(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{
        body::{to_bytes, Body},
        http::{Request, StatusCode},
    };
    use tower::ServiceExt;

    fn catalog() -> Vec<AppRecord> {
        vec![
            AppRecord::new(1, "Agriculture API", "https://agri.example"),
            AppRecord::new(2, "Academy App", "https://academy.example"),
            AppRecord::new(3, "Weather", "https://weather.example"),
        ]
    }

    async fn get_json(uri: &str) -> (StatusCode, Vec<AppRecord>) {
        let response = router(catalog())
            .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
            .unwrap();
        let status = response.status();
        let body = to_bytes(response.into_body(), 1024 * 1024).await.unwrap();
        (status, serde_json::from_slice(&body).unwrap_or_default())
    }

    #[tokio::test]
    async fn list_returns_full_catalog_in_order() {
        let (status, records) = get_json("/api/apps").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(records, catalog());
    }

    #[tokio::test]
    async fn search_filters_case_insensitively() {
        let (status, records) = get_json("/api/apps/search?q=ACA").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(records, vec![catalog()[1].clone()]);
    }

    #[tokio::test]
    async fn search_without_query_returns_everything() {
        let (_, records) = get_json("/api/apps/search").await;
        assert_eq!(records, catalog());
    }

    #[tokio::test]
    async fn search_treats_pattern_characters_literally() {
        let (status, records) = get_json("/api/apps/search?q=.%2A").await;
        assert_eq!(status, StatusCode::OK);
        assert!(records.is_empty());
    }

    #[tokio::test]
    async fn unknown_route_is_404() {
        let response = router(catalog())
            .oneshot(Request::builder().uri("/api/nope").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }
}
