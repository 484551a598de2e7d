//! HTTP surface: the search endpoint consumed by the docs UI.

use std::sync::Arc;

use axum::Json;
use axum::Router;
use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::routing::get;
use serde::Deserialize;

use crate::search::{self, IndexStore};
use crate::types::SearchResponse;

/// Shared handler state.
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<IndexStore>,
}

/// Builds the application router.
pub fn router(store: Arc<IndexStore>) -> Router {
    Router::new()
        .route("/api/search", get(handle_search))
        .with_state(AppState { store })
}

#[derive(Debug, Deserialize)]
pub struct SearchParams {
    #[serde(default)]
    q: String,
}

/// GET /api/search?q=... — tiered search over the lazily-built indexes.
///
/// A query arriving while the first build is in flight awaits it; a build
/// failure surfaces as a 500 with the artifact error text.
async fn handle_search(
    State(state): State<AppState>,
    Query(params): Query<SearchParams>,
) -> Result<Json<SearchResponse>, (StatusCode, String)> {
    let query = params.q.trim();
    if query.is_empty() {
        return Err((StatusCode::BAD_REQUEST, "Query is required".to_string()));
    }

    let indexes = state.store.get_or_build().await.map_err(|e| {
        tracing::error!("Index build failed: {}", e);
        (StatusCode::INTERNAL_SERVER_ERROR, e.to_string())
    })?;

    let results = search::search(&indexes, query);
    tracing::debug!("Query {:?} returned {} results", query, results.len());

    Ok(Json(SearchResponse { results }))
}

/// Binds and serves the search endpoint until the process exits.
pub async fn serve(store: Arc<IndexStore>, port: u16) -> crate::error::Result<()> {
    let app = router(store);
    let listener = tokio::net::TcpListener::bind(("0.0.0.0", port)).await?;
    tracing::info!("Serving search on {}", listener.local_addr()?);
    axum::serve(listener, app).await?;
    Ok(())
}
