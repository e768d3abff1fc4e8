//! API routes for the query server

pub mod metadata;
pub mod query;

use axum::{
    routing::{get, post},
    Router,
};

use crate::server::state::AppState;

/// Build all API routes
pub fn api_routes() -> Router<AppState> {
    Router::new()
        // Full pipeline: retrieve, grade, fall back, generate
        .route("/query", post(query::run_query))
        // Direct similarity search, no grading or generation
        .route("/search", post(query::search))
        // Metadata graph queries
        .route("/metadata/owners", get(metadata::list_owners))
        .route("/metadata/companies", get(metadata::list_companies))
        .route("/metadata/categories", get(metadata::list_categories))
        .route("/metadata/years", get(metadata::list_years))
        .route("/metadata/stats", get(metadata::stats))
        .route("/graph/data", get(metadata::graph_data))
        // Info
        .route("/info", get(info))
}

/// API info endpoint
async fn info() -> axum::Json<serde_json::Value> {
    axum::Json(serde_json::json!({
        "name": "graph-rag",
        "version": env!("CARGO_PKG_VERSION"),
        "description": "Metadata-filtered retrieval with graded context and web fallback",
        "endpoints": {
            "POST /api/query": "Ask a question with optional metadata filters",
            "POST /api/search": "Direct similarity search above a score threshold",
            "GET /api/metadata/owners": "List known document owners",
            "GET /api/metadata/companies": "List known companies",
            "GET /api/metadata/categories": "List known categories",
            "GET /api/metadata/years": "List known years",
            "GET /api/metadata/stats": "Node counts per entity kind",
            "GET /api/graph/data": "Graph nodes and edges for visualization"
        }
    }))
}
