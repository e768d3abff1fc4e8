//! Metadata graph endpoints

use axum::{extract::State, Json};
use serde_json::{json, Value};

use crate::error::Result;
use crate::providers::metadata_index::{EntityKind, GraphSnapshot, GraphStats};
use crate::server::state::AppState;

/// GET /api/metadata/owners
pub async fn list_owners(State(state): State<AppState>) -> Result<Json<Value>> {
    let owners = state.graph().list_values(EntityKind::Owner).await?;
    Ok(Json(json!({ "owners": owners })))
}

/// GET /api/metadata/companies
pub async fn list_companies(State(state): State<AppState>) -> Result<Json<Value>> {
    let companies = state.graph().list_values(EntityKind::Company).await?;
    Ok(Json(json!({ "companies": companies })))
}

/// GET /api/metadata/categories
pub async fn list_categories(State(state): State<AppState>) -> Result<Json<Value>> {
    let categories = state.graph().list_values(EntityKind::Category).await?;
    Ok(Json(json!({ "categories": categories })))
}

/// GET /api/metadata/years
pub async fn list_years(State(state): State<AppState>) -> Result<Json<Value>> {
    let years = state.graph().list_values(EntityKind::Year).await?;
    Ok(Json(json!({ "years": years })))
}

/// GET /api/metadata/stats
pub async fn stats(State(state): State<AppState>) -> Result<Json<GraphStats>> {
    Ok(Json(state.graph().stats().await?))
}

/// GET /api/graph/data - Nodes and edges for visualization
pub async fn graph_data(State(state): State<AppState>) -> Result<Json<GraphSnapshot>> {
    Ok(Json(state.graph().graph_snapshot().await?))
}
