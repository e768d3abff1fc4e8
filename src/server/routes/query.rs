//! Query and direct-search endpoints

use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};
use std::time::Instant;

use crate::error::Result;
use crate::retrieval::{FilterResolver, Resolution};
use crate::server::state::AppState;
use crate::types::{FilterSpec, QueryRequest, QueryResponse};

/// POST /api/query - Run the full pipeline for a question
pub async fn run_query(
    State(state): State<AppState>,
    Json(request): Json<QueryRequest>,
) -> Result<Json<QueryResponse>> {
    let start = Instant::now();

    tracing::info!("Query: \"{}\"", request.question);

    let outcome = state
        .pipeline()
        .run(&request.question, request.filters())
        .await?;

    let processing_time_ms = start.elapsed().as_millis() as u64;
    tracing::info!(
        "Query completed in {}ms, {} sources, web_search={}",
        processing_time_ms,
        outcome.sources().len(),
        outcome.used_web_search
    );

    Ok(Json(QueryResponse::from_outcome(&outcome, processing_time_ms)))
}

/// Request for the direct search endpoint
#[derive(Debug, Deserialize)]
pub struct SearchRequest {
    pub query: String,
    #[serde(default = "default_top_k")]
    pub top_k: usize,
    #[serde(default)]
    pub owner: Option<String>,
    #[serde(default)]
    pub company: Option<String>,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub year: Option<i64>,
    #[serde(default)]
    pub doc_type: Option<String>,
}

fn default_top_k() -> usize {
    5
}

impl SearchRequest {
    fn filters(&self) -> FilterSpec {
        FilterSpec {
            owner: self.owner.clone(),
            company: self.company.clone(),
            category: self.category.clone(),
            year: self.year,
            doc_type: self.doc_type.clone(),
        }
    }
}

/// One direct search hit
#[derive(Debug, Serialize)]
pub struct SearchHit {
    pub source: String,
    pub content: String,
    pub similarity: f32,
}

/// Direct search response
#[derive(Debug, Serialize)]
pub struct SearchResponse {
    pub results: Vec<SearchHit>,
    pub count: usize,
    pub processing_time_ms: u64,
}

/// POST /api/search - Threshold similarity search, no grading or generation
pub async fn search(
    State(state): State<AppState>,
    Json(request): Json<SearchRequest>,
) -> Result<Json<SearchResponse>> {
    let start = Instant::now();

    let resolver = FilterResolver::new(state.graph().clone());
    let allowed = match resolver.resolve(&request.filters()).await? {
        Resolution::Unconstrained => None,
        Resolution::Allowed(sources) => Some(sources),
        Resolution::Empty => {
            return Ok(Json(SearchResponse {
                results: Vec::new(),
                count: 0,
                processing_time_ms: start.elapsed().as_millis() as u64,
            }));
        }
    };

    let hits = state
        .retriever()
        .search_with_threshold(&request.query, request.top_k, allowed.as_deref())
        .await?;

    let results: Vec<SearchHit> = hits
        .into_iter()
        .map(|h| SearchHit {
            source: h.chunk.source,
            content: h.chunk.content,
            similarity: h.similarity,
        })
        .collect();

    let count = results.len();
    Ok(Json(SearchResponse {
        results,
        count,
        processing_time_ms: start.elapsed().as_millis() as u64,
    }))
}
