//! Metadata graph index trait

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::types::FilterSpec;

/// Entity kinds a document can relate to in the graph
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntityKind {
    Owner,
    Company,
    Category,
    Year,
}

/// Node/edge counts per entity kind
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GraphStats {
    pub documents: u64,
    pub owners: u64,
    pub companies: u64,
    pub categories: u64,
    pub years: u64,
}

/// A node in the graph snapshot (for visualization)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GraphNode {
    pub id: String,
    pub label: String,
    #[serde(rename = "type")]
    pub kind: String,
}

/// An edge in the graph snapshot
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GraphEdge {
    pub source: String,
    pub target: String,
    pub relationship: String,
}

/// Full graph snapshot for visualization
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GraphSnapshot {
    pub nodes: Vec<GraphNode>,
    pub edges: Vec<GraphEdge>,
}

/// Read interface over the metadata graph. Implementations must not mutate
/// at query time; all writes happen on the separate ingestion path.
///
/// Implementations:
/// - `Neo4jMetadataIndex`: Neo4j via the HTTP transaction API
#[async_trait]
pub trait MetadataIndex: Send + Sync {
    /// Source identifiers of documents satisfying the conjunction of all
    /// present filter fields. An unconstrained spec returns all documents.
    async fn query(&self, filters: &FilterSpec) -> Result<Vec<String>>;

    /// All known values for one entity kind
    async fn list_values(&self, kind: EntityKind) -> Result<Vec<String>>;

    /// Node counts per entity kind
    async fn stats(&self) -> Result<GraphStats>;

    /// Nodes and edges for visualization
    async fn graph_snapshot(&self) -> Result<GraphSnapshot>;

    /// Provider name for logging
    fn name(&self) -> &str;
}
