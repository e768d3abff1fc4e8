//! graph-rag: metadata-filtered retrieval with graded context and a web
//! search fallback.
//!
//! Documents are annotated in a Neo4j metadata graph (owner, company,
//! category, year). A query first resolves its filters against the graph
//! into an allow-list, retrieves diverse chunks with MMR, grades each chunk
//! for relevance, falls back to web search when the graded context is too
//! thin, and generates a source-grounded answer.

pub mod config;
pub mod error;
pub mod pipeline;
pub mod providers;
pub mod retrieval;
pub mod retry;
pub mod server;
pub mod types;

pub use config::RagConfig;
pub use error::{Error, Result};
pub use pipeline::Pipeline;
pub use types::{DocChunk, FilterSpec, QueryOutcome, QueryRequest, QueryResponse};
