//! Vector index trait

use async_trait::async_trait;

use crate::error::Result;
use crate::types::DocChunk;

/// A nearest-neighbor candidate with its query similarity and embedding.
/// The embedding is carried so the retriever can compute pairwise
/// similarities during MMR re-ranking.
#[derive(Debug, Clone)]
pub struct ScoredChunk {
    /// The candidate chunk
    pub chunk: DocChunk,
    /// Cosine similarity to the query, on [0, 1] (higher is more similar)
    pub similarity: f32,
    /// The candidate's embedding vector
    pub embedding: Vec<f32>,
}

/// Nearest-neighbor search over embedded chunks.
///
/// When `allowed_sources` is supplied the restriction is applied inside the
/// search (server-side), not as a post-filter: the oversample budget must not
/// be spent on excluded documents.
#[async_trait]
pub trait VectorIndex: Send + Sync {
    /// Top `k` neighbors for the query, optionally restricted to an
    /// allow-list of source identifiers, ordered by descending similarity.
    ///
    /// Infrastructure failures must surface as errors; an empty result means
    /// zero matches, never "index unavailable".
    async fn search(
        &self,
        query: &str,
        k: usize,
        allowed_sources: Option<&[String]>,
    ) -> Result<Vec<ScoredChunk>>;

    /// Provider name for logging
    fn name(&self) -> &str;
}
