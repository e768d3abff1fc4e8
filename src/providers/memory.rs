//! In-memory vector index backed by an embedding provider
//!
//! Brute-force cosine search over stored chunk embeddings. The allow-list
//! restriction is applied inside the scan, before ranking, so the oversample
//! budget is never spent on excluded documents. Inserts happen on the
//! ingestion path; queries are read-only.

use async_trait::async_trait;
use parking_lot::RwLock;
use std::sync::Arc;

use crate::error::{Error, Result};
use crate::retrieval::mmr::cosine_similarity;
use crate::types::DocChunk;

use super::embedding::EmbeddingProvider;
use super::vector_index::{ScoredChunk, VectorIndex};

struct Entry {
    chunk: DocChunk,
    embedding: Vec<f32>,
}

/// Embedding-backed in-memory vector index
pub struct InMemoryVectorIndex {
    embedder: Arc<dyn EmbeddingProvider>,
    entries: RwLock<Vec<Entry>>,
}

impl InMemoryVectorIndex {
    /// Create an empty index
    pub fn new(embedder: Arc<dyn EmbeddingProvider>) -> Self {
        Self {
            embedder,
            entries: RwLock::new(Vec::new()),
        }
    }

    /// Embed and insert a chunk (ingestion path)
    pub async fn insert(&self, chunk: DocChunk) -> Result<()> {
        let embedding = self.embedder.embed(&chunk.content).await?;
        if embedding.len() != self.embedder.dimensions() {
            return Err(Error::vector_index(format!(
                "embedding dimension mismatch: got {}, expected {}",
                embedding.len(),
                self.embedder.dimensions()
            )));
        }
        self.entries.write().push(Entry { chunk, embedding });
        Ok(())
    }

    /// Insert a chunk with a precomputed embedding (ingestion path)
    pub fn insert_embedded(&self, chunk: DocChunk, embedding: Vec<f32>) {
        self.entries.write().push(Entry { chunk, embedding });
    }

    /// Number of stored chunks
    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    /// Whether the index is empty
    pub fn is_empty(&self) -> bool {
        self.entries.read().is_empty()
    }
}

#[async_trait]
impl VectorIndex for InMemoryVectorIndex {
    async fn search(
        &self,
        query: &str,
        k: usize,
        allowed_sources: Option<&[String]>,
    ) -> Result<Vec<ScoredChunk>> {
        let query_embedding = self.embedder.embed(query).await?;

        let mut scored: Vec<ScoredChunk> = {
            let entries = self.entries.read();
            entries
                .iter()
                .filter(|entry| match allowed_sources {
                    Some(allowed) => allowed.iter().any(|s| s == &entry.chunk.source),
                    None => true,
                })
                .map(|entry| ScoredChunk {
                    chunk: entry.chunk.clone(),
                    similarity: cosine_similarity(&query_embedding, &entry.embedding),
                    embedding: entry.embedding.clone(),
                })
                .collect()
        };

        scored.sort_by(|a, b| {
            b.similarity
                .partial_cmp(&a.similarity)
                .unwrap_or(std::cmp::Ordering::Equal)
        });
        scored.truncate(k);
        Ok(scored)
    }

    fn name(&self) -> &str {
        "memory"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Embedder that maps known words to fixed unit vectors
    struct StubEmbedder;

    #[async_trait]
    impl EmbeddingProvider for StubEmbedder {
        async fn embed(&self, text: &str) -> Result<Vec<f32>> {
            Ok(match text {
                t if t.contains("alpha") => vec![1.0, 0.0, 0.0],
                t if t.contains("beta") => vec![0.0, 1.0, 0.0],
                _ => vec![0.0, 0.0, 1.0],
            })
        }

        fn dimensions(&self) -> usize {
            3
        }

        fn name(&self) -> &str {
            "stub"
        }
    }

    #[test]
    fn test_cosine_similarity_bounds() {
        let a = vec![1.0, 0.0];
        let b = vec![1.0, 0.0];
        let c = vec![-1.0, 0.0];
        assert!((cosine_similarity(&a, &b) - 1.0).abs() < 1e-6);
        assert!(cosine_similarity(&a, &c).abs() < 1e-6);
        assert_eq!(cosine_similarity(&a, &[]), 0.0);
    }

    #[tokio::test]
    async fn test_search_ranks_by_similarity() {
        let index = InMemoryVectorIndex::new(Arc::new(StubEmbedder));
        index.insert(DocChunk::new("about beta", "b.txt")).await.unwrap();
        index.insert(DocChunk::new("about alpha", "a.txt")).await.unwrap();

        let results = index.search("alpha question", 2, None).await.unwrap();
        assert_eq!(results.len(), 2);
        assert_eq!(results[0].chunk.source, "a.txt");
        assert!(results[0].similarity > results[1].similarity);
    }

    #[tokio::test]
    async fn test_allow_list_is_applied_before_ranking() {
        let index = InMemoryVectorIndex::new(Arc::new(StubEmbedder));
        index.insert(DocChunk::new("about alpha", "a.txt")).await.unwrap();
        index.insert(DocChunk::new("more alpha", "b.txt")).await.unwrap();

        let allowed = vec!["b.txt".to_string()];
        let results = index.search("alpha", 10, Some(&allowed)).await.unwrap();
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].chunk.source, "b.txt");
    }
}
