//! Diversity-aware semantic retriever
//!
//! Oversamples `fetch_k` nearest neighbors from the vector index, then
//! re-ranks down to `top_k` with MMR. A separate precision mode skips MMR
//! and applies a hard similarity threshold instead.

use std::sync::Arc;

use crate::config::RetrievalConfig;
use crate::error::Result;
use crate::providers::vector_index::{ScoredChunk, VectorIndex};
use crate::types::DocChunk;

use super::mmr::mmr_select;

/// Retriever composing the vector index with MMR re-ranking
pub struct SemanticRetriever {
    index: Arc<dyn VectorIndex>,
    config: RetrievalConfig,
}

impl SemanticRetriever {
    pub fn new(index: Arc<dyn VectorIndex>, config: RetrievalConfig) -> Self {
        Self { index, config }
    }

    /// Retrieve up to `top_k` diverse chunks for the question, optionally
    /// restricted to an allow-list of source identifiers. The allow-list is
    /// passed through to the index so the restriction happens server-side.
    pub async fn retrieve(
        &self,
        question: &str,
        allowed_sources: Option<&[String]>,
    ) -> Result<Vec<DocChunk>> {
        let candidates = self
            .index
            .search(question, self.config.fetch_k, allowed_sources)
            .await?;

        tracing::debug!(
            candidates = candidates.len(),
            fetch_k = self.config.fetch_k,
            "vector search complete"
        );

        let selected = mmr_select(candidates, self.config.top_k, self.config.mmr_lambda);
        Ok(selected.into_iter().map(|s| s.chunk).collect())
    }

    /// Precision search: top `k` neighbors at or above the similarity
    /// threshold, no MMR. Used by the direct search endpoint where recall
    /// matters less than not returning marginal hits.
    pub async fn search_with_threshold(
        &self,
        question: &str,
        k: usize,
        allowed_sources: Option<&[String]>,
    ) -> Result<Vec<ScoredChunk>> {
        let mut results = self.index.search(question, k, allowed_sources).await?;
        results.retain(|c| c.similarity >= self.config.score_threshold);
        Ok(results)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use parking_lot::Mutex;

    /// Vector index mock recording the arguments of the last search call
    struct StubIndex {
        results: Vec<ScoredChunk>,
        last_call: Mutex<Option<(String, usize, Option<Vec<String>>)>>,
    }

    impl StubIndex {
        fn returning(results: Vec<ScoredChunk>) -> Self {
            Self {
                results,
                last_call: Mutex::new(None),
            }
        }
    }

    #[async_trait]
    impl VectorIndex for StubIndex {
        async fn search(
            &self,
            query: &str,
            k: usize,
            allowed_sources: Option<&[String]>,
        ) -> Result<Vec<ScoredChunk>> {
            *self.last_call.lock() = Some((
                query.to_string(),
                k,
                allowed_sources.map(|s| s.to_vec()),
            ));
            Ok(self.results.clone())
        }

        fn name(&self) -> &str {
            "stub"
        }
    }

    fn scored(source: &str, similarity: f32, embedding: Vec<f32>) -> ScoredChunk {
        ScoredChunk {
            chunk: DocChunk::new(format!("content of {}", source), source),
            similarity,
            embedding,
        }
    }

    fn config(top_k: usize, fetch_k: usize) -> RetrievalConfig {
        RetrievalConfig {
            top_k,
            fetch_k,
            mmr_lambda: 0.5,
            score_threshold: 0.75,
        }
    }

    #[tokio::test]
    async fn test_retrieve_oversamples_then_reduces_to_top_k() {
        let index = Arc::new(StubIndex::returning(vec![
            scored("a", 0.9, vec![1.0, 0.0]),
            scored("b", 0.8, vec![0.0, 1.0]),
            scored("c", 0.7, vec![0.5, 0.5]),
        ]));
        let retriever = SemanticRetriever::new(index.clone(), config(2, 100));

        let chunks = retriever.retrieve("question", None).await.unwrap();
        assert_eq!(chunks.len(), 2);

        let (query, k, allowed) = index.last_call.lock().take().unwrap();
        assert_eq!(query, "question");
        assert_eq!(k, 100); // fetch_k, not top_k
        assert!(allowed.is_none());
    }

    #[tokio::test]
    async fn test_retrieve_forwards_allow_list_to_index() {
        let index = Arc::new(StubIndex::returning(vec![scored(
            "a.pdf",
            0.9,
            vec![1.0, 0.0],
        )]));
        let retriever = SemanticRetriever::new(index.clone(), config(5, 50));

        let allowed = vec!["a.pdf".to_string(), "b.pdf".to_string()];
        retriever.retrieve("question", Some(&allowed)).await.unwrap();

        let (_, _, forwarded) = index.last_call.lock().take().unwrap();
        assert_eq!(forwarded, Some(allowed));
    }

    #[tokio::test]
    async fn test_threshold_search_discards_marginal_hits() {
        let index = Arc::new(StubIndex::returning(vec![
            scored("strong", 0.9, vec![1.0, 0.0]),
            scored("exact", 0.75, vec![0.0, 1.0]),
            scored("weak", 0.74, vec![0.5, 0.5]),
        ]));
        let retriever = SemanticRetriever::new(index, config(5, 50));

        let results = retriever
            .search_with_threshold("question", 5, None)
            .await
            .unwrap();
        let sources: Vec<&str> = results.iter().map(|r| r.chunk.source.as_str()).collect();
        assert_eq!(sources, vec!["strong", "exact"]);
    }

    #[tokio::test]
    async fn test_empty_index_yields_no_chunks() {
        let index = Arc::new(StubIndex::returning(Vec::new()));
        let retriever = SemanticRetriever::new(index, config(5, 50));

        assert!(retriever.retrieve("question", None).await.unwrap().is_empty());
    }
}
