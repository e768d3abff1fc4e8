//! Embedding provider trait

use async_trait::async_trait;

use crate::error::Result;

/// Trait for text embedding generation
///
/// Implementations:
/// - `OllamaEmbedder`: local Ollama server (nomic-embed-text or similar)
#[async_trait]
pub trait EmbeddingProvider: Send + Sync {
    /// Generate an embedding for a single text
    async fn embed(&self, text: &str) -> Result<Vec<f32>>;

    /// Embedding dimensionality
    fn dimensions(&self) -> usize;

    /// Provider name for logging
    fn name(&self) -> &str;
}
