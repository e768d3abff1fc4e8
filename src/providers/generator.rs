//! Answer generation trait

use async_trait::async_trait;

use crate::error::Result;
use crate::types::DocChunk;

/// Generates the final answer from the question and the working document set.
///
/// Implementations:
/// - `OllamaGenerator`: local Ollama server
#[async_trait]
pub trait AnswerGenerator: Send + Sync {
    /// Generate an answer grounded in the given context chunks
    async fn generate(&self, question: &str, context: &[DocChunk]) -> Result<String>;

    /// Provider name for logging
    fn name(&self) -> &str;

    /// Model used for generation
    fn model(&self) -> &str;
}
