//! Web search trait for the supplemental fallback

use async_trait::async_trait;
use serde::Deserialize;

use crate::error::Result;

/// One external search result snippet
#[derive(Debug, Clone, Deserialize)]
pub struct SearchSnippet {
    /// Snippet text content
    pub content: String,
}

/// External web search, invoked only when grading flags insufficient
/// relevant context.
///
/// Implementations:
/// - `TavilySearch`: Tavily search API
#[async_trait]
pub trait WebSearchProvider: Send + Sync {
    /// Search for the query, returning at most `max_results` snippets
    async fn search(&self, query: &str, max_results: usize) -> Result<Vec<SearchSnippet>>;

    /// Provider name for logging
    fn name(&self) -> &str;
}
