//! Query request/response types for the API surface

use serde::{Deserialize, Serialize};

use super::document::DocChunk;
use super::filter::FilterSpec;

/// Maximum excerpt length included with each source
const EXCERPT_CHARS: usize = 500;

/// Incoming query with optional metadata filters
#[derive(Debug, Clone, Deserialize)]
pub struct QueryRequest {
    /// The question to answer
    pub question: String,
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

impl QueryRequest {
    /// Extract the filter spec from the request
    pub fn filters(&self) -> FilterSpec {
        FilterSpec {
            owner: self.owner.clone(),
            company: self.company.clone(),
            category: self.category.clone(),
            year: self.year,
            doc_type: self.doc_type.clone(),
        }
    }
}

/// Result of a completed pipeline run
#[derive(Debug, Clone, Serialize)]
pub struct QueryOutcome {
    /// Generated answer
    pub answer: String,
    /// Final working document set (provenance), in pipeline order
    pub documents: Vec<DocChunk>,
    /// Whether the web-search fallback ran
    pub used_web_search: bool,
}

impl QueryOutcome {
    /// De-duplicated (source, excerpt) pairs in first-seen order
    pub fn sources(&self) -> Vec<SourceDoc> {
        let mut seen = std::collections::HashSet::new();
        let mut sources = Vec::new();
        for doc in &self.documents {
            if seen.insert(doc.source.clone()) {
                sources.push(SourceDoc {
                    source: doc.source.clone(),
                    excerpt: doc.content.chars().take(EXCERPT_CHARS).collect(),
                });
            }
        }
        sources
    }
}

/// A cited source with a short excerpt
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourceDoc {
    pub source: String,
    pub excerpt: String,
}

/// Caller-facing query response
#[derive(Debug, Clone, Serialize)]
pub struct QueryResponse {
    pub answer: String,
    pub sources: Vec<SourceDoc>,
    pub used_web_search: bool,
    pub processing_time_ms: u64,
}

impl QueryResponse {
    /// Build a response from a pipeline outcome
    pub fn from_outcome(outcome: &QueryOutcome, processing_time_ms: u64) -> Self {
        Self {
            answer: outcome.answer.clone(),
            sources: outcome.sources(),
            used_web_search: outcome.used_web_search,
            processing_time_ms,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sources_deduplicate_preserving_first_seen_order() {
        let outcome = QueryOutcome {
            answer: "a".to_string(),
            documents: vec![
                DocChunk::new("first", "b.pdf"),
                DocChunk::new("second", "a.pdf"),
                DocChunk::new("third", "b.pdf"),
            ],
            used_web_search: false,
        };

        let sources = outcome.sources();
        assert_eq!(sources.len(), 2);
        assert_eq!(sources[0].source, "b.pdf");
        assert_eq!(sources[0].excerpt, "first");
        assert_eq!(sources[1].source, "a.pdf");
    }

    #[test]
    fn test_excerpt_is_bounded() {
        let long = "x".repeat(2000);
        let outcome = QueryOutcome {
            answer: String::new(),
            documents: vec![DocChunk::new(long, "big.txt")],
            used_web_search: false,
        };
        assert_eq!(outcome.sources()[0].excerpt.chars().count(), 500);
    }
}
