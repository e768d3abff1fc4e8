//! Pipeline state threaded through the orchestrator
//!
//! The state is an immutable value: each stage receives a reference and
//! returns a [`StageUpdate`] delta, which the orchestrator merges into a new
//! state before the next transition. Fields merge last-writer-wins.

use serde::{Deserialize, Serialize};

use super::document::DocChunk;
use super::filter::FilterSpec;

/// Working state for one pipeline run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QueryState {
    /// The user's question
    pub question: String,
    /// Generated answer; empty until GENERATE runs
    pub generation: String,
    /// Whether supplemental web search is needed
    pub web_search: bool,
    /// Current working document set, in retrieval order
    pub documents: Vec<DocChunk>,
    /// Metadata filters attached to this query
    pub filters: FilterSpec,
}

impl QueryState {
    /// Fresh state at query start
    pub fn new(question: impl Into<String>, filters: FilterSpec) -> Self {
        Self {
            question: question.into(),
            generation: String::new(),
            web_search: false,
            documents: Vec::new(),
            filters,
        }
    }

    /// Merge a stage delta into a new state (last-writer-wins per field)
    pub fn merged(&self, update: StageUpdate) -> Self {
        Self {
            question: self.question.clone(),
            generation: update.generation.unwrap_or_else(|| self.generation.clone()),
            web_search: update.web_search.unwrap_or(self.web_search),
            documents: update.documents.unwrap_or_else(|| self.documents.clone()),
            filters: self.filters.clone(),
        }
    }
}

/// Partial update produced by one stage
#[derive(Debug, Clone, Default)]
pub struct StageUpdate {
    pub documents: Option<Vec<DocChunk>>,
    pub generation: Option<String>,
    pub web_search: Option<bool>,
}

impl StageUpdate {
    /// Update only the document set
    pub fn documents(documents: Vec<DocChunk>) -> Self {
        Self {
            documents: Some(documents),
            ..Default::default()
        }
    }

    /// Update only the generation
    pub fn generation(generation: impl Into<String>) -> Self {
        Self {
            generation: Some(generation.into()),
            ..Default::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_merge_is_last_writer_wins_per_field() {
        let state = QueryState::new("q", FilterSpec::default());

        let with_docs = state.merged(StageUpdate::documents(vec![DocChunk::new("a", "s1")]));
        assert_eq!(with_docs.documents.len(), 1);
        assert_eq!(with_docs.generation, "");

        let graded = with_docs.merged(StageUpdate {
            documents: Some(Vec::new()),
            web_search: Some(true),
            ..Default::default()
        });
        assert!(graded.documents.is_empty());
        assert!(graded.web_search);
        // Untouched fields carry over
        assert_eq!(graded.question, "q");

        let done = graded.merged(StageUpdate::generation("answer"));
        assert_eq!(done.generation, "answer");
        assert!(done.web_search);
    }
}
