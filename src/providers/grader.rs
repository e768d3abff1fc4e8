//! Relevance grading trait

use async_trait::async_trait;

use crate::error::Result;

/// Binary relevance verdict for one document against one question
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    Relevant,
    Irrelevant,
}

impl Verdict {
    pub fn is_relevant(self) -> bool {
        matches!(self, Self::Relevant)
    }
}

/// Binary relevance classification of a retrieved chunk against a query.
///
/// A response that is neither a yes nor a no verdict must surface as
/// `Error::MalformedVerdict`; silently coercing an ungraded document to
/// either side breaks the citation contract.
#[async_trait]
pub trait RelevanceGrader: Send + Sync {
    /// Grade one document's relevance to the question
    async fn grade(&self, question: &str, document_text: &str) -> Result<Verdict>;

    /// Provider name for logging
    fn name(&self) -> &str;
}
