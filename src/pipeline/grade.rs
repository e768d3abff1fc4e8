//! Concurrent relevance grading
//!
//! Each retrieved chunk is graded independently against the question. The
//! fan-out is bounded by the configured concurrency and preserves retrieval
//! order; a grading failure on any chunk fails the whole stage rather than
//! guessing a verdict.

use futures::{stream, StreamExt, TryStreamExt};
use std::sync::Arc;

use crate::config::GradingConfig;
use crate::error::Result;
use crate::providers::grader::{RelevanceGrader, Verdict};
use crate::types::DocChunk;

/// Result of grading the working document set
#[derive(Debug)]
pub struct GradeOutcome {
    /// Relevant chunks, in their original retrieval order
    pub kept: Vec<DocChunk>,
    /// Number of chunks graded irrelevant
    pub irrelevant: usize,
    /// Whether enough chunks were irrelevant to trigger the web fallback
    pub needs_web_search: bool,
}

/// Grade every document against the question and drop the irrelevant ones.
pub async fn grade_documents(
    grader: &Arc<dyn RelevanceGrader>,
    question: &str,
    documents: &[DocChunk],
    config: &GradingConfig,
) -> Result<GradeOutcome> {
    let concurrency = config.concurrency.max(1);

    // Futures are created eagerly (they run nothing until polled) so the
    // stream holds no borrowing closure; `buffered` still bounds the fan-out.
    let futures: Vec<_> = documents
        .iter()
        .map(|doc| grader.grade(question, &doc.content))
        .collect();
    let verdicts: Vec<Verdict> = stream::iter(futures)
        .buffered(concurrency)
        .try_collect()
        .await?;

    let irrelevant = verdicts.iter().filter(|v| !v.is_relevant()).count();
    let kept: Vec<DocChunk> = documents
        .iter()
        .zip(&verdicts)
        .filter(|(_, verdict)| verdict.is_relevant())
        .map(|(doc, _)| doc.clone())
        .collect();

    let needs_web_search = irrelevant >= config.fallback_after_irrelevant;

    tracing::info!(
        graded = documents.len(),
        kept = kept.len(),
        irrelevant,
        needs_web_search,
        "grading complete"
    );

    Ok(GradeOutcome {
        kept,
        irrelevant,
        needs_web_search,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use async_trait::async_trait;

    /// Grader driven by the document text itself
    struct TextDrivenGrader;

    #[async_trait]
    impl RelevanceGrader for TextDrivenGrader {
        async fn grade(&self, _question: &str, document_text: &str) -> Result<Verdict> {
            if document_text.contains("fail") {
                return Err(Error::grading("model unavailable"));
            }
            if document_text.contains("off-topic") {
                Ok(Verdict::Irrelevant)
            } else {
                Ok(Verdict::Relevant)
            }
        }

        fn name(&self) -> &str {
            "text-driven"
        }
    }

    fn docs(texts: &[&str]) -> Vec<DocChunk> {
        texts
            .iter()
            .enumerate()
            .map(|(i, t)| DocChunk::new(*t, format!("doc-{}.pdf", i)))
            .collect()
    }

    #[tokio::test]
    async fn test_kept_documents_preserve_retrieval_order() {
        let grader: Arc<dyn RelevanceGrader> = Arc::new(TextDrivenGrader);
        let documents = docs(&["alpha", "off-topic", "beta", "gamma"]);

        let outcome = grade_documents(&grader, "q", &documents, &GradingConfig::default())
            .await
            .unwrap();

        let contents: Vec<&str> = outcome.kept.iter().map(|d| d.content.as_str()).collect();
        assert_eq!(contents, vec!["alpha", "beta", "gamma"]);
        assert_eq!(outcome.irrelevant, 1);
    }

    #[tokio::test]
    async fn test_single_irrelevant_triggers_fallback_by_default() {
        let grader: Arc<dyn RelevanceGrader> = Arc::new(TextDrivenGrader);
        let documents = docs(&["alpha", "off-topic"]);

        let outcome = grade_documents(&grader, "q", &documents, &GradingConfig::default())
            .await
            .unwrap();
        assert!(outcome.needs_web_search);
    }

    #[tokio::test]
    async fn test_raised_threshold_tolerates_some_irrelevance() {
        let grader: Arc<dyn RelevanceGrader> = Arc::new(TextDrivenGrader);
        let documents = docs(&["alpha", "off-topic", "beta"]);
        let config = GradingConfig {
            fallback_after_irrelevant: 2,
            ..Default::default()
        };

        let outcome = grade_documents(&grader, "q", &documents, &config)
            .await
            .unwrap();
        assert!(!outcome.needs_web_search);
        assert_eq!(outcome.kept.len(), 2);
    }

    #[tokio::test]
    async fn test_all_relevant_skips_fallback() {
        let grader: Arc<dyn RelevanceGrader> = Arc::new(TextDrivenGrader);
        let documents = docs(&["alpha", "beta"]);

        let outcome = grade_documents(&grader, "q", &documents, &GradingConfig::default())
            .await
            .unwrap();
        assert!(!outcome.needs_web_search);
        assert_eq!(outcome.irrelevant, 0);
    }

    #[tokio::test]
    async fn test_grading_failure_fails_the_stage() {
        let grader: Arc<dyn RelevanceGrader> = Arc::new(TextDrivenGrader);
        let documents = docs(&["alpha", "fail", "beta"]);

        let err = grade_documents(&grader, "q", &documents, &GradingConfig::default())
            .await
            .unwrap_err();
        assert!(matches!(err, Error::Grading(_)));
    }

    #[tokio::test]
    async fn test_empty_document_set_grades_cleanly() {
        let grader: Arc<dyn RelevanceGrader> = Arc::new(TextDrivenGrader);

        let outcome = grade_documents(&grader, "q", &[], &GradingConfig::default())
            .await
            .unwrap();
        assert!(outcome.kept.is_empty());
        assert!(!outcome.needs_web_search);
    }
}
