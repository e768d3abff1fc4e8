//! Query pipeline orchestrator
//!
//! Runs a fixed state machine over an immutable [`QueryState`]:
//!
//! ```text
//! RETRIEVE -> GRADE_DOCUMENTS -> { WEB_SEARCH -> GENERATE | GENERATE }
//! ```
//!
//! Each stage produces a [`StageUpdate`] delta that is merged into a new
//! state before the next transition. Failures are attributed to the stage
//! they occurred in and abort the run.

pub mod grade;

use std::fmt;
use std::sync::Arc;

use crate::config::{GradingConfig, WebSearchConfig};
use crate::error::Result;
use crate::providers::generator::AnswerGenerator;
use crate::providers::grader::RelevanceGrader;
use crate::providers::web_search::WebSearchProvider;
use crate::retrieval::{FilterResolver, Resolution, SemanticRetriever};
use crate::types::{DocChunk, FilterSpec, QueryOutcome, QueryState, StageUpdate};

/// Fixed answer returned when metadata filters match no documents. The
/// retriever is never consulted in that case.
pub const NO_FILTER_MATCH_ANSWER: &str =
    "No documents match the requested filters. Adjust or remove the filters and try again.";

/// Pipeline stages, used for failure attribution and logging
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Retrieve,
    GradeDocuments,
    WebSearch,
    Generate,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Stage::Retrieve => "retrieve",
            Stage::GradeDocuments => "grade_documents",
            Stage::WebSearch => "web_search",
            Stage::Generate => "generate",
        };
        f.write_str(name)
    }
}

/// The query pipeline. All providers are injected behind trait objects so
/// the orchestration logic is testable without live services.
pub struct Pipeline {
    resolver: FilterResolver,
    retriever: Arc<SemanticRetriever>,
    grader: Arc<dyn RelevanceGrader>,
    web: Arc<dyn WebSearchProvider>,
    generator: Arc<dyn AnswerGenerator>,
    grading: GradingConfig,
    web_max_results: usize,
}

impl Pipeline {
    pub fn new(
        resolver: FilterResolver,
        retriever: Arc<SemanticRetriever>,
        grader: Arc<dyn RelevanceGrader>,
        web: Arc<dyn WebSearchProvider>,
        generator: Arc<dyn AnswerGenerator>,
        grading: GradingConfig,
        web_search: &WebSearchConfig,
    ) -> Self {
        Self {
            resolver,
            retriever,
            grader,
            web,
            generator,
            grading,
            web_max_results: web_search.max_results,
        }
    }

    /// Run the full pipeline for one question
    pub async fn run(&self, question: &str, filters: FilterSpec) -> Result<QueryOutcome> {
        let state = QueryState::new(question, filters);

        let state = match self.retrieve(&state).await? {
            Some(update) => state.merged(update),
            // Filters matched nothing; answer without touching the index
            None => {
                return Ok(QueryOutcome {
                    answer: NO_FILTER_MATCH_ANSWER.to_string(),
                    documents: Vec::new(),
                    used_web_search: false,
                });
            }
        };

        let state = state.merged(self.grade(&state).await?);

        let state = if state.web_search {
            let state = state.merged(self.supplement(&state).await?);
            state.merged(self.generate(&state).await?)
        } else {
            state.merged(self.generate(&state).await?)
        };

        Ok(QueryOutcome {
            answer: state.generation,
            documents: state.documents,
            used_web_search: state.web_search,
        })
    }

    /// RETRIEVE: resolve filters to an allow-list, then fetch diverse chunks.
    /// Returns `None` when the filters exclude every document.
    async fn retrieve(&self, state: &QueryState) -> Result<Option<StageUpdate>> {
        tracing::info!(stage = %Stage::Retrieve, question = %state.question, "stage start");

        let resolution = self
            .resolver
            .resolve(&state.filters)
            .await
            .map_err(|e| e.at_stage(Stage::Retrieve))?;

        let allowed = match resolution {
            Resolution::Unconstrained => None,
            Resolution::Allowed(sources) => Some(sources),
            Resolution::Empty => return Ok(None),
        };

        let documents = self
            .retriever
            .retrieve(&state.question, allowed.as_deref())
            .await
            .map_err(|e| e.at_stage(Stage::Retrieve))?;

        tracing::info!(retrieved = documents.len(), "retrieval complete");
        Ok(Some(StageUpdate::documents(documents)))
    }

    /// GRADE_DOCUMENTS: drop irrelevant chunks and decide on the fallback
    async fn grade(&self, state: &QueryState) -> Result<StageUpdate> {
        tracing::info!(stage = %Stage::GradeDocuments, "stage start");

        let outcome = grade::grade_documents(
            &self.grader,
            &state.question,
            &state.documents,
            &self.grading,
        )
        .await
        .map_err(|e| e.at_stage(Stage::GradeDocuments))?;

        Ok(StageUpdate {
            documents: Some(outcome.kept),
            web_search: Some(outcome.needs_web_search),
            ..Default::default()
        })
    }

    /// WEB_SEARCH: append one synthetic chunk built from external snippets
    async fn supplement(&self, state: &QueryState) -> Result<StageUpdate> {
        tracing::info!(stage = %Stage::WebSearch, "stage start");

        let snippets = self
            .web
            .search(&state.question, self.web_max_results)
            .await
            .map_err(|e| e.at_stage(Stage::WebSearch))?;

        if snippets.is_empty() {
            tracing::warn!("web search returned no snippets");
            return Ok(StageUpdate::default());
        }

        let joined = snippets
            .iter()
            .map(|s| s.content.as_str())
            .collect::<Vec<_>>()
            .join("\n");

        let mut documents = state.documents.clone();
        documents.push(DocChunk::from_web_search(joined));
        Ok(StageUpdate::documents(documents))
    }

    /// GENERATE: produce the final answer from the working document set
    async fn generate(&self, state: &QueryState) -> Result<StageUpdate> {
        tracing::info!(
            stage = %Stage::Generate,
            context_docs = state.documents.len(),
            "stage start"
        );

        let answer = self
            .generator
            .generate(&state.question, &state.documents)
            .await
            .map_err(|e| e.at_stage(Stage::Generate))?;

        Ok(StageUpdate::generation(answer))
    }
}
