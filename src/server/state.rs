//! Application state for the query server

use parking_lot::RwLock;
use std::sync::Arc;

use crate::config::RagConfig;
use crate::error::Result;
use crate::pipeline::Pipeline;
use crate::providers::{
    generator::AnswerGenerator,
    grader::RelevanceGrader,
    memory::InMemoryVectorIndex,
    metadata_index::MetadataIndex,
    neo4j::Neo4jMetadataIndex,
    ollama::{OllamaClient, OllamaEmbedder, OllamaGenerator, OllamaGrader},
    tavily::TavilySearch,
    web_search::WebSearchProvider,
};
use crate::retrieval::{FilterResolver, SemanticRetriever};

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    /// Configuration
    config: RagConfig,
    /// Metadata graph index
    graph: Arc<dyn MetadataIndex>,
    /// Diversity-aware retriever (shared with the pipeline)
    retriever: Arc<SemanticRetriever>,
    /// The query pipeline
    pipeline: Pipeline,
    /// Ollama client for health checks
    ollama: Arc<OllamaClient>,
    /// Ready state
    ready: RwLock<bool>,
}

impl AppState {
    /// Wire up the default provider stack: Neo4j for metadata, Ollama for
    /// embeddings/grading/generation, Tavily for the web fallback.
    pub fn new(config: RagConfig) -> Result<Self> {
        tracing::info!("Initializing application state...");

        let graph: Arc<dyn MetadataIndex> = Arc::new(Neo4jMetadataIndex::new(&config.graph)?);
        tracing::info!("Graph index initialized ({})", config.graph.uri);

        let ollama = Arc::new(OllamaClient::new(&config.llm)?);
        let embedder = Arc::new(OllamaEmbedder::new(
            ollama.clone(),
            config.llm.embed_model.clone(),
            config.llm.embed_dimensions,
        ));
        tracing::info!(
            "Ollama client initialized (embeddings: {}, generation: {})",
            config.llm.embed_model,
            config.llm.generate_model
        );

        let vector_index = Arc::new(InMemoryVectorIndex::new(embedder));
        let retriever = Arc::new(SemanticRetriever::new(
            vector_index,
            config.retrieval.clone(),
        ));

        let grader: Arc<dyn RelevanceGrader> = Arc::new(OllamaGrader::new(
            ollama.clone(),
            config.llm.grade_model.clone(),
        ));
        let generator: Arc<dyn AnswerGenerator> = Arc::new(OllamaGenerator::new(
            ollama.clone(),
            config.llm.generate_model.clone(),
        ));
        let web: Arc<dyn WebSearchProvider> = Arc::new(TavilySearch::new(&config.web_search)?);

        let pipeline = Pipeline::new(
            FilterResolver::new(graph.clone()),
            retriever.clone(),
            grader,
            web,
            generator,
            config.grading.clone(),
            &config.web_search,
        );

        Ok(Self {
            inner: Arc::new(AppStateInner {
                config,
                graph,
                retriever,
                pipeline,
                ollama,
                ready: RwLock::new(true),
            }),
        })
    }

    /// Get configuration
    pub fn config(&self) -> &RagConfig {
        &self.inner.config
    }

    /// Get the metadata graph index
    pub fn graph(&self) -> &Arc<dyn MetadataIndex> {
        &self.inner.graph
    }

    /// Get the retriever (for direct search, bypassing grading)
    pub fn retriever(&self) -> &Arc<SemanticRetriever> {
        &self.inner.retriever
    }

    /// Get the query pipeline
    pub fn pipeline(&self) -> &Pipeline {
        &self.inner.pipeline
    }

    /// Get the Ollama client
    pub fn ollama(&self) -> &Arc<OllamaClient> {
        &self.inner.ollama
    }

    /// Check if the server is ready
    pub fn is_ready(&self) -> bool {
        *self.inner.ready.read()
    }

    /// Set ready state
    pub fn set_ready(&self, ready: bool) {
        *self.inner.ready.write() = ready;
    }
}
