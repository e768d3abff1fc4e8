//! Provider abstractions for the external collaborators the pipeline calls
//!
//! Trait seams keep the core logic independent of which graph store, vector
//! index, LLM, or search service backs it. Concrete implementations live
//! alongside: Neo4j (metadata graph), Ollama (embeddings, grading,
//! generation), Tavily (web search), and an in-memory vector index.

pub mod embedding;
pub mod generator;
pub mod grader;
pub mod memory;
pub mod metadata_index;
pub mod neo4j;
pub mod ollama;
pub mod tavily;
pub mod vector_index;
pub mod web_search;

pub use embedding::EmbeddingProvider;
pub use generator::AnswerGenerator;
pub use grader::{RelevanceGrader, Verdict};
pub use memory::InMemoryVectorIndex;
pub use metadata_index::{EntityKind, GraphEdge, GraphNode, GraphSnapshot, GraphStats, MetadataIndex};
pub use neo4j::Neo4jMetadataIndex;
pub use ollama::{OllamaClient, OllamaEmbedder, OllamaGenerator, OllamaGrader};
pub use tavily::TavilySearch;
pub use vector_index::{ScoredChunk, VectorIndex};
pub use web_search::{SearchSnippet, WebSearchProvider};
