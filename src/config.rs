//! Configuration for the retrieval pipeline

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;

use crate::error::{Error, Result};

/// Main pipeline configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RagConfig {
    /// Server configuration
    #[serde(default)]
    pub server: ServerConfig,
    /// Neo4j metadata graph configuration
    #[serde(default)]
    pub graph: GraphConfig,
    /// Retrieval configuration (MMR and threshold search)
    #[serde(default)]
    pub retrieval: RetrievalConfig,
    /// Relevance grading configuration
    #[serde(default)]
    pub grading: GradingConfig,
    /// Web search fallback configuration
    #[serde(default)]
    pub web_search: WebSearchConfig,
    /// Ollama/LLM configuration
    #[serde(default)]
    pub llm: LlmConfig,
}

impl RagConfig {
    /// Load configuration from a TOML file, falling back to defaults for
    /// missing sections. Secrets are then overridden from the environment.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let content = std::fs::read_to_string(path.as_ref())?;
        let mut config: RagConfig = toml::from_str(&content)
            .map_err(|e| Error::Config(format!("Invalid config file: {}", e)))?;
        config.apply_env_overrides();
        Ok(config)
    }

    /// Default configuration with environment overrides applied
    pub fn from_env() -> Self {
        let mut config = Self::default();
        config.apply_env_overrides();
        config
    }

    /// Pull credentials from the environment. Env vars win over the file so
    /// secrets never have to live in checked-in config.
    fn apply_env_overrides(&mut self) {
        if let Ok(uri) = std::env::var("NEO4J_URI") {
            self.graph.uri = uri;
        }
        if let Ok(user) = std::env::var("NEO4J_USER") {
            self.graph.user = user;
        }
        if let Ok(password) = std::env::var("NEO4J_PASSWORD") {
            self.graph.password = password;
        }
        if let Ok(key) = std::env::var("TAVILY_API_KEY") {
            self.web_search.api_key = Some(key);
        }
        if let Ok(url) = std::env::var("OLLAMA_BASE_URL") {
            self.llm.base_url = url;
        }
    }
}

/// Server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Host address
    pub host: String,
    /// Port number
    pub port: u16,
    /// Enable CORS
    pub enable_cors: bool,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8080,
            enable_cors: true,
        }
    }
}

/// Neo4j metadata graph configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GraphConfig {
    /// Neo4j HTTP endpoint (transaction API)
    pub uri: String,
    /// Database name
    pub database: String,
    /// Username
    pub user: String,
    /// Password (usually set via NEO4J_PASSWORD)
    #[serde(default)]
    pub password: String,
    /// Request timeout in seconds
    pub timeout_secs: u64,
}

impl Default for GraphConfig {
    fn default() -> Self {
        Self {
            uri: "http://localhost:7474".to_string(),
            database: "neo4j".to_string(),
            user: "neo4j".to_string(),
            password: String::new(),
            timeout_secs: 10,
        }
    }
}

/// Retrieval configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RetrievalConfig {
    /// Number of chunks to return after MMR selection
    pub top_k: usize,
    /// Number of nearest neighbors to fetch before MMR (fetch_k >= top_k)
    pub fetch_k: usize,
    /// MMR diversity weight in [0, 1]: 0 = pure relevance, 1 = max diversity
    pub mmr_lambda: f32,
    /// Similarity threshold for precision (non-MMR) search, on a [0, 1]
    /// cosine scale
    pub score_threshold: f32,
}

impl Default for RetrievalConfig {
    fn default() -> Self {
        Self {
            top_k: 20,
            fetch_k: 100,
            mmr_lambda: 0.5,
            score_threshold: 0.75,
        }
    }
}

/// Relevance grading configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GradingConfig {
    /// Maximum concurrent grading calls (respects downstream rate limits)
    pub concurrency: usize,
    /// Number of irrelevant verdicts that triggers the web-search fallback.
    /// 1 reproduces the conservative any-irrelevant rule.
    pub fallback_after_irrelevant: usize,
}

impl Default for GradingConfig {
    fn default() -> Self {
        Self {
            concurrency: 4,
            fallback_after_irrelevant: 1,
        }
    }
}

/// Web search fallback configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WebSearchConfig {
    /// Search API endpoint
    pub base_url: String,
    /// API key (usually set via TAVILY_API_KEY)
    #[serde(default)]
    pub api_key: Option<String>,
    /// Maximum number of result snippets to include
    pub max_results: usize,
    /// Request timeout in seconds
    pub timeout_secs: u64,
}

impl Default for WebSearchConfig {
    fn default() -> Self {
        Self {
            base_url: "https://api.tavily.com".to_string(),
            api_key: None,
            max_results: 3,
            timeout_secs: 15,
        }
    }
}

/// LLM (Ollama) configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LlmConfig {
    /// Ollama base URL
    pub base_url: String,
    /// Embedding model name
    pub embed_model: String,
    /// Embedding dimensions (768 for nomic-embed-text)
    pub embed_dimensions: usize,
    /// Generation model name
    pub generate_model: String,
    /// Grading model name (small models grade fine)
    pub grade_model: String,
    /// Temperature for generation
    pub temperature: f32,
    /// Request timeout in seconds
    pub timeout_secs: u64,
    /// Number of retries for transient request failures
    pub max_retries: u32,
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:11434".to_string(),
            embed_model: "nomic-embed-text".to_string(),
            embed_dimensions: 768,
            generate_model: "llama3.2:3b".to_string(),
            grade_model: "llama3.2:3b".to_string(),
            temperature: 0.0, // Deterministic grading and factual answers
            timeout_secs: 120,
            max_retries: 3,
        }
    }
}

/// Document annotation catalog: metadata assigned to documents at ingestion
/// time, keyed by filename with catalog-wide defaults.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AnnotationCatalog {
    /// Defaults applied to documents without an explicit entry
    #[serde(default)]
    pub defaults: DocumentAnnotation,
    /// Per-filename annotations
    #[serde(default)]
    pub documents: HashMap<String, DocumentAnnotation>,
}

/// Metadata annotation for a single document
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DocumentAnnotation {
    pub owner: Option<String>,
    pub company: Option<String>,
    pub category: Option<String>,
    pub year: Option<i64>,
    #[serde(rename = "type")]
    pub doc_type: Option<String>,
    pub description: Option<String>,
}

impl AnnotationCatalog {
    /// Load an annotation catalog from a TOML file
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let content = std::fs::read_to_string(path.as_ref())?;
        toml::from_str(&content)
            .map_err(|e| Error::Config(format!("Invalid annotation catalog: {}", e)))
    }

    /// Annotation for a filename: explicit entry fields win over defaults
    pub fn annotation_for(&self, filename: &str) -> DocumentAnnotation {
        let defaults = &self.defaults;
        match self.documents.get(filename) {
            Some(entry) => DocumentAnnotation {
                owner: entry.owner.clone().or_else(|| defaults.owner.clone()),
                company: entry.company.clone().or_else(|| defaults.company.clone()),
                category: entry.category.clone().or_else(|| defaults.category.clone()),
                year: entry.year.or(defaults.year),
                doc_type: entry.doc_type.clone().or_else(|| defaults.doc_type.clone()),
                description: entry
                    .description
                    .clone()
                    .or_else(|| defaults.description.clone()),
            },
            None => defaults.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_catalog_entry_overrides_defaults() {
        let toml_str = r#"
            [defaults]
            owner = "Jane Doe"
            category = "personal"

            [documents."sbi_2024.pdf"]
            company = "State Bank of India"
            category = "financial"
            year = 2024
        "#;
        let catalog: AnnotationCatalog = toml::from_str(toml_str).unwrap();

        let annotated = catalog.annotation_for("sbi_2024.pdf");
        assert_eq!(annotated.owner.as_deref(), Some("Jane Doe"));
        assert_eq!(annotated.company.as_deref(), Some("State Bank of India"));
        assert_eq!(annotated.category.as_deref(), Some("financial"));
        assert_eq!(annotated.year, Some(2024));

        let unknown = catalog.annotation_for("unknown.txt");
        assert_eq!(unknown.owner.as_deref(), Some("Jane Doe"));
        assert_eq!(unknown.company, None);
    }

    #[test]
    fn test_default_config_is_valid() {
        let config = RagConfig::default();
        assert!(config.retrieval.fetch_k >= config.retrieval.top_k);
        assert!((0.0..=1.0).contains(&config.retrieval.mmr_lambda));
        assert_eq!(config.grading.fallback_after_irrelevant, 1);
    }
}
