//! Ollama-based providers for embeddings, grading, and answer generation
//!
//! A single `OllamaClient` is shared across the provider impls so they reuse
//! one HTTP connection pool.

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::json;
use std::sync::Arc;
use std::time::Duration;

use crate::config::LlmConfig;
use crate::error::{Error, Result};
use crate::retry::with_retry;
use crate::types::DocChunk;

use super::embedding::EmbeddingProvider;
use super::generator::AnswerGenerator;
use super::grader::{RelevanceGrader, Verdict};

/// Low-level Ollama HTTP client
pub struct OllamaClient {
    client: reqwest::Client,
    base_url: String,
    temperature: f32,
    max_retries: u32,
}

#[derive(Debug, Deserialize)]
struct EmbedResponse {
    embedding: Vec<f32>,
}

#[derive(Debug, Deserialize)]
struct GenerateResponse {
    response: String,
}

impl OllamaClient {
    /// Create a new client from configuration
    pub fn new(config: &LlmConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| Error::Config(format!("Failed to build LLM client: {}", e)))?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            temperature: config.temperature,
            max_retries: config.max_retries,
        })
    }

    /// Generate an embedding for a text
    pub async fn embed(&self, model: &str, text: &str) -> Result<Vec<f32>> {
        let response: EmbedResponse = with_retry(self.max_retries, || async {
            let resp = self
                .client
                .post(format!("{}/api/embeddings", self.base_url))
                .json(&json!({"model": model, "prompt": text}))
                .send()
                .await?;

            if !resp.status().is_success() {
                return Err(Error::Embedding(format!(
                    "Ollama returned HTTP {}",
                    resp.status()
                )));
            }
            Ok(resp.json::<EmbedResponse>().await?)
        })
        .await?;

        if response.embedding.is_empty() {
            return Err(Error::Embedding("Empty embedding returned".to_string()));
        }
        Ok(response.embedding)
    }

    /// Run a completion, optionally forcing JSON output
    pub async fn generate(&self, model: &str, prompt: &str, json_format: bool) -> Result<String> {
        let mut body = json!({
            "model": model,
            "prompt": prompt,
            "stream": false,
            "options": {"temperature": self.temperature},
        });
        if json_format {
            body["format"] = json!("json");
        }

        let response: GenerateResponse = with_retry(self.max_retries, || async {
            let resp = self
                .client
                .post(format!("{}/api/generate", self.base_url))
                .json(&body)
                .send()
                .await?;

            if !resp.status().is_success() {
                return Err(Error::generation(format!(
                    "Ollama returned HTTP {}",
                    resp.status()
                )));
            }
            Ok(resp.json::<GenerateResponse>().await?)
        })
        .await?;

        Ok(response.response)
    }

    /// Check that the Ollama server is reachable
    pub async fn health_check(&self) -> bool {
        self.client
            .get(format!("{}/api/tags", self.base_url))
            .send()
            .await
            .map(|r| r.status().is_success())
            .unwrap_or(false)
    }
}

/// Ollama embedding provider
pub struct OllamaEmbedder {
    client: Arc<OllamaClient>,
    model: String,
    dimensions: usize,
}

impl OllamaEmbedder {
    pub fn new(client: Arc<OllamaClient>, model: impl Into<String>, dimensions: usize) -> Self {
        Self {
            client,
            model: model.into(),
            dimensions,
        }
    }
}

#[async_trait]
impl EmbeddingProvider for OllamaEmbedder {
    async fn embed(&self, text: &str) -> Result<Vec<f32>> {
        self.client.embed(&self.model, text).await
    }

    fn dimensions(&self) -> usize {
        self.dimensions
    }

    fn name(&self) -> &str {
        "ollama"
    }
}

/// Ollama relevance grader using structured JSON output
pub struct OllamaGrader {
    client: Arc<OllamaClient>,
    model: String,
}

#[derive(Debug, Deserialize)]
struct GradePayload {
    relevant: Option<serde_json::Value>,
}

impl OllamaGrader {
    pub fn new(client: Arc<OllamaClient>, model: impl Into<String>) -> Self {
        Self {
            client,
            model: model.into(),
        }
    }

    fn build_prompt(question: &str, document_text: &str) -> String {
        format!(
            r#"You are a grader assessing the relevance of a retrieved document to a user question.
Respond with a JSON object of the form {{"relevant": "yes"}} or {{"relevant": "no"}} and nothing else.

Retrieved document:
{document}

User question: {question}"#,
            document = document_text,
            question = question
        )
    }

    /// Parse the grading response. Anything that is not a recognizable yes
    /// or no verdict is a malformed-verdict error, never coerced.
    fn parse_verdict(raw: &str) -> Result<Verdict> {
        let payload: GradePayload = serde_json::from_str(raw)
            .map_err(|_| Error::MalformedVerdict(format!("not a grading object: {}", raw)))?;

        let value = match payload.relevant {
            Some(serde_json::Value::Bool(b)) => return Ok(if b { Verdict::Relevant } else { Verdict::Irrelevant }),
            Some(serde_json::Value::String(s)) => s,
            _ => {
                return Err(Error::MalformedVerdict(format!(
                    "missing relevance field: {}",
                    raw
                )))
            }
        };

        match value.trim().to_lowercase().as_str() {
            "yes" | "true" | "relevant" => Ok(Verdict::Relevant),
            "no" | "false" | "irrelevant" | "not relevant" => Ok(Verdict::Irrelevant),
            other => Err(Error::MalformedVerdict(format!(
                "unrecognized verdict: {}",
                other
            ))),
        }
    }
}

#[async_trait]
impl RelevanceGrader for OllamaGrader {
    async fn grade(&self, question: &str, document_text: &str) -> Result<Verdict> {
        let prompt = Self::build_prompt(question, document_text);
        let raw = self
            .client
            .generate(&self.model, &prompt, true)
            .await
            .map_err(|e| Error::grading(e.to_string()))?;
        Self::parse_verdict(&raw)
    }

    fn name(&self) -> &str {
        "ollama"
    }
}

/// Ollama answer generator
pub struct OllamaGenerator {
    client: Arc<OllamaClient>,
    model: String,
}

impl OllamaGenerator {
    pub fn new(client: Arc<OllamaClient>, model: impl Into<String>) -> Self {
        Self {
            client,
            model: model.into(),
        }
    }

    /// Format context chunks with their sources for the prompt
    fn build_context(context: &[DocChunk]) -> String {
        context
            .iter()
            .map(|doc| format!("Source: {}\nContent: {}", doc.source, doc.content))
            .collect::<Vec<_>>()
            .join("\n\n")
    }

    fn build_prompt(question: &str, context: &[DocChunk]) -> String {
        format!(
            r#"Answer the question based only on the following context:

{context}

Question: {question}

Provide a detailed answer, citing the sources you use:"#,
            context = Self::build_context(context),
            question = question
        )
    }
}

#[async_trait]
impl AnswerGenerator for OllamaGenerator {
    async fn generate(&self, question: &str, context: &[DocChunk]) -> Result<String> {
        let prompt = Self::build_prompt(question, context);
        self.client.generate(&self.model, &prompt, false).await
    }

    fn name(&self) -> &str {
        "ollama"
    }

    fn model(&self) -> &str {
        &self.model
    }
}
