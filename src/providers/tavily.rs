//! Tavily web search provider

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::json;
use std::time::Duration;

use crate::config::WebSearchConfig;
use crate::error::{Error, Result};

use super::web_search::{SearchSnippet, WebSearchProvider};

/// Tavily search API client
pub struct TavilySearch {
    client: reqwest::Client,
    base_url: String,
    api_key: String,
}

#[derive(Debug, Deserialize)]
struct TavilyResponse {
    #[serde(default)]
    results: Vec<TavilyResult>,
}

#[derive(Debug, Deserialize)]
struct TavilyResult {
    #[serde(default)]
    content: String,
}

impl TavilySearch {
    /// Create a new client. A missing API key is a configuration error,
    /// surfaced immediately rather than at first query.
    pub fn new(config: &WebSearchConfig) -> Result<Self> {
        let api_key = config
            .api_key
            .clone()
            .ok_or_else(|| Error::Config("TAVILY_API_KEY is not set".to_string()))?;

        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| Error::Config(format!("Failed to build search client: {}", e)))?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            api_key,
        })
    }
}

#[async_trait]
impl WebSearchProvider for TavilySearch {
    async fn search(&self, query: &str, max_results: usize) -> Result<Vec<SearchSnippet>> {
        let resp = self
            .client
            .post(format!("{}/search", self.base_url))
            .json(&json!({
                "api_key": self.api_key,
                "query": query,
                "max_results": max_results,
            }))
            .send()
            .await
            .map_err(|e| Error::WebSearch(e.to_string()))?;

        if !resp.status().is_success() {
            return Err(Error::WebSearch(format!(
                "search API returned HTTP {}",
                resp.status()
            )));
        }

        let parsed: TavilyResponse = resp
            .json()
            .await
            .map_err(|e| Error::WebSearch(e.to_string()))?;

        Ok(parsed
            .results
            .into_iter()
            .take(max_results)
            .map(|r| SearchSnippet { content: r.content })
            .collect())
    }

    fn name(&self) -> &str {
        "tavily"
    }
}
