//! Error types for the retrieval pipeline

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use crate::pipeline::Stage;

/// Result type alias for pipeline operations
pub type Result<T> = std::result::Result<T, Error>;

/// Pipeline errors
#[derive(Debug, Error)]
pub enum Error {
    /// Configuration error (missing credentials, bad address). Never retried.
    #[error("Configuration error: {0}")]
    Config(String),

    /// Metadata graph store error
    #[error("Graph store error: {0}")]
    Graph(String),

    /// Embedding generation error
    #[error("Embedding generation failed: {0}")]
    Embedding(String),

    /// Vector index error
    #[error("Vector index error: {0}")]
    VectorIndex(String),

    /// Relevance grading error
    #[error("Relevance grading failed: {0}")]
    Grading(String),

    /// Grading call returned neither a relevant nor a not-relevant verdict
    #[error("Malformed grading verdict: {0}")]
    MalformedVerdict(String),

    /// Web search error
    #[error("Web search failed: {0}")]
    WebSearch(String),

    /// Answer generation error
    #[error("Answer generation failed: {0}")]
    Generation(String),

    /// A pipeline stage failed; wraps the underlying cause
    #[error("Stage {stage} failed: {source}")]
    Stage {
        stage: Stage,
        #[source]
        source: Box<Error>,
    },

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// HTTP request error
    #[error("HTTP request error: {0}")]
    Http(#[from] reqwest::Error),
}

impl Error {
    /// Create a graph store error
    pub fn graph(message: impl Into<String>) -> Self {
        Self::Graph(message.into())
    }

    /// Create a vector index error
    pub fn vector_index(message: impl Into<String>) -> Self {
        Self::VectorIndex(message.into())
    }

    /// Create a grading error
    pub fn grading(message: impl Into<String>) -> Self {
        Self::Grading(message.into())
    }

    /// Create a generation error
    pub fn generation(message: impl Into<String>) -> Self {
        Self::Generation(message.into())
    }

    /// Wrap an error as a failure of the given stage
    pub fn at_stage(self, stage: Stage) -> Self {
        match self {
            // Already attributed
            Self::Stage { .. } => self,
            other => Self::Stage {
                stage,
                source: Box::new(other),
            },
        }
    }

    /// Stage this error is attributed to, if any
    pub fn stage(&self) -> Option<Stage> {
        match self {
            Self::Stage { stage, .. } => Some(*stage),
            _ => None,
        }
    }

    /// Whether this error is a transient infrastructure failure worth retrying.
    ///
    /// Config and malformed-response errors are permanent and must not be
    /// retried; only network-level failures qualify.
    pub fn is_transient(&self) -> bool {
        match self {
            Self::Http(e) => e.is_timeout() || e.is_connect() || e.is_request(),
            Self::Stage { source, .. } => source.is_transient(),
            _ => false,
        }
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        // Full detail goes to the logs; clients get a generic message so raw
        // internals never leak into answer text.
        tracing::error!("request failed: {}", self);

        let (status, error_type) = match &self {
            Error::Config(_) => (StatusCode::BAD_REQUEST, "config_error"),
            Error::Graph(_) => (StatusCode::BAD_GATEWAY, "graph_error"),
            Error::Embedding(_) | Error::VectorIndex(_) => {
                (StatusCode::BAD_GATEWAY, "retrieval_error")
            }
            Error::Grading(_) | Error::MalformedVerdict(_) => {
                (StatusCode::BAD_GATEWAY, "grading_error")
            }
            Error::WebSearch(_) => (StatusCode::BAD_GATEWAY, "web_search_error"),
            Error::Generation(_) => (StatusCode::SERVICE_UNAVAILABLE, "generation_error"),
            Error::Stage { stage, .. } => {
                let body = Json(json!({
                    "error": {
                        "type": "stage_failure",
                        "stage": stage.to_string(),
                        "message": "The query pipeline failed; see server logs for detail.",
                    }
                }));
                return (StatusCode::INTERNAL_SERVER_ERROR, body).into_response();
            }
            Error::Io(_) => (StatusCode::INTERNAL_SERVER_ERROR, "io_error"),
            Error::Json(_) => (StatusCode::BAD_REQUEST, "json_error"),
            Error::Http(_) => (StatusCode::BAD_GATEWAY, "http_error"),
        };

        let body = Json(json!({
            "error": {
                "type": error_type,
                "message": "The request could not be completed; see server logs for detail.",
            }
        }));

        (status, body).into_response()
    }
}
