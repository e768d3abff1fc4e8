//! Retrievable document chunks with typed metadata

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use uuid::Uuid;

/// Where a chunk came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChunkOrigin {
    /// Indexed corpus document
    Corpus,
    /// Synthetic chunk assembled from web search snippets
    WebSearch,
}

/// Typed chunk metadata. Known fields are explicit; anything format-specific
/// the ingestion pipeline attaches goes into `extra`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChunkMetadata {
    /// File type label from ingestion (pdf, csv, xlsx, ...)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file_type: Option<String>,
    /// Page number (PDFs), 1-indexed
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub page: Option<u32>,
    /// Sheet name (spreadsheets)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sheet: Option<String>,
    /// Image index (scanned documents)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_index: Option<u32>,
    /// Open extension map for ingestion-specific extras
    #[serde(default, skip_serializing_if = "HashMap::is_empty")]
    pub extra: HashMap<String, serde_json::Value>,
}

impl Default for ChunkMetadata {
    fn default() -> Self {
        Self {
            file_type: None,
            page: None,
            sheet: None,
            image_index: None,
            extra: HashMap::new(),
        }
    }
}

/// A unit of retrievable text. Immutable after indexing; `source` is the
/// join key to the metadata graph.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DocChunk {
    /// Unique chunk ID
    pub id: Uuid,
    /// Text content
    pub content: String,
    /// Source document identifier (path or URI)
    pub source: String,
    /// Origin of this chunk
    pub origin: ChunkOrigin,
    /// Typed metadata
    #[serde(default)]
    pub metadata: ChunkMetadata,
}

impl DocChunk {
    /// Create a corpus chunk
    pub fn new(content: impl Into<String>, source: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            content: content.into(),
            source: source.into(),
            origin: ChunkOrigin::Corpus,
            metadata: ChunkMetadata::default(),
        }
    }

    /// Create a synthetic chunk from joined web search snippets. Carries no
    /// source-filter metadata on purpose: it was never in the graph.
    pub fn from_web_search(content: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            content: content.into(),
            source: "web-search".to_string(),
            origin: ChunkOrigin::WebSearch,
            metadata: ChunkMetadata::default(),
        }
    }

    /// Attach typed metadata
    pub fn with_metadata(mut self, metadata: ChunkMetadata) -> Self {
        self.metadata = metadata;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_web_search_chunk_has_no_filter_metadata() {
        let chunk = DocChunk::from_web_search("joined snippets");
        assert_eq!(chunk.origin, ChunkOrigin::WebSearch);
        assert!(chunk.metadata.file_type.is_none());
        assert!(chunk.metadata.extra.is_empty());
    }
}
