//! Filter resolution against the metadata graph

use std::sync::Arc;

use crate::error::Result;
use crate::providers::metadata_index::MetadataIndex;
use crate::types::FilterSpec;

/// Outcome of resolving a filter spec
#[derive(Debug, Clone, PartialEq)]
pub enum Resolution {
    /// No filters given: search is unrestricted
    Unconstrained,
    /// Search restricted to these document source identifiers
    Allowed(Vec<String>),
    /// Filters exclude every document. The whole retrieval short-circuits;
    /// a non-matching filter never falls back to unfiltered search.
    Empty,
}

/// Resolves metadata filters into a concrete allow-list via the graph index
pub struct FilterResolver {
    index: Arc<dyn MetadataIndex>,
}

impl FilterResolver {
    pub fn new(index: Arc<dyn MetadataIndex>) -> Self {
        Self { index }
    }

    /// Resolve a filter spec. An unconstrained spec never touches the graph.
    /// Store connectivity failures propagate; they are not substituted with
    /// an unconstrained search.
    pub async fn resolve(&self, filters: &FilterSpec) -> Result<Resolution> {
        if filters.is_unconstrained() {
            return Ok(Resolution::Unconstrained);
        }

        let sources = self.index.query(filters).await?;
        if sources.is_empty() {
            tracing::info!("metadata filters matched no documents: {:?}", filters);
            return Ok(Resolution::Empty);
        }

        Ok(Resolution::Allowed(sources))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use crate::providers::metadata_index::{EntityKind, GraphSnapshot, GraphStats};
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// Graph index mock returning a fixed source list and counting queries
    struct StubIndex {
        sources: Vec<String>,
        fail: bool,
        queries: AtomicUsize,
    }

    impl StubIndex {
        fn with_sources(sources: Vec<&str>) -> Self {
            Self {
                sources: sources.into_iter().map(String::from).collect(),
                fail: false,
                queries: AtomicUsize::new(0),
            }
        }

        fn unreachable_store() -> Self {
            Self {
                sources: Vec::new(),
                fail: true,
                queries: AtomicUsize::new(0),
            }
        }
    }

    #[async_trait]
    impl MetadataIndex for StubIndex {
        async fn query(&self, _filters: &FilterSpec) -> Result<Vec<String>> {
            self.queries.fetch_add(1, Ordering::SeqCst);
            if self.fail {
                return Err(Error::graph("connection refused"));
            }
            Ok(self.sources.clone())
        }

        async fn list_values(&self, _kind: EntityKind) -> Result<Vec<String>> {
            Ok(Vec::new())
        }

        async fn stats(&self) -> Result<GraphStats> {
            Ok(GraphStats::default())
        }

        async fn graph_snapshot(&self) -> Result<GraphSnapshot> {
            Ok(GraphSnapshot::default())
        }

        fn name(&self) -> &str {
            "stub"
        }
    }

    #[tokio::test]
    async fn test_no_filters_is_unconstrained_without_graph_query() {
        let index = Arc::new(StubIndex::with_sources(vec!["a.pdf"]));
        let resolver = FilterResolver::new(index.clone());

        let resolution = resolver.resolve(&FilterSpec::default()).await.unwrap();
        assert_eq!(resolution, Resolution::Unconstrained);
        assert_eq!(index.queries.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_matching_filters_produce_allow_list() {
        let index = Arc::new(StubIndex::with_sources(vec!["a.pdf", "b.pdf"]));
        let resolver = FilterResolver::new(index);

        let resolution = resolver
            .resolve(&FilterSpec::owner("Jane Doe"))
            .await
            .unwrap();
        assert_eq!(
            resolution,
            Resolution::Allowed(vec!["a.pdf".to_string(), "b.pdf".to_string()])
        );
    }

    #[tokio::test]
    async fn test_zero_matches_short_circuits_as_empty() {
        let index = Arc::new(StubIndex::with_sources(vec![]));
        let resolver = FilterResolver::new(index);

        let resolution = resolver
            .resolve(&FilterSpec::owner("Nobody"))
            .await
            .unwrap();
        assert_eq!(resolution, Resolution::Empty);
    }

    #[tokio::test]
    async fn test_unreachable_store_propagates_error() {
        let index = Arc::new(StubIndex::unreachable_store());
        let resolver = FilterResolver::new(index);

        let err = resolver
            .resolve(&FilterSpec::owner("Jane Doe"))
            .await
            .unwrap_err();
        assert!(matches!(err, Error::Graph(_)));
    }
}
