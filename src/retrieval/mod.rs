//! Metadata-filtered semantic retrieval
//!
//! Three layers: the filter resolver turns metadata constraints into an
//! allow-list via the graph index, MMR re-ranks oversampled neighbors for
//! diversity, and the retriever composes both over the vector index.

pub mod filter_resolver;
pub mod mmr;
pub mod retriever;

pub use filter_resolver::{FilterResolver, Resolution};
pub use mmr::mmr_select;
pub use retriever::SemanticRetriever;
