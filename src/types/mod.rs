//! Core data types: chunks, filters, pipeline state, and responses

pub mod document;
pub mod filter;
pub mod response;
pub mod state;

pub use document::{ChunkMetadata, ChunkOrigin, DocChunk};
pub use filter::FilterSpec;
pub use response::{QueryOutcome, QueryRequest, QueryResponse, SourceDoc};
pub use state::{QueryState, StageUpdate};
