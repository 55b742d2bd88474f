//! Retrieval layer: embeddings, the vector-store contract, the in-memory
//! store used for tests and local runs, query planning, and batched
//! ingestion.

pub mod batcher;
pub mod embedding;
pub mod planner;
pub mod store;

pub use batcher::BatchIngestor;
pub use embedding::{DynEmbeddingService, EmbeddingService, MockEmbedding};
pub use planner::plan;
pub use store::{InMemoryVectorStore, VectorStore};
