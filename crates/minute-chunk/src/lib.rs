//! Chunking engine: turns speaker-labeled transcript segments into
//! size-bounded, overlap-linked, richly annotated retrieval units.
//!
//! Pure and deterministic; no I/O. The only entry points most callers need
//! are [`chunk_transcript`] (picks the speaker-aware or fallback path) and
//! [`ChunkingParams`].

pub mod chunker;
pub mod document;
pub mod splitter;

pub use chunker::{chunk_segments, chunk_transcript, ChunkingParams};
pub use document::assemble_documents;
pub use splitter::split_fixed;
