//! Tool capability registry: named, model-invocable operations with a
//! text-only result contract.
//!
//! Every handler returns `Result<String, ToolError>`; expected outcomes
//! ("no meeting found", validation problems) are `Ok` text, external
//! failures are typed errors that the orchestrator converts to text before
//! feeding them back into the conversation.

pub mod error;
pub mod import;
pub mod ingest;
pub mod registry;
pub mod search;
pub mod workflow;

pub use error::ToolError;
pub use import::{DocumentStore, ImportDocumentTool, InMemoryDocumentStore, PageRef};
pub use ingest::{ExtractedMetadata, HeuristicMetadataExtractor, MetadataExtractor, SaveTextTool};
pub use registry::{Tool, ToolContext, ToolRegistry};
pub use search::{GetMeetingMetadataTool, ListRecentMeetingsTool, SearchMeetingsTool};
pub use workflow::{
    ApplyTranscriptEditTool, CancelVideoWorkflowTool, RenameSpeakersTool, RequestTranscriptEditTool,
    RequestVideoUploadTool, TranscribeVideoTool, UploadTranscriptTool, WorkflowStore,
};
