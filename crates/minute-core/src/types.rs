use std::collections::BTreeMap;

use chrono::Utc;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

// =============================================================================
// Transcript input
// =============================================================================

/// One speaker-attributed span of transcribed speech.
///
/// Produced by the transcription collaborator; immutable once produced.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TranscriptSegment {
    pub text: String,
    /// Start time in seconds from the beginning of the recording.
    pub start: f64,
    /// End time in seconds from the beginning of the recording.
    pub end: f64,
    /// Diarization label (e.g., "SPEAKER_00") or a resolved speaker name.
    pub speaker: String,
}

/// Per-meeting metadata, constant across all of that meeting's chunks.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MeetingMetadata {
    pub meeting_id: String,
    /// Meeting date as YYYY-MM-DD.
    pub meeting_date: String,
    pub meeting_title: String,
    pub summary: String,
    /// Origin of the content (e.g., "video_upload", "Manual Entry").
    pub source: String,
    pub source_file: String,
    pub language: String,
    pub transcription_model: String,
    /// Total meeting duration in seconds, when known.
    pub duration_secs: Option<f64>,
    /// Date the transcript was produced, YYYY-MM-DD.
    pub date_transcribed: String,
    /// Diarization label to real name (e.g., "SPEAKER_00" -> "Ada Lovelace").
    ///
    /// Ordered map so serialized output is stable.
    pub speaker_mapping: BTreeMap<String, String>,
}

impl MeetingMetadata {
    /// Create metadata for a freshly transcribed meeting with sane defaults.
    pub fn new(meeting_id: String, meeting_date: String) -> Self {
        let meeting_title = format!("Meeting {}", meeting_date);
        Self {
            meeting_id,
            meeting_date: meeting_date.clone(),
            meeting_title,
            summary: String::new(),
            source: "unknown".to_string(),
            source_file: String::new(),
            language: "en".to_string(),
            transcription_model: "whisperx".to_string(),
            duration_secs: None,
            date_transcribed: meeting_date,
            speaker_mapping: BTreeMap::new(),
        }
    }

    /// Generate a meeting identifier: `meeting_` + 8 lowercase hex characters.
    pub fn new_meeting_id() -> String {
        format!("meeting_{}", short_hex())
    }

    /// Generate a document identifier for generic text imports.
    pub fn new_document_id() -> String {
        format!("doc_{}", short_hex())
    }

    /// Today's date as YYYY-MM-DD (UTC).
    pub fn today() -> String {
        Utc::now().format("%Y-%m-%d").to_string()
    }
}

fn short_hex() -> String {
    let hex = Uuid::new_v4().simple().to_string();
    hex[..8].to_string()
}

// =============================================================================
// Chunks and indexed documents
// =============================================================================

/// How a chunk was formed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChunkKind {
    /// All segments in the chunk share one speaker.
    ConversationTurn,
    /// The chunk absorbed segments from more than one speaker.
    MixedSpeakers,
    /// Produced by the fixed-window fallback splitter (no speaker data).
    FullTranscriptChunk,
}

impl ChunkKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ChunkKind::ConversationTurn => "conversation_turn",
            ChunkKind::MixedSpeakers => "mixed_speakers",
            ChunkKind::FullTranscriptChunk => "full_transcript_chunk",
        }
    }
}

/// A grouped, size-bounded span of transcript text prepared for indexing.
///
/// Sizes are measured in Unicode scalar values: `char_count` always equals
/// `text.chars().count()`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Chunk {
    pub text: String,
    /// Primary speaker (the speaker that seeded the chunk), if any.
    pub speaker: Option<String>,
    /// All distinct speakers in the chunk, sorted.
    pub speakers: Vec<String>,
    pub start: Option<f64>,
    pub end: Option<f64>,
    pub segment_count: usize,
    pub chunk_index: usize,
    pub total_chunks: usize,
    pub word_count: usize,
    pub char_count: usize,
    pub kind: ChunkKind,
}

/// The persisted unit: a chunk's text plus the flattened union of chunk
/// fields and meeting metadata, exactly as the vector store keeps it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IndexedDocument {
    pub id: String,
    pub text: String,
    /// Flat metadata object. Always contains at least `meeting_id`.
    pub metadata: Value,
}

impl IndexedDocument {
    /// Read a string-valued metadata field.
    pub fn metadata_str(&self, field: &str) -> Option<&str> {
        self.metadata.get(field).and_then(Value::as_str)
    }

    /// Read an integer-valued metadata field.
    pub fn metadata_u64(&self, field: &str) -> Option<u64> {
        self.metadata.get(field).and_then(Value::as_u64)
    }
}

/// A document returned from a vector query, with its similarity score.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoredDocument {
    pub document: IndexedDocument,
    pub score: f64,
}

// =============================================================================
// Retrieval
// =============================================================================

/// Metadata predicate supported by the vector-store contract.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MetadataFilter {
    /// Exact string equality on one metadata field.
    Equals { field: String, value: String },
}

impl MetadataFilter {
    /// Equality filter on `meeting_id`.
    pub fn meeting(meeting_id: &str) -> Self {
        MetadataFilter::Equals {
            field: "meeting_id".to_string(),
            value: meeting_id.to_string(),
        }
    }

    /// Whether the given flat metadata object satisfies this filter.
    pub fn matches(&self, metadata: &Value) -> bool {
        match self {
            MetadataFilter::Equals { field, value } => metadata
                .get(field)
                .and_then(Value::as_str)
                .map(|v| v == value)
                .unwrap_or(false),
        }
    }
}

/// The `{k, filter}` pair chosen for one query. Ephemeral, never persisted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RetrievalPlan {
    pub k: usize,
    pub filter: Option<MetadataFilter>,
}

// =============================================================================
// Video workflow state
// =============================================================================

/// Mutable, session-scoped record of an in-progress video ingestion.
///
/// Always keyed by a session identifier; never stored as process-wide
/// global state. Reset on cancel and after a successful upload.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct WorkflowState {
    pub upload_path: Option<String>,
    pub transcript_text: Option<String>,
    pub segments: Vec<TranscriptSegment>,
    pub language: Option<String>,
    pub duration_secs: Option<f64>,
    pub speaker_mapping: BTreeMap<String, String>,
    pub awaiting_upload: bool,
    pub editor_open: bool,
    pub in_progress: bool,
}

impl WorkflowState {
    pub fn has_transcript(&self) -> bool {
        self.transcript_text
            .as_deref()
            .map(|t| !t.trim().is_empty())
            .unwrap_or(false)
    }
}

// =============================================================================
// Tests
// =============================================================================
