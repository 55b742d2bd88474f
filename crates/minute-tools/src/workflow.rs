//! Video ingestion workflow tools.
//!
//! All workflow state is keyed by the conversation's session id inside
//! [`WorkflowStore`]; there is no process-wide workflow state. Cancel and
//! upload reset the session's state atomically under the store lock.

use std::collections::HashMap;
use std::path::Path;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::{json, Value};
use uuid::Uuid;

use minute_chunk::{chunk_transcript, ChunkingParams};
use minute_core::config::RetrievalConfig;
use minute_core::types::{MeetingMetadata, WorkflowState};
use minute_transcribe::{format_transcript, TranscriptionService};
use minute_vector::VectorStore;

use crate::error::ToolError;
use crate::registry::{parse_args, Tool, ToolContext};

// =============================================================================
// Session-keyed state store
// =============================================================================

/// Session-scoped workflow state, one [`WorkflowState`] per conversation.
#[derive(Default)]
pub struct WorkflowStore {
    sessions: Mutex<HashMap<Uuid, WorkflowState>>,
}

impl WorkflowStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Run a closure against the session's state, creating it on first use.
    pub fn with_state<R>(
        &self,
        session_id: Uuid,
        f: impl FnOnce(&mut WorkflowState) -> R,
    ) -> Result<R, ToolError> {
        let mut sessions = self
            .sessions
            .lock()
            .map_err(|e| ToolError::Failed(format!("workflow lock poisoned: {}", e)))?;
        Ok(f(sessions.entry(session_id).or_default()))
    }

    /// Clone of the session's current state.
    pub fn snapshot(&self, session_id: Uuid) -> Result<WorkflowState, ToolError> {
        self.with_state(session_id, |state| state.clone())
    }

    /// Atomically reset the session's state to empty.
    pub fn reset(&self, session_id: Uuid) -> Result<(), ToolError> {
        self.with_state(session_id, |state| *state = WorkflowState::default())
    }

    pub fn session_count(&self) -> usize {
        self.sessions.lock().map(|s| s.len()).unwrap_or(0)
    }
}

// =============================================================================
// request_video_upload
// =============================================================================

/// Flag the session as waiting for a video file.
pub struct RequestVideoUploadTool {
    workflows: Arc<WorkflowStore>,
}

impl RequestVideoUploadTool {
    pub fn new(workflows: Arc<WorkflowStore>) -> Self {
        Self { workflows }
    }
}

#[async_trait]
impl Tool for RequestVideoUploadTool {
    fn name(&self) -> &'static str {
        "request_video_upload"
    }

    fn description(&self) -> &'static str {
        "Start the video upload workflow: ask the user to provide a video file for transcription."
    }

    fn schema(&self) -> Value {
        json!({"type": "object", "properties": {}})
    }

    async fn invoke(&self, ctx: &ToolContext, _args: Value) -> Result<String, ToolError> {
        self.workflows.with_state(ctx.session_id, |state| {
            state.awaiting_upload = true;
            state.editor_open = false;
        })?;
        Ok("Video upload requested. Provide the video file path and I'll transcribe it for you."
            .to_string())
    }
}

// =============================================================================
// transcribe_video
// =============================================================================

/// Transcribe an uploaded video through the external transcription engine
/// and keep the result in the session state. Chunking and indexing happen
/// later, at the upload step.
pub struct TranscribeVideoTool {
    workflows: Arc<WorkflowStore>,
    transcriber: Arc<dyn TranscriptionService>,
}

impl TranscribeVideoTool {
    pub fn new(workflows: Arc<WorkflowStore>, transcriber: Arc<dyn TranscriptionService>) -> Self {
        Self {
            workflows,
            transcriber,
        }
    }
}

#[derive(Debug, Deserialize)]
struct TranscribeArgs {
    video_path: String,
}

#[async_trait]
impl Tool for TranscribeVideoTool {
    fn name(&self) -> &'static str {
        "transcribe_video"
    }

    fn description(&self) -> &'static str {
        "Transcribe an uploaded video file with speaker identification. \
         Returns the transcript with timestamps and speaker labels."
    }

    fn schema(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "video_path": {"type": "string", "description": "Path to the uploaded video file."},
            },
            "required": ["video_path"],
        })
    }

    async fn invoke(&self, ctx: &ToolContext, args: Value) -> Result<String, ToolError> {
        let args: TranscribeArgs = parse_args(args)?;
        let path = Path::new(&args.video_path);
        if !path.exists() {
            return Ok(format!("Video file not found: {}", args.video_path));
        }

        self.workflows.with_state(ctx.session_id, |state| {
            state.in_progress = true;
            state.upload_path = Some(args.video_path.clone());
        })?;

        let transcription = match self.transcriber.transcribe_file(path).await {
            Ok(t) => t,
            Err(e) => {
                self.workflows
                    .with_state(ctx.session_id, |state| state.in_progress = false)?;
                return Err(ToolError::Failed(format!("Transcription failed: {}", e)));
            }
        };

        let rendered = format_transcript(&transcription.segments);
        let speakers: std::collections::BTreeSet<&str> = transcription
            .segments
            .iter()
            .map(|s| s.speaker.as_str())
            .collect();
        let speaker_count = speakers.len();

        let filename = path
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_else(|| args.video_path.clone());

        self.workflows.with_state(ctx.session_id, |state| {
            state.transcript_text = Some(rendered.clone());
            state.segments = transcription.segments.clone();
            state.language = Some(transcription.language.clone());
            state.duration_secs = Some(transcription.duration_secs);
            state.in_progress = false;
            state.awaiting_upload = false;
        })?;

        tracing::info!(
            file = %filename,
            segments = transcription.segments.len(),
            speakers = speaker_count,
            "Video transcribed"
        );

        Ok(format!(
            "Transcription complete for {}.\n\
             Language: {}. Duration: {:.1}s. Speakers identified: {}.\n\n\
             {}\n\n\
             Next: upload this transcript to the index, or edit it first.",
            filename, transcription.language, transcription.duration_secs, speaker_count, rendered,
        ))
    }
}

// =============================================================================
// request_transcript_edit / apply_transcript_edit
// =============================================================================

/// Open the transcript editor for the session.
pub struct RequestTranscriptEditTool {
    workflows: Arc<WorkflowStore>,
}

impl RequestTranscriptEditTool {
    pub fn new(workflows: Arc<WorkflowStore>) -> Self {
        Self { workflows }
    }
}

#[async_trait]
impl Tool for RequestTranscriptEditTool {
    fn name(&self) -> &'static str {
        "request_transcript_edit"
    }

    fn description(&self) -> &'static str {
        "Let the user manually edit the current transcript before it is indexed."
    }

    fn schema(&self) -> Value {
        json!({"type": "object", "properties": {}})
    }

    async fn invoke(&self, ctx: &ToolContext, _args: Value) -> Result<String, ToolError> {
        let has_transcript = self.workflows.snapshot(ctx.session_id)?.has_transcript();
        if !has_transcript {
            return Ok("No transcript available to edit. Transcribe a video first.".to_string());
        }
        self.workflows
            .with_state(ctx.session_id, |state| state.editor_open = true)?;
        Ok("Transcript editor is ready. Send the corrected text when you're done.".to_string())
    }
}

/// Replace the session's transcript with the user's edited text.
pub struct ApplyTranscriptEditTool {
    workflows: Arc<WorkflowStore>,
}

impl ApplyTranscriptEditTool {
    pub fn new(workflows: Arc<WorkflowStore>) -> Self {
        Self { workflows }
    }
}

#[derive(Debug, Deserialize)]
struct EditArgs {
    edited_text: String,
}

#[async_trait]
impl Tool for ApplyTranscriptEditTool {
    fn name(&self) -> &'static str {
        "apply_transcript_edit"
    }

    fn description(&self) -> &'static str {
        "Save the user's edited transcript text over the current one."
    }

    fn schema(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "edited_text": {"type": "string", "description": "The full corrected transcript."},
            },
            "required": ["edited_text"],
        })
    }

    async fn invoke(&self, ctx: &ToolContext, args: Value) -> Result<String, ToolError> {
        let args: EditArgs = parse_args(args)?;
        if args.edited_text.trim().is_empty() {
            return Ok("No edited text provided.".to_string());
        }
        self.workflows.with_state(ctx.session_id, |state| {
            state.transcript_text = Some(args.edited_text.clone());
            state.editor_open = false;
        })?;
        Ok("Transcript updated. Upload it to the index when you're ready.".to_string())
    }
}

// =============================================================================
// rename_speakers
// =============================================================================

/// Replace diarization labels with real names in the session's transcript.
///
/// The mapping also propagates into the segments and into the metadata that
/// will be attached at upload time, so a re-application stays consistent.
pub struct RenameSpeakersTool {
    workflows: Arc<WorkflowStore>,
}

impl RenameSpeakersTool {
    pub fn new(workflows: Arc<WorkflowStore>) -> Self {
        Self { workflows }
    }
}

#[derive(Debug, Deserialize)]
struct RenameArgs {
    mapping: String,
}

/// Parse `"SPEAKER_00=Ada, SPEAKER_01=Grace"` into pairs.
fn parse_mapping(raw: &str) -> Result<Vec<(String, String)>, String> {
    let mut pairs = Vec::new();
    for part in raw.split(',') {
        let part = part.trim();
        if part.is_empty() {
            continue;
        }
        let Some((label, name)) = part.split_once('=') else {
            return Err(part.to_string());
        };
        let (label, name) = (label.trim(), name.trim());
        if label.is_empty() || name.is_empty() {
            return Err(part.to_string());
        }
        pairs.push((label.to_string(), name.to_string()));
    }
    Ok(pairs)
}

#[async_trait]
impl Tool for RenameSpeakersTool {
    fn name(&self) -> &'static str {
        "rename_speakers"
    }

    fn description(&self) -> &'static str {
        "Replace generic speaker labels in the transcript with real names, \
         e.g. mapping \"SPEAKER_00=Ada Lovelace, SPEAKER_01=Grace Hopper\"."
    }

    fn schema(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "mapping": {
                    "type": "string",
                    "description": "Comma-separated LABEL=Name pairs, e.g. \"SPEAKER_00=Ada, SPEAKER_01=Grace\".",
                },
            },
            "required": ["mapping"],
        })
    }

    async fn invoke(&self, ctx: &ToolContext, args: Value) -> Result<String, ToolError> {
        let args: RenameArgs = parse_args(args)?;

        let pairs = match parse_mapping(&args.mapping) {
            Ok(pairs) if !pairs.is_empty() => pairs,
            Ok(_) => {
                return Ok(
                    "No speaker mapping provided. Expected \"SPEAKER_00=Name, SPEAKER_01=Name\"."
                        .to_string(),
                )
            }
            Err(bad) => {
                return Ok(format!(
                    "Could not parse speaker mapping entry '{}'. Expected \"SPEAKER_00=Name, SPEAKER_01=Name\".",
                    bad
                ))
            }
        };

        let applied = self.workflows.with_state(ctx.session_id, |state| {
            if !state.has_transcript() {
                return false;
            }
            for (label, name) in &pairs {
                if let Some(text) = state.transcript_text.as_mut() {
                    *text = text.replace(label.as_str(), name);
                }
                for segment in &mut state.segments {
                    if segment.speaker == *label {
                        segment.speaker = name.clone();
                    }
                    segment.text = segment.text.replace(label.as_str(), name);
                }
                state.speaker_mapping.insert(label.clone(), name.clone());
            }
            true
        })?;

        if !applied {
            return Ok("No transcript available to rename speakers in. Transcribe a video first."
                .to_string());
        }

        let summary = pairs
            .iter()
            .map(|(label, name)| format!("{} -> {}", label, name))
            .collect::<Vec<_>>()
            .join(", ");
        Ok(format!("Speaker names updated: {}.", summary))
    }
}

// =============================================================================
// upload_transcript
// =============================================================================

/// Chunk the session's transcript and upsert it into the vector store.
///
/// This is the single point where the chunking engine runs for the video
/// workflow. On success the session's workflow state is reset.
pub struct UploadTranscriptTool {
    workflows: Arc<WorkflowStore>,
    store: Arc<dyn VectorStore>,
    chunking: ChunkingParams,
    retrieval: RetrievalConfig,
}

impl UploadTranscriptTool {
    pub fn new(
        workflows: Arc<WorkflowStore>,
        store: Arc<dyn VectorStore>,
        chunking: ChunkingParams,
        retrieval: RetrievalConfig,
    ) -> Self {
        Self {
            workflows,
            store,
            chunking,
            retrieval,
        }
    }
}

#[derive(Debug, Deserialize)]
struct UploadArgs {
    #[serde(default)]
    title: Option<String>,
    #[serde(default)]
    date: Option<String>,
}

#[async_trait]
impl Tool for UploadTranscriptTool {
    fn name(&self) -> &'static str {
        "upload_transcript"
    }

    fn description(&self) -> &'static str {
        "Chunk the current transcript and store it in the vector database for semantic search."
    }

    fn schema(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "title": {"type": "string", "description": "Optional meeting title."},
                "date": {"type": "string", "description": "Optional meeting date, YYYY-MM-DD."},
            },
        })
    }

    async fn invoke(&self, ctx: &ToolContext, args: Value) -> Result<String, ToolError> {
        let args: UploadArgs = parse_args(args)?;
        let state = self.workflows.snapshot(ctx.session_id)?;
        if !state.has_transcript() {
            return Ok(
                "No transcript available to upload. Transcribe a video first.".to_string(),
            );
        }

        let meeting_id = MeetingMetadata::new_meeting_id();
        let meeting_date = args.date.unwrap_or_else(MeetingMetadata::today);
        let mut meta = MeetingMetadata::new(meeting_id.clone(), meeting_date.clone());
        if let Some(title) = args.title {
            meta.meeting_title = title;
        }
        meta.source = "video_upload".to_string();
        meta.source_file = state
            .upload_path
            .as_deref()
            .and_then(|p| Path::new(p).file_name())
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_else(|| "unknown".to_string());
        if let Some(language) = &state.language {
            meta.language = language.clone();
        }
        meta.duration_secs = state.duration_secs;
        meta.speaker_mapping = state.speaker_mapping.clone();
        meta.date_transcribed = MeetingMetadata::today();

        let transcript = state.transcript_text.as_deref().unwrap_or_default();
        let docs = chunk_transcript(transcript, &state.segments, &meta, &self.chunking);
        if docs.is_empty() {
            return Ok("The transcript is empty after chunking; nothing to upload.".to_string());
        }

        let count = docs.len();
        let avg_chars = docs
            .iter()
            .filter_map(|d| d.metadata_u64("char_count"))
            .sum::<u64>()
            / count as u64;

        self.store
            .upsert(docs, &self.retrieval.namespace)
            .await
            .map_err(|e| ToolError::Unavailable(format!("Vector store upsert failed: {}", e)))?;

        self.workflows.reset(ctx.session_id)?;

        tracing::info!(meeting_id = %meeting_id, chunks = count, "Transcript indexed");

        Ok(format!(
            "Successfully uploaded to the index.\n\
             Meeting ID: {}\n\
             Documents created: {}\n\
             Average chunk size: {} characters\n\
             Date: {}\n\n\
             You can now ask questions about this meeting.",
            meeting_id, count, avg_chars, meeting_date,
        ))
    }
}

// =============================================================================
// cancel_video_workflow
// =============================================================================

/// Abandon the current video workflow and clear the session state.
pub struct CancelVideoWorkflowTool {
    workflows: Arc<WorkflowStore>,
}

impl CancelVideoWorkflowTool {
    pub fn new(workflows: Arc<WorkflowStore>) -> Self {
        Self { workflows }
    }
}

#[async_trait]
impl Tool for CancelVideoWorkflowTool {
    fn name(&self) -> &'static str {
        "cancel_video_workflow"
    }

    fn description(&self) -> &'static str {
        "Cancel the current video upload/transcription workflow and discard its state."
    }

    fn schema(&self) -> Value {
        json!({"type": "object", "properties": {}})
    }

    async fn invoke(&self, ctx: &ToolContext, _args: Value) -> Result<String, ToolError> {
        self.workflows.reset(ctx.session_id)?;
        Ok("Video workflow cancelled. What else can I help you with?".to_string())
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use minute_core::config::RetrievalConfig;
    use minute_transcribe::MockTranscriptionService;
    use minute_vector::{InMemoryVectorStore, MockEmbedding};

    fn ctx() -> ToolContext {
        ToolContext::new(Uuid::new_v4())
    }

    fn small_chunking() -> ChunkingParams {
        ChunkingParams {
            min_size: 10,
            max_size: 80,
            overlap: 5,
        }
    }

    struct Harness {
        workflows: Arc<WorkflowStore>,
        store: Arc<InMemoryVectorStore>,
    }

    impl Harness {
        fn new() -> Self {
            Self {
                workflows: Arc::new(WorkflowStore::new()),
                store: Arc::new(InMemoryVectorStore::new(MockEmbedding::new())),
            }
        }

        fn transcribe_tool(&self) -> TranscribeVideoTool {
            TranscribeVideoTool::new(
                self.workflows.clone(),
                Arc::new(MockTranscriptionService::new()),
            )
        }

        fn upload_tool(&self) -> UploadTranscriptTool {
            UploadTranscriptTool::new(
                self.workflows.clone(),
                self.store.clone(),
                small_chunking(),
                RetrievalConfig::default(),
            )
        }
    }

    fn temp_video() -> (tempfile::TempDir, String) {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("standup.mp4");
        std::fs::write(&path, b"fake video").unwrap();
        (dir, path.to_string_lossy().to_string())
    }

    // ---- Store ----

    #[test]
    fn test_workflow_store_is_session_scoped() {
        let store = WorkflowStore::new();
        let a = Uuid::new_v4();
        let b = Uuid::new_v4();

        store
            .with_state(a, |state| state.transcript_text = Some("session a".to_string()))
            .unwrap();

        assert!(store.snapshot(a).unwrap().has_transcript());
        assert!(!store.snapshot(b).unwrap().has_transcript());
        assert_eq!(store.session_count(), 2);
    }

    #[test]
    fn test_workflow_store_reset() {
        let store = WorkflowStore::new();
        let session = Uuid::new_v4();
        store
            .with_state(session, |state| {
                state.transcript_text = Some("text".to_string());
                state.awaiting_upload = true;
            })
            .unwrap();

        store.reset(session).unwrap();
        let state = store.snapshot(session).unwrap();
        assert_eq!(state, WorkflowState::default());
    }

    // ---- request_video_upload ----

    #[tokio::test]
    async fn test_request_upload_sets_flag() {
        let harness = Harness::new();
        let tool = RequestVideoUploadTool::new(harness.workflows.clone());
        let context = ctx();

        let result = tool.invoke(&context, json!({})).await.unwrap();
        assert!(result.contains("Video upload requested"));
        assert!(harness.workflows.snapshot(context.session_id).unwrap().awaiting_upload);
    }

    // ---- transcribe_video ----

    #[tokio::test]
    async fn test_transcribe_stores_state_and_returns_transcript() {
        let harness = Harness::new();
        let tool = harness.transcribe_tool();
        let context = ctx();
        let (_dir, path) = temp_video();

        let result = tool
            .invoke(&context, json!({"video_path": path}))
            .await
            .unwrap();
        assert!(result.contains("Transcription complete for standup.mp4"));
        assert!(result.contains("SPEAKER_00"));

        let state = harness.workflows.snapshot(context.session_id).unwrap();
        assert!(state.has_transcript());
        assert_eq!(state.segments.len(), 2);
        assert_eq!(state.language.as_deref(), Some("en"));
        assert!(!state.in_progress);
    }

    #[tokio::test]
    async fn test_transcribe_missing_file_is_normal_text() {
        let harness = Harness::new();
        let tool = harness.transcribe_tool();

        let result = tool
            .invoke(&ctx(), json!({"video_path": "/nonexistent/v.mp4"}))
            .await
            .unwrap();
        assert!(result.contains("Video file not found"));
    }

    #[tokio::test]
    async fn test_transcribe_failure_clears_in_progress() {
        struct FailingTranscriber;

        #[async_trait]
        impl TranscriptionService for FailingTranscriber {
            async fn transcribe_file(
                &self,
                _path: &Path,
            ) -> Result<minute_transcribe::Transcription, minute_core::MinuteError> {
                Err(minute_core::MinuteError::Transcription("engine crashed".to_string()))
            }
        }

        let harness = Harness::new();
        let tool = TranscribeVideoTool::new(harness.workflows.clone(), Arc::new(FailingTranscriber));
        let context = ctx();
        let (_dir, path) = temp_video();

        let result = tool.invoke(&context, json!({"video_path": path})).await;
        assert!(matches!(result, Err(ToolError::Failed(_))));

        let state = harness.workflows.snapshot(context.session_id).unwrap();
        assert!(!state.in_progress);
        assert!(!state.has_transcript());
    }

    // ---- edit tools ----

    #[tokio::test]
    async fn test_request_edit_without_transcript() {
        let harness = Harness::new();
        let tool = RequestTranscriptEditTool::new(harness.workflows.clone());
        let result = tool.invoke(&ctx(), json!({})).await.unwrap();
        assert!(result.contains("No transcript available to edit"));
    }

    #[tokio::test]
    async fn test_edit_round_trip() {
        let harness = Harness::new();
        let context = ctx();
        harness
            .workflows
            .with_state(context.session_id, |state| {
                state.transcript_text = Some("original".to_string())
            })
            .unwrap();

        let request = RequestTranscriptEditTool::new(harness.workflows.clone());
        let result = request.invoke(&context, json!({})).await.unwrap();
        assert!(result.contains("editor is ready"));
        assert!(harness.workflows.snapshot(context.session_id).unwrap().editor_open);

        let apply = ApplyTranscriptEditTool::new(harness.workflows.clone());
        let result = apply
            .invoke(&context, json!({"edited_text": "corrected"}))
            .await
            .unwrap();
        assert!(result.contains("Transcript updated"));

        let state = harness.workflows.snapshot(context.session_id).unwrap();
        assert_eq!(state.transcript_text.as_deref(), Some("corrected"));
        assert!(!state.editor_open);
    }

    #[tokio::test]
    async fn test_apply_edit_empty_text() {
        let harness = Harness::new();
        let tool = ApplyTranscriptEditTool::new(harness.workflows.clone());
        let result = tool.invoke(&ctx(), json!({"edited_text": "  "})).await.unwrap();
        assert_eq!(result, "No edited text provided.");
    }

    // ---- rename_speakers ----

    #[tokio::test]
    async fn test_rename_speakers_updates_text_segments_and_mapping() {
        let harness = Harness::new();
        let tool = harness.transcribe_tool();
        let context = ctx();
        let (_dir, path) = temp_video();
        tool.invoke(&context, json!({"video_path": path})).await.unwrap();

        let rename = RenameSpeakersTool::new(harness.workflows.clone());
        let result = rename
            .invoke(
                &context,
                json!({"mapping": "SPEAKER_00=Ada Lovelace, SPEAKER_01=Grace Hopper"}),
            )
            .await
            .unwrap();
        assert!(result.contains("SPEAKER_00 -> Ada Lovelace"));

        let state = harness.workflows.snapshot(context.session_id).unwrap();
        let text = state.transcript_text.unwrap();
        assert!(text.contains("Ada Lovelace"));
        assert!(!text.contains("SPEAKER_00"));
        assert_eq!(state.segments[0].speaker, "Ada Lovelace");
        assert_eq!(state.segments[1].speaker, "Grace Hopper");
        assert_eq!(
            state.speaker_mapping.get("SPEAKER_01").map(String::as_str),
            Some("Grace Hopper")
        );
    }

    #[tokio::test]
    async fn test_rename_speakers_malformed_mapping() {
        let harness = Harness::new();
        let context = ctx();
        harness
            .workflows
            .with_state(context.session_id, |state| {
                state.transcript_text = Some("SPEAKER_00: hi".to_string())
            })
            .unwrap();

        let tool = RenameSpeakersTool::new(harness.workflows.clone());
        let result = tool
            .invoke(&context, json!({"mapping": "SPEAKER_00 Ada"}))
            .await
            .unwrap();
        assert!(result.contains("Could not parse speaker mapping"));
        // State untouched.
        let state = harness.workflows.snapshot(context.session_id).unwrap();
        assert!(state.transcript_text.unwrap().contains("SPEAKER_00"));
    }

    #[tokio::test]
    async fn test_rename_speakers_without_transcript() {
        let harness = Harness::new();
        let tool = RenameSpeakersTool::new(harness.workflows.clone());
        let result = tool
            .invoke(&ctx(), json!({"mapping": "SPEAKER_00=Ada"}))
            .await
            .unwrap();
        assert!(result.contains("No transcript available"));
    }

    // ---- upload_transcript ----

    #[tokio::test]
    async fn test_upload_without_transcript() {
        let harness = Harness::new();
        let tool = harness.upload_tool();
        let result = tool.invoke(&ctx(), json!({})).await.unwrap();
        assert!(result.contains("No transcript available to upload"));
    }

    #[tokio::test]
    async fn test_upload_chunks_stores_and_resets() {
        let harness = Harness::new();
        let context = ctx();
        let (_dir, path) = temp_video();
        harness
            .transcribe_tool()
            .invoke(&context, json!({"video_path": path}))
            .await
            .unwrap();

        let result = harness
            .upload_tool()
            .invoke(&context, json!({"title": "Weekly standup", "date": "2024-03-01"}))
            .await
            .unwrap();
        assert!(result.contains("Successfully uploaded"));
        assert!(result.contains("Meeting ID: meeting_"));
        assert!(result.contains("Date: 2024-03-01"));

        // Documents landed in the store.
        assert!(harness.store.len("default") > 0);

        // Session state reset after a successful upload.
        let state = harness.workflows.snapshot(context.session_id).unwrap();
        assert_eq!(state, WorkflowState::default());
    }

    #[tokio::test]
    async fn test_upload_carries_speaker_mapping_into_metadata() {
        let harness = Harness::new();
        let context = ctx();
        let (_dir, path) = temp_video();
        harness
            .transcribe_tool()
            .invoke(&context, json!({"video_path": path}))
            .await
            .unwrap();
        RenameSpeakersTool::new(harness.workflows.clone())
            .invoke(&context, json!({"mapping": "SPEAKER_00=Ada"}))
            .await
            .unwrap();

        harness.upload_tool().invoke(&context, json!({})).await.unwrap();

        let hits = harness
            .store
            .query("roadmap updates", 5, None, "default")
            .await
            .unwrap();
        assert!(!hits.is_empty());
        // Every document carries the mapping in its metadata.
        for hit in &hits {
            let mapping = hit.document.metadata_str("speaker_mapping").unwrap();
            assert!(mapping.contains("Ada"));
        }
        // The renamed chunk lists the real name, not the diarization label.
        let renamed = hits.iter().any(|hit| {
            hit.document
                .metadata
                .get("speakers")
                .map(|v| v.to_string().contains("Ada"))
                .unwrap_or(false)
        });
        assert!(renamed);
    }

    #[tokio::test]
    async fn test_upload_store_failure_is_unavailable() {
        struct FailingStore;

        #[async_trait]
        impl VectorStore for FailingStore {
            async fn upsert(
                &self,
                _docs: Vec<minute_core::types::IndexedDocument>,
                _ns: &str,
            ) -> minute_core::Result<()> {
                Err(minute_core::MinuteError::Store("down".to_string()))
            }

            async fn query(
                &self,
                _q: &str,
                _k: usize,
                _f: Option<&minute_core::types::MetadataFilter>,
                _ns: &str,
            ) -> minute_core::Result<Vec<minute_core::types::ScoredDocument>> {
                Ok(Vec::new())
            }

            async fn delete(
                &self,
                _f: Option<&minute_core::types::MetadataFilter>,
                _ns: &str,
            ) -> minute_core::Result<usize> {
                Ok(0)
            }
        }

        let workflows = Arc::new(WorkflowStore::new());
        let context = ctx();
        workflows
            .with_state(context.session_id, |state| {
                state.transcript_text = Some("some transcript text worth indexing".to_string())
            })
            .unwrap();

        let tool = UploadTranscriptTool::new(
            workflows.clone(),
            Arc::new(FailingStore),
            small_chunking(),
            RetrievalConfig::default(),
        );
        let result = tool.invoke(&context, json!({})).await;
        assert!(matches!(result, Err(ToolError::Unavailable(_))));

        // Failed uploads keep the transcript so the user can retry.
        assert!(workflows.snapshot(context.session_id).unwrap().has_transcript());
    }

    // ---- cancel ----

    #[tokio::test]
    async fn test_cancel_resets_state() {
        let harness = Harness::new();
        let context = ctx();
        harness
            .workflows
            .with_state(context.session_id, |state| {
                state.transcript_text = Some("text".to_string());
                state.awaiting_upload = true;
            })
            .unwrap();

        let tool = CancelVideoWorkflowTool::new(harness.workflows.clone());
        let result = tool.invoke(&context, json!({})).await.unwrap();
        assert!(result.contains("cancelled"));
        assert_eq!(
            harness.workflows.snapshot(context.session_id).unwrap(),
            WorkflowState::default()
        );
    }

    // ---- mapping parser ----

    #[test]
    fn test_parse_mapping_valid() {
        let pairs = parse_mapping("SPEAKER_00=Ada, SPEAKER_01=Grace").unwrap();
        assert_eq!(pairs.len(), 2);
        assert_eq!(pairs[0], ("SPEAKER_00".to_string(), "Ada".to_string()));
    }

    #[test]
    fn test_parse_mapping_trims_whitespace() {
        let pairs = parse_mapping("  SPEAKER_00 = Ada Lovelace ").unwrap();
        assert_eq!(pairs[0], ("SPEAKER_00".to_string(), "Ada Lovelace".to_string()));
    }

    #[test]
    fn test_parse_mapping_rejects_missing_equals() {
        assert!(parse_mapping("SPEAKER_00 Ada").is_err());
    }

    #[test]
    fn test_parse_mapping_rejects_empty_sides() {
        assert!(parse_mapping("=Ada").is_err());
        assert!(parse_mapping("SPEAKER_00=").is_err());
    }

    #[test]
    fn test_parse_mapping_empty_string() {
        assert!(parse_mapping("").unwrap().is_empty());
    }
}
