//! Generic text ingestion: arbitrary text (notes, imported pages) chunked
//! and upserted, with missing metadata inferred through the external
//! metadata-extraction collaborator.

use std::collections::BTreeMap;
use std::sync::Arc;

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::{json, Value};

use minute_chunk::{chunk_transcript, ChunkingParams};
use minute_core::config::RetrievalConfig;
use minute_core::error::MinuteError;
use minute_core::types::MeetingMetadata;
use minute_vector::VectorStore;

use crate::error::ToolError;
use crate::registry::{parse_args, Tool, ToolContext};

// =============================================================================
// Metadata extraction collaborator
// =============================================================================

/// Metadata inferred from raw text by the extraction collaborator.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ExtractedMetadata {
    pub title: Option<String>,
    pub summary: Option<String>,
    /// YYYY-MM-DD, when the text mentions one.
    pub meeting_date: Option<String>,
    pub speaker_mapping: BTreeMap<String, String>,
}

/// External service that infers title/summary/date/speaker identities from
/// a transcript. Backed by a language model in production.
#[async_trait]
pub trait MetadataExtractor: Send + Sync {
    async fn extract(&self, text: &str) -> Result<ExtractedMetadata, MinuteError>;
}

/// Rule-based extractor used for tests and local runs: the first non-empty
/// line becomes the title, the first two sentences the summary.
#[derive(Debug, Clone, Default)]
pub struct HeuristicMetadataExtractor;

impl HeuristicMetadataExtractor {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl MetadataExtractor for HeuristicMetadataExtractor {
    async fn extract(&self, text: &str) -> Result<ExtractedMetadata, MinuteError> {
        let title = text
            .lines()
            .map(str::trim)
            .find(|line| !line.is_empty())
            .map(|line| {
                let mut t: String = line.chars().take(60).collect();
                if line.chars().count() > 60 {
                    t.push('…');
                }
                t
            });

        let summary = {
            let sentences: Vec<&str> = text
                .split_terminator(['.', '!', '?'])
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .take(2)
                .collect();
            if sentences.is_empty() {
                None
            } else {
                Some(format!("{}.", sentences.join(". ")))
            }
        };

        Ok(ExtractedMetadata {
            title,
            summary,
            meeting_date: None,
            speaker_mapping: BTreeMap::new(),
        })
    }
}

// =============================================================================
// Shared ingestion path
// =============================================================================

/// Chunk text (fallback splitter, no speaker data) and upsert it.
///
/// Shared by `save_text` and `import_document` so an imported page and a
/// hand-typed note land in the store identically.
pub(crate) async fn ingest_document_text(
    store: &Arc<dyn VectorStore>,
    extractor: &Arc<dyn MetadataExtractor>,
    chunking: &ChunkingParams,
    retrieval: &RetrievalConfig,
    text: &str,
    title: &str,
    source: &str,
    date: Option<String>,
) -> Result<String, ToolError> {
    // Extraction failure degrades to defaults; it never fails the ingestion.
    let extracted = match extractor.extract(text).await {
        Ok(extracted) => extracted,
        Err(e) => {
            tracing::warn!(error = %e, "Metadata extraction failed; using defaults");
            ExtractedMetadata::default()
        }
    };

    let document_id = MeetingMetadata::new_document_id();
    let meeting_date = date
        .or(extracted.meeting_date)
        .unwrap_or_else(MeetingMetadata::today);

    let mut meta = MeetingMetadata::new(document_id.clone(), meeting_date);
    meta.meeting_title = title.to_string();
    meta.summary = extracted
        .summary
        .unwrap_or_else(|| format!("Imported from {}", source));
    meta.source = source.to_string();
    meta.source_file = format!("{}_upload", source.to_lowercase().replace(' ', "_"));
    meta.transcription_model = "text_import".to_string();
    meta.speaker_mapping = extracted.speaker_mapping;
    meta.date_transcribed = MeetingMetadata::today();

    let docs = chunk_transcript(text, &[], &meta, chunking);
    if docs.is_empty() {
        return Ok("The provided text is empty; nothing to save.".to_string());
    }
    let count = docs.len();

    store
        .upsert(docs, &retrieval.namespace)
        .await
        .map_err(|e| ToolError::Unavailable(format!("Vector store upsert failed: {}", e)))?;

    tracing::info!(document_id = %document_id, chunks = count, source, "Text ingested");

    Ok(format!(
        "Successfully saved '{}' ({} chunks, ID: {}).",
        title, count, document_id
    ))
}

// =============================================================================
// save_text
// =============================================================================

/// Save arbitrary text content (notes, pasted documents) into the index.
pub struct SaveTextTool {
    store: Arc<dyn VectorStore>,
    extractor: Arc<dyn MetadataExtractor>,
    chunking: ChunkingParams,
    retrieval: RetrievalConfig,
}

impl SaveTextTool {
    pub fn new(
        store: Arc<dyn VectorStore>,
        extractor: Arc<dyn MetadataExtractor>,
        chunking: ChunkingParams,
        retrieval: RetrievalConfig,
    ) -> Self {
        Self {
            store,
            extractor,
            chunking,
            retrieval,
        }
    }
}

#[derive(Debug, Deserialize)]
struct SaveTextArgs {
    text: String,
    title: String,
    #[serde(default)]
    source: Option<String>,
    #[serde(default)]
    date: Option<String>,
}

#[async_trait]
impl Tool for SaveTextTool {
    fn name(&self) -> &'static str {
        "save_text"
    }

    fn description(&self) -> &'static str {
        "Save arbitrary text content (meeting notes, documents) into the index. \
         Pass the full raw text without summarizing it."
    }

    fn schema(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "text": {"type": "string", "description": "The full content to save."},
                "title": {"type": "string", "description": "Title of the document."},
                "source": {"type": "string", "description": "Where the content came from (default \"Manual Entry\")."},
                "date": {"type": "string", "description": "Content date, YYYY-MM-DD. Defaults to today."},
            },
            "required": ["text", "title"],
        })
    }

    async fn invoke(&self, _ctx: &ToolContext, args: Value) -> Result<String, ToolError> {
        let args: SaveTextArgs = parse_args(args)?;
        if args.text.trim().is_empty() {
            return Ok("No text provided to save.".to_string());
        }
        let source = args.source.as_deref().unwrap_or("Manual Entry");

        ingest_document_text(
            &self.store,
            &self.extractor,
            &self.chunking,
            &self.retrieval,
            &args.text,
            &args.title,
            source,
            args.date,
        )
        .await
    }
}

// =============================================================================
// Tests
// =============================================================================
