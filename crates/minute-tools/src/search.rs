//! Search-side tools: semantic search, per-meeting metadata, and the
//! recent-meetings listing.

use std::sync::Arc;

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::{json, Value};

use minute_core::config::RetrievalConfig;
use minute_core::types::{MetadataFilter, ScoredDocument};
use minute_vector::{planner, VectorStore};

use crate::error::ToolError;
use crate::registry::{parse_args, Tool, ToolContext};

fn meta_display(doc: &ScoredDocument, field: &str) -> String {
    match doc.document.metadata.get(field) {
        Some(Value::String(s)) if !s.is_empty() => s.clone(),
        Some(Value::Number(n)) => n.to_string(),
        _ => "N/A".to_string(),
    }
}

// =============================================================================
// search_meetings
// =============================================================================

/// Semantic search over indexed meeting chunks.
///
/// Without explicit arguments the retrieval plan comes from the query
/// planner; `max_results` and `meeting_id` act as overrides.
pub struct SearchMeetingsTool {
    store: Arc<dyn VectorStore>,
    retrieval: RetrievalConfig,
}

impl SearchMeetingsTool {
    pub fn new(store: Arc<dyn VectorStore>, retrieval: RetrievalConfig) -> Self {
        Self { store, retrieval }
    }
}

#[derive(Debug, Deserialize)]
struct SearchArgs {
    query: String,
    #[serde(default)]
    max_results: Option<usize>,
    #[serde(default)]
    meeting_id: Option<String>,
}

#[async_trait]
impl Tool for SearchMeetingsTool {
    fn name(&self) -> &'static str {
        "search_meetings"
    }

    fn description(&self) -> &'static str {
        "Search meeting transcripts for relevant information using semantic search. \
         Optionally cap the result count or restrict to one meeting id \
         (e.g. \"meeting_ab12cd34\"; never an index like \"1\")."
    }

    fn schema(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "query": {"type": "string", "description": "The search query or question."},
                "max_results": {"type": "integer", "description": "Maximum number of passages to return."},
                "meeting_id": {"type": "string", "description": "Restrict the search to this meeting id."},
            },
            "required": ["query"],
        })
    }

    async fn invoke(&self, _ctx: &ToolContext, args: Value) -> Result<String, ToolError> {
        let args: SearchArgs = parse_args(args)?;
        if args.query.trim().is_empty() {
            return Ok("Search query is empty; nothing to search for.".to_string());
        }

        let mut plan = planner::plan(&args.query, &self.retrieval);
        if let Some(k) = args.max_results {
            plan.k = k;
        }
        if let Some(id) = &args.meeting_id {
            plan.filter = Some(MetadataFilter::meeting(id));
        }

        let hits = self
            .store
            .query(&args.query, plan.k, plan.filter.as_ref(), &self.retrieval.namespace)
            .await
            .map_err(|e| ToolError::Unavailable(format!("Vector store query failed: {}", e)))?;

        if hits.is_empty() {
            return Ok("No relevant meeting segments found for your query.".to_string());
        }

        let mut parts = vec![format!("Found {} relevant meeting segments:\n", hits.len())];
        for (i, hit) in hits.iter().enumerate() {
            let chunk_index = hit
                .document
                .metadata_u64("chunk_index")
                .map(|v| (v + 1).to_string())
                .unwrap_or_else(|| "?".to_string());
            let total = hit
                .document
                .metadata_u64("total_chunks")
                .map(|v| v.to_string())
                .unwrap_or_else(|| "?".to_string());
            parts.push(format!(
                "\n--- Segment {} ---\nMeeting: {} (Date: {})\nChunk: {}/{}\nContent:\n{}\n",
                i + 1,
                meta_display(hit, "meeting_id"),
                meta_display(hit, "meeting_date"),
                chunk_index,
                total,
                hit.document.text,
            ));
        }
        Ok(parts.concat())
    }
}

// =============================================================================
// get_meeting_metadata
// =============================================================================

/// Fetch one stored document for a meeting and surface its metadata.
pub struct GetMeetingMetadataTool {
    store: Arc<dyn VectorStore>,
    retrieval: RetrievalConfig,
}

impl GetMeetingMetadataTool {
    pub fn new(store: Arc<dyn VectorStore>, retrieval: RetrievalConfig) -> Self {
        Self { store, retrieval }
    }
}

#[derive(Debug, Deserialize)]
struct MetadataArgs {
    meeting_id: String,
}

#[async_trait]
impl Tool for GetMeetingMetadataTool {
    fn name(&self) -> &'static str {
        "get_meeting_metadata"
    }

    fn description(&self) -> &'static str {
        "Retrieve metadata and summary information for a specific meeting by its id."
    }

    fn schema(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "meeting_id": {"type": "string", "description": "The meeting id, e.g. \"meeting_ab12cd34\"."},
            },
            "required": ["meeting_id"],
        })
    }

    async fn invoke(&self, _ctx: &ToolContext, args: Value) -> Result<String, ToolError> {
        let args: MetadataArgs = parse_args(args)?;
        let filter = MetadataFilter::meeting(&args.meeting_id);

        // Any chunk of the meeting carries the full metadata; probe for one.
        let hits = self
            .store
            .query("meeting content", 1, Some(&filter), &self.retrieval.namespace)
            .await
            .map_err(|e| ToolError::Unavailable(format!("Vector store query failed: {}", e)))?;

        let Some(hit) = hits.first() else {
            return Ok(format!("No meeting found with ID: {}", args.meeting_id));
        };

        Ok(format!(
            "Meeting Information for {}:\n\
             - Date: {}\n\
             - Title: {}\n\
             - Summary: {}\n\
             - Source: {}\n\
             - Source File: {}\n\
             - Language: {}\n\
             - Transcription Model: {}\n\
             - Duration: {}",
            args.meeting_id,
            meta_display(hit, "meeting_date"),
            meta_display(hit, "meeting_title"),
            meta_display(hit, "summary"),
            meta_display(hit, "source"),
            meta_display(hit, "source_file"),
            meta_display(hit, "language"),
            meta_display(hit, "transcription_model"),
            meta_display(hit, "meeting_duration"),
        ))
    }
}

// =============================================================================
// list_recent_meetings
// =============================================================================

/// Scan a bounded sample of stored documents and list distinct meetings.
pub struct ListRecentMeetingsTool {
    store: Arc<dyn VectorStore>,
    retrieval: RetrievalConfig,
}

impl ListRecentMeetingsTool {
    pub fn new(store: Arc<dyn VectorStore>, retrieval: RetrievalConfig) -> Self {
        Self { store, retrieval }
    }
}

#[derive(Debug, Deserialize)]
struct ListArgs {
    #[serde(default)]
    limit: Option<usize>,
}

#[async_trait]
impl Tool for ListRecentMeetingsTool {
    fn name(&self) -> &'static str {
        "list_recent_meetings"
    }

    fn description(&self) -> &'static str {
        "List the meetings currently stored in the system, with ids, dates, and titles."
    }

    fn schema(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "limit": {"type": "integer", "description": "Maximum number of meetings to return (default 10)."},
            },
        })
    }

    async fn invoke(&self, _ctx: &ToolContext, args: Value) -> Result<String, ToolError> {
        let args: ListArgs = parse_args(args)?;
        let limit = args.limit.unwrap_or(10).max(1);

        let hits = self
            .store
            .query("meeting", self.retrieval.list_scan_k, None, &self.retrieval.namespace)
            .await
            .map_err(|e| ToolError::Unavailable(format!("Vector store query failed: {}", e)))?;

        if hits.is_empty() {
            return Ok("No meetings found in the system.".to_string());
        }

        // De-duplicate by meeting id, preserving first-seen order.
        let mut seen: Vec<(String, String, String, String)> = Vec::new();
        for hit in &hits {
            let Some(meeting_id) = hit.document.metadata_str("meeting_id") else {
                continue;
            };
            if seen.iter().any(|(id, ..)| id == meeting_id) {
                continue;
            }
            seen.push((
                meeting_id.to_string(),
                meta_display(hit, "meeting_date"),
                meta_display(hit, "meeting_title"),
                meta_display(hit, "source_file"),
            ));
            if seen.len() >= limit {
                break;
            }
        }

        if seen.is_empty() {
            return Ok("No meetings found in the system.".to_string());
        }

        let mut parts = vec![format!("Found {} recent meetings:\n", seen.len())];
        for (i, (id, date, title, source_file)) in seen.iter().enumerate() {
            parts.push(format!(
                "\n{}. {}\n   Date: {}\n   Title: {}\n   Source: {}",
                i + 1,
                id,
                date,
                title,
                source_file,
            ));
        }
        Ok(parts.concat())
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use minute_core::types::{MeetingMetadata, TranscriptSegment};
    use minute_chunk::{chunk_segments, ChunkingParams};
    use minute_vector::{InMemoryVectorStore, MockEmbedding};
    use uuid::Uuid;

    fn ctx() -> ToolContext {
        ToolContext::new(Uuid::new_v4())
    }

    async fn seeded_store() -> Arc<dyn VectorStore> {
        let store = Arc::new(InMemoryVectorStore::new(MockEmbedding::new()));

        for (id, date, title) in [
            ("meeting_aaaaaaaa", "2024-03-01", "Planning"),
            ("meeting_bbbbbbbb", "2024-03-08", "Retro"),
        ] {
            let mut meta = MeetingMetadata::new(id.to_string(), date.to_string());
            meta.meeting_title = title.to_string();
            meta.source = "video_upload".to_string();
            meta.source_file = format!("{}.mp4", title.to_lowercase());
            let segments = vec![
                TranscriptSegment {
                    text: format!("{} discussion about the budget and roadmap", title),
                    start: 0.0,
                    end: 5.0,
                    speaker: "SPEAKER_00".to_string(),
                },
                TranscriptSegment {
                    text: "Action items were assigned to the team".to_string(),
                    start: 5.0,
                    end: 9.0,
                    speaker: "SPEAKER_01".to_string(),
                },
            ];
            let docs = chunk_segments(
                &segments,
                &meta,
                &ChunkingParams {
                    min_size: 10,
                    max_size: 60,
                    overlap: 5,
                },
            );
            store.upsert(docs, "default").await.unwrap();
        }

        store
    }

    #[tokio::test]
    async fn test_search_returns_formatted_segments() {
        let store = seeded_store().await;
        let tool = SearchMeetingsTool::new(store, RetrievalConfig::default());

        let result = tool
            .invoke(&ctx(), json!({"query": "budget roadmap"}))
            .await
            .unwrap();
        assert!(result.starts_with("Found"));
        assert!(result.contains("--- Segment 1 ---"));
        assert!(result.contains("Meeting: meeting_"));
        assert!(result.contains("Date: 2024-03-"));
        assert!(result.contains("Content:"));
    }

    #[tokio::test]
    async fn test_search_meeting_id_override_filters() {
        let store = seeded_store().await;
        let tool = SearchMeetingsTool::new(store, RetrievalConfig::default());

        let result = tool
            .invoke(
                &ctx(),
                json!({"query": "discussion", "meeting_id": "meeting_bbbbbbbb"}),
            )
            .await
            .unwrap();
        assert!(result.contains("meeting_bbbbbbbb"));
        assert!(!result.contains("meeting_aaaaaaaa"));
    }

    #[tokio::test]
    async fn test_search_max_results_override() {
        let store = seeded_store().await;
        let tool = SearchMeetingsTool::new(store, RetrievalConfig::default());

        let result = tool
            .invoke(&ctx(), json!({"query": "discussion", "max_results": 1}))
            .await
            .unwrap();
        assert!(result.contains("Found 1 relevant meeting segments"));
    }

    #[tokio::test]
    async fn test_search_empty_store() {
        let store: Arc<dyn VectorStore> = Arc::new(InMemoryVectorStore::new(MockEmbedding::new()));
        let tool = SearchMeetingsTool::new(store, RetrievalConfig::default());

        let result = tool
            .invoke(&ctx(), json!({"query": "anything"}))
            .await
            .unwrap();
        assert_eq!(result, "No relevant meeting segments found for your query.");
    }

    #[tokio::test]
    async fn test_search_blank_query_is_validation_text() {
        let store = seeded_store().await;
        let tool = SearchMeetingsTool::new(store, RetrievalConfig::default());
        let result = tool.invoke(&ctx(), json!({"query": "   "})).await.unwrap();
        assert!(result.contains("empty"));
    }

    #[tokio::test]
    async fn test_search_missing_query_is_invalid_arguments() {
        let store = seeded_store().await;
        let tool = SearchMeetingsTool::new(store, RetrievalConfig::default());
        let result = tool.invoke(&ctx(), json!({})).await;
        assert!(matches!(result, Err(ToolError::InvalidArguments(_))));
    }

    #[tokio::test]
    async fn test_get_metadata_found() {
        let store = seeded_store().await;
        let tool = GetMeetingMetadataTool::new(store, RetrievalConfig::default());

        let result = tool
            .invoke(&ctx(), json!({"meeting_id": "meeting_aaaaaaaa"}))
            .await
            .unwrap();
        assert!(result.contains("Meeting Information for meeting_aaaaaaaa"));
        assert!(result.contains("- Date: 2024-03-01"));
        assert!(result.contains("- Title: Planning"));
        assert!(result.contains("- Source: video_upload"));
        assert!(result.contains("- Language: en"));
    }

    #[tokio::test]
    async fn test_get_metadata_not_found_is_normal_text() {
        let store = seeded_store().await;
        let tool = GetMeetingMetadataTool::new(store, RetrievalConfig::default());

        let result = tool
            .invoke(&ctx(), json!({"meeting_id": "meeting_ffffffff"}))
            .await
            .unwrap();
        assert_eq!(result, "No meeting found with ID: meeting_ffffffff");
    }

    #[tokio::test]
    async fn test_list_recent_meetings() {
        let store = seeded_store().await;
        let tool = ListRecentMeetingsTool::new(store, RetrievalConfig::default());

        let result = tool.invoke(&ctx(), json!({})).await.unwrap();
        assert!(result.starts_with("Found 2 recent meetings"));
        assert!(result.contains("meeting_aaaaaaaa"));
        assert!(result.contains("meeting_bbbbbbbb"));
        // De-duplicated: each id appears exactly once.
        assert_eq!(result.matches("meeting_aaaaaaaa").count(), 1);
    }

    #[tokio::test]
    async fn test_list_respects_limit() {
        let store = seeded_store().await;
        let tool = ListRecentMeetingsTool::new(store, RetrievalConfig::default());

        let result = tool.invoke(&ctx(), json!({"limit": 1})).await.unwrap();
        assert!(result.starts_with("Found 1 recent meetings"));
    }

    #[tokio::test]
    async fn test_list_empty_store() {
        let store: Arc<dyn VectorStore> = Arc::new(InMemoryVectorStore::new(MockEmbedding::new()));
        let tool = ListRecentMeetingsTool::new(store, RetrievalConfig::default());
        let result = tool.invoke(&ctx(), json!({})).await.unwrap();
        assert_eq!(result, "No meetings found in the system.");
    }
}
