//! Document assembly: flatten a chunk and its meeting metadata into the
//! persisted [`IndexedDocument`] shape.

use serde_json::{json, Map, Value};

use minute_core::types::{Chunk, ChunkKind, IndexedDocument, MeetingMetadata};

/// Attach the full meeting metadata to every chunk and produce the persisted
/// documents. Document ids are `{meeting_id}_{chunk_index}` so that identical
/// inputs always produce identical output and re-ingestion upserts in place.
pub fn assemble_documents(chunks: Vec<Chunk>, meta: &MeetingMetadata) -> Vec<IndexedDocument> {
    let speaker_mapping_json =
        serde_json::to_string(&meta.speaker_mapping).unwrap_or_else(|_| "{}".to_string());

    chunks
        .into_iter()
        .map(|chunk| {
            let mut fields = Map::new();

            // Meeting identification.
            fields.insert("meeting_id".into(), json!(meta.meeting_id));
            fields.insert("meeting_date".into(), json!(meta.meeting_date));
            fields.insert("meeting_title".into(), json!(meta.meeting_title));
            fields.insert("summary".into(), json!(meta.summary));

            // Temporal and speaker information (absent on fallback chunks).
            if let (Some(start), Some(end)) = (chunk.start, chunk.end) {
                fields.insert("start_time".into(), json!(start));
                fields.insert("end_time".into(), json!(end));
                fields.insert("duration".into(), json!(end - start));
                fields.insert("start_time_formatted".into(), json!(format_timestamp(start)));
                fields.insert("end_time_formatted".into(), json!(format_timestamp(end)));
            }
            if chunk.kind != ChunkKind::FullTranscriptChunk {
                fields.insert("speaker".into(), json!(chunk.speaker));
                fields.insert("speaker_count".into(), json!(chunk.speakers.len()));
                fields.insert("speakers".into(), json!(chunk.speakers));
                fields.insert("segment_count".into(), json!(chunk.segment_count));
            }
            fields.insert(
                "meeting_duration".into(),
                match meta.duration_secs {
                    Some(secs) => json!(secs),
                    None => json!("N/A"),
                },
            );
            fields.insert("speaker_mapping".into(), json!(speaker_mapping_json));

            // Content metadata.
            fields.insert("chunk_type".into(), json!(chunk.kind.as_str()));
            fields.insert("chunk_index".into(), json!(chunk.chunk_index));
            fields.insert("total_chunks".into(), json!(chunk.total_chunks));
            fields.insert("word_count".into(), json!(chunk.word_count));
            fields.insert("char_count".into(), json!(chunk.char_count));

            // Source information.
            fields.insert("source".into(), json!(meta.source));
            fields.insert("source_file".into(), json!(meta.source_file));
            fields.insert(
                "transcription_model".into(),
                json!(meta.transcription_model),
            );
            fields.insert("language".into(), json!(meta.language));
            fields.insert("date_transcribed".into(), json!(meta.date_transcribed));

            IndexedDocument {
                id: format!("{}_{}", meta.meeting_id, chunk.chunk_index),
                text: chunk.text,
                metadata: Value::Object(fields),
            }
        })
        .collect()
}

/// Convert seconds to MM:SS.
pub fn format_timestamp(seconds: f64) -> String {
    let total = if seconds.is_finite() && seconds > 0.0 {
        seconds as u64
    } else {
        0
    };
    format!("{:02}:{:02}", total / 60, total % 60)
}
