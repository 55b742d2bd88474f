//! Greedy segment grouping by speaker continuity and size bound.
//!
//! A chunk keeps absorbing segments (even across speaker changes) until it
//! has at least `min_size` characters; once "full enough" it is cut before
//! the segment that would push it past `max_size` or that changes speaker.
//! Overlap from the previous chunk is prepended afterwards and is allowed to
//! push a chunk past `max_size` by up to `overlap` characters.

use std::collections::BTreeSet;

use minute_core::config::ChunkingConfig;
use minute_core::types::{Chunk, ChunkKind, IndexedDocument, MeetingMetadata, TranscriptSegment};

use crate::document::assemble_documents;
use crate::splitter::split_fixed;

/// Size parameters for the chunking engine. All sizes are in Unicode
/// characters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChunkingParams {
    pub min_size: usize,
    pub max_size: usize,
    pub overlap: usize,
}

impl Default for ChunkingParams {
    fn default() -> Self {
        Self {
            min_size: 1500,
            max_size: 3000,
            overlap: 200,
        }
    }
}

impl From<&ChunkingConfig> for ChunkingParams {
    fn from(config: &ChunkingConfig) -> Self {
        Self {
            min_size: config.min_chunk_size,
            max_size: config.max_chunk_size,
            overlap: config.chunk_overlap,
        }
    }
}

/// Accumulation buffer for the grouping pass.
#[derive(Debug, Default)]
struct Buffer {
    text: String,
    speaker: Option<String>,
    speakers: BTreeSet<String>,
    start: f64,
    end: f64,
    segment_count: usize,
}

/// A finalized group before overlap and metadata are applied.
#[derive(Debug, Clone)]
struct RawChunk {
    text: String,
    speaker: Option<String>,
    speakers: BTreeSet<String>,
    start: f64,
    end: f64,
    segment_count: usize,
}

impl Buffer {
    fn finalize(&mut self, out: &mut Vec<RawChunk>) {
        if !self.text.trim().is_empty() {
            out.push(RawChunk {
                text: std::mem::take(&mut self.text).trim().to_string(),
                speaker: self.speaker.clone(),
                speakers: std::mem::take(&mut self.speakers),
                start: self.start,
                end: self.end,
                segment_count: self.segment_count,
            });
        } else {
            self.text.clear();
            self.speakers.clear();
        }
        self.speaker = None;
        self.start = 0.0;
        self.end = 0.0;
        self.segment_count = 0;
    }
}

/// Group transcript segments into chunks, apply overlap, and annotate.
///
/// Deterministic and infallible: segments whose text is empty after trimming
/// are silently skipped, and an empty input yields an empty output. A single
/// segment longer than `max_size` becomes its own oversized chunk; it is
/// never split mid-segment.
pub fn group_segments(segments: &[TranscriptSegment], params: &ChunkingParams) -> Vec<Chunk> {
    let mut raw: Vec<RawChunk> = Vec::new();
    let mut buffer = Buffer::default();

    for segment in segments {
        let text = segment.text.trim();
        if text.is_empty() {
            continue;
        }

        if buffer.speaker.is_none() {
            buffer.speaker = Some(segment.speaker.clone());
            buffer.start = segment.start;
        }

        let current_len = char_len(&buffer.text);
        let new_len = current_len + char_len(text) + 1;

        let over_max = new_len > params.max_size && current_len >= params.min_size;
        let speaker_change = buffer.speaker.as_deref() != Some(segment.speaker.as_str())
            && current_len >= params.min_size;

        if over_max || speaker_change {
            buffer.finalize(&mut raw);
            buffer.speaker = Some(segment.speaker.clone());
            buffer.start = segment.start;
        }

        if buffer.text.is_empty() {
            buffer.text.push_str(text);
        } else {
            buffer.text.push(' ');
            buffer.text.push_str(text);
        }
        buffer.speakers.insert(segment.speaker.clone());
        buffer.end = segment.end;
        buffer.segment_count += 1;
    }

    buffer.finalize(&mut raw);

    let with_overlap = apply_overlap(raw, params.overlap);
    annotate(with_overlap)
}

/// Prepend the trailing `overlap` characters of each chunk's predecessor.
///
/// The overlap window is taken from the predecessor's pre-overlap text, so
/// overlap never compounds across chunks.
fn apply_overlap(chunks: Vec<RawChunk>, overlap: usize) -> Vec<RawChunk> {
    if overlap == 0 || chunks.len() <= 1 {
        return chunks;
    }

    let originals: Vec<String> = chunks.iter().map(|c| c.text.clone()).collect();
    chunks
        .into_iter()
        .enumerate()
        .map(|(i, mut chunk)| {
            if i > 0 {
                let tail = tail_chars(&originals[i - 1], overlap).trim();
                if !tail.is_empty() {
                    chunk.text = format!("{} {}", tail, chunk.text);
                }
            }
            chunk
        })
        .collect()
}

fn annotate(raw: Vec<RawChunk>) -> Vec<Chunk> {
    let total_chunks = raw.len();
    raw.into_iter()
        .enumerate()
        .map(|(chunk_index, c)| {
            let kind = if c.speakers.len() == 1 {
                ChunkKind::ConversationTurn
            } else {
                ChunkKind::MixedSpeakers
            };
            Chunk {
                word_count: c.text.split_whitespace().count(),
                char_count: char_len(&c.text),
                text: c.text,
                speaker: c.speaker,
                speakers: c.speakers.into_iter().collect(),
                start: Some(c.start),
                end: Some(c.end),
                segment_count: c.segment_count,
                chunk_index,
                total_chunks,
                kind,
            }
        })
        .collect()
}

/// Chunk speaker-labeled segments and attach full meeting metadata.
pub fn chunk_segments(
    segments: &[TranscriptSegment],
    meta: &MeetingMetadata,
    params: &ChunkingParams,
) -> Vec<IndexedDocument> {
    assemble_documents(group_segments(segments, params), meta)
}

/// Chunk a transcript, preferring speaker segments when available.
///
/// With no usable segments (plain-text ingestion) the raw text is split by
/// the fixed-window fallback, ignoring speaker semantics.
pub fn chunk_transcript(
    text: &str,
    segments: &[TranscriptSegment],
    meta: &MeetingMetadata,
    params: &ChunkingParams,
) -> Vec<IndexedDocument> {
    if segments.iter().any(|s| !s.text.trim().is_empty()) {
        return chunk_segments(segments, meta, params);
    }

    let pieces = split_fixed(text, params.max_size, params.overlap);
    let total_chunks = pieces.len();
    let chunks: Vec<Chunk> = pieces
        .into_iter()
        .enumerate()
        .map(|(chunk_index, piece)| Chunk {
            word_count: piece.split_whitespace().count(),
            char_count: char_len(&piece),
            text: piece,
            speaker: None,
            speakers: Vec::new(),
            start: None,
            end: None,
            segment_count: 0,
            chunk_index,
            total_chunks,
            kind: ChunkKind::FullTranscriptChunk,
        })
        .collect();
    assemble_documents(chunks, meta)
}

fn char_len(s: &str) -> usize {
    s.chars().count()
}

/// Last `n` characters of `s`, never splitting a character.
fn tail_chars(s: &str, n: usize) -> &str {
    let count = s.chars().count();
    if count <= n {
        return s;
    }
    s.char_indices()
        .nth(count - n)
        .map(|(i, _)| &s[i..])
        .unwrap_or(s)
}
