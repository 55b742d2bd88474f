//! Transcription collaborator contract.
//!
//! The speech-to-text/diarization engine runs out of process; this crate
//! defines the narrow interface the rest of the system talks to, plus a mock
//! implementation for tests and local development. On failure the
//! collaborator reports a textual error and never returns partial segments.

use std::path::Path;

use async_trait::async_trait;

use minute_core::error::MinuteError;
use minute_core::types::TranscriptSegment;

// =============================================================================
// Result type
// =============================================================================

/// The complete result of transcribing one recording.
#[derive(Debug, Clone, PartialEq)]
pub struct Transcription {
    /// Ordered, speaker-attributed segments covering the recording.
    pub segments: Vec<TranscriptSegment>,
    /// Detected language code (e.g., "en").
    pub language: String,
    /// Total recording duration in seconds.
    pub duration_secs: f64,
}

// =============================================================================
// Trait
// =============================================================================

/// Service for transcribing a media file into speaker-labeled segments.
#[async_trait]
pub trait TranscriptionService: Send + Sync {
    /// Transcribe the file at `path`.
    ///
    /// Implementations must either return the full ordered segment list or
    /// an error; a failed run never yields partial segments.
    async fn transcribe_file(&self, path: &Path) -> Result<Transcription, MinuteError>;
}

// =============================================================================
// Mock implementation
// =============================================================================

/// Mock transcription service returning a fixed two-speaker exchange.
///
/// Fails when the file does not exist, mirroring the real engine's contract.
#[derive(Debug, Clone, Default)]
pub struct MockTranscriptionService;

impl MockTranscriptionService {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl TranscriptionService for MockTranscriptionService {
    async fn transcribe_file(&self, path: &Path) -> Result<Transcription, MinuteError> {
        if !path.exists() {
            return Err(MinuteError::Transcription(format!(
                "Input file not found: {}",
                path.display()
            )));
        }

        tracing::debug!(path = %path.display(), "Mock transcription generated");

        let segments = vec![
            TranscriptSegment {
                text: "Thanks everyone for joining, let's get started.".to_string(),
                start: 0.0,
                end: 4.0,
                speaker: "SPEAKER_00".to_string(),
            },
            TranscriptSegment {
                text: "Sounds good, I have two updates on the roadmap.".to_string(),
                start: 4.0,
                end: 9.5,
                speaker: "SPEAKER_01".to_string(),
            },
        ];

        Ok(Transcription {
            segments,
            language: "en".to_string(),
            duration_secs: 9.5,
        })
    }
}

// =============================================================================
// Rendering
// =============================================================================

/// Render segments as the editable transcript shown to users:
/// one `[MM:SS - MM:SS] SPEAKER: text` line per segment.
pub fn format_transcript(segments: &[TranscriptSegment]) -> String {
    segments
        .iter()
        .map(|s| {
            format!(
                "[{} - {}] {}: {}",
                mmss(s.start),
                mmss(s.end),
                s.speaker,
                s.text.trim()
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}

fn mmss(seconds: f64) -> String {
    let total = if seconds.is_finite() && seconds > 0.0 {
        seconds as u64
    } else {
        0
    };
    format!("{:02}:{:02}", total / 60, total % 60)
}

// =============================================================================
// Tests
// =============================================================================
