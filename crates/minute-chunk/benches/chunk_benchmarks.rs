use criterion::{black_box, criterion_group, criterion_main, Criterion};

use minute_chunk::{chunk_segments, ChunkingParams};
use minute_core::types::{MeetingMetadata, TranscriptSegment};

fn synthetic_transcript(segments: usize) -> Vec<TranscriptSegment> {
    (0..segments)
        .map(|i| {
            let speaker = format!("SPEAKER_{:02}", i % 4);
            TranscriptSegment {
                text: format!(
                    "This is utterance number {} where someone keeps talking about the \
                     quarterly roadmap and the action items from last week.",
                    i
                ),
                start: i as f64 * 5.0,
                end: i as f64 * 5.0 + 4.5,
                speaker,
            }
        })
        .collect()
}

fn bench_chunking(c: &mut Criterion) {
    let meta = MeetingMetadata::new("meeting_ab12cd34".to_string(), "2024-03-01".to_string());
    let params = ChunkingParams::default();

    let small = synthetic_transcript(100);
    c.bench_function("chunk_100_segments", |b| {
        b.iter(|| chunk_segments(black_box(&small), &meta, &params))
    });

    let large = synthetic_transcript(2000);
    c.bench_function("chunk_2000_segments", |b| {
        b.iter(|| chunk_segments(black_box(&large), &meta, &params))
    });
}

criterion_group!(benches, bench_chunking);
criterion_main!(benches);
