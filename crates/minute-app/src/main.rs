//! Minute application binary - composition root.
//!
//! Wires the crates together: configuration, the chunking engine, the
//! retrieval stack, the tool registry, and the conversational turn runner.
//! Collaborator construction happens up front; any failure there is fatal
//! and the process exits before serving a single turn.
//!
//! The external engines (vector database, transcription, language model,
//! document store) run out of process; their in-crate mock implementations
//! are wired here so the full loop can be exercised locally.

mod cli;

use std::io::BufRead;
use std::sync::Arc;

use clap::Parser;
use tracing_subscriber::EnvFilter;
use uuid::Uuid;

use minute_agent::{HistoryRecord, HistoryInput, MockLanguageModel, TurnOutcome, TurnRunner};
use minute_chunk::{chunk_segments, ChunkingParams};
use minute_core::error::{MinuteError, Result};
use minute_core::events::AgentEvent;
use minute_core::types::{MeetingMetadata, TranscriptSegment};
use minute_core::MinuteConfig;
use minute_tools::{
    ApplyTranscriptEditTool, CancelVideoWorkflowTool, GetMeetingMetadataTool,
    HeuristicMetadataExtractor, ImportDocumentTool, InMemoryDocumentStore, ListRecentMeetingsTool,
    RenameSpeakersTool, RequestTranscriptEditTool, RequestVideoUploadTool, SaveTextTool,
    SearchMeetingsTool, ToolRegistry, TranscribeVideoTool, UploadTranscriptTool, WorkflowStore,
};
use minute_transcribe::MockTranscriptionService;
use minute_vector::{InMemoryVectorStore, MockEmbedding, VectorStore};

use cli::{CliArgs, Command};

#[tokio::main]
async fn main() {
    let args = CliArgs::parse();

    let config_path = args.resolve_config_path();
    let config = MinuteConfig::load_or_default(&config_path);

    let log_level = args.resolve_log_level(&config.general.log_level);
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(log_level)),
        )
        .init();

    if let Err(e) = run(args, config).await {
        tracing::error!(error = %e, "Fatal error");
        eprintln!("minute: {}", e);
        std::process::exit(1);
    }
}

async fn run(args: CliArgs, config: MinuteConfig) -> Result<()> {
    validate_config(&config)?;

    match args.command {
        Command::Chunk { file } => cmd_chunk(&file, &config),
        Command::Plan { query } => {
            let plan = minute_vector::plan(&query, &config.retrieval);
            match plan.filter {
                Some(filter) => println!("k = {}, filter = {:?}", plan.k, filter),
                None => println!("k = {}, no filter", plan.k),
            }
            Ok(())
        }
        Command::Chat => cmd_chat(&config).await,
    }
}

/// Reject configurations no subsystem could run with. Startup-fatal.
fn validate_config(config: &MinuteConfig) -> Result<()> {
    let chunking = &config.chunking;
    if chunking.max_chunk_size == 0 || chunking.min_chunk_size >= chunking.max_chunk_size {
        return Err(MinuteError::Config(format!(
            "min_chunk_size ({}) must be smaller than max_chunk_size ({})",
            chunking.min_chunk_size, chunking.max_chunk_size
        )));
    }
    if config.agent.max_iterations == 0 {
        return Err(MinuteError::Config(
            "agent.max_iterations must be at least 1".to_string(),
        ));
    }
    Ok(())
}

/// Construct every collaborator and register the full tool set.
fn build_registry(config: &MinuteConfig) -> Arc<ToolRegistry> {
    let store: Arc<dyn VectorStore> = Arc::new(InMemoryVectorStore::new(MockEmbedding::new()));
    let transcriber = Arc::new(MockTranscriptionService::new());
    let extractor = Arc::new(HeuristicMetadataExtractor::new());
    let documents = Arc::new(InMemoryDocumentStore::new());
    let workflows = Arc::new(WorkflowStore::new());

    let chunking = ChunkingParams::from(&config.chunking);
    let retrieval = config.retrieval.clone();

    let mut registry = ToolRegistry::new();
    registry.register(Arc::new(SearchMeetingsTool::new(
        store.clone(),
        retrieval.clone(),
    )));
    registry.register(Arc::new(GetMeetingMetadataTool::new(
        store.clone(),
        retrieval.clone(),
    )));
    registry.register(Arc::new(ListRecentMeetingsTool::new(
        store.clone(),
        retrieval.clone(),
    )));
    registry.register(Arc::new(RequestVideoUploadTool::new(workflows.clone())));
    registry.register(Arc::new(TranscribeVideoTool::new(
        workflows.clone(),
        transcriber,
    )));
    registry.register(Arc::new(RequestTranscriptEditTool::new(workflows.clone())));
    registry.register(Arc::new(ApplyTranscriptEditTool::new(workflows.clone())));
    registry.register(Arc::new(RenameSpeakersTool::new(workflows.clone())));
    registry.register(Arc::new(UploadTranscriptTool::new(
        workflows.clone(),
        store.clone(),
        chunking,
        retrieval.clone(),
    )));
    registry.register(Arc::new(CancelVideoWorkflowTool::new(workflows)));
    registry.register(Arc::new(SaveTextTool::new(
        store.clone(),
        extractor.clone(),
        chunking,
        retrieval.clone(),
    )));
    registry.register(Arc::new(ImportDocumentTool::new(
        documents,
        store,
        extractor,
        chunking,
        retrieval,
    )));

    Arc::new(registry)
}

fn cmd_chunk(file: &std::path::Path, config: &MinuteConfig) -> Result<()> {
    let content = std::fs::read_to_string(file)?;
    let segments: Vec<TranscriptSegment> = serde_json::from_str(&content)?;

    let meta = MeetingMetadata::new(
        MeetingMetadata::new_meeting_id(),
        MeetingMetadata::today(),
    );
    let params = ChunkingParams::from(&config.chunking);
    let docs = chunk_segments(&segments, &meta, &params);

    println!(
        "{} segments -> {} chunks (min {}, max {}, overlap {})",
        segments.len(),
        docs.len(),
        params.min_size,
        params.max_size,
        params.overlap
    );
    for doc in &docs {
        println!(
            "  [{}] {} chars, {} words, speakers: {}, type: {}",
            doc.metadata_u64("chunk_index").unwrap_or(0),
            doc.metadata_u64("char_count").unwrap_or(0),
            doc.metadata_u64("word_count").unwrap_or(0),
            doc.metadata
                .get("speakers")
                .map(|v| v.to_string())
                .unwrap_or_else(|| "[]".to_string()),
            doc.metadata_str("chunk_type").unwrap_or("?"),
        );
    }
    Ok(())
}

async fn cmd_chat(config: &MinuteConfig) -> Result<()> {
    let registry = build_registry(config);
    let model = Arc::new(MockLanguageModel::new());
    let runner = TurnRunner::new(model, registry, config.agent.max_iterations);

    let session_id = Uuid::new_v4();
    let mut history: Vec<HistoryRecord> = Vec::new();

    println!("minute chat (session {}). Empty line to exit.", session_id);

    let stdin = std::io::stdin();
    for line in stdin.lock().lines() {
        let line = line?;
        let message = line.trim();
        if message.is_empty() {
            break;
        }

        let (tx, mut rx) = tokio::sync::mpsc::channel(64);
        let printer = tokio::spawn(async move {
            while let Some(event) = rx.recv().await {
                match event {
                    AgentEvent::ToolStarted { name, category } => {
                        println!("  [{}] {}", category.progress_label(), name);
                    }
                    AgentEvent::TurnFailed { message } => {
                        println!("  error: {}", message);
                    }
                    _ => {}
                }
            }
        });

        let outcome = runner
            .run_turn(
                message,
                &HistoryInput::Records(history.clone()),
                session_id,
                &tx,
            )
            .await;
        drop(tx);
        let _ = printer.await;

        match outcome {
            TurnOutcome::Answer(answer) => {
                println!("{}", answer);
                history.push(HistoryRecord {
                    role: "user".to_string(),
                    content: message.to_string(),
                });
                history.push(HistoryRecord {
                    role: "assistant".to_string(),
                    content: answer,
                });
            }
            TurnOutcome::Stopped { iterations } => {
                println!("(stopped after {} model calls)", iterations);
            }
            TurnOutcome::Failed(message) => {
                println!("(turn failed: {})", message);
            }
        }
    }

    Ok(())
}
