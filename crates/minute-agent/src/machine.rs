//! The turn state machine: `Prepare -> ModelCall -> Route -> {ToolExec ->
//! ModelCall | End}`, with an explicit iteration cap and typed progress
//! events over a channel.

use std::sync::Arc;

use tokio::sync::mpsc;
use uuid::Uuid;

use minute_core::events::{AgentEvent, ToolCategory};
use minute_tools::{ToolContext, ToolRegistry};

use crate::llm::LanguageModel;
use crate::types::{AgentMessage, AssistantReply, HistoryInput, TurnOutcome};

/// Fixed system instructions for the meeting assistant.
pub const SYSTEM_PROMPT: &str = "\
You are a meeting intelligence assistant. You help users transcribe meeting \
recordings, index them, and answer questions about them through tools.

Guidelines:
- When the user refers to a meeting by position (\"meeting 1\", \"the second \
  meeting\"), call list_recent_meetings first and map it to a real meeting id. \
  Never pass an index as a meeting_id.
- When the user says data changed or your information seems stale, re-check \
  with list_recent_meetings or search_meetings instead of trusting history.
- Video workflow: request_video_upload, then transcribe_video, optionally \
  edit or rename speakers, then upload_transcript.
- For stored external documents use import_document, never retype or \
  summarize their content yourself.
- Answer from retrieved context; say so when the context does not contain \
  the answer.";

/// States of the orchestration loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TurnState {
    Prepare,
    ModelCall,
    Route,
    ToolExec,
    End,
}

/// Pure routing decision: tool calls pending means another tool pass,
/// otherwise the turn is over.
pub fn route(reply: &AssistantReply) -> TurnState {
    if reply.tool_calls.is_empty() {
        TurnState::End
    } else {
        TurnState::ToolExec
    }
}

/// Drives one user turn through the state machine.
///
/// Within a turn everything is sequential: tool calls requested together
/// execute one after another, in request order, and never concurrently with
/// a model call.
pub struct TurnRunner {
    model: Arc<dyn LanguageModel>,
    registry: Arc<ToolRegistry>,
    system_prompt: String,
    max_iterations: usize,
}

impl TurnRunner {
    pub fn new(
        model: Arc<dyn LanguageModel>,
        registry: Arc<ToolRegistry>,
        max_iterations: usize,
    ) -> Self {
        Self {
            model,
            registry,
            system_prompt: SYSTEM_PROMPT.to_string(),
            max_iterations: max_iterations.max(1),
        }
    }

    pub fn with_system_prompt(mut self, prompt: impl Into<String>) -> Self {
        self.system_prompt = prompt.into();
        self
    }

    /// Run one user turn to completion.
    ///
    /// Progress is reported on `events`; the final assistant content is
    /// emitted exactly once as [`AgentEvent::AnswerReady`]. A failure while
    /// preparing messages or calling the model short-circuits to
    /// [`TurnOutcome::Failed`] with a single error string.
    pub async fn run_turn(
        &self,
        message: &str,
        history: &HistoryInput,
        session_id: Uuid,
        events: &mpsc::Sender<AgentEvent>,
    ) -> TurnOutcome {
        let _ = events.send(AgentEvent::TurnStarted).await;

        let ctx = ToolContext::new(session_id);
        let schemas = self.registry.schemas();
        let mut messages: Vec<AgentMessage> = Vec::new();
        let mut reply = AssistantReply::default();
        let mut iterations = 0usize;
        let mut state = TurnState::Prepare;

        loop {
            state = match state {
                TurnState::Prepare => {
                    if message.trim().is_empty() {
                        return self
                            .fail(events, "failed to prepare messages: message is empty")
                            .await;
                    }
                    messages.push(AgentMessage::system(self.system_prompt.clone()));
                    messages.extend(history.normalize());
                    messages.push(AgentMessage::user(message));
                    TurnState::ModelCall
                }

                TurnState::ModelCall => {
                    if iterations >= self.max_iterations {
                        tracing::warn!(
                            iterations,
                            "Turn stopped: iteration cap reached without a final answer"
                        );
                        let _ = events
                            .send(AgentEvent::TurnFailed {
                                message: format!(
                                    "Stopped after {} model calls without a final answer.",
                                    iterations
                                ),
                            })
                            .await;
                        return TurnOutcome::Stopped { iterations };
                    }
                    iterations += 1;

                    match self.model.invoke(&messages, &schemas).await {
                        Ok(r) => {
                            messages.push(AgentMessage::Assistant {
                                content: r.content.clone(),
                                tool_calls: r.tool_calls.clone(),
                            });
                            reply = r;
                            TurnState::Route
                        }
                        Err(e) => return self.fail(events, &e.to_string()).await,
                    }
                }

                TurnState::Route => route(&reply),

                TurnState::ToolExec => {
                    for call in reply.tool_calls.clone() {
                        let category = ToolCategory::for_tool(&call.name);
                        let _ = events
                            .send(AgentEvent::ToolStarted {
                                name: call.name.clone(),
                                category,
                            })
                            .await;
                        tracing::debug!(tool = %call.name, "Executing tool call");

                        // Tool failures become text in the conversation so
                        // the model can react; they never abort the turn.
                        let content = match self
                            .registry
                            .dispatch(&call.name, &ctx, call.arguments.clone())
                            .await
                        {
                            Ok(text) => text,
                            Err(e) => format!("Tool '{}' error: {}", call.name, e),
                        };

                        let _ = events
                            .send(AgentEvent::ToolCompleted {
                                name: call.name.clone(),
                            })
                            .await;
                        messages.push(AgentMessage::Tool { call, content });
                    }
                    TurnState::ModelCall
                }

                TurnState::End => {
                    let _ = events
                        .send(AgentEvent::AnswerReady {
                            content: reply.content.clone(),
                        })
                        .await;
                    return TurnOutcome::Answer(reply.content.clone());
                }
            };
        }
    }

    async fn fail(&self, events: &mpsc::Sender<AgentEvent>, message: &str) -> TurnOutcome {
        tracing::error!(error = message, "Turn failed");
        let _ = events
            .send(AgentEvent::TurnFailed {
                message: message.to_string(),
            })
            .await;
        TurnOutcome::Failed(message.to_string())
    }
}
