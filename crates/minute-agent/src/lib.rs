//! Conversational orchestration: an explicit finite-state machine that
//! alternates language-model calls and tool executions within one user
//! turn, with a bounded iteration count and typed progress events.

pub mod error;
pub mod history;
pub mod llm;
pub mod machine;
pub mod types;

pub use error::AgentError;
pub use history::{messages_from_pairs, messages_from_records};
pub use llm::{LanguageModel, MockLanguageModel, ScriptedModel};
pub use machine::{route, TurnRunner, TurnState, SYSTEM_PROMPT};
pub use types::{AgentMessage, AssistantReply, HistoryInput, HistoryRecord, ToolCall, TurnOutcome};
