//! Language-model collaborator contract plus test doubles.

use std::collections::VecDeque;
use std::sync::Mutex;

use async_trait::async_trait;
use serde_json::Value;

use crate::error::AgentError;
use crate::types::{AgentMessage, AssistantReply};

/// Narrow contract of the external language model: one call with the
/// message list and the bound tool schemas, one assistant reply back
/// (content, tool calls, or both).
#[async_trait]
pub trait LanguageModel: Send + Sync {
    async fn invoke(
        &self,
        messages: &[AgentMessage],
        tool_schemas: &[Value],
    ) -> Result<AssistantReply, AgentError>;
}

/// Test double that replays a fixed queue of replies.
///
/// Returns an error when the script runs dry, so a test that makes more
/// model calls than scripted fails loudly.
pub struct ScriptedModel {
    replies: Mutex<VecDeque<AssistantReply>>,
}

impl ScriptedModel {
    pub fn new(replies: Vec<AssistantReply>) -> Self {
        Self {
            replies: Mutex::new(replies.into()),
        }
    }
}

#[async_trait]
impl LanguageModel for ScriptedModel {
    async fn invoke(
        &self,
        _messages: &[AgentMessage],
        _tool_schemas: &[Value],
    ) -> Result<AssistantReply, AgentError> {
        self.replies
            .lock()
            .map_err(|e| AgentError::Model(format!("script lock poisoned: {}", e)))?
            .pop_front()
            .ok_or_else(|| AgentError::Model("scripted model exhausted".to_string()))
    }
}

/// Stand-in model for local runs without a configured inference backend.
///
/// Never requests tools; echoes what it was asked so the loop and the CLI
/// can be exercised end to end.
#[derive(Debug, Clone, Default)]
pub struct MockLanguageModel;

impl MockLanguageModel {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl LanguageModel for MockLanguageModel {
    async fn invoke(
        &self,
        messages: &[AgentMessage],
        tool_schemas: &[Value],
    ) -> Result<AssistantReply, AgentError> {
        let last_user = messages
            .iter()
            .rev()
            .find_map(|m| match m {
                AgentMessage::User { content } => Some(content.as_str()),
                _ => None,
            })
            .unwrap_or("(no user message)");
        Ok(AssistantReply::answer(format!(
            "[mock model] I received: \"{}\" ({} tools available)",
            last_user,
            tool_schemas.len()
        )))
    }
}
