use serde::{Deserialize, Serialize};
use serde_json::Value;

/// One tool invocation requested by the model.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolCall {
    pub id: String,
    pub name: String,
    pub arguments: Value,
}

impl ToolCall {
    pub fn new(id: impl Into<String>, name: impl Into<String>, arguments: Value) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            arguments,
        }
    }
}

/// The canonical message form the orchestrator works with. All history
/// shapes are normalized into this before the first model call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "role", rename_all = "snake_case")]
pub enum AgentMessage {
    System {
        content: String,
    },
    User {
        content: String,
    },
    Assistant {
        content: String,
        #[serde(default, skip_serializing_if = "Vec::is_empty")]
        tool_calls: Vec<ToolCall>,
    },
    /// A tool result paired back into the conversation.
    Tool {
        call: ToolCall,
        content: String,
    },
}

impl AgentMessage {
    pub fn system(content: impl Into<String>) -> Self {
        AgentMessage::System {
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        AgentMessage::User {
            content: content.into(),
        }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        AgentMessage::Assistant {
            content: content.into(),
            tool_calls: Vec::new(),
        }
    }
}

/// One model output: final content, tool requests, or both.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AssistantReply {
    pub content: String,
    #[serde(default)]
    pub tool_calls: Vec<ToolCall>,
}

impl AssistantReply {
    /// A final answer with no tool requests.
    pub fn answer(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            tool_calls: Vec::new(),
        }
    }

    /// A reply that only requests tool calls.
    pub fn calls(tool_calls: Vec<ToolCall>) -> Self {
        Self {
            content: String::new(),
            tool_calls,
        }
    }
}

/// A `{role, content}` record, one of the two accepted history shapes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoryRecord {
    pub role: String,
    pub content: String,
}

/// Tolerated conversation-history input shapes.
///
/// Exactly two adapters exist at this boundary; everything downstream sees
/// only [`AgentMessage`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum HistoryInput {
    /// `[[user, assistant], ...]` pair lists; either side may be absent.
    Pairs(Vec<(Option<String>, Option<String>)>),
    /// `[{role, content}, ...]` record lists.
    Records(Vec<HistoryRecord>),
}

impl HistoryInput {
    pub fn empty() -> Self {
        HistoryInput::Records(Vec::new())
    }

    /// Normalize into the canonical message sequence.
    pub fn normalize(&self) -> Vec<AgentMessage> {
        match self {
            HistoryInput::Pairs(pairs) => crate::history::messages_from_pairs(pairs),
            HistoryInput::Records(records) => crate::history::messages_from_records(records),
        }
    }
}

/// How one user turn ended.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TurnOutcome {
    /// The model produced a final, tool-call-free answer.
    Answer(String),
    /// The iteration cap fired before the model stopped requesting tools.
    Stopped { iterations: usize },
    /// Preparing messages or calling the model failed.
    Failed(String),
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_agent_message_constructors() {
        assert!(matches!(AgentMessage::system("s"), AgentMessage::System { .. }));
        assert!(matches!(AgentMessage::user("u"), AgentMessage::User { .. }));
        let msg = AgentMessage::assistant("a");
        if let AgentMessage::Assistant { content, tool_calls } = msg {
            assert_eq!(content, "a");
            assert!(tool_calls.is_empty());
        } else {
            panic!("expected assistant message");
        }
    }

    #[test]
    fn test_assistant_reply_helpers() {
        let reply = AssistantReply::answer("done");
        assert_eq!(reply.content, "done");
        assert!(reply.tool_calls.is_empty());

        let reply = AssistantReply::calls(vec![ToolCall::new("1", "search_meetings", json!({}))]);
        assert!(reply.content.is_empty());
        assert_eq!(reply.tool_calls.len(), 1);
    }

    #[test]
    fn test_message_serialization_uses_role_tag() {
        let json = serde_json::to_value(AgentMessage::user("hi")).unwrap();
        assert_eq!(json["role"], "user");
        assert_eq!(json["content"], "hi");
    }

    #[test]
    fn test_history_input_untagged_deserialization() {
        let pairs: HistoryInput =
            serde_json::from_str(r#"[["hello", "hi there"]]"#).unwrap();
        assert!(matches!(pairs, HistoryInput::Pairs(_)));

        let records: HistoryInput =
            serde_json::from_str(r#"[{"role": "user", "content": "hello"}]"#).unwrap();
        assert!(matches!(records, HistoryInput::Records(_)));
    }

    #[test]
    fn test_turn_outcome_round_trip() {
        for outcome in [
            TurnOutcome::Answer("hi".to_string()),
            TurnOutcome::Stopped { iterations: 10 },
            TurnOutcome::Failed("boom".to_string()),
        ] {
            let json = serde_json::to_string(&outcome).unwrap();
            let back: TurnOutcome = serde_json::from_str(&json).unwrap();
            assert_eq!(outcome, back);
        }
    }
}
