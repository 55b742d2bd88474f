//! Error types for the orchestration loop.

use minute_core::error::MinuteError;

/// Errors that short-circuit a conversational turn.
#[derive(Debug, thiserror::Error)]
pub enum AgentError {
    #[error("failed to prepare messages: {0}")]
    Prepare(String),
    #[error("language model error: {0}")]
    Model(String),
}

impl From<MinuteError> for AgentError {
    fn from(err: MinuteError) -> Self {
        AgentError::Model(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display() {
        assert_eq!(
            AgentError::Prepare("empty message".to_string()).to_string(),
            "failed to prepare messages: empty message"
        );
        assert_eq!(
            AgentError::Model("timeout".to_string()).to_string(),
            "language model error: timeout"
        );
    }

    #[test]
    fn test_from_minute_error() {
        let err: AgentError = MinuteError::Model("rate limited".to_string()).into();
        assert!(matches!(err, AgentError::Model(_)));
        assert!(err.to_string().contains("rate limited"));
    }
}
