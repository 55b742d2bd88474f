//! Error type shared by all tool handlers.

use minute_core::error::MinuteError;

/// Failure modes a tool can report to the orchestrator.
///
/// These never cross the orchestrator boundary as errors; they are rendered
/// into readable text and appended to the conversation so the model can
/// react (apologize, retry with different arguments).
#[derive(Debug, thiserror::Error)]
pub enum ToolError {
    /// A required external collaborator is unreachable or failing.
    #[error("service unavailable: {0}")]
    Unavailable(String),
    /// The model supplied arguments the tool cannot interpret.
    #[error("invalid arguments: {0}")]
    InvalidArguments(String),
    /// The operation itself failed.
    #[error("tool failed: {0}")]
    Failed(String),
}

impl From<MinuteError> for ToolError {
    fn from(err: MinuteError) -> Self {
        match err {
            MinuteError::Store(msg) | MinuteError::Search(msg) => ToolError::Unavailable(msg),
            other => ToolError::Failed(other.to_string()),
        }
    }
}
