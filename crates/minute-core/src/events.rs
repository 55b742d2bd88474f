use serde::{Deserialize, Serialize};

/// Coarse grouping of tools, used to phrase progress notifications.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ToolCategory {
    Transcription,
    Indexing,
    Search,
    Workflow,
    Import,
    Other,
}

impl ToolCategory {
    /// Classify a tool by its registered name.
    pub fn for_tool(name: &str) -> Self {
        match name {
            "transcribe_video" => ToolCategory::Transcription,
            "upload_transcript" | "save_text" => ToolCategory::Indexing,
            "search_meetings" | "get_meeting_metadata" | "list_recent_meetings" => {
                ToolCategory::Search
            }
            "request_video_upload"
            | "request_transcript_edit"
            | "apply_transcript_edit"
            | "rename_speakers"
            | "cancel_video_workflow" => ToolCategory::Workflow,
            "import_document" => ToolCategory::Import,
            _ => ToolCategory::Other,
        }
    }

    /// Human-readable progress label shown while a tool of this category runs.
    pub fn progress_label(&self) -> &'static str {
        match self {
            ToolCategory::Transcription => "transcription started",
            ToolCategory::Indexing => "uploading",
            ToolCategory::Search => "searching",
            ToolCategory::Workflow => "updating workflow",
            ToolCategory::Import => "importing document",
            ToolCategory::Other => "working",
        }
    }
}

/// Typed progress events emitted during one conversational turn.
///
/// Consumed by the CLI for interim feedback. The final assistant content is
/// emitted exactly once, as `AnswerReady`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[non_exhaustive]
pub enum AgentEvent {
    /// A user turn began processing.
    TurnStarted,
    /// A tool is about to execute.
    ToolStarted { name: String, category: ToolCategory },
    /// A tool finished (its text result went back into the conversation).
    ToolCompleted { name: String },
    /// The final assistant answer is available.
    AnswerReady { content: String },
    /// The turn ended with an error or was stopped by the iteration cap.
    TurnFailed { message: String },
}

impl AgentEvent {
    /// Short name for logging.
    pub fn event_name(&self) -> &'static str {
        match self {
            AgentEvent::TurnStarted => "turn_started",
            AgentEvent::ToolStarted { .. } => "tool_started",
            AgentEvent::ToolCompleted { .. } => "tool_completed",
            AgentEvent::AnswerReady { .. } => "answer_ready",
            AgentEvent::TurnFailed { .. } => "turn_failed",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_category_for_known_tools() {
        assert_eq!(
            ToolCategory::for_tool("transcribe_video"),
            ToolCategory::Transcription
        );
        assert_eq!(
            ToolCategory::for_tool("upload_transcript"),
            ToolCategory::Indexing
        );
        assert_eq!(ToolCategory::for_tool("save_text"), ToolCategory::Indexing);
        assert_eq!(
            ToolCategory::for_tool("search_meetings"),
            ToolCategory::Search
        );
        assert_eq!(
            ToolCategory::for_tool("list_recent_meetings"),
            ToolCategory::Search
        );
        assert_eq!(
            ToolCategory::for_tool("cancel_video_workflow"),
            ToolCategory::Workflow
        );
        assert_eq!(
            ToolCategory::for_tool("import_document"),
            ToolCategory::Import
        );
    }

    #[test]
    fn test_category_for_unknown_tool() {
        assert_eq!(ToolCategory::for_tool("get_current_time"), ToolCategory::Other);
    }

    #[test]
    fn test_progress_labels() {
        assert_eq!(
            ToolCategory::Transcription.progress_label(),
            "transcription started"
        );
        assert_eq!(ToolCategory::Indexing.progress_label(), "uploading");
        assert_eq!(ToolCategory::Search.progress_label(), "searching");
    }

    #[test]
    fn test_event_names() {
        assert_eq!(AgentEvent::TurnStarted.event_name(), "turn_started");
        let event = AgentEvent::ToolStarted {
            name: "search_meetings".to_string(),
            category: ToolCategory::Search,
        };
        assert_eq!(event.event_name(), "tool_started");
        let event = AgentEvent::AnswerReady {
            content: "done".to_string(),
        };
        assert_eq!(event.event_name(), "answer_ready");
    }

    #[test]
    fn test_event_serialization_round_trip() {
        let event = AgentEvent::ToolStarted {
            name: "transcribe_video".to_string(),
            category: ToolCategory::Transcription,
        };
        let json = serde_json::to_string(&event).unwrap();
        let back: AgentEvent = serde_json::from_str(&json).unwrap();
        assert_eq!(back.event_name(), "tool_started");
    }
}
