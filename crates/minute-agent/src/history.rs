//! History normalization: the two adapters that turn tolerated input
//! shapes into the canonical [`AgentMessage`] sequence.

use crate::types::{AgentMessage, HistoryRecord};

/// Adapt `[[user, assistant], ...]` pair lists.
///
/// Empty or missing sides are skipped, so a pair whose answer is still
/// pending contributes only the user message.
pub fn messages_from_pairs(pairs: &[(Option<String>, Option<String>)]) -> Vec<AgentMessage> {
    let mut messages = Vec::new();
    for (user, assistant) in pairs {
        if let Some(user) = user {
            if !user.is_empty() {
                messages.push(AgentMessage::user(user.clone()));
            }
        }
        if let Some(assistant) = assistant {
            if !assistant.is_empty() {
                messages.push(AgentMessage::assistant(assistant.clone()));
            }
        }
    }
    messages
}

/// Adapt `[{role, content}, ...]` record lists.
///
/// Unknown roles and empty content are skipped rather than rejected.
pub fn messages_from_records(records: &[HistoryRecord]) -> Vec<AgentMessage> {
    let mut messages = Vec::new();
    for record in records {
        if record.content.is_empty() {
            continue;
        }
        match record.role.as_str() {
            "user" => messages.push(AgentMessage::user(record.content.clone())),
            "assistant" => messages.push(AgentMessage::assistant(record.content.clone())),
            other => {
                tracing::debug!(role = other, "Skipping history record with unknown role");
            }
        }
    }
    messages
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(role: &str, content: &str) -> HistoryRecord {
        HistoryRecord {
            role: role.to_string(),
            content: content.to_string(),
        }
    }

    #[test]
    fn test_pairs_basic() {
        let pairs = vec![
            (Some("hello".to_string()), Some("hi there".to_string())),
            (Some("next question".to_string()), Some("next answer".to_string())),
        ];
        let messages = messages_from_pairs(&pairs);
        assert_eq!(messages.len(), 4);
        assert_eq!(messages[0], AgentMessage::user("hello"));
        assert_eq!(messages[1], AgentMessage::assistant("hi there"));
        assert_eq!(messages[2], AgentMessage::user("next question"));
        assert_eq!(messages[3], AgentMessage::assistant("next answer"));
    }

    #[test]
    fn test_pairs_skip_missing_sides() {
        let pairs = vec![
            (Some("pending question".to_string()), None),
            (None, Some("orphan answer".to_string())),
            (Some(String::new()), Some("answer to empty".to_string())),
        ];
        let messages = messages_from_pairs(&pairs);
        assert_eq!(messages.len(), 3);
        assert_eq!(messages[0], AgentMessage::user("pending question"));
        assert_eq!(messages[1], AgentMessage::assistant("orphan answer"));
        assert_eq!(messages[2], AgentMessage::assistant("answer to empty"));
    }

    #[test]
    fn test_records_basic() {
        let records = vec![
            record("user", "hello"),
            record("assistant", "hi there"),
        ];
        let messages = messages_from_records(&records);
        assert_eq!(messages.len(), 2);
        assert_eq!(messages[0], AgentMessage::user("hello"));
        assert_eq!(messages[1], AgentMessage::assistant("hi there"));
    }

    #[test]
    fn test_records_skip_unknown_roles_and_empty_content() {
        let records = vec![
            record("system", "should be skipped"),
            record("tool", "also skipped"),
            record("user", ""),
            record("user", "kept"),
        ];
        let messages = messages_from_records(&records);
        assert_eq!(messages.len(), 1);
        assert_eq!(messages[0], AgentMessage::user("kept"));
    }

    #[test]
    fn test_equivalent_histories_normalize_identically() {
        let pairs = vec![
            (Some("how are you".to_string()), Some("fine, thanks".to_string())),
            (Some("list my meetings".to_string()), Some("you have two".to_string())),
        ];
        let records = vec![
            record("user", "how are you"),
            record("assistant", "fine, thanks"),
            record("user", "list my meetings"),
            record("assistant", "you have two"),
        ];
        assert_eq!(messages_from_pairs(&pairs), messages_from_records(&records));
    }

    #[test]
    fn test_empty_inputs() {
        assert!(messages_from_pairs(&[]).is_empty());
        assert!(messages_from_records(&[]).is_empty());
    }
}
