//! Conversation data model and the JSON payloads exchanged with the chat service.

use serde::{Deserialize, Serialize};

/// One turn in the conversation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    pub role: Role,
    pub content: String,
}

/// Who produced a message
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
    /// Local marker for a failed request. Sent back to the service as part of
    /// the history, same as any other turn.
    Error,
}

impl Message {
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
        }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: Role::Assistant,
            content: content.into(),
        }
    }

    pub fn error(content: impl Into<String>) -> Self {
        Self {
            role: Role::Error,
            content: content.into(),
        }
    }
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::User => "user",
            Role::Assistant => "assistant",
            Role::Error => "error",
        }
    }

    /// Label shown above the message in the chat pane
    pub fn label(&self) -> &'static str {
        match self {
            Role::User => "You:",
            Role::Assistant => "Tickle:",
            Role::Error => "Error:",
        }
    }
}

/// Body of `POST /chat`
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChatRequest {
    pub messages: Vec<Message>,
}

/// Successful reply from the chat service
#[derive(Debug, Deserialize)]
pub struct ChatResponse {
    pub message: String,
}

/// Error body from the chat service. `detail` is left untyped because the
/// service sends a list of validation errors on 422 and a string otherwise.
#[derive(Debug, Deserialize)]
pub struct ErrorBody {
    #[serde(default)]
    pub detail: Option<serde_json::Value>,
}

impl ErrorBody {
    /// The detail text, if the service sent a usable one
    pub fn detail_text(&self) -> Option<String> {
        match &self.detail {
            Some(serde_json::Value::String(s)) if !s.trim().is_empty() => Some(s.clone()),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_message_serializes_with_lowercase_role() {
        let value = serde_json::to_value(Message::assistant("Added!")).unwrap();
        assert_eq!(value, json!({"role": "assistant", "content": "Added!"}));
    }

    #[test]
    fn test_request_body_shape() {
        let request = ChatRequest {
            messages: vec![Message::user("Add a task"), Message::error("boom")],
        };
        let value = serde_json::to_value(&request).unwrap();
        assert_eq!(
            value,
            json!({
                "messages": [
                    {"role": "user", "content": "Add a task"},
                    {"role": "error", "content": "boom"}
                ]
            })
        );
    }

    #[test]
    fn test_error_body_string_detail() {
        let body: ErrorBody =
            serde_json::from_str(r#"{"detail": "Task service unavailable"}"#).unwrap();
        assert_eq!(body.detail_text().as_deref(), Some("Task service unavailable"));
    }

    #[test]
    fn test_error_body_non_string_detail_is_unusable() {
        let body: ErrorBody =
            serde_json::from_str(r#"{"detail": [{"loc": ["body"], "msg": "field required"}]}"#)
                .unwrap();
        assert_eq!(body.detail_text(), None);

        let body: ErrorBody = serde_json::from_str(r#"{"detail": "   "}"#).unwrap();
        assert_eq!(body.detail_text(), None);

        let body: ErrorBody = serde_json::from_str("{}").unwrap();
        assert_eq!(body.detail_text(), None);
    }

    #[test]
    fn test_role_labels_are_distinct() {
        let labels = [Role::User.label(), Role::Assistant.label(), Role::Error.label()];
        assert_eq!(labels, ["You:", "Tickle:", "Error:"]);
        assert_eq!(Role::Error.as_str(), "error");
    }
}
