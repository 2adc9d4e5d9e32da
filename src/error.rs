use thiserror::Error;

/// Shown when the service gives no usable explanation for a failure
pub const FALLBACK_ERROR: &str = "Sorry, there was an error processing your request.";

/// A chat request that did not produce an assistant reply.
///
/// The variants exist for logging. The conversation only ever sees
/// [`ChatError::display_message`].
#[derive(Debug, Error)]
pub enum ChatError {
    #[error("request to chat service failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("chat service returned {status}")]
    Status {
        status: reqwest::StatusCode,
        detail: Option<String>,
    },

    #[error("could not decode chat service reply: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("chat request task failed: {0}")]
    Task(#[from] tokio::task::JoinError),
}

impl ChatError {
    /// Text for the error message appended to the conversation
    pub fn display_message(&self) -> String {
        match self {
            ChatError::Status {
                detail: Some(detail),
                ..
            } => detail.clone(),
            _ => FALLBACK_ERROR.to_string(),
        }
    }
}
