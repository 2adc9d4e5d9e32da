use std::time::Duration;

use anyhow::Result;
use reqwest::Client;
use tracing::{debug, warn};

use crate::error::ChatError;
use crate::message::{ChatRequest, ChatResponse, ErrorBody};

pub const DEFAULT_ENDPOINT: &str = "http://localhost:8000/chat";

/// Client for the chat service's single `POST /chat` route
#[derive(Clone)]
pub struct ChatClient {
    client: Client,
    endpoint: String,
}

impl ChatClient {
    pub fn new(endpoint: &str, timeout: Option<Duration>) -> Result<Self> {
        let mut builder = Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }

        Ok(Self {
            client: builder.build()?,
            endpoint: endpoint.to_string(),
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Send the conversation and return the assistant's reply
    pub async fn send(&self, request: &ChatRequest) -> Result<String, ChatError> {
        debug!(
            endpoint = %self.endpoint,
            messages = request.messages.len(),
            "sending chat request"
        );

        let response = self
            .client
            .post(&self.endpoint)
            .json(request)
            .send()
            .await?;

        let status = response.status();
        let body = response.bytes().await?;

        if !status.is_success() {
            let detail = serde_json::from_slice::<ErrorBody>(&body)
                .ok()
                .and_then(|b| b.detail_text());
            warn!(%status, detail = detail.as_deref().unwrap_or(""), "chat service returned an error");
            return Err(ChatError::Status { status, detail });
        }

        let chat_response: ChatResponse = serde_json::from_slice(&body)?;
        Ok(chat_response.message)
    }
}
