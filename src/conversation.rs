//! Conversation state: the message history, the draft being typed and the
//! in-flight flag that gates submissions.

use crate::error::ChatError;
use crate::message::{ChatRequest, Message};

/// Convert a character index to a byte index for UTF-8 safe string operations
fn char_to_byte_index(s: &str, char_idx: usize) -> usize {
    s.char_indices()
        .nth(char_idx)
        .map(|(i, _)| i)
        .unwrap_or(s.len())
}

#[derive(Debug, Default)]
pub struct Conversation {
    messages: Vec<Message>,
    draft: String,
    cursor: usize, // cursor position in draft, in chars
    in_flight: bool,
}

impl Conversation {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    pub fn draft(&self) -> &str {
        &self.draft
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn is_in_flight(&self) -> bool {
        self.in_flight
    }

    /// Whether the input line and the send button are enabled
    pub fn can_submit(&self) -> bool {
        !self.in_flight && !self.draft.trim().is_empty()
    }

    /// Start a submission from the current draft.
    ///
    /// Appends the user message, clears the draft and raises the in-flight
    /// flag. Returns the request body carrying the whole history, or `None`
    /// when the draft is blank or a request is already pending.
    pub fn begin_submit(&mut self) -> Option<ChatRequest> {
        if !self.can_submit() {
            return None;
        }

        let content = std::mem::take(&mut self.draft);
        self.cursor = 0;
        self.messages.push(Message::user(content));
        self.in_flight = true;

        Some(ChatRequest {
            messages: self.messages.clone(),
        })
    }

    /// Settle the pending request. The flag is lowered after the reply or
    /// error message has been appended.
    pub fn resolve(&mut self, result: Result<String, ChatError>) {
        if !self.in_flight {
            return;
        }

        let message = match result {
            Ok(reply) => Message::assistant(reply),
            Err(err) => Message::error(err.display_message()),
        };
        self.messages.push(message);
        self.in_flight = false;
    }

    // Draft editing. Ignored while a request is pending, like a disabled input.

    pub fn insert_char(&mut self, c: char) {
        if self.in_flight {
            return;
        }
        let byte_pos = char_to_byte_index(&self.draft, self.cursor);
        self.draft.insert(byte_pos, c);
        self.cursor += 1;
    }

    pub fn backspace(&mut self) {
        if self.in_flight || self.cursor == 0 {
            return;
        }
        self.cursor -= 1;
        let byte_pos = char_to_byte_index(&self.draft, self.cursor);
        self.draft.remove(byte_pos);
    }

    pub fn delete(&mut self) {
        if self.in_flight {
            return;
        }
        if self.cursor < self.draft.chars().count() {
            let byte_pos = char_to_byte_index(&self.draft, self.cursor);
            self.draft.remove(byte_pos);
        }
    }

    pub fn cursor_left(&mut self) {
        self.cursor = self.cursor.saturating_sub(1);
    }

    pub fn cursor_right(&mut self) {
        let char_count = self.draft.chars().count();
        self.cursor = (self.cursor + 1).min(char_count);
    }

    pub fn cursor_home(&mut self) {
        self.cursor = 0;
    }

    pub fn cursor_end(&mut self) {
        self.cursor = self.draft.chars().count();
    }

    /// Replace the draft wholesale, cursor at the end
    pub fn set_draft(&mut self, text: &str) {
        if self.in_flight {
            return;
        }
        self.draft = text.to_string();
        self.cursor_end();
    }
}
