use tokio::task::JoinHandle;
use tracing::{error, info};

use crate::client::ChatClient;
use crate::conversation::Conversation;
use crate::error::ChatError;

pub struct App {
    pub should_quit: bool,
    pub conversation: Conversation,
    pub client: ChatClient,

    // The one outstanding chat request, if any
    pub pending: Option<JoinHandle<Result<String, ChatError>>>,

    // Chat pane scroll state
    pub chat_scroll: u16,
    pub chat_height: u16, // Inner height of the chat pane, set during render
    pub chat_width: u16,  // Inner width of the chat pane, set during render
    pub follow_bottom: bool, // Keep the newest line in view on every render

    // Animation state
    pub animation_frame: u8, // 0-2 for the loading dots
}

impl App {
    pub fn new(client: ChatClient) -> Self {
        Self {
            should_quit: false,
            conversation: Conversation::new(),
            client,
            pending: None,
            chat_scroll: 0,
            chat_height: 0,
            chat_width: 0,
            follow_bottom: true,
            animation_frame: 0,
        }
    }

    /// Submit the draft. Does nothing when the input is disabled.
    pub fn submit(&mut self) {
        let Some(request) = self.conversation.begin_submit() else {
            return;
        };

        info!(messages = request.messages.len(), "submitting conversation");

        let client = self.client.clone();
        self.pending = Some(tokio::spawn(async move { client.send(&request).await }));
        self.animation_frame = 0;
        self.scroll_chat_to_bottom();
    }

    /// Settle the pending request if its task has finished. Never blocks.
    pub async fn poll_pending(&mut self) {
        let finished = self
            .pending
            .as_ref()
            .map(|handle| handle.is_finished())
            .unwrap_or(false);
        if !finished {
            return;
        }

        let Some(handle) = self.pending.take() else {
            return;
        };

        let result = match handle.await {
            Ok(result) => result,
            Err(join_err) => Err(ChatError::Task(join_err)),
        };

        if let Err(err) = &result {
            error!(error = %err, "chat request failed");
        }

        self.conversation.resolve(result);
        if let Some(last) = self.conversation.messages().last() {
            info!(
                role = last.role.as_str(),
                chars = last.content.chars().count(),
                total = self.conversation.messages().len(),
                "request settled"
            );
        }
        self.scroll_chat_to_bottom();
    }

    pub fn quit(&mut self) {
        if let Some(handle) = self.pending.take() {
            handle.abort();
        }
        self.should_quit = true;
    }

    /// Tick animation frame (called by Tick event)
    pub fn tick_animation(&mut self) {
        if self.conversation.is_in_flight() {
            self.animation_frame = (self.animation_frame + 1) % 3;
        }
    }

    /// Number of rendered lines in the chat pane, wrapped the way it is drawn
    pub fn chat_line_count(&self) -> u16 {
        // Default to 50 columns until the first render reports the real width
        let width = if self.chat_width > 0 { self.chat_width } else { 50 };
        let lines = crate::ui::chat_paragraph(self).line_count(width);
        u16::try_from(lines).unwrap_or(u16::MAX)
    }

    pub fn max_chat_scroll(&self) -> u16 {
        let visible_height = if self.chat_height > 0 {
            self.chat_height
        } else {
            20
        };
        self.chat_line_count().saturating_sub(visible_height)
    }

    /// Scroll chat to bottom and keep it there as lines arrive
    pub fn scroll_chat_to_bottom(&mut self) {
        self.follow_bottom = true;
        self.chat_scroll = self.max_chat_scroll();
    }

    /// Re-clamp after the pane size changed
    pub fn sync_chat_scroll(&mut self) {
        let max = self.max_chat_scroll();
        if self.follow_bottom || self.chat_scroll > max {
            self.chat_scroll = max;
        }
    }

    pub fn scroll_up(&mut self) {
        self.set_chat_scroll(self.chat_scroll.saturating_sub(1));
    }

    pub fn scroll_down(&mut self) {
        self.set_chat_scroll(self.chat_scroll.saturating_add(1));
    }

    pub fn scroll_page_up(&mut self) {
        let half_page = (self.chat_height / 2).max(1);
        self.set_chat_scroll(self.chat_scroll.saturating_sub(half_page));
    }

    pub fn scroll_page_down(&mut self) {
        let half_page = (self.chat_height / 2).max(1);
        self.set_chat_scroll(self.chat_scroll.saturating_add(half_page));
    }

    fn set_chat_scroll(&mut self, scroll: u16) {
        let max = self.max_chat_scroll();
        self.chat_scroll = scroll.min(max);
        self.follow_bottom = self.chat_scroll == max;
    }
}
