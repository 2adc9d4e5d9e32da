//! Terminal chat client for the Tickle task-management assistant.
//!
//! The conversation is kept in memory and posted in full to the chat service
//! on every submission. One request is in flight at most; its outcome is
//! always rendered as a message, either the assistant's reply or an error.

pub mod app;
pub mod client;
pub mod config;
pub mod conversation;
pub mod error;
pub mod handler;
pub mod message;
pub mod tui;
pub mod ui;

// Re-export main types for convenience
pub use app::App;
pub use client::ChatClient;
pub use config::Config;
pub use conversation::Conversation;
pub use error::ChatError;
pub use message::{ChatRequest, Message, Role};
