//! Chat Widget Models and Constants

use serde::{Deserialize, Serialize};
use std::time::Duration;

// =============================================================================
// Chat Constants
// =============================================================================

/// Message the bot opens every conversation with
pub const GREETING: &str = "Hello! How can we help you today?";
/// Canned answer to every user message
pub const BOT_REPLY: &str = "Thanks for your message! One of our agents will reply shortly.";
/// Delay before the canned answer is appended
pub const DEFAULT_REPLY_DELAY: Duration = Duration::from_millis(1000);

// =============================================================================
// Chat Models
// =============================================================================

/// Who wrote a chat message
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Sender {
    User,
    Bot,
}

/// A single entry in the chat transcript
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChatMessage {
    pub sender: Sender,
    pub text: String,
}

impl ChatMessage {
    pub fn user(text: impl Into<String>) -> Self {
        Self {
            sender: Sender::User,
            text: text.into(),
        }
    }

    pub fn bot(text: impl Into<String>) -> Self {
        Self {
            sender: Sender::Bot,
            text: text.into(),
        }
    }
}

/// What happens to a scheduled bot reply when the widget is closed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ReplyPolicy {
    /// The reply still lands in the transcript after the widget closes
    #[default]
    Deliver,
    /// Closing the widget cancels every reply still waiting on its timer
    SuppressOnClose,
}

/// Tunables shared by every chat widget
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChatSettings {
    pub reply_delay: Duration,
    pub reply_policy: ReplyPolicy,
}

impl Default for ChatSettings {
    fn default() -> Self {
        Self {
            reply_delay: DEFAULT_REPLY_DELAY,
            reply_policy: ReplyPolicy::Deliver,
        }
    }
}

/// Input for submitting a chat message
#[derive(Debug, Deserialize)]
pub struct SubmitMessageInput {
    pub text: String,
}

/// Response describing the widget's current state
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatView {
    pub open: bool,
    pub messages: Vec<ChatMessage>,
}
