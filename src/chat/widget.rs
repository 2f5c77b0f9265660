//! Support chat widget
//!
//! A placeholder support channel: every user message is answered by one
//! canned bot reply after a fixed delay. Replies are spawned tokio tasks
//! that race their timer against a cancellation signal owned by the widget.
//! Dropping the widget drops the signal's sender, which cancels every reply
//! still waiting. Closing the widget cancels them too, but only under
//! [`ReplyPolicy::SuppressOnClose`].

use super::models::*;
use parking_lot::Mutex;
use std::sync::Arc;
use tokio::{sync::watch, task::JoinHandle};

/// Per-session chat state
pub struct ChatWidget {
    transcript: Arc<Mutex<Vec<ChatMessage>>>,
    open: bool,
    settings: ChatSettings,
    /// Bumped to cancel pending replies; dropped with the widget
    cancel_tx: watch::Sender<u64>,
}

impl ChatWidget {
    /// Creates a closed widget whose transcript holds the bot greeting.
    pub fn new(settings: ChatSettings) -> Self {
        let (cancel_tx, _) = watch::channel(0);
        Self {
            transcript: Arc::new(Mutex::new(vec![ChatMessage::bot(GREETING)])),
            open: false,
            settings,
            cancel_tx,
        }
    }

    pub fn open(&mut self) {
        self.open = true;
    }

    pub fn close(&mut self) {
        self.open = false;
        if self.settings.reply_policy == ReplyPolicy::SuppressOnClose {
            self.cancel_pending();
        }
    }

    pub fn is_open(&self) -> bool {
        self.open
    }

    /// Cancels every reply that has not fired yet.
    pub fn cancel_pending(&self) {
        self.cancel_tx.send_modify(|generation| *generation = generation.wrapping_add(1));
    }

    /// Appends a user message and schedules the bot's answer.
    ///
    /// Blank input is ignored. Must be called from within a tokio runtime.
    pub fn submit(&self, text: &str) -> Option<ChatMessage> {
        if text.trim().is_empty() {
            return None;
        }

        let message = ChatMessage::user(text);
        self.transcript.lock().push(message.clone());
        self.schedule_reply();
        Some(message)
    }

    fn schedule_reply(&self) -> JoinHandle<()> {
        let transcript = Arc::clone(&self.transcript);
        let mut cancelled = self.cancel_tx.subscribe();
        let delay = self.settings.reply_delay;

        tokio::spawn(async move {
            tokio::select! {
                () = tokio::time::sleep(delay) => {
                    transcript.lock().push(ChatMessage::bot(BOT_REPLY));
                    tracing::debug!("Chat reply delivered");
                }
                // Err here means the widget is gone, which cancels as well.
                _ = cancelled.changed() => {
                    tracing::debug!("Chat reply cancelled");
                }
            }
        })
    }

    /// Snapshot of the transcript, oldest first
    pub fn messages(&self) -> Vec<ChatMessage> {
        self.transcript.lock().clone()
    }

    pub fn view(&self) -> ChatView {
        ChatView {
            open: self.open,
            messages: self.messages(),
        }
    }
}
