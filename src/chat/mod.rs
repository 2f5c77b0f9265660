//! Support Chat Module
//!
//! This module contains the placeholder support chat, including:
//! - Chat models (ChatMessage, Sender, ReplyPolicy, settings)
//! - The per-session widget with its delayed, cancellable bot reply
//! - REST API handlers

pub mod handlers;
pub mod models;
pub mod widget;

// Re-export commonly used types and functions
pub use handlers::routes;
pub use models::{ChatMessage, ChatSettings, ReplyPolicy, Sender};
pub use widget::ChatWidget;
