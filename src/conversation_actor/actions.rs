use chrono::{DateTime, Utc};

use crate::domain::Message;

/// Custom actions for Conversation entities.
#[derive(Debug, Clone)]
pub enum ConversationAction {
    /// Appends a message and bumps every other participant's unread counter.
    Append {
        sender_id: String,
        text: String,
        at: DateTime<Utc>,
    },
    /// Clears `user_id`'s unread counter and marks messages sent to them as read.
    MarkRead { user_id: String },
}

/// Results from ConversationActions - variants match 1:1 with ConversationAction
#[derive(Debug, Clone)]
pub enum ConversationActionResult {
    Appended(Message),
    /// Number of messages flipped to read.
    MarkedRead(usize),
}
