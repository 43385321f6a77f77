use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::Serialize;

const PREVIEW_CHARS: usize = 50;

/// Two-party message thread. The id is derived from the participant pair,
/// so a pair can never have more than one conversation.
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Conversation {
    pub id: String,
    pub participants: [String; 2],
    pub last_message: String,
    pub last_message_time: DateTime<Utc>,
    pub last_sender_id: Option<String>,
    pub unread_count: HashMap<String, u32>,
    pub created_at: DateTime<Utc>,
    #[serde(skip)]
    pub messages: Vec<Message>,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Message {
    pub id: String,
    pub sender_id: String,
    pub text: String,
    pub timestamp: DateTime<Utc>,
    pub read: bool,
}

impl Conversation {
    /// Order-independent key for a participant pair.
    pub fn key_for(a: &str, b: &str) -> String {
        if a <= b {
            format!("{}__{}", a, b)
        } else {
            format!("{}__{}", b, a)
        }
    }

    pub fn open(a: impl Into<String>, b: impl Into<String>, now: DateTime<Utc>) -> Self {
        let (a, b) = (a.into(), b.into());
        let unread_count = HashMap::from([(a.clone(), 0), (b.clone(), 0)]);
        Self {
            id: Self::key_for(&a, &b),
            participants: [a, b],
            last_message: String::new(),
            last_message_time: now,
            last_sender_id: None,
            unread_count,
            created_at: now,
            messages: Vec::new(),
        }
    }

    pub fn has_participant(&self, user_id: &str) -> bool {
        self.participants.iter().any(|p| p == user_id)
    }

    pub fn other_participant(&self, user_id: &str) -> Option<&str> {
        self.participants.iter().find(|p| p.as_str() != user_id).map(String::as_str)
    }

    pub fn unread_for(&self, user_id: &str) -> u32 {
        self.unread_count.get(user_id).copied().unwrap_or(0)
    }
}

/// First 50 characters of a message, with `...` appended when it was cut.
pub fn preview(text: &str) -> String {
    let mut chars = text.chars();
    let head: String = chars.by_ref().take(PREVIEW_CHARS).collect();
    if chars.next().is_some() {
        format!("{}...", head)
    } else {
        head
    }
}
