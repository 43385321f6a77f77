use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::{info, instrument};

use crate::actor_framework::ResourceClient;
use crate::clock::Clock;
use crate::conversation_actor::{ConversationAction, ConversationActionResult, MessageError};
use crate::domain::{Conversation, Message};
use super::UserClient;

/// Name shown for a participant with no profile name.
pub const UNKNOWN_PARTICIPANT: &str = "مستخدم";

/// One row of a user's inbox.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ConversationSummary {
    pub id: String,
    pub other_user_id: String,
    pub other_user_name: String,
    pub other_user_image: String,
    pub last_message: String,
    pub last_message_time: DateTime<Utc>,
    pub unread_count: u32,
}

/// Client for two-party conversations and their messages.
#[derive(Clone)]
pub struct ConversationClient {
    inner: ResourceClient<Conversation>,
    users: UserClient,
    clock: Arc<dyn Clock>,
}

impl_client_methods!(ConversationClient, Conversation, MessageError, conversation);

fn appended(result: ConversationActionResult) -> Result<Message, MessageError> {
    match result {
        ConversationActionResult::Appended(message) => Ok(message),
        other => Err(MessageError::ActorCommunicationError(format!("Unexpected result: {:?}", other))),
    }
}

impl ConversationClient {
    pub fn new(inner: ResourceClient<Conversation>, users: UserClient, clock: Arc<dyn Clock>) -> Self {
        Self { inner, users, clock }
    }

    /// Returns the pair's conversation, creating it if needed. The flag is true
    /// when it already existed.
    #[instrument(skip(self))]
    pub async fn open(&self, user_a: String, user_b: String) -> Result<(Conversation, bool), MessageError> {
        if user_a.is_empty() || user_b.is_empty() {
            return Err(MessageError::ValidationError("userId1 and userId2 are required".into()));
        }
        if user_a == user_b {
            return Err(MessageError::ValidationError("Cannot message yourself".into()));
        }
        let (conversation, created) = self
            .inner
            .get_or_insert(Conversation::open(user_a, user_b, self.clock.now()))
            .await?;
        if created {
            info!(conversation_id = %conversation.id, "Conversation started");
        }
        Ok((conversation, !created))
    }

    /// Sends `text` from `sender_id` to `receiver_id`, opening their conversation on first contact.
    #[instrument(skip(self, text))]
    pub async fn send_direct(&self, sender_id: String, receiver_id: String, text: String) -> Result<(String, Message), MessageError> {
        let (conversation, _) = self.open(sender_id.clone(), receiver_id).await?;
        let message = self.post(conversation.id.clone(), sender_id, text).await?;
        Ok((conversation.id, message))
    }

    /// Appends to an existing conversation.
    #[instrument(skip(self, text))]
    pub async fn post(&self, conversation_id: String, sender_id: String, text: String) -> Result<Message, MessageError> {
        let at = self.clock.now();
        let result = self
            .inner
            .perform_action(conversation_id, ConversationAction::Append { sender_id, text, at })
            .await?;
        appended(result)
    }

    /// Marks everything sent to `user_id` as read; returns how many messages flipped.
    #[instrument(skip(self))]
    pub async fn mark_read(&self, conversation_id: String, user_id: String) -> Result<usize, MessageError> {
        match self
            .inner
            .perform_action(conversation_id, ConversationAction::MarkRead { user_id })
            .await?
        {
            ConversationActionResult::MarkedRead(count) => Ok(count),
            other => Err(MessageError::ActorCommunicationError(format!("Unexpected result: {:?}", other))),
        }
    }

    /// The newest page of messages, oldest first within the page.
    #[instrument(skip(self))]
    pub async fn messages(&self, conversation_id: String, page: usize, per_page: usize) -> Result<Vec<Message>, MessageError> {
        let conversation = self.find_conversation(conversation_id).await?;
        let per_page = per_page.max(1);
        let skip = (page.max(1) - 1).saturating_mul(per_page);
        let mut newest: Vec<Message> = conversation.messages.into_iter().rev().skip(skip).take(per_page).collect();
        newest.reverse();
        Ok(newest)
    }

    /// The user's conversations, most recent activity first.
    #[instrument(skip(self))]
    pub async fn inbox(&self, user_id: String) -> Result<Vec<ConversationSummary>, MessageError> {
        let member = user_id.clone();
        let mut conversations = self
            .inner
            .list(move |conversation: &Conversation| conversation.has_participant(&member))
            .await?;
        conversations.sort_by(|a, b| b.last_message_time.cmp(&a.last_message_time));

        let mut inbox = Vec::with_capacity(conversations.len());
        for conversation in conversations {
            let other_user_id = conversation.other_participant(&user_id).unwrap_or_default().to_string();
            let other = self.users.get_user(other_user_id.clone()).await?;
            let (other_user_name, other_user_image) = match other {
                Some(user) => (
                    user.display_name().unwrap_or(UNKNOWN_PARTICIPANT).to_string(),
                    user.profile_image,
                ),
                None => (UNKNOWN_PARTICIPANT.to_string(), String::new()),
            };
            inbox.push(ConversationSummary {
                unread_count: conversation.unread_for(&user_id),
                id: conversation.id,
                other_user_id,
                other_user_name,
                other_user_image,
                last_message: conversation.last_message,
                last_message_time: conversation.last_message_time,
            });
        }
        Ok(inbox)
    }
}
