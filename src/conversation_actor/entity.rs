use std::convert::Infallible;

use crate::actor_framework::{Entity, FrameworkError};
use crate::domain::{preview, Conversation, Message};
use super::actions::{ConversationAction, ConversationActionResult};

impl Entity for Conversation {
    type Id = String;
    type CreateParams = Infallible;
    type UpdateParams = Infallible;
    type Action = ConversationAction;
    type ActionResult = ConversationActionResult;

    const COLLECTION: &'static str = "conversations";

    fn id(&self) -> &String {
        &self.id
    }

    /// Conversations are keyed by their participant pair and opened with `get_or_insert`.
    fn from_create_params(_id: String, params: Infallible) -> Result<Self, FrameworkError> {
        match params {}
    }

    fn on_update(&mut self, params: Infallible) -> Result<(), FrameworkError> {
        match params {}
    }

    fn handle_action(&mut self, action: ConversationAction) -> Result<ConversationActionResult, FrameworkError> {
        match action {
            ConversationAction::Append { sender_id, text, at } => {
                if !self.has_participant(&sender_id) {
                    return Err(FrameworkError::Forbidden(
                        "Sender is not part of this conversation".into(),
                    ));
                }
                if text.trim().is_empty() {
                    return Err(FrameworkError::Validation("Message text is required".into()));
                }

                let message = Message {
                    id: format!("msg_{}", self.messages.len() + 1),
                    sender_id: sender_id.clone(),
                    text,
                    timestamp: at,
                    read: false,
                };
                self.last_message = preview(&message.text);
                self.last_message_time = at;
                self.last_sender_id = Some(sender_id.clone());
                for participant in &self.participants {
                    if *participant != sender_id {
                        *self.unread_count.entry(participant.clone()).or_insert(0) += 1;
                    }
                }
                self.messages.push(message.clone());
                Ok(ConversationActionResult::Appended(message))
            }
            ConversationAction::MarkRead { user_id } => {
                if !self.has_participant(&user_id) {
                    return Err(FrameworkError::Forbidden(
                        "User is not part of this conversation".into(),
                    ));
                }
                self.unread_count.insert(user_id.clone(), 0);
                let mut marked = 0;
                for message in self.messages.iter_mut().filter(|m| m.sender_id != user_id && !m.read) {
                    message.read = true;
                    marked += 1;
                }
                Ok(ConversationActionResult::MarkedRead(marked))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn append(conversation: &mut Conversation, sender: &str, text: &str) -> Result<ConversationActionResult, FrameworkError> {
        conversation.handle_action(ConversationAction::Append {
            sender_id: sender.into(),
            text: text.into(),
            at: Utc::now(),
        })
    }

    #[test]
    fn test_append_updates_preview_and_unread() {
        let mut conversation = Conversation::open("u1", "u2", Utc::now());
        append(&mut conversation, "u1", "Salam").unwrap();
        append(&mut conversation, "u1", &"a".repeat(80)).unwrap();

        assert_eq!(conversation.unread_for("u2"), 2);
        assert_eq!(conversation.unread_for("u1"), 0);
        assert_eq!(conversation.last_message, format!("{}...", "a".repeat(50)));
        assert_eq!(conversation.messages.len(), 2);
    }

    #[test]
    fn test_outsider_cannot_post() {
        let mut conversation = Conversation::open("u1", "u2", Utc::now());
        assert!(matches!(append(&mut conversation, "u3", "hi"), Err(FrameworkError::Forbidden(_))));
        assert!(conversation.messages.is_empty());
    }

    #[test]
    fn test_mark_read_only_touches_incoming() {
        let mut conversation = Conversation::open("u1", "u2", Utc::now());
        append(&mut conversation, "u1", "one").unwrap();
        append(&mut conversation, "u2", "two").unwrap();

        let result = conversation
            .handle_action(ConversationAction::MarkRead { user_id: "u2".into() })
            .unwrap();
        assert!(matches!(result, ConversationActionResult::MarkedRead(1)));
        assert_eq!(conversation.unread_for("u2"), 0);
        assert_eq!(conversation.unread_for("u1"), 1);
        assert!(conversation.messages[0].read);
        assert!(!conversation.messages[1].read);
    }
}
