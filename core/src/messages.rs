use time::OffsetDateTime;
use tracing::debug;

use crate::error::{Error, Result};
use crate::model::Message;
use crate::store::{Store, Tables};

/// Upper bound on message length, in characters.
pub const MAX_MESSAGE_CHARS: usize = 2000;

/// Check that message content is within `1..=MAX_MESSAGE_CHARS` characters.
pub fn validate_content(content: &str) -> Result<()> {
    if content.is_empty() {
        return Err(Error::invalid("message content must not be empty"));
    }
    if content.chars().count() > MAX_MESSAGE_CHARS {
        return Err(Error::invalid(format!(
            "message content must be at most {MAX_MESSAGE_CHARS} characters"
        )));
    }
    Ok(())
}

impl Tables {
    pub(crate) fn create_message(
        &mut self,
        conversation_id: u32,
        sender_id: u32,
        content: &str,
    ) -> Result<Message> {
        validate_content(content)?;
        let receiver_id = self
            .conversations
            .get(&conversation_id)
            .ok_or_else(|| Error::not_found("conversation", conversation_id))?
            .other_participant(sender_id)
            .ok_or_else(|| Error::invalid("sender is not a participant of this conversation"))?;

        let now = OffsetDateTime::now_utc();
        let id = self.next_message_id()?;
        let message = Message {
            id,
            conversation_id,
            sender_id,
            receiver_id,
            content: content.to_owned(),
            read: false,
            created_at: now,
        };
        self.messages.insert(id, message.clone());
        if let Some(conversation) = self.conversations.get_mut(&conversation_id) {
            conversation.last_message_at = Some(now);
        }
        debug!(id, conversation_id, sender_id, receiver_id, "message stored");
        Ok(message)
    }

    pub(crate) fn mark_messages_as_read(&mut self, conversation_id: u32, recipient_id: u32) -> usize {
        let mut flipped = 0;
        for message in self.messages.values_mut().filter(|m| {
            m.conversation_id == conversation_id && m.receiver_id == recipient_id && !m.read
        }) {
            message.read = true;
            flipped += 1;
        }
        if flipped > 0 {
            debug!(conversation_id, recipient_id, flipped, "messages marked read");
        }
        flipped
    }

    pub(crate) fn messages_for_conversation(&self, conversation_id: u32) -> Vec<Message> {
        let mut out: Vec<Message> = self
            .messages
            .values()
            .filter(|m| m.conversation_id == conversation_id)
            .cloned()
            .collect();
        out.sort_by(|a, b| a.created_at.cmp(&b.created_at).then(a.id.cmp(&b.id)));
        out
    }

    pub(crate) fn unread_count(&self, creator_id: u32) -> usize {
        self.messages
            .values()
            .filter(|m| m.receiver_id == creator_id && !m.read)
            .count()
    }

    pub(crate) fn unread_count_in(&self, conversation_id: u32, creator_id: u32) -> usize {
        self.messages
            .values()
            .filter(|m| m.conversation_id == conversation_id && m.receiver_id == creator_id && !m.read)
            .count()
    }

    pub(crate) fn latest_message(&self, conversation_id: u32) -> Option<&Message> {
        self.messages
            .values()
            .filter(|m| m.conversation_id == conversation_id)
            .max_by(|a, b| a.created_at.cmp(&b.created_at).then(a.id.cmp(&b.id)))
    }
}

impl Store {
    /// Append a message from `sender_id`. The receiver is the other
    /// participant, and the conversation's `last_message_at` is set to the
    /// message's creation time.
    pub fn create_message(&self, conversation_id: u32, sender_id: u32, content: &str) -> Result<Message> {
        self.write().create_message(conversation_id, sender_id, content)
    }

    /// Mark every unread message addressed to `recipient_id` in the
    /// conversation as read. Returns how many changed.
    pub fn mark_messages_as_read(&self, conversation_id: u32, recipient_id: u32) -> usize {
        self.write().mark_messages_as_read(conversation_id, recipient_id)
    }

    /// Messages of a conversation, oldest first.
    pub fn messages_for_conversation(&self, conversation_id: u32) -> Vec<Message> {
        self.read().messages_for_conversation(conversation_id)
    }

    /// Unread messages addressed to `creator_id` across all conversations.
    pub fn unread_count(&self, creator_id: u32) -> usize {
        self.read().unread_count(creator_id)
    }

    pub fn unread_count_in(&self, conversation_id: u32, creator_id: u32) -> usize {
        self.read().unread_count_in(conversation_id, creator_id)
    }
}
