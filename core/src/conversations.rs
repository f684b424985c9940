use std::cmp::Ordering;

use time::OffsetDateTime;
use tracing::debug;

use crate::error::Result;
use crate::model::{pair_key, Conversation};
use crate::store::{Store, Tables};

impl Tables {
    /// Find the conversation for the unordered pair `{a, b}` or create it.
    /// An existing conversation is returned untouched.
    pub(crate) fn get_or_create_conversation(&mut self, a: u32, b: u32) -> Result<Conversation> {
        if let Some(existing) = self
            .conversation_pairs
            .get(&pair_key(a, b))
            .and_then(|id| self.conversations.get(id))
        {
            return Ok(existing.clone());
        }
        let now = OffsetDateTime::now_utc();
        self.insert_conversation(a, b, now, Some(now))
    }

    pub(crate) fn insert_conversation(
        &mut self,
        creator1_id: u32,
        creator2_id: u32,
        created_at: OffsetDateTime,
        last_message_at: Option<OffsetDateTime>,
    ) -> Result<Conversation> {
        let id = self.next_conversation_id()?;
        let conversation = Conversation {
            id,
            creator1_id,
            creator2_id,
            last_message_at,
            created_at,
        };
        self.conversation_pairs.insert(conversation.pair_key(), id);
        self.conversations.insert(id, conversation.clone());
        debug!(id, creator1_id, creator2_id, "conversation created");
        Ok(conversation)
    }

    pub(crate) fn conversations_for_creator(&self, creator_id: u32) -> Vec<Conversation> {
        let mut out: Vec<Conversation> = self
            .conversations
            .values()
            .filter(|c| c.has_participant(creator_id))
            .cloned()
            .collect();
        out.sort_by(most_recent_first);
        out
    }
}

/// Most recent activity first; conversations without activity go last.
fn most_recent_first(a: &Conversation, b: &Conversation) -> Ordering {
    match (a.last_message_at, b.last_message_at) {
        (Some(x), Some(y)) => y.cmp(&x),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
    .then(a.id.cmp(&b.id))
}

impl Store {
    /// Return the single conversation between `a` and `b`, creating it on
    /// first use. `(a, b)` and `(b, a)` resolve to the same conversation.
    ///
    /// Participants are not checked for existence here; callers validate.
    pub fn get_or_create_conversation(&self, a: u32, b: u32) -> Result<Conversation> {
        self.write().get_or_create_conversation(a, b)
    }

    /// Conversations that include `creator_id`, most recently active first.
    pub fn conversations_for_creator(&self, creator_id: u32) -> Vec<Conversation> {
        self.read().conversations_for_creator(creator_id)
    }
}
