use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Creator {
    pub id: u32,
    pub name: String,
    pub username: String,
    pub email: String,
    pub bio: Option<String>,
    pub avatar: Option<String>,
    pub platform: String,
    pub followers: Option<u32>,
    pub verified: bool,
}

impl Creator {
    pub fn profile(&self) -> CreatorProfile {
        CreatorProfile {
            id: self.id,
            name: self.name.clone(),
            username: self.username.clone(),
            avatar: self.avatar.clone(),
            platform: self.platform.clone(),
        }
    }
}

/// Public fields of a creator shown to the other side of a conversation.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct CreatorProfile {
    pub id: u32,
    pub name: String,
    pub username: String,
    pub avatar: Option<String>,
    pub platform: String,
}

/// Registration payload for a creator.
#[derive(Debug, Deserialize, Clone, Default)]
#[serde(rename_all = "camelCase")]
pub struct NewCreator {
    pub name: String,
    pub username: String,
    pub email: String,
    #[serde(default)]
    pub bio: Option<String>,
    #[serde(default)]
    pub avatar: Option<String>,
    pub platform: String,
    #[serde(default)]
    pub followers: Option<u32>,
    #[serde(default)]
    pub verified: Option<bool>,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Service {
    pub id: u32,
    pub creator_id: u32,
    pub title: String,
    pub description: String,
    /// Price in the smallest currency unit.
    pub price: u64,
    pub delivery_days: Option<u32>,
    pub revisions: Option<u32>,
    pub deliverables: Vec<String>,
}

/// Service fields supplied by a creator. The owner comes from the route.
#[derive(Debug, Deserialize, Clone, Default)]
#[serde(rename_all = "camelCase")]
pub struct ServiceInput {
    pub title: String,
    pub description: String,
    pub price: u64,
    #[serde(default)]
    pub delivery_days: Option<u32>,
    #[serde(default)]
    pub revisions: Option<u32>,
    #[serde(default)]
    pub deliverables: Vec<String>,
}

#[derive(Debug, Clone)]
pub struct NewService {
    pub creator_id: u32,
    pub input: ServiceInput,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Testimonial {
    pub id: u32,
    pub name: String,
    pub avatar: Option<String>,
    pub platform: String,
    pub followers: Option<u32>,
    pub content: String,
    pub rating: u8,
}

#[derive(Debug, Deserialize, Clone, Default)]
#[serde(rename_all = "camelCase")]
pub struct NewTestimonial {
    pub name: String,
    #[serde(default)]
    pub avatar: Option<String>,
    pub platform: String,
    #[serde(default)]
    pub followers: Option<u32>,
    pub content: String,
    pub rating: u8,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ContactMessage {
    pub id: u32,
    pub name: String,
    pub email: String,
    pub subject: String,
    pub message: String,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
}

#[derive(Debug, Deserialize, Clone, Default)]
#[serde(rename_all = "camelCase")]
pub struct NewContactMessage {
    pub name: String,
    pub email: String,
    pub subject: String,
    pub message: String,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Conversation {
    pub id: u32,
    pub creator1_id: u32,
    pub creator2_id: u32,
    #[serde(with = "time::serde::rfc3339::option")]
    pub last_message_at: Option<OffsetDateTime>,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
}

impl Conversation {
    pub fn has_participant(&self, creator_id: u32) -> bool {
        self.creator1_id == creator_id || self.creator2_id == creator_id
    }

    /// The participant opposite `me`, or `None` when `me` is not a member.
    /// In a self-conversation both sides are the same creator.
    pub fn other_participant(&self, me: u32) -> Option<u32> {
        if self.creator1_id == me {
            Some(self.creator2_id)
        } else if self.creator2_id == me {
            Some(self.creator1_id)
        } else {
            None
        }
    }

    /// Order-independent key for the participant pair.
    pub fn pair_key(&self) -> (u32, u32) {
        pair_key(self.creator1_id, self.creator2_id)
    }
}

pub(crate) fn pair_key(a: u32, b: u32) -> (u32, u32) {
    if a <= b {
        (a, b)
    } else {
        (b, a)
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Message {
    pub id: u32,
    pub conversation_id: u32,
    pub sender_id: u32,
    pub receiver_id: u32,
    pub content: String,
    pub read: bool,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
}

/// Most recent message of a conversation as seen by one participant.
#[derive(Debug, Serialize, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct MessagePreview {
    pub content: String,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    pub is_from_other_person: bool,
}

#[derive(Debug, Serialize, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ConversationSummary {
    #[serde(flatten)]
    pub conversation: Conversation,
    pub other_creator: CreatorProfile,
    pub unread_count: usize,
    pub last_message: Option<MessagePreview>,
}

#[derive(Debug, Serialize, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ConversationDetail {
    pub messages: Vec<Message>,
    pub conversation: Conversation,
    pub other_creator: CreatorProfile,
}

#[derive(Debug, Serialize, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct StartedConversation {
    pub conversation: Conversation,
    pub other_creator: CreatorProfile,
}
