//! Read views and validated write paths used by the HTTP layer.
//!
//! Every operation here checks that referenced identifiers exist before it
//! mutates anything, so the store underneath can trust its input.

use once_cell::sync::Lazy;
use regex::Regex;
use tracing::warn;

use crate::error::{Error, Result};
use crate::model::{
    ContactMessage, Conversation, ConversationDetail, ConversationSummary, Creator,
    CreatorProfile, Message, MessagePreview, NewContactMessage, NewCreator, NewService,
    NewTestimonial, Service, ServiceInput, StartedConversation, Testimonial,
};
use crate::store::{Store, Tables};

/// Length of a conversation preview before it is cut.
pub const PREVIEW_CHARS: usize = 50;

static EMAIL_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").expect("valid email regex"));

/// Query facade over a [`Store`].
#[derive(Clone, Default)]
pub struct Marketplace {
    store: Store,
}

impl Marketplace {
    pub fn new(store: Store) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &Store {
        &self.store
    }

    pub fn list_creators(&self) -> Vec<Creator> {
        self.store.creators()
    }

    pub fn get_creator(&self, id: u32) -> Result<Creator> {
        self.store.creator(id).ok_or_else(|| Error::not_found("creator", id))
    }

    /// Register a creator. Name, username and email are trimmed and the
    /// email lowercased before anything is checked. Username and email must
    /// be unused, ignoring ASCII case.
    pub fn register_creator(&self, mut new: NewCreator) -> Result<Creator> {
        trim_in_place(&mut new.name);
        trim_in_place(&mut new.username);
        trim_in_place(&mut new.email);
        new.email.make_ascii_lowercase();
        required("name", &new.name)?;
        required("username", &new.username)?;
        required("platform", &new.platform)?;
        email("email", &new.email)?;
        let mut tables = self.store.write();
        if tables.creator_by_username(&new.username).is_some() {
            return Err(Error::invalid("username is already taken"));
        }
        if tables.creator_by_email(&new.email).is_some() {
            return Err(Error::invalid("email is already registered"));
        }
        tables.insert_creator(new)
    }

    pub fn list_services(&self, creator_id: u32) -> Result<Vec<Service>> {
        let tables = self.store.read();
        ensure_creator(&tables, creator_id)?;
        Ok(tables.services_for_creator(creator_id))
    }

    /// A service owned by `creator_id`. Services of other creators are
    /// reported as missing.
    pub fn get_service(&self, creator_id: u32, service_id: u32) -> Result<Service> {
        let tables = self.store.read();
        owned_service(&tables, creator_id, service_id).cloned()
    }

    pub fn create_service(&self, creator_id: u32, input: ServiceInput) -> Result<Service> {
        validate_service(&input)?;
        let mut tables = self.store.write();
        ensure_creator(&tables, creator_id)?;
        tables.insert_service(NewService { creator_id, input })
    }

    /// Services are immutable once created: the payload is validated and the
    /// stored record is returned as-is.
    pub fn update_service(
        &self,
        creator_id: u32,
        service_id: u32,
        input: ServiceInput,
    ) -> Result<Service> {
        let tables = self.store.read();
        let existing = owned_service(&tables, creator_id, service_id)?;
        validate_service(&input)?;
        Ok(existing.clone())
    }

    pub fn list_testimonials(&self) -> Vec<Testimonial> {
        self.store.testimonials()
    }

    pub fn create_testimonial(&self, new: NewTestimonial) -> Result<Testimonial> {
        required("name", &new.name)?;
        required("platform", &new.platform)?;
        required("content", &new.content)?;
        if !(1..=5).contains(&new.rating) {
            return Err(Error::invalid("rating must be between 1 and 5"));
        }
        self.store.create_testimonial(new)
    }

    pub fn create_contact_message(&self, mut new: NewContactMessage) -> Result<ContactMessage> {
        trim_in_place(&mut new.email);
        required("name", &new.name)?;
        email("email", &new.email)?;
        required("subject", &new.subject)?;
        required("message", &new.message)?;
        self.store.create_contact_message(new)
    }

    /// Conversations of `creator_id`, most recently active first, each with
    /// the other participant, the unread count for `creator_id` and a preview
    /// of the latest message.
    pub fn list_conversations(&self, creator_id: u32) -> Result<Vec<ConversationSummary>> {
        let tables = self.store.read();
        ensure_creator(&tables, creator_id)?;
        let summaries = tables
            .conversations_for_creator(creator_id)
            .into_iter()
            .filter_map(|conversation| {
                let other_id = conversation.other_participant(creator_id)?;
                let Some(other) = tables.creators.get(&other_id) else {
                    warn!(conversation = conversation.id, other_id, "participant missing");
                    return None;
                };
                let unread_count = tables.unread_count_in(conversation.id, creator_id);
                let last_message = tables
                    .latest_message(conversation.id)
                    .map(|m| preview(m, creator_id));
                Some(ConversationSummary {
                    conversation,
                    other_creator: other.profile(),
                    unread_count,
                    last_message,
                })
            })
            .collect();
        Ok(summaries)
    }

    /// Full history of a conversation as seen by `requester`. Messages
    /// addressed to the requester are marked read before the history is
    /// returned.
    pub fn get_conversation_detail(
        &self,
        conversation_id: u32,
        requester: u32,
    ) -> Result<ConversationDetail> {
        let mut tables = self.store.write();
        let conversation = conversation(&tables, conversation_id)?;
        let other_id = conversation.other_participant(requester).ok_or_else(|| {
            Error::PermissionDenied("not a participant of this conversation".into())
        })?;
        let other_creator = profile(&tables, other_id)?;
        tables.mark_messages_as_read(conversation_id, requester);
        Ok(ConversationDetail {
            messages: tables.messages_for_conversation(conversation_id),
            conversation,
            other_creator,
        })
    }

    /// Resolve the conversation between `creator1_id` and `creator2_id`,
    /// creating it if needed. The other participant is relative to
    /// `creator1_id`.
    pub fn start_conversation(
        &self,
        creator1_id: u32,
        creator2_id: u32,
    ) -> Result<StartedConversation> {
        let mut tables = self.store.write();
        ensure_creator(&tables, creator1_id)?;
        let other_creator = profile(&tables, creator2_id)?;
        let conversation = tables.get_or_create_conversation(creator1_id, creator2_id)?;
        Ok(StartedConversation {
            conversation,
            other_creator,
        })
    }

    pub fn send_message(&self, conversation_id: u32, sender_id: u32, content: &str) -> Result<Message> {
        self.store.create_message(conversation_id, sender_id, content)
    }

    pub fn unread_count(&self, creator_id: u32) -> Result<usize> {
        let tables = self.store.read();
        ensure_creator(&tables, creator_id)?;
        Ok(tables.unread_count(creator_id))
    }
}

fn ensure_creator(tables: &Tables, id: u32) -> Result<()> {
    if tables.creators.contains_key(&id) {
        Ok(())
    } else {
        Err(Error::not_found("creator", id))
    }
}

fn profile(tables: &Tables, id: u32) -> Result<CreatorProfile> {
    tables
        .creators
        .get(&id)
        .map(Creator::profile)
        .ok_or_else(|| Error::not_found("creator", id))
}

fn conversation(tables: &Tables, id: u32) -> Result<Conversation> {
    tables
        .conversations
        .get(&id)
        .cloned()
        .ok_or_else(|| Error::not_found("conversation", id))
}

fn owned_service(tables: &Tables, creator_id: u32, service_id: u32) -> Result<&Service> {
    ensure_creator(tables, creator_id)?;
    tables
        .services
        .get(&service_id)
        .filter(|s| s.creator_id == creator_id)
        .ok_or_else(|| Error::not_found("service", service_id))
}

fn preview(message: &Message, viewer: u32) -> MessagePreview {
    MessagePreview {
        content: truncate_preview(&message.content),
        created_at: message.created_at,
        is_from_other_person: message.sender_id != viewer,
    }
}

/// Cut `text` to [`PREVIEW_CHARS`] characters, appending `...` when cut.
pub fn truncate_preview(text: &str) -> String {
    match text.char_indices().nth(PREVIEW_CHARS) {
        Some((end, _)) => format!("{}...", &text[..end]),
        None => text.to_owned(),
    }
}

fn trim_in_place(value: &mut String) {
    let trimmed = value.trim();
    if trimmed.len() != value.len() {
        *value = trimmed.to_owned();
    }
}

fn required(field: &str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        Err(Error::invalid(format!("{field} is required")))
    } else {
        Ok(())
    }
}

fn email(field: &str, value: &str) -> Result<()> {
    if EMAIL_RE.is_match(value.trim()) {
        Ok(())
    } else {
        Err(Error::invalid(format!("{field} must be a valid email address")))
    }
}

fn validate_service(input: &ServiceInput) -> Result<()> {
    required("title", &input.title)?;
    required("description", &input.description)?;
    if input.deliverables.iter().any(|d| d.trim().is_empty()) {
        return Err(Error::invalid("deliverables must not contain empty entries"));
    }
    Ok(())
}
