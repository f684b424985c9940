//! In-memory entity collections.
//!
//! Every collection is a `BTreeMap` keyed by its identifier. Identifiers are
//! handed out by a per-kind counter starting at 1 and never reused, so key
//! order is also insertion order.

use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;

use parking_lot::{RwLock, RwLockReadGuard, RwLockWriteGuard};
use time::OffsetDateTime;
use tracing::debug;

use crate::error::{Error, Result};
use crate::model::{
    ContactMessage, Conversation, Creator, Message, NewContactMessage, NewCreator, NewService,
    NewTestimonial, Service, Testimonial,
};

/// Last identifier handed out, one counter per entity kind.
#[derive(Debug, Default)]
pub(crate) struct IdCounters {
    creator: u32,
    service: u32,
    testimonial: u32,
    contact_message: u32,
    conversation: u32,
    message: u32,
}

/// Advance `counter` and return the new id. A counter at `u32::MAX` stays
/// there and reports exhaustion instead of wrapping onto live ids.
fn bump(counter: &mut u32, entity: &'static str) -> Result<u32> {
    *counter = counter
        .checked_add(1)
        .ok_or(Error::IdsExhausted { entity })?;
    Ok(*counter)
}

#[derive(Debug, Default)]
pub(crate) struct Tables {
    pub(crate) creators: BTreeMap<u32, Creator>,
    pub(crate) services: BTreeMap<u32, Service>,
    pub(crate) testimonials: BTreeMap<u32, Testimonial>,
    pub(crate) contact_messages: BTreeMap<u32, ContactMessage>,
    pub(crate) conversations: BTreeMap<u32, Conversation>,
    /// Canonical `(min, max)` participant pair to conversation id.
    pub(crate) conversation_pairs: HashMap<(u32, u32), u32>,
    pub(crate) messages: BTreeMap<u32, Message>,
    pub(crate) ids: IdCounters,
}

impl Tables {
    pub(crate) fn next_conversation_id(&mut self) -> Result<u32> {
        bump(&mut self.ids.conversation, "conversation")
    }

    pub(crate) fn next_message_id(&mut self) -> Result<u32> {
        bump(&mut self.ids.message, "message")
    }

    pub(crate) fn insert_creator(&mut self, new: NewCreator) -> Result<Creator> {
        let id = bump(&mut self.ids.creator, "creator")?;
        let creator = Creator {
            id,
            name: new.name,
            username: new.username,
            email: new.email,
            bio: new.bio,
            avatar: new.avatar,
            platform: new.platform,
            followers: new.followers,
            verified: new.verified.unwrap_or(false),
        };
        self.creators.insert(id, creator.clone());
        debug!(id, username = %creator.username, "creator stored");
        Ok(creator)
    }

    pub(crate) fn insert_service(&mut self, new: NewService) -> Result<Service> {
        let id = bump(&mut self.ids.service, "service")?;
        let NewService { creator_id, input } = new;
        let service = Service {
            id,
            creator_id,
            title: input.title,
            description: input.description,
            price: input.price,
            delivery_days: input.delivery_days,
            revisions: input.revisions,
            deliverables: input.deliverables,
        };
        self.services.insert(id, service.clone());
        debug!(id, creator_id, "service stored");
        Ok(service)
    }

    pub(crate) fn insert_testimonial(&mut self, new: NewTestimonial) -> Result<Testimonial> {
        let id = bump(&mut self.ids.testimonial, "testimonial")?;
        let testimonial = Testimonial {
            id,
            name: new.name,
            avatar: new.avatar,
            platform: new.platform,
            followers: new.followers,
            content: new.content,
            rating: new.rating,
        };
        self.testimonials.insert(id, testimonial.clone());
        Ok(testimonial)
    }

    pub(crate) fn insert_contact_message(&mut self, new: NewContactMessage) -> Result<ContactMessage> {
        let id = bump(&mut self.ids.contact_message, "contact message")?;
        let msg = ContactMessage {
            id,
            name: new.name,
            email: new.email,
            subject: new.subject,
            message: new.message,
            created_at: OffsetDateTime::now_utc(),
        };
        self.contact_messages.insert(id, msg.clone());
        debug!(id, "contact message stored");
        Ok(msg)
    }

    /// Usernames match ignoring ASCII case.
    pub(crate) fn creator_by_username(&self, username: &str) -> Option<&Creator> {
        self.creators
            .values()
            .find(|c| c.username.eq_ignore_ascii_case(username))
    }

    pub(crate) fn creator_by_email(&self, email: &str) -> Option<&Creator> {
        self.creators
            .values()
            .find(|c| c.email.eq_ignore_ascii_case(email))
    }

    pub(crate) fn services_for_creator(&self, creator_id: u32) -> Vec<Service> {
        self.services
            .values()
            .filter(|s| s.creator_id == creator_id)
            .cloned()
            .collect()
    }
}

/// Shared handle to the in-memory store.
///
/// Cloning is cheap; all clones see the same collections. A single
/// store-wide lock guards every collection so multi-step operations can run
/// as one critical section.
#[derive(Clone, Default)]
pub struct Store {
    inner: Arc<RwLock<Tables>>,
}

impl Store {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store populated with the bundled sample data.
    pub fn with_sample_data() -> Result<Self> {
        let store = Self::new();
        crate::seed::populate(&mut store.write())?;
        Ok(store)
    }

    pub(crate) fn read(&self) -> RwLockReadGuard<'_, Tables> {
        self.inner.read()
    }

    pub(crate) fn write(&self) -> RwLockWriteGuard<'_, Tables> {
        self.inner.write()
    }

    pub fn create_creator(&self, new: NewCreator) -> Result<Creator> {
        self.write().insert_creator(new)
    }

    pub fn create_service(&self, new: NewService) -> Result<Service> {
        self.write().insert_service(new)
    }

    pub fn create_testimonial(&self, new: NewTestimonial) -> Result<Testimonial> {
        self.write().insert_testimonial(new)
    }

    pub fn create_contact_message(&self, new: NewContactMessage) -> Result<ContactMessage> {
        self.write().insert_contact_message(new)
    }

    pub fn creator(&self, id: u32) -> Option<Creator> {
        self.read().creators.get(&id).cloned()
    }

    pub fn creator_by_username(&self, username: &str) -> Option<Creator> {
        self.read().creator_by_username(username).cloned()
    }

    pub fn creators(&self) -> Vec<Creator> {
        self.read().creators.values().cloned().collect()
    }

    pub fn service(&self, id: u32) -> Option<Service> {
        self.read().services.get(&id).cloned()
    }

    pub fn services_for_creator(&self, creator_id: u32) -> Vec<Service> {
        self.read().services_for_creator(creator_id)
    }

    pub fn testimonials(&self) -> Vec<Testimonial> {
        self.read().testimonials.values().cloned().collect()
    }

    pub fn contact_messages(&self) -> Vec<ContactMessage> {
        self.read().contact_messages.values().cloned().collect()
    }

    pub fn conversation(&self, id: u32) -> Option<Conversation> {
        self.read().conversations.get(&id).cloned()
    }

    pub fn message(&self, id: u32) -> Option<Message> {
        self.read().messages.get(&id).cloned()
    }
}
