//! Sample data loaded into a fresh store at startup.

use time::{Duration, OffsetDateTime};

use crate::error::Result;
use crate::model::{Message, NewCreator, NewService, NewTestimonial, ServiceInput};
use crate::store::Tables;

struct CreatorSeed {
    name: &'static str,
    username: &'static str,
    bio: &'static str,
    avatar: &'static str,
    platform: &'static str,
    followers: u32,
}

const CREATORS: &[CreatorSeed] = &[
    CreatorSeed {
        name: "Priya Sharma",
        username: "priyasharma",
        bio: "Wellness & Lifestyle expert helping you live your best life",
        avatar: "https://images.unsplash.com/photo-1494790108377-be9c29b29330",
        platform: "instagram",
        followers: 145_000,
    },
    CreatorSeed {
        name: "Rahul Mehta",
        username: "rahulmehta",
        bio: "Tech & Business advisor helping professionals grow their careers",
        avatar: "https://images.unsplash.com/photo-1560250097-0b93528c311a",
        platform: "linkedin",
        followers: 78_000,
    },
    CreatorSeed {
        name: "Arjun Dev",
        username: "arjundev",
        bio: "Travel & Photography enthusiast showing you the world",
        avatar: "https://images.unsplash.com/photo-1539571696357-5a69c17a67c6",
        platform: "youtube",
        followers: 450_000,
    },
    CreatorSeed {
        name: "Anjali Kapoor",
        username: "anjalikapoor",
        bio: "Fashion and beauty creator helping you look and feel your best",
        avatar: "https://images.unsplash.com/photo-1501196354995-cbb51c65aaea",
        platform: "instagram",
        followers: 89_000,
    },
    CreatorSeed {
        name: "Vikram Singh",
        username: "vikramsingh",
        bio: "Fitness coach providing workout and nutrition guidance",
        avatar: "https://images.unsplash.com/photo-1566492031773-4f4e44671857",
        platform: "youtube",
        followers: 320_000,
    },
    CreatorSeed {
        name: "Neha Gupta",
        username: "nehagupta",
        bio: "Lifestyle creator sharing daily inspiration and tips",
        avatar: "https://images.unsplash.com/photo-1487412720507-e7ab37603c6f",
        platform: "instagram",
        followers: 45_000,
    },
];

// (creator, title, description, price, delivery days, revisions, deliverables)
type ServiceSeed = (u32, &'static str, &'static str, u64, u32, u32, &'static str);

const SERVICES: &[ServiceSeed] = &[
    (1, "Sponsored Post", "Product feature with detailed review on Instagram", 25_000, 7, 2,
        "1 Instagram Post,Professional Photography,Performance Report,Custom Caption"),
    (1, "1:1 Wellness Coaching", "60-minute personalized wellness session", 3_500, 3, 0,
        "60-minute Video Call,Customized Wellness Plan,2 Weeks of Follow-up Support"),
    (2, "Career Consultation", "Resume review & personalized career strategy", 7_500, 5, 1,
        "Resume Review,LinkedIn Profile Optimization,60-minute Strategy Call,30-day Action Plan"),
    (2, "Tech Webinar", "Sponsored tech talk for your team", 35_000, 14, 2,
        "90-minute Interactive Webinar,Q&A Session,Presentation Slides,Resource Guide"),
    (3, "Destination Feature", "Dedicated travel vlog featuring your location", 50_000, 30, 1,
        "10-15 minute YouTube Video,Instagram Stories Coverage,Professional Editing,Location Tags and Mentions"),
    (3, "Photography Masterclass", "2-hour group workshop on travel photography", 2_000, 7, 0,
        "2-hour Live Workshop,Editing Presets Pack,Technique Guide PDF,Q&A Session"),
    (4, "Fashion Collaboration", "Styling and outfit review for your brand", 30_000, 10, 2,
        "Instagram Post,3 Instagram Stories,Behind-the-Scenes Content,Styling Tips"),
    (5, "Fitness Program", "Custom 4-week workout and nutrition plan", 5_000, 5, 1,
        "Custom Workout Plan,Nutrition Guide,Exercise Demonstration Videos,Weekly Check-ins"),
    (6, "Lifestyle Promotion", "Product integration in daily content", 15_000, 14, 1,
        "1 Instagram Post,3 Instagram Stories,Content Usage Rights,Performance Analytics"),
];

const TESTIMONIALS: &[(&str, &str, &str, u32, &str)] = &[
    ("Vikram Rajput", "https://images.unsplash.com/photo-1535713875002-d1d0cf377fde", "youtube", 320_000,
        "ApnaCreator completely transformed how I monetize my tech tutorials. I've collaborated with 3 major tech brands and increased my monthly revenue by 240% in just 6 months!"),
    ("Neha Gupta", "https://images.unsplash.com/photo-1494790108377-be9c29b29330", "instagram", 45_000,
        "As a micro-influencer, I was struggling to get brand deals. With ApnaCreator, I've been able to set up my coaching services and connect with brands that perfectly align with my values."),
    ("Karan Singhania", "https://images.unsplash.com/photo-1507003211169-0a1dd7228f2d", "linkedin", 65_000,
        "The platform made it easy to offer business consultations and connect with other LinkedIn creators. I've built a community that's both profitable and genuinely helpful to my audience."),
];

/// Fill empty tables with the sample creators, services, testimonials and
/// two conversations. Timestamps are relative to now.
pub(crate) fn populate(tables: &mut Tables) -> Result<()> {
    for c in CREATORS {
        tables.insert_creator(NewCreator {
            name: c.name.into(),
            username: c.username.into(),
            email: format!("{}@example.com", c.name.split(' ').next().unwrap_or(c.username).to_lowercase()),
            bio: Some(c.bio.into()),
            avatar: Some(c.avatar.into()),
            platform: c.platform.into(),
            followers: Some(c.followers),
            verified: Some(true),
        })?;
    }

    for &(creator_id, title, description, price, days, revisions, deliverables) in SERVICES {
        tables.insert_service(NewService {
            creator_id,
            input: ServiceInput {
                title: title.into(),
                description: description.into(),
                price,
                delivery_days: Some(days),
                revisions: Some(revisions),
                deliverables: deliverables.split(',').map(str::to_owned).collect(),
            },
        })?;
    }

    for &(name, avatar, platform, followers, content) in TESTIMONIALS {
        tables.insert_testimonial(NewTestimonial {
            name: name.into(),
            avatar: Some(avatar.into()),
            platform: platform.into(),
            followers: Some(followers),
            content: content.into(),
            rating: 5,
        })?;
    }

    let now = OffsetDateTime::now_utc();
    let one_hour_ago = now - Duration::hours(1);
    let two_hours_ago = now - Duration::hours(2);
    let three_days_ago = now - Duration::days(3);

    let priya_rahul = tables.insert_conversation(1, 2, three_days_ago, Some(now))?.id;
    let priya_arjun = tables.insert_conversation(1, 3, three_days_ago, Some(two_hours_ago))?.id;

    let history = [
        (priya_rahul, 1, 2, "Hi Rahul, I was wondering if you'd be interested in collaborating on a wellness tech series?", true, three_days_ago),
        (priya_rahul, 2, 1, "Hi Priya! That sounds interesting. What kind of collaboration did you have in mind?", true, three_days_ago + Duration::minutes(30)),
        (priya_rahul, 1, 2, "I'm thinking of a series on how technology can help with wellness tracking and mental health. Your tech expertise combined with my wellness focus could make great content.", true, two_hours_ago),
        (priya_rahul, 2, 1, "That's a great idea! I've been exploring some AI-powered wellness apps recently that could be perfect for this. When would you like to start?", true, one_hour_ago),
        (priya_rahul, 1, 2, "How about next week? We could do a planning session on Monday and maybe film the first episode on Thursday?", false, now),
        (priya_arjun, 3, 1, "Hey Priya, I loved your recent wellness retreat vlog. The location looked amazing!", true, three_days_ago),
        (priya_arjun, 1, 3, "Thanks Arjun! It was in the hills near Rishikesh. I'd be happy to connect you with the property owner if you're interested in featuring it.", true, three_days_ago + Duration::hours(2)),
        (priya_arjun, 3, 1, "That would be incredible! I'm planning a wellness travel series and that location would be perfect.", true, two_hours_ago),
    ];
    for (conversation_id, sender_id, receiver_id, content, read, created_at) in history {
        let id = tables.next_message_id()?;
        tables.messages.insert(
            id,
            Message {
                id,
                conversation_id,
                sender_id,
                receiver_id,
                content: content.into(),
                read,
                created_at,
            },
        );
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use crate::store::Store;

    #[test]
    fn sample_data_shape() {
        let store = Store::with_sample_data().unwrap();
        assert_eq!(store.creators().len(), 6);
        assert_eq!(store.services_for_creator(1).len(), 2);
        assert_eq!(store.services_for_creator(6).len(), 1);
        assert_eq!(store.testimonials().len(), 3);
        assert_eq!(store.creator(2).unwrap().email, "rahul@example.com");
        assert_eq!(store.service(1).unwrap().deliverables.len(), 4);
    }

    #[test]
    fn sample_conversations_and_unread() {
        let store = Store::with_sample_data().unwrap();
        let convs = store.conversations_for_creator(1);
        assert_eq!(convs.iter().map(|c| c.id).collect::<Vec<_>>(), [1, 2]);
        assert_eq!(store.messages_for_conversation(1).len(), 5);
        assert_eq!(store.unread_count(2), 1);
        assert_eq!(store.unread_count(1), 0);

        // fresh ids continue after the seeded rows
        let c = store.get_or_create_conversation(2, 3).unwrap();
        assert_eq!(c.id, 3);
        assert_eq!(store.create_message(c.id, 2, "hi").unwrap().id, 9);
        assert_eq!(store.get_or_create_conversation(2, 1).unwrap().id, 1);
    }
}
