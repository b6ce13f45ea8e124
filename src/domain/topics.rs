//! Topic keyword sets and detection.
//!
//! A topic matches a post when any of its keywords occurs in the post text,
//! compared case-insensitively as plain substrings.

use serde::{Deserialize, Serialize};

/// A lead category: keywords to look for plus the voice used when replying.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Topic {
    /// Stable identifier (e.g. "realestate").
    pub key: String,
    /// Human label used in logs and email subjects.
    pub display_name: String,
    pub keywords: Vec<String>,
    /// System prompt for the reply drafter.
    #[serde(default)]
    pub persona: String,
    /// Reply used when no text-generation service is configured.
    #[serde(default)]
    pub fallback_reply: String,
    /// Reply used when the text-generation service fails.
    #[serde(default)]
    pub error_reply: String,
}

impl Topic {
    /// True when any keyword occurs in `lowered_text` (already lower-cased).
    fn matches_lowered(&self, lowered_text: &str) -> bool {
        self.keywords
            .iter()
            .any(|kw| lowered_text.contains(&kw.to_lowercase()))
    }

    /// Reply for the drafter-error path; falls back to `fallback_reply` when unset.
    pub fn error_reply_or_fallback(&self) -> &str {
        if self.error_reply.is_empty() {
            &self.fallback_reply
        } else {
            &self.error_reply
        }
    }
}

/// Ordered collection of topics. Order drives digest order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TopicSet {
    topics: Vec<Topic>,
}

impl TopicSet {
    pub fn new(topics: Vec<Topic>) -> Self {
        Self { topics }
    }

    /// Built-in pickleball and real-estate topics, signed with `persona_name`.
    pub fn defaults(persona_name: &str) -> Self {
        Self::new(vec![pickleball(persona_name), real_estate(persona_name)])
    }

    /// Topics loaded from configuration, or the defaults when none are configured.
    pub fn from_configured(configured: Option<Vec<Topic>>, persona_name: &str) -> Self {
        match configured {
            Some(topics) if !topics.is_empty() => Self::new(topics),
            _ => Self::defaults(persona_name),
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = &Topic> {
        self.topics.iter()
    }

    pub fn get(&self, key: &str) -> Option<&Topic> {
        self.topics.iter().find(|t| t.key == key)
    }

    pub fn len(&self) -> usize {
        self.topics.len()
    }

    pub fn is_empty(&self) -> bool {
        self.topics.is_empty()
    }

    /// Every topic whose keywords occur in `text`, in set order.
    pub fn detect_topics(&self, text: &str) -> Vec<&Topic> {
        let lowered = text.to_lowercase();
        self.topics
            .iter()
            .filter(|t| t.matches_lowered(&lowered))
            .collect()
    }
}

fn words(list: &[&str]) -> Vec<String> {
    list.iter().map(|s| s.to_string()).collect()
}

fn pickleball(name: &str) -> Topic {
    Topic {
        key: "pickleball".to_string(),
        display_name: "Pickleball".to_string(),
        keywords: words(&[
            "pickleball",
            "paddle",
            "paddles",
            "court",
            "courts",
            "open play",
            "drop in",
            "clinic",
            "lessons",
            "beginner",
            "beginners",
            "round robin",
            "event",
            " looking to play",
        ]),
        persona: format!(
            "You are {name}, organizer of \"Pickleball & Wellness Collective\" in Irvine. \
             You write short, warm, non-spammy replies inviting people to play or reach out."
        ),
        fallback_reply: format!(
            "Hey! I'm {name} and I run Pickleball & Wellness Collective here in Irvine. \
             If you ever want to hit, learn the game, or find local courts and meetups, I’d love to help."
        ),
        error_reply: format!(
            "Hey! I'm {name} and I run a local pickleball group in Irvine. \
             If you’d like to find courts or join a meetup, feel free to reach out."
        ),
    }
}

fn real_estate(name: &str) -> Topic {
    Topic {
        key: "realestate".to_string(),
        display_name: "Real Estate".to_string(),
        keywords: words(&[
            "moving to",
            "relocating to",
            "move to irvine",
            "move to oc",
            "rent in",
            "rental in",
            "apartment",
            "condo",
            "townhome",
            "townhouse",
            "buy a house",
            "buying a house",
            "home prices",
            "house prices",
            "zillow",
            "redfin",
            "realtor",
            "real estate agent",
            "mortgage",
            "pre approval",
            "down payment",
            "we are moving from",
            "looking for a small home",
            "looking for a condo",
            "looking for a home",
            "looking for a realtor",
            "does anyone know a realtor",
            "need a real estate agent",
        ]),
        persona: format!(
            "You are {name}, an Irvine-based real estate agent. You write short, warm, \
             non-pushy replies that invite people to connect if they want help, but never sound like spam."
        ),
        fallback_reply: format!(
            "Hi! I'm {name}, a local real estate agent in Irvine and surrounding areas. \
             Happy to be a resource if you ever want to chat about neighborhoods, prices, or next steps — no pressure at all."
        ),
        error_reply: format!(
            "Hi! I'm {name}, a local agent in Irvine/OC. If you ever want a second set of eyes \
             on neighborhoods, prices, or options, I’m happy to help — no pressure."
        ),
    }
}
