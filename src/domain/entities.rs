//! Domain entities. Pure data structures for the core business.
//!
//! No browser/IO types here; adapters map into these.

use serde::{Deserialize, Serialize};

/// Number of leading characters of a post used to build its identity.
const PSEUDO_ID_PREFIX_CHARS: usize = 80;

/// How far down a group feed to scroll and how many articles to keep.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScanDepth {
    /// Regular run: a few scroll rounds.
    Shallow,
    /// First run (no seen file yet): scroll further to backfill. A corrupt
    /// seen file starts empty but still scans shallow.
    Deep,
}

impl ScanDepth {
    pub fn scroll_rounds(self) -> u32 {
        match self {
            ScanDepth::Shallow => 3,
            ScanDepth::Deep => 10,
        }
    }

    pub fn max_posts(self) -> usize {
        match self {
            ScanDepth::Shallow => 15,
            ScanDepth::Deep => 60,
        }
    }
}

/// A single article scraped from a group feed, in feed order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScrapedPost {
    pub text: String,
    pub post_link: Option<String>,
}

/// A post that matched at least one topic.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Lead {
    pub group_url: String,
    /// Group display name; the scraper does not resolve it yet.
    pub group_name: Option<String>,
    pub text: String,
    pub post_link: Option<String>,
}

/// A lead with the reply suggested for it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DraftedLead {
    pub lead: Lead,
    pub suggested_reply: String,
}

/// Identity of a post within a single group page: a whitespace-collapsed
/// prefix of its text plus its position in the feed.
///
/// The prefix is 80 Unicode scalar values, not UTF-16 code units. A post with
/// characters outside the BMP (emoji) gets a longer prefix than a JS scraper
/// would compute, so such posts will not match ids in a seen file written by
/// that older tool and are reported once more.
pub fn pseudo_id(text: &str, index: usize) -> String {
    let prefix: String = text.chars().take(PSEUDO_ID_PREFIX_CHARS).collect();
    let key_base = prefix.split_whitespace().collect::<Vec<_>>().join(" ");
    format!("{}::{}", key_base, index)
}

/// Dedup key persisted in the seen set.
pub fn global_post_id(group_url: &str, pseudo_id: &str) -> String {
    format!("{}::{}", group_url, pseudo_id)
}
