//! Outbound ports. Application calls into infrastructure.
//!
//! Implemented by adapters.

use crate::domain::{Digest, DomainError, Lead, ScanDepth, ScrapedPost, Topic};

/// Headless browser capability. Loads group feeds and extracts articles.
#[async_trait::async_trait]
pub trait GroupBrowser: Send + Sync {
    /// Open a group page, scroll according to `depth` and return its articles
    /// in feed order (at most `depth.max_posts()`).
    async fn scan_group(
        &self,
        group_url: &str,
        depth: ScanDepth,
    ) -> Result<Vec<ScrapedPost>, DomainError>;

    /// Shut the browser down. Called once after all groups are scanned.
    async fn close(&self) -> Result<(), DomainError>;
}

/// Persisted set of post identifiers already processed.
#[async_trait::async_trait]
pub trait SeenStore: Send + Sync {
    /// True when no seen file existed at startup.
    fn is_first_run(&self) -> bool;

    async fn contains(&self, post_id: &str) -> bool;

    /// Mark a post as seen (in memory until `persist`).
    async fn insert(&self, post_id: String);

    /// Write the whole set to durable storage.
    async fn persist(&self) -> Result<(), DomainError>;
}

/// Text-generation service drafting a reply to a lead.
#[async_trait::async_trait]
pub trait ReplyDrafter: Send + Sync {
    async fn draft_reply(&self, topic: &Topic, lead: &Lead) -> Result<String, DomainError>;
}

/// Transactional email service.
#[async_trait::async_trait]
pub trait Mailer: Send + Sync {
    /// Send the digest. Returns the provider's message id.
    async fn send(&self, from: &str, to: &str, digest: &Digest) -> Result<String, DomainError>;
}
