//! Canned reply drafter used when no text-generation service is configured.
//!
//! Returns the topic's fixed fallback reply without making API calls.

use crate::domain::{DomainError, Lead, Topic};
use crate::ports::ReplyDrafter;
use tracing::debug;

/// Drafter that always answers with `Topic::fallback_reply`.
#[derive(Debug, Default)]
pub struct CannedAdapter;

impl CannedAdapter {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait::async_trait]
impl ReplyDrafter for CannedAdapter {
    async fn draft_reply(&self, topic: &Topic, lead: &Lead) -> Result<String, DomainError> {
        debug!(topic = %topic.key, group = %lead.group_url, "using canned reply");
        Ok(topic.fallback_reply.clone())
    }
}
