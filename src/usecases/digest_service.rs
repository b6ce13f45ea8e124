//! Digest use case: draft a reply for each lead, render the email, send it.

use crate::domain::{DomainError, DraftedLead, Lead, Topic, render_digest};
use crate::ports::{Mailer, ReplyDrafter};
use std::sync::Arc;
use tracing::{error, info, warn};

/// Sender and recipient for digest emails.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MailSettings {
    pub from: String,
    pub to: String,
}

pub struct DigestService {
    drafter: Arc<dyn ReplyDrafter>,
    /// None when mail delivery is not configured; digests are then skipped.
    mailer: Option<(Arc<dyn Mailer>, MailSettings)>,
}

impl DigestService {
    pub fn new(
        drafter: Arc<dyn ReplyDrafter>,
        mailer: Option<(Arc<dyn Mailer>, MailSettings)>,
    ) -> Self {
        Self { drafter, mailer }
    }

    /// Draft replies and send the digest for one topic.
    ///
    /// Returns the delivery id, or None when there was nothing to send or mail
    /// is not configured. Drafting failures fall back to the topic's canned
    /// reply; only delivery failures are returned as errors.
    pub async fn send_digest(
        &self,
        topic: &Topic,
        leads: &[Lead],
    ) -> Result<Option<String>, DomainError> {
        let Some((mailer, settings)) = &self.mailer else {
            warn!(topic = %topic.key, "mail not configured, skipping digest");
            return Ok(None);
        };
        if leads.is_empty() {
            return Ok(None);
        }

        let mut drafted = Vec::with_capacity(leads.len());
        for lead in leads {
            let suggested_reply = self.draft_or_fallback(topic, lead).await;
            drafted.push(DraftedLead {
                lead: lead.clone(),
                suggested_reply,
            });
        }

        let digest = render_digest(&topic.display_name, &drafted);
        let id = mailer.send(&settings.from, &settings.to, &digest).await?;
        info!(
            topic = %topic.key,
            leads = drafted.len(),
            id = %id,
            "{} summary email sent", topic.display_name
        );
        Ok(Some(id))
    }

    async fn draft_or_fallback(&self, topic: &Topic, lead: &Lead) -> String {
        match self.drafter.draft_reply(topic, lead).await {
            Ok(reply) => reply,
            Err(e) => {
                error!(topic = %topic.key, error = %e, "reply drafting failed, using fallback");
                topic.error_reply_or_fallback().to_string()
            }
        }
    }
}
