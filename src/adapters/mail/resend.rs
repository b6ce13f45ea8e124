//! Resend adapter. Implements Mailer by posting to the Resend REST API.

use crate::domain::{Digest, DomainError};
use crate::ports::Mailer;
use reqwest::Client;
use serde::Deserialize;
use std::sync::Arc;
use tracing::info;

const RESEND_EMAILS_URL: &str = "https://api.resend.com/emails";

/// Resend API adapter for sending digest emails.
///
/// Requires an API key from https://resend.com/api-keys.
pub struct ResendAdapter {
    client: Arc<Client>,
    api_key: String,
    endpoint: String,
}

#[derive(Deserialize)]
struct SendResponse {
    id: Option<String>,
}

impl ResendAdapter {
    pub fn new(api_key: String) -> Self {
        Self::with_endpoint(api_key, RESEND_EMAILS_URL.to_string())
    }

    /// Point the adapter at a different endpoint (self-hosted relay, tests).
    pub fn with_endpoint(api_key: String, endpoint: String) -> Self {
        Self {
            client: Arc::new(Client::new()),
            api_key,
            endpoint,
        }
    }

    fn body(from: &str, to: &str, digest: &Digest) -> serde_json::Value {
        serde_json::json!({
            "from": from,
            "to": to,
            "subject": digest.subject,
            "html": digest.html,
            "text": digest.text,
        })
    }
}

#[async_trait::async_trait]
impl Mailer for ResendAdapter {
    async fn send(&self, from: &str, to: &str, digest: &Digest) -> Result<String, DomainError> {
        let res = self
            .client
            .post(&self.endpoint)
            .bearer_auth(&self.api_key)
            .json(&Self::body(from, to, digest))
            .send()
            .await
            .map_err(|e| DomainError::Mail(format!("Request failed: {}", e)))?;

        if !res.status().is_success() {
            let status = res.status();
            let text = res.text().await.unwrap_or_else(|_| "unknown".to_string());
            return Err(DomainError::Mail(format!(
                "Resend API error {}: {}",
                status, text
            )));
        }

        let parsed: SendResponse = res
            .json()
            .await
            .map_err(|e| DomainError::Mail(format!("Failed to parse response: {}", e)))?;
        let id = parsed.id.unwrap_or_else(|| "unknown".to_string());
        info!(id = %id, subject = %digest.subject, "email accepted by Resend");
        Ok(id)
    }
}
