//! OpenAI-compatible adapter for reply drafting.
//!
//! Supports OpenAI API, Azure OpenAI, and local Ollama instances.
//! Implements `ReplyDrafter` with the topic persona as system prompt.

use crate::domain::{DomainError, Lead, Topic};
use crate::ports::ReplyDrafter;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

/// Post text beyond this many characters is not sent to the model.
const MAX_POST_CHARS: usize = 1200;

/// OpenAI-compatible reply drafter.
pub struct OpenAiAdapter {
    client: reqwest::Client,
    api_url: String,
    api_key: String,
    model: String,
}

impl OpenAiAdapter {
    /// Create a new OpenAI adapter.
    ///
    /// # Arguments
    /// * `api_url` - API endpoint (e.g., "https://api.openai.com/v1/chat/completions")
    /// * `api_key` - API key (can be empty for local Ollama)
    /// * `model` - Model name (e.g., "gpt-4.1", "llama3.2")
    pub fn new(api_url: String, api_key: String, model: String) -> Self {
        Self {
            client: reqwest::Client::new(),
            api_url,
            api_key,
            model,
        }
    }

    /// Build the user prompt for one lead.
    fn user_prompt(lead: &Lead) -> String {
        let snippet: String = lead.text.chars().take(MAX_POST_CHARS).collect();
        format!(
            r#"
Group URL: {}

Post text:
"""
{}
"""

Write a reply in 2-4 sentences, first person ("I"), casual but clear, and helpful.
Mention that you're local to Irvine / Orange County.
Invite them to DM or connect if they'd like more info.
Do NOT be salesy or pushy.
"#,
            lead.group_url, snippet
        )
    }
}

/// OpenAI API request structure.
#[derive(Serialize)]
struct ChatRequest {
    model: String,
    messages: Vec<ChatMessage>,
}

#[derive(Serialize)]
struct ChatMessage {
    role: String,
    content: String,
}

/// OpenAI API response structure.
#[derive(Deserialize)]
struct ChatResponse {
    choices: Vec<Choice>,
}

#[derive(Deserialize)]
struct Choice {
    message: MessageContent,
}

#[derive(Deserialize)]
struct MessageContent {
    content: Option<String>,
}

#[async_trait::async_trait]
impl ReplyDrafter for OpenAiAdapter {
    async fn draft_reply(&self, topic: &Topic, lead: &Lead) -> Result<String, DomainError> {
        info!(
            topic = %topic.key,
            group = %lead.group_url,
            text_len = lead.text.len(),
            "requesting suggested reply"
        );

        let request = ChatRequest {
            model: self.model.clone(),
            messages: vec![
                ChatMessage {
                    role: "system".to_string(),
                    content: topic.persona.clone(),
                },
                ChatMessage {
                    role: "user".to_string(),
                    content: Self::user_prompt(lead),
                },
            ],
        };

        let response = self
            .client
            .post(&self.api_url)
            .header("Authorization", format!("Bearer {}", self.api_key))
            .header("Content-Type", "application/json")
            .json(&request)
            .send()
            .await
            .map_err(|e| DomainError::Ai(format!("HTTP request failed: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let text = response.text().await.unwrap_or_default();
            warn!(status = %status, body = %text, "AI API returned error");
            return Err(DomainError::Ai(format!(
                "API error {}: {}",
                status,
                text.chars().take(200).collect::<String>()
            )));
        }

        let chat_response: ChatResponse = response
            .json()
            .await
            .map_err(|e| DomainError::Ai(format!("Failed to parse API response: {}", e)))?;

        let reply = chat_response
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .map(|c| c.trim().to_string())
            .filter(|c| !c.is_empty())
            .ok_or_else(|| DomainError::Ai("No response choices returned".to_string()))?;

        debug!(reply_len = reply.len(), "received suggested reply");
        Ok(reply)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lead(text: &str) -> Lead {
        Lead {
            group_url: "https://www.facebook.com/groups/ocpickleball".to_string(),
            group_name: None,
            text: text.to_string(),
            post_link: None,
        }
    }

    #[test]
    fn test_user_prompt_includes_group_and_text() {
        let prompt = OpenAiAdapter::user_prompt(&lead("Any beginner clinics?"));
        assert!(prompt.contains("Group URL: https://www.facebook.com/groups/ocpickleball"));
        assert!(prompt.contains("\"\"\"\nAny beginner clinics?\n\"\"\""));
        assert!(prompt.contains("Do NOT be salesy or pushy."));
    }

    #[test]
    fn test_user_prompt_truncates_long_posts() {
        let prompt = OpenAiAdapter::user_prompt(&lead(&"z".repeat(5000)));
        assert!(prompt.contains(&"z".repeat(MAX_POST_CHARS)));
        assert!(!prompt.contains(&"z".repeat(MAX_POST_CHARS + 1)));
    }

    #[test]
    fn test_response_without_content_parses() {
        let raw = r#"{"choices":[{"message":{"role":"assistant","content":null}}]}"#;
        let parsed: ChatResponse = serde_json::from_str(raw).unwrap();
        assert!(parsed.choices[0].message.content.is_none());
    }
}
