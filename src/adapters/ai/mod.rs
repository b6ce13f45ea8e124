//! AI adapter module. Implements ReplyDrafter for LLM integration.
//!
//! Provides an OpenAI-compatible adapter and a canned fallback.

pub mod canned_adapter;
pub mod openai_adapter;

pub use canned_adapter::CannedAdapter;
pub use openai_adapter::OpenAiAdapter;
