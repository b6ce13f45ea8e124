//! Domain errors. Used by ports and use cases.
//!
//! Adapters map infrastructure errors into these.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum DomainError {
    #[error("Browser error: {0}")]
    Browser(String),

    #[error("Seen-set error: {0}")]
    State(String),

    #[error("Reply drafting failed: {0}")]
    Ai(String),

    #[error("Mail delivery failed: {0}")]
    Mail(String),
}
