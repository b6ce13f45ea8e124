//! Core domain layer. No external I/O dependencies.
//!
//! Entities and business rules live here. Dependencies flow inward.

pub mod digest;
pub mod entities;
pub mod errors;
pub mod topics;

pub use digest::{Digest, render_digest};
pub use entities::{DraftedLead, Lead, ScanDepth, ScrapedPost, global_post_id, pseudo_id};
pub use errors::DomainError;
pub use topics::{Topic, TopicSet};
