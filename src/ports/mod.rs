//! Port traits. API boundaries for the hexagon.
//!
//! Outbound only: called by the use cases into infrastructure.

pub mod outbound;

pub use outbound::{GroupBrowser, Mailer, ReplyDrafter, SeenStore};
