//! Infrastructure adapters. Implement outbound ports.
//!
//! Browser, filesystem, text generation, mail. Map errors to DomainError.

pub mod ai;
pub mod browser;
pub mod mail;
pub mod persistence;
pub mod ui;
