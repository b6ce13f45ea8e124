//! Application use cases. Orchestrate domain logic via ports.

pub mod digest_service;
pub mod scan_service;

pub use digest_service::{DigestService, MailSettings};
pub use scan_service::{ScanReport, ScanService};

#[cfg(test)]
pub(crate) mod fakes;
