//! Persistence adapters.

pub mod seen_json;

pub use seen_json::SeenJson;
