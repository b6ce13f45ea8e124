//! Browser adapters. Implement GroupBrowser over Chromium/CDP.

pub mod chromium;
pub mod cookies;

pub use chromium::{ChromiumBrowser, ChromiumOptions};
