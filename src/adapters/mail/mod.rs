//! Mail adapters. Implement Mailer.

pub mod resend;

pub use resend::ResendAdapter;
