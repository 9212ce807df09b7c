pub mod config;
pub mod enforcement;
pub mod error;
pub mod notify;
pub mod platform;
pub mod sentry;
pub mod webhook;
pub mod workflow;

pub use sentry::Sentry;
