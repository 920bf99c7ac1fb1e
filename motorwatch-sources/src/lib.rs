//! News source adapters for the MotorWatch pipeline
//!
//! This crate provides clients for fetching EV-motor news from:
//! - NewsAPI: keyword search over indexed publishers (optional, needs a key)
//! - Google News RSS: search feed, no credential required
//!
//! plus the URL liveness validator used before articles are persisted.

pub mod adapter;
pub mod error;
pub mod google_news;
pub mod newsapi;
pub mod validator;

pub use adapter::SourceAdapter;
pub use error::SourceError;
pub use google_news::GoogleNewsClient;
pub use newsapi::NewsApiClient;
pub use validator::{HttpUrlValidator, LinkValidator};
