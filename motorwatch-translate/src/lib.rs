//! Translation enrichment for collected articles
//!
//! Two REST providers (Google Translate v2, Papago) behind a fallback
//! service: providers are tried strictly in order and the first non-empty
//! result wins. Results are cached for the lifetime of the service so
//! repeat runs never re-bill the same text.

pub mod error;
pub mod google;
pub mod papago;
pub mod provider;
pub mod service;

pub use error::TranslateError;
pub use google::GoogleTranslateClient;
pub use papago::PapagoClient;
pub use provider::TranslateProvider;
pub use service::TranslationService;
