//! The MotorWatch collection pipeline
//!
//! Wires the source adapters, validator, and translator into one run:
//! fetch -> dedup -> validate -> enrich -> persist -> summarize. Also owns
//! the SQLite article store, the insight engine, and the JSON snapshot
//! writer consumed by the dashboard.

pub mod collector;
pub mod dedup;
pub mod insight;
pub mod snapshot;
pub mod store;

pub use collector::{CollectorConfig, CollectorError, NewsCollector, RunReport, Stage};
pub use dedup::dedup_by_url;
pub use insight::InsightEngine;
pub use snapshot::{SnapshotError, SnapshotWriter};
pub use store::{ArticleStore, StoreError};
