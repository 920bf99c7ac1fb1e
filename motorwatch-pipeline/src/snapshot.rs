//! JSON snapshot of a collection run
//!
//! The file-mode output consumed by the dashboard: one document holding the
//! freshest articles and the run's insights. Written via temp-file-then-
//! rename so a crash mid-write never corrupts the previous good snapshot.

use std::path::{Path, PathBuf};

use chrono::Utc;
use serde::Serialize;
use tracing::info;

use motorwatch_core::{Article, InsightSummary};

/// The persisted snapshot document
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct SnapshotDocument<'a> {
    last_updated: String,
    articles: &'a [Article],
    insights: &'a InsightSummary,
    total_collected: usize,
}

/// Writes run snapshots atomically to a fixed path
pub struct SnapshotWriter {
    path: PathBuf,
    max_articles: usize,
}

impl SnapshotWriter {
    /// Create a writer targeting `path`, keeping at most `max_articles`
    /// articles per snapshot
    pub fn new<P: AsRef<Path>>(path: P, max_articles: usize) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
            max_articles,
        }
    }

    /// Write a snapshot of the given corpus and insights.
    ///
    /// `totalCollected` reflects the full corpus even when the article list
    /// is capped.
    pub fn write(
        &self,
        articles: &[Article],
        insights: &InsightSummary,
    ) -> Result<(), SnapshotError> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }

        let kept = &articles[..articles.len().min(self.max_articles)];

        let document = SnapshotDocument {
            last_updated: Utc::now().to_rfc3339(),
            articles: kept,
            insights,
            total_collected: articles.len(),
        };

        let bytes = serde_json::to_vec_pretty(&document)?;

        let tmp = self.path.with_extension("json.tmp");
        std::fs::write(&tmp, bytes)?;
        std::fs::rename(&tmp, &self.path)?;

        info!(
            "Snapshot written to {} ({} of {} articles)",
            self.path.display(),
            kept.len(),
            articles.len()
        );

        Ok(())
    }
}

/// Errors that can occur while writing a snapshot
#[derive(Debug, thiserror::Error)]
pub enum SnapshotError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialize(#[from] serde_json::Error),
}
