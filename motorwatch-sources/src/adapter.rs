//! The uniform fetch seam every news source implements

use async_trait::async_trait;

use motorwatch_core::Article;

/// A news source the collector can pull articles from.
///
/// `fetch` never fails past this boundary: transport and parse errors are
/// logged by the implementation and yield an empty Vec, never partial
/// corrupt entries. A source missing its credential is expected to return
/// an empty Vec as well (soft-disable, not an error).
#[async_trait]
pub trait SourceAdapter: Send + Sync {
    /// Human-readable source name for logging
    fn name(&self) -> &str;

    /// Fetch articles matching a search query
    async fn fetch(&self, query: &str) -> Vec<Article>;
}
