//! The seam every translation backend implements

use async_trait::async_trait;

use crate::error::TranslateError;

/// One translation backend in the fallback chain
#[async_trait]
pub trait TranslateProvider: Send + Sync {
    /// Provider name for logging
    fn name(&self) -> &str;

    /// Translate `text` between the given language codes
    async fn translate(
        &self,
        text: &str,
        source: &str,
        target: &str,
    ) -> Result<String, TranslateError>;
}
