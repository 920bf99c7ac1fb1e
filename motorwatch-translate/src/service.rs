//! Ordered-fallback translation service with a process-lifetime cache

use dashmap::DashMap;
use tracing::warn;

use crate::provider::TranslateProvider;

type CacheKey = (String, String, String);

/// Translation service over an ordered provider list.
///
/// `translate` is total: it returns the original text unchanged when every
/// provider fails, so enrichment can never break a collection run. The
/// cache is scoped to this instance and never evicted, which keeps repeat
/// calls to paid APIs within one process free.
pub struct TranslationService {
    providers: Vec<Box<dyn TranslateProvider>>,
    cache: DashMap<CacheKey, String>,
}

impl TranslationService {
    /// Create a service trying `providers` strictly in order
    pub fn new(providers: Vec<Box<dyn TranslateProvider>>) -> Self {
        Self {
            providers,
            cache: DashMap::new(),
        }
    }

    /// Whether at least one provider is available
    pub fn has_providers(&self) -> bool {
        !self.providers.is_empty()
    }

    /// Translate text between the given language codes.
    ///
    /// The first provider returning a non-empty result wins; failures are
    /// logged and the next provider is tried. Returns the input unchanged
    /// when the chain is exhausted.
    pub async fn translate(&self, text: &str, source: &str, target: &str) -> String {
        if text.is_empty() {
            return String::new();
        }

        let key = (text.to_string(), source.to_string(), target.to_string());
        if let Some(hit) = self.cache.get(&key) {
            return hit.clone();
        }

        for provider in &self.providers {
            match provider.translate(text, source, target).await {
                Ok(translated) if !translated.is_empty() => {
                    self.cache.insert(key, translated.clone());
                    return translated;
                }
                Ok(_) => {
                    warn!("{} returned an empty translation", provider.name());
                }
                Err(e) => {
                    warn!("{} translation failed: {}", provider.name(), e);
                }
            }
        }

        warn!("All translation providers failed, returning original text");
        text.to_string()
    }

    /// Translate several texts, preserving order
    pub async fn translate_batch(
        &self,
        texts: &[String],
        source: &str,
        target: &str,
    ) -> Vec<String> {
        let futures = texts.iter().map(|t| self.translate(t, source, target));
        futures::future::join_all(futures).await
    }

    /// Number of cached translations (used by tests)
    pub fn cache_len(&self) -> usize {
        self.cache.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::TranslateError;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    struct FixedProvider {
        name: &'static str,
        reply: &'static str,
        calls: Arc<AtomicUsize>,
    }

    #[async_trait]
    impl TranslateProvider for FixedProvider {
        fn name(&self) -> &str {
            self.name
        }

        async fn translate(
            &self,
            _text: &str,
            _source: &str,
            _target: &str,
        ) -> Result<String, TranslateError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(self.reply.to_string())
        }
    }

    struct FailingProvider;

    #[async_trait]
    impl TranslateProvider for FailingProvider {
        fn name(&self) -> &str {
            "failing"
        }

        async fn translate(
            &self,
            _text: &str,
            _source: &str,
            _target: &str,
        ) -> Result<String, TranslateError> {
            Err(TranslateError::RequestFailed("connection refused".to_string()))
        }
    }

    #[tokio::test]
    async fn test_first_provider_wins() {
        let calls = Arc::new(AtomicUsize::new(0));
        let service = TranslationService::new(vec![
            Box::new(FixedProvider {
                name: "primary",
                reply: "모터",
                calls: calls.clone(),
            }),
            Box::new(FailingProvider),
        ]);

        assert_eq!(service.translate("motor", "en", "ko").await, "모터");
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_falls_back_past_failing_primary() {
        let calls = Arc::new(AtomicUsize::new(0));
        let service = TranslationService::new(vec![
            Box::new(FailingProvider),
            Box::new(FixedProvider {
                name: "secondary",
                reply: "모터",
                calls: calls.clone(),
            }),
        ]);

        assert_eq!(service.translate("motor", "en", "ko").await, "모터");
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_all_providers_failing_returns_input() {
        let service =
            TranslationService::new(vec![Box::new(FailingProvider), Box::new(FailingProvider)]);

        assert_eq!(service.translate("motor", "en", "ko").await, "motor");
        // failures are never cached
        assert_eq!(service.cache_len(), 0);
    }

    #[tokio::test]
    async fn test_cache_avoids_repeat_calls() {
        let calls = Arc::new(AtomicUsize::new(0));
        let service = TranslationService::new(vec![Box::new(FixedProvider {
            name: "primary",
            reply: "모터",
            calls: calls.clone(),
        })]);

        service.translate("motor", "en", "ko").await;
        service.translate("motor", "en", "ko").await;
        assert_eq!(calls.load(Ordering::SeqCst), 1);

        // a different language pair is a different cache key
        service.translate("motor", "en", "ja").await;
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_translate_batch_preserves_order() {
        let calls = Arc::new(AtomicUsize::new(0));
        let service = TranslationService::new(vec![Box::new(FixedProvider {
            name: "primary",
            reply: "번역",
            calls,
        })]);

        let texts = vec!["one".to_string(), "".to_string(), "three".to_string()];
        let out = service.translate_batch(&texts, "en", "ko").await;
        assert_eq!(out, vec!["번역", "", "번역"]);
    }

    #[tokio::test]
    async fn test_empty_input_short_circuits() {
        let service = TranslationService::new(vec![Box::new(FailingProvider)]);
        assert_eq!(service.translate("", "en", "ko").await, "");
    }
}
