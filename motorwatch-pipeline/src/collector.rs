//! Pipeline orchestrator
//!
//! Runs one collection end to end: fetch every configured query from every
//! source, dedup by url, validate links, optionally translate, upsert into
//! the store, and summarize. The pipeline is fail-open: a dead source or a
//! failed save shrinks the corpus and leaves a log trail, it never aborts
//! the run.

use std::sync::Arc;

use futures::stream::{self, StreamExt};
use tracing::{debug, error, info, warn};

use motorwatch_core::{Article, Category, InsightSummary};
use motorwatch_sources::{LinkValidator, SourceAdapter};
use motorwatch_translate::TranslationService;

use crate::dedup;
use crate::insight::InsightEngine;
use crate::snapshot::{SnapshotError, SnapshotWriter};
use crate::store::ArticleStore;

/// Pipeline stages, advanced unconditionally in order.
///
/// There is no retry stage: failures are handled inside each stage and the
/// run proceeds with whatever partial results it has.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Idle,
    Collecting,
    Deduplicating,
    Validating,
    Enriching,
    Persisting,
    Summarizing,
}

impl Stage {
    /// The stage that follows this one
    pub fn next(self) -> Stage {
        match self {
            Stage::Idle => Stage::Collecting,
            Stage::Collecting => Stage::Deduplicating,
            Stage::Deduplicating => Stage::Validating,
            Stage::Validating => Stage::Enriching,
            Stage::Enriching => Stage::Persisting,
            Stage::Persisting => Stage::Summarizing,
            Stage::Summarizing => Stage::Idle,
        }
    }
}

/// Configuration for one collector instance, immutable during a run
#[derive(Debug, Clone)]
pub struct CollectorConfig {
    /// Search queries, processed in declared order
    pub queries: Vec<String>,
    /// Concurrent query fetches
    pub fetch_concurrency: usize,
    /// Concurrent URL validations
    pub validate_concurrency: usize,
    /// Cap on unique articles processed per run
    pub max_articles_per_run: usize,
    /// Whether to run translation enrichment
    pub translate: bool,
    /// Source language of collected text
    pub source_lang: String,
    /// Target language for enrichment
    pub target_lang: String,
}

impl Default for CollectorConfig {
    fn default() -> Self {
        Self {
            queries: vec![
                "electric vehicle motor technology".to_string(),
                "ev motor manufacturing innovation".to_string(),
                "tesla rare earth motor".to_string(),
                "ev motor market trends".to_string(),
                "electric vehicle drivetrain advances".to_string(),
            ],
            fetch_concurrency: 4,
            validate_concurrency: 10,
            max_articles_per_run: 100,
            translate: true,
            source_lang: "en".to_string(),
            target_lang: "ko".to_string(),
        }
    }
}

/// What one collection run produced
#[derive(Debug)]
pub struct RunReport {
    /// Articles successfully upserted
    pub saved_count: usize,
    /// Articles whose save failed (run continued regardless)
    pub save_errors: usize,
    /// The validated, enriched corpus in first-seen order
    pub articles: Vec<Article>,
    /// Insights derived from the corpus
    pub insights: InsightSummary,
}

/// Errors surfaced to the collector's caller
#[derive(Debug, thiserror::Error)]
pub enum CollectorError {
    #[error("Snapshot error: {0}")]
    Snapshot(#[from] SnapshotError),
}

/// The collection pipeline orchestrator
pub struct NewsCollector {
    adapters: Vec<Arc<dyn SourceAdapter>>,
    validator: Arc<dyn LinkValidator>,
    translator: Option<Arc<TranslationService>>,
    store: Arc<ArticleStore>,
    insight_engine: InsightEngine,
    config: CollectorConfig,
}

impl NewsCollector {
    /// Create a collector over the given sources, validator, and store
    pub fn new(
        adapters: Vec<Arc<dyn SourceAdapter>>,
        validator: Arc<dyn LinkValidator>,
        translator: Option<Arc<TranslationService>>,
        store: Arc<ArticleStore>,
        config: CollectorConfig,
    ) -> Self {
        Self {
            adapters,
            validator,
            translator,
            store,
            insight_engine: InsightEngine::new(),
            config,
        }
    }

    /// Run one collection and return the report
    pub async fn run(&self) -> RunReport {
        let mut stage = Stage::Idle.next();
        info!("Starting news collection ({} queries)", self.config.queries.len());

        let raw = self.collect_all().await;
        debug!("Collected {} raw articles", raw.len());

        stage = stage.next();
        let mut articles = dedup::dedup_by_url(raw);
        if articles.len() > self.config.max_articles_per_run {
            articles.truncate(self.config.max_articles_per_run);
        }
        info!("{} unique articles after dedup, validating URLs...", articles.len());

        stage = stage.next();
        let mut articles = self.validate_all(articles).await;
        info!("{} articles passed validation", articles.len());

        stage = stage.next();
        self.enrich_all(&mut articles).await;

        stage = stage.next();
        let mut saved_count = 0;
        let mut save_errors = 0;
        for article in &articles {
            match self.store.upsert(article) {
                Ok(()) => saved_count += 1,
                Err(e) => {
                    error!("Failed to save article '{}': {}", article.title, e);
                    save_errors += 1;
                }
            }
        }

        stage = stage.next();
        let insights = self.insight_engine.analyze(&articles);

        stage = stage.next();
        debug_assert_eq!(stage, Stage::Idle);
        info!(
            "News collection completed. Saved {} articles ({} errors).",
            saved_count, save_errors
        );

        RunReport {
            saved_count,
            save_errors,
            articles,
            insights,
        }
    }

    /// Run one collection and write the JSON snapshot
    pub async fn run_and_snapshot(
        &self,
        writer: &SnapshotWriter,
    ) -> Result<RunReport, CollectorError> {
        let report = self.run().await;
        writer.write(&report.articles, &report.insights)?;
        Ok(report)
    }

    /// Fetch every query from every adapter.
    ///
    /// Queries run concurrently with bounded parallelism, but results merge
    /// in declared query order so first-seen order stays deterministic.
    async fn collect_all(&self) -> Vec<Article> {
        let per_query: Vec<Vec<Article>> = stream::iter(&self.config.queries)
            .map(|query| self.fetch_query(query))
            .buffered(self.config.fetch_concurrency.max(1))
            .collect()
            .await;

        per_query.into_iter().flatten().collect()
    }

    /// Fetch one query from each adapter in declared source order
    async fn fetch_query(&self, query: &str) -> Vec<Article> {
        let mut out = Vec::new();
        for adapter in &self.adapters {
            let articles = adapter.fetch(query).await;
            debug!(
                "{} returned {} articles for '{}'",
                adapter.name(),
                articles.len(),
                query
            );
            out.extend(articles);
        }
        out
    }

    /// Validate article links concurrently, keeping first-seen order.
    ///
    /// Validation outcomes for different articles are independent; only
    /// articles whose url resolves survive.
    async fn validate_all(&self, articles: Vec<Article>) -> Vec<Article> {
        stream::iter(articles)
            .map(|article| async move {
                let valid = self.validator.validate(&article.url).await;
                (article, valid)
            })
            .buffered(self.config.validate_concurrency.max(1))
            .filter_map(|(article, valid)| async move {
                if valid {
                    Some(article)
                } else {
                    warn!("Skipping article with dead URL: {}", article.url);
                    None
                }
            })
            .collect()
            .await
    }

    /// Translate titles and summaries toward the target language.
    ///
    /// Articles whose category already implies the target language pass
    /// through untouched. Translation failure leaves the fields unset; it
    /// never drops an article.
    async fn enrich_all(&self, articles: &mut [Article]) {
        let Some(translator) = &self.translator else {
            return;
        };
        if !self.config.translate {
            return;
        }

        let source = &self.config.source_lang;
        let target = &self.config.target_lang;

        for article in articles.iter_mut() {
            if article.category == Category::Korea && target == "ko" {
                continue;
            }

            let title = translator.translate(&article.title, source, target).await;
            if title != article.title {
                article.title_translated = Some(title);
            }

            let summary = translator
                .translate(&article.summary, source, target)
                .await;
            if summary != article.summary {
                article.summary_translated = Some(summary);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use motorwatch_translate::{TranslateError, TranslateProvider};
    use std::collections::HashSet;

    struct FakeAdapter {
        name: &'static str,
        articles: Vec<Article>,
    }

    #[async_trait]
    impl SourceAdapter for FakeAdapter {
        fn name(&self) -> &str {
            self.name
        }

        async fn fetch(&self, _query: &str) -> Vec<Article> {
            self.articles.clone()
        }
    }

    struct FakeValidator {
        dead_urls: HashSet<String>,
    }

    impl FakeValidator {
        fn accepting_all() -> Self {
            Self {
                dead_urls: HashSet::new(),
            }
        }

        fn rejecting(urls: &[&str]) -> Self {
            Self {
                dead_urls: urls.iter().map(|u| u.to_string()).collect(),
            }
        }
    }

    #[async_trait]
    impl LinkValidator for FakeValidator {
        async fn validate(&self, url: &str) -> bool {
            !self.dead_urls.contains(url)
        }
    }

    struct KoreanProvider;

    #[async_trait]
    impl TranslateProvider for KoreanProvider {
        fn name(&self) -> &str {
            "fake"
        }

        async fn translate(
            &self,
            text: &str,
            _source: &str,
            _target: &str,
        ) -> Result<String, TranslateError> {
            Ok(format!("[ko] {}", text))
        }
    }

    fn article(title: &str, summary: &str, url: &str) -> Article {
        Article {
            title: title.to_string(),
            summary: summary.to_string(),
            source: "Example".to_string(),
            url: url.to_string(),
            category: Category::classify(&format!("{} {}", title, summary)),
            published_date: None,
            title_translated: None,
            summary_translated: None,
        }
    }

    fn collector(
        adapters: Vec<Arc<dyn SourceAdapter>>,
        validator: Arc<dyn LinkValidator>,
        translator: Option<Arc<TranslationService>>,
        store: Arc<ArticleStore>,
    ) -> NewsCollector {
        let config = CollectorConfig {
            queries: vec!["ev motor".to_string()],
            translate: translator.is_some(),
            ..CollectorConfig::default()
        };
        NewsCollector::new(adapters, validator, translator, store, config)
    }

    #[test]
    fn test_stage_cycle() {
        let mut stage = Stage::Idle;
        let expected = [
            Stage::Collecting,
            Stage::Deduplicating,
            Stage::Validating,
            Stage::Enriching,
            Stage::Persisting,
            Stage::Summarizing,
            Stage::Idle,
        ];
        for want in expected {
            stage = stage.next();
            assert_eq!(stage, want);
        }
    }

    #[tokio::test]
    async fn test_end_to_end_feed_with_duplicates_and_malformed() {
        // three feed items: two share a url (whitespace-differing summary),
        // one is missing its title
        let adapter = FakeAdapter {
            name: "feed",
            articles: vec![
                article("EV motors", "summary text", "https://e.com/dup"),
                article("EV motors", "summary  text ", "https://e.com/dup"),
                article("", "orphan summary", "https://e.com/orphan"),
            ],
        };

        let store = Arc::new(ArticleStore::new_in_memory().unwrap());
        let collector = collector(
            vec![Arc::new(adapter)],
            Arc::new(FakeValidator::accepting_all()),
            None,
            store.clone(),
        );

        let report = collector.run().await;

        assert_eq!(report.saved_count, 1);
        assert_eq!(report.save_errors, 0);
        assert_eq!(store.count().unwrap(), 1);

        // the most recently processed duplicate wins
        let stored = store.recent(10).unwrap();
        assert_eq!(stored[0].summary, "summary  text ");
    }

    #[tokio::test]
    async fn test_rerun_is_idempotent() {
        let adapter = || FakeAdapter {
            name: "feed",
            articles: vec![
                article("A", "s", "https://e.com/a"),
                article("B", "s", "https://e.com/b"),
            ],
        };

        let store = Arc::new(ArticleStore::new_in_memory().unwrap());
        let collector = collector(
            vec![Arc::new(adapter())],
            Arc::new(FakeValidator::accepting_all()),
            None,
            store.clone(),
        );

        let first = collector.run().await;
        let second = collector.run().await;

        assert_eq!(first.saved_count, 2);
        assert_eq!(second.saved_count, 2);
        assert_eq!(store.count().unwrap(), 2);
    }

    #[tokio::test]
    async fn test_dead_urls_are_dropped_not_fatal() {
        let adapter = FakeAdapter {
            name: "feed",
            articles: vec![
                article("Alive", "s", "https://e.com/alive"),
                article("Dead", "s", "https://e.com/dead"),
            ],
        };

        let store = Arc::new(ArticleStore::new_in_memory().unwrap());
        let collector = collector(
            vec![Arc::new(adapter)],
            Arc::new(FakeValidator::rejecting(&["https://e.com/dead"])),
            None,
            store.clone(),
        );

        let report = collector.run().await;

        assert_eq!(report.saved_count, 1);
        assert_eq!(report.articles[0].url, "https://e.com/alive");
    }

    #[tokio::test]
    async fn test_sources_merge_in_declared_order() {
        let first = FakeAdapter {
            name: "api",
            articles: vec![article("From API", "s", "https://e.com/api")],
        };
        let second = FakeAdapter {
            name: "rss",
            articles: vec![article("From RSS", "s", "https://e.com/rss")],
        };

        let store = Arc::new(ArticleStore::new_in_memory().unwrap());
        let collector = collector(
            vec![Arc::new(first), Arc::new(second)],
            Arc::new(FakeValidator::accepting_all()),
            None,
            store,
        );

        let report = collector.run().await;
        let urls: Vec<&str> = report.articles.iter().map(|a| a.url.as_str()).collect();
        assert_eq!(urls, vec!["https://e.com/api", "https://e.com/rss"]);
    }

    #[tokio::test]
    async fn test_enrichment_translates_non_korean_articles() {
        let adapter = FakeAdapter {
            name: "feed",
            articles: vec![
                article("Motor technology advances", "details", "https://e.com/tech"),
                article("Hyundai opens plant", "korea news", "https://e.com/kr"),
            ],
        };

        let translator = Arc::new(TranslationService::new(vec![Box::new(KoreanProvider)]));
        let store = Arc::new(ArticleStore::new_in_memory().unwrap());
        let collector = collector(
            vec![Arc::new(adapter)],
            Arc::new(FakeValidator::accepting_all()),
            Some(translator),
            store,
        );

        let report = collector.run().await;

        let tech = report
            .articles
            .iter()
            .find(|a| a.url == "https://e.com/tech")
            .unwrap();
        assert_eq!(
            tech.title_translated.as_deref(),
            Some("[ko] Motor technology advances")
        );

        // already korea-category: identity mapping, no translated fields
        let kr = report
            .articles
            .iter()
            .find(|a| a.url == "https://e.com/kr")
            .unwrap();
        assert!(kr.title_translated.is_none());
        assert!(kr.summary_translated.is_none());
    }

    #[tokio::test]
    async fn test_empty_sources_yield_empty_report() {
        let adapter = FakeAdapter {
            name: "feed",
            articles: Vec::new(),
        };

        let store = Arc::new(ArticleStore::new_in_memory().unwrap());
        let collector = collector(
            vec![Arc::new(adapter)],
            Arc::new(FakeValidator::accepting_all()),
            None,
            store,
        );

        let report = collector.run().await;

        assert_eq!(report.saved_count, 0);
        assert!(report.articles.is_empty());
        assert!(report.insights.tech_trends.is_empty());
        assert!(report.insights.market_insights.is_empty());
        assert!(report.insights.market_forecast.cagr.is_none());
    }

    #[tokio::test]
    async fn test_run_and_snapshot_writes_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("news.json");

        let adapter = FakeAdapter {
            name: "feed",
            articles: vec![article("A", "s", "https://e.com/a")],
        };

        let store = Arc::new(ArticleStore::new_in_memory().unwrap());
        let collector = collector(
            vec![Arc::new(adapter)],
            Arc::new(FakeValidator::accepting_all()),
            None,
            store,
        );

        let writer = SnapshotWriter::new(&path, 50);
        let report = collector.run_and_snapshot(&writer).await.unwrap();

        assert_eq!(report.saved_count, 1);
        let json: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(json["totalCollected"], 1);
    }
}
