//! MotorWatch collection agent
//!
//! Wires the source adapters, validator, translator, and store into the
//! collection pipeline, then either runs once (RUN_ONCE=1) or loops on a
//! fixed interval until interrupted. All configuration comes from the
//! environment (optionally via .env.local).

use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use tracing::{info, warn};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use motorwatch_pipeline::{ArticleStore, CollectorConfig, NewsCollector, SnapshotWriter};
use motorwatch_sources::{GoogleNewsClient, HttpUrlValidator, NewsApiClient, SourceAdapter};
use motorwatch_translate::{GoogleTranslateClient, PapagoClient, TranslateProvider, TranslationService};

/// Articles kept in each JSON snapshot
const SNAPSHOT_ARTICLE_CAP: usize = 50;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables from .env.local file
    if let Err(e) = dotenvy::from_filename(".env.local") {
        // Not an error if the file doesn't exist
        if !matches!(e, dotenvy::Error::Io(_)) {
            eprintln!("Warning: Failed to load .env.local: {}", e);
        }
    }

    // Initialize logging
    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("info,motorwatch_agent=debug")),
        )
        .init();

    info!("Starting MotorWatch news agent");

    // Source adapters: keyword search (soft-disabled without a key) + RSS
    let newsapi_key = std::env::var("NEWSAPI_KEY").ok().filter(|k| !k.is_empty());
    if newsapi_key.is_some() {
        info!("NewsAPI credential found in environment");
    } else {
        info!("No NEWSAPI_KEY found - keyword-search source disabled");
    }

    let adapters: Vec<Arc<dyn SourceAdapter>> = vec![
        Arc::new(NewsApiClient::new(newsapi_key)),
        Arc::new(GoogleNewsClient::new()),
    ];

    // Translation providers, tried in order; none configured disables enrichment
    let mut providers: Vec<Box<dyn TranslateProvider>> = Vec::new();
    if let Ok(key) = std::env::var("GOOGLE_TRANSLATE_KEY") {
        providers.push(Box::new(GoogleTranslateClient::new(key)));
    } else {
        info!("No GOOGLE_TRANSLATE_KEY found - Google Translate disabled");
    }
    match (
        std::env::var("PAPAGO_CLIENT_ID"),
        std::env::var("PAPAGO_CLIENT_SECRET"),
    ) {
        (Ok(id), Ok(secret)) => providers.push(Box::new(PapagoClient::new(id, secret))),
        _ => info!("No Papago credentials found - Papago disabled"),
    }

    let translator = if providers.is_empty() {
        info!("No translation providers configured - enrichment disabled");
        None
    } else {
        Some(Arc::new(TranslationService::new(providers)))
    };

    // Durable store
    let db_path = std::env::var("NEWS_DB_PATH").unwrap_or_else(|_| "data/news.db".to_string());
    info!("Initializing article store at: {}", db_path);
    let store =
        Arc::new(ArticleStore::new(&db_path).context("failed to initialize article store")?);

    // Snapshot output for the dashboard
    let snapshot_path =
        std::env::var("NEWS_SNAPSHOT_PATH").unwrap_or_else(|_| "data/news.json".to_string());
    let writer = SnapshotWriter::new(&snapshot_path, SNAPSHOT_ARTICLE_CAP);

    let config = CollectorConfig {
        translate: translator.is_some(),
        ..CollectorConfig::default()
    };

    let collector = NewsCollector::new(
        adapters,
        Arc::new(HttpUrlValidator::new()),
        translator,
        store,
        config,
    );

    let run_once = std::env::var("RUN_ONCE")
        .map(|v| v == "1" || v.eq_ignore_ascii_case("true"))
        .unwrap_or(false);

    if run_once {
        let report = collector.run_and_snapshot(&writer).await?;
        info!(
            "One-shot collection finished: {} saved, {} save errors, {} in snapshot",
            report.saved_count,
            report.save_errors,
            report.articles.len().min(SNAPSHOT_ARTICLE_CAP)
        );
        return Ok(());
    }

    let interval_secs: u64 = std::env::var("COLLECT_INTERVAL_SECS")
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(3600);
    info!("Running scheduled collection every {}s", interval_secs);

    // first tick fires immediately, so a collection runs at startup
    let mut ticker = tokio::time::interval(Duration::from_secs(interval_secs));

    loop {
        tokio::select! {
            _ = ticker.tick() => {
                match collector.run_and_snapshot(&writer).await {
                    Ok(report) => info!(
                        "Scheduled collection finished: {} saved, {} save errors",
                        report.saved_count, report.save_errors
                    ),
                    Err(e) => warn!("Scheduled collection failed: {}", e),
                }
            }
            _ = tokio::signal::ctrl_c() => {
                info!("Shutting down");
                break;
            }
        }
    }

    Ok(())
}
