//! Deduplication and merging of adapter output
//!
//! The url is the canonical identity, so convergence happens here rather
//! than leaning on the store's upsert: records are keyed by url in
//! first-seen order and merged field-by-field. An incoming field overwrites
//! the kept one unless it is empty, so later content wins whenever it is
//! actually present and a sparse duplicate never erases a fuller record.

use indexmap::map::Entry;
use indexmap::IndexMap;
use tracing::debug;

use motorwatch_core::{Article, Category};

/// Collapse adapter output into unique articles in first-seen order.
///
/// Malformed records (missing url, title, or summary) are dropped before
/// they enter the set; they never reach validation or persistence.
pub fn dedup_by_url(articles: Vec<Article>) -> Vec<Article> {
    let mut merged: IndexMap<String, Article> = IndexMap::new();

    for article in articles {
        if !article.is_complete() {
            debug!("Dropping malformed article: '{}'", article.title);
            continue;
        }

        match merged.entry(article.url.clone()) {
            Entry::Occupied(mut entry) => merge_into(entry.get_mut(), article),
            Entry::Vacant(entry) => {
                entry.insert(article);
            }
        }
    }

    merged.into_values().collect()
}

/// Merge a duplicate record into the kept one.
///
/// The category is recomputed from the merged text since either half may
/// have changed.
fn merge_into(kept: &mut Article, incoming: Article) {
    if !incoming.title.is_empty() {
        kept.title = incoming.title;
    }
    if !incoming.summary.is_empty() {
        kept.summary = incoming.summary;
    }
    if !incoming.source.is_empty() {
        kept.source = incoming.source;
    }
    if incoming.published_date.is_some() {
        kept.published_date = incoming.published_date;
    }
    if incoming.title_translated.is_some() {
        kept.title_translated = incoming.title_translated;
    }
    if incoming.summary_translated.is_some() {
        kept.summary_translated = incoming.summary_translated;
    }

    kept.category = Category::classify(&kept.search_text());
}
