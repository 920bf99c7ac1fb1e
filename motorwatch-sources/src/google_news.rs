//! Google News RSS client
//!
//! Fetches the Google News search feed for a query. The feed needs no
//! credential, which makes it the always-available fallback when the
//! keyword-search API is disabled.

use async_trait::async_trait;
use chrono::NaiveDate;
use reqwest::Client;
use tracing::{info, warn};

use motorwatch_core::{Article, Category};

use crate::adapter::SourceAdapter;
use crate::error::SourceError;

const USER_AGENT: &str = "Mozilla/5.0 (compatible; MotorWatch/1.0)";

/// Google News RSS search client
pub struct GoogleNewsClient {
    client: Client,
    base_url: String,
}

impl GoogleNewsClient {
    /// Create a new Google News client
    pub fn new() -> Self {
        Self {
            client: Client::builder()
                .timeout(std::time::Duration::from_secs(10))
                .user_agent(USER_AGENT)
                .build()
                .unwrap_or_else(|_| Client::new()),
            base_url: "https://news.google.com/rss/search".to_string(),
        }
    }

    /// Override the endpoint (used against stub servers)
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Fetch the search feed for a query
    pub async fn search_feed(&self, query: &str) -> Result<Vec<Article>, SourceError> {
        let url = format!(
            "{}?q={}&hl=en-US&gl=US&ceid=US:en",
            self.base_url,
            urlencoding::encode(query)
        );

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| SourceError::RequestFailed(e.to_string()))?;

        if !response.status().is_success() {
            return Err(SourceError::ApiError {
                status: response.status().as_u16(),
                message: format!("Google News returned status {}", response.status()),
            });
        }

        let content = response
            .bytes()
            .await
            .map_err(|e| SourceError::RequestFailed(e.to_string()))?;

        let items = parse_feed(&content)?;
        info!("Google News returned {} items for '{}'", items.len(), query);

        Ok(items)
    }
}

impl Default for GoogleNewsClient {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl SourceAdapter for GoogleNewsClient {
    fn name(&self) -> &str {
        "Google News"
    }

    async fn fetch(&self, query: &str) -> Vec<Article> {
        match self.search_feed(query).await {
            Ok(articles) => articles,
            Err(e) => {
                warn!("Google News fetch failed for '{}': {}", query, e);
                Vec::new()
            }
        }
    }
}

/// Parse a feed body, trying RSS 2.0 first and falling back to Atom
fn parse_feed(content: &[u8]) -> Result<Vec<Article>, SourceError> {
    if let Ok(channel) = rss::Channel::read_from(content) {
        return Ok(parse_rss_channel(&channel));
    }

    if let Ok(feed) = atom_syndication::Feed::read_from(content) {
        return Ok(parse_atom_feed(&feed));
    }

    Err(SourceError::ParseError(
        "feed is neither valid RSS nor Atom".to_string(),
    ))
}

/// Parse an RSS 2.0 channel into Articles
fn parse_rss_channel(channel: &rss::Channel) -> Vec<Article> {
    channel
        .items()
        .iter()
        .filter_map(|item| {
            let title = item.title()?.to_string();
            let url = item.link()?.to_string();

            let summary = item
                .description()
                .map(strip_html_simple)
                .unwrap_or_default();

            let published_date = item.pub_date().and_then(parse_feed_date);

            // Google News puts the publisher at the end of the title
            let (clean_title, source) = extract_source_from_google_title(&title);
            let source = if source.is_empty() {
                host_of(&url)
            } else {
                source
            };

            let category = Category::classify(&format!("{} {}", clean_title, summary));

            Some(Article {
                title: clean_title,
                summary,
                source,
                url,
                category,
                published_date,
                title_translated: None,
                summary_translated: None,
            })
        })
        .collect()
}

/// Parse an Atom feed into Articles
fn parse_atom_feed(feed: &atom_syndication::Feed) -> Vec<Article> {
    feed.entries()
        .iter()
        .filter_map(|entry| {
            let title = entry.title().to_string();
            let url = entry.links().first()?.href().to_string();

            let summary = entry
                .summary()
                .map(|s| strip_html_simple(s.as_str()))
                .unwrap_or_default();

            let published_date = entry
                .published()
                .or_else(|| Some(entry.updated()))
                .map(|dt| dt.date_naive());

            let (clean_title, source) = extract_source_from_google_title(&title);
            let source = if source.is_empty() {
                host_of(&url)
            } else {
                source
            };

            let category = Category::classify(&format!("{} {}", clean_title, summary));

            Some(Article {
                title: clean_title,
                summary,
                source,
                url,
                category,
                published_date,
                title_translated: None,
                summary_translated: None,
            })
        })
        .collect()
}

/// Parse a feed timestamp, trying RFC 2822 then RFC 3339
fn parse_feed_date(value: &str) -> Option<NaiveDate> {
    chrono::DateTime::parse_from_rfc2822(value)
        .or_else(|_| chrono::DateTime::parse_from_rfc3339(value))
        .map(|dt| dt.date_naive())
        .ok()
}

/// Split the Google News title format "Article Title - Source Name".
///
/// Returns an empty source when the title carries no suffix, so callers can
/// fall back to the link host.
fn extract_source_from_google_title(title: &str) -> (String, String) {
    if let Some(pos) = title.rfind(" - ") {
        let clean_title = title[..pos].trim().to_string();
        let source = title[pos + 3..].trim().to_string();
        (clean_title, source)
    } else {
        (title.to_string(), String::new())
    }
}

/// Best-effort host name of a link
fn host_of(link: &str) -> String {
    url::Url::parse(link)
        .ok()
        .and_then(|u| u.host_str().map(|h| h.to_string()))
        .unwrap_or_default()
}

/// Simple HTML stripping for feed descriptions
fn strip_html_simple(html: &str) -> String {
    let mut result = String::new();
    let mut in_tag = false;

    for c in html.chars() {
        match c {
            '<' => in_tag = true,
            '>' => in_tag = false,
            _ if !in_tag => result.push(c),
            _ => {}
        }
    }

    result
        .replace("&nbsp;", " ")
        .replace("&amp;", "&")
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&#39;", "'")
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}
