//! NewsAPI keyword-search client
//!
//! Queries the NewsAPI `everything` endpoint. Running without a key is a
//! supported configuration: the adapter soft-disables itself and contributes
//! nothing instead of failing the run.

use async_trait::async_trait;
use chrono::NaiveDate;
use reqwest::Client;
use serde::Deserialize;
use tracing::{debug, info, warn};

use motorwatch_core::{Article, Category};

use crate::adapter::SourceAdapter;
use crate::error::SourceError;

const USER_AGENT: &str = "Mozilla/5.0 (compatible; MotorWatch/1.0)";

/// NewsAPI client
pub struct NewsApiClient {
    client: Client,
    api_key: Option<String>,
    base_url: String,
    language: String,
    page_size: u32,
    sort_by: String,
}

impl NewsApiClient {
    /// Create a new NewsAPI client.
    ///
    /// Pass `None` to soft-disable the source (every fetch returns empty).
    pub fn new(api_key: Option<String>) -> Self {
        Self {
            client: Client::builder()
                .timeout(std::time::Duration::from_secs(10))
                .user_agent(USER_AGENT)
                .build()
                .unwrap_or_else(|_| Client::new()),
            api_key,
            base_url: "https://newsapi.org/v2/everything".to_string(),
            language: "en".to_string(),
            page_size: 10,
            sort_by: "relevancy".to_string(),
        }
    }

    /// Override the endpoint (used against stub servers)
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Whether a credential is configured
    pub fn is_configured(&self) -> bool {
        self.api_key.as_deref().is_some_and(|k| !k.is_empty())
    }

    /// Search for articles matching the query
    pub async fn search(&self, query: &str) -> Result<Vec<Article>, SourceError> {
        let api_key = self.api_key.as_deref().unwrap_or_default();

        let url = format!(
            "{}?q={}&language={}&pageSize={}&sortBy={}&apiKey={}",
            self.base_url,
            urlencoding::encode(query),
            self.language,
            self.page_size,
            self.sort_by,
            api_key
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
                message: format!("NewsAPI returned status {}", response.status()),
            });
        }

        let body: NewsApiResponse = response
            .json()
            .await
            .map_err(|e| SourceError::ParseError(e.to_string()))?;

        info!("NewsAPI returned {} articles for '{}'", body.articles.len(), query);

        Ok(body.articles.into_iter().filter_map(map_article).collect())
    }
}

#[async_trait]
impl SourceAdapter for NewsApiClient {
    fn name(&self) -> &str {
        "NewsAPI"
    }

    async fn fetch(&self, query: &str) -> Vec<Article> {
        if !self.is_configured() {
            debug!("No NewsAPI key configured, skipping NewsAPI source");
            return Vec::new();
        }

        match self.search(query).await {
            Ok(articles) => articles,
            Err(e) => {
                warn!("NewsAPI fetch failed for '{}': {}", query, e);
                Vec::new()
            }
        }
    }
}

#[derive(Debug, Deserialize)]
struct NewsApiResponse {
    #[serde(default)]
    articles: Vec<NewsApiArticle>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct NewsApiArticle {
    title: Option<String>,
    description: Option<String>,
    content: Option<String>,
    url: Option<String>,
    published_at: Option<String>,
    source: Option<NewsApiSource>,
}

#[derive(Debug, Deserialize)]
struct NewsApiSource {
    name: Option<String>,
}

/// Normalize one NewsAPI record into the common Article shape.
///
/// Summary falls back from description to content; records without a title
/// or url are dropped here rather than surfaced as partial entries.
fn map_article(raw: NewsApiArticle) -> Option<Article> {
    let title = raw.title?;
    let url = raw.url?;

    let summary = raw
        .description
        .clone()
        .or(raw.content)
        .unwrap_or_default();

    let category = Category::classify(&format!(
        "{} {}",
        title,
        raw.description.as_deref().unwrap_or_default()
    ));

    Some(Article {
        category,
        summary,
        source: raw.source.and_then(|s| s.name).unwrap_or_default(),
        published_date: raw.published_at.as_deref().and_then(parse_date),
        title,
        url,
        title_translated: None,
        summary_translated: None,
    })
}

/// Parse the date part of a NewsAPI `publishedAt` timestamp
fn parse_date(value: &str) -> Option<NaiveDate> {
    chrono::DateTime::parse_from_rfc3339(value)
        .map(|dt| dt.date_naive())
        .ok()
        .or_else(|| value.split('T').next().and_then(|d| d.parse().ok()))
}
