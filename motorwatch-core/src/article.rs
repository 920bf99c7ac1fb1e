//! Article data structures for news collection

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Category assigned to an article by keyword rules
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    /// Breaking news / fresh announcements
    Breaking,
    /// Technology and engineering coverage
    Tech,
    /// Market, industry, and growth coverage
    Market,
    /// Korea-related coverage (companies and region)
    Korea,
}

impl Category {
    /// Classify text into a category.
    ///
    /// Case-insensitive substring rules, first match wins. Breaking-news and
    /// region signals outrank generic technology/market language, so the rule
    /// order is load-bearing. Always returns a category (default `Tech`).
    pub fn classify(text: &str) -> Self {
        let text = text.to_lowercase();

        if text.contains("breaking") || text.contains("announces") || text.contains("just in") {
            return Category::Breaking;
        }

        if text.contains("korea")
            || text.contains("hyundai")
            || text.contains("samsung")
            || text.contains("lg")
        {
            return Category::Korea;
        }

        if text.contains("technology") || text.contains("innovation") || text.contains("development")
        {
            return Category::Tech;
        }

        if text.contains("market") || text.contains("industry") || text.contains("growth") {
            return Category::Market;
        }

        Category::Tech
    }

    /// Lowercase name as stored and serialized
    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Breaking => "breaking",
            Category::Tech => "tech",
            Category::Market => "market",
            Category::Korea => "korea",
        }
    }

    /// Parse a stored category name
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "breaking" => Some(Category::Breaking),
            "tech" => Some(Category::Tech),
            "market" => Some(Category::Market),
            "korea" => Some(Category::Korea),
            _ => None,
        }
    }
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A collected news article
///
/// `url` is the canonical identity: two records with the same `url` are the
/// same article no matter which source or query produced them.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Article {
    /// Article headline
    pub title: String,
    /// Brief summary/excerpt (HTML already stripped)
    pub summary: String,
    /// Publisher or feed host name (best-effort, may be empty)
    pub source: String,
    /// Article URL, unique across the corpus
    pub url: String,
    /// Keyword-derived category
    pub category: Category,
    /// Publication date, if the provider reported one
    #[serde(skip_serializing_if = "Option::is_none")]
    pub published_date: Option<NaiveDate>,
    /// Translated headline (set only when enrichment ran)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title_translated: Option<String>,
    /// Translated summary (set only when enrichment ran)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub summary_translated: Option<String>,
}

impl Article {
    /// Whether the record carries every required field.
    ///
    /// Articles missing `url`, `title`, or `summary` are invalid and must be
    /// dropped before dedup, validation, and persistence.
    pub fn is_complete(&self) -> bool {
        !self.url.is_empty() && !self.title.is_empty() && !self.summary.is_empty()
    }

    /// Title and summary joined for keyword scans
    pub fn search_text(&self) -> String {
        format!("{} {}", self.title, self.summary)
    }
}
