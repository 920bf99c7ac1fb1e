//! Heuristic insight extraction over the collected corpus
//!
//! Three independent derivations, each a pure function of the article set:
//! tech-trend keyword counts, templated market observations, and a
//! best-effort market forecast. Extraction is pattern matching over
//! title+summary text; an absent match yields an absent field, never an
//! error, and an empty corpus yields the well-formed empty summary.

use regex::Regex;
use tracing::debug;

use motorwatch_core::{
    Article, Category, ForecastPoint, InsightSummary, MarketForecast, MarketInsight, TechTrend,
};

/// Fixed technology vocabulary scanned for trend counts
const TECH_KEYWORDS: [&str; 13] = [
    "silicon carbide",
    "sic",
    "permanent magnet",
    "pmsm",
    "efficiency",
    "thermal management",
    "power density",
    "inverter",
    "battery",
    "charging",
    "semiconductor",
    "ai",
    "automation",
];

/// Regions scanned for market mentions, with display names
const REGIONS: [(&str, &str); 5] = [
    ("china", "China"),
    ("europe", "Europe"),
    ("usa", "USA"),
    ("korea", "Korea"),
    ("japan", "Japan"),
];

/// Growth-factor keywords, with display phrases
const GROWTH_FACTORS: [(&str, &str); 6] = [
    ("government", "government policy support"),
    ("subsidy", "subsidies"),
    ("technology", "technology innovation"),
    ("cost", "cost reduction"),
    ("demand", "rising demand"),
    ("infrastructure", "infrastructure expansion"),
];

/// Known companies scanned for competitive mentions
const COMPANIES: [&str; 7] = ["tesla", "byd", "volkswagen", "gm", "hyundai", "samsung", "lg"];

/// Number of tech trends kept in the summary
const TOP_TRENDS: usize = 5;

/// Derives the per-run insight summary from the article corpus
pub struct InsightEngine {
    size_re: Regex,
    future_re: Regex,
    cagr_re: Regex,
}

impl InsightEngine {
    /// Create an engine with its extraction patterns compiled once
    pub fn new() -> Self {
        Self {
            size_re: Regex::new(r"(?i)\$?(\d+(?:\.\d+)?)\s*(billion|million|b|m)\b")
                .expect("size pattern is valid"),
            // the guard after the year keeps decimal fragments like the
            // "27" in "$27.16" from being read as a year
            future_re: Regex::new(
                r"(?i)\b(\d{4}|\d{2})\b[^.\d].*?\$?(\d+(?:\.\d+)?)\s*(billion|million|b|m)\b",
            )
            .expect("future pattern is valid"),
            cagr_re: Regex::new(r"(?i)CAGR\D*(\d+(?:\.\d+)?)%").expect("cagr pattern is valid"),
        }
    }

    /// Compute the full summary for one run's corpus
    pub fn analyze(&self, articles: &[Article]) -> InsightSummary {
        InsightSummary {
            tech_trends: self.tech_trends(articles),
            market_insights: self.market_insights(articles),
            market_forecast: self.market_forecast(articles),
        }
    }

    /// Count technology keyword mentions corpus-wide and keep the top 5.
    ///
    /// An article counts once per keyword it mentions; the sort is stable
    /// so ties keep vocabulary order.
    pub fn tech_trends(&self, articles: &[Article]) -> Vec<TechTrend> {
        let texts: Vec<String> = articles
            .iter()
            .map(|a| a.search_text().to_lowercase())
            .collect();

        let mut counts: Vec<(&str, usize)> = TECH_KEYWORDS
            .iter()
            .map(|&keyword| {
                let count = texts.iter().filter(|t| t.contains(keyword)).count();
                (keyword, count)
            })
            .filter(|&(_, count)| count > 0)
            .collect();

        counts.sort_by(|a, b| b.1.cmp(&a.1));
        counts.truncate(TOP_TRENDS);

        counts
            .into_iter()
            .map(|(keyword, count)| TechTrend {
                keyword: keyword.to_string(),
                description: format!("Mentioned in {} recent articles", count),
                relevance_count: count,
            })
            .collect()
    }

    /// Emit a templated observation per insight category with at least one hit
    pub fn market_insights(&self, articles: &[Article]) -> Vec<MarketInsight> {
        let market_articles: Vec<&Article> = articles
            .iter()
            .filter(|a| is_market_relevant(a))
            .collect();

        let mut insights = Vec::new();

        if let Some(size) = self.first_market_size(&market_articles) {
            insights.push(MarketInsight {
                title: "Market size".to_string(),
                content: format!("The EV motor market is projected to reach {}.", size),
            });
        }

        if let Some(regions) = top_regions(&market_articles) {
            insights.push(MarketInsight {
                title: "Regional trends".to_string(),
                content: format!("{} markets are leading growth.", regions.join(", ")),
            });
        }

        if let Some(factors) = growth_factors(&market_articles) {
            insights.push(MarketInsight {
                title: "Growth drivers".to_string(),
                content: format!("Key growth drivers: {}", factors.join(", ")),
            });
        }

        if let Some(companies) = companies_mentioned(&market_articles) {
            insights.push(MarketInsight {
                title: "Competitive landscape".to_string(),
                content: format!("Major players: {}", companies.join(", ")),
            });
        }

        insights
    }

    /// Extract the forecast fields, first textual match wins per field.
    ///
    /// Best-effort and unverified: there is no cross-validation between the
    /// current size, future size, and CAGR, matching how such figures are
    /// quoted in coverage.
    pub fn market_forecast(&self, articles: &[Article]) -> MarketForecast {
        let relevant: Vec<&Article> = articles
            .iter()
            .filter(|a| is_forecast_relevant(a))
            .collect();

        let mut forecast = MarketForecast::default();

        for article in &relevant {
            let text = article.search_text();

            if forecast.current.size.is_none() {
                if let Some(caps) = self.size_re.captures(&text) {
                    forecast.current = ForecastPoint {
                        size: normalize_market_size(&caps[1], &caps[2]),
                        year: None,
                    };
                }
            }

            if forecast.future.size.is_none() {
                if let Some(caps) = self.future_re.captures(&text) {
                    let year = expand_year(&caps[1]);
                    if let Some(size) = normalize_market_size(&caps[2], &caps[3]) {
                        forecast.future = ForecastPoint {
                            size: Some(size),
                            year,
                        };
                    }
                }
            }

            if forecast.cagr.is_none() {
                if let Some(caps) = self.cagr_re.captures(&text) {
                    forecast.cagr = caps[1].parse().ok();
                }
            }
        }

        debug!(
            "Forecast extraction over {} articles: current={:?} future={:?} cagr={:?}",
            relevant.len(),
            forecast.current.size,
            forecast.future.size,
            forecast.cagr
        );

        forecast
    }

    /// First market-size mention across the given articles, normalized
    fn first_market_size(&self, articles: &[&Article]) -> Option<String> {
        articles.iter().find_map(|a| {
            let text = a.search_text();
            let caps = self.size_re.captures(&text)?;
            normalize_market_size(&caps[1], &caps[2])
        })
    }
}

impl Default for InsightEngine {
    fn default() -> Self {
        Self::new()
    }
}

/// Whether an article should feed the market-insight scan
fn is_market_relevant(article: &Article) -> bool {
    if article.category == Category::Market {
        return true;
    }
    let title = article.title.to_lowercase();
    title.contains("market") || title.contains("industry") || title.contains("growth")
}

/// Whether an article should feed the forecast scan
fn is_forecast_relevant(article: &Article) -> bool {
    if article.category == Category::Market {
        return true;
    }
    let title = article.title.to_lowercase();
    title.contains("forecast") || title.contains("growth") || title.contains("market")
}

/// Normalize a magnitude to billions, rendered `$<value>B`.
///
/// Values quoted in millions are divided by 1000, so "500 million" and
/// "0.5 billion" both come out as `$0.5B`.
fn normalize_market_size(value: &str, unit: &str) -> Option<String> {
    let value: f64 = value.parse().ok()?;
    let unit = unit.to_lowercase();

    let billions = if unit.starts_with('b') {
        value
    } else if unit.starts_with('m') {
        value / 1000.0
    } else {
        return None;
    };

    Some(format!("${}B", billions))
}

/// Expand a 2-digit year mention to the 2000s
fn expand_year(raw: &str) -> Option<i32> {
    let full = if raw.len() == 2 {
        format!("20{}", raw)
    } else {
        raw.to_string()
    };
    full.parse().ok()
}

/// Top-3 regions by mention count, descending, ties in vocabulary order
fn top_regions(articles: &[&Article]) -> Option<Vec<String>> {
    let texts: Vec<String> = articles
        .iter()
        .map(|a| a.search_text().to_lowercase())
        .collect();

    let mut mentions: Vec<(&str, usize)> = REGIONS
        .iter()
        .map(|&(keyword, display)| {
            let count = texts.iter().filter(|t| t.contains(keyword)).count();
            (display, count)
        })
        .filter(|&(_, count)| count > 0)
        .collect();

    if mentions.is_empty() {
        return None;
    }

    mentions.sort_by(|a, b| b.1.cmp(&a.1));
    mentions.truncate(3);

    Some(mentions.into_iter().map(|(r, _)| r.to_string()).collect())
}

/// Growth-factor phrases with at least one mention, vocabulary order
fn growth_factors(articles: &[&Article]) -> Option<Vec<String>> {
    let factors: Vec<String> = GROWTH_FACTORS
        .iter()
        .filter(|(keyword, _)| {
            articles
                .iter()
                .any(|a| a.search_text().to_lowercase().contains(keyword))
        })
        .map(|&(_, display)| display.to_string())
        .collect();

    if factors.is_empty() {
        None
    } else {
        Some(factors)
    }
}

/// Known companies mentioned at least once, upper-cased, vocabulary order
fn companies_mentioned(articles: &[&Article]) -> Option<Vec<String>> {
    let companies: Vec<String> = COMPANIES
        .iter()
        .filter(|company| {
            articles
                .iter()
                .any(|a| a.search_text().to_lowercase().contains(*company))
        })
        .map(|c| c.to_uppercase())
        .collect();

    if companies.is_empty() {
        None
    } else {
        Some(companies)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn article(title: &str, summary: &str) -> Article {
        Article {
            title: title.to_string(),
            summary: summary.to_string(),
            source: String::new(),
            url: format!("https://example.com/{}", title.len()),
            category: Category::classify(&format!("{} {}", title, summary)),
            published_date: None,
            title_translated: None,
            summary_translated: None,
        }
    }

    #[test]
    fn test_empty_corpus_yields_empty_summary() {
        let engine = InsightEngine::new();
        let summary = engine.analyze(&[]);

        assert!(summary.tech_trends.is_empty());
        assert!(summary.market_insights.is_empty());
        assert_eq!(summary.market_forecast.current, ForecastPoint::default());
        assert_eq!(summary.market_forecast.future, ForecastPoint::default());
        assert!(summary.market_forecast.cagr.is_none());
    }

    #[test]
    fn test_tech_trends_sorted_by_count() {
        let engine = InsightEngine::new();
        let corpus = vec![
            article("Inverter efficiency up", "New inverter design boosts efficiency"),
            article("Battery news", "Battery supply secured, efficiency targets met"),
            article("More inverters", "Inverter production expands"),
        ];

        let trends = engine.tech_trends(&corpus);
        assert_eq!(trends[0].keyword, "efficiency");
        assert_eq!(trends[0].relevance_count, 2);
        assert!(trends[0].description.contains('2'));
        assert!(trends.iter().any(|t| t.keyword == "inverter"));
        assert!(trends.iter().any(|t| t.keyword == "battery"));
        assert!(trends.len() <= 5);
    }

    #[test]
    fn test_tech_trends_caps_at_five() {
        let engine = InsightEngine::new();
        let corpus = vec![article(
            "Everything at once",
            "sic pmsm inverter battery charging semiconductor automation efficiency",
        )];

        assert_eq!(engine.tech_trends(&corpus).len(), 5);
    }

    #[test]
    fn test_market_insights_emit_only_matched_categories() {
        let engine = InsightEngine::new();
        let corpus = vec![article(
            "EV motor market update",
            "The market grew on rising demand in China and Europe, led by Tesla and BYD",
        )];

        let insights = engine.market_insights(&corpus);
        let titles: Vec<&str> = insights.iter().map(|i| i.title.as_str()).collect();

        // no size figure in the text, so no market-size entry
        assert!(!titles.contains(&"Market size"));
        assert!(titles.contains(&"Regional trends"));
        assert!(titles.contains(&"Growth drivers"));
        assert!(titles.contains(&"Competitive landscape"));

        let competitive = insights
            .iter()
            .find(|i| i.title == "Competitive landscape")
            .unwrap();
        assert!(competitive.content.contains("TESLA"));
        assert!(competitive.content.contains("BYD"));
    }

    #[test]
    fn test_market_insights_skip_irrelevant_articles() {
        let engine = InsightEngine::new();
        // tech-category article whose title has no market language
        let corpus = vec![article(
            "New motor technology from Tesla",
            "valued at $5 billion in China",
        )];

        assert!(engine.market_insights(&corpus).is_empty());
    }

    #[test]
    fn test_forecast_normalizes_million_and_billion_alike() {
        let engine = InsightEngine::new();

        let millions = engine.market_forecast(&[article(
            "Niche motor market report",
            "The segment is worth 500 million today",
        )]);
        let billions = engine.market_forecast(&[article(
            "Niche motor market report",
            "The segment is worth 0.5 billion today",
        )]);

        assert_eq!(millions.current.size.as_deref(), Some("$0.5B"));
        assert_eq!(millions.current.size, billions.current.size);
    }

    #[test]
    fn test_forecast_extracts_all_fields() {
        let engine = InsightEngine::new();
        let corpus = vec![
            article(
                "EV motor market valued at $27.16 billion",
                "Analysts expect a CAGR of 16.2% over the period",
            ),
            article(
                "Long-range market forecast",
                "By 2032 the market will reach $77.61 billion",
            ),
        ];

        let forecast = engine.market_forecast(&corpus);
        assert_eq!(forecast.current.size.as_deref(), Some("$27.16B"));
        assert_eq!(forecast.future.size.as_deref(), Some("$77.61B"));
        assert_eq!(forecast.future.year, Some(2032));
        assert_eq!(forecast.cagr, Some(16.2));
    }

    #[test]
    fn test_forecast_first_match_wins() {
        let engine = InsightEngine::new();
        let corpus = vec![
            article("Market sized at $10 billion", "first figure"),
            article("Market sized at $99 billion", "second figure, ignored"),
        ];

        let forecast = engine.market_forecast(&corpus);
        assert_eq!(forecast.current.size.as_deref(), Some("$10B"));
    }

    #[test]
    fn test_forecast_expands_two_digit_year() {
        let engine = InsightEngine::new();
        let corpus = vec![article(
            "Market outlook",
            "By 30 the industry could hit $40 billion",
        )];

        let forecast = engine.market_forecast(&corpus);
        assert_eq!(forecast.future.year, Some(2030));
        assert_eq!(forecast.future.size.as_deref(), Some("$40B"));
    }

    #[test]
    fn test_size_pattern_ignores_bare_words() {
        let engine = InsightEngine::new();
        // "market" must not satisfy the magnitude unit "m"
        let corpus = vec![article("2025 market outlook", "no figures quoted here")];

        let forecast = engine.market_forecast(&corpus);
        assert!(forecast.current.size.is_none());
        assert!(forecast.future.size.is_none());
    }

    #[test]
    fn test_normalize_market_size() {
        assert_eq!(normalize_market_size("500", "million").as_deref(), Some("$0.5B"));
        assert_eq!(normalize_market_size("0.5", "billion").as_deref(), Some("$0.5B"));
        assert_eq!(normalize_market_size("27.16", "B").as_deref(), Some("$27.16B"));
        assert_eq!(normalize_market_size("750", "M").as_deref(), Some("$0.75B"));
        assert_eq!(normalize_market_size("abc", "billion"), None);
    }
}
