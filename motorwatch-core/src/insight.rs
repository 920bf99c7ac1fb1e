//! Insight summary types derived from a collection run
//!
//! A summary is recomputed fresh from the article corpus on every run and is
//! never mutated afterwards. All fields tolerate an empty corpus: the default
//! value is the well-formed empty summary.

use serde::{Deserialize, Serialize};

/// One technology keyword trend
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TechTrend {
    /// The matched vocabulary keyword
    pub keyword: String,
    /// Human-readable sentence embedding the mention count
    pub description: String,
    /// Number of articles mentioning the keyword
    pub relevance_count: usize,
}

/// One templated market observation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MarketInsight {
    pub title: String,
    pub content: String,
}

/// A market size at a point in time, both fields best-effort
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ForecastPoint {
    /// Normalized size, e.g. `$27.16B`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub size: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub year: Option<i32>,
}

/// Market growth forecast extracted from corpus text
///
/// Heuristic, unverified: each field holds the first textual match found,
/// with no cross-validation between fields.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MarketForecast {
    pub current: ForecastPoint,
    pub future: ForecastPoint,
    /// Compound annual growth rate in percent (serializes as null when absent)
    pub cagr: Option<f64>,
}

/// Everything the insight engine derives from one run's corpus
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InsightSummary {
    pub tech_trends: Vec<TechTrend>,
    pub market_insights: Vec<MarketInsight>,
    pub market_forecast: MarketForecast,
}
