//! Core types for the MotorWatch news pipeline
//!
//! This crate defines the shared data structures used across the pipeline:
//! the article record, its keyword-derived category, and the insight
//! summary computed from each collection run.

pub mod article;
pub mod insight;

pub use article::{Article, Category};
pub use insight::{ForecastPoint, InsightSummary, MarketForecast, MarketInsight, TechTrend};
