//! Aggregates over a user's journal.

use axum::extract::State;
use axum::routing::get;
use axum::{Json, Router};
use chrono::{Duration, Utc};
use regex::Regex;
use serde::Serialize;
use std::collections::HashMap;
use std::sync::LazyLock;

use super::AppState;
use crate::auth::AuthUser;
use crate::brain::EmotionScores;
use crate::error::AppError;
use crate::models::Dream;

pub const MAX_SYMBOLS: usize = 20;
pub const MAX_EMOTIONS: usize = 5;
pub const TREND_DAYS: i64 = 30;

// NOTE: expect() is acceptable here: constant pattern.
static SETTING_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"city|forest|ocean|space|home|school").expect("Invalid regex: settings")
});

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/summary", get(summary))
        .route("/trends", get(trends))
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SymbolCount {
    pub symbol: String,
    pub count: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EmotionTotal {
    pub emotion: String,
    pub score: f32,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InsightSummary {
    pub recurring_symbols: Vec<SymbolCount>,
    pub top_emotions: Vec<EmotionTotal>,
    pub common_settings: Vec<SymbolCount>,
}

#[derive(Debug, Serialize)]
pub struct TimelinePoint {
    pub t: i64,
    pub emotions: EmotionScores,
}

#[derive(Debug, PartialEq, Serialize)]
pub struct WordWeight {
    pub text: String,
    pub value: usize,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InsightTrends {
    pub timeline: Vec<TimelinePoint>,
    pub word_cloud_data: Vec<WordWeight>,
}

/// Counts items, keeping first-seen order.
fn count_in_order<'a>(items: impl Iterator<Item = &'a str>) -> Vec<(String, usize)> {
    let mut index: HashMap<&str, usize> = HashMap::new();
    let mut counts: Vec<(String, usize)> = Vec::new();
    for item in items {
        match index.get(item) {
            Some(&i) => counts[i].1 += 1,
            None => {
                index.insert(item, counts.len());
                counts.push((item.to_string(), 1));
            }
        }
    }
    counts
}

pub fn summarize(dreams: &[Dream]) -> InsightSummary {
    let mut symbols = count_in_order(dreams.iter().flat_map(|d| d.keywords.iter().map(String::as_str)));
    symbols.sort_by(|a, b| b.1.cmp(&a.1));
    let recurring_symbols: Vec<SymbolCount> = symbols
        .into_iter()
        .take(MAX_SYMBOLS)
        .map(|(symbol, count)| SymbolCount { symbol, count })
        .collect();

    let mut totals: Vec<EmotionTotal> = Vec::new();
    for dream in dreams {
        for (label, score) in dream.emotions.iter() {
            match totals.iter_mut().find(|t| &t.emotion == label) {
                Some(total) => total.score += score,
                None => totals.push(EmotionTotal {
                    emotion: label.clone(),
                    score: *score,
                }),
            }
        }
    }
    totals.sort_by(|a, b| b.score.total_cmp(&a.score));
    totals.truncate(MAX_EMOTIONS);

    let common_settings = recurring_symbols
        .iter()
        .filter(|s| SETTING_PATTERN.is_match(&s.symbol))
        .cloned()
        .collect();

    InsightSummary {
        recurring_symbols,
        top_emotions: totals,
        common_settings,
    }
}

/// Trends over dreams with `timestamp >= since_ms`.
pub fn trends_since(dreams: &[Dream], since_ms: i64) -> InsightTrends {
    let recent: Vec<&Dream> = dreams.iter().filter(|d| d.timestamp >= since_ms).collect();

    let timeline = recent
        .iter()
        .map(|d| TimelinePoint {
            t: d.timestamp,
            emotions: d.emotions.0.clone(),
        })
        .collect();

    let word_cloud_data = count_in_order(recent.iter().flat_map(|d| d.keywords.iter().map(String::as_str)))
        .into_iter()
        .map(|(text, value)| WordWeight { text, value })
        .collect();

    InsightTrends {
        timeline,
        word_cloud_data,
    }
}

async fn summary(State(state): State<AppState>, user: AuthUser) -> Result<Json<InsightSummary>, AppError> {
    let dreams = state.store.list_dreams(user.id()).await?;
    Ok(Json(summarize(&dreams)))
}

async fn trends(State(state): State<AppState>, user: AuthUser) -> Result<Json<InsightTrends>, AppError> {
    let dreams = state.store.list_dreams(user.id()).await?;
    let since = (Utc::now() - Duration::days(TREND_DAYS)).timestamp_millis();
    Ok(Json(trends_since(&dreams, since)))
}
