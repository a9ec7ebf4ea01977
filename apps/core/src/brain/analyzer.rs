//! Dream Analyzer - Main orchestrator for the brain module.
//!
//! Runs keyword extraction, emotion scoring and title/summary derivation
//! over a dream text. Everything here is synchronous and allocation-light,
//! so handlers call it inline.

use chrono::Utc;
use std::time::Instant;
use tracing::debug;

use super::analysis::DreamAnalysis;
use super::summary::{derive_summary, derive_title};
use super::{analyze_emotions, extract_keywords};

/// Main analyzer that orchestrates all analysis components.
///
/// The components are stateless tables, so the analyzer carries no state.
#[derive(Debug, Default, Clone, Copy)]
pub struct DreamAnalyzer;

impl DreamAnalyzer {
    /// Create a new analyzer with default settings
    pub fn new() -> Self {
        Self
    }

    /// Analyze a dream text
    pub fn analyze(&self, text: &str) -> DreamAnalysis {
        let start = Instant::now();

        let mut analysis = DreamAnalysis::new(text.to_string());

        analysis.title = derive_title(text);
        analysis.summary = derive_summary(text);
        analysis.keywords = extract_keywords(text);
        analysis.emotions = analyze_emotions(text);

        analysis.processing_time_ms = start.elapsed().as_millis() as u64;
        analysis.timestamp = Utc::now();

        debug!("{}", analysis.log_line());
        analysis
    }
}
