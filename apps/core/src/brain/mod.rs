//! # Brain Module
//!
//! Fast, model-free analysis of dream narratives.
//!
//! ## Components
//! - `keywords`: frequency keyword extraction
//! - `emotions`: lexicon emotion scoring
//! - `summary`: title and summary derivation
//! - `analysis`: output data structure
//! - `analyzer`: main orchestrator

pub mod analysis;
pub mod analyzer;
pub mod emotions;
pub mod keywords;
pub mod summary;

pub use analyzer::DreamAnalyzer;
pub use emotions::{EmotionScorer, EmotionScores};
pub use keywords::KeywordExtractor;

/// Top keywords of a text with the default extractor.
pub fn extract_keywords(text: &str) -> Vec<String> {
    KeywordExtractor::new().extract_keywords(text, None)
}

/// Emotion scores of a text with the default lexicon.
pub fn analyze_emotions(text: &str) -> EmotionScores {
    EmotionScorer::new().score(text)
}
