//! Dream Analysis - Output structure of the brain pipeline.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::emotions::EmotionScores;

/// Everything derived from a single dream text
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DreamAnalysis {
    /// Original dream text
    pub text: String,

    /// Short title from the first sentence
    pub title: String,

    /// First sentence, truncated
    pub summary: String,

    /// Ranked keywords, best first
    pub keywords: Vec<String>,

    /// Emotion label → normalized score
    pub emotions: EmotionScores,

    /// Processing time in milliseconds
    pub processing_time_ms: u64,

    /// Timestamp of analysis
    pub timestamp: DateTime<Utc>,
}

impl DreamAnalysis {
    /// Create an empty analysis for the given text
    pub fn new(text: String) -> Self {
        Self {
            text,
            title: String::new(),
            summary: String::new(),
            keywords: vec![],
            emotions: EmotionScores::new(),
            processing_time_ms: 0,
            timestamp: Utc::now(),
        }
    }

    /// The highest-scoring emotion, if any
    pub fn dominant_emotion(&self) -> Option<(&str, f32)> {
        self.emotions
            .iter()
            .max_by(|a, b| a.1.total_cmp(b.1))
            .map(|(label, score)| (label.as_str(), *score))
    }

    /// Get a summary for logging
    pub fn log_line(&self) -> String {
        format!(
            "Title: {:?}, Keywords: {}, Emotions: {}, Dominant: {}",
            self.title,
            self.keywords.len(),
            self.emotions.len(),
            self.dominant_emotion().map(|(e, _)| e).unwrap_or("none")
        )
    }
}
