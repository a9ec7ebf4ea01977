//! Keyword extraction by frequency.
//!
//! Lowercases the text, splits it into alphabetic words, drops stopwords and
//! short words, then ranks the remaining words by how often they occur.
//! Ties keep the order in which words first appeared.

use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};

/// Default number of keywords returned.
pub const MAX_KEYWORDS: usize = 12;

/// Words shorter than this (in characters) are never keywords.
pub const MIN_WORD_LENGTH: usize = 3;

/// Stopwords for English dream narratives.
pub const STOPWORDS: &[&str] = &[
    "the", "and", "but", "nor", "for", "yet", "you", "she", "they", "him", "her", "them", "his",
    "its", "our", "your", "their", "mine", "yours", "hers", "ours", "theirs", "this", "that",
    "these", "those", "who", "whom", "which", "what", "whose", "are", "was", "were", "been",
    "being", "have", "has", "had", "having", "does", "did", "doing", "will", "would", "shall",
    "should", "can", "could", "may", "might", "must", "from", "with", "about", "against",
    "between", "into", "through", "during", "before", "after", "above", "below", "out", "off",
    "over", "under", "again", "further", "here", "there", "where", "when", "why", "how", "all",
    "each", "every", "both", "few", "more", "most", "other", "some", "any", "not", "only", "own",
    "same", "than", "too", "very", "just", "also", "now", "then", "once", "always", "never",
    "because", "until", "while", "although", "though", "yes", "maybe", "like", "felt", "feel",
    "got", "get", "went", "came", "saw", "seemed", "suddenly", "really", "something", "someone",
    "somewhere", "thing", "things", "myself", "itself", "dream", "dreams", "dreamed", "dreamt",
    "dreaming", "last", "one", "back", "around", "kept", "began",
];

/// Splits text into lowercase alphabetic words.
///
/// Any run of non-alphabetic characters is a separator, so digits,
/// punctuation and apostrophes never end up inside a token.
pub fn tokenize(text: &str) -> Vec<String> {
    text.to_lowercase()
        .split(|c: char| !c.is_alphabetic())
        .filter(|word| !word.is_empty())
        .map(str::to_string)
        .collect()
}

/// Result of keyword extraction
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KeywordResult {
    /// The keyword
    pub keyword: String,
    /// Share of retained tokens held by this keyword (0.0 - 1.0)
    pub score: f32,
    /// Raw frequency in the text
    pub frequency: usize,
}

/// Frequency-based keyword extractor
pub struct KeywordExtractor {
    stopwords: HashSet<&'static str>,
    min_word_length: usize,
    max_keywords: usize,
}

impl Default for KeywordExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl KeywordExtractor {
    /// Create a new keyword extractor with default settings
    pub fn new() -> Self {
        Self::with_config(MIN_WORD_LENGTH, MAX_KEYWORDS)
    }

    /// Create a keyword extractor with custom configuration
    pub fn with_config(min_word_length: usize, max_keywords: usize) -> Self {
        Self {
            stopwords: STOPWORDS.iter().copied().collect(),
            min_word_length,
            max_keywords,
        }
    }

    /// Check if a word is a stopword
    pub fn is_stopword(&self, word: &str) -> bool {
        self.stopwords.contains(word)
    }

    fn is_candidate(&self, word: &str) -> bool {
        word.chars().count() >= self.min_word_length && !self.is_stopword(word)
    }

    /// Extract the top N keywords from text
    pub fn extract(&self, text: &str, top_k: Option<usize>) -> Vec<KeywordResult> {
        let max_results = top_k.unwrap_or(self.max_keywords);
        let words: Vec<String> = tokenize(text)
            .into_iter()
            .filter(|w| self.is_candidate(w))
            .collect();

        if words.is_empty() {
            return vec![];
        }

        // First-seen order is the tie breaker, so count into an ordered list.
        let mut positions: HashMap<&str, usize> = HashMap::new();
        let mut counts: Vec<(&str, usize)> = Vec::new();
        for word in &words {
            match positions.get(word.as_str()) {
                Some(&idx) => counts[idx].1 += 1,
                None => {
                    positions.insert(word.as_str(), counts.len());
                    counts.push((word.as_str(), 1));
                }
            }
        }

        // Stable sort keeps first-seen order among equal counts.
        counts.sort_by(|a, b| b.1.cmp(&a.1));

        let total = words.len() as f32;
        counts
            .into_iter()
            .take(max_results)
            .map(|(word, frequency)| KeywordResult {
                keyword: word.to_string(),
                score: frequency as f32 / total,
                frequency,
            })
            .collect()
    }

    /// Extract keywords and return just the strings
    pub fn extract_keywords(&self, text: &str, top_k: Option<usize>) -> Vec<String> {
        self.extract(text, top_k)
            .into_iter()
            .map(|k| k.keyword)
            .collect()
    }
}
