//! Brain Module Tests
//!
//! Properties of keyword extraction, emotion scoring and the analyzer
//! orchestrator over realistic dream narratives.

use crate::brain::emotions::{Emotion, DEFAULT_DISTRIBUTION};
use crate::brain::keywords::{MAX_KEYWORDS, MIN_WORD_LENGTH, STOPWORDS};
use crate::brain::summary::{SUMMARY_MAX_CHARS, TITLE_MAX_CHARS, UNTITLED};
use crate::brain::{analyze_emotions, extract_keywords, DreamAnalyzer};

const DREAMS: &[&str] = &[
    "I was flying over a neon city at midnight, and the city kept folding into itself.",
    "A monster chased me through the school while I was late for an exam I never studied for.",
    "My grandmother stood in a quiet garden. She smiled and handed me a glowing key.",
    "The ocean was made of glass. Every wave sang my name and I cried tears of joy.",
    "",
    "...",
    "Stairs stairs stairs stairs stairs stairs stairs, always going down into darkness!",
    "Je marchais dans une forêt étrange, pleine de lumières.",
];

#[cfg(test)]
mod keyword_property_tests {
    use super::*;

    #[test]
    fn test_keyword_bounds_hold_for_all_inputs() {
        for text in DREAMS {
            let keywords = extract_keywords(text);
            assert!(keywords.len() <= MAX_KEYWORDS, "too many keywords for {:?}", text);
            for keyword in &keywords {
                assert!(
                    keyword.chars().count() >= MIN_WORD_LENGTH,
                    "short keyword {:?}",
                    keyword
                );
                assert!(!STOPWORDS.contains(&keyword.as_str()), "stopword {:?}", keyword);
                assert_eq!(keyword, &keyword.to_lowercase());
            }
        }
    }

    #[test]
    fn test_keywords_are_unique() {
        for text in DREAMS {
            let keywords = extract_keywords(text);
            let mut deduped = keywords.clone();
            deduped.sort();
            deduped.dedup();
            assert_eq!(deduped.len(), keywords.len());
        }
    }

    #[test]
    fn test_most_frequent_keyword_first() {
        let keywords = extract_keywords(DREAMS[6]);
        assert_eq!(keywords.first().map(String::as_str), Some("stairs"));
    }

    #[test]
    fn test_dream_word_is_a_stopword() {
        let keywords = extract_keywords("I dreamed a dream about dreams of a lighthouse");
        assert_eq!(keywords, vec!["lighthouse"]);
    }
}

#[cfg(test)]
mod emotion_property_tests {
    use super::*;

    #[test]
    fn test_scores_in_unit_range() {
        for text in DREAMS {
            let scores = analyze_emotions(text);
            assert!(!scores.is_empty());
            for (label, score) in &scores {
                assert!((0.0..=1.0).contains(score), "{} = {} for {:?}", label, score, text);
            }
            let sum: f32 = scores.values().sum();
            assert!(sum <= Emotion::ALL.len() as f32);
        }
    }

    #[test]
    fn test_labels_are_known() {
        let known: Vec<&str> = Emotion::ALL.iter().map(|e| e.label()).collect();
        for text in DREAMS {
            for label in analyze_emotions(text).keys() {
                assert!(known.contains(&label.as_str()), "unknown label {}", label);
            }
        }
    }

    #[test]
    fn test_default_distribution_for_empty_text() {
        let scores = analyze_emotions("");
        assert_eq!(scores.len(), DEFAULT_DISTRIBUTION.len());
        assert!((scores["mystery"] - 4.0 / 11.0).abs() < 1e-6);
        assert!((scores["joy"] - 3.0 / 11.0).abs() < 1e-6);
        assert!((scores["anxiety"] - 2.0 / 11.0).abs() < 1e-6);
        assert!((scores["fear"] - 2.0 / 11.0).abs() < 1e-6);
    }

    #[test]
    fn test_chase_dream_is_fearful() {
        let scores = analyze_emotions(DREAMS[1]);
        let (top, _) = scores
            .iter()
            .max_by(|a, b| a.1.total_cmp(b.1))
            .unwrap();
        assert!(top == "fear" || top == "anxiety", "top emotion was {}", top);
        assert!(scores.contains_key("fear"));
        assert!(scores.contains_key("anxiety"));
    }

    #[test]
    fn test_permutation_invariance() {
        let a = analyze_emotions("tears garden monster night happy");
        let b = analyze_emotions("happy night monster garden tears");
        assert_eq!(a, b);
    }

    #[test]
    fn test_case_insensitive() {
        assert_eq!(
            analyze_emotions("I was SCARED of the MOON"),
            analyze_emotions("i was scared of the moon")
        );
    }
}

#[cfg(test)]
mod analyzer_tests {
    use super::*;

    #[test]
    fn test_every_dream_gets_a_title() {
        let analyzer = DreamAnalyzer::new();
        for text in DREAMS {
            let analysis = analyzer.analyze(text);
            assert!(!analysis.title.is_empty());
            assert!(analysis.title.chars().count() <= TITLE_MAX_CHARS);
            assert!(analysis.summary.chars().count() <= SUMMARY_MAX_CHARS);
        }
    }

    #[test]
    fn test_blank_dream_is_untitled() {
        let analyzer = DreamAnalyzer::new();
        assert_eq!(analyzer.analyze("").title, UNTITLED);
        assert_eq!(analyzer.analyze("...").title, UNTITLED);
    }

    #[test]
    fn test_long_first_sentence_is_truncated() {
        let analyzer = DreamAnalyzer::new();
        let analysis = analyzer.analyze(DREAMS[0]);
        assert!(analysis.title.ends_with("..."));
        assert_eq!(
            analysis.summary,
            "I was flying over a neon city at midnight, and the city kept folding into itself"
        );
    }

    #[test]
    fn test_analysis_is_deterministic() {
        let analyzer = DreamAnalyzer::new();
        let a = analyzer.analyze(DREAMS[3]);
        let b = analyzer.analyze(DREAMS[3]);
        assert_eq!(a.title, b.title);
        assert_eq!(a.keywords, b.keywords);
        assert_eq!(a.emotions, b.emotions);
    }

    #[test]
    fn test_non_ascii_text() {
        let analyzer = DreamAnalyzer::new();
        let analysis = analyzer.analyze(DREAMS[7]);
        assert!(analysis.keywords.contains(&"forêt".to_string()));
    }
}
