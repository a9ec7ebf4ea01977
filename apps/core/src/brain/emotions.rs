//! Lexicon-based emotion scoring.
//!
//! Each emotion owns a list of trigger words. Every token equal to a trigger
//! adds one point, a handful of regex boosts add bonus points, and the final
//! counts are divided by their total so each score lies in `[0, 1]`.
//! Text without any hit gets a fixed default distribution.

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use std::fmt;
use std::sync::LazyLock;

use super::keywords::tokenize;

/// Emotion label → normalized score, as stored and served.
pub type EmotionScores = BTreeMap<String, f32>;

/// Emotion categories known to the lexicon.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Emotion {
    Joy,
    Fear,
    Anxiety,
    Mystery,
    Sadness,
    Peace,
    Wonder,
    Anger,
}

impl Emotion {
    /// All categories, in lexicon order.
    pub const ALL: [Emotion; 8] = [
        Emotion::Joy,
        Emotion::Fear,
        Emotion::Anxiety,
        Emotion::Mystery,
        Emotion::Sadness,
        Emotion::Peace,
        Emotion::Wonder,
        Emotion::Anger,
    ];

    /// Returns the label used as the score map key
    pub fn label(&self) -> &'static str {
        match self {
            Emotion::Joy => "joy",
            Emotion::Fear => "fear",
            Emotion::Anxiety => "anxiety",
            Emotion::Mystery => "mystery",
            Emotion::Sadness => "sadness",
            Emotion::Peace => "peace",
            Emotion::Wonder => "wonder",
            Emotion::Anger => "anger",
        }
    }

    /// Trigger words counted for this emotion.
    pub fn triggers(&self) -> &'static [&'static str] {
        match self {
            Emotion::Joy => &[
                "joy", "happy", "happiness", "laugh", "laughing", "smile", "smiling", "fun",
                "celebrate", "celebration", "delight", "excited", "glad", "love", "playing",
                "sunshine", "friends",
            ],
            Emotion::Fear => &[
                "fear", "afraid", "scared", "scary", "terrified", "terror", "horror", "scream",
                "screaming", "danger", "dangerous", "ghost", "blood", "attack", "hide", "hiding",
                "trapped",
            ],
            Emotion::Anxiety => &[
                "anxious", "anxiety", "worried", "worry", "nervous", "panic", "stress",
                "stressed", "hurry", "rushing", "deadline", "unprepared", "forgot", "missing",
                "stuck",
            ],
            Emotion::Mystery => &[
                "mystery", "mysterious", "strange", "unknown", "secret", "hidden", "fog", "mist",
                "door", "doors", "maze", "labyrinth", "whisper", "whispers", "stranger", "key",
                "portal",
            ],
            Emotion::Sadness => &[
                "sad", "sadness", "cry", "crying", "cried", "tears", "lonely", "alone", "grief",
                "loss", "funeral", "goodbye", "empty", "broken", "miss",
            ],
            Emotion::Peace => &[
                "calm", "peace", "peaceful", "serene", "quiet", "gentle", "relaxed", "safe",
                "warm", "garden", "breeze", "meadow", "still", "rest",
            ],
            Emotion::Wonder => &[
                "wonder", "amazing", "beautiful", "magic", "magical", "glowing", "stars",
                "galaxy", "rainbow", "sparkling", "awe", "infinite", "crystal", "dragon",
            ],
            Emotion::Anger => &[
                "angry", "anger", "furious", "rage", "yelling", "shouting", "fight", "fighting",
                "argue", "argument", "hate", "betrayed", "revenge",
            ],
        }
    }
}

impl fmt::Display for Emotion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// Returned when no trigger or boost matched: mystery 4, joy 3, anxiety 2, fear 2.
pub const DEFAULT_DISTRIBUTION: [(Emotion, u32); 4] = [
    (Emotion::Mystery, 4),
    (Emotion::Joy, 3),
    (Emotion::Anxiety, 2),
    (Emotion::Fear, 2),
];

/// Regex boost applied once when its pattern occurs anywhere in the text.
struct Boost {
    emotion: Emotion,
    pattern: Regex,
    points: u32,
}

// NOTE: expect() is acceptable here: the patterns are constants and are
// covered by tests, so a failure is a programming error caught at first use.
static BOOSTS: LazyLock<Vec<Boost>> = LazyLock::new(|| {
    vec![
        Boost {
            emotion: Emotion::Mystery,
            pattern: Regex::new(r"(?i)\b(night|midnight|moon|moonlight|dark|darkness|shadows?)\b")
                .expect("Invalid regex: mystery boost"),
            points: 2,
        },
        Boost {
            emotion: Emotion::Fear,
            pattern: Regex::new(r"(?i)\b(chased|chasing|monsters?)\b")
                .expect("Invalid regex: fear boost"),
            points: 2,
        },
        Boost {
            emotion: Emotion::Anxiety,
            pattern: Regex::new(r"(?i)\b(late|exams?|lost|falling)\b")
                .expect("Invalid regex: anxiety boost"),
            points: 2,
        },
        Boost {
            emotion: Emotion::Joy,
            pattern: Regex::new(r"(?i)\b(fly|flying|flew|floating|soaring)\b")
                .expect("Invalid regex: joy boost"),
            points: 1,
        },
    ]
});

/// Word → emotion lookup built from the trigger table.
static LEXICON: LazyLock<HashMap<&'static str, Emotion>> = LazyLock::new(|| {
    Emotion::ALL
        .iter()
        .flat_map(|emotion| emotion.triggers().iter().map(move |w| (*w, *emotion)))
        .collect()
});

/// Lexicon-based emotion scorer
#[derive(Debug, Default, Clone, Copy)]
pub struct EmotionScorer;

impl EmotionScorer {
    pub fn new() -> Self {
        Self
    }

    /// Raw points per emotion: trigger hits plus regex boosts.
    pub fn counts(&self, text: &str) -> BTreeMap<Emotion, u32> {
        let mut counts: BTreeMap<Emotion, u32> = BTreeMap::new();

        for token in tokenize(text) {
            if let Some(emotion) = LEXICON.get(token.as_str()) {
                *counts.entry(*emotion).or_insert(0) += 1;
            }
        }

        for boost in BOOSTS.iter() {
            if boost.pattern.is_match(text) {
                *counts.entry(boost.emotion).or_insert(0) += boost.points;
            }
        }

        counts
    }

    /// Normalized scores. Only emotions with points appear in the map.
    pub fn score(&self, text: &str) -> EmotionScores {
        let counts = self.counts(text);
        let total: u32 = counts.values().sum();

        if total == 0 {
            return default_distribution();
        }

        counts
            .into_iter()
            .filter(|(_, count)| *count > 0)
            .map(|(emotion, count)| (emotion.label().to_string(), count as f32 / total as f32))
            .collect()
    }
}

/// The fixed distribution used for text without lexicon hits.
pub fn default_distribution() -> EmotionScores {
    let total: u32 = DEFAULT_DISTRIBUTION.iter().map(|(_, w)| w).sum();
    DEFAULT_DISTRIBUTION
        .iter()
        .map(|(emotion, weight)| (emotion.label().to_string(), *weight as f32 / total as f32))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    fn approx(a: f32, b: f32) -> bool {
        (a - b).abs() < 1e-6
    }

    #[test]
    fn test_default_distribution_for_neutral_text() {
        let scorer = EmotionScorer::new();

        for text in ["", "   ", "I walked to the table and sat down."] {
            let scores = scorer.score(text);
            assert_eq!(scores.len(), 4, "unexpected keys for {:?}", text);
            assert!(approx(scores["mystery"], 4.0 / 11.0));
            assert!(approx(scores["joy"], 3.0 / 11.0));
            assert!(approx(scores["anxiety"], 2.0 / 11.0));
            assert!(approx(scores["fear"], 2.0 / 11.0));
        }
    }

    #[test]
    fn test_trigger_counts() {
        let scorer = EmotionScorer::new();

        let counts = scorer.counts("I was happy and scared, then happy again");
        assert_eq!(counts.get(&Emotion::Joy), Some(&2));
        assert_eq!(counts.get(&Emotion::Fear), Some(&1));
    }

    #[test]
    fn test_boosts_apply_once() {
        let scorer = EmotionScorer::new();

        let counts = scorer.counts("night after night under the moon");
        assert_eq!(counts.get(&Emotion::Mystery), Some(&2));

        let scores = scorer.score("night after night under the moon");
        assert_eq!(scores.len(), 1);
        assert!(approx(scores["mystery"], 1.0));
    }

    #[test]
    fn test_scores_are_normalized() {
        let scorer = EmotionScorer::new();

        let scores =
            scorer.score("A monster chased me through a dark maze and I was terrified and scared");
        let sum: f32 = scores.values().sum();
        assert!(approx(sum, 1.0));
        assert!(scores.values().all(|v| (0.0..=1.0).contains(v)));
        assert!(scores["fear"] > scores["mystery"]);
    }

    #[test]
    fn test_order_independent() {
        let scorer = EmotionScorer::new();

        let a = scorer.score("happy calm strange night crying");
        let b = scorer.score("crying night strange calm happy");
        assert_eq!(a, b);
    }

    #[test]
    fn test_lexicon_is_disjoint() {
        let mut seen = HashSet::new();
        for emotion in Emotion::ALL {
            for word in emotion.triggers() {
                assert!(seen.insert(*word), "'{}' listed twice", word);
            }
        }
    }
}
