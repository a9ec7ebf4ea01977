//! Image prompt construction.
//!
//! Prompts are plain strings built from a fixed template. Recognized terms
//! are pulled out of the dream text per category and listed up front so the
//! provider keeps them in frame.

use regex::Regex;
use std::sync::LazyLock;

const SETTINGS: &[&str] = &[
    "forest", "city", "street", "classroom", "school", "beach", "ocean", "desert", "mountain",
    "cave", "library", "space", "temple", "castle", "island", "garden", "river", "room", "house",
    "apartment", "rooftop", "market", "train", "subway", "bridge", "cemetery", "church", "mosque",
    "palace", "lab", "museum",
];
const TIMES: &[&str] = &[
    "dawn", "sunrise", "morning", "noon", "afternoon", "sunset", "twilight", "evening", "night",
    "midnight",
];
const WEATHER: &[&str] = &[
    "rain", "snow", "storm", "fog", "mist", "wind", "breeze", "clear sky", "cloudy", "thunder",
];
const SUBJECTS: &[&str] = &[
    "man", "woman", "boy", "girl", "child", "friend", "friends", "people", "crowd", "teacher",
    "professor", "stranger", "monster", "creature", "animal", "bird", "cat", "dog", "dragon",
    "robot", "ghost",
];
const ACTIONS: &[&str] = &[
    "walking", "running", "flying", "swimming", "falling", "chased", "chasing", "looking",
    "waiting", "crying", "smiling", "sitting", "standing", "dancing",
];
const COLORS: &[&str] = &[
    "red", "orange", "yellow", "green", "blue", "indigo", "violet", "purple", "pink", "gold",
    "silver", "black", "white", "neon",
];
const MOODS: &[&str] = &[
    "joy", "happy", "calm", "peace", "serene", "fear", "scary", "anxious", "anxiety", "mystery",
    "wonder", "lonely", "love",
];

const GUIDANCE: &str = "Accurately depict ONLY the elements described. \
Do not add extra people or objects not mentioned. \
Preserve the composition implied by the text. \
High fidelity to nouns, places, and actions. \
Photographic realism where appropriate; lightly dreamy lighting.";

pub const NEGATIVE_PROMPT: &str = "low quality, lowres, text, watermark, extra limbs, \
extra people, artifacts, oversaturated, unrealistic additions";

/// Captions used when a story has fewer sentences than panels.
pub const DEFAULT_SCENES: [&str; 6] = [
    "A quiet introduction to the dream world",
    "A hint of wonder appears in the distance",
    "The scene builds with motion and color",
    "The dream reaches a surreal climax",
    "A moment of clarity and reflection",
    "A gentle resolution as the dream fades",
];

struct Category {
    label: &'static str,
    terms: Vec<(&'static str, Regex)>,
}

impl Category {
    fn new(label: &'static str, words: &[&'static str]) -> Self {
        let terms = words
            .iter()
            .map(|w| {
                let pattern = format!(r"(?i)\b{}\b", regex::escape(w));
                (*w, Regex::new(&pattern).expect("Invalid regex: prompt term"))
            })
            .collect();
        Self { label, terms }
    }

    fn found_in(&self, text: &str) -> Vec<&'static str> {
        self.terms
            .iter()
            .filter(|(_, re)| re.is_match(text))
            .map(|(w, _)| *w)
            .collect()
    }
}

// NOTE: expect() is acceptable here: every pattern is an escaped constant
// word, so compilation cannot fail at runtime.
static CATEGORIES: LazyLock<Vec<Category>> = LazyLock::new(|| {
    vec![
        Category::new("setting", SETTINGS),
        Category::new("time of day", TIMES),
        Category::new("weather", WEATHER),
        Category::new("subjects", SUBJECTS),
        Category::new("key actions", ACTIONS),
        Category::new("dominant colors", COLORS),
        Category::new("mood", MOODS),
    ]
});

/// Recognized terms per category, in table order. Empty categories are skipped.
pub fn recognized_elements(text: &str) -> Vec<(&'static str, Vec<&'static str>)> {
    CATEGORIES
        .iter()
        .map(|c| (c.label, c.found_in(text)))
        .filter(|(_, found)| !found.is_empty())
        .collect()
}

/// The `Required elements:` line, or `None` when nothing was recognized.
pub fn required_line(text: &str) -> Option<String> {
    let elements = recognized_elements(text);
    if elements.is_empty() {
        return None;
    }
    let parts: Vec<String> = elements
        .into_iter()
        .map(|(label, found)| format!("{}: {}", label, found.join(", ")))
        .collect();
    Some(format!("Required elements: {}.", parts.join("; ")))
}

/// Full provider prompt for a piece of dream text.
pub fn build_prompt(dream_text: &str) -> String {
    let text = dream_text.trim();

    let mut lines = vec!["Create a highly faithful image for the described dream.".to_string()];
    if let Some(required) = required_line(text) {
        lines.push(required);
    }
    lines.push(format!("Description: {}", text));
    lines.push("Style: cinematic, detailed, coherent scene, consistent perspective.".to_string());
    lines.push("Lighting: match the time-of-day and mood from the description.".to_string());
    lines.push(GUIDANCE.to_string());
    lines.push(format!("Negative prompt: {}", NEGATIVE_PROMPT));

    lines.join("\n")
}

/// Source text for one story panel. `index` is zero-based.
pub fn scene_source(dream_text: &str, index: usize, focus: &str) -> String {
    format!(
        "Create a surreal cinematic artwork for Scene {} of the dream.\n\n\
         Dream: '{}'\n\
         Scene focus: {}\n\
         Style: Storyboard, cinematic, fantasy, ultra-detailed, magical.\n\
         Lighting: Match the mood of the scene.\n\
         Camera: Dynamic cinematic shot, appropriate to the scene.\n\
         Resolution: High quality.",
        index + 1,
        dream_text,
        focus
    )
}

/// Source text for a remix: the original dream plus a user direction.
pub fn remix_source(dream_text: &str, direction: &str) -> String {
    format!("{}\nRemix direction: {}", dream_text.trim(), direction.trim())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_recognized_elements_in_table_order() {
        let found = recognized_elements("A dragon flying over a red castle at night in the rain");
        let labels: Vec<&str> = found.iter().map(|(l, _)| *l).collect();
        assert_eq!(
            labels,
            vec!["setting", "time of day", "weather", "subjects", "key actions", "dominant colors"]
        );
        assert_eq!(found[0].1, vec!["castle"]);
    }

    #[test]
    fn test_word_boundaries() {
        // "scatter" must not match "cat", "mankind" must not match "man"
        assert!(recognized_elements("scatter mankind").is_empty());
        assert!(required_line("scatter mankind").is_none());
    }

    #[test]
    fn test_multi_word_terms_and_case() {
        let line = required_line("Under a CLEAR SKY").unwrap();
        assert_eq!(line, "Required elements: weather: clear sky.");
    }

    #[test]
    fn test_build_prompt_layout() {
        let prompt = build_prompt("  I saw a cat in the garden.  ");
        let lines: Vec<&str> = prompt.lines().collect();
        assert_eq!(lines[0], "Create a highly faithful image for the described dream.");
        assert_eq!(
            lines[1],
            "Required elements: setting: garden; subjects: cat."
        );
        assert_eq!(lines[2], "Description: I saw a cat in the garden.");
        assert!(lines.last().unwrap().starts_with("Negative prompt: low quality"));
    }

    #[test]
    fn test_build_prompt_without_elements() {
        let prompt = build_prompt("Nothing familiar here");
        assert!(!prompt.contains("Required elements"));
        assert!(prompt.contains("Description: Nothing familiar here"));
    }

    #[test]
    fn test_build_prompt_is_deterministic() {
        assert_eq!(build_prompt("a blue river"), build_prompt("a blue river"));
    }

    #[test]
    fn test_scene_source() {
        let scene = scene_source("the dream", 2, "the climax");
        assert!(scene.starts_with("Create a surreal cinematic artwork for Scene 3 of the dream."));
        assert!(scene.contains("Dream: 'the dream'"));
        assert!(scene.contains("Scene focus: the climax"));
    }

    #[test]
    fn test_remix_source() {
        assert_eq!(
            remix_source(" a forest ", " make it snow "),
            "a forest\nRemix direction: make it snow"
        );
    }
}
