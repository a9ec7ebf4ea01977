//! Six-panel dream story.

use serde::{Deserialize, Serialize};
use tracing::debug;

use super::generator::ImageGenerator;
use super::prompt::{scene_source, DEFAULT_SCENES};
use crate::brain::summary::sentences;

pub const STORY_PANELS: usize = 6;

/// Texts shorter than this (trimmed, in characters) use only default scenes.
pub const MIN_STORY_CHARS: usize = 40;

/// Shown for a panel that produced no URL.
pub const PLACEHOLDER_IMAGE: &str = "/placeholder.svg";

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoryResult {
    pub success: bool,
    pub story_images: Vec<String>,
}

/// Splits dream text into exactly six scene captions.
pub fn split_into_scenes(text: &str) -> Vec<String> {
    let text = text.trim();
    if text.chars().count() < MIN_STORY_CHARS {
        return DEFAULT_SCENES.iter().map(|s| s.to_string()).collect();
    }

    let found = sentences(text);
    DEFAULT_SCENES
        .iter()
        .enumerate()
        .map(|(i, default)| found.get(i).copied().unwrap_or(*default).to_string())
        .collect()
}

/// Renders one image per scene, sequentially.
///
/// `allow_provider` is asked before each panel, so a provider budget can
/// run out part-way through and the remaining panels use the fallback.
pub async fn generate_story<F>(
    generator: &ImageGenerator,
    dream_text: &str,
    mut allow_provider: F,
) -> StoryResult
where
    F: FnMut() -> bool,
{
    let scenes = split_into_scenes(dream_text);
    let mut story_images = Vec::with_capacity(STORY_PANELS);

    for (i, focus) in scenes.iter().enumerate() {
        let source = scene_source(dream_text, i, focus);
        let image = generator.render(&source, allow_provider()).await;
        debug!(scene = i + 1, source = ?image.source, "story panel rendered");
        story_images.push(
            image
                .image_url
                .unwrap_or_else(|| PLACEHOLDER_IMAGE.to_string()),
        );
    }

    StoryResult {
        success: true,
        story_images,
    }
}
