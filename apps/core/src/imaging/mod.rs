//! # Imaging Module
//!
//! Turns dream text into pictures.
//!
//! ## Components
//! - `prompt`: deterministic prompt templates
//! - `provider`: provider selection and wire formats
//! - `generator`: provider call with seeded fallback
//! - `story`: six-panel story rendering

pub mod generator;
pub mod prompt;
pub mod provider;
pub mod story;

pub use generator::{ImageGenResult, ImageGenerator};
pub use provider::ImageProvider;
pub use story::{generate_story, StoryResult};
