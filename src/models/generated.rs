// src/models/generated.rs

use serde::{Deserialize, Serialize};

/// Body content as produced by the generation service: one string or a list of lines.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SlideContent {
    Text(String),
    Lines(Vec<String>),
}

impl Default for SlideContent {
    fn default() -> Self {
        SlideContent::Text(String::new())
    }
}

impl SlideContent {
    /// The body text; lists are joined with newlines.
    pub fn joined(&self) -> String {
        match self {
            SlideContent::Text(text) => text.clone(),
            SlideContent::Lines(lines) => lines.join("\n"),
        }
    }
}

/// One slide object returned by the AI generation backend.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct GeneratedSlide {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub content: SlideContent,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
}
