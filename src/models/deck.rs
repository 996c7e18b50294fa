// src/models/deck.rs

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::errors::{EditorError, Result};
use crate::models::common::ElementId;
use crate::models::slide::Slide;
use crate::models::template::TemplateDescriptor;

/// The ordered, never-empty sequence of slides being edited.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "Vec<Slide>", into = "Vec<Slide>")]
pub struct Deck {
    slides: Vec<Slide>,
}

impl Default for Deck {
    fn default() -> Self {
        Deck {
            slides: vec![Slide::default()],
        }
    }
}

impl From<Vec<Slide>> for Deck {
    fn from(slides: Vec<Slide>) -> Self {
        Deck::new(slides)
    }
}

impl From<Deck> for Vec<Slide> {
    fn from(deck: Deck) -> Self {
        deck.slides
    }
}

impl Deck {
    /// Builds a deck, falling back to one default slide when `slides` is empty.
    ///
    /// Slides sharing an id (copied entries in a cached deck) get fresh ids.
    pub fn new(mut slides: Vec<Slide>) -> Self {
        if slides.is_empty() {
            log::debug!("Empty slide list, synthesizing a default deck");
            return Deck::default();
        }
        let mut seen = HashSet::new();
        for slide in &mut slides {
            if !seen.insert(slide.id.clone()) {
                log::warn!("Duplicate slide id {}, assigning a new one", slide.id);
                slide.id = ElementId::generate();
                seen.insert(slide.id.clone());
            }
        }
        Deck { slides }
    }

    /// A one-slide deck styled by `template`.
    pub fn with_template(template: Option<&TemplateDescriptor>) -> Self {
        Deck {
            slides: vec![Slide::with_template(template)],
        }
    }

    pub fn slides(&self) -> &[Slide] {
        &self.slides
    }

    pub fn len(&self) -> usize {
        self.slides.len()
    }

    /// Always false; kept for API symmetry with `len`.
    pub fn is_empty(&self) -> bool {
        self.slides.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Slide> {
        self.slides.get(index)
    }

    pub fn get_mut(&mut self, index: usize) -> Option<&mut Slide> {
        self.slides.get_mut(index)
    }

    pub fn slide(&self, index: usize) -> Result<&Slide> {
        self.slides
            .get(index)
            .ok_or_else(|| EditorError::NotFound(format!("slide {}", index)))
    }

    pub fn slide_mut(&mut self, index: usize) -> Result<&mut Slide> {
        self.slides
            .get_mut(index)
            .ok_or_else(|| EditorError::NotFound(format!("slide {}", index)))
    }

    /// Current position of the slide with `id`.
    pub fn position(&self, id: &ElementId) -> Option<usize> {
        self.slides.iter().position(|s| &s.id == id)
    }

    /// Inserts `slide` at `index` (clamped to the end) and returns where it landed.
    pub fn insert(&mut self, index: usize, slide: Slide) -> usize {
        let index = index.min(self.slides.len());
        self.slides.insert(index, slide);
        index
    }

    /// Removes a slide, refusing to remove the last remaining one.
    pub fn remove(&mut self, index: usize) -> Result<Slide> {
        if index >= self.slides.len() {
            return Err(EditorError::NotFound(format!("slide {}", index)));
        }
        if self.slides.len() == 1 {
            return Err(EditorError::LastSlide);
        }
        Ok(self.slides.remove(index))
    }

    /// Runs the legacy-image migration on every slide. Returns how many slides changed.
    pub fn migrate_legacy_images(&mut self) -> usize {
        self.slides
            .iter_mut()
            .map(|s| s.migrate_legacy_image())
            .filter(|changed| *changed)
            .count()
    }

    /// A copy with the legacy-image migration applied, ready to send to the backend.
    pub fn prepared_for_save(&self) -> Deck {
        let mut deck = self.clone();
        deck.migrate_legacy_images();
        deck
    }
}
