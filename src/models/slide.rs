// src/models/slide.rs

use serde::{Deserialize, Serialize};

use crate::models::common::ElementId;
use crate::models::image::{Image, TEXT_Z_INDEX};
use crate::models::template::{StyleTarget, TemplateDescriptor};
use crate::models::textbox::{TextBox, TextKind};

pub const DEFAULT_BACKGROUND_FILL: &str = "#ffffff";

fn default_fill() -> String {
    DEFAULT_BACKGROUND_FILL.to_string()
}

/// Slide background: a flat fill, optionally overridden by a template composite.
///
/// Only `fill` is editable; the composite is picked by template identifier.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Background {
    #[serde(default = "default_fill")]
    pub fill: String,
    /// Template id whose gradient/decoration composite is drawn instead of `fill`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub template: Option<String>,
}

impl Default for Background {
    fn default() -> Self {
        Background {
            fill: default_fill(),
            template: None,
        }
    }
}

/// A reference to one paintable element, in paint order.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Layer<'a> {
    Text(&'a TextBox),
    Image(&'a Image),
}

/// One 960×540 canvas.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Slide {
    /// Stable identity; survives insertions and deletions around the slide.
    #[serde(default)]
    pub id: ElementId,
    /// Authoring order (title, then body), not paint order.
    pub textboxes: Vec<TextBox>,
    #[serde(default)]
    pub background: Background,
    #[serde(default)]
    pub images: Vec<Image>,
    /// Legacy single image kept for decks authored before multi-image support.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<Image>,
}

impl Default for Slide {
    fn default() -> Self {
        Slide::with_template(None)
    }
}

impl Slide {
    /// A slide with a default title and body box, styled by `template` when given.
    pub fn with_template(template: Option<&TemplateDescriptor>) -> Self {
        let title_style = template.and_then(|t| t.style(StyleTarget::Title));
        let body_style = template.and_then(|t| t.style(StyleTarget::Body));
        let mut background = Background::default();
        if let Some(style) = template.and_then(|t| t.style(StyleTarget::Background)) {
            if let Some(fill) = &style.fill {
                background.fill = fill.clone();
            }
            if style.gradient.is_some() {
                background.template = template.map(|t| t.id.clone());
            }
        }
        Slide {
            id: ElementId::generate(),
            textboxes: vec![
                TextBox::new(TextKind::Title, 0, title_style),
                TextBox::new(TextKind::Body, 0, body_style),
            ],
            background,
            images: Vec::new(),
            image: None,
        }
    }

    pub fn textbox(&self, id: &ElementId) -> Option<&TextBox> {
        self.textboxes.iter().find(|t| &t.id == id)
    }

    pub fn textbox_mut(&mut self, id: &ElementId) -> Option<&mut TextBox> {
        self.textboxes.iter_mut().find(|t| &t.id == id)
    }

    /// The first box of the given kind, in authoring order.
    pub fn first_of_kind(&self, kind: TextKind) -> Option<&TextBox> {
        self.textboxes.iter().find(|t| t.kind == kind)
    }

    pub fn image(&self, id: &ElementId) -> Option<&Image> {
        self.images.iter().find(|i| &i.id == id)
    }

    pub fn image_mut(&mut self, id: &ElementId) -> Option<&mut Image> {
        self.images.iter_mut().find(|i| &i.id == id)
    }

    /// True when the slide shows a picture in either representation.
    pub fn has_any_image(&self) -> bool {
        !self.images.is_empty() || self.image.is_some()
    }

    /// Moves a populated legacy `image` into `images`.
    ///
    /// When both are populated, `images` is authoritative and the legacy entry is dropped.
    /// Returns true if the slide changed.
    pub fn migrate_legacy_image(&mut self) -> bool {
        let Some(mut legacy) = self.image.take() else {
            return false;
        };
        if self.images.is_empty() {
            legacy.from_legacy = true;
            self.images.push(legacy);
        } else {
            log::warn!(
                "Slide has both legacy and multi-image data; keeping {} images, dropping legacy '{}'",
                self.images.len(),
                legacy.src
            );
        }
        true
    }

    /// Elements in paint order: images below the text layer, text, then images above it.
    ///
    /// Ties between images keep their authoring order.
    pub fn render_order(&self) -> Vec<Layer<'_>> {
        let mut below: Vec<&Image> = self
            .images
            .iter()
            .filter(|i| i.z_index < TEXT_Z_INDEX)
            .collect();
        let mut above: Vec<&Image> = self
            .images
            .iter()
            .filter(|i| i.z_index >= TEXT_Z_INDEX)
            .collect();
        below.sort_by_key(|i| i.z_index);
        above.sort_by_key(|i| i.z_index);

        let mut layers = Vec::with_capacity(self.images.len() + self.textboxes.len());
        layers.extend(below.into_iter().map(Layer::Image));
        layers.extend(self.textboxes.iter().map(Layer::Text));
        layers.extend(above.into_iter().map(Layer::Image));
        layers
    }
}
