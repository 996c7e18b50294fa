//! Normalizes whatever slide data the outside world hands the editor into a [`Deck`].
//!
//! Never fails: malformed input degrades to a default deck with a logged warning.

use log::{debug, warn};
use serde_json::Value as JsonValue;

use crate::models::{
    common::BoundingBox,
    deck::Deck,
    generated::GeneratedSlide,
    image::{Image, DEFAULT_IMAGE_Z_INDEX},
    slide::Slide,
    template::TemplateDescriptor,
    textbox::TextKind,
};

/// Where a legacy image from the generation service is placed.
pub const IMPORTED_IMAGE_BOUNDS: BoundingBox = BoundingBox {
    x: 560.0,
    y: 160.0,
    width: 320.0,
    height: 240.0,
};

/// The two shapes incoming slide lists come in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputShape {
    /// Already edited slides (`textboxes` present on the first element).
    DocumentModel,
    /// Raw generation-service output (`title` / `content` / `image_url`).
    Generated,
}

/// Decides the shape of a slide list by looking at its first element only.
pub fn detect_shape(items: &[JsonValue]) -> InputShape {
    match items.first().and_then(|first| first.get("textboxes")) {
        Some(JsonValue::Array(_)) => InputShape::DocumentModel,
        _ => InputShape::Generated,
    }
}

/// Converts any JSON value into a deck, synthesizing defaults for malformed input.
pub fn import_slides(value: &JsonValue, template: Option<&TemplateDescriptor>) -> Deck {
    let items = match value {
        JsonValue::Array(items) if !items.is_empty() => items,
        JsonValue::Array(_) => {
            debug!("Incoming slide list is empty, using default deck");
            return Deck::with_template(template);
        }
        other => {
            warn!(
                "Incoming slide data is not a list ({}), using default deck",
                json_kind(other)
            );
            return Deck::with_template(template);
        }
    };

    let slides = match detect_shape(items) {
        InputShape::DocumentModel => items
            .iter()
            .enumerate()
            .filter_map(|(i, item)| match serde_json::from_value::<Slide>(item.clone()) {
                Ok(slide) => Some(slide),
                Err(e) => {
                    warn!("Skipping malformed slide {}: {}", i + 1, e);
                    None
                }
            })
            .collect::<Vec<_>>(),
        InputShape::Generated => items
            .iter()
            .enumerate()
            .filter_map(
                |(i, item)| match serde_json::from_value::<GeneratedSlide>(item.clone()) {
                    Ok(generated) => Some(slide_from_generated(&generated, template)),
                    Err(e) => {
                        warn!("Skipping malformed generated slide {}: {}", i + 1, e);
                        None
                    }
                },
            )
            .collect::<Vec<_>>(),
    };

    if slides.is_empty() {
        warn!("No usable slides in incoming data, using default deck");
        return Deck::with_template(template);
    }

    let mut deck = Deck::new(slides);
    let migrated = deck.migrate_legacy_images();
    if migrated > 0 {
        debug!("Migrated legacy image data on {} slide(s)", migrated);
    }
    deck
}

/// Parses a JSON string and imports it; unparsable text yields a default deck.
pub fn import_slides_str(json: &str, template: Option<&TemplateDescriptor>) -> Deck {
    match serde_json::from_str::<JsonValue>(json) {
        Ok(value) => import_slides(&value, template),
        Err(e) => {
            warn!("Incoming slide data is not valid JSON ({}), using default deck", e);
            Deck::with_template(template)
        }
    }
}

/// Builds a slide with one title box, one body box and the optional legacy image.
pub fn slide_from_generated(
    generated: &GeneratedSlide,
    template: Option<&TemplateDescriptor>,
) -> Slide {
    let mut slide = Slide::with_template(template);
    for tb in &mut slide.textboxes {
        match tb.kind {
            TextKind::Title => tb.set_text(generated.title.clone()),
            TextKind::Body => tb.set_text(generated.content.joined()),
        }
    }
    if let Some(url) = generated.image_url.as_deref().filter(|u| !u.is_empty()) {
        let mut image = Image::new(url, IMPORTED_IMAGE_BOUNDS);
        image.z_index = DEFAULT_IMAGE_Z_INDEX;
        slide.image = Some(image);
    }
    slide
}

fn json_kind(value: &JsonValue) -> &'static str {
    match value {
        JsonValue::Null => "null",
        JsonValue::Bool(_) => "boolean",
        JsonValue::Number(_) => "number",
        JsonValue::String(_) => "string",
        JsonValue::Array(_) => "array",
        JsonValue::Object(_) => "object",
    }
}
