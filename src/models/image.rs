use serde::{Deserialize, Serialize};

use crate::models::common::{BoundingBox, ElementId};

/// The conceptual z-layer shared by all text boxes. No image may sit exactly on it.
pub const TEXT_Z_INDEX: i32 = 100;

/// Default stacking order of a freshly uploaded image: just above the text layer.
pub const DEFAULT_IMAGE_Z_INDEX: i32 = TEXT_Z_INDEX + 1;

pub const DEFAULT_IMAGE_WIDTH: f64 = 200.0;
pub const DEFAULT_IMAGE_HEIGHT: f64 = 150.0;

fn default_z_index() -> i32 {
    DEFAULT_IMAGE_Z_INDEX
}

/// A positioned, resizable raster element on a slide.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Image {
    #[serde(default)]
    pub id: ElementId,
    /// Opaque source reference: a data URI or a remote URL.
    pub src: String,
    #[serde(default)]
    pub x: f64,
    #[serde(default)]
    pub y: f64,
    #[serde(default = "default_width")]
    pub width: f64,
    #[serde(default = "default_height")]
    pub height: f64,
    #[serde(default = "default_z_index")]
    pub z_index: i32,
    /// Set on entries migrated out of the legacy single-image field.
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub from_legacy: bool,
}

fn default_width() -> f64 {
    DEFAULT_IMAGE_WIDTH
}

fn default_height() -> f64 {
    DEFAULT_IMAGE_HEIGHT
}

impl Image {
    pub fn new(src: impl Into<String>, bounds: BoundingBox) -> Self {
        Image {
            id: ElementId::generate(),
            src: src.into(),
            x: bounds.x,
            y: bounds.y,
            width: bounds.width,
            height: bounds.height,
            z_index: DEFAULT_IMAGE_Z_INDEX,
            from_legacy: false,
        }
    }

    pub fn bounds(&self) -> BoundingBox {
        BoundingBox::new(self.x, self.y, self.width, self.height)
    }

    pub fn is_above_text(&self) -> bool {
        self.z_index > TEXT_Z_INDEX
    }
}

/// Stacking commands for a single image.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ZOrderCommand {
    ToFront,
    ToBack,
    Forward,
    Backward,
}

/// Computes the new z-index of an image.
///
/// `all` holds the z-indexes of every image on the slide, the moved one included.
/// The result is never `TEXT_Z_INDEX`: stepping across the text layer jumps over it.
pub fn next_z_index(command: ZOrderCommand, current: i32, all: &[i32]) -> i32 {
    match command {
        ZOrderCommand::ToFront => {
            let max = all.iter().copied().max().unwrap_or(current);
            max.max(TEXT_Z_INDEX).saturating_add(1)
        }
        ZOrderCommand::ToBack => {
            let min = all.iter().copied().min().unwrap_or(current);
            min.min(TEXT_Z_INDEX).saturating_sub(1).max(0)
        }
        ZOrderCommand::Forward => {
            if current < TEXT_Z_INDEX {
                TEXT_Z_INDEX + 1
            } else {
                current.saturating_add(1)
            }
        }
        ZOrderCommand::Backward => {
            if current > TEXT_Z_INDEX {
                let next = current - 1;
                if next == TEXT_Z_INDEX {
                    TEXT_Z_INDEX - 1
                } else {
                    next
                }
            } else {
                current.saturating_sub(1).max(0)
            }
        }
    }
}
