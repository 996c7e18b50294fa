//! The slide document model: decks, slides, text boxes, images and template descriptors.

pub mod common;
pub mod deck;
pub mod generated;
pub mod image;
pub mod slide;
pub mod template;
pub mod textbox;

pub use common::{BoundingBox, ElementId, Point, SLIDE_HEIGHT, SLIDE_WIDTH};
pub use deck::Deck;
pub use generated::{GeneratedSlide, SlideContent};
pub use image::{Image, ZOrderCommand, DEFAULT_IMAGE_Z_INDEX, TEXT_Z_INDEX};
pub use slide::{Background, Layer, Slide};
pub use template::{ElementStyle, StyleTarget, TemplateDescriptor, TemplateKind, TemplateStyles};
pub use textbox::{Alignment, InlineSpan, ParagraphSpacing, StyleFlag, TextBox, TextKind};
