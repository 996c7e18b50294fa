//! Conversions between the deck model and the outside world.

pub mod html;
pub mod import;
pub mod markdown;

pub use html::{render_text_html, text_box_style};
pub use import::{import_slides, import_slides_str};
pub use markdown::deck_to_markdown;
