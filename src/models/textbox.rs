// src/models/textbox.rs

use serde::{Deserialize, Serialize};
use std::ops::Range;

use crate::models::common::{BoundingBox, ElementId};
use crate::models::template::ElementStyle;

pub const DEFAULT_FONT_FAMILY: &str = "Arial";
pub const DEFAULT_TEXT_COLOR: &str = "#000000";
pub const DEFAULT_TITLE_TEXT: &str = "Click to add title";
pub const DEFAULT_BODY_TEXT: &str = "Click to add content";
pub const DEFAULT_TITLE_FONT_SIZE: f64 = 40.0;
pub const DEFAULT_BODY_FONT_SIZE: f64 = 24.0;

/// Semantic role of a text box.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TextKind {
    Title,
    Body,
}

impl TextKind {
    /// Default geometry for a box of this kind when it is the `existing`-th box on the slide.
    pub fn default_bounds(self, existing: usize) -> BoundingBox {
        let offset = 40.0 * existing as f64;
        match self {
            TextKind::Title => BoundingBox::new(80.0, 60.0 + offset, 800.0, 100.0),
            TextKind::Body => BoundingBox::new(80.0, 180.0 + offset, 800.0, 300.0),
        }
    }

    pub fn default_text(self) -> &'static str {
        match self {
            TextKind::Title => DEFAULT_TITLE_TEXT,
            TextKind::Body => DEFAULT_BODY_TEXT,
        }
    }
}

/// Horizontal alignment of the text inside its box.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Alignment {
    #[default]
    Left,
    Center,
    Right,
    Justify,
}

impl Alignment {
    pub fn as_css(self) -> &'static str {
        match self {
            Alignment::Left => "left",
            Alignment::Center => "center",
            Alignment::Right => "right",
            Alignment::Justify => "justify",
        }
    }
}

/// The three toggleable font style flags.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StyleFlag {
    Bold,
    Italic,
    Underline,
}

/// Paragraph spacing picked from the fixed ladder `{0, 4, ..., 32}`.
///
/// Each step maps to a line-height multiplier in `{1.0, 1.5, ..., 5.0}`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct ParagraphSpacing(u8);

impl ParagraphSpacing {
    pub const LADDER: [u8; 9] = [0, 4, 8, 12, 16, 20, 24, 28, 32];

    pub fn new(value: u8) -> Option<Self> {
        Self::LADDER.contains(&value).then_some(ParagraphSpacing(value))
    }

    pub fn value(self) -> u8 {
        self.0
    }

    pub fn line_height(self) -> f64 {
        1.0 + f64::from(self.0) / 8.0
    }
}

impl TryFrom<u8> for ParagraphSpacing {
    type Error = String;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        ParagraphSpacing::new(value)
            .ok_or_else(|| format!("paragraph spacing {} is not on the ladder", value))
    }
}

impl From<ParagraphSpacing> for u8 {
    fn from(spacing: ParagraphSpacing) -> Self {
        spacing.0
    }
}

/// Inline formatting applied to a character range of a text box.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InlineSpan {
    /// Start char offset (inclusive).
    pub start: usize,
    /// End char offset (exclusive).
    pub end: usize,
    #[serde(default)]
    pub bold: bool,
    #[serde(default)]
    pub italic: bool,
    #[serde(default)]
    pub underline: bool,
}

impl InlineSpan {
    pub fn range(&self) -> Range<usize> {
        self.start..self.end
    }

    pub fn flag(&self, flag: StyleFlag) -> bool {
        match flag {
            StyleFlag::Bold => self.bold,
            StyleFlag::Italic => self.italic,
            StyleFlag::Underline => self.underline,
        }
    }

    pub fn set_flag(&mut self, flag: StyleFlag, on: bool) {
        match flag {
            StyleFlag::Bold => self.bold = on,
            StyleFlag::Italic => self.italic = on,
            StyleFlag::Underline => self.underline = on,
        }
    }

    pub fn is_plain(&self) -> bool {
        !(self.bold || self.italic || self.underline)
    }
}

fn default_line_height() -> f64 {
    1.0
}

/// A positioned, styled, editable text region.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TextBox {
    #[serde(default)]
    pub id: ElementId,
    #[serde(rename = "type")]
    pub kind: TextKind,
    #[serde(default)]
    pub text: String,
    /// Inline formatting over char ranges of `text`. Never overlaps the box-level flags.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub spans: Vec<InlineSpan>,
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
    #[serde(default = "default_font_family")]
    pub font_family: String,
    pub font_size: f64,
    #[serde(default = "default_text_color")]
    pub fill_color: String,
    #[serde(default)]
    pub bold: bool,
    #[serde(default)]
    pub italic: bool,
    #[serde(default)]
    pub underline: bool,
    #[serde(default)]
    pub align: Alignment,
    #[serde(default = "default_line_height")]
    pub line_height: f64,
    #[serde(default)]
    pub paragraph_spacing: ParagraphSpacing,
    #[serde(default)]
    pub bullets: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub highlight: Option<String>,
}

fn default_font_family() -> String {
    DEFAULT_FONT_FAMILY.to_string()
}

fn default_text_color() -> String {
    DEFAULT_TEXT_COLOR.to_string()
}

impl TextBox {
    /// Creates a box of `kind` with kind-specific defaults, styled by the template when given.
    pub fn new(kind: TextKind, existing: usize, style: Option<&ElementStyle>) -> Self {
        let bounds = kind.default_bounds(existing);
        let (font_size, bold, align) = match kind {
            TextKind::Title => (DEFAULT_TITLE_FONT_SIZE, true, Alignment::Center),
            TextKind::Body => (DEFAULT_BODY_FONT_SIZE, false, Alignment::Left),
        };
        let mut tb = TextBox {
            id: ElementId::generate(),
            kind,
            text: kind.default_text().to_string(),
            spans: Vec::new(),
            x: bounds.x,
            y: bounds.y,
            width: bounds.width,
            height: bounds.height,
            font_family: default_font_family(),
            font_size,
            fill_color: default_text_color(),
            bold,
            italic: false,
            underline: false,
            align,
            line_height: default_line_height(),
            paragraph_spacing: ParagraphSpacing::default(),
            bullets: false,
            highlight: None,
        };
        if let Some(style) = style {
            tb.apply_style(style);
        }
        tb
    }

    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text = text.into();
        self
    }

    /// Overlays the set fields of a template style.
    pub fn apply_style(&mut self, style: &ElementStyle) {
        if let Some(family) = &style.font_family {
            self.font_family = family.clone();
        }
        if let Some(size) = style.font_size {
            self.font_size = size;
        }
        if let Some(color) = &style.color {
            self.fill_color = color.clone();
        }
        if let Some(bold) = style.bold {
            self.bold = bold;
        }
        if let Some(italic) = style.italic {
            self.italic = italic;
        }
        if let Some(align) = style.align {
            self.align = align;
        }
    }

    pub fn bounds(&self) -> BoundingBox {
        BoundingBox::new(self.x, self.y, self.width, self.height)
    }

    pub fn char_len(&self) -> usize {
        self.text.chars().count()
    }

    pub fn flag(&self, flag: StyleFlag) -> bool {
        match flag {
            StyleFlag::Bold => self.bold,
            StyleFlag::Italic => self.italic,
            StyleFlag::Underline => self.underline,
        }
    }

    pub fn toggle_flag(&mut self, flag: StyleFlag) {
        let on = !self.flag(flag);
        match flag {
            StyleFlag::Bold => self.bold = on,
            StyleFlag::Italic => self.italic = on,
            StyleFlag::Underline => self.underline = on,
        }
    }

    /// Toggles `flag` on the inline span covering exactly `range`, creating it if needed.
    pub fn toggle_span(&mut self, range: Range<usize>, flag: StyleFlag) {
        if let Some(pos) = self
            .spans
            .iter()
            .position(|s| s.start == range.start && s.end == range.end)
        {
            let span = &mut self.spans[pos];
            let on = !span.flag(flag);
            span.set_flag(flag, on);
            if span.is_plain() {
                self.spans.remove(pos);
            }
            return;
        }
        let mut span = InlineSpan {
            start: range.start,
            end: range.end,
            ..Default::default()
        };
        span.set_flag(flag, true);
        self.spans.push(span);
        self.spans.sort_by_key(|s| (s.start, s.end));
    }

    /// Replaces the text, clamping inline spans to the new length.
    pub fn set_text(&mut self, text: impl Into<String>) {
        self.text = text.into();
        let len = self.char_len();
        for span in &mut self.spans {
            span.end = span.end.min(len);
            span.start = span.start.min(span.end);
        }
        self.spans.retain(|s| s.start < s.end);
    }

    pub fn set_paragraph_spacing(&mut self, spacing: ParagraphSpacing) {
        self.paragraph_spacing = spacing;
        self.line_height = spacing.line_height();
    }
}
