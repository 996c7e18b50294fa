//! Template Layout Resolver.
//!
//! Maps a template id and slide index to a [`LayoutRegime`]. The resolver is pure
//! and read-only: stored text-box coordinates are always absolute slide
//! coordinates, and the region offsets below are applied only when rendering or
//! when translating a drop position back into slide space.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::models::{
    common::{BoundingBox, ElementId, Point},
    slide::Slide,
    template::{ElementStyle, StyleTarget, TemplateDescriptor, TemplateStyles},
    textbox::{TextBox, TextKind},
};

/// The built-in template with the gradient-title / content-box layouts.
pub const MODERN_GRADIENT_TEMPLATE: &str = "modern-gradient";

fn default_padding() -> f64 {
    32.0
}

fn default_gap() -> f64 {
    16.0
}

fn default_image_slot_width() -> f64 {
    320.0
}

/// Geometry (and default styling) of a template that constrains its layout.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TemplateLayout {
    /// Region the first slide's text boxes are confined to.
    pub title_region: BoundingBox,
    /// Rounded panel the text boxes of every later slide are stacked in.
    pub content_panel: BoundingBox,
    #[serde(default = "default_padding")]
    pub panel_padding: f64,
    #[serde(default = "default_gap")]
    pub stack_gap: f64,
    /// Width reserved at the right of the panel for the image placeholder.
    #[serde(default = "default_image_slot_width")]
    pub image_slot_width: f64,
    #[serde(default)]
    pub styles: TemplateStyles,
}

impl TemplateLayout {
    fn modern_gradient() -> Self {
        let mut styles = TemplateStyles::default();
        styles.insert(
            StyleTarget::Title,
            ElementStyle {
                font_family: Some("Montserrat".to_string()),
                font_size: Some(48.0),
                color: Some("#ffffff".to_string()),
                bold: Some(true),
                ..Default::default()
            },
        );
        styles.insert(
            StyleTarget::Body,
            ElementStyle {
                font_family: Some("Open Sans".to_string()),
                font_size: Some(22.0),
                color: Some("#2d2d44".to_string()),
                ..Default::default()
            },
        );
        styles.insert(
            StyleTarget::Background,
            ElementStyle {
                fill: Some("#667eea".to_string()),
                gradient: Some("linear-gradient(135deg, #667eea 0%, #764ba2 100%)".to_string()),
                ..Default::default()
            },
        );
        styles.insert(
            StyleTarget::Placeholder,
            ElementStyle {
                fill: Some("rgba(255,255,255,0.15)".to_string()),
                color: Some("#9e9eb8".to_string()),
                ..Default::default()
            },
        );
        TemplateLayout {
            title_region: BoundingBox::new(80.0, 140.0, 800.0, 260.0),
            content_panel: BoundingBox::new(40.0, 40.0, 880.0, 460.0),
            panel_padding: default_padding(),
            stack_gap: default_gap(),
            image_slot_width: default_image_slot_width(),
            styles,
        }
    }
}

/// How text boxes of one slide are positioned.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "regime", rename_all = "kebab-case")]
pub enum LayoutRegime {
    /// Boxes render exactly at their stored coordinates.
    Absolute,
    /// First slide of a constrained template: boxes live inside `region`.
    GradientTitle { region: BoundingBox },
    /// Later slides of a constrained template: boxes stack inside a padded panel.
    #[serde(rename_all = "camelCase")]
    ContentBox {
        panel: BoundingBox,
        padding: f64,
        gap: f64,
        image_slot: BoundingBox,
        show_image_placeholder: bool,
    },
}

impl LayoutRegime {
    /// Slide-space origin of the container boxes are rendered into.
    pub fn offset(&self) -> Point {
        match self {
            LayoutRegime::Absolute => Point::default(),
            LayoutRegime::GradientTitle { region } => region.origin(),
            LayoutRegime::ContentBox { panel, .. } => panel.origin(),
        }
    }

    /// Slide coordinates → container coordinates.
    pub fn to_render(&self, p: Point) -> Point {
        let o = self.offset();
        Point::new(p.x - o.x, p.y - o.y)
    }

    /// Container coordinates (e.g. a drop position) → absolute slide coordinates.
    pub fn to_slide(&self, p: Point) -> Point {
        let o = self.offset();
        Point::new(p.x + o.x, p.y + o.y)
    }

    pub fn show_image_placeholder(&self) -> bool {
        matches!(
            self,
            LayoutRegime::ContentBox {
                show_image_placeholder: true,
                ..
            }
        )
    }

    /// Render frames of the slide's text boxes in container coordinates.
    pub fn text_frames(&self, slide: &Slide) -> Vec<(ElementId, BoundingBox)> {
        match self {
            LayoutRegime::Absolute => slide
                .textboxes
                .iter()
                .map(|tb| (tb.id.clone(), tb.bounds()))
                .collect(),
            LayoutRegime::GradientTitle { region } => slide
                .textboxes
                .iter()
                .map(|tb| (tb.id.clone(), frame_in_region(tb, *region)))
                .collect(),
            LayoutRegime::ContentBox {
                panel,
                padding,
                gap,
                image_slot,
                ..
            } => {
                let column_width = (image_slot.x - panel.x - padding - gap).max(0.0);
                let mut y = *padding;
                let bottom = panel.height - padding;
                slide
                    .textboxes
                    .iter()
                    .map(|tb| {
                        let height = tb.height.min((bottom - y).max(0.0));
                        let frame = BoundingBox::new(*padding, y, column_width, height);
                        y += height + gap;
                        (tb.id.clone(), frame)
                    })
                    .collect()
            }
        }
    }
}

/// Region-relative frame; boxes still at their default spot are centered horizontally.
fn frame_in_region(tb: &TextBox, region: BoundingBox) -> BoundingBox {
    let width = tb.width.min(region.width);
    let height = tb.height.min(region.height);
    let default = tb.kind.default_bounds(0);
    let rel = if tb.x == default.x && tb.y == default.y {
        let y = match tb.kind {
            TextKind::Title => 0.0,
            TextKind::Body => region.height - height,
        };
        Point::new((region.width - width) / 2.0, y)
    } else {
        Point::new(tb.x - region.x, tb.y - region.y)
    };
    BoundingBox::new(
        rel.x.clamp(0.0, region.width - width),
        rel.y.clamp(0.0, region.height - height),
        width,
        height,
    )
}

/// Resolves layout regimes and default styles for templates.
#[derive(Debug, Clone, PartialEq)]
pub struct LayoutResolver {
    layouts: IndexMap<String, TemplateLayout>,
}

impl Default for LayoutResolver {
    fn default() -> Self {
        let mut layouts = IndexMap::new();
        layouts.insert(
            MODERN_GRADIENT_TEMPLATE.to_string(),
            TemplateLayout::modern_gradient(),
        );
        LayoutResolver { layouts }
    }
}

impl LayoutResolver {
    /// The built-in table with `extra` entries added or replacing built-ins.
    pub fn with_layouts(extra: &IndexMap<String, TemplateLayout>) -> Self {
        let mut resolver = LayoutResolver::default();
        for (id, layout) in extra {
            resolver.layouts.insert(id.clone(), layout.clone());
        }
        resolver
    }

    pub fn layout(&self, template_id: &str) -> Option<&TemplateLayout> {
        self.layouts.get(template_id)
    }

    /// The regime for `slide` at `slide_index` under `template_id`.
    pub fn resolve(&self, template_id: Option<&str>, slide_index: usize, slide: &Slide) -> LayoutRegime {
        let Some(layout) = template_id.and_then(|id| self.layouts.get(id)) else {
            return LayoutRegime::Absolute;
        };
        if slide_index == 0 {
            return LayoutRegime::GradientTitle {
                region: layout.title_region,
            };
        }
        let panel = layout.content_panel;
        let inner_right = panel.x + panel.width - layout.panel_padding;
        let slot_width = layout
            .image_slot_width
            .min(panel.width - 2.0 * layout.panel_padding)
            .max(0.0);
        LayoutRegime::ContentBox {
            panel,
            padding: layout.panel_padding,
            gap: layout.stack_gap,
            image_slot: BoundingBox::new(
                inner_right - slot_width,
                panel.y + layout.panel_padding,
                slot_width,
                panel.height - 2.0 * layout.panel_padding,
            ),
            show_image_placeholder: !slide.has_any_image(),
        }
    }

    /// Default style for `target`: built-in layout styles overlaid by the catalog entry's own.
    pub fn default_style(&self, template: &TemplateDescriptor, target: StyleTarget) -> Option<ElementStyle> {
        let base = self
            .layouts
            .get(&template.id)
            .and_then(|l| l.styles.get(target))
            .cloned();
        match (base, template.style(target)) {
            (Some(base), Some(own)) => Some(merge_styles(&base, own)),
            (Some(base), None) => Some(base),
            (None, own) => own.cloned(),
        }
    }

    /// A copy of `template` whose styles include the built-in defaults for every target.
    pub fn styled_template(&self, template: &TemplateDescriptor) -> TemplateDescriptor {
        let mut styled = template.clone();
        for target in StyleTarget::ALL {
            if let Some(style) = self.default_style(template, target) {
                styled.styles.insert(target, style);
            }
        }
        styled
    }
}

/// Fields set in `over` win over `base`.
fn merge_styles(base: &ElementStyle, over: &ElementStyle) -> ElementStyle {
    ElementStyle {
        font_family: over.font_family.clone().or_else(|| base.font_family.clone()),
        font_size: over.font_size.or(base.font_size),
        color: over.color.clone().or_else(|| base.color.clone()),
        fill: over.fill.clone().or_else(|| base.fill.clone()),
        gradient: over.gradient.clone().or_else(|| base.gradient.clone()),
        bold: over.bold.or(base.bold),
        italic: over.italic.or(base.italic),
        align: over.align.or(base.align),
    }
}

/// Resolves with the built-in layout table.
pub fn resolve_layout(template_id: Option<&str>, slide_index: usize, slide: &Slide) -> LayoutRegime {
    LayoutResolver::default().resolve(template_id, slide_index, slide)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::image::Image;

    #[test]
    fn unknown_or_missing_template_is_absolute() {
        let slide = Slide::default();
        assert_eq!(resolve_layout(None, 0, &slide), LayoutRegime::Absolute);
        assert_eq!(resolve_layout(Some("plain"), 3, &slide), LayoutRegime::Absolute);
    }

    #[test]
    fn first_slide_gets_gradient_title_then_content_box() {
        let slide = Slide::default();
        assert!(matches!(
            resolve_layout(Some(MODERN_GRADIENT_TEMPLATE), 0, &slide),
            LayoutRegime::GradientTitle { .. }
        ));
        let regime = resolve_layout(Some(MODERN_GRADIENT_TEMPLATE), 1, &slide);
        match regime {
            LayoutRegime::ContentBox { panel, image_slot, .. } => {
                assert_eq!(panel, BoundingBox::new(40.0, 40.0, 880.0, 460.0));
                assert_eq!(image_slot, BoundingBox::new(568.0, 72.0, 320.0, 396.0));
            }
            other => panic!("unexpected regime {:?}", other),
        }
    }

    #[test]
    fn placeholder_tracks_either_image_representation() {
        let mut slide = Slide::default();
        assert!(resolve_layout(Some(MODERN_GRADIENT_TEMPLATE), 2, &slide).show_image_placeholder());

        slide.image = Some(Image::new("http://x/y.png", BoundingBox::new(0.0, 0.0, 1.0, 1.0)));
        assert!(!resolve_layout(Some(MODERN_GRADIENT_TEMPLATE), 2, &slide).show_image_placeholder());

        slide.image = None;
        slide.images.push(Image::new("http://x/z.png", BoundingBox::new(0.0, 0.0, 1.0, 1.0)));
        assert!(!resolve_layout(Some(MODERN_GRADIENT_TEMPLATE), 2, &slide).show_image_placeholder());
    }

    #[test]
    fn render_and_drop_translation_are_inverse() {
        let slide = Slide::default();
        let regime = resolve_layout(Some(MODERN_GRADIENT_TEMPLATE), 0, &slide);
        let abs = Point::new(300.0, 200.0);
        let rel = regime.to_render(abs);
        assert_eq!(rel, Point::new(220.0, 60.0));
        assert_eq!(regime.to_slide(rel), abs);
    }

    #[test]
    fn gradient_title_centers_default_boxes_and_clamps_moved_ones() {
        let mut slide = Slide::default();
        let region = BoundingBox::new(80.0, 140.0, 800.0, 260.0);
        let regime = LayoutRegime::GradientTitle { region };

        let frames = regime.text_frames(&slide);
        assert_eq!(frames[0].1, BoundingBox::new(0.0, 0.0, 800.0, 100.0));
        assert_eq!(frames[1].1, BoundingBox::new(0.0, 0.0, 800.0, 260.0));

        slide.textboxes[0].x = 10.0;
        slide.textboxes[0].y = 500.0;
        slide.textboxes[0].width = 300.0;
        let frames = regime.text_frames(&slide);
        assert_eq!(frames[0].1, BoundingBox::new(0.0, 160.0, 300.0, 100.0));
    }

    #[test]
    fn content_box_stacks_boxes_vertically() {
        let slide = Slide::default();
        let regime = resolve_layout(Some(MODERN_GRADIENT_TEMPLATE), 1, &slide);
        let frames = regime.text_frames(&slide);
        assert_eq!(frames[0].1, BoundingBox::new(32.0, 32.0, 480.0, 100.0));
        assert_eq!(frames[1].1.y, 148.0);
        assert_eq!(frames[1].1.height, 280.0);
    }

    #[test]
    fn catalog_styles_override_builtin_defaults() {
        let resolver = LayoutResolver::default();
        let mut template = TemplateDescriptor::new(MODERN_GRADIENT_TEMPLATE);
        template.styles.insert(
            StyleTarget::Title,
            ElementStyle {
                color: Some("#ff0000".to_string()),
                ..Default::default()
            },
        );
        let title = resolver.default_style(&template, StyleTarget::Title).unwrap();
        assert_eq!(title.color.as_deref(), Some("#ff0000"));
        assert_eq!(title.font_family.as_deref(), Some("Montserrat"));

        let styled = resolver.styled_template(&template);
        assert!(styled.style(StyleTarget::Background).is_some());
        assert!(resolver
            .default_style(&TemplateDescriptor::new("plain"), StyleTarget::Title)
            .is_none());
    }
}
