// src/models/template.rs

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;

use crate::models::textbox::Alignment;

/// Where a template comes from in the catalog.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TemplateKind {
    #[default]
    Builtin,
    Custom,
}

/// The closed set of things a template can style.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StyleTarget {
    Title,
    Body,
    Background,
    Accent,
    Placeholder,
}

impl StyleTarget {
    pub const ALL: [StyleTarget; 5] = [
        StyleTarget::Title,
        StyleTarget::Body,
        StyleTarget::Background,
        StyleTarget::Accent,
        StyleTarget::Placeholder,
    ];

    pub fn key(self) -> &'static str {
        match self {
            StyleTarget::Title => "title",
            StyleTarget::Body => "body",
            StyleTarget::Background => "background",
            StyleTarget::Accent => "accent",
            StyleTarget::Placeholder => "placeholder",
        }
    }

    fn from_key(key: &str) -> Option<Self> {
        StyleTarget::ALL.into_iter().find(|t| t.key() == key)
    }
}

/// Visual properties a template may set for one style target. Unset fields inherit.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ElementStyle {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub font_family: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub font_size: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    /// Solid fill behind the element (or the slide, for `Background`).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fill: Option<String>,
    /// CSS gradient used by composite backgrounds.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gradient: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bold: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub italic: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub align: Option<Alignment>,
}

/// Typed lookup table of template styles keyed by [`StyleTarget`].
///
/// Deserializes from the catalog's free-form `styles` object; unknown keys and
/// malformed entries are dropped with a warning.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct TemplateStyles(IndexMap<StyleTarget, ElementStyle>);

impl TemplateStyles {
    pub fn get(&self, target: StyleTarget) -> Option<&ElementStyle> {
        self.0.get(&target)
    }

    pub fn insert(&mut self, target: StyleTarget, style: ElementStyle) {
        self.0.insert(target, style);
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl From<IndexMap<String, JsonValue>> for TemplateStyles {
    fn from(raw: IndexMap<String, JsonValue>) -> Self {
        let mut styles = IndexMap::new();
        for (key, value) in raw {
            let Some(target) = StyleTarget::from_key(&key) else {
                log::warn!("Ignoring unknown template style key '{}'", key);
                continue;
            };
            match serde_json::from_value::<ElementStyle>(value) {
                Ok(style) => {
                    styles.insert(target, style);
                }
                Err(e) => log::warn!("Ignoring malformed template style '{}': {}", key, e),
            }
        }
        TemplateStyles(styles)
    }
}

impl Serialize for TemplateStyles {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        use serde::ser::SerializeMap;
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for (target, style) in &self.0 {
            map.serialize_entry(target.key(), style)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for TemplateStyles {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = Option::<IndexMap<String, JsonValue>>::deserialize(deserializer)?;
        Ok(raw.map(TemplateStyles::from).unwrap_or_default())
    }
}

/// A template catalog entry. Only `id` and `styles` drive editing; the rest is carried through.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TemplateDescriptor {
    pub id: String,
    #[serde(default, alias = "title", skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub preview: Option<String>,
    #[serde(rename = "type", default)]
    pub kind: TemplateKind,
    #[serde(default, skip_serializing_if = "TemplateStyles::is_empty")]
    pub styles: TemplateStyles,
}

impl TemplateDescriptor {
    pub fn new(id: impl Into<String>) -> Self {
        TemplateDescriptor {
            id: id.into(),
            name: None,
            preview: None,
            kind: TemplateKind::Builtin,
            styles: TemplateStyles::default(),
        }
    }

    pub fn style(&self, target: StyleTarget) -> Option<&ElementStyle> {
        self.styles.get(target)
    }
}
