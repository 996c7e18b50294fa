//! Editor configuration: backend endpoints, identity and extra template layouts.

use std::env;

use indexmap::IndexMap;
use log::debug;
use serde::{Deserialize, Serialize};

use crate::errors::{EditorError, Result};
use crate::layout::{LayoutResolver, TemplateLayout};

pub const DEFAULT_API_BASE_URL: &str = "http://localhost:8000";
pub const DEFAULT_SAVE_PATH: &str = "/api/presentations/save";
pub const DEFAULT_EXPORT_PATH: &str = "/api/presentations/export";
pub const DEFAULT_PRESENTATION_TYPE: &str = "slides";
pub const DEFAULT_CACHE_KEY: &str = "smartslide.editor.deck";

pub const ENV_API_URL: &str = "SMARTSLIDE_API_URL";
pub const ENV_USER_ID: &str = "SMARTSLIDE_USER_ID";
pub const ENV_PRESENTATION_TYPE: &str = "SMARTSLIDE_PRESENTATION_TYPE";

fn default_api_base_url() -> String {
    DEFAULT_API_BASE_URL.to_string()
}

fn default_save_path() -> String {
    DEFAULT_SAVE_PATH.to_string()
}

fn default_export_path() -> String {
    DEFAULT_EXPORT_PATH.to_string()
}

fn default_presentation_type() -> String {
    DEFAULT_PRESENTATION_TYPE.to_string()
}

fn default_cache_key() -> String {
    DEFAULT_CACHE_KEY.to_string()
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EditorConfig {
    #[serde(default = "default_api_base_url")]
    pub api_base_url: String,
    #[serde(default = "default_save_path")]
    pub save_path: String,
    #[serde(default = "default_export_path")]
    pub export_path: String,
    #[serde(default)]
    pub user_id: String,
    #[serde(default = "default_presentation_type")]
    pub presentation_type: String,
    #[serde(default = "default_cache_key")]
    pub cache_key: String,
    /// Extra template id -> layout entries, merged over the built-in table.
    #[serde(default)]
    pub template_layouts: IndexMap<String, TemplateLayout>,
}

impl Default for EditorConfig {
    fn default() -> Self {
        EditorConfig {
            api_base_url: default_api_base_url(),
            save_path: default_save_path(),
            export_path: default_export_path(),
            user_id: String::new(),
            presentation_type: default_presentation_type(),
            cache_key: default_cache_key(),
            template_layouts: IndexMap::new(),
        }
    }
}

impl EditorConfig {
    /// Defaults overlaid with `SMARTSLIDE_*` environment variables.
    ///
    /// Call `dotenvy::dotenv().ok()` first if values live in a `.env` file.
    pub fn from_env() -> Result<Self> {
        let mut config = EditorConfig::default();
        if let Some(url) = read_env(ENV_API_URL)? {
            config.api_base_url = url;
        }
        if let Some(user) = read_env(ENV_USER_ID)? {
            config.user_id = user;
        }
        if let Some(kind) = read_env(ENV_PRESENTATION_TYPE)? {
            config.presentation_type = kind;
        }
        debug!("Loaded editor config for {}", config.api_base_url);
        Ok(config)
    }

    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn save_url(&self) -> String {
        join_url(&self.api_base_url, &self.save_path)
    }

    pub fn export_url(&self) -> String {
        join_url(&self.api_base_url, &self.export_path)
    }

    /// A resolver over the built-in layouts plus `template_layouts`.
    pub fn layout_resolver(&self) -> LayoutResolver {
        LayoutResolver::with_layouts(&self.template_layouts)
    }
}

/// Unset variables are `None`; set but non-unicode values are an error.
fn read_env(name: &str) -> Result<Option<String>> {
    match env::var(name) {
        Ok(value) if value.trim().is_empty() => Ok(None),
        Ok(value) => Ok(Some(value)),
        Err(env::VarError::NotPresent) => Ok(None),
        Err(e) => Err(EditorError::EnvVar(e)),
    }
}

fn join_url(base: &str, path: &str) -> String {
    format!(
        "{}/{}",
        base.trim_end_matches('/'),
        path.trim_start_matches('/')
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn json_config_fills_defaults() {
        let config = EditorConfig::from_json(r#"{ "apiBaseUrl": "https://api.example.com/", "userId": "u-1" }"#)
            .unwrap();
        assert_eq!(config.user_id, "u-1");
        assert_eq!(config.presentation_type, "slides");
        assert_eq!(config.save_url(), "https://api.example.com/api/presentations/save");
        assert_eq!(config.export_url(), "https://api.example.com/api/presentations/export");
    }

    #[test]
    fn extra_layouts_reach_the_resolver() {
        let config = EditorConfig::from_json(
            r#"{
                "templateLayouts": {
                    "boxed": {
                        "titleRegion": { "x": 0, "y": 0, "width": 960, "height": 200 },
                        "contentPanel": { "x": 20, "y": 20, "width": 920, "height": 500 }
                    }
                }
            }"#,
        )
        .unwrap();
        let resolver = config.layout_resolver();
        let layout = resolver.layout("boxed").unwrap();
        assert_eq!(layout.panel_padding, 32.0);
        assert!(resolver.layout("modern-gradient").is_some());
    }

    #[test]
    fn rejects_malformed_json() {
        assert!(matches!(
            EditorConfig::from_json("{"),
            Err(EditorError::Json(_))
        ));
    }
}
