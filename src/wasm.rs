//! `wasm-bindgen` surface for the browser view layer. Everything crosses the
//! boundary as JSON strings.

use log::{debug, warn};
use serde_json::Value as JsonValue;
use wasm_bindgen::prelude::*;

use crate::cache::{DeckCache, NavigationState};
use crate::config::EditorConfig;
use crate::converters::{deck_to_markdown, render_text_html, text_box_style};
use crate::editor::{Command, UploadBatch};
use crate::errors::{EditorError, Result};
use crate::logging::init_logging;
use crate::models::{common::ElementId, template::TemplateDescriptor, textbox::TextBox};
use crate::session::EditorSession;

fn to_js(err: EditorError) -> JsValue {
    JsValue::from_str(&err.to_string())
}

#[wasm_bindgen(js_name = initEditor)]
pub fn init_editor() {
    init_logging();
}

#[cfg(target_arch = "wasm32")]
mod local_storage {
    use wasm_bindgen::prelude::*;

    use crate::cache::DeckCache;
    use crate::errors::{EditorError, Result};

    #[wasm_bindgen]
    extern "C" {
        #[wasm_bindgen(js_namespace = localStorage, js_name = getItem)]
        fn get_item(key: &str) -> Option<String>;
        #[wasm_bindgen(catch, js_namespace = localStorage, js_name = setItem)]
        fn set_item(key: &str, value: &str) -> std::result::Result<(), JsValue>;
        #[wasm_bindgen(js_namespace = localStorage, js_name = removeItem)]
        fn remove_item(key: &str);
    }

    /// `window.localStorage` entry holding the mirrored deck.
    pub struct LocalStorageCache {
        key: String,
    }

    impl LocalStorageCache {
        pub fn new(key: impl Into<String>) -> Self {
            LocalStorageCache { key: key.into() }
        }
    }

    impl DeckCache for LocalStorageCache {
        fn load(&self) -> Option<String> {
            get_item(&self.key)
        }

        fn store(&mut self, deck_json: &str) -> Result<()> {
            set_item(&self.key, deck_json).map_err(|e| {
                EditorError::Storage(e.as_string().unwrap_or_else(|| format!("{:?}", e)))
            })
        }

        fn clear(&mut self) {
            remove_item(&self.key);
        }
    }
}

/// The deck mirror for `key`: local storage in the browser, process memory elsewhere.
pub fn browser_cache(key: &str) -> Box<dyn DeckCache> {
    #[cfg(target_arch = "wasm32")]
    {
        Box::new(local_storage::LocalStorageCache::new(key))
    }
    #[cfg(not(target_arch = "wasm32"))]
    {
        debug!("No browser storage for cache key {}, mirroring in memory", key);
        Box::new(crate::cache::MemoryCache::new())
    }
}

#[wasm_bindgen]
pub struct WasmEditor {
    session: EditorSession<Box<dyn DeckCache>>,
}

impl WasmEditor {
    fn build(
        slides_json: &str,
        from_editor: bool,
        template_json: Option<&str>,
        config_json: Option<&str>,
    ) -> Result<Self> {
        let config = match config_json.filter(|c| !c.trim().is_empty()) {
            Some(json) => EditorConfig::from_json(json)?,
            None => EditorConfig::default(),
        };
        let cache = browser_cache(&config.cache_key);
        WasmEditor::with_cache(slides_json, from_editor, template_json, config, cache)
    }

    fn with_cache(
        slides_json: &str,
        from_editor: bool,
        template_json: Option<&str>,
        config: EditorConfig,
        cache: Box<dyn DeckCache>,
    ) -> Result<Self> {
        let template = template_json
            .filter(|t| !t.trim().is_empty())
            .map(serde_json::from_str::<TemplateDescriptor>)
            .transpose()?;
        let navigation = NavigationState {
            slides: import_raw(slides_json),
            from_editor,
        };
        let (session, source) = EditorSession::open(Some(&navigation), cache, config, template);
        debug!(
            "Browser editor opened with {} slide(s) from {:?}",
            session.editor().deck().len(),
            source
        );
        Ok(WasmEditor { session })
    }

    fn apply_json(&mut self, command_json: &str) -> Result<String> {
        let command: Command = serde_json::from_str(command_json)?;
        let outcome = self.session.apply(command);
        Ok(serde_json::to_string(&outcome)?)
    }

    fn textbox(&self, id: &str) -> Result<&TextBox> {
        let id = ElementId::from(id);
        self.session
            .editor()
            .deck()
            .slides()
            .iter()
            .find_map(|s| s.textbox(&id))
            .ok_or_else(|| EditorError::NotFound(format!("text box {}", id)))
    }

    fn append_images(&mut self, sources_json: &str) -> Result<String> {
        let sources: Vec<String> = serde_json::from_str(sources_json)?;
        let ticket = self.session.editor().begin_upload();
        let ids = self
            .session
            .apply_upload(&ticket, UploadBatch::from_sources(sources))?;
        Ok(serde_json::to_string(&ids)?)
    }
}

/// Slide JSON comes from navigation state and may be anything; unparsable text
/// counts as no navigation data.
fn import_raw(slides_json: &str) -> JsonValue {
    serde_json::from_str(slides_json).unwrap_or_else(|e| {
        warn!("Slide data is not valid JSON ({}), ignoring it", e);
        JsonValue::Null
    })
}

#[wasm_bindgen]
impl WasmEditor {
    /// Opens the deck picked by the load precedence rule (editor hand-back, local
    /// cache, `slides_json`, default) and mirrors every change into local storage.
    #[wasm_bindgen(constructor)]
    pub fn new(
        slides_json: &str,
        from_editor: bool,
        template_json: Option<String>,
        config_json: Option<String>,
    ) -> std::result::Result<WasmEditor, JsValue> {
        WasmEditor::build(
            slides_json,
            from_editor,
            template_json.as_deref(),
            config_json.as_deref(),
        )
        .map_err(to_js)
    }

    /// Runs one JSON command and returns the outcome as JSON.
    pub fn apply(&mut self, command_json: &str) -> std::result::Result<String, JsValue> {
        self.apply_json(command_json).map_err(to_js)
    }

    #[wasm_bindgen(js_name = deckJson)]
    pub fn deck_json(&self) -> std::result::Result<String, JsValue> {
        serde_json::to_string(self.session.editor().deck()).map_err(|e| to_js(e.into()))
    }

    #[wasm_bindgen(js_name = currentIndex)]
    pub fn current_index(&self) -> usize {
        self.session.editor().current_index()
    }

    pub fn revision(&self) -> f64 {
        self.session.editor().revision() as f64
    }

    #[wasm_bindgen(js_name = resolveLayout)]
    pub fn resolve_layout(&self, index: usize) -> std::result::Result<String, JsValue> {
        let regime = self.session.editor().resolve_layout(index).map_err(to_js)?;
        serde_json::to_string(&regime).map_err(|e| to_js(e.into()))
    }

    #[wasm_bindgen(js_name = renderTextHtml)]
    pub fn render_text_html(&self, id: &str) -> std::result::Result<String, JsValue> {
        self.textbox(id).map(render_text_html).map_err(to_js)
    }

    #[wasm_bindgen(js_name = textBoxStyle)]
    pub fn text_box_style(&self, id: &str) -> std::result::Result<String, JsValue> {
        self.textbox(id).map(text_box_style).map_err(to_js)
    }

    /// Markdown outline of the whole deck.
    pub fn outline(&self, title: Option<String>) -> String {
        deck_to_markdown(self.session.editor().deck(), title.as_deref())
    }

    /// Appends already-read sources (a JSON array of data URIs) to the current slide.
    #[wasm_bindgen(js_name = addImages)]
    pub fn add_images(&mut self, sources_json: &str) -> std::result::Result<String, JsValue> {
        self.append_images(sources_json).map_err(to_js)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::MemoryCache;
    use serde_json::json;

    fn open(slides: &str, cache: MemoryCache) -> WasmEditor {
        WasmEditor::with_cache(slides, false, None, EditorConfig::default(), Box::new(cache)).unwrap()
    }

    #[test]
    fn builds_from_generated_slides_and_applies_json_commands() {
        let slides = json!([{ "title": "Intro", "content": ["A", "B"] }]).to_string();
        let mut wasm =
            WasmEditor::build(&slides, false, Some(r#"{"id":"modern-gradient"}"#), None).unwrap();
        assert_eq!(wasm.session.editor().current_slide().textboxes[0].text, "Intro");

        let outcome = wasm.apply_json(r#"{"op":"addSlide"}"#).unwrap();
        assert_eq!(outcome, r#"{"status":"applied","changed":true}"#);
        assert_eq!(wasm.current_index(), 1);

        let ids: Vec<String> =
            serde_json::from_str(&wasm.append_images(r#"["data:image/png;base64,AA=="]"#).unwrap())
                .unwrap();
        assert_eq!(ids.len(), 1);
        assert_eq!(wasm.session.editor().current_slide().images.len(), 1);
    }

    #[test]
    fn every_change_is_mirrored_into_the_cache() {
        let slides = json!([{ "title": "Intro", "content": "Body" }]).to_string();
        let mut wasm = open(&slides, MemoryCache::new());
        let id = wasm.session.editor().current_slide().textboxes[0].id.to_string();

        wasm.apply_json(&json!({ "op": "editText", "id": id, "text": "Mirrored" }).to_string())
            .unwrap();
        assert!(wasm.session.cache().load().unwrap().contains("Mirrored"));

        wasm.append_images(r#"["data:image/png;base64,BB=="]"#).unwrap();
        assert!(wasm.session.cache().load().unwrap().contains("base64,BB=="));
    }

    #[test]
    fn cached_deck_wins_over_plain_navigation() {
        let first = open(&json!([{ "title": "Cached", "content": "" }]).to_string(), MemoryCache::new());
        let cached = first.session.cache().load().unwrap();

        let slides = json!([{ "title": "Fresh", "content": "" }]).to_string();
        let wasm = open(&slides, MemoryCache::with_value(cached.clone()));
        assert_eq!(wasm.session.editor().current_slide().textboxes[0].text, "Cached");

        let handed_back = WasmEditor::with_cache(
            &slides,
            true,
            None,
            EditorConfig::default(),
            Box::new(MemoryCache::with_value(cached)),
        )
        .unwrap();
        assert_eq!(handed_back.session.editor().current_slide().textboxes[0].text, "Fresh");
    }

    #[test]
    fn config_json_is_honoured() {
        let wasm = WasmEditor::build("[]", false, None, Some(r#"{"cacheKey":"deck.v2"}"#)).unwrap();
        assert_eq!(wasm.session.editor().deck().len(), 1);
        assert!(WasmEditor::build("[]", false, None, Some("{oops")).is_err());
    }

    #[test]
    fn renders_text_by_id() {
        let mut wasm = open("not json", MemoryCache::new());
        let id = wasm.session.editor().current_slide().textboxes[1].id.to_string();
        wasm.apply_json(&json!({ "op": "editText", "id": id, "text": "a < b" }).to_string())
            .unwrap();
        assert_eq!(wasm.textbox(&id).unwrap().text, "a < b");
        assert!(render_text_html(wasm.textbox(&id).unwrap()).contains("a &lt; b"));
        assert!(wasm.textbox("missing").is_err());
    }

    #[test]
    fn rejects_malformed_commands() {
        let mut wasm = open("[]", MemoryCache::new());
        assert!(matches!(
            wasm.apply_json(r#"{"op":"nope"}"#),
            Err(EditorError::Json(_))
        ));
    }
}
