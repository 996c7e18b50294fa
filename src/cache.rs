//! Local mirror of the deck being edited, and the load precedence rule that decides
//! which deck a fresh editor opens.

use log::{debug, warn};
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;

use crate::converters::import::import_slides;
use crate::errors::Result;
use crate::models::{deck::Deck, template::TemplateDescriptor};

/// Key/value storage holding one serialized deck (browser local storage or similar).
pub trait DeckCache {
    fn load(&self) -> Option<String>;
    fn store(&mut self, deck_json: &str) -> Result<()>;
    fn clear(&mut self);
}

impl<C: DeckCache + ?Sized> DeckCache for Box<C> {
    fn load(&self) -> Option<String> {
        (**self).load()
    }

    fn store(&mut self, deck_json: &str) -> Result<()> {
        (**self).store(deck_json)
    }

    fn clear(&mut self) {
        (**self).clear()
    }
}

/// In-process cache, used natively and in tests.
#[derive(Debug, Clone, Default)]
pub struct MemoryCache {
    value: Option<String>,
}

impl MemoryCache {
    pub fn new() -> Self {
        MemoryCache::default()
    }

    pub fn with_value(value: impl Into<String>) -> Self {
        MemoryCache {
            value: Some(value.into()),
        }
    }
}

impl DeckCache for MemoryCache {
    fn load(&self) -> Option<String> {
        self.value.clone()
    }

    fn store(&mut self, deck_json: &str) -> Result<()> {
        self.value = Some(deck_json.to_string());
        Ok(())
    }

    fn clear(&mut self) {
        self.value = None;
    }
}

/// Slides handed over by the page that navigated to the editor.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NavigationState {
    #[serde(default)]
    pub slides: JsonValue,
    /// Set when the editor itself produced these slides (e.g. returning from preview).
    #[serde(default)]
    pub from_editor: bool,
}

/// Where the initial deck came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeckSource {
    Navigation,
    Cache,
    Default,
}

fn usable_slides(value: &JsonValue) -> bool {
    value.as_array().is_some_and(|items| !items.is_empty())
}

/// Picks the deck to open.
///
/// Navigation data flagged as coming from the editor wins, then the cache, then any
/// other navigation data, then a synthesized default deck.
pub fn resolve_initial_deck(
    navigation: Option<&NavigationState>,
    cached: Option<&str>,
    template: Option<&TemplateDescriptor>,
) -> (Deck, DeckSource) {
    let navigation = navigation.filter(|n| usable_slides(&n.slides));

    if let Some(nav) = navigation.filter(|n| n.from_editor) {
        debug!("Opening deck handed back by the editor");
        return (import_slides(&nav.slides, template), DeckSource::Navigation);
    }

    if let Some(raw) = cached {
        match serde_json::from_str::<JsonValue>(raw) {
            Ok(value) if usable_slides(&value) => {
                debug!("Opening cached deck");
                return (import_slides(&value, template), DeckSource::Cache);
            }
            Ok(_) => debug!("Cached deck is empty, ignoring it"),
            Err(e) => warn!("Cached deck is not valid JSON, ignoring it: {}", e),
        }
    }

    if let Some(nav) = navigation {
        debug!("Opening deck from navigation state");
        return (import_slides(&nav.slides, template), DeckSource::Navigation);
    }

    (Deck::with_template(template), DeckSource::Default)
}

/// Serializes `deck` into `cache`.
pub fn mirror_deck<C: DeckCache>(cache: &mut C, deck: &Deck) -> Result<()> {
    let json = serde_json::to_string(deck)?;
    cache.store(&json)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::slide::Slide;
    use serde_json::json;

    fn generated(title: &str) -> NavigationState {
        NavigationState {
            slides: json!([{ "title": title, "content": "body" }]),
            from_editor: false,
        }
    }

    fn cached_deck(title: &str) -> String {
        let mut slide = Slide::default();
        slide.textboxes[0].text = title.to_string();
        serde_json::to_string(&Deck::new(vec![slide])).unwrap()
    }

    fn first_title(deck: &Deck) -> &str {
        &deck.slides()[0].textboxes[0].text
    }

    #[test]
    fn editor_flagged_navigation_beats_cache() {
        let mut nav = generated("From editor");
        nav.from_editor = true;
        let cache = cached_deck("Cached");
        let (deck, source) = resolve_initial_deck(Some(&nav), Some(&cache), None);
        assert_eq!(source, DeckSource::Navigation);
        assert_eq!(first_title(&deck), "From editor");
    }

    #[test]
    fn cache_beats_plain_navigation() {
        let nav = generated("Generated");
        let cache = cached_deck("Cached");
        let (deck, source) = resolve_initial_deck(Some(&nav), Some(&cache), None);
        assert_eq!(source, DeckSource::Cache);
        assert_eq!(first_title(&deck), "Cached");
    }

    #[test]
    fn broken_cache_falls_through_to_navigation_then_default() {
        let nav = generated("Generated");
        let (deck, source) = resolve_initial_deck(Some(&nav), Some("{not json"), None);
        assert_eq!(source, DeckSource::Navigation);
        assert_eq!(first_title(&deck), "Generated");

        let (deck, source) = resolve_initial_deck(None, Some("[]"), None);
        assert_eq!(source, DeckSource::Default);
        assert_eq!(deck.len(), 1);
        assert_eq!(deck.slides()[0].textboxes.len(), 2);
    }

    #[test]
    fn memory_cache_round_trips_mirrored_deck() {
        let mut cache = MemoryCache::new();
        let deck = Deck::default();
        mirror_deck(&mut cache, &deck).unwrap();
        let (restored, source) = resolve_initial_deck(None, cache.load().as_deref(), None);
        assert_eq!(source, DeckSource::Cache);
        assert_eq!(restored, deck);
        cache.clear();
        assert!(cache.load().is_none());
    }
}
