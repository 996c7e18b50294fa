use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;
use treediff::{value::Key, Delegate};

/// Short rendering of a value that took part in a change.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub enum ValueRepr {
    String(String),
    Number(serde_json::Number),
    Boolean(bool),
    Null,
    /// Summary such as `[Array len=5]`.
    Array(String),
    Object(String),
}

impl ValueRepr {
    fn from_json_value(val: &JsonValue) -> Self {
        match val {
            JsonValue::Null => ValueRepr::Null,
            JsonValue::Bool(b) => ValueRepr::Boolean(*b),
            JsonValue::Number(n) => ValueRepr::Number(n.clone()),
            JsonValue::String(s) => ValueRepr::String(s.clone()),
            JsonValue::Array(arr) => ValueRepr::Array(format!("[Array len={}]", arr.len())),
            JsonValue::Object(map) => match map.get("type").and_then(JsonValue::as_str) {
                Some(kind) => ValueRepr::Object(format!("{{{} box}}", kind)),
                None => ValueRepr::Object("{Object}".to_string()),
            },
        }
    }

    pub fn format_for_display(&self) -> String {
        match self {
            ValueRepr::String(s) => {
                // Data URIs would swamp the summary.
                let shown = if s.starts_with("data:") && s.len() > 48 {
                    let cut = s.find(',').map(|i| i + 1).unwrap_or_else(|| {
                        s.char_indices().nth(32).map_or(s.len(), |(i, _)| i)
                    });
                    format!("{}...", &s[..cut])
                } else {
                    s.clone()
                };
                let escaped = shown
                    .replace('\\', "\\\\")
                    .replace('\n', "\\n")
                    .replace('\t', "\\t")
                    .replace('\'', "\\'");
                format!("'{}'", escaped)
            }
            ValueRepr::Number(n) => n.to_string(),
            ValueRepr::Boolean(b) => b.to_string(),
            ValueRepr::Null => "null".to_string(),
            ValueRepr::Array(s) | ValueRepr::Object(s) => s.clone(),
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq, Hash)]
pub enum ChangeType {
    Added,
    Removed,
    Modified,
}

/// One difference between two decks.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Change {
    /// Dotted path with bracketed indices, e.g. `slides[1].textboxes[0].text`.
    pub path: String,
    pub change_type: ChangeType,
    /// `None` for additions.
    pub old_value: Option<ValueRepr>,
    /// `None` for removals.
    pub new_value: Option<ValueRepr>,
}

impl Change {
    /// Index of the slide the change lives in, if any.
    pub fn slide_index(&self) -> Option<usize> {
        let rest = self.path.strip_prefix("slides[")?;
        rest[..rest.find(']')?].parse().ok()
    }
}

/// Collects treediff callbacks into a flat list of [`Change`]s.
#[derive(Debug)]
pub(crate) struct ChangeCollector {
    pub(crate) changes: Vec<Change>,
    current_path: Vec<String>,
}

impl ChangeCollector {
    pub(crate) fn new() -> Self {
        ChangeCollector {
            changes: Vec::new(),
            current_path: Vec::new(),
        }
    }

    fn segment(&self, key: &Key) -> String {
        match key {
            Key::String(s) if self.current_path.is_empty() => s.clone(),
            Key::String(s) => format!(".{}", s),
            Key::Index(i) => format!("[{}]", i),
        }
    }

    fn format_path(&self, leaf: Option<&Key>) -> String {
        // Segments carry their own '.' or '[]'.
        let mut path = self.current_path.join("");
        if let Some(key) = leaf {
            path.push_str(&self.segment(key));
        }
        path
    }

    fn record(
        &mut self,
        leaf: Option<&Key>,
        change_type: ChangeType,
        old: Option<&JsonValue>,
        new: Option<&JsonValue>,
    ) {
        let path = self.format_path(leaf);
        self.changes.push(Change {
            path,
            change_type,
            old_value: old.map(ValueRepr::from_json_value),
            new_value: new.map(ValueRepr::from_json_value),
        });
    }
}

impl<'a> Delegate<'a, Key, JsonValue> for ChangeCollector {
    fn push(&mut self, segment: &Key) {
        let segment_str = self.segment(segment);
        self.current_path.push(segment_str);
    }

    fn pop(&mut self) {
        self.current_path.pop();
    }

    fn removed<'b>(&mut self, key: &'b Key, value: &'a JsonValue) {
        self.record(Some(key), ChangeType::Removed, Some(value), None);
    }

    fn added<'b>(&mut self, key: &'b Key, value: &'a JsonValue) {
        self.record(Some(key), ChangeType::Added, None, Some(value));
    }

    fn modified(&mut self, old: &'a JsonValue, new: &'a JsonValue) {
        self.record(None, ChangeType::Modified, Some(old), Some(new));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use treediff::diff;

    #[test]
    fn collects_paths_with_indices() {
        let old = json!({ "slides": [{ "textboxes": [{ "text": "a" }] }] });
        let new = json!({ "slides": [{ "textboxes": [{ "text": "b" }] }] });
        let mut collector = ChangeCollector::new();
        diff(&old, &new, &mut collector);
        assert_eq!(collector.changes.len(), 1);
        let change = &collector.changes[0];
        assert_eq!(change.path, "slides[0].textboxes[0].text");
        assert_eq!(change.change_type, ChangeType::Modified);
        assert_eq!(change.slide_index(), Some(0));
    }

    #[test]
    fn added_entries_include_their_key() {
        let old = json!({ "slides": [{ "images": [] }] });
        let new = json!({ "slides": [{ "images": [{ "src": "x" }] }] });
        let mut collector = ChangeCollector::new();
        diff(&old, &new, &mut collector);
        assert_eq!(collector.changes.len(), 1);
        assert_eq!(collector.changes[0].path, "slides[0].images[0]");
        assert_eq!(collector.changes[0].change_type, ChangeType::Added);
    }

    #[test]
    fn long_data_uris_are_shortened() {
        let uri = format!("data:image/png;base64,{}", "A".repeat(200));
        let shown = ValueRepr::String(uri).format_for_display();
        assert_eq!(shown, "'data:image/png;base64,...'");
    }

    #[test]
    fn data_uri_without_comma_is_cut_on_a_char_boundary() {
        let uri = format!("data:{}", "é".repeat(30));
        let shown = ValueRepr::String(uri).format_for_display();
        let expected = format!("'data:{}...'", "é".repeat(27));
        assert_eq!(shown, expected);
    }
}
