use crate::diff::formatting::{generate_git_diff, generate_readable_summary};
use crate::diff::structured::{Change, ChangeCollector};
use crate::models::deck::Deck;
use serde_json::{json, Value as JsonValue};
use treediff::diff;

use super::error::DiffError;

/// Builder for a [`Comparer`] holding the "base" deck (usually the last saved one).
#[derive(Default)]
pub struct ComparerBuilder {
    base: Option<Deck>,
    is_simplify: bool,
}

impl ComparerBuilder {
    pub fn new() -> Self {
        Default::default()
    }

    pub fn set_base(mut self, base: Deck) -> Self {
        self.base = Some(base);
        self
    }

    /// Leave element locations out of the readable summary.
    pub fn set_simplify(mut self, is_simplify: bool) -> Self {
        self.is_simplify = is_simplify;
        self
    }

    pub fn build(self) -> Result<Comparer, DiffError> {
        let base = self.base.ok_or(DiffError::MissingBase)?;
        Ok(Comparer {
            base,
            is_simplify: self.is_simplify,
        })
    }
}

/// Compares decks against a stored base.
pub struct Comparer {
    base: Deck,
    is_simplify: bool,
}

impl Comparer {
    pub fn base(&self) -> &Deck {
        &self.base
    }

    pub fn compare(&self, other: &Deck) -> Result<ComparisonResult, DiffError> {
        // Wrapped so paths read `slides[0]...`.
        let base_val: JsonValue = json!({ "slides": serde_json::to_value(&self.base)? });
        let other_val: JsonValue = json!({ "slides": serde_json::to_value(other)? });

        let mut collector = ChangeCollector::new();
        diff(&base_val, &other_val, &mut collector);

        Ok(ComparisonResult {
            base: self.base.clone(),
            compared: other.clone(),
            changes: collector.changes,
            is_simplify: self.is_simplify,
        })
    }
}

/// Outcome of one comparison.
pub struct ComparisonResult {
    base: Deck,
    compared: Deck,
    changes: Vec<Change>,
    is_simplify: bool,
}

impl ComparisonResult {
    pub fn has_changes(&self) -> bool {
        !self.changes.is_empty()
    }

    pub fn get_structured_diff(&self) -> &[Change] {
        &self.changes
    }

    /// Git-style text diff of the two decks' JSON.
    pub fn get_git_diff(&self) -> Result<String, DiffError> {
        generate_git_diff(&self.base, &self.compared, &self.changes)
    }

    pub fn get_readable_diff(&self) -> Result<String, DiffError> {
        generate_readable_summary(&self.changes, self.is_simplify)
    }
}
