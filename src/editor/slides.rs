//! Slide-level commands.

use log::debug;

use super::Editor;
use crate::errors::{EditorError, Result};
use crate::models::slide::Slide;

impl Editor {
    /// Inserts a default slide right after `at_index` and makes it current.
    ///
    /// Returns the index of the new slide.
    pub fn add_slide(&mut self, at_index: usize) -> Result<usize> {
        if at_index >= self.deck.len() {
            return Err(EditorError::NotFound(format!("slide {}", at_index)));
        }
        let slide = Slide::with_template(self.template.as_ref());
        let index = self.deck.insert(at_index + 1, slide);
        self.current = index;
        self.selected = None;
        self.touch();
        debug!("Added slide at {} ({} total)", index, self.deck.len());
        Ok(index)
    }

    /// Removes a slide; refuses when it is the only one.
    ///
    /// The current slide becomes `max(0, index - 1)`.
    pub fn delete_slide(&mut self, index: usize) -> Result<()> {
        self.deck.remove(index)?;
        self.current = index.saturating_sub(1).min(self.deck.len() - 1);
        self.selected = None;
        self.touch();
        debug!("Deleted slide {} ({} left)", index, self.deck.len());
        Ok(())
    }

    pub fn select_slide(&mut self, index: usize) -> Result<()> {
        self.deck.slide(index)?;
        if index != self.current {
            self.current = index;
            self.selected = None;
        }
        Ok(())
    }

    /// Replaces the background fill of one slide only.
    pub fn set_background_fill(&mut self, index: usize, color: &str) -> Result<()> {
        if color.trim().is_empty() {
            return Err(EditorError::InvalidInput("empty background color".to_string()));
        }
        self.deck.slide_mut(index)?.background.fill = color.to_string();
        self.touch();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use crate::editor::Editor;
    use crate::errors::EditorError;
    use crate::models::deck::Deck;
    use crate::models::slide::Slide;

    fn three_slide_editor() -> Editor {
        let slides = (0..3)
            .map(|i| {
                let mut s = Slide::default();
                s.textboxes[0].text = format!("Slide {}", i + 1);
                s
            })
            .collect();
        Editor::new(Deck::new(slides), None)
    }

    #[test]
    fn add_then_delete_restores_deck() {
        for at in 0..3 {
            let mut editor = three_slide_editor();
            let original = editor.deck().clone();
            let index = editor.add_slide(at).unwrap();
            assert_eq!(index, at + 1);
            assert_eq!(editor.current_index(), index);
            assert_eq!(editor.deck().len(), 4);
            editor.delete_slide(index).unwrap();
            assert_eq!(editor.deck(), &original);
            assert_eq!(editor.current_index(), at);
        }
    }

    #[test]
    fn deleting_only_slide_is_refused() {
        let mut editor = Editor::new(Deck::default(), None);
        let before = editor.deck().clone();
        assert!(matches!(editor.delete_slide(0), Err(EditorError::LastSlide)));
        assert_eq!(editor.deck(), &before);
        assert_eq!(editor.revision(), 0);
    }

    #[test]
    fn deleting_first_slide_keeps_index_zero() {
        let mut editor = three_slide_editor();
        editor.select_slide(2).unwrap();
        editor.delete_slide(0).unwrap();
        assert_eq!(editor.current_index(), 0);
        assert_eq!(editor.current_slide().textboxes[0].text, "Slide 2");
    }

    #[test]
    fn background_fill_touches_only_addressed_slide() {
        let mut editor = three_slide_editor();
        editor.set_background_fill(1, "#123456").unwrap();
        let fills: Vec<&str> = editor
            .deck()
            .slides()
            .iter()
            .map(|s| s.background.fill.as_str())
            .collect();
        assert_eq!(fills, vec!["#ffffff", "#123456", "#ffffff"]);
        assert!(editor.set_background_fill(9, "#000000").is_err());
        assert!(editor.set_background_fill(0, "  ").is_err());
    }
}
