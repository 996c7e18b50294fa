//! Text box commands. Boxes are addressed by id on the current slide.

use std::ops::Range;

use log::debug;

use super::{ensure_finite, ensure_positive_size, Editor, Selected};
use crate::errors::{EditorError, Result};
use crate::models::{
    common::ElementId,
    template::StyleTarget,
    textbox::{Alignment, ParagraphSpacing, StyleFlag, TextBox, TextKind},
};
use crate::selection::{capture, collapse_to_end, SelectionHost, SelectionPath};

impl Editor {
    /// Appends a box of `kind`, offset downward by the number of boxes already present.
    pub fn add_text_box(&mut self, kind: TextKind) -> Result<ElementId> {
        let target = match kind {
            TextKind::Title => StyleTarget::Title,
            TextKind::Body => StyleTarget::Body,
        };
        let style = self.template.as_ref().and_then(|t| t.style(target)).cloned();
        let slide = self.current_slide_mut()?;
        let textbox = TextBox::new(kind, slide.textboxes.len(), style.as_ref());
        let id = textbox.id.clone();
        slide.textboxes.push(textbox);
        self.touch();
        debug!("Added {:?} text box {}", kind, id);
        Ok(id)
    }

    /// Replaces the plain text of a box. Inline spans are clamped to the new length.
    pub fn edit_text(&mut self, id: &ElementId, text: &str) -> Result<()> {
        let textbox = self.textbox_mut(id)?;
        if textbox.text == text {
            return Ok(());
        }
        textbox.set_text(text);
        self.touch();
        Ok(())
    }

    /// `edit_text` for a box the user is typing into.
    ///
    /// The caret in `host` is captured before the model changes, `rerender` rebuilds
    /// the container from the updated box, and the caret is then collapsed at the end
    /// of the new content. Returns the captured selection. On error `host` is untouched.
    pub fn edit_text_keeping_caret<H, F>(
        &mut self,
        host: &mut H,
        id: &ElementId,
        text: &str,
        rerender: F,
    ) -> Result<Option<SelectionPath>>
    where
        H: SelectionHost,
        F: FnOnce(&mut H, &TextBox),
    {
        let captured = capture(host);
        self.edit_text(id, text)?;
        let textbox = &*self.textbox_mut(id)?;
        rerender(host, textbox);
        collapse_to_end(host);
        Ok(captured)
    }

    /// Moves a box by a delta. Slide bounds are not enforced here.
    pub fn move_text(&mut self, id: &ElementId, dx: f64, dy: f64) -> Result<()> {
        ensure_finite(&[dx, dy])?;
        let textbox = self.textbox_mut(id)?;
        textbox.x += dx;
        textbox.y += dy;
        self.touch();
        Ok(())
    }

    pub fn set_text_position(&mut self, id: &ElementId, x: f64, y: f64) -> Result<()> {
        ensure_finite(&[x, y])?;
        let textbox = self.textbox_mut(id)?;
        textbox.x = x;
        textbox.y = y;
        self.touch();
        Ok(())
    }

    pub fn resize_text(&mut self, id: &ElementId, width: f64, height: f64) -> Result<()> {
        ensure_positive_size(width, height)?;
        let textbox = self.textbox_mut(id)?;
        textbox.width = width;
        textbox.height = height;
        self.touch();
        Ok(())
    }

    pub fn delete_text_box(&mut self, id: &ElementId) -> Result<()> {
        let slide = self.current_slide_mut()?;
        let pos = slide
            .textboxes
            .iter()
            .position(|t| &t.id == id)
            .ok_or_else(|| EditorError::NotFound(format!("text box {}", id)))?;
        slide.textboxes.remove(pos);
        if self.selected == Some(Selected::TextBox(id.clone())) {
            self.selected = None;
        }
        self.touch();
        Ok(())
    }

    /// Flips `flag` for the whole box, or for an inline span when `range` is a
    /// non-empty char range inside the text.
    pub fn toggle_style(
        &mut self,
        id: &ElementId,
        flag: StyleFlag,
        range: Option<Range<usize>>,
    ) -> Result<()> {
        let textbox = self.textbox_mut(id)?;
        match range.filter(|r| !r.is_empty()) {
            Some(range) => {
                if range.end > textbox.char_len() {
                    return Err(EditorError::InvalidInput(format!(
                        "range {:?} is outside text of length {}",
                        range,
                        textbox.char_len()
                    )));
                }
                textbox.toggle_span(range, flag);
            }
            None => textbox.toggle_flag(flag),
        }
        self.touch();
        Ok(())
    }

    pub fn set_alignment(&mut self, id: &ElementId, align: Alignment) -> Result<()> {
        self.textbox_mut(id)?.align = align;
        self.touch();
        Ok(())
    }

    pub fn set_font_family(&mut self, id: &ElementId, family: &str) -> Result<()> {
        if family.trim().is_empty() {
            return Err(EditorError::InvalidInput("empty font family".to_string()));
        }
        self.textbox_mut(id)?.font_family = family.to_string();
        self.touch();
        Ok(())
    }

    pub fn set_font_size(&mut self, id: &ElementId, size: f64) -> Result<()> {
        if !size.is_finite() || size <= 0.0 {
            return Err(EditorError::InvalidInput(format!("font size {}", size)));
        }
        self.textbox_mut(id)?.font_size = size;
        self.touch();
        Ok(())
    }

    pub fn set_fill_color(&mut self, id: &ElementId, color: &str) -> Result<()> {
        if color.trim().is_empty() {
            return Err(EditorError::InvalidInput("empty fill color".to_string()));
        }
        self.textbox_mut(id)?.fill_color = color.to_string();
        self.touch();
        Ok(())
    }

    /// Sets paragraph spacing from the ladder `{0, 4, ..., 32}`; other values are rejected.
    pub fn set_paragraph_spacing(&mut self, id: &ElementId, value: u8) -> Result<()> {
        let spacing = ParagraphSpacing::try_from(value).map_err(EditorError::InvalidInput)?;
        self.textbox_mut(id)?.set_paragraph_spacing(spacing);
        self.touch();
        Ok(())
    }

    pub fn toggle_bullets(&mut self, id: &ElementId) -> Result<()> {
        let textbox = self.textbox_mut(id)?;
        textbox.bullets = !textbox.bullets;
        self.touch();
        Ok(())
    }

    /// Sets or clears (`None`) the highlight color behind the text.
    pub fn set_highlight(&mut self, id: &ElementId, color: Option<String>) -> Result<()> {
        let color = color.filter(|c| !c.trim().is_empty());
        self.textbox_mut(id)?.highlight = color;
        self.touch();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use crate::editor::{Editor, Selected};
    use crate::errors::EditorError;
    use crate::models::common::ElementId;
    use crate::models::deck::Deck;
    use crate::models::textbox::{Alignment, StyleFlag, TextKind};
    use crate::selection::MemoryTree;

    fn editor() -> Editor {
        Editor::new(Deck::default(), None)
    }

    fn title_id(editor: &Editor) -> ElementId {
        editor
            .current_slide()
            .first_of_kind(TextKind::Title)
            .unwrap()
            .id
            .clone()
    }

    #[test]
    fn edit_title_leaves_other_boxes_alone() {
        let mut editor = editor();
        let before = editor.current_slide().clone();
        let id = title_id(&editor);
        editor.edit_text(&id, "Q3 Results").unwrap();

        let slide = editor.current_slide();
        assert_eq!(slide.textbox(&id).unwrap().text, "Q3 Results");
        for (old, new) in before.textboxes.iter().zip(&slide.textboxes) {
            if old.id != id {
                assert_eq!(old, new);
            }
        }
    }

    #[test]
    fn typing_into_title_keeps_caret_at_end() {
        let mut editor = editor();
        let id = title_id(&editor);
        editor.edit_text(&id, "Q3 Review").unwrap();
        let mut host = MemoryTree::from_plain_text("Q3 Review");
        host.select((vec![0], 3), (vec![0], 3));

        let captured = editor
            .edit_text_keeping_caret(&mut host, &id, "Q3 Results", |h, tb| {
                h.set_plain_text(&tb.text)
            })
            .unwrap()
            .unwrap();

        assert_eq!(captured.start.offset, 3);
        assert_eq!(editor.current_slide().textbox(&id).unwrap().text, "Q3 Results");
        let (start, end) = host.caret().unwrap();
        assert_eq!(start, end);
        assert_eq!((start.node.clone(), start.offset), (vec![0], 10));
    }

    #[test]
    fn unknown_box_leaves_host_untouched() {
        let mut editor = editor();
        let mut host = MemoryTree::from_plain_text("Q3");
        host.select((vec![0], 1), (vec![0], 1));
        let before = host.clone();
        let err = editor
            .edit_text_keeping_caret(&mut host, &ElementId::new("missing"), "x", |h, tb| {
                h.set_plain_text(&tb.text)
            })
            .unwrap_err();
        assert!(matches!(err, EditorError::NotFound(_)));
        assert_eq!(host, before);
        assert_eq!(editor.revision(), 0);
    }

    #[test]
    fn added_boxes_are_offset_by_existing_count() {
        let mut editor = editor();
        let id = editor.add_text_box(TextKind::Body).unwrap();
        let added = editor.current_slide().textbox(&id).unwrap();
        assert_eq!(added.y, 180.0 + 40.0 * 2.0);
        assert_eq!(editor.current_slide().textboxes.len(), 3);
    }

    #[test]
    fn geometry_commands_do_not_clamp() {
        let mut editor = editor();
        let id = title_id(&editor);
        editor.move_text(&id, -200.0, 10.0).unwrap();
        let tb = editor.current_slide().textbox(&id).unwrap();
        assert_eq!((tb.x, tb.y), (-120.0, 70.0));

        editor.set_text_position(&id, 2000.0, 5.0).unwrap();
        assert_eq!(editor.current_slide().textbox(&id).unwrap().x, 2000.0);

        assert!(editor.resize_text(&id, 0.0, 10.0).is_err());
        assert!(editor.move_text(&id, f64::NAN, 0.0).is_err());
        editor.resize_text(&id, 300.0, 90.0).unwrap();
        let tb = editor.current_slide().textbox(&id).unwrap();
        assert_eq!((tb.width, tb.height), (300.0, 90.0));
    }

    #[test]
    fn toggle_style_picks_granularity_from_range() {
        let mut editor = editor();
        let id = title_id(&editor);
        editor.edit_text(&id, "Quarterly").unwrap();

        editor.toggle_style(&id, StyleFlag::Italic, Some(0..3)).unwrap();
        let tb = editor.current_slide().textbox(&id).unwrap();
        assert!(!tb.italic);
        assert_eq!(tb.spans.len(), 1);
        assert!(tb.spans[0].italic);

        // An empty range falls back to the whole box.
        editor.toggle_style(&id, StyleFlag::Italic, Some(2..2)).unwrap();
        assert!(editor.current_slide().textbox(&id).unwrap().italic);

        let before = editor.deck().clone();
        assert!(matches!(
            editor.toggle_style(&id, StyleFlag::Bold, Some(0..50)),
            Err(EditorError::InvalidInput(_))
        ));
        assert_eq!(editor.deck(), &before);
    }

    #[test]
    fn paragraph_spacing_must_be_on_ladder() {
        let mut editor = editor();
        let id = title_id(&editor);
        editor.set_paragraph_spacing(&id, 12).unwrap();
        let tb = editor.current_slide().textbox(&id).unwrap();
        assert_eq!(tb.paragraph_spacing.value(), 12);
        assert_eq!(tb.line_height, 2.5);
        assert!(editor.set_paragraph_spacing(&id, 13).is_err());
        assert_eq!(editor.current_slide().textbox(&id).unwrap().line_height, 2.5);
    }

    #[test]
    fn formatting_setters() {
        let mut editor = editor();
        let id = title_id(&editor);
        editor.set_alignment(&id, Alignment::Justify).unwrap();
        editor.set_font_family(&id, "Georgia").unwrap();
        editor.set_font_size(&id, 18.0).unwrap();
        editor.set_fill_color(&id, "#ff0000").unwrap();
        editor.toggle_bullets(&id).unwrap();
        editor.set_highlight(&id, Some("#ffff00".to_string())).unwrap();

        let tb = editor.current_slide().textbox(&id).unwrap();
        assert_eq!(tb.align, Alignment::Justify);
        assert_eq!(tb.font_family, "Georgia");
        assert_eq!(tb.font_size, 18.0);
        assert_eq!(tb.fill_color, "#ff0000");
        assert!(tb.bullets);
        assert_eq!(tb.highlight.as_deref(), Some("#ffff00"));

        editor.set_highlight(&id, None).unwrap();
        assert!(editor.current_slide().textbox(&id).unwrap().highlight.is_none());
        assert!(editor.set_font_size(&id, -1.0).is_err());
    }

    #[test]
    fn deleting_selected_box_clears_selection() {
        let mut editor = editor();
        let id = title_id(&editor);
        editor.select(Some(Selected::TextBox(id.clone()))).unwrap();
        editor.delete_text_box(&id).unwrap();
        assert!(editor.selected().is_none());
        assert!(matches!(
            editor.delete_text_box(&id),
            Err(EditorError::NotFound(_))
        ));
    }
}
