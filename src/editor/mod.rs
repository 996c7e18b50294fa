//! The Editing Engine: the only code that mutates a [`Deck`].
//!
//! Every command is a method returning [`Result`]; an `Err` means the deck was not
//! touched. [`Editor::apply`] runs a serialized [`Command`] and turns failures into
//! logged no-ops so the editor stays interactive.

mod command;
mod images;
mod slides;
mod textboxes;
pub mod upload;

pub use command::{Command, CommandOutcome, KeyFocus, Selected, TextRange};
pub use upload::{read_upload_batch, ImageReader, UploadBatch, UploadTicket};

use log::{debug, warn};
use serde_json::Value as JsonValue;

use crate::converters::import::import_slides;
use crate::errors::{EditorError, Result};
use crate::layout::{LayoutRegime, LayoutResolver};
use crate::models::{
    common::ElementId,
    deck::Deck,
    slide::Slide,
    template::TemplateDescriptor,
    textbox::TextBox,
};

/// Live editing state: the deck plus the current slide and selection.
#[derive(Debug, Clone)]
pub struct Editor {
    deck: Deck,
    current: usize,
    selected: Option<Selected>,
    template: Option<TemplateDescriptor>,
    resolver: LayoutResolver,
    revision: u64,
}

impl Editor {
    pub fn new(deck: Deck, template: Option<TemplateDescriptor>) -> Self {
        Editor::with_resolver(deck, template, LayoutResolver::default())
    }

    /// Builds an editor with a custom layout table. Legacy images are migrated here.
    pub fn with_resolver(
        mut deck: Deck,
        template: Option<TemplateDescriptor>,
        resolver: LayoutResolver,
    ) -> Self {
        let migrated = deck.migrate_legacy_images();
        if migrated > 0 {
            debug!("Migrated legacy image data on {} slide(s)", migrated);
        }
        let template = template.map(|t| resolver.styled_template(&t));
        Editor {
            deck,
            current: 0,
            selected: None,
            template,
            resolver,
            revision: 0,
        }
    }

    /// Imports slides in either incoming shape and starts editing them.
    pub fn from_json(value: &JsonValue, template: Option<TemplateDescriptor>) -> Self {
        let resolver = LayoutResolver::default();
        let styled = template.as_ref().map(|t| resolver.styled_template(t));
        let deck = import_slides(value, styled.as_ref());
        Editor::with_resolver(deck, template, resolver)
    }

    pub fn deck(&self) -> &Deck {
        &self.deck
    }

    pub fn into_deck(self) -> Deck {
        self.deck
    }

    pub fn current_index(&self) -> usize {
        self.current
    }

    pub fn current_slide(&self) -> &Slide {
        // `current` is kept in range by every command that changes the slide count.
        &self.deck.slides()[self.current.min(self.deck.len() - 1)]
    }

    pub fn selected(&self) -> Option<&Selected> {
        self.selected.as_ref()
    }

    pub fn template(&self) -> Option<&TemplateDescriptor> {
        self.template.as_ref()
    }

    pub fn template_id(&self) -> Option<&str> {
        self.template.as_ref().map(|t| t.id.as_str())
    }

    /// Bumped once per command that changed the deck.
    pub fn revision(&self) -> u64 {
        self.revision
    }

    pub fn select(&mut self, target: Option<Selected>) -> Result<()> {
        if let Some(target) = &target {
            let slide = self.current_slide();
            let exists = match target {
                Selected::TextBox(id) => slide.textbox(id).is_some(),
                Selected::Image(id) => slide.image(id).is_some(),
            };
            if !exists {
                return Err(EditorError::NotFound(format!("{:?}", target)));
            }
        }
        self.selected = target;
        Ok(())
    }

    /// Layout regime of the slide at `index` under the editor's template.
    pub fn resolve_layout(&self, index: usize) -> Result<LayoutRegime> {
        let slide = self.deck.slide(index)?;
        Ok(self.resolver.resolve(self.template_id(), index, slide))
    }

    pub fn current_layout(&self) -> LayoutRegime {
        self.resolver
            .resolve(self.template_id(), self.current, self.current_slide())
    }

    /// Deletes the selected element in response to Backspace/Delete.
    ///
    /// Returns `Ok(false)` without touching anything when focus is inside an
    /// editable text container: the keystroke belongs to the text.
    pub fn handle_delete_key(&mut self, focus: KeyFocus) -> Result<bool> {
        if focus == KeyFocus::EditableText {
            return Ok(false);
        }
        match self.selected.clone() {
            Some(Selected::TextBox(id)) => self.delete_text_box(&id).map(|_| true),
            Some(Selected::Image(id)) => self.remove_image(&id).map(|_| true),
            None => Err(EditorError::NoSelection),
        }
    }

    /// Runs one command atomically. Failures are logged and leave the deck untouched.
    pub fn apply(&mut self, command: Command) -> CommandOutcome {
        debug!("Applying {:?}", command);
        let before = self.revision;
        let result = self.execute(command);
        match result {
            Ok(()) => CommandOutcome::Applied {
                changed: self.revision != before,
            },
            Err(e) => {
                warn!("Command ignored: {}", e);
                CommandOutcome::Ignored {
                    reason: e.to_string(),
                }
            }
        }
    }

    fn execute(&mut self, command: Command) -> Result<()> {
        match command {
            Command::AddSlide { at_index } => {
                let at = at_index.unwrap_or(self.current);
                self.add_slide(at).map(|_| ())
            }
            Command::DeleteSlide { index } => self.delete_slide(index),
            Command::SelectSlide { index } => self.select_slide(index),
            Command::SetBackgroundFill { index, color } => self.set_background_fill(index, &color),
            Command::AddTextBox { kind } => self.add_text_box(kind).map(|_| ()),
            Command::EditText { id, text } => self.edit_text(&id, &text),
            Command::MoveText { id, dx, dy } => self.move_text(&id, dx, dy),
            Command::SetTextPosition { id, x, y } => self.set_text_position(&id, x, y),
            Command::ResizeText { id, width, height } => self.resize_text(&id, width, height),
            Command::DeleteTextBox { id } => self.delete_text_box(&id),
            Command::ToggleStyle { id, flag, range } => {
                self.toggle_style(&id, flag, range.map(|r| r.start..r.end))
            }
            Command::SetAlignment { id, align } => self.set_alignment(&id, align),
            Command::SetFontFamily { id, family } => self.set_font_family(&id, &family),
            Command::SetFontSize { id, size } => self.set_font_size(&id, size),
            Command::SetFillColor { id, color } => self.set_fill_color(&id, &color),
            Command::SetParagraphSpacing { id, value } => self.set_paragraph_spacing(&id, value),
            Command::ToggleBullets { id } => self.toggle_bullets(&id),
            Command::SetHighlight { id, color } => self.set_highlight(&id, color),
            Command::AddImages { sources } => {
                let ticket = self.begin_upload();
                let batch = UploadBatch::from_sources(sources);
                self.apply_upload(&ticket, batch).map(|_| ())
            }
            Command::MoveImage { id, x, y } => self.move_image(&id, x, y),
            Command::ResizeImage { id, width, height } => self.resize_image(&id, width, height),
            Command::SetImageZOrder { id, order } => self.set_image_z_order(&id, order),
            Command::SetSelectedImageZOrder { order } => self.set_selected_image_z_order(order),
            Command::RemoveImage { id } => self.remove_image(&id),
            Command::RemoveAllImages => self.remove_all_images(),
            Command::RemoveLegacyImage => self.remove_legacy_image(),
            Command::Select { target } => self.select(target),
            Command::DeleteSelected { focus } => self.handle_delete_key(focus).map(|_| ()),
        }
    }

    fn touch(&mut self) {
        self.revision += 1;
    }

    fn current_slide_mut(&mut self) -> Result<&mut Slide> {
        let index = self.current;
        self.deck.slide_mut(index)
    }

    fn textbox_mut(&mut self, id: &ElementId) -> Result<&mut TextBox> {
        self.current_slide_mut()?
            .textbox_mut(id)
            .ok_or_else(|| EditorError::NotFound(format!("text box {}", id)))
    }
}

fn ensure_finite(values: &[f64]) -> Result<()> {
    if values.iter().all(|v| v.is_finite()) {
        Ok(())
    } else {
        Err(EditorError::InvalidInput(format!(
            "non-finite coordinate in {:?}",
            values
        )))
    }
}

fn ensure_positive_size(width: f64, height: f64) -> Result<()> {
    ensure_finite(&[width, height])?;
    if width <= 0.0 || height <= 0.0 {
        return Err(EditorError::InvalidInput(format!(
            "size must be positive, got {}x{}",
            width, height
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::textbox::TextKind;
    use serde_json::json;

    #[test]
    fn apply_reports_ignored_commands_without_touching_deck() {
        let mut editor = Editor::new(Deck::default(), None);
        let before = editor.deck().clone();
        let outcome = editor.apply(Command::DeleteTextBox {
            id: ElementId::new("missing"),
        });
        assert!(matches!(outcome, CommandOutcome::Ignored { .. }));
        assert_eq!(editor.deck(), &before);
        assert_eq!(editor.revision(), 0);
    }

    #[test]
    fn apply_parses_from_json_commands() {
        let mut editor = Editor::new(Deck::default(), None);
        let id = editor.current_slide().textboxes[0].id.clone();
        let command: Command = serde_json::from_value(json!({
            "op": "editText",
            "id": id,
            "text": "From the view"
        }))
        .unwrap();
        assert_eq!(editor.apply(command), CommandOutcome::Applied { changed: true });
        assert_eq!(editor.current_slide().textboxes[0].text, "From the view");
        assert_eq!(editor.revision(), 1);
    }

    #[test]
    fn selection_only_commands_do_not_bump_revision() {
        let mut editor = Editor::new(Deck::default(), None);
        let id = editor.current_slide().textboxes[1].id.clone();
        let outcome = editor.apply(Command::Select {
            target: Some(Selected::TextBox(id.clone())),
        });
        assert_eq!(outcome, CommandOutcome::Applied { changed: false });
        assert_eq!(editor.selected(), Some(&Selected::TextBox(id)));
    }

    #[test]
    fn delete_key_respects_text_focus() {
        let mut editor = Editor::new(Deck::default(), None);
        let id = editor.current_slide().textboxes[1].id.clone();
        editor.select(Some(Selected::TextBox(id.clone()))).unwrap();

        assert!(!editor.handle_delete_key(KeyFocus::EditableText).unwrap());
        assert_eq!(editor.current_slide().textboxes.len(), 2);

        assert!(editor.handle_delete_key(KeyFocus::Canvas).unwrap());
        assert_eq!(editor.current_slide().textboxes.len(), 1);
        assert!(editor.selected().is_none());
        assert!(matches!(
            editor.handle_delete_key(KeyFocus::Canvas),
            Err(EditorError::NoSelection)
        ));
    }

    #[test]
    fn from_json_applies_template_styles_to_generated_slides() {
        let template: TemplateDescriptor = serde_json::from_value(json!({
            "id": "modern-gradient",
            "name": "Modern"
        }))
        .unwrap();
        let editor = Editor::from_json(&json!([{ "title": "Hello", "content": "World" }]), Some(template));
        let title = editor.current_slide().first_of_kind(TextKind::Title).unwrap();
        assert_eq!(title.text, "Hello");
        assert_eq!(title.font_family, "Montserrat");
        assert_eq!(
            editor.current_slide().background.template.as_deref(),
            Some("modern-gradient")
        );
        assert!(matches!(
            editor.current_layout(),
            LayoutRegime::GradientTitle { .. }
        ));
    }
}
