use serde::{Deserialize, Serialize};

use crate::models::{
    common::ElementId,
    image::ZOrderCommand,
    textbox::{Alignment, StyleFlag, TextKind},
};

/// The element the user last clicked on the current slide.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "id", rename_all = "camelCase")]
pub enum Selected {
    TextBox(ElementId),
    Image(ElementId),
}

/// Where keyboard focus was when Backspace/Delete was pressed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum KeyFocus {
    /// Inside a contenteditable text container.
    EditableText,
    /// Anywhere else (canvas, toolbar, body).
    Canvas,
}

/// A char range inside a text box, end exclusive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TextRange {
    pub start: usize,
    pub end: usize,
}

/// One editing command as sent by the view layer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "camelCase", rename_all_fields = "camelCase")]
pub enum Command {
    /// Inserts a default slide after `at_index` (the current slide when absent).
    AddSlide {
        #[serde(default)]
        at_index: Option<usize>,
    },
    DeleteSlide {
        index: usize,
    },
    SelectSlide {
        index: usize,
    },
    SetBackgroundFill {
        index: usize,
        color: String,
    },
    AddTextBox {
        kind: TextKind,
    },
    EditText {
        id: ElementId,
        text: String,
    },
    MoveText {
        id: ElementId,
        dx: f64,
        dy: f64,
    },
    SetTextPosition {
        id: ElementId,
        x: f64,
        y: f64,
    },
    ResizeText {
        id: ElementId,
        width: f64,
        height: f64,
    },
    DeleteTextBox {
        id: ElementId,
    },
    /// Whole-box toggle, or an inline span when a non-empty `range` is given.
    ToggleStyle {
        id: ElementId,
        flag: StyleFlag,
        #[serde(default)]
        range: Option<TextRange>,
    },
    SetAlignment {
        id: ElementId,
        align: Alignment,
    },
    SetFontFamily {
        id: ElementId,
        family: String,
    },
    SetFontSize {
        id: ElementId,
        size: f64,
    },
    SetFillColor {
        id: ElementId,
        color: String,
    },
    SetParagraphSpacing {
        id: ElementId,
        value: u8,
    },
    ToggleBullets {
        id: ElementId,
    },
    SetHighlight {
        id: ElementId,
        #[serde(default)]
        color: Option<String>,
    },
    /// Appends already-read image sources (data URIs or URLs) as one batch.
    AddImages {
        sources: Vec<String>,
    },
    MoveImage {
        id: ElementId,
        x: f64,
        y: f64,
    },
    ResizeImage {
        id: ElementId,
        width: f64,
        height: f64,
    },
    SetImageZOrder {
        id: ElementId,
        order: ZOrderCommand,
    },
    SetSelectedImageZOrder {
        order: ZOrderCommand,
    },
    RemoveImage {
        id: ElementId,
    },
    RemoveAllImages,
    RemoveLegacyImage,
    Select {
        #[serde(default)]
        target: Option<Selected>,
    },
    DeleteSelected {
        focus: KeyFocus,
    },
}

/// What [`crate::editor::Editor::apply`] did with a command.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "camelCase")]
pub enum CommandOutcome {
    Applied { changed: bool },
    Ignored { reason: String },
}

impl CommandOutcome {
    pub fn changed(&self) -> bool {
        matches!(self, CommandOutcome::Applied { changed: true })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn parses_view_layer_commands() {
        let cmd: Command = serde_json::from_value(json!({
            "op": "toggleStyle",
            "id": "t1",
            "flag": "bold",
            "range": { "start": 0, "end": 4 }
        }))
        .unwrap();
        assert_eq!(
            cmd,
            Command::ToggleStyle {
                id: ElementId::new("t1"),
                flag: StyleFlag::Bold,
                range: Some(TextRange { start: 0, end: 4 }),
            }
        );

        let cmd: Command = serde_json::from_value(json!({
            "op": "setSelectedImageZOrder",
            "order": "to-front"
        }))
        .unwrap();
        assert_eq!(
            cmd,
            Command::SetSelectedImageZOrder {
                order: ZOrderCommand::ToFront
            }
        );

        let cmd: Command = serde_json::from_value(json!({ "op": "addSlide" })).unwrap();
        assert_eq!(cmd, Command::AddSlide { at_index: None });

        let cmd: Command = serde_json::from_value(json!({
            "op": "select",
            "target": { "kind": "image", "id": "img-1" }
        }))
        .unwrap();
        assert_eq!(
            cmd,
            Command::Select {
                target: Some(Selected::Image(ElementId::new("img-1")))
            }
        );
    }

    #[test]
    fn unknown_op_is_rejected() {
        assert!(serde_json::from_value::<Command>(json!({ "op": "explode" })).is_err());
    }
}
