use crate::models::{
    deck::Deck,
    slide::Slide,
    textbox::{TextBox, TextKind},
};
use std::cmp::Ordering;
use std::fmt::Write; // Import Write trait for formatting

// --- Helper Function for Sorting ---

/// Compares two text boxes by their vertical position, then horizontal.
fn compare_boxes_by_position(a: &TextBox, b: &TextBox) -> Ordering {
    a.y.partial_cmp(&b.y)
        .unwrap_or(Ordering::Equal)
        .then_with(|| a.x.partial_cmp(&b.x).unwrap_or(Ordering::Equal))
}

// --- Text Extraction Logic ---

/// Formats one text box as Markdown. Titles become `###` headings, bulleted bodies list items.
fn extract_text_from_box(tb: &TextBox) -> Option<String> {
    let trimmed = tb.text.trim();
    if trimmed.is_empty() {
        return None;
    }
    match tb.kind {
        TextKind::Title => Some(format!("### {}", trimmed.replace('\n', " "))),
        TextKind::Body if tb.bullets => {
            let items: Vec<String> = trimmed
                .lines()
                .map(str::trim)
                .filter(|line| !line.is_empty())
                .map(|line| format!("- {}", line))
                .collect();
            Some(items.join("\n"))
        }
        TextKind::Body => Some(trimmed.to_string()),
    }
}

/// Extracts and concatenates text from all text boxes on a single slide, sorted top to bottom.
fn extract_text_from_slide(slide: &Slide) -> Option<String> {
    let mut sorted: Vec<&TextBox> = slide.textboxes.iter().collect();
    sorted.sort_by(|a, b| compare_boxes_by_position(a, b));

    let mut slide_parts: Vec<String> = sorted
        .into_iter()
        .filter_map(extract_text_from_box)
        .collect();

    let image_count = slide.images.len() + usize::from(slide.image.is_some());
    if image_count > 0 {
        slide_parts.push(format!("_[{} image(s)]_", image_count));
    }

    if slide_parts.is_empty() {
        None
    } else {
        Some(slide_parts.join("\n\n"))
    }
}

// --- Public API Function ---

/// Extracts text from all slides in a deck as a Markdown outline.
///
/// Slides without any text or images are skipped, but keep their 1-based number
/// in the headers of the following slides.
pub fn deck_to_markdown(deck: &Deck, title: Option<&str>) -> String {
    let mut full_text = String::new();

    // Writing into a String cannot fail.
    let _ = writeln!(full_text, "# {}", title.unwrap_or("Presentation"));
    full_text.push('\n');

    let mut first_slide = true;
    for (index, slide) in deck.slides().iter().enumerate() {
        if let Some(slide_content) = extract_text_from_slide(slide) {
            if !first_slide {
                let _ = writeln!(full_text, "\n---\n");
            } else {
                first_slide = false;
            }
            let _ = writeln!(full_text, "## Slide {}\n", index + 1);
            let _ = writeln!(full_text, "{}", slide_content);
        }
    }

    full_text
}
