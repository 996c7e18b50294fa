use super::error::DiffError;
use crate::diff::structured::{Change, ChangeType};
use crate::models::deck::Deck;
use similar::{ChangeTag, TextDiff};
use std::{collections::BTreeMap, fmt::Write};

/// Unified diff of the two decks' pretty JSON.
pub(crate) fn generate_git_diff(
    old_deck: &Deck,
    new_deck: &Deck,
    structured_changes: &[Change],
) -> Result<String, DiffError> {
    let old_str = serde_json::to_string_pretty(old_deck)?;
    let new_str = serde_json::to_string_pretty(new_deck)?;
    let diff = TextDiff::from_lines(&old_str, &new_str);

    let mut output = String::new();
    writeln!(output, "--- a/deck.json")?;
    writeln!(output, "+++ b/deck.json")?;

    if structured_changes.is_empty() && old_str == new_str {
        output.push_str("\nNo changes detected.\n");
        return Ok(output);
    }

    for group in diff.grouped_ops(3) {
        let (old_line, new_line) = group
            .first()
            .map_or((0, 0), |op| (op.old_range().start + 1, op.new_range().start + 1));
        let old_len: usize = group.iter().map(|op| op.old_range().len()).sum();
        let new_len: usize = group.iter().map(|op| op.new_range().len()).sum();
        writeln!(output, "@@ -{},{} +{},{} @@", old_line, old_len, new_line, new_len)?;

        for op in group {
            for change in diff.iter_inline_changes(&op) {
                let sign = match change.tag() {
                    ChangeTag::Delete => '-',
                    ChangeTag::Insert => '+',
                    ChangeTag::Equal => ' ',
                };
                write!(output, "{}", sign)?;
                for &(_emphasized, value) in change.values() {
                    write!(output, "{}", value)?;
                }
                if change.missing_newline() {
                    writeln!(output)?;
                }
            }
        }
    }

    Ok(output)
}

/// Splits `slides[3].textboxes[0].text` into `(3, "textboxes[0].text")`.
fn parse_slide_path(path: &str) -> Option<(usize, String)> {
    let rest = path.strip_prefix("slides[")?;
    let end = rest.find(']')?;
    let index = rest[..end].parse().ok()?;
    let remaining = rest[end + 1..].trim_start_matches('.').to_string();
    Some((index, remaining))
}

/// Per-slide, human-readable list of what changed.
///
/// With `is_simplify`, element locations are left out of each line.
pub(crate) fn generate_readable_summary(
    changes: &[Change],
    is_simplify: bool,
) -> Result<String, DiffError> {
    let mut changes_by_slide: BTreeMap<usize, Vec<String>> = BTreeMap::new();
    let mut deck_changes: Vec<String> = Vec::new();
    let mut counts = (0, 0, 0);

    for change in changes {
        match parse_slide_path(&change.path) {
            Some((index, remaining)) if remaining.is_empty() => {
                deck_changes.push(describe_slide_change(index, &change.change_type));
            }
            Some((index, remaining)) => {
                let line = describe_line(change, &remaining, is_simplify);
                changes_by_slide.entry(index).or_default().push(line);
            }
            None => deck_changes.push(describe_line(change, &change.path, is_simplify)),
        }
        count(&mut counts, &change.change_type);
    }

    let total = counts.0 + counts.1 + counts.2;
    let mut summary = format!(
        "## Summary:\nDetected {} changes: {} additions, {} removals, {} modifications.",
        total, counts.0, counts.1, counts.2
    );
    if total == 0 {
        summary.push_str("\n\nNo changes detected.");
        return Ok(summary);
    }

    summary.push_str("\n\n## Details:");
    if !deck_changes.is_empty() {
        summary.push_str("\n\n### Deck:\n");
        summary.push_str(&deck_changes.join("\n"));
    }
    for (slide_index, lines) in &changes_by_slide {
        write!(summary, "\n\n### Slide {}:\n", slide_index + 1)?;
        summary.push_str(&lines.join("\n"));
    }
    Ok(summary)
}

fn count(counts: &mut (usize, usize, usize), change_type: &ChangeType) {
    match change_type {
        ChangeType::Added => counts.0 += 1,
        ChangeType::Removed => counts.1 += 1,
        ChangeType::Modified => counts.2 += 1,
    }
}

fn describe_slide_change(index: usize, change_type: &ChangeType) -> String {
    match change_type {
        ChangeType::Added => format!("- Added slide {}", index + 1),
        ChangeType::Removed => format!("- Removed slide {}", index + 1),
        ChangeType::Modified => format!("- Replaced slide {}", index + 1),
    }
}

fn describe_line(change: &Change, remaining_path: &str, is_simplify: bool) -> String {
    let desc = describe_change_target(remaining_path);
    let location = format_location(&map_path_to_friendly_name(remaining_path), is_simplify);
    let line = match (&change.change_type, &change.old_value, &change.new_value) {
        (ChangeType::Added, _, _) => format!("- Added {}", desc),
        (ChangeType::Removed, _, _) => format!("- Removed {}", desc),
        (ChangeType::Modified, Some(old), Some(new)) => format!(
            "- Changed {} from {} to {}",
            desc,
            old.format_for_display(),
            new.format_for_display()
        ),
        (ChangeType::Modified, _, _) => format!("- Modified {}", desc),
    };
    if location.is_empty() {
        line
    } else {
        format!("{} {}", line, location)
    }
}

fn format_location(friendly_element_path: &str, is_simplify: bool) -> String {
    if friendly_element_path.is_empty() || is_simplify {
        String::new()
    } else {
        format!("(at `{}`)", friendly_element_path)
    }
}

/// Names what changed from the tail of the path.
fn describe_change_target(remaining_path: &str) -> String {
    let last = remaining_path
        .rsplit('.')
        .next()
        .unwrap_or(remaining_path);
    // `textboxes[2]` / `images[0]` name whole elements.
    if last.ends_with(']') {
        return match last.split('[').next() {
            Some("textboxes") => "Text Box",
            Some("images") => "Image",
            Some("spans") => "Inline Style",
            _ => "Item",
        }
        .to_string();
    }
    let name = match last {
        "text" => "Text Content",
        "x" | "y" => "Position",
        "width" | "height" => "Size",
        "fontFamily" => "Font Family",
        "fontSize" => "Font Size",
        "fillColor" => "Text Color",
        "bold" => "Bold Style",
        "italic" => "Italic Style",
        "underline" => "Underline Style",
        "align" => "Alignment",
        "lineHeight" | "paragraphSpacing" => "Paragraph Spacing",
        "bullets" => "Bullets",
        "highlight" => "Highlight",
        "zIndex" => "Stacking Order",
        "src" => "Image Source",
        "fill" => "Background Color",
        "template" => "Background Template",
        "image" => "Legacy Image",
        "" => "Item",
        other => return capitalize(other),
    };
    name.to_string()
}

fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        None => "Property".to_string(),
        Some(f) => f.to_uppercase().collect::<String>() + chars.as_str(),
    }
}

fn map_path_to_friendly_name(path: &str) -> String {
    path.replace("textboxes", "TextBox")
        .replace("images", "Image")
        .replace("background.", "Background.")
        .trim_start_matches('.')
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diff::structured::ValueRepr;

    fn modified(path: &str, old: &str, new: &str) -> Change {
        Change {
            path: path.to_string(),
            change_type: ChangeType::Modified,
            old_value: Some(ValueRepr::String(old.to_string())),
            new_value: Some(ValueRepr::String(new.to_string())),
        }
    }

    #[test]
    fn summary_groups_by_slide() {
        let changes = vec![
            modified("slides[1].textboxes[0].text", "Old", "New"),
            modified("slides[0].background.fill", "#ffffff", "#000000"),
            Change {
                path: "slides[2]".to_string(),
                change_type: ChangeType::Added,
                old_value: None,
                new_value: None,
            },
        ];
        let summary = generate_readable_summary(&changes, false).unwrap();
        assert!(summary.contains("Detected 3 changes: 1 additions, 0 removals, 2 modifications."));
        assert!(summary.contains("### Deck:\n- Added slide 3"));
        assert!(summary.contains(
            "### Slide 1:\n- Changed Background Color from '#ffffff' to '#000000' (at `Background.fill`)"
        ));
        assert!(summary.contains(
            "### Slide 2:\n- Changed Text Content from 'Old' to 'New' (at `TextBox[0].text`)"
        ));
    }

    #[test]
    fn simplified_summary_drops_locations() {
        let changes = vec![modified("slides[0].textboxes[1].fontFamily", "Arial", "Georgia")];
        let summary = generate_readable_summary(&changes, true).unwrap();
        assert!(summary.ends_with("- Changed Font Family from 'Arial' to 'Georgia'"));
        assert!(!summary.contains("(at"));
    }

    #[test]
    fn names_whole_elements() {
        assert_eq!(describe_change_target("images[2]"), "Image");
        assert_eq!(describe_change_target("textboxes[0]"), "Text Box");
        assert_eq!(describe_change_target("textboxes[0].zIndex"), "Stacking Order");
    }

    #[test]
    fn unchanged_decks_report_nothing() {
        let deck = Deck::default();
        let out = generate_git_diff(&deck, &deck, &[]).unwrap();
        assert!(out.contains("No changes detected."));
        let summary = generate_readable_summary(&[], false).unwrap();
        assert!(summary.ends_with("No changes detected."));
    }
}
