//! Renders text boxes to the HTML/CSS the canvas view layer injects.
//!
//! # Rules
//! *   Bulleted text is split on `\n`; every non-blank line gets a bullet glyph,
//!     blank lines become a bare `<br>`.
//! *   Inline spans wrap their char range in `<strong>`, `<em>` and `<u>`.
//! *   All text content is HTML-escaped.
//! *   Style values lose every character that could end a CSS value or declaration.

use std::fmt::Write;

use crate::models::textbox::{InlineSpan, TextBox};

pub const BULLET_GLYPH: &str = "\u{2022}";

/// Escapes special HTML characters for use in element content.
pub fn escape_html_text(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}

/// Escapes a value placed inside a double-quoted attribute.
pub fn escape_html_attr(text: &str) -> String {
    escape_html_text(text).replace('"', "&quot;")
}

/// A user-supplied CSS value (font family, color) that cannot break out of its
/// declaration, safe inside a double-quoted `style` attribute.
pub fn css_value(text: &str) -> String {
    let kept: String = text
        .chars()
        .filter(|c| !matches!(c, '\'' | '"' | ';' | '{' | '}' | '\\' | '<' | '>') && !c.is_control())
        .collect();
    escape_html_attr(kept.trim())
}

/// CSS declarations for a text box's own (box-level) formatting.
pub fn text_box_style(tb: &TextBox) -> String {
    let mut css = String::new();
    // Writing into a String cannot fail.
    let _ = write!(
        css,
        "font-family:'{}'; font-size:{}px; color:{}; text-align:{}; line-height:{};",
        css_value(&tb.font_family),
        tb.font_size,
        css_value(&tb.fill_color),
        tb.align.as_css(),
        tb.line_height
    );
    css.push_str(if tb.bold {
        " font-weight:bold;"
    } else {
        " font-weight:normal;"
    });
    if tb.italic {
        css.push_str(" font-style:italic;");
    }
    if tb.underline {
        css.push_str(" text-decoration:underline;");
    }
    if let Some(highlight) = &tb.highlight {
        let _ = write!(css, " background-color:{};", css_value(highlight));
    }
    if tb.paragraph_spacing.value() > 0 {
        let _ = write!(css, " margin-bottom:{}px;", tb.paragraph_spacing.value());
    }
    css
}

/// Renders the text content of a box, applying inline spans and the bullet rule.
pub fn render_text_html(tb: &TextBox) -> String {
    let chars: Vec<char> = tb.text.chars().collect();
    let mut html = String::new();
    let mut line_start = 0;

    // Lines are rendered separately so bullets never end up inside a span.
    for (line_no, line) in tb.text.split('\n').enumerate() {
        let line_len = line.chars().count();
        let line_end = line_start + line_len;
        if line_no > 0 && !tb.bullets {
            html.push_str("<br>");
        }
        if tb.bullets {
            if line.trim().is_empty() {
                html.push_str("<br>");
            } else {
                html.push_str("<div>");
                html.push_str(BULLET_GLYPH);
                html.push(' ');
                render_range(&chars, line_start, line_end, &tb.spans, &mut html);
                html.push_str("</div>");
            }
        } else {
            render_range(&chars, line_start, line_end, &tb.spans, &mut html);
        }
        // Skip the '\n' itself.
        line_start = line_end + 1;
    }
    html
}

/// Renders `chars[start..end]`, splitting it at span boundaries.
fn render_range(chars: &[char], start: usize, end: usize, spans: &[InlineSpan], out: &mut String) {
    let mut cuts: Vec<usize> = vec![start, end];
    for span in spans {
        for edge in [span.start, span.end] {
            if edge > start && edge < end {
                cuts.push(edge);
            }
        }
    }
    cuts.sort_unstable();
    cuts.dedup();

    for pair in cuts.windows(2) {
        let (a, b) = (pair[0], pair[1]);
        if a >= b {
            continue;
        }
        let segment: String = chars[a..b].iter().collect();
        let escaped = escape_html_text(&segment);
        let covering: Vec<&InlineSpan> = spans
            .iter()
            .filter(|s| s.start <= a && s.end >= b)
            .collect();
        let bold = covering.iter().any(|s| s.bold);
        let italic = covering.iter().any(|s| s.italic);
        let underline = covering.iter().any(|s| s.underline);

        if bold {
            out.push_str("<strong>");
        }
        if italic {
            out.push_str("<em>");
        }
        if underline {
            out.push_str("<u>");
        }
        out.push_str(&escaped);
        if underline {
            out.push_str("</u>");
        }
        if italic {
            out.push_str("</em>");
        }
        if bold {
            out.push_str("</strong>");
        }
    }
}
