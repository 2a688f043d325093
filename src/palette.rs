//! Color palette and styling for CLI output.
//!
//! This module defines a consistent visual style for all CLI output.

use owo_colors::{OwoColorize, Style};

use crate::plan::Outcome;

/// Style for section headings like "=== Agents ===".
pub fn heading() -> Style {
    Style::new().white().bold()
}

/// Style for labels like "Dry run:" or "tools:".
pub fn label() -> Style {
    Style::new().blue()
}

/// Style for path values.
pub fn path() -> Style {
    Style::new().white()
}

/// Style for secondary text.
pub fn dimmed() -> Style {
    Style::new().dimmed()
}

/// Style for an outcome tag.
pub fn outcome(outcome: Outcome) -> Style {
    match outcome {
        Outcome::Copied => Style::new().green(),
        Outcome::Flattened => Style::new().cyan(),
        Outcome::Converted => Style::new().magenta(),
        Outcome::SkippedNoContent => Style::new().dimmed(),
        Outcome::SkippedNoHeader => Style::new().yellow(),
    }
}

/// Apply a style when color is enabled.
fn styled(text: &str, style: Style, use_color: bool) -> String {
    if use_color {
        text.style(style).to_string()
    } else {
        text.to_string()
    }
}

/// Format a section heading with styling.
pub fn fmt_heading(text: &str, use_color: bool) -> String {
    styled(text, heading(), use_color)
}

/// Format a label with styling.
pub fn fmt_label(text: &str, use_color: bool) -> String {
    styled(text, label(), use_color)
}

/// Format a path with styling.
pub fn fmt_path(text: &str, use_color: bool) -> String {
    styled(text, path(), use_color)
}

/// Format secondary text with styling.
pub fn fmt_dimmed(text: &str, use_color: bool) -> String {
    styled(text, dimmed(), use_color)
}

/// Format an outcome as a bracketed tag, e.g. `[CONVERT]`.
pub fn fmt_outcome(outcome: Outcome, use_color: bool) -> String {
    let tag = format!("[{}]", outcome.label().to_uppercase());
    styled(&tag, self::outcome(outcome), use_color)
}

#[cfg(test)]
mod tests {
    use super::fmt_outcome;
    use crate::plan::Outcome;

    #[test]
    fn plain_outcome_tags() {
        assert_eq!(fmt_outcome(Outcome::Converted, false), "[CONVERT]");
        assert_eq!(fmt_outcome(Outcome::SkippedNoHeader, false), "[WARN]");
    }
}
