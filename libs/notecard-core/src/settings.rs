//! Parser configuration.
//!
//! An immutable settings value is passed into every segmentation, expansion
//! and extraction call. Fields missing from a deserialized settings document
//! fall back to the defaults below.

use serde::{Deserialize, Serialize};

/// Separator tokens, cloze-conversion flags and scan options.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ParserSettings {
    /// Inline separator for one-line question::answer cards.
    pub single_line_separator: String,
    /// Inline separator for one-line cards reviewed in both directions.
    pub single_line_reversed_separator: String,
    /// A line equal to this token splits a multi-line card.
    pub multi_line_separator: String,
    /// Multi-line split token for cards reviewed in both directions.
    pub multi_line_reversed_separator: String,
    /// Optional token ending a multi-line card. When set, blank lines no
    /// longer terminate blocks and may appear inside card text.
    pub multi_line_end_marker: Option<String>,
    pub convert_highlights_to_clozes: bool,
    pub convert_bold_to_clozes: bool,
    pub convert_curly_brackets_to_clozes: bool,
    /// Ease assigned to pairs with no persisted schedule.
    pub base_ease: u32,
    /// Glob patterns for folders excluded from scans. Matching is done by
    /// the caller's ignore predicate; the patterns only travel here.
    pub ignored_folders: Vec<String>,
}

impl Default for ParserSettings {
    fn default() -> Self {
        Self {
            single_line_separator: "::".to_string(),
            single_line_reversed_separator: ":::".to_string(),
            multi_line_separator: "?".to_string(),
            multi_line_reversed_separator: "??".to_string(),
            multi_line_end_marker: None,
            convert_highlights_to_clozes: true,
            convert_bold_to_clozes: false,
            convert_curly_brackets_to_clozes: false,
            base_ease: 250,
            ignored_folders: Vec::new(),
        }
    }
}

impl ParserSettings {
    /// The configured end marker, if it is set and non-empty.
    pub fn end_marker(&self) -> Option<&str> {
        self.multi_line_end_marker
            .as_deref()
            .filter(|m| !m.trim().is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn defaults_match_documented_values() {
        let s = ParserSettings::default();
        assert_eq!(s.single_line_separator, "::");
        assert_eq!(s.single_line_reversed_separator, ":::");
        assert_eq!(s.multi_line_separator, "?");
        assert_eq!(s.multi_line_reversed_separator, "??");
        assert_eq!(s.multi_line_end_marker, None);
        assert!(s.convert_highlights_to_clozes);
        assert!(!s.convert_bold_to_clozes);
        assert!(!s.convert_curly_brackets_to_clozes);
        assert_eq!(s.base_ease, 250);
        assert!(s.ignored_folders.is_empty());
    }

    #[test]
    fn missing_fields_fall_back_to_defaults() {
        let s: ParserSettings =
            serde_json::from_str(r#"{"single_line_separator": ">>", "base_ease": 130}"#)
                .unwrap();
        assert_eq!(s.single_line_separator, ">>");
        assert_eq!(s.base_ease, 130);
        assert_eq!(s.multi_line_separator, "?");
        assert!(s.convert_highlights_to_clozes);
    }

    #[test]
    fn blank_end_marker_counts_as_unset() {
        let mut s = ParserSettings::default();
        s.multi_line_end_marker = Some("   ".to_string());
        assert_eq!(s.end_marker(), None);
        s.multi_line_end_marker = Some("---".to_string());
        assert_eq!(s.end_marker(), Some("---"));
    }
}
