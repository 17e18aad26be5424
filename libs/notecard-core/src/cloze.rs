//! Cloze markup scanning.
//!
//! Pure functions returning ordered match spans over the input text. Spans
//! carry byte offsets so that later substitution is positional: the Nth
//! occurrence is replaced by range, never by content, which keeps two cloze
//! groups with identical literal markup distinct.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::settings::ParserSettings;

/// `{{c<optional digits>::<answer>}}` / `{{c<optional digits>::<answer>::<hint>}}`
static EXPLICIT_CLOZE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\{\{c\d*::(.+?)\}\}").expect("explicit cloze pattern"));

static HIGHLIGHT: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"==(.+?)==").expect("highlight pattern"));

static BOLD: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\*\*(.+?)\*\*").expect("bold pattern"));

static CURLY: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\{\{(.+?)\}\}").expect("curly bracket pattern"));

/// One cloze occurrence: the byte span of the full markup plus the revealed
/// answer text and optional hint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClozeSpan {
    pub start: usize,
    pub end: usize,
    pub answer: String,
    pub hint: Option<String>,
}

impl ClozeSpan {
    fn overlaps(&self, start: usize, end: usize) -> bool {
        start < self.end && self.start < end
    }
}

/// All cloze occurrences in `text`, in appearance order.
///
/// Explicit `{{c::…}}` markup is always recognized; highlight, bold and
/// curly-bracket spans are folded in according to the conversion flags, with
/// explicit matches winning on overlap. The numeric group id is cosmetic and
/// does not affect ordering.
pub fn find_cloze_spans(text: &str, settings: &ParserSettings) -> Vec<ClozeSpan> {
    let mut spans: Vec<ClozeSpan> = Vec::new();

    for caps in EXPLICIT_CLOZE.captures_iter(text) {
        let (Some(whole), Some(inner)) = (caps.get(0), caps.get(1)) else {
            continue;
        };
        let (answer, hint) = match inner.as_str().split_once("::") {
            Some((answer, hint)) => (answer, Some(hint.to_string())),
            None => (inner.as_str(), None),
        };
        spans.push(ClozeSpan {
            start: whole.start(),
            end: whole.end(),
            answer: answer.to_string(),
            hint,
        });
    }

    let legacy: [(bool, &Lazy<Regex>); 3] = [
        (settings.convert_highlights_to_clozes, &HIGHLIGHT),
        (settings.convert_bold_to_clozes, &BOLD),
        (settings.convert_curly_brackets_to_clozes, &CURLY),
    ];
    for (enabled, pattern) in legacy {
        if !enabled {
            continue;
        }
        for caps in pattern.captures_iter(text) {
            let (Some(whole), Some(inner)) = (caps.get(0), caps.get(1)) else {
                continue;
            };
            if spans.iter().any(|s| s.overlaps(whole.start(), whole.end())) {
                continue;
            }
            spans.push(ClozeSpan {
                start: whole.start(),
                end: whole.end(),
                answer: inner.as_str().to_string(),
                hint: None,
            });
        }
    }

    spans.sort_by_key(|s| s.start);
    spans
}

/// Whether a single line carries any cloze markup the current settings
/// recognize. Used by the segmenter to classify blocks.
pub fn contains_cloze_markup(line: &str, settings: &ParserSettings) -> bool {
    EXPLICIT_CLOZE.is_match(line)
        || (settings.convert_highlights_to_clozes && HIGHLIGHT.is_match(line))
        || (settings.convert_bold_to_clozes && BOLD.is_match(line))
        || (settings.convert_curly_brackets_to_clozes && CURLY.is_match(line))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn explicit_spans_in_appearance_order() {
        let text = "The {{c2::capital}} of France is {{c1::Paris}}.";
        let spans = find_cloze_spans(text, &ParserSettings::default());
        assert_eq!(spans.len(), 2);
        assert_eq!(spans[0].answer, "capital");
        assert_eq!(spans[1].answer, "Paris");
        assert!(spans[0].start < spans[1].start);
    }

    #[test]
    fn hint_is_split_off_the_answer() {
        let spans = find_cloze_spans("{{c1::Paris::city}}", &ParserSettings::default());
        assert_eq!(spans.len(), 1);
        assert_eq!(spans[0].answer, "Paris");
        assert_eq!(spans[0].hint.as_deref(), Some("city"));
    }

    #[test]
    fn group_id_is_optional() {
        let spans = find_cloze_spans("{{c::answer}}", &ParserSettings::default());
        assert_eq!(spans.len(), 1);
        assert_eq!(spans[0].answer, "answer");
    }

    #[test]
    fn highlight_spans_honor_the_flag() {
        let mut settings = ParserSettings::default();
        let spans = find_cloze_spans("a ==b== c", &settings);
        assert_eq!(spans.len(), 1);
        assert_eq!(spans[0].answer, "b");

        settings.convert_highlights_to_clozes = false;
        assert!(find_cloze_spans("a ==b== c", &settings).is_empty());
    }

    #[test]
    fn curly_flag_does_not_double_count_explicit_markup() {
        let mut settings = ParserSettings::default();
        settings.convert_curly_brackets_to_clozes = true;
        let spans = find_cloze_spans("{{c1::x}} and {{y}}", &settings);
        assert_eq!(spans.len(), 2);
        assert_eq!(spans[0].answer, "x");
        assert_eq!(spans[1].answer, "y");
    }

    #[test]
    fn identical_literal_markup_yields_distinct_spans() {
        let spans = find_cloze_spans("{{c1::same}} or {{c1::same}}", &ParserSettings::default());
        assert_eq!(spans.len(), 2);
        assert_ne!(spans[0].start, spans[1].start);
        assert_eq!(spans[0].answer, spans[1].answer);
    }

    #[test]
    fn line_classification_tracks_flags() {
        let mut settings = ParserSettings::default();
        assert!(contains_cloze_markup("x {{c1::y}}", &settings));
        assert!(contains_cloze_markup("x ==y==", &settings));
        assert!(!contains_cloze_markup("x **y**", &settings));
        settings.convert_bold_to_clozes = true;
        assert!(contains_cloze_markup("x **y**", &settings));
        assert!(!contains_cloze_markup("plain text", &settings));
    }
}
