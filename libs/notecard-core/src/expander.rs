//! Expansion of raw question blocks into front/back pairs.

use crate::cloze::{self, ClozeSpan};
use crate::settings::ParserSettings;
use crate::types::{CardType, FrontBackPair, RawQuestionBlock};

/// Hidden-answer placeholder used when a cloze occurrence carries no hint.
const HIDDEN: &str = "[...]";

/// Derive the quizzable pairs of a block, dispatched on its card type.
///
/// Never fails: a block whose separator cannot be located contributes
/// nothing, and a cloze block without markup degenerates to a single
/// identity pair.
pub fn expand(block: &RawQuestionBlock, settings: &ParserSettings) -> Vec<FrontBackPair> {
    let text = strip_schedule_comment(&block.text);
    match block.card_type {
        CardType::SingleLineBasic => split_inline(text, &settings.single_line_separator, false),
        CardType::SingleLineReversed => {
            split_inline(text, &settings.single_line_reversed_separator, true)
        }
        CardType::MultiLineBasic => split_lines(text, &settings.multi_line_separator, false),
        CardType::MultiLineReversed => {
            split_lines(text, &settings.multi_line_reversed_separator, true)
        }
        CardType::Cloze => expand_cloze(text, settings),
    }
}

/// The schedule extractor has already read any trailing `<!--SR:…-->`
/// comment; it must not leak into a card side.
fn strip_schedule_comment(text: &str) -> &str {
    match text.rfind("<!--SR:") {
        Some(idx) => text[..idx].trim_end(),
        None => text,
    }
}

fn split_inline(text: &str, separator: &str, reversed: bool) -> Vec<FrontBackPair> {
    if separator.is_empty() {
        return Vec::new();
    }
    let Some(idx) = text.find(separator) else {
        return Vec::new();
    };
    let side1 = text[..idx].trim();
    let side2 = text[idx + separator.len()..].trim();
    let mut pairs = vec![FrontBackPair::new(side1, side2)];
    if reversed {
        pairs.push(FrontBackPair::new(side2, side1));
    }
    pairs
}

fn split_lines(text: &str, separator: &str, reversed: bool) -> Vec<FrontBackPair> {
    if separator.is_empty() {
        return Vec::new();
    }
    let lines: Vec<&str> = text.lines().collect();
    let Some(idx) = lines.iter().position(|l| l.trim() == separator) else {
        return Vec::new();
    };
    let side1 = lines[..idx].join("\n").trim().to_string();
    let side2 = lines[idx + 1..].join("\n").trim().to_string();
    let mut pairs = vec![FrontBackPair::new(side1.clone(), side2.clone())];
    if reversed {
        pairs.push(FrontBackPair::new(side2, side1));
    }
    pairs
}

/// One pair per cloze occurrence, in appearance order. The front of pair *i*
/// hides occurrence *i* behind its placeholder and reveals every other
/// occurrence; the back reveals them all.
fn expand_cloze(text: &str, settings: &ParserSettings) -> Vec<FrontBackPair> {
    let spans = cloze::find_cloze_spans(text, settings);
    if spans.is_empty() {
        let identity = text.trim();
        return vec![FrontBackPair::new(identity, identity)];
    }

    let back = render(text, &spans, |_, span| span.answer.clone());
    spans
        .iter()
        .enumerate()
        .map(|(hidden_idx, _)| {
            let front = render(text, &spans, |idx, span| {
                if idx == hidden_idx {
                    placeholder(span)
                } else {
                    span.answer.clone()
                }
            });
            FrontBackPair::new(front, back.clone())
        })
        .collect()
}

fn placeholder(span: &ClozeSpan) -> String {
    match &span.hint {
        Some(hint) => format!("[{hint}]"),
        None => HIDDEN.to_string(),
    }
}

/// Substitute every span by byte range. Positional by construction: two
/// occurrences with identical literal markup are still replaced
/// independently.
fn render(
    text: &str,
    spans: &[ClozeSpan],
    substitute: impl Fn(usize, &ClozeSpan) -> String,
) -> String {
    let mut out = String::with_capacity(text.len());
    let mut pos = 0;
    for (idx, span) in spans.iter().enumerate() {
        out.push_str(&text[pos..span.start]);
        out.push_str(&substitute(idx, span));
        pos = span.end;
    }
    out.push_str(&text[pos..]);
    out.trim().to_string()
}
