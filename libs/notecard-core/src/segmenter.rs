//! Line-oriented segmentation of note text into raw question blocks.
//!
//! A single forward pass over the note's lines. Per line, in priority order:
//! HTML comments (other than scheduling markers) are skipped whole, fenced
//! code is captured verbatim, blank lines and the configured end marker
//! terminate blocks, and everything else accumulates into the current block
//! while being checked for card-type markup.

use crate::cloze;
use crate::settings::ParserSettings;
use crate::types::{CardType, RawQuestionBlock};

/// Scan `text` and produce its question blocks in order of appearance.
///
/// Never fails: text with no recognizable markup yields an empty list.
pub fn segment(text: &str, settings: &ParserSettings) -> Vec<RawQuestionBlock> {
    let lines: Vec<&str> = text.lines().collect();
    let mut state = Accumulator::new();
    let mut fence: Option<Fence> = None;

    let mut i = 0;
    while i < lines.len() {
        let line = lines[i];

        // Fence interiors are captured without any markup scanning.
        if let Some(open) = fence {
            state.push(line, i, true);
            if open.closes(line) {
                fence = None;
            }
            i += 1;
            continue;
        }

        // HTML comments other than scheduling markers contribute nothing.
        if line.starts_with("<!--") && !line.starts_with("<!--SR:") {
            while i < lines.len() && !lines[i].contains("-->") {
                i += 1;
            }
            i += 1;
            continue;
        }

        if let Some(open) = Fence::opened_by(line) {
            fence = Some(open);
            state.push(line, i, true);
            i += 1;
            continue;
        }

        if line.trim().is_empty() {
            // With an end marker configured, a typed block may span blank
            // lines; otherwise a blank line is a terminator/boundary reset.
            if settings.end_marker().is_some() && state.card_type.is_some() {
                state.push(line, i, false);
            } else {
                state.flush();
            }
            i += 1;
            continue;
        }

        if settings.end_marker() == Some(line.trim()) {
            state.flush();
            i += 1;
            continue;
        }

        state.push(line, i, true);

        if let Some(card_type) = detect_single_line(line, settings) {
            // A single-line card is exactly this line; any accumulation so
            // far is discarded.
            state.card_type = Some(card_type);
            state.reset_to(line, i);
            if i + 1 < lines.len() && lines[i + 1].starts_with("<!--SR:") {
                i += 1;
                state.push(lines[i], i, true);
            }
            state.flush();
            i += 1;
            continue;
        }

        let trimmed = line.trim();
        if trimmed == settings.multi_line_reversed_separator && state.has_prior_content() {
            state.card_type = Some(CardType::MultiLineReversed);
        } else if trimmed == settings.multi_line_separator && state.has_prior_content() {
            state.card_type = Some(CardType::MultiLineBasic);
        } else if state.card_type.is_none() && cloze::contains_cloze_markup(line, settings) {
            state.card_type = Some(CardType::Cloze);
        }

        i += 1;
    }
    state.flush();
    state.blocks
}

/// The block being accumulated, plus all finished blocks.
struct Accumulator<'a> {
    blocks: Vec<RawQuestionBlock>,
    card_type: Option<CardType>,
    buf: Vec<&'a str>,
    first_line: usize,
    last_content_line: usize,
}

impl<'a> Accumulator<'a> {
    fn new() -> Self {
        Self {
            blocks: Vec::new(),
            card_type: None,
            buf: Vec::new(),
            first_line: 0,
            last_content_line: 0,
        }
    }

    fn push(&mut self, line: &'a str, idx: usize, is_content: bool) {
        if self.buf.is_empty() {
            self.first_line = idx;
        }
        self.buf.push(line);
        if is_content {
            self.last_content_line = idx;
        }
    }

    /// The separator line has been appended already, so "at least one prior
    /// content line" means two or more buffered lines.
    fn has_prior_content(&self) -> bool {
        self.buf.len() >= 2
    }

    fn reset_to(&mut self, line: &'a str, idx: usize) {
        self.buf.clear();
        self.buf.push(line);
        self.first_line = idx;
        self.last_content_line = idx;
    }

    /// Emit the accumulated block if it was assigned a type; untyped
    /// accumulations are dropped.
    fn flush(&mut self) {
        if let Some(card_type) = self.card_type.take() {
            self.blocks.push(RawQuestionBlock {
                card_type,
                text: self.buf.join("\n").trim_end().to_string(),
                first_line: self.first_line,
                last_line: self.last_content_line,
            });
        }
        self.buf.clear();
    }
}

/// A fenced code region: three or more backticks or tildes, closed by a
/// fence of the same character at the same or greater length.
#[derive(Debug, Clone, Copy)]
struct Fence {
    marker: char,
    len: usize,
}

impl Fence {
    fn opened_by(line: &str) -> Option<Self> {
        let trimmed = line.trim_start();
        for marker in ['`', '~'] {
            let len = trimmed.chars().take_while(|&c| c == marker).count();
            if len >= 3 {
                return Some(Self { marker, len });
            }
        }
        None
    }

    fn closes(self, line: &str) -> bool {
        let trimmed = line.trim();
        !trimmed.is_empty()
            && trimmed.chars().all(|c| c == self.marker)
            && trimmed.chars().count() >= self.len
    }
}

fn detect_single_line(line: &str, settings: &ParserSettings) -> Option<CardType> {
    let basic = settings.single_line_separator.as_str();
    let reversed = settings.single_line_reversed_separator.as_str();

    // Longest token first, so a reversed separator sharing a prefix with the
    // basic one is never misread as basic.
    let candidates = if basic.len() > reversed.len() {
        [
            (CardType::SingleLineBasic, basic),
            (CardType::SingleLineReversed, reversed),
        ]
    } else {
        [
            (CardType::SingleLineReversed, reversed),
            (CardType::SingleLineBasic, basic),
        ]
    };

    for (card_type, separator) in candidates {
        if separator.is_empty() {
            continue;
        }
        if find_outside_inline_code(line, separator).is_some() {
            return Some(card_type);
        }
    }
    None
}

/// First occurrence of `separator` not enclosed in an inline code span. A
/// match counts as enclosed when the backtick count is odd both before and
/// after it on the line.
fn find_outside_inline_code(line: &str, separator: &str) -> Option<usize> {
    let mut from = 0;
    while let Some(offset) = line[from..].find(separator) {
        let start = from + offset;
        let end = start + separator.len();
        let before = line[..start].matches('`').count();
        let after = line[end..].matches('`').count();
        if before % 2 == 1 && after % 2 == 1 {
            from = end;
            continue;
        }
        return Some(start);
    }
    None
}
