//! Whole-collection scan orchestration.
//!
//! Wires the pipeline across every note a source provides: segment, expand
//! and extract per note, zip into card records per resolved deck path, then
//! aggregate into the deck tree. File reading and deck-path derivation stay
//! behind the [`NoteSource`] and [`DeckResolver`] seams; a failing note is
//! skipped and the batch continues.

use std::collections::{BTreeMap, BTreeSet, HashSet};

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::deck::DeckTree;
use crate::error::Result;
use crate::expander;
use crate::schedule;
use crate::segmenter;
use crate::settings::ParserSettings;
use crate::types::CardRecord;

/// Supplies note identifiers and already-read note text.
pub trait NoteSource {
    fn notes(&self) -> Vec<String>;
    fn read_note(&self, path: &str) -> Result<String>;
}

/// Maps a note to the deck paths its cards belong to, derived from folder
/// structure or tag hierarchy. A note resolving to no deck is not scanned.
pub trait DeckResolver {
    fn deck_paths(&self, note_path: &str) -> Vec<String>;
}

/// New/due counts for one deck path.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeckTally {
    pub new_cards: usize,
    pub due_cards: usize,
}

/// The complete materialized result of one scan. Card list and deck tree are
/// always rebuilt together; the tree's indices refer into `cards`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScanResult {
    pub cards: Vec<CardRecord>,
    pub deck_tree: DeckTree,
    /// Distinct deck paths encountered, sorted.
    pub deck_paths: Vec<String>,
    /// Per-deck-path new/due counts relative to the scan's `today`.
    pub tallies: BTreeMap<String, DeckTally>,
}

/// Run the full pipeline over every note of `source`.
///
/// `ignore` is the caller's glob predicate over note paths; `today` anchors
/// the due-card tallies so the scan itself stays a pure function of its
/// inputs.
pub fn scan(
    source: &dyn NoteSource,
    resolver: &dyn DeckResolver,
    ignore: &dyn Fn(&str) -> bool,
    settings: &ParserSettings,
    today: NaiveDate,
) -> ScanResult {
    let mut cards: Vec<CardRecord> = Vec::new();

    for note_path in source.notes() {
        if ignore(&note_path) {
            tracing::debug!(note = %note_path, "note excluded by ignore predicate");
            continue;
        }
        let text = match source.read_note(&note_path) {
            Ok(text) => text,
            Err(err) => {
                tracing::warn!(note = %note_path, error = %err, "skipping unreadable note");
                continue;
            }
        };

        let deck_paths = resolved_decks(resolver, &note_path);
        if deck_paths.is_empty() {
            continue;
        }

        collect_note_cards(&note_path, &text, &deck_paths, settings, &mut cards);
    }

    let deck_tree = DeckTree::build(&cards);
    let deck_paths: Vec<String> = cards
        .iter()
        .map(|c| c.deck_path.clone())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect();
    let tallies = tally(&cards, today);

    tracing::debug!(
        cards = cards.len(),
        decks = deck_paths.len(),
        "scan complete"
    );

    ScanResult {
        cards,
        deck_tree,
        deck_paths,
        tallies,
    }
}

/// Resolver output with duplicates dropped, first occurrence kept.
fn resolved_decks(resolver: &dyn DeckResolver, note_path: &str) -> Vec<String> {
    let mut seen = HashSet::new();
    resolver
        .deck_paths(note_path)
        .into_iter()
        .filter(|p| seen.insert(p.clone()))
        .collect()
}

fn collect_note_cards(
    note_path: &str,
    text: &str,
    deck_paths: &[String],
    settings: &ParserSettings,
    cards: &mut Vec<CardRecord>,
) {
    for block in segmenter::segment(text, settings) {
        let pairs = expander::expand(&block, settings);
        let schedules = schedule::extract_schedules(&block.text, pairs.len(), settings.base_ease);

        for (deck_idx, deck_path) in deck_paths.iter().enumerate() {
            for (pair_idx, (pair, sched)) in pairs.iter().zip(&schedules).enumerate() {
                cards.push(CardRecord {
                    id: card_id(note_path, block.first_line, pair_idx, deck_idx),
                    deck_path: deck_path.clone(),
                    file_path: note_path.to_string(),
                    line: block.first_line,
                    front: pair.front.clone(),
                    back: pair.back.clone(),
                    ease: sched.ease,
                    interval: sched.interval,
                    due: sched.due.clone(),
                });
            }
        }
    }
}

/// File path + block start line + pair index; a deck ordinal is appended
/// only when a note fans out to more than one deck, keeping ids unique
/// within the scan.
fn card_id(note_path: &str, line: usize, pair_idx: usize, deck_idx: usize) -> String {
    if deck_idx == 0 {
        format!("{note_path}:{line}:{pair_idx}")
    } else {
        format!("{note_path}:{line}:{pair_idx}:{deck_idx}")
    }
}

fn tally(cards: &[CardRecord], today: NaiveDate) -> BTreeMap<String, DeckTally> {
    let mut tallies: BTreeMap<String, DeckTally> = BTreeMap::new();
    for card in cards {
        let entry = tallies.entry(card.deck_path.clone()).or_default();
        if card.is_new() {
            entry.new_cards += 1;
            continue;
        }
        // An unparseable due date counts as neither new nor due.
        if let Some(due) = card.due.as_deref() {
            if let Ok(date) = NaiveDate::parse_from_str(due, "%Y-%m-%d") {
                if date <= today {
                    entry.due_cards += 1;
                }
            }
        }
    }
    tallies
}
