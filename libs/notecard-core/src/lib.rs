//! Core library for extracting flashcards embedded in freeform notes.
//!
//! Provides:
//! - Segmenter: recognizes question blocks in note text (single-line,
//!   multi-line, reversed and cloze dialects)
//! - Expander: derives front/back pairs from a block
//! - Schedule extractor: recovers persisted due/interval/ease markers
//! - Deck tree builder: hierarchical deck aggregation with on-demand counts
//! - Scan orchestration and snapshot publication over a note collection
//!
//! The pipeline is pure and synchronous; file I/O, deck-path derivation and
//! presentation live behind the seams in [`scan`].

pub mod cloze;
pub mod deck;
pub mod error;
pub mod expander;
pub mod scan;
pub mod schedule;
pub mod segmenter;
pub mod settings;
pub mod snapshot;
pub mod types;

pub use cloze::{find_cloze_spans, ClozeSpan};
pub use deck::{DeckNode, DeckTree, DEFAULT_DECK};
pub use error::{Result, SourceError};
pub use expander::expand;
pub use scan::{scan, DeckResolver, DeckTally, NoteSource, ScanResult};
pub use schedule::extract_schedules;
pub use segmenter::segment;
pub use settings::ParserSettings;
pub use snapshot::ScanSnapshot;
pub use types::{CardRecord, CardType, FrontBackPair, RawQuestionBlock, ScheduleRecord};
