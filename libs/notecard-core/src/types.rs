//! Core types for the note-flashcard pipeline.

use serde::{Deserialize, Serialize};

/// Markup dialect a question block was written in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CardType {
    SingleLineBasic,
    SingleLineReversed,
    MultiLineBasic,
    MultiLineReversed,
    Cloze,
}

/// A contiguous span of note text recognized as encoding one card.
///
/// `first_line`/`last_line` are the inclusive, 0-based span of retained
/// content. Immutable once produced by the segmenter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawQuestionBlock {
    pub card_type: CardType,
    pub text: String,
    pub first_line: usize,
    pub last_line: usize,
}

/// One quizzable front/back direction derived from a block.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FrontBackPair {
    pub front: String,
    pub back: String,
}

impl FrontBackPair {
    pub fn new(front: impl Into<String>, back: impl Into<String>) -> Self {
        Self {
            front: front.into(),
            back: back.into(),
        }
    }
}

/// Previously persisted due/interval/ease state recovered from note text.
///
/// Positionally aligned with the pair list of its owning block.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScheduleRecord {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub due: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub interval: Option<u32>,
    pub ease: u32,
}

impl ScheduleRecord {
    /// Record for a pair position with no persisted schedule.
    pub fn unscheduled(base_ease: u32) -> Self {
        Self {
            due: None,
            interval: None,
            ease: base_ease,
        }
    }
}

/// A fully resolved card: one pair zipped with its schedule and deck path.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CardRecord {
    /// Unique within a scan; derived from file path, block start line and
    /// pair index.
    pub id: String,
    pub deck_path: String,
    pub file_path: String,
    /// 0-based line the owning block starts on.
    pub line: usize,
    pub front: String,
    pub back: String,
    pub ease: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub interval: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub due: Option<String>,
}

impl CardRecord {
    /// Whether the card has never been scheduled.
    pub fn is_new(&self) -> bool {
        self.due.is_none()
    }
}
