//! Error types for notecard-core.
//!
//! The pipeline itself never fails; malformed input degrades to empty or
//! degenerate output. The only fallible seam is the note source, and the
//! scan orchestration absorbs those failures by skipping the note.

use thiserror::Error;

/// Result type alias for note-source operations.
pub type Result<T> = std::result::Result<T, SourceError>;

/// Errors a [`NoteSource`](crate::scan::NoteSource) implementation may report.
#[derive(Debug, Error)]
pub enum SourceError {
    #[error("note not found: {path}")]
    NotFound { path: String },

    #[error("failed to read note {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
}
