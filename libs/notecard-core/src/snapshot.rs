//! Single-writer publication of scan results.
//!
//! Rebuilds are disposable whole artifacts: callers recompute a
//! [`ScanResult`] wholesale and publish it here. Readers always see either
//! the previous complete result or the new one, never a partial update. A
//! generation counter orders concurrent rebuilds; a stale rebuild finishing
//! late is rejected instead of overwriting newer data.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, RwLock};

use crate::scan::ScanResult;

pub struct ScanSnapshot {
    state: RwLock<Published>,
    next_generation: AtomicU64,
}

struct Published {
    generation: u64,
    result: Option<Arc<ScanResult>>,
}

impl ScanSnapshot {
    pub fn new() -> Self {
        Self {
            state: RwLock::new(Published {
                generation: 0,
                result: None,
            }),
            next_generation: AtomicU64::new(0),
        }
    }

    /// Reserve a generation for a rebuild that is about to start.
    pub fn begin_rebuild(&self) -> u64 {
        self.next_generation.fetch_add(1, Ordering::SeqCst) + 1
    }

    /// Publish a completed rebuild. Returns `false` when a newer generation
    /// has already been published, in which case the result is discarded.
    pub fn publish(&self, generation: u64, result: ScanResult) -> bool {
        let mut state = self.state.write().expect("snapshot lock");
        if generation <= state.generation {
            return false;
        }
        state.generation = generation;
        state.result = Some(Arc::new(result));
        true
    }

    /// The latest published result, if any scan has completed yet.
    pub fn load(&self) -> Option<Arc<ScanResult>> {
        self.state.read().expect("snapshot lock").result.clone()
    }

    pub fn generation(&self) -> u64 {
        self.state.read().expect("snapshot lock").generation
    }
}

impl Default for ScanSnapshot {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::deck::DeckTree;
    use std::collections::BTreeMap;

    fn empty_result() -> ScanResult {
        ScanResult {
            cards: Vec::new(),
            deck_tree: DeckTree::build(&[]),
            deck_paths: Vec::new(),
            tallies: BTreeMap::new(),
        }
    }

    #[test]
    fn nothing_is_visible_before_the_first_publish() {
        let snapshot = ScanSnapshot::new();
        assert!(snapshot.load().is_none());
        assert_eq!(snapshot.generation(), 0);
    }

    #[test]
    fn publish_makes_the_result_visible() {
        let snapshot = ScanSnapshot::new();
        let generation = snapshot.begin_rebuild();
        assert!(snapshot.publish(generation, empty_result()));
        assert!(snapshot.load().is_some());
        assert_eq!(snapshot.generation(), generation);
    }

    #[test]
    fn stale_rebuilds_are_rejected() {
        let snapshot = ScanSnapshot::new();
        let older = snapshot.begin_rebuild();
        let newer = snapshot.begin_rebuild();

        assert!(snapshot.publish(newer, empty_result()));
        assert!(!snapshot.publish(older, empty_result()));
        assert_eq!(snapshot.generation(), newer);
    }

    #[test]
    fn generations_are_monotonic() {
        let snapshot = ScanSnapshot::new();
        let a = snapshot.begin_rebuild();
        let b = snapshot.begin_rebuild();
        let c = snapshot.begin_rebuild();
        assert!(a < b && b < c);
    }
}
