//! Hierarchical deck aggregation.
//!
//! The tree is arena-backed: nodes own nothing but indices, so parent
//! back-references and card references never form ownership cycles. The tree
//! is always rebuilt from scratch from the full card list, never patched.

use std::cmp::Ordering;

use serde::{Deserialize, Serialize};

use crate::types::CardRecord;

/// Deck segment used when a card's deck path has no usable segments.
pub const DEFAULT_DECK: &str = "Default";

/// One deck in the hierarchy. `parent`, `children` and `cards` are indices
/// into the owning [`DeckTree`] arena and the card list the tree was built
/// from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeckNode {
    pub name: String,
    pub parent: Option<usize>,
    pub children: Vec<usize>,
    pub cards: Vec<usize>,
}

/// Deck hierarchy with a sentinel root at index 0.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeckTree {
    nodes: Vec<DeckNode>,
}

impl DeckTree {
    pub const ROOT: usize = 0;

    /// Place every card under its deck path, creating missing decks on the
    /// way, then sort all sibling lists by name for deterministic
    /// presentation order.
    pub fn build(cards: &[CardRecord]) -> Self {
        let mut tree = Self {
            nodes: vec![DeckNode {
                name: String::new(),
                parent: None,
                children: Vec::new(),
                cards: Vec::new(),
            }],
        };

        for (card_idx, card) in cards.iter().enumerate() {
            let mut segments: Vec<&str> = card
                .deck_path
                .split('/')
                .filter(|s| !s.is_empty())
                .collect();
            if segments.is_empty() {
                segments.push(DEFAULT_DECK);
            }

            let mut node = Self::ROOT;
            for segment in segments {
                node = tree.child_named(node, segment);
            }
            tree.nodes[node].cards.push(card_idx);
        }

        tree.sort_children();
        tree
    }

    fn child_named(&mut self, parent: usize, name: &str) -> usize {
        let existing = self.nodes[parent]
            .children
            .iter()
            .copied()
            .find(|&c| self.nodes[c].name == name);
        if let Some(idx) = existing {
            return idx;
        }

        let idx = self.nodes.len();
        self.nodes.push(DeckNode {
            name: name.to_string(),
            parent: Some(parent),
            children: Vec::new(),
            cards: Vec::new(),
        });
        self.nodes[parent].children.push(idx);
        idx
    }

    /// Case-insensitive primary order with a byte-order tiebreak, so the
    /// sort stays deterministic and idempotent across rebuilds.
    fn compare_names(a: &str, b: &str) -> Ordering {
        a.to_lowercase()
            .cmp(&b.to_lowercase())
            .then_with(|| a.cmp(b))
    }

    fn sort_children(&mut self) {
        for idx in 0..self.nodes.len() {
            let mut children = std::mem::take(&mut self.nodes[idx].children);
            children.sort_by(|&a, &b| Self::compare_names(&self.nodes[a].name, &self.nodes[b].name));
            self.nodes[idx].children = children;
        }
    }

    pub fn root(&self) -> &DeckNode {
        &self.nodes[Self::ROOT]
    }

    pub fn node(&self, idx: usize) -> &DeckNode {
        &self.nodes[idx]
    }

    /// Number of decks, the sentinel root included.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.len() == 1
    }

    /// Look up a deck by its full `/`-separated path.
    pub fn find(&self, path: &str) -> Option<usize> {
        let mut node = Self::ROOT;
        for segment in path.split('/').filter(|s| !s.is_empty()) {
            node = self.nodes[node]
                .children
                .iter()
                .copied()
                .find(|&c| self.nodes[c].name == segment)?;
        }
        (node != Self::ROOT).then_some(node)
    }

    /// Cards directly at the deck plus all descendants. Recomputed on every
    /// call so it can never go stale across rebuilds.
    pub fn total_count(&self, idx: usize) -> usize {
        let node = &self.nodes[idx];
        node.cards.len()
            + node
                .children
                .iter()
                .map(|&c| self.total_count(c))
                .sum::<usize>()
    }

    /// Reconstruct a deck's full path by walking the parent links.
    pub fn full_path(&self, idx: usize) -> String {
        let mut segments = Vec::new();
        let mut current = idx;
        while current != Self::ROOT {
            segments.push(self.nodes[current].name.as_str());
            match self.nodes[current].parent {
                Some(parent) => current = parent,
                None => break,
            }
        }
        segments.reverse();
        segments.join("/")
    }
}
