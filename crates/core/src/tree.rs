//! Huffman tree construction.
//!
//! Leaves are built from a [`FrequencyTable`], pushed into a min-priority
//! queue, and the two lightest nodes are merged until one root remains.
//!
//! # Tie-break rule
//!
//! Nodes are ordered by `(weight, smallest symbol in the subtree)`. Live
//! subtrees always hold disjoint symbol sets, so no two queue entries compare
//! equal and the merge order is fully determined by the input. Of the two
//! nodes popped for a merge, the first becomes the left child (bit `0`) and
//! the second the right child (bit `1`).
//!
//! # Complexity
//!
//! O(u log u) for u distinct symbols: each of the u - 1 merges costs two pops
//! and one push on a heap of at most u entries.

use std::cmp::Ordering;
use std::collections::BinaryHeap;

use crate::error::{HuffmanError, Result};
use crate::frequency::FrequencyTable;
use crate::symbol::Symbol;

/// A node of a strictly full binary tree.
///
/// Internal nodes own both children outright, so merging consumes two
/// subtrees and produces one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Node<S: Symbol> {
    /// Exactly one symbol and its occurrence count
    Leaf { symbol: S, weight: u64 },

    /// Two children whose weights sum to `weight`
    Internal {
        weight: u64,
        /// Smallest symbol anywhere below this node (tie-break key)
        min_symbol: S,
        left: Box<Node<S>>,
        right: Box<Node<S>>,
    },
}

impl<S: Symbol> Node<S> {
    /// Merge two subtrees under a new internal node.
    pub fn merge(left: Node<S>, right: Node<S>) -> Self {
        Node::Internal {
            weight: left.weight() + right.weight(),
            min_symbol: left.min_symbol().min(right.min_symbol()),
            left: Box::new(left),
            right: Box::new(right),
        }
    }

    pub fn weight(&self) -> u64 {
        match self {
            Node::Leaf { weight, .. } | Node::Internal { weight, .. } => *weight,
        }
    }

    /// Smallest symbol in this subtree.
    pub fn min_symbol(&self) -> S {
        match self {
            Node::Leaf { symbol, .. } => *symbol,
            Node::Internal { min_symbol, .. } => *min_symbol,
        }
    }

    /// Total nodes in this subtree, leaves included.
    pub fn node_count(&self) -> usize {
        match self {
            Node::Leaf { .. } => 1,
            Node::Internal { left, right, .. } => 1 + left.node_count() + right.node_count(),
        }
    }

    /// Number of leaves in this subtree.
    pub fn leaf_count(&self) -> usize {
        match self {
            Node::Leaf { .. } => 1,
            Node::Internal { left, right, .. } => left.leaf_count() + right.leaf_count(),
        }
    }

    /// Length of the longest root-to-leaf path (0 for a lone leaf).
    pub fn depth(&self) -> usize {
        match self {
            Node::Leaf { .. } => 0,
            Node::Internal { left, right, .. } => 1 + left.depth().max(right.depth()),
        }
    }
}

/// Queue entry ordering nodes so the lightest pops first from a max-heap.
struct QueueEntry<S: Symbol>(Node<S>);

impl<S: Symbol> QueueEntry<S> {
    fn key(&self) -> (u64, S) {
        (self.0.weight(), self.0.min_symbol())
    }
}

impl<S: Symbol> PartialEq for QueueEntry<S> {
    fn eq(&self, other: &Self) -> bool {
        self.key() == other.key()
    }
}

impl<S: Symbol> Eq for QueueEntry<S> {}

impl<S: Symbol> Ord for QueueEntry<S> {
    fn cmp(&self, other: &Self) -> Ordering {
        // Reversed: BinaryHeap pops the greatest entry
        other.key().cmp(&self.key())
    }
}

impl<S: Symbol> PartialOrd for QueueEntry<S> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// A finished Huffman tree. Immutable once built.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HuffmanTree<S: Symbol> {
    root: Node<S>,
}

impl<S: Symbol> HuffmanTree<S> {
    /// Build the tree for a frequency distribution.
    ///
    /// A single distinct symbol yields a tree that is just one leaf.
    ///
    /// # Errors
    /// Returns `HuffmanError::EmptyInput` if the table has no symbols.
    pub fn build(freqs: &FrequencyTable<S>) -> Result<Self> {
        let mut queue: BinaryHeap<QueueEntry<S>> = freqs
            .iter()
            .map(|(symbol, weight)| QueueEntry(Node::Leaf { symbol, weight }))
            .collect();

        while queue.len() > 1 {
            if let (Some(QueueEntry(left)), Some(QueueEntry(right))) = (queue.pop(), queue.pop()) {
                queue.push(QueueEntry(Node::merge(left, right)));
            }
        }

        let root = queue.pop().ok_or(HuffmanError::EmptyInput)?.0;

        tracing::debug!(
            leaves = root.leaf_count(),
            nodes = root.node_count(),
            depth = root.depth(),
            weight = root.weight(),
            "built huffman tree"
        );

        Ok(Self { root })
    }

    /// Count frequencies in `input` and build its tree.
    pub fn from_input(input: &[S]) -> Result<Self> {
        Self::build(&FrequencyTable::count(input)?)
    }

    pub fn root(&self) -> &Node<S> {
        &self.root
    }
}
