//! Core types and data structures for OrderedIndex.
//!
//! This module contains the fundamental data structures, type definitions,
//! and constants used throughout the index implementation.

use crate::compact_arena::CompactArena;

// ============================================================================
// CONSTANTS
// ============================================================================

/// Smallest order (maximum children per branch) that still splits meaningfully.
pub const MIN_ORDER: usize = 3;

// ============================================================================
// TYPE DEFINITIONS
// ============================================================================

/// Node ID type for arena-based allocation
pub type NodeId = u32;

/// Sentinel for "no node": end of the leaf chain, or the root's parent.
pub const NULL_NODE: NodeId = u32::MAX;

/// A payload row as handed over by a loader: field values in source-column order.
pub type Row = Vec<String>;

/// The index shape used by record loaders: integer keys, string rows.
pub type RowIndex = OrderedIndex<i64, Row>;

// ============================================================================
// CORE DATA STRUCTURES
// ============================================================================

/// In-memory B+ tree index.
///
/// All payloads live in leaf nodes. Leaves are chained left to right so that a
/// full scan never has to climb back through the branches. Every node lives in
/// one of two arenas and refers to its parent by arena index, which lets
/// splits propagate upward without searching the tree for the owner of a node.
///
/// # Type Parameters
///
/// * `K` - Key type, `Ord + Clone`
/// * `V` - Payload type
///
/// # Examples
///
/// ```
/// use ordered_index::OrderedIndex;
///
/// let mut index = OrderedIndex::new(4).unwrap();
/// index.insert(42, vec!["a".to_string(), "b".to_string()]).unwrap();
///
/// assert_eq!(index.get(&42).map(|row| row.len()), Some(2));
/// assert!(!index.contains_key(&7));
/// ```
///
/// # Order
///
/// The order is the maximum number of children a branch may have, so every
/// node holds at most `order - 1` keys. It is fixed at construction and must
/// be at least 3.
#[derive(Debug)]
pub struct OrderedIndex<K, V> {
    /// Maximum number of children per branch node.
    pub(crate) order: usize,
    /// The root node of the tree.
    pub(crate) root: NodeRef,
    /// Arena storage for leaf nodes.
    pub(crate) leaf_arena: CompactArena<LeafNode<K, V>>,
    /// Arena storage for branch nodes.
    pub(crate) branch_arena: CompactArena<BranchNode<K>>,
}

/// Leaf node containing keys and their payloads.
#[derive(Debug, Clone)]
pub struct LeafNode<K, V> {
    /// Maximum number of keys this node can hold.
    pub(crate) capacity: usize,
    /// Sorted list of keys.
    pub(crate) keys: Vec<K>,
    /// Payloads, parallel to `keys`.
    pub(crate) values: Vec<V>,
    /// Next leaf node in the chain.
    pub(crate) next: NodeId,
    /// Owning branch, or `NULL_NODE` for a root leaf.
    pub(crate) parent: NodeId,
}

/// Internal (branch) node containing separator keys and child references.
#[derive(Debug, Clone)]
pub struct BranchNode<K> {
    /// Maximum number of keys this node can hold.
    pub(crate) capacity: usize,
    /// Sorted list of separator keys.
    pub(crate) keys: Vec<K>,
    /// Child nodes; always one more than `keys`.
    pub(crate) children: Vec<NodeRef>,
    /// Owning branch, or `NULL_NODE` for the root.
    pub(crate) parent: NodeId,
}

// ============================================================================
// ENUMS AND RESULT TYPES
// ============================================================================

/// Node reference that can be either a leaf or branch node
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NodeRef {
    Leaf(NodeId),
    Branch(NodeId),
}

impl NodeRef {
    /// Return the raw node ID.
    pub fn id(&self) -> NodeId {
        match *self {
            NodeRef::Leaf(id) => id,
            NodeRef::Branch(id) => id,
        }
    }

    /// Returns true if this reference points to a leaf node.
    pub fn is_leaf(&self) -> bool {
        matches!(self, NodeRef::Leaf(_))
    }
}

/// Outcome of placing a key into a leaf.
pub(crate) enum LeafInsert<V> {
    /// The key already existed; carries the payload it used to hold.
    Replaced(V),
    /// The key was new; the leaf may now be over capacity.
    Inserted,
}
