//! Construction and initialization logic for OrderedIndex and nodes.
//!
//! This module contains order validation, arena initialization, and the
//! constructors for leaf and branch nodes.

use crate::compact_arena::CompactArena;
use crate::error::{BPlusTreeError, BTreeResult, InitResult};
use crate::types::{BranchNode, LeafNode, NodeRef, OrderedIndex, MIN_ORDER, NULL_NODE};

/// Default order for OrderedIndex nodes
pub const DEFAULT_ORDER: usize = 16;

impl<K, V> OrderedIndex<K, V> {
    /// Create an index with the specified order.
    ///
    /// # Arguments
    ///
    /// * `order` - Maximum number of children per branch (minimum 3)
    ///
    /// # Returns
    ///
    /// Returns `Ok(OrderedIndex)` if the order is valid, an
    /// `InvalidConfiguration` error otherwise.
    ///
    /// # Examples
    ///
    /// ```
    /// use ordered_index::OrderedIndex;
    ///
    /// let index = OrderedIndex::<i64, Vec<String>>::new(3).unwrap();
    /// assert!(index.is_empty());
    ///
    /// assert!(OrderedIndex::<i64, Vec<String>>::new(2).is_err());
    /// ```
    pub fn new(order: usize) -> InitResult<Self> {
        Self::with_arenas(order, CompactArena::new(), CompactArena::new())
    }

    /// Create an index whose leaf and branch arenas each hold at most
    /// `max_nodes` nodes. Inserts that would need more nodes fail with an
    /// `ArenaError` and leave the index unchanged.
    pub fn with_node_limit(order: usize, max_nodes: usize) -> InitResult<Self> {
        if max_nodes == 0 {
            return Err(BPlusTreeError::InvalidConfiguration(
                "Node limit must allow at least the root leaf".to_string(),
            ));
        }
        Self::with_arenas(
            order,
            CompactArena::with_limit(max_nodes),
            CompactArena::with_limit(max_nodes),
        )
    }

    /// Create an index with the default order.
    ///
    /// This is equivalent to calling `new(DEFAULT_ORDER)`.
    pub fn with_default_order() -> InitResult<Self> {
        Self::new(DEFAULT_ORDER)
    }

    fn with_arenas(
        order: usize,
        mut leaf_arena: CompactArena<LeafNode<K, V>>,
        branch_arena: CompactArena<BranchNode<K>>,
    ) -> InitResult<Self> {
        validation::validate_order(order)?;

        let root_id = leaf_arena.allocate(LeafNode::new(order - 1))?;

        Ok(Self {
            order,
            root: NodeRef::Leaf(root_id),
            leaf_arena,
            branch_arena,
        })
    }

    /// The configured order (maximum children per branch).
    pub fn order(&self) -> usize {
        self.order
    }

    /// Maximum number of keys any node may hold.
    pub fn max_keys(&self) -> usize {
        self.order - 1
    }
}

impl<K, V> LeafNode<K, V> {
    /// Creates a new, unlinked leaf node holding at most `capacity` keys.
    pub fn new(capacity: usize) -> Self {
        // One slot of headroom for the key that triggers a split
        Self {
            capacity,
            keys: Vec::with_capacity(capacity + 1),
            values: Vec::with_capacity(capacity + 1),
            next: NULL_NODE,
            parent: NULL_NODE,
        }
    }
}

impl<K> BranchNode<K> {
    /// Creates a new, empty branch node holding at most `capacity` keys.
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity,
            keys: Vec::with_capacity(capacity + 1),
            children: Vec::with_capacity(capacity + 2),
            parent: NULL_NODE,
        }
    }

    /// Creates a root branch over two children split apart at `separator`.
    pub fn new_root(capacity: usize, separator: K, left: NodeRef, right: NodeRef) -> Self {
        let mut root = Self::new(capacity);
        root.keys.push(separator);
        root.children.push(left);
        root.children.push(right);
        root
    }
}

impl<K, V> Default for OrderedIndex<K, V> {
    /// Create an index with the default order.
    fn default() -> Self {
        match Self::with_default_order() {
            Ok(index) => index,
            Err(err) => unreachable!("default order rejected: {}", err),
        }
    }
}

/// Validation utilities for construction
pub mod validation {
    use super::*;

    /// Validate that an order is usable.
    ///
    /// # Returns
    ///
    /// Returns `Ok(())` if valid, an `InvalidConfiguration` error otherwise.
    pub fn validate_order(order: usize) -> BTreeResult<()> {
        if order < MIN_ORDER {
            Err(BPlusTreeError::invalid_order(order, MIN_ORDER))
        } else {
            Ok(())
        }
    }

    /// Suggest an order for an expected number of loaded rows.
    ///
    /// Larger loads get wider nodes so the tree stays shallow.
    pub fn recommended_order(expected_rows: usize) -> usize {
        if expected_rows < 100 {
            4
        } else if expected_rows < 10_000 {
            DEFAULT_ORDER
        } else if expected_rows < 1_000_000 {
            64
        } else {
            128
        }
    }
}
