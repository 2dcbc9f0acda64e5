//! Tree structure management operations for OrderedIndex.
//!
//! This module contains tree-level queries about the overall shape: size,
//! height, node counts, arena statistics, and the descent used by every
//! keyed operation.

use crate::compact_arena::CompactArenaStats;
use crate::error::{BPlusTreeError, TreeResult};
use crate::types::{NodeId, NodeRef, OrderedIndex};

// ============================================================================
// TREE STRUCTURE OPERATIONS
// ============================================================================

impl<K: Ord + Clone, V> OrderedIndex<K, V> {
    /// Returns the number of entries in the index.
    pub fn len(&self) -> usize {
        self.leaf_chain().map(|keys| keys.len()).sum()
    }

    /// Returns true if the index holds no entries.
    pub fn is_empty(&self) -> bool {
        match self.root {
            NodeRef::Leaf(id) => self.get_leaf(id).map_or(true, |leaf| leaf.is_empty()),
            NodeRef::Branch(_) => false,
        }
    }

    /// Returns true if the root is a leaf node.
    pub fn is_leaf_root(&self) -> bool {
        self.root.is_leaf()
    }

    /// Number of levels from the root down to the leaves (1 for a leaf root).
    pub fn height(&self) -> usize {
        let mut height = 1;
        let mut current = self.root;

        while let NodeRef::Branch(id) = current {
            match self.get_branch(id).and_then(|branch| branch.children.first()) {
                Some(child) => {
                    current = *child;
                    height += 1;
                }
                None => break,
            }
        }
        height
    }

    /// Returns the number of leaf nodes in the tree.
    pub fn leaf_count(&self) -> usize {
        self.leaf_count_recursive(self.root)
    }

    /// Recursively count leaf nodes with proper arena access.
    fn leaf_count_recursive(&self, node: NodeRef) -> usize {
        match node {
            NodeRef::Leaf(_) => 1,
            NodeRef::Branch(id) => self
                .get_branch(id)
                .map(|branch| {
                    branch
                        .children
                        .iter()
                        .map(|child| self.leaf_count_recursive(*child))
                        .sum()
                })
                .unwrap_or(0),
        }
    }

    /// Count the number of leaf and branch nodes actually in the tree structure.
    pub fn count_nodes_in_tree(&self) -> (usize, usize) {
        self.count_nodes_recursive(self.root)
    }

    /// Recursively count nodes in the tree.
    fn count_nodes_recursive(&self, node: NodeRef) -> (usize, usize) {
        match node {
            NodeRef::Leaf(_) => (1, 0),
            NodeRef::Branch(id) => {
                if let Some(branch) = self.get_branch(id) {
                    let mut total_leaves = 0;
                    let mut total_branches = 1;

                    for child in &branch.children {
                        let (child_leaves, child_branches) = self.count_nodes_recursive(*child);
                        total_leaves += child_leaves;
                        total_branches += child_branches;
                    }

                    (total_leaves, total_branches)
                } else {
                    (0, 0)
                }
            }
        }
    }

    /// Get statistics for the leaf node arena.
    pub fn leaf_arena_stats(&self) -> CompactArenaStats {
        self.leaf_arena.stats()
    }

    /// Get statistics for the branch node arena.
    pub fn branch_arena_stats(&self) -> CompactArenaStats {
        self.branch_arena.stats()
    }

    // ============================================================================
    // TREE NAVIGATION HELPERS
    // ============================================================================

    /// Get the ID of the first (leftmost) leaf in the tree
    pub fn get_first_leaf_id(&self) -> Option<NodeId> {
        self.edge_leaf_id(|children| children.first())
    }

    /// Get the ID of the last (rightmost) leaf in the tree
    pub fn get_last_leaf_id(&self) -> Option<NodeId> {
        self.edge_leaf_id(|children| children.last())
    }

    fn edge_leaf_id(&self, pick: impl Fn(&[NodeRef]) -> Option<&NodeRef>) -> Option<NodeId> {
        let mut current = self.root;

        loop {
            match current {
                NodeRef::Leaf(leaf_id) => return Some(leaf_id),
                NodeRef::Branch(branch_id) => {
                    current = *pick(&self.get_branch(branch_id)?.children)?;
                }
            }
        }
    }

    /// Descend from the root to the leaf whose key range contains `key`.
    #[inline]
    pub(crate) fn find_leaf_id(&self, key: &K) -> TreeResult<NodeId> {
        let mut current = self.root;

        loop {
            match current {
                NodeRef::Leaf(leaf_id) => return Ok(leaf_id),
                NodeRef::Branch(branch_id) => {
                    let branch = self.branch(branch_id)?;
                    current = branch.get_child(key).ok_or_else(|| {
                        BPlusTreeError::corrupted_tree(
                            "Descent",
                            &format!("branch {} has no child for the search key", branch_id),
                        )
                    })?;
                }
            }
        }
    }

    /// Leaf ids in left-to-right tree order (depth-first, not via the chain).
    pub(crate) fn leaf_ids_in_order(&self) -> Vec<NodeId> {
        let mut ids = Vec::new();
        self.collect_leaf_ids(self.root, &mut ids);
        ids
    }

    fn collect_leaf_ids(&self, node: NodeRef, ids: &mut Vec<NodeId>) {
        match node {
            NodeRef::Leaf(id) => ids.push(id),
            NodeRef::Branch(id) => {
                if let Some(branch) = self.get_branch(id) {
                    for child in &branch.children {
                        self.collect_leaf_ids(*child, ids);
                    }
                }
            }
        }
    }
}
