//! Validation and debugging utilities for OrderedIndex.
//!
//! This module checks every structural invariant of the tree: key order,
//! fanout bounds, child counts, separator placement, uniform leaf depth,
//! parent links, the leaf chain, and arena/tree consistency.

use crate::error::{BPlusTreeError, TreeResult};
use crate::types::{NodeId, NodeRef, OrderedIndex, NULL_NODE};

/// Key bounds a subtree must respect: `lower <= key < upper`.
struct Bounds<'a, K> {
    lower: Option<&'a K>,
    upper: Option<&'a K>,
}

// ============================================================================
// VALIDATION METHODS
// ============================================================================

impl<K: Ord + Clone, V> OrderedIndex<K, V> {
    /// Check if the tree maintains all of its invariants.
    pub fn check_invariants(&self) -> bool {
        self.validate().is_ok()
    }

    /// Check invariants with detailed error reporting.
    pub fn validate(&self) -> TreeResult<()> {
        if self.parent_of(self.root)? != NULL_NODE {
            return Err(BPlusTreeError::corrupted_tree(
                "Root",
                &format!("root {:?} has a parent link", self.root),
            ));
        }

        let mut leaf_depth = None;
        let unbounded = Bounds {
            lower: None,
            upper: None,
        };
        self.check_node(self.root, NULL_NODE, unbounded, 0, &mut leaf_depth)?;

        self.check_leaf_chain()?;
        self.check_arena_tree_consistency()
    }

    /// Recursively check invariants for a node and its children.
    fn check_node(
        &self,
        node: NodeRef,
        expected_parent: NodeId,
        bounds: Bounds<'_, K>,
        depth: usize,
        leaf_depth: &mut Option<usize>,
    ) -> TreeResult<()> {
        let max_keys = self.max_keys();

        match node {
            NodeRef::Leaf(id) => {
                let leaf = self.leaf(id)?;
                let fail = |details: String| {
                    Err(BPlusTreeError::corrupted_tree(&format!("Leaf {}", id), &details))
                };

                if leaf.parent != expected_parent {
                    return fail(format!(
                        "parent link {} but owned by {}",
                        leaf.parent, expected_parent
                    ));
                }
                if leaf.keys.len() != leaf.values.len() {
                    return fail(format!(
                        "{} keys but {} payloads",
                        leaf.keys.len(),
                        leaf.values.len()
                    ));
                }
                if leaf.keys.len() > max_keys {
                    return fail(format!("{} keys exceed the maximum of {}", leaf.keys.len(), max_keys));
                }
                if leaf.keys.is_empty() && node != self.root {
                    return fail("non-root leaf is empty".to_string());
                }
                if leaf.keys.windows(2).any(|pair| pair[0] >= pair[1]) {
                    return fail("keys are not strictly ascending".to_string());
                }
                self.check_bounds(&leaf.keys, &bounds)
                    .map_err(|details| BPlusTreeError::corrupted_tree(&format!("Leaf {}", id), &details))?;

                match *leaf_depth {
                    None => *leaf_depth = Some(depth),
                    Some(expected) if expected != depth => {
                        return fail(format!("at depth {} but other leaves are at depth {}", depth, expected));
                    }
                    Some(_) => {}
                }
                Ok(())
            }
            NodeRef::Branch(id) => {
                let branch = self.branch(id)?;
                let fail = |details: String| {
                    Err(BPlusTreeError::corrupted_tree(&format!("Branch {}", id), &details))
                };

                if branch.parent != expected_parent {
                    return fail(format!(
                        "parent link {} but owned by {}",
                        branch.parent, expected_parent
                    ));
                }
                if branch.keys.len() + 1 != branch.children.len() {
                    return fail(format!(
                        "{} keys but {} children",
                        branch.keys.len(),
                        branch.children.len()
                    ));
                }
                if branch.keys.len() > max_keys {
                    return fail(format!("{} keys exceed the maximum of {}", branch.keys.len(), max_keys));
                }
                if branch.keys.windows(2).any(|pair| pair[0] >= pair[1]) {
                    return fail("keys are not strictly ascending".to_string());
                }
                self.check_bounds(&branch.keys, &bounds)
                    .map_err(|details| BPlusTreeError::corrupted_tree(&format!("Branch {}", id), &details))?;

                for (i, child) in branch.children.iter().enumerate() {
                    if i > 0 {
                        let separator = &branch.keys[i - 1];
                        if self.subtree_min(*child)? != Some(separator) {
                            return fail(format!(
                                "separator {} is not the minimum key of child {:?}",
                                i - 1,
                                child
                            ));
                        }
                    }

                    let child_bounds = Bounds {
                        lower: if i == 0 { bounds.lower } else { Some(&branch.keys[i - 1]) },
                        upper: branch.keys.get(i).or(bounds.upper),
                    };
                    self.check_node(*child, id, child_bounds, depth + 1, leaf_depth)?;
                }
                Ok(())
            }
        }
    }

    fn check_bounds(&self, keys: &[K], bounds: &Bounds<'_, K>) -> Result<(), String> {
        if let (Some(lower), Some(first)) = (bounds.lower, keys.first()) {
            if first < lower {
                return Err("first key is below the subtree's lower bound".to_string());
            }
        }
        if let (Some(upper), Some(last)) = (bounds.upper, keys.last()) {
            if last >= upper {
                return Err("last key is not below the subtree's upper bound".to_string());
            }
        }
        Ok(())
    }

    /// Smallest key stored under `node`.
    fn subtree_min(&self, node: NodeRef) -> TreeResult<Option<&K>> {
        let mut current = node;
        loop {
            match current {
                NodeRef::Leaf(id) => return Ok(self.leaf(id)?.first_key()),
                NodeRef::Branch(id) => match self.branch(id)?.children.first() {
                    Some(child) => current = *child,
                    None => return Ok(None),
                },
            }
        }
    }

    /// Check that the chain visits exactly the tree's leaves, left to right,
    /// and yields strictly ascending keys.
    fn check_leaf_chain(&self) -> TreeResult<()> {
        let tree_order = self.leaf_ids_in_order();

        let mut chain_order = Vec::with_capacity(tree_order.len());
        let mut current = self.get_first_leaf_id();
        while let Some(id) = current {
            if chain_order.len() > tree_order.len() {
                return Err(BPlusTreeError::corrupted_tree(
                    "Leaf chain",
                    "chain is longer than the number of leaves (cycle?)",
                ));
            }
            chain_order.push(id);
            current = self.leaf(id)?.next_leaf();
        }

        if chain_order != tree_order {
            return Err(BPlusTreeError::corrupted_tree(
                "Leaf chain",
                &format!("tree has {:?}, chain has {:?}", tree_order, chain_order),
            ));
        }

        let keys: Vec<&K> = self.keys().collect();
        if let Some(i) = keys.windows(2).position(|pair| pair[0] >= pair[1]) {
            return Err(BPlusTreeError::corrupted_tree(
                "Leaf chain",
                &format!("keys out of order at position {}", i + 1),
            ));
        }
        Ok(())
    }

    /// Check that every allocated node is part of the tree.
    fn check_arena_tree_consistency(&self) -> TreeResult<()> {
        let (tree_leaf_count, tree_branch_count) = self.count_nodes_in_tree();
        let leaf_stats = self.leaf_arena_stats();
        let branch_stats = self.branch_arena_stats();

        if tree_leaf_count != leaf_stats.allocated_count {
            return Err(BPlusTreeError::arena_error(
                "Leaf consistency check",
                &format!(
                    "{} in tree vs {} in arena",
                    tree_leaf_count, leaf_stats.allocated_count
                ),
            ));
        }
        if tree_branch_count != branch_stats.allocated_count {
            return Err(BPlusTreeError::arena_error(
                "Branch consistency check",
                &format!(
                    "{} in tree vs {} in arena",
                    tree_branch_count, branch_stats.allocated_count
                ),
            ));
        }
        Ok(())
    }

    // ============================================================================
    // DEBUGGING AND TESTING UTILITIES
    // ============================================================================

    /// Returns the sizes of all leaf nodes in chain order.
    pub fn leaf_sizes(&self) -> Vec<usize> {
        self.leaf_chain().map(|keys| keys.len()).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn filled(order: usize, keys: impl IntoIterator<Item = i64>) -> OrderedIndex<i64, ()> {
        let mut index = OrderedIndex::new(order).unwrap();
        for key in keys {
            index.insert(key, ()).unwrap();
        }
        index
    }

    #[test]
    fn test_valid_trees_pass() {
        for order in 3..10 {
            let index = filled(order, (0..300).map(|i| (i * 7919) % 1000));
            assert!(index.check_invariants(), "order {}", order);
        }
    }

    #[test]
    fn test_detects_unsorted_leaf() {
        let mut index = filled(5, 0..4);
        let root = index.root.id();
        index.leaf_mut(root).unwrap().keys.swap(0, 1);

        assert!(index.validate().unwrap_err().is_corruption());
    }

    #[test]
    fn test_detects_wrong_separator() {
        let mut index = filled(3, 1..=10);
        let root = index.root.id();
        index.branch_mut(root).unwrap().keys[0] += 1;

        assert!(!index.check_invariants());
    }

    #[test]
    fn test_detects_broken_parent_link() {
        let mut index = filled(3, 1..=10);
        let first_leaf = index.get_first_leaf_id().unwrap();
        index.leaf_mut(first_leaf).unwrap().parent = NULL_NODE;

        assert!(index.validate().unwrap_err().is_corruption());
    }

    #[test]
    fn test_detects_broken_leaf_chain() {
        let mut index = filled(3, 1..=10);
        let first_leaf = index.get_first_leaf_id().unwrap();
        index.leaf_mut(first_leaf).unwrap().next = NULL_NODE;

        let err = index.validate().unwrap_err();
        assert!(err.to_string().contains("Leaf chain"), "{}", err);
    }

    #[test]
    fn test_detects_overfull_node() {
        let mut index = filled(4, 0..3);
        let root = index.root.id();
        let leaf = index.leaf_mut(root).unwrap();
        leaf.keys.push(3);
        leaf.values.push(());

        assert!(index.validate().unwrap_err().to_string().contains("exceed"));
    }

    #[test]
    fn test_leaf_sizes() {
        let index = filled(3, 1..=3);
        assert_eq!(index.leaf_sizes(), vec![2, 1]);
    }
}
