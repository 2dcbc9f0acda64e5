//! Node implementations for OrderedIndex.
//!
//! This module contains the node-level halves of insertion and splitting for
//! LeafNode and BranchNode. The tree-level code in `insert_operations` decides
//! when to split and wires the results into the arenas.

use crate::types::{BranchNode, LeafInsert, LeafNode, NodeId, NodeRef, NULL_NODE};

// ============================================================================
// LEAF NODE IMPLEMENTATION
// ============================================================================

impl<K: Ord, V> LeafNode<K, V> {
    // ============================================================================
    // GET OPERATIONS
    // ============================================================================

    /// Get a payload by key from this leaf node.
    pub fn get(&self, key: &K) -> Option<&V> {
        self.keys
            .binary_search(key)
            .ok()
            .map(|index| &self.values[index])
    }

    /// Returns true if this leaf holds `key`.
    pub fn contains(&self, key: &K) -> bool {
        self.keys.binary_search(key).is_ok()
    }

    /// Returns the number of entries in this leaf.
    pub fn len(&self) -> usize {
        self.keys.len()
    }

    /// Sorted keys of this leaf.
    pub fn keys(&self) -> &[K] {
        &self.keys
    }

    /// Payloads of this leaf, in key order.
    pub fn values(&self) -> &[V] {
        &self.values
    }

    /// The smallest key in this leaf.
    pub fn first_key(&self) -> Option<&K> {
        self.keys.first()
    }

    /// Key and payload at `index`.
    pub fn get_pair(&self, index: usize) -> Option<(&K, &V)> {
        Some((self.keys.get(index)?, self.values.get(index)?))
    }

    // ============================================================================
    // INSERT OPERATIONS
    // ============================================================================

    /// Insert a key with its payload, replacing the payload if the key exists.
    ///
    /// The leaf may end up one key over capacity; the caller splits it.
    pub(crate) fn insert(&mut self, key: K, value: V) -> LeafInsert<V> {
        match self.keys.binary_search(&key) {
            Ok(index) => LeafInsert::Replaced(std::mem::replace(&mut self.values[index], value)),
            Err(index) => {
                self.insert_at_index(index, key, value);
                LeafInsert::Inserted
            }
        }
    }

    /// Insert a key and payload at the specified index.
    fn insert_at_index(&mut self, index: usize, key: K, value: V) {
        self.keys.insert(index, key);
        self.values.insert(index, value);
    }

    /// Split this leaf at `mid`, returning the new right leaf.
    ///
    /// The right leaf takes entries `[mid..]` and inherits this leaf's chain
    /// successor and parent. This leaf's `next` is cleared; the caller links
    /// it to the right leaf once that has an arena id.
    pub(crate) fn split_off(&mut self, mid: usize) -> LeafNode<K, V> {
        let right_keys = self.keys.split_off(mid);
        let right_values = self.values.split_off(mid);

        let new_right = LeafNode {
            capacity: self.capacity,
            keys: right_keys,
            values: right_values,
            next: self.next,
            parent: self.parent,
        };
        self.next = NULL_NODE;

        new_right
    }

    // ============================================================================
    // STATUS CHECKS
    // ============================================================================

    /// Returns true if this leaf node is empty.
    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    /// Returns true if this leaf node is at capacity.
    pub fn is_full(&self) -> bool {
        self.keys.len() >= self.capacity
    }

    /// Returns true if this leaf node holds more keys than allowed.
    pub fn needs_split(&self) -> bool {
        self.keys.len() > self.capacity
    }

    /// Next leaf in the chain, if any.
    pub fn next_leaf(&self) -> Option<NodeId> {
        (self.next != NULL_NODE).then_some(self.next)
    }
}

// ============================================================================
// BRANCH NODE IMPLEMENTATION
// ============================================================================

impl<K: Ord> BranchNode<K> {
    /// Find the index of the child that should contain the given key.
    ///
    /// This is the number of separators `<= key`, so a key equal to a
    /// separator routes to the right of it, matching how separators are
    /// created (first key of the right-hand subtree).
    pub fn find_child_index(&self, key: &K) -> usize {
        match self.keys.binary_search(key) {
            Ok(index) => index + 1,
            Err(index) => index,
        }
    }

    /// Get the child node for a given key.
    pub fn get_child(&self, key: &K) -> Option<NodeRef> {
        self.children.get(self.find_child_index(key)).copied()
    }

    /// Position of `child` among this branch's children.
    pub fn child_position(&self, child: NodeRef) -> Option<usize> {
        self.children.iter().position(|candidate| *candidate == child)
    }

    /// Separator keys of this branch.
    pub fn keys(&self) -> &[K] {
        &self.keys
    }

    /// Child references of this branch.
    pub fn children(&self) -> &[NodeRef] {
        &self.children
    }

    /// Returns the number of keys in this branch node.
    pub fn len(&self) -> usize {
        self.keys.len()
    }

    /// Returns true if this branch node has no separators.
    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    // ============================================================================
    // INSERT OPERATIONS
    // ============================================================================

    /// Insert a separator and the new right-hand child immediately after the
    /// child at `left_position`.
    pub(crate) fn insert_after(&mut self, left_position: usize, separator: K, new_child: NodeRef) {
        self.keys.insert(left_position, separator);
        self.children.insert(left_position + 1, new_child);
    }

    /// Split this branch at `mid`, returning the new right node and the
    /// promoted key.
    ///
    /// `keys[mid]` moves up to the parent and is kept by neither half. This
    /// branch keeps `keys[..mid]` and `children[..=mid]`; the right node
    /// takes the rest. The right node inherits this branch's parent; the
    /// caller re-points the moved children at the right node.
    pub(crate) fn split_off(&mut self, mid: usize) -> (BranchNode<K>, K) {
        let right_keys = self.keys.split_off(mid + 1);
        let right_children = self.children.split_off(mid + 1);

        let mut promoted = self.keys.split_off(mid);
        // split_off(mid) on a vec of length mid + 1 yields exactly the promoted key
        let promoted_key = promoted.remove(0);

        let new_right = BranchNode {
            capacity: self.capacity,
            keys: right_keys,
            children: right_children,
            parent: self.parent,
        };

        (new_right, promoted_key)
    }

    // ============================================================================
    // STATUS CHECKS
    // ============================================================================

    /// Returns true if this branch node is at capacity.
    pub fn is_full(&self) -> bool {
        self.keys.len() >= self.capacity
    }

    /// Returns true if this branch node holds more keys than allowed.
    pub fn needs_split(&self) -> bool {
        self.keys.len() > self.capacity
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn leaf_with(capacity: usize, keys: &[i64]) -> LeafNode<i64, String> {
        let mut leaf = LeafNode::new(capacity);
        for key in keys {
            leaf.insert(*key, format!("row{}", key));
        }
        leaf
    }

    #[test]
    fn test_leaf_insert_keeps_keys_sorted() {
        let leaf = leaf_with(4, &[30, 10, 20]);
        assert_eq!(leaf.keys(), &[10, 20, 30]);
        assert_eq!(leaf.values(), &["row10", "row20", "row30"]);
        assert!(!leaf.is_full());
    }

    #[test]
    fn test_leaf_insert_replaces_existing_payload() {
        let mut leaf = leaf_with(4, &[1, 2]);

        match leaf.insert(2, "updated".to_string()) {
            LeafInsert::Replaced(old) => assert_eq!(old, "row2"),
            LeafInsert::Inserted => panic!("expected replacement"),
        }
        assert_eq!(leaf.len(), 2);
        assert_eq!(leaf.get(&2), Some(&"updated".to_string()));
    }

    #[test]
    fn test_leaf_overflow_and_split() {
        let mut leaf = leaf_with(3, &[1, 2, 3, 4]);
        leaf.next = 7;
        leaf.parent = 2;
        assert!(leaf.needs_split());

        let right = leaf.split_off(2);

        assert_eq!(leaf.keys(), &[1, 2]);
        assert_eq!(right.keys(), &[3, 4]);
        assert_eq!(right.values(), &["row3", "row4"]);
        assert_eq!(right.next, 7);
        assert_eq!(right.parent, 2);
        assert_eq!(leaf.next_leaf(), None);
    }

    #[test]
    fn test_leaf_lookup() {
        let leaf = leaf_with(4, &[5, 9]);
        assert_eq!(leaf.get(&9), Some(&"row9".to_string()));
        assert_eq!(leaf.get(&6), None);
        assert!(leaf.contains(&5));
        assert_eq!(leaf.first_key(), Some(&5));
        assert_eq!(leaf.get_pair(1), Some((&9, &"row9".to_string())));
        assert_eq!(leaf.get_pair(2), None);
    }

    #[test]
    fn test_find_child_index_routes_ties_right() {
        let mut branch = BranchNode::new(4);
        branch.keys = vec![5, 10];
        branch.children = vec![NodeRef::Leaf(0), NodeRef::Leaf(1), NodeRef::Leaf(2)];

        assert_eq!(branch.find_child_index(&3), 0);
        assert_eq!(branch.find_child_index(&5), 1);
        assert_eq!(branch.find_child_index(&7), 1);
        assert_eq!(branch.find_child_index(&10), 2);
        assert_eq!(branch.find_child_index(&15), 2);
        assert_eq!(branch.get_child(&7), Some(NodeRef::Leaf(1)));
    }

    #[test]
    fn test_branch_insert_after() {
        let mut branch = BranchNode::new_root(3, 10, NodeRef::Leaf(0), NodeRef::Leaf(1));

        branch.insert_after(0, 5, NodeRef::Leaf(2));

        assert_eq!(branch.keys(), &[5, 10]);
        assert_eq!(
            branch.children(),
            &[NodeRef::Leaf(0), NodeRef::Leaf(2), NodeRef::Leaf(1)]
        );
        assert_eq!(branch.child_position(NodeRef::Leaf(1)), Some(2));
        assert_eq!(branch.child_position(NodeRef::Branch(1)), None);
    }

    #[test]
    fn test_branch_split_promotes_middle_key() {
        let mut branch = BranchNode::new(3);
        branch.keys = vec![10, 20, 30, 40];
        branch.children = (0..5).map(NodeRef::Leaf).collect();
        branch.parent = 9;
        assert!(branch.needs_split());

        let (right, promoted) = branch.split_off(2);

        assert_eq!(promoted, 30);
        assert_eq!(branch.keys(), &[10, 20]);
        assert_eq!(
            branch.children(),
            &[NodeRef::Leaf(0), NodeRef::Leaf(1), NodeRef::Leaf(2)]
        );
        assert_eq!(right.keys(), &[40]);
        assert_eq!(right.children(), &[NodeRef::Leaf(3), NodeRef::Leaf(4)]);
        assert_eq!(right.parent, 9);
    }

    #[test]
    fn test_branch_split_at_minimum_order_leaves_single_child() {
        let mut branch = BranchNode::new(2);
        branch.keys = vec![3, 5, 7];
        branch.children = (0..4).map(NodeRef::Leaf).collect();

        let (right, promoted) = branch.split_off(2);

        assert_eq!(promoted, 7);
        assert_eq!(branch.keys(), &[3, 5]);
        assert_eq!(branch.children().len(), 3);
        assert!(right.is_empty());
        assert_eq!(right.children(), &[NodeRef::Leaf(3)]);
    }
}
