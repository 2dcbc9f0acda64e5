//! INSERT operations for OrderedIndex.
//!
//! Insertion descends to the target leaf, places the entry, and splits any
//! node that overflows. Splits climb the stored parent links iteratively,
//! carrying a `(separator, new right node)` pair until a parent absorbs it
//! or a new root is grown.

use tracing::{debug, error, trace};

use crate::error::{BPlusTreeError, ModifyResult, TreeResult};
use crate::types::{BranchNode, LeafInsert, NodeId, NodeRef, OrderedIndex, NULL_NODE};

impl<K: Ord + Clone, V> OrderedIndex<K, V> {
    /// Insert a key with its payload.
    ///
    /// If the key is already present its payload is replaced and the previous
    /// payload is returned; the tree shape does not change in that case.
    ///
    /// # Errors
    ///
    /// * `ArenaError` if the arenas cannot hold the nodes a split might need.
    ///   This is checked before anything is modified.
    /// * `CorruptedTree` if split propagation finds a broken parent link.
    ///
    /// # Examples
    ///
    /// ```
    /// use ordered_index::OrderedIndex;
    ///
    /// let mut index = OrderedIndex::new(3).unwrap();
    /// assert_eq!(index.insert(1, "one").unwrap(), None);
    /// assert_eq!(index.insert(1, "uno").unwrap(), Some("one"));
    /// assert_eq!(index.get(&1), Some(&"uno"));
    /// ```
    pub fn insert(&mut self, key: K, value: V) -> ModifyResult<Option<V>> {
        let leaf_id = self.find_leaf_id(&key)?;

        let leaf = self.leaf(leaf_id)?;
        if leaf.is_full() && !leaf.contains(&key) {
            self.ensure_split_room()?;
        }

        let leaf = self.leaf_mut(leaf_id)?;
        match leaf.insert(key, value) {
            LeafInsert::Replaced(old_value) => Ok(Some(old_value)),
            LeafInsert::Inserted => {
                if leaf.needs_split() {
                    self.split_leaf(leaf_id)?;
                }
                Ok(None)
            }
        }
    }

    /// Insert only if the key is not present yet.
    ///
    /// Returns `true` if the row was inserted; an existing row is left as is.
    pub fn insert_if_absent(&mut self, key: K, value: V) -> ModifyResult<bool> {
        if self.contains_key(&key) {
            return Ok(false);
        }
        self.insert(key, value)?;
        Ok(true)
    }

    /// Insert every `(key, payload)` pair in order.
    ///
    /// Returns how many keys were new; replacements are not counted. Stops at
    /// the first error, keeping the rows inserted before it.
    pub fn insert_many<I>(&mut self, rows: I) -> ModifyResult<usize>
    where
        I: IntoIterator<Item = (K, V)>,
    {
        let mut inserted = 0;
        for (key, value) in rows {
            if self.insert(key, value)?.is_none() {
                inserted += 1;
            }
        }
        Ok(inserted)
    }

    // ============================================================================
    // HELPERS FOR INSERT OPERATIONS
    // ============================================================================

    /// Index at which an overflowing node is cut in two.
    fn split_point(&self) -> usize {
        (self.order + 1) / 2
    }

    /// Fail unless the arenas can absorb a worst-case split cascade: one new
    /// leaf, one new branch per existing branch level, and a new root.
    fn ensure_split_room(&self) -> ModifyResult<()> {
        if !self.leaf_arena.has_room_for(1) {
            return Err(BPlusTreeError::arena_error(
                "Leaf split",
                "leaf arena has no room for another leaf",
            ));
        }
        let branches_needed = self.height();
        if !self.branch_arena.has_room_for(branches_needed) {
            return Err(BPlusTreeError::arena_error(
                "Branch split",
                &format!("branch arena has no room for {} more branches", branches_needed),
            ));
        }
        Ok(())
    }

    /// Split an overflowing leaf and hand the new right leaf to its parent.
    fn split_leaf(&mut self, leaf_id: NodeId) -> ModifyResult<()> {
        let mid = self.split_point();
        let right = self.leaf_mut(leaf_id)?.split_off(mid);
        let separator = right.first_key().cloned().ok_or_else(|| {
            BPlusTreeError::corrupted_tree("Leaf split", "right half of split is empty")
        })?;

        let right_id = self.leaf_arena.allocate(right)?;
        self.leaf_mut(leaf_id)?.next = right_id;
        trace!(left = leaf_id, right = right_id, "split leaf");

        self.propagate_split(NodeRef::Leaf(leaf_id), separator, NodeRef::Leaf(right_id))
    }

    /// Insert `(separator, right)` next to `left` in its parent, splitting
    /// ancestors as long as they overflow.
    fn propagate_split(
        &mut self,
        mut left: NodeRef,
        mut separator: K,
        mut right: NodeRef,
    ) -> ModifyResult<()> {
        let mid = self.split_point();

        loop {
            let parent_id = self.parent_of(left)?;
            if parent_id == NULL_NODE {
                if left != self.root {
                    error!(node = ?left, "split node has no parent but is not the root");
                    return Err(BPlusTreeError::corrupted_tree(
                        "Split propagation",
                        &format!("{:?} has no parent but is not the root", left),
                    ));
                }
                return self.grow_root(left, separator, right);
            }

            let parent = self.branch_mut(parent_id)?;
            let Some(position) = parent.child_position(left) else {
                error!(parent = parent_id, node = ?left, "parent link points at a non-owner");
                return Err(BPlusTreeError::corrupted_tree(
                    "Split propagation",
                    &format!("branch {} does not own {:?}", parent_id, left),
                ));
            };
            parent.insert_after(position, separator, right);
            let overflow = parent.needs_split();
            self.set_parent(right, parent_id)?;

            if !overflow {
                return Ok(());
            }

            let (new_branch, promoted) = self.branch_mut(parent_id)?.split_off(mid);
            let moved = new_branch.children.clone();
            let new_id = self.branch_arena.allocate(new_branch)?;
            for child in moved {
                self.set_parent(child, new_id)?;
            }
            trace!(left = parent_id, right = new_id, "split branch");

            left = NodeRef::Branch(parent_id);
            separator = promoted;
            right = NodeRef::Branch(new_id);
        }
    }

    /// Put a new root above the two halves of a split root.
    fn grow_root(&mut self, left: NodeRef, separator: K, right: NodeRef) -> ModifyResult<()> {
        let root = BranchNode::new_root(self.order - 1, separator, left, right);
        let root_id = self.branch_arena.allocate(root)?;
        self.set_parent(left, root_id)?;
        self.set_parent(right, root_id)?;
        self.root = NodeRef::Branch(root_id);

        debug!(root = root_id, height = self.height(), "grew new root");
        Ok(())
    }

    /// Parent link of any node.
    pub(crate) fn parent_of(&self, node: NodeRef) -> TreeResult<NodeId> {
        match node {
            NodeRef::Leaf(id) => Ok(self.leaf(id)?.parent),
            NodeRef::Branch(id) => Ok(self.branch(id)?.parent),
        }
    }

    fn set_parent(&mut self, node: NodeRef, parent: NodeId) -> TreeResult<()> {
        match node {
            NodeRef::Leaf(id) => self.leaf_mut(id)?.parent = parent,
            NodeRef::Branch(id) => self.branch_mut(id)?.parent = parent,
        }
        Ok(())
    }
}
