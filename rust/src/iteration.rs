//! Iterator implementations for OrderedIndex.
//!
//! All iterators walk the leaf chain from the leftmost leaf, so a full scan
//! touches each leaf exactly once and never revisits a branch.

use crate::types::{LeafNode, NodeId, OrderedIndex};

// ============================================================================
// ITERATOR STRUCTS
// ============================================================================

/// Iterator over key-payload pairs using the leaf chain.
pub struct ItemIterator<'a, K, V> {
    tree: &'a OrderedIndex<K, V>,
    current_leaf_ref: Option<&'a LeafNode<K, V>>,
    current_leaf_index: usize,
}

/// Iterator over keys in ascending order.
pub struct KeyIterator<'a, K, V> {
    items: ItemIterator<'a, K, V>,
}

/// Iterator over payloads in key order.
pub struct ValueIterator<'a, K, V> {
    items: ItemIterator<'a, K, V>,
}

/// Iterator over the key slice of every leaf, in chain order.
pub struct LeafChainIterator<'a, K, V> {
    tree: &'a OrderedIndex<K, V>,
    next_leaf_id: Option<NodeId>,
}

// ============================================================================
// ORDEREDINDEX ITERATOR METHODS
// ============================================================================

impl<K: Ord + Clone, V> OrderedIndex<K, V> {
    /// Returns an iterator over all entries in ascending key order.
    pub fn items(&self) -> ItemIterator<'_, K, V> {
        ItemIterator::new(self)
    }

    /// Returns an iterator over all keys in ascending order.
    pub fn keys(&self) -> KeyIterator<'_, K, V> {
        KeyIterator {
            items: ItemIterator::new(self),
        }
    }

    /// Returns an iterator over all payloads in key order.
    pub fn values(&self) -> ValueIterator<'_, K, V> {
        ValueIterator {
            items: ItemIterator::new(self),
        }
    }

    /// Returns an iterator over each leaf's keys, following `next` links.
    ///
    /// # Examples
    ///
    /// ```
    /// use ordered_index::OrderedIndex;
    ///
    /// let mut index = OrderedIndex::new(3).unwrap();
    /// for key in [10, 20, 30] {
    ///     index.insert(key, ()).unwrap();
    /// }
    /// let leaves: Vec<Vec<i32>> = index.leaf_chain().map(|keys| keys.to_vec()).collect();
    /// assert_eq!(leaves, vec![vec![10, 20], vec![30]]);
    /// ```
    pub fn leaf_chain(&self) -> LeafChainIterator<'_, K, V> {
        LeafChainIterator {
            tree: self,
            next_leaf_id: self.get_first_leaf_id(),
        }
    }
}

// ============================================================================
// ITEMITERATOR IMPLEMENTATION
// ============================================================================

impl<'a, K: Ord + Clone, V> ItemIterator<'a, K, V> {
    pub fn new(tree: &'a OrderedIndex<K, V>) -> Self {
        let current_leaf_ref = tree.get_first_leaf_id().and_then(|id| tree.get_leaf(id));

        Self {
            tree,
            current_leaf_ref,
            current_leaf_index: 0,
        }
    }
}

impl<'a, K: Ord + Clone, V> Iterator for ItemIterator<'a, K, V> {
    type Item = (&'a K, &'a V);

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let leaf = self.current_leaf_ref?;

            if let Some(item) = leaf.get_pair(self.current_leaf_index) {
                self.current_leaf_index += 1;
                return Some(item);
            }

            // Leaf exhausted; the only arena access during iteration
            self.current_leaf_ref = leaf.next_leaf().and_then(|id| self.tree.get_leaf(id));
            self.current_leaf_index = 0;
        }
    }
}

// ============================================================================
// KEYITERATOR / VALUEITERATOR IMPLEMENTATION
// ============================================================================

impl<'a, K: Ord + Clone, V> Iterator for KeyIterator<'a, K, V> {
    type Item = &'a K;

    fn next(&mut self) -> Option<Self::Item> {
        self.items.next().map(|(k, _)| k)
    }
}

impl<'a, K: Ord + Clone, V> Iterator for ValueIterator<'a, K, V> {
    type Item = &'a V;

    fn next(&mut self) -> Option<Self::Item> {
        self.items.next().map(|(_, v)| v)
    }
}

// ============================================================================
// LEAFCHAINITERATOR IMPLEMENTATION
// ============================================================================

impl<'a, K: Ord + Clone, V> Iterator for LeafChainIterator<'a, K, V> {
    type Item = &'a [K];

    fn next(&mut self) -> Option<Self::Item> {
        let leaf = self.tree.get_leaf(self.next_leaf_id?)?;
        self.next_leaf_id = leaf.next_leaf();
        Some(leaf.keys())
    }
}
