//! GET operations for OrderedIndex.
//!
//! This module contains the read operations of the index, including exact-key
//! lookup, the textual-key lookup used by interactive callers, and arena
//! access helpers shared with the other modules.

use std::fmt::Display;
use std::str::FromStr;

use crate::error::{BPlusTreeError, KeyResult, TreeResult};
use crate::types::{BranchNode, LeafNode, NodeId, OrderedIndex};

impl<K: Ord + Clone, V> OrderedIndex<K, V> {
    // ============================================================================
    // PUBLIC GET OPERATIONS
    // ============================================================================

    /// Get a reference to the payload stored under a key.
    ///
    /// # Examples
    ///
    /// ```
    /// use ordered_index::OrderedIndex;
    ///
    /// let mut index = OrderedIndex::new(3).unwrap();
    /// index.insert(42, vec!["a".to_string(), "b".to_string()]).unwrap();
    /// assert_eq!(index.get(&42), Some(&vec!["a".to_string(), "b".to_string()]));
    /// assert_eq!(index.get(&7), None);
    /// ```
    pub fn get(&self, key: &K) -> Option<&V> {
        let leaf_id = self.find_leaf_id(key).ok()?;
        self.get_leaf(leaf_id)?.get(key)
    }

    /// Check if key exists in the index.
    pub fn contains_key(&self, key: &K) -> bool {
        self.get(key).is_some()
    }

    /// Look up a key given as text.
    ///
    /// Surrounding whitespace is ignored. Text that does not parse as a key
    /// is an error, not a miss.
    ///
    /// # Examples
    ///
    /// ```
    /// use ordered_index::OrderedIndex;
    ///
    /// let mut index = OrderedIndex::new(3).unwrap();
    /// index.insert(42_i64, "row").unwrap();
    /// assert_eq!(index.search_str(" 42 ").unwrap(), Some(&"row"));
    /// assert_eq!(index.search_str("7").unwrap(), None);
    /// assert!(index.search_str("abc").is_err());
    /// ```
    pub fn search_str(&self, text: &str) -> KeyResult<Option<&V>>
    where
        K: FromStr,
        K::Err: Display,
    {
        let key = text
            .trim()
            .parse::<K>()
            .map_err(|e| BPlusTreeError::parse_error(text, &e.to_string()))?;
        Ok(self.get(&key))
    }

    /// Returns the entry with the smallest key.
    pub fn first(&self) -> Option<(&K, &V)> {
        self.items().next()
    }

    /// Returns the entry with the largest key.
    pub fn last(&self) -> Option<(&K, &V)> {
        let leaf = self.get_leaf(self.get_last_leaf_id()?)?;
        leaf.get_pair(leaf.len().checked_sub(1)?)
    }

    // ============================================================================
    // ARENA ACCESS METHODS
    // ============================================================================

    /// Get a reference to a leaf node in the arena.
    pub fn get_leaf(&self, id: NodeId) -> Option<&LeafNode<K, V>> {
        self.leaf_arena.get(id)
    }

    /// Get a reference to a branch node in the arena.
    pub fn get_branch(&self, id: NodeId) -> Option<&BranchNode<K>> {
        self.branch_arena.get(id)
    }

    /// Leaf lookup for paths that follow links: a dangling id means the
    /// tree is corrupted.
    pub(crate) fn leaf(&self, id: NodeId) -> TreeResult<&LeafNode<K, V>> {
        self.leaf_arena
            .get(id)
            .ok_or_else(|| dangling("leaf", id))
    }

    pub(crate) fn leaf_mut(&mut self, id: NodeId) -> TreeResult<&mut LeafNode<K, V>> {
        self.leaf_arena
            .get_mut(id)
            .ok_or_else(|| dangling("leaf", id))
    }

    pub(crate) fn branch(&self, id: NodeId) -> TreeResult<&BranchNode<K>> {
        self.branch_arena
            .get(id)
            .ok_or_else(|| dangling("branch", id))
    }

    pub(crate) fn branch_mut(&mut self, id: NodeId) -> TreeResult<&mut BranchNode<K>> {
        self.branch_arena
            .get_mut(id)
            .ok_or_else(|| dangling("branch", id))
    }
}

fn dangling(kind: &str, id: NodeId) -> BPlusTreeError {
    BPlusTreeError::corrupted_tree("Node link", &format!("{} {} is not allocated", kind, id))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(fields: &[&str]) -> Vec<String> {
        fields.iter().map(|field| field.to_string()).collect()
    }

    #[test]
    fn test_basic_get_operations() {
        let mut index = OrderedIndex::new(3).unwrap();

        assert_eq!(index.get(&1), None);
        assert!(!index.contains_key(&1));

        index.insert(1, row(&["one"])).unwrap();
        index.insert(2, row(&["two"])).unwrap();
        index.insert(3, row(&["three"])).unwrap();

        assert_eq!(index.get(&1), Some(&row(&["one"])));
        assert_eq!(index.get(&2), Some(&row(&["two"])));
        assert_eq!(index.get(&3), Some(&row(&["three"])));
        assert_eq!(index.get(&4), None);
        assert!(index.contains_key(&3));
        assert!(!index.contains_key(&0));
    }

    #[test]
    fn test_get_across_many_levels() {
        let mut index = OrderedIndex::new(3).unwrap();
        for key in 0..200_i64 {
            index.insert(key * 2, key).unwrap();
        }

        assert!(index.height() > 3);
        for key in 0..200_i64 {
            assert_eq!(index.get(&(key * 2)), Some(&key));
            assert_eq!(index.get(&(key * 2 + 1)), None);
        }
    }

    #[test]
    fn test_search_str() {
        let mut index = OrderedIndex::new(4).unwrap();
        index.insert(902_418_i64, row(&["902418", "MODERNA"])).unwrap();

        assert_eq!(
            index.search_str("902418").unwrap(),
            Some(&row(&["902418", "MODERNA"]))
        );
        assert_eq!(index.search_str("  902418\n").unwrap().map(Vec::len), Some(2));
        assert_eq!(index.search_str("1").unwrap(), None);
        assert_eq!(index.search_str("-5").unwrap(), None);
    }

    #[test]
    fn test_search_str_rejects_non_numeric_keys() {
        let index: OrderedIndex<i64, Vec<String>> = OrderedIndex::new(3).unwrap();

        for text in ["abc", "", "12a", "1.5"] {
            let err = index.search_str(text).unwrap_err();
            assert!(err.is_parse_error(), "{:?} was not a parse error", text);
        }
    }

    #[test]
    fn test_first_and_last() {
        let mut index = OrderedIndex::new(3).unwrap();
        assert_eq!(index.first(), None);
        assert_eq!(index.last(), None);

        for key in [50, 10, 40, 20, 30] {
            index.insert(key, key * 10).unwrap();
        }

        assert_eq!(index.first(), Some((&10, &100)));
        assert_eq!(index.last(), Some((&50, &500)));
    }

    #[test]
    fn test_arena_access() {
        let index = OrderedIndex::<i64, i64>::new(3).unwrap();
        let root = index.root.id();

        assert!(index.get_leaf(root).is_some());
        assert!(index.get_branch(root).is_none());
        assert!(index.leaf(root).is_ok());
        assert!(index.branch(99).unwrap_err().is_corruption());
    }
}
