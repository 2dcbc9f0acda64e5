//! Compact arena holding tree nodes in a flat `Vec<T>`.
//!
//! Nodes are never freed (the index has no deletion), so the arena is an
//! append-only table: a node's `NodeId` is its slot index and stays valid for
//! the lifetime of the tree.

use std::convert::TryFrom;

use crate::error::{BPlusTreeError, TreeResult};
use crate::types::{NodeId, NULL_NODE};

/// Statistics for a compact arena
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CompactArenaStats {
    pub total_capacity: usize,
    pub allocated_count: usize,
    pub node_limit: usize,
    pub utilization: f64,
}

/// Append-only arena addressed by `NodeId`.
#[derive(Debug)]
pub struct CompactArena<T> {
    storage: Vec<T>,
    /// Maximum number of slots; `NULL_NODE` itself is never handed out.
    limit: usize,
}

impl<T> CompactArena<T> {
    /// Create a new empty arena that may grow up to the full `NodeId` range.
    pub fn new() -> Self {
        Self::with_limit(NULL_NODE as usize)
    }

    /// Create an arena that refuses to hold more than `limit` nodes.
    pub fn with_limit(limit: usize) -> Self {
        Self {
            storage: Vec::new(),
            limit: limit.min(NULL_NODE as usize),
        }
    }

    /// Allocate a new item in the arena and return its ID
    #[inline]
    pub fn allocate(&mut self, item: T) -> TreeResult<NodeId> {
        if !self.has_room_for(1) {
            return Err(BPlusTreeError::arena_error(
                "Node allocation",
                &format!("arena is full ({} nodes)", self.limit),
            ));
        }

        let index = self.storage.len();
        let id = NodeId::try_from(index).map_err(|_| {
            BPlusTreeError::arena_error("Node allocation", "slot index exceeds NodeId range")
        })?;
        self.storage.push(item);
        Ok(id)
    }

    /// Returns true if `additional` more nodes can be allocated.
    #[inline]
    pub fn has_room_for(&self, additional: usize) -> bool {
        self.storage.len().saturating_add(additional) <= self.limit
    }

    /// Get a reference to an item
    #[inline]
    pub fn get(&self, id: NodeId) -> Option<&T> {
        if id == NULL_NODE {
            return None;
        }
        self.storage.get(usize::try_from(id).ok()?)
    }

    /// Get a mutable reference to an item
    #[inline]
    pub fn get_mut(&mut self, id: NodeId) -> Option<&mut T> {
        if id == NULL_NODE {
            return None;
        }
        self.storage.get_mut(usize::try_from(id).ok()?)
    }

    /// Number of allocated nodes.
    pub fn len(&self) -> usize {
        self.storage.len()
    }

    pub fn is_empty(&self) -> bool {
        self.storage.is_empty()
    }

    /// Get arena statistics
    pub fn stats(&self) -> CompactArenaStats {
        let total_capacity = self.storage.capacity();
        let allocated_count = self.storage.len();
        CompactArenaStats {
            total_capacity,
            allocated_count,
            node_limit: self.limit,
            utilization: if total_capacity > 0 {
                allocated_count as f64 / total_capacity as f64
            } else {
                0.0
            },
        }
    }
}

impl<T> Default for CompactArena<T> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_allocate_hands_out_sequential_ids() {
        let mut arena = CompactArena::new();
        assert!(arena.is_empty());

        let first = arena.allocate("first").unwrap();
        let second = arena.allocate("second").unwrap();

        assert_eq!(first, 0);
        assert_eq!(second, 1);
        assert_eq!(arena.get(first), Some(&"first"));
        assert_eq!(arena.get(second), Some(&"second"));
        assert_eq!(arena.len(), 2);
    }

    #[test]
    fn test_get_mut_updates_in_place() {
        let mut arena = CompactArena::new();
        let id = arena.allocate(10).unwrap();

        if let Some(value) = arena.get_mut(id) {
            *value = 20;
        }
        assert_eq!(arena.get(id), Some(&20));
    }

    #[test]
    fn test_unknown_and_null_ids() {
        let mut arena: CompactArena<i32> = CompactArena::new();
        arena.allocate(1).unwrap();

        assert_eq!(arena.get(5), None);
        assert_eq!(arena.get(NULL_NODE), None);
        assert_eq!(arena.get_mut(NULL_NODE), None);
    }

    #[test]
    fn test_limit_rejects_allocation() {
        let mut arena = CompactArena::with_limit(2);
        assert!(arena.has_room_for(2));
        assert!(!arena.has_room_for(3));

        arena.allocate('a').unwrap();
        arena.allocate('b').unwrap();
        let err = arena.allocate('c').unwrap_err();

        assert!(matches!(err, BPlusTreeError::ArenaError(_)));
        assert_eq!(arena.len(), 2);
    }

    #[test]
    fn test_stats() {
        let mut arena = CompactArena::with_limit(8);
        arena.allocate(1u8).unwrap();
        arena.allocate(2u8).unwrap();

        let stats = arena.stats();
        assert_eq!(stats.allocated_count, 2);
        assert_eq!(stats.node_limit, 8);
        assert!(stats.total_capacity >= 2);
        assert!(stats.utilization > 0.0 && stats.utilization <= 1.0);
    }
}
