//! In-memory B+ tree index with leaf chaining.
//!
//! This crate provides an ordered index that maps keys to payload rows. It
//! supports insertion with node splitting, exact-key lookup, in-order
//! traversal of the leaf chain, and a level-order dump of the tree shape.
//!
//! ```
//! use ordered_index::{Row, RowIndex};
//!
//! let mut index = RowIndex::new(3).unwrap();
//! let row: Row = vec!["902418".into(), "MODERNA".into(), "US".into()];
//! index.insert(902418, row).unwrap();
//!
//! let found = index.search_str("902418").unwrap();
//! assert_eq!(found.map(|row| row[1].as_str()), Some("MODERNA"));
//! ```

mod compact_arena;
mod construction;
mod error;
mod get_operations;
mod insert_operations;
mod iteration;
mod node;
mod structure_dump;
mod tree_structure;
mod types;
mod validation;

pub use compact_arena::{CompactArena, CompactArenaStats};
pub use construction::validation as order_validation;
pub use construction::DEFAULT_ORDER;
pub use error::{BPlusTreeError, BTreeResult, InitResult, KeyResult, ModifyResult};
pub use iteration::{ItemIterator, KeyIterator, LeafChainIterator, ValueIterator};
pub use structure_dump::{StructureDump, STRUCTURE_FOOTER, STRUCTURE_HEADER};
pub use types::{
    BranchNode, LeafNode, NodeId, NodeRef, OrderedIndex, Row, RowIndex, MIN_ORDER, NULL_NODE,
};
