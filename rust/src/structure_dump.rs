//! Level-order structure dump for OrderedIndex.
//!
//! The dump is a diagnostic artifact: a header line, one `Level <n>: ` line
//! per tree level listing each node's keys as `[k1, k2] `, and a footer line.
//! It carries no payloads and is never parsed back into a tree.

use std::collections::VecDeque;
use std::fmt::{self, Display};
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use tracing::debug;

use crate::error::{BPlusTreeError, BTreeResult};
use crate::types::{NodeRef, OrderedIndex};

pub const STRUCTURE_HEADER: &str = "--- B+ Tree Structure ---";
pub const STRUCTURE_FOOTER: &str = "-------------------------";

/// `Display` adapter that renders an index level by level.
pub struct StructureDump<'a, K, V> {
    tree: &'a OrderedIndex<K, V>,
}

impl<K: Ord + Clone + Display, V> OrderedIndex<K, V> {
    /// Borrow the index as a displayable level-order dump.
    pub fn structure(&self) -> StructureDump<'_, K, V> {
        StructureDump { tree: self }
    }

    /// Render the level-order dump into a string.
    ///
    /// # Examples
    ///
    /// ```
    /// use ordered_index::OrderedIndex;
    ///
    /// let mut index = OrderedIndex::new(3).unwrap();
    /// for key in 1..=3 {
    ///     index.insert(key, ()).unwrap();
    /// }
    /// assert_eq!(
    ///     index.dump_structure(),
    ///     "--- B+ Tree Structure ---\n\
    ///      Level 0: [3] \n\
    ///      Level 1: [1, 2] [3] \n\
    ///      -------------------------\n"
    /// );
    /// ```
    pub fn dump_structure(&self) -> String {
        self.structure().to_string()
    }

    /// Write the level-order dump to any byte sink.
    pub fn write_structure<W: Write>(&self, writer: &mut W) -> BTreeResult<()> {
        write!(writer, "{}", self.structure())
            .and_then(|()| writer.flush())
            .map_err(|e| BPlusTreeError::io_error("Writing structure dump", &e))
    }

    /// Write the level-order dump to a file, replacing any existing content.
    pub fn write_structure_to_file<P: AsRef<Path>>(&self, path: P) -> BTreeResult<()> {
        let path = path.as_ref();
        let file = File::create(path).map_err(|e| {
            BPlusTreeError::io_error(&format!("Creating {}", path.display()), &e)
        })?;
        self.write_structure(&mut BufWriter::new(file))?;

        debug!(path = %path.display(), height = self.height(), "wrote structure dump");
        Ok(())
    }

    /// Nodes grouped by depth, each level left to right.
    pub(crate) fn levels(&self) -> Vec<Vec<NodeRef>> {
        let mut levels = Vec::new();
        let mut queue = VecDeque::from([self.root]);

        while !queue.is_empty() {
            let level: Vec<NodeRef> = queue.drain(..).collect();
            for node in &level {
                if let NodeRef::Branch(id) = node {
                    if let Some(branch) = self.get_branch(*id) {
                        queue.extend(branch.children.iter().copied());
                    }
                }
            }
            levels.push(level);
        }
        levels
    }

    fn node_keys(&self, node: NodeRef) -> &[K] {
        match node {
            NodeRef::Leaf(id) => self.get_leaf(id).map(|leaf| leaf.keys()),
            NodeRef::Branch(id) => self.get_branch(id).map(|branch| branch.keys()),
        }
        .unwrap_or_default()
    }
}

impl<'a, K: Ord + Clone + Display, V> Display for StructureDump<'a, K, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}", STRUCTURE_HEADER)?;
        for (depth, level) in self.tree.levels().iter().enumerate() {
            write!(f, "Level {}: ", depth)?;
            for node in level {
                write!(f, "[")?;
                for (i, key) in self.tree.node_keys(*node).iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}", key)?;
                }
                write!(f, "] ")?;
            }
            writeln!(f)?;
        }
        writeln!(f, "{}", STRUCTURE_FOOTER)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct FailingSink;

    impl Write for FailingSink {
        fn write(&mut self, _buf: &[u8]) -> std::io::Result<usize> {
            Err(std::io::Error::new(std::io::ErrorKind::Other, "sink closed"))
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn test_empty_index_dump() {
        let index = OrderedIndex::<i64, ()>::new(3).unwrap();
        assert_eq!(
            index.dump_structure(),
            format!("{}\nLevel 0: [] \n{}\n", STRUCTURE_HEADER, STRUCTURE_FOOTER)
        );
    }

    #[test]
    fn test_three_level_dump_with_minimum_order() {
        let mut index = OrderedIndex::new(3).unwrap();
        for key in 1..=7 {
            index.insert(key, ()).unwrap();
        }

        let expected = [
            STRUCTURE_HEADER,
            "Level 0: [7] ",
            "Level 1: [3, 5] [] ",
            "Level 2: [1, 2] [3, 4] [5, 6] [7] ",
            STRUCTURE_FOOTER,
        ]
        .join("\n")
            + "\n";
        assert_eq!(index.dump_structure(), expected);
    }

    #[test]
    fn test_levels_match_height() {
        let mut index = OrderedIndex::new(4).unwrap();
        for key in 0..200 {
            index.insert(key, ()).unwrap();
        }

        let levels = index.levels();
        assert_eq!(levels.len(), index.height());
        assert_eq!(levels.last().map(Vec::len), Some(index.leaf_count()));
        assert!(levels.last().unwrap().iter().all(NodeRef::is_leaf));
    }

    #[test]
    fn test_write_structure_to_sink() {
        let mut index = OrderedIndex::new(4).unwrap();
        for key in [5, 1, 9] {
            index.insert(key, ()).unwrap();
        }

        let mut sink = Vec::new();
        index.write_structure(&mut sink).unwrap();

        assert_eq!(String::from_utf8(sink).unwrap(), index.dump_structure());
    }

    #[test]
    fn test_write_structure_reports_io_failure() {
        let index = OrderedIndex::<i64, ()>::new(3).unwrap();
        let err = index.write_structure(&mut FailingSink).unwrap_err();
        assert!(matches!(err, BPlusTreeError::Io(_)));
    }

    #[test]
    fn test_write_structure_to_file() {
        let mut index = OrderedIndex::new(3).unwrap();
        for key in 1..=10 {
            index.insert(key, ()).unwrap();
        }
        let path = std::env::temp_dir().join(format!(
            "ordered_index_structure_{}.txt",
            std::process::id()
        ));

        index.write_structure_to_file(&path).unwrap();
        let written = std::fs::read_to_string(&path).unwrap();
        std::fs::remove_file(&path).unwrap();

        assert_eq!(written, index.dump_structure());
    }

    #[test]
    fn test_write_structure_to_missing_directory_fails() {
        let index = OrderedIndex::<i64, ()>::new(3).unwrap();
        let path = std::env::temp_dir()
            .join("ordered_index_no_such_dir")
            .join("tree.txt");

        let err = index.write_structure_to_file(&path).unwrap_err();
        assert!(matches!(err, BPlusTreeError::Io(_)));
    }
}
