//! Error handling and result types for OrderedIndex operations.
//!
//! Every fallible operation of the index reports one of the variants below.
//! A missing key is never an error: lookups return `None` for that case.

/// Error type for ordered index operations.
#[derive(Debug, Clone, PartialEq)]
pub enum BPlusTreeError {
    /// The index was constructed with an unusable configuration (e.g. order < 3).
    InvalidConfiguration(String),
    /// A textual key could not be parsed into the index key type.
    ParseError(String),
    /// The tree structure violates one of its invariants.
    CorruptedTree(String),
    /// A node arena is exhausted or was asked for an unknown node.
    ArenaError(String),
    /// Writing a structure dump to its sink failed.
    Io(String),
}

impl BPlusTreeError {
    /// Create an InvalidConfiguration error for a rejected order.
    pub fn invalid_order(order: usize, min_required: usize) -> Self {
        Self::InvalidConfiguration(format!(
            "Order {} is invalid (minimum required: {})",
            order, min_required
        ))
    }

    /// Create a ParseError for a key string that failed to parse.
    pub fn parse_error(input: &str, details: &str) -> Self {
        Self::ParseError(format!("'{}' is not a valid key: {}", input, details))
    }

    /// Create a CorruptedTree error with context
    pub fn corrupted_tree(component: &str, details: &str) -> Self {
        Self::CorruptedTree(format!("{} corruption: {}", component, details))
    }

    /// Create an ArenaError with context
    pub fn arena_error(operation: &str, details: &str) -> Self {
        Self::ArenaError(format!("{} failed: {}", operation, details))
    }

    /// Create an Io error from an underlying I/O failure.
    pub fn io_error(operation: &str, err: &std::io::Error) -> Self {
        Self::Io(format!("{} failed: {}", operation, err))
    }

    /// Check if this error is a configuration error
    pub fn is_configuration_error(&self) -> bool {
        matches!(self, Self::InvalidConfiguration(_))
    }

    /// Check if this error is a parse error
    pub fn is_parse_error(&self) -> bool {
        matches!(self, Self::ParseError(_))
    }

    /// Check if this error signals a broken tree structure
    pub fn is_corruption(&self) -> bool {
        matches!(self, Self::CorruptedTree(_))
    }
}

impl std::fmt::Display for BPlusTreeError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            BPlusTreeError::InvalidConfiguration(msg) => {
                write!(f, "Invalid configuration: {}", msg)
            }
            BPlusTreeError::ParseError(msg) => write!(f, "Parse error: {}", msg),
            BPlusTreeError::CorruptedTree(msg) => write!(f, "Corrupted tree: {}", msg),
            BPlusTreeError::ArenaError(msg) => write!(f, "Arena error: {}", msg),
            BPlusTreeError::Io(msg) => write!(f, "I/O error: {}", msg),
        }
    }
}

impl std::error::Error for BPlusTreeError {}

/// Internal result type for tree operations
pub(crate) type TreeResult<T> = Result<T, BPlusTreeError>;

/// Public result type for tree operations that may fail
pub type BTreeResult<T> = Result<T, BPlusTreeError>;

/// Result type for key lookup operations
pub type KeyResult<T> = Result<T, BPlusTreeError>;

/// Result type for tree modification operations
pub type ModifyResult<T> = Result<T, BPlusTreeError>;

/// Result type for tree construction
pub type InitResult<T> = Result<T, BPlusTreeError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_order_message() {
        let err = BPlusTreeError::invalid_order(2, 3);
        assert!(err.is_configuration_error());
        assert_eq!(
            err.to_string(),
            "Invalid configuration: Order 2 is invalid (minimum required: 3)"
        );
    }

    #[test]
    fn test_parse_error_message() {
        let err = BPlusTreeError::parse_error("abc", "invalid digit found in string");
        assert!(err.is_parse_error());
        assert!(!err.is_corruption());
        assert_eq!(
            err.to_string(),
            "Parse error: 'abc' is not a valid key: invalid digit found in string"
        );
    }

    #[test]
    fn test_io_error_wraps_source() {
        let source = std::io::Error::new(std::io::ErrorKind::Other, "disk full");
        let err = BPlusTreeError::io_error("Writing structure dump", &source);
        assert_eq!(
            err,
            BPlusTreeError::Io("Writing structure dump failed: disk full".to_string())
        );
    }

    #[test]
    fn test_corrupted_tree_context() {
        let err = BPlusTreeError::corrupted_tree("Split propagation", "parent missing");
        assert!(err.is_corruption());
        assert_eq!(
            err.to_string(),
            "Corrupted tree: Split propagation corruption: parent missing"
        );
    }
}
