//! Domain-level errors (no external dependencies)

use std::fmt;

use thiserror::Error;

/// Which child slot of a node an operation refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Side {
    Left,
    Right,
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Side::Left => write!(f, "left"),
            Side::Right => write!(f, "right"),
        }
    }
}

/// Domain errors represent tree rule violations.
///
/// `DuplicateValue` is an input condition the caller may choose to ignore,
/// `TooDeep` means the tree outgrew the slot numbering of level queries.
/// The structural variants signal a bug in the calling code and must never be
/// dropped silently.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    #[error("duplicate value: {0}")]
    DuplicateValue(String),

    #[error("invalid structural operation: tree already has a root")]
    RootExists,

    #[error("invalid structural operation: {side} child slot already occupied")]
    SlotOccupied { side: Side },

    #[error("invalid structural operation: node does not belong to this tree")]
    UnknownNode,

    #[error("level {level} is too deep to number its slots")]
    TooDeep { level: usize },
}

impl DomainError {
    /// True for the "invalid structural operation" family.
    pub fn is_structural(&self) -> bool {
        matches!(
            self,
            DomainError::RootExists | DomainError::SlotOccupied { .. } | DomainError::UnknownNode
        )
    }
}

/// Result type for domain operations.
pub type DomainResult<T> = Result<T, DomainError>;
