//! Domain layer: the binary tree container and the search tree built on it
//!
//! This layer is independent of external concerns (no I/O, no CLI, no config loading).

pub mod arena;
pub mod error;
pub mod levels;
pub mod search_tree;

pub use arena::{TreeArena, TreeIterator, TreeNode};
pub use error::{DomainError, DomainResult, Side};
pub use generational_arena::Index;
pub use levels::{slot_count, Placed, Slot, MAX_NUMBERED_LEVEL};
pub use search_tree::{InsertMode, SearchStrategy, SearchTree};
