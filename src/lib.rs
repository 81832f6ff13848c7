//! Binary search tree playground.
//!
//! A [`SearchTree`](domain::SearchTree) accepts values through two policies:
//! ordered insertion, which keeps the search order, and leftmost-corrupt
//! insertion, which always attaches at the end of the left spine. The tree
//! can report whether it still passes its (single-chain) order check, looks
//! values up with binary descent or a left-spine scan depending on that
//! check, and enumerates its levels slot by slot for layout purposes.
//!
//! ```
//! use treeartist::domain::{InsertMode, SearchTree};
//!
//! let mut tree = SearchTree::from_values([10, 5, 15], InsertMode::Ordered).unwrap();
//! assert!(tree.is_valid());
//! tree.insert_leftmost_corrupt(20).unwrap();
//! assert!(!tree.is_valid());
//! ```

pub mod application;
pub mod cli;
pub mod config;
pub mod domain;
pub mod exitcode;
pub mod util;

pub use domain::{InsertMode, SearchTree};
