//! Binary search tree with two insertion policies and an adaptive lookup.
//!
//! Ordered insertion keeps the search order intact, leftmost-corrupt
//! insertion deliberately ignores it. `search` checks the tree with
//! [`SearchTree::is_valid`] on each call and falls back to a left-spine scan
//! once the tree has been corrupted.

use std::fmt;
use std::str::FromStr;

use generational_arena::Index;
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

use crate::domain::arena::TreeArena;
use crate::domain::error::{DomainError, DomainResult};

/// Insertion policy used when feeding values into the tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum InsertMode {
    /// Keeps the BST order, ties go right
    #[default]
    Ordered,
    /// Always attaches at the leftmost position, ignoring order
    #[serde(alias = "corrupt")]
    LeftmostCorrupt,
}

impl fmt::Display for InsertMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InsertMode::Ordered => write!(f, "ordered"),
            InsertMode::LeftmostCorrupt => write!(f, "leftmost-corrupt"),
        }
    }
}

impl FromStr for InsertMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "ordered" => Ok(InsertMode::Ordered),
            "leftmost-corrupt" | "corrupt" => Ok(InsertMode::LeftmostCorrupt),
            other => Err(format!(
                "unknown insert mode '{other}' (expected 'ordered' or 'leftmost-corrupt')"
            )),
        }
    }
}

/// Lookup algorithm chosen by [`SearchTree::search`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchStrategy {
    /// Binary descent, used while the validator accepts the tree
    Ordered,
    /// Linear scan over the left spine, used once the validator rejects it
    LeftSpine,
}

impl fmt::Display for SearchStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SearchStrategy::Ordered => write!(f, "ordered"),
            SearchStrategy::LeftSpine => write!(f, "left-spine"),
        }
    }
}

#[derive(Debug, Clone)]
pub struct SearchTree<T> {
    tree: TreeArena<T>,
}

impl<T> Default for SearchTree<T> {
    fn default() -> Self {
        Self {
            tree: TreeArena::new(),
        }
    }
}

/// Wraps a hand-built container, e.g. to probe the validator on shapes the
/// insertion policies cannot produce. The height is recomputed.
impl<T> From<TreeArena<T>> for SearchTree<T> {
    fn from(mut tree: TreeArena<T>) -> Self {
        tree.recompute_height();
        Self { tree }
    }
}

impl<T> SearchTree<T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Read access to the underlying container.
    pub fn arena(&self) -> &TreeArena<T> {
        &self.tree
    }

    pub fn root(&self) -> Option<Index> {
        self.tree.root()
    }

    pub fn value(&self, idx: Index) -> Option<&T> {
        self.tree.value(idx)
    }

    pub fn len(&self) -> usize {
        self.tree.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tree.is_empty()
    }

    /// Cached height. See [`TreeArena::height`].
    pub fn height(&self) -> usize {
        self.tree.height()
    }

    pub fn recompute_height(&mut self) -> usize {
        self.tree.recompute_height()
    }

    /// End of the left spine.
    pub fn leftmost(&self) -> Option<Index> {
        let mut walk = self.tree.root()?;
        while let Some(left) = self.tree.left(walk) {
            walk = left;
        }
        Some(walk)
    }
}

impl<T: Ord + fmt::Display> SearchTree<T> {
    /// Builds a tree by inserting every value with the same policy, then
    /// recomputes the cached height once.
    #[instrument(level = "debug", skip(values))]
    pub fn from_values<I>(values: I, mode: InsertMode) -> DomainResult<Self>
    where
        I: IntoIterator<Item = T>,
    {
        let mut tree = Self::new();
        for value in values {
            tree.insert(value, mode)?;
        }
        tree.recompute_height();
        Ok(tree)
    }

    /// Inserts with the given policy. Does not recompute the height.
    pub fn insert(&mut self, value: T, mode: InsertMode) -> DomainResult<Index> {
        match mode {
            InsertMode::Ordered => self.insert_ordered(value),
            InsertMode::LeftmostCorrupt => self.insert_leftmost_corrupt(value),
        }
    }

    /// Inserts at the ordered position: smaller values go left, equal or
    /// greater go right.
    ///
    /// Duplicates are detected with [`search`](Self::search), so on a
    /// corrupted tree a value off the left spine is not seen as present.
    #[instrument(level = "debug", skip(self, value), fields(value = %value))]
    pub fn insert_ordered(&mut self, value: T) -> DomainResult<Index> {
        if self.search(&value).is_some() {
            return Err(DomainError::DuplicateValue(value.to_string()));
        }

        let Some(mut walk) = self.tree.root() else {
            debug!("empty tree, value becomes root");
            return self.tree.add_root(value);
        };

        loop {
            let node = self.tree.get_node(walk).ok_or(DomainError::UnknownNode)?;
            let (goes_left, left, right) = (value < node.value, node.left, node.right);
            if goes_left {
                match left {
                    Some(left) => walk = left,
                    None => return self.tree.add_left(walk, value),
                }
            } else {
                match right {
                    Some(right) => walk = right,
                    None => return self.tree.add_right(walk, value),
                }
            }
        }
    }

    /// Attaches the value as left child of the leftmost node, whatever its
    /// value. No duplicate check.
    #[instrument(level = "debug", skip(self, value), fields(value = %value))]
    pub fn insert_leftmost_corrupt(&mut self, value: T) -> DomainResult<Index> {
        match self.leftmost() {
            None => self.tree.add_root(value),
            Some(leftmost) => self.tree.add_left(leftmost, value),
        }
    }

    /// Single-chain order check.
    ///
    /// At each node only one child is inspected: the left one if present
    /// (it must not exceed the node), else the right one (it must not be
    /// smaller). The walk continues into that child only, so a node with two
    /// children never has its right branch checked. An empty tree is valid.
    #[instrument(level = "debug", skip(self))]
    pub fn is_valid(&self) -> bool {
        let Some(mut walk) = self.tree.root() else {
            return true;
        };

        while let Some(node) = self.tree.get_node(walk) {
            let next = if let Some(left) = node.left {
                if self.tree.value(left).is_some_and(|v| node.value < *v) {
                    debug!(parent = %node.value, "left child out of order");
                    return false;
                }
                left
            } else if let Some(right) = node.right {
                if self.tree.value(right).is_some_and(|v| node.value > *v) {
                    debug!(parent = %node.value, "right child out of order");
                    return false;
                }
                right
            } else {
                return true;
            };
            walk = next;
        }
        true
    }

    /// Full ordering check over every node: all values in a left subtree are
    /// `<=` the node, all values in a right subtree are `>=` it.
    ///
    /// Unlike [`is_valid`](Self::is_valid) this inspects both children. It
    /// does not influence [`search`](Self::search).
    #[instrument(level = "debug", skip(self))]
    pub fn is_fully_ordered(&self) -> bool {
        let mut stack: Vec<(Index, Option<&T>, Option<&T>)> = self
            .tree
            .root()
            .map(|r| (r, None, None))
            .into_iter()
            .collect();

        while let Some((idx, low, high)) = stack.pop() {
            let Some(node) = self.tree.get_node(idx) else {
                continue;
            };
            if low.is_some_and(|l| node.value < *l) || high.is_some_and(|h| node.value > *h) {
                return false;
            }
            if let Some(left) = node.left {
                stack.push((left, low, Some(&node.value)));
            }
            if let Some(right) = node.right {
                stack.push((right, Some(&node.value), high));
            }
        }
        true
    }

    /// Strategy [`search`](Self::search) would use right now.
    pub fn search_strategy(&self) -> SearchStrategy {
        if self.is_valid() {
            SearchStrategy::Ordered
        } else {
            SearchStrategy::LeftSpine
        }
    }

    /// Looks up `value`.
    ///
    /// The root is compared first. Otherwise a tree accepted by
    /// [`is_valid`](Self::is_valid) is searched by binary descent, and a
    /// rejected one only along its left spine: nodes off the spine are never
    /// found in that case.
    #[instrument(level = "debug", skip(self, value), fields(value = %value))]
    pub fn search(&self, value: &T) -> Option<Index> {
        let root = self.tree.root()?;
        if self.tree.value(root)? == value {
            return Some(root);
        }

        match self.search_strategy() {
            SearchStrategy::Ordered => self.ordered_search(root, value),
            SearchStrategy::LeftSpine => {
                debug!("tree is not a valid search tree, scanning left spine");
                self.left_spine_search(value)
            }
        }
    }

    fn ordered_search(&self, start: Index, value: &T) -> Option<Index> {
        let mut walk = start;
        loop {
            let node = self.tree.get_node(walk)?;
            if node.value == *value {
                return Some(walk);
            }
            walk = if *value < node.value {
                node.left?
            } else {
                node.right?
            };
        }
    }

    fn left_spine_search(&self, value: &T) -> Option<Index> {
        let mut walk = self.tree.root();
        while let Some(idx) = walk {
            if self.tree.value(idx)? == value {
                return Some(idx);
            }
            walk = self.tree.left(idx);
        }
        None
    }
}
