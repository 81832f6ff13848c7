use generational_arena::{Arena, Index};
use tracing::{debug, instrument};

use crate::domain::error::{DomainError, DomainResult, Side};

/// Tree node in the arena-based binary tree.
#[derive(Debug, Clone)]
pub struct TreeNode<T> {
    /// Value held by this node
    pub value: T,
    /// Index of parent node in the arena, None for the root.
    /// Non-owning back-reference; the arena owns every node.
    pub parent: Option<Index>,
    /// Index of the left child
    pub left: Option<Index>,
    /// Index of the right child
    pub right: Option<Index>,
}

impl<T> TreeNode<T> {
    fn child(&self, side: Side) -> Option<Index> {
        match side {
            Side::Left => self.left,
            Side::Right => self.right,
        }
    }

    /// Existing children, left before right.
    pub fn children(&self) -> impl Iterator<Item = Index> {
        self.left.into_iter().chain(self.right)
    }
}

/// Arena-based binary tree container.
///
/// Nodes are only ever created through [`add_root`](Self::add_root),
/// [`add_left`](Self::add_left) and [`add_right`](Self::add_right) and are never
/// removed. The height is cached and NOT maintained by the mutators: callers
/// run [`recompute_height`](Self::recompute_height) after structural changes,
/// otherwise [`height`](Self::height) reports the last recomputed value.
#[derive(Debug, Clone)]
pub struct TreeArena<T> {
    /// Arena storage for all tree nodes
    arena: Arena<TreeNode<T>>,
    /// Index of the root node, None for empty trees
    root: Option<Index>,
    /// Height as of the last recomputation
    height: usize,
}

impl<T> Default for TreeArena<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> TreeArena<T> {
    pub fn new() -> Self {
        Self {
            arena: Arena::new(),
            root: None,
            height: 0,
        }
    }

    pub fn len(&self) -> usize {
        self.arena.len()
    }

    pub fn is_empty(&self) -> bool {
        self.root.is_none()
    }

    #[instrument(level = "trace", skip(self))]
    pub fn root(&self) -> Option<Index> {
        self.root
    }

    #[instrument(level = "trace", skip(self))]
    pub fn get_node(&self, idx: Index) -> Option<&TreeNode<T>> {
        self.arena.get(idx)
    }

    pub fn value(&self, idx: Index) -> Option<&T> {
        self.arena.get(idx).map(|node| &node.value)
    }

    #[instrument(level = "trace", skip(self))]
    pub fn left(&self, idx: Index) -> Option<Index> {
        self.arena.get(idx).and_then(|node| node.left)
    }

    #[instrument(level = "trace", skip(self))]
    pub fn right(&self, idx: Index) -> Option<Index> {
        self.arena.get(idx).and_then(|node| node.right)
    }

    #[instrument(level = "trace", skip(self))]
    pub fn parent(&self, idx: Index) -> Option<Index> {
        self.arena.get(idx).and_then(|node| node.parent)
    }

    /// Creates the root node. Fails if the tree already has one.
    #[instrument(level = "trace", skip(self, value))]
    pub fn add_root(&mut self, value: T) -> DomainResult<Index> {
        if self.root.is_some() {
            return Err(DomainError::RootExists);
        }
        let idx = self.arena.insert(TreeNode {
            value,
            parent: None,
            left: None,
            right: None,
        });
        self.root = Some(idx);
        Ok(idx)
    }

    /// Attaches a new left child to `parent`. Fails if the slot is taken.
    pub fn add_left(&mut self, parent: Index, value: T) -> DomainResult<Index> {
        self.add_child(parent, Side::Left, value)
    }

    /// Attaches a new right child to `parent`. Fails if the slot is taken.
    pub fn add_right(&mut self, parent: Index, value: T) -> DomainResult<Index> {
        self.add_child(parent, Side::Right, value)
    }

    #[instrument(level = "trace", skip(self, value))]
    fn add_child(&mut self, parent: Index, side: Side, value: T) -> DomainResult<Index> {
        let parent_node = self.arena.get(parent).ok_or(DomainError::UnknownNode)?;
        if parent_node.child(side).is_some() {
            return Err(DomainError::SlotOccupied { side });
        }

        let idx = self.arena.insert(TreeNode {
            value,
            parent: Some(parent),
            left: None,
            right: None,
        });
        // parent existence was checked above and nothing is ever removed
        if let Some(parent_node) = self.arena.get_mut(parent) {
            match side {
                Side::Left => parent_node.left = Some(idx),
                Side::Right => parent_node.right = Some(idx),
            }
        }
        Ok(idx)
    }

    /// Cached height, 0 for an empty tree and 1 for a lone root.
    /// May be stale if nodes were added since the last recomputation.
    pub fn height(&self) -> usize {
        self.height
    }

    /// Measures the height and stores it as the cached value.
    #[instrument(level = "debug", skip(self))]
    pub fn recompute_height(&mut self) -> usize {
        self.height = self.measure_height();
        debug!(height = self.height, "height recomputed");
        self.height
    }

    /// Measures the height without touching the cache.
    ///
    /// Depth starts at 1 on the root and grows by one per edge; the result is
    /// the deepest depth reached.
    #[instrument(level = "trace", skip(self))]
    pub fn measure_height(&self) -> usize {
        let mut max_depth = 0;
        let mut stack: Vec<(Index, usize)> = self.root.map(|r| (r, 1)).into_iter().collect();

        while let Some((idx, depth)) = stack.pop() {
            max_depth = max_depth.max(depth);
            if let Some(node) = self.arena.get(idx) {
                for child in node.children() {
                    stack.push((child, depth + 1));
                }
            }
        }

        max_depth
    }

    /// Depth of `idx` counted in nodes along the parent chain (root = 1).
    pub fn depth(&self, idx: Index) -> Option<usize> {
        self.arena.get(idx)?;
        let mut depth = 1;
        let mut walk = self.parent(idx);
        while let Some(p) = walk {
            depth += 1;
            walk = self.parent(p);
        }
        Some(depth)
    }

    /// Preorder iteration, left subtree before right subtree.
    #[instrument(level = "trace", skip(self))]
    pub fn iter(&self) -> TreeIterator<'_, T> {
        TreeIterator::new(self)
    }
}

pub struct TreeIterator<'a, T> {
    arena: &'a TreeArena<T>,
    stack: Vec<Index>,
}

impl<'a, T> TreeIterator<'a, T> {
    fn new(arena: &'a TreeArena<T>) -> Self {
        let mut stack = Vec::new();
        if let Some(root) = arena.root() {
            stack.push(root);
        }
        Self { arena, stack }
    }
}

impl<'a, T> Iterator for TreeIterator<'a, T> {
    type Item = (Index, &'a TreeNode<T>);

    fn next(&mut self) -> Option<Self::Item> {
        let current_idx = self.stack.pop()?;
        let node = self.arena.get_node(current_idx)?;
        // Push right first so the left child is visited first
        if let Some(right) = node.right {
            self.stack.push(right);
        }
        if let Some(left) = node.left {
            self.stack.push(left);
        }
        Some((current_idx, node))
    }
}
