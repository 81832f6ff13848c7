//! Text renderings of a tree: labeled preorder outline and `termtree` display.

use std::fmt::Display;

use generational_arena::Index;
use itertools::Itertools;
use termtree::Tree;
use tracing::instrument;

use crate::domain::{SearchTree, TreeArena};

/// Preorder outline, one line per node.
///
/// Each line is indented two spaces per depth and carries a dotted label
/// giving the node's position among existing children (left first), e.g.
/// `"    1.2 4"`. The root line holds the bare value.
#[instrument(level = "debug", skip(tree))]
pub fn labeled_outline<T: Display>(tree: &SearchTree<T>) -> Vec<String> {
    let arena = tree.arena();
    let mut lines = Vec::with_capacity(arena.len());
    let mut stack: Vec<(Index, Vec<usize>)> = arena.root().map(|r| (r, Vec::new())).into_iter().collect();

    while let Some((idx, path)) = stack.pop() {
        let Some(node) = arena.get_node(idx) else {
            continue;
        };
        let indent = "  ".repeat(path.len());
        let label = if path.is_empty() {
            String::new()
        } else {
            format!("{} ", path.iter().join("."))
        };
        lines.push(format!("{indent}{label}{}", node.value));

        let children: Vec<Index> = node.children().collect();
        for (position, child) in children.into_iter().enumerate().rev() {
            let mut child_path = path.clone();
            child_path.push(position + 1);
            stack.push((child, child_path));
        }
    }

    lines
}

pub trait TreeNodeConvert {
    fn to_tree_string(&self) -> Tree<String>;
}

impl<T: Display> TreeNodeConvert for TreeArena<T> {
    fn to_tree_string(&self) -> Tree<String> {
        let Some(root_idx) = self.root() else {
            return Tree::new("(empty tree)".to_string());
        };
        let Some(root) = self.get_node(root_idx) else {
            return Tree::new("(empty tree)".to_string());
        };

        fn build_tree<T: Display>(arena: &TreeArena<T>, node_idx: Index, parent_tree: &mut Tree<String>) {
            let Some(node) = arena.get_node(node_idx) else {
                return;
            };
            for (tag, child_idx) in [("L", node.left), ("R", node.right)] {
                let Some(child_idx) = child_idx else { continue };
                if let Some(child) = arena.get_node(child_idx) {
                    let mut child_tree = Tree::new(format!("{tag}: {}", child.value));
                    build_tree(arena, child_idx, &mut child_tree);
                    parent_tree.push(child_tree);
                }
            }
        }

        let mut tree = Tree::new(root.value.to_string());
        build_tree(self, root_idx, &mut tree);
        tree
    }
}

impl<T: Display> TreeNodeConvert for SearchTree<T> {
    fn to_tree_string(&self) -> Tree<String> {
        self.arena().to_tree_string()
    }
}
