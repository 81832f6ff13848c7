//! Level-driven 2D layout for tree renderers.
//!
//! Produces coordinates only; drawing is up to the consumer. The canvas is
//! square with side `height * unit`, the origin is bottom-left and the root
//! sits on top. Level `L` is placed at
//! `y = side - L * side / (height + 1)` and splits the width into
//! `2^(L-1) + 1` equal steps, slot `i` taking `x = (i + 1) * step`.
//!
//! All arithmetic is done in `f64`, so row gaps keep their fractional part
//! (a height-2 tree puts its root at `y = 133.33`, not at a rounded pixel).

use std::collections::HashMap;

use generational_arena::Index;
use tracing::{debug, instrument};

use crate::application::ApplicationResult;
use crate::config::LayoutConfig;
use crate::domain::{slot_count, DomainError, SearchTree};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PlacedNode<T> {
    pub node: Index,
    pub value: T,
    /// 1-indexed level
    pub level: usize,
    /// Position within the level, counting empty slots
    pub slot: usize,
    pub center: Point,
}

/// Connector from the top of a child circle to the bottom of its parent's.
#[derive(Debug, Clone, PartialEq)]
pub struct Edge {
    pub child: Index,
    pub parent: Index,
    pub from: Point,
    pub to: Point,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Layout<T> {
    pub width: f64,
    pub height: f64,
    pub radius: f64,
    /// Placed nodes, level by level, left to right
    pub nodes: Vec<PlacedNode<T>>,
    pub edges: Vec<Edge>,
}

impl<T: Clone> Layout<T> {
    /// Lays out the tree using its cached height; recompute it first if nodes
    /// were added since.
    ///
    /// Only occupied slots are visited. Fails with `DomainError::TooDeep` when
    /// the height exceeds the levels whose slots can be numbered.
    #[instrument(level = "debug", skip(tree))]
    pub fn compute(tree: &SearchTree<T>, config: &LayoutConfig) -> ApplicationResult<Self> {
        let levels = tree.height();
        let side = levels as f64 * config.unit;
        let mut layout = Layout {
            width: side,
            height: side,
            radius: config.radius,
            nodes: Vec::with_capacity(tree.len()),
            edges: Vec::new(),
        };
        if levels == 0 {
            return Ok(layout);
        }

        let row_gap = side / (levels as f64 + 1.0);
        let mut centers: HashMap<Index, Point> = HashMap::new();

        for (offset, placed) in tree.occupied_levels(levels)?.into_iter().enumerate() {
            let level = offset + 1;
            let slots = slot_count(level).ok_or(DomainError::TooDeep { level })?;
            let step = side / (slots as f64 + 1.0);
            let y = side - level as f64 * row_gap;

            for (slot, idx) in placed {
                let Some(value) = tree.value(idx) else { continue };
                let center = Point {
                    x: step + slot as f64 * step,
                    y,
                };

                if let Some(parent) = tree.arena().parent(idx) {
                    if let Some(parent_center) = centers.get(&parent) {
                        layout.edges.push(Edge {
                            child: idx,
                            parent,
                            from: Point {
                                x: center.x,
                                y: center.y + config.radius,
                            },
                            to: Point {
                                x: parent_center.x,
                                y: parent_center.y - config.radius,
                            },
                        });
                    }
                }

                centers.insert(idx, center);
                layout.nodes.push(PlacedNode {
                    node: idx,
                    value: value.clone(),
                    level,
                    slot,
                    center,
                });
            }
        }

        debug!(
            nodes = layout.nodes.len(),
            edges = layout.edges.len(),
            "layout computed"
        );
        Ok(layout)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::InsertMode;

    #[test]
    fn given_empty_tree_when_laying_out_then_canvas_is_empty() {
        let tree: SearchTree<i64> = SearchTree::new();
        let layout = Layout::compute(&tree, &LayoutConfig::default()).unwrap();
        assert_eq!(layout.width, 0.0);
        assert!(layout.nodes.is_empty());
        assert!(layout.edges.is_empty());
    }

    #[test]
    fn given_lone_root_when_laying_out_then_centered_without_edges() {
        let tree = SearchTree::from_values([42_i64], InsertMode::Ordered).unwrap();
        let layout = Layout::compute(&tree, &LayoutConfig::default()).unwrap();
        assert_eq!(layout.width, 100.0);
        assert_eq!(layout.nodes.len(), 1);
        assert_eq!(layout.nodes[0].center, Point { x: 50.0, y: 50.0 });
        assert!(layout.edges.is_empty());
    }

    #[test]
    fn given_height_two_when_laying_out_then_row_gap_keeps_fraction() {
        let tree = SearchTree::from_values([5_i64, 3], InsertMode::Ordered).unwrap();
        let layout = Layout::compute(&tree, &LayoutConfig::default()).unwrap();
        assert!((layout.nodes[0].center.y - 400.0 / 3.0).abs() < 1e-9);
        assert!((layout.nodes[1].center.y - 200.0 / 3.0).abs() < 1e-9);
    }

    #[test]
    fn given_long_ascending_chain_when_laying_out_then_places_every_node() {
        let tree = SearchTree::from_values(1..=36_i64, InsertMode::Ordered).unwrap();
        let layout = Layout::compute(&tree, &LayoutConfig::default()).unwrap();

        assert_eq!(layout.width, 3600.0);
        assert_eq!(layout.nodes.len(), 36);
        assert_eq!(layout.edges.len(), 35);
        let deepest = &layout.nodes[35];
        assert_eq!(deepest.value, 36);
        assert_eq!(deepest.level, 36);
        assert_eq!(deepest.slot, (1usize << 35) - 1);
        assert!(deepest.center.x > layout.nodes[34].center.x);
    }

    #[test]
    fn given_chain_deeper_than_slot_numbering_when_laying_out_then_too_deep() {
        let depth = crate::domain::MAX_NUMBERED_LEVEL + 1;
        let tree = SearchTree::from_values((0..depth as i64).rev(), InsertMode::Ordered).unwrap();
        let result = Layout::compute(&tree, &LayoutConfig::default());
        assert!(matches!(
            result,
            Err(crate::application::ApplicationError::Domain(DomainError::TooDeep { .. }))
        ));
    }
}
