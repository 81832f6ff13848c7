//! Level-by-level slot enumeration.
//!
//! Level 1 is `[root]`. Each following level holds, for every slot of the
//! previous one, its left child then its right child, with `None` standing
//! in for a missing child or for both children of an empty slot. Level `k`
//! therefore always has `2^(k-1)` slots and slot `i` sits under slot `i / 2`.
//!
//! The dense form grows exponentially with the level. Renderers walking a
//! deep tree use [`TreeArena::occupied_levels`], which only carries the
//! occupied slots together with their slot numbers.

use generational_arena::Index;
use tracing::{debug, instrument};

use crate::domain::arena::TreeArena;
use crate::domain::error::{DomainError, DomainResult};
use crate::domain::search_tree::SearchTree;

/// One position at a level: a node or an empty slot.
pub type Slot = Option<Index>;

/// An occupied position at a level: slot number and node.
pub type Placed = (usize, Index);

/// Deepest level whose slot count `2^(level-1)` fits in a `usize`.
pub const MAX_NUMBERED_LEVEL: usize = usize::BITS as usize;

/// Number of slots at `level`, `None` for level 0 or beyond
/// [`MAX_NUMBERED_LEVEL`].
pub fn slot_count(level: usize) -> Option<usize> {
    let shift = u32::try_from(level.checked_sub(1)?).ok()?;
    1usize.checked_shl(shift)
}

impl<T> TreeArena<T> {
    /// Slots at `level` (1-indexed). Level 0 has no slots.
    #[instrument(level = "debug", skip(self))]
    pub fn nodes_at_level(&self, level: usize) -> Vec<Slot> {
        if level == 0 {
            return Vec::new();
        }

        let mut slots = vec![self.root()];
        for _ in 1..level {
            slots = self.expand_level(&slots);
        }
        slots
    }

    /// Every level from 1 up to and including `depth`.
    pub fn levels(&self, depth: usize) -> Vec<Vec<Slot>> {
        let mut levels: Vec<Vec<Slot>> = Vec::with_capacity(depth);
        if depth == 0 {
            return levels;
        }
        levels.push(vec![self.root()]);
        while levels.len() < depth {
            let next = match levels.last() {
                Some(previous) => self.expand_level(previous),
                None => break,
            };
            levels.push(next);
        }
        levels
    }

    /// Occupied slots of every level from 1 up to and including `depth`, in
    /// slot order. Empty slots are skipped, so the cost is bounded by the
    /// number of nodes rather than by `2^depth`.
    ///
    /// Fails with [`DomainError::TooDeep`] when `depth` exceeds
    /// [`MAX_NUMBERED_LEVEL`].
    #[instrument(level = "debug", skip(self))]
    pub fn occupied_levels(&self, depth: usize) -> DomainResult<Vec<Vec<Placed>>> {
        if depth > MAX_NUMBERED_LEVEL {
            return Err(DomainError::TooDeep { level: depth });
        }

        let mut levels: Vec<Vec<Placed>> = Vec::with_capacity(depth);
        let mut current: Vec<Placed> = self.root().map(|r| (0, r)).into_iter().collect();
        while levels.len() < depth {
            let next = self.expand_occupied(&current)?;
            levels.push(std::mem::replace(&mut current, next));
        }
        debug!(depth, "occupied levels collected");
        Ok(levels)
    }

    fn expand_occupied(&self, placed: &[Placed]) -> DomainResult<Vec<Placed>> {
        let mut next = Vec::new();
        for &(slot, idx) in placed {
            let left_slot = slot.checked_mul(2).ok_or(DomainError::TooDeep {
                level: MAX_NUMBERED_LEVEL + 1,
            })?;
            if let Some(left) = self.left(idx) {
                next.push((left_slot, left));
            }
            if let Some(right) = self.right(idx) {
                next.push((left_slot + 1, right));
            }
        }
        Ok(next)
    }

    fn expand_level(&self, slots: &[Slot]) -> Vec<Slot> {
        slots
            .iter()
            .flat_map(|slot| match slot {
                Some(idx) => [self.left(*idx), self.right(*idx)],
                None => [None, None],
            })
            .collect()
    }
}

impl<T> SearchTree<T> {
    pub fn nodes_at_level(&self, level: usize) -> Vec<Slot> {
        self.arena().nodes_at_level(level)
    }

    /// Levels 1 through the cached height.
    pub fn levels(&self) -> Vec<Vec<Slot>> {
        self.arena().levels(self.height())
    }

    /// Occupied slots of levels 1 through `depth`. See
    /// [`TreeArena::occupied_levels`].
    pub fn occupied_levels(&self, depth: usize) -> DomainResult<Vec<Vec<Placed>>> {
        self.arena().occupied_levels(depth)
    }
}
