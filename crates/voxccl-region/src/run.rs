//! Foreground runs
//!
//! A run is a maximal interval of foreground voxels on one row of one
//! slice. Runs are the leaves of the union-find forest: each one carries
//! an optional parent composition and the label assigned to it while it
//! is still a root.

use crate::forest::CompositionId;

/// Row coordinate within the volume: row `y` of slice `z`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct RowPosition {
    pub y: u32,
    pub z: u32,
}

impl RowPosition {
    pub const fn new(y: u32, z: u32) -> Self {
        Self { y, z }
    }
}

/// The voxels covered by a run: x in `[lower, upper)` on one row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RunExtent {
    pub position: RowPosition,
    /// First foreground x (inclusive)
    pub lower: u32,
    /// First background x after the run (exclusive)
    pub upper: u32,
}

impl RunExtent {
    pub fn new(position: RowPosition, lower: u32, upper: u32) -> Self {
        debug_assert!(lower < upper, "empty run [{lower}, {upper})");
        Self {
            position,
            lower,
            upper,
        }
    }

    /// Number of voxels in the run.
    #[inline]
    pub fn len(&self) -> u32 {
        self.upper - self.lower
    }

    /// Always false; runs hold at least one voxel.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.upper == self.lower
    }
}

/// A run and its place in the union-find forest.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Run {
    extent: RunExtent,
    pub(crate) parent: Option<CompositionId>,
    pub(crate) id: u32,
}

impl Run {
    /// Create a run that is its own root.
    pub fn new(position: RowPosition, lower: u32, upper: u32) -> Self {
        Self {
            extent: RunExtent::new(position, lower, upper),
            parent: None,
            id: 0,
        }
    }

    pub fn extent(&self) -> &RunExtent {
        &self.extent
    }

    #[inline]
    pub fn lower(&self) -> u32 {
        self.extent.lower
    }

    #[inline]
    pub fn upper(&self) -> u32 {
        self.extent.upper
    }

    pub fn position(&self) -> RowPosition {
        self.extent.position
    }

    /// Number of voxels in the run.
    #[inline]
    pub fn len(&self) -> u32 {
        self.extent.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.extent.is_empty()
    }

    /// Whether the run has never been merged with anything.
    pub fn is_root(&self) -> bool {
        self.parent.is_none()
    }
}
