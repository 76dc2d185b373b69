//! Volume dimensions

use std::fmt;

/// Size of a volume in voxels along x (row length), y (rows per slice)
/// and z (slice count).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Dimensions {
    pub x: u32,
    pub y: u32,
    pub z: u32,
}

impl Dimensions {
    /// Create new dimensions.
    pub const fn new(x: u32, y: u32, z: u32) -> Self {
        Self { x, y, z }
    }

    /// Total number of voxels.
    #[inline]
    pub fn voxel_count(&self) -> u64 {
        self.x as u64 * self.y as u64 * self.z as u64
    }

    /// Number of voxels in one slice.
    #[inline]
    pub fn slice_len(&self) -> usize {
        self.x as usize * self.y as usize
    }

    /// Total number of rows (scanlines) over all slices.
    #[inline]
    pub fn row_count(&self) -> usize {
        self.y as usize * self.z as usize
    }

    /// Whether any axis has zero extent.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.x == 0 || self.y == 0 || self.z == 0
    }

    /// Whether any axis has an extent of one voxel or less.
    #[inline]
    pub fn is_degenerate(&self) -> bool {
        self.x <= 1 || self.y <= 1 || self.z <= 1
    }

    /// Whether `(x, y, z)` lies inside the volume.
    #[inline]
    pub fn contains(&self, x: u32, y: u32, z: u32) -> bool {
        x < self.x && y < self.y && z < self.z
    }

    /// Linear index of `(x, y, z)` in x-fastest order.
    #[inline]
    pub fn index(&self, x: u32, y: u32, z: u32) -> usize {
        (z as usize * self.y as usize + y as usize) * self.x as usize + x as usize
    }
}

impl fmt::Display for Dimensions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}x{}", self.x, self.y, self.z)
    }
}

impl From<(u32, u32, u32)> for Dimensions {
    fn from((x, y, z): (u32, u32, u32)) -> Self {
        Self { x, y, z }
    }
}
