//! Per-component metadata
//!
//! Every run seeds a metadata value with [`RunMetadata::from_run`]; whenever
//! two components merge, the surviving root folds the other's value in with
//! [`RunMetadata::accumulate`]. The engine needs nothing else from the type,
//! so any associative summary works: voxel counts, bounding boxes, sums.
//!
//! # Examples
//!
//! ```
//! use voxccl_region::{BoundingBox, RowPosition, RunExtent, RunMetadata, VoxelCount};
//!
//! let a = RunExtent::new(RowPosition::new(0, 0), 2, 5);
//! let b = RunExtent::new(RowPosition::new(1, 0), 0, 1);
//!
//! let mut count = VoxelCount::from_run(&a);
//! count.accumulate(&VoxelCount::from_run(&b));
//! assert_eq!(count.0, 4);
//!
//! let mut bounds = BoundingBox::from_run(&a);
//! bounds.accumulate(&BoundingBox::from_run(&b));
//! assert_eq!(bounds.min, [0, 0, 0]);
//! assert_eq!(bounds.max, [4, 1, 0]);
//! ```

use crate::run::RunExtent;
use std::ops::AddAssign;

/// Combinable summary of a set of runs.
pub trait RunMetadata: Clone {
    /// Metadata of a single run.
    fn from_run(extent: &RunExtent) -> Self;

    /// Fold `other` into `self`.
    ///
    /// Must be associative and the result must not depend on merge order.
    fn accumulate(&mut self, other: &Self);
}

impl RunMetadata for () {
    #[inline]
    fn from_run(_extent: &RunExtent) -> Self {}

    #[inline]
    fn accumulate(&mut self, _other: &Self) {}
}

impl<A: RunMetadata, B: RunMetadata> RunMetadata for (A, B) {
    fn from_run(extent: &RunExtent) -> Self {
        (A::from_run(extent), B::from_run(extent))
    }

    fn accumulate(&mut self, other: &Self) {
        self.0.accumulate(&other.0);
        self.1.accumulate(&other.1);
    }
}

/// Number of voxels in a component
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct VoxelCount(pub u64);

impl RunMetadata for VoxelCount {
    #[inline]
    fn from_run(extent: &RunExtent) -> Self {
        VoxelCount(extent.len() as u64)
    }

    #[inline]
    fn accumulate(&mut self, other: &Self) {
        self.0 += other.0;
    }
}

impl AddAssign for VoxelCount {
    fn add_assign(&mut self, other: Self) {
        self.accumulate(&other);
    }
}

/// Inclusive voxel-space bounding box of a component
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct BoundingBox {
    /// Smallest (x, y, z) of any voxel
    pub min: [u32; 3],
    /// Largest (x, y, z) of any voxel
    pub max: [u32; 3],
}

impl BoundingBox {
    /// Extent along each axis in voxels.
    pub fn size(&self) -> [u32; 3] {
        [
            self.max[0] - self.min[0] + 1,
            self.max[1] - self.min[1] + 1,
            self.max[2] - self.min[2] + 1,
        ]
    }

    /// Whether `(x, y, z)` lies inside the box.
    pub fn contains(&self, x: u32, y: u32, z: u32) -> bool {
        (self.min[0]..=self.max[0]).contains(&x)
            && (self.min[1]..=self.max[1]).contains(&y)
            && (self.min[2]..=self.max[2]).contains(&z)
    }
}

impl RunMetadata for BoundingBox {
    fn from_run(extent: &RunExtent) -> Self {
        let RunExtent {
            position,
            lower,
            upper,
        } = *extent;
        BoundingBox {
            min: [lower, position.y, position.z],
            max: [upper - 1, position.y, position.z],
        }
    }

    fn accumulate(&mut self, other: &Self) {
        for axis in 0..3 {
            self.min[axis] = self.min[axis].min(other.min[axis]);
            self.max[axis] = self.max[axis].max(other.max[axis]);
        }
    }
}

impl AddAssign for BoundingBox {
    fn add_assign(&mut self, other: Self) {
        self.accumulate(&other);
    }
}

/// Voxel count, bounding box and centroid of a component
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ComponentSummary {
    pub voxels: u64,
    pub bounds: BoundingBox,
    coordinate_sum: [f64; 3],
}

impl ComponentSummary {
    /// Mean voxel coordinate.
    pub fn centroid(&self) -> [f64; 3] {
        let n = self.voxels as f64;
        [
            self.coordinate_sum[0] / n,
            self.coordinate_sum[1] / n,
            self.coordinate_sum[2] / n,
        ]
    }
}

impl RunMetadata for ComponentSummary {
    fn from_run(extent: &RunExtent) -> Self {
        let n = extent.len() as f64;
        // Sum of lower..upper is n * (lower + upper - 1) / 2
        let x_sum = n * (extent.lower as f64 + extent.upper as f64 - 1.0) / 2.0;
        ComponentSummary {
            voxels: extent.len() as u64,
            bounds: BoundingBox::from_run(extent),
            coordinate_sum: [
                x_sum,
                n * extent.position.y as f64,
                n * extent.position.z as f64,
            ],
        }
    }

    fn accumulate(&mut self, other: &Self) {
        self.voxels += other.voxels;
        self.bounds.accumulate(&other.bounds);
        for axis in 0..3 {
            self.coordinate_sum[axis] += other.coordinate_sum[axis];
        }
    }
}

impl AddAssign for ComponentSummary {
    fn add_assign(&mut self, other: Self) {
        self.accumulate(&other);
    }
}
