//! Slice-streaming collaborator traits
//!
//! The labeling engine reads its input one slice at a time through
//! [`VolumeSource`] and writes its output one slice at a time, in
//! increasing z, through [`VolumeSink`]. Neither trait requires the whole
//! volume to be resident, which is what lets the engine run on volumes
//! larger than memory.

use crate::error::Result;
use crate::{Dimensions, Slice, SpatialMetadata, ValueRange, Voxel};

/// A volume that can be read slice by slice.
pub trait VolumeSource {
    /// Voxel type of the slices produced
    type Voxel: Voxel;

    /// Volume size in voxels.
    fn dimensions(&self) -> Dimensions;

    /// Read slice `z`.
    ///
    /// # Errors
    ///
    /// Any failure to produce the slice (I/O, decode, out of range).
    fn read_slice(&mut self, z: u32) -> Result<Slice<Self::Voxel>>;

    /// Spatial placement of the volume.
    fn spatial_metadata(&self) -> SpatialMetadata {
        SpatialMetadata::default()
    }
}

/// A volume that is written slice by slice in increasing z.
pub trait VolumeSink {
    /// Voxel type of the slices accepted
    type Voxel: Voxel;

    /// Volume size in voxels.
    fn dimensions(&self) -> Dimensions;

    /// Append slice `z`.
    ///
    /// # Errors
    ///
    /// Any failure to store the slice, including slices written out of order.
    fn write_slice(&mut self, slice: &Slice<Self::Voxel>, z: u32) -> Result<()>;

    /// Record the spatial placement of the volume.
    fn set_spatial_metadata(&mut self, metadata: SpatialMetadata);

    /// Record the range of values the voxel data can hold.
    fn set_value_range(&mut self, range: ValueRange);

    /// Record the minimum and maximum voxel values actually written.
    fn set_min_max(&mut self, min_max: ValueRange);
}
