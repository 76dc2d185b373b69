//! Volume - in-memory 3D voxel container
//!
//! `Volume` holds a full 3D array of voxels. The labeling engine never
//! needs one: it only sees slices through [`VolumeSource`] and
//! [`VolumeSink`]. Volumes exist for small data, for the in-memory
//! collaborators in `voxccl-io`, and for reference computations in tests.
//!
//! # Memory Layout
//!
//! Data is stored x-fastest with no padding. The voxel at (x, y, z) is at
//! index `(z * dims.y + y) * dims.x + x`.

mod spatial;
mod stream;

pub use spatial::{SpatialMetadata, ValueRange};
pub use stream::{VolumeSink, VolumeSource};

use crate::error::{Error, Result};
use crate::{Dimensions, Slice, Voxel};

/// In-memory 3D voxel array.
#[derive(Debug, Clone, PartialEq)]
pub struct Volume<T> {
    dims: Dimensions,
    data: Vec<T>,
}

impl<T: Voxel> Volume<T> {
    /// Create a volume with every voxel set to zero.
    ///
    /// # Errors
    ///
    /// Returns `Error::InvalidDimension` if any axis is 0.
    pub fn new(dims: Dimensions) -> Result<Self> {
        if dims.is_empty() {
            return Err(Error::InvalidDimension(dims));
        }
        Ok(Self {
            dims,
            data: vec![T::default(); dims.voxel_count() as usize],
        })
    }

    /// Create a volume from x-fastest voxel data.
    pub fn from_data(dims: Dimensions, data: Vec<T>) -> Result<Self> {
        if dims.is_empty() {
            return Err(Error::InvalidDimension(dims));
        }
        if data.len() as u64 != dims.voxel_count() {
            return Err(Error::InvalidParameter(format!(
                "data length {} doesn't match {} = {}",
                data.len(),
                dims,
                dims.voxel_count()
            )));
        }
        Ok(Self { dims, data })
    }

    /// Create a volume where the listed coordinates hold `value`.
    pub fn from_points(dims: Dimensions, points: &[(u32, u32, u32)], value: T) -> Result<Self> {
        let mut volume = Self::new(dims)?;
        for &(x, y, z) in points {
            volume.set(x, y, z, value)?;
        }
        Ok(volume)
    }

    #[inline]
    pub fn dimensions(&self) -> Dimensions {
        self.dims
    }

    /// Get a voxel, or `None` when out of bounds.
    #[inline]
    pub fn get(&self, x: u32, y: u32, z: u32) -> Option<T> {
        if !self.dims.contains(x, y, z) {
            return None;
        }
        Some(self.data[self.dims.index(x, y, z)])
    }

    /// Set a voxel.
    ///
    /// # Errors
    ///
    /// Returns `Error::IndexOutOfBounds` if the coordinate is outside.
    pub fn set(&mut self, x: u32, y: u32, z: u32, value: T) -> Result<()> {
        if !self.dims.contains(x, y, z) {
            return Err(Error::IndexOutOfBounds {
                index: self.dims.index(x, y, z),
                len: self.data.len(),
            });
        }
        let idx = self.dims.index(x, y, z);
        self.data[idx] = value;
        Ok(())
    }

    /// Copy slice `z` out of the volume.
    pub fn slice(&self, z: u32) -> Result<Slice<T>> {
        if z >= self.dims.z {
            return Err(Error::IndexOutOfBounds {
                index: z as usize,
                len: self.dims.z as usize,
            });
        }
        let len = self.dims.slice_len();
        let start = z as usize * len;
        Slice::from_data(self.dims.x, self.dims.y, self.data[start..start + len].to_vec())
    }

    /// Overwrite slice `z` with `slice`.
    pub fn set_slice(&mut self, z: u32, slice: &Slice<T>) -> Result<()> {
        if z >= self.dims.z {
            return Err(Error::IndexOutOfBounds {
                index: z as usize,
                len: self.dims.z as usize,
            });
        }
        let slice_dims = Dimensions::new(slice.width(), slice.height(), self.dims.z);
        if slice_dims != self.dims {
            return Err(Error::DimensionMismatch {
                expected: self.dims,
                actual: slice_dims,
            });
        }
        let len = self.dims.slice_len();
        let start = z as usize * len;
        self.data[start..start + len].copy_from_slice(slice.data());
        Ok(())
    }

    /// Number of voxels that differ from zero.
    pub fn count_nonzero(&self) -> u64 {
        self.data.iter().filter(|v| v.is_nonzero()).count() as u64
    }

    /// Raw voxel data
    #[inline]
    pub fn data(&self) -> &[T] {
        &self.data
    }
}
