//! Slice - one z-plane of a volume
//!
//! A `Slice` is the unit that flows between volume sources, the labeling
//! engine and volume sinks. It is a 2D array of voxels, one voxel thick
//! in z.
//!
//! # Memory Layout
//!
//! Data is stored in row-major order with no padding. The voxel at (x, y)
//! is at index `y * width + x`.

use crate::error::{Error, Result};
use crate::{Dimensions, Voxel};

/// A 2D plane of voxels.
#[derive(Debug, Clone, PartialEq)]
pub struct Slice<T> {
    width: u32,
    height: u32,
    data: Vec<T>,
}

impl<T: Voxel> Slice<T> {
    /// Create a new slice with every voxel set to zero.
    ///
    /// # Errors
    ///
    /// Returns `Error::InvalidDimension` if width or height is 0.
    pub fn new(width: u32, height: u32) -> Result<Self> {
        Self::new_with_value(width, height, T::default())
    }

    /// Create a new slice with every voxel set to `value`.
    pub fn new_with_value(width: u32, height: u32, value: T) -> Result<Self> {
        if width == 0 || height == 0 {
            return Err(Error::InvalidDimension(Dimensions::new(width, height, 1)));
        }
        let size = width as usize * height as usize;
        Ok(Self {
            width,
            height,
            data: vec![value; size],
        })
    }

    /// Create a slice from row-major voxel data.
    ///
    /// # Errors
    ///
    /// Returns an error if dimensions are invalid or the data length
    /// doesn't match.
    pub fn from_data(width: u32, height: u32, data: Vec<T>) -> Result<Self> {
        if width == 0 || height == 0 {
            return Err(Error::InvalidDimension(Dimensions::new(width, height, 1)));
        }
        let expected = width as usize * height as usize;
        if data.len() != expected {
            return Err(Error::InvalidParameter(format!(
                "data length {} doesn't match {}x{} = {}",
                data.len(),
                width,
                height,
                expected
            )));
        }
        Ok(Self {
            width,
            height,
            data,
        })
    }

    /// Slice width (row length) in voxels
    #[inline]
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Slice height (rows) in voxels
    #[inline]
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Get a voxel, or `None` when out of bounds.
    #[inline]
    pub fn get(&self, x: u32, y: u32) -> Option<T> {
        if x >= self.width || y >= self.height {
            return None;
        }
        Some(self.data[y as usize * self.width as usize + x as usize])
    }

    /// Get a voxel without checking `x` against the row length.
    ///
    /// # Panics
    ///
    /// Panics if the linear index is out of range.
    #[inline]
    pub fn get_unchecked(&self, x: u32, y: u32) -> T {
        self.data[y as usize * self.width as usize + x as usize]
    }

    /// Set a voxel.
    ///
    /// # Errors
    ///
    /// Returns `Error::IndexOutOfBounds` if `(x, y)` lies outside the slice.
    pub fn set(&mut self, x: u32, y: u32, value: T) -> Result<()> {
        if x >= self.width || y >= self.height {
            return Err(Error::IndexOutOfBounds {
                index: y as usize * self.width as usize + x as usize,
                len: self.data.len(),
            });
        }
        let idx = y as usize * self.width as usize + x as usize;
        self.data[idx] = value;
        Ok(())
    }

    /// One row of the slice.
    #[inline]
    pub fn row(&self, y: u32) -> &[T] {
        let start = y as usize * self.width as usize;
        &self.data[start..start + self.width as usize]
    }

    /// One row of the slice, mutably.
    #[inline]
    pub fn row_mut(&mut self, y: u32) -> &mut [T] {
        let start = y as usize * self.width as usize;
        let width = self.width as usize;
        &mut self.data[start..start + width]
    }

    /// Reset every voxel to zero.
    pub fn clear(&mut self) {
        self.data.fill(T::default());
    }

    /// Raw voxel data
    #[inline]
    pub fn data(&self) -> &[T] {
        &self.data
    }

    /// Consume the slice, returning its voxel data.
    pub fn into_data(self) -> Vec<T> {
        self.data
    }
}
