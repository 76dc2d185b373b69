//! voxccl-core - Basic data structures for streaming volume labeling
//!
//! This crate provides the data structures shared by the voxccl crates:
//!
//! - [`Dimensions`] - Volume extent along x, y and z
//! - [`Voxel`] - Scalar voxel element types
//! - [`Slice`] - One z-plane of voxels, the unit of streaming
//! - [`Volume`] - Full in-memory voxel array
//! - [`SpatialMetadata`] / [`ValueRange`] - Metadata carried with volumes
//! - [`VolumeSource`] / [`VolumeSink`] - Slice-streaming collaborators
//! - [`Foreground`] - Binary voxel classification
//!
//! # Examples
//!
//! ```
//! use voxccl_core::{Dimensions, Foreground, NonZero, Volume};
//!
//! let dims = Dimensions::new(4, 4, 2);
//! let volume = Volume::from_points(dims, &[(1, 1, 0)], 255u8).unwrap();
//! let slice = volume.slice(0).unwrap();
//! assert!(NonZero.is_foreground(&slice, 1, 1));
//! assert!(!NonZero.is_foreground(&slice, 0, 0));
//! ```

pub mod classify;
pub mod dims;
pub mod error;
pub mod slice;
pub mod volume;
pub mod voxel;

pub use classify::{Foreground, NonZero, Threshold};
pub use dims::Dimensions;
pub use error::{Error, Result};
pub use slice::Slice;
pub use volume::{SpatialMetadata, ValueRange, Volume, VolumeSink, VolumeSource};
pub use voxel::Voxel;
