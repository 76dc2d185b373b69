//! voxccl-io - Volume sources and sinks
//!
//! Concrete [`VolumeSource`](voxccl_core::VolumeSource) and
//! [`VolumeSink`](voxccl_core::VolumeSink) implementations:
//!
//! - [`MemorySource`] / [`MemorySink`] - resident volumes, with optional
//!   simulated failures
//! - [`RawVolumeReader`] / [`RawVolumeWriter`] - a streaming slice file
//!   format that never loads more than one slice
//!
//! # Examples
//!
//! ```
//! use voxccl_core::{Dimensions, Volume, VolumeSource};
//! use voxccl_io::MemorySource;
//!
//! let volume = Volume::<u8>::new(Dimensions::new(8, 8, 4)).unwrap();
//! let mut source = MemorySource::new(volume);
//! let slice = source.read_slice(3).unwrap();
//! assert_eq!(slice.width(), 8);
//! ```

pub mod error;
pub mod memory;
pub mod raw;

pub use error::{IoError, IoResult};
pub use memory::{MemorySink, MemorySource};
pub use raw::{RawVolumeReader, RawVolumeWriter, read_volume, write_volume};
