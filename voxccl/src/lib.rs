//! voxccl - Streaming connected component labeling for Rust
//!
//! # Overview
//!
//! voxccl labels the connected foreground components of 3D volumes that
//! are read and written one slice at a time, so volumes larger than memory
//! can be processed. It provides:
//!
//! - Volume data types and slice-streaming source/sink traits
//! - In-memory and raw-file sources and sinks
//! - Two-pass streaming labeling with 6-, 18- or 26-connectivity and
//!   pluggable per-component metadata
//!
//! # Example
//!
//! ```
//! use voxccl::region::{Connectivity, StreamingOptions, label_volume};
//! use voxccl::{Dimensions, NonZero, Volume};
//!
//! let dims = Dimensions::new(4, 4, 2);
//! let volume = Volume::from_points(dims, &[(0, 0, 0), (3, 3, 1)], 1u8).unwrap();
//! let (_, stats) = label_volume(&volume, &StreamingOptions::new(Connectivity::Six), &NonZero).unwrap();
//! assert_eq!(stats.num_components, 2);
//! ```

// Re-export core types (primary data structures used everywhere)
pub use voxccl_core::*;

// Re-export domain crates as modules to avoid name conflicts
pub use voxccl_io as io;
pub use voxccl_region as region;
