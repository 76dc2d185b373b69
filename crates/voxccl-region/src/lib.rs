//! voxccl-region - Connected component labeling of large volumes
//!
//! This crate labels the connected foreground components of 3D volumes
//! that are streamed slice by slice:
//!
//! - **Streaming labeling** - Two-pass labeling over run-length rows with
//!   memory bounded by the number of runs, not voxels
//! - **Union-find forest** - Reference-counted compositions of runs with
//!   pluggable per-component metadata
//! - **Flood fill** - In-memory reference labeling
//!
//! # Examples
//!
//! ## Labeling an in-memory volume
//!
//! ```
//! use voxccl_core::{Dimensions, NonZero, Volume};
//! use voxccl_region::{Connectivity, StreamingOptions, label_volume};
//!
//! let dims = Dimensions::new(4, 4, 2);
//! let points = [(0, 0, 0), (1, 0, 0), (0, 1, 0), (1, 1, 0), (3, 3, 1)];
//! let volume = Volume::from_points(dims, &points, 1u8).unwrap();
//!
//! let options = StreamingOptions::new(Connectivity::Six);
//! let (labels, stats) = label_volume(&volume, &options, &NonZero).unwrap();
//! assert_eq!(stats.num_components, 2);
//! assert_eq!(labels.get(3, 3, 1), Some(2));
//! ```
//!
//! ## Filtering small components
//!
//! ```
//! use voxccl_core::{Dimensions, NonZero, Volume};
//! use voxccl_io::{MemorySink, MemorySource};
//! use voxccl_region::{StreamingComponents, StreamingOptions, VoxelCount};
//!
//! let dims = Dimensions::new(4, 4, 2);
//! let volume = Volume::from_points(dims, &[(0, 0, 0), (1, 0, 0), (3, 3, 1)], 1u8).unwrap();
//! let mut sink = MemorySink::<u32>::new(dims).unwrap();
//!
//! let stats = StreamingComponents::<VoxelCount>::new(StreamingOptions::default())
//!     .with_constraint(|count| count.0 >= 2)
//!     .cca(&mut MemorySource::new(volume), &mut sink, &NonZero)
//!     .unwrap();
//! assert_eq!(stats.num_components, 1);
//! assert_eq!(sink.volume().get(3, 3, 1), Some(0));
//! ```

pub mod connectivity;
pub mod error;
pub mod forest;
pub mod metadata;
pub mod progress;
pub mod row;
pub mod row_storage;
pub mod run;
pub mod seedfill;
pub mod streaming;

pub use connectivity::{Connectivity, Overlap};
pub use error::{RegionError, RegionResult};
pub use forest::{CompositionId, Forest, Root};
pub use metadata::{BoundingBox, ComponentSummary, RunMetadata, VoxelCount};
pub use progress::{NoProgress, ProgressReporter};
pub use row::Row;
pub use row_storage::RowStorage;
pub use run::{RowPosition, Run, RunExtent};
pub use seedfill::floodfill_label;
pub use streaming::{
    CcaStats, OutputMode, StreamingComponents, StreamingOptions, components_of_volume,
    label_volume,
};
