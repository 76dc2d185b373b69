//! voxccl-test - Regression test framework for voxccl
//!
//! Regression tests accumulate comparison failures in a [`RegParams`]
//! instead of panicking at the first one, then report them all in
//! [`RegParams::cleanup`]. Label volumes are compared as partitions, since
//! two correct labelings may number their components differently.
//!
//! # Usage
//!
//! ```ignore
//! use voxccl_test::RegParams;
//!
//! let mut rp = RegParams::new("streaming");
//! rp.compare_values(2.0, stats.num_components as f64, 0.0);
//! rp.compare_partitions(&expected, &labels);
//! assert!(rp.cleanup());
//! ```
//!
//! # Environment Variables
//!
//! - `REGTEST_VERBOSE`: Set to "1" to print the differing slices of
//!   mismatched volumes

mod error;
mod params;
pub mod partition;
pub mod synthetic;

pub use error::{TestError, TestResult};
pub use params::RegParams;
pub use partition::{PartitionMismatch, component_sizes, same_partition};
pub use synthetic::{fill_box, random_volume};
