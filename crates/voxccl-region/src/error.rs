//! Error types for voxccl-region

use thiserror::Error;
use voxccl_core::Dimensions;

/// Errors that can occur during volume labeling
#[derive(Debug, Error)]
pub enum RegionError {
    /// Core library error, including slice I/O failures of sources and sinks
    #[error("core error: {0}")]
    Core(#[from] voxccl_core::Error),

    /// Input and output volumes differ in size
    #[error("dimensions of input and output differ: input {input}, output {output}")]
    DimensionMismatch {
        input: Dimensions,
        output: Dimensions,
    },

    /// A volume axis is one voxel or less
    #[error("degenerate volume {0}: every axis must be larger than one voxel")]
    DegenerateVolume(Dimensions),

    /// More components than the output voxel type can label distinctly
    #[error("more than {limit} components cannot be labeled in {voxel_type} voxels")]
    LabelOverflow {
        limit: u32,
        voxel_type: &'static str,
    },

    /// Invalid parameters
    #[error("invalid parameters: {0}")]
    InvalidParameters(String),
}

/// Result type for region operations
pub type RegionResult<T> = Result<T, RegionError>;
