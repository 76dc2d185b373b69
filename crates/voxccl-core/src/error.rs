//! Error types for voxccl-core
//!
//! Provides a unified error type for volume containers and for the
//! source/sink collaborators that stream slices in and out of the
//! labeling engine.

use crate::Dimensions;
use thiserror::Error;

/// voxccl-core error type
#[derive(Error, Debug)]
pub enum Error {
    /// Invalid volume or slice dimensions
    #[error("invalid dimensions: {0}")]
    InvalidDimension(Dimensions),

    /// Two containers that must agree in size do not
    #[error("dimension mismatch: expected {expected}, got {actual}")]
    DimensionMismatch {
        expected: Dimensions,
        actual: Dimensions,
    },

    /// Index out of bounds
    #[error("index out of bounds: {index} >= {len}")]
    IndexOutOfBounds { index: usize, len: usize },

    /// A sink received a slice out of streaming order
    #[error("slice written out of order: expected z = {expected}, got z = {actual}")]
    OutOfOrderSlice { expected: u32, actual: u32 },

    /// A volume is missing trailing slices or its trailer
    #[error("incomplete volume: {written} of {expected} slices present")]
    IncompleteVolume { written: u32, expected: u32 },

    /// Invalid parameter value
    #[error("invalid parameter: {0}")]
    InvalidParameter(String),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Volume decode error
    #[error("decode error: {0}")]
    DecodeError(String),
}

/// Result type alias for voxccl-core operations
pub type Result<T> = std::result::Result<T, Error>;
