//! I/O error types
//!
//! Provides a unified error type for volume I/O. File-backed sources and
//! sinks report `IoError` from their inherent methods; when they are used
//! through the [`VolumeSource`](voxccl_core::VolumeSource) /
//! [`VolumeSink`](voxccl_core::VolumeSink) traits the error converts into
//! [`voxccl_core::Error`] so the labeling engine sees one error type.

use thiserror::Error;

/// Error type for volume I/O operations.
#[derive(Error, Debug)]
pub enum IoError {
    /// Standard I/O error (file not found, permission denied, etc.)
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The file holds a voxel type other than the one requested
    #[error("unsupported format: {0}")]
    UnsupportedFormat(String),

    /// The file header or trailer is structurally invalid
    #[error("invalid volume data: {0}")]
    InvalidData(String),

    /// The file is missing slices or the trailer written on completion
    #[error("incomplete volume: {written} of {expected} slices present")]
    Incomplete { written: u32, expected: u32 },

    /// An error from the core library (e.g. dimension mismatch)
    #[error("core error: {0}")]
    Core(#[from] voxccl_core::Error),
}

/// Convenience alias for I/O results.
pub type IoResult<T> = Result<T, IoError>;

impl From<IoError> for voxccl_core::Error {
    fn from(err: IoError) -> Self {
        match err {
            IoError::Io(e) => voxccl_core::Error::Io(e),
            IoError::Core(e) => e,
            IoError::Incomplete { written, expected } => {
                voxccl_core::Error::IncompleteVolume { written, expected }
            }
            IoError::UnsupportedFormat(msg) | IoError::InvalidData(msg) => {
                voxccl_core::Error::DecodeError(msg)
            }
        }
    }
}
