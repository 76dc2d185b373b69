//! Error types for the test framework

use thiserror::Error;

/// Errors that can occur while building test volumes
#[derive(Debug, Error)]
pub enum TestError {
    /// Core library error
    #[error("core error: {0}")]
    Core(#[from] voxccl_core::Error),

    /// Invalid generator parameter
    #[error("invalid parameter: {0}")]
    InvalidParameter(String),
}

/// Result type for test operations
pub type TestResult<T> = Result<T, TestError>;
