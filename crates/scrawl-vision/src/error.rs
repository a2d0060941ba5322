//! Error Types - Scrawl Vision Error Handling
//!
//! @version 0.1.0
//! @author `Scrawl` Development Team

use thiserror::Error;

// =============================================================================
// Error Types
// =============================================================================

/// The error type for canvas handling and normalization.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum NormalizeError {
    /// RGBA buffer length inconsistent with the declared dimensions.
    #[error("Canvas buffer is {actual} bytes, {width}x{height} RGBA requires {expected}")]
    BufferMismatch {
        /// Declared canvas width.
        width: usize,
        /// Declared canvas height.
        height: usize,
        /// Expected buffer length.
        expected: usize,
        /// Actual buffer length.
        actual: usize,
    },

    /// Source canvas smaller than the target resolution in at least one
    /// axis. The caller must guarantee source >= target.
    #[error("Canvas is {width}x{height}, normalization requires at least {target}x{target}")]
    SourceTooSmall {
        /// Source canvas width.
        width: usize,
        /// Source canvas height.
        height: usize,
        /// Required minimum extent per axis.
        target: usize,
    },
}

/// A specialized Result type for scrawl vision operations.
pub type Result<T> = core::result::Result<T, NormalizeError>;

// =============================================================================
// Tests
// =============================================================================
