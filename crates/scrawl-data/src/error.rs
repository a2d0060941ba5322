//! Error Types - Scrawl Data Error Handling
//!
//! Provides the error type shared by atlas decoding, resource loading and
//! dataset indexing.
//!
//! # Key Features
//! - One unified error type for all data-side operations
//! - Decode and load failures carry enough context to diagnose bad inputs
//! - Integration with `std::error::Error`
//!
//! @version 0.1.0
//! @author `Scrawl` Development Team

use thiserror::Error;

// =============================================================================
// Error Types
// =============================================================================

/// The main error type for scrawl data operations.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DataError {
    /// Atlas or label stream inconsistent with the declared layout.
    ///
    /// Fatal to the load that produced it; there is no partial dataset to
    /// recover.
    #[error("Decode failed: {reason}")]
    Decode {
        /// Description of the inconsistency.
        reason: String,
    },

    /// Fetching a resource failed (I/O, HTTP, missing file).
    ///
    /// The caller may retry the whole load.
    #[error("Load failed from {origin}: {reason}")]
    Load {
        /// Name of the source that failed.
        origin: String,
        /// Description of the failure.
        reason: String,
    },

    /// Index outside the addressed partition.
    ///
    /// Indicates a cursor or partition invariant violation in the caller.
    #[error("Index out of bounds: index {index} for partition of size {len}")]
    IndexOutOfBounds {
        /// The offending index.
        index: usize,
        /// Size of the partition that was addressed.
        len: usize,
    },
}

// =============================================================================
// Result Type
// =============================================================================

/// A specialized Result type for scrawl data operations.
pub type Result<T> = core::result::Result<T, DataError>;

// =============================================================================
// Helper Functions
// =============================================================================

impl DataError {
    /// Creates a new decode error.
    #[must_use]
    pub fn decode(reason: impl Into<String>) -> Self {
        Self::Decode {
            reason: reason.into(),
        }
    }

    /// Creates a new load error for the named source.
    #[must_use]
    pub fn load(source: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Load {
            origin: source.into(),
            reason: reason.into(),
        }
    }
}

// =============================================================================
// Tests
// =============================================================================
