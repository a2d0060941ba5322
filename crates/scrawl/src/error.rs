//! Error Types - Facade Error Handling
//!
//! Unifies the data and vision error surfaces with classifier-reported
//! failures for callers driving whole runs.
//!
//! @version 0.1.0
//! @author `Scrawl` Development Team

use thiserror::Error;

use scrawl_data::DataError;
use scrawl_vision::NormalizeError;

// =============================================================================
// Error Types
// =============================================================================

/// The error type for training and evaluation runs.
#[derive(Error, Debug)]
pub enum RunError {
    /// Data-side failure (load, decode, indexing).
    #[error(transparent)]
    Data(#[from] DataError),

    /// Drawing normalization failure.
    #[error(transparent)]
    Normalize(#[from] NormalizeError),

    /// The external classifier capability reported a failure.
    #[error("Classifier failed: {reason}")]
    Classifier {
        /// Description passed through from the classifier.
        reason: String,
    },
}

impl RunError {
    /// Creates a classifier failure from any displayable reason.
    #[must_use]
    pub fn classifier(reason: impl Into<String>) -> Self {
        Self::Classifier {
            reason: reason.into(),
        }
    }
}

/// A specialized Result type for run operations.
pub type Result<T> = core::result::Result<T, RunError>;

// =============================================================================
// Tests
// =============================================================================
