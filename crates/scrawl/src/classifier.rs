//! Classifier Capability - External Model Boundary
//!
//! The pipeline never defines or inspects a model; it drives one through
//! this trait. A host wires in whatever backend it has (a WASM-bound graph,
//! a native network, a remote service) and the run loops stay unchanged.
//!
//! @version 0.1.0
//! @author `Scrawl` Development Team

use scrawl_data::Batch;

// =============================================================================
// Fit Configuration
// =============================================================================

/// Options forwarded to one `fit` call.
#[derive(Debug, Clone, Copy)]
pub struct FitOptions {
    /// Sub-batch size the classifier should step with.
    pub batch_size: usize,
    /// Number of passes over the handed batch.
    pub epochs: usize,
}

impl FitOptions {
    /// Creates options stepping the full batch once.
    #[must_use]
    pub fn new(batch_size: usize) -> Self {
        Self {
            batch_size,
            epochs: 1,
        }
    }

    /// Builder: sets the number of passes over the batch.
    #[must_use]
    pub fn epochs(mut self, epochs: usize) -> Self {
        self.epochs = epochs.max(1);
        self
    }
}

/// Metrics a classifier reports back from one `fit` call.
#[derive(Debug, Clone, Copy)]
pub struct FitMetrics {
    /// Training loss on the handed batch.
    pub loss: f32,
    /// Batch accuracy, when the backend computes one.
    pub accuracy: Option<f32>,
}

// =============================================================================
// Classifier Trait
// =============================================================================

/// The opaque classification capability.
///
/// Errors are backend-specific and travel as plain strings; the run loops
/// wrap them into their own error type without interpreting them.
pub trait Classifier {
    /// Runs inference over `batch_size` images laid out row-major in
    /// `pixels` and returns a row-major `[batch_size, classes]` probability
    /// matrix.
    fn predict(&self, pixels: &[f32], batch_size: usize) -> Result<Vec<f32>, String>;

    /// Fits the model on one batch and reports the resulting metrics.
    fn fit(&mut self, batch: &Batch, options: &FitOptions) -> Result<FitMetrics, String>;
}

// =============================================================================
// Tests
// =============================================================================
