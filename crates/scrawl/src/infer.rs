//! Interactive Inference - Single Drawing Classification
//!
//! The path behind the demo's "recognize" button: normalize the drawing
//! canvas, run one prediction, read off the argmax verdict.
//!
//! @version 0.1.0
//! @author `Scrawl` Development Team

use scrawl_eval::Prediction;
use scrawl_vision::{Canvas, Normalizer};

use crate::classifier::Classifier;
use crate::error::{Result, RunError};

/// Classifies one freehand drawing.
///
/// Normalization failures and classifier failures surface as run errors; a
/// canvas with no ink is not a failure and classifies as whatever the model
/// makes of a blank input.
pub fn classify_drawing<C: Classifier>(
    classifier: &C,
    normalizer: &Normalizer,
    canvas: &Canvas,
) -> Result<Prediction> {
    let image = normalizer.normalize(canvas)?;
    let probabilities = classifier
        .predict(image.as_slice(), 1)
        .map_err(RunError::classifier)?;
    Prediction::from_probabilities(&probabilities)
        .ok_or_else(|| RunError::classifier("empty probability row"))
}

// =============================================================================
// Tests
// =============================================================================
