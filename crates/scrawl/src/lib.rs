//! # Scrawl - Handwritten-Digit Demo Pipeline
//!
//! Scrawl is the data-and-evaluation backbone of an interactive digit
//! recognition demo. It covers everything around the model, while the model
//! itself stays an opaque capability behind the [`Classifier`] trait:
//!
//! - **Data**: sprite-atlas decoding, train/test partitioning, shuffled
//!   batch sampling (`scrawl-data`)
//! - **Vision**: freehand-canvas normalization into the canonical 28x28
//!   input (`scrawl-vision`)
//! - **Evaluation**: running accuracy, confusion matrix, per-class accuracy,
//!   JSON reports (`scrawl-eval`)
//! - **Runs**: cooperative training and evaluation loops with stop tokens,
//!   yield hooks and checkpoints (this crate)
//!
//! # Quick Start
//!
//! ```ignore
//! use scrawl::prelude::*;
//!
//! let atlas = HttpSource::new("https://example.com/mnist_images.png");
//! let labels = HttpSource::new("https://example.com/mnist_labels_uint8");
//! let mut dataset = Dataset::load(&atlas, &labels, AtlasLayout::mnist())?;
//!
//! let config = RunConfig::new().iterations(10_000).batch_size(32);
//! let stop = StopToken::new();
//! let outcome = scrawl::train(
//!     &mut my_model,
//!     &mut dataset,
//!     &config,
//!     &stop,
//!     &mut ProgressLogger,
//! )?;
//!
//! println!("{}", EvalReport::from_aggregator(&outcome.test_stats).to_json()?);
//! ```
//!
//! @version 0.1.0
//! @author `Scrawl` Development Team

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::cast_precision_loss)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]

// =============================================================================
// Module Declarations
// =============================================================================

pub mod classifier;
pub mod error;
pub mod infer;
pub mod runner;

// =============================================================================
// Re-exports
// =============================================================================

pub use classifier::{Classifier, FitMetrics, FitOptions};
pub use error::{Result, RunError};
pub use infer::classify_drawing;
pub use runner::{
    evaluate, train, Checkpoint, EvalOutcome, NullObserver, ProgressLogger, RunConfig,
    RunObserver, StopToken, TrainOutcome,
};

pub use scrawl_data::{
    AtlasLayout, Batch, BatchSampler, ByteSource, DataError, Dataset, DecodedAtlas, FileSource,
    HttpSource, MemorySource, Partition, SpriteDecoder,
};
pub use scrawl_eval::{ConfusionMatrix, EvalAggregator, EvalReport, Prediction};
pub use scrawl_vision::{Canvas, InkBox, NormalizeError, NormalizedImage, Normalizer};

// =============================================================================
// Prelude
// =============================================================================

/// Common imports for driving the pipeline.
pub mod prelude {
    pub use crate::classifier::{Classifier, FitMetrics, FitOptions};
    pub use crate::error::RunError;
    pub use crate::infer::classify_drawing;
    pub use crate::runner::{
        evaluate, train, Checkpoint, NullObserver, ProgressLogger, RunConfig, RunObserver,
        StopToken,
    };
    pub use scrawl_data::prelude::*;
    pub use scrawl_eval::prelude::*;
    pub use scrawl_vision::prelude::*;
}
