//! scrawl-data - Dataset Loading and Batch Sampling
//!
//! Provides the data side of the scrawl digit-recognition pipeline:
//! - `AtlasLayout` / `SpriteDecoder` for packed sprite-sheet decoding
//! - `ByteSource` implementations for memory, file and HTTP payloads
//! - `Dataset` with a fixed train/test partition and shuffled index cursors
//! - `BatchSampler` / `Batch` for fixed-size training and test batches
//!
//! # Example
//!
//! ```ignore
//! use scrawl_data::prelude::*;
//!
//! let atlas = HttpSource::new("https://example.com/mnist_images.png");
//! let labels = HttpSource::new("https://example.com/mnist_labels_uint8");
//! let mut dataset = Dataset::load(&atlas, &labels, AtlasLayout::mnist())?;
//!
//! let sampler = BatchSampler::train(512);
//! let batch = sampler.next_batch(&mut dataset)?;
//! assert_eq!(batch.pixel_shape(), [512, 784]);
//! ```
//!
//! @version 0.1.0
//! @author `Scrawl` Development Team

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::cast_precision_loss)]
#![allow(clippy::cast_sign_loss)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]

// =============================================================================
// Module Declarations
// =============================================================================

pub mod atlas;
pub mod dataset;
pub mod error;
pub mod sampler;
pub mod source;

// =============================================================================
// Re-exports
// =============================================================================

pub use atlas::{AtlasLayout, DecodedAtlas, SpriteDecoder};
pub use dataset::{Dataset, Partition};
pub use error::{DataError, Result};
pub use sampler::{Batch, BatchSampler};
pub use source::{ByteSource, FileSource, HttpSource, MemorySource};

// =============================================================================
// Prelude
// =============================================================================

/// Common imports for data loading.
pub mod prelude {
    pub use crate::{
        AtlasLayout, Batch, BatchSampler, ByteSource, DataError, Dataset, DecodedAtlas,
        FileSource, HttpSource, MemorySource, Partition, SpriteDecoder,
    };
}
