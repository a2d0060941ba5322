//! Batch Sampler - Fixed-Size Batch Assembly
//!
//! Draws examples through a partition's shuffle cursor and stacks them into
//! row-major pixel and label matrices. Batch order is draw order; nothing is
//! re-sorted. Repeated full passes over a partition replay the permutation
//! fixed at load time, so draws are without replacement within one cycle and
//! with replacement across cycles.
//!
//! @version 0.1.0
//! @author `Scrawl` Development Team

use crate::dataset::{Dataset, Partition};
use crate::error::Result;

// =============================================================================
// Batch
// =============================================================================

/// A caller-owned batch of examples.
///
/// Pixels form a `[len, pixels_per_example]` matrix and labels a
/// `[len, classes]` one-hot matrix, both row-major. The batch shares nothing
/// with the dataset it was drawn from; its lifetime is one training or
/// inference step.
#[derive(Debug, Clone)]
pub struct Batch {
    pixels: Vec<f32>,
    labels: Vec<f32>,
    size: usize,
    pixels_per_example: usize,
    classes: usize,
}

impl Batch {
    /// Number of examples in the batch.
    #[must_use]
    pub fn len(&self) -> usize {
        self.size
    }

    /// Returns true if the batch holds no examples.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.size == 0
    }

    /// Shape of the pixel matrix, `[len, pixels_per_example]`.
    #[must_use]
    pub fn pixel_shape(&self) -> [usize; 2] {
        [self.size, self.pixels_per_example]
    }

    /// Shape of the label matrix, `[len, classes]`.
    #[must_use]
    pub fn label_shape(&self) -> [usize; 2] {
        [self.size, self.classes]
    }

    /// The full row-major pixel matrix.
    #[must_use]
    pub fn pixels(&self) -> &[f32] {
        &self.pixels
    }

    /// The full row-major one-hot label matrix.
    #[must_use]
    pub fn labels(&self) -> &[f32] {
        &self.labels
    }

    /// Pixel row of one example.
    #[must_use]
    pub fn pixel_row(&self, i: usize) -> &[f32] {
        let p = self.pixels_per_example;
        &self.pixels[i * p..(i + 1) * p]
    }

    /// One-hot label row of one example.
    #[must_use]
    pub fn label_row(&self, i: usize) -> &[f32] {
        let c = self.classes;
        &self.labels[i * c..(i + 1) * c]
    }

    /// Class index of one example, read off its one-hot row.
    #[must_use]
    pub fn class_of(&self, i: usize) -> usize {
        self.label_row(i)
            .iter()
            .position(|&v| v >= 0.5)
            .unwrap_or(0)
    }

    /// Renders one example as terminal ASCII art.
    ///
    /// `width` is the example image width; intensity maps onto a five-step
    /// character ramp.
    #[must_use]
    pub fn ascii_art(&self, i: usize, width: usize) -> String {
        const RAMP: [char; 5] = [' ', '░', '▒', '▓', '█'];

        let row = self.pixel_row(i);
        let mut out = String::with_capacity(row.len() + row.len() / width);
        for (idx, &v) in row.iter().enumerate() {
            if idx > 0 && idx % width == 0 {
                out.push('\n');
            }
            let step = ((v.clamp(0.0, 1.0) * (RAMP.len() - 1) as f32).round()) as usize;
            out.push(RAMP[step]);
        }
        out.push('\n');
        out
    }
}

// =============================================================================
// BatchSampler
// =============================================================================

/// Produces fixed-size batches from one partition of a dataset.
///
/// A sampler is bound to a single partition; it takes the dataset by `&mut`
/// for every draw, so two samplers can exist but never race on a cursor.
#[derive(Debug, Clone, Copy)]
pub struct BatchSampler {
    partition: Partition,
    batch_size: usize,
}

impl BatchSampler {
    /// Creates a sampler over `partition` drawing `batch_size` examples per
    /// batch.
    #[must_use]
    pub fn new(partition: Partition, batch_size: usize) -> Self {
        Self {
            partition,
            batch_size,
        }
    }

    /// Creates a train-partition sampler.
    #[must_use]
    pub fn train(batch_size: usize) -> Self {
        Self::new(Partition::Train, batch_size)
    }

    /// Creates a test-partition sampler.
    #[must_use]
    pub fn test(batch_size: usize) -> Self {
        Self::new(Partition::Test, batch_size)
    }

    /// The partition this sampler draws from.
    #[must_use]
    pub fn partition(&self) -> Partition {
        self.partition
    }

    /// Examples per batch.
    #[must_use]
    pub fn batch_size(&self) -> usize {
        self.batch_size
    }

    /// Draws the next batch.
    ///
    /// Advances the partition cursor once per example; composition is exactly
    /// `batch_size` examples in draw order.
    pub fn next_batch(&self, dataset: &mut Dataset) -> Result<Batch> {
        let layout = *dataset.layout();
        let p = layout.pixels_per_example();
        let c = layout.classes;

        let mut pixels = Vec::with_capacity(self.batch_size * p);
        let mut labels = Vec::with_capacity(self.batch_size * c);

        for _ in 0..self.batch_size {
            let index = dataset.next_index(self.partition);
            let (example_pixels, example_label) = dataset.example(self.partition, index)?;
            pixels.extend_from_slice(&example_pixels);
            labels.extend_from_slice(&example_label);
        }

        Ok(Batch {
            pixels,
            labels,
            size: self.batch_size,
            pixels_per_example: p,
            classes: c,
        })
    }
}

// =============================================================================
// Tests
// =============================================================================
