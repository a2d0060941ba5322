//! Sprite Atlas - Packed Example Decoding
//!
//! A sprite atlas is a single grayscale image holding every example of the
//! dataset, stacked row-major. Alongside it lives a raw byte array with one
//! one-hot label row per example. `SpriteDecoder` turns both into flat,
//! validated per-example buffers.
//!
//! @version 0.1.0
//! @author `Scrawl` Development Team

use std::io::Read;

use crate::error::{DataError, Result};

/// Bytes per pixel in the decoded RGBA stream.
const RGBA_CHANNELS: usize = 4;

/// Examples decoded per strip by default.
///
/// Bounds decoder memory for very large atlases; one strip of the reference
/// dataset is 5000 * 784 RGBA pixels, about 15 MiB.
const DEFAULT_STRIP_EXAMPLES: usize = 5000;

// =============================================================================
// AtlasLayout
// =============================================================================

/// Static description of a packed sprite atlas and its label stream.
///
/// The layout is fixed when the dataset is published; nothing about it is
/// discovered at runtime.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AtlasLayout {
    /// Total number of examples in the atlas.
    pub examples: usize,
    /// Width of one example image in pixels.
    pub example_width: usize,
    /// Height of one example image in pixels.
    pub example_height: usize,
    /// Number of classes encoded in each one-hot label row.
    pub classes: usize,
    /// Number of leading examples that form the train partition.
    pub train_examples: usize,
}

impl AtlasLayout {
    /// Creates a new layout description.
    #[must_use]
    pub fn new(
        examples: usize,
        example_width: usize,
        example_height: usize,
        classes: usize,
        train_examples: usize,
    ) -> Self {
        Self {
            examples,
            example_width,
            example_height,
            classes,
            train_examples,
        }
    }

    /// Layout of the reference MNIST sprite sheet (65 000 examples of
    /// 28x28, ten classes, first 55 000 train).
    #[must_use]
    pub fn mnist() -> Self {
        Self::new(65_000, 28, 28, 10, 55_000)
    }

    /// Number of pixels in one example.
    #[must_use]
    pub fn pixels_per_example(&self) -> usize {
        self.example_width * self.example_height
    }

    /// Number of examples in the test partition.
    #[must_use]
    pub fn test_examples(&self) -> usize {
        self.examples - self.train_examples
    }

    /// Total pixel count of the atlas.
    #[must_use]
    pub fn total_pixels(&self) -> usize {
        self.examples * self.pixels_per_example()
    }

    /// Expected byte length of the decoded RGBA stream.
    #[must_use]
    pub fn rgba_len(&self) -> usize {
        self.total_pixels() * RGBA_CHANNELS
    }

    /// Expected byte length of the label stream.
    #[must_use]
    pub fn label_len(&self) -> usize {
        self.examples * self.classes
    }

    /// Validates internal consistency of the layout itself.
    pub fn validate(&self) -> Result<()> {
        if self.examples == 0 || self.classes == 0 || self.pixels_per_example() == 0 {
            return Err(DataError::decode("layout describes an empty atlas"));
        }
        if self.train_examples == 0 || self.train_examples > self.examples {
            return Err(DataError::decode(format!(
                "train partition of {} examples does not fit in {} total",
                self.train_examples, self.examples
            )));
        }
        Ok(())
    }

    /// Checks that a source image of `width` x `height` pixels can hold this
    /// layout with examples stacked row-major on whole rows.
    pub fn validate_image_dims(&self, width: usize, height: usize) -> Result<()> {
        if width * height != self.total_pixels() {
            return Err(DataError::decode(format!(
                "atlas is {width}x{height} = {} pixels, layout requires {}",
                width * height,
                self.total_pixels()
            )));
        }
        if width == 0 || self.pixels_per_example() % width != 0 {
            return Err(DataError::decode(format!(
                "atlas width {width} does not divide the {}-pixel examples into whole rows",
                self.pixels_per_example()
            )));
        }
        Ok(())
    }
}

// =============================================================================
// SpriteDecoder
// =============================================================================

/// Decodes a packed RGBA atlas stream and its label bytes.
///
/// The atlas is consumed in bounded-size horizontal strips so that decoding a
/// very large sheet never needs more than one strip of scratch space. One
/// grayscale channel is extracted per pixel (the channels are equal by
/// construction) and normalized to `[0, 1]`.
pub struct SpriteDecoder {
    layout: AtlasLayout,
    strip_examples: usize,
}

impl SpriteDecoder {
    /// Creates a decoder for the given layout.
    #[must_use]
    pub fn new(layout: AtlasLayout) -> Self {
        Self {
            layout,
            strip_examples: DEFAULT_STRIP_EXAMPLES,
        }
    }

    /// Builder: overrides how many examples are decoded per strip.
    #[must_use]
    pub fn strip_examples(mut self, strip_examples: usize) -> Self {
        self.strip_examples = strip_examples.max(1);
        self
    }

    /// Decodes the RGBA atlas stream and the label bytes into a
    /// [`DecodedAtlas`].
    ///
    /// Produces exactly `N * P` floats and `N * C` label bytes or fails with
    /// a decode error.
    pub fn decode<R: Read>(&self, atlas: R, labels: &[u8]) -> Result<DecodedAtlas> {
        self.layout.validate()?;
        let images = self.decode_pixels(atlas)?;
        let labels = self.decode_labels(labels)?;
        Ok(DecodedAtlas {
            images,
            labels,
            layout: self.layout,
        })
    }

    /// Reads the RGBA stream strip by strip, keeping one grayscale channel.
    fn decode_pixels<R: Read>(&self, mut atlas: R) -> Result<Vec<f32>> {
        let pixels_per_example = self.layout.pixels_per_example();
        let total = self.layout.total_pixels();
        let mut images = Vec::with_capacity(total);

        let strip_pixels = self.strip_examples * pixels_per_example;
        let mut strip = vec![0u8; strip_pixels * RGBA_CHANNELS];

        let mut decoded = 0usize;
        while decoded < total {
            let take = strip_pixels.min(total - decoded);
            let buf = &mut strip[..take * RGBA_CHANNELS];
            atlas.read_exact(buf).map_err(|_| {
                DataError::decode(format!(
                    "atlas stream ended after {decoded} of {total} pixels"
                ))
            })?;
            for px in buf.chunks_exact(RGBA_CHANNELS) {
                images.push(f32::from(px[0]) / 255.0);
            }
            decoded += take;
        }

        // The stream must hold exactly the layout, nothing more.
        let mut probe = [0u8; 1];
        if atlas.read(&mut probe).unwrap_or(0) > 0 {
            return Err(DataError::decode(format!(
                "atlas stream continues past the {total} pixels the layout declares"
            )));
        }

        Ok(images)
    }

    /// Validates length and one-hot shape of every label row.
    fn decode_labels(&self, labels: &[u8]) -> Result<Vec<u8>> {
        let expected = self.layout.label_len();
        if labels.len() != expected {
            return Err(DataError::decode(format!(
                "label stream is {} bytes, layout requires {expected}",
                labels.len()
            )));
        }
        for (row, chunk) in labels.chunks_exact(self.layout.classes).enumerate() {
            let ones = chunk.iter().filter(|&&b| b == 1).count();
            let zeros = chunk.iter().filter(|&&b| b == 0).count();
            if ones != 1 || ones + zeros != chunk.len() {
                return Err(DataError::decode(format!(
                    "label row {row} is not one-hot: {chunk:?}"
                )));
            }
        }
        Ok(labels.to_vec())
    }
}

// =============================================================================
// DecodedAtlas
// =============================================================================

/// Flat per-example pixel and label buffers produced by [`SpriteDecoder`].
///
/// Immutable after decode; the dataset layer only ever reads slices of it.
#[derive(Debug, Clone)]
pub struct DecodedAtlas {
    images: Vec<f32>,
    labels: Vec<u8>,
    layout: AtlasLayout,
}

impl DecodedAtlas {
    /// Returns the layout this atlas was decoded against.
    #[must_use]
    pub fn layout(&self) -> &AtlasLayout {
        &self.layout
    }

    /// Returns the full normalized pixel buffer, `N * P` floats.
    #[must_use]
    pub fn images(&self) -> &[f32] {
        &self.images
    }

    /// Returns the full one-hot label buffer, `N * C` bytes.
    #[must_use]
    pub fn labels(&self) -> &[u8] {
        &self.labels
    }

    /// Returns the pixel slice of one example.
    #[must_use]
    pub fn pixels_of(&self, index: usize) -> &[f32] {
        let p = self.layout.pixels_per_example();
        &self.images[index * p..(index + 1) * p]
    }

    /// Returns the one-hot label row of one example.
    #[must_use]
    pub fn label_of(&self, index: usize) -> &[u8] {
        let c = self.layout.classes;
        &self.labels[index * c..(index + 1) * c]
    }

    /// Returns the class index of one example.
    ///
    /// Label rows are validated one-hot at decode time, so the position of
    /// the single `1` always exists.
    #[must_use]
    pub fn class_of(&self, index: usize) -> usize {
        self.label_of(index)
            .iter()
            .position(|&b| b == 1)
            .unwrap_or(0)
    }
}

// =============================================================================
// Tests
// =============================================================================
