//! Normalizer - Freehand Drawing to Canonical Input
//!
//! Turns a raw drawing canvas into the fixed-size tensor the classifier
//! expects: find the ink, re-center it without distorting its aspect ratio,
//! downscale to the target resolution, flip polarity (dark-on-light source,
//! bright-on-dark target) and scale intensities into `[0, 1]`.
//!
//! A canvas with no ink at all is not an error: the bounding box falls open
//! to the full canvas extent and the result is a blank normalized image.
//!
//! @version 0.1.0
//! @author `Scrawl` Development Team

use crate::canvas::Canvas;
use crate::error::{NormalizeError, Result};

/// Edge length of the canonical model input.
pub const TARGET_SIZE: usize = 28;

/// Margin in pixels added around the detected ink bounding box.
pub const BOX_PADDING: usize = 10;

// =============================================================================
// InkBox
// =============================================================================

/// Inclusive bounding box over ink pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InkBox {
    /// Leftmost ink column.
    pub min_x: usize,
    /// Topmost ink row.
    pub min_y: usize,
    /// Rightmost ink column.
    pub max_x: usize,
    /// Bottommost ink row.
    pub max_y: usize,
}

impl InkBox {
    /// Box covering a full canvas.
    #[must_use]
    pub fn full(width: usize, height: usize) -> Self {
        Self {
            min_x: 0,
            min_y: 0,
            max_x: width - 1,
            max_y: height - 1,
        }
    }

    /// Content width of the box.
    #[must_use]
    pub fn width(&self) -> usize {
        self.max_x - self.min_x + 1
    }

    /// Content height of the box.
    #[must_use]
    pub fn height(&self) -> usize {
        self.max_y - self.min_y + 1
    }

    /// Expands the box by `margin` on every side, clamped to the canvas.
    #[must_use]
    pub fn padded(&self, margin: usize, width: usize, height: usize) -> Self {
        Self {
            min_x: self.min_x.saturating_sub(margin),
            min_y: self.min_y.saturating_sub(margin),
            max_x: (self.max_x + margin).min(width - 1),
            max_y: (self.max_y + margin).min(height - 1),
        }
    }
}

/// Scans the canvas for ink and returns its bounding box, if any.
#[must_use]
pub fn detect_ink_box(canvas: &Canvas) -> Option<InkBox> {
    let mut found: Option<InkBox> = None;
    for y in 0..canvas.height() {
        for x in 0..canvas.width() {
            if !canvas.is_ink(x, y) {
                continue;
            }
            found = Some(match found {
                None => InkBox {
                    min_x: x,
                    min_y: y,
                    max_x: x,
                    max_y: y,
                },
                Some(b) => InkBox {
                    min_x: b.min_x.min(x),
                    min_y: b.min_y.min(y),
                    max_x: b.max_x.max(x),
                    max_y: b.max_y.max(y),
                },
            });
        }
    }
    found
}

// =============================================================================
// NormalizedImage
// =============================================================================

/// The canonical single-channel model input.
///
/// Values are intensities in `[0, 1]` with background 0 and ink high. The
/// logical shape carries a leading batch dimension of one:
/// `[1, size, size, 1]`.
#[derive(Debug, Clone, PartialEq)]
pub struct NormalizedImage {
    data: Vec<f32>,
    size: usize,
}

impl NormalizedImage {
    /// Edge length of the image.
    #[must_use]
    pub fn size(&self) -> usize {
        self.size
    }

    /// Logical tensor shape, `[1, size, size, 1]`.
    #[must_use]
    pub fn shape(&self) -> [usize; 4] {
        [1, self.size, self.size, 1]
    }

    /// The flat intensity buffer, row-major.
    #[must_use]
    pub fn as_slice(&self) -> &[f32] {
        &self.data
    }

    /// Intensity at `(x, y)`.
    #[must_use]
    pub fn get(&self, x: usize, y: usize) -> f32 {
        self.data[y * self.size + x]
    }
}

// =============================================================================
// Normalizer
// =============================================================================

/// Canvas-to-model-input normalization pipeline.
#[derive(Debug, Clone, Copy)]
pub struct Normalizer {
    target: usize,
    padding: usize,
}

impl Normalizer {
    /// Creates a normalizer with the canonical 28 px target and 10 px box
    /// padding.
    #[must_use]
    pub fn new() -> Self {
        Self {
            target: TARGET_SIZE,
            padding: BOX_PADDING,
        }
    }

    /// Builder: overrides the target edge length.
    #[must_use]
    pub fn target(mut self, target: usize) -> Self {
        self.target = target.max(1);
        self
    }

    /// Builder: overrides the bounding-box margin.
    #[must_use]
    pub fn padding(mut self, padding: usize) -> Self {
        self.padding = padding;
        self
    }

    /// Normalizes a drawing canvas into a [`NormalizedImage`].
    ///
    /// The source must be at least `target` pixels in both axes.
    pub fn normalize(&self, canvas: &Canvas) -> Result<NormalizedImage> {
        let (w, h) = (canvas.width(), canvas.height());
        if w < self.target || h < self.target {
            return Err(NormalizeError::SourceTooSmall {
                width: w,
                height: h,
                target: self.target,
            });
        }

        // 1-2. Ink bounding box, padded; fall open to the full canvas when
        // nothing was drawn.
        let ink_box = detect_ink_box(canvas)
            .unwrap_or_else(|| InkBox::full(w, h))
            .padded(self.padding, w, h);

        // 3. Paste the cropped region centered into a blank same-size
        // grayscale canvas. Integer offsets, aspect ratio untouched.
        let mut centered = vec![255u8; w * h];
        let offset_x = (w - ink_box.width()) / 2;
        let offset_y = (h - ink_box.height()) / 2;
        for row in 0..ink_box.height() {
            for col in 0..ink_box.width() {
                let v = canvas.intensity(ink_box.min_x + col, ink_box.min_y + row);
                centered[(offset_y + row) * w + (offset_x + col)] = v;
            }
        }

        // 4. Single affine downscale to target x target. Both axes scale
        // independently, so non-square canvases stretch.
        let scaled = resize_bilinear(&centered, w, h, self.target, self.target);

        // 5-6. Invert polarity and scale into [0, 1].
        let data = scaled.iter().map(|&v| (255.0 - v) / 255.0).collect();

        Ok(NormalizedImage {
            data,
            size: self.target,
        })
    }
}

impl Default for Normalizer {
    fn default() -> Self {
        Self::new()
    }
}

// =============================================================================
// Resampling
// =============================================================================

/// Bilinear interpolation resize of a row-major grayscale buffer.
fn resize_bilinear(
    input: &[u8],
    old_w: usize,
    old_h: usize,
    new_w: usize,
    new_h: usize,
) -> Vec<f32> {
    let mut result = vec![0.0f32; new_h * new_w];

    let scale_h = old_h as f32 / new_h as f32;
    let scale_w = old_w as f32 / new_w as f32;

    for y in 0..new_h {
        for x in 0..new_w {
            let src_y = y as f32 * scale_h;
            let src_x = x as f32 * scale_w;

            let y0 = (src_y.floor() as usize).min(old_h - 1);
            let y1 = (y0 + 1).min(old_h - 1);
            let x0 = (src_x.floor() as usize).min(old_w - 1);
            let x1 = (x0 + 1).min(old_w - 1);

            let dy = src_y - y0 as f32;
            let dx = src_x - x0 as f32;

            let v00 = f32::from(input[y0 * old_w + x0]);
            let v01 = f32::from(input[y0 * old_w + x1]);
            let v10 = f32::from(input[y1 * old_w + x0]);
            let v11 = f32::from(input[y1 * old_w + x1]);

            result[y * new_w + x] = v00 * (1.0 - dx) * (1.0 - dy)
                + v01 * dx * (1.0 - dy)
                + v10 * (1.0 - dx) * dy
                + v11 * dx * dy;
        }
    }

    result
}

// =============================================================================
// Tests
// =============================================================================
