//! scrawl-vision - Drawing Normalization
//!
//! Provides the interactive-inference side of the scrawl pipeline: raw RGBA
//! canvas buffers and the normalization that turns a freehand drawing into
//! the canonical 28x28 classifier input.
//!
//! # Example
//!
//! ```
//! use scrawl_vision::prelude::*;
//!
//! let mut canvas = Canvas::blank(280, 280);
//! for x in 100..180 {
//!     canvas.paint(x, 140, 0);
//! }
//!
//! let image = Normalizer::new().normalize(&canvas).unwrap();
//! assert_eq!(image.shape(), [1, 28, 28, 1]);
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

pub mod canvas;
pub mod error;
pub mod normalize;

// =============================================================================
// Re-exports
// =============================================================================

pub use canvas::{Canvas, INK_THRESHOLD};
pub use error::{NormalizeError, Result};
pub use normalize::{
    detect_ink_box, InkBox, NormalizedImage, Normalizer, BOX_PADDING, TARGET_SIZE,
};

// =============================================================================
// Prelude
// =============================================================================

/// Common imports for drawing normalization.
pub mod prelude {
    pub use crate::{Canvas, InkBox, NormalizeError, NormalizedImage, Normalizer};
}
