//! Dataset - Partitioned Examples with Shuffled Cursors
//!
//! Owns the decoded atlas, splits it into a train and a test partition at a
//! boundary fixed by the layout, and hands out example indices through one
//! independent shuffle cursor per partition.
//!
//! The permutations are built once at load time; a cursor that reaches the
//! end of its partition wraps around and replays the same order. Callers that
//! want a fresh order per epoch reload or reshuffle explicitly.
//!
//! @version 0.1.0
//! @author `Scrawl` Development Team

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};

use crate::atlas::{AtlasLayout, DecodedAtlas, SpriteDecoder};
use crate::error::{DataError, Result};
use crate::source::{fetch_pair, into_rgba, ByteSource};

// =============================================================================
// Partition
// =============================================================================

/// The two fixed partitions of a dataset.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Partition {
    /// Leading `train_examples` examples.
    Train,
    /// Remaining examples.
    Test,
}

// =============================================================================
// ShuffleCursor
// =============================================================================

/// A fixed permutation plus an offset into it.
///
/// Advancing moves the offset first and then reads, so one full cycle of
/// `len` calls visits every index exactly once before the order repeats.
#[derive(Debug, Clone)]
struct ShuffleCursor {
    indices: Vec<usize>,
    offset: usize,
}

impl ShuffleCursor {
    fn new<R: Rng>(len: usize, rng: &mut R) -> Self {
        let mut indices: Vec<usize> = (0..len).collect();
        indices.shuffle(rng);
        Self { indices, offset: 0 }
    }

    fn len(&self) -> usize {
        self.indices.len()
    }

    /// Advances the cursor and returns the index at the new position.
    ///
    /// Wraps without reshuffling.
    fn advance(&mut self) -> usize {
        assert!(
            !self.indices.is_empty(),
            "cursor advanced over an empty partition"
        );
        self.offset = (self.offset + 1) % self.indices.len();
        self.indices[self.offset]
    }
}

// =============================================================================
// Dataset
// =============================================================================

/// A decoded, partitioned dataset with one shuffle cursor per partition.
///
/// Cursor state is shared mutable state: every advancing operation takes
/// `&mut self`, so a single in-flight consumer per dataset is enforced by the
/// borrow checker rather than by locks.
#[derive(Debug, Clone)]
pub struct Dataset {
    atlas: DecodedAtlas,
    train_cursor: ShuffleCursor,
    test_cursor: ShuffleCursor,
}

impl Dataset {
    /// Fetches, decodes and partitions a dataset.
    ///
    /// The atlas and label payloads are fetched concurrently and joined; any
    /// fetch failure surfaces as a load error and any inconsistency between
    /// payloads and layout as a decode error. This is the only operation in
    /// the crate that touches I/O.
    pub fn load(
        atlas_source: &dyn ByteSource,
        label_source: &dyn ByteSource,
        layout: AtlasLayout,
    ) -> Result<Self> {
        Self::load_with_rng(atlas_source, label_source, layout, &mut rand::thread_rng())
    }

    /// [`Dataset::load`] with a caller-seeded RNG for reproducible shuffles.
    pub fn load_with_seed(
        atlas_source: &dyn ByteSource,
        label_source: &dyn ByteSource,
        layout: AtlasLayout,
        seed: u64,
    ) -> Result<Self> {
        let mut rng = StdRng::seed_from_u64(seed);
        Self::load_with_rng(atlas_source, label_source, layout, &mut rng)
    }

    /// [`Dataset::load`] with an explicit RNG.
    pub fn load_with_rng<R: Rng>(
        atlas_source: &dyn ByteSource,
        label_source: &dyn ByteSource,
        layout: AtlasLayout,
        rng: &mut R,
    ) -> Result<Self> {
        let (atlas_payload, label_payload) = fetch_pair(atlas_source, label_source)?;
        let rgba = into_rgba(atlas_payload, &layout)?;
        let atlas = SpriteDecoder::new(layout).decode(rgba.as_slice(), &label_payload)?;
        Ok(Self::from_decoded_with_rng(atlas, rng))
    }

    /// Builds a dataset from an already decoded atlas.
    #[must_use]
    pub fn from_decoded(atlas: DecodedAtlas) -> Self {
        Self::from_decoded_with_rng(atlas, &mut rand::thread_rng())
    }

    /// Builds a dataset from an already decoded atlas with an explicit RNG.
    #[must_use]
    pub fn from_decoded_with_rng<R: Rng>(atlas: DecodedAtlas, rng: &mut R) -> Self {
        let layout = *atlas.layout();
        let train_cursor = ShuffleCursor::new(layout.train_examples, rng);
        let test_cursor = ShuffleCursor::new(layout.test_examples(), rng);
        Self {
            atlas,
            train_cursor,
            test_cursor,
        }
    }

    /// Returns the layout the dataset was loaded against.
    #[must_use]
    pub fn layout(&self) -> &AtlasLayout {
        self.atlas.layout()
    }

    /// Total number of examples across both partitions.
    #[must_use]
    pub fn len(&self) -> usize {
        self.layout().examples
    }

    /// Returns true if the dataset holds no examples.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Number of examples in a partition.
    #[must_use]
    pub fn partition_len(&self, partition: Partition) -> usize {
        match partition {
            Partition::Train => self.train_cursor.len(),
            Partition::Test => self.test_cursor.len(),
        }
    }

    /// Advances the train cursor and returns the partition-local index at
    /// the new position.
    ///
    /// # Panics
    /// Panics if the train partition is empty.
    pub fn next_train_index(&mut self) -> usize {
        self.train_cursor.advance()
    }

    /// Advances the test cursor and returns the partition-local index at the
    /// new position.
    ///
    /// # Panics
    /// Panics if the test partition is empty.
    pub fn next_test_index(&mut self) -> usize {
        self.test_cursor.advance()
    }

    /// Advances the cursor of `partition`.
    pub fn next_index(&mut self, partition: Partition) -> usize {
        match partition {
            Partition::Train => self.next_train_index(),
            Partition::Test => self.next_test_index(),
        }
    }

    /// Copies out one example of a partition as owned buffers.
    ///
    /// `index` is partition-local; out-of-range indices are an index error.
    /// The label row is returned as one-hot `f32`, ready for stacking into a
    /// batch label matrix.
    pub fn example(&self, partition: Partition, index: usize) -> Result<(Vec<f32>, Vec<f32>)> {
        let len = self.partition_len(partition);
        if index >= len {
            return Err(DataError::IndexOutOfBounds { index, len });
        }
        let global = match partition {
            Partition::Train => index,
            Partition::Test => self.layout().train_examples + index,
        };
        let pixels = self.atlas.pixels_of(global).to_vec();
        let label = self
            .atlas
            .label_of(global)
            .iter()
            .map(|&b| f32::from(b))
            .collect();
        Ok((pixels, label))
    }

    /// Returns the class index of one example of a partition.
    pub fn class_of(&self, partition: Partition, index: usize) -> Result<usize> {
        let len = self.partition_len(partition);
        if index >= len {
            return Err(DataError::IndexOutOfBounds { index, len });
        }
        let global = match partition {
            Partition::Train => index,
            Partition::Test => self.layout().train_examples + index,
        };
        Ok(self.atlas.class_of(global))
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source::MemorySource;
    use std::collections::HashSet;

    fn layout() -> AtlasLayout {
        AtlasLayout::new(10, 2, 2, 10, 7)
    }

    /// One example per class, in class order, intensity = class.
    fn sources() -> (MemorySource, MemorySource) {
        let l = layout();
        let mut atlas = Vec::with_capacity(l.rgba_len());
        for i in 0..l.examples {
            let v = u8::try_from(i * 20).unwrap();
            for _ in 0..l.pixels_per_example() {
                atlas.extend_from_slice(&[v, v, v, 255]);
            }
        }
        let mut labels = vec![0u8; l.label_len()];
        for i in 0..l.examples {
            labels[i * l.classes + i] = 1;
        }
        (
            MemorySource::new("atlas", atlas),
            MemorySource::new("labels", labels),
        )
    }

    #[test]
    fn test_partition_sizes() {
        let (a, b) = sources();
        let ds = Dataset::load(&a, &b, layout()).unwrap();
        assert_eq!(
            ds.partition_len(Partition::Train) + ds.partition_len(Partition::Test),
            ds.len()
        );
        assert_eq!(ds.partition_len(Partition::Train), 7);
        assert_eq!(ds.partition_len(Partition::Test), 3);
    }

    #[test]
    fn test_cursor_visits_each_index_once_per_cycle() {
        let (a, b) = sources();
        let mut ds = Dataset::load_with_seed(&a, &b, layout(), 7).unwrap();

        let n = ds.partition_len(Partition::Train);
        let cycle: Vec<usize> = (0..n).map(|_| ds.next_train_index()).collect();

        let unique: HashSet<usize> = cycle.iter().copied().collect();
        assert_eq!(unique.len(), n);
        assert!(cycle.iter().all(|&i| i < n));

        // Wrap replays the same order without reshuffling.
        assert_eq!(ds.next_train_index(), cycle[0]);
    }

    #[test]
    fn test_cursors_are_independent() {
        let (a, b) = sources();
        let mut ds = Dataset::load_with_seed(&a, &b, layout(), 3).unwrap();

        let first_train = ds.next_train_index();
        for _ in 0..5 {
            ds.next_test_index();
        }
        // Test draws must not move the train cursor.
        let n = ds.partition_len(Partition::Train);
        for _ in 0..n - 1 {
            ds.next_train_index();
        }
        assert_eq!(ds.next_train_index(), first_train);
    }

    #[test]
    fn test_deterministic_seeding() {
        let (a, b) = sources();
        let mut one = Dataset::load_with_seed(&a, &b, layout(), 42).unwrap();
        let mut two = Dataset::load_with_seed(&a, &b, layout(), 42).unwrap();

        for _ in 0..20 {
            assert_eq!(one.next_train_index(), two.next_train_index());
            assert_eq!(one.next_test_index(), two.next_test_index());
        }
    }

    #[test]
    fn test_example_copy_out() {
        let (a, b) = sources();
        let ds = Dataset::load(&a, &b, layout()).unwrap();

        // Train index 3 is global example 3: class 3, intensity 60.
        let (pixels, label) = ds.example(Partition::Train, 3).unwrap();
        assert_eq!(pixels.len(), 4);
        assert!((pixels[0] - 60.0 / 255.0).abs() < 1e-6);
        assert_eq!(label.iter().map(|&v| v as usize).sum::<usize>(), 1);
        assert!((label[3] - 1.0).abs() < f32::EPSILON);

        // Test index 1 is global example 8.
        assert_eq!(ds.class_of(Partition::Test, 1).unwrap(), 8);
    }

    #[test]
    fn test_example_bounds_checked() {
        let (a, b) = sources();
        let ds = Dataset::load(&a, &b, layout()).unwrap();

        let err = ds.example(Partition::Test, 3).unwrap_err();
        assert_eq!(err, DataError::IndexOutOfBounds { index: 3, len: 3 });
    }

    #[test]
    fn test_load_failure_is_load_error() {
        let (a, _) = sources();
        let missing = crate::source::FileSource::new("/missing/labels.bin");
        let err = Dataset::load(&a, &missing, layout()).unwrap_err();
        assert!(matches!(err, DataError::Load { .. }));
    }
}
