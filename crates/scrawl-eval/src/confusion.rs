//! Confusion Matrix - Per-Class Outcome Counters
//!
//! A `C x C` grid of integer counters indexed `[actual][predicted]`. Counts
//! only ever grow within one evaluation session; zeroing happens through an
//! explicit reset, never implicitly.
//!
//! @version 0.1.0
//! @author `Scrawl` Development Team

use serde::Serialize;

// =============================================================================
// ConfusionMatrix
// =============================================================================

/// Counter grid over (actual, predicted) class pairs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ConfusionMatrix {
    classes: usize,
    counts: Vec<Vec<usize>>,
}

impl ConfusionMatrix {
    /// Creates an all-zero matrix for `classes` classes.
    #[must_use]
    pub fn new(classes: usize) -> Self {
        Self {
            classes,
            counts: vec![vec![0; classes]; classes],
        }
    }

    /// Number of classes per axis.
    #[must_use]
    pub fn classes(&self) -> usize {
        self.classes
    }

    /// Count at `[actual][predicted]`.
    #[must_use]
    pub fn get(&self, actual: usize, predicted: usize) -> usize {
        self.counts[actual][predicted]
    }

    /// The row of counts for one actual class.
    #[must_use]
    pub fn row(&self, actual: usize) -> &[usize] {
        &self.counts[actual]
    }

    /// Increments the counter at `[actual][predicted]`.
    pub fn increment(&mut self, actual: usize, predicted: usize) {
        self.counts[actual][predicted] += 1;
    }

    /// Adds `count` to the counter at `[actual][predicted]`.
    pub fn add(&mut self, actual: usize, predicted: usize, count: usize) {
        self.counts[actual][predicted] += count;
    }

    /// Sum of the diagonal: total correct predictions.
    #[must_use]
    pub fn trace(&self) -> usize {
        (0..self.classes).map(|i| self.counts[i][i]).sum()
    }

    /// Sum of all counters: total recorded predictions.
    #[must_use]
    pub fn total(&self) -> usize {
        self.counts.iter().flatten().sum()
    }

    /// Zeroes every counter.
    pub fn reset(&mut self) {
        for row in &mut self.counts {
            row.fill(0);
        }
    }
}

// =============================================================================
// Tests
// =============================================================================
