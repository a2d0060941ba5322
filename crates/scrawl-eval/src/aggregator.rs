//! Evaluation Aggregator - Online Accuracy Accumulation
//!
//! Consumes a stream of (actual, predicted) pairs during a training or test
//! pass and keeps the running accuracy, the confusion matrix and per-class
//! counters up to date incrementally. One aggregator covers one session:
//! counters only grow until an explicit [`EvalAggregator::reset`].
//!
//! Every operation is total over valid class indices; an out-of-range index
//! is a caller bug, not a runtime condition this type recovers from.
//!
//! @version 0.1.0
//! @author `Scrawl` Development Team

use crate::confusion::ConfusionMatrix;

// =============================================================================
// Prediction
// =============================================================================

/// A classifier verdict for one example: the argmax class and its
/// probability.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Prediction {
    /// Predicted class index.
    pub class: usize,
    /// Probability assigned to the predicted class.
    pub confidence: f32,
}

impl Prediction {
    /// Reads the argmax of one probability row.
    ///
    /// Returns `None` for an empty row.
    #[must_use]
    pub fn from_probabilities(row: &[f32]) -> Option<Self> {
        let (class, &confidence) = row
            .iter()
            .enumerate()
            .max_by(|(_, a), (_, b)| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal))?;
        Some(Self { class, confidence })
    }
}

// =============================================================================
// EvalAggregator
// =============================================================================

/// Incremental evaluation state for one session.
#[derive(Debug, Clone)]
pub struct EvalAggregator {
    matrix: ConfusionMatrix,
    correct: Vec<usize>,
    total: Vec<usize>,
    total_correct: usize,
    total_recorded: usize,
}

impl EvalAggregator {
    /// Creates an empty aggregator for `classes` classes.
    #[must_use]
    pub fn new(classes: usize) -> Self {
        Self {
            matrix: ConfusionMatrix::new(classes),
            correct: vec![0; classes],
            total: vec![0; classes],
            total_correct: 0,
            total_recorded: 0,
        }
    }

    /// Aggregator for the ten digit classes.
    #[must_use]
    pub fn digits() -> Self {
        Self::new(10)
    }

    /// Number of classes tracked.
    #[must_use]
    pub fn classes(&self) -> usize {
        self.matrix.classes()
    }

    /// Records one (actual, predicted) observation.
    pub fn record(&mut self, actual: usize, predicted: usize) {
        debug_assert!(actual < self.classes(), "actual class out of range");
        debug_assert!(predicted < self.classes(), "predicted class out of range");

        self.matrix.increment(actual, predicted);
        self.total[actual] += 1;
        self.total_recorded += 1;
        if actual == predicted {
            self.correct[actual] += 1;
            self.total_correct += 1;
        }
    }

    /// Number of observations recorded this session.
    #[must_use]
    pub fn recorded(&self) -> usize {
        self.total_recorded
    }

    /// Number of correct observations recorded this session.
    #[must_use]
    pub fn correct_count(&self) -> usize {
        self.total_correct
    }

    /// Overall accuracy so far; 0 before anything was recorded.
    #[must_use]
    pub fn running_accuracy(&self) -> f64 {
        if self.total_recorded == 0 {
            0.0
        } else {
            self.total_correct as f64 / self.total_recorded as f64
        }
    }

    /// Per-class accuracy; `None` for classes without observations.
    #[must_use]
    pub fn per_class_accuracy(&self) -> Vec<Option<f64>> {
        self.correct
            .iter()
            .zip(self.total.iter())
            .map(|(&c, &t)| {
                if t == 0 {
                    None
                } else {
                    Some(c as f64 / t as f64)
                }
            })
            .collect()
    }

    /// Observations per class.
    #[must_use]
    pub fn class_totals(&self) -> &[usize] {
        &self.total
    }

    /// Correct observations per class.
    #[must_use]
    pub fn class_correct(&self) -> &[usize] {
        &self.correct
    }

    /// Immutable copy of the confusion matrix for display.
    ///
    /// Counters keep accumulating afterwards; snapshotting never resets.
    #[must_use]
    pub fn snapshot(&self) -> ConfusionMatrix {
        self.matrix.clone()
    }

    /// Folds another aggregator's counters into this session.
    ///
    /// Both aggregators must track the same class count.
    pub fn merge(&mut self, other: &EvalAggregator) {
        debug_assert_eq!(self.classes(), other.classes(), "class count mismatch");
        for actual in 0..other.classes() {
            for predicted in 0..other.classes() {
                let count = other.matrix.get(actual, predicted);
                if count == 0 {
                    continue;
                }
                self.matrix.add(actual, predicted, count);
                self.total[actual] += count;
                self.total_recorded += count;
                if actual == predicted {
                    self.correct[actual] += count;
                    self.total_correct += count;
                }
            }
        }
    }

    /// Starts a new session: zeroes every counter.
    pub fn reset(&mut self) {
        self.matrix.reset();
        self.correct.fill(0);
        self.total.fill(0);
        self.total_correct = 0;
        self.total_recorded = 0;
    }
}

// =============================================================================
// Tests
// =============================================================================
