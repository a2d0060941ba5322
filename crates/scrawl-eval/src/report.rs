//! Evaluation Report - Exportable Session Summary
//!
//! Renders an aggregator's state into a serializable summary the host can
//! display or persist: overall accuracy, per-class breakdown and the
//! confusion matrix snapshot.
//!
//! @version 0.1.0
//! @author `Scrawl` Development Team

use serde::Serialize;

use crate::aggregator::EvalAggregator;
use crate::confusion::ConfusionMatrix;

// =============================================================================
// Report Types
// =============================================================================

/// Per-class summary line.
#[derive(Debug, Clone, Serialize)]
pub struct ClassReport {
    /// Class index.
    pub class: usize,
    /// Correct observations for the class.
    pub correct: usize,
    /// Total observations for the class.
    pub total: usize,
    /// Accuracy, `null` when the class was never observed.
    pub accuracy: Option<f64>,
}

/// Complete evaluation summary for one session.
#[derive(Debug, Clone, Serialize)]
pub struct EvalReport {
    /// Total observations recorded.
    pub total_recorded: usize,
    /// Total correct observations.
    pub total_correct: usize,
    /// Overall accuracy.
    pub accuracy: f64,
    /// Per-class breakdown.
    pub per_class: Vec<ClassReport>,
    /// Confusion matrix at report time.
    pub confusion: ConfusionMatrix,
}

impl EvalReport {
    /// Builds a report from the aggregator's current state.
    #[must_use]
    pub fn from_aggregator(aggregator: &EvalAggregator) -> Self {
        let accuracies = aggregator.per_class_accuracy();
        let per_class = aggregator
            .class_correct()
            .iter()
            .zip(aggregator.class_totals())
            .zip(accuracies)
            .enumerate()
            .map(|(class, ((&correct, &total), accuracy))| ClassReport {
                class,
                correct,
                total,
                accuracy,
            })
            .collect();

        Self {
            total_recorded: aggregator.recorded(),
            total_correct: aggregator.correct_count(),
            accuracy: aggregator.running_accuracy(),
            per_class,
            confusion: aggregator.snapshot(),
        }
    }

    /// Serializes the report as pretty-printed JSON.
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}

// =============================================================================
// Tests
// =============================================================================
