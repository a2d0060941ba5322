//! Run Loops - Cooperative Training and Evaluation Sweeps
//!
//! Drives the classifier over a dataset in plain loops that stay polite to a
//! single-threaded host: a shared [`StopToken`] is checked between
//! iterations and an observer hook fires on a fixed cadence so the host can
//! do its own bookkeeping. Stopping early is clean, not exceptional; all
//! counters accumulated so far stay valid.
//!
//! One run owns one dataset borrow and its aggregators for its whole
//! lifetime; there is no module-level state.
//!
//! @version 0.1.0
//! @author `Scrawl` Development Team

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use scrawl_data::{Batch, BatchSampler, Dataset, Partition};
use scrawl_eval::{EvalAggregator, Prediction};

use crate::classifier::{Classifier, FitOptions};
use crate::error::{Result, RunError};

// =============================================================================
// StopToken
// =============================================================================

/// Shared flag for cooperative cancellation.
///
/// Clones share the flag; any holder can stop a run in progress between
/// iterations.
#[derive(Debug, Clone, Default)]
pub struct StopToken {
    flag: Arc<AtomicBool>,
}

impl StopToken {
    /// Creates a token in the running state.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Requests that the current run stop at the next iteration boundary.
    pub fn stop(&self) {
        self.flag.store(true, Ordering::Relaxed);
    }

    /// Returns true once a stop was requested.
    #[must_use]
    pub fn is_stopped(&self) -> bool {
        self.flag.load(Ordering::Relaxed)
    }
}

// =============================================================================
// Run Configuration
// =============================================================================

/// Configuration for a training run.
#[derive(Debug, Clone)]
pub struct RunConfig {
    /// Number of training iterations (one batch each).
    pub iterations: usize,
    /// Examples per training batch.
    pub batch_size: usize,
    /// Passes the classifier makes over each handed batch.
    pub fit_epochs: usize,
    /// Iterations between observer yield hooks; 0 disables them.
    pub yield_every: usize,
    /// Iterations between test checkpoints; 0 disables them.
    pub checkpoint_every: usize,
    /// Test examples swept per checkpoint.
    pub checkpoint_samples: usize,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            iterations: 10_000,
            batch_size: 32,
            fit_epochs: 1,
            yield_every: 10,
            checkpoint_every: 1_000,
            checkpoint_samples: 100,
        }
    }
}

impl RunConfig {
    /// Creates a configuration with defaults.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder: sets the iteration count.
    #[must_use]
    pub fn iterations(mut self, iterations: usize) -> Self {
        self.iterations = iterations;
        self
    }

    /// Builder: sets the training batch size.
    #[must_use]
    pub fn batch_size(mut self, batch_size: usize) -> Self {
        self.batch_size = batch_size.max(1);
        self
    }

    /// Builder: sets fit passes per batch.
    #[must_use]
    pub fn fit_epochs(mut self, fit_epochs: usize) -> Self {
        self.fit_epochs = fit_epochs.max(1);
        self
    }

    /// Builder: sets the yield cadence.
    #[must_use]
    pub fn yield_every(mut self, yield_every: usize) -> Self {
        self.yield_every = yield_every;
        self
    }

    /// Builder: sets the checkpoint cadence.
    #[must_use]
    pub fn checkpoint_every(mut self, checkpoint_every: usize) -> Self {
        self.checkpoint_every = checkpoint_every;
        self
    }

    /// Builder: sets how many test examples each checkpoint sweeps.
    #[must_use]
    pub fn checkpoint_samples(mut self, checkpoint_samples: usize) -> Self {
        self.checkpoint_samples = checkpoint_samples;
        self
    }
}

// =============================================================================
// Observer
// =============================================================================

/// Live metrics handed to the observer at each checkpoint.
#[derive(Debug)]
pub struct Checkpoint<'a> {
    /// Iterations completed so far.
    pub iteration: usize,
    /// Loss of the most recent fit call.
    pub loss: f32,
    /// Running training statistics for the session.
    pub train: &'a EvalAggregator,
    /// Accumulated test statistics for the session.
    pub test: &'a EvalAggregator,
}

/// Hooks a host installs into a run.
pub trait RunObserver {
    /// Called every `yield_every` iterations; the host's bookkeeping slot.
    fn on_yield(&mut self, _iteration: usize) {}

    /// Called at every checkpoint. Returning false ends the run cleanly.
    fn on_checkpoint(&mut self, _checkpoint: &Checkpoint) -> bool {
        true
    }
}

/// Observer that installs no hooks.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullObserver;

impl RunObserver for NullObserver {}

/// Observer that prints checkpoint progress to stdout.
#[derive(Debug, Clone, Copy, Default)]
pub struct ProgressLogger;

impl RunObserver for ProgressLogger {
    fn on_checkpoint(&mut self, checkpoint: &Checkpoint) -> bool {
        println!(
            "iteration {}: loss = {:.4}, train acc = {:.2}%, test acc = {:.2}%",
            checkpoint.iteration,
            checkpoint.loss,
            checkpoint.train.running_accuracy() * 100.0,
            checkpoint.test.running_accuracy() * 100.0,
        );
        true
    }
}

// =============================================================================
// Outcomes
// =============================================================================

/// Result of a training run.
#[derive(Debug)]
pub struct TrainOutcome {
    /// Iterations actually completed.
    pub iterations_run: usize,
    /// False when the run was stopped before its configured length.
    pub completed: bool,
    /// Loss of the final fit call, if any ran.
    pub last_loss: Option<f32>,
    /// Training-session statistics (post-fit predictions per batch).
    pub train_stats: EvalAggregator,
    /// Test-session statistics accumulated over checkpoints.
    pub test_stats: EvalAggregator,
}

/// Result of an evaluation sweep.
#[derive(Debug)]
pub struct EvalOutcome {
    /// Examples actually evaluated.
    pub samples_run: usize,
    /// False when the sweep was stopped early.
    pub completed: bool,
    /// Accumulated statistics.
    pub stats: EvalAggregator,
}

// =============================================================================
// Training Run
// =============================================================================

/// Trains the classifier over the train partition.
///
/// Each iteration draws one batch, fits, then feeds the post-fit predictions
/// for that batch into the running training statistics. At every checkpoint
/// a bounded sweep over the test partition feeds the test statistics and the
/// observer decides whether to continue.
pub fn train<C: Classifier, O: RunObserver>(
    classifier: &mut C,
    dataset: &mut Dataset,
    config: &RunConfig,
    stop: &StopToken,
    observer: &mut O,
) -> Result<TrainOutcome> {
    let classes = dataset.layout().classes;
    let sampler = BatchSampler::train(config.batch_size);

    let mut train_stats = EvalAggregator::new(classes);
    let mut test_stats = EvalAggregator::new(classes);
    let mut last_loss = None;
    let mut iterations_run = 0;
    let mut completed = true;

    for iteration in 0..config.iterations {
        if stop.is_stopped() {
            completed = false;
            break;
        }

        let batch = sampler.next_batch(dataset)?;
        let metrics = classifier
            .fit(&batch, &FitOptions::new(config.batch_size).epochs(config.fit_epochs))
            .map_err(RunError::classifier)?;
        last_loss = Some(metrics.loss);

        let probabilities = classifier
            .predict(batch.pixels(), batch.len())
            .map_err(RunError::classifier)?;
        record_batch(&mut train_stats, &batch, &probabilities)?;

        iterations_run = iteration + 1;

        if config.yield_every > 0 && iterations_run % config.yield_every == 0 {
            observer.on_yield(iterations_run);
        }

        let at_checkpoint =
            config.checkpoint_every > 0 && iterations_run % config.checkpoint_every == 0;
        if at_checkpoint || iterations_run == config.iterations {
            checkpoint_sweep(classifier, dataset, config, &mut test_stats, stop)?;
            let checkpoint = Checkpoint {
                iteration: iterations_run,
                loss: last_loss.unwrap_or(0.0),
                train: &train_stats,
                test: &test_stats,
            };
            if !observer.on_checkpoint(&checkpoint) {
                completed = false;
                break;
            }
        }
    }

    if stop.is_stopped() {
        completed = false;
    }

    Ok(TrainOutcome {
        iterations_run,
        completed,
        last_loss,
        train_stats,
        test_stats,
    })
}

/// Bounded test sweep run at a training checkpoint.
fn checkpoint_sweep<C: Classifier>(
    classifier: &mut C,
    dataset: &mut Dataset,
    config: &RunConfig,
    test_stats: &mut EvalAggregator,
    stop: &StopToken,
) -> Result<()> {
    if config.checkpoint_samples == 0 || dataset.partition_len(Partition::Test) == 0 {
        return Ok(());
    }
    let outcome = evaluate(
        classifier,
        dataset,
        config.checkpoint_samples,
        config.batch_size,
        stop,
        &mut NullObserver,
    )?;
    test_stats.merge(&outcome.stats);
    Ok(())
}

// =============================================================================
// Evaluation Sweep
// =============================================================================

/// Evaluates `samples` test examples in batches of `batch_size`.
///
/// Checks the stop token between batches; a stopped sweep returns the
/// statistics of the batches that completed. A dataset without a test
/// partition yields an empty, completed outcome.
pub fn evaluate<C: Classifier, O: RunObserver>(
    classifier: &mut C,
    dataset: &mut Dataset,
    samples: usize,
    batch_size: usize,
    stop: &StopToken,
    observer: &mut O,
) -> Result<EvalOutcome> {
    let classes = dataset.layout().classes;
    let batch_size = batch_size.max(1);

    let mut stats = EvalAggregator::new(classes);
    let mut samples_run = 0;
    let mut completed = true;

    if dataset.partition_len(Partition::Test) == 0 {
        return Ok(EvalOutcome {
            samples_run,
            completed,
            stats,
        });
    }

    while samples_run < samples {
        if stop.is_stopped() {
            completed = false;
            break;
        }

        let take = batch_size.min(samples - samples_run);
        let batch = BatchSampler::test(take).next_batch(dataset)?;
        let probabilities = classifier
            .predict(batch.pixels(), batch.len())
            .map_err(RunError::classifier)?;
        record_batch(&mut stats, &batch, &probabilities)?;

        samples_run += take;
        observer.on_yield(samples_run);
    }

    Ok(EvalOutcome {
        samples_run,
        completed,
        stats,
    })
}

// =============================================================================
// Recording
// =============================================================================

/// Records one batch's verdicts, validating the probability matrix shape.
fn record_batch(stats: &mut EvalAggregator, batch: &Batch, probabilities: &[f32]) -> Result<()> {
    let classes = stats.classes();
    if probabilities.len() != batch.len() * classes {
        return Err(RunError::classifier(format!(
            "probability matrix has {} entries, expected {} x {classes}",
            probabilities.len(),
            batch.len()
        )));
    }
    for i in 0..batch.len() {
        let row = &probabilities[i * classes..(i + 1) * classes];
        if let Some(prediction) = Prediction::from_probabilities(row) {
            stats.record(batch.class_of(i), prediction.class);
        }
    }
    Ok(())
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classifier::FitMetrics;
    use scrawl_data::{AtlasLayout, SpriteDecoder};

    /// Ten examples, one per class in class order, pixel intensity encodes
    /// the class (`class * 20 / 255`).
    fn dataset() -> Dataset {
        let layout = AtlasLayout::new(10, 2, 2, 10, 7);
        let mut atlas = Vec::with_capacity(layout.rgba_len());
        for i in 0..layout.examples {
            let v = u8::try_from(i * 20).unwrap();
            for _ in 0..layout.pixels_per_example() {
                atlas.extend_from_slice(&[v, v, v, 255]);
            }
        }
        let mut labels = vec![0u8; layout.label_len()];
        for i in 0..layout.examples {
            labels[i * layout.classes + i] = 1;
        }
        let decoded = SpriteDecoder::new(layout)
            .decode(atlas.as_slice(), &labels)
            .unwrap();
        let mut rng = <rand::rngs::StdRng as rand::SeedableRng>::seed_from_u64(11);
        Dataset::from_decoded_with_rng(decoded, &mut rng)
    }

    /// Reads the class back out of the intensity encoding; optionally
    /// mispredicts one class to exercise the error counters.
    struct IntensityClassifier {
        fits: usize,
        confuse: Option<(usize, usize)>,
    }

    impl IntensityClassifier {
        fn new() -> Self {
            Self {
                fits: 0,
                confuse: None,
            }
        }

        fn confusing(actual: usize, predicted: usize) -> Self {
            Self {
                fits: 0,
                confuse: Some((actual, predicted)),
            }
        }
    }

    impl Classifier for IntensityClassifier {
        fn predict(&self, pixels: &[f32], batch_size: usize) -> std::result::Result<Vec<f32>, String> {
            let pixels_per_example = pixels.len() / batch_size.max(1);
            let mut rows = Vec::with_capacity(batch_size * 10);
            for i in 0..batch_size {
                let v = pixels[i * pixels_per_example];
                let mut class = ((v * 255.0) / 20.0).round() as usize;
                if let Some((actual, predicted)) = self.confuse {
                    if class == actual {
                        class = predicted;
                    }
                }
                let mut row = vec![0.0f32; 10];
                row[class.min(9)] = 1.0;
                rows.extend_from_slice(&row);
            }
            Ok(rows)
        }

        fn fit(&mut self, _batch: &Batch, _options: &FitOptions) -> std::result::Result<FitMetrics, String> {
            self.fits += 1;
            Ok(FitMetrics {
                loss: 1.0 / self.fits as f32,
                accuracy: None,
            })
        }
    }

    struct CountingObserver {
        yields: usize,
        checkpoints: usize,
        stop_after_checkpoints: Option<usize>,
    }

    impl RunObserver for CountingObserver {
        fn on_yield(&mut self, _iteration: usize) {
            self.yields += 1;
        }

        fn on_checkpoint(&mut self, _checkpoint: &Checkpoint) -> bool {
            self.checkpoints += 1;
            self.stop_after_checkpoints
                .map_or(true, |limit| self.checkpoints < limit)
        }
    }

    #[test]
    fn test_train_runs_to_completion() {
        let mut ds = dataset();
        let mut model = IntensityClassifier::new();
        let config = RunConfig::new()
            .iterations(20)
            .batch_size(4)
            .yield_every(5)
            .checkpoint_every(10)
            .checkpoint_samples(6);
        let mut observer = CountingObserver {
            yields: 0,
            checkpoints: 0,
            stop_after_checkpoints: None,
        };

        let outcome = train(
            &mut model,
            &mut ds,
            &config,
            &StopToken::new(),
            &mut observer,
        )
        .unwrap();

        assert!(outcome.completed);
        assert_eq!(outcome.iterations_run, 20);
        assert_eq!(model.fits, 20);
        assert_eq!(observer.yields, 4);
        assert_eq!(observer.checkpoints, 2);
        // Perfect classifier: every post-fit verdict is correct.
        assert_eq!(outcome.train_stats.recorded(), 20 * 4);
        assert!((outcome.train_stats.running_accuracy() - 1.0).abs() < 1e-12);
        assert_eq!(outcome.test_stats.recorded(), 12);
    }

    #[test]
    fn test_stop_token_ends_run_with_partial_state() {
        let mut ds = dataset();
        let mut model = IntensityClassifier::new();
        let stop = StopToken::new();

        struct StopAt {
            stop: StopToken,
            at: usize,
        }
        impl RunObserver for StopAt {
            fn on_yield(&mut self, iteration: usize) {
                if iteration >= self.at {
                    self.stop.stop();
                }
            }
        }

        let config = RunConfig::new()
            .iterations(100)
            .batch_size(2)
            .yield_every(1)
            .checkpoint_every(0);
        let mut observer = StopAt {
            stop: stop.clone(),
            at: 7,
        };

        let outcome = train(&mut model, &mut ds, &config, &stop, &mut observer).unwrap();

        assert!(!outcome.completed);
        assert_eq!(outcome.iterations_run, 7);
        // Partial counters remain valid: one record per drawn example.
        assert_eq!(outcome.train_stats.recorded(), 7 * 2);
    }

    #[test]
    fn test_observer_can_end_run_at_checkpoint() {
        let mut ds = dataset();
        let mut model = IntensityClassifier::new();
        let config = RunConfig::new()
            .iterations(50)
            .batch_size(2)
            .yield_every(0)
            .checkpoint_every(5)
            .checkpoint_samples(0);
        let mut observer = CountingObserver {
            yields: 0,
            checkpoints: 0,
            stop_after_checkpoints: Some(2),
        };

        let outcome = train(
            &mut model,
            &mut ds,
            &config,
            &StopToken::new(),
            &mut observer,
        )
        .unwrap();

        assert!(!outcome.completed);
        assert_eq!(outcome.iterations_run, 10);
        assert_eq!(observer.checkpoints, 2);
    }

    #[test]
    fn test_evaluate_accumulates_confusions() {
        let mut ds = dataset();
        // Every 8 becomes a 9: test partition holds classes 7, 8, 9.
        let mut model = IntensityClassifier::confusing(8, 9);

        let outcome = evaluate(
            &mut model,
            &mut ds,
            9,
            4,
            &StopToken::new(),
            &mut NullObserver,
        )
        .unwrap();

        assert!(outcome.completed);
        assert_eq!(outcome.samples_run, 9);
        assert_eq!(outcome.stats.recorded(), 9);
        // Three full cycles over the 3-example test partition.
        assert_eq!(outcome.stats.snapshot().get(8, 9), 3);
        assert_eq!(outcome.stats.per_class_accuracy()[8], Some(0.0));
        assert!((outcome.stats.running_accuracy() - 6.0 / 9.0).abs() < 1e-12);
    }

    #[test]
    fn test_bad_probability_shape_is_classifier_error() {
        struct Short;
        impl Classifier for Short {
            fn predict(&self, _pixels: &[f32], _batch_size: usize) -> std::result::Result<Vec<f32>, String> {
                Ok(vec![0.5; 3])
            }
            fn fit(&mut self, _batch: &Batch, _options: &FitOptions) -> std::result::Result<FitMetrics, String> {
                Ok(FitMetrics {
                    loss: 0.0,
                    accuracy: None,
                })
            }
        }

        let mut ds = dataset();
        let err = evaluate(
            &mut Short,
            &mut ds,
            2,
            2,
            &StopToken::new(),
            &mut NullObserver,
        )
        .unwrap_err();
        assert!(matches!(err, RunError::Classifier { .. }));
    }
}
