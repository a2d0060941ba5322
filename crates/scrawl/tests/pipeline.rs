//! End-to-end pipeline scenarios over a synthetic sprite atlas.

use scrawl::prelude::*;
use scrawl::{evaluate, train};

const CLASSES: usize = 10;
const SIDE: usize = 4;

/// Builds the in-memory sources for a ten-example atlas: one example per
/// class, laid out in class order, every pixel of example `i` at intensity
/// `i * 20`.
fn synthetic_sources(layout: &AtlasLayout) -> (MemorySource, MemorySource) {
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
    (
        MemorySource::new("synthetic-atlas", atlas),
        MemorySource::new("synthetic-labels", labels),
    )
}

fn layout() -> AtlasLayout {
    AtlasLayout::new(10, SIDE, SIDE, CLASSES, 7)
}

/// Decodes the intensity encoding back into a class.
struct IntensityModel;

impl Classifier for IntensityModel {
    fn predict(&self, pixels: &[f32], batch_size: usize) -> Result<Vec<f32>, String> {
        let per_example = pixels.len() / batch_size.max(1);
        let mut rows = Vec::with_capacity(batch_size * CLASSES);
        for i in 0..batch_size {
            let class = (pixels[i * per_example] * 255.0 / 20.0).round() as usize;
            let mut row = vec![0.0f32; CLASSES];
            row[class.min(CLASSES - 1)] = 1.0;
            rows.extend_from_slice(&row);
        }
        Ok(rows)
    }

    fn fit(&mut self, _batch: &Batch, _options: &FitOptions) -> Result<FitMetrics, String> {
        Ok(FitMetrics {
            loss: 0.1,
            accuracy: Some(1.0),
        })
    }
}

#[test]
fn load_partitions_cover_the_whole_atlas() {
    let (atlas, labels) = synthetic_sources(&layout());
    let dataset = Dataset::load(&atlas, &labels, layout()).unwrap();

    assert_eq!(dataset.len(), 10);
    assert_eq!(
        dataset.partition_len(Partition::Train) + dataset.partition_len(Partition::Test),
        dataset.len()
    );
}

#[test]
fn train_batch_draws_only_train_examples() {
    let (atlas, labels) = synthetic_sources(&layout());
    let mut dataset = Dataset::load(&atlas, &labels, layout()).unwrap();

    // N = 10, Ntrain = 7, one example per class in class order: a batch of 3
    // must return 3 train examples with labels matching their class.
    let batch = BatchSampler::train(3).next_batch(&mut dataset).unwrap();
    assert_eq!(batch.len(), 3);
    for i in 0..batch.len() {
        let class = batch.class_of(i);
        assert!(class < 7);
        let expected = (class * 20) as f32 / 255.0;
        assert!((batch.pixel_row(i)[0] - expected).abs() < 1e-6);
    }
}

#[test]
fn cursor_cycle_is_a_permutation_that_repeats() {
    let (atlas, labels) = synthetic_sources(&layout());
    let mut dataset = Dataset::load_with_seed(&atlas, &labels, layout(), 99).unwrap();

    let n = dataset.partition_len(Partition::Train);
    let mut seen = vec![false; n];
    let first_cycle: Vec<usize> = (0..n).map(|_| dataset.next_train_index()).collect();
    for &i in &first_cycle {
        assert!(!seen[i], "index {i} visited twice in one cycle");
        seen[i] = true;
    }
    assert!(seen.iter().all(|&v| v));
    assert_eq!(dataset.next_train_index(), first_cycle[0]);
}

#[test]
fn full_run_produces_consistent_statistics() {
    let (atlas, labels) = synthetic_sources(&layout());
    let mut dataset = Dataset::load_with_seed(&atlas, &labels, layout(), 5).unwrap();
    let mut model = IntensityModel;

    let config = RunConfig::new()
        .iterations(14)
        .batch_size(2)
        .yield_every(5)
        .checkpoint_every(7)
        .checkpoint_samples(3);
    let outcome = train(
        &mut model,
        &mut dataset,
        &config,
        &StopToken::new(),
        &mut NullObserver,
    )
    .unwrap();

    assert!(outcome.completed);
    assert_eq!(outcome.iterations_run, 14);

    // The oracle model never misses.
    assert_eq!(outcome.train_stats.recorded(), 28);
    assert_eq!(outcome.train_stats.correct_count(), 28);
    assert_eq!(outcome.test_stats.recorded(), 6);
    assert!((outcome.test_stats.running_accuracy() - 1.0).abs() < 1e-12);

    // Aggregator invariants hold after a whole run.
    let snapshot = outcome.test_stats.snapshot();
    assert_eq!(snapshot.trace(), outcome.test_stats.correct_count());
    assert_eq!(snapshot.total(), outcome.test_stats.recorded());
}

#[test]
fn evaluation_report_round_trips_to_json() {
    let (atlas, labels) = synthetic_sources(&layout());
    let mut dataset = Dataset::load(&atlas, &labels, layout()).unwrap();
    let mut model = IntensityModel;

    let outcome = evaluate(
        &mut model,
        &mut dataset,
        6,
        2,
        &StopToken::new(),
        &mut NullObserver,
    )
    .unwrap();

    let report = EvalReport::from_aggregator(&outcome.stats);
    let json: serde_json::Value = serde_json::from_str(&report.to_json().unwrap()).unwrap();
    assert_eq!(json["total_recorded"], 6);
    assert_eq!(json["accuracy"], 1.0);
    // Train-only classes were never observed by the sweep.
    assert_eq!(json["per_class"][0]["accuracy"], serde_json::Value::Null);
}

#[test]
fn drawing_normalization_feeds_prediction() {
    // Draw a fat dark stroke, normalize, classify with a model keyed on ink
    // presence near the center.
    struct CenterInk;
    impl Classifier for CenterInk {
        fn predict(&self, pixels: &[f32], _batch_size: usize) -> Result<Vec<f32>, String> {
            let center = pixels[14 * 28 + 14];
            let mut row = vec![0.0f32; CLASSES];
            row[usize::from(center > 0.5)] = 1.0;
            Ok(row)
        }
        fn fit(&mut self, _batch: &Batch, _options: &FitOptions) -> Result<FitMetrics, String> {
            Err("inference-only".to_string())
        }
    }

    let mut canvas = Canvas::blank(280, 280);
    for y in 100..180 {
        for x in 130..150 {
            canvas.paint(x, y, 0);
        }
    }

    let prediction = classify_drawing(&CenterInk, &Normalizer::new(), &canvas).unwrap();
    assert_eq!(prediction.class, 1, "centered stroke should land on center");

    let blank = Canvas::blank(280, 280);
    let prediction = classify_drawing(&CenterInk, &Normalizer::new(), &blank).unwrap();
    assert_eq!(prediction.class, 0);
}
