use crate::dataset;
use crate::error::TrainingError;
use crate::predictor::{
    FitObserver, FitOptions, LstmPredictorFactory, ModelSpec, PredictorFactory, SampleBatch,
};
use crate::training::history::{EpochRecord, LossHistory};
use crate::training::progress::{EvalReport, ProgressSink, RunPhase, TrainingUpdate};
use crate::wave::{GenerationParams, Sequence, SequenceGenerator, WINDOW_LEN};

/// Training-run configuration, loadable from TOML.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct TrainConfig {
    pub epochs: usize,
    pub batch_size: usize,
    pub hidden_size: usize,
    pub learning_rate: f64,
    /// Validation pool size is max(validation_min, validation_fraction * pool).
    pub validation_min: usize,
    pub validation_fraction: f64,
    /// Fresh sequences predicted after training for the evaluation view.
    pub test_count: usize,
}

impl Default for TrainConfig {
    fn default() -> Self {
        TrainConfig {
            epochs: 20,
            batch_size: 32,
            hidden_size: 50,
            learning_rate: 0.01,
            validation_min: 20,
            validation_fraction: 0.2,
            test_count: 5,
        }
    }
}

/// Drives the full pipeline: pool generation, dataset and tensor construction,
/// the predictor's fit loop, and final evaluation on a fresh test pool.
///
/// Progress is reported through a [`ProgressSink`] at every phase transition
/// and fit yield point, in strict program order. A run is driven to `Complete`
/// or `Error`; there is no cancellation, and `&mut self` makes re-entry
/// impossible while a run is in flight.
pub struct TrainingOrchestrator {
    generator: SequenceGenerator,
    generation: GenerationParams,
    training: TrainConfig,
    pool: Vec<Sequence>,
    history: LossHistory,
    factory: Box<dyn PredictorFactory>,
    phase: RunPhase,
}

impl TrainingOrchestrator {
    pub fn new(generation: GenerationParams, training: TrainConfig) -> Self {
        Self::with_factory(generation, training, Box::new(LstmPredictorFactory))
    }

    /// Build with a custom predictor factory (tests inject scripted models).
    pub fn with_factory(
        generation: GenerationParams,
        training: TrainConfig,
        factory: Box<dyn PredictorFactory>,
    ) -> Self {
        TrainingOrchestrator {
            generator: SequenceGenerator::new(),
            generation,
            training,
            pool: Vec::new(),
            history: LossHistory::new(),
            factory,
            phase: RunPhase::Idle,
        }
    }

    /// Swap in a deterministic generator for reproducible runs.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.generator = SequenceGenerator::from_seed(seed);
        self
    }

    /// Replace the pool wholesale with freshly generated sequences.
    /// Returns the new pool size.
    pub fn generate(&mut self) -> usize {
        self.pool = self.generator.generate(&self.generation);
        self.pool.len()
    }

    pub fn sequences(&self) -> &[Sequence] {
        &self.pool
    }

    pub fn history(&self) -> &LossHistory {
        &self.history
    }

    pub fn phase(&self) -> RunPhase {
        self.phase
    }

    pub fn total_epochs(&self) -> usize {
        self.training.epochs
    }

    fn validation_count(&self, pool_len: usize) -> usize {
        let scaled = (self.training.validation_fraction * pool_len as f64).floor() as usize;
        self.training.validation_min.max(scaled)
    }

    /// Run one complete training pass over the current pool.
    ///
    /// Fails fast with [`TrainingError::NoData`] on an empty pool. Every error
    /// is also reported through the sink as a `Failed` update; a successful
    /// run ends with `EvaluationReady` followed by `Finished`.
    pub fn train(&mut self, sink: &mut dyn ProgressSink) -> Result<EvalReport, TrainingError> {
        match self.run(sink) {
            Ok(report) => {
                self.set_phase(RunPhase::Complete, sink);
                sink.send(TrainingUpdate::Finished);
                Ok(report)
            }
            Err(err) => {
                self.phase = RunPhase::Error;
                sink.send(TrainingUpdate::Failed {
                    message: err.to_string(),
                });
                Err(err)
            }
        }
    }

    fn run(&mut self, sink: &mut dyn ProgressSink) -> Result<EvalReport, TrainingError> {
        if self.pool.is_empty() {
            return Err(TrainingError::NoData);
        }

        self.set_phase(RunPhase::PreparingData, sink);
        let train_set = dataset::build(&self.pool)?;
        // Validation sequences are generated independently with the same params
        let validation_pool = self.generator.generate(&GenerationParams {
            count: self.validation_count(self.pool.len()),
            ..self.generation.clone()
        });
        let validation_set = dataset::build(&validation_pool)?;

        self.set_phase(RunPhase::BuildingTensors, sink);
        let train_batch = SampleBatch::from_dataset(&train_set, WINDOW_LEN)?;
        let validation_batch = SampleBatch::from_dataset(&validation_set, WINDOW_LEN)?;

        // History from the previous run survives tensor failures above, and is
        // only discarded once the new model exists
        self.set_phase(RunPhase::CompilingModel, sink);
        self.history.clear();
        let mut predictor = self.factory.build(&ModelSpec {
            window: WINDOW_LEN,
            hidden_size: self.training.hidden_size,
            learning_rate: self.training.learning_rate,
        });

        self.set_phase(RunPhase::Training, sink);
        let options = FitOptions {
            epochs: self.training.epochs,
            batch_size: self.training.batch_size,
        };
        {
            let mut observer = RunObserver {
                sink: &mut *sink,
                history: &mut self.history,
                total_epochs: options.epochs,
                current_epoch: 0,
            };
            predictor.fit(&train_batch, &validation_batch, &options, &mut observer);
        }

        // The fit buffers are dead weight from here on
        drop(train_batch);
        drop(validation_batch);

        self.set_phase(RunPhase::Evaluating, sink);
        let test_pool = self.generator.generate(&GenerationParams {
            count: self.training.test_count,
            ..self.generation.clone()
        });
        let test_set = dataset::build(&test_pool)?;
        let test_batch = SampleBatch::from_dataset(&test_set, WINDOW_LEN)?;
        let predictions = predictor.predict(&test_batch);

        let report = EvalReport {
            sequences: test_pool,
            predictions,
        };
        sink.send(TrainingUpdate::EvaluationReady(report.clone()));
        Ok(report)
    }

    fn set_phase(&mut self, phase: RunPhase, sink: &mut dyn ProgressSink) {
        self.phase = phase;
        sink.send(TrainingUpdate::PhaseChanged(phase));
    }
}

/// Bridges fit callbacks to history appends and sink updates. The history
/// append happens before the epoch-end update goes out, so any consumer
/// reacting to epoch k already sees k records.
struct RunObserver<'a> {
    sink: &'a mut dyn ProgressSink,
    history: &'a mut LossHistory,
    total_epochs: usize,
    current_epoch: usize,
}

impl FitObserver for RunObserver<'_> {
    fn on_epoch_begin(&mut self, epoch: usize) {
        self.current_epoch = epoch;
        self.sink.send(TrainingUpdate::EpochBegin {
            epoch,
            total_epochs: self.total_epochs,
        });
    }

    fn on_batch_end(&mut self, batch: usize, loss: f32) {
        self.sink.send(TrainingUpdate::BatchEnd {
            epoch: self.current_epoch,
            total_epochs: self.total_epochs,
            batch,
            loss,
        });
    }

    fn on_epoch_end(&mut self, epoch: usize, loss: f32, val_loss: f32) {
        let record = EpochRecord {
            epoch,
            loss,
            val_loss,
        };
        self.history.push(record);
        self.sink.send(TrainingUpdate::EpochEnd {
            record,
            total_epochs: self.total_epochs,
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::predictor::Predictor;

    /// Scripted predictor: loss is 1/epoch, prediction echoes the window's
    /// final value.
    struct ScriptedPredictor;

    impl Predictor for ScriptedPredictor {
        fn fit(
            &mut self,
            train: &SampleBatch,
            _validation: &SampleBatch,
            options: &FitOptions,
            observer: &mut dyn FitObserver,
        ) {
            let batches = train.samples().div_ceil(options.batch_size);
            for epoch in 1..=options.epochs {
                observer.on_epoch_begin(epoch);
                for batch in 0..batches {
                    observer.on_batch_end(batch, 1.0 / epoch as f32);
                }
                observer.on_epoch_end(epoch, 1.0 / epoch as f32, 1.5 / epoch as f32);
            }
        }

        fn predict(&self, batch: &SampleBatch) -> Vec<f32> {
            (0..batch.samples())
                .map(|i| *batch.input_row(i).last().unwrap())
                .collect()
        }
    }

    struct ScriptedFactory;

    impl PredictorFactory for ScriptedFactory {
        fn build(&self, _spec: &ModelSpec) -> Box<dyn Predictor> {
            Box::new(ScriptedPredictor)
        }
    }

    fn scripted_orchestrator(pool_count: usize) -> TrainingOrchestrator {
        let generation = GenerationParams {
            count: pool_count,
            ..Default::default()
        };
        let training = TrainConfig {
            epochs: 3,
            batch_size: 10,
            ..Default::default()
        };
        TrainingOrchestrator::with_factory(generation, training, Box::new(ScriptedFactory))
            .with_seed(1234)
    }

    fn tag(update: &TrainingUpdate) -> String {
        match update {
            TrainingUpdate::PhaseChanged(phase) => format!("phase:{}", phase.label()),
            TrainingUpdate::EpochBegin { epoch, .. } => format!("begin:{epoch}"),
            TrainingUpdate::BatchEnd { batch, .. } => format!("batch:{batch}"),
            TrainingUpdate::EpochEnd { record, .. } => format!("end:{}", record.epoch),
            TrainingUpdate::EvaluationReady(_) => "eval".to_string(),
            TrainingUpdate::Failed { .. } => "failed".to_string(),
            TrainingUpdate::Finished => "finished".to_string(),
        }
    }

    #[test]
    fn test_train_without_data_fails() {
        let mut orchestrator = scripted_orchestrator(10);
        let mut sink: Vec<TrainingUpdate> = Vec::new();

        let result = orchestrator.train(&mut sink);
        assert!(matches!(result, Err(TrainingError::NoData)));
        assert_eq!(orchestrator.phase(), RunPhase::Error);
        assert_eq!(sink.len(), 1);
        assert_eq!(tag(&sink[0]), "failed");
    }

    /// Factory that must never be reached.
    struct UnreachableFactory;

    impl PredictorFactory for UnreachableFactory {
        fn build(&self, _spec: &ModelSpec) -> Box<dyn Predictor> {
            panic!("factory invoked after a data-preparation failure");
        }
    }

    #[test]
    fn test_tensor_failure_aborts_before_model_exists() {
        // validation_min 0 with fraction 0 yields an empty validation pool,
        // which fails tensor construction
        let generation = GenerationParams {
            count: 10,
            ..Default::default()
        };
        let training = TrainConfig {
            validation_min: 0,
            validation_fraction: 0.0,
            ..Default::default()
        };
        let mut orchestrator =
            TrainingOrchestrator::with_factory(generation, training, Box::new(UnreachableFactory))
                .with_seed(77);
        orchestrator.generate();

        let mut sink: Vec<TrainingUpdate> = Vec::new();
        let result = orchestrator.train(&mut sink);

        assert!(matches!(result, Err(TrainingError::TensorConstruction(_))));
        assert_eq!(orchestrator.phase(), RunPhase::Error);
        // The run dies in tensor construction: compilation is never reached,
        // so the factory stays idle and the history is never cleared
        let tags: Vec<String> = sink.iter().map(tag).collect();
        assert_eq!(tags, vec!["phase:PREPARING", "phase:TENSORS", "failed"]);
    }

    #[test]
    fn test_generate_replaces_pool() {
        let mut orchestrator = scripted_orchestrator(8);
        assert_eq!(orchestrator.generate(), 8);
        let first = orchestrator.sequences().to_vec();
        assert_eq!(orchestrator.generate(), 8);
        // The rng advances, so a regenerated pool is a different draw
        assert_ne!(first, orchestrator.sequences());
    }

    #[test]
    fn test_update_sequence_order() {
        let mut orchestrator = scripted_orchestrator(25);
        orchestrator.generate();
        let mut sink: Vec<TrainingUpdate> = Vec::new();

        orchestrator.train(&mut sink).unwrap();

        // 25 samples with batch 10 gives 3 batches per epoch
        let expected = vec![
            "phase:PREPARING",
            "phase:TENSORS",
            "phase:COMPILING",
            "phase:TRAINING",
            "begin:1", "batch:0", "batch:1", "batch:2", "end:1",
            "begin:2", "batch:0", "batch:1", "batch:2", "end:2",
            "begin:3", "batch:0", "batch:1", "batch:2", "end:3",
            "phase:EVALUATING",
            "eval",
            "phase:COMPLETE",
            "finished",
        ];
        let tags: Vec<String> = sink.iter().map(tag).collect();
        assert_eq!(tags, expected);
        assert_eq!(orchestrator.phase(), RunPhase::Complete);
    }

    #[test]
    fn test_history_records_every_epoch_once() {
        let mut orchestrator = scripted_orchestrator(25);
        orchestrator.generate();
        let mut sink: Vec<TrainingUpdate> = Vec::new();

        orchestrator.train(&mut sink).unwrap();
        let records = orchestrator.history().records().to_vec();
        assert_eq!(records.len(), 3);
        for (i, record) in records.iter().enumerate() {
            assert_eq!(record.epoch, i + 1);
            assert!((record.loss - 1.0 / (i + 1) as f32).abs() < 1e-6);
            assert!((record.val_loss - 1.5 / (i + 1) as f32).abs() < 1e-6);
        }

        // A second run starts over instead of appending
        orchestrator.train(&mut sink).unwrap();
        assert_eq!(orchestrator.history().len(), 3);
    }

    #[test]
    fn test_eval_report_covers_test_pool() {
        let mut orchestrator = scripted_orchestrator(25);
        orchestrator.generate();
        let mut sink: Vec<TrainingUpdate> = Vec::new();

        let report = orchestrator.train(&mut sink).unwrap();
        assert_eq!(report.sequences.len(), 5);
        assert_eq!(report.predictions.len(), 5);
        // The scripted predictor echoes the penultimate sample, so predictions
        // stay aligned with their sequences
        for (seq, prediction) in report.sequences.iter().zip(&report.predictions) {
            let penultimate = seq.window().last().unwrap().y as f32;
            assert!((prediction - penultimate).abs() < 1e-6);
        }
    }

    #[test]
    fn test_validation_count_floor() {
        let orchestrator = scripted_orchestrator(10);
        // Small pools fall back to the configured minimum
        assert_eq!(orchestrator.validation_count(10), 20);
        assert_eq!(orchestrator.validation_count(99), 20);
        // Larger pools scale by the fraction
        assert_eq!(orchestrator.validation_count(200), 40);
        assert_eq!(orchestrator.validation_count(205), 41);
    }

    #[test]
    fn test_end_to_end_lstm_loss_trend() {
        // Full pipeline with the real model: the loss should loosely trend
        // down over the run even though per-epoch noise is allowed.
        let generation = GenerationParams::default();
        let training = TrainConfig::default();
        let mut orchestrator =
            TrainingOrchestrator::new(generation, training).with_seed(2024);
        orchestrator.generate();

        let mut sink: Vec<TrainingUpdate> = Vec::new();
        let report = orchestrator.train(&mut sink).unwrap();

        let records = orchestrator.history().records();
        assert_eq!(records.len(), 20);
        assert_eq!(report.predictions.len(), 5);

        let first: f32 = records[..5].iter().map(|r| r.loss).sum::<f32>() / 5.0;
        let last: f32 = records[15..].iter().map(|r| r.loss).sum::<f32>() / 5.0;
        assert!(
            last < first,
            "expected loss to trend down, first={first} last={last}"
        );
    }
}
