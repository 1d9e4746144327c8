use std::sync::mpsc;

use crate::training::history::EpochRecord;
use crate::wave::Sequence;

/// Phases of a training run, in the order a successful run enters them.
/// `Error` is reachable from any non-terminal phase.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunPhase {
    Idle,
    PreparingData,
    BuildingTensors,
    CompilingModel,
    Training,
    Evaluating,
    Complete,
    Error,
}

impl RunPhase {
    /// Short name for headers and stats panels.
    pub fn label(&self) -> &'static str {
        match self {
            RunPhase::Idle => "IDLE",
            RunPhase::PreparingData => "PREPARING",
            RunPhase::BuildingTensors => "TENSORS",
            RunPhase::CompilingModel => "COMPILING",
            RunPhase::Training => "TRAINING",
            RunPhase::Evaluating => "EVALUATING",
            RunPhase::Complete => "COMPLETE",
            RunPhase::Error => "ERROR",
        }
    }
}

/// Test-pool predictions produced at the end of a successful run.
#[derive(Debug, Clone)]
pub struct EvalReport {
    pub sequences: Vec<Sequence>,
    pub predictions: Vec<f32>,
}

impl EvalReport {
    /// Mean squared error of the predictions against the true targets.
    pub fn mean_squared_error(&self) -> f32 {
        if self.predictions.is_empty() {
            return 0.0;
        }
        let sum: f32 = self
            .sequences
            .iter()
            .zip(&self.predictions)
            .filter_map(|(seq, pred)| {
                seq.target().map(|t| {
                    let d = t.y as f32 - pred;
                    d * d
                })
            })
            .sum();
        sum / self.predictions.len() as f32
    }
}

/// Updates sent from a training run to its consumer, in strict program order.
#[derive(Debug, Clone)]
pub enum TrainingUpdate {
    PhaseChanged(RunPhase),
    EpochBegin {
        epoch: usize,
        total_epochs: usize,
    },
    BatchEnd {
        epoch: usize,
        total_epochs: usize,
        batch: usize,
        loss: f32,
    },
    /// Sent after the epoch's record has been appended to the loss history.
    EpochEnd {
        record: EpochRecord,
        total_epochs: usize,
    },
    EvaluationReady(EvalReport),
    Failed {
        message: String,
    },
    /// Final sentinel of a successful run; the UI joins the run thread on it.
    Finished,
}

impl TrainingUpdate {
    /// Human-readable status line for this update, if it carries one.
    pub fn status_line(&self) -> Option<String> {
        match self {
            TrainingUpdate::PhaseChanged(phase) => match phase {
                RunPhase::PreparingData => Some("Preparing data...".to_string()),
                RunPhase::BuildingTensors => Some("Creating tensors...".to_string()),
                RunPhase::CompilingModel => Some("Compiling model...".to_string()),
                RunPhase::Training => Some("Training started...".to_string()),
                RunPhase::Evaluating => Some("Evaluating model...".to_string()),
                RunPhase::Complete => Some("Training and Evaluation complete!".to_string()),
                _ => None,
            },
            TrainingUpdate::EpochBegin { epoch, total_epochs } => {
                Some(format!("Epoch: {}/{} - Starting...", epoch, total_epochs))
            }
            TrainingUpdate::BatchEnd {
                epoch,
                total_epochs,
                batch,
                loss,
            } => Some(format!(
                "Epoch: {}/{} - Batch: {} - Loss: {:.6}",
                epoch, total_epochs, batch, loss
            )),
            TrainingUpdate::EpochEnd {
                record,
                total_epochs,
            } => Some(format!(
                "Epoch: {}/{} - Loss: {:.6} - Val Loss: {:.6}",
                record.epoch, total_epochs, record.loss, record.val_loss
            )),
            TrainingUpdate::EvaluationReady(_) => None,
            TrainingUpdate::Failed { message } => Some(format!("Error: {}", message)),
            TrainingUpdate::Finished => None,
        }
    }
}

/// Consumer of training updates. Implementations must not block the run.
pub trait ProgressSink {
    fn send(&mut self, update: TrainingUpdate);
}

/// Channel sink for the TUI. Updates are dropped once the receiver is gone.
impl ProgressSink for mpsc::Sender<TrainingUpdate> {
    fn send(&mut self, update: TrainingUpdate) {
        let _ = mpsc::Sender::send(self, update);
    }
}

/// Collecting sink for tests.
impl ProgressSink for Vec<TrainingUpdate> {
    fn send(&mut self, update: TrainingUpdate) {
        self.push(update);
    }
}

/// Stdout sink for headless runs.
pub struct ConsoleSink;

impl ProgressSink for ConsoleSink {
    fn send(&mut self, update: TrainingUpdate) {
        if let Some(line) = update.status_line() {
            println!("{line}");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::wave::{synthesize, WaveParams};

    #[test]
    fn test_phase_status_lines() {
        let line = TrainingUpdate::PhaseChanged(RunPhase::PreparingData)
            .status_line()
            .unwrap();
        assert_eq!(line, "Preparing data...");
        assert!(TrainingUpdate::PhaseChanged(RunPhase::Idle)
            .status_line()
            .is_none());
        assert!(TrainingUpdate::Finished.status_line().is_none());
    }

    #[test]
    fn test_epoch_end_status_line_format() {
        let update = TrainingUpdate::EpochEnd {
            record: EpochRecord {
                epoch: 3,
                loss: 0.123456789,
                val_loss: 0.2,
            },
            total_epochs: 20,
        };
        assert_eq!(
            update.status_line().unwrap(),
            "Epoch: 3/20 - Loss: 0.123457 - Val Loss: 0.200000"
        );
    }

    #[test]
    fn test_vec_sink_collects_in_order() {
        let mut sink: Vec<TrainingUpdate> = Vec::new();
        sink.send(TrainingUpdate::PhaseChanged(RunPhase::PreparingData));
        sink.send(TrainingUpdate::Finished);
        assert_eq!(sink.len(), 2);
        assert!(matches!(sink[0], TrainingUpdate::PhaseChanged(_)));
        assert!(matches!(sink[1], TrainingUpdate::Finished));
    }

    #[test]
    fn test_channel_sink_survives_dropped_receiver() {
        let (mut tx, rx) = mpsc::channel::<TrainingUpdate>();
        drop(rx);
        // Must not panic; the update is silently discarded
        tx.send(TrainingUpdate::Finished);
    }

    #[test]
    fn test_eval_report_mse() {
        let flat = synthesize(&WaveParams {
            amplitude: 0.0,
            period: 1.0,
            negative: false,
        });
        // True targets are 0.0; predictions of 0.1 and -0.1 give MSE 0.01
        let report = EvalReport {
            sequences: vec![flat.clone(), flat],
            predictions: vec![0.1, -0.1],
        };
        assert!((report.mean_squared_error() - 0.01).abs() < 1e-7);
    }
}
