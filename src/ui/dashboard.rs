use std::collections::VecDeque;

use crate::training::history::{EpochRecord, LossHistory};
use crate::training::progress::{EvalReport, RunPhase, TrainingUpdate};

const MAX_BATCH_HISTORY: usize = 200;

/// Dashboard state mirroring the run thread: phase, status text, a copy of
/// the loss history, and the latest evaluation report.
pub struct DashboardState {
    /// Mirror of the run's loss history, one record per finished epoch.
    pub history: LossHistory,
    /// Recent per-batch losses for the sparkline.
    pub batch_losses: VecDeque<f64>,

    pub phase: RunPhase,
    pub status_line: String,
    pub epoch: usize,
    pub total_epochs: usize,
    pub batch: usize,

    pub eval: Option<EvalReport>,
    pub error: Option<String>,
}

impl DashboardState {
    pub fn new(total_epochs: usize) -> Self {
        DashboardState {
            history: LossHistory::new(),
            batch_losses: VecDeque::new(),

            phase: RunPhase::Idle,
            status_line: String::new(),
            epoch: 0,
            total_epochs,
            batch: 0,

            eval: None,
            error: None,
        }
    }

    /// Apply one update from the run thread. Returns true when a plot derived
    /// from this state (loss curve, evaluation) has to be rebuilt.
    pub fn apply(&mut self, update: &TrainingUpdate) -> bool {
        if let Some(line) = update.status_line() {
            self.status_line = line;
        }

        match update {
            TrainingUpdate::PhaseChanged(phase) => {
                self.phase = *phase;
                if *phase == RunPhase::CompilingModel {
                    // The run clears its history for the new model; the
                    // mirror follows suit
                    self.history.clear();
                    self.batch_losses.clear();
                    return true;
                }
                false
            }
            TrainingUpdate::EpochBegin {
                epoch,
                total_epochs,
            } => {
                self.epoch = *epoch;
                self.total_epochs = *total_epochs;
                self.batch = 0;
                false
            }
            TrainingUpdate::BatchEnd { batch, loss, .. } => {
                self.batch = *batch;
                self.batch_losses.push_back(f64::from(*loss));
                if self.batch_losses.len() > MAX_BATCH_HISTORY {
                    self.batch_losses.pop_front();
                }
                false
            }
            TrainingUpdate::EpochEnd { record, .. } => {
                self.epoch = record.epoch;
                self.history.push(*record);
                true
            }
            TrainingUpdate::EvaluationReady(report) => {
                self.eval = Some(report.clone());
                true
            }
            TrainingUpdate::Failed { message } => {
                self.phase = RunPhase::Error;
                self.error = Some(message.clone());
                false
            }
            TrainingUpdate::Finished => false,
        }
    }

    /// Epoch progress ratio [0.0, 1.0].
    pub fn progress(&self) -> f64 {
        if self.total_epochs == 0 {
            return 0.0;
        }
        self.epoch as f64 / self.total_epochs as f64
    }

    /// The most recently finished epoch, if any.
    pub fn latest_epoch(&self) -> Option<&EpochRecord> {
        self.history.records().last()
    }

    /// Whether a run is somewhere between preparation and evaluation.
    pub fn is_running(&self) -> bool {
        !matches!(
            self.phase,
            RunPhase::Idle | RunPhase::Complete | RunPhase::Error
        )
    }
}
