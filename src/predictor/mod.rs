//! Predictor seam: the orchestrator drives any [`Predictor`] built by a
//! [`PredictorFactory`]. The shipped implementation is an LSTM trained with
//! the Burn framework on the CPU backend.

mod batch;
mod lstm;
mod network;

pub use batch::SampleBatch;
pub use lstm::{LstmPredictor, LstmPredictorFactory};
pub use network::{ForecastNetwork, ForecastNetworkConfig};

/// Architecture and optimizer settings for a freshly built predictor.
#[derive(Debug, Clone, Copy)]
pub struct ModelSpec {
    pub window: usize,
    pub hidden_size: usize,
    pub learning_rate: f64,
}

/// Fit-loop settings.
#[derive(Debug, Clone, Copy)]
pub struct FitOptions {
    pub epochs: usize,
    pub batch_size: usize,
}

/// Callbacks fired at the fit loop's yield points.
/// Epochs are numbered from 1, batches from 0.
pub trait FitObserver {
    /// Called before the first batch of each epoch.
    fn on_epoch_begin(&mut self, _epoch: usize) {}
    /// Called after each optimizer step with that batch's loss.
    fn on_batch_end(&mut self, _batch: usize, _loss: f32) {}
    /// Called after the validation pass with the epoch's mean train loss.
    fn on_epoch_end(&mut self, _epoch: usize, _loss: f32, _val_loss: f32) {}
}

/// A trainable next-sample forecaster.
pub trait Predictor {
    /// Run the full fit loop over `train`, scoring `validation` after each
    /// epoch. Returns once every epoch has completed.
    fn fit(
        &mut self,
        train: &SampleBatch,
        validation: &SampleBatch,
        options: &FitOptions,
        observer: &mut dyn FitObserver,
    );

    /// Predict the next sample for every window in the batch.
    fn predict(&self, batch: &SampleBatch) -> Vec<f32>;
}

/// Builds a fresh predictor at the start of each training run.
pub trait PredictorFactory: Send {
    fn build(&self, spec: &ModelSpec) -> Box<dyn Predictor>;
}
