use burn::backend::{Autodiff, NdArray};
use burn::module::AutodiffModule;
use burn::optim::{AdamConfig, GradientsParams, Optimizer};
use burn::prelude::*;
use burn::tensor::TensorData;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;

use crate::predictor::network::{ForecastNetwork, ForecastNetworkConfig};
use crate::predictor::{
    FitObserver, FitOptions, ModelSpec, Predictor, PredictorFactory, SampleBatch,
};

type InferBackend = NdArray<f32>;
type TrainBackend = Autodiff<InferBackend>;

/// LSTM forecaster trained with Adam on mean squared error.
pub struct LstmPredictor {
    network: ForecastNetwork<TrainBackend>,
    optimizer: burn::optim::adaptor::OptimizerAdaptor<
        burn::optim::Adam,
        ForecastNetwork<TrainBackend>,
        TrainBackend,
    >,
    learning_rate: f64,
    device: <TrainBackend as Backend>::Device,
    rng: StdRng,
}

impl LstmPredictor {
    pub fn new(spec: &ModelSpec) -> Self {
        let device = Default::default();
        let net_config = ForecastNetworkConfig {
            hidden_size: spec.hidden_size,
        };
        let network: ForecastNetwork<TrainBackend> = net_config.init(&device);
        let optimizer = AdamConfig::new().init();

        LstmPredictor {
            network,
            optimizer,
            learning_rate: spec.learning_rate,
            device,
            rng: StdRng::from_os_rng(),
        }
    }

    /// One optimizer step over the given rows. Returns the batch loss.
    fn train_step(&mut self, batch: &SampleBatch, indices: &[usize]) -> f32 {
        let (inputs, targets) = batch.gather(indices);
        let n = indices.len();

        let xs = Tensor::<TrainBackend, 1>::from_data(
            TensorData::from(inputs.as_slice()),
            &self.device,
        )
        .reshape([n as i32, batch.window() as i32, 1]);
        let ys = Tensor::<TrainBackend, 1>::from_data(
            TensorData::from(targets.as_slice()),
            &self.device,
        )
        .reshape([n as i32, 1]);

        let predicted = self.network.forward(xs);

        // MSE loss
        let diff = predicted - ys;
        let loss = (diff.clone() * diff).mean();

        // Extract scalar loss value before backward
        let loss_val: f32 = loss
            .clone()
            .into_data()
            .to_vec::<f32>()
            .expect("f32 loss tensor extraction")[0];

        let grads = loss.backward();
        let grads = GradientsParams::from_grads(grads, &self.network);

        // Optimizer step: consumes the network, returns the updated one
        self.network = self
            .optimizer
            .step(self.learning_rate, self.network.clone(), grads);

        loss_val
    }

    /// MSE of the current weights over a batch, without autodiff.
    fn score(&self, batch: &SampleBatch) -> f32 {
        let predictions = self.predict(batch);
        let sum: f32 = predictions
            .iter()
            .zip(batch.targets())
            .map(|(p, t)| (p - t) * (p - t))
            .sum();
        sum / predictions.len() as f32
    }
}

impl Predictor for LstmPredictor {
    fn fit(
        &mut self,
        train: &SampleBatch,
        validation: &SampleBatch,
        options: &FitOptions,
        observer: &mut dyn FitObserver,
    ) {
        let mut order: Vec<usize> = (0..train.samples()).collect();

        for epoch in 1..=options.epochs {
            observer.on_epoch_begin(epoch);
            order.shuffle(&mut self.rng);

            let mut weighted_loss = 0.0_f64;
            let mut seen = 0usize;
            for (batch_index, chunk) in order.chunks(options.batch_size.max(1)).enumerate() {
                let loss = self.train_step(train, chunk);
                weighted_loss += loss as f64 * chunk.len() as f64;
                seen += chunk.len();
                observer.on_batch_end(batch_index, loss);
            }

            // Epoch loss is the sample-weighted mean over its batches
            let train_loss = if seen == 0 {
                0.0
            } else {
                (weighted_loss / seen as f64) as f32
            };
            let val_loss = self.score(validation);
            observer.on_epoch_end(epoch, train_loss, val_loss);
        }
    }

    fn predict(&self, batch: &SampleBatch) -> Vec<f32> {
        let network = self.network.valid();
        let xs = Tensor::<InferBackend, 1>::from_data(
            TensorData::from(batch.inputs()),
            &self.device,
        )
        .reshape([batch.samples() as i32, batch.window() as i32, 1]);

        network
            .forward(xs)
            .into_data()
            .to_vec()
            .expect("f32 prediction tensor extraction")
    }
}

/// Builds a fresh [`LstmPredictor`] per run.
pub struct LstmPredictorFactory;

impl PredictorFactory for LstmPredictorFactory {
    fn build(&self, spec: &ModelSpec) -> Box<dyn Predictor> {
        Box::new(LstmPredictor::new(spec))
    }
}
