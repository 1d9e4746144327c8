use burn::nn::{Linear, LinearConfig, Lstm, LstmConfig};
use burn::prelude::*;

/// Recurrent forecasting network.
///
/// ```text
/// Input:  [batch, window, 1]
/// LSTM:   1 -> hidden_size units, final hidden state => [batch, hidden_size]
/// FC:     hidden_size -> 1 predicted next sample
/// ```
#[derive(Module, Debug)]
pub struct ForecastNetwork<B: Backend> {
    lstm: Lstm<B>,
    output: Linear<B>,
}

#[derive(Config, Debug)]
pub struct ForecastNetworkConfig {
    #[config(default = 50)]
    pub hidden_size: usize,
}

impl ForecastNetworkConfig {
    pub fn init<B: Backend>(&self, device: &B::Device) -> ForecastNetwork<B> {
        ForecastNetwork {
            lstm: LstmConfig::new(1, self.hidden_size, true).init(device),
            output: LinearConfig::new(self.hidden_size, 1).init(device),
        }
    }
}

impl<B: Backend> ForecastNetwork<B> {
    /// Forward pass: input [batch, window, 1] -> output [batch, 1].
    /// Only the final hidden state feeds the output layer.
    pub fn forward(&self, input: Tensor<B, 3>) -> Tensor<B, 2> {
        let (_, state) = self.lstm.forward(input, None);
        self.output.forward(state.hidden)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use burn::backend::NdArray;

    type TestBackend = NdArray<f32>;

    #[test]
    fn test_network_output_shape() {
        let device = Default::default();
        let config = ForecastNetworkConfig { hidden_size: 50 };
        let network = config.init::<TestBackend>(&device);

        let input = Tensor::zeros([2, 49, 1], &device);
        let output = network.forward(input);
        assert_eq!(output.shape().dims, [2, 1]);
    }

    #[test]
    fn test_network_single_window() {
        let device = Default::default();
        let config = ForecastNetworkConfig { hidden_size: 8 };
        let network = config.init::<TestBackend>(&device);

        let input = Tensor::zeros([1, 49, 1], &device);
        let output = network.forward(input);
        assert_eq!(output.shape().dims, [1, 1]);
    }
}
