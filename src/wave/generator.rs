use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::wave::sequence::{Point, Sequence, WaveParams, SEQUENCE_LEN};

/// Knobs for random wave generation, loadable from TOML.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct GenerationParams {
    pub count: usize,
    pub min_amplitude: f64,
    pub max_amplitude: f64,
    pub min_period: f64,
    pub max_period: f64,
    /// Chance, in percent, that a wave is vertically flipped.
    pub negative_probability: f64,
}

impl Default for GenerationParams {
    fn default() -> Self {
        GenerationParams {
            count: 100,
            min_amplitude: 0.5,
            max_amplitude: 1.5,
            min_period: 1.0,
            max_period: 2.0,
            negative_probability: 50.0,
        }
    }
}

/// Random sine-wave source backing the training, validation, and test pools.
pub struct SequenceGenerator {
    rng: StdRng,
}

impl SequenceGenerator {
    pub fn new() -> Self {
        SequenceGenerator {
            rng: StdRng::from_os_rng(),
        }
    }

    /// Deterministic generator for reproducible runs and tests.
    pub fn from_seed(seed: u64) -> Self {
        SequenceGenerator {
            rng: StdRng::seed_from_u64(seed),
        }
    }

    /// Generate `params.count` fresh sequences. Ranges are sampled uniformly;
    /// a collapsed range (min == max) always yields the shared value. Callers
    /// are expected to pass validated params (min <= max, periods > 0).
    pub fn generate(&mut self, params: &GenerationParams) -> Vec<Sequence> {
        (0..params.count)
            .map(|_| synthesize(&self.draw_params(params)))
            .collect()
    }

    fn draw_params(&mut self, params: &GenerationParams) -> WaveParams {
        let amplitude = params.min_amplitude
            + self.rng.random::<f64>() * (params.max_amplitude - params.min_amplitude);
        let period = params.min_period
            + self.rng.random::<f64>() * (params.max_period - params.min_period);
        // The draw lands in [0, 100), so probabilities outside [0, 100] saturate
        let negative = self.rng.random::<f64>() * 100.0 < params.negative_probability;
        WaveParams {
            amplitude,
            period,
            negative,
        }
    }
}

impl Default for SequenceGenerator {
    fn default() -> Self {
        Self::new()
    }
}

/// Evaluate one wave: `SEQUENCE_LEN` points with x = j/(N-1) and
/// y = sign * amplitude * sin(2*pi*x / period).
pub fn synthesize(params: &WaveParams) -> Sequence {
    let sign = if params.negative { -1.0 } else { 1.0 };
    let points = (0..SEQUENCE_LEN)
        .map(|j| {
            let x = j as f64 / (SEQUENCE_LEN - 1) as f64;
            let y = sign
                * params.amplitude
                * (2.0 * std::f64::consts::PI * x / params.period).sin();
            Point { x, y }
        })
        .collect();
    Sequence::new(points)
}
