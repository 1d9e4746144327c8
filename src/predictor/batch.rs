use crate::dataset::Dataset;
use crate::error::TensorError;

/// Validated, flattened `[samples, window, 1]` input layout plus `[samples]`
/// targets, ready for tensor construction on any backend.
#[derive(Debug, Clone)]
pub struct SampleBatch {
    inputs: Vec<f32>,
    targets: Vec<f32>,
    samples: usize,
    window: usize,
}

impl SampleBatch {
    /// Flatten a dataset, checking every window against the expected length.
    pub fn from_dataset(dataset: &Dataset, window: usize) -> Result<Self, TensorError> {
        if dataset.is_empty() {
            return Err(TensorError::Empty);
        }
        if dataset.inputs.len() != dataset.labels.len() {
            return Err(TensorError::LengthMismatch {
                inputs: dataset.inputs.len(),
                labels: dataset.labels.len(),
            });
        }

        let samples = dataset.inputs.len();
        let mut inputs = Vec::with_capacity(samples * window);
        for (index, row) in dataset.inputs.iter().enumerate() {
            if row.len() != window {
                return Err(TensorError::WindowMismatch {
                    index,
                    len: row.len(),
                    expected: window,
                });
            }
            inputs.extend_from_slice(row);
        }

        Ok(SampleBatch {
            inputs,
            targets: dataset.labels.clone(),
            samples,
            window,
        })
    }

    pub fn samples(&self) -> usize {
        self.samples
    }

    pub fn window(&self) -> usize {
        self.window
    }

    /// Row-major flattened input values, `samples * window` long.
    pub fn inputs(&self) -> &[f32] {
        &self.inputs
    }

    pub fn targets(&self) -> &[f32] {
        &self.targets
    }

    /// One input window.
    pub fn input_row(&self, i: usize) -> &[f32] {
        &self.inputs[i * self.window..(i + 1) * self.window]
    }

    /// Flatten the selected rows and their targets into a mini-batch.
    pub fn gather(&self, indices: &[usize]) -> (Vec<f32>, Vec<f32>) {
        let mut inputs = Vec::with_capacity(indices.len() * self.window);
        let mut targets = Vec::with_capacity(indices.len());
        for &i in indices {
            inputs.extend_from_slice(self.input_row(i));
            targets.push(self.targets[i]);
        }
        (inputs, targets)
    }
}
