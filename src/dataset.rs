//! Windowed dataset construction: each sequence becomes one supervised
//! example, the first 49 y-values as input and the 50th as label.

use crate::error::DatasetError;
use crate::wave::{Sequence, SEQUENCE_LEN, WINDOW_LEN};

/// Supervised windows extracted from a pool of sequences. `inputs[i]` holds
/// the first `WINDOW_LEN` y-values of sequence i and `labels[i]` its final
/// y-value, in pool order.
#[derive(Debug, Clone, PartialEq)]
pub struct Dataset {
    pub inputs: Vec<Vec<f32>>,
    pub labels: Vec<f32>,
}

impl Dataset {
    pub fn len(&self) -> usize {
        self.inputs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inputs.is_empty()
    }
}

/// Split every sequence into (window, label). Fails on the first sequence
/// shorter than `SEQUENCE_LEN`.
pub fn build(sequences: &[Sequence]) -> Result<Dataset, DatasetError> {
    let mut inputs = Vec::with_capacity(sequences.len());
    let mut labels = Vec::with_capacity(sequences.len());

    for (index, seq) in sequences.iter().enumerate() {
        if seq.len() < SEQUENCE_LEN {
            return Err(DatasetError::InsufficientLength {
                index,
                len: seq.len(),
                required: SEQUENCE_LEN,
            });
        }
        let points = seq.points();
        inputs.push(points[..WINDOW_LEN].iter().map(|p| p.y as f32).collect());
        labels.push(points[SEQUENCE_LEN - 1].y as f32);
    }

    Ok(Dataset { inputs, labels })
}
