/// Losses for one completed epoch. Epochs are numbered from 1.
#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct EpochRecord {
    pub epoch: usize,
    pub loss: f32,
    pub val_loss: f32,
}

/// Append-only per-epoch loss log for one training run. A new run clears it
/// when its model is compiled; records are never removed otherwise.
#[derive(Debug, Clone, Default, serde::Serialize, serde::Deserialize)]
pub struct LossHistory {
    records: Vec<EpochRecord>,
}

impl LossHistory {
    pub fn new() -> Self {
        LossHistory {
            records: Vec::new(),
        }
    }

    pub fn push(&mut self, record: EpochRecord) {
        self.records.push(record);
    }

    pub fn clear(&mut self) {
        self.records.clear();
    }

    pub fn records(&self) -> &[EpochRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Largest loss across both series, for chart scaling. 0.0 when empty.
    pub fn max_loss(&self) -> f32 {
        self.records
            .iter()
            .flat_map(|r| [r.loss, r.val_loss])
            .fold(0.0_f32, f32::max)
    }
}
